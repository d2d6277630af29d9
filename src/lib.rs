// SPDX-FileCopyrightText: 2026 Galatea Authors
// SPDX-License-Identifier: MIT

//! Galatea — markdown structural graph explorer.
//!
//! Parses markdown into a navigable graph of headings and link references,
//! renders it through switchable terminal backends, and optionally round-trips
//! parsing through a small processing API.

pub mod format;
pub mod layout;
pub mod model;
pub mod query;
pub mod remote;
pub mod render;
pub mod server;
pub mod session;
pub mod tui;
