// SPDX-FileCopyrightText: 2026 Galatea Authors
// SPDX-License-Identifier: MIT

//! Parsers that turn raw document text into the structural graph model.

pub mod markdown;

pub use markdown::parse_markdown;
