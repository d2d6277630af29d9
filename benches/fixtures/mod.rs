// SPDX-FileCopyrightText: 2026 Galatea Authors
// SPDX-License-Identifier: MIT

#![allow(dead_code)]

// Shared deterministic benchmark fixtures (no RNG).

use std::fmt::Write as _;

use galatea::model::GraphSnapshot;

#[derive(Debug, Clone, Copy)]
pub enum Case {
    Small,
    MediumNested,
    LargeLinkHeavy,
}

impl Case {
    pub fn id(self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::MediumNested => "medium_nested",
            Self::LargeLinkHeavy => "large_link_heavy",
        }
    }
}

/// Builds a deterministic markdown document for `case`.
pub fn document(case: Case) -> String {
    match case {
        Case::Small => {
            let mut text = String::new();
            text.push_str("# Overview\n\nA short document.\n\n");
            for section in 0..4 {
                let _ = writeln!(text, "## Section {section}\n\nBody for section {section}.\n");
            }
            text
        }
        Case::MediumNested => {
            let mut text = String::from("# Manual\n");
            for chapter in 0..20 {
                let _ = writeln!(text, "## Chapter {chapter}");
                for part in 0..6 {
                    let _ = writeln!(text, "### Part {chapter}.{part}");
                    let _ = writeln!(
                        text,
                        "Paragraph text for part {chapter}.{part} with enough words to count.\n"
                    );
                }
            }
            text
        }
        Case::LargeLinkHeavy => {
            let mut text = String::from("# Index\n");
            for section in 0..120 {
                let _ = writeln!(text, "## Topic {section}");
                for link in 0..8 {
                    // Every fourth link repeats an earlier URL to exercise
                    // reference deduplication.
                    let target = if link % 4 == 3 { 0 } else { section * 8 + link };
                    let _ = writeln!(
                        text,
                        "See [entry {target}](https://example.com/entry/{target}) for details."
                    );
                }
            }
            text
        }
    }
}

/// Cheap structural checksum so the optimizer cannot discard a parse.
pub fn checksum(snapshot: &GraphSnapshot) -> u64 {
    let mut sum = 0u64;
    for node in snapshot.nodes() {
        sum = sum
            .wrapping_mul(31)
            .wrapping_add(node.id().as_str().len() as u64)
            .wrapping_add(node.text().len() as u64);
    }
    sum.wrapping_add(snapshot.edges().len() as u64)
}
