// SPDX-FileCopyrightText: 2026 Galatea Authors
// SPDX-License-Identifier: MIT

use ratatui::style::{Color, Modifier, Style};

#[derive(Debug, Clone, Default)]
pub(crate) struct TuiTheme;

impl TuiTheme {
    pub(crate) fn base_style(&self) -> Style {
        Style::default()
    }

    pub(crate) fn panel_border_style(&self, focused: bool) -> Style {
        if focused {
            self.base_style().fg(Color::Yellow)
        } else {
            self.base_style()
        }
    }

    pub(crate) fn selection_style(&self) -> Style {
        self.base_style()
            .add_modifier(Modifier::REVERSED | Modifier::BOLD)
    }

    pub(crate) fn heading_style(&self) -> Style {
        self.base_style().fg(Color::LightGreen)
    }

    pub(crate) fn link_style(&self) -> Style {
        self.base_style().fg(Color::LightBlue)
    }

    pub(crate) fn status_style(&self) -> Style {
        self.base_style().fg(Color::Gray)
    }

    pub(crate) fn toast_style(&self) -> Style {
        self.base_style().fg(Color::Black).bg(Color::Yellow)
    }

    pub(crate) fn error_style(&self) -> Style {
        self.base_style().fg(Color::Red)
    }
}
