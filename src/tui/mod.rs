// SPDX-FileCopyrightText: 2026 Galatea Authors
// SPDX-License-Identifier: MIT

//! Terminal UI.
//!
//! An interactive explorer over a [`SessionController`]: graph pane showing
//! the active backend's frame, a node list with a detail panel, incremental
//! search, and backend switching. Includes the built-in sample document used
//! by `--demo` and the server's sample endpoint.

use std::{
    error::Error,
    io,
    time::{Duration, Instant},
};

use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    style::Print,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    layout::Position,
    prelude::*,
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};

use crate::model::{NodeId, NodeKind};
use crate::query::{search_nodes, SearchMode};
use crate::session::{LoadOutcome, ParseProvenance, SessionController};

mod theme;

use theme::TuiTheme;

const SIDEBAR_WIDTH: u16 = 36;
const TOAST_TTL: Duration = Duration::from_secs(3);

/// The sample document served by `GET /api/markdown/sample` and loaded by
/// `--demo`.
pub fn demo_document() -> &'static str {
    "# Sample Markdown\n\
     \n\
     This is a **sample** markdown file for testing the API.\n\
     \n\
     ## Features\n\
     \n\
     - Bullet points\n\
     - *Italic text*\n\
     - `Inline code`\n\
     \n\
     ## Links\n\
     \n\
     Check out [D3.js](https://d3js.org) for data visualization!\n\
     \n\
     ### Nested Section\n\
     \n\
     This is a deeper nested section with more content."
}

/// Runs the interactive explorer until the user quits.
///
/// The initial load (and every `R` re-parse) goes through the controller's
/// full load path on `runtime`, so a configured remote client is actually
/// driven.
pub fn run(
    controller: SessionController,
    content: String,
    filename: Option<String>,
    runtime: &tokio::runtime::Runtime,
) -> Result<(), Box<dyn Error>> {
    let mut terminal = TerminalSession::new()?;
    let mut app = App::new(controller, content, filename);
    runtime.block_on(app.reload());

    while !app.should_quit {
        terminal.draw(|frame| draw(frame, &mut app))?;

        if event::poll(Duration::from_millis(250))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    app.handle_key(key);
                    if app.take_pending_reload() {
                        runtime.block_on(app.reload());
                    }
                }
                Event::Mouse(mouse) => app.handle_mouse(mouse),
                _ => {}
            }
        }
    }

    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    Nodes,
    Graph,
}

#[derive(Debug, Clone)]
struct Toast {
    message: String,
    expires_at: Instant,
}

#[derive(Debug, Clone, Default)]
struct Search {
    editing: bool,
    query: String,
    mode: SearchMode,
    /// Rows are filtered to a result set while a committed query is live.
    filtered: bool,
}

struct App {
    controller: SessionController,
    source_content: String,
    source_filename: Option<String>,
    rows: Vec<NodeId>,
    list_state: ListState,
    focus: Focus,
    scroll_x: u16,
    scroll_y: u16,
    graph_area: Rect,
    search: Search,
    toast: Option<Toast>,
    pending_reload: bool,
    should_quit: bool,
    theme: TuiTheme,
}

impl App {
    fn new(controller: SessionController, content: String, filename: Option<String>) -> Self {
        Self {
            controller,
            source_content: content,
            source_filename: filename,
            rows: Vec::new(),
            list_state: ListState::default(),
            focus: Focus::Nodes,
            scroll_x: 0,
            scroll_y: 0,
            graph_area: Rect::default(),
            search: Search::default(),
            toast: None,
            pending_reload: false,
            should_quit: false,
            theme: TuiTheme,
        }
    }

    async fn reload(&mut self) {
        let outcome = self
            .controller
            .load_content(self.source_content.clone(), self.source_filename.clone())
            .await;
        match outcome {
            Ok(LoadOutcome::Adopted(_)) | Ok(LoadOutcome::Superseded) => {}
            Err(err) => self.set_toast(format!("Load failed: {err}")),
        }
        self.refresh_rows();

        // A remote failure is a diagnostic, not a failure: the content was
        // still parsed locally.
        if self.controller.provenance() == ParseProvenance::Local {
            if let Some(err) = self.controller.last_remote_error() {
                self.set_toast(format!("remote parse failed, parsed locally: {err}"));
            }
        }
    }

    fn refresh_rows(&mut self) {
        self.search = Search::default();
        self.rows = self
            .controller
            .snapshot()
            .nodes()
            .iter()
            .map(|node| node.id().clone())
            .collect();
        self.sync_list_to_selection();
    }

    fn sync_list_to_selection(&mut self) {
        let index = self
            .controller
            .selected()
            .and_then(|id| self.rows.iter().position(|row| row == id));
        match index {
            Some(index) => self.list_state.select(Some(index)),
            None if self.rows.is_empty() => self.list_state.select(None),
            None => self.list_state.select(Some(0)),
        }
    }

    fn take_pending_reload(&mut self) -> bool {
        std::mem::take(&mut self.pending_reload)
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if self.search.editing {
            self.handle_search_key(key);
            return;
        }

        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('j') | KeyCode::Down => match self.focus {
                Focus::Nodes => self.move_selection(1),
                Focus::Graph => self.scroll_y = self.scroll_y.saturating_add(1),
            },
            KeyCode::Char('k') | KeyCode::Up => match self.focus {
                Focus::Nodes => self.move_selection(-1),
                Focus::Graph => self.scroll_y = self.scroll_y.saturating_sub(1),
            },
            KeyCode::Char('h') | KeyCode::Left if self.focus == Focus::Graph => {
                self.scroll_x = self.scroll_x.saturating_sub(2);
            }
            KeyCode::Char('l') | KeyCode::Right if self.focus == Focus::Graph => {
                self.scroll_x = self.scroll_x.saturating_add(2);
            }
            KeyCode::Enter | KeyCode::Tab => self.toggle_focus(),
            KeyCode::Char('b') => self.toggle_backend(),
            KeyCode::Char('/') => {
                self.search.editing = true;
                self.search.query.clear();
            }
            KeyCode::Char('y') => self.yank_selected(),
            KeyCode::Char('c') => self.clear_session(),
            KeyCode::Char('R') => self.pending_reload = true,
            KeyCode::Esc => self.dismiss(),
            _ => {}
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.search = Search::default();
                self.restore_all_rows();
            }
            KeyCode::Enter => {
                self.search.editing = false;
            }
            KeyCode::Char('r') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.search.mode = match self.search.mode {
                    SearchMode::Substring => SearchMode::Regex,
                    SearchMode::Regex => SearchMode::Substring,
                };
                self.apply_search();
            }
            KeyCode::Backspace => {
                self.search.query.pop();
                self.apply_search();
            }
            KeyCode::Char(ch) => {
                self.search.query.push(ch);
                self.apply_search();
            }
            _ => {}
        }
    }

    fn apply_search(&mut self) {
        if self.search.query.is_empty() {
            self.restore_all_rows();
            self.search.filtered = false;
            return;
        }
        match search_nodes(
            self.controller.snapshot(),
            &self.search.query,
            self.search.mode,
        ) {
            Ok(results) => {
                self.rows = results;
                self.search.filtered = true;
                if self.rows.is_empty() {
                    self.list_state.select(None);
                } else {
                    self.list_state.select(Some(0));
                    self.select_row(0);
                }
            }
            // Half-typed regexes are expected; keep the previous rows.
            Err(_) => {}
        }
    }

    fn restore_all_rows(&mut self) {
        self.rows = self
            .controller
            .snapshot()
            .nodes()
            .iter()
            .map(|node| node.id().clone())
            .collect();
        self.sync_list_to_selection();
    }

    fn move_selection(&mut self, delta: isize) {
        if self.rows.is_empty() {
            return;
        }
        let current = self.list_state.selected().unwrap_or(0) as isize;
        let next = (current + delta).clamp(0, self.rows.len() as isize - 1) as usize;
        self.list_state.select(Some(next));
        self.select_row(next);
    }

    fn select_row(&mut self, index: usize) {
        let Some(id) = self.rows.get(index).cloned() else {
            return;
        };
        if let Err(err) = self.controller.select(&id) {
            self.set_toast(format!("Select failed: {err}"));
        }
    }

    fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Nodes => Focus::Graph,
            Focus::Graph => Focus::Nodes,
        };
    }

    fn toggle_backend(&mut self) {
        let target = self.controller.active_backend().other();
        match self.controller.switch_backend(target) {
            Ok(()) => self.set_toast(format!("Backend: {}", target.label())),
            Err(err) => self.set_toast(format!("Backend switch failed: {err}")),
        }
    }

    fn yank_selected(&mut self) {
        let Some(detail) = self.controller.selected_detail() else {
            self.set_toast("No node selected");
            return;
        };
        let text = match detail.url {
            Some(url) => url,
            None => detail.body_md,
        };
        match copy_to_clipboard(&text) {
            Ok(backend) => self.set_toast(format!("Yanked ({backend})")),
            Err(err) => self.set_toast(format!("Clipboard error: {err}")),
        }
    }

    fn clear_session(&mut self) {
        self.controller.clear();
        self.refresh_rows();
        self.set_toast("Session cleared");
    }

    fn dismiss(&mut self) {
        if self.search.filtered {
            self.search = Search::default();
            self.restore_all_rows();
        } else if let Err(err) = self.controller.clear_selection() {
            self.set_toast(format!("Deselect failed: {err}"));
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return;
        }
        let inner = inner_area(self.graph_area);
        if !inner.contains(Position::new(mouse.column, mouse.row)) {
            return;
        }
        let x = (mouse.column - inner.x) as usize + self.scroll_x as usize;
        let y = (mouse.row - inner.y) as usize + self.scroll_y as usize;
        match self.controller.click(x, y) {
            Ok(true) => {
                self.focus = Focus::Graph;
                self.sync_list_to_selection();
            }
            Ok(false) => {}
            Err(err) => self.set_toast(format!("Click failed: {err}")),
        }
    }

    fn set_toast(&mut self, message: impl Into<String>) {
        self.toast = Some(Toast {
            message: message.into(),
            expires_at: Instant::now() + TOAST_TTL,
        });
    }

    fn live_toast(&mut self) -> Option<String> {
        if let Some(toast) = &self.toast {
            if toast.expires_at <= Instant::now() {
                self.toast = None;
            }
        }
        self.toast.as_ref().map(|toast| toast.message.clone())
    }

    fn status_line(&self) -> String {
        let stats = self.controller.stats();
        format!(
            " {} | {} nodes, {} edges, {} words | {} | {} | q quit  / search  b backend  y yank  R reload",
            self.controller.filename().unwrap_or("(no document)"),
            stats.node_count,
            stats.edge_count,
            stats.word_count,
            self.controller.provenance().label(),
            self.controller.active_backend().label(),
        )
    }
}

fn inner_area(area: Rect) -> Rect {
    // Strip the one-cell border the graph block draws.
    Rect {
        x: area.x.saturating_add(1),
        y: area.y.saturating_add(1),
        width: area.width.saturating_sub(2),
        height: area.height.saturating_sub(2),
    }
}

fn draw(frame: &mut Frame<'_>, app: &mut App) {
    let [main, status] =
        Layout::vertical([Constraint::Min(3), Constraint::Length(1)]).areas(frame.size());
    let [sidebar, graph] =
        Layout::horizontal([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(10)]).areas(main);
    let [list_area, detail_area] =
        Layout::vertical([Constraint::Percentage(50), Constraint::Percentage(50)]).areas(sidebar);

    draw_node_list(frame, app, list_area);
    draw_detail(frame, app, detail_area);
    draw_graph(frame, app, graph);
    draw_status(frame, app, status);
}

fn draw_node_list(frame: &mut Frame<'_>, app: &mut App, area: Rect) {
    let title = if app.search.editing || app.search.filtered {
        let mode = match app.search.mode {
            SearchMode::Substring => "",
            SearchMode::Regex => " [re]",
        };
        format!(" /{}{} ", app.search.query, mode)
    } else {
        " Nodes ".to_owned()
    };

    let items: Vec<ListItem<'_>> = app
        .rows
        .iter()
        .filter_map(|id| app.controller.snapshot().node(id))
        .map(|node| {
            let (prefix, style) = match node.as_heading() {
                Some(heading) => (
                    "  ".repeat(heading.level().saturating_sub(1) as usize),
                    app.theme.heading_style(),
                ),
                None => ("↗ ".to_owned(), app.theme.link_style()),
            };
            ListItem::new(format!("{prefix}{}", node.text())).style(style)
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .border_style(app.theme.panel_border_style(app.focus == Focus::Nodes)),
        )
        .highlight_style(app.theme.selection_style());
    frame.render_stateful_widget(list, area, &mut app.list_state);
}

fn draw_detail(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let text = match app.controller.selected_detail() {
        Some(detail) => {
            let mut lines = vec![Line::styled(
                detail.title.clone(),
                app.theme.base_style().add_modifier(Modifier::BOLD),
            )];
            match detail.kind {
                NodeKind::Heading => {
                    if let (Some(level), Some(line)) = (detail.level, detail.source_line) {
                        lines.push(Line::styled(
                            format!("heading, level {level}, line {line}"),
                            app.theme.status_style(),
                        ));
                    }
                }
                NodeKind::Link => {
                    if let Some(url) = &detail.url {
                        lines.push(Line::styled(url.clone(), app.theme.link_style()));
                    }
                }
            }
            lines.push(Line::default());
            lines.extend(detail.body_md.lines().map(|line| Line::raw(line.to_owned())));
            Text::from(lines)
        }
        None => Text::styled("No selection", app.theme.status_style()),
    };

    let detail = Paragraph::new(text)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title(" Detail "));
    frame.render_widget(detail, area);
}

fn draw_graph(frame: &mut Frame<'_>, app: &mut App, area: Rect) {
    app.graph_area = area;

    let lines: Vec<Line<'_>> = match app.controller.frame() {
        Some(rendered) if !rendered.lines().is_empty() => rendered
            .lines()
            .iter()
            .map(|line| Line::raw(line.clone()))
            .collect(),
        _ => vec![Line::styled(
            "Empty session — load a document or press R",
            app.theme.status_style(),
        )],
    };

    let graph = Paragraph::new(lines)
        .scroll((app.scroll_y, app.scroll_x))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" Graph ({}) ", app.controller.active_backend().label()))
                .border_style(app.theme.panel_border_style(app.focus == Focus::Graph)),
        );
    frame.render_widget(graph, area);
}

fn draw_status(frame: &mut Frame<'_>, app: &mut App, area: Rect) {
    let (text, style) = match app.live_toast() {
        Some(message) => (format!(" {message}"), app.theme.toast_style()),
        None => (app.status_line(), app.theme.status_style()),
    };
    frame.render_widget(Paragraph::new(text).style(style), area);
}

struct TerminalSession {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalSession {
    fn new() -> Result<Self, Box<dyn Error>> {
        enable_raw_mode()?;

        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture).map_err(|err| {
            teardown_terminal();
            err
        })?;

        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).map_err(|err| {
            teardown_terminal();
            err
        })?;
        terminal.clear().map_err(|err| {
            teardown_terminal();
            err
        })?;

        Ok(Self { terminal })
    }

    fn draw(&mut self, draw_fn: impl FnOnce(&mut Frame<'_>)) -> io::Result<()> {
        self.terminal.draw(draw_fn)?;
        Ok(())
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = self.terminal.show_cursor();
        teardown_terminal();
    }
}

fn teardown_terminal() {
    let _ = disable_raw_mode();
    let mut stdout = io::stdout();
    let _ = execute!(stdout, DisableMouseCapture, LeaveAlternateScreen);
}

fn copy_to_clipboard(text: &str) -> Result<&'static str, String> {
    let mut stdout = io::stdout();
    execute!(stdout, Print(osc52_sequence(text))).map_err(|err| err.to_string())?;
    Ok("osc52")
}

fn osc52_sequence(text: &str) -> String {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine as _;

    let encoded = STANDARD.encode(text.as_bytes());
    format!("\x1b]52;c;{encoded}\x1b\\")
}
