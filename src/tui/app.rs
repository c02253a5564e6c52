use std::io;
use std::sync::mpsc::{Receiver, TryRecvError};
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use log::{debug, info, warn};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;
use ratatui::{Frame, Terminal};

use crate::config::Config;
use crate::engine::view::{LoadState, ViewState};
use crate::region::dataset::{self, DataSource, DatasetError};
use crate::region::model::RegionDataset;
use crate::tui::columns::{self, Column};
use crate::tui::input::{self, Action, Direction};
use crate::tui::layout::{self, ColumnLayout};
use crate::tui::render::{self, Phase, TableRenderData, char_byte_offset};
use crate::tui::rows::{VisibleRow, visible_rows};

const TICK: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Normal,
    Search,
}

type LoadReceiver = Receiver<Result<RegionDataset, DatasetError>>;

#[derive(Debug)]
struct AppState {
    view: ViewState,
    pending_load: Option<LoadReceiver>,
    source_label: String,
    config: Config,
    columns: Vec<Column>,
    mode: Mode,
    query_cursor: usize,
    cursor: usize,
    offset: usize,
    column_offset: usize,
    viewport_rows: usize,
    viewport_width: u16,
    show_help: bool,
    tick: usize,
}

impl AppState {
    fn new(source: &DataSource, query: Option<String>, config: Config) -> Self {
        let query = query.unwrap_or_default();
        let query_cursor = query.chars().count();
        Self {
            view: ViewState::with_query(query),
            pending_load: None,
            source_label: source.describe(),
            config,
            columns: Vec::new(),
            mode: Mode::Normal,
            query_cursor,
            cursor: 0,
            offset: 0,
            column_offset: 0,
            viewport_rows: 1,
            viewport_width: 0,
            show_help: false,
            tick: 0,
        }
    }

    fn start_loading(&mut self, source: DataSource) {
        self.pending_load = Some(dataset::spawn_load(source));
    }

    /// Pick up the load result if it has arrived.
    fn poll_load(&mut self) {
        let Some(rx) = &self.pending_load else { return };
        let outcome = match rx.try_recv() {
            Ok(outcome) => outcome,
            Err(TryRecvError::Empty) => return,
            Err(TryRecvError::Disconnected) => {
                warn!("dataset loader exited without a result");
                self.pending_load = None;
                return;
            }
        };
        self.pending_load = None;
        self.accept_dataset(outcome);
    }

    fn accept_dataset(&mut self, outcome: Result<RegionDataset, DatasetError>) {
        self.view.dataset_loaded(outcome);
        self.columns = self
            .view
            .catalog()
            .map(columns::columns)
            .unwrap_or_default();
        self.cursor = 0;
        self.offset = 0;
    }

    fn rows(&self) -> Vec<VisibleRow<'_>> {
        visible_rows(self.view.visible_tree(), self.view.expansion())
    }

    fn column_layout(&self) -> ColumnLayout {
        layout::compute(
            self.viewport_width,
            self.columns.len().saturating_sub(1),
            self.column_offset,
            self.config.name_width,
            self.config.atlas_width,
        )
    }

    fn phase(&self) -> Phase {
        match self.view.load_state() {
            LoadState::Loading => Phase::Loading { tick: self.tick },
            LoadState::Ready(_) => Phase::Ready,
            LoadState::Failed => Phase::Empty,
        }
    }

    fn update_viewport(&mut self, area: Rect) {
        let (width, rows) = render::table_viewport(area);
        self.viewport_width = width;
        self.viewport_rows = rows.max(1);
        self.column_offset = self.column_offset.min(self.column_layout().max_offset());
    }

    fn ensure_cursor_visible(&mut self, row_count: usize) {
        if row_count == 0 {
            self.cursor = 0;
            self.offset = 0;
            return;
        }
        self.cursor = self.cursor.min(row_count - 1);
        if self.cursor < self.offset {
            self.offset = self.cursor;
        } else if self.cursor >= self.offset + self.viewport_rows {
            self.offset = self.cursor + 1 - self.viewport_rows;
        }
        self.offset = self.offset.min(row_count.saturating_sub(self.viewport_rows));
    }

    fn draw(&mut self, frame: &mut Frame) {
        self.update_viewport(frame.area());
        let row_count = self.rows().len();
        self.ensure_cursor_visible(row_count);

        let rows = self.rows();
        let data = TableRenderData {
            source: &self.source_label,
            phase: self.phase(),
            total_regions: self
                .view
                .dataset()
                .map(|d| d.counted_regions())
                .unwrap_or(0),
            atlas_total: self.columns.len().saturating_sub(1),
            query: self.view.query(),
            query_cursor: self.query_cursor,
            editing_query: self.mode == Mode::Search,
            match_count: self.view.match_count(),
            columns: &self.columns,
            layout: self.column_layout(),
            rows: &rows,
            offset: self.offset,
            cursor: self.cursor,
            tree_lines: self.config.tree_lines,
            show_help: self.show_help,
        };
        render::draw(frame, &data);
    }

    /// Returns `true` when the app should exit.
    fn handle_key(&mut self, key: KeyEvent) -> bool {
        let action = input::action_for_key(key, self.mode == Mode::Search);
        if self.show_help {
            if matches!(action, Action::Quit) {
                return true;
            }
            if matches!(action, Action::ToggleHelp | Action::Cancel | Action::ClearSearch) {
                self.show_help = false;
            }
            return false;
        }
        match self.mode {
            Mode::Search => self.handle_search_action(action),
            Mode::Normal => self.handle_normal_action(action),
        }
    }

    fn handle_search_action(&mut self, action: Action) -> bool {
        match action {
            Action::Quit => return true,
            Action::SubmitText | Action::Cancel => self.mode = Mode::Normal,
            Action::Move(direction) => self.move_cursor(direction),
            Action::InputChar(c) => {
                let mut query = self.view.query().to_string();
                let at = char_byte_offset(&query, self.query_cursor);
                query.insert(at, c);
                self.query_cursor += 1;
                self.apply_query(query);
            }
            Action::Backspace => {
                if self.query_cursor > 0 {
                    let mut query = self.view.query().to_string();
                    let at = char_byte_offset(&query, self.query_cursor - 1);
                    query.remove(at);
                    self.query_cursor -= 1;
                    self.apply_query(query);
                }
            }
            Action::ClearText => {
                self.query_cursor = 0;
                self.apply_query(String::new());
            }
            _ => {}
        }
        false
    }

    fn handle_normal_action(&mut self, action: Action) -> bool {
        match action {
            Action::Quit => return true,
            Action::Move(direction) => self.move_cursor(direction),
            Action::PageUp => self.cursor = self.cursor.saturating_sub(self.viewport_rows),
            Action::PageDown => self.cursor += self.viewport_rows,
            Action::First => self.cursor = 0,
            Action::Last => self.cursor = self.rows().len().saturating_sub(1),
            Action::Expand => self.set_current_expanded(true),
            Action::Collapse => self.collapse_or_parent(),
            Action::Toggle => {
                if let Some(open) = self.current_row_state() {
                    self.set_current_expanded(!open);
                }
            }
            Action::ExpandAll => {
                self.view.expand_all();
                info!("expanded all rows");
            }
            Action::CollapseAll => {
                self.view.collapse_all();
                self.cursor = 0;
                info!("collapsed all rows");
            }
            Action::StartSearch => {
                self.mode = Mode::Search;
                self.query_cursor = self.view.query().chars().count();
            }
            Action::ClearSearch => {
                if !self.view.query().is_empty() {
                    self.query_cursor = 0;
                    self.apply_query(String::new());
                }
            }
            Action::NextColumns => {
                let layout = self.column_layout();
                let step = layout.atlas_count.max(1);
                self.column_offset = (self.column_offset + step).min(layout.max_offset());
            }
            Action::PrevColumns => {
                let step = self.column_layout().atlas_count.max(1);
                self.column_offset = self.column_offset.saturating_sub(step);
            }
            Action::ToggleHelp => self.show_help = !self.show_help,
            _ => {}
        }
        false
    }

    fn apply_query(&mut self, query: String) {
        self.view.set_query(query);
        self.cursor = 0;
        self.offset = 0;
    }

    fn move_cursor(&mut self, direction: Direction) {
        match direction {
            Direction::Up => self.cursor = self.cursor.saturating_sub(1),
            Direction::Down => {
                let last = self.rows().len().saturating_sub(1);
                self.cursor = (self.cursor + 1).min(last);
            }
        }
    }

    /// `Some(expanded)` for the current row when it has children.
    fn current_row_state(&self) -> Option<bool> {
        let rows = self.rows();
        let row = rows.get(self.cursor)?;
        row.has_children().then_some(row.expanded)
    }

    fn set_current_expanded(&mut self, expanded: bool) {
        let key = {
            let rows = self.rows();
            match rows.get(self.cursor) {
                Some(row) if row.has_children() => row.node.key.clone(),
                _ => return,
            }
        };
        debug!("row {} expanded={}", key, expanded);
        self.view.toggle_row(&key, expanded);
    }

    fn collapse_or_parent(&mut self) {
        let (key, parent) = {
            let rows = self.rows();
            let Some(row) = rows.get(self.cursor) else { return };
            let key = (row.has_children() && row.expanded).then(|| row.node.key.clone());
            (key, row.parent)
        };
        match (key, parent) {
            (Some(key), _) => self.view.toggle_row(&key, false),
            (None, Some(parent)) => self.cursor = parent,
            (None, None) => {}
        }
    }
}

pub fn run(source: DataSource, query: Option<String>, config: Config) -> Result<()> {
    let mut app = AppState::new(&source, query, config);
    app.start_loading(source);

    let _screen = AltScreen::enter()?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;

    loop {
        app.poll_load();
        terminal.draw(|f| app.draw(f))?;
        if !event::poll(TICK)? {
            app.tick = app.tick.wrapping_add(1);
            continue;
        }
        if let Event::Key(key) = event::read()? {
            if matches!(key.kind, KeyEventKind::Release | KeyEventKind::Repeat) {
                continue;
            }
            if app.handle_key(key) {
                break;
            }
        }
    }

    Ok(())
}

/// Raw mode plus the alternate screen for as long as the value lives.
struct AltScreen;

impl AltScreen {
    fn enter() -> io::Result<Self> {
        enable_raw_mode()?;
        if let Err(err) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(err);
        }
        Ok(Self)
    }
}

impl Drop for AltScreen {
    fn drop(&mut self) {
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        let _ = disable_raw_mode();
    }
}
