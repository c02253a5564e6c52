use ratatui::Frame;
use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, BorderType, Borders, Cell, Clear, Padding, Paragraph, Row, Table, TableState,
};

use crate::tui::columns::{Column, ColumnKind};
use crate::tui::input::HELP;
use crate::tui::layout::{COLUMN_SPACING, ColumnLayout};
use crate::tui::rows::{VisibleRow, tree_prefix};

const SPINNER: [char; 8] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧'];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Loading { tick: usize },
    Ready,
    /// The load failed; nothing to show.
    Empty,
}

#[derive(Debug)]
pub struct TableRenderData<'a> {
    pub source: &'a str,
    pub phase: Phase,
    pub total_regions: usize,
    pub atlas_total: usize,
    pub query: &'a str,
    pub query_cursor: usize,
    pub editing_query: bool,
    pub match_count: Option<usize>,
    pub columns: &'a [Column],
    pub layout: ColumnLayout,
    pub rows: &'a [VisibleRow<'a>],
    pub offset: usize,
    pub cursor: usize,
    pub tree_lines: bool,
    pub show_help: bool,
}

/// Screen regions: title, search bar, table, hints.
pub struct Areas {
    pub title: Rect,
    pub search: Rect,
    pub table: Rect,
    pub hints: Rect,
}

pub fn split(area: Rect) -> Areas {
    let [title, search, table, hints] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(3),
        Constraint::Min(3),
        Constraint::Length(1),
    ])
    .areas(area);
    Areas {
        title,
        search,
        table,
        hints,
    }
}

/// Width available to the table columns and number of body rows that fit.
pub fn table_viewport(area: Rect) -> (u16, usize) {
    let table = table_block("").inner(split(area).table);
    // One line goes to the header row.
    (table.width, table.height.saturating_sub(1) as usize)
}

fn table_block(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            title,
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ))
}

pub fn draw(frame: &mut Frame, data: &TableRenderData<'_>) {
    let areas = split(frame.area());
    draw_title(frame, areas.title, data);
    draw_search(frame, areas.search, data);
    draw_table(frame, areas.table, data);
    draw_hints(frame, areas.hints, data);
    if data.show_help {
        draw_help(frame);
    }
}

fn draw_title(frame: &mut Frame, area: Rect, data: &TableRenderData<'_>) {
    let mut spans = vec![
        Span::styled("atlastable", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("  "),
        Span::styled(data.source.to_string(), Style::default().fg(Color::Gray)),
    ];
    if data.phase == Phase::Ready {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            format!(
                "{} regions · {} atlases",
                data.total_regions, data.atlas_total
            ),
            Style::default().fg(Color::DarkGray),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_search(frame: &mut Frame, area: Rect, data: &TableRenderData<'_>) {
    let border = if data.editing_query {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(border)
        .title(Span::styled("Search", Style::default().fg(Color::Gray)));
    if let Some(count) = data.match_count {
        let label = match count {
            0 => "no matches".to_string(),
            1 => "1 match".to_string(),
            n => format!("{} matches", n),
        };
        block = block.title_top(
            Line::from(Span::styled(label, Style::default().fg(Color::Yellow))).right_aligned(),
        );
    }

    let text_style = Style::default().fg(Color::White);
    let placeholder_style = Style::default().fg(Color::DarkGray);
    let line = if data.editing_query {
        search_line(data.query, data.query_cursor, text_style, placeholder_style)
    } else if data.query.is_empty() {
        Line::from(Span::styled("press / to search", placeholder_style))
    } else {
        Line::from(Span::styled(data.query.to_string(), text_style))
    };
    frame.render_widget(Paragraph::new(line).block(block), area);
}

fn draw_table(frame: &mut Frame, area: Rect, data: &TableRenderData<'_>) {
    let title = if data.layout.is_paged() && data.layout.atlas_count > 0 {
        format!(
            "REGIONS  atlases {}–{} of {}",
            data.layout.atlas_start + 1,
            data.layout.atlas_start + data.layout.atlas_count,
            data.layout.total_atlases
        )
    } else {
        "REGIONS".to_string()
    };
    let block = table_block(&title);

    match data.phase {
        Phase::Loading { tick } => {
            let spinner = SPINNER[tick % SPINNER.len()];
            let text = Paragraph::new(Line::from(vec![
                Span::styled(format!("{} ", spinner), Style::default().fg(Color::Cyan)),
                Span::styled("Loading regions…", Style::default().fg(Color::Gray)),
            ]))
            .block(block.padding(Padding::new(1, 1, 1, 0)));
            frame.render_widget(text, area);
            return;
        }
        Phase::Empty | Phase::Ready if data.rows.is_empty() => {
            let message = if data.match_count.is_some() {
                format!("No regions match “{}”", data.query)
            } else {
                "No regions to show".to_string()
            };
            let text = Paragraph::new(Span::styled(message, Style::default().fg(Color::DarkGray)))
                .block(block.padding(Padding::new(1, 1, 1, 0)));
            frame.render_widget(text, area);
            return;
        }
        _ => {}
    }

    let visible_columns: Vec<&Column> = data
        .columns
        .iter()
        .filter(|c| match c.kind {
            ColumnKind::Name => true,
            ColumnKind::Atlas(idx) => data.layout.visible_atlases().contains(&idx),
        })
        .collect();

    let widths = visible_columns.iter().map(|c| match c.kind {
        ColumnKind::Name => Constraint::Length(data.layout.name_width),
        ColumnKind::Atlas(_) => Constraint::Length(data.layout.atlas_width),
    });

    let header = Row::new(visible_columns.iter().map(|c| {
        Cell::from(Span::styled(
            c.title.clone(),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ))
    }));

    let height = block.inner(area).height.saturating_sub(1) as usize;
    let window = data.rows.iter().skip(data.offset).take(height.max(1));
    let body: Vec<Row> = window
        .map(|row| {
            let prefix = tree_prefix(row, data.tree_lines);
            Row::new(
                visible_columns
                    .iter()
                    .map(|c| Cell::from(c.cell(row.node, data.query, &prefix))),
            )
        })
        .collect();

    let mut state = TableState::default();
    state.select(data.cursor.checked_sub(data.offset));

    let table = Table::new(body, widths)
        .header(header)
        .block(block)
        .column_spacing(COLUMN_SPACING)
        .row_highlight_style(Style::default().bg(Color::DarkGray));
    frame.render_stateful_widget(table, area, &mut state);
}

fn draw_hints(frame: &mut Frame, area: Rect, data: &TableRenderData<'_>) {
    let hints = if data.editing_query {
        "type to filter  [Enter] done  [Esc] done  [Ctrl-U] clear"
    } else {
        "[/] search  [←/→] collapse/expand  [E/C] all  [ / ] atlases  [?] help  [q] quit"
    };
    frame.render_widget(
        Paragraph::new(Span::styled(hints, Style::default().fg(Color::DarkGray))),
        area,
    );
}

fn draw_help(frame: &mut Frame) {
    // Rows: one per binding, plus borders and top padding.
    let area = popup_area(frame.area(), 56, HELP.len() as u16 + 3);
    frame.render_widget(Clear, area);

    let lines: Vec<Line> = HELP
        .iter()
        .map(|(keys, what)| {
            Line::from(vec![
                Span::styled(
                    format!("{:<12}", keys),
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(*what, Style::default().fg(Color::Gray)),
            ])
        })
        .collect();

    let panel = Paragraph::new(lines).block(
        Block::default()
            .title(Line::from(vec![
                Span::styled(
                    "Keys",
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw("  "),
                Span::styled("[?] close", Style::default().fg(Color::Gray)),
            ]))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Cyan))
            .padding(Padding::new(1, 1, 1, 0)),
    );
    frame.render_widget(panel, area);
}

/// A `width` x `height` box centred in `area`, shrunk to fit when `area` is smaller.
fn popup_area(area: Rect, width: u16, height: u16) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height.min(area.height))])
        .flex(Flex::Center)
        .areas(area);
    let [cell] = Layout::horizontal([Constraint::Length(width.min(area.width))])
        .flex(Flex::Center)
        .areas(row);
    cell
}

/// The query being edited, with a caret drawn at char position `cursor`.
fn search_line(query: &str, cursor: usize, text: Style, hint: Style) -> Line<'static> {
    let caret = Span::styled("▌", Style::default().fg(Color::Cyan));
    if query.is_empty() {
        return Line::from(vec![caret, Span::raw(" "), Span::styled("name or acronym", hint)]);
    }
    let (before, after) = query.split_at(char_byte_offset(query, cursor));
    let before = (!before.is_empty()).then(|| Span::styled(before.to_string(), text));
    let after = (!after.is_empty()).then(|| Span::styled(after.to_string(), text));
    before
        .into_iter()
        .chain(Some(caret))
        .chain(after)
        .collect::<Vec<_>>()
        .into()
}

/// Byte offset of the `chars`-th character of `text`, or its length past the end.
pub fn char_byte_offset(text: &str, chars: usize) -> usize {
    text.char_indices()
        .map(|(idx, _)| idx)
        .chain(std::iter::once(text.len()))
        .nth(chars)
        .unwrap_or(text.len())
}
