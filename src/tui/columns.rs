//! Column descriptors and cell rendering for the region table.

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::engine::highlight::{Segment, highlight};
use crate::region::model::{AtlasCatalog, RegionNode};

pub const NAME_TITLE: &str = "Region";
pub const MISSING_VALUE: &str = "-";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Name,
    /// Index into the atlas catalog.
    Atlas(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub title: String,
    pub kind: ColumnKind,
}

/// The fixed name column followed by one column per atlas, in catalog order.
pub fn columns(catalog: &AtlasCatalog) -> Vec<Column> {
    let mut columns = vec![Column {
        title: NAME_TITLE.to_string(),
        kind: ColumnKind::Name,
    }];
    columns.extend(catalog.names.iter().enumerate().map(|(idx, name)| Column {
        title: name.clone(),
        kind: ColumnKind::Atlas(idx),
    }));
    columns
}

pub fn match_style() -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(Color::Yellow)
        .add_modifier(Modifier::BOLD)
}

fn segment_spans(segments: Vec<Segment<'_>>, base: Style) -> Vec<Span<'static>> {
    segments
        .into_iter()
        .map(|seg| {
            let style = if seg.is_matched() { match_style() } else { base };
            Span::styled(seg.text.to_string(), style)
        })
        .collect()
}

impl Column {
    /// Render `node`'s cell for this column. `prefix` is the tree prefix shown
    /// before the name.
    pub fn cell(&self, node: &RegionNode, query: &str, prefix: &str) -> Line<'static> {
        match self.kind {
            ColumnKind::Name => {
                let mut spans = vec![Span::styled(
                    prefix.to_string(),
                    Style::default().fg(Color::DarkGray),
                )];
                spans.extend(segment_spans(
                    highlight(&node.name, query),
                    Style::default().fg(Color::White),
                ));
                Line::from(spans)
            }
            ColumnKind::Atlas(idx) => match node.atlas_value(idx) {
                Some(value) => Line::from(segment_spans(
                    highlight(value, query),
                    Style::default().fg(Color::Gray),
                )),
                None => Line::from(Span::styled(
                    MISSING_VALUE,
                    Style::default().fg(Color::DarkGray),
                )),
            },
        }
    }
}
