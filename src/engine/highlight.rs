//! Splitting display text around the first occurrence of the search query.

use crate::engine::filter::fold_case;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    Plain,
    Matched,
}

/// A slice of the displayed text and whether it is the matched span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment<'a> {
    pub text: &'a str,
    pub kind: SegmentKind,
}

impl<'a> Segment<'a> {
    pub fn plain(text: &'a str) -> Self {
        Self {
            text,
            kind: SegmentKind::Plain,
        }
    }

    pub fn matched(text: &'a str) -> Self {
        Self {
            text,
            kind: SegmentKind::Matched,
        }
    }

    pub fn is_matched(&self) -> bool {
        self.kind == SegmentKind::Matched
    }
}

/// Classify `text` into plain and matched segments for `query`.
///
/// Only the leftmost case-insensitive occurrence is marked. The matched segment
/// keeps the original casing of `text`. Empty prefix and suffix segments are
/// omitted.
pub fn highlight<'a>(text: &'a str, query: &str) -> Vec<Segment<'a>> {
    match find_match(text, query) {
        None => vec![Segment::plain(text)],
        Some((start, end)) => {
            let mut segments = Vec::with_capacity(3);
            if start > 0 {
                segments.push(Segment::plain(&text[..start]));
            }
            segments.push(Segment::matched(&text[start..end]));
            if end < text.len() {
                segments.push(Segment::plain(&text[end..]));
            }
            segments
        }
    }
}

/// Byte range in `text` of the first case-insensitive occurrence of `query`.
pub fn find_match(text: &str, query: &str) -> Option<(usize, usize)> {
    if query.trim().is_empty() || text.is_empty() {
        return None;
    }
    let needle = fold_case(query);

    // Each folded byte remembers the source character it was produced from.
    let mut folded = String::with_capacity(text.len());
    let mut origins: Vec<(usize, usize)> = Vec::with_capacity(text.len());
    for (start, ch) in text.char_indices() {
        let end = start + ch.len_utf8();
        for lower in ch.to_lowercase() {
            folded.push(lower);
            origins.extend(std::iter::repeat_n((start, end), lower.len_utf8()));
        }
    }

    let at = folded.find(&needle)?;
    let first = origins[at];
    let last = origins[at + needle.len() - 1];
    Some((first.0, last.1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_around_match() {
        assert_eq!(
            highlight("Hippocampus", "cam"),
            vec![
                Segment::plain("Hippo"),
                Segment::matched("cam"),
                Segment::plain("pus"),
            ]
        );
    }

    #[test]
    fn whole_text_match_keeps_original_casing() {
        assert_eq!(highlight("CA1", "ca1"), vec![Segment::matched("CA1")]);
    }

    #[test]
    fn no_match_is_single_plain_segment() {
        assert_eq!(highlight("Thalamus", "xyz"), vec![Segment::plain("Thalamus")]);
    }

    #[test]
    fn blank_query_or_text_is_plain() {
        assert_eq!(highlight("Thalamus", ""), vec![Segment::plain("Thalamus")]);
        assert_eq!(highlight("Thalamus", "  "), vec![Segment::plain("Thalamus")]);
        assert_eq!(highlight("", "th"), vec![Segment::plain("")]);
    }

    #[test]
    fn only_first_occurrence_is_marked() {
        let segments = highlight("Area area AREA", "area");
        assert_eq!(
            segments,
            vec![Segment::matched("Area"), Segment::plain(" area AREA")]
        );
        assert_eq!(segments.iter().filter(|s| s.is_matched()).count(), 1);
    }

    #[test]
    fn match_at_end_has_no_suffix() {
        assert_eq!(
            highlight("Field CA3", "ca3"),
            vec![Segment::plain("Field "), Segment::matched("CA3")]
        );
    }

    #[test]
    fn multibyte_text_maps_back_to_char_boundaries() {
        assert_eq!(
            highlight("Ammon's HÖRN", "hörn"),
            vec![Segment::plain("Ammon's "), Segment::matched("HÖRN")]
        );
        assert_eq!(find_match("ÅÄÖ", "ä"), Some((2, 4)));
    }

    #[test]
    fn segments_reassemble_the_input() {
        for (text, query) in [("Primary visual area", "VIS"), ("cc", "c"), ("M1", "1")] {
            let joined: String = highlight(text, query).iter().map(|s| s.text).collect();
            assert_eq!(joined, text);
        }
    }
}
