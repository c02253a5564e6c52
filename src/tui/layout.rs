//! Responsive column layout: how many atlas columns fit the terminal width.

use crate::config::{MIN_ATLAS_WIDTH, MIN_NAME_WIDTH};

/// Below this width only the region name is shown.
pub const NARROW_BREAKPOINT: u16 = 48;
/// Gap between table columns.
pub const COLUMN_SPACING: u16 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnLayout {
    pub name_width: u16,
    pub atlas_width: u16,
    /// First atlas column shown.
    pub atlas_start: usize,
    /// Number of atlas columns shown.
    pub atlas_count: usize,
    pub total_atlases: usize,
}

impl ColumnLayout {
    /// Atlas indices visible with this layout.
    pub fn visible_atlases(&self) -> std::ops::Range<usize> {
        self.atlas_start..self.atlas_start + self.atlas_count
    }

    pub fn is_paged(&self) -> bool {
        self.atlas_count < self.total_atlases
    }

    /// Largest valid `atlas_start` at this width.
    pub fn max_offset(&self) -> usize {
        self.total_atlases.saturating_sub(self.atlas_count)
    }
}

/// Fit the name column and as many atlas columns as possible into `width`.
///
/// The name column gives up space down to its minimum so that at least one
/// atlas column is visible on medium widths. `offset` selects the first atlas
/// column and is clamped so the last page is full.
pub fn compute(
    width: u16,
    total_atlases: usize,
    offset: usize,
    preferred_name: u16,
    preferred_atlas: u16,
) -> ColumnLayout {
    let atlas_width = preferred_atlas.max(MIN_ATLAS_WIDTH);
    let slot = atlas_width.saturating_add(COLUMN_SPACING).max(1);

    if width < NARROW_BREAKPOINT || total_atlases == 0 {
        return ColumnLayout {
            name_width: width,
            atlas_width,
            atlas_start: 0,
            atlas_count: 0,
            total_atlases,
        };
    }

    let mut name_width = preferred_name.max(MIN_NAME_WIDTH).min(width);
    let mut fits = ((width - name_width) / slot) as usize;
    if fits == 0 && MIN_NAME_WIDTH.checked_add(slot).is_some_and(|need| width >= need) {
        name_width = width - slot;
        fits = 1;
    }
    let atlas_count = fits.min(total_atlases);
    let atlas_start = offset.min(total_atlases - atlas_count);

    // Leftover space goes to the name column.
    let used = name_width.saturating_add((atlas_count as u16).saturating_mul(slot));
    name_width += width.saturating_sub(used);

    ColumnLayout {
        name_width,
        atlas_width,
        atlas_start,
        atlas_count,
        total_atlases,
    }
}
