//! Viewport cursor for the ref list.
//!
//! Tracks the active row and the scroll window. Moves never leave the
//! active row on a spacer or loading placeholder; the vertical window is
//! recomputed at render time from wherever the cursor ended up.

use super::rows::Row;

/// Active row and scroll offsets.
///
/// # Invariants
/// - `active_row_index` indexes a selectable row (header or leaf)
/// - after [`ViewPos::determine_view_start_row`], the active row lies inside
///   `view_start_row_index .. view_start_row_index + visible_rows`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ViewPos {
    pub active_row_index: usize,
    pub view_start_row_index: usize,
    pub view_start_column: usize,
}

impl ViewPos {
    pub fn new() -> Self {
        Self::default()
    }

    /// Step up to the nearest selectable row.
    ///
    /// Returns `true` if the cursor moved. If no selectable row exists above,
    /// the cursor stays where it was.
    pub fn move_up(&mut self, rows: &[Row]) -> bool {
        let start = self.active_row_index.min(rows.len().saturating_sub(1));
        if start == 0 {
            return false;
        }

        let mut index = start - 1;
        while index > 0 && !rows[index].is_selectable() {
            index -= 1;
        }

        self.commit_if_selectable(rows, index)
    }

    /// Step down to the nearest selectable row.
    ///
    /// Returns `true` if the cursor moved. If no selectable row exists below,
    /// the cursor stays where it was.
    pub fn move_down(&mut self, rows: &[Row]) -> bool {
        let Some(last) = rows.len().checked_sub(1) else {
            return false;
        };
        if self.active_row_index >= last {
            return false;
        }

        let mut index = self.active_row_index + 1;
        while index < last && !rows[index].is_selectable() {
            index += 1;
        }

        self.commit_if_selectable(rows, index)
    }

    fn commit_if_selectable(&mut self, rows: &[Row], index: usize) -> bool {
        if rows[index].is_selectable() {
            self.active_row_index = index;
            true
        } else {
            false
        }
    }

    /// Returns `true` if the cursor moved.
    pub fn move_to_first_line(&mut self) -> bool {
        if self.active_row_index == 0 {
            return false;
        }
        self.active_row_index = 0;
        true
    }

    /// Jump to the last row the cursor may rest on.
    ///
    /// Returns `true` if the cursor moved.
    pub fn move_to_last_line(&mut self, rows: &[Row]) -> bool {
        match rows.iter().rposition(Row::is_selectable) {
            Some(last) if last != self.active_row_index => {
                self.active_row_index = last;
                true
            }
            _ => false,
        }
    }

    /// Shift the horizontal window one page right.
    pub fn move_page_right(&mut self, page_width: usize) -> bool {
        if page_width == 0 {
            return false;
        }
        self.view_start_column = self.view_start_column.saturating_add(page_width);
        true
    }

    /// Shift the horizontal window one page left, stopping at column 0.
    pub fn move_page_left(&mut self, page_width: usize) -> bool {
        if self.view_start_column == 0 || page_width == 0 {
            return false;
        }
        self.view_start_column = self.view_start_column.saturating_sub(page_width);
        true
    }

    /// Scroll the vertical window so the active row is visible.
    pub fn determine_view_start_row(&mut self, visible_rows: usize) {
        if self.active_row_index < self.view_start_row_index || visible_rows == 0 {
            self.view_start_row_index = self.active_row_index;
        } else if self.active_row_index - self.view_start_row_index >= visible_rows {
            self.view_start_row_index = self.active_row_index + 1 - visible_rows;
        }
    }

    /// Pull the cursor back onto a selectable row after the row list changed
    /// underneath it. Searches upwards first, then downwards.
    pub fn clamp_to_selectable(&mut self, rows: &[Row]) {
        if rows.is_empty() {
            self.active_row_index = 0;
            return;
        }

        let index = self.active_row_index.min(rows.len() - 1);
        self.active_row_index = rows[..=index]
            .iter()
            .rposition(Row::is_selectable)
            .or_else(|| {
                rows[index..]
                    .iter()
                    .position(Row::is_selectable)
                    .map(|offset| index + offset)
            })
            .unwrap_or(0);
    }
}

#[cfg(test)]
#[path = "cursor_tests.rs"]
mod tests;
