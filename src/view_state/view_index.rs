//! Per-identity viewport cache for the commit log.
//!
//! Each selected ref gets its own cursor, created on first selection and
//! kept for the rest of the session, so switching back to a branch resumes
//! where its history was left.

use crate::model::{Oid, ViewError};
use std::collections::HashMap;

/// Cursor into one commit history.
///
/// Moves do not adjust `view_start_index`; the window is corrected only by
/// [`ViewIndex::determine_view_start`] at draw time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ViewIndex {
    pub active_index: usize,
    pub view_start_index: usize,
}

impl ViewIndex {
    /// Scroll the window so `active_index` is one of `visible_rows` rows.
    pub fn determine_view_start(&mut self, visible_rows: usize) {
        if self.active_index < self.view_start_index || visible_rows == 0 {
            self.view_start_index = self.active_index;
            return;
        }

        let row_diff = self.active_index - self.view_start_index;
        if row_diff >= visible_rows {
            self.view_start_index += row_diff - visible_rows + 1;
        }
    }

    pub fn move_up(&mut self) -> bool {
        if self.active_index == 0 {
            return false;
        }
        self.active_index -= 1;
        true
    }

    pub fn move_down(&mut self, item_count: usize) -> bool {
        if self.active_index + 1 >= item_count {
            return false;
        }
        self.active_index += 1;
        true
    }

    pub fn move_to_first(&mut self) -> bool {
        if self.active_index == 0 {
            return false;
        }
        self.active_index = 0;
        true
    }

    pub fn move_to_last(&mut self, item_count: usize) -> bool {
        let last = item_count.saturating_sub(1);
        if item_count == 0 || self.active_index == last {
            return false;
        }
        self.active_index = last;
        true
    }
}

/// Outcome of selecting an identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// First time this identity was selected; its data must be loaded.
    New,
    /// Identity was cached; its previous cursor is resumed.
    Resumed,
}

/// Cursor per selected identity plus the currently active identity.
#[derive(Debug, Clone, Default)]
pub struct ViewIndexCache {
    active: Option<Oid>,
    entries: HashMap<Oid, ViewIndex>,
}

impl ViewIndexCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `oid` already has a cursor.
    pub fn contains(&self, oid: &Oid) -> bool {
        self.entries.contains_key(oid)
    }

    /// Make `oid` active, creating a fresh cursor if it has none.
    pub fn select(&mut self, oid: &Oid) -> Selection {
        self.active = Some(oid.clone());
        if self.entries.contains_key(oid) {
            Selection::Resumed
        } else {
            self.entries.insert(oid.clone(), ViewIndex::default());
            Selection::New
        }
    }

    pub fn active_oid(&self) -> Option<&Oid> {
        self.active.as_ref()
    }

    /// Cursor of the active identity.
    ///
    /// # Errors
    /// [`ViewError::MissingViewIndex`] if no identity was ever selected.
    pub fn active_entry_mut(&mut self) -> Result<(&Oid, &mut ViewIndex), ViewError> {
        let missing = || ViewError::MissingViewIndex {
            oid: self.active.clone(),
        };
        let oid = self.active.as_ref().ok_or_else(missing)?;
        let entry = self.entries.get_mut(oid).ok_or_else(missing)?;
        Ok((oid, entry))
    }

    pub fn get(&self, oid: &Oid) -> Option<&ViewIndex> {
        self.entries.get(oid)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn oid(raw: &str) -> Oid {
        Oid::new(raw).unwrap()
    }

    mod windowing {
        use super::*;

        #[test]
        fn window_follows_active_downwards() {
            let mut index = ViewIndex {
                active_index: 25,
                view_start_index: 0,
            };
            index.determine_view_start(10);
            assert_eq!(index.view_start_index, 16);
        }

        #[test]
        fn window_follows_active_upwards() {
            let mut index = ViewIndex {
                active_index: 3,
                view_start_index: 8,
            };
            index.determine_view_start(10);
            assert_eq!(index.view_start_index, 3);
        }

        #[test]
        fn moves_do_not_touch_window() {
            let mut index = ViewIndex::default();
            for _ in 0..30 {
                index.move_down(100);
            }
            assert_eq!(index.active_index, 30);
            assert_eq!(index.view_start_index, 0, "windowing is draw-time only");
        }
    }

    mod moves {
        use super::*;

        #[test]
        fn move_down_stops_at_last_item() {
            let mut index = ViewIndex {
                active_index: 4,
                view_start_index: 0,
            };
            assert!(!index.move_down(5));
            assert_eq!(index.active_index, 4);
        }

        #[test]
        fn move_up_stops_at_zero() {
            let mut index = ViewIndex::default();
            assert!(!index.move_up());
        }

        #[test]
        fn jumps_report_change() {
            let mut index = ViewIndex::default();
            assert!(index.move_to_last(10));
            assert_eq!(index.active_index, 9);
            assert!(!index.move_to_last(10));
            assert!(index.move_to_first());
            assert!(!index.move_to_first());
            assert!(!index.move_to_last(0));
        }
    }

    mod cache {
        use super::*;

        #[test]
        fn first_selection_creates_fresh_entry() {
            let mut cache = ViewIndexCache::new();
            let main = oid("1111111111");

            assert_eq!(cache.select(&main), Selection::New);
            assert_eq!(cache.active_oid(), Some(&main));
            assert_eq!(cache.get(&main), Some(&ViewIndex::default()));
        }

        #[test]
        fn reselection_resumes_cursor() {
            let mut cache = ViewIndexCache::new();
            let main = oid("1111111111");
            let dev = oid("2222222222");

            cache.select(&main);
            {
                let (_, entry) = cache.active_entry_mut().unwrap();
                entry.active_index = 7;
                entry.view_start_index = 3;
            }
            cache.select(&dev);
            assert_eq!(cache.select(&main), Selection::Resumed);

            let (active, entry) = cache.active_entry_mut().unwrap();
            assert_eq!(active, &main);
            assert_eq!(
                *entry,
                ViewIndex {
                    active_index: 7,
                    view_start_index: 3
                }
            );
            assert_eq!(cache.len(), 2);
        }

        #[test]
        fn equal_content_hits_cache() {
            let mut cache = ViewIndexCache::new();
            cache.select(&oid("ABCDEF1234"));
            assert_eq!(cache.select(&oid("abcdef1234")), Selection::Resumed);
        }

        #[test]
        fn active_entry_without_selection_is_an_error() {
            let mut cache = ViewIndexCache::new();
            assert!(cache.is_empty());
            assert!(matches!(
                cache.active_entry_mut(),
                Err(ViewError::MissingViewIndex { oid: None })
            ));
        }
    }
}
