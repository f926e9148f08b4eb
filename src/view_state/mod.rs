//! View-state layer - rows, cursors and viewport caches (pure).
//!
//! # Module Structure
//!
//! - `rows`: RefGroup, Row, generate_rows - flattening groups into rows
//! - `cursor`: ViewPos - ref list cursor and scroll window
//! - `view_index`: ViewIndex, ViewIndexCache - per-identity commit cursors

pub mod cursor;
pub mod rows;
pub mod view_index;

pub use cursor::ViewPos;
pub use rows::{
    branch_row_count, default_groups, generate_rows, head_row_index, GroupKind, RefGroup, Row,
    RowKind, RowSource, LOADING_TEXT,
};
pub use view_index::{Selection, ViewIndex, ViewIndexCache};
