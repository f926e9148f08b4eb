//! refscope
//!
//! Terminal browser for the branches, tags and commit history of a git
//! repository.
//!
//! Follows a Pure Core / Impure Shell split: `view_state` holds row
//! generation and cursor arithmetic with no locking or I/O; `view` owns the
//! locks, rendering and the terminal loop; `repo` is the seam to the
//! repository data.

pub mod config;
pub mod logging;
pub mod model;
pub mod repo;
pub mod view;
pub mod view_state;
