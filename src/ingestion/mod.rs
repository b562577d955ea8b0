//! Loading collections and requests from files.
//!
//! The pipeline itself does no I/O; these adapters are for host programs. Most callers should
//! use [`load_collection`] (from [`unified`]), which picks a loader by file extension (or by
//! [`LoadOptions::format`]).
//!
//! Format-specific functions are also available under:
//! - [`csv`]
//! - [`json`] (also loads whole `{ data, condition }` requests)

pub mod csv;
pub mod json;
pub mod unified;

pub use unified::{LoadFormat, LoadOptions, load_collection};
