// model = "claude-opus-4-5"
// created = "2026-10-18"
// modified = "2026-10-18"
// driver = "Isaac Clayton"

//! Seqtree - an indexed sequence backed by a B-tree.
//!
//! `BTreeVec<T>` behaves like a `Vec<T>` restricted to positional
//! operations, but inserting or removing in the middle costs O(log n)
//! instead of O(n). Nearby accesses reuse the previous descent, so
//! sequential scans and local edit bursts are amortized O(1).
//!
//! # Quick Start
//!
//! ```
//! use seqtree::{BTreeVec, Config};
//!
//! // Small nodes make the tree grow quickly
//! let mut list = BTreeVec::with_config(Config::new(4, 4)).unwrap();
//! for i in 0..8 {
//!     list.push(i);
//! }
//! assert_eq!(list.height(), 2);
//!
//! list.insert(4, 100);
//! assert_eq!(list[4], 100);
//! assert_eq!(list.remove(0), 0);
//! assert_eq!(list.len(), 8);
//! ```

mod block;
pub mod config;
pub mod error;
mod node;
mod path;
mod tree;

#[cfg(test)]
mod proptests;

pub use config::Config;
pub use error::{Error, Result};
pub use tree::BTreeVec;
