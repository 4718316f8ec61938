//! Line-addressed text buffer.
//!
//! Provides a rope-backed buffer with zero-based line access, used by the
//! line transforms to rewrite a whole document one line at a time.

mod buffer;

pub use buffer::{LineBuffer, LineEnding};
