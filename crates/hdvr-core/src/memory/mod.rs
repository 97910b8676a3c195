//! Memory hierarchy
//!
//! [`MemoryStore`] is the ordered container; the continuous item memory,
//! channel memory and associative memory wrap it and add their generators
//! or lookup.

mod associative;
mod channel;
mod continuous;
mod store;

pub use associative::AssociativeMemory;
pub use channel::ChannelMemory;
pub use continuous::ContinuousItemMemory;
pub use store::MemoryStore;

pub(crate) use store::{content_lines, read_file, write_lines};
