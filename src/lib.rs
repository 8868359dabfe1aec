//! # Frequency Trie
//!
//! A prefix trie that counts how often each string is inserted and answers
//! "best completion" queries: given a prefix, return the most frequently
//! inserted string that starts with it.
//!
//! ## Features
//!
//! - **Byte keys**: Any `AsRef<[u8]>` key; each level is a 256-way array indexed by byte value
//! - **Fast completion**: Every slot tracks the best count in its subtree, so lookups
//!   follow a single path instead of scanning the subtree
//! - **Deterministic ties**: Equal counts resolve to the lowest byte value
//! - **Fallible allocation**: Out-of-memory is reported as [`Error`] rather than aborting
//!
//! ## Example
//!
//! ```rust
//! use freq_trie::Trie;
//!
//! let mut trie = Trie::new();
//!
//! trie.insert("cat")?;
//! for _ in 0..5 {
//!     trie.insert("catalog")?;
//! }
//!
//! // The most frequent completion wins
//! assert_eq!(trie.autocomplete("cat")?, b"catalog".to_vec());
//!
//! // Unknown prefixes come back unchanged
//! assert_eq!(trie.autocomplete("dog")?, b"dog".to_vec());
//! # Ok::<(), freq_trie::Error>(())
//! ```

use std::collections::TryReserveError;

use thiserror::Error;

mod iter;
mod node;
mod trie;
mod util;

// Re-export public types
pub use crate::iter::Iter;
pub use crate::trie::Trie;

/// Result type alias using the crate's [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in trie operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A level or string copy could not be allocated
    #[error("failed to allocate {what}: {source}")]
    Allocation {
        /// What was being allocated
        what: &'static str,
        /// The allocator's report
        #[source]
        source: TryReserveError,
    },
}
