//! The main trie implementation.
//!
//! This module contains the `Trie` type, which records inserted strings with
//! their insertion counts and answers best-completion queries.

use std::fmt;
use std::io;

use tracing::{debug, warn};

use crate::iter::Iter;
use crate::node::{Level, Slot};
use crate::util::{content, slot_index, try_copy};
use crate::Result;

/// A 256-way prefix trie ranked by insertion frequency.
///
/// Every slot on an inserted string's path tracks the best count found in its
/// subtree, so [`Trie::autocomplete`] locates the most frequent completion in
/// time proportional to the length of the answer rather than the size of the
/// subtree.
pub struct Trie {
    /// The root level, owned directly by the handle
    root: Level,

    /// The number of distinct strings stored in the trie
    size: usize,
}

impl Trie {
    /// Creates a new, empty trie.
    ///
    /// # Examples
    ///
    /// ```
    /// use freq_trie::Trie;
    ///
    /// let trie = Trie::new();
    /// assert!(trie.is_empty());
    /// ```
    pub fn new() -> Self {
        Trie {
            root: Level::new(),
            size: 0,
        }
    }

    /// Creates a new, empty trie, reporting allocation failure instead of aborting.
    pub fn try_new() -> Result<Self> {
        match Level::try_new() {
            Ok(root) => Ok(Trie { root, size: 0 }),
            Err(err) => {
                warn!(error = %err, "trie creation failed");
                Err(err)
            }
        }
    }

    /// Returns the number of distinct strings stored in the trie.
    ///
    /// # Examples
    ///
    /// ```
    /// use freq_trie::Trie;
    ///
    /// let mut trie = Trie::new();
    /// trie.insert("hello").unwrap();
    /// trie.insert("hello").unwrap();
    /// assert_eq!(trie.len(), 1);
    /// ```
    pub fn len(&self) -> usize {
        self.size
    }

    /// Returns `true` if no string has been inserted.
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Releases every stored string and level, leaving an empty trie.
    ///
    /// This also frees empty levels left behind by a failed insert.
    pub fn clear(&mut self) {
        if !self.is_empty() {
            debug!(strings = self.size, "clearing trie");
        }
        self.root.clear();
        self.size = 0;
    }

    /// Records one more occurrence of `key`.
    ///
    /// Keys end at their first zero byte. An empty key is accepted and changes
    /// nothing. If a level or the string copy cannot be allocated, the error is
    /// returned and the trie is left as it was before the call, apart from any
    /// empty levels created on the way down.
    ///
    /// # Examples
    ///
    /// ```
    /// use freq_trie::Trie;
    ///
    /// let mut trie = Trie::new();
    /// trie.insert("cat").unwrap();
    /// trie.insert("cat").unwrap();
    /// assert_eq!(trie.count("cat"), 2);
    /// ```
    pub fn insert<K: AsRef<[u8]>>(&mut self, key: K) -> Result<()> {
        let key = content(key.as_ref());
        if key.is_empty() {
            return Ok(());
        }

        match Self::insert_recursive(&mut self.root, key, 0) {
            Ok((_, first_time)) => {
                if first_time {
                    self.size += 1;
                }
                Ok(())
            }
            Err(err) => {
                warn!(len = key.len(), error = %err, "insert failed");
                Err(err)
            }
        }
    }

    // Walks one byte per level, then repairs `best` on the way back up.
    // Returns the slot's new `best` and whether the key was stored for the first time.
    fn insert_recursive(level: &mut Level, key: &[u8], depth: usize) -> Result<(u64, bool)> {
        let slot = &mut level.slots[slot_index(key[depth])];

        if depth + 1 == key.len() {
            // The key ends here
            let first_time = slot.terminal.is_none();
            if first_time {
                slot.terminal = Some(try_copy(key, "terminal string")?.into_boxed_slice());
            }

            slot.count = slot.count.saturating_add(1);
            slot.best = slot.best.max(slot.count);

            return Ok((slot.best, first_time));
        }

        let child = match slot.child.take() {
            Some(child) => child,
            None => Level::try_new()?,
        };
        let child = slot.child.insert(child);

        let (below, first_time) = Self::insert_recursive(child, key, depth + 1)?;
        slot.best = slot.best.max(below);

        Ok((slot.best, first_time))
    }

    /// Returns the most frequently inserted string starting with `prefix`, or a
    /// copy of `prefix` when there is nothing better to offer.
    ///
    /// Ties go to the lowest byte value at the first position where the tied
    /// strings differ. When `prefix` was itself inserted at least as often as
    /// any of its extensions, the prefix is returned unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// use freq_trie::Trie;
    ///
    /// let mut trie = Trie::new();
    /// trie.insert("cat").unwrap();
    /// for _ in 0..5 {
    ///     trie.insert("catalog").unwrap();
    /// }
    ///
    /// assert_eq!(trie.autocomplete("ca").unwrap(), b"catalog".to_vec());
    /// assert_eq!(trie.autocomplete("dog").unwrap(), b"dog".to_vec());
    /// ```
    pub fn autocomplete<P: AsRef<[u8]>>(&self, prefix: P) -> Result<Vec<u8>> {
        let prefix = content(prefix.as_ref());
        let found = self.best_completion(prefix).map(|(text, _)| text);

        try_copy(found.unwrap_or(prefix), "completion").map_err(|err| {
            warn!(len = prefix.len(), error = %err, "autocomplete failed");
            err
        })
    }

    /// Borrowing form of [`Trie::autocomplete`].
    ///
    /// Returns the best completion and its count, or `None` when no stored
    /// string improves on `prefix`: either nothing starts with it, or `prefix`
    /// itself is the most frequent string in its subtree.
    pub fn best_completion<P: AsRef<[u8]>>(&self, prefix: P) -> Option<(&[u8], u64)> {
        let prefix = content(prefix.as_ref());

        let level = match Self::find_prefix_level(&self.root, prefix)? {
            PrefixEnd::Descend(level) => level,
            PrefixEnd::SelfBest => return None,
        };

        let slot = Self::best_search(level)?;
        slot.terminal().map(|text| (text, slot.count))
    }

    // Prefix-consumption phase: follows `prefix` one level per byte without
    // creating anything. `None` means the prefix leaves the trie.
    fn find_prefix_level<'a>(root: &'a Level, prefix: &[u8]) -> Option<PrefixEnd<'a>> {
        let mut level = root;

        for (i, &byte) in prefix.iter().enumerate() {
            let slot = &level.slots[slot_index(byte)];

            if i + 1 == prefix.len() && slot.is_own_best() {
                return Some(PrefixEnd::SelfBest);
            }

            level = slot.child.as_ref()?;
        }

        Some(PrefixEnd::Descend(level))
    }

    // Best-search phase: take the first slot holding the level's highest `best`;
    // stop if that count is its own, otherwise follow it down.
    fn best_search(mut level: &Level) -> Option<&Slot> {
        loop {
            let mut winner = &level.slots[0];
            for slot in level.slots[1..].iter() {
                if slot.best > winner.best {
                    winner = slot;
                }
            }

            if winner.count == winner.best {
                return Some(winner);
            }

            level = winner.child.as_ref()?;
        }
    }

    /// Returns how many times exactly `key` has been inserted.
    pub fn count<K: AsRef<[u8]>>(&self, key: K) -> u64 {
        self.find_slot(content(key.as_ref()))
            .map_or(0, |slot| slot.count)
    }

    /// Returns `true` if `key` has been inserted at least once.
    pub fn contains<K: AsRef<[u8]>>(&self, key: K) -> bool {
        self.count(key) > 0
    }

    fn find_slot(&self, key: &[u8]) -> Option<&Slot> {
        let (&last, path) = key.split_last()?;

        let mut level = &self.root;
        for &byte in path {
            level = level.slots[slot_index(byte)].child.as_ref()?;
        }

        Some(&level.slots[slot_index(last)])
    }

    /// Iterates over stored strings and their counts in ascending byte order.
    ///
    /// A string is visited before any of its extensions.
    pub fn iter(&self) -> Iter<'_> {
        Iter::new(&self.root)
    }

    /// Writes every stored string to `out`, one per line, in [`Trie::iter`] order.
    ///
    /// # Examples
    ///
    /// ```
    /// use freq_trie::Trie;
    ///
    /// let mut trie = Trie::new();
    /// trie.insert("b").unwrap();
    /// trie.insert("a").unwrap();
    /// trie.insert("ab").unwrap();
    ///
    /// let mut out = Vec::new();
    /// trie.dump(&mut out).unwrap();
    /// assert_eq!(out, b"a\nab\nb\n".to_vec());
    /// ```
    pub fn dump<W: io::Write>(&self, out: &mut W) -> io::Result<()> {
        for (text, _) in self.iter() {
            out.write_all(text)?;
            out.write_all(b"\n")?;
        }
        Ok(())
    }
}

/// Where the prefix-consumption phase stopped.
enum PrefixEnd<'a> {
    /// The whole prefix was consumed; search continues in this level.
    Descend(&'a Level),
    /// The prefix's last byte ends a string no extension beats.
    SelfBest,
}

impl Default for Trie {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Trie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Trie").field("size", &self.size).finish()
    }
}

impl<'a> IntoIterator for &'a Trie {
    type Item = (&'a [u8], u64);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
