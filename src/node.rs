//! Storage model for the frequency trie.
//!
//! A `Level` is a fixed array of 256 `Slot`s, one per byte value at that depth.
//! Each slot exclusively owns its optional child level and its optional copy of
//! the string that ends there. Ownership is a strict tree: no back references,
//! no sharing.

use crate::util::reserve;
use crate::Error;

/// Number of slots in every level, one per byte value.
pub(crate) const FANOUT: usize = 256;

/// One byte-indexed entry within a level.
#[derive(Debug, Default)]
pub(crate) struct Slot {
    /// Copy of the full string that ends at this slot, present iff `count > 0`
    pub terminal: Option<Box<[u8]>>,

    /// Number of times the string ending here has been inserted
    pub count: u64,

    /// Largest `count` among this slot and every slot below it
    pub best: u64,

    /// Level holding the next byte of longer strings sharing this prefix
    pub child: Option<Level>,
}

impl Slot {
    /// Returns the stored string if this slot terminates one.
    pub fn terminal(&self) -> Option<&[u8]> {
        self.terminal.as_deref()
    }

    /// Whether the string ending here is the most frequent one in its own subtree.
    pub fn is_own_best(&self) -> bool {
        self.terminal.is_some() && self.count == self.best
    }
}

/// A fixed-size collection of 256 slots.
#[derive(Debug)]
pub(crate) struct Level {
    pub slots: Box<[Slot]>,
}

impl Level {
    /// Creates an empty level using ordinary (aborting) allocation.
    pub fn new() -> Self {
        Level {
            slots: (0..FANOUT).map(|_| Slot::default()).collect(),
        }
    }

    /// Creates an empty level, reporting allocation failure to the caller.
    pub fn try_new() -> Result<Self, Error> {
        let mut slots = Vec::new();
        reserve(&mut slots, FANOUT, "trie level")?;
        slots.resize_with(FANOUT, Slot::default);

        Ok(Level {
            slots: slots.into_boxed_slice(),
        })
    }

    /// Resets every slot to empty, releasing everything below this level.
    pub fn clear(&mut self) {
        for slot in self.slots.iter_mut() {
            *slot = Slot::default();
        }
    }

    /// Number of slots in this level that terminate a string or lead further down.
    #[cfg(test)]
    pub fn occupied(&self) -> usize {
        self.slots
            .iter()
            .filter(|slot| slot.terminal.is_some() || slot.child.is_some())
            .count()
    }
}

// Tear down iteratively. A string of length n owns a chain of n - 1 levels, and
// the derived recursive drop would need stack proportional to n.
impl Drop for Level {
    fn drop(&mut self) {
        let mut pending: Vec<Level> = self
            .slots
            .iter_mut()
            .filter_map(|slot| slot.child.take())
            .collect();

        while let Some(mut level) = pending.pop() {
            pending.extend(level.slots.iter_mut().filter_map(|slot| slot.child.take()));
        }
    }
}
