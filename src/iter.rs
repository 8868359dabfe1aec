//! Ordered traversal of a trie.
//!
//! This module provides the `Iter` type, which walks the stored strings in
//! ascending byte order without recursion.

use crate::node::{Level, Slot};

/// An iterator over the strings stored in a [`Trie`](crate::Trie) and their counts.
///
/// This iterator performs a depth-first traversal of the levels. Within a level
/// slots are visited by ascending byte value, and a slot's own string is
/// yielded before anything in its child level, so the output is in byte-wise
/// lexicographic order.
pub struct Iter<'a> {
    /// Levels being walked, each with the position of the next slot to visit
    stack: Vec<(&'a [Slot], usize)>,
}

impl<'a> Iter<'a> {
    pub(crate) fn new(root: &'a Level) -> Self {
        Iter {
            stack: vec![(&root.slots[..], 0)],
        }
    }
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a [u8], u64);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (slots, index) = match self.stack.last_mut() {
                Some(top) => {
                    let current = (top.0, top.1);
                    top.1 += 1;
                    current
                }
                None => return None,
            };

            let slot = match slots.get(index) {
                Some(slot) => slot,
                None => {
                    // Level exhausted, backtrack
                    self.stack.pop();
                    continue;
                }
            };

            // Descend before yielding so the child is walked right after this slot
            if let Some(child) = &slot.child {
                self.stack.push((&child.slots[..], 0));
            }

            if let Some(text) = slot.terminal() {
                return Some((text, slot.count));
            }
        }
    }
}
