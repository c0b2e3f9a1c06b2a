/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! A strict FIFO queue of processes that still supports removal from the middle.
//!
//! Every insertion is assigned a turn from a counter that monotonically increases across the
//! lifetime of the queue. The queue itself is a map ordered by turn, so the first entry is
//! always the oldest arrival. A reverse index from process to turn makes membership tests and
//! removal of an arbitrary process (e.g. one that exited while waiting) logarithmic, without
//! disturbing the relative order of everything else.

use std::collections::BTreeMap;
use std::collections::HashMap;
use std::fmt;

use detsched_model::TracedPid;

/// Position of an insertion. Lowest runs first.
type Turn = u64;

#[derive(Debug, Clone, Default)]
pub struct PidQueue {
    queue: BTreeMap<Turn, TracedPid>,
    /// Always holds exactly the processes in `queue`.
    turns: HashMap<TracedPid, Turn>,
    last_turn: Turn,
}

/// A single-line print of the queue, head first.
impl fmt::Display for PidQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, pid) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", pid)?;
        }
        write!(f, "]")
    }
}

impl PidQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `pid` at the tail. The process must not already be queued.
    pub fn push_back(&mut self, pid: TracedPid) {
        self.last_turn += 1;
        let turn = self.last_turn;
        if let Some(old) = self.turns.insert(pid, turn) {
            panic!(
                "Invariant violation! Tried to add {} to queue at turn {}, but it's already present at turn {}: {}",
                pid, turn, old, self
            );
        }
        let old = self.queue.insert(turn, pid);
        assert!(old.is_none()); // last_turn is monotonic
    }

    /// The process at the head of the queue.
    pub fn front(&self) -> Option<TracedPid> {
        self.queue.first_key_value().map(|(_, pid)| *pid)
    }

    /// Pop the head, but only if it is `expected`. Otherwise the queue is left untouched and
    /// the actual head is returned as the error.
    pub fn pop_front_if(&mut self, expected: TracedPid) -> Result<(), Option<TracedPid>> {
        match self.queue.first_entry() {
            Some(entry) if *entry.get() == expected => {
                entry.remove();
                self.turns.remove(&expected);
                Ok(())
            }
            Some(entry) => Err(Some(*entry.get())),
            None => Err(None),
        }
    }

    /// Send the head to the tail, provided the head is `expected`.
    pub fn rotate_front(&mut self, expected: TracedPid) -> Result<(), Option<TracedPid>> {
        self.pop_front_if(expected)?;
        self.push_back(expected);
        Ok(())
    }

    pub fn contains(&self, pid: TracedPid) -> bool {
        self.turns.contains_key(&pid)
    }

    /// Remove `pid` from wherever it sits, returning true if removal occurred. The order of
    /// the remaining processes is unchanged.
    pub fn remove(&mut self, pid: TracedPid) -> bool {
        match self.turns.remove(&pid) {
            Some(turn) => {
                let removed = self.queue.remove(&turn);
                debug_assert_eq!(removed, Some(pid));
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Iterate from head to tail.
    pub fn iter(&self) -> impl Iterator<Item = TracedPid> + '_ {
        self.queue.values().copied()
    }
}
