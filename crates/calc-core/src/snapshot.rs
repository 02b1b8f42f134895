//! Undo/redo through full history snapshots.
//!
//! The manager keeps two stacks of immutable [`Snapshot`]s. The engine calls
//! [`SnapshotManager::capture_before_change`] before every undoable mutation;
//! [`SnapshotManager::undo`] and [`SnapshotManager::redo`] swap the live log
//! with the top of the respective stack.
//!
//! ```text
//! capture:  undo.push(current)           redo.clear()
//! undo:     redo.push(current)           current = undo.pop()
//! redo:     undo.push(current)           current = redo.pop()
//! ```
//!
//! The undo stack is bounded; when it overflows the oldest snapshot is
//! dropped, so states older than the bound can no longer be reached.

use std::collections::VecDeque;

use tracing::debug;

use crate::history::HistoryLog;
use crate::record::CalculationRecord;

/// Immutable copy of the history at one point in time.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    sequence: u64,
    records: Vec<CalculationRecord>,
}

impl Snapshot {
    /// Monotonically increasing capture index.
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn records(&self) -> &[CalculationRecord] {
        &self.records
    }
}

/// Undo and redo stacks over [`HistoryLog`] states.
#[derive(Debug, Clone)]
pub struct SnapshotManager {
    undo_stack: VecDeque<Snapshot>,
    redo_stack: Vec<Snapshot>,
    capacity: usize,
    next_sequence: u64,
}

impl SnapshotManager {
    /// Creates empty stacks; the undo stack holds at most `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            capacity: capacity.max(1),
            next_sequence: 0,
        }
    }

    /// Records the pre-mutation state of `log` and discards the redo branch.
    pub fn capture_before_change(&mut self, log: &HistoryLog) {
        let snapshot = self.snapshot_of(log);
        self.push_undo(snapshot);
        if !self.redo_stack.is_empty() {
            debug!(discarded = self.redo_stack.len(), "redo branch discarded");
            self.redo_stack.clear();
        }
    }

    /// Restores the previous state. Returns false when there is nothing to undo.
    pub fn undo(&mut self, log: &mut HistoryLog) -> bool {
        let Some(previous) = self.undo_stack.pop_back() else {
            return false;
        };
        let current = self.snapshot_of(log);
        self.redo_stack.push(current);
        debug!(
            sequence = previous.sequence,
            undo_depth = self.undo_stack.len(),
            redo_depth = self.redo_stack.len(),
            "restored snapshot for undo"
        );
        log.restore(previous.records);
        true
    }

    /// Re-applies the last undone state. Returns false when there is nothing to redo.
    pub fn redo(&mut self, log: &mut HistoryLog) -> bool {
        let Some(next) = self.redo_stack.pop() else {
            return false;
        };
        let current = self.snapshot_of(log);
        self.push_undo(current);
        debug!(
            sequence = next.sequence,
            undo_depth = self.undo_stack.len(),
            redo_depth = self.redo_stack.len(),
            "restored snapshot for redo"
        );
        log.restore(next.records);
        true
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Changes the undo bound. Excess snapshots are dropped on the next push.
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity.max(1);
    }

    /// The most recent undo snapshot, if any.
    pub fn peek_undo(&self) -> Option<&Snapshot> {
        self.undo_stack.back()
    }

    fn snapshot_of(&mut self, log: &HistoryLog) -> Snapshot {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        Snapshot {
            sequence,
            records: log.records(),
        }
    }

    fn push_undo(&mut self, snapshot: Snapshot) {
        self.undo_stack.push_back(snapshot);
        while self.undo_stack.len() > self.capacity {
            self.undo_stack.pop_front();
        }
    }
}
