use super::{LedgerError, LedgerStore};
use alloy_primitives::{Log, B256, U256};
use std::collections::HashMap;

/// A mutation buffered by a [`Checkpoint`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JournalEntry {
    /// Slot write.
    Store {
        /// Slot written.
        key: B256,
        /// New value.
        value: U256,
    },
    /// Emitted event.
    Log(Log),
}

/// Write buffer over a parent [`LedgerStore`].
///
/// Reads see the buffered writes first. Entries are kept in the order they
/// happened so [`Checkpoint::commit`] can replay events and writes into the
/// parent exactly as the handler produced them. A checkpoint is itself a
/// [`LedgerStore`], which lets checkpoints nest: an inner commit lands in the
/// outer buffer and only the outermost commit reaches real storage.
#[derive(Debug)]
pub struct Checkpoint<'p, S: ?Sized> {
    parent: &'p mut S,
    dirty: HashMap<B256, U256>,
    journal: Vec<JournalEntry>,
}

impl<'p, S: LedgerStore + ?Sized> Checkpoint<'p, S> {
    /// Opens a checkpoint over `parent`.
    pub fn new(parent: &'p mut S) -> Self {
        Self {
            parent,
            dirty: HashMap::new(),
            journal: Vec::new(),
        }
    }

    /// Buffered entries in the order they were recorded.
    pub fn journal(&self) -> &[JournalEntry] {
        &self.journal
    }

    /// Replays every buffered entry into the parent and returns how many were
    /// applied.
    pub fn commit(self) -> Result<usize, LedgerError> {
        let Self {
            parent, journal, ..
        } = self;
        let applied = journal.len();
        for entry in journal {
            match entry {
                JournalEntry::Store { key, value } => parent.store(key, value)?,
                JournalEntry::Log(log) => parent.emit(log),
            }
        }
        Ok(applied)
    }
}

impl<S: LedgerStore + ?Sized> LedgerStore for Checkpoint<'_, S> {
    fn load(&mut self, key: B256) -> Result<U256, LedgerError> {
        match self.dirty.get(&key) {
            Some(value) => Ok(*value),
            None => self.parent.load(key),
        }
    }

    fn store(&mut self, key: B256, value: U256) -> Result<(), LedgerError> {
        self.dirty.insert(key, value);
        self.journal.push(JournalEntry::Store { key, value });
        Ok(())
    }

    fn emit(&mut self, log: Log) {
        self.journal.push(JournalEntry::Log(log));
    }

    fn block_time(&self) -> u64 {
        self.parent.block_time()
    }
}
