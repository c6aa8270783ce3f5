//! Result assembly
//!
//! Chunks finish in any order. Their slugs are written into pre-sized slots
//! by original index, so the output order never depends on scheduling.

use crate::error::{EngineError, Result};

/// Slugs produced for one chunk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkOutput {
    /// Index of the chunk's first item in the batch
    pub start: usize,
    /// One slug per chunk item
    pub slugs: Vec<String>,
}

/// Collects chunk outputs into batch order
#[derive(Debug)]
pub struct ResultAssembler {
    slots: Vec<Option<String>>,
}

impl ResultAssembler {
    /// Create an assembler for a batch of `len` items
    pub fn new(len: usize) -> Self {
        Self {
            slots: vec![None; len],
        }
    }

    /// Write `slugs` into the slots starting at `start`
    pub fn place(&mut self, start: usize, slugs: Vec<String>) -> Result<()> {
        let end = start + slugs.len();
        if end > self.slots.len() {
            return Err(EngineError::Protocol(format!(
                "output for items {start}..{end} exceeds batch of {}",
                self.slots.len()
            )));
        }
        for (slot, slug) in self.slots[start..end].iter_mut().zip(slugs) {
            *slot = Some(slug);
        }
        Ok(())
    }

    /// Place a whole chunk output
    pub fn place_output(&mut self, output: ChunkOutput) -> Result<()> {
        self.place(output.start, output.slugs)
    }

    /// Number of filled slots
    pub fn filled(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// Return the slugs in batch order, failing on any gap
    pub fn finish(self) -> Result<Vec<String>> {
        self.slots
            .into_iter()
            .enumerate()
            .map(|(index, slot)| slot.ok_or(EngineError::Incomplete { index }))
            .collect()
    }
}
