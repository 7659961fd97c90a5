//! Open blocks: the persistent base list and the modal popup stack.
//!
//! Blocks live in a slotmap arena and are referred to by [`BlockId`]. Base
//! blocks are dispatched side by side; popups form a stack whose top is
//! serviced exclusively. Closing N levels is a truncation of that stack.

use slotmap::{new_key_type, SlotMap};

use crate::block::Block;
use crate::error::UiError;

new_key_type! {
    /// Identifier of a block in the arena.
    pub struct BlockId;
}

/// One level of the modal stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModalEntry {
    pub block: BlockId,
    /// The block and widget index that opened this popup.
    pub opener: Option<(BlockId, usize)>,
}

/// A popup removed from the stack.
#[derive(Debug)]
pub struct Popped {
    pub block: Block,
    pub opener: Option<(BlockId, usize)>,
}

/// Arena of every open block.
#[derive(Debug, Default)]
pub struct BlockStack {
    blocks: SlotMap<BlockId, Block>,
    base: Vec<BlockId>,
    modal: Vec<ModalEntry>,
}

impl BlockStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a persistent block. Base blocks are dispatched in insertion order.
    pub fn add_base(&mut self, block: Block) -> BlockId {
        let id = self.blocks.insert(block);
        self.base.push(id);
        id
    }

    /// Push a popup on top of the modal stack.
    pub fn push_popup(&mut self, block: Block, opener: Option<(BlockId, usize)>) -> BlockId {
        tracing::debug!(popup = %block.name, depth = self.modal.len() + 1, "popup pushed");
        let id = self.blocks.insert(block);
        self.modal.push(ModalEntry { block: id, opener });
        id
    }

    pub fn get(&self, id: BlockId) -> Option<&Block> {
        self.blocks.get(id)
    }

    pub fn get_mut(&mut self, id: BlockId) -> Option<&mut Block> {
        self.blocks.get_mut(id)
    }

    pub fn base(&self) -> &[BlockId] {
        &self.base
    }

    /// Popups, bottom first.
    pub fn modal(&self) -> &[ModalEntry] {
        &self.modal
    }

    /// Number of open popups.
    pub fn depth(&self) -> usize {
        self.modal.len()
    }

    pub fn top(&self) -> Option<ModalEntry> {
        self.modal.last().copied()
    }

    /// Remove the top popup from the arena.
    pub fn pop(&mut self) -> Result<Option<Popped>, UiError> {
        let Some(entry) = self.modal.last().copied() else {
            return Ok(None);
        };
        let block = self.free(entry.block)?;
        tracing::debug!(popup = %block.name, depth = self.modal.len(), "popup closed");
        Ok(Some(Popped { block, opener: entry.opener }))
    }

    /// Remove every popup, top first.
    pub fn cancel_all(&mut self) -> Result<Vec<Popped>, UiError> {
        let mut popped = Vec::with_capacity(self.modal.len());
        while let Some(p) = self.pop()? {
            popped.push(p);
        }
        Ok(popped)
    }

    /// Remove a block from the arena and from whichever list holds it.
    /// A block that is mid-dispatch cannot be freed.
    pub fn free(&mut self, id: BlockId) -> Result<Block, UiError> {
        let block = self.blocks.get(id).ok_or(UiError::UnknownBlock)?;
        if block.is_busy() {
            return Err(UiError::BlockBusy);
        }
        self.base.retain(|b| *b != id);
        self.modal.retain(|e| e.block != id);
        self.blocks.remove(id).ok_or(UiError::UnknownBlock)
    }

    /// Swap in a rebuilt block under the same id, returning the old one.
    pub fn replace(&mut self, id: BlockId, block: Block) -> Result<Block, UiError> {
        let slot = self.blocks.get_mut(id).ok_or(UiError::UnknownBlock)?;
        if slot.is_busy() {
            return Err(UiError::BlockBusy);
        }
        Ok(std::mem::replace(slot, block))
    }

    /// Every open block, base blocks first, then popups bottom to top.
    pub fn ids(&self) -> impl Iterator<Item = BlockId> + '_ {
        self.base.iter().copied().chain(self.modal.iter().map(|e| e.block))
    }
}

// ===========================================================================
// Tests
// ===========================================================================
