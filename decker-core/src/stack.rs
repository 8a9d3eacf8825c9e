//! Modal input stack.
//!
//! A command that needs a multi-step sub-dialogue pushes a block; while any
//! block is active, raw lines bypass command parsing and go to the top
//! block's handler. Blocks nest, and each exit unwinds exactly one level,
//! restoring the previous prompt label.

use crate::session::Session;

/// Called with each raw line while its block is on top of the stack.
pub type BlockHandler = Box<dyn FnMut(&mut Session, &str) + Send>;

/// The default prompt label shown when no block is active.
pub const DEFAULT_LABEL: &str = "> ";

/// One modal input context.
pub struct Block {
    pub id: u64,
    pub label: String,
    // Taken out while the handler runs so it can borrow the session.
    handler: Option<BlockHandler>,
}

/// An ordered stack of blocks; the top block is the active one.
#[derive(Default)]
pub struct InputStack {
    blocks: Vec<Block>,
    next_id: u64,
}

impl InputStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a block: its label becomes the visible prompt and `handler`
    /// receives every raw line until the block exits.
    pub fn enter(&mut self, label: impl Into<String>, handler: BlockHandler) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.blocks.push(Block {
            id,
            label: label.into(),
            handler: Some(handler),
        });
        id
    }

    /// Pop the active block, restoring the previous label. A no-op when the
    /// stack is empty.
    pub fn exit(&mut self) {
        self.blocks.pop();
    }

    pub fn is_active(&self) -> bool {
        !self.blocks.is_empty()
    }

    pub fn depth(&self) -> usize {
        self.blocks.len()
    }

    pub fn active_id(&self) -> Option<u64> {
        self.blocks.last().map(|b| b.id)
    }

    /// The label to show: the active block's, or the default.
    pub fn active_label(&self) -> &str {
        self.blocks
            .last()
            .map(|b| b.label.as_str())
            .unwrap_or(DEFAULT_LABEL)
    }

    /// Borrow the handler of the block with `id` out of the stack. The
    /// session puts it back after the call unless the block exited.
    pub(crate) fn take_handler(&mut self, id: u64) -> Option<BlockHandler> {
        self.blocks
            .iter_mut()
            .find(|b| b.id == id)
            .and_then(|b| b.handler.take())
    }

    pub(crate) fn put_handler_back(&mut self, id: u64, handler: BlockHandler) {
        if let Some(block) = self.blocks.iter_mut().find(|b| b.id == id) {
            block.handler = Some(handler);
        }
    }
}
