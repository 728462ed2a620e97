//! Busy flags for long-running backend operations
//!
//! A second trigger while an operation is in flight is rejected, not queued.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::debug;
use crate::utils::errors::{StudioError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    AiDraft,
    LayoutSave,
    Render,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::AiDraft => "ai_draft",
            Operation::LayoutSave => "layout_save",
            Operation::Render => "render",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Default)]
struct Flags {
    ai_draft: AtomicBool,
    layout_save: AtomicBool,
    render: AtomicBool,
}

impl Flags {
    fn get(&self, operation: Operation) -> &AtomicBool {
        match operation {
            Operation::AiDraft => &self.ai_draft,
            Operation::LayoutSave => &self.layout_save,
            Operation::Render => &self.render,
        }
    }
}

/// One flag per operation, shared between clones
#[derive(Debug, Clone, Default)]
pub struct BusyFlags {
    flags: Arc<Flags>,
}

impl BusyFlags {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_busy(&self, operation: Operation) -> bool {
        self.flags.get(operation).load(Ordering::Acquire)
    }

    /// Mark `operation` as running. The flag is cleared when the guard drops.
    pub fn try_begin(&self, operation: Operation) -> Result<BusyGuard> {
        self.flags
            .get(operation)
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| StudioError::Busy(operation.to_string()))?;

        debug!(operation = %operation, "Operation started");
        Ok(BusyGuard { flags: Arc::clone(&self.flags), operation })
    }
}

#[derive(Debug)]
pub struct BusyGuard {
    flags: Arc<Flags>,
    operation: Operation,
}

impl BusyGuard {
    pub fn operation(&self) -> Operation {
        self.operation
    }
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.flags.get(self.operation).store(false, Ordering::Release);
        debug!(operation = %self.operation, "Operation finished");
    }
}
