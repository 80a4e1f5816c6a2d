//! Modal overlay bookkeeping.
//!
//! Presenting a dialog is the host's concern; this tracks which overlay, if
//! any, currently owns the modal surface, and refuses conflicting
//! transitions.

use std::fmt;
use std::sync::{Mutex, MutexGuard};

use crate::error::{Result, ViewerError};

/// Identifier for a modal overlay, unique per dialog kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlayId(pub &'static str);

impl fmt::Display for OverlayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Tracks the single active overlay.
#[derive(Debug, Default)]
pub struct OverlayManager {
    active: Mutex<Option<OverlayId>>,
}

impl OverlayManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the modal surface. Fails while any overlay is active, including
    /// `id` itself.
    pub fn open(&self, id: OverlayId) -> Result<()> {
        let mut active = self.lock();
        if let Some(current) = *active {
            return Err(ViewerError::OverlayActive(current));
        }
        *active = Some(id);
        Ok(())
    }

    /// Release the modal surface. Fails unless `id` is the active overlay.
    pub fn close(&self, id: OverlayId) -> Result<()> {
        let mut active = self.lock();
        match *active {
            Some(current) if current == id => {
                *active = None;
                Ok(())
            }
            _ => Err(ViewerError::OverlayNotActive(id)),
        }
    }

    pub fn active(&self) -> Option<OverlayId> {
        *self.lock()
    }

    pub fn is_active(&self, id: OverlayId) -> bool {
        self.active() == Some(id)
    }

    fn lock(&self) -> MutexGuard<'_, Option<OverlayId>> {
        self.active.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
