//! Overlay lifecycle: structured acquire/release of host document styling.
//!
//! While the overlay is open the host document carries annotation styling
//! (selection colors matching the active highlight color, pass-through
//! pointer behavior in normal mode). That is process-wide state, so it is
//! applied in exactly one place on open, re-applied on tool or color
//! changes, and guaranteed reversed on close — with drop as a backstop.

use thiserror::Error;

use crate::geometry::Color;
use crate::tools::ToolKind;

pub type SessionResult<T> = std::result::Result<T, SessionError>;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("overlay session is already open")]
    AlreadyOpen,
    #[error("overlay session is not open")]
    NotOpen,
}

/// Host hook for document-wide annotation styling. `apply` is called on
/// open and on every tool/color change; `restore` must return the document
/// to exactly its pre-overlay state (selection behavior, pointer events).
pub trait HostStyler {
    fn apply(&mut self, tool: ToolKind, color: Color);
    fn restore(&mut self);
}

#[derive(Debug)]
pub struct OverlaySession<S: HostStyler> {
    styler: S,
    open: bool,
}

impl<S: HostStyler> OverlaySession<S> {
    pub fn new(styler: S) -> Self {
        Self {
            styler,
            open: false,
        }
    }

    pub const fn is_open(&self) -> bool {
        self.open
    }

    pub fn open(&mut self, tool: ToolKind, color: Color) -> SessionResult<()> {
        if self.open {
            return Err(SessionError::AlreadyOpen);
        }
        self.open = true;
        self.styler.apply(tool, color);
        tracing::debug!(?tool, "overlay session opened");
        Ok(())
    }

    /// Re-applies styling after a tool or color change. No-op while closed.
    pub fn sync_style(&mut self, tool: ToolKind, color: Color) {
        if self.open {
            self.styler.apply(tool, color);
        }
    }

    pub fn close(&mut self) -> SessionResult<()> {
        if !self.open {
            return Err(SessionError::NotOpen);
        }
        self.open = false;
        self.styler.restore();
        tracing::debug!("overlay session closed");
        Ok(())
    }
}

impl<S: HostStyler> Drop for OverlaySession<S> {
    fn drop(&mut self) {
        if self.open {
            self.styler.restore();
        }
    }
}
