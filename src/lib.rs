//! Freehand annotation overlay engine for dual-panel document readers.
//!
//! The engine owns everything behind the host boundary: per-panel raster
//! surfaces sized to scrollable content, freehand stroke gestures with
//! jitter suppression, selection highlighting, bounded undo history,
//! sticky notes and the tool mode machine. The host supplies panel
//! geometry through [`PanelHost`], pointer/keyboard/selection events, and
//! renders the surfaces and notes back; it never touches pixels itself.

pub mod config;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod highlight;
pub mod history;
pub mod input;
pub mod logging;
pub mod mapper;
pub mod notes;
pub mod raster;
pub mod session;
pub mod stroke;
pub mod surface;
pub mod tools;

pub use config::{load_config, EngineConfig};
pub use engine::{AnnotationEngine, EngineSignal};
pub use error::{EngineError, EngineResult};
pub use geometry::{Color, SurfacePoint, ViewPoint, ViewRect};
pub use highlight::{SelectionOrigin, SelectionSnapshot};
pub use mapper::PointerSample;
pub use notes::{NoteError, StickyNote};
pub use session::{HostStyler, OverlaySession, SessionError};
pub use surface::{PanelHost, PanelId, PanelMetrics};
pub use tools::{ToolKind, ToolState};
