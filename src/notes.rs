//! Sticky notes: the vector annotation layer.
//!
//! Notes share the surface coordinate space with the raster layer but are
//! otherwise independent of it: they are not recorded in raster history,
//! and only `clear_all` removes them en masse.

use thiserror::Error;

use crate::geometry::{Color, SurfacePoint};
use crate::surface::PanelId;

/// Size of a note at the instant of pointer-down, before the user drags.
pub const NOTE_CREATE_SIZE: (f32, f32) = (40.0, 40.0);
/// Hard floor enforced on every resize.
pub const NOTE_MIN_WIDTH: f32 = 120.0;
pub const NOTE_MIN_HEIGHT: f32 = 80.0;
/// A creation drag that stays under this in either dimension is treated as
/// a click and the note snaps to the default size instead.
pub const NOTE_CLICK_THRESHOLD: f32 = 100.0;
pub const NOTE_DEFAULT_SIZE: (f32, f32) = (200.0, 150.0);
/// Pale yellow, readable over document text.
pub const NOTE_DEFAULT_BACKGROUND: Color = Color::from_rgb_u32(0xFFF9C4);

pub type NoteResult<T> = std::result::Result<T, NoteError>;

#[derive(Debug, Error)]
pub enum NoteError {
    #[error("sticky note {id} not found")]
    NotFound { id: u64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct StickyNote {
    pub id: u64,
    pub panel: PanelId,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub text: String,
    pub background: Color,
    pub is_open: bool,
}

#[derive(Debug, Default)]
pub struct NoteStore {
    notes: Vec<StickyNote>,
    next_id: u64,
}

impl NoteStore {
    pub fn new() -> Self {
        Self {
            notes: Vec::new(),
            next_id: 1,
        }
    }

    fn allocate_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id = self.next_id.saturating_add(1);
        id
    }

    fn find_mut(&mut self, id: u64) -> NoteResult<&mut StickyNote> {
        self.notes
            .iter_mut()
            .find(|note| note.id == id)
            .ok_or(NoteError::NotFound { id })
    }

    pub fn notes(&self) -> &[StickyNote] {
        &self.notes
    }

    pub fn notes_for(&self, panel: PanelId) -> impl Iterator<Item = &StickyNote> {
        self.notes.iter().filter(move |note| note.panel == panel)
    }

    pub fn get(&self, id: u64) -> Option<&StickyNote> {
        self.notes.iter().find(|note| note.id == id)
    }

    pub fn create(&mut self, panel: PanelId, x: f32, y: f32) -> u64 {
        let id = self.allocate_id();
        self.notes.push(StickyNote {
            id,
            panel,
            x: x.max(0.0),
            y: y.max(0.0),
            width: NOTE_CREATE_SIZE.0,
            height: NOTE_CREATE_SIZE.1,
            text: String::new(),
            background: NOTE_DEFAULT_BACKGROUND,
            is_open: true,
        });
        tracing::debug!(id, ?panel, "sticky note created");
        id
    }

    pub fn move_to(&mut self, id: u64, x: f32, y: f32) -> NoteResult<()> {
        let note = self.find_mut(id)?;
        note.x = x.max(0.0);
        note.y = y.max(0.0);
        Ok(())
    }

    pub fn resize(&mut self, id: u64, width: f32, height: f32) -> NoteResult<()> {
        let note = self.find_mut(id)?;
        note.width = width.max(NOTE_MIN_WIDTH);
        note.height = height.max(NOTE_MIN_HEIGHT);
        Ok(())
    }

    /// Live size update during the creation drag; tracks the raw delta
    /// without clamping so the outline follows the pointer.
    fn set_raw_size(&mut self, id: u64, width: f32, height: f32) -> NoteResult<()> {
        let note = self.find_mut(id)?;
        note.width = width.max(1.0);
        note.height = height.max(1.0);
        Ok(())
    }

    pub fn toggle_open(&mut self, id: u64) -> NoteResult<()> {
        let note = self.find_mut(id)?;
        note.is_open = !note.is_open;
        Ok(())
    }

    pub fn set_text(&mut self, id: u64, text: impl Into<String>) -> NoteResult<()> {
        let note = self.find_mut(id)?;
        note.text = text.into();
        Ok(())
    }

    pub fn delete(&mut self, id: u64) -> NoteResult<()> {
        let before = self.notes.len();
        self.notes.retain(|note| note.id != id);
        if self.notes.len() == before {
            return Err(NoteError::NotFound { id });
        }
        tracing::debug!(id, "sticky note deleted");
        Ok(())
    }

    pub fn clear_all(&mut self) {
        if !self.notes.is_empty() {
            tracing::debug!(count = self.notes.len(), "clearing all sticky notes");
        }
        self.notes.clear();
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NoteGestureKind {
    /// Initial pointer-down with the sticky-note tool; dragging sizes the
    /// new note.
    Create,
    /// Drag anchored on the note's header region. The host decides the hit
    /// region; dragging elsewhere in the note must not start a move.
    Move { grab_dx: f32, grab_dy: f32 },
    /// Drag on the resize handle.
    Resize,
}

/// Short-lived tracker for one note drag: started at pointer-down, fed
/// pointer moves, torn down deterministically at pointer-up. Owning the
/// gesture as a value replaces ad hoc listener juggling.
#[derive(Debug, Clone, Copy)]
pub struct NoteGesture {
    id: u64,
    kind: NoteGestureKind,
    origin: SurfacePoint,
}

impl NoteGesture {
    pub fn begin(id: u64, kind: NoteGestureKind, origin: SurfacePoint) -> Self {
        Self { id, kind, origin }
    }

    pub const fn note_id(&self) -> u64 {
        self.id
    }

    pub const fn origin(&self) -> SurfacePoint {
        self.origin
    }

    pub fn update(&self, store: &mut NoteStore, point: SurfacePoint) {
        let outcome = match self.kind {
            NoteGestureKind::Create => {
                store.set_raw_size(self.id, point.x - self.origin.x, point.y - self.origin.y)
            }
            NoteGestureKind::Move { grab_dx, grab_dy } => {
                store.move_to(self.id, point.x - grab_dx, point.y - grab_dy)
            }
            NoteGestureKind::Resize => {
                store.resize(self.id, point.x - self.origin.x, point.y - self.origin.y)
            }
        };
        if let Err(err) = outcome {
            tracing::debug!(%err, "note gesture update dropped");
        }
    }

    /// Ends the gesture. Creation drags that never cleared the click
    /// threshold snap to the default size; real drags settle on the
    /// clamped floor.
    pub fn finish(self, store: &mut NoteStore, point: SurfacePoint) {
        let outcome = match self.kind {
            NoteGestureKind::Create => {
                let width = point.x - self.origin.x;
                let height = point.y - self.origin.y;
                if width < NOTE_CLICK_THRESHOLD || height < NOTE_CLICK_THRESHOLD {
                    store.resize(self.id, NOTE_DEFAULT_SIZE.0, NOTE_DEFAULT_SIZE.1)
                } else {
                    store.resize(self.id, width, height)
                }
            }
            NoteGestureKind::Move { .. } | NoteGestureKind::Resize => {
                self.update(store, point);
                Ok(())
            }
        };
        if let Err(err) = outcome {
            tracing::debug!(%err, "note gesture finish dropped");
        }
    }
}

/// Collapses rapid pointer-move events to at most one pending point,
/// flushed by the host once per rendered frame.
#[derive(Debug, Default)]
pub struct GestureCoalescer {
    pending: Option<SurfacePoint>,
}

impl GestureCoalescer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn submit(&mut self, point: SurfacePoint) {
        self.pending = Some(point);
    }

    pub fn take(&mut self) -> Option<SurfacePoint> {
        self.pending.take()
    }
}
