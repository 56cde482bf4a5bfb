//! The annotation engine: input dispatch, gesture lifecycle, history.
//!
//! One engine instance serves one open overlay. The host delivers pointer
//! and selection events plus panel geometry (via [`PanelHost`]); the engine
//! owns everything behind that boundary. All failure paths degrade
//! silently: annotation is cosmetic, never a data path.

use crate::config::EngineConfig;
use crate::geometry::{Color, SurfacePoint};
use crate::highlight::{self, SelectionSnapshot};
use crate::history::History;
use crate::input::{resolve_shortcut, InputContext, ShortcutAction, ShortcutKey, ShortcutModifiers};
use crate::mapper::{self, PointerSample};
use crate::notes::{GestureCoalescer, NoteGesture, NoteGestureKind, NoteResult, NoteStore};
use crate::stroke::{StrokeGesture, StrokeOutcome, StrokeStyle};
use crate::surface::{PanelHost, PanelId, SurfaceManager};
use crate::tools::{PointerRoute, ToolKind, ToolState};

/// Request the engine cannot satisfy itself and hands back to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineSignal {
    /// Escape was pressed; the host closes the overlay (and its session).
    CloseRequested,
}

#[derive(Debug)]
pub struct AnnotationEngine<H: PanelHost> {
    host: H,
    config: EngineConfig,
    surfaces: SurfaceManager,
    history: History,
    notes: NoteStore,
    tools: ToolState,
    stroke: Option<StrokeGesture>,
    note_gesture: Option<(PanelId, NoteGesture)>,
    note_moves: GestureCoalescer,
    note_last_point: Option<SurfacePoint>,
}

impl<H: PanelHost> AnnotationEngine<H> {
    pub fn new(host: H) -> Self {
        Self::with_config(host, EngineConfig::default())
    }

    pub fn with_config(host: H, config: EngineConfig) -> Self {
        Self {
            host,
            config,
            surfaces: SurfaceManager::new(),
            history: History::new(config.history_capacity),
            notes: NoteStore::new(),
            tools: ToolState::new(),
            stroke: None,
            note_gesture: None,
            note_moves: GestureCoalescer::new(),
            note_last_point: None,
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn surfaces(&self) -> &SurfaceManager {
        &self.surfaces
    }

    pub fn notes(&self) -> &NoteStore {
        &self.notes
    }

    pub fn tools(&self) -> &ToolState {
        &self.tools
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    // -- tool state ---------------------------------------------------------

    pub fn select_tool(&mut self, tool: ToolKind) {
        self.tools.select_tool(tool);
    }

    pub fn set_color(&mut self, color: Color) {
        self.tools.set_color(color);
    }

    // -- pointer dispatch ---------------------------------------------------

    pub fn pointer_down(&mut self, panel: PanelId, sample: PointerSample) {
        match self.tools.active().pointer_route() {
            PointerRoute::Stroke => self.begin_stroke(panel, sample),
            PointerRoute::Note => self.begin_note_create(panel, sample),
            PointerRoute::PassThrough => {}
        }
    }

    pub fn pointer_moved(&mut self, sample: PointerSample) {
        if let Some(gesture) = self.stroke.as_mut() {
            let panel = gesture.panel();
            let Some(point) = mapper::resolve(&self.host, panel, sample) else {
                return;
            };
            let Some(surface) = self.surfaces.get_mut(panel) else {
                return;
            };
            gesture.update(surface, point);
            return;
        }

        if let Some((panel, _)) = self.note_gesture {
            let Some(point) = mapper::resolve(&self.host, panel, sample) else {
                return;
            };
            // Rapid moves coalesce; `on_frame` applies the latest one.
            self.note_moves.submit(point);
            self.note_last_point = Some(point);
        }
    }

    /// Applies the pending note-drag update for this rendered frame.
    pub fn on_frame(&mut self) {
        let Some(point) = self.note_moves.take() else {
            return;
        };
        if let Some((_, gesture)) = self.note_gesture {
            gesture.update(&mut self.notes, point);
        }
    }

    pub fn pointer_up(&mut self, sample: PointerSample) {
        if let Some(gesture) = self.stroke.take() {
            self.finish_stroke(gesture);
            return;
        }

        if let Some((panel, gesture)) = self.note_gesture.take() {
            let point = mapper::resolve(&self.host, panel, sample)
                .or(self.note_last_point)
                .unwrap_or_else(|| gesture.origin());
            self.note_moves.take();
            self.note_last_point = None;
            gesture.finish(&mut self.notes, point);
        }
    }

    /// The pointer left the tracked area; treated identically to
    /// pointer-up, with the last known position standing in.
    pub fn pointer_left(&mut self) {
        if let Some(gesture) = self.stroke.take() {
            self.finish_stroke(gesture);
            return;
        }

        if let Some((_, gesture)) = self.note_gesture.take() {
            let point = self.note_last_point.take().unwrap_or_else(|| gesture.origin());
            self.note_moves.take();
            gesture.finish(&mut self.notes, point);
        }
    }

    fn begin_stroke(&mut self, panel: PanelId, sample: PointerSample) {
        let Some(metrics) = self.host.metrics(panel) else {
            tracing::debug!(?panel, "stroke ignored; panel not mounted");
            return;
        };
        if self.surfaces.ensure(panel, &metrics).is_none() {
            return;
        }
        let point = mapper::to_surface_local(&metrics, sample);
        let Some(style) = StrokeStyle::for_tool(
            self.tools.active(),
            self.tools.color(),
            self.tools.line_width(),
        ) else {
            return;
        };
        self.stroke = Some(StrokeGesture::with_jitter_threshold(
            panel,
            style,
            point,
            self.config.jitter_threshold_px,
        ));
    }

    fn finish_stroke(&mut self, gesture: StrokeGesture) {
        // Snapshots happen only here, at the gesture boundary, so history
        // never records a torn stroke.
        if gesture.finish() == StrokeOutcome::Painted {
            self.history.snapshot(&self.surfaces);
        }
    }

    fn begin_note_create(&mut self, panel: PanelId, sample: PointerSample) {
        let Some(point) = mapper::resolve(&self.host, panel, sample) else {
            return;
        };
        let id = self.notes.create(panel, point.x, point.y);
        self.note_gesture = Some((
            panel,
            NoteGesture::begin(id, NoteGestureKind::Create, point),
        ));
    }

    // -- note interactions (host hit-tests the regions) ---------------------

    /// Starts dragging a note. Only called for grabs on the note's header
    /// region; grabs elsewhere in the note must not reach this.
    pub fn begin_note_move(&mut self, panel: PanelId, id: u64, sample: PointerSample) {
        let Some(point) = mapper::resolve(&self.host, panel, sample) else {
            return;
        };
        let Some(note) = self.notes.get(id) else {
            tracing::debug!(id, "note move ignored; note not found");
            return;
        };
        let kind = NoteGestureKind::Move {
            grab_dx: point.x - note.x,
            grab_dy: point.y - note.y,
        };
        self.note_gesture = Some((panel, NoteGesture::begin(id, kind, point)));
    }

    /// Starts a resize drag anchored on the note's resize handle.
    pub fn begin_note_resize(&mut self, panel: PanelId, id: u64) {
        let Some(note) = self.notes.get(id) else {
            tracing::debug!(id, "note resize ignored; note not found");
            return;
        };
        let origin = SurfacePoint::new(note.x, note.y);
        self.note_gesture = Some((
            panel,
            NoteGesture::begin(id, NoteGestureKind::Resize, origin),
        ));
    }

    pub fn toggle_note_open(&mut self, id: u64) -> NoteResult<()> {
        self.notes.toggle_open(id)
    }

    pub fn set_note_text(&mut self, id: u64, text: impl Into<String>) -> NoteResult<()> {
        self.notes.set_text(id, text)
    }

    pub fn delete_note(&mut self, id: u64) -> NoteResult<()> {
        self.notes.delete(id)
    }

    // -- selection highlighting ---------------------------------------------

    /// Handles one completed selection gesture. Returns `true` when the
    /// selection was painted, in which case the host must clear the native
    /// text selection.
    pub fn selection_completed(&mut self, snapshot: &SelectionSnapshot) -> bool {
        if !self.tools.active().handles_selection() {
            return false;
        }
        let Some(first_rect) = snapshot.rects.first() else {
            return false;
        };
        let Some((panel, metrics)) = highlight::resolve_target_panel(&self.host, first_rect) else {
            tracing::debug!("selection matched no tracked panel");
            return false;
        };
        let Some(surface) = self.surfaces.ensure(panel, &metrics) else {
            return false;
        };

        let painted = highlight::paint_selection(surface, &metrics, snapshot, self.tools.color());
        if painted {
            self.history.snapshot(&self.surfaces);
        }
        painted
    }

    // -- whole-overlay operations -------------------------------------------

    pub fn undo(&mut self) -> bool {
        self.history.undo(&mut self.surfaces)
    }

    /// Blanks both surfaces and removes every sticky note, then records the
    /// cleared raster state as a new history point so it is undoable.
    pub fn clear_all(&mut self) {
        self.surfaces.clear_all();
        self.notes.clear_all();
        self.history.snapshot(&self.surfaces);
    }

    /// Re-syncs surfaces with panel content sizes; called on window resize
    /// and once after mount when host layout has settled.
    pub fn resize_panels(&mut self) {
        for panel in PanelId::ALL {
            if let Some(metrics) = self.host.metrics(panel) {
                self.surfaces.sync(panel, &metrics);
            }
        }
    }

    // -- keyboard -----------------------------------------------------------

    pub fn handle_key(
        &mut self,
        key: ShortcutKey,
        modifiers: ShortcutModifiers,
        context: InputContext,
    ) -> Option<EngineSignal> {
        let action = resolve_shortcut(key, modifiers, context)?;
        self.apply_shortcut(action)
    }

    fn apply_shortcut(&mut self, action: ShortcutAction) -> Option<EngineSignal> {
        match action {
            ShortcutAction::SelectTool(tool) => self.tools.select_tool(tool),
            ShortcutAction::CycleColor => self.tools.cycle_color(),
            ShortcutAction::Undo => {
                self.undo();
            }
            ShortcutAction::ClearAll => self.clear_all(),
            ShortcutAction::DecreaseWidth => self.tools.decrease_width(),
            ShortcutAction::IncreaseWidth => self.tools.increase_width(),
            ShortcutAction::CloseOverlay => return Some(EngineSignal::CloseRequested),
        }
        None
    }
}
