//! Keyboard shortcut resolution for the open overlay.
//!
//! Pure lookup from key + modifiers + context to an action; the host feeds
//! key events in and applies the resolved action through the engine. All
//! bindings are conveniences and freely remappable.

use crate::tools::ToolKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutKey {
    Character(char),
    Escape,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ShortcutModifiers {
    pub ctrl: bool,
    pub shift: bool,
}

impl ShortcutModifiers {
    pub const fn new(ctrl: bool, shift: bool) -> Self {
        Self { ctrl, shift }
    }
}

/// Shortcut gating: while a sticky note's text area has focus, keystrokes
/// belong to the text and no shortcut fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InputContext {
    pub text_input_active: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    SelectTool(ToolKind),
    CycleColor,
    Undo,
    ClearAll,
    DecreaseWidth,
    IncreaseWidth,
    CloseOverlay,
}

pub fn resolve_shortcut(
    key: ShortcutKey,
    modifiers: ShortcutModifiers,
    context: InputContext,
) -> Option<ShortcutAction> {
    if context.text_input_active {
        return None;
    }

    match (key, modifiers.ctrl) {
        (ShortcutKey::Character('t'), false) => {
            Some(ShortcutAction::SelectTool(ToolKind::TextSelect))
        }
        (ShortcutKey::Character('h'), false) => {
            Some(ShortcutAction::SelectTool(ToolKind::Highlighter))
        }
        (ShortcutKey::Character('p'), false) => Some(ShortcutAction::SelectTool(ToolKind::Pen)),
        (ShortcutKey::Character('e'), false) => Some(ShortcutAction::SelectTool(ToolKind::Eraser)),
        (ShortcutKey::Character('n'), false) => Some(ShortcutAction::SelectTool(ToolKind::Normal)),
        (ShortcutKey::Character('s'), false) => {
            Some(ShortcutAction::SelectTool(ToolKind::StickyNote))
        }
        (ShortcutKey::Character('x'), false) => Some(ShortcutAction::CycleColor),
        (ShortcutKey::Character('z'), true) => Some(ShortcutAction::Undo),
        // Plain 'c' only: ctrl+c stays the system copy.
        (ShortcutKey::Character('c'), false) => Some(ShortcutAction::ClearAll),
        (ShortcutKey::Character('['), false) => Some(ShortcutAction::DecreaseWidth),
        (ShortcutKey::Character(']'), false) => Some(ShortcutAction::IncreaseWidth),
        (ShortcutKey::Escape, false) => Some(ShortcutAction::CloseOverlay),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NONE: ShortcutModifiers = ShortcutModifiers::new(false, false);
    const CTRL: ShortcutModifiers = ShortcutModifiers::new(true, false);

    fn resolve(key: ShortcutKey, modifiers: ShortcutModifiers) -> Option<ShortcutAction> {
        resolve_shortcut(key, modifiers, InputContext::default())
    }

    #[test]
    fn one_key_per_tool() {
        let cases = [
            ('t', ToolKind::TextSelect),
            ('h', ToolKind::Highlighter),
            ('p', ToolKind::Pen),
            ('e', ToolKind::Eraser),
            ('n', ToolKind::Normal),
            ('s', ToolKind::StickyNote),
        ];
        for (key, tool) in cases {
            assert_eq!(
                resolve(ShortcutKey::Character(key), NONE),
                Some(ShortcutAction::SelectTool(tool)),
                "key {key} should select {tool:?}"
            );
        }
    }

    #[test]
    fn clear_requires_ctrl_to_be_released() {
        assert_eq!(
            resolve(ShortcutKey::Character('c'), NONE),
            Some(ShortcutAction::ClearAll)
        );
        assert_eq!(resolve(ShortcutKey::Character('c'), CTRL), None);
    }

    #[test]
    fn undo_is_ctrl_z() {
        assert_eq!(
            resolve(ShortcutKey::Character('z'), CTRL),
            Some(ShortcutAction::Undo)
        );
        assert_eq!(resolve(ShortcutKey::Character('z'), NONE), None);
    }

    #[test]
    fn brackets_nudge_width_and_escape_closes() {
        assert_eq!(
            resolve(ShortcutKey::Character('['), NONE),
            Some(ShortcutAction::DecreaseWidth)
        );
        assert_eq!(
            resolve(ShortcutKey::Character(']'), NONE),
            Some(ShortcutAction::IncreaseWidth)
        );
        assert_eq!(
            resolve(ShortcutKey::Escape, NONE),
            Some(ShortcutAction::CloseOverlay)
        );
    }

    #[test]
    fn shortcuts_are_inert_while_editing_note_text() {
        let context = InputContext {
            text_input_active: true,
        };
        assert_eq!(
            resolve_shortcut(ShortcutKey::Character('p'), NONE, context),
            None
        );
        assert_eq!(resolve_shortcut(ShortcutKey::Escape, NONE, context), None);
    }
}
