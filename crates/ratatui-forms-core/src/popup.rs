//! Transient overlay state bound to an anchor area.
//!
//! Only the open/closed machine lives here; where the overlay goes on
//! screen is the host's business. Widgets record their anchor and overlay
//! rects during render so dismissal can tell inside from outside presses.
//! Closing never touches selection state.

use ratatui::layout::Rect;

use crate::input::InputEvent;
use crate::input::KeyCode;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PopupPhase {
    #[default]
    Closed,
    Open,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct PopupState {
    phase: PopupPhase,
    anchor: Rect,
    overlay: Rect,
}

impl PopupState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> PopupPhase {
        self.phase
    }

    pub fn is_open(&self) -> bool {
        self.phase == PopupPhase::Open
    }

    pub fn open(&mut self) {
        self.phase = PopupPhase::Open;
    }

    pub fn close(&mut self) {
        self.phase = PopupPhase::Closed;
    }

    pub fn toggle(&mut self) {
        self.phase = match self.phase {
            PopupPhase::Closed => PopupPhase::Open,
            PopupPhase::Open => PopupPhase::Closed,
        };
    }

    pub fn anchor(&self) -> Rect {
        self.anchor
    }

    pub fn set_anchor(&mut self, area: Rect) {
        self.anchor = area;
    }

    pub fn overlay(&self) -> Rect {
        self.overlay
    }

    pub fn set_overlay(&mut self, area: Rect) {
        self.overlay = area;
    }

    /// Closes on Esc or on a left press outside both the anchor and the
    /// overlay. Returns `true` when the event dismissed the popup, so the
    /// caller can discard in-progress state without emitting a change.
    pub fn handle_dismiss(&mut self, event: &InputEvent) -> bool {
        if !self.is_open() {
            return false;
        }
        match event {
            InputEvent::Key(key) if key.code == KeyCode::Esc => {
                self.close();
                true
            }
            InputEvent::Mouse(m) if m.is_left_down() => {
                if contains(self.anchor, m.x, m.y) || contains(self.overlay, m.x, m.y) {
                    return false;
                }
                self.close();
                true
            }
            _ => false,
        }
    }
}

pub fn contains(area: Rect, x: u16, y: u16) -> bool {
    x >= area.x && x < area.x + area.width && y >= area.y && y < area.y + area.height
}
