/// Keyboard input drain.
///
/// Snake only needs edge-triggered presses: a direction change is an
/// event, not a held state. Each frame, `drain_events()` empties the
/// terminal event queue without blocking; handlers then ask
/// `was_pressed` / `any_pressed` for the keys they care about.
///
/// Presses arriving between two simulation ticks are applied in queue
/// order by the handlers, so the last direction key pressed before a
/// tick is the one the tick uses.

use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, poll};

pub struct InputState {
    /// Key presses collected during the most recent drain, in order.
    presses: Vec<KeyEvent>,
}

impl InputState {
    pub fn new() -> Self {
        InputState { presses: Vec::with_capacity(8) }
    }

    /// Synthetic input for tests, bypassing the terminal queue.
    #[cfg(test)]
    pub fn with_presses(presses: Vec<KeyEvent>) -> Self {
        InputState { presses }
    }

    /// Drain all pending terminal events. Call once per frame,
    /// before the simulation tick.
    pub fn drain_events(&mut self) {
        self.presses.clear();

        while poll(Duration::ZERO).unwrap_or(false) {
            if let Ok(Event::Key(key)) = event::read() {
                // Release/Repeat events exist on enhanced terminals;
                // only the initial press drives the game.
                if key.kind != KeyEventKind::Release {
                    self.presses.push(key);
                }
            }
        }
    }

    /// Was this key pressed during the last drain?
    pub fn was_pressed(&self, code: KeyCode) -> bool {
        self.presses.iter().any(|k| k.code == code)
    }

    /// Convenience: was any of these keys pressed?
    pub fn any_pressed(&self, codes: &[KeyCode]) -> bool {
        codes.iter().any(|c| self.was_pressed(*c))
    }

    /// All presses from the last drain, in arrival order.
    pub fn presses(&self) -> &[KeyEvent] {
        &self.presses
    }

    /// Check if any event this frame was Ctrl+C.
    pub fn ctrl_c_pressed(&self) -> bool {
        self.presses.iter().any(|k| {
            k.modifiers.contains(KeyModifiers::CONTROL)
                && (k.code == KeyCode::Char('c') || k.code == KeyCode::Char('C'))
        })
    }
}
