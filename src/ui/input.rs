/// Keyboard input tracker.
///
/// Two views of the same event stream:
///   - Strokes: every Press/Repeat in arrival order. One stroke of a
///     direction key is one step of the player, so holding an arrow
///     walks at the terminal's key-repeat rate.
///   - Fresh presses: keys that went from "not held" to "held" this
///     frame. Used for one-shot controls (start, mute, quit).
///
/// Uses crossterm's keyboard enhancement for Release events when available.
/// Falls back to timeout-based release detection on terminals that don't support it.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crossterm::event::{self, poll, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::domain::entity::Direction;

/// After this duration without a Press/Repeat event, consider the key released.
/// Only used when the terminal doesn't report Release events.
const HOLD_TIMEOUT: Duration = Duration::from_millis(160);

pub const KEYS_LEFT: &[KeyCode] = &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')];
pub const KEYS_UP: &[KeyCode] = &[KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')];
pub const KEYS_RIGHT: &[KeyCode] = &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')];
pub const KEYS_DOWN: &[KeyCode] = &[KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')];
pub const KEYS_START: &[KeyCode] = &[KeyCode::Enter, KeyCode::Char(' ')];
pub const KEYS_MUTE: &[KeyCode] = &[KeyCode::Char('m'), KeyCode::Char('M')];
pub const KEYS_QUIT: &[KeyCode] = &[KeyCode::Char('q'), KeyCode::Char('Q'), KeyCode::Esc];

/// Map a key to the direction it steers, if any.
pub fn direction_for(code: KeyCode) -> Option<Direction> {
    if KEYS_LEFT.contains(&code) {
        Some(Direction::Left)
    } else if KEYS_UP.contains(&code) {
        Some(Direction::Up)
    } else if KEYS_RIGHT.contains(&code) {
        Some(Direction::Right)
    } else if KEYS_DOWN.contains(&code) {
        Some(Direction::Down)
    } else {
        None
    }
}

pub struct InputState {
    /// Timestamp of last Press/Repeat event for each key.
    last_active: HashMap<KeyCode, Instant>,

    /// Keys that transitioned from "not held" → "held" during the
    /// most recent drain_events() call.
    fresh_presses: Vec<KeyCode>,

    /// Every Press/Repeat seen during the most recent drain, in order.
    strokes: Vec<KeyCode>,

    /// Raw key events collected during drain, for Ctrl-C handling.
    pub raw_events: Vec<KeyEvent>,

    /// Whether to honor Release events. Only true when keyboard
    /// enhancement is confirmed working.
    pub honor_release: bool,
}

impl InputState {
    pub fn new() -> Self {
        InputState {
            last_active: HashMap::with_capacity(16),
            fresh_presses: Vec::with_capacity(8),
            strokes: Vec::with_capacity(8),
            raw_events: Vec::with_capacity(8),
            honor_release: false,
        }
    }

    /// Drain all pending terminal events and update key states.
    /// Call this once per frame, before advancing the game clock.
    pub fn drain_events(&mut self) {
        self.begin_frame();

        // Read all available events without blocking
        while poll(Duration::ZERO).unwrap_or(false) {
            if let Ok(Event::Key(key)) = event::read() {
                self.record(key, Instant::now());
            }
        }

        self.expire(Instant::now());
    }

    /// Direction strokes of this frame, in the order they arrived.
    pub fn direction_strokes(&self) -> impl Iterator<Item = Direction> + '_ {
        self.strokes.iter().filter_map(|&c| direction_for(c))
    }

    /// Was this key freshly pressed this frame? (edge trigger)
    pub fn was_pressed(&self, code: KeyCode) -> bool {
        self.fresh_presses.contains(&code)
    }

    /// Convenience: was any of these keys freshly pressed?
    pub fn any_pressed(&self, codes: &[KeyCode]) -> bool {
        codes.iter().any(|c| self.was_pressed(*c))
    }

    /// Check if any raw event this frame has Ctrl+C
    pub fn ctrl_c_pressed(&self) -> bool {
        self.raw_events.iter().any(|k| {
            k.modifiers.contains(KeyModifiers::CONTROL)
                && (k.code == KeyCode::Char('c') || k.code == KeyCode::Char('C'))
        })
    }

    // ── Internal ──

    fn begin_frame(&mut self) {
        self.fresh_presses.clear();
        self.strokes.clear();
        self.raw_events.clear();
    }

    fn record(&mut self, key: KeyEvent, now: Instant) {
        self.raw_events.push(key);

        match key.kind {
            KeyEventKind::Release if self.honor_release => {
                self.last_active.remove(&key.code);
            }
            KeyEventKind::Release => {
                // Enhancement not confirmed; rely on timeout-based expiry
            }
            _ => {
                let was_held = self.is_held_at(key.code, now);
                self.last_active.insert(key.code, now);
                self.strokes.push(key.code);
                if !was_held {
                    self.fresh_presses.push(key.code);
                }
            }
        }
    }

    fn expire(&mut self, now: Instant) {
        self.last_active.retain(|_, t| now.duration_since(*t) < HOLD_TIMEOUT);
    }

    fn is_held_at(&self, code: KeyCode, now: Instant) -> bool {
        self.last_active
            .get(&code)
            .map(|t| now.duration_since(*t) < HOLD_TIMEOUT)
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn key(code: KeyCode, kind: KeyEventKind) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind,
            state: KeyEventState::NONE,
        }
    }

    #[test]
    fn every_repeat_is_a_stroke() {
        let mut input = InputState::new();
        let t0 = Instant::now();
        input.begin_frame();
        input.record(key(KeyCode::Left, KeyEventKind::Press), t0);
        input.record(key(KeyCode::Left, KeyEventKind::Repeat), t0);
        input.record(key(KeyCode::Char('w'), KeyEventKind::Press), t0);

        let dirs: Vec<Direction> = input.direction_strokes().collect();
        assert_eq!(dirs, vec![Direction::Left, Direction::Left, Direction::Up]);
        // Only the first Left counts as a fresh press.
        assert!(input.was_pressed(KeyCode::Left));
        assert_eq!(input.fresh_presses.len(), 2);
    }

    #[test]
    fn held_key_is_not_fresh_next_frame() {
        let mut input = InputState::new();
        let t0 = Instant::now();
        input.begin_frame();
        input.record(key(KeyCode::Enter, KeyEventKind::Press), t0);
        assert!(input.any_pressed(KEYS_START));

        input.begin_frame();
        input.record(key(KeyCode::Enter, KeyEventKind::Repeat), t0 + Duration::from_millis(30));
        assert!(!input.any_pressed(KEYS_START));
    }

    #[test]
    fn release_clears_hold_when_honoured() {
        let mut input = InputState::new();
        input.honor_release = true;
        let t0 = Instant::now();
        input.begin_frame();
        input.record(key(KeyCode::Char('m'), KeyEventKind::Press), t0);
        input.record(key(KeyCode::Char('m'), KeyEventKind::Release), t0);
        input.begin_frame();
        input.record(key(KeyCode::Char('m'), KeyEventKind::Press), t0);
        assert!(input.any_pressed(KEYS_MUTE));
    }

    #[test]
    fn timeout_expires_hold() {
        let mut input = InputState::new();
        let t0 = Instant::now();
        input.begin_frame();
        input.record(key(KeyCode::Esc, KeyEventKind::Press), t0);
        input.expire(t0 + HOLD_TIMEOUT);
        input.begin_frame();
        input.record(key(KeyCode::Esc, KeyEventKind::Press), t0 + HOLD_TIMEOUT);
        assert!(input.any_pressed(KEYS_QUIT));
    }

    #[test]
    fn ctrl_c_detected() {
        let mut input = InputState::new();
        input.begin_frame();
        let mut ev = key(KeyCode::Char('c'), KeyEventKind::Press);
        ev.modifiers = KeyModifiers::CONTROL;
        input.record(ev, Instant::now());
        assert!(input.ctrl_c_pressed());
    }

    #[test]
    fn wasd_and_arrows_map_to_directions() {
        assert_eq!(direction_for(KeyCode::Char('a')), Some(Direction::Left));
        assert_eq!(direction_for(KeyCode::Down), Some(Direction::Down));
        assert_eq!(direction_for(KeyCode::Char('D')), Some(Direction::Right));
        assert_eq!(direction_for(KeyCode::Enter), None);
    }
}
