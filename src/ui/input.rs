/// Keyboard tracker.
///
/// Terminals report key presses, not key state. Movement needs "is this key
/// held", so every Press/Repeat refreshes a timestamp and a key counts as
/// held until it is released or its timestamp is older than `HOLD_TIMEOUT`.
/// Release events are honoured only when keyboard enhancement is active.
///
/// Key bindings:
///   Arrows / WASD     →  Movement (Up / W jumps)
///   R                 →  Restart level
///   Esc / Q / Ctrl+C  →  Quit

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crossterm::event::{self, poll, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::domain::input::{Action, InputState};

/// Key considered released after this long without a Press/Repeat.
const HOLD_TIMEOUT: Duration = Duration::from_millis(160);

const KEYS_LEFT: &[KeyCode] = &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')];
const KEYS_RIGHT: &[KeyCode] = &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')];
const KEYS_UP: &[KeyCode] = &[KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W'), KeyCode::Char(' ')];
const KEYS_DOWN: &[KeyCode] = &[KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')];
const KEYS_RESTART: &[KeyCode] = &[KeyCode::Char('r'), KeyCode::Char('R')];
const KEYS_QUIT: &[KeyCode] = &[KeyCode::Esc, KeyCode::Char('q'), KeyCode::Char('Q')];

const BINDINGS: [(Action, &[KeyCode]); 4] = [
    (Action::Left, KEYS_LEFT),
    (Action::Right, KEYS_RIGHT),
    (Action::Up, KEYS_UP),
    (Action::Down, KEYS_DOWN),
];

pub struct Keyboard {
    /// Last Press/Repeat per key.
    last_active: HashMap<KeyCode, Instant>,
    /// Keys that went from released to held during the last drain.
    fresh_presses: Vec<KeyCode>,
    ctrl_c: bool,
    pub honor_release: bool,
}

impl Default for Keyboard {
    fn default() -> Self {
        Keyboard::new()
    }
}

impl Keyboard {
    pub fn new() -> Self {
        Keyboard {
            last_active: HashMap::with_capacity(16),
            fresh_presses: Vec::with_capacity(8),
            ctrl_c: false,
            honor_release: false,
        }
    }

    /// Read every pending terminal event without blocking. Call once per
    /// frame, before sampling.
    pub fn drain_events(&mut self) {
        self.begin_frame();
        while poll(Duration::ZERO).unwrap_or(false) {
            if let Ok(Event::Key(key)) = event::read() {
                self.handle_key(key, Instant::now());
            }
        }
        self.expire(Instant::now());
    }

    fn begin_frame(&mut self) {
        self.fresh_presses.clear();
        self.ctrl_c = false;
    }

    fn handle_key(&mut self, key: KeyEvent, now: Instant) {
        if key.modifiers.contains(KeyModifiers::CONTROL)
            && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('C'))
        {
            self.ctrl_c = true;
            return;
        }

        match key.kind {
            KeyEventKind::Release if self.honor_release => {
                self.last_active.remove(&key.code);
            }
            // Unreliable without enhancement; the timeout handles it.
            KeyEventKind::Release => {}
            _ => {
                let was_held = self.is_held_at(key.code, now);
                self.last_active.insert(key.code, now);
                if !was_held {
                    self.fresh_presses.push(key.code);
                }
            }
        }
    }

    fn expire(&mut self, now: Instant) {
        self.last_active
            .retain(|_, t| now.saturating_duration_since(*t) < HOLD_TIMEOUT);
    }

    fn is_held_at(&self, code: KeyCode, now: Instant) -> bool {
        self.last_active
            .get(&code)
            .is_some_and(|t| now.saturating_duration_since(*t) < HOLD_TIMEOUT)
    }

    pub fn is_held(&self, code: KeyCode) -> bool {
        self.is_held_at(code, Instant::now())
    }

    pub fn any_held(&self, codes: &[KeyCode]) -> bool {
        codes.iter().any(|c| self.is_held(*c))
    }

    /// Edge trigger: pressed during the last drain.
    pub fn any_pressed(&self, codes: &[KeyCode]) -> bool {
        codes.iter().any(|c| self.fresh_presses.contains(c))
    }

    /// Held movement keys, as simulation input.
    pub fn sample(&self) -> InputState {
        let mut input = InputState::default();
        for (action, keys) in BINDINGS {
            // A tap shorter than one frame still counts for that frame.
            input.set(action, self.any_held(keys) || self.any_pressed(keys));
        }
        input
    }

    pub fn restart_pressed(&self) -> bool {
        self.any_pressed(KEYS_RESTART)
    }

    pub fn quit_pressed(&self) -> bool {
        self.ctrl_c || self.any_pressed(KEYS_QUIT)
    }
}
