/// Gamepad input via gilrs (feature `gamepad`).
///
/// Default mapping:
///   D-pad / Left Stick  →  Movement (Up jumps)
///   Start               →  Restart level
///   Select              →  Quit
///
/// Restart and quit buttons come from `[gamepad]` in config.toml. Without
/// the feature this compiles to a pad that is never connected.

#[cfg(feature = "gamepad")]
use gilrs::{Axis, Button, EventType, Gilrs};

use crate::config::GamepadConfig;
use crate::domain::input::{Action, InputState};

const STICK_DEADZONE: f32 = 0.25;

/// Logical face/shoulder buttons, named as in config.toml.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Btn {
    A,  // South
    B,  // East
    X,  // West
    Y,  // North
    L1,
    R1,
    L2,
    R2,
    Start,
    Select,
}

impl Btn {
    pub fn from_name(s: &str) -> Option<Btn> {
        match s.to_uppercase().as_str() {
            "A" | "SOUTH" => Some(Btn::A),
            "B" | "EAST" => Some(Btn::B),
            "X" | "WEST" => Some(Btn::X),
            "Y" | "NORTH" => Some(Btn::Y),
            "L1" | "LB" => Some(Btn::L1),
            "R1" | "RB" => Some(Btn::R1),
            "L2" | "LT" => Some(Btn::L2),
            "R2" | "RT" => Some(Btn::R2),
            "START" => Some(Btn::Start),
            "SELECT" | "BACK" => Some(Btn::Select),
            _ => None,
        }
    }

    #[cfg(feature = "gamepad")]
    fn from_gilrs(btn: Button) -> Option<Btn> {
        match btn {
            Button::South => Some(Btn::A),
            Button::East => Some(Btn::B),
            Button::West => Some(Btn::X),
            Button::North => Some(Btn::Y),
            Button::LeftTrigger => Some(Btn::L1),
            Button::RightTrigger => Some(Btn::R1),
            Button::LeftTrigger2 => Some(Btn::L2),
            Button::RightTrigger2 => Some(Btn::R2),
            Button::Start => Some(Btn::Start),
            Button::Select => Some(Btn::Select),
            _ => None,
        }
    }
}

/// Meta actions bound to buttons.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ButtonMap {
    pub restart: Vec<Btn>,
    pub quit: Vec<Btn>,
}

impl Default for ButtonMap {
    fn default() -> Self {
        ButtonMap {
            restart: vec![Btn::Start],
            quit: vec![Btn::Select],
        }
    }
}

impl ButtonMap {
    /// Unknown names are skipped; an action left with no buttons keeps its
    /// default binding.
    pub fn from_config(cfg: &GamepadConfig) -> Self {
        fn parse_list(names: &[String]) -> Vec<Btn> {
            names
                .iter()
                .filter_map(|name| {
                    let btn = Btn::from_name(name);
                    if btn.is_none() {
                        log::warn!("unknown gamepad button {name:?} in config");
                    }
                    btn
                })
                .collect()
        }

        let mut map = ButtonMap::default();
        let restart = parse_list(&cfg.restart);
        if !restart.is_empty() {
            map.restart = restart;
        }
        let quit = parse_list(&cfg.quit);
        if !quit.is_empty() {
            map.quit = quit;
        }
        map
    }
}

/// Left stick deflection as directions. gilrs reports +Y as up.
fn stick_input(x: f32, y: f32) -> InputState {
    InputState {
        left: x < -STICK_DEADZONE,
        right: x > STICK_DEADZONE,
        up: y > STICK_DEADZONE,
        down: y < -STICK_DEADZONE,
    }
}

pub struct Gamepad {
    #[cfg(feature = "gamepad")]
    gilrs: Option<Gilrs>,
    dpad: InputState,
    stick_x: f32,
    stick_y: f32,
    /// Buttons pressed since the last `update`.
    pressed: Vec<Btn>,
    map: ButtonMap,
    connected: bool,
}

impl Gamepad {
    pub fn new(cfg: &GamepadConfig) -> Self {
        #[cfg(feature = "gamepad")]
        let (gilrs, connected) = match Gilrs::new() {
            Ok(g) => {
                let has_pad = g.gamepads().next().is_some();
                (Some(g), has_pad)
            }
            Err(e) => {
                log::warn!("gamepad support unavailable: {e}");
                (None, false)
            }
        };
        #[cfg(not(feature = "gamepad"))]
        let connected = false;

        Gamepad {
            #[cfg(feature = "gamepad")]
            gilrs,
            dpad: InputState::default(),
            stick_x: 0.0,
            stick_y: 0.0,
            pressed: Vec::with_capacity(4),
            map: ButtonMap::from_config(cfg),
            connected,
        }
    }

    /// Poll pending pad events. Call once per frame.
    pub fn update(&mut self) {
        self.pressed.clear();

        #[cfg(feature = "gamepad")]
        self.poll_gilrs();
    }

    #[cfg(feature = "gamepad")]
    fn poll_gilrs(&mut self) {
        let Some(gilrs) = &mut self.gilrs else {
            return;
        };
        let events: Vec<_> = std::iter::from_fn(|| gilrs.next_event()).collect();

        for event in events {
            match event.event {
                EventType::ButtonPressed(btn, _) => {
                    self.connected = true;
                    self.set_button(btn, true);
                }
                EventType::ButtonReleased(btn, _) => self.set_button(btn, false),
                EventType::AxisChanged(Axis::LeftStickX, value, _) => self.stick_x = value,
                EventType::AxisChanged(Axis::LeftStickY, value, _) => self.stick_y = value,
                EventType::Connected => {
                    log::info!("gamepad connected");
                    self.connected = true;
                }
                EventType::Disconnected => {
                    log::info!("gamepad disconnected");
                    self.connected = false;
                    self.release_all();
                }
                _ => {}
            }
        }
    }

    #[cfg(feature = "gamepad")]
    fn set_button(&mut self, button: Button, held: bool) {
        let direction = match button {
            Button::DPadUp => Some(Action::Up),
            Button::DPadDown => Some(Action::Down),
            Button::DPadLeft => Some(Action::Left),
            Button::DPadRight => Some(Action::Right),
            _ => None,
        };
        if let Some(action) = direction {
            self.dpad.set(action, held);
        } else if held {
            self.pressed.extend(Btn::from_gilrs(button));
        }
    }

    #[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
    fn release_all(&mut self) {
        for action in [Action::Left, Action::Right, Action::Up, Action::Down] {
            self.dpad.set(action, false);
        }
        self.stick_x = 0.0;
        self.stick_y = 0.0;
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// D-pad and stick directions, as simulation input.
    pub fn sample(&self) -> InputState {
        self.dpad.merge(stick_input(self.stick_x, self.stick_y))
    }

    fn any_pressed(&self, btns: &[Btn]) -> bool {
        self.pressed.iter().any(|b| btns.contains(b))
    }

    pub fn restart_pressed(&self) -> bool {
        self.any_pressed(&self.map.restart)
    }

    pub fn quit_pressed(&self) -> bool {
        self.any_pressed(&self.map.quit)
    }
}
