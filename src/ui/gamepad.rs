/// Gamepad input tracker using gilrs.
///
/// Button mapping is loaded from config.toml via `load_button_config()`.
/// Default mapping:
///   D-pad / Left Stick    →  Steer (one step per press, repeats while held)
///   Start / A             →  Start
///   Y                     →  Mute
///   Select                →  Quit

use std::time::{Duration, Instant};

#[cfg(feature = "gamepad")]
use gilrs::{Axis, Button, EventType, Gilrs};

use crate::config::GamepadConfig;
use crate::domain::entity::Direction;

const STICK_DEADZONE: f32 = 0.25;

/// Delay before a held direction starts repeating, then the repeat period.
const REPEAT_DELAY: Duration = Duration::from_millis(220);
const REPEAT_RATE: Duration = Duration::from_millis(110);

/// Logical button identifiers (one per physical button).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Btn {
    A,       // South
    B,       // East
    X,       // West
    Y,       // North
    L1,      // LeftTrigger
    R1,      // RightTrigger
    Start,
    Select,
}

impl Btn {
    fn from_name(s: &str) -> Option<Btn> {
        match s.to_uppercase().as_str() {
            "A" | "SOUTH"  => Some(Btn::A),
            "B" | "EAST"   => Some(Btn::B),
            "X" | "WEST"   => Some(Btn::X),
            "Y" | "NORTH"  => Some(Btn::Y),
            "L1" | "LB" | "LEFTTRIGGER"  => Some(Btn::L1),
            "R1" | "RB" | "RIGHTTRIGGER" => Some(Btn::R1),
            "START" => Some(Btn::Start),
            "SELECT" | "BACK" => Some(Btn::Select),
            _ => None,
        }
    }

    #[cfg(feature = "gamepad")]
    fn from_gilrs(btn: Button) -> Option<Btn> {
        match btn {
            Button::South     => Some(Btn::A),
            Button::East      => Some(Btn::B),
            Button::West      => Some(Btn::X),
            Button::North     => Some(Btn::Y),
            Button::LeftTrigger  => Some(Btn::L1),
            Button::RightTrigger => Some(Btn::R1),
            Button::Start     => Some(Btn::Start),
            Button::Select    => Some(Btn::Select),
            _ => None,
        }
    }
}

/// Per-button state: held (continuous) and just_pressed (edge).
#[derive(Clone, Copy, Debug, Default)]
struct BtnState {
    held: bool,
    just_pressed: bool,
}

impl BtnState {
    fn set(&mut self, held: bool) {
        if held && !self.held {
            self.just_pressed = true;
        }
        self.held = held;
    }
}

/// One steering direction, fed by both the d-pad and the stick.
#[derive(Clone, Copy, Debug, Default)]
struct DirState {
    dpad: BtnState,
    stick: BtnState,
    next_repeat: Option<Instant>,
}

impl DirState {
    fn held(&self) -> bool {
        self.dpad.held || self.stick.held
    }

    fn just_pressed(&self) -> bool {
        self.dpad.just_pressed || self.stick.just_pressed
    }
}

/// Action-to-button mapping (loaded from config).
struct ActionMap {
    start: Vec<Btn>,
    mute: Vec<Btn>,
    quit: Vec<Btn>,
}

impl Default for ActionMap {
    fn default() -> Self {
        ActionMap {
            start: vec![Btn::Start, Btn::A],
            mute:  vec![Btn::Y],
            quit:  vec![Btn::Select],
        }
    }
}

pub struct GamepadState {
    #[cfg(feature = "gamepad")]
    gilrs: Option<Gilrs>,

    // All tracked buttons (indexed by Btn)
    buttons: [BtnState; 8],

    // Steering, indexed by Direction
    dirs: [DirState; 4],

    stick_x: f32,
    stick_y: f32,

    // Action mapping
    action_map: ActionMap,

    pub connected: bool,
}

fn btn_index(btn: Btn) -> usize {
    btn as usize
}

fn dir_index(dir: Direction) -> usize {
    dir as usize
}

impl GamepadState {
    pub fn new() -> Self {
        #[cfg(feature = "gamepad")]
        let (gilrs_opt, connected) = {
            match Gilrs::new() {
                Ok(g) => {
                    let has_pad = g.gamepads().next().is_some();
                    (Some(g), has_pad)
                }
                Err(e) => {
                    tracing::warn!("gamepad support unavailable: {e}");
                    (None, false)
                }
            }
        };
        #[cfg(not(feature = "gamepad"))]
        let connected = false;

        GamepadState {
            #[cfg(feature = "gamepad")]
            gilrs: gilrs_opt,
            buttons: [BtnState::default(); 8],
            dirs: [DirState::default(); 4],
            stick_x: 0.0,
            stick_y: 0.0,
            action_map: ActionMap::default(),
            connected,
        }
    }

    /// Load button mapping from config. Empty or unknown lists keep the default.
    pub fn load_button_config(&mut self, cfg: &GamepadConfig) {
        fn parse_list(names: &[String]) -> Vec<Btn> {
            names.iter().filter_map(|s| Btn::from_name(s)).collect()
        }
        let map = &mut self.action_map;
        let st = parse_list(&cfg.start);
        if !st.is_empty() { map.start = st; }
        let mu = parse_list(&cfg.mute);
        if !mu.is_empty() { map.mute = mu; }
        let qu = parse_list(&cfg.quit);
        if !qu.is_empty() { map.quit = qu; }
    }

    pub fn update(&mut self) {
        self.clear_just_pressed();

        #[cfg(feature = "gamepad")]
        self.poll_gilrs();
    }

    #[cfg(feature = "gamepad")]
    fn poll_gilrs(&mut self) {
        let gilrs = match &mut self.gilrs {
            Some(g) => g,
            None => return,
        };

        let events: Vec<_> = std::iter::from_fn(|| gilrs.next_event()).collect();

        for event in events {
            match event.event {
                EventType::ButtonPressed(btn, _) => {
                    self.connected = true;
                    self.set_button(btn, true);
                }
                EventType::ButtonReleased(btn, _) => {
                    self.connected = true;
                    self.set_button(btn, false);
                }
                EventType::AxisChanged(axis, value, _) => {
                    self.connected = true;
                    self.update_axis(axis, value);
                }
                EventType::Connected => {
                    self.connected = true;
                    tracing::info!("gamepad connected");
                }
                EventType::Disconnected => {
                    self.connected = false;
                    self.release_all();
                    tracing::info!("gamepad disconnected");
                }
                _ => {}
            }
        }

        self.derive_stick();
    }

    #[cfg(feature = "gamepad")]
    fn set_button(&mut self, gilrs_btn: Button, held: bool) {
        // D-pad handled separately (not in Btn enum)
        let dir = match gilrs_btn {
            Button::DPadUp    => Some(Direction::Up),
            Button::DPadDown  => Some(Direction::Down),
            Button::DPadLeft  => Some(Direction::Left),
            Button::DPadRight => Some(Direction::Right),
            _ => None,
        };
        if let Some(d) = dir {
            self.dirs[dir_index(d)].dpad.set(held);
            return;
        }

        if let Some(btn) = Btn::from_gilrs(gilrs_btn) {
            self.buttons[btn_index(btn)].set(held);
        }
    }

    #[cfg(feature = "gamepad")]
    fn update_axis(&mut self, axis: Axis, value: f32) {
        match axis {
            Axis::LeftStickX => self.stick_x = value,
            Axis::LeftStickY => self.stick_y = value,
            _ => {}
        }
    }

    /// Derive stick digital states from the analog position.
    fn derive_stick(&mut self) {
        let (x, y) = (self.stick_x, self.stick_y);
        self.dirs[dir_index(Direction::Left)].stick.set(x < -STICK_DEADZONE);
        self.dirs[dir_index(Direction::Right)].stick.set(x > STICK_DEADZONE);
        self.dirs[dir_index(Direction::Up)].stick.set(y > STICK_DEADZONE);
        self.dirs[dir_index(Direction::Down)].stick.set(y < -STICK_DEADZONE);
    }

    // ── Action queries (config-driven) ──

    fn any_just_pressed(&self, btns: &[Btn]) -> bool {
        btns.iter().any(|&b| self.buttons[btn_index(b)].just_pressed)
    }

    pub fn start_pressed(&self) -> bool {
        self.any_just_pressed(&self.action_map.start)
    }
    pub fn mute_pressed(&self) -> bool {
        self.any_just_pressed(&self.action_map.mute)
    }
    pub fn quit_pressed(&self) -> bool {
        self.any_just_pressed(&self.action_map.quit)
    }

    /// Steps requested this frame: one on press, then one per repeat
    /// period while the direction stays held.
    pub fn direction_steps(&mut self, now: Instant) -> Vec<Direction> {
        let mut steps = Vec::new();
        for dir in Direction::ALL {
            let st = &mut self.dirs[dir_index(dir)];
            if st.just_pressed() {
                steps.push(dir);
                st.next_repeat = Some(now + REPEAT_DELAY);
            } else if st.held() {
                match st.next_repeat {
                    Some(due) if now >= due => {
                        steps.push(dir);
                        st.next_repeat = Some(due + REPEAT_RATE);
                    }
                    Some(_) => {}
                    None => st.next_repeat = Some(now + REPEAT_DELAY),
                }
            } else {
                st.next_repeat = None;
            }
        }
        steps
    }

    // ── Internal ──

    fn clear_just_pressed(&mut self) {
        for b in &mut self.buttons { b.just_pressed = false; }
        for d in &mut self.dirs {
            d.dpad.just_pressed = false;
            d.stick.just_pressed = false;
        }
    }

    #[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
    fn release_all(&mut self) {
        for b in &mut self.buttons { *b = BtnState::default(); }
        for d in &mut self.dirs { *d = DirState::default(); }
        self.stick_x = 0.0;
        self.stick_y = 0.0;
    }
}
