/// Frame input: which logical actions are held this frame.
///
/// Built fresh every frame by the input collaborators (keyboard, gamepad)
/// and handed to the simulation by value. The simulation never reads keys
/// itself.

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum Action {
    Left,
    Right,
    Up,
    Down,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct InputState {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
}

impl InputState {
    /// Input with exactly the given actions held.
    pub fn holding(actions: &[Action]) -> Self {
        let mut input = InputState::default();
        for &action in actions {
            input.set(action, true);
        }
        input
    }

    pub fn is_held(&self, action: Action) -> bool {
        match action {
            Action::Left => self.left,
            Action::Right => self.right,
            Action::Up => self.up,
            Action::Down => self.down,
        }
    }

    pub fn set(&mut self, action: Action, held: bool) {
        match action {
            Action::Left => self.left = held,
            Action::Right => self.right = held,
            Action::Up => self.up = held,
            Action::Down => self.down = held,
        }
    }

    /// Combine two sources (keyboard + gamepad): held on either counts.
    pub fn merge(self, other: InputState) -> InputState {
        InputState {
            left: self.left || other.left,
            right: self.right || other.right,
            up: self.up || other.up,
            down: self.down || other.down,
        }
    }
}
