//! Held-key input.
//!
//! Key presses are conflated into a "currently held" structure that the
//! session samples once per tick.  Several presses of the same key between
//! two ticks count once.

use crate::player::FiringMode;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// Negative is up / left, positive is down / right.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Negative,
    Positive,
}

/// Discrete commands the presentation layer can issue.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputCommand {
    Move { axis: Axis, direction: Direction, held: bool },
    Fire { held: bool },
    SetFiringMode(FiringMode),
    SetBoost(bool),
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HeldInputs {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub fire: bool,
    pub boost: bool,
    pub mode: Option<FiringMode>,
}

impl HeldInputs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, command: InputCommand) {
        match command {
            InputCommand::Move { axis, direction, held } => match (axis, direction) {
                (Axis::Vertical, Direction::Negative) => self.up = held,
                (Axis::Vertical, Direction::Positive) => self.down = held,
                (Axis::Horizontal, Direction::Negative) => self.left = held,
                (Axis::Horizontal, Direction::Positive) => self.right = held,
            },
            InputCommand::Fire { held } => self.fire = held,
            InputCommand::SetFiringMode(mode) => self.mode = Some(mode),
            InputCommand::SetBoost(active) => self.boost = active,
        }
    }

    /// Vertical intent: up wins over down.
    pub fn vertical(&self) -> i8 {
        if self.up {
            -1
        } else if self.down {
            1
        } else {
            0
        }
    }

    /// Horizontal intent: left wins over right.
    pub fn horizontal(&self) -> i8 {
        if self.left {
            -1
        } else if self.right {
            1
        } else {
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_and_release() {
        let mut held = HeldInputs::new();
        held.apply(InputCommand::Move { axis: Axis::Horizontal, direction: Direction::Positive, held: true });
        assert_eq!(held.horizontal(), 1);
        held.apply(InputCommand::Move { axis: Axis::Horizontal, direction: Direction::Positive, held: false });
        assert_eq!(held.horizontal(), 0);
    }

    #[test]
    fn repeated_presses_conflate() {
        let mut held = HeldInputs::new();
        held.apply(InputCommand::Fire { held: true });
        held.apply(InputCommand::Fire { held: true });
        assert!(held.fire);
        held.apply(InputCommand::SetFiringMode(FiringMode::Spread));
        held.apply(InputCommand::SetFiringMode(FiringMode::Heavy));
        assert_eq!(held.mode, Some(FiringMode::Heavy));
    }

    #[test]
    fn fire_and_boost_release() {
        let mut held = HeldInputs::new();
        held.apply(InputCommand::Fire { held: true });
        held.apply(InputCommand::SetBoost(true));
        assert!(held.fire && held.boost);
        held.apply(InputCommand::Fire { held: false });
        held.apply(InputCommand::SetBoost(false));
        assert!(!held.fire && !held.boost);
    }

    #[test]
    fn up_and_left_win_ties() {
        let held = HeldInputs { up: true, down: true, left: true, right: true, ..HeldInputs::new() };
        assert_eq!((held.horizontal(), held.vertical()), (-1, -1));
    }
}
