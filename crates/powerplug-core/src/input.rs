use serde::{Deserialize, Serialize};

/// Held-input flags for one tick, sampled by the input collaborator before
/// the physics step runs.
///
/// Flags are level-triggered: `jump` means "the jump control is held this
/// tick", not "a press happened". Edge detection is the engine's job (the
/// jump buffer), so callers can forward raw key state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputState {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
}

impl InputState {
    /// Nothing held.
    pub const NONE: Self = Self {
        left: false,
        right: false,
        jump: false,
    };

    pub const fn new(left: bool, right: bool, jump: bool) -> Self {
        Self { left, right, jump }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_idle() {
        assert_eq!(InputState::default(), InputState::NONE);
    }

    #[test]
    fn serde_round_trip() {
        let input = InputState::new(false, true, true);
        let json = serde_json::to_string(&input).unwrap();
        let back: InputState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, input);
    }
}
