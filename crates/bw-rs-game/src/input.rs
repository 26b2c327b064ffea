//! Per-frame input intents supplied by the embedding driver.
//!
//! The simulation is agnostic to how these are captured; a driver maps
//! keyboard/mouse (or a script, or a test) to one `FrameInput` per step.

use bw_rs_world::item_registry::ItemId;

/// Requested horizontal movement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MoveDir {
    #[default]
    None,
    Left,
    Right,
}

impl MoveDir {
    /// Signed direction: `-1.0`, `0.0`, or `1.0`.
    pub fn sign(self) -> f32 {
        match self {
            MoveDir::None => 0.0,
            MoveDir::Left => -1.0,
            MoveDir::Right => 1.0,
        }
    }
}

/// Discrete intents for one frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameInput {
    pub move_dir: MoveDir,
    pub jump_held: bool,
    /// Continuously held mining intent aimed at `aim`.
    pub mine_held: bool,
    /// Place the selected item at `aim` this frame.
    pub place_triggered: bool,
    /// Swing melee this frame.
    pub melee_triggered: bool,
    /// Fire the bow toward `aim` this frame.
    pub shoot_triggered: bool,
    /// Aim point in world units.
    pub aim_x: f32,
    pub aim_y: f32,
    /// Item the driver has selected for placement (`0` = none).
    pub selected_item: ItemId,
}

impl FrameInput {
    /// No intents at all; useful as a base for tests and idle frames.
    pub fn idle() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn move_dir_signs() {
        assert_eq!(MoveDir::None.sign(), 0.0);
        assert_eq!(MoveDir::Left.sign(), -1.0);
        assert_eq!(MoveDir::Right.sign(), 1.0);
    }

    #[test]
    fn idle_has_no_intents() {
        let input = FrameInput::idle();
        assert_eq!(input.move_dir, MoveDir::None);
        assert!(!input.jump_held);
        assert!(!input.mine_held);
        assert!(!input.place_triggered);
        assert!(!input.melee_triggered);
        assert!(!input.shoot_triggered);
    }
}
