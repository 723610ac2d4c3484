use bevy_ecs::{resource::Resource, system::ResMut};
use bitflags::bitflags;
use strum_macros::{EnumIter, EnumString, IntoStaticStr};

use crate::systems::components::Facing;

/// Keys the simulation reacts to, named after the browser `KeyboardEvent.key` values they come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, EnumIter, IntoStaticStr)]
#[strum(ascii_case_insensitive)]
pub enum Key {
    #[strum(serialize = "ArrowLeft")]
    Left,
    #[strum(serialize = "ArrowRight")]
    Right,
    #[strum(serialize = "ArrowUp")]
    Jump,
    #[strum(serialize = "ArrowDown")]
    Drop,
    #[strum(serialize = "a")]
    Attack,
    #[strum(serialize = " ")]
    Dash,
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Keys: u8 {
        const LEFT = 1 << 0;
        const RIGHT = 1 << 1;
        const JUMP = 1 << 2;
        const DROP = 1 << 3;
        const ATTACK = 1 << 4;
        const DASH = 1 << 5;
    }
}

impl From<Key> for Keys {
    fn from(key: Key) -> Self {
        match key {
            Key::Left => Keys::LEFT,
            Key::Right => Keys::RIGHT,
            Key::Jump => Keys::JUMP,
            Key::Drop => Keys::DROP,
            Key::Attack => Keys::ATTACK,
            Key::Dash => Keys::DASH,
        }
    }
}

/// Latched keyboard state between two ticks.
///
/// `held` mirrors the physical key table. `pressed` and `released` collect transitions since the
/// last tick; auto-repeated key-downs of an already held key do not count as a new press, so a
/// held key can never re-trigger an edge action.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct InputLatch {
    held: Keys,
    pressed: Keys,
    released: Keys,
}

impl InputLatch {
    pub fn key_down(&mut self, key: Key) {
        let flag = Keys::from(key);
        if !self.held.contains(flag) {
            self.pressed |= flag;
        }
        self.held |= flag;
    }

    pub fn key_up(&mut self, key: Key) {
        let flag = Keys::from(key);
        if self.held.contains(flag) {
            self.released |= flag;
        }
        self.held.remove(flag);
    }

    pub fn held(&self, key: Key) -> bool {
        self.held.contains(Keys::from(key))
    }

    /// Whether `key` went down since the last tick.
    pub fn pressed(&self, key: Key) -> bool {
        self.pressed.contains(Keys::from(key))
    }

    pub fn released(&self, key: Key) -> bool {
        self.released.contains(Keys::from(key))
    }

    /// Held now, or tapped at some point since the last tick.
    pub fn engaged(&self, key: Key) -> bool {
        self.held(key) || self.pressed(key)
    }

    /// Requested horizontal direction. Right wins when both arrows are held.
    pub fn horizontal(&self) -> Option<Facing> {
        if self.held(Key::Right) {
            Some(Facing::Right)
        } else if self.held(Key::Left) {
            Some(Facing::Left)
        } else {
            None
        }
    }

    pub fn clear_edges(&mut self) {
        self.pressed = Keys::empty();
        self.released = Keys::empty();
    }
}

/// Drops the press/release edges consumed by this tick.
pub fn clear_input_edges_system(mut latch: ResMut<InputLatch>) {
    latch.clear_edges();
}
