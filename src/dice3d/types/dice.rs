//! Die-related types and components
//!
//! This module contains the die marker, the fixed face table, the roll
//! state, the result history and the messages exchanged between the input,
//! controller and presentation systems.

use std::collections::VecDeque;

use bevy::prelude::*;

/// The die is a unit cube.
pub const DIE_HALF_EXTENT: f32 = 0.5;

pub const DIE_MASS: f32 = 1.0;

/// Angular speed keeps 20% of itself per second of free spin.
///
/// Rapier scales velocity by `1 / (1 + dt * c)` every step, which over one
/// second tends to `exp(-c)`, so the coefficient is `-ln(0.2)`.
pub const DIE_ANGULAR_DAMPING: f32 = 1.609_438;

/// Linear speed keeps 99% of itself per second: `-ln(0.99)`.
pub const DIE_LINEAR_DAMPING: f32 = 0.010_050_34;

/// Every throw starts from here, above the floor.
pub const SPAWN_POINT: Vec3 = Vec3::new(0.0, 2.0, 0.0);

/// Both linear and angular speed must be below this in the same frame
/// for the die to count as settled.
pub const SETTLE_THRESHOLD: f32 = 0.1;

/// Outward face normals in the die's local frame and the value printed on
/// that face. Opposite faces sum to 7.
///
/// Table order is the tie-break order of the face resolver.
pub const D6_FACE_NORMALS: [(Vec3, u32); 6] = [
    (Vec3::Z, 1),
    (Vec3::NEG_Z, 6),
    (Vec3::Y, 2),
    (Vec3::NEG_Y, 5),
    (Vec3::X, 3),
    (Vec3::NEG_X, 4),
];

/// Marker for the single die rigid body.
#[derive(Component)]
pub struct Die;

/// Textured quad glued to one face of the die.
#[derive(Component)]
pub struct DieFaceLabel {
    pub value: u32,
}

/// Whether a throw is in flight.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RollState {
    #[default]
    Idle,
    Rolling,
}

/// Settled results, most recent first. Entries are only ever prepended.
#[derive(Resource, Default, Debug)]
pub struct RollHistory {
    entries: VecDeque<u32>,
}

impl RollHistory {
    pub fn record(&mut self, value: u32) {
        self.entries.push_front(value);
    }

    pub fn last(&self) -> Option<u32> {
        self.entries.front().copied()
    }

    pub fn entries(&self) -> impl Iterator<Item = u32> + '_ {
        self.entries.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Text for the read-only "Last Roll" display.
    pub fn last_label(&self) -> String {
        match self.last() {
            Some(value) => value.to_string(),
            None => String::from("N/A"),
        }
    }
}

/// The status line shown over the scene.
#[derive(Resource, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StatusMessage {
    #[default]
    TapToRoll,
    Rolling,
    TapToRollAgain,
}

impl StatusMessage {
    pub fn text(&self) -> &'static str {
        match self {
            StatusMessage::TapToRoll => "Tap to roll",
            StatusMessage::Rolling => "Rolling...",
            StatusMessage::TapToRollAgain => "Tap to roll again",
        }
    }
}

/// Asks the controller to throw the die. Ignored while a roll is in flight.
#[derive(Message, Clone, Copy, Debug, Default)]
pub struct RollRequested;

/// Fired once per throw, when the die has settled and its top face is known.
#[derive(Message, Clone, Copy, Debug)]
pub struct RollCompleted {
    pub value: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_face_table_opposites_sum_to_seven() {
        for (normal, value) in D6_FACE_NORMALS {
            let opposite = D6_FACE_NORMALS
                .iter()
                .find(|(n, _)| *n == -normal)
                .map(|(_, v)| *v);
            assert_eq!(opposite, Some(7 - value), "face {value} has no opposite");
        }
    }

    /// Speed left after one second of fixed steps under Rapier's damping.
    fn retained_after_one_second(coefficient: f32) -> f32 {
        use crate::dice3d::session::FIXED_DT;
        let steps = (1.0 / FIXED_DT).round() as i32;
        (1.0 / (1.0 + FIXED_DT * coefficient)).powi(steps)
    }

    #[test]
    fn test_damping_matches_per_second_decay() {
        assert!((retained_after_one_second(DIE_ANGULAR_DAMPING) - 0.2).abs() < 0.01);
        assert!((retained_after_one_second(DIE_LINEAR_DAMPING) - 0.99).abs() < 0.001);
    }

    #[test]
    fn test_face_table_covers_one_to_six() {
        let mut values: Vec<u32> = D6_FACE_NORMALS.iter().map(|(_, v)| *v).collect();
        values.sort();
        assert_eq!(values, vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_history_prepends() {
        let mut history = RollHistory::default();
        assert!(history.is_empty());
        assert_eq!(history.last_label(), "N/A");

        history.record(4);
        history.record(2);
        history.record(6);

        assert_eq!(history.len(), 3);
        assert_eq!(history.last(), Some(6));
        assert_eq!(history.entries().collect::<Vec<_>>(), vec![6, 2, 4]);
        assert_eq!(history.last_label(), "6");
    }

    #[test]
    fn test_roll_state_default() {
        assert_eq!(RollState::default(), RollState::Idle);
        assert_eq!(StatusMessage::default().text(), "Tap to roll");
    }
}
