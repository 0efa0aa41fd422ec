//! Roll/settle state machine
//!
//! `RollController` knows nothing about ECS or Rapier: `trigger` decides the
//! throw and `settle` decides when the throw is over. The systems in
//! `systems::dice` apply those decisions to the die entity.

use std::f32::consts::TAU;

use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::dice3d::face::resolve_face;
use crate::dice3d::types::{DiceParams, RollState, SETTLE_THRESHOLD, SPAWN_POINT};

/// Torque components are `(u - 0.5) * TORQUE_SCALE * rotation_speed`.
pub const TORQUE_SCALE: f32 = 5.0;

/// Everything a throw does to the die body.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ThrowPlan {
    pub position: Vec3,
    pub rotation: Quat,
    /// Applied once at the center of mass.
    pub impulse: Vec3,
    /// Acts for a single physics step.
    pub torque: Vec3,
}

impl ThrowPlan {
    /// Spawn point, random orientation, random impulse and torque.
    ///
    /// The orientation composes three independent uniform angles as XYZ
    /// Euler angles, which is not uniform over all rotations.
    pub fn random<R: Rng + ?Sized>(params: &DiceParams, rng: &mut R) -> Self {
        let rotation = Quat::from_euler(
            EulerRot::XYZ,
            rng.gen_range(0.0..TAU),
            rng.gen_range(0.0..TAU),
            rng.gen_range(0.0..TAU),
        );

        let force = params.throw_force;
        let impulse = Vec3::new(
            (rng.gen::<f32>() * 2.0 - 1.0) * force,
            force,
            (rng.gen::<f32>() * 2.0 - 1.0) * force,
        );

        let spin = TORQUE_SCALE * params.rotation_speed;
        let torque = Vec3::new(
            (rng.gen::<f32>() - 0.5) * spin,
            (rng.gen::<f32>() - 0.5) * spin,
            (rng.gen::<f32>() - 0.5) * spin,
        );

        Self {
            position: SPAWN_POINT,
            rotation,
            impulse,
            torque,
        }
    }
}

/// True when both speeds are under the settle threshold.
pub fn is_settled(linvel: Vec3, angvel: Vec3) -> bool {
    linvel.length() < SETTLE_THRESHOLD && angvel.length() < SETTLE_THRESHOLD
}

/// Owns the roll state. At most one roll is in flight.
#[derive(Resource, Debug, Default)]
pub struct RollController {
    state: RollState,
}

impl RollController {
    pub fn state(&self) -> RollState {
        self.state
    }

    pub fn is_rolling(&self) -> bool {
        self.state == RollState::Rolling
    }

    /// Start a roll. Returns `None` and changes nothing while rolling.
    pub fn trigger<R: Rng + ?Sized>(
        &mut self,
        params: &DiceParams,
        rng: &mut R,
    ) -> Option<ThrowPlan> {
        if self.is_rolling() {
            return None;
        }
        self.state = RollState::Rolling;
        Some(ThrowPlan::random(params, rng))
    }

    /// Feed one frame's body state. Returns the top face on the frame the
    /// roll settles, `None` otherwise (including every frame while idle).
    pub fn settle(&mut self, linvel: Vec3, angvel: Vec3, rotation: Quat) -> Option<u32> {
        if !self.is_rolling() || !is_settled(linvel, angvel) {
            return None;
        }
        self.state = RollState::Idle;
        Some(resolve_face(rotation))
    }
}

/// Source of randomness for throws. Seedable so tests are reproducible.
#[derive(Resource)]
pub struct RollRng(pub StdRng);

impl RollRng {
    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

impl Default for RollRng {
    fn default() -> Self {
        Self(StdRng::from_entropy())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trigger_is_guarded_while_rolling() {
        let mut controller = RollController::default();
        let mut rng = StdRng::seed_from_u64(7);
        let params = DiceParams::default();

        assert!(controller.trigger(&params, &mut rng).is_some());
        assert_eq!(controller.state(), RollState::Rolling);

        for _ in 0..5 {
            assert!(controller.trigger(&params, &mut rng).is_none());
            assert_eq!(controller.state(), RollState::Rolling);
        }
    }

    #[test]
    fn test_throw_plan_ranges() {
        let mut rng = StdRng::seed_from_u64(42);
        let params = DiceParams {
            throw_force: 3.0,
            rotation_speed: 2.0,
            ..Default::default()
        };

        for _ in 0..200 {
            let plan = ThrowPlan::random(&params, &mut rng);
            assert_eq!(plan.position, SPAWN_POINT);
            assert!(plan.rotation.is_normalized());
            assert_eq!(plan.impulse.y, 3.0);
            assert!(plan.impulse.x.abs() <= 3.0);
            assert!(plan.impulse.z.abs() <= 3.0);
            let half_spin = TORQUE_SCALE * 2.0 / 2.0;
            assert!(plan.torque.abs().max_element() <= half_spin);
        }
    }

    #[test]
    fn test_settle_requires_both_speeds() {
        let mut controller = RollController::default();
        let mut rng = StdRng::seed_from_u64(1);
        controller.trigger(&DiceParams::default(), &mut rng);

        let slow = Vec3::splat(0.01);
        let fast = Vec3::new(0.5, 0.0, 0.0);
        assert_eq!(controller.settle(fast, slow, Quat::IDENTITY), None);
        assert_eq!(controller.settle(slow, fast, Quat::IDENTITY), None);
        assert!(controller.is_rolling());

        assert_eq!(controller.settle(slow, slow, Quat::IDENTITY), Some(2));
        assert_eq!(controller.state(), RollState::Idle);

        // Already idle: nothing more to report.
        assert_eq!(controller.settle(slow, slow, Quat::IDENTITY), None);
    }

    #[test]
    fn test_threshold_is_strict() {
        assert!(!is_settled(Vec3::new(SETTLE_THRESHOLD, 0.0, 0.0), Vec3::ZERO));
        assert!(is_settled(Vec3::new(0.099, 0.0, 0.0), Vec3::new(0.0, 0.0, 0.099)));
    }

    #[test]
    fn test_seeded_rng_repeats() {
        let params = DiceParams::default();
        let a = ThrowPlan::random(&params, &mut RollRng::seeded(3).0);
        let b = ThrowPlan::random(&params, &mut RollRng::seeded(3).0);
        assert_eq!(a, b);
    }
}
