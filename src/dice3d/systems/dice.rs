//! Throw and settle systems
//!
//! This module applies the controller's decisions to the die entity:
//! throwing on request and publishing the result once the die is at rest.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use crate::dice3d::controller::{RollController, RollRng};
use crate::dice3d::session::FIXED_DT;
use crate::dice3d::types::*;

/// Consume roll requests and throw the die.
///
/// Requests that arrive while a roll is in flight are dropped by the
/// controller without touching the body.
pub fn handle_roll_requests(
    mut requests: MessageReader<RollRequested>,
    mut controller: ResMut<RollController>,
    mut rng: ResMut<RollRng>,
    params: Res<DiceParams>,
    mut status: ResMut<StatusMessage>,
    mut die_query: Query<(&mut Transform, &mut ExternalImpulse), With<Die>>,
) {
    for _ in requests.read() {
        let Ok((mut transform, mut external)) = die_query.single_mut() else {
            warn!("Roll requested but there is no die");
            return;
        };

        let Some(plan) = controller.trigger(&params, &mut rng.0) else {
            debug!("Roll already in flight, ignoring request");
            continue;
        };

        transform.translation = plan.position;
        transform.rotation = plan.rotation;
        external.impulse += plan.impulse;
        // The torque acts for exactly one step, which is an impulse of torque * dt.
        external.torque_impulse += plan.torque * FIXED_DT;

        *status = StatusMessage::Rolling;
        info!(
            "Throwing die: impulse {:.2}, torque {:.2}",
            plan.impulse, plan.torque
        );
    }
}

/// Watch the die while rolling and publish the top face once it is at rest.
pub fn check_die_settled(
    mut controller: ResMut<RollController>,
    mut history: ResMut<RollHistory>,
    mut status: ResMut<StatusMessage>,
    mut completed: MessageWriter<RollCompleted>,
    die_query: Query<(&Velocity, &Transform), With<Die>>,
) {
    if !controller.is_rolling() {
        return;
    }
    let Ok((velocity, transform)) = die_query.single() else {
        return;
    };

    if let Some(value) = controller.settle(velocity.linvel, velocity.angvel, transform.rotation)
    {
        history.record(value);
        *status = StatusMessage::TapToRollAgain;
        completed.write(RollCompleted { value });
        info!("Die settled showing {}", value);
    }
}

/// Throw once at startup so the scene opens with a roll.
pub fn request_initial_roll(mut requests: MessageWriter<RollRequested>) {
    requests.write(RollRequested);
}
