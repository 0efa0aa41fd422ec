//! Session lifetime and physics stepping
//!
//! The Bevy app runner is the render loop: it runs the schedule once per
//! frame until an `AppExit` is written. Ending a session is explicit: anything
//! may send `EndSession` and `end_session` turns it into `AppExit`.

use bevy::app::AppExit;
use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use crate::dice3d::world::GRAVITY;

/// Physics advances by this much every rendered frame.
pub const FIXED_DT: f32 = 1.0 / 60.0;

/// Asks the render loop to stop after the current frame.
#[derive(Message, Clone, Copy, Debug, Default)]
pub struct EndSession;

/// One physics step per frame, of fixed length.
pub fn physics_timestep() -> TimestepMode {
    TimestepMode::Fixed {
        dt: FIXED_DT,
        substeps: 1,
    }
}

pub fn end_session(mut requests: MessageReader<EndSession>, mut exit: MessageWriter<AppExit>) {
    if requests.read().last().is_some() {
        info!("Session ended");
        exit.write(AppExit::Success);
    }
}

/// Apply our gravity to the physics context once it exists.
pub fn configure_gravity(mut configs: Query<&mut RapierConfiguration, Added<RapierConfiguration>>) {
    for mut config in configs.iter_mut() {
        config.gravity = GRAVITY;
    }
}
