//! App wiring
//!
//! `DieRollCorePlugin` holds the roll state machine and needs nothing but
//! the ECS, so it also runs headless under `MinimalPlugins`.
//! `DieRollerPlugin` adds physics, the scene, the camera and the UI on top;
//! it expects `MaterialUiPlugin` to be present for the control panel.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use crate::dice3d::controller::{RollController, RollRng};
use crate::dice3d::session::{configure_gravity, end_session, physics_timestep, EndSession};
use crate::dice3d::systems::*;
use crate::dice3d::types::*;
use crate::dice3d::world::ContactMaterials;

pub struct DieRollCorePlugin;

impl Plugin for DieRollCorePlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<RollRequested>()
            .add_message::<RollCompleted>()
            .add_message::<ParamsChanged>()
            .add_message::<EndSession>()
            .init_resource::<DiceParams>()
            .init_resource::<RollController>()
            .init_resource::<RollRng>()
            .init_resource::<RollHistory>()
            .init_resource::<StatusMessage>()
            // Settle check first: it sees the velocities of the last physics
            // step, so a throw issued this frame is never judged before its
            // impulse has been applied.
            .add_systems(Update, (check_die_settled, handle_roll_requests).chain())
            .add_systems(Update, end_session);
    }
}

pub struct DieRollerPlugin;

impl Plugin for DieRollerPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(DieRollCorePlugin)
            .add_plugins(RapierPhysicsPlugin::<NoUserData>::default())
            .insert_resource(physics_timestep())
            .init_resource::<ContactMaterials>()
            .init_resource::<GroundAppearance>()
            .init_resource::<ColorPickerState>()
            .add_systems(
                Startup,
                (setup, setup_ui, setup_color_wheel_texture, request_initial_roll),
            )
            .add_systems(Update, configure_gravity)
            .add_systems(
                Update,
                (
                    handle_pointer_input,
                    handle_keyboard_input,
                    handle_roll_button,
                )
                    .before(handle_roll_requests),
            )
            .add_systems(
                Update,
                (
                    handle_color_swatch_clicks,
                    spawn_color_picker_ui,
                    handle_color_picker_interactions,
                    update_color_picker_preview,
                )
                    .chain(),
            )
            .add_systems(
                Update,
                (
                    apply_ground_appearance
                        .after(handle_param_sliders)
                        .after(handle_color_picker_interactions),
                    handle_param_sliders,
                    follow_die,
                    handle_window_resize,
                ),
            )
            .add_systems(
                Update,
                (
                    sync_status_text,
                    sync_param_texts
                        .after(handle_param_sliders)
                        .after(handle_color_picker_interactions),
                    sync_history,
                )
                    .after(handle_roll_requests),
            );
    }
}
