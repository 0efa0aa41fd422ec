// Hide console window on Windows for release builds (GUI app).
#![cfg_attr(all(windows, not(debug_assertions)), windows_subsystem = "windows")]

use bevy::prelude::*;
use bevy_material_ui::prelude::*;

use physical_die::dice3d::{DiceParams, DieRollerPlugin, PARAMS_ENV_VAR};

fn primary_window() -> Window {
    #[cfg(target_arch = "wasm32")]
    {
        Window {
            title: "Physical Die Roller".to_string(),
            canvas: Some("#bg".to_string()),
            fit_canvas_to_parent: true,
            prevent_default_event_handling: false,
            ..default()
        }
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        Window {
            title: "Physical Die Roller".to_string(),
            resolution: (1280u32, 720u32).into(),
            ..default()
        }
    }
}

fn main() {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();

    // Logging is not up yet; report a bad override once the app runs.
    let (params, params_error) = match DiceParams::from_env() {
        Ok(params) => (params, None),
        Err(err) => (DiceParams::default(), Some(err)),
    };

    App::new()
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(primary_window()),
                    ..default()
                })
                .set(bevy::log::LogPlugin {
                    level: bevy::log::Level::INFO,
                    // Keep app logs at info, but silence bevy_material_ui scroll spam.
                    filter: "info,wgpu=error,naga=warn,bevy_material_ui=warn,bevy_material_ui::scroll=off"
                        .to_string(),
                    ..default()
                }),
        )
        .add_plugins(MaterialUiPlugin)
        .insert_resource(params)
        .add_plugins(DieRollerPlugin)
        .add_systems(Startup, move || {
            if let Some(err) = &params_error {
                warn!("Ignoring {}: {}", PARAMS_ENV_VAR, err);
            }
        })
        .run();
}
