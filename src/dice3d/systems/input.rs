//! Input handling systems
//!
//! A click or tap anywhere in the scene asks for a roll; Escape ends the
//! session.

use bevy::prelude::*;

use crate::dice3d::session::EndSession;
use crate::dice3d::systems::color_picker::ColorPickerState;
use crate::dice3d::types::*;

/// Click or tap on the scene requests a roll.
///
/// Presses over the control panel or its widgets, and any press while the
/// color picker is open, belong to the UI.
pub fn handle_pointer_input(
    picker: Res<ColorPickerState>,
    mouse: Res<ButtonInput<MouseButton>>,
    touches: Res<Touches>,
    ui_query: Query<&Interaction>,
    mut requests: MessageWriter<RollRequested>,
) {
    if picker.active {
        return;
    }

    let pressed = mouse.just_pressed(MouseButton::Left) || touches.any_just_pressed();
    if !pressed {
        return;
    }

    let over_ui = ui_query
        .iter()
        .any(|interaction| *interaction != Interaction::None);
    if over_ui {
        return;
    }

    requests.write(RollRequested);
}

/// Escape ends the session.
pub fn handle_keyboard_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut end: MessageWriter<EndSession>,
) {
    if keyboard.just_pressed(KeyCode::Escape) {
        end.write(EndSession);
    }
}
