//! Systems module for the die roller
//!
//! This module contains all the Bevy systems, organized into submodules by
//! functionality:
//!
//! - `setup`: Scene initialization (camera, lights, ground, walls, die)
//! - `dice`: Throwing on request and publishing settled results
//! - `camera`: Trailing camera and viewport resize
//! - `input`: Pointer and keyboard input
//! - `ground`: Ground texture regeneration
//! - `ui`: Control panel, status line and history
//! - `color_picker`: HSV picker for the ground colors

mod camera;
pub mod color_picker;
mod dice;
pub mod ground;
mod input;
mod setup;
mod ui;

// Re-export all public systems
pub use camera::{apply_viewport_resize, follow_die, handle_window_resize, trail_camera};
pub use color_picker::{
    handle_color_picker_interactions, handle_color_swatch_clicks, setup_color_wheel_texture,
    spawn_color_picker_ui, update_color_picker_preview, ColorPickerState,
};
pub use dice::{check_die_settled, handle_roll_requests, request_initial_roll};
pub use ground::{apply_ground_appearance, build_ground_image, GroundAppearance};
pub use input::{handle_keyboard_input, handle_pointer_input};
pub use setup::{get_label_rotation, setup};
pub use ui::{
    handle_param_sliders, handle_roll_button, setup_ui, sync_history, sync_param_texts,
    sync_status_text,
};
