//! Camera-related types and components
//!
//! This module contains the main camera marker and the trailing-camera
//! constants.

use bevy::prelude::*;

/// Marker component for the main 3D camera
#[derive(Component)]
pub struct MainCamera;

/// Where the camera wants to sit relative to the die.
pub const CAMERA_OFFSET: Vec3 = Vec3::new(0.0, 5.0, 5.0);

/// Per-frame exponential smoothing factor toward the target position.
/// Applied once per frame, so the trailing speed depends on the frame rate.
pub const CAMERA_FOLLOW_BLEND: f32 = 0.05;

pub const CAMERA_FOV_DEGREES: f32 = 75.0;
pub const CAMERA_NEAR: f32 = 0.1;
pub const CAMERA_FAR: f32 = 1000.0;
