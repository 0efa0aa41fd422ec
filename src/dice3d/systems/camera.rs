//! Camera systems
//!
//! This module contains the trailing camera that follows the die and the
//! viewport resize handling.

use bevy::prelude::*;
use bevy::window::WindowResized;

use crate::dice3d::types::*;

/// Move the camera a fixed fraction toward `die + CAMERA_OFFSET` and aim it
/// at the die.
pub fn trail_camera(camera: &mut Transform, die_position: Vec3) {
    let target = die_position + CAMERA_OFFSET;
    camera.translation = camera.translation.lerp(target, CAMERA_FOLLOW_BLEND);
    camera.look_at(die_position, Vec3::Y);
}

/// Match the perspective aspect ratio to a new viewport size.
pub fn apply_viewport_resize(projection: &mut Projection, width: f32, height: f32) {
    if width <= 0.0 || height <= 0.0 {
        return;
    }
    if let Projection::Perspective(perspective) = projection {
        perspective.aspect_ratio = width / height;
    }
}

/// System: keep the camera trailing the die every frame.
pub fn follow_die(
    mut camera_query: Query<&mut Transform, (With<MainCamera>, Without<Die>)>,
    die_query: Query<&Transform, With<Die>>,
) {
    let Ok(die) = die_query.single() else {
        return;
    };
    for mut camera in camera_query.iter_mut() {
        trail_camera(&mut camera, die.translation);
    }
}

/// System: recompute the camera aspect ratio when the window is resized.
pub fn handle_window_resize(
    mut resized: MessageReader<WindowResized>,
    mut projection_query: Query<&mut Projection, With<MainCamera>>,
) {
    let Some(last) = resized.read().last() else {
        return;
    };
    for mut projection in projection_query.iter_mut() {
        apply_viewport_resize(&mut projection, last.width, last.height);
    }
    debug!("Viewport resized to {}x{}", last.width, last.height);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trail_moves_five_percent() {
        let mut camera = Transform::from_xyz(0.0, 10.0, 10.0);
        trail_camera(&mut camera, Vec3::ZERO);
        // Target is (0, 5, 5); 5% of the remaining (0, -5, -5).
        assert!(camera.translation.distance(Vec3::new(0.0, 9.75, 9.75)) < 1e-5);
        let forward = camera.forward();
        assert!(forward.dot(-camera.translation.normalize()) > 0.9999);
    }

    #[test]
    fn test_trail_converges_on_offset() {
        let mut camera = Transform::from_xyz(20.0, 1.0, -3.0);
        let die = Vec3::new(1.0, 0.5, 2.0);
        for _ in 0..500 {
            trail_camera(&mut camera, die);
        }
        assert!(camera.translation.distance(die + CAMERA_OFFSET) < 1e-3);
    }

    #[test]
    fn test_resize_updates_aspect_only() {
        let mut projection = Projection::Perspective(PerspectiveProjection::default());
        apply_viewport_resize(&mut projection, 1920.0, 1080.0);
        let Projection::Perspective(perspective) = &projection else {
            panic!("projection changed kind");
        };
        assert!((perspective.aspect_ratio - 1920.0 / 1080.0).abs() < 1e-6);

        // Degenerate sizes (minimized window) are ignored.
        apply_viewport_resize(&mut projection, 0.0, 0.0);
        let Projection::Perspective(perspective) = &projection else {
            panic!("projection changed kind");
        };
        assert!((perspective.aspect_ratio - 1920.0 / 1080.0).abs() < 1e-6);
    }
}
