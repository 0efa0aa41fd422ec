//! Top-face resolution
//!
//! Rotates every local face normal into world space and picks the one that
//! points most nearly along world up.

use bevy::prelude::*;

use crate::dice3d::types::D6_FACE_NORMALS;

/// Value of the face pointing most nearly up for a die with this rotation.
pub fn resolve_face(rotation: Quat) -> u32 {
    resolve_face_with(&D6_FACE_NORMALS, rotation).unwrap_or(D6_FACE_NORMALS[0].1)
}

/// Same as [`resolve_face`] for an arbitrary face table.
///
/// Only a strictly larger dot product replaces the current best, so on an
/// exact tie the earlier table entry wins. Returns `None` for an empty table.
pub fn resolve_face_with(face_normals: &[(Vec3, u32)], rotation: Quat) -> Option<u32> {
    let mut best: Option<(f32, u32)> = None;

    for (normal, value) in face_normals {
        let dot = (rotation * *normal).dot(Vec3::Y);
        match best {
            Some((best_dot, _)) if dot <= best_dot => {}
            _ => best = Some((dot, *value)),
        }
    }

    best.map(|(_, value)| value)
}
