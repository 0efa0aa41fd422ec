//! Static scenery layout and surface interaction coefficients
//!
//! The ground and the four walls are immovable half-spaces. Every plane uses
//! local +Z as its normal and is rotated into place, so the layout here is
//! pure data the setup system spawns from.

use std::f32::consts::{FRAC_PI_2, PI};

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

/// Walls stand this far from the origin along each horizontal axis.
pub const BOUNDARY_HALF_EXTENT: f32 = 5.0;

/// Side of the rendered ground plane.
pub const GROUND_SIZE: f32 = 100.0;

/// Outward normal of every boundary plane in its local frame.
pub const PLANE_LOCAL_NORMAL: Vec3 = Vec3::Z;

pub const GRAVITY: Vec3 = Vec3::new(0.0, -9.82, 0.0);

/// What a collider is made of, for picking contact coefficients.
#[derive(Component, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SurfaceKind {
    Ground,
    Wall,
    Die,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ContactCoefficients {
    pub friction: f32,
    pub restitution: f32,
}

/// Pairwise friction and restitution between surface kinds.
#[derive(Resource, Clone, Debug)]
pub struct ContactMaterials {
    pairs: Vec<(SurfaceKind, SurfaceKind, ContactCoefficients)>,
}

impl Default for ContactMaterials {
    fn default() -> Self {
        Self {
            pairs: vec![
                (
                    SurfaceKind::Ground,
                    SurfaceKind::Die,
                    ContactCoefficients {
                        friction: 0.5,
                        restitution: 0.2,
                    },
                ),
                (
                    SurfaceKind::Die,
                    SurfaceKind::Wall,
                    ContactCoefficients {
                        friction: 0.01,
                        restitution: 0.5,
                    },
                ),
            ],
        }
    }
}

impl ContactMaterials {
    /// Coefficients for a pair, in either order.
    pub fn between(&self, a: SurfaceKind, b: SurfaceKind) -> Option<ContactCoefficients> {
        self.pairs
            .iter()
            .find(|(x, y, _)| (*x == a && *y == b) || (*x == b && *y == a))
            .map(|(_, _, c)| *c)
    }

    /// Friction and restitution components for a collider of `kind`.
    ///
    /// The die is the only dynamic body, so every contact is die vs static.
    /// The die gets unit coefficients and each static surface the
    /// coefficients of its pair with the die; with the multiply combine rule
    /// Rapier then reproduces the pair values exactly.
    pub fn surface_components(&self, kind: SurfaceKind) -> (Friction, Restitution) {
        let coefficients = match kind {
            SurfaceKind::Die => ContactCoefficients {
                friction: 1.0,
                restitution: 1.0,
            },
            other => self.between(other, SurfaceKind::Die).unwrap_or(ContactCoefficients {
                friction: 0.0,
                restitution: 0.0,
            }),
        };

        (
            Friction {
                coefficient: coefficients.friction,
                combine_rule: CoefficientCombineRule::Multiply,
            },
            Restitution {
                coefficient: coefficients.restitution,
                combine_rule: CoefficientCombineRule::Multiply,
            },
        )
    }
}

/// One immovable boundary plane.
#[derive(Clone, Copy, Debug)]
pub struct BoundaryPlane {
    pub kind: SurfaceKind,
    pub position: Vec3,
    pub rotation: Quat,
}

impl BoundaryPlane {
    /// The plane normal in world space.
    pub fn normal(&self) -> Vec3 {
        self.rotation * PLANE_LOCAL_NORMAL
    }
}

/// The ground, rotated to horizontal, and four walls facing inward.
pub fn boundary_planes() -> [BoundaryPlane; 5] {
    let e = BOUNDARY_HALF_EXTENT;
    [
        BoundaryPlane {
            kind: SurfaceKind::Ground,
            position: Vec3::ZERO,
            rotation: Quat::from_rotation_x(-FRAC_PI_2),
        },
        BoundaryPlane {
            kind: SurfaceKind::Wall,
            position: Vec3::new(0.0, 0.0, -e),
            rotation: Quat::IDENTITY,
        },
        BoundaryPlane {
            kind: SurfaceKind::Wall,
            position: Vec3::new(0.0, 0.0, e),
            rotation: Quat::from_rotation_y(PI),
        },
        BoundaryPlane {
            kind: SurfaceKind::Wall,
            position: Vec3::new(-e, 0.0, 0.0),
            rotation: Quat::from_rotation_y(FRAC_PI_2),
        },
        BoundaryPlane {
            kind: SurfaceKind::Wall,
            position: Vec3::new(e, 0.0, 0.0),
            rotation: Quat::from_rotation_y(-FRAC_PI_2),
        },
    ]
}
