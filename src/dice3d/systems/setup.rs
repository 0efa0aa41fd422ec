//! Scene setup
//!
//! Spawns the camera, lights, the textured ground, the invisible walls and
//! the die with its numbered faces.

use std::f32::consts::FRAC_PI_2;

use bevy::math::Affine2;
use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use crate::dice3d::textures::{generate_face_texture, to_bevy_image, GROUND_TEXTURE_REPEAT};
use crate::dice3d::types::*;
use crate::dice3d::world::*;

use super::ground::{build_ground_image, GroundAppearance};

/// Face quads sit this far outside the cube surface to avoid z-fighting.
const LABEL_LIFT: f32 = 0.002;

/// Face quads are slightly smaller than the face, leaving a white rim.
const LABEL_SIZE: f32 = 0.92;

#[allow(clippy::too_many_arguments)]
pub fn setup(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut images: ResMut<Assets<Image>>,
    mut ground: ResMut<GroundAppearance>,
    params: Res<DiceParams>,
    contact_materials: Res<ContactMaterials>,
) {
    spawn_camera_and_lights(&mut commands);
    spawn_ground(
        &mut commands,
        &mut meshes,
        &mut materials,
        &mut images,
        &mut ground,
        &params,
        &contact_materials,
    );
    spawn_walls(&mut commands, &contact_materials);
    spawn_die(
        &mut commands,
        &mut meshes,
        &mut materials,
        &mut images,
        &contact_materials,
    );
}

fn spawn_camera_and_lights(commands: &mut Commands) {
    commands.spawn((
        Camera3d::default(),
        Projection::from(PerspectiveProjection {
            fov: CAMERA_FOV_DEGREES.to_radians(),
            near: CAMERA_NEAR,
            far: CAMERA_FAR,
            ..default()
        }),
        Transform::from_translation(SPAWN_POINT + CAMERA_OFFSET).looking_at(SPAWN_POINT, Vec3::Y),
        MainCamera,
    ));

    commands.spawn((
        DirectionalLight {
            illuminance: 8000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(2.0, 5.0, 5.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    // Soft fill from above so faces turned away from the sun stay readable.
    commands.spawn((
        PointLight {
            intensity: 400_000.0,
            range: 60.0,
            shadows_enabled: false,
            ..default()
        },
        Transform::from_xyz(0.0, 12.0, 0.0),
    ));
}

#[allow(clippy::too_many_arguments)]
fn spawn_ground(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    images: &mut Assets<Image>,
    ground: &mut GroundAppearance,
    params: &DiceParams,
    contact_materials: &ContactMaterials,
) {
    let texture = match build_ground_image(params) {
        Ok(image) => Some(ground.replace(images, image)),
        Err(err) => {
            warn!("Ground texture unavailable: {}", err);
            None
        }
    };

    let material = materials.add(StandardMaterial {
        base_color_texture: texture,
        metallic: 0.2,
        perceptual_roughness: 0.5,
        uv_transform: Affine2::from_scale(Vec2::splat(GROUND_TEXTURE_REPEAT)),
        ..default()
    });
    ground.set_material(material.clone());

    // Plane3d faces +Y already; only the collider needs the rotated plane.
    commands.spawn((
        Mesh3d(meshes.add(Plane3d::default().mesh().size(GROUND_SIZE, GROUND_SIZE))),
        MeshMaterial3d(material),
        Transform::IDENTITY,
    ));

    for plane in boundary_planes()
        .into_iter()
        .filter(|p| p.kind == SurfaceKind::Ground)
    {
        spawn_boundary(commands, &plane, contact_materials);
    }
}

fn spawn_walls(commands: &mut Commands, contact_materials: &ContactMaterials) {
    for plane in boundary_planes()
        .into_iter()
        .filter(|p| p.kind == SurfaceKind::Wall)
    {
        spawn_boundary(commands, &plane, contact_materials);
    }
}

/// Immovable half-space collider, invisible.
fn spawn_boundary(
    commands: &mut Commands,
    plane: &BoundaryPlane,
    contact_materials: &ContactMaterials,
) {
    let Some(collider) = Collider::halfspace(PLANE_LOCAL_NORMAL) else {
        warn!("Could not build boundary plane at {}", plane.position);
        return;
    };
    let (friction, restitution) = contact_materials.surface_components(plane.kind);

    commands.spawn((
        RigidBody::Fixed,
        collider,
        friction,
        restitution,
        plane.kind,
        Transform::from_translation(plane.position).with_rotation(plane.rotation),
    ));
}

fn spawn_die(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    images: &mut Assets<Image>,
    contact_materials: &ContactMaterials,
) {
    let size = DIE_HALF_EXTENT * 2.0;
    let body_material = materials.add(StandardMaterial {
        base_color: Color::WHITE,
        perceptual_roughness: 0.4,
        ..default()
    });
    let label_mesh = meshes.add(Rectangle::new(size * LABEL_SIZE, size * LABEL_SIZE));
    let (friction, restitution) = contact_materials.surface_components(SurfaceKind::Die);

    commands
        .spawn((
            Mesh3d(meshes.add(Cuboid::new(size, size, size))),
            MeshMaterial3d(body_material),
            Transform::from_translation(SPAWN_POINT),
            RigidBody::Dynamic,
            Collider::cuboid(DIE_HALF_EXTENT, DIE_HALF_EXTENT, DIE_HALF_EXTENT),
            ColliderMassProperties::Mass(DIE_MASS),
            Damping {
                linear_damping: DIE_LINEAR_DAMPING,
                angular_damping: DIE_ANGULAR_DAMPING,
            },
            Velocity::zero(),
            ExternalImpulse::default(),
            friction,
            restitution,
            SurfaceKind::Die,
            Die,
        ))
        .with_children(|parent| {
            // Labels come from the same table the face resolver uses, so the
            // number on top always matches the reported result.
            for (normal, value) in D6_FACE_NORMALS {
                let texture = match generate_face_texture(value) {
                    Ok(texels) => images.add(to_bevy_image(texels)),
                    Err(err) => {
                        warn!("Face {} has no texture: {}", value, err);
                        continue;
                    }
                };
                let material = materials.add(StandardMaterial {
                    base_color_texture: Some(texture),
                    perceptual_roughness: 0.4,
                    ..default()
                });

                parent.spawn((
                    Mesh3d(label_mesh.clone()),
                    MeshMaterial3d(material),
                    Transform::from_translation(normal * (DIE_HALF_EXTENT + LABEL_LIFT))
                        .with_rotation(get_label_rotation(normal)),
                    DieFaceLabel { value },
                ));
            }
        });
}

/// Rotation taking the +Z facing label quad onto the face with `normal`.
pub fn get_label_rotation(normal: Vec3) -> Quat {
    // Handle the Y-axis cases specially to keep the digits upright
    if normal.y.abs() > 0.99 {
        if normal.y > 0.0 {
            Quat::from_rotation_x(-FRAC_PI_2)
        } else {
            Quat::from_rotation_x(FRAC_PI_2)
        }
    } else {
        // Side faces: spin about Y so the digits stay upright
        Quat::from_rotation_y(normal.x.atan2(normal.z))
    }
}
