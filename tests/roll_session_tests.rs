//! Headless app tests for the roll/settle cycle
//!
//! These run `DieRollCorePlugin` under `MinimalPlugins` with a die entity
//! that has the physics components but no physics engine, so velocities and
//! poses only change when a test changes them.

use bevy::app::AppExit;
use bevy::prelude::*;
use bevy::window::WindowResized;
use bevy_rapier3d::prelude::{ExternalImpulse, Velocity};

use physical_die::dice3d::controller::{RollController, RollRng};
use physical_die::dice3d::face::resolve_face;
use physical_die::dice3d::plugin::DieRollCorePlugin;
use physical_die::dice3d::session::EndSession;
use physical_die::dice3d::systems::ground::{
    apply_ground_appearance, build_ground_image, GroundAppearance,
};
use physical_die::dice3d::systems::handle_window_resize;
use physical_die::dice3d::textures::CHECKERBOARD_SIZE;
use physical_die::dice3d::types::*;

fn test_app() -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .add_plugins(DieRollCorePlugin)
        .insert_resource(RollRng::seeded(1234));
    app
}

fn spawn_die(app: &mut App) -> Entity {
    app.world_mut()
        .spawn((
            Transform::from_xyz(1.0, 0.5, -1.0),
            Velocity::zero(),
            ExternalImpulse::default(),
            Die,
        ))
        .id()
}

fn request_roll(app: &mut App) {
    app.world_mut().write_message(RollRequested);
}

fn state(app: &App) -> RollState {
    app.world().resource::<RollController>().state()
}

#[test]
fn test_roll_request_throws_from_spawn_point() {
    let mut app = test_app();
    let die = spawn_die(&mut app);

    request_roll(&mut app);
    app.update();

    assert_eq!(state(&app), RollState::Rolling);
    assert_eq!(
        *app.world().resource::<StatusMessage>(),
        StatusMessage::Rolling
    );

    let transform = app.world().get::<Transform>(die).unwrap();
    assert_eq!(transform.translation, SPAWN_POINT);

    let impulse = app.world().get::<ExternalImpulse>(die).unwrap();
    assert_eq!(impulse.impulse.y, DiceParams::default().throw_force);
}

#[test]
fn test_request_while_rolling_leaves_body_untouched() {
    let mut app = test_app();
    let die = spawn_die(&mut app);

    request_roll(&mut app);
    app.update();

    // Pretend the die is mid-flight.
    let mid_flight = Transform::from_xyz(2.5, 0.8, -1.5)
        .with_rotation(Quat::from_rotation_y(0.7) * Quat::from_rotation_x(0.3));
    let moving = Velocity {
        linvel: Vec3::new(1.5, 0.2, -0.4),
        angvel: Vec3::new(3.0, 0.0, 1.0),
    };
    {
        let mut entity = app.world_mut().entity_mut(die);
        *entity.get_mut::<Transform>().unwrap() = mid_flight;
        *entity.get_mut::<Velocity>().unwrap() = moving;
        *entity.get_mut::<ExternalImpulse>().unwrap() = ExternalImpulse::default();
    }

    for _ in 0..3 {
        request_roll(&mut app);
        app.update();
    }

    assert_eq!(state(&app), RollState::Rolling);
    assert_eq!(*app.world().get::<Transform>(die).unwrap(), mid_flight);
    assert_eq!(
        *app.world().get::<ExternalImpulse>(die).unwrap(),
        ExternalImpulse::default()
    );
    assert!(app.world().resource::<RollHistory>().is_empty());
}

#[test]
fn test_settle_publishes_exactly_once() {
    let mut app = test_app();
    let die = spawn_die(&mut app);

    request_roll(&mut app);
    app.update();
    assert_eq!(state(&app), RollState::Rolling);

    // Still moving: nothing happens.
    app.world_mut().get_mut::<Velocity>(die).unwrap().linvel = Vec3::new(0.0, -2.0, 0.0);
    app.update();
    assert_eq!(state(&app), RollState::Rolling);
    assert!(app.world().resource::<RollHistory>().is_empty());

    // At rest.
    app.world_mut().get_mut::<Velocity>(die).unwrap().linvel = Vec3::new(0.02, 0.0, 0.01);
    app.update();

    let rotation = app.world().get::<Transform>(die).unwrap().rotation;
    let expected = resolve_face(rotation);

    assert_eq!(state(&app), RollState::Idle);
    {
        let history = app.world().resource::<RollHistory>();
        assert_eq!(history.len(), 1);
        assert_eq!(history.last(), Some(expected));
    }
    assert_eq!(
        *app.world().resource::<StatusMessage>(),
        StatusMessage::TapToRollAgain
    );

    // Further frames at rest publish nothing new.
    for _ in 0..5 {
        app.update();
    }
    assert_eq!(app.world().resource::<RollHistory>().len(), 1);
    assert_eq!(state(&app), RollState::Idle);
}

#[test]
fn test_second_roll_prepends_to_history() {
    let mut app = test_app();
    let die = spawn_die(&mut app);

    let mut outcomes = Vec::new();
    for _ in 0..2 {
        request_roll(&mut app);
        app.update();
        app.update();
        assert_eq!(state(&app), RollState::Idle);
        let rotation = app.world().get::<Transform>(die).unwrap().rotation;
        outcomes.push(resolve_face(rotation));
    }

    let history = app.world().resource::<RollHistory>();
    let entries: Vec<u32> = history.entries().collect();
    assert_eq!(entries, vec![outcomes[1], outcomes[0]]);
}

#[test]
fn test_roll_without_die_does_not_change_state() {
    let mut app = test_app();

    request_roll(&mut app);
    app.update();

    assert_eq!(state(&app), RollState::Idle);
}

#[test]
fn test_end_session_exits_the_app() {
    let mut app = test_app();
    spawn_die(&mut app);

    app.update();
    assert!(app.should_exit().is_none());

    app.world_mut().write_message(EndSession);
    app.update();
    assert_eq!(app.should_exit(), Some(AppExit::Success));
}

#[test]
fn test_window_resize_updates_aspect_only() {
    let mut app = test_app();
    app.add_message::<WindowResized>()
        .add_systems(Update, handle_window_resize);

    let die = spawn_die(&mut app);
    let camera_pose = Transform::from_xyz(0.0, 7.0, 5.0).looking_at(SPAWN_POINT, Vec3::Y);
    let camera = app
        .world_mut()
        .spawn((
            camera_pose,
            Projection::Perspective(PerspectiveProjection::default()),
            MainCamera,
        ))
        .id();
    let window = app.world_mut().spawn_empty().id();
    let die_pose = *app.world().get::<Transform>(die).unwrap();

    app.world_mut().write_message(WindowResized {
        window,
        width: 800.0,
        height: 400.0,
    });
    app.update();

    let Projection::Perspective(perspective) = app.world().get::<Projection>(camera).unwrap()
    else {
        panic!("camera projection is no longer perspective");
    };
    assert!((perspective.aspect_ratio - 2.0).abs() < 1e-6);
    assert_eq!(*app.world().get::<Transform>(camera).unwrap(), camera_pose);
    assert_eq!(*app.world().get::<Transform>(die).unwrap(), die_pose);
}

#[test]
fn test_ground_color_change_swaps_texture() {
    let mut app = test_app();
    app.init_resource::<Assets<Image>>()
        .init_resource::<Assets<StandardMaterial>>()
        .init_resource::<GroundAppearance>()
        .add_systems(Update, apply_ground_appearance);

    // Install the starting ground the way scene setup does.
    let first = {
        let world = app.world_mut();
        let image = build_ground_image(world.resource::<DiceParams>()).unwrap();
        let texture = world.resource_scope(|world, mut ground: Mut<GroundAppearance>| {
            let mut images = world.resource_mut::<Assets<Image>>();
            ground.replace(&mut images, image)
        });
        let material = world
            .resource_mut::<Assets<StandardMaterial>>()
            .add(StandardMaterial {
                base_color_texture: Some(texture.clone()),
                ..default()
            });
        world.resource_mut::<GroundAppearance>().set_material(material);
        texture
    };

    // Any color, not only a preset one.
    let changed = app
        .world_mut()
        .resource_mut::<DiceParams>()
        .set_color(ParamField::Color2, "#123456")
        .unwrap();
    assert!(changed);
    app.world_mut().write_message(ParamsChanged {
        field: ParamField::Color2,
    });
    app.update();

    let ground = app.world().resource::<GroundAppearance>();
    let second = ground.texture().cloned().unwrap();
    assert_ne!(second, first);

    let images = app.world().resource::<Assets<Image>>();
    assert!(!images.contains(&first), "old ground texture still alive");
    assert_eq!(images.len(), 1);

    let materials = app.world().resource::<Assets<StandardMaterial>>();
    let material = materials.get(ground.material().unwrap()).unwrap();
    assert_eq!(material.base_color_texture.as_ref(), Some(&second));

    // With the default 128 texel squares, (128, 0) is in a color2 square.
    let texels = images.get(&second).unwrap().data.as_ref().unwrap();
    let offset = (128 * 4) as usize;
    assert_eq!(texels.len(), (CHECKERBOARD_SIZE * CHECKERBOARD_SIZE * 4) as usize);
    assert_eq!(&texels[offset..offset + 4], &[0x12, 0x34, 0x56, 0xff]);
    assert_eq!(&texels[0..4], &[0x44, 0x44, 0x44, 0xff]);
}

#[test]
fn test_throw_param_change_leaves_ground_alone() {
    let mut app = test_app();
    app.init_resource::<Assets<Image>>()
        .init_resource::<Assets<StandardMaterial>>()
        .init_resource::<GroundAppearance>()
        .add_systems(Update, apply_ground_appearance);

    assert!(app
        .world_mut()
        .resource_mut::<DiceParams>()
        .set_value(ParamField::ThrowForce, 4.0));
    app.world_mut().write_message(ParamsChanged {
        field: ParamField::ThrowForce,
    });
    app.update();

    assert!(app.world().resource::<GroundAppearance>().texture().is_none());
    assert_eq!(app.world().resource::<Assets<Image>>().len(), 0);
}
