//! Ground color picker
//!
//! A modal HSV picker: a hue/saturation wheel plus a brightness slider.
//! Pressing a ground color swatch opens it for that color; "Select" writes the
//! picked color into `DiceParams` and announces it with `ParamsChanged`.
//!
//! The wheel hit test works in physical pixels: `ComputedNode::normalize_point`
//! expects the same space as `UiGlobalTransform`, so the cursor comes from
//! `Window::physical_cursor_position()`, not `cursor_position()`.

use std::f32::consts::TAU;

use bevy::prelude::*;
use bevy::ui::FocusPolicy;
use bevy::ui::{ComputedNode, UiGlobalTransform};
use bevy::window::PrimaryWindow;
use bevy_material_ui::prelude::*;
use bevy_material_ui::slider::{spawn_slider_control_with, MaterialSlider, SliderChangeEvent};
use image::{Rgba, RgbaImage};

use crate::dice3d::textures::{parse_color, to_bevy_image};
use crate::dice3d::types::*;

/// Side of the wheel texture, in texels.
pub const COLOR_WHEEL_SIZE: u32 = 256;

/// On-screen wheel diameter, in logical pixels.
const WHEEL_DIAMETER: f32 = 200.0;
const MARKER_SIZE: f32 = 12.0;

#[derive(Resource, Default)]
pub struct ColorPickerState {
    pub active: bool,
    pub dragging_wheel: bool,
    pub target: Option<ParamField>,
    /// x = hue, y = saturation, z = value, all in [0, 1].
    pub current_hsv: Vec3,
}

impl ColorPickerState {
    /// The color currently under the marker, as `#rrggbb`.
    pub fn picked_hex(&self) -> String {
        hsv_to_hex(self.current_hsv)
    }
}

#[derive(Resource)]
pub struct ColorWheelTexture(pub Handle<Image>);

#[derive(Component)]
pub struct ColorPickerRoot;

#[derive(Component)]
pub struct ColorWheelImage;

#[derive(Component)]
pub struct ColorPickerMarker;

#[derive(Component)]
pub struct ColorPickerPreview;

#[derive(Component, Clone, Copy, PartialEq, Eq, Debug)]
pub struct ColorPickerValueSlider;

#[derive(Component)]
pub struct ColorPickerSelectButton;

#[derive(Component)]
pub struct ColorPickerCancelButton;

pub fn hsv_to_rgb(h: f32, s: f32, v: f32) -> (f32, f32, f32) {
    let i = (h * 6.0).floor();
    let f = h * 6.0 - i;
    let p = v * (1.0 - s);
    let q = v * (1.0 - f * s);
    let t = v * (1.0 - (1.0 - f) * s);

    match (i as i32).rem_euclid(6) {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    }
}

pub fn rgb_to_hsv(color: Srgba) -> Vec3 {
    let r = color.red;
    let g = color.green;
    let b = color.blue;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let d = max - min;

    let mut h = 0.0;
    let s = if max == 0.0 { 0.0 } else { d / max };

    if max != min {
        if max == r {
            h = (g - b) / d + if g < b { 6.0 } else { 0.0 };
        } else if max == g {
            h = (b - r) / d + 2.0;
        } else {
            h = (r - g) / d + 4.0;
        }
        h /= 6.0;
    }

    Vec3::new(h, s, max)
}

pub fn hsv_to_hex(hsv: Vec3) -> String {
    let (r, g, b) = hsv_to_rgb(hsv.x, hsv.y, hsv.z);
    let byte = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    format!("#{:02x}{:02x}{:02x}", byte(r), byte(g), byte(b))
}

/// Hue and saturation under a point of the wheel, in node-centered
/// coordinates with y down and the rim at 0.5.
pub fn wheel_hue_saturation(normalized: Vec2) -> (f32, f32) {
    let saturation = (normalized.length() * 2.0).clamp(0.0, 1.0);
    let angle = (-normalized.y).atan2(normalized.x);
    let hue = angle.rem_euclid(TAU) / TAU;
    (hue, saturation)
}

/// Hue around the rim, saturation outward from the center, transparent
/// outside the circle. Red sits at three o'clock.
pub fn generate_color_wheel(size: u32) -> RgbaImage {
    let radius = size as f32 / 2.0;
    RgbaImage::from_fn(size, size, |x, y| {
        let offset = Vec2::new(x as f32 - radius, y as f32 - radius);
        if offset.length() > radius {
            return Rgba([0, 0, 0, 0]);
        }
        let (hue, saturation) = wheel_hue_saturation(offset / (radius * 2.0));
        let (r, g, b) = hsv_to_rgb(hue, saturation, 1.0);
        Rgba([
            (r * 255.0) as u8,
            (g * 255.0) as u8,
            (b * 255.0) as u8,
            255,
        ])
    })
}

pub fn setup_color_wheel_texture(mut commands: Commands, mut images: ResMut<Assets<Image>>) {
    let texture = images.add(to_bevy_image(generate_color_wheel(COLOR_WHEEL_SIZE)));
    commands.insert_resource(ColorWheelTexture(texture));
}

pub fn open_color_picker(target: ParamField, current_color: Srgba, state: &mut ColorPickerState) {
    state.active = true;
    state.dragging_wheel = false;
    state.target = Some(target);
    state.current_hsv = rgb_to_hsv(current_color);
}

/// Write the picked color into its target and close the picker.
///
/// Returns the field that changed, if any.
pub fn commit_color_picker(
    state: &mut ColorPickerState,
    params: &mut DiceParams,
) -> Result<Option<ParamField>, String> {
    state.active = false;
    state.dragging_wheel = false;
    let Some(target) = state.target.take() else {
        return Ok(None);
    };
    let changed = params.set_color(target, &state.picked_hex())?;
    Ok(changed.then_some(target))
}

/// Open the picker when a ground color swatch is pressed.
pub fn handle_color_swatch_clicks(
    mut state: ResMut<ColorPickerState>,
    params: Res<DiceParams>,
    swatch_query: Query<(&Interaction, &ColorSwatch), Changed<Interaction>>,
) {
    if state.active {
        return;
    }

    for (interaction, ColorSwatch(field)) in swatch_query.iter() {
        if *interaction != Interaction::Pressed {
            continue;
        }
        let current = match params.color(*field).map(parse_color) {
            Some(Ok([r, g, b, _])) => Srgba::rgb_u8(r, g, b),
            _ => Srgba::WHITE,
        };
        open_color_picker(*field, current, &mut state);
        break;
    }
}

pub fn spawn_color_picker_ui(
    mut commands: Commands,
    state: Res<ColorPickerState>,
    wheel_texture: Res<ColorWheelTexture>,
    theme: Res<MaterialTheme>,
    root_query: Query<Entity, With<ColorPickerRoot>>,
) {
    if state.active && root_query.is_empty() {
        let title = match state.target {
            Some(field) => format!("Select {}", field.label()),
            None => String::from("Select Color"),
        };
        let dialog = MaterialDialog::new().title(&title).open(true).modal(true);
        let dialog_bg = dialog.surface_color(&theme);

        let dialog_entity = commands
            .spawn((
                dialog,
                Node {
                    position_type: PositionType::Absolute,
                    width: Val::Px(300.0),
                    padding: UiRect::all(Val::Px(16.0)),
                    flex_direction: FlexDirection::Column,
                    row_gap: Val::Px(16.0),
                    align_items: AlignItems::Center,
                    ..default()
                },
                BackgroundColor(dialog_bg),
                BorderRadius::all(Val::Px(16.0)),
                BoxShadow::default(),
            ))
            .id();

        let scrim_entity = commands
            .spawn((
                create_dialog_scrim_for(&theme, dialog_entity, false),
                ColorPickerRoot,
            ))
            .insert(GlobalZIndex(2000))
            .id();

        commands.entity(scrim_entity).add_child(dialog_entity);

        let brightness = state.current_hsv.z;
        let (r, g, b) = hsv_to_rgb(state.current_hsv.x, state.current_hsv.y, brightness);

        commands.entity(dialog_entity).with_children(|container| {
            container
                .spawn((
                    ImageNode {
                        image: wheel_texture.0.clone(),
                        color: wheel_tint(brightness),
                        ..default()
                    },
                    Node {
                        width: Val::Px(WHEEL_DIAMETER),
                        height: Val::Px(WHEEL_DIAMETER),
                        ..default()
                    },
                    BackgroundColor(Color::NONE),
                    FocusPolicy::Block,
                    ColorWheelImage,
                    Interaction::default(),
                ))
                .with_children(|wheel| {
                    let center = WHEEL_DIAMETER / 2.0 - MARKER_SIZE / 2.0;
                    wheel.spawn((
                        Node {
                            position_type: PositionType::Absolute,
                            width: Val::Px(MARKER_SIZE),
                            height: Val::Px(MARKER_SIZE),
                            left: Val::Px(center),
                            top: Val::Px(center),
                            border: UiRect::all(Val::Px(2.0)),
                            ..default()
                        },
                        BorderColor::from(Color::WHITE),
                        BorderRadius::all(Val::Percent(50.0)),
                        FocusPolicy::Pass,
                        ColorPickerMarker,
                    ));
                });

            container
                .spawn(Node {
                    width: Val::Percent(100.0),
                    flex_direction: FlexDirection::Row,
                    column_gap: Val::Px(12.0),
                    align_items: AlignItems::Center,
                    ..default()
                })
                .with_children(|row| {
                    row.spawn((
                        Node {
                            width: Val::Px(48.0),
                            height: Val::Px(48.0),
                            border: UiRect::all(Val::Px(1.0)),
                            ..default()
                        },
                        BackgroundColor(Color::srgb(r, g, b)),
                        BorderColor::from(theme.outline),
                        BorderRadius::all(Val::Px(4.0)),
                        ColorPickerPreview,
                    ));

                    row.spawn(Node {
                        flex_direction: FlexDirection::Column,
                        flex_grow: 1.0,
                        row_gap: Val::Px(8.0),
                        ..default()
                    })
                    .with_children(|sliders| {
                        sliders.spawn((
                            Text::new("Brightness"),
                            TextFont {
                                font_size: 12.0,
                                ..default()
                            },
                            TextColor(theme.on_surface_variant),
                        ));

                        sliders
                            .spawn(Node {
                                width: Val::Percent(100.0),
                                height: Val::Px(20.0),
                                ..default()
                            })
                            .with_children(|slot| {
                                let slider = MaterialSlider::new(0.0, 1.0)
                                    .with_value(brightness)
                                    .track_height(6.0)
                                    .thumb_radius(8.0);
                                spawn_slider_control_with(
                                    slot,
                                    &theme,
                                    slider,
                                    ColorPickerValueSlider,
                                );
                            });
                    });
                });

            container
                .spawn(Node {
                    width: Val::Percent(100.0),
                    justify_content: JustifyContent::FlexEnd,
                    column_gap: Val::Px(8.0),
                    ..default()
                })
                .with_children(|buttons| {
                    buttons
                        .spawn((
                            MaterialButtonBuilder::new("Cancel").text().build(&theme),
                            ColorPickerCancelButton,
                        ))
                        .with_children(|btn| {
                            btn.spawn((
                                Text::new("Cancel"),
                                TextFont {
                                    font_size: 14.0,
                                    ..default()
                                },
                                TextColor(theme.primary),
                                bevy_material_ui::button::ButtonLabel,
                            ));
                        });
                    buttons
                        .spawn((
                            MaterialButtonBuilder::new("Select").filled().build(&theme),
                            ColorPickerSelectButton,
                        ))
                        .with_children(|btn| {
                            btn.spawn((
                                Text::new("Select"),
                                TextFont {
                                    font_size: 14.0,
                                    ..default()
                                },
                                TextColor(theme.on_primary),
                                bevy_material_ui::button::ButtonLabel,
                            ));
                        });
                });
        });
    } else if !state.active {
        for entity in root_query.iter() {
            commands.entity(entity).despawn();
        }
    }
}

#[allow(clippy::too_many_arguments)]
pub fn handle_color_picker_interactions(
    mut state: ResMut<ColorPickerState>,
    mut params: ResMut<DiceParams>,
    mut changes: MessageWriter<ParamsChanged>,
    wheel_query: Query<(&Interaction, &ComputedNode, &UiGlobalTransform), With<ColorWheelImage>>,
    mut slider_events: MessageReader<SliderChangeEvent>,
    value_slider_query: Query<(), With<ColorPickerValueSlider>>,
    select_query: Query<&Interaction, (With<ColorPickerSelectButton>, Changed<Interaction>)>,
    cancel_query: Query<&Interaction, (With<ColorPickerCancelButton>, Changed<Interaction>)>,
    mouse: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window, With<PrimaryWindow>>,
) {
    if !state.active {
        return;
    }

    if let (Some((interaction, computed, transform)), Ok(window)) =
        (wheel_query.iter().next(), windows.single())
    {
        if *interaction == Interaction::Pressed {
            state.dragging_wheel = true;
        }
        if state.dragging_wheel {
            let picked = window
                .physical_cursor_position()
                .and_then(|cursor| computed.normalize_point(*transform, cursor))
                .map(wheel_hue_saturation);
            if let Some((hue, saturation)) = picked {
                state.current_hsv.x = hue;
                state.current_hsv.y = saturation;
            }
        }
    }

    if mouse.just_released(MouseButton::Left) {
        state.dragging_wheel = false;
    }

    for event in slider_events.read() {
        if value_slider_query.contains(event.entity) {
            state.current_hsv.z = event.value.clamp(0.0, 1.0);
        }
    }

    if cancel_query.iter().any(|i| *i == Interaction::Pressed) {
        state.active = false;
        state.target = None;
        return;
    }

    if select_query.iter().any(|i| *i == Interaction::Pressed) {
        match commit_color_picker(&mut state, &mut params) {
            Ok(Some(field)) => {
                info!("{} set to {}", field.label(), params.display(field));
                changes.write(ParamsChanged { field });
            }
            Ok(None) => {}
            Err(err) => warn!("Color not applied: {}", err),
        }
    }
}

/// Keep the preview, wheel tint and marker in step with the picked color.
pub fn update_color_picker_preview(
    state: Res<ColorPickerState>,
    mut preview_query: Query<&mut BackgroundColor, With<ColorPickerPreview>>,
    mut wheel_query: Query<&mut ImageNode, With<ColorWheelImage>>,
    mut marker_query: Query<&mut Node, With<ColorPickerMarker>>,
    mut value_slider_query: Query<&mut MaterialSlider, With<ColorPickerValueSlider>>,
) {
    if !state.active || !state.is_changed() {
        return;
    }

    let hsv = state.current_hsv;
    let (r, g, b) = hsv_to_rgb(hsv.x, hsv.y, hsv.z);
    for mut background in preview_query.iter_mut() {
        background.0 = Color::srgb(r, g, b);
    }

    for mut image in wheel_query.iter_mut() {
        image.color = wheel_tint(hsv.z);
    }

    let radius = WHEEL_DIAMETER / 2.0;
    let angle = hsv.x * TAU;
    let x = radius + angle.cos() * hsv.y * radius - MARKER_SIZE / 2.0;
    let y = radius - angle.sin() * hsv.y * radius - MARKER_SIZE / 2.0;
    for mut node in marker_query.iter_mut() {
        node.left = Val::Px(x);
        node.top = Val::Px(y);
    }

    for mut slider in value_slider_query.iter_mut() {
        if (slider.value - hsv.z).abs() > 0.001 {
            slider.value = hsv.z;
        }
    }
}

/// Darken the wheel with the brightness, but never so far it cannot be seen.
fn wheel_tint(brightness: f32) -> Color {
    let v = brightness.max(0.1);
    Color::srgb(v, v, v)
}
