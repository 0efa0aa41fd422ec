//! Control panel and status display
//!
//! A panel in the top-right corner edits `DiceParams` with Material sliders
//! and color swatches (which open the color picker), shows the last result
//! and the history, and offers a "Roll Again" button. The status line sits at
//! the bottom of the screen.

use bevy::ecs::hierarchy::ChildSpawnerCommands;
use bevy::prelude::*;
use bevy_material_ui::prelude::*;
use bevy_material_ui::slider::{spawn_slider_control_with, MaterialSlider, SliderChangeEvent};

use crate::dice3d::textures::parse_color;
use crate::dice3d::types::*;

pub fn setup_ui(
    mut commands: Commands,
    params: Res<DiceParams>,
    history: Res<RollHistory>,
    theme: Res<MaterialTheme>,
) {
    // Status line
    commands.spawn((
        Text::new(StatusMessage::default().text()),
        TextFont {
            font_size: 28.0,
            ..default()
        },
        TextColor(theme.on_surface),
        Node {
            position_type: PositionType::Absolute,
            bottom: Val::Px(24.0),
            left: Val::Px(24.0),
            ..default()
        },
        StatusText,
    ));

    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                top: Val::Px(10.0),
                right: Val::Px(10.0),
                width: Val::Px(320.0),
                flex_direction: FlexDirection::Column,
                row_gap: Val::Px(8.0),
                padding: UiRect::all(Val::Px(12.0)),
                ..default()
            },
            BackgroundColor(theme.surface_container.with_alpha(0.9)),
            BorderRadius::all(Val::Px(12.0)),
            Interaction::None,
            ControlPanel,
        ))
        .with_children(|panel| {
            section_header(panel, "Ground", &theme);
            slider_row(panel, ParamField::SquareSize, &params, &theme);
            color_row(panel, ParamField::Color1, &params, &theme);
            color_row(panel, ParamField::Color2, &params, &theme);

            section_header(panel, "Dice", &theme);
            slider_row(panel, ParamField::RotationSpeed, &params, &theme);
            slider_row(panel, ParamField::ThrowForce, &params, &theme);

            section_header(panel, "Result", &theme);
            panel.spawn((
                Text::new(format!("Last Roll: {}", history.last_label())),
                TextFont {
                    font_size: 16.0,
                    ..default()
                },
                TextColor(theme.on_surface),
                LastRollText,
            ));
            panel
                .spawn(Node {
                    height: Val::Px(36.0),
                    ..default()
                })
                .with_children(|slot| {
                    slot.spawn((
                        MaterialButtonBuilder::new("Roll Again").filled().build(&theme),
                        RollAgainButton,
                    ))
                    .with_children(|btn| {
                        btn.spawn((
                            Text::new("Roll Again"),
                            TextFont {
                                font_size: 16.0,
                                ..default()
                            },
                            TextColor(theme.on_primary),
                            bevy_material_ui::button::ButtonLabel,
                        ));
                    });
                });

            section_header(panel, "History", &theme);
            panel.spawn((
                Node {
                    flex_direction: FlexDirection::Row,
                    flex_wrap: FlexWrap::Wrap,
                    column_gap: Val::Px(6.0),
                    row_gap: Val::Px(4.0),
                    ..default()
                },
                HistoryList,
            ));
        });
}

fn section_header(panel: &mut ChildSpawnerCommands, title: &str, theme: &MaterialTheme) {
    panel.spawn((
        Text::new(title),
        TextFont {
            font_size: 14.0,
            ..default()
        },
        TextColor(theme.primary),
    ));
}

fn row_label(row: &mut ChildSpawnerCommands, field: ParamField, theme: &MaterialTheme) {
    row.spawn((
        Text::new(field.label()),
        TextFont {
            font_size: 14.0,
            ..default()
        },
        TextColor(theme.on_surface_variant),
        Node {
            width: Val::Px(100.0),
            ..default()
        },
    ));
}

fn value_text(
    row: &mut ChildSpawnerCommands,
    field: ParamField,
    params: &DiceParams,
    theme: &MaterialTheme,
) {
    row.spawn((
        Text::new(params.display(field)),
        TextFont {
            font_size: 14.0,
            ..default()
        },
        TextColor(theme.on_surface_variant),
        Node {
            min_width: Val::Px(56.0),
            ..default()
        },
        ParamValueText(field),
    ));
}

fn row_node() -> Node {
    Node {
        flex_direction: FlexDirection::Row,
        align_items: AlignItems::Center,
        column_gap: Val::Px(8.0),
        height: Val::Px(32.0),
        ..default()
    }
}

/// Label, slider over the field's bounds, value.
fn slider_row(
    panel: &mut ChildSpawnerCommands,
    field: ParamField,
    params: &DiceParams,
    theme: &MaterialTheme,
) {
    let (Some((min, max, _)), Some(value)) =
        (DiceParams::slider_range(field), params.numeric_value(field))
    else {
        return;
    };

    panel.spawn(row_node()).with_children(|row| {
        row_label(row, field, theme);
        row.spawn(Node {
            width: Val::Px(130.0),
            height: Val::Px(32.0),
            ..default()
        })
        .with_children(|slot| {
            let slider = MaterialSlider::new(min, max)
                .with_value(value.clamp(min, max))
                .track_height(6.0)
                .thumb_radius(8.0);
            spawn_slider_control_with(slot, theme, slider, ParamSlider(field));
        });
        value_text(row, field, params, theme);
    });
}

/// Label, clickable swatch, hex value.
fn color_row(
    panel: &mut ChildSpawnerCommands,
    field: ParamField,
    params: &DiceParams,
    theme: &MaterialTheme,
) {
    let current = swatch_color(params.color(field).unwrap_or_default());
    panel.spawn(row_node()).with_children(|row| {
        row_label(row, field, theme);
        row.spawn((
            Button,
            Node {
                width: Val::Px(48.0),
                height: Val::Px(24.0),
                border: UiRect::all(Val::Px(1.0)),
                ..default()
            },
            BackgroundColor(current),
            BorderColor::from(theme.outline),
            BorderRadius::all(Val::Px(4.0)),
            ColorSwatch(field),
        ));
        value_text(row, field, params, theme);
    });
}

fn swatch_color(css: &str) -> Color {
    match parse_color(css) {
        Ok([r, g, b, a]) => Color::srgba_u8(r, g, b, a),
        Err(_) => Color::NONE,
    }
}

/// Apply slider moves to `DiceParams`, then announce the change.
pub fn handle_param_sliders(
    mut events: MessageReader<SliderChangeEvent>,
    slider_query: Query<&ParamSlider>,
    mut params: ResMut<DiceParams>,
    mut changes: MessageWriter<ParamsChanged>,
) {
    for event in events.read() {
        let Ok(ParamSlider(field)) = slider_query.get(event.entity) else {
            continue;
        };
        if params.set_value(*field, event.value) {
            changes.write(ParamsChanged { field: *field });
        }
    }
}

pub fn handle_roll_button(
    button_query: Query<&Interaction, (Changed<Interaction>, With<RollAgainButton>)>,
    mut requests: MessageWriter<RollRequested>,
) {
    if button_query
        .iter()
        .any(|interaction| *interaction == Interaction::Pressed)
    {
        requests.write(RollRequested);
    }
}

pub fn sync_status_text(
    status: Res<StatusMessage>,
    mut text_query: Query<&mut Text, With<StatusText>>,
) {
    if !status.is_changed() {
        return;
    }
    for mut text in text_query.iter_mut() {
        text.0 = status.text().to_string();
    }
}

/// Keep value labels, swatches and slider thumbs in step with `DiceParams`.
pub fn sync_param_texts(
    params: Res<DiceParams>,
    mut text_query: Query<(&mut Text, &ParamValueText)>,
    mut swatch_query: Query<(&mut BackgroundColor, &ColorSwatch)>,
    mut slider_query: Query<(&mut MaterialSlider, &ParamSlider)>,
) {
    if !params.is_changed() {
        return;
    }
    for (mut text, ParamValueText(field)) in text_query.iter_mut() {
        text.0 = params.display(*field);
    }
    for (mut background, ColorSwatch(field)) in swatch_query.iter_mut() {
        background.0 = swatch_color(params.color(*field).unwrap_or_default());
    }
    for (mut slider, ParamSlider(field)) in slider_query.iter_mut() {
        let Some(value) = params.numeric_value(*field) else {
            continue;
        };
        if (slider.value - value).abs() > 0.001 {
            slider.value = value;
        }
    }
}

/// Refresh "Last Roll" and rebuild the history list, most recent first.
pub fn sync_history(
    mut commands: Commands,
    history: Res<RollHistory>,
    theme: Res<MaterialTheme>,
    mut last_query: Query<&mut Text, With<LastRollText>>,
    list_query: Query<Entity, With<HistoryList>>,
) {
    if !history.is_changed() {
        return;
    }
    for mut text in last_query.iter_mut() {
        text.0 = format!("Last Roll: {}", history.last_label());
    }
    for list in list_query.iter() {
        commands.entity(list).despawn_related::<Children>();
        commands.entity(list).with_children(|list| {
            for value in history.entries() {
                list.spawn((
                    Text::new(value.to_string()),
                    TextFont {
                        font_size: 15.0,
                        ..default()
                    },
                    TextColor(theme.on_surface),
                ));
            }
        });
    }
}
