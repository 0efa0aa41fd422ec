//! UI-related types and components
//!
//! Markers for the status line, the control panel and its widgets.

use bevy::prelude::*;

use super::settings::ParamField;

/// The "Tap to roll" / "Rolling..." line.
#[derive(Component)]
pub struct StatusText;

/// Root node of the control panel. Clicks over it never reach the scene.
#[derive(Component)]
pub struct ControlPanel;

/// Material slider driving one numeric parameter.
#[derive(Component, Clone, Copy, PartialEq, Eq, Debug)]
pub struct ParamSlider(pub ParamField);

/// Text showing the current value of one parameter.
#[derive(Component, Clone, Copy, Debug)]
pub struct ParamValueText(pub ParamField);

/// Clickable swatch of a ground color. Pressing it opens the color picker.
#[derive(Component, Clone, Copy, Debug)]
pub struct ColorSwatch(pub ParamField);

/// Read-only "Last Roll" value.
#[derive(Component)]
pub struct LastRollText;

#[derive(Component)]
pub struct RollAgainButton;

/// Container the history entries are rebuilt into.
#[derive(Component)]
pub struct HistoryList;
