//! Ground appearance
//!
//! The checkerboard texture is regenerated whenever a ground parameter
//! changes. Exactly one ground texture is alive at a time: the previous image
//! asset is removed before the new one is installed.

use bevy::prelude::*;

use crate::dice3d::textures::{generate_checkerboard, to_repeating_bevy_image};
use crate::dice3d::types::*;

/// Owns the live ground texture and the material showing it.
#[derive(Resource, Default)]
pub struct GroundAppearance {
    texture: Option<Handle<Image>>,
    material: Option<Handle<StandardMaterial>>,
}

impl GroundAppearance {
    pub fn texture(&self) -> Option<&Handle<Image>> {
        self.texture.as_ref()
    }

    pub fn material(&self) -> Option<&Handle<StandardMaterial>> {
        self.material.as_ref()
    }

    pub fn set_material(&mut self, material: Handle<StandardMaterial>) {
        self.material = Some(material);
    }

    /// Release the current texture, then install `image` as the new one.
    pub fn replace(&mut self, images: &mut Assets<Image>, image: Image) -> Handle<Image> {
        if let Some(old) = self.texture.take() {
            images.remove(&old);
        }
        let handle = images.add(image);
        self.texture = Some(handle.clone());
        handle
    }
}

/// Build a ground texture image from the current parameters.
pub fn build_ground_image(params: &DiceParams) -> Result<Image, String> {
    let texels = generate_checkerboard(params.square_size, &params.color1, &params.color2)?;
    Ok(to_repeating_bevy_image(texels))
}

/// Regenerate the ground texture after a ground parameter changed.
///
/// On invalid parameters the previous texture stays installed.
pub fn apply_ground_appearance(
    mut changes: MessageReader<ParamsChanged>,
    params: Res<DiceParams>,
    mut ground: ResMut<GroundAppearance>,
    mut images: ResMut<Assets<Image>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let ground_changed = changes
        .read()
        .fold(false, |acc, change| acc | change.field.affects_ground());
    if !ground_changed {
        return;
    }

    let image = match build_ground_image(&params) {
        Ok(image) => image,
        Err(err) => {
            warn!("Keeping previous ground texture: {}", err);
            return;
        }
    };

    let texture = ground.replace(&mut images, image);
    if let Some(material) = ground.material().and_then(|h| materials.get_mut(h)) {
        material.base_color_texture = Some(texture);
    }
    debug!(
        "Ground texture regenerated: square {} colors {} / {}",
        params.square_size, params.color1, params.color2
    );
}
