//! Procedural textures: the checkerboard ground and the numbered die faces.
//!
//! Both are rasterized on the CPU into `image::RgbaImage` buffers and then
//! converted into Bevy images.

use bevy::asset::RenderAssetUsages;
use bevy::image::{ImageAddressMode, ImageSampler, ImageSamplerDescriptor};
use bevy::prelude::*;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat};
use image::{Rgba, RgbaImage};

/// Side of the square ground canvas, in texels.
pub const CHECKERBOARD_SIZE: u32 = 256;

/// Side of the square face canvas, in texels.
pub const FACE_TEXTURE_SIZE: u32 = 128;

/// How many times the ground texture repeats along each side of the plane.
pub const GROUND_TEXTURE_REPEAT: f32 = 25.0;

const FACE_BACKGROUND: Rgba<u8> = Rgba([255, 255, 255, 255]);
const FACE_INK: Rgba<u8> = Rgba([0, 0, 0, 255]);

// Glyph box in face texels: half width, half height, stroke width.
const GLYPH_HALF_WIDTH: f32 = 20.0;
const GLYPH_HALF_HEIGHT: f32 = 34.0;
const GLYPH_STROKE: f32 = 14.0;
const GLYPH_GAP: f32 = 12.0;

/// Parse a CSS color ("#444444", "white", "rgb(1,2,3)") into RGBA8.
pub fn parse_color(color: &str) -> Result<[u8; 4], String> {
    csscolorparser::parse(color)
        .map(|c| c.to_rgba8())
        .map_err(|e| format!("Invalid color {:?}: {}", color, e))
}

/// 256x256 checkerboard of `square_size` texel squares, `color1` in the
/// top-left square.
///
/// A square size that does not divide 256 leaves a clipped last row and
/// column.
pub fn generate_checkerboard(
    square_size: u32,
    color1: &str,
    color2: &str,
) -> Result<RgbaImage, String> {
    if square_size == 0 {
        return Err(String::from("Checkerboard square size must be positive"));
    }
    let even = Rgba(parse_color(color1)?);
    let odd = Rgba(parse_color(color2)?);

    Ok(RgbaImage::from_fn(
        CHECKERBOARD_SIZE,
        CHECKERBOARD_SIZE,
        |x, y| {
            let col = x / square_size;
            let row = y / square_size;
            if (col + row) % 2 == 0 {
                even
            } else {
                odd
            }
        },
    ))
}

/// 128x128 white square with `label` drawn centered in bold black strokes.
pub fn generate_face_texture(label: u32) -> Result<RgbaImage, String> {
    if label > 99 {
        return Err(format!("Face label {} has more than two digits", label));
    }

    let digits: Vec<u32> = if label >= 10 {
        vec![label / 10, label % 10]
    } else {
        vec![label]
    };

    // Segments in texel space, y pointing down.
    let center = FACE_TEXTURE_SIZE as f32 / 2.0;
    let advance = GLYPH_HALF_WIDTH * 2.0 + GLYPH_GAP;
    let first_x = center - advance * (digits.len() as f32 - 1.0) / 2.0;

    let mut segments = Vec::new();
    for (i, digit) in digits.iter().enumerate() {
        let cx = first_x + advance * i as f32;
        for (a, b) in digit_strokes(*digit) {
            segments.push((
                Vec2::new(cx + a.x * GLYPH_HALF_WIDTH, center - a.y * GLYPH_HALF_HEIGHT),
                Vec2::new(cx + b.x * GLYPH_HALF_WIDTH, center - b.y * GLYPH_HALF_HEIGHT),
            ));
        }
    }

    let radius = GLYPH_STROKE / 2.0;
    Ok(RgbaImage::from_fn(
        FACE_TEXTURE_SIZE,
        FACE_TEXTURE_SIZE,
        |x, y| {
            let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
            let inked = segments
                .iter()
                .any(|(a, b)| distance_to_segment(p, *a, *b) <= radius);
            if inked {
                FACE_INK
            } else {
                FACE_BACKGROUND
            }
        },
    ))
}

fn distance_to_segment(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    let ab = b - a;
    let len2 = ab.length_squared();
    if len2 < 1e-6 {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len2).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

/// Stroke segments for a digit in a unit glyph box: x and y in [-1, 1],
/// y pointing up. Strokes get round caps from the distance test, which
/// closes the joints.
fn digit_strokes(digit: u32) -> Vec<(Vec2, Vec2)> {
    let tl = Vec2::new(-1.0, 1.0);
    let tr = Vec2::new(1.0, 1.0);
    let ml = Vec2::new(-1.0, 0.0);
    let mr = Vec2::new(1.0, 0.0);
    let bl = Vec2::new(-1.0, -1.0);
    let br = Vec2::new(1.0, -1.0);

    let top = (tl, tr);
    let upper_right = (tr, mr);
    let lower_right = (mr, br);
    let bottom = (bl, br);
    let lower_left = (ml, bl);
    let upper_left = (tl, ml);
    let middle = (ml, mr);

    match digit {
        0 => vec![top, upper_right, lower_right, bottom, lower_left, upper_left],
        1 => vec![
            (Vec2::new(0.0, 1.0), Vec2::new(0.0, -1.0)),
            (Vec2::new(-0.6, 0.6), Vec2::new(0.0, 1.0)),
            (Vec2::new(-0.6, -1.0), Vec2::new(0.6, -1.0)),
        ],
        2 => vec![top, upper_right, middle, lower_left, bottom],
        3 => vec![top, upper_right, middle, lower_right, bottom],
        4 => vec![upper_left, middle, upper_right, lower_right],
        5 => vec![top, upper_left, middle, lower_right, bottom],
        6 => vec![top, upper_left, middle, lower_right, bottom, lower_left],
        7 => vec![top, upper_right, lower_right],
        8 => vec![top, upper_right, lower_right, bottom, lower_left, upper_left, middle],
        _ => vec![top, upper_right, lower_right, bottom, upper_left, middle],
    }
}

/// Wrap RGBA8 texels in an sRGB Bevy image usable as a material texture.
pub fn to_bevy_image(texels: RgbaImage) -> Image {
    let (width, height) = texels.dimensions();
    Image::new(
        Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        TextureDimension::D2,
        texels.into_raw(),
        TextureFormat::Rgba8UnormSrgb,
        RenderAssetUsages::default(),
    )
}

/// Like [`to_bevy_image`], with a repeating sampler so the ground material
/// can tile it.
pub fn to_repeating_bevy_image(texels: RgbaImage) -> Image {
    let mut image = to_bevy_image(texels);
    image.sampler = ImageSampler::Descriptor(ImageSamplerDescriptor {
        address_mode_u: ImageAddressMode::Repeat,
        address_mode_v: ImageAddressMode::Repeat,
        ..default()
    });
    image
}

#[cfg(test)]
mod tests {
    use super::*;

    const DARK: Rgba<u8> = Rgba([0x44, 0x44, 0x44, 255]);
    const LIGHT: Rgba<u8> = Rgba([0x88, 0x88, 0x88, 255]);

    #[test]
    fn test_checkerboard_two_by_two() {
        let img = generate_checkerboard(128, "#444444", "#888888").unwrap();
        assert_eq!(img.dimensions(), (256, 256));

        // Quadrant corners and centers
        for (x, y, expected) in [
            (0, 0, DARK),
            (127, 127, DARK),
            (128, 0, LIGHT),
            (255, 127, LIGHT),
            (0, 128, LIGHT),
            (127, 255, LIGHT),
            (128, 128, DARK),
            (255, 255, DARK),
            (64, 64, DARK),
            (192, 64, LIGHT),
        ] {
            assert_eq!(*img.get_pixel(x, y), expected, "pixel ({x}, {y})");
        }
    }

    #[test]
    fn test_checkerboard_counts_squares() {
        let img = generate_checkerboard(32, "#444444", "#888888").unwrap();
        // Walking along the top row flips color every 32 texels: 8 squares.
        let flips = (1..256)
            .filter(|x| img.get_pixel(*x, 0) != img.get_pixel(*x - 1, 0))
            .count();
        assert_eq!(flips, 7);
    }

    #[test]
    fn test_checkerboard_uneven_square_size_is_clipped() {
        let img = generate_checkerboard(100, "#444444", "#888888").unwrap();
        assert_eq!(*img.get_pixel(99, 0), DARK);
        assert_eq!(*img.get_pixel(100, 0), LIGHT);
        assert_eq!(*img.get_pixel(200, 0), DARK);
        assert_eq!(*img.get_pixel(255, 255), DARK);
    }

    #[test]
    fn test_checkerboard_rejects_bad_input() {
        assert!(generate_checkerboard(0, "#444444", "#888888").is_err());
        assert!(generate_checkerboard(128, "#44", "not a color").is_err());
    }

    #[test]
    fn test_face_texture_has_centered_ink() {
        for label in 1..=6 {
            let img = generate_face_texture(label).unwrap();
            assert_eq!(img.dimensions(), (128, 128));
            // Corners stay white.
            assert_eq!(*img.get_pixel(0, 0), FACE_BACKGROUND);
            assert_eq!(*img.get_pixel(127, 127), FACE_BACKGROUND);

            let inked: Vec<(u32, u32)> = img
                .enumerate_pixels()
                .filter(|(_, _, p)| **p == FACE_INK)
                .map(|(x, y, _)| (x, y))
                .collect();
            assert!(!inked.is_empty(), "face {label} has no glyph");

            let min_y = inked.iter().map(|(_, y)| *y).min().unwrap();
            let max_y = inked.iter().map(|(_, y)| *y).max().unwrap();
            let mid = (min_y + max_y) as f32 / 2.0;
            assert!((mid - 64.0).abs() <= 1.0, "face {label} not centered");
        }
    }

    #[test]
    fn test_face_textures_differ() {
        let two = generate_face_texture(2).unwrap();
        let five = generate_face_texture(5).unwrap();
        assert_ne!(two.as_raw(), five.as_raw());
        assert!(generate_face_texture(100).is_err());
    }

    #[test]
    fn test_bevy_image_dimensions() {
        let image = to_repeating_bevy_image(generate_checkerboard(64, "#000", "#fff").unwrap());
        assert_eq!(image.width(), 256);
        assert_eq!(image.height(), 256);
    }
}
