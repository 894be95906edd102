//! Dominant color extraction for card header colors.
//!
//! Catima stores a card's header color as a signed 32-bit ARGB integer
//! (Android's `@ColorInt`). The color picked here is the most frequent
//! non-transparent RGB value of the provider logo, with alpha forced to
//! `0xFF`.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use image::RgbaImage;

use crate::error::{Error, Result};

/// Header color used when a provider has no logo.
pub const NO_ICON_COLOR: i32 = -9_977_996;

/// Color returned for an image with no visible pixel.
pub const TRANSPARENT_COLOR: i32 = 0;

/// Decode the icon at `path` and return its dominant color.
///
/// The format is detected from the file content, not its extension.
///
/// # Errors
///
/// Returns `Io` if the file cannot be read and `IconDecode` if it is not
/// a supported image.
pub fn dominant_color(path: &Path) -> Result<i32> {
    let bytes = fs::read(path)?;
    let icon = image::load_from_memory(&bytes)
        .map_err(|source| Error::IconDecode {
            path: path.to_path_buf(),
            source,
        })?
        .to_rgba8();

    Ok(dominant_color_of(&icon))
}

/// Dominant color of an already decoded image.
///
/// Fully transparent pixels are ignored. On equal counts the color seen
/// first in pixel order wins. Returns [`TRANSPARENT_COLOR`] when every pixel
/// is transparent.
#[must_use]
pub fn dominant_color_of(image: &RgbaImage) -> i32 {
    // rgb -> (count, first seen index)
    let mut counts: HashMap<[u8; 3], (u64, usize)> = HashMap::new();

    for pixel in image.pixels() {
        let [r, g, b, a] = pixel.0;
        if a == 0 {
            continue;
        }
        let next = counts.len();
        counts.entry([r, g, b]).or_insert((0, next)).0 += 1;
    }

    counts
        .into_iter()
        .max_by(|(_, (count_a, first_a)), (_, (count_b, first_b))| {
            count_a.cmp(count_b).then(first_b.cmp(first_a))
        })
        .map_or(TRANSPARENT_COLOR, |(rgb, _)| opaque_argb(rgb))
}

/// Pack an RGB triple as `0xFFRRGGBB` reinterpreted as `i32`.
#[must_use]
pub fn opaque_argb([r, g, b]: [u8; 3]) -> i32 {
    let argb = 0xFF00_0000 | (u32::from(r) << 16) | (u32::from(g) << 8) | u32::from(b);
    i32::from_ne_bytes(argb.to_ne_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use tempfile::TempDir;

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
    const BLUE: Rgba<u8> = Rgba([0, 0, 255, 255]);
    const CLEAR: Rgba<u8> = Rgba([0, 0, 0, 0]);

    fn image_from(pixels: &[Rgba<u8>]) -> RgbaImage {
        let width = u32::try_from(pixels.len()).unwrap();
        RgbaImage::from_fn(width, 1, |x, _| pixels[x as usize])
    }

    #[test]
    fn test_opaque_red() {
        assert_eq!(dominant_color_of(&image_from(&[RED])), -65536);
    }

    #[test]
    fn test_fully_transparent_is_zero() {
        assert_eq!(dominant_color_of(&image_from(&[CLEAR, CLEAR])), 0);
    }

    #[test]
    fn test_transparent_pixels_ignored() {
        let image = image_from(&[CLEAR, CLEAR, CLEAR, BLUE]);
        assert_eq!(dominant_color_of(&image), opaque_argb([0, 0, 255]));
    }

    #[test]
    fn test_semi_transparent_pixels_count_without_alpha() {
        let image = image_from(&[Rgba([0, 0, 255, 1]), Rgba([0, 0, 255, 128]), RED]);
        assert_eq!(dominant_color_of(&image), opaque_argb([0, 0, 255]));
    }

    #[test]
    fn test_majority_wins() {
        let image = image_from(&[RED, BLUE, BLUE]);
        assert_eq!(dominant_color_of(&image), opaque_argb([0, 0, 255]));
    }

    #[test]
    fn test_tie_goes_to_first_seen() {
        let blue_first = image_from(&[BLUE, RED, RED, BLUE]);
        assert_eq!(dominant_color_of(&blue_first), opaque_argb([0, 0, 255]));

        let red_first = image_from(&[RED, BLUE, BLUE, RED]);
        assert_eq!(dominant_color_of(&red_first), -65536);
    }

    #[test]
    fn test_alpha_byte_always_set() {
        for rgb in [[0, 0, 0], [1, 2, 3], [255, 255, 255], [18, 52, 86]] {
            let color = opaque_argb(rgb);
            assert!(color < 0);
            assert_eq!(color.to_be_bytes()[0], 0xFF);
        }
        assert_eq!(opaque_argb([0, 0, 0]), -16_777_216);
        assert_eq!(opaque_argb([255, 255, 255]), -1);
    }

    #[test]
    fn test_dominant_color_from_png_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("icon.png");
        image_from(&[RED, RED, BLUE]).save(&path).unwrap();

        assert_eq!(dominant_color(&path).unwrap(), -65536);
    }

    #[test]
    fn test_undecodable_icon() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("icon.png");
        fs::write(&path, b"definitely not an image").unwrap();

        let err = dominant_color(&path).unwrap_err();
        assert!(matches!(err, Error::IconDecode { .. }));
    }
}
