//! Grid-to-image conversion for height and alpha data

use image::{GrayImage, ImageBuffer, Luma};

use crate::world::{TerrainError, TerrainResult};

/// Unnormalized 16-bit height image, one pixel per vertex
pub type HeightMapImage = ImageBuffer<Luma<u16>, Vec<u16>>;

fn check_len(width: u32, height: u32, actual: usize) -> Option<usize> {
    let expected = width as usize * height as usize;
    (expected == actual).then_some(expected)
}

/// Build the 16-bit height image, row-major, `(x, y) = heights[y * width + x]`
pub fn height_image(width: u32, height: u32, heights: &[u16]) -> TerrainResult<HeightMapImage> {
    let expected = check_len(width, height, heights.len()).ok_or(TerrainError::MalformedHeights {
        expected: width as usize * height as usize,
        actual: heights.len(),
    })?;
    tracing::trace!("Building {}x{} height image ({} samples)", width, height, expected);

    ImageBuffer::from_raw(width, height, heights.to_vec()).ok_or(TerrainError::MalformedHeights {
        expected,
        actual: heights.len(),
    })
}

/// Build an 8-bit preview stretched between the lowest and highest sample.
/// A flat grid maps to black.
pub fn height_preview(width: u32, height: u32, heights: &[u16]) -> TerrainResult<GrayImage> {
    check_len(width, height, heights.len()).ok_or(TerrainError::MalformedHeights {
        expected: width as usize * height as usize,
        actual: heights.len(),
    })?;

    let min = heights.iter().copied().min().unwrap_or(0);
    let max = heights.iter().copied().max().unwrap_or(0);
    let range = (max - min) as u32;

    let pixels: Vec<u8> = heights
        .iter()
        .map(|&h| {
            if range == 0 {
                0
            } else {
                (((h - min) as u32 * 255 + range / 2) / range) as u8
            }
        })
        .collect();

    ImageBuffer::from_raw(width, height, pixels).ok_or(TerrainError::MalformedHeights {
        expected: width as usize * height as usize,
        actual: heights.len(),
    })
}

/// Build an 8-bit mask from one packed alpha layer
pub fn alpha_image(width: u32, height: u32, alpha: &[u8]) -> TerrainResult<GrayImage> {
    let vertex_count = width as usize * height as usize;
    let err = TerrainError::MalformedAlphaMaps {
        len: alpha.len(),
        vertex_count,
    };
    if check_len(width, height, alpha.len()).is_none() {
        return Err(err);
    }
    ImageBuffer::from_raw(width, height, alpha.to_vec()).ok_or(err)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_height_image_layout() {
        let img = height_image(3, 2, &[0, 1, 2, 3, 4, 5]).unwrap();
        assert_eq!(img.dimensions(), (3, 2));
        assert_eq!(img.get_pixel(2, 0)[0], 2);
        assert_eq!(img.get_pixel(0, 1)[0], 3);
    }

    #[test]
    fn test_height_image_rejects_short_slice() {
        let err = height_image(2, 2, &[1, 2, 3]).unwrap_err();
        assert!(matches!(err, TerrainError::MalformedHeights { expected: 4, actual: 3 }));
    }

    #[test]
    fn test_empty_grid() {
        let img = height_image(0, 0, &[]).unwrap();
        assert_eq!(img.dimensions(), (0, 0));
        let preview = height_preview(0, 4, &[]).unwrap();
        assert_eq!(preview.dimensions(), (0, 4));
    }

    #[test]
    fn test_preview_stretch() {
        let img = height_preview(2, 2, &[100, 200, 300, 100]).unwrap();
        assert_eq!(img.get_pixel(0, 0)[0], 0);
        assert_eq!(img.get_pixel(0, 1)[0], 255);
        assert_eq!(img.get_pixel(1, 0)[0], 128);
    }

    #[test]
    fn test_flat_preview_is_black() {
        let img = height_preview(2, 1, &[32768, 32768]).unwrap();
        assert!(img.pixels().all(|p| p[0] == 0));
    }
}
