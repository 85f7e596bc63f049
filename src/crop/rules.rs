//! Orientation categories and their square crop rules.
//!
//! Raw images arrive sorted into five orientation folders, each implying a
//! deterministic square crop. The rules live in one dispatch table
//! (`Orientation::crop_window`) instead of per-folder code paths, so each
//! category's geometry is visible in one place.
//!
//! Coordinates are 0-indexed with the origin at the top-left corner.

use crate::utils::error::PrepError;
use image::DynamicImage;

/// The five fixed orientation categories of the raw input tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    /// Subject centered; crop the middle square of the longer axis.
    Centre,
    /// Landscape photo, subject on the left; keep the left square.
    LandscapeLeft,
    /// Landscape photo, subject on the right; keep the right square.
    LandscapeRight,
    /// Portrait photo, subject at the top; keep the top square.
    PortraitTop,
    /// Portrait photo, subject at the bottom; keep the bottom square.
    PortraitBottom,
}

impl Orientation {
    /// All categories, in the order the cropper visits them.
    pub const ALL: [Orientation; 5] = [
        Orientation::Centre,
        Orientation::LandscapeLeft,
        Orientation::LandscapeRight,
        Orientation::PortraitTop,
        Orientation::PortraitBottom,
    ];

    /// Subdirectory name of this category under a subject directory.
    pub fn dir_name(self) -> &'static str {
        match self {
            Orientation::Centre => "centre",
            Orientation::LandscapeLeft => "landscape_left",
            Orientation::LandscapeRight => "landscape_right",
            Orientation::PortraitTop => "portrait_top",
            Orientation::PortraitBottom => "portrait_bottom",
        }
    }

    /// Compute the square crop window for a `width` x `height` image.
    ///
    /// The landscape categories assume width >= height and the portrait
    /// categories assume height >= width; an input violating its folder's
    /// assumption yields [`PrepError::OrientationMismatch`], since the
    /// implied offset would be negative.
    pub fn crop_window(self, width: u32, height: u32) -> Result<CropWindow, PrepError> {
        let window = match self {
            Orientation::Centre => {
                if height < width {
                    // Centre square of a landscape image, offset truncated.
                    CropWindow {
                        x: (width - height) / 2,
                        y: 0,
                        side: height,
                    }
                } else if width < height {
                    // Centre square of a portrait image.
                    CropWindow {
                        x: 0,
                        y: (height - width) / 2,
                        side: width,
                    }
                } else {
                    // Already square: identity.
                    CropWindow {
                        x: 0,
                        y: 0,
                        side: width,
                    }
                }
            }
            Orientation::LandscapeLeft => {
                self.require(width >= height, width, height)?;
                CropWindow {
                    x: 0,
                    y: 0,
                    side: height,
                }
            }
            Orientation::LandscapeRight => {
                self.require(width >= height, width, height)?;
                CropWindow {
                    x: width - height,
                    y: 0,
                    side: height,
                }
            }
            Orientation::PortraitTop => {
                self.require(height >= width, width, height)?;
                CropWindow {
                    x: 0,
                    y: 0,
                    side: width,
                }
            }
            Orientation::PortraitBottom => {
                self.require(height >= width, width, height)?;
                CropWindow {
                    x: 0,
                    y: height - width,
                    side: width,
                }
            }
        };

        Ok(window)
    }

    fn require(self, condition: bool, width: u32, height: u32) -> Result<(), PrepError> {
        if condition {
            Ok(())
        } else {
            Err(PrepError::OrientationMismatch {
                orientation: self.dir_name(),
                width,
                height,
            })
        }
    }
}

impl std::fmt::Display for Orientation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// A square region of an image: top-left corner plus side length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropWindow {
    pub x: u32,
    pub y: u32,
    pub side: u32,
}

impl CropWindow {
    /// Extract this window from an image, preserving the color type
    /// (an alpha channel passes through untouched).
    pub fn apply(&self, img: &DynamicImage) -> DynamicImage {
        img.crop_imm(self.x, self.y, self.side, self.side)
    }

    /// Whether the window is the whole image (the identity crop).
    pub fn is_identity(&self, width: u32, height: u32) -> bool {
        self.x == 0 && self.y == 0 && self.side == width && self.side == height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centre_landscape_window() {
        // 100 tall x 200 wide: columns [50, 150), all rows.
        let w = Orientation::Centre.crop_window(200, 100).unwrap();
        assert_eq!(w, CropWindow { x: 50, y: 0, side: 100 });
    }

    #[test]
    fn test_centre_portrait_window() {
        // 200 tall x 100 wide: rows [50, 150), all columns.
        let w = Orientation::Centre.crop_window(100, 200).unwrap();
        assert_eq!(w, CropWindow { x: 0, y: 50, side: 100 });
    }

    #[test]
    fn test_centre_offset_truncates() {
        // (W - H) = 101 -> offset 50, not 50.5.
        let w = Orientation::Centre.crop_window(201, 100).unwrap();
        assert_eq!(w.x, 50);
        assert_eq!(w.side, 100);
    }

    #[test]
    fn test_centre_square_is_identity() {
        let w = Orientation::Centre.crop_window(128, 128).unwrap();
        assert!(w.is_identity(128, 128));
    }

    #[test]
    fn test_landscape_left_window() {
        let w = Orientation::LandscapeLeft.crop_window(120, 80).unwrap();
        assert_eq!(w, CropWindow { x: 0, y: 0, side: 80 });
    }

    #[test]
    fn test_landscape_right_window() {
        // 80 tall x 120 wide: columns [40, 120).
        let w = Orientation::LandscapeRight.crop_window(120, 80).unwrap();
        assert_eq!(w, CropWindow { x: 40, y: 0, side: 80 });
    }

    #[test]
    fn test_portrait_top_window() {
        let w = Orientation::PortraitTop.crop_window(80, 120).unwrap();
        assert_eq!(w, CropWindow { x: 0, y: 0, side: 80 });
    }

    #[test]
    fn test_portrait_bottom_window() {
        // 120 tall x 80 wide: rows [40, 120).
        let w = Orientation::PortraitBottom.crop_window(80, 120).unwrap();
        assert_eq!(w, CropWindow { x: 0, y: 40, side: 80 });
    }

    #[test]
    fn test_landscape_square_input_allowed() {
        // W == H satisfies W >= H; the full frame is the square.
        let w = Orientation::LandscapeRight.crop_window(64, 64).unwrap();
        assert!(w.is_identity(64, 64));
    }

    #[test]
    fn test_landscape_rejects_portrait_input() {
        let err = Orientation::LandscapeRight.crop_window(80, 120).unwrap_err();
        assert!(matches!(err, PrepError::OrientationMismatch { .. }));
    }

    #[test]
    fn test_portrait_rejects_landscape_input() {
        let err = Orientation::PortraitBottom.crop_window(120, 80).unwrap_err();
        assert!(matches!(err, PrepError::OrientationMismatch { .. }));
    }

    #[test]
    fn test_apply_extracts_expected_pixels() {
        use image::{Rgb, RgbImage};

        // Horizontal gradient: red channel encodes the column index.
        let src = RgbImage::from_fn(200, 100, |x, y| Rgb([x as u8, y as u8, 0]));
        let src = DynamicImage::ImageRgb8(src);

        let window = Orientation::Centre.crop_window(200, 100).unwrap();
        let cropped = window.apply(&src).to_rgb8();

        assert_eq!(cropped.dimensions(), (100, 100));
        assert_eq!(cropped.get_pixel(0, 0)[0], 50);
        assert_eq!(cropped.get_pixel(99, 0)[0], 149);
    }
}
