//! 拍攝方向處理
//!
//! 組裝器只處理原始像素方向。這裡根據第一張影像的 EXIF 方向決定
//! 切片方向與序列是否反轉，並在組裝完成後將合成圖轉回正確方向。

use super::slice_assembler::BandOrientation;
use anyhow::{Context, Result};
use image::metadata::Orientation;
use image::{DynamicImage, ImageDecoder, ImageReader, RgbImage};
use std::path::Path;

/// 讀取影像的 EXIF 方向，沒有方向資訊時視為不需轉向
pub fn read_orientation(path: &Path) -> Result<Orientation> {
    let mut decoder = ImageReader::open(path)
        .with_context(|| format!("無法開啟影像: {}", path.display()))?
        .with_guessed_format()
        .with_context(|| format!("無法判斷影像格式: {}", path.display()))?
        .into_decoder()
        .with_context(|| format!("無法建立解碼器: {}", path.display()))?;

    decoder
        .orientation()
        .with_context(|| format!("無法讀取 EXIF 方向: {}", path.display()))
}

/// 一次合成的方向計畫
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompositePlan {
    pub band_orientation: BandOrientation,
    /// 組裝前是否反轉來源序列
    pub reverse_sequence: bool,
    /// 組裝後套用的旋轉
    pub rotation: Orientation,
}

impl CompositePlan {
    /// 翻轉類的 EXIF 方向不處理，視同正向
    #[must_use]
    pub fn new(orientation: Orientation, is_reversed: bool) -> Self {
        let (band_orientation, flips_time_axis, rotation) = match orientation {
            Orientation::Rotate90 => (BandOrientation::Horizontal, true, Orientation::Rotate90),
            Orientation::Rotate180 => (BandOrientation::Vertical, true, Orientation::Rotate180),
            Orientation::Rotate270 => (BandOrientation::Horizontal, false, Orientation::Rotate270),
            _ => (BandOrientation::Vertical, false, Orientation::NoTransforms),
        };

        Self {
            band_orientation,
            reverse_sequence: is_reversed ^ flips_time_axis,
            rotation,
        }
    }

    /// 將組裝完成的畫布轉為最終輸出方向
    #[must_use]
    pub fn finish(&self, composite: RgbImage) -> DynamicImage {
        let mut image = DynamicImage::ImageRgb8(composite);
        image.apply_orientation(self.rotation);
        image
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;
    use tempfile::TempDir;

    #[test]
    fn test_upright_frames() {
        let plan = CompositePlan::new(Orientation::NoTransforms, false);
        assert_eq!(plan.band_orientation, BandOrientation::Vertical);
        assert!(!plan.reverse_sequence);
        assert_eq!(plan.rotation, Orientation::NoTransforms);

        assert!(CompositePlan::new(Orientation::NoTransforms, true).reverse_sequence);
    }

    #[test]
    fn test_upside_down_frames_flip_time_axis() {
        let plan = CompositePlan::new(Orientation::Rotate180, false);
        assert_eq!(plan.band_orientation, BandOrientation::Vertical);
        assert!(plan.reverse_sequence);
        assert!(!CompositePlan::new(Orientation::Rotate180, true).reverse_sequence);
    }

    #[test]
    fn test_portrait_frames_use_horizontal_bands() {
        let clockwise = CompositePlan::new(Orientation::Rotate90, false);
        assert_eq!(clockwise.band_orientation, BandOrientation::Horizontal);
        assert!(clockwise.reverse_sequence);

        let counter_clockwise = CompositePlan::new(Orientation::Rotate270, false);
        assert_eq!(counter_clockwise.band_orientation, BandOrientation::Horizontal);
        assert!(!counter_clockwise.reverse_sequence);
    }

    #[test]
    fn test_mirrored_orientation_is_ignored() {
        let plan = CompositePlan::new(Orientation::FlipHorizontal, false);
        assert_eq!(plan, CompositePlan::new(Orientation::NoTransforms, false));
    }

    #[test]
    fn test_finish_rotates_composite() {
        let mut composite = RgbImage::new(4, 2);
        composite.put_pixel(0, 0, Rgb([255, 0, 0]));

        let rotated = CompositePlan::new(Orientation::Rotate90, false).finish(composite.clone());
        assert_eq!((rotated.width(), rotated.height()), (2, 4));
        // 順時針 90 度後左上角移到右上角
        assert_eq!(rotated.to_rgb8().get_pixel(1, 0), &Rgb([255, 0, 0]));

        let upright = CompositePlan::new(Orientation::NoTransforms, false).finish(composite.clone());
        assert_eq!(upright.to_rgb8(), composite);
    }

    #[test]
    fn test_read_orientation_without_exif() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("frame.png");
        RgbImage::new(2, 2).save(&path).unwrap();

        assert_eq!(read_orientation(&path).unwrap(), Orientation::NoTransforms);
    }
}
