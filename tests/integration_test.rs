//! 整合測試 - 以磁碟上的 PNG 影像驗證切片組裝

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use image::{Rgb, RgbImage};
use slit_scan::component::slit_scan::{
    AssemblerOptions, AssemblyError, AxisMapping, BandOrientation, FileFrameSource,
    SliceAssembler,
};
use tempfile::TempDir;

fn frame_color(index: usize) -> Rgb<u8> {
    Rgb([(index * 20) as u8, 100, 200])
}

/// 建立 `count` 張單色影像，第 i 張顏色為 `frame_color(i)`
fn write_frames(dir: &Path, count: usize, width: u32, height: u32) -> Vec<PathBuf> {
    (0..count)
        .map(|i| {
            let path = dir.join(format!("frame_{i:03}.png"));
            RgbImage::from_pixel(width, height, frame_color(i))
                .save(&path)
                .unwrap();
            path
        })
        .collect()
}

fn assembler() -> SliceAssembler {
    SliceAssembler::new(
        AssemblerOptions {
            batch_size: 3,
            worker_count: 4,
        },
        Arc::new(AtomicBool::new(false)),
    )
}

/// 測試 1: 直條切片由左至右依序排列
#[test]
fn test_vertical_bands_from_files() {
    let temp_dir = TempDir::new().unwrap();
    let paths = write_frames(temp_dir.path(), 8, 8, 3);
    let source = FileFrameSource::new(paths);

    let composite = assembler()
        .assemble(&source, BandOrientation::Vertical)
        .unwrap();

    assert_eq!(composite.dimensions(), (8, 3));
    for (x, _, pixel) in composite.enumerate_pixels() {
        assert_eq!(pixel, &frame_color(x as usize));
    }
}

/// 測試 2: 橫條切片寬度不整除時，多出的像素分給後面的影像
#[test]
fn test_horizontal_bands_uneven_split() {
    let temp_dir = TempDir::new().unwrap();
    let paths = write_frames(temp_dir.path(), 3, 4, 10);
    let source = FileFrameSource::new(paths);

    let composite = assembler()
        .assemble(&source, BandOrientation::Horizontal)
        .unwrap();

    let mapping = AxisMapping::new(3, 10).unwrap();
    for band in mapping.bands() {
        for y in band.offset..band.end() {
            for x in 0..4 {
                assert_eq!(composite.get_pixel(x, y as u32), &frame_color(band.index));
            }
        }
    }
}

/// 測試 3: 損壞的影像會中止組裝並回報序號
#[test]
fn test_corrupt_file_aborts_with_index() {
    let temp_dir = TempDir::new().unwrap();
    let paths = write_frames(temp_dir.path(), 5, 5, 2);
    fs::write(&paths[2], b"definitely not a png").unwrap();

    let err = assembler()
        .assemble(&FileFrameSource::new(paths), BandOrientation::Vertical)
        .unwrap_err();

    let assembly_error = err.downcast_ref::<AssemblyError>().unwrap();
    assert_eq!(assembly_error.index(), Some(2));
    assert!(format!("{err:#}").contains("frame_002.png"));
}

/// 測試 4: 尺寸不同的影像會被拒絕
#[test]
fn test_mismatched_file_dimensions() {
    let temp_dir = TempDir::new().unwrap();
    let mut paths = write_frames(temp_dir.path(), 4, 4, 2);
    let odd = temp_dir.path().join("odd.png");
    RgbImage::new(4, 3).save(&odd).unwrap();
    paths[1] = odd;

    let err = assembler()
        .assemble(&FileFrameSource::new(paths), BandOrientation::Horizontal)
        .unwrap_err();

    assert!(matches!(
        err.downcast_ref::<AssemblyError>(),
        Some(AssemblyError::DimensionMismatch { index: 1, .. })
    ));
}

/// 測試 5: 第一張影像的標頭損壞時，同樣回報為第 0 張解碼失敗
#[test]
fn test_corrupt_first_file_reports_index_zero() {
    let temp_dir = TempDir::new().unwrap();
    let paths = write_frames(temp_dir.path(), 3, 6, 2);
    fs::write(&paths[0], b"broken header").unwrap();

    let err = assembler()
        .assemble(&FileFrameSource::new(paths), BandOrientation::Vertical)
        .unwrap_err();

    assert!(matches!(
        err.downcast_ref::<AssemblyError>(),
        Some(AssemblyError::Decode { index: 0, .. })
    ));
    assert!(format!("{err:#}").contains("frame_000.png"));
}
