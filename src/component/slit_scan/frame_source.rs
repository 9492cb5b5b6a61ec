//! 來源影像提供者
//!
//! 組裝器只透過 [`FrameSource`] 取得已解碼的 RGB 影像，
//! 不關心影像來自磁碟檔案或記憶體。

use anyhow::{Context, Result};
use image::RgbImage;
use std::path::{Path, PathBuf};

/// 依序號提供已解碼影像
///
/// 實作必須可跨執行緒共享，解碼工作會在工作執行緒上呼叫 [`FrameSource::load_frame`]。
pub trait FrameSource: Sync {
    /// 序列長度
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 第一張影像的 (寬, 高)，作為整個序列的基準尺寸
    fn dimensions(&self) -> Result<(u32, u32)>;

    /// 解碼第 `index` 張影像
    fn load_frame(&self, index: usize) -> Result<RgbImage>;
}

/// 磁碟上的影像檔序列
#[derive(Debug, Clone)]
pub struct FileFrameSource {
    paths: Vec<PathBuf>,
}

impl FileFrameSource {
    #[must_use]
    pub const fn new(paths: Vec<PathBuf>) -> Self {
        Self { paths }
    }

    #[must_use]
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    fn path(&self, index: usize) -> Result<&Path> {
        self.paths
            .get(index)
            .map(PathBuf::as_path)
            .with_context(|| format!("序號超出範圍: {index}"))
    }
}

impl FrameSource for FileFrameSource {
    fn len(&self) -> usize {
        self.paths.len()
    }

    fn dimensions(&self) -> Result<(u32, u32)> {
        let path = self.path(0)?;
        image::image_dimensions(path)
            .with_context(|| format!("無法讀取影像尺寸: {}", path.display()))
    }

    fn load_frame(&self, index: usize) -> Result<RgbImage> {
        let path = self.path(index)?;
        let frame = image::open(path)
            .with_context(|| format!("無法解碼影像: {}", path.display()))?;
        Ok(frame.into_rgb8())
    }
}

/// 已在記憶體中的影像序列
#[derive(Debug, Clone, Default)]
pub struct MemoryFrameSource {
    frames: Vec<RgbImage>,
}

impl MemoryFrameSource {
    #[must_use]
    pub const fn new(frames: Vec<RgbImage>) -> Self {
        Self { frames }
    }
}

impl FrameSource for MemoryFrameSource {
    fn len(&self) -> usize {
        self.frames.len()
    }

    fn dimensions(&self) -> Result<(u32, u32)> {
        self.frames
            .first()
            .map(RgbImage::dimensions)
            .context("影像序列為空")
    }

    fn load_frame(&self, index: usize) -> Result<RgbImage> {
        self.frames
            .get(index)
            .cloned()
            .with_context(|| format!("序號超出範圍: {index}"))
    }
}
