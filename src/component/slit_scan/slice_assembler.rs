//! 切片組裝器
//!
//! 以固定大小的工作執行緒池平行解碼來源影像並擷取切片，
//! 再由呼叫端執行緒依完成順序寫入預先配置的畫布。
//! 每個切片的寫入區域在派送前就已決定且互不重疊，因此完成順序不影響結果。

use super::axis_mapper::{AxisMapping, Band};
use super::frame_source::FrameSource;
use anyhow::{Context, Result};
use image::{GenericImage, ImageError, RgbImage, imageops};
use indicatif::ProgressBar;
use log::{debug, error, info};
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;

/// 每批處理的影像數量，用來限制同時存在於記憶體中的解碼影像
pub const DEFAULT_BATCH_SIZE: usize = 100;
/// 工作執行緒數量
pub const DEFAULT_WORKER_COUNT: usize = 12;

/// 切片方向
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BandOrientation {
    /// 沿寬度切出直條，由左至右排列
    Vertical,
    /// 沿高度切出橫條，由上至下排列
    Horizontal,
}

impl BandOrientation {
    /// 目標軸長度：直條取寬度，橫條取高度
    #[must_use]
    pub const fn axis_length(self, (width, height): (u32, u32)) -> usize {
        match self {
            Self::Vertical => width as usize,
            Self::Horizontal => height as usize,
        }
    }

    /// 切片在影像中的區域 (x, y, 寬, 高)
    #[must_use]
    pub const fn region(self, band: Band, (width, height): (u32, u32)) -> (u32, u32, u32, u32) {
        match self {
            Self::Vertical => (band.offset as u32, 0, band.width as u32, height),
            Self::Horizontal => (0, band.offset as u32, width, band.width as u32),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssemblerOptions {
    pub batch_size: usize,
    pub worker_count: usize,
}

impl Default for AssemblerOptions {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            worker_count: DEFAULT_WORKER_COUNT,
        }
    }
}

/// 組裝失敗原因
#[derive(Debug)]
pub enum AssemblyError {
    EmptySequence,
    Decode {
        index: usize,
        source: anyhow::Error,
    },
    DimensionMismatch {
        index: usize,
        expected: (u32, u32),
        actual: (u32, u32),
    },
    Placement {
        index: usize,
        source: ImageError,
    },
    Cancelled,
}

impl AssemblyError {
    /// 造成失敗的影像序號
    #[must_use]
    pub const fn index(&self) -> Option<usize> {
        match self {
            Self::Decode { index, .. }
            | Self::DimensionMismatch { index, .. }
            | Self::Placement { index, .. } => Some(*index),
            Self::EmptySequence | Self::Cancelled => None,
        }
    }

    const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

impl fmt::Display for AssemblyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptySequence => write!(f, "影像序列為空"),
            Self::Decode { index, source } => write!(f, "第 {index} 張影像解碼失敗: {source:#}"),
            Self::DimensionMismatch {
                index,
                expected,
                actual,
            } => write!(
                f,
                "第 {index} 張影像尺寸不符: 預期 {}x{}，實際 {}x{}",
                expected.0, expected.1, actual.0, actual.1
            ),
            Self::Placement { index, source } => {
                write!(f, "第 {index} 張影像切片無法寫入畫布: {source}")
            }
            Self::Cancelled => write!(f, "操作已取消"),
        }
    }
}

impl std::error::Error for AssemblyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Decode { source, .. } => Some(source.as_ref()),
            Self::Placement { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// 從單張來源影像擷取出的切片，寫入畫布後即釋放
struct ImageSlice {
    band: Band,
    pixels: RgbImage,
}

impl ImageSlice {
    fn write_into(
        &self,
        canvas: &mut RgbImage,
        orientation: BandOrientation,
    ) -> Result<(), AssemblyError> {
        let (x, y, _, _) = orientation.region(self.band, canvas.dimensions());
        canvas
            .copy_from(&self.pixels, x, y)
            .map_err(|source| AssemblyError::Placement {
                index: self.band.index,
                source,
            })
    }
}

pub struct SliceAssembler {
    options: AssemblerOptions,
    shutdown_signal: Arc<AtomicBool>,
    progress: Option<ProgressBar>,
}

impl SliceAssembler {
    #[must_use]
    pub const fn new(options: AssemblerOptions, shutdown_signal: Arc<AtomicBool>) -> Self {
        Self {
            options,
            shutdown_signal,
            progress: None,
        }
    }

    /// 每處理完一張來源影像就推進一格
    #[must_use]
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = Some(progress);
        self
    }

    /// 組裝整個序列
    ///
    /// 畫布尺寸等於第一張影像尺寸；任何一張影像失敗都會中止整次組裝，不回傳部分結果。
    pub fn assemble<S>(&self, source: &S, orientation: BandOrientation) -> Result<RgbImage>
    where
        S: FrameSource + ?Sized,
    {
        if source.is_empty() {
            return Err(AssemblyError::EmptySequence.into());
        }

        // 以第一張影像的尺寸為基準
        let dimensions = source
            .dimensions()
            .map_err(|err| AssemblyError::Decode { index: 0, source: err })?;
        let mapping = AxisMapping::new(source.len(), orientation.axis_length(dimensions))?;
        let pool = self.build_pool()?;
        let mut canvas = RgbImage::new(dimensions.0, dimensions.1);

        let batch_size = self.options.batch_size.max(1);
        let batch_count = mapping.len().div_ceil(batch_size);

        info!(
            "開始組裝 {} 張影像 ({}x{}, {:?})，共 {} 批",
            mapping.len(),
            dimensions.0,
            dimensions.1,
            orientation,
            batch_count
        );

        for (batch_index, batch) in mapping.bands().chunks(batch_size).enumerate() {
            if self.shutdown_signal.load(Ordering::SeqCst) {
                return Err(AssemblyError::Cancelled.into());
            }

            self.run_batch(&pool, source, batch, orientation, dimensions, &mut canvas)?;
            info!("第 {}/{} 批完成", batch_index + 1, batch_count);
        }

        Ok(canvas)
    }

    fn build_pool(&self) -> Result<ThreadPool> {
        ThreadPoolBuilder::new()
            .num_threads(self.options.worker_count.max(1))
            .thread_name(|i| format!("slit-scan-{i}"))
            .build()
            .context("無法建立工作執行緒池")
    }

    /// 執行單一批次
    ///
    /// 切片在工作執行緒上產生，經由通道送回呼叫端執行緒寫入畫布。
    /// 批次結束時所有工作都已返回，該批的解碼影像也已全部釋放。
    fn run_batch<S>(
        &self,
        pool: &ThreadPool,
        source: &S,
        batch: &[Band],
        orientation: BandOrientation,
        dimensions: (u32, u32),
        canvas: &mut RgbImage,
    ) -> Result<(), AssemblyError>
    where
        S: FrameSource + ?Sized,
    {
        let abort = AtomicBool::new(false);
        let shutdown_signal = &self.shutdown_signal;
        let (sender, receiver) = mpsc::channel();
        let mut failure: Option<AssemblyError> = None;

        pool.in_place_scope(|scope| {
            for &band in batch {
                if band.width == 0 {
                    debug!("第 {} 張影像分配寬度為 0，略過", band.index);
                    self.tick();
                    continue;
                }

                let sender = sender.clone();
                let abort = &abort;
                scope.spawn(move |_| {
                    let result = if abort.load(Ordering::SeqCst)
                        || shutdown_signal.load(Ordering::SeqCst)
                    {
                        Err(AssemblyError::Cancelled)
                    } else {
                        extract_slice(source, band, orientation, dimensions)
                    };

                    if result.is_err() {
                        abort.store(true, Ordering::SeqCst);
                    }

                    // 接收端在 scope 結束前不會被釋放
                    let _ = sender.send(result);
                });
            }
            drop(sender);

            for result in receiver {
                match result {
                    Ok(slice) if failure.is_none() => match slice.write_into(canvas, orientation) {
                        Ok(()) => self.tick(),
                        Err(e) => record_failure(&mut failure, e),
                    },
                    Ok(_) => {}
                    Err(e) => record_failure(&mut failure, e),
                }
            }
        });

        failure.map_or(Ok(()), Err)
    }

    fn tick(&self) {
        if let Some(progress) = &self.progress {
            progress.inc(1);
        }
    }
}

/// 解碼單張影像並擷取其切片
fn extract_slice<S>(
    source: &S,
    band: Band,
    orientation: BandOrientation,
    expected: (u32, u32),
) -> Result<ImageSlice, AssemblyError>
where
    S: FrameSource + ?Sized,
{
    let frame = source
        .load_frame(band.index)
        .map_err(|source| AssemblyError::Decode {
            index: band.index,
            source,
        })?;

    let actual = frame.dimensions();
    if actual != expected {
        return Err(AssemblyError::DimensionMismatch {
            index: band.index,
            expected,
            actual,
        });
    }

    let (x, y, width, height) = orientation.region(band, expected);
    let pixels = imageops::crop_imm(&frame, x, y, width, height).to_image();

    Ok(ImageSlice { band, pixels })
}

/// 保留第一個實際錯誤；因其他工作失敗而取消的結果不會覆蓋它
fn record_failure(slot: &mut Option<AssemblyError>, err: AssemblyError) {
    if !err.is_cancelled() {
        error!("{err}");
    }

    let replace = slot
        .as_ref()
        .is_none_or(|existing| existing.is_cancelled() && !err.is_cancelled());
    if replace {
        *slot = Some(err);
    }
}
