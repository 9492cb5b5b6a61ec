use super::composite_writer::save_composite;
use super::frame_source::{FileFrameSource, FrameSource};
use super::orientation::{CompositePlan, read_orientation};
use super::slice_assembler::{AssemblerOptions, SliceAssembler};
use crate::config::{AssemblySettings, JobConfig};
use crate::tools::{collect_frame_sequence, discover_frame_range};
use anyhow::{Context, Result, bail};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use log::info;
use rust_i18n::t;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::time::{Duration, Instant};

impl From<AssemblySettings> for AssemblerOptions {
    fn from(settings: AssemblySettings) -> Self {
        Self {
            batch_size: settings.batch_size,
            worker_count: settings.worker_count,
        }
    }
}

/// 合成結果
#[derive(Debug)]
pub struct GenerationResult {
    pub frame_count: usize,
    pub missing_count: usize,
    pub output_path: PathBuf,
    pub elapsed: Duration,
}

/// 縮時切片合成器
///
/// 流程：
/// A. 依命名規則建立影像序列（略過缺漏檔案）
/// B. 讀取第一張影像的 EXIF 方向，決定切片方向與是否反轉序列
/// C. 平行組裝切片
/// D. 旋轉並儲存合成圖
pub struct SlitScanGenerator {
    assembly: AssemblySettings,
    shutdown_signal: Arc<AtomicBool>,
    show_progress: bool,
}

impl SlitScanGenerator {
    pub const fn new(assembly: AssemblySettings, shutdown_signal: Arc<AtomicBool>) -> Self {
        Self {
            assembly,
            shutdown_signal,
            show_progress: false,
        }
    }

    #[must_use]
    pub const fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// 讀取設定檔並執行一次合成，結果輸出到終端機
    pub fn run(&self, job_path: &Path) -> Result<GenerationResult> {
        println!("{}", style(t!("slit_scan.title")).cyan().bold());

        let job = JobConfig::load(job_path)?;
        println!(
            "{} {}",
            style(t!("slit_scan.input_dir")).dim(),
            job.input.dir.display()
        );

        let result = self.generate(&job)?;
        self.print_summary(&result);

        Ok(result)
    }

    pub fn generate(&self, job: &JobConfig) -> Result<GenerationResult> {
        let start = Instant::now();
        job.validate()?;

        // Stage A: 建立影像序列
        let naming = job.input.naming();
        let (begin, end) = match job.input.explicit_range() {
            Some(range) => range,
            None => discover_frame_range(&job.input.dir, &naming)?.with_context(|| {
                format!(
                    "在 {} 找不到符合 {} 格式的影像",
                    job.input.dir.display(),
                    naming.file_name(0)
                )
            })?,
        };

        info!(
            "讀取影像 {} ~ {}",
            naming.file_name(begin),
            naming.file_name(end)
        );

        let sequence = collect_frame_sequence(&job.input.dir, &naming, begin, end)?;
        let Some(first_path) = sequence.paths.first() else {
            bail!("範圍內沒有任何影像: {} ~ {}", naming.file_name(begin), naming.file_name(end));
        };

        // Stage B: 方向
        let orientation = read_orientation(first_path)?;
        let plan = CompositePlan::new(orientation, job.options.is_reversed);
        info!(
            "EXIF 方向 {:?}，切片方向 {:?}，反轉序列: {}",
            orientation, plan.band_orientation, plan.reverse_sequence
        );

        let mut paths = sequence.paths;
        if plan.reverse_sequence {
            paths.reverse();
        }
        let source = FileFrameSource::new(paths);

        // Stage C: 組裝
        let mut assembler =
            SliceAssembler::new(self.assembly.into(), Arc::clone(&self.shutdown_signal));
        let progress = self.create_progress_bar(source.len());
        if let Some(progress) = &progress {
            assembler = assembler.with_progress(progress.clone());
        }

        let composite = assembler.assemble(&source, plan.band_orientation);
        if let Some(progress) = &progress {
            if composite.is_ok() {
                progress.finish_with_message(t!("slit_scan.progress_done").to_string());
            } else {
                progress.abandon_with_message(t!("slit_scan.progress_failed").to_string());
            }
        }

        // Stage D: 輸出
        let image = plan.finish(composite?);
        let output_path = save_composite(&image, &job.output.dir, &job.input.file_suffix)?;

        let elapsed = start.elapsed();
        info!("耗時 {:.2} 秒", elapsed.as_secs_f64());

        Ok(GenerationResult {
            frame_count: source.len(),
            missing_count: sequence.missing.len(),
            output_path,
            elapsed,
        })
    }

    fn create_progress_bar(&self, len: usize) -> Option<ProgressBar> {
        if !self.show_progress {
            return None;
        }

        let progress_bar = ProgressBar::new(len as u64);
        progress_bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")
                .expect("Invalid progress bar template")
                .progress_chars("#>-"),
        );
        progress_bar.set_message(t!("slit_scan.progress_running").to_string());
        Some(progress_bar)
    }

    fn print_summary(&self, result: &GenerationResult) {
        println!();
        println!("{}", style(t!("slit_scan.summary_title")).cyan().bold());
        println!(
            "  {}",
            t!("slit_scan.summary_frames", count = result.frame_count)
        );

        if result.missing_count > 0 {
            println!(
                "  {}",
                style(t!("slit_scan.summary_missing", count = result.missing_count)).yellow()
            );
        }

        println!(
            "  {} {}",
            t!("slit_scan.summary_output"),
            style(result.output_path.display()).green()
        );
        println!(
            "  {}",
            t!(
                "slit_scan.summary_elapsed",
                seconds = format!("{:.2}", result.elapsed.as_secs_f64())
            )
        );
    }
}
