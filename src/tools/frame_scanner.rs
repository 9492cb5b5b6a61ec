//! 依命名規則建立來源影像序列

use anyhow::{Context, Result};
use log::{debug, warn};
use regex::Regex;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// 連續編號影像的命名規則：`{prefix}{編號補零}.{suffix}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameNaming {
    pub prefix: String,
    pub digit_length: usize,
    pub suffix: String,
}

impl FrameNaming {
    #[must_use]
    pub fn file_name(&self, number: u64) -> String {
        format!(
            "{}{:0width$}.{}",
            self.prefix,
            number,
            self.suffix,
            width = self.digit_length
        )
    }

    /// 前綴與位數需完全相符，副檔名不分大小寫
    fn pattern(&self) -> Result<Regex> {
        let pattern = format!(
            r"^{}(\d{{{}}})\.(?i:{})$",
            regex::escape(&self.prefix),
            self.digit_length,
            regex::escape(&self.suffix)
        );
        Regex::new(&pattern).with_context(|| format!("無法建立檔名比對規則: {pattern}"))
    }
}

/// 建立完成的影像序列
#[derive(Debug, Default)]
pub struct FrameSequence {
    /// 依編號排序、實際存在的檔案
    pub paths: Vec<PathBuf>,
    /// 找不到的檔名
    pub missing: Vec<String>,
}

/// 掃描資料夾（不含子資料夾），依編號列出符合命名規則的影像
pub fn scan_frames(input_dir: &Path, naming: &FrameNaming) -> Result<BTreeMap<u64, PathBuf>> {
    let pattern = naming.pattern()?;

    let frames = WalkDir::new(input_dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(false)
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| {
            let name = entry.file_name().to_str()?;
            let number = pattern.captures(name)?.get(1)?.as_str().parse::<u64>().ok()?;
            Some((number, entry.into_path()))
        })
        .collect::<BTreeMap<_, _>>();

    debug!("{} 中有 {} 張符合命名規則的影像", input_dir.display(), frames.len());
    Ok(frames)
}

/// 收集 `begin..=end` 範圍內存在的影像，找不到的檔案記錄後略過
///
/// 優先使用完全相符的檔名，其次使用副檔名大小寫不同的檔案
pub fn collect_frame_sequence(
    input_dir: &Path,
    naming: &FrameNaming,
    begin: u64,
    end: u64,
) -> Result<FrameSequence> {
    let scanned = scan_frames(input_dir, naming)?;
    let mut sequence = FrameSequence::default();

    for number in begin..=end {
        let file_name = naming.file_name(number);
        let path = input_dir.join(&file_name);

        if path.is_file() {
            sequence.paths.push(path);
        } else if let Some(path) = scanned.get(&number) {
            sequence.paths.push(path.clone());
        } else {
            warn!("找不到檔案 {file_name}");
            sequence.missing.push(file_name);
        }
    }

    debug!(
        "序列建立完成: {} 張影像，{} 個缺漏",
        sequence.paths.len(),
        sequence.missing.len()
    );
    Ok(sequence)
}

/// 找出資料夾中符合命名規則的最小與最大編號
pub fn discover_frame_range(
    input_dir: &Path,
    naming: &FrameNaming,
) -> Result<Option<(u64, u64)>> {
    let scanned = scan_frames(input_dir, naming)?;

    let range = scanned
        .first_key_value()
        .zip(scanned.last_key_value())
        .map(|((&begin, _), (&end, _))| (begin, end));

    Ok(range)
}
