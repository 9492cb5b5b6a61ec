use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use image::DynamicImage;
use log::info;
use std::path::{Path, PathBuf};

/// 輸出檔名：`_{yyMMdd_HHmmss}.{suffix}`
#[must_use]
pub fn composite_file_name(timestamp: &DateTime<Local>, file_suffix: &str) -> String {
    format!("_{}.{file_suffix}", timestamp.format("%y%m%d_%H%M%S"))
}

/// 將合成圖寫入輸出資料夾，編碼格式依副檔名決定
pub fn save_composite(
    image: &DynamicImage,
    output_dir: &Path,
    file_suffix: &str,
) -> Result<PathBuf> {
    let output_path = output_dir.join(composite_file_name(&Local::now(), file_suffix));

    image
        .save(&output_path)
        .with_context(|| format!("無法儲存合成圖: {}", output_path.display()))?;

    info!("合成圖已儲存: {}", output_path.display());
    Ok(output_path)
}
