use crate::config::types::{Config, JobConfig, SETTINGS_FILE, UserSettings};
use crate::tools::validate_directory_exists;
use anyhow::{Context, Result, bail};
use log::warn;
use std::fs;
use std::path::Path;

impl Config {
    pub fn new() -> Result<Self> {
        let settings = Self::load_settings(Path::new(SETTINGS_FILE)).unwrap_or_else(|e| {
            warn!("{e:#}，改用預設設定");
            UserSettings::default()
        });

        Ok(Self { settings })
    }

    pub fn load_settings(path: &Path) -> Result<UserSettings> {
        if !path.exists() {
            return Ok(UserSettings::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {}", path.display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse settings from {}", path.display()))
    }
}

impl JobConfig {
    /// 讀取並驗證任務設定檔
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("無法讀取設定檔: {}", path.display()))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("無法解析設定檔: {}", path.display()))?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        validate_directory_exists(&self.input.dir).context("輸入資料夾無效")?;
        validate_directory_exists(&self.output.dir).context("輸出資料夾無效")?;

        if self.input.file_number_digit_length == 0 {
            bail!("file_number_digit_length 必須為正整數");
        }

        if self.input.file_suffix.trim().is_empty() {
            bail!("file_suffix 不可為空");
        }

        if let Some((begin, end)) = self.input.explicit_range()
            && begin > end
        {
            bail!("file_begin_digit ({begin}) 不可大於 file_end_digit ({end})");
        }

        Ok(())
    }
}
