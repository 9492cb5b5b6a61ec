use crate::config::types::{JobConfig, MAX_RECENT_PATHS, SETTINGS_FILE, UserSettings};
use crate::tools::ensure_directory_exists;
use anyhow::{Context, Result, bail};
use std::fs;
use std::path::Path;

pub fn save_settings(settings: &UserSettings) -> Result<()> {
    // Save to settings.json in the current working directory
    save_settings_to(Path::new(SETTINGS_FILE), settings)
}

pub fn save_settings_to(path: &Path, settings: &UserSettings) -> Result<()> {
    let content = serde_json::to_string_pretty(settings).context("Failed to serialize settings")?;

    fs::write(path, content)
        .with_context(|| format!("Failed to write settings to {}", path.display()))?;

    Ok(())
}

/// 更新最近使用的路徑
/// 將新路徑加入最前面，去重並限制數量
pub fn add_recent_path(settings: &mut UserSettings, path: &str) {
    settings.recent_paths.retain(|p| p != path);
    settings.recent_paths.insert(0, path.to_string());
    settings.recent_paths.truncate(MAX_RECENT_PATHS);
}

/// 寫出任務設定檔範本，不覆蓋既有檔案
pub fn write_job_template(path: &Path) -> Result<()> {
    if path.exists() {
        bail!("檔案已存在: {}", path.display());
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        ensure_directory_exists(parent)?;
    }

    let content =
        serde_json::to_string_pretty(&JobConfig::default()).context("無法序列化設定檔範本")?;

    fs::write(path, content)
        .with_context(|| format!("無法寫入設定檔範本: {}", path.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::types::{Config, Language};
    use tempfile::TempDir;

    #[test]
    fn test_add_recent_path_dedup_and_limit() {
        let mut settings = UserSettings::default();
        for i in 0..7 {
            add_recent_path(&mut settings, &format!("job_{i}.json"));
        }
        add_recent_path(&mut settings, "job_4.json");

        assert_eq!(settings.recent_paths.len(), MAX_RECENT_PATHS);
        assert_eq!(settings.recent_paths[0], "job_4.json");
        assert_eq!(settings.recent_paths[1], "job_6.json");
        assert_eq!(
            settings
                .recent_paths
                .iter()
                .filter(|p| *p == "job_4.json")
                .count(),
            1
        );
    }

    #[test]
    fn test_settings_round_trip_through_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("settings.json");

        let mut settings = UserSettings::default();
        settings.language = Language::ZhTw;
        settings.assembly.batch_size = 25;
        save_settings_to(&path, &settings).unwrap();

        assert_eq!(Config::load_settings(&path).unwrap(), settings);
    }

    #[test]
    fn test_write_job_template() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("jobs").join("config.json");

        write_job_template(&path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let template: JobConfig = serde_json::from_str(&content).unwrap();
        assert_eq!(template, JobConfig::default());
        assert!(content.contains("file_number_digit_length"));

        assert!(write_job_template(&path).is_err());
    }
}
