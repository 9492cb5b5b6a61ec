use crate::tools::FrameNaming;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

pub const MAX_RECENT_PATHS: usize = 5;
pub const SETTINGS_FILE: &str = "settings.json";
pub const DEFAULT_JOB_CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Language {
    #[default]
    #[serde(rename = "en-US")]
    EnUs,
    #[serde(rename = "zh-TW")]
    ZhTw,
}

impl Language {
    pub const ALL: [Self; 2] = [Self::EnUs, Self::ZhTw];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::EnUs => "en-US",
            Self::ZhTw => "zh-TW",
        }
    }

    /// 切換介面語系
    pub fn apply(self) {
        rust_i18n::set_locale(self.as_str());
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EnUs => write!(f, "English"),
            Self::ZhTw => write!(f, "繁體中文"),
        }
    }
}

/// 組裝器的資源設定
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssemblySettings {
    /// 每批處理的影像數量
    pub batch_size: usize,
    /// 同時解碼的工作執行緒數量
    pub worker_count: usize,
}

impl Default for AssemblySettings {
    fn default() -> Self {
        Self {
            batch_size: 100,
            worker_count: 12,
        }
    }
}

impl fmt::Display for AssemblySettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "batch_size={}, worker_count={}",
            self.batch_size, self.worker_count
        )
    }
}

/// 使用者設定（settings.json）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserSettings {
    pub language: Language,
    pub assembly: AssemblySettings,
    /// 最近使用的任務設定檔路徑，最新的在最前面
    pub recent_paths: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub settings: UserSettings,
}

/// 單次合成任務設定（config.json）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobConfig {
    pub input: InputConfig,
    pub output: OutputConfig,
    #[serde(default)]
    pub options: JobOptions,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputConfig {
    pub dir: PathBuf,
    pub file_prefix: String,
    pub file_number_digit_length: usize,
    /// 未設定起訖編號時，會掃描資料夾自動判斷範圍
    #[serde(default)]
    pub file_begin_digit: Option<u64>,
    #[serde(default)]
    pub file_end_digit: Option<u64>,
    pub file_suffix: String,
}

impl InputConfig {
    #[must_use]
    pub fn naming(&self) -> FrameNaming {
        FrameNaming {
            prefix: self.file_prefix.clone(),
            digit_length: self.file_number_digit_length,
            suffix: self.file_suffix.clone(),
        }
    }

    #[must_use]
    pub const fn explicit_range(&self) -> Option<(u64, u64)> {
        match (self.file_begin_digit, self.file_end_digit) {
            (Some(begin), Some(end)) => Some((begin, end)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    pub dir: PathBuf,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobOptions {
    /// 反轉時間方向
    #[serde(default)]
    pub is_reversed: bool,
}

impl Default for JobConfig {
    /// 設定檔範本
    fn default() -> Self {
        Self {
            input: InputConfig {
                dir: PathBuf::from("images"),
                file_prefix: "DSC0".to_string(),
                file_number_digit_length: 4,
                file_begin_digit: Some(2190),
                file_end_digit: Some(4781),
                file_suffix: "JPG".to_string(),
            },
            output: OutputConfig {
                dir: PathBuf::from("output"),
            },
            options: JobOptions::default(),
        }
    }
}
