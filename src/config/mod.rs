pub mod load;
pub mod save;
pub mod types;

pub use types::{
    AssemblySettings, Config, DEFAULT_JOB_CONFIG_FILE, InputConfig, JobConfig, JobOptions,
    Language, MAX_RECENT_PATHS, OutputConfig, SETTINGS_FILE, UserSettings,
};
