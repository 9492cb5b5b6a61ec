use crate::component::SlitScanGenerator;
use crate::config::save::{add_recent_path, save_settings, write_job_template};
use crate::config::{Config, DEFAULT_JOB_CONFIG_FILE};
use crate::pause;
use anyhow::Result;
use console::{Term, style};
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Input, Select};
use log::error;
use rust_i18n::t;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

pub fn run_slit_scan_generator(
    term: &Term,
    shutdown_signal: &Arc<AtomicBool>,
    config: &mut Config,
) -> Result<()> {
    term.clear_screen()?;

    let Some(job_path) = prompt_job_path(term, config)? else {
        return Ok(());
    };

    add_recent_path(&mut config.settings, &job_path);
    save_settings(&config.settings)?;

    let generator = SlitScanGenerator::new(config.settings.assembly, Arc::clone(shutdown_signal))
        .with_progress(true);

    if let Err(e) = generator.run(&PathBuf::from(&job_path)) {
        error!("合成失敗: {e:#}");
        eprintln!("{} {:#}", style(t!("common.error")).red().bold(), e);
    }

    pause(term)?;
    Ok(())
}

pub fn run_template_writer(term: &Term) -> Result<()> {
    term.clear_screen()?;

    let path: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt(t!("template.prompt"))
        .default(DEFAULT_JOB_CONFIG_FILE.to_string())
        .interact_text_on(term)?;
    let path = PathBuf::from(path.trim());

    match write_job_template(&path) {
        Ok(()) => println!(
            "{} {}",
            style(t!("template.written")).green(),
            path.display()
        ),
        Err(e) => eprintln!("{} {:#}", style(t!("common.error")).red().bold(), e),
    }

    pause(term)?;
    Ok(())
}

/// 從最近使用的路徑中選擇，或輸入新路徑；ESC 回傳 None
fn prompt_job_path(term: &Term, config: &Config) -> Result<Option<String>> {
    let recent_paths = &config.settings.recent_paths;

    if !recent_paths.is_empty() {
        let mut items: Vec<String> = recent_paths.clone();
        items.push(t!("compose.other_path").to_string());

        let selection = Select::with_theme(&ColorfulTheme::default())
            .with_prompt(t!("compose.select_recent"))
            .items(&items)
            .default(0)
            .interact_on_opt(term)?;

        match selection {
            Some(index) if index < recent_paths.len() => {
                return Ok(Some(recent_paths[index].clone()));
            }
            Some(_) => {}
            None => return Ok(None),
        }
    }

    let path: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt(t!("compose.prompt_path"))
        .default(DEFAULT_JOB_CONFIG_FILE.to_string())
        .interact_text_on(term)?;

    Ok(Some(path.trim().to_string()))
}
