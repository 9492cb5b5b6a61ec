use crate::config::save::save_settings;
use crate::config::types::{AssemblySettings, Config, Language};
use crate::menu::handlers::{run_slit_scan_generator, run_template_writer};
use anyhow::Result;
use console::{Term, style};
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Input, Select};
use rust_i18n::t;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::time::Duration;

pub fn show_main_menu(
    term: &Term,
    shutdown_signal: &Arc<AtomicBool>,
    config: &mut Config,
) -> Result<bool> {
    term.clear_screen()?;

    println!("{}", style(t!("main_menu.title")).cyan().bold());
    println!("{}", style(t!("common.esc_hint")).dim());

    let options = vec![
        t!("main_menu.opt_compose"),
        t!("main_menu.opt_template"),
        t!("main_menu.opt_settings"),
        t!("main_menu.exit"),
    ];

    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(t!("main_menu.prompt"))
        .items(&options)
        .default(0)
        .interact_on_opt(term)?;

    match selection {
        Some(0) => {
            run_slit_scan_generator(term, shutdown_signal, config)?;
            Ok(true)
        }
        Some(1) => {
            run_template_writer(term)?;
            Ok(true)
        }
        Some(2) => {
            show_settings_menu(term, config)?;
            Ok(true)
        }
        Some(3) => Ok(false),
        None => Ok(false), // ESC pressed - exit
        _ => unreachable!(),
    }
}

/// 設定選單
fn show_settings_menu(term: &Term, config: &mut Config) -> Result<()> {
    loop {
        term.clear_screen()?;

        println!("{}", style(t!("settings.title")).cyan().bold());
        println!("{}", style(t!("common.esc_hint")).dim());

        let options = vec![
            t!("settings.opt_assembly"),
            t!("settings.opt_language"),
            t!("settings.back"),
        ];

        let selection = Select::with_theme(&ColorfulTheme::default())
            .with_prompt(t!("settings.prompt"))
            .items(&options)
            .default(0)
            .interact_on_opt(term)?;

        match selection {
            Some(0) => show_assembly_settings_menu(term, config)?,
            Some(1) => show_language_menu(term, config)?,
            Some(2) | None => break, // ESC or back
            _ => unreachable!(),
        }
    }

    Ok(())
}

/// 批次大小與工作執行緒數量
fn show_assembly_settings_menu(term: &Term, config: &mut Config) -> Result<()> {
    term.clear_screen()?;

    println!("{}", style(t!("settings.assembly.title")).cyan().bold());
    println!(
        "\n{} {}",
        style(t!("settings.assembly.current")).dim(),
        config.settings.assembly
    );
    println!();

    let batch_size = prompt_positive(
        term,
        t!("settings.assembly.batch_size").to_string(),
        config.settings.assembly.batch_size,
    )?;
    let worker_count = prompt_positive(
        term,
        t!("settings.assembly.worker_count").to_string(),
        config.settings.assembly.worker_count,
    )?;

    let updated = AssemblySettings {
        batch_size,
        worker_count,
    };

    if updated == config.settings.assembly {
        return Ok(());
    }

    config.settings.assembly = updated;
    persist_settings(config, updated)
}

fn prompt_positive(term: &Term, prompt: String, current: usize) -> Result<usize> {
    let value = Input::<usize>::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .default(current)
        .validate_with(|value: &usize| -> Result<(), String> {
            if *value > 0 {
                Ok(())
            } else {
                Err(t!("settings.assembly.must_be_positive").to_string())
            }
        })
        .interact_text_on(term)?;

    Ok(value)
}

/// 介面語言，目前使用中的語言會標上記號
fn show_language_menu(term: &Term, config: &mut Config) -> Result<()> {
    term.clear_screen()?;

    println!("{}", style(t!("settings.language.title")).cyan().bold());
    println!("{}", style(t!("common.esc_hint")).dim());

    let current = config.settings.language;
    let items: Vec<String> = Language::ALL
        .iter()
        .map(|&language| {
            if language == current {
                format!("{language} ✓")
            } else {
                language.to_string()
            }
        })
        .collect();

    let picked = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(t!("settings.language.prompt"))
        .items(&items)
        .default(Language::ALL.iter().position(|&l| l == current).unwrap_or(0))
        .interact_on_opt(term)?
        .map(|index| Language::ALL[index]);

    match picked {
        Some(language) if language != current => {
            language.apply();
            config.settings.language = language;
            persist_settings(config, language)
        }
        // ESC 或選擇目前的語言
        _ => Ok(()),
    }
}

/// 寫入 settings.json 並顯示新的設定值
fn persist_settings(config: &Config, updated: impl fmt::Display) -> Result<()> {
    save_settings(&config.settings)?;
    println!("\n{} {updated}", style(t!("settings.saved")).green());
    std::thread::sleep(Duration::from_secs(1));
    Ok(())
}
