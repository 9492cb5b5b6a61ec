use anyhow::Result;
use console::{Term, style};
use log::{info, warn};
use rust_i18n::t;
use slit_scan::component::SlitScanGenerator;
use slit_scan::config::Config;
use slit_scan::init;
use slit_scan::menu::show_main_menu;
use slit_scan::signal::setup_shutdown_signal;
use std::path::PathBuf;

#[macro_use]
extern crate rust_i18n;

i18n!("locales", fallback = "en-US");

fn main() -> Result<()> {
    init::init();
    let shutdown_signal = setup_shutdown_signal();

    // Load config and set locale
    let mut config = Config::new()?;
    config.settings.language.apply();

    // Headless run: slit_scan <config.json>
    if let Some(job_path) = std::env::args_os().nth(1).map(PathBuf::from) {
        let generator = SlitScanGenerator::new(config.settings.assembly, shutdown_signal)
            .with_progress(true);
        generator.run(&job_path)?;
        return Ok(());
    }

    let term = Term::stdout();
    loop {
        match show_main_menu(&term, &shutdown_signal, &mut config) {
            Ok(true) => {}
            Ok(false) => {
                term.clear_screen()?;
                println!("\n{}", style(t!("main_menu.goodbye")).green().bold());
                info!("Program exited normally");
                break;
            }
            Err(e) => {
                warn!("Program error: {e}");
                eprintln!("{} {}", style(t!("main_menu.error_prefix")).red().bold(), e);
                break;
            }
        }
    }

    Ok(())
}
