//! Command line front end: inspect and change the stored theme preference.

use std::path::PathBuf;
use std::rc::Rc;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use console::style;
use env_logger::Builder;
use log::LevelFilter;

use expo_theme::{
    DocumentRoot, FileStorage, MemoryDocument, SystemColorScheme, Theme, ThemeConfig,
    ThemeProvider,
};

#[derive(Debug, Parser)]
#[command(name = "expo-theme", version, about = "Manage the light/dark/auto theme preference")]
struct Cli {
    /// YAML file overriding the storage key and attribute name
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Preferences file (defaults to the platform config directory)
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the stored mode and the theme that would render now
    Show,
    /// Always use the dark theme
    Dark,
    /// Always use the light theme
    Light,
    /// Forget the explicit choice and follow the OS
    Auto,
    /// Follow OS color scheme changes and print what would render
    Watch {
        /// Polling interval in milliseconds
        #[arg(long, default_value_t = 1000)]
        interval_ms: u64,
    },
}

fn init_logger(verbose: u8) {
    if std::env::var("RUST_LOG").is_ok() {
        env_logger::init();
        return;
    }
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    Builder::new().filter_level(level).init();
}

fn print_state(provider: &ThemeProvider, document: &MemoryDocument) {
    let attribute = &provider.config().attribute;
    let rendered = document
        .attribute(attribute)
        .unwrap_or_else(|| "-".to_string());
    println!(
        "mode: {}  {}: {}",
        style(provider.theme_name()).bold(),
        attribute,
        style(rendered).cyan()
    );
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    let config = match &cli.config {
        Some(path) => ThemeConfig::load(path)?,
        None => ThemeConfig::default(),
    };
    let store_path = match cli.store {
        Some(path) => path,
        None => FileStorage::default_location()
            .context("no config directory on this platform, pass --store")?,
    };
    log::debug!("Using preferences file {:?}", store_path);

    let storage = Rc::new(FileStorage::new(store_path));
    let document = Rc::new(MemoryDocument::new());
    let system = Rc::new(SystemColorScheme::new());

    let provider = ThemeProvider::builder()
        .config(config)
        .storage(storage.clone())
        .document(document.clone())
        .color_scheme(system.clone())
        .mount();

    match cli.command.unwrap_or(Command::Show) {
        Command::Show => {
            provider.apply_to_document();
            print_state(&provider, &document);
        }
        Command::Dark => {
            provider.set_dark_mode();
            print_state(&provider, &document);
        }
        Command::Light => {
            provider.set_light_mode();
            print_state(&provider, &document);
        }
        Command::Auto => {
            provider.set_auto_mode();
            print_state(&provider, &document);
        }
        Command::Watch { interval_ms } => {
            if provider.theme_name() != Theme::Auto {
                println!(
                    "{}",
                    style("explicit preference stored, OS changes will be ignored").yellow()
                );
            }
            provider.apply_to_document();
            print_state(&provider, &document);

            let interval = Duration::from_millis(interval_ms);
            loop {
                thread::sleep(interval);
                if system.poll() {
                    print_state(&provider, &document);
                }
            }
        }
    }

    Ok(())
}
