//! Calculator TUI Entry Point
//!
//! Usage:
//!   calc-tui [OPTIONS]
//!
//! Options:
//!   --config <PATH>       Config file (default: ~/.config/calculator/calculator.toml)
//!   --error-text <TEXT>   Sentinel shown after division by zero
//!   --eval <KEYS>         Press KEYS without a terminal and print the display
//!   --json                With --eval, print the final engine snapshot as JSON
//!
//! Logging goes to stderr and is off unless `RUST_LOG` is set.

use std::io;
use std::panic;
use std::path::PathBuf;

use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use calculator_core::{load_config, load_config_from_path, CalculatorConfigFile, ConfigOverrides};
use calculator_tui::app::print_result;
use calculator_tui::headless;
use calculator_tui::App;

#[derive(Debug, Parser)]
#[command(name = "calc-tui", version, about = "Terminal calculator")]
struct Args {
    /// Configuration file path
    #[arg(long, env = "CALC_CONFIG")]
    config: Option<PathBuf>,

    /// Sentinel shown after division by zero or overflow
    #[arg(long)]
    error_text: Option<String>,

    /// Do not highlight the pending operator key
    #[arg(long)]
    no_highlight: bool,

    /// Hide the expression line above the display
    #[arg(long)]
    no_expression: bool,

    /// Press these keys without a terminal and print the resulting display
    #[arg(long, value_name = "KEYS")]
    eval: Option<String>,

    /// Print the final snapshot as JSON (with --eval)
    #[arg(long, requires = "eval")]
    json: bool,
}

impl Args {
    fn overrides(&self) -> ConfigOverrides {
        let mut overrides = ConfigOverrides::new();
        if let Some(ref text) = self.error_text {
            overrides = overrides.with_error_text(text.clone());
        }
        if self.no_highlight {
            overrides = overrides.with_highlight_pending(false);
        }
        if self.no_expression {
            overrides = overrides.with_show_expression(false);
        }
        overrides
    }

    fn load_config(&self) -> anyhow::Result<CalculatorConfigFile> {
        let mut config = match self.config {
            Some(ref path) => load_config_from_path(Some(path.clone()))?,
            None => load_config()?,
        };
        self.overrides().apply(&mut config)?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Set up logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(io::stderr),
        )
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let config = args.load_config()?;

    if let Some(ref keys) = args.eval {
        let report = headless::evaluate(keys, config.engine_config())?;
        if args.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            println!("{}", report.snapshot.display);
        }
        return Ok(());
    }

    // Check if we have a TTY before attempting initialization
    use std::io::IsTerminal;

    if !io::stdin().is_terminal() || !io::stdout().is_terminal() {
        eprintln!("Error: calc-tui requires a terminal (TTY)");
        eprintln!();
        eprintln!("For non-interactive use, pass keys with --eval:");
        eprintln!("  calc-tui --eval \"7+3+2=\"");
        std::process::exit(1);
    }

    // Set up panic hook to restore terminal
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        // Restore terminal before printing panic
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), DisableMouseCapture, LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    // Initialize terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let size = crossterm::terminal::size()?;
    let mut app = App::new(&config, size);
    let result = app.run(&mut terminal).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    result?;
    print_result(&app)?;
    Ok(())
}
