//! Terminal host for the soundboard.
//!
//! Reads one line per trigger from stdin (a bound key, a button label, `stop`
//! or `quit`) and prints UI notifications to stdout. Logs go to stderr.

mod sink;
mod state;

pub use sink::{ConsoleSink, OutputMode};
pub use state::{AppEvent, Flow, SoundboardApp};

use std::io::BufRead;
use std::path::PathBuf;
use std::sync::mpsc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use soundboard_core::config::ConfigLoader;
use soundboard_core::controller::PlaybackController;
use soundboard_core::engines::KiraBackend;
use soundboard_core::keymap::{Keymap, Trigger};
use soundboard_core::labels::LabelBoard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Layer;

#[derive(Parser, Debug)]
#[command(name = "soundboard")]
#[command(about = "Play soundboard clips from the keyboard, one at a time", long_about = None)]
pub struct Args {
    /// Path to the board YAML file
    #[arg(short, long, default_value = "board.yaml")]
    pub board: PathBuf,

    /// Print UI notifications as JSON lines
    #[arg(long)]
    pub json: bool,

    /// List the board's buttons and key bindings, then exit
    #[arg(short, long)]
    pub list: bool,

    /// How often to poll playback progress, in milliseconds
    #[arg(long, default_value = "100")]
    pub tick_ms: u64,
}

/// Installs the stderr fmt subscriber. `RUST_LOG` overrides the `info` default.
pub fn init_logging() {
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        );

    tracing_subscriber::registry().with(fmt_layer).init();
}

/// Runs the soundboard until `quit` or end of input.
pub fn run(args: Args) -> anyhow::Result<()> {
    let board = ConfigLoader::new()
        .load(&args.board)
        .with_context(|| format!("Failed to load board {}", args.board.display()))?;
    let keymap = Keymap::from_board(&board)?;

    if args.list {
        print!("{}", describe_board(&board, &keymap));
        return Ok(());
    }

    let backend = KiraBackend::new(board.sounds_path()).context("Failed to open audio output")?;
    let mode = if args.json { OutputMode::Json } else { OutputMode::Text };
    let sink = ConsoleSink::new(LabelBoard::from_board(&board), mode, std::io::stdout());
    let mut app = SoundboardApp::new(PlaybackController::new(backend, sink), keymap);

    let (tx, rx) = mpsc::channel();

    let input_tx = tx.clone();
    std::thread::Builder::new()
        .name("stdin-reader".into())
        .spawn(move || {
            for line in std::io::stdin().lock().lines() {
                let Ok(line) = line else { break };
                if input_tx.send(AppEvent::Input(line)).is_err() {
                    return;
                }
            }
            let _ = input_tx.send(AppEvent::Eof);
        })
        .context("Failed to spawn stdin reader")?;

    let tick = Duration::from_millis(args.tick_ms.max(10));
    std::thread::Builder::new()
        .name("progress-ticker".into())
        .spawn(move || loop {
            std::thread::sleep(tick);
            if tx.send(AppEvent::Tick).is_err() {
                break;
            }
        })
        .context("Failed to spawn progress ticker")?;

    tracing::info!("Board '{}' ready ({} buttons)", board.name, board.buttons.len());
    for event in rx {
        if app.handle(event) == Flow::Quit {
            break;
        }
    }

    app.shutdown();
    Ok(())
}

/// Renders the `--list` output: one line per button, then the stop key.
fn describe_board(board: &soundboard_core::config::BoardConfig, keymap: &Keymap) -> String {
    let mut out = format!("{}\n", board.name);
    for button in &board.buttons {
        let key = button
            .key_char()
            .map(|k| format!("[{}]", k))
            .unwrap_or_else(|| "[ ]".to_string());
        out.push_str(&format!(
            "  {} {} -> {}\n",
            key,
            button.label.trim(),
            button.sound_file(&board.extension)
        ));
    }
    let stop = keymap
        .bindings()
        .find(|(_, t)| matches!(t, Trigger::Stop))
        .map(|(k, _)| format!("[{}]", k))
        .unwrap_or_else(|| "'stop'".to_string());
    out.push_str(&format!("  {} stop\n", stop));
    out
}
