//! Eider entrypoint: open a file, replay a key script, print the document.
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Once;

use anyhow::{Context, Result};
use clap::Parser;
use core_actions::MemoryClipboard;
use core_engine::{Engine, LoadOutcome, Notification};
use core_events::{CancelToken, parse_keys};
use tracing::{debug, info, warn};
use tracing_appender::non_blocking::WorkerGuard;

mod report;

use report::{ReportOptions, write_report};

#[derive(Parser, Debug)]
#[command(name = "eider", version, about = "Modal editing core with incremental highlighting")]
struct Args {
    /// File to open. Without one the engine starts on an empty buffer.
    pub path: Option<PathBuf>,
    /// Configuration file (overrides discovery of `eider.toml`).
    #[arg(long = "config")]
    pub config: Option<PathBuf>,
    /// Keys to replay after loading, in Vim notation (`ciwfoo<Esc>`).
    #[arg(long = "keys", default_value = "")]
    pub keys: String,
    /// Text served to `<C-v>` in Insert mode.
    #[arg(long = "clipboard")]
    pub clipboard: Option<String>,
    /// Print without token colors.
    #[arg(long = "no-color")]
    pub no_color: bool,
    /// List the tokens of every line.
    #[arg(long = "tokens")]
    pub tokens: bool,
}

struct AppStartup {
    log_guard: Option<WorkerGuard>,
}

impl AppStartup {
    fn new() -> Self {
        Self { log_guard: None }
    }

    fn configure_logging(&mut self) -> Result<()> {
        let log_dir = Path::new(".");
        let log_path = log_dir.join("eider.log");
        if log_path.exists() {
            let _ = std::fs::remove_file(&log_path);
        }

        let file_appender = tracing_appender::rolling::never(log_dir, "eider.log");
        let (nb_writer, guard) = tracing_appender::non_blocking(file_appender);
        if tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_writer(nb_writer)
            .with_ansi(false)
            .try_init()
            .is_ok()
        {
            self.log_guard = Some(guard);
        }
        Ok(())
    }

    fn install_panic_hook() {
        static HOOK: Once = Once::new();
        HOOK.call_once(|| {
            let default_panic = std::panic::take_hook();
            std::panic::set_hook(Box::new(move |info| {
                tracing::error!(target: "runtime.panic", ?info, "panic");
                default_panic(info);
            }));
        });
    }

    fn build_engine(args: &Args) -> Result<(Engine, core_config::Config)> {
        let config = core_config::load_from(args.config.clone())?;
        let clipboard = MemoryClipboard::new(args.clipboard.clone());
        let mut engine = Engine::from_config(&config).with_clipboard(Box::new(clipboard));
        engine.subscribe(Box::new(|note: &Notification| match note {
            Notification::LineParsed(_) => {}
            Notification::NotImplemented(action) => {
                warn!(target: "runtime", ?action, "command_not_implemented")
            }
            other => debug!(target: "runtime", note = ?other, "notification"),
        }));
        info!(
            target: "runtime.startup",
            config_override = args.config.is_some(),
            tab_width = config.effective_tab_width,
            theme = config.file.theme.name.as_str(),
            "bootstrap_complete"
        );
        Ok((engine, config))
    }
}

async fn open(engine: &mut Engine, path: &Path) -> Result<()> {
    let cancel = CancelToken::new();
    let outcome = engine
        .open_path(path, &cancel)
        .await
        .with_context(|| format!("opening {}", path.display()))?;
    match outcome {
        LoadOutcome::Loaded { line_count } => {
            info!(target: "runtime", path = %path.display(), line_count, "file_opened")
        }
        LoadOutcome::Cancelled { lines_loaded } => {
            warn!(target: "runtime", path = %path.display(), lines_loaded, "file_open_cancelled")
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let mut startup = AppStartup::new();
    startup.configure_logging()?;
    AppStartup::install_panic_hook();
    info!(target: "runtime", "startup");

    let args = Args::parse();
    let (mut engine, config) = AppStartup::build_engine(&args)?;
    if let Some(path) = args.path.as_deref() {
        open(&mut engine, path).await?;
    }

    let keys = parse_keys(&args.keys).context("parsing --keys")?;
    let replayed = keys.len();
    for key in keys {
        engine.handle_key_press(key);
    }
    info!(target: "runtime", keys = replayed, "keys_replayed");

    let opts = ReportOptions {
        color: !args.no_color,
        tokens: args.tokens,
        tab_width: config.effective_tab_width,
    };
    write_report(&mut io::stdout().lock(), &engine, &opts)?;
    info!(target: "runtime", "shutdown");
    Ok(())
}
