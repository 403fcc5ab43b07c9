//! rawedit entrypoint: load a file into the engine, replay a key script,
//! write the result back.
use anyhow::{Context, Result};
use clap::Parser;
use core_config::{EffectiveConfig, load_from};
use core_events::{Event, parse_key_script};
use core_model::Point;
use core_render::{RecordingSurface, RenderScheduler};
use core_text::{FontId, MonospaceMetrics, codec};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Once;
use text_edit::{Status, TextEdit};
use tracing::{error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;

/// Keys applied between two paints.
const KEYS_PER_FRAME: usize = 8;
const CELL_WIDTH: u32 = 8;
const LINE_PITCH: u32 = 16;

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "rawedit", version, about = "Raw multi-line text-edit engine driver")]
struct Args {
    /// File to load (UTF-8 text). Missing files start empty.
    pub path: Option<PathBuf>,
    /// Key script to replay, e.g. `Hello<Enter><S-Home><C-x>`.
    #[arg(long = "keys", default_value = "")]
    pub keys: String,
    /// Write the result here instead of back to `path`.
    #[arg(long = "out")]
    pub out: Option<PathBuf>,
    /// Configuration file path (overrides discovery of `rawedit.toml`).
    #[arg(long = "config")]
    pub config: Option<PathBuf>,
    /// Widget size in columns x rows.
    #[arg(long = "columns", default_value_t = 80)]
    pub columns: u32,
    #[arg(long = "rows", default_value_t = 24)]
    pub rows: u32,
}

struct Summary {
    status: Status,
    saved_to: Option<PathBuf>,
    frames: u64,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = &self.status;
        write!(
            f,
            "lines={} chars={} cursor={}:{} full={} partial={}",
            s.line_count, s.char_count, s.cursor_line, s.cursor_col, s.full, s.partially_loaded
        )?;
        if !s.selection.is_empty() {
            write!(
                f,
                " selection={}:{}-{}:{}",
                s.selection.start.line, s.selection.start.col, s.selection.end.line, s.selection.end.col
            )?;
        }
        write!(f, " frames={}", self.frames)?;
        if let Some(path) = &self.saved_to {
            write!(f, " saved={}", path.display())?;
        }
        Ok(())
    }
}

fn configure_logging() -> Option<WorkerGuard> {
    let log_dir = Path::new(".");
    let log_path = log_dir.join("rawedit.log");
    if log_path.exists() {
        let _ = std::fs::remove_file(&log_path);
    }
    let file_appender = tracing_appender::rolling::never(log_dir, "rawedit.log");
    let (nb_writer, guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(nb_writer)
        .try_init()
        .ok()
        .map(|_| guard)
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

fn load_widget(args: &Args, config: &EffectiveConfig) -> TextEdit<MonospaceMetrics> {
    let metrics = MonospaceMetrics::new(CELL_WIDTH, LINE_PITCH);
    let size = (args.columns.max(1) * CELL_WIDTH, args.rows.max(1) * LINE_PITCH);
    let mut widget = TextEdit::with_config(metrics, FontId(0), true, Point::default(), size, config);
    if let Some(path) = &args.path {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                widget.load_str(&content);
                let status = widget.status();
                info!(
                    target: "runtime.startup",
                    file = %path.display(),
                    size_bytes = content.len(),
                    lines = status.line_count,
                    partial = status.partially_loaded,
                    "file_loaded"
                );
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(target: "runtime.startup", file = %path.display(), "new_file");
            }
            Err(e) => {
                error!(target: "runtime.startup", file = %path.display(), ?e, "file_open_error");
            }
        }
    }
    widget.reset_changed();
    widget
}

/// Replay `keys`, painting once per frame. Returns the number of frames.
fn replay(widget: &mut TextEdit<MonospaceMetrics>, keys: &str) -> Result<u64> {
    let events = parse_key_script(keys).context("invalid key script")?;
    let mut surface = RecordingSurface::new();
    let mut scheduler = RenderScheduler::new();
    widget.redraw(&mut surface);
    for frame in events.chunks(KEYS_PER_FRAME) {
        for key in frame {
            let result = widget.handle_event(&Event::Key(*key));
            if !result.consumed {
                warn!(target: "runtime.startup", %key, "key_not_consumed");
            }
            if let Some(delta) = result.delta {
                scheduler.mark(delta);
            }
        }
        if let Some(decision) = scheduler.consume() {
            surface.clear();
            widget.paint(&mut surface, &decision.effective);
        }
    }
    let m = scheduler.metrics();
    info!(
        target: "render.paint",
        frames = m.semantic_frames,
        full = m.full,
        lines = m.lines,
        scroll = m.scroll,
        cursor_only = m.cursor_only,
        "replay_complete"
    );
    Ok(m.semantic_frames)
}

fn save(widget: &TextEdit<MonospaceMetrics>, target: &Path) -> Result<()> {
    let status = widget.status();
    let units = widget.extract_text(0, status.line_count.saturating_sub(1));
    std::fs::write(target, codec::decode(&units))
        .with_context(|| format!("writing {}", target.display()))?;
    info!(target: "runtime.startup", file = %target.display(), chars = status.char_count, "file_saved");
    Ok(())
}

fn run(args: &Args) -> Result<Summary> {
    let config = load_from(args.config.clone())?.effective();
    let mut widget = load_widget(args, &config);
    let frames = replay(&mut widget, &args.keys)?;
    let target = args.out.as_ref().or(args.path.as_ref());
    let saved_to = match target {
        Some(path) if widget.changed() || args.out.is_some() => {
            save(&widget, path)?;
            Some(path.clone())
        }
        _ => None,
    };
    Ok(Summary {
        status: widget.status(),
        saved_to,
        frames,
    })
}

fn main() -> Result<()> {
    let _log_guard = configure_logging();
    install_panic_hook();
    info!(target: "runtime", "startup");
    let args = Args::parse();
    let summary = run(&args)?;
    println!("{summary}");
    info!(target: "runtime", "shutdown");
    Ok(())
}
