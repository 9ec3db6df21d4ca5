//! Modaline entrypoint: a modal input prompt on a raw terminal.
//!
//! The binary owns the glue the engine crates deliberately avoid: raw-mode
//! setup, the blocking input thread feeding a bounded channel, a minimal
//! single-line renderer, the history fallback for keys the modal layer leaves
//! unhandled, and the external-editor round trip.

use anyhow::Result;
use clap::Parser;
use core_config::{Config, VimModeStyle, load_from};
use core_events::{EVENT_CHANNEL_CAP, Event, KeyCode, KeyEvent};
use core_history::HistoryNavigator;
use core_input::{
    Capabilities, ControllerObserver, EditorLauncher, ParsedCommand, SettingsSource,
    SubmitHandler, VimController, key_token,
};
use core_text::{Mode, PromptBuffer};
use crossterm::{
    cursor::MoveToColumn,
    event::{DisableBracketedPaste, EnableBracketedPaste, Event as CEvent, read},
    execute,
    terminal::{Clear, ClearType, disable_raw_mode, enable_raw_mode},
};
use std::io::Write;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "modaline", version, about = "Vim-flavored modal input prompt")]
struct Args {
    /// Configuration file path (overrides discovery of `modaline.toml`).
    #[arg(long = "config")]
    config: Option<PathBuf>,
    /// File to load prior history from and append submissions to.
    #[arg(long = "history-file")]
    history_file: Option<PathBuf>,
}

/// RAII raw-mode guard so any early return restores the terminal.
struct RawModeGuard;

impl RawModeGuard {
    fn enter() -> Result<Self> {
        enable_raw_mode()?;
        execute!(std::io::stdout(), EnableBracketedPaste)?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = execute!(std::io::stdout(), DisableBracketedPaste);
        let _ = disable_raw_mode();
    }
}

/// Settings port backed by the loaded config. Values are read per query so a
/// future reload path needs no controller changes.
struct ConfigSettings(Arc<Mutex<Config>>);

impl SettingsSource for ConfigSettings {
    fn vim_mode_style(&self) -> VimModeStyle {
        self.0.lock().unwrap().file.general.vim_mode_style
    }
    fn command_mode_disabled(&self) -> bool {
        self.0.lock().unwrap().file.general.disable_vim_command_mode
    }
}

/// Submit port: append to history (memory + optional file) and flag the loop
/// so the navigator resets.
struct HistorySink {
    entries: Arc<Mutex<Vec<String>>>,
    file: Option<PathBuf>,
    submitted: Arc<AtomicBool>,
}

impl SubmitHandler for HistorySink {
    fn submit(&mut self, text: &str) {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return;
        }
        self.entries.lock().unwrap().push(trimmed.to_string());
        if let Some(path) = &self.file
            && let Err(e) = append_history(path, trimmed)
        {
            warn!(target: "io", error = %e, "history_append_failed");
        }
        self.submitted.store(true, Ordering::SeqCst);
        info!(target: "runtime", len = trimmed.len(), "submitted");
        // Leave raw-mode cleanly for the echoed line.
        let mut out = std::io::stdout();
        let _ = write!(out, "\r\n» {trimmed}\r\n");
        let _ = out.flush();
    }
}

fn append_history(path: &PathBuf, entry: &str) -> std::io::Result<()> {
    use std::fs::OpenOptions;
    let mut f = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(f, "{entry}")
}

/// Ctrl+X Ctrl+E: hand the draft to `$EDITOR` and feed the result back
/// through the event channel. Fire-and-forget; failures are logged and
/// swallowed, and the chord state has already cleared.
struct ExternalEditor {
    tx: mpsc::Sender<Event>,
    draft: Arc<Mutex<String>>,
}

impl EditorLauncher for ExternalEditor {
    fn open_in_external_editor(&self) {
        let tx = self.tx.clone();
        let draft = self.draft.lock().unwrap().clone();
        tokio::spawn(async move {
            match run_external_editor(&draft).await {
                Ok(edited) => {
                    let _ = tx.send(Event::ExternalEdit(edited)).await;
                }
                Err(e) => {
                    warn!(target: "runtime", error = %e, "external_editor_failed");
                }
            }
        });
    }
}

async fn run_external_editor(draft: &str) -> Result<String> {
    let editor = std::env::var("EDITOR").unwrap_or_else(|_| "vi".to_string());
    let path = std::env::temp_dir().join(format!("modaline-{}.txt", std::process::id()));
    tokio::fs::write(&path, draft).await?;
    // The prompt keeps running; hand the terminal to the editor for the
    // duration of the child process.
    let _ = disable_raw_mode();
    let status = tokio::process::Command::new(&editor)
        .arg(&path)
        .status()
        .await;
    let _ = enable_raw_mode();
    let status = status?;
    if !status.success() {
        anyhow::bail!("editor exited with {status}");
    }
    let edited = tokio::fs::read_to_string(&path).await?;
    let _ = tokio::fs::remove_file(&path).await;
    Ok(edited.trim_end_matches('\n').to_string())
}

/// Quit flag raised by `:q` / `:wq`.
struct QuitObserver(Arc<AtomicBool>);

impl ControllerObserver for QuitObserver {
    fn on_ex_command(&self, command: &ParsedCommand) {
        if matches!(command, ParsedCommand::Quit | ParsedCommand::WriteQuit) {
            self.0.store(true, Ordering::SeqCst);
        }
    }
}

fn load_history(path: &Option<PathBuf>) -> Vec<String> {
    let Some(path) = path else {
        return Vec::new();
    };
    match std::fs::read_to_string(path) {
        Ok(content) => content.lines().map(str::to_string).collect(),
        Err(_) => Vec::new(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let log_dir = std::path::Path::new(".");
    let file_appender = tracing_appender::rolling::never(log_dir, "modaline.log");
    let (nb_writer, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(nb_writer)
        .init();
    info!(target: "runtime", "startup");

    // Log panics before the raw-mode guard restores the terminal.
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        error!(target: "runtime.panic", ?info, "panic");
        default_panic(info);
    }));

    let args = Args::parse();
    let config = Arc::new(Mutex::new(load_from(args.config.clone())?));

    let entries = Arc::new(Mutex::new(load_history(&args.history_file)));
    let submitted = Arc::new(AtomicBool::new(false));
    let quit = Arc::new(AtomicBool::new(false));
    let draft = Arc::new(Mutex::new(String::new()));

    let (tx, mut rx) = mpsc::channel::<Event>(EVENT_CHANNEL_CAP);

    let caps = Capabilities {
        settings: Box::new(ConfigSettings(Arc::clone(&config))),
        launcher: Some(Box::new(ExternalEditor {
            tx: tx.clone(),
            draft: Arc::clone(&draft),
        })),
        submit: Some(Box::new(HistorySink {
            entries: Arc::clone(&entries),
            file: args.history_file.clone(),
            submitted: Arc::clone(&submitted),
        })),
        observers: vec![Box::new(QuitObserver(Arc::clone(&quit)))],
    };

    let mut controller = VimController::new(caps);
    let mut buf = PromptBuffer::new();
    let mut navigator = HistoryNavigator::new();

    let _raw = RawModeGuard::enter()?;
    spawn_input_thread(tx.clone());

    render(&controller, &buf)?;
    while let Some(event) = rx.recv().await {
        match event {
            Event::Input(key) => {
                // Session controls ahead of the modal layer.
                if key.is_ctrl('d') && buf.is_empty() {
                    break;
                }
                if key.is_ctrl('c') {
                    buf.clear();
                    buf.mode = Mode::Insert;
                    render(&controller, &buf)?;
                    continue;
                }
                let handled = controller.handle_key(&mut buf, &key);
                if !handled {
                    history_fallback(&mut navigator, &entries, &mut buf, &key);
                }
                if submitted.swap(false, Ordering::SeqCst) {
                    navigator.submit("");
                }
                if quit.load(Ordering::SeqCst) {
                    break;
                }
                *draft.lock().unwrap() = buf.text();
                render(&controller, &buf)?;
            }
            Event::ExternalEdit(text) => {
                debug!(target: "runtime", len = text.len(), "external_edit_installed");
                buf.set_text(&text);
                *draft.lock().unwrap() = buf.text();
                render(&controller, &buf)?;
            }
            Event::Shutdown => break,
        }
    }

    let mut out = std::io::stdout();
    let _ = write!(out, "\r\n");
    let _ = out.flush();
    info!(target: "runtime", "shutdown");
    Ok(())
}

/// Keys the modal layer declined: Up/Down in Insert mode and, in `bash-vim`
/// style, `j`/`k`/`G` in Normal mode walk the submission history.
fn history_fallback(
    navigator: &mut HistoryNavigator,
    entries: &Arc<Mutex<Vec<String>>>,
    buf: &mut PromptBuffer,
    key: &KeyEvent,
) {
    let messages = entries.lock().unwrap().clone();
    let plain = !key.has_chord_mods() && !key.paste;
    let up = matches!(key.code, KeyCode::Up) || (plain && key.sequence == "k");
    let down = matches!(key.code, KeyCode::Down) || (plain && key.sequence == "j");
    let oldest = plain && key.sequence == "G";
    let installed = if up {
        navigator.navigate_up(&messages, &buf.text())
    } else if down {
        navigator.navigate_down(&messages)
    } else if oldest {
        navigator.go_to_index(messages.len() as isize - 1, &messages, &buf.text())
    } else {
        None
    };
    if let Some(text) = installed {
        buf.set_text(&text);
    }
}

/// Blocking reader on its own thread; `blocking_send` parks on backpressure
/// rather than dropping keys.
fn spawn_input_thread(tx: mpsc::Sender<Event>) {
    std::thread::spawn(move || {
        loop {
            match read() {
                Ok(CEvent::Key(key)) => {
                    if let Some(mapped) = key_token::map_key_event(&key)
                        && tx.blocking_send(Event::Input(mapped)).is_err()
                    {
                        break;
                    }
                }
                Ok(CEvent::Paste(data)) => {
                    if tx
                        .blocking_send(Event::Input(key_token::map_paste(&data)))
                        .is_err()
                    {
                        break;
                    }
                }
                Ok(_) => {}
                Err(e) => {
                    error!(target: "runtime", error = %e, "input_read_error");
                    let _ = tx.blocking_send(Event::Shutdown);
                    break;
                }
            }
        }
    });
}

/// Single-line prompt painter: mode tag, draft with visible line breaks, and
/// the command line when active.
fn render(controller: &VimController, buf: &PromptBuffer) -> Result<()> {
    let mut out = std::io::stdout();
    execute!(out, MoveToColumn(0), Clear(ClearType::CurrentLine))?;
    let tag = match buf.mode {
        Mode::Normal => "NOR",
        Mode::Insert => "INS",
        Mode::Visual => "VIS",
        Mode::VisualLine => "V-L",
        Mode::Command => "CMD",
    };
    if buf.mode == Mode::Command {
        write!(out, "[{tag}] {}", controller.command_buffer())?;
    } else {
        let flat = buf.text().replace('\n', "⏎");
        write!(out, "[{tag}] ❯ {flat}")?;
    }
    out.flush()?;
    Ok(())
}
