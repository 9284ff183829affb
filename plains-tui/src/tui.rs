use crate::feeders::spawn_input_reader;
use crate::screen::{Flow, Screen};
use crate::view;
use anyhow::{Context, Result};
use crossterm::{
    event::{Event as CtEvent, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use plains_feed::{FeedSource, FilterState, LoadOutcome, load_feed};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{self, Stdout};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

const MAILBOX: usize = 256;

pub enum TuiMsg {
    Input(CtEvent),
    InputError(String),
    Loaded(LoadOutcome),
}

/// Raw mode and the alternate screen for as long as it lives.
struct TerminalGuard {
    term: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalGuard {
    fn enter() -> Result<Self> {
        enable_raw_mode().context("enabling raw mode")?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let mut term = Terminal::new(CrosstermBackend::new(stdout))?;
        term.clear()?;
        Ok(Self { term })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        disable_raw_mode().ok();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        let _ = self.term.show_cursor();
    }
}

/// Run the article browser until the user quits or `cancel` fires.
///
/// The feed is fetched once in the background; the status line reads
/// "Loading articles…" until it arrives. On return `cancel` has been cancelled.
pub async fn run(
    source: Arc<dyn FeedSource>,
    initial: FilterState,
    cancel: CancellationToken,
) -> Result<()> {
    let mut guard = TerminalGuard::enter()?;
    let (tx, mut rx) = mpsc::channel::<TuiMsg>(MAILBOX);

    spawn_input_reader(tx.clone(), cancel.clone());
    spawn_loader(source, tx, cancel.clone());

    let mut screen = Screen::new(initial);
    tracing::info!("tui.start");

    let result = loop {
        if screen.take_dirty() {
            if let Err(e) = view::draw(&mut guard.term, &screen) {
                break Err(e);
            }
        }

        let msg = tokio::select! {
            _ = cancel.cancelled() => break Ok(()),
            msg = rx.recv() => match msg {
                Some(msg) => msg,
                None => break Ok(()),
            },
        };

        let flow = match msg {
            TuiMsg::Input(CtEvent::Key(key)) if key.kind == KeyEventKind::Press => {
                screen.handle_key(key)
            }
            TuiMsg::Input(CtEvent::Resize(..)) => {
                screen.mark_dirty();
                Flow::Continue
            }
            TuiMsg::Input(_) => Flow::Continue,
            TuiMsg::InputError(e) => {
                tracing::warn!(error = %e, "tui.input_error");
                screen.push_error(e);
                Flow::Continue
            }
            TuiMsg::Loaded(outcome) => {
                screen.apply_load(outcome);
                Flow::Continue
            }
        };

        if flow == Flow::Quit {
            break Ok(());
        }
    };

    cancel.cancel();
    tracing::info!(
        selected_tag = ?screen.filter_state().selected_tag,
        query = %screen.filter_state().applied_query(),
        "tui.stop"
    );
    result
}

fn spawn_loader(source: Arc<dyn FeedSource>, tx: mpsc::Sender<TuiMsg>, cancel: CancellationToken) {
    tokio::spawn(async move {
        let outcome = load_feed(source.as_ref(), &cancel).await;
        if matches!(outcome, LoadOutcome::Cancelled) {
            return;
        }
        let _ = tx.send(TuiMsg::Loaded(outcome)).await;
    });
}
