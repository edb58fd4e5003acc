mod display;

use std::collections::HashMap;
use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::PathBuf;
use std::sync::{mpsc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        ModifierKeyCode, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;
use tracing_subscriber::EnvFilter;

use final_flight::audio::NullAudio;
use final_flight::clock::SystemClock;
use final_flight::player::FiringMode;
use final_flight::{Campaign, HeldInputs, InputCommand, LevelId, LevelRegistry, Services, TICK_MS};

const FRAME: Duration = Duration::from_millis(TICK_MS);

/// A key is considered "held" if its last press/repeat event arrived within
/// this many ticks.  Covers terminals that don't emit key-release events:
/// OS key-repeat runs at 15 Hz or more, so 3 ticks (150 ms) is always
/// refreshed before it expires.
const HOLD_WINDOW: u64 = 3;

#[derive(Parser, Debug)]
#[command(name = "final_flight", about = "Side-scrolling arcade shooter in the terminal")]
struct Args {
    /// JSON level table; defaults to the built-in three levels.
    #[arg(long)]
    levels: Option<PathBuf>,

    /// Level id to start from (defaults to the first level in the table).
    #[arg(long)]
    start: Option<String>,

    /// Seed for a reproducible run.
    #[arg(long)]
    seed: Option<u64>,

    /// Write logs here; the terminal is taken by the game screen.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn init_logging(path: Option<&PathBuf>) -> Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let file = File::create(path).with_context(|| format!("creating log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("final_flight=info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

/// Returns true if `key` was seen within the last `HOLD_WINDOW` ticks.
fn is_held(key_frame: &HashMap<KeyCode, u64>, keys: &[KeyCode], frame: u64) -> bool {
    keys.iter().any(|key| {
        key_frame
            .get(key)
            .is_some_and(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
    })
}

fn held_inputs(key_frame: &HashMap<KeyCode, u64>, frame: u64) -> HeldInputs {
    let shift = KeyCode::Modifier(ModifierKeyCode::LeftShift);
    HeldInputs {
        up: is_held(key_frame, &[KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')], frame),
        down: is_held(key_frame, &[KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')], frame),
        left: is_held(key_frame, &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')], frame),
        right: is_held(key_frame, &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')], frame),
        fire: is_held(key_frame, &[KeyCode::Char(' ')], frame),
        boost: is_held(key_frame, &[shift, KeyCode::Char('b'), KeyCode::Char('B')], frame),
        mode: None,
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Input model: a `key_frame` map records the tick of the last press/repeat
/// for every key, and each tick the still-fresh keys are folded into one
/// `HeldInputs`.  Release events (keyboard-enhancement terminals) drop a key
/// immediately; on classic terminals it expires after `HOLD_WINDOW`.
fn game_loop<W: Write>(out: &mut W, campaign: &mut Campaign, rx: &mpsc::Receiver<Event>) -> Result<()> {
    let mut key_frame: HashMap<KeyCode, u64> = HashMap::new();
    let mut frame: u64 = 0;

    loop {
        let frame_start = Instant::now();
        frame += 1;
        let mut mode: Option<FiringMode> = None;

        while let Ok(Event::Key(KeyEvent { code, kind, modifiers, .. })) = rx.try_recv() {
            match kind {
                KeyEventKind::Press => {
                    key_frame.insert(code, frame);
                    match code {
                        KeyCode::Char('q') | KeyCode::Char('Q') => return Ok(()),
                        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => return Ok(()),
                        KeyCode::Char('p') | KeyCode::Char('P') | KeyCode::Esc => {
                            if campaign.session().outcome().is_none() {
                                campaign.toggle_pause();
                            }
                        }
                        KeyCode::Char('r') | KeyCode::Char('R')
                            if campaign.is_paused() || campaign.session().outcome().is_some() =>
                        {
                            campaign.restart()?;
                            key_frame.clear();
                        }
                        KeyCode::Char('1') => mode = Some(FiringMode::Single),
                        KeyCode::Char('2') => mode = Some(FiringMode::Spread),
                        KeyCode::Char('3') => mode = Some(FiringMode::Heavy),
                        _ => {}
                    }
                }
                KeyEventKind::Repeat => {
                    key_frame.insert(code, frame);
                }
                KeyEventKind::Release => {
                    key_frame.remove(&code);
                }
            }
        }

        // a paused campaign ignores ticks, so nothing queues up meanwhile
        if !campaign.is_paused() {
            let mut inputs = held_inputs(&key_frame, frame);
            if let Some(mode) = mode {
                inputs.apply(InputCommand::SetFiringMode(mode));
            }
            campaign.tick(&inputs).context("level transition failed")?;
        }

        let screen = campaign.session().config().screen;
        display::render(out, &campaign.snapshot(), (screen.width, screen.height))?;

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME {
            thread::sleep(FRAME - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log_file.as_ref())?;

    let registry = match &args.levels {
        Some(path) => LevelRegistry::from_path(path)
            .with_context(|| format!("loading levels from {}", path.display()))?,
        None => LevelRegistry::builtin(),
    };
    let start = match args.start {
        Some(id) => LevelId::new(id),
        None => registry.first().cloned().context("level table is empty")?,
    };
    let rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let services = Services::new(rng, SystemClock::new(), NullAudio);
    let mut campaign = Campaign::new(registry, start, services)?;
    info!(level = %campaign.current_level(), seed = ?args.seed, "starting");

    let mut out = BufWriter::new(stdout());
    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Ask for release events; terminals without the kitty protocol ignore it.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Blocking reads live on their own thread so the tick never waits on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break;
            }
        }
    });

    let result = game_loop(&mut out, &mut campaign, &rx);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result
}
