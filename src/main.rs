use anyhow::Context;
use celebrate::config::parse_hex_color;
use celebrate::render::TerminalRenderer;
use celebrate::{CelebrationConfig, CelebrationDispatcher, DEFAULT_DURATION_MS, EffectError, EffectKind, Rgb, TriggerId};
use clap::Parser;
use crossterm::{
    cursor::{Hide, Show},
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};
use std::fs::File;
use std::io::{BufWriter, Stdout, stdout};
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const FRAME: Duration = Duration::from_millis(16);

#[derive(Parser, Debug)]
#[command(
    name = "celebrate",
    about = "Terminal celebration effects: confetti, fireworks and balloons",
    after_help = "Keys:\n  g          goal completion (confetti)\n  c          challenge completion (fireworks)\n  a          special achievement (balloons)\n  r, space   next effect in rotation\n  x          cancel the running effect\n  q, Esc     quit"
)]
struct Cli {
    /// Effect to play on start: confetti, fireworks or balloons
    effect: Option<String>,

    /// Effect duration in milliseconds
    #[arg(long, default_value_t = DEFAULT_DURATION_MS, allow_negative_numbers = true)]
    duration: i64,

    /// Seed for reproducible effects
    #[arg(long)]
    seed: Option<u64>,

    /// Background color as hex (e.g. 1a1b26)
    #[arg(long, value_parser = parse_background)]
    bg_color: Option<Rgb>,

    /// Keep cycling through every effect
    #[arg(long)]
    rotate: bool,

    /// Write logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Log filter, e.g. `celebrate=debug` (defaults to RUST_LOG, then `info`)
    #[arg(long)]
    log_level: Option<String>,
}

fn parse_background(hex: &str) -> Result<Rgb, String> {
    parse_hex_color(hex).ok_or_else(|| format!("invalid hex color {hex:?}, expected RRGGBB (e.g. 1a1b26)"))
}

enum Action {
    Quit,
    Goal,
    Challenge,
    Achievement,
    Rotate,
    Cancel,
}

fn action_for(key: &KeyEvent) -> Option<Action> {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Some(Action::Quit),
        KeyCode::Char('g') => Some(Action::Goal),
        KeyCode::Char('c') => Some(Action::Challenge),
        KeyCode::Char('a') => Some(Action::Achievement),
        KeyCode::Char('r') | KeyCode::Char(' ') => Some(Action::Rotate),
        KeyCode::Char('x') => Some(Action::Cancel),
        _ => None,
    }
}

/// Rejected celebrations are logged, never fatal.
fn report(result: Result<TriggerId, EffectError>) {
    if let Err(err) = result {
        warn!("celebration rejected: {err}");
    }
}

fn init_logging(cli: &Cli) -> anyhow::Result<()> {
    // Logging to the terminal would draw over the alternate screen
    let Some(path) = &cli.log_file else {
        return Ok(());
    };
    let file = File::create(path).with_context(|| format!("creating log file {}", path.display()))?;
    let filter = match &cli.log_level {
        Some(directives) => EnvFilter::try_new(directives).context("parsing --log-level")?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn event_loop(
    stdout: &mut BufWriter<Stdout>,
    config: &CelebrationConfig,
    initial: Option<EffectKind>,
    rotate: bool,
) -> anyhow::Result<()> {
    let (cols, rows) = terminal::size()?;
    let mut renderer = TerminalRenderer::new(cols as usize, rows as usize, config.background);
    let mut dispatcher = CelebrationDispatcher::new(config, renderer.viewport());
    dispatcher.on_complete(|| info!("celebration finished"));

    let clock = Instant::now();
    let now_ms = || clock.elapsed().as_millis() as u64;

    if let Some(kind) = initial {
        report(dispatcher.celebrate(Some(kind), now_ms()));
    }

    loop {
        if event::poll(FRAME)? {
            match event::read()? {
                Event::Key(key) => {
                    let now = now_ms();
                    match action_for(&key) {
                        Some(Action::Quit) => break,
                        Some(Action::Goal) => report(dispatcher.celebrate_goal_completion(now)),
                        Some(Action::Challenge) => report(dispatcher.celebrate_challenge_completion(now)),
                        Some(Action::Achievement) => report(dispatcher.celebrate_special_achievement(now)),
                        Some(Action::Rotate) => report(dispatcher.celebrate_rotating(now)),
                        Some(Action::Cancel) => {
                            if dispatcher.cancel() {
                                info!("celebration cancelled");
                            }
                        }
                        None => {}
                    }
                }
                Event::Resize(cols, rows) => {
                    renderer.resize(cols as usize, rows as usize);
                    dispatcher.set_viewport(renderer.viewport());
                    execute!(stdout, Clear(ClearType::All))?;
                }
                _ => {}
            }
        }

        let now = now_ms();
        dispatcher.poll(now);
        if rotate && !dispatcher.controller().is_active() {
            report(dispatcher.celebrate_rotating(now));
        }

        renderer.draw(&dispatcher.frame(now), stdout)?;
    }

    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    let initial = cli
        .effect
        .as_deref()
        .map(str::parse::<EffectKind>)
        .transpose()?;

    let config = CelebrationConfig {
        default_duration_ms: cli.duration,
        seed: cli.seed,
        background: cli.bg_color.unwrap_or((0, 0, 0)),
        ..Default::default()
    };
    info!("starting with {:?}", config);

    let mut stdout = BufWriter::with_capacity(1024 * 64, stdout());
    terminal::enable_raw_mode()?;
    execute!(stdout, EnterAlternateScreen, Hide, Clear(ClearType::All))?;

    let result = event_loop(&mut stdout, &config, initial, cli.rotate);

    execute!(stdout, Show, LeaveAlternateScreen)?;
    terminal::disable_raw_mode()?;

    result
}
