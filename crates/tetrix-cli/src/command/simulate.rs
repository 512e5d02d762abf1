use std::{path::PathBuf, time::Duration};

use rand::{
    Rng,
    distr::{Distribution, StandardUniform},
};
use rand_pcg::Pcg32;
use serde::Serialize;
use tetrix_engine::{Session, SessionObserver, SessionSnapshot, ShapeSeed};

use crate::util::{self, Output};

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::FromStr)]
pub(crate) enum InputPolicy {
    /// One random command (or none) per tick
    #[default]
    Random,
    /// Shift and rotate at random, then hard drop, every tick
    Stack,
}

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct SimulateArg {
    /// Session configuration file (JSON); defaults are used without it
    #[arg(long)]
    config: Option<PathBuf>,
    /// Shape seed (32 hex digits), overriding the configuration file
    #[arg(long)]
    seed: Option<ShapeSeed>,
    /// Board width, overriding the configuration file
    #[arg(long)]
    width: Option<usize>,
    /// Board height, overriding the configuration file
    #[arg(long)]
    height: Option<usize>,
    /// Stop after this many ticks even if the game is not over
    #[arg(long, default_value_t = 10_000)]
    max_ticks: usize,
    /// How the simulated player chooses commands
    #[arg(long, default_value_t = InputPolicy::Random)]
    policy: InputPolicy,
    /// Seed (32 hex digits) for the simulated player
    #[arg(long)]
    input_seed: Option<ShapeSeed>,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
    /// Print a summary and the final board to stderr
    #[arg(long)]
    verbose: bool,
}

/// A player command chosen by the input policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Idle,
    MoveLeft,
    MoveRight,
    RotateLeft,
    RotateRight,
    SoftDrop,
    HardDrop,
}

impl Distribution<Command> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Command {
        // Hard drops are rare so pieces get to fall under gravity.
        match rng.random_range(0..20) {
            0..=4 => Command::Idle,
            5..=7 => Command::MoveLeft,
            8..=10 => Command::MoveRight,
            11..=12 => Command::RotateLeft,
            13..=14 => Command::RotateRight,
            15..=18 => Command::SoftDrop,
            _ => Command::HardDrop,
        }
    }
}

impl Command {
    fn apply(self, session: &mut Session, tally: &mut EventTally) {
        let events = match self {
            Command::Idle => return,
            Command::MoveLeft => session.move_left(),
            Command::MoveRight => session.move_right(),
            Command::RotateLeft => session.rotate_left(),
            Command::RotateRight => session.rotate_right(),
            Command::SoftDrop => session.soft_drop_one(),
            Command::HardDrop => session.hard_drop(),
        };
        if !events.accepted() {
            tally.rejected_commands += 1;
        }
        events.dispatch(tally);
    }
}

/// Counts the notifications a presentation layer would have received.
#[derive(Debug, Default, Clone, Serialize)]
struct EventTally {
    score_changes: usize,
    level_changes: usize,
    line_clears: usize,
    redraws: usize,
    rejected_commands: usize,
}

impl SessionObserver for EventTally {
    fn score_changed(&mut self, _score: usize) {
        self.score_changes += 1;
    }

    fn level_changed(&mut self, _level: usize) {
        self.level_changes += 1;
    }

    fn lines_removed_changed(&mut self, _lines: usize) {
        self.line_clears += 1;
    }

    fn board_redraw_needed(&mut self) {
        self.redraws += 1;
    }
}

#[derive(Debug, Clone, Serialize)]
struct SimulationReport {
    seed: ShapeSeed,
    input_seed: ShapeSeed,
    policy: String,
    ticks: usize,
    elapsed_ms: u128,
    events: EventTally,
    snapshot: SessionSnapshot,
}

pub(crate) fn run(arg: &SimulateArg) -> anyhow::Result<()> {
    let SimulateArg {
        config,
        seed,
        width,
        height,
        max_ticks,
        policy,
        input_seed,
        output,
        verbose,
    } = arg;

    let mut config = util::read_session_config(config.as_deref())?;
    if let Some(width) = width {
        config.width = *width;
    }
    if let Some(height) = height {
        config.height = *height;
    }
    let seed = seed
        .or(config.seed)
        .unwrap_or_else(|| rand::rng().random());
    config.seed = Some(seed);
    let input_seed = input_seed.unwrap_or_else(|| rand::rng().random());

    let mut session = Session::new(config)?;
    let mut input_rng = input_seed.rng();
    let mut tally = EventTally::default();

    if *verbose {
        eprintln!("Simulating {policy} player with shape seed {seed}, input seed {input_seed}");
    }

    let (ticks, elapsed) = simulate(
        &mut session,
        *policy,
        &mut input_rng,
        &mut tally,
        *max_ticks,
    );

    if *verbose {
        let stats = session.stats();
        eprintln!(
            "{:?} after {ticks} ticks ({:.1}s): score {}, level {}, lines {}, pieces {}",
            session.state(),
            elapsed.as_secs_f64(),
            stats.score(),
            stats.level(),
            stats.lines_removed(),
            stats.pieces_dropped()
        );
        eprint!("{}", session.board());
    }

    let report = SimulationReport {
        seed,
        input_seed,
        policy: policy.to_string(),
        ticks,
        elapsed_ms: elapsed.as_millis(),
        events: tally,
        snapshot: session.snapshot(),
    };
    Output::save_json(&report, output.clone())
}

/// Plays until game over or `max_ticks`, returning the tick count and the
/// time a real-time driver would have spent.
fn simulate(
    session: &mut Session,
    policy: InputPolicy,
    input_rng: &mut Pcg32,
    tally: &mut EventTally,
    max_ticks: usize,
) -> (usize, Duration) {
    let mut elapsed = Duration::ZERO;
    let mut ticks = 0;

    session.start().dispatch(tally);
    while ticks < max_ticks && !session.state().is_game_over() {
        match policy {
            InputPolicy::Random => input_rng.random::<Command>().apply(session, tally),
            InputPolicy::Stack => {
                let shift = input_rng.random_range(0..6);
                let (command, count) = if shift < 3 {
                    (Command::MoveLeft, shift)
                } else {
                    (Command::MoveRight, shift - 3)
                };
                if input_rng.random_bool(0.5) {
                    Command::RotateRight.apply(session, tally);
                }
                for _ in 0..count {
                    command.apply(session, tally);
                }
                Command::HardDrop.apply(session, tally);
            }
        }
        elapsed += session.timer_interval();
        session.tick().dispatch(tally);
        ticks += 1;
    }
    (ticks, elapsed)
}
