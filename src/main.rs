//! Burrow - headless native runner
//!
//! Plays a seeded run with a simple autopilot and logs what happens.
//!
//! Usage: `burrow [seed] [easy|normal|hard] [settings.json]`

use std::process::ExitCode;

use burrow::audio::AudioQueue;
use burrow::consts::TICKS_PER_SECOND;
use burrow::sim::{
    Direction, EventSink, GameEvent, Material, RunState, TerrainSimulation, TickInput, tick,
};
use burrow::{Difficulty, HighScores, Settings};

/// Stop the demo after this much simulated time
const MAX_SECONDS: u64 = 600;

/// Logs every event as it arrives
struct EventLog;

impl EventSink for EventLog {
    fn emit(&mut self, event: GameEvent) {
        match event {
            GameEvent::Dug { .. } => log::trace!("{:?}", event),
            _ => log::info!("{:?}", event),
        }
    }
}

/// Greedy digger: grab adjacent gems, head down until the target is met, then climb
fn autopilot(sim: &TerrainSimulation) -> TickInput {
    let creature = sim.creature();
    let grid = sim.grid();

    for direction in [Direction::Left, Direction::Right, Direction::Down, Direction::Up] {
        if grid.get(creature.pos + direction.offset()) == Some(Material::Gem) {
            return face_and_dig(creature.facing, direction);
        }
    }

    let heading = if sim.ledger().target_met() {
        Direction::Up
    } else if creature.pos.y as usize + 1 < sim.params().bedrock_top() {
        Direction::Down
    } else if creature.pos.x as usize + 1 < grid.width() {
        Direction::Right
    } else {
        Direction::Left
    };

    let ahead = grid.get(creature.pos + heading.offset());
    match ahead {
        Some(m) if m.is_diggable() => face_and_dig(creature.facing, heading),
        // Never walk into fluids
        Some(m) if m.is_fluid() => TickInput::moving(Direction::Right),
        _ => TickInput::moving(heading),
    }
}

fn face_and_dig(facing: Direction, direction: Direction) -> TickInput {
    if facing == direction {
        TickInput::digging()
    } else {
        TickInput::moving(direction)
    }
}

fn parse_args() -> Result<(u64, Settings), String> {
    let args: Vec<String> = std::env::args().skip(1).collect();

    let seed = match args.first() {
        Some(s) => s.parse().map_err(|_| format!("invalid seed: {s}"))?,
        None => 0x5EED,
    };

    let mut settings = match args.get(2) {
        Some(path) => {
            let json =
                std::fs::read_to_string(path).map_err(|e| format!("reading {path}: {e}"))?;
            Settings::from_json(&json).map_err(|e| e.to_string())?
        }
        None => Settings::default(),
    };

    if let Some(name) = args.get(1) {
        let preset = Difficulty::from_str(name).ok_or_else(|| format!("unknown difficulty: {name}"))?;
        settings.apply_preset(preset);
    }

    Ok((seed, settings))
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Burrow (headless) starting...");

    let (seed, settings) = match parse_args() {
        Ok(parsed) => parsed,
        Err(e) => {
            log::error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let mut sim = match TerrainSimulation::new(settings, seed) {
        Ok(sim) => sim,
        Err(e) => {
            log::error!("Invalid settings: {e}");
            return ExitCode::FAILURE;
        }
    };
    log::info!("Simulation initialized with seed: {}", seed);

    let mut audio = AudioQueue::new();
    let mut scores = HighScores::new();
    let mut sinks = (EventLog, (&mut audio, &mut scores));

    tick(
        &mut sim,
        &TickInput {
            start: true,
            ..Default::default()
        },
        &mut sinks,
    );

    let max_ticks = MAX_SECONDS * TICKS_PER_SECOND as u64;
    let mut ticks = 0;
    while sim.state() != RunState::GameOver && ticks < max_ticks {
        let input = autopilot(&sim);
        tick(&mut sim, &input, &mut sinks);
        ticks += 1;

        if ticks % (10 * TICKS_PER_SECOND as u64) == 0 {
            log::info!("{:?}", sim.snapshot());
        }
    }

    let cues = sinks.1.0.drain().len();
    log::info!(
        "Finished after {} ticks ({} sound cues, top score {:?})",
        ticks,
        cues,
        scores.top_score()
    );

    match serde_json::to_string_pretty(&sim.snapshot()) {
        Ok(json) => println!("{json}"),
        Err(e) => log::warn!("Snapshot serialization failed: {e}"),
    }
    print!("{}", sim.grid().to_text());

    ExitCode::SUCCESS
}
