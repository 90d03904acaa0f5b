//! Run state and the simulation owner
//!
//! `TerrainSimulation` holds everything a run mutates: grid, creature, ledger,
//! RNG. Only the tick function changes it; collaborators read it through
//! accessors, [`Snapshot`], or the events delivered to an [`EventSink`].

use glam::IVec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::creature::Creature;
use super::grid::Grid;
use super::ledger::RunLedger;
use super::level::{LevelParams, generate};
use super::material::Material;
use crate::consts::VICTORY_HEALTH_BONUS;
use crate::error::ConfigError;
use crate::settings::Settings;

/// Current phase of the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RunState {
    /// Idle, nothing simulates
    #[default]
    Menu,
    /// All resolvers active
    Playing,
    /// Level finished; the next tick builds the next level
    LevelComplete,
    /// Run over (death or final victory); waits for a restart
    GameOver,
}

/// What hurt the creature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DamageCause {
    Crush,
    Water,
    Lava,
}

/// Notable moments, delivered to collaborators after each tick
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A dig landed (including a first hit that only cracked rock)
    Dug {
        pos: IVec2,
        material: Material,
        cleared: bool,
    },
    GemCollected {
        pos: IVec2,
        points: u64,
        gems_collected: u32,
    },
    Damaged {
        amount: u8,
        cause: DamageCause,
        health: u8,
    },
    Died {
        cause: DamageCause,
    },
    LevelCompleted {
        level: usize,
        level_score: u64,
    },
    /// Final level cleared
    Victory {
        score: u64,
    },
    /// Run over, by death or victory
    RunEnded {
        score: u64,
        level: usize,
        victory: bool,
    },
}

/// Receiver for simulation events (audio triggers, analytics, score keeping)
pub trait EventSink {
    fn emit(&mut self, event: GameEvent);
}

impl EventSink for Vec<GameEvent> {
    fn emit(&mut self, event: GameEvent) {
        self.push(event);
    }
}

/// Discards everything
impl EventSink for () {
    fn emit(&mut self, _event: GameEvent) {}
}

impl<T: EventSink + ?Sized> EventSink for &mut T {
    fn emit(&mut self, event: GameEvent) {
        (**self).emit(event);
    }
}

/// Fan out to two sinks
impl<A: EventSink, B: EventSink> EventSink for (A, B) {
    fn emit(&mut self, event: GameEvent) {
        self.0.emit(event.clone());
        self.1.emit(event);
    }
}

/// Read-only per-tick view for HUDs and other observers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub state: RunState,
    pub level_index: usize,
    pub level_count: usize,
    pub health: u8,
    /// Score for the current level
    pub level_score: u64,
    /// Score for the whole run so far
    pub run_score: u64,
    pub gems_collected: u32,
    pub gems_target: u32,
    pub deepest_row: i32,
    pub victory: bool,
    pub size_factor: f32,
}

/// Level seed mixed from the run seed (stable per level within a run)
pub fn level_seed(run_seed: u64, level_index: usize) -> u64 {
    (level_index as u64)
        .wrapping_mul(2654435761)
        .wrapping_add(run_seed)
}

/// Owner of all simulation state
#[derive(Debug, Clone)]
pub struct TerrainSimulation {
    pub(crate) settings: Settings,
    pub(crate) seed: u64,
    pub(crate) state: RunState,
    pub(crate) level_index: usize,
    pub(crate) params: LevelParams,
    pub(crate) grid: Grid,
    pub(crate) creature: Creature,
    pub(crate) ledger: RunLedger,
    /// Banked score from finished levels (and the final level once the run ends)
    pub(crate) total_score: u64,
    pub(crate) victory: bool,
    /// Playing ticks since the level started; drives resolver cadences
    pub(crate) level_ticks: u64,
    pub(crate) rng: Pcg32,
    pub(crate) pending: Vec<GameEvent>,
}

impl TerrainSimulation {
    /// Validate settings and build the first level, parked in the menu
    pub fn new(settings: Settings, seed: u64) -> Result<Self, ConfigError> {
        settings.validate()?;
        let params = settings.levels[0];
        let mut rng = Pcg32::seed_from_u64(level_seed(seed, 0));
        let level = generate(&params, settings.grid_width, settings.grid_height, &mut rng);

        Ok(Self {
            seed,
            state: RunState::Menu,
            level_index: 0,
            params,
            creature: Creature::new(level.spawn),
            ledger: RunLedger::new(params.gem_target, level.spawn.y),
            grid: level.grid,
            total_score: 0,
            victory: false,
            level_ticks: 0,
            rng,
            pending: Vec::new(),
            settings,
        })
    }

    /// Throw away the current level and generate `index` from scratch
    pub(crate) fn load_level(&mut self, index: usize) {
        let params = self.settings.levels[index];
        self.rng = Pcg32::seed_from_u64(level_seed(self.seed, index));
        let level = generate(
            &params,
            self.settings.grid_width,
            self.settings.grid_height,
            &mut self.rng,
        );
        log::info!(
            "Level {} generated: {} gems (target {}), {} water / {} lava pockets",
            index + 1,
            level.gems_placed,
            params.gem_target,
            level.water_pockets_placed,
            level.lava_pockets_placed
        );

        self.level_index = index;
        self.params = params;
        self.grid = level.grid;
        self.creature = Creature::new(level.spawn);
        self.ledger = RunLedger::new(params.gem_target, level.spawn.y);
        self.level_ticks = 0;
    }

    /// Menu -> Playing on the already generated first level
    pub(crate) fn start(&mut self) {
        log::info!("Run started (seed {})", self.seed);
        self.state = RunState::Playing;
    }

    /// Fresh run from the first level
    pub(crate) fn restart(&mut self) {
        log::info!("Run restarted (seed {})", self.seed);
        self.total_score = 0;
        self.victory = false;
        self.load_level(0);
        self.state = RunState::Playing;
    }

    /// LevelComplete -> Playing on the next level
    pub(crate) fn advance_level(&mut self) {
        let next = (self.level_index + 1).min(self.settings.levels.len() - 1);
        self.load_level(next);
        self.state = RunState::Playing;
    }

    /// Bank the level score and move to LevelComplete, or end the run on the last level
    pub(crate) fn complete_level(&mut self) {
        self.total_score += self.ledger.score;
        self.emit(GameEvent::LevelCompleted {
            level: self.level_index,
            level_score: self.ledger.score,
        });

        if self.is_final_level() {
            self.total_score += self.creature.health as u64 * VICTORY_HEALTH_BONUS;
            self.victory = true;
            self.state = RunState::GameOver;
            log::info!("Victory! Final score {}", self.total_score);
            self.emit(GameEvent::Victory {
                score: self.total_score,
            });
            self.emit_run_ended();
        } else {
            log::info!(
                "Level {} complete: {} points ({} total)",
                self.level_index + 1,
                self.ledger.score,
                self.total_score
            );
            self.state = RunState::LevelComplete;
        }
    }

    /// Creature died: bank what was earned and end the run
    pub(crate) fn die(&mut self, cause: DamageCause) {
        self.total_score += self.ledger.score;
        self.state = RunState::GameOver;
        log::info!(
            "Creature died ({:?}) on level {} with {} points",
            cause,
            self.level_index + 1,
            self.total_score
        );
        self.emit(GameEvent::Died { cause });
        self.emit_run_ended();
    }

    fn emit_run_ended(&mut self) {
        self.emit(GameEvent::RunEnded {
            score: self.total_score,
            level: self.level_index,
            victory: self.victory,
        });
    }

    #[inline]
    pub(crate) fn emit(&mut self, event: GameEvent) {
        self.pending.push(event);
    }

    /// Hand buffered events to `sink`
    pub(crate) fn flush_events<S: EventSink + ?Sized>(&mut self, sink: &mut S) {
        for event in self.pending.drain(..) {
            sink.emit(event);
        }
    }

    pub fn is_final_level(&self) -> bool {
        self.level_index + 1 >= self.settings.levels.len()
    }

    /// Whole-run score; the current level's points count until they are banked
    pub fn run_score(&self) -> u64 {
        match self.state {
            RunState::Menu | RunState::Playing => self.total_score + self.ledger.score,
            RunState::LevelComplete | RunState::GameOver => self.total_score,
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            state: self.state,
            level_index: self.level_index,
            level_count: self.settings.levels.len(),
            health: self.creature.health,
            level_score: self.ledger.score,
            run_score: self.run_score(),
            gems_collected: self.ledger.gems_collected,
            gems_target: self.ledger.gems_target,
            deepest_row: self.ledger.deepest_row,
            victory: self.victory,
            size_factor: self.ledger.size_factor(),
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn creature(&self) -> &Creature {
        &self.creature
    }

    pub fn ledger(&self) -> &RunLedger {
        &self.ledger
    }

    pub fn params(&self) -> &LevelParams {
        &self.params
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn level_index(&self) -> usize {
        self.level_index
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn victory(&self) -> bool {
        self.victory
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_parks_in_menu_on_first_level() {
        let sim = TerrainSimulation::new(Settings::default(), 1).unwrap();
        assert_eq!(sim.state(), RunState::Menu);
        assert_eq!(sim.level_index(), 0);
        assert_eq!(sim.grid().get(sim.creature().pos), Some(Material::Empty));
        assert_eq!(sim.ledger().gems_target, sim.params().gem_target);
    }

    #[test]
    fn test_new_rejects_bad_settings() {
        let settings = Settings {
            levels: Vec::new(),
            ..Default::default()
        };
        assert!(matches!(
            TerrainSimulation::new(settings, 1),
            Err(ConfigError::NoLevels)
        ));
    }

    #[test]
    fn test_level_seed_differs_per_level() {
        assert_ne!(level_seed(9, 0), level_seed(9, 1));
        assert_eq!(level_seed(9, 3), level_seed(9, 3));
    }

    #[test]
    fn test_fan_out_sink() {
        let mut a: Vec<GameEvent> = Vec::new();
        let mut b: Vec<GameEvent> = Vec::new();
        let mut sink = (&mut a, &mut b);
        sink.emit(GameEvent::Died {
            cause: DamageCause::Lava,
        });
        assert_eq!(a.len(), 1);
        assert_eq!(a, b);
    }

    #[test]
    fn test_run_score_counts_unbanked_points_while_playing() {
        let mut sim = TerrainSimulation::new(Settings::default(), 1).unwrap();
        sim.start();
        sim.ledger.score = 40;
        sim.total_score = 100;
        assert_eq!(sim.run_score(), 140);
        sim.complete_level();
        assert_eq!(sim.state(), RunState::LevelComplete);
        assert_eq!(sim.run_score(), 140);
    }
}
