//! Per-frame simulation tick
//!
//! Runs the resolvers in a fixed order: input (move, then dig), gravity,
//! water, lava, hazards, completion. Gravity and the two fluids each run on
//! their own frame cadence but never out of this order.

use super::creature::Direction;
use super::dig::dig;
use super::fluid::{step_lava, step_water};
use super::gravity::step_gravity;
use super::ledger::{Hazard, resolve_hazard};
use super::material::Material;
use super::state::{DamageCause, EventSink, GameEvent, RunState, TerrainSimulation};

/// Intents active this frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub dig: bool,
    /// Leave the menu
    pub start: bool,
    /// Begin a new run after game over
    pub restart: bool,
}

impl TickInput {
    /// Single-direction move intent
    pub fn moving(direction: Direction) -> Self {
        let mut input = Self::default();
        match direction {
            Direction::Up => input.up = true,
            Direction::Down => input.down = true,
            Direction::Left => input.left = true,
            Direction::Right => input.right = true,
        }
        input
    }

    /// Dig without moving
    pub fn digging() -> Self {
        Self {
            dig: true,
            ..Default::default()
        }
    }

    /// Requested direction; vertical intents win over horizontal ones
    pub fn direction(&self) -> Option<Direction> {
        if self.up {
            Some(Direction::Up)
        } else if self.down {
            Some(Direction::Down)
        } else if self.left {
            Some(Direction::Left)
        } else if self.right {
            Some(Direction::Right)
        } else {
            None
        }
    }
}

/// Advance the simulation by one frame and deliver the frame's events to `sink`
pub fn tick<S: EventSink + ?Sized>(sim: &mut TerrainSimulation, input: &TickInput, sink: &mut S) {
    match sim.state {
        RunState::Menu => {
            if input.start {
                sim.start();
            }
        }
        RunState::LevelComplete => sim.advance_level(),
        RunState::GameOver => {
            if input.restart {
                sim.restart();
            }
        }
        RunState::Playing => play(sim, input),
    }

    sim.flush_events(sink);
}

/// One Playing frame
fn play(sim: &mut TerrainSimulation, input: &TickInput) {
    sim.level_ticks += 1;
    sim.creature.tick_timers();

    // Creature controller
    if let Some(direction) = input.direction() {
        let cooldown = sim.settings.move_cooldown_ticks;
        if sim.creature.try_move(direction, &sim.grid, cooldown) {
            sim.ledger.observe_row(sim.creature.pos.y);
        }
    }

    // Dig interaction
    if input.dig {
        let result = dig(
            &mut sim.grid,
            &mut sim.creature,
            &mut sim.ledger,
            sim.params.sky_rows,
            sim.settings.dig_lock_ticks,
        );
        if let Some(result) = result {
            sim.emit(GameEvent::Dug {
                pos: result.pos,
                material: result.material,
                cleared: result.cleared,
            });
            if result.gem_found {
                sim.emit(GameEvent::GemCollected {
                    pos: result.pos,
                    points: result.points,
                    gems_collected: sim.ledger.gems_collected,
                });
            }
        }
    }

    let mut fatal = None;

    // Gravity
    if sim.level_ticks % sim.settings.gravity_cadence as u64 == 0 {
        let outcome = step_gravity(
            &mut sim.grid,
            &mut sim.creature,
            sim.settings.crush_damage,
            sim.settings.crush_cooldown_ticks,
        );
        for crush in &outcome.crushes {
            sim.emit(GameEvent::Damaged {
                amount: crush.damage,
                cause: DamageCause::Crush,
                health: sim.creature.health,
            });
        }
        if !outcome.crushes.is_empty() && !sim.creature.is_alive() {
            fatal = Some(DamageCause::Crush);
        }
        if let Some(pos) = outcome.rescued_to {
            sim.ledger.observe_row(pos.y);
        }
    }

    // Fluids
    if sim.level_ticks % sim.settings.water_cadence as u64 == 0 {
        step_water(&mut sim.grid, &mut sim.rng);
    }
    if sim.level_ticks % sim.settings.lava_cadence as u64 == 0 {
        step_lava(&mut sim.grid, sim.settings.lava_lateral_chance, &mut sim.rng);
    }

    // Hazards at the creature's final cell for this frame
    if fatal.is_none() {
        let health_before = sim.creature.health;
        match resolve_hazard(
            &mut sim.creature,
            &sim.grid,
            sim.settings.water_damage,
            sim.settings.water_cooldown_ticks,
        ) {
            Hazard::None => {}
            Hazard::Damage(amount) => sim.emit(GameEvent::Damaged {
                amount,
                cause: DamageCause::Water,
                health: sim.creature.health,
            }),
            Hazard::Death => {
                let cause = if sim.grid.get(sim.creature.pos) == Some(Material::Lava) {
                    DamageCause::Lava
                } else {
                    DamageCause::Water
                };
                sim.emit(GameEvent::Damaged {
                    amount: health_before,
                    cause,
                    health: 0,
                });
                fatal = Some(cause);
            }
        }
    }

    if let Some(cause) = fatal {
        sim.die(cause);
        return;
    }

    // Completion: enough gems and back up at the surface
    if sim.ledger.target_met() && sim.creature.pos.y <= sim.params.sky_rows as i32 {
        sim.complete_level();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{MAX_HEALTH, ROCK_DURABILITY, VICTORY_HEALTH_BONUS};
    use crate::settings::Settings;
    use crate::sim::grid::Grid;
    use crate::sim::level::LevelParams;
    use glam::IVec2;

    /// Level used by the completion scenarios: 4 sky rows, 8 gems, target 5
    fn scenario_level() -> LevelParams {
        LevelParams {
            sky_rows: 4,
            grass_rows: 1,
            soil_rows: 6,
            rock_rows: 4,
            gem_count: 8,
            water_pockets: 0,
            lava_pockets: 0,
            gem_target: 5,
        }
    }

    /// Settings with instant moves/digs and resolvers that effectively never run
    fn quiet_settings(levels: Vec<LevelParams>) -> Settings {
        Settings {
            grid_width: 12,
            grid_height: 20,
            move_cooldown_ticks: 0,
            dig_lock_ticks: 0,
            gravity_cadence: 1_000_000,
            water_cadence: 1_000_000,
            lava_cadence: 2_000_000,
            levels,
            ..Default::default()
        }
    }

    fn playing(settings: Settings, grid: Grid, at: IVec2) -> TerrainSimulation {
        let mut sim = TerrainSimulation::new(settings, 7).unwrap();
        sim.start();
        sim.grid = grid;
        sim.creature.pos = at;
        sim
    }

    /// Open shaft in column 0 with a column of gems in column 1 beside it
    fn gem_shaft(gems: usize) -> Grid {
        let mut grid = Grid::filled(12, 20, Material::Bedrock);
        for y in 0..4 {
            for x in 0..12 {
                grid.set(IVec2::new(x, y), Material::Surface);
            }
        }
        for y in 4..16 {
            grid.set(IVec2::new(0, y), Material::Empty);
            grid.set(IVec2::new(1, y), Material::Soil);
        }
        for i in 0..gems {
            grid.set(IVec2::new(1, 6 + i as i32), Material::Gem);
        }
        grid
    }

    fn run(sim: &mut TerrainSimulation, input: &TickInput) -> Vec<GameEvent> {
        let mut events = Vec::new();
        tick(sim, input, &mut events);
        events
    }

    /// Walk down the shaft digging every gem to the right, then climb to `top_row`
    fn dig_gems_and_climb(sim: &mut TerrainSimulation, gems: usize, top_row: i32) {
        for i in 0..gems {
            sim.creature.pos = IVec2::new(0, 6 + i as i32);
            run(sim, &TickInput::moving(Direction::Right));
            assert_eq!(sim.creature.facing, Direction::Right);
            run(sim, &TickInput::digging());
        }
        assert_eq!(sim.ledger.gems_collected, gems as u32);
        while sim.creature.pos.y > top_row && sim.state == RunState::Playing {
            run(sim, &TickInput::moving(Direction::Up));
        }
    }

    #[test]
    fn test_menu_waits_for_start() {
        let mut sim = TerrainSimulation::new(Settings::default(), 3).unwrap();
        let before = sim.grid.clone();
        run(&mut sim, &TickInput::digging());
        assert_eq!(sim.state, RunState::Menu);
        assert_eq!(sim.grid, before);

        run(
            &mut sim,
            &TickInput {
                start: true,
                ..Default::default()
            },
        );
        assert_eq!(sim.state, RunState::Playing);
    }

    #[test]
    fn test_five_gems_and_surface_completes_level() {
        let settings = quiet_settings(vec![scenario_level(), scenario_level()]);
        let mut sim = playing(settings, gem_shaft(8), IVec2::new(0, 6));
        dig_gems_and_climb(&mut sim, 5, 3);
        // Row 4 is the grass row, which counts as the surface
        assert_eq!(sim.creature.pos.y, 4);
        assert_eq!(sim.state, RunState::LevelComplete);
    }

    #[test]
    fn test_four_gems_and_surface_does_not_complete() {
        let settings = quiet_settings(vec![scenario_level(), scenario_level()]);
        let mut sim = playing(settings, gem_shaft(8), IVec2::new(0, 6));
        dig_gems_and_climb(&mut sim, 4, 3);
        assert_eq!(sim.creature.pos.y, 3);
        assert_eq!(sim.state, RunState::Playing);
    }

    #[test]
    fn test_target_met_deep_underground_does_not_complete() {
        let settings = quiet_settings(vec![scenario_level(), scenario_level()]);
        let mut sim = playing(settings, gem_shaft(8), IVec2::new(0, 6));
        dig_gems_and_climb(&mut sim, 5, 10);
        assert!(sim.ledger.target_met());
        assert_eq!(sim.state, RunState::Playing);
        // ...until it climbs out
        while sim.state == RunState::Playing {
            run(&mut sim, &TickInput::moving(Direction::Up));
        }
        assert_eq!(sim.state, RunState::LevelComplete);
        assert_eq!(sim.creature.pos.y, 4);
    }

    #[test]
    fn test_level_complete_regenerates_next_level() {
        let settings = quiet_settings(vec![scenario_level(), scenario_level()]);
        let mut sim = playing(settings, gem_shaft(8), IVec2::new(0, 6));
        dig_gems_and_climb(&mut sim, 5, 3);
        let banked = sim.run_score();
        assert!(banked > 0);

        let events = run(&mut sim, &TickInput::default());
        assert!(events.is_empty());
        assert_eq!(sim.state, RunState::Playing);
        assert_eq!(sim.level_index, 1);
        assert_eq!(sim.ledger.gems_collected, 0);
        assert_eq!(sim.ledger.score, 0);
        assert_eq!(sim.creature.health, MAX_HEALTH);
        assert_eq!(sim.run_score(), banked);
    }

    #[test]
    fn test_final_level_ends_in_victory_with_health_bonus() {
        let settings = quiet_settings(vec![scenario_level()]);
        let mut sim = playing(settings, gem_shaft(8), IVec2::new(0, 6));
        sim.creature.health = 60;
        dig_gems_and_climb(&mut sim, 5, 3);

        assert_eq!(sim.state, RunState::GameOver);
        assert!(sim.victory);
        assert_eq!(
            sim.total_score,
            sim.ledger.score + 60 * VICTORY_HEALTH_BONUS
        );
    }

    #[test]
    fn test_victory_events() {
        let settings = quiet_settings(vec![scenario_level()]);
        let mut sim = playing(settings, gem_shaft(8), IVec2::new(0, 5));
        sim.ledger.gems_collected = 5;
        let events = run(&mut sim, &TickInput::moving(Direction::Up));
        let score = sim.total_score;
        assert_eq!(
            events,
            vec![
                GameEvent::LevelCompleted {
                    level: 0,
                    level_score: 0
                },
                GameEvent::Victory { score },
                GameEvent::RunEnded {
                    score,
                    level: 0,
                    victory: true
                },
            ]
        );
    }

    #[test]
    fn test_lava_kills_at_full_health_despite_cooldowns() {
        let grid = Grid::from_rows(&["____", "  ^ ", "===="], ROCK_DURABILITY);
        let mut sim = playing(quiet_settings(vec![scenario_level()]), grid, IVec2::new(1, 1));
        sim.creature.water_cooldown = 100;
        sim.creature.crush_cooldown = 100;
        assert_eq!(sim.creature.health, MAX_HEALTH);

        let events = run(&mut sim, &TickInput::moving(Direction::Right));
        assert_eq!(sim.creature.health, 0);
        assert_eq!(sim.state, RunState::GameOver);
        assert!(!sim.victory);
        assert!(events.contains(&GameEvent::Died {
            cause: DamageCause::Lava
        }));
    }

    #[test]
    fn test_death_beats_completion() {
        // Target met at the surface, but standing in lava
        let grid = Grid::from_rows(&["____", " ^  ", "===="], ROCK_DURABILITY);
        let mut sim = playing(quiet_settings(vec![scenario_level(), scenario_level()]), grid, IVec2::new(0, 1));
        sim.ledger.gems_collected = 5;
        run(&mut sim, &TickInput::moving(Direction::Right));
        assert_eq!(sim.state, RunState::GameOver);
        assert!(!sim.victory);
    }

    #[test]
    fn test_water_damage_event() {
        let grid = Grid::from_rows(&["____", " ~  ", "===="], ROCK_DURABILITY);
        let mut settings = quiet_settings(vec![scenario_level()]);
        settings.water_damage = 7;
        let mut sim = playing(settings, grid, IVec2::new(0, 1));
        let events = run(&mut sim, &TickInput::moving(Direction::Right));
        assert_eq!(
            events,
            vec![GameEvent::Damaged {
                amount: 7,
                cause: DamageCause::Water,
                health: MAX_HEALTH - 7
            }]
        );
    }

    #[test]
    fn test_crush_on_gravity_cadence() {
        let grid = Grid::from_rows(&["____", "=.==", "= ==", "===="], ROCK_DURABILITY);
        let mut settings = quiet_settings(vec![scenario_level()]);
        settings.gravity_cadence = 2;
        let mut sim = playing(settings, grid, IVec2::new(1, 2));

        assert!(run(&mut sim, &TickInput::default()).is_empty());
        let events = run(&mut sim, &TickInput::default());
        assert!(matches!(
            events.as_slice(),
            [GameEvent::Damaged {
                cause: DamageCause::Crush,
                ..
            }]
        ));
        assert!(!sim.grid.is_solid(sim.creature.pos));
        assert_eq!(sim.creature.pos, IVec2::new(1, 1));
    }

    #[test]
    fn test_fatal_crush_ends_run() {
        let grid = Grid::from_rows(&["____", "=.==", "= ==", "===="], ROCK_DURABILITY);
        let mut settings = quiet_settings(vec![scenario_level()]);
        settings.gravity_cadence = 1;
        let mut sim = playing(settings, grid, IVec2::new(1, 2));
        sim.creature.health = 10;
        let events = run(&mut sim, &TickInput::default());
        assert_eq!(sim.state, RunState::GameOver);
        assert!(events.contains(&GameEvent::Died {
            cause: DamageCause::Crush
        }));
    }

    #[test]
    fn test_turn_and_dig_right_after_a_step() {
        let grid = Grid::from_rows(&["__", " .", "=="], ROCK_DURABILITY);
        let mut settings = quiet_settings(vec![scenario_level()]);
        settings.move_cooldown_ticks = 8;
        let mut sim = playing(settings, grid, IVec2::new(0, 0));

        run(&mut sim, &TickInput::moving(Direction::Down));
        assert_eq!(sim.creature.pos, IVec2::new(0, 1));
        assert!(sim.creature.move_cooldown > 0);

        let mut input = TickInput::moving(Direction::Right);
        input.dig = true;
        let events = run(&mut sim, &input);
        assert_eq!(sim.creature.facing, Direction::Right);
        assert_eq!(sim.creature.pos, IVec2::new(0, 1));
        assert_eq!(
            events,
            vec![GameEvent::Dug {
                pos: IVec2::new(1, 1),
                material: Material::Soil,
                cleared: true
            }]
        );
        assert_eq!(sim.grid.get(IVec2::new(1, 1)), Some(Material::Empty));
    }

    #[test]
    fn test_dig_events_and_score() {
        let grid = Grid::from_rows(&["____", " #* ", "===="], ROCK_DURABILITY);
        let mut sim = playing(quiet_settings(vec![scenario_level()]), grid, IVec2::new(0, 1));
        sim.creature.facing = Direction::Right;

        let events = run(&mut sim, &TickInput::digging());
        assert_eq!(
            events,
            vec![GameEvent::Dug {
                pos: IVec2::new(1, 1),
                material: Material::Rock,
                cleared: false
            }]
        );
        run(&mut sim, &TickInput::digging());
        run(&mut sim, &TickInput::moving(Direction::Right));
        let events = run(&mut sim, &TickInput::digging());
        assert!(matches!(
            events.as_slice(),
            [
                GameEvent::Dug {
                    material: Material::Gem,
                    cleared: true,
                    ..
                },
                GameEvent::GemCollected {
                    gems_collected: 1,
                    ..
                }
            ]
        ));
    }

    #[test]
    fn test_dig_lock_blocks_input_for_its_duration() {
        let grid = Grid::from_rows(&["____", " #  ", "===="], ROCK_DURABILITY);
        let mut settings = quiet_settings(vec![scenario_level()]);
        settings.dig_lock_ticks = 3;
        let mut sim = playing(settings, grid, IVec2::new(0, 1));
        sim.creature.facing = Direction::Right;
        let rock = IVec2::new(1, 1);

        run(&mut sim, &TickInput::digging());
        assert_eq!(sim.grid.durability(rock), ROCK_DURABILITY - 1);
        // Locked: a move neither steps nor turns, a dig does nothing
        run(&mut sim, &TickInput::moving(Direction::Left));
        assert_eq!(sim.creature.facing, Direction::Right);
        run(&mut sim, &TickInput::digging());
        assert_eq!(sim.grid.durability(rock), ROCK_DURABILITY - 1);
        // Third tick after the dig: lock has run out
        run(&mut sim, &TickInput::digging());
        assert_eq!(sim.grid.get(rock), Some(Material::Empty));
    }

    #[test]
    fn test_game_over_needs_restart() {
        let grid = Grid::from_rows(&["____", " ^  ", "===="], ROCK_DURABILITY);
        let mut sim = playing(quiet_settings(vec![scenario_level()]), grid, IVec2::new(1, 1));
        run(&mut sim, &TickInput::default());
        assert_eq!(sim.state, RunState::GameOver);

        run(&mut sim, &TickInput::moving(Direction::Left));
        assert_eq!(sim.state, RunState::GameOver);

        run(
            &mut sim,
            &TickInput {
                restart: true,
                ..Default::default()
            },
        );
        assert_eq!(sim.state, RunState::Playing);
        assert_eq!(sim.level_index, 0);
        assert_eq!(sim.run_score(), 0);
        assert_eq!(sim.creature.health, MAX_HEALTH);
    }

    #[test]
    fn test_deepest_row_tracks_descent() {
        let mut sim = playing(
            quiet_settings(vec![scenario_level()]),
            gem_shaft(0),
            IVec2::new(0, 4),
        );
        for _ in 0..6 {
            run(&mut sim, &TickInput::moving(Direction::Down));
        }
        for _ in 0..3 {
            run(&mut sim, &TickInput::moving(Direction::Up));
        }
        assert_eq!(sim.creature.pos.y, 7);
        assert_eq!(sim.ledger.deepest_row, 10);
    }

    #[test]
    fn test_vertical_intent_wins() {
        let input = TickInput {
            left: true,
            down: true,
            ..Default::default()
        };
        assert_eq!(input.direction(), Some(Direction::Down));
        assert_eq!(TickInput::default().direction(), None);
    }
}
