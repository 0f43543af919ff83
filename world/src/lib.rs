#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative match state management for Light Cycles.
//!
//! The [`World`] owns both cycles, the shared permanent occupancy grid, and
//! the match phase. All mutation flows through [`apply`], which executes one
//! [`Command`] at a time and reports what happened through [`Event`] values.
//! Adapters and systems observe the world exclusively through the read-only
//! [`query`] module, so a tick is atomic with respect to every observer.

use std::collections::VecDeque;

use light_cycles_core::{
    ArenaSize, CellCoord, Command, CrashCause, Event, Heading, MatchPhase, Outcome, PlayerColor,
    PlayerId,
};
use thiserror::Error;

const DEFAULT_ARENA_COLUMNS: u32 = 40;
const DEFAULT_ARENA_ROWS: u32 = 30;
const DEFAULT_CELL_LENGTH: f32 = 20.0;
const DEFAULT_MAX_TRAIL_LENGTH: usize = 50;
const DEFAULT_SPAWN_MARGIN: u32 = 5;

const PLAYER_ONE_COLOR: PlayerColor = PlayerColor::from_rgb(0x1f, 0x6f, 0xeb);
const PLAYER_TWO_COLOR: PlayerColor = PlayerColor::from_rgb(0xda, 0x36, 0x33);

/// Spawn placement for a single cycle.
///
/// The heading is optional so adapters can assemble spawn points from
/// partial startup configuration; [`World::new`] rejects a spawn whose
/// heading was never set, which guarantees no cycle is ever advanced
/// without a heading.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpawnPoint {
    /// Cell the cycle occupies at match start.
    pub cell: CellCoord,
    /// Heading the cycle follows on the first tick, if configured.
    pub heading: Option<Heading>,
    /// Appearance assigned to the cycle.
    pub color: PlayerColor,
}

/// Startup configuration for a match.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MatchConfig {
    /// Dimensions of the playable arena in cells.
    pub arena: ArenaSize,
    /// Side length of a single square cell expressed in world units.
    pub cell_length: f32,
    /// Maximum number of cells retained in each cycle's recent trail.
    pub max_trail_length: usize,
    /// Spawn placement for Player One.
    pub player_one: SpawnPoint,
    /// Spawn placement for Player Two.
    pub player_two: SpawnPoint,
}

impl MatchConfig {
    /// Builds a configuration with default spawns for the provided arena:
    /// Player One near the right edge heading left, Player Two near the left
    /// edge heading right, both on the middle row.
    #[must_use]
    pub fn for_arena(arena: ArenaSize) -> Self {
        let margin = DEFAULT_SPAWN_MARGIN.min(arena.columns() / 2);
        let middle_row = arena.rows() / 2;
        let right_column = arena.columns().saturating_sub(margin.max(1));

        Self {
            arena,
            cell_length: DEFAULT_CELL_LENGTH,
            max_trail_length: DEFAULT_MAX_TRAIL_LENGTH,
            player_one: SpawnPoint {
                cell: CellCoord::new(right_column, middle_row),
                heading: Some(Heading::Left),
                color: PLAYER_ONE_COLOR,
            },
            player_two: SpawnPoint {
                cell: CellCoord::new(margin, middle_row),
                heading: Some(Heading::Right),
                color: PLAYER_TWO_COLOR,
            },
        }
    }
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self::for_arena(ArenaSize::new(DEFAULT_ARENA_COLUMNS, DEFAULT_ARENA_ROWS))
    }
}

/// Errors surfaced when a match configuration violates setup preconditions.
///
/// Every variant indicates a wiring bug in the caller, not a runtime game
/// condition, so construction fails loudly instead of limping along.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum SetupError {
    /// A spawn point was configured without an initial heading.
    #[error("spawn for {player:?} has no initial heading")]
    HeadingUnset {
        /// Cycle whose spawn is incomplete.
        player: PlayerId,
    },
    /// A spawn cell lies outside the configured arena.
    #[error("spawn cell {column},{row} for {player:?} is outside the arena")]
    SpawnOutOfBounds {
        /// Cycle whose spawn is invalid.
        player: PlayerId,
        /// Column of the offending cell.
        column: u32,
        /// Row of the offending cell.
        row: u32,
    },
    /// Both cycles were configured to spawn on the same cell.
    #[error("both cycles spawn on cell {column},{row}")]
    SpawnOverlap {
        /// Column of the shared cell.
        column: u32,
        /// Row of the shared cell.
        row: u32,
    },
    /// The arena has no cells to ride on.
    #[error("arena has zero cells")]
    EmptyArena,
}

#[derive(Clone, Debug)]
struct Cycle {
    id: PlayerId,
    cell: CellCoord,
    heading: Heading,
    color: PlayerColor,
    trail: VecDeque<CellCoord>,
    max_trail_length: usize,
    crashed: bool,
}

impl Cycle {
    fn spawn(
        id: PlayerId,
        cell: CellCoord,
        heading: Heading,
        color: PlayerColor,
        max_trail_length: usize,
    ) -> Self {
        let mut trail = VecDeque::with_capacity(max_trail_length.max(1));
        trail.push_back(cell);
        Self {
            id,
            cell,
            heading,
            color,
            trail,
            max_trail_length: max_trail_length.max(1),
            crashed: false,
        }
    }

    /// Adopts the requested heading unless it would reverse the cycle in
    /// place. Returns whether the request was applied.
    fn steer(&mut self, heading: Heading) -> bool {
        if heading.is_reversal_of(self.heading) {
            return false;
        }
        self.heading = heading;
        true
    }

    /// Moves one cell along the current heading, recording the new cell in
    /// the bounded trail. Returns `None` when the step leaves the arena, in
    /// which case the cycle stays frozen on its last in-bounds cell.
    fn advance(&mut self, arena: ArenaSize) -> Option<CellCoord> {
        let next = arena.step(self.cell, self.heading)?;
        self.cell = next;
        self.trail.push_back(next);
        while self.trail.len() > self.max_trail_length {
            let _ = self.trail.pop_front();
        }
        Some(next)
    }

    /// Reports whether the current cell appears earlier in the cycle's own
    /// recent trail, excluding the entry appended by the latest advance.
    fn rode_over_own_trail(&self) -> bool {
        let recent = self.trail.len().saturating_sub(1);
        self.trail.iter().take(recent).any(|cell| *cell == self.cell)
    }
}

#[derive(Clone, Debug)]
struct OccupancyGrid {
    cells: Vec<Option<PlayerId>>,
    columns: u32,
    rows: u32,
}

impl OccupancyGrid {
    fn new(columns: u32, rows: u32) -> Self {
        let cell_count = usize::try_from(u64::from(columns) * u64::from(rows)).unwrap_or(0);
        Self {
            cells: vec![None; cell_count],
            columns,
            rows,
        }
    }

    /// Permanently claims the cell for the player. The first claimant wins;
    /// later claims on the same cell are ignored so a head-on meeting leaves
    /// the earlier mark intact.
    fn claim(&mut self, cell: CellCoord, player: PlayerId) {
        if let Some(index) = self.index(cell) {
            if let Some(slot) = self.cells.get_mut(index) {
                if slot.is_none() {
                    *slot = Some(player);
                }
            }
        }
    }

    fn occupant(&self, cell: CellCoord) -> Option<PlayerId> {
        self.index(cell)
            .and_then(|index| self.cells.get(index).copied().flatten())
    }

    fn cells(&self) -> &[Option<PlayerId>] {
        &self.cells
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if cell.column() < self.columns && cell.row() < self.rows {
            let row = usize::try_from(cell.row()).ok()?;
            let column = usize::try_from(cell.column()).ok()?;
            let width = usize::try_from(self.columns).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}

/// Represents the authoritative Light Cycles match state.
#[derive(Clone, Debug)]
pub struct World {
    arena: ArenaSize,
    cell_length: f32,
    cycles: [Cycle; 2],
    occupancy: OccupancyGrid,
    phase: MatchPhase,
    tick_index: u64,
}

impl World {
    /// Creates a new match from the provided configuration.
    ///
    /// Fails when a spawn is incomplete or out of bounds; see [`SetupError`].
    pub fn new(config: MatchConfig) -> Result<Self, SetupError> {
        if config.arena.cell_count() == 0 {
            return Err(SetupError::EmptyArena);
        }

        let spawns = [
            (PlayerId::One, config.player_one),
            (PlayerId::Two, config.player_two),
        ];
        for (player, spawn) in spawns {
            if spawn.heading.is_none() {
                return Err(SetupError::HeadingUnset { player });
            }
            if !config.arena.contains(spawn.cell) {
                return Err(SetupError::SpawnOutOfBounds {
                    player,
                    column: spawn.cell.column(),
                    row: spawn.cell.row(),
                });
            }
        }
        if config.player_one.cell == config.player_two.cell {
            return Err(SetupError::SpawnOverlap {
                column: config.player_one.cell.column(),
                row: config.player_one.cell.row(),
            });
        }

        let mut occupancy = OccupancyGrid::new(config.arena.columns(), config.arena.rows());
        let cycles = spawns.map(|(player, spawn)| {
            occupancy.claim(spawn.cell, player);
            Cycle::spawn(
                player,
                spawn.cell,
                spawn.heading.unwrap_or(Heading::Up),
                spawn.color,
                config.max_trail_length,
            )
        });

        Ok(Self {
            arena: config.arena,
            cell_length: config.cell_length,
            cycles,
            occupancy,
            phase: MatchPhase::Running,
            tick_index: 0,
        })
    }

    fn cycle_mut(&mut self, player: PlayerId) -> &mut Cycle {
        match player {
            PlayerId::One => &mut self.cycles[0],
            PlayerId::Two => &mut self.cycles[1],
        }
    }

    fn cycle(&self, player: PlayerId) -> &Cycle {
        match player {
            PlayerId::One => &self.cycles[0],
            PlayerId::Two => &self.cycles[1],
        }
    }

    fn advance_tick(&mut self, out_events: &mut Vec<Event>) {
        self.tick_index = self.tick_index.saturating_add(1);

        // Player One advances before Player Two. The tick is sequential in a
        // single-threaded simulation, so the order must stay fixed to keep
        // replays deterministic.
        let mut wall_crash = [false, false];
        for index in 0..self.cycles.len() {
            let arena = self.arena;
            let cycle = &mut self.cycles[index];
            let from = cycle.cell;
            match cycle.advance(arena) {
                Some(to) => {
                    let player = cycle.id;
                    self.occupancy.claim(to, player);
                    out_events.push(Event::CycleAdvanced { player, from, to });
                }
                None => wall_crash[index] = true,
            }
        }

        let head_on = !wall_crash[0]
            && !wall_crash[1]
            && self.cycles[0].cell == self.cycles[1].cell;

        let mut crashes: [Option<CrashCause>; 2] = [None, None];
        for (index, cycle) in self.cycles.iter().enumerate() {
            crashes[index] = if wall_crash[index] {
                Some(CrashCause::Wall)
            } else if head_on {
                Some(CrashCause::HeadOn)
            } else if cycle.rode_over_own_trail() {
                Some(CrashCause::OwnTrail)
            } else if self.occupancy.occupant(cycle.cell) == Some(cycle.id.opponent()) {
                Some(CrashCause::OpponentTrail)
            } else {
                None
            };
        }

        for (index, cause) in crashes.into_iter().enumerate() {
            if let Some(cause) = cause {
                let cycle = &mut self.cycles[index];
                cycle.crashed = true;
                out_events.push(Event::CycleCrashed {
                    player: cycle.id,
                    cause,
                });
            }
        }

        let outcome = match (crashes[0].is_some(), crashes[1].is_some()) {
            (true, true) => Some(Outcome::Draw),
            (true, false) => Some(Outcome::PlayerTwoWins),
            (false, true) => Some(Outcome::PlayerOneWins),
            (false, false) => None,
        };

        if let Some(outcome) = outcome {
            self.phase = MatchPhase::GameOver { outcome };
            out_events.push(Event::MatchEnded { outcome });
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new(MatchConfig::default()).unwrap_or_else(|error| {
            // The built-in configuration is statically valid.
            unreachable!("default match configuration rejected: {error}")
        })
    }
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// Once the match has ended every command becomes a no-op; the terminal
/// phase transition is one-way.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    if matches!(world.phase, MatchPhase::GameOver { .. }) {
        return;
    }

    match command {
        Command::Steer { player, heading } => {
            // A crashed cycle always means a terminal phase, so the gate
            // above is the only liveness check needed here.
            if world.cycle_mut(player).steer(heading) {
                out_events.push(Event::SteerApplied { player, heading });
            } else {
                out_events.push(Event::SteerRejected { player, heading });
            }
        }
        Command::Tick => world.advance_tick(out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::World;
    use light_cycles_core::{
        ArenaSize, CellCoord, CycleSnapshot, CycleView, MatchPhase, OccupancyView, Outcome,
        PlayerId,
    };

    /// Dimensions of the playable arena.
    #[must_use]
    pub fn arena(world: &World) -> ArenaSize {
        world.arena
    }

    /// Side length of a single square cell expressed in world units.
    #[must_use]
    pub fn cell_length(world: &World) -> f32 {
        world.cell_length
    }

    /// Current lifecycle phase of the match.
    #[must_use]
    pub fn phase(world: &World) -> MatchPhase {
        world.phase
    }

    /// Final outcome of the match, once terminal.
    #[must_use]
    pub fn outcome(world: &World) -> Option<Outcome> {
        match world.phase {
            MatchPhase::Running => None,
            MatchPhase::GameOver { outcome } => Some(outcome),
        }
    }

    /// Number of ticks the world has processed.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }

    /// Captures a read-only view of both cycles.
    #[must_use]
    pub fn cycle_view(world: &World) -> CycleView {
        let snapshots = world
            .cycles
            .iter()
            .map(|cycle| CycleSnapshot {
                id: cycle.id,
                cell: cycle.cell,
                heading: cycle.heading,
                color: cycle.color,
                crashed: cycle.crashed,
            })
            .collect();
        CycleView::from_snapshots(snapshots)
    }

    /// Copies the recent trail of a cycle, oldest cell first.
    ///
    /// The bounded trail backs self-collision checks and trail rendering;
    /// cross-cycle collisions use the permanent [`occupancy_view`] instead.
    #[must_use]
    pub fn trail(world: &World, player: PlayerId) -> Vec<CellCoord> {
        world.cycle(player).trail.iter().copied().collect()
    }

    /// Exposes a read-only view of the dense permanent occupancy grid.
    #[must_use]
    pub fn occupancy_view(world: &World) -> OccupancyView<'_> {
        OccupancyView::new(
            world.occupancy.cells(),
            world.arena.columns(),
            world.arena.rows(),
        )
    }
}
