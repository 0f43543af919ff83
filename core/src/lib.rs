#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Light Cycles engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters and systems submit
//! [`Command`] values describing desired mutations, the world executes those
//! commands via its `apply` entry point, and then broadcasts [`Event`] values
//! describing what actually happened. Systems consume immutable snapshots and
//! respond exclusively with new command batches, which keeps every tick
//! deterministic and replayable.

use serde::{Deserialize, Serialize};

/// Identifies one of the two cycles competing in the arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PlayerId {
    /// The human-controlled cycle.
    One,
    /// The autonomous cycle.
    Two,
}

impl PlayerId {
    /// Returns the identifier of the opposing cycle.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::One => Self::Two,
            Self::Two => Self::One,
        }
    }
}

/// Cardinal movement headings available to cycles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Heading {
    /// Movement toward decreasing row indices.
    Up,
    /// Movement toward increasing row indices.
    Down,
    /// Movement toward decreasing column indices.
    Left,
    /// Movement toward increasing column indices.
    Right,
}

impl Heading {
    /// All headings in the fixed priority order used for deterministic
    /// tie-breaking.
    pub const ALL: [Self; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    /// Returns the geometric opposite of this heading.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Reports whether applying `other` would reverse this heading in place.
    #[must_use]
    pub const fn is_reversal_of(self, other: Self) -> bool {
        matches!(
            (self, other),
            (Self::Up, Self::Down)
                | (Self::Down, Self::Up)
                | (Self::Left, Self::Right)
                | (Self::Right, Self::Left)
        )
    }
}

/// Location of a single arena cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new arena cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }
}

/// Dimensions of the playable arena measured in whole cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArenaSize {
    columns: u32,
    rows: u32,
}

impl ArenaSize {
    /// Creates a new arena size descriptor.
    #[must_use]
    pub const fn new(columns: u32, rows: u32) -> Self {
        Self { columns, rows }
    }

    /// Number of cell columns in the arena.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of cell rows in the arena.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Total number of cells in the arena.
    #[must_use]
    pub const fn cell_count(&self) -> u64 {
        self.columns as u64 * self.rows as u64
    }

    /// Reports whether the cell lies inside the arena bounds.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.column() < self.columns && cell.row() < self.rows
    }

    /// Returns the cell one step along `heading` from `cell`, or `None` when
    /// the step would leave the arena.
    #[must_use]
    pub fn step(&self, cell: CellCoord, heading: Heading) -> Option<CellCoord> {
        let next = match heading {
            Heading::Up => CellCoord::new(cell.column(), cell.row().checked_sub(1)?),
            Heading::Down => CellCoord::new(cell.column(), cell.row().checked_add(1)?),
            Heading::Left => CellCoord::new(cell.column().checked_sub(1)?, cell.row()),
            Heading::Right => CellCoord::new(cell.column().checked_add(1)?, cell.row()),
        };

        if self.contains(next) {
            Some(next)
        } else {
            None
        }
    }
}

/// Visual appearance applied to a cycle and its trail.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerColor {
    red: u8,
    green: u8,
    blue: u8,
}

impl PlayerColor {
    /// Creates a new player color from byte RGB components.
    #[must_use]
    pub const fn from_rgb(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Red component of the color.
    #[must_use]
    pub const fn red(&self) -> u8 {
        self.red
    }

    /// Green component of the color.
    #[must_use]
    pub const fn green(&self) -> u8 {
        self.green
    }

    /// Blue component of the color.
    #[must_use]
    pub const fn blue(&self) -> u8 {
        self.blue
    }
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Requests that a cycle change heading before the next advance.
    Steer {
        /// Cycle attempting the heading change.
        player: PlayerId,
        /// Heading the cycle should adopt.
        heading: Heading,
    },
    /// Advances the simulation by exactly one discrete step.
    Tick,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    /// Confirms that a steer request replaced the cycle's heading.
    SteerApplied {
        /// Cycle whose heading changed.
        player: PlayerId,
        /// Heading now in effect.
        heading: Heading,
    },
    /// Reports that a steer request was ignored as an instant reversal.
    SteerRejected {
        /// Cycle whose request was ignored.
        player: PlayerId,
        /// Heading that was requested.
        heading: Heading,
    },
    /// Confirms that a cycle moved between two cells.
    CycleAdvanced {
        /// Cycle that advanced.
        player: PlayerId,
        /// Cell the cycle occupied before moving.
        from: CellCoord,
        /// Cell the cycle occupies after completing the move.
        to: CellCoord,
    },
    /// Reports that a cycle crashed and froze in place.
    CycleCrashed {
        /// Cycle that crashed.
        player: PlayerId,
        /// Specific collision that ended the cycle's run.
        cause: CrashCause,
    },
    /// Announces that the match reached its terminal state.
    MatchEnded {
        /// Final result of the match.
        outcome: Outcome,
    },
}

/// Collision kinds that end a cycle's run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CrashCause {
    /// The cycle attempted to leave the arena bounds.
    Wall,
    /// The cycle rode onto a cell still held in its own recent trail.
    OwnTrail,
    /// The cycle entered a cell permanently claimed by the opponent.
    OpponentTrail,
    /// Both cycles advanced onto the same cell in the same tick.
    HeadOn,
}

/// Final result of a match, reported as data rather than an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// Player Two crashed while Player One survived.
    PlayerOneWins,
    /// Player One crashed while Player Two survived.
    PlayerTwoWins,
    /// Both cycles crashed in the same tick.
    Draw,
}

/// Lifecycle phase of a match.
///
/// The transition from [`MatchPhase::Running`] to [`MatchPhase::GameOver`] is
/// one-way; a finished match never resumes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchPhase {
    /// The simulation advances on every tick.
    Running,
    /// The match reached a terminal outcome and the arena is frozen.
    GameOver {
        /// Final result of the match.
        outcome: Outcome,
    },
}

/// Immutable representation of a single cycle's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CycleSnapshot {
    /// Identifier of the cycle.
    pub id: PlayerId,
    /// Arena cell currently occupied by the cycle.
    pub cell: CellCoord,
    /// Heading the cycle will follow on its next advance.
    pub heading: Heading,
    /// Appearance assigned to the cycle.
    pub color: PlayerColor,
    /// Indicates whether the cycle has crashed and is frozen in place.
    pub crashed: bool,
}

/// Read-only snapshot describing both cycles in the arena.
#[derive(Clone, Debug, Default)]
pub struct CycleView {
    snapshots: Vec<CycleSnapshot>,
}

impl CycleView {
    /// Creates a new cycle view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<CycleSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in deterministic order.
    #[must_use]
    pub fn iter(&self) -> impl Iterator<Item = &CycleSnapshot> {
        self.snapshots.iter()
    }

    /// Snapshot of the requested cycle, if it was captured.
    #[must_use]
    pub fn cycle(&self, player: PlayerId) -> Option<&CycleSnapshot> {
        self.snapshots.iter().find(|snapshot| snapshot.id == player)
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<CycleSnapshot> {
        self.snapshots
    }
}

/// Read-only view into the dense permanent occupancy grid.
#[derive(Clone, Copy, Debug)]
pub struct OccupancyView<'a> {
    cells: &'a [Option<PlayerId>],
    columns: u32,
    rows: u32,
}

impl<'a> OccupancyView<'a> {
    /// Captures a new occupancy view backed by the provided cell slice.
    #[must_use]
    pub fn new(cells: &'a [Option<PlayerId>], columns: u32, rows: u32) -> Self {
        Self {
            cells,
            columns,
            rows,
        }
    }

    /// Returns the cycle that claimed the provided cell, if any.
    #[must_use]
    pub fn occupant(&self, cell: CellCoord) -> Option<PlayerId> {
        self.index(cell)
            .and_then(|index| self.cells.get(index).copied().flatten())
    }

    /// Reports whether the cell is inside the arena and unclaimed.
    #[must_use]
    pub fn is_free(&self, cell: CellCoord) -> bool {
        self.index(cell).is_some_and(|index| {
            self.cells.get(index).copied().unwrap_or(None).is_none()
        })
    }

    /// Provides the dimensions of the underlying occupancy grid.
    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.columns, self.rows)
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

#[cfg(test)]
mod tests {
    use super::{
        ArenaSize, CellCoord, CrashCause, Heading, MatchPhase, Outcome, OccupancyView, PlayerId,
    };
    use serde::{de::DeserializeOwned, Serialize};

    #[test]
    fn opposite_headings_reverse_each_other() {
        for heading in Heading::ALL {
            assert!(heading.is_reversal_of(heading.opposite()));
            assert!(!heading.is_reversal_of(heading));
            assert_eq!(heading.opposite().opposite(), heading);
        }
    }

    #[test]
    fn step_moves_one_cell_in_each_heading() {
        let arena = ArenaSize::new(5, 5);
        let origin = CellCoord::new(2, 2);

        assert_eq!(arena.step(origin, Heading::Up), Some(CellCoord::new(2, 1)));
        assert_eq!(arena.step(origin, Heading::Down), Some(CellCoord::new(2, 3)));
        assert_eq!(arena.step(origin, Heading::Left), Some(CellCoord::new(1, 2)));
        assert_eq!(
            arena.step(origin, Heading::Right),
            Some(CellCoord::new(3, 2))
        );
    }

    #[test]
    fn step_rejects_moves_past_every_edge() {
        let arena = ArenaSize::new(3, 3);

        assert_eq!(arena.step(CellCoord::new(0, 0), Heading::Up), None);
        assert_eq!(arena.step(CellCoord::new(0, 0), Heading::Left), None);
        assert_eq!(arena.step(CellCoord::new(2, 2), Heading::Down), None);
        assert_eq!(arena.step(CellCoord::new(2, 2), Heading::Right), None);
    }

    #[test]
    fn occupancy_view_reports_occupants_and_bounds() {
        let cells = vec![None, Some(PlayerId::One), None, Some(PlayerId::Two)];
        let view = OccupancyView::new(&cells, 2, 2);

        assert_eq!(view.occupant(CellCoord::new(1, 0)), Some(PlayerId::One));
        assert_eq!(view.occupant(CellCoord::new(1, 1)), Some(PlayerId::Two));
        assert!(view.is_free(CellCoord::new(0, 0)));
        assert!(!view.is_free(CellCoord::new(1, 0)));
        assert!(!view.is_free(CellCoord::new(2, 0)), "out of bounds is never free");
        assert_eq!(view.dimensions(), (2, 2));
    }

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn cell_coord_round_trips_through_bincode() {
        assert_round_trip(&CellCoord::new(7, 11));
    }

    #[test]
    fn outcome_round_trips_through_bincode() {
        assert_round_trip(&Outcome::Draw);
    }

    #[test]
    fn crash_cause_round_trips_through_bincode() {
        assert_round_trip(&CrashCause::OpponentTrail);
    }

    #[test]
    fn match_phase_round_trips_through_bincode() {
        assert_round_trip(&MatchPhase::GameOver {
            outcome: Outcome::PlayerTwoWins,
        });
    }
}
