#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Autonomous pilot system that chooses a heading for the computer cycle.
//!
//! The pilot reads only the shared permanent occupancy grid plus its own
//! snapshot; the human cycle's bounded trail is private to the world. Every
//! call emits exactly one steer command, even when the cycle is fully
//! enclosed, so a tick always completes and a trapped cycle resolves into an
//! ordinary collision on its next advance.

use std::collections::VecDeque;

use light_cycles_core::{CellCoord, Command, CycleView, Heading, OccupancyView, PlayerId};
use rand::{seq::SliceRandom, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Decision procedures available to the pilot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Keep the current heading while it stays safe; otherwise pick a random
    /// safe candidate.
    LocalSafety,
    /// Score each safe candidate by the number of cells reachable from it
    /// and ride toward the largest region.
    ReachableArea,
}

/// Configuration parameters required to construct the pilot.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    strategy: Strategy,
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration using the provided strategy and seed.
    #[must_use]
    pub const fn new(strategy: Strategy, rng_seed: u64) -> Self {
        Self { strategy, rng_seed }
    }
}

/// Pure system that emits one steer command per tick for its cycle.
#[derive(Debug)]
pub struct Pilot {
    player: PlayerId,
    strategy: Strategy,
    rng: ChaCha8Rng,
    flood: FloodFill,
}

impl Pilot {
    /// Creates a pilot controlling the provided cycle.
    #[must_use]
    pub fn new(player: PlayerId, config: Config) -> Self {
        Self {
            player,
            strategy: config.strategy,
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
            flood: FloodFill::default(),
        }
    }

    /// Chooses a heading for the current tick and emits it as a command.
    ///
    /// The chosen heading leads to an in-bounds, unclaimed cell whenever at
    /// least one candidate does. With no safe candidate the pilot still
    /// commits to a heading drawn uniformly from all four; crashing is the
    /// expected resolution of a trapped cycle, not an error.
    pub fn handle(
        &mut self,
        cycles: &CycleView,
        occupancy: OccupancyView<'_>,
        out: &mut Vec<Command>,
    ) {
        let Some(snapshot) = cycles.cycle(self.player) else {
            return;
        };
        // The driver keeps polling after the match ends; a crashed cycle has
        // nothing left to steer, so skip the flood-fill work entirely.
        if snapshot.crashed {
            return;
        }

        let heading = self.decide(snapshot.cell, snapshot.heading, occupancy);
        out.push(Command::Steer {
            player: self.player,
            heading,
        });
    }

    fn decide(
        &mut self,
        cell: CellCoord,
        current: Heading,
        occupancy: OccupancyView<'_>,
    ) -> Heading {
        let mut safe = [None; 4];
        let mut safe_len = 0;
        for candidate in candidate_headings(current) {
            if step_cell(cell, candidate, occupancy)
                .is_some_and(|next| occupancy.is_free(next))
            {
                safe[safe_len] = Some(candidate);
                safe_len += 1;
            }
        }
        let safe: Vec<Heading> = safe.into_iter().take(safe_len).flatten().collect();

        if safe.is_empty() {
            // Trapped. Commit to some heading anyway and let the collision
            // land on the next advance.
            return *Heading::ALL
                .choose(&mut self.rng)
                .unwrap_or(&current);
        }

        match self.strategy {
            Strategy::LocalSafety => self.local_safety(current, &safe),
            Strategy::ReachableArea => self.reachable_area(cell, &safe, occupancy),
        }
    }

    fn local_safety(&mut self, current: Heading, safe: &[Heading]) -> Heading {
        // Stability bias: hold the line while the current heading stays safe.
        if safe.contains(&current) {
            return current;
        }
        *safe.choose(&mut self.rng).unwrap_or(&current)
    }

    fn reachable_area(
        &mut self,
        cell: CellCoord,
        safe: &[Heading],
        occupancy: OccupancyView<'_>,
    ) -> Heading {
        let mut best: Option<(Heading, usize)> = None;

        // Candidates arrive in the fixed priority order, so a strict
        // comparison breaks ties deterministically toward that order.
        for &candidate in safe {
            let Some(next) = step_cell(cell, candidate, occupancy) else {
                continue;
            };
            let reachable = self.flood.reachable_cells(occupancy, next);
            if best.map_or(true, |(_, count)| reachable > count) {
                best = Some((candidate, reachable));
            }
        }

        match best {
            Some((heading, _)) => heading,
            None => *safe.choose(&mut self.rng).unwrap_or(&safe[0]),
        }
    }
}

/// Candidate headings for a cycle, excluding the reverse of its current
/// heading, in the fixed priority order up, down, left, right.
fn candidate_headings(current: Heading) -> impl Iterator<Item = Heading> {
    Heading::ALL
        .into_iter()
        .filter(move |candidate| !candidate.is_reversal_of(current))
}

fn step_cell(cell: CellCoord, heading: Heading, occupancy: OccupancyView<'_>) -> Option<CellCoord> {
    let (columns, rows) = occupancy.dimensions();
    let next = match heading {
        Heading::Up => CellCoord::new(cell.column(), cell.row().checked_sub(1)?),
        Heading::Down => CellCoord::new(cell.column(), cell.row().checked_add(1)?),
        Heading::Left => CellCoord::new(cell.column().checked_sub(1)?, cell.row()),
        Heading::Right => CellCoord::new(cell.column().checked_add(1)?, cell.row()),
    };
    (next.column() < columns && next.row() < rows).then_some(next)
}

/// Breadth-first reachable-area counter with reusable scratch buffers.
///
/// Counts the cells reachable from a start cell across the free arena using
/// 4-connectivity, treating the start cell itself as occupied so the count
/// scores the region a cycle would ride into. Runs in one pass over the grid
/// per call and terminates on a fully enclosed start cell with a count of 1.
#[derive(Debug, Default)]
struct FloodFill {
    visited: Vec<bool>,
    queue: VecDeque<CellCoord>,
}

impl FloodFill {
    fn reachable_cells(&mut self, occupancy: OccupancyView<'_>, start: CellCoord) -> usize {
        let (columns, rows) = occupancy.dimensions();
        let columns_usize = usize::try_from(columns).unwrap_or(0);
        let rows_usize = usize::try_from(rows).unwrap_or(0);
        let cell_count = columns_usize.checked_mul(rows_usize).unwrap_or(0);
        if cell_count == 0 {
            return 0;
        }

        if self.visited.len() != cell_count {
            self.visited = vec![false; cell_count];
        } else {
            self.visited.fill(false);
        }
        self.queue.clear();

        let Some(start_index) = index(columns_usize, start) else {
            return 0;
        };
        self.visited[start_index] = true;
        self.queue.push_back(start);
        let mut count = 1;

        while let Some(cell) = self.queue.pop_front() {
            for neighbor in neighbors(cell, columns, rows) {
                let Some(neighbor_index) = index(columns_usize, neighbor) else {
                    continue;
                };
                if self.visited[neighbor_index] {
                    continue;
                }
                self.visited[neighbor_index] = true;
                if !occupancy.is_free(neighbor) {
                    continue;
                }
                count += 1;
                self.queue.push_back(neighbor);
            }
        }

        count
    }
}

fn neighbors(cell: CellCoord, columns: u32, rows: u32) -> impl Iterator<Item = CellCoord> {
    let mut candidates = [None; 4];
    let mut count = 0;

    if let Some(row) = cell.row().checked_sub(1) {
        candidates[count] = Some(CellCoord::new(cell.column(), row));
        count += 1;
    }

    if cell.row() + 1 < rows {
        candidates[count] = Some(CellCoord::new(cell.column(), cell.row() + 1));
        count += 1;
    }

    if let Some(column) = cell.column().checked_sub(1) {
        candidates[count] = Some(CellCoord::new(column, cell.row()));
        count += 1;
    }

    if cell.column() + 1 < columns {
        candidates[count] = Some(CellCoord::new(cell.column() + 1, cell.row()));
        count += 1;
    }

    candidates.into_iter().take(count).flatten()
}

fn index(columns: usize, cell: CellCoord) -> Option<usize> {
    let column = usize::try_from(cell.column()).ok()?;
    let row = usize::try_from(cell.row()).ok()?;
    row.checked_mul(columns)?.checked_add(column)
}
