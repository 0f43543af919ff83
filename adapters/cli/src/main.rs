#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots the Light Cycles experience.
//!
//! The adapter owns the outer loop: it converts rendered frames into fixed
//! simulation ticks, feeds the steering and pilot systems, applies their
//! commands to the world, and republishes the world as a drawable scene.

use std::time::Duration;

use anyhow::{ensure, Context, Result};
use clap::{Parser, ValueEnum};
use light_cycles_core::{Command, MatchPhase, PlayerId};
use light_cycles_rendering::{
    ArenaPresentation, Color, CyclePresentation, FrameInput, OutcomeBanner, Presentation,
    RenderingBackend, Scene, TrailPresentation,
};
use light_cycles_rendering_macroquad::MacroquadBackend;
use light_cycles_system_pilot::{Config as PilotConfig, Pilot, Strategy};
use light_cycles_system_steering::{DirectionalIntent, Steering};
use light_cycles_world::{self as world, query, MatchConfig, World};

const WINDOW_TITLE: &str = "Light Cycles";
const CLEAR_COLOR: Color = Color::from_rgb_u8(0x00, 0x00, 0x00);

/// Upper bound on simulation ticks executed for a single rendered frame, so
/// a long stall (window drag, suspend) does not replay seconds of catch-up.
const MAX_TICKS_PER_FRAME: u32 = 4;

/// Decision procedure used by the autonomous cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum StrategyArg {
    /// Keep the current heading while it stays safe, dodge otherwise.
    Local,
    /// Flood-fill every safe candidate and ride toward the largest region.
    ReachableArea,
}

impl From<StrategyArg> for Strategy {
    fn from(value: StrategyArg) -> Self {
        match value {
            StrategyArg::Local => Self::LocalSafety,
            StrategyArg::ReachableArea => Self::ReachableArea,
        }
    }
}

/// Two-player light-cycle arena: you against the machine.
#[derive(Debug, Parser)]
#[command(name = "light-cycles")]
struct Args {
    /// Number of cell columns in the arena.
    #[arg(long, default_value_t = 40)]
    columns: u32,

    /// Number of cell rows in the arena.
    #[arg(long, default_value_t = 30)]
    rows: u32,

    /// Side length of a single cell in pixels.
    #[arg(long, default_value_t = 20.0)]
    cell_length: f32,

    /// Simulation ticks per second.
    #[arg(long, default_value_t = 15)]
    tick_hz: u32,

    /// Maximum number of cells kept in each cycle's fading trail.
    #[arg(long, default_value_t = 50)]
    max_trail: usize,

    /// Seed for the pilot's tie-breaking randomness; random when omitted.
    #[arg(long)]
    seed: Option<u64>,

    /// Decision procedure used by the autonomous cycle.
    #[arg(long, value_enum, default_value_t = StrategyArg::ReachableArea)]
    strategy: StrategyArg,

    /// Overlay a frame-rate counter in the window corner.
    #[arg(long)]
    show_fps: bool,
}

impl Args {
    fn match_config(&self) -> Result<MatchConfig> {
        ensure!(self.columns > 0 && self.rows > 0, "arena must have cells");
        ensure!(self.cell_length > 0.0, "cell length must be positive");
        ensure!(self.tick_hz > 0, "tick rate must be positive");
        ensure!(self.max_trail > 0, "trail must keep at least one cell");

        let mut config =
            MatchConfig::for_arena(light_cycles_core::ArenaSize::new(self.columns, self.rows));
        config.cell_length = self.cell_length;
        config.max_trail_length = self.max_trail;
        Ok(config)
    }
}

/// Entry point for the Light Cycles command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();
    let config = args.match_config()?;
    let mut world = World::new(config).context("failed to start the match")?;

    let steering = Steering::new(PlayerId::One);
    let seed = args.seed.unwrap_or_else(rand::random);
    let mut pilot = Pilot::new(PlayerId::Two, PilotConfig::new(args.strategy.into(), seed));

    let tick_duration = Duration::from_secs_f64(1.0 / f64::from(args.tick_hz));
    let mut accumulator = Duration::ZERO;

    let backend = MacroquadBackend::new().with_vsync(true);
    let presentation = Presentation::new(WINDOW_TITLE, CLEAR_COLOR, populate_scene(&world))
        .with_fps_counter(args.show_fps);

    backend.run(presentation, move |frame_dt, input, scene| {
        accumulator = (accumulator + frame_dt).min(tick_duration * MAX_TICKS_PER_FRAME);
        let mut advanced = false;

        while accumulator >= tick_duration {
            accumulator -= tick_duration;
            step_once(&mut world, &steering, &mut pilot, input);
            advanced = true;
        }

        if advanced {
            *scene = populate_scene(&world);
        }
    })
}

/// Executes exactly one simulation tick: both systems propose headings, the
/// world advances, and any resulting events are discarded because the scene
/// is rebuilt from queries afterwards.
fn step_once(world: &mut World, steering: &Steering, pilot: &mut Pilot, input: FrameInput) {
    let mut commands = Vec::new();

    steering.handle(
        DirectionalIntent {
            left: input.left,
            right: input.right,
            up: input.up,
            down: input.down,
        },
        &mut commands,
    );

    let cycles = query::cycle_view(world);
    let occupancy = query::occupancy_view(world);
    pilot.handle(&cycles, occupancy, &mut commands);

    commands.push(Command::Tick);

    let mut events = Vec::new();
    for command in commands {
        world::apply(world, command, &mut events);
    }
}

fn populate_scene(world: &World) -> Scene {
    let arena = query::arena(world);
    let arena_presentation = ArenaPresentation::new(
        arena.columns(),
        arena.rows(),
        query::cell_length(world),
    );

    let cycle_view = query::cycle_view(world);
    let mut trails = Vec::new();
    let mut cycles = Vec::new();
    for snapshot in cycle_view.iter() {
        let color = Color::from_rgb_u8(
            snapshot.color.red(),
            snapshot.color.green(),
            snapshot.color.blue(),
        );
        trails.push(TrailPresentation {
            player: snapshot.id,
            color,
            cells: query::trail(world, snapshot.id),
        });
        cycles.push(CyclePresentation {
            player: snapshot.id,
            cell: snapshot.cell,
            heading: snapshot.heading,
            color,
            crashed: snapshot.crashed,
        });
    }

    let banner = match query::phase(world) {
        MatchPhase::Running => None,
        MatchPhase::GameOver { outcome } => Some(OutcomeBanner { outcome }),
    };

    Scene::new(arena_presentation, trails, cycles, banner)
}
