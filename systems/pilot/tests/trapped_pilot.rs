//! A fully trapped pilot must still steer and crash like any other cycle.

use light_cycles_core::{
    ArenaSize, CellCoord, Command, CrashCause, Event, Heading, Outcome, PlayerColor, PlayerId,
};
use light_cycles_system_pilot::{Config, Pilot, Strategy};
use light_cycles_world::{self as world, query, MatchConfig, SpawnPoint, World};

#[test]
fn trapped_pilot_steers_anyway_and_the_collision_ends_the_match() {
    // A 2x1 arena leaves the pilot with no safe candidate from the first
    // tick: every non-reverse heading exits the arena. The pilot must still
    // emit a heading and the world resolves the situation as an ordinary
    // wall crash rather than an error.
    let config = MatchConfig {
        arena: ArenaSize::new(2, 1),
        cell_length: 1.0,
        max_trail_length: 50,
        player_one: SpawnPoint {
            cell: CellCoord::new(0, 0),
            heading: Some(Heading::Left),
            color: PlayerColor::from_rgb(0x1f, 0x6f, 0xeb),
        },
        player_two: SpawnPoint {
            cell: CellCoord::new(1, 0),
            heading: Some(Heading::Right),
            color: PlayerColor::from_rgb(0xda, 0x36, 0x33),
        },
    };
    let mut world = World::new(config).expect("trap configuration is valid");
    let mut pilot = Pilot::new(PlayerId::Two, Config::new(Strategy::ReachableArea, 1));

    let cycles = query::cycle_view(&world);
    let occupancy = query::occupancy_view(&world);
    let mut commands = Vec::new();
    pilot.handle(&cycles, occupancy, &mut commands);

    assert_eq!(commands.len(), 1, "trapped pilot still commits to a heading");
    commands.push(Command::Tick);

    let mut events = Vec::new();
    for command in commands {
        world::apply(&mut world, command, &mut events);
    }

    assert!(events.iter().any(|event| matches!(
        event,
        Event::CycleCrashed {
            player: PlayerId::Two,
            cause: CrashCause::Wall,
        }
    )));
    assert_eq!(query::outcome(&world), Some(Outcome::Draw));
}
