use approx::assert_relative_eq;
use forest_survival_core::{
    Command, Event, GameConfig, InputState, MovementPolicy, Position, TreeSeed, TreeShade,
};
use forest_survival_system_movement::Movement;
use forest_survival_world::{self as world, query, World};

const TREE_SIZE: f32 = 50.0;

fn forest_world(config: &GameConfig) -> World {
    let mut world = World::new(config);
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::PlantForest {
            trees: vec![TreeSeed {
                position: Position::new(400.0, 280.0),
                size: TREE_SIZE,
                shade: TreeShade::MediumSeaGreen,
            }],
        },
        &mut events,
    );
    world
}

fn contact_frame(world: &mut World, movement: &Movement) -> Vec<Event> {
    let player = query::player(world).expect("player");
    let mut commands = Vec::new();
    movement.handle_contacts(&player, query::obstacles(world), &mut commands);

    let mut events = Vec::new();
    for command in commands {
        world::apply(world, command, &mut events);
    }
    events
}

fn teleport(world: &mut World, to: Position) {
    let mut events = Vec::new();
    world::apply(world, Command::MovePlayer { to }, &mut events);
}

fn movement(config: &GameConfig) -> Movement {
    Movement::new(config.movement, config.arena, config.viewport)
}

#[test]
fn obstacle_damage_fires_once_per_contact() {
    let config = GameConfig::default();
    let mut world = forest_world(&config);
    let movement = movement(&config);

    for _ in 0..10 {
        let _ = contact_frame(&mut world, &movement);
    }
    let health = query::player(&world).expect("player").health;
    assert_relative_eq!(health, 100.0 - TREE_SIZE / 10.0);
    assert!(query::obstacles(&world)[0].collided);
}

#[test]
fn separating_rearms_the_latch() {
    let config = GameConfig::default();
    let mut world = forest_world(&config);
    let movement = movement(&config);

    let entered = contact_frame(&mut world, &movement);
    assert!(entered.contains(&Event::OverlayShown { opacity: 0.3 }));

    teleport(&mut world, Position::new(800.0, 800.0));
    let left = contact_frame(&mut world, &movement);
    assert!(left.iter().any(|event| matches!(event, Event::ObstacleReleased { .. })));

    teleport(&mut world, config.player.start);
    let _ = contact_frame(&mut world, &movement);

    let health = query::player(&world).expect("player").health;
    assert_relative_eq!(health, 100.0 - 2.0 * TREE_SIZE / 10.0);
}

#[test]
fn tree_contact_never_blocks_movement() {
    let config = GameConfig::default();
    let mut world = forest_world(&config);
    let movement = movement(&config);
    let input = InputState {
        right: true,
        ..InputState::default()
    };

    for _ in 0..5 {
        let player = query::player(&world).expect("player");
        let mut commands = Vec::new();
        movement.handle(&input, &player, &mut commands);
        let mut events = Vec::new();
        for command in commands {
            world::apply(&mut world, command, &mut events);
        }
        let _ = contact_frame(&mut world, &movement);
    }

    let player = query::player(&world).expect("player");
    assert_eq!(player.position, Position::new(395.0, 285.0));
}

#[test]
fn fence_rollback_policy_is_selected_from_config() {
    let config = GameConfig {
        movement: MovementPolicy::FenceRollback,
        ..GameConfig::default()
    };
    let mut world = World::new(&config);
    teleport(&mut world, Position::new(5.0, 5.0));
    let movement = movement(&config);
    let player = query::player(&world).expect("player");

    let input = InputState {
        up: true,
        left: true,
        ..InputState::default()
    };
    assert_eq!(movement.resolve(&input, &player), None);
}
