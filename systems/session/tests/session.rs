use std::time::Duration;

use approx::assert_relative_eq;
use forest_survival_core::{
    DamageSource, EnemySnapshot, Event, GameConfig, GameState, InputState, Obstacle,
    PlayerSnapshot, Position, ScreenPoint, ScriptedRandom, SeededRandom,
};
use forest_survival_system_session::Session;
use forest_survival_world::query;

const FRAME: Duration = Duration::from_millis(16);

/// Every grid point becomes a tree, including one covering the player's start.
fn dense_forest() -> GameConfig {
    let mut config = GameConfig::default();
    config.forest.acceptance_probability = 1.0;
    config.forest.safe_distance = 0.0;
    config
}

#[test]
fn game_over_is_terminal() {
    let mut config = dense_forest();
    config.player.health = 1.0;
    let mut session =
        Session::new(config, Box::new(SeededRandom::from_seed(9))).expect("session");

    let report = session.step(FRAME, &InputState::default()).expect("step");
    assert_eq!(report.state, GameState::Over);
    assert!(!report.continue_running);
    assert!(report.events.contains(&Event::GameStateChanged {
        state: GameState::Over
    }));
    let health = query::player(session.world()).expect("player").health;
    assert_relative_eq!(health, 0.0);

    let input = InputState {
        right: true,
        pause_toggle: true,
        pointer: Some(ScreenPoint::new(0.0, 0.0)),
        ..InputState::default()
    };
    for _ in 0..5 {
        let report = session.step(Duration::from_secs(5), &input).expect("step");
        assert!(report.events.is_empty());
        assert_eq!(report.state, GameState::Over);
        assert!(!report.continue_running);
    }
    assert_eq!(query::elapsed(session.world()), Duration::ZERO);
}

#[test]
fn standing_in_a_tree_costs_health_once() {
    let mut session = Session::new(dense_forest(), Box::new(ScriptedRandom::constant(0.0)))
        .expect("session");

    let first = session.step(FRAME, &InputState::default()).expect("step");
    let strikes = first
        .events
        .iter()
        .filter(|event| matches!(event, Event::ObstacleStruck { .. }))
        .count();
    assert!(strikes > 0);
    let after_first = query::player(session.world()).expect("player").health;

    for _ in 0..20 {
        let report = session.step(FRAME, &InputState::default()).expect("step");
        assert!(!report
            .events
            .iter()
            .any(|event| matches!(event, Event::ObstacleStruck { .. })));
    }
    let after_many = query::player(session.world()).expect("player").health;
    assert_relative_eq!(after_first, after_many);
    assert_relative_eq!(after_first, 100.0 - 3.0 * strikes as f32);
}

#[derive(Debug, PartialEq)]
struct Outcome {
    player: PlayerSnapshot,
    enemies: Vec<EnemySnapshot>,
    obstacles: Vec<Obstacle>,
    events: Vec<Event>,
    state: GameState,
}

fn script(frame: usize) -> InputState {
    InputState {
        up: frame % 7 < 3,
        left: frame % 11 < 4,
        down: frame % 13 > 8,
        right: frame % 5 == 0,
        pause_toggle: frame == 300 || frame == 320,
        pointer: Some(ScreenPoint::new(
            (frame * 37 % 800) as f32,
            (frame * 53 % 600) as f32,
        )),
    }
}

fn replay(seed: u64) -> Outcome {
    let mut config = GameConfig::default();
    config.player.health = 1_000_000.0;
    let mut session = Session::new(config, Box::new(SeededRandom::from_seed(seed))).expect("session");
    let mut events = Vec::new();
    for frame in 0..900 {
        let report = session.step(FRAME, &script(frame)).expect("step");
        events.extend(report.events);
    }

    let world = session.world();
    Outcome {
        player: query::player(world).expect("player"),
        enemies: query::enemy_view(world).expect("enemies").into_vec(),
        obstacles: query::obstacles(world).to_vec(),
        events,
        state: session.state(),
    }
}

#[test]
fn deterministic_replay_produces_identical_outcomes() {
    let first = replay(0x5eed);
    let second = replay(0x5eed);

    assert_eq!(first.state, GameState::Running);
    assert!(!first.enemies.is_empty(), "expected spawns within 14 seconds");
    assert_eq!(first, second, "replay diverged between runs");
}

/// Tiny arena where one tree covers the player and every spawned enemy touches it.
fn crowded_clearing(health: f32) -> GameConfig {
    let mut config = GameConfig::default();
    config.arena.width = 60.0;
    config.arena.height = 60.0;
    config.player.start = Position::new(20.0, 20.0);
    config.player.size = 20.0;
    config.player.health = health;
    config.forest.map_size = 60.0;
    config.forest.min_tree_size = 30;
    config.forest.max_tree_size = 30;
    config.forest.acceptance_probability = 1.0;
    config.forest.safe_distance = 0.0;
    config.enemy.size = 25.0;
    config.enemy.speed = 0.0;
    config.enemy.damage = 5.0;
    config
}

/// Pauses for one spawn interval so enemies arrive before any tree contact is checked.
fn spawn_while_paused(session: &mut Session) -> Vec<Event> {
    let toggle = InputState {
        pause_toggle: true,
        ..InputState::default()
    };
    let paused = session
        .step(Duration::from_millis(3_000), &toggle)
        .expect("step");
    assert_eq!(paused.state, GameState::Paused);
    assert!(paused
        .events
        .iter()
        .any(|event| matches!(event, Event::EnemySpawned { .. })));

    session.step(FRAME, &toggle).expect("step").events
}

fn damage_sources(events: &[Event]) -> Vec<DamageSource> {
    events
        .iter()
        .filter_map(|event| match event {
            Event::PlayerDamaged { source, .. } => Some(*source),
            _ => None,
        })
        .collect()
}

#[test]
fn enemy_contact_is_resolved_before_tree_contact() {
    let mut session = Session::new(
        crowded_clearing(100.0),
        Box::new(ScriptedRandom::constant(0.0)),
    )
    .expect("session");

    let events = spawn_while_paused(&mut session);
    let sources = damage_sources(&events);

    assert_eq!(sources.len(), 2, "unexpected damage events {events:?}");
    assert!(matches!(sources[0], DamageSource::Enemy(_)));
    assert!(matches!(sources[1], DamageSource::Obstacle(_)));
    let health = query::player(session.world()).expect("player").health;
    assert_relative_eq!(health, 100.0 - 5.0 - 3.0);
}

#[test]
fn lethal_enemy_contact_leaves_the_tree_unstruck() {
    let mut session = Session::new(
        crowded_clearing(4.0),
        Box::new(ScriptedRandom::constant(0.0)),
    )
    .expect("session");

    let events = spawn_while_paused(&mut session);

    assert!(events.contains(&Event::GameStateChanged {
        state: GameState::Over
    }));
    assert!(matches!(
        damage_sources(&events).as_slice(),
        [DamageSource::Enemy(_)]
    ));
    assert!(!events
        .iter()
        .any(|event| matches!(event, Event::ObstacleStruck { .. })));
    assert!(query::obstacles(session.world())
        .iter()
        .all(|obstacle| !obstacle.collided));
    assert_relative_eq!(query::overlay_opacity(session.world()), 0.0);
}
