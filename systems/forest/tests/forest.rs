use forest_survival_core::{ForestConfig, GameConfig, Position, SeededRandom};
use forest_survival_system_forest::ForestGenerator;
use forest_survival_world::{self as world, query, World};

#[test]
fn accepted_trees_keep_clear_of_both_reference_points() {
    let config = ForestConfig::default();
    let generator = ForestGenerator::new(config);
    let origin = Position::new(400.0, 300.0);
    let current = Position::new(520.0, 610.0);

    for seed in 0..8 {
        let mut random = SeededRandom::from_seed(seed);
        let trees = generator.generate(origin, current, &mut random);

        assert!(!trees.is_empty(), "seed {seed} produced no trees");
        for tree in &trees {
            assert!(tree.position.distance_to(origin) >= config.safe_distance);
            assert!(tree.position.distance_to(current) >= config.safe_distance);
            assert!((30.0..=60.0).contains(&tree.size));
            assert_eq!(tree.size.fract(), 0.0);
        }
    }
}

#[test]
fn same_seed_generates_same_field() {
    let generator = ForestGenerator::new(ForestConfig::default());
    let origin = Position::new(400.0, 300.0);

    let first = generator.generate(origin, origin, &mut SeededRandom::from_seed(11));
    let second = generator.generate(origin, origin, &mut SeededRandom::from_seed(11));

    assert_eq!(first, second);
}

#[test]
fn planted_field_is_visible_through_queries() {
    let config = GameConfig::default();
    let mut world = World::new(&config);
    let generator = ForestGenerator::new(config.forest);
    let origin = config.player.start_center();
    let mut commands = Vec::new();
    generator.plant(origin, origin, &mut SeededRandom::from_seed(3), &mut commands);

    let mut events = Vec::new();
    for command in commands {
        world::apply(&mut world, command, &mut events);
    }

    let obstacles = query::obstacles(&world);
    assert!(!obstacles.is_empty());
    for (index, obstacle) in obstacles.iter().enumerate() {
        assert_eq!(obstacle.id.get() as usize, index);
        assert!(!obstacle.collided);
    }
}
