use forest_survival_core::{InputState, ScreenPoint};
use forest_survival_rendering::{
    Banner, Color, FencePresentation, FrameInput, HealthPresentation, PlayerPresentation, Scene,
    SceneRect,
};
use forest_survival_system_session::Session;
use forest_survival_world::{query, StoreError};
use glam::Vec2;

const PLAYER_COLOR: Color = Color::from_rgb_u8(0x80, 0x80, 0x80);

/// Builds the first scene for a freshly created session.
pub(crate) fn initial(session: &Session) -> Result<Scene, StoreError> {
    let world = session.world();
    let arena = query::arena(world);
    let player = query::player(world)?;

    let mut scene = Scene::new(
        FencePresentation::new(Vec2::new(arena.width, arena.height), arena.fence_thickness),
        PlayerPresentation {
            body: SceneRect::from_footprint(player.footprint(), PLAYER_COLOR),
            facing: player.facing,
        },
        HealthPresentation {
            current: player.health,
            maximum: session.config().player.health,
        },
    );
    populate(&mut scene, session)?;
    Ok(scene)
}

/// Refreshes every dynamic part of `scene` from the session's world.
pub(crate) fn populate(scene: &mut Scene, session: &Session) -> Result<(), StoreError> {
    let world = session.world();
    let player = query::player(world)?;
    let (offset_x, offset_y) = query::camera(world)?.offset();

    scene.trees.clear();
    scene.trees.extend(query::obstacles(world).iter().map(|tree| {
        SceneRect::from_footprint(tree.footprint(), Color::from_tint(tree.shade.tint()))
    }));

    scene.enemies.clear();
    scene.enemies.extend(
        query::enemy_view(world)?
            .active()
            .map(|enemy| SceneRect::from_footprint(enemy.footprint(), Color::from_tint(enemy.tint))),
    );

    scene.player.body = SceneRect::from_footprint(player.footprint(), PLAYER_COLOR);
    scene.player.facing = player.facing;
    scene.health.current = player.health;
    scene.overlay_opacity = query::overlay_opacity(world);
    scene.banner = Banner::for_state(session.state());
    scene.camera_offset = Vec2::new(offset_x, offset_y);
    Ok(())
}

/// Translates adapter input into the simulation's input snapshot.
pub(crate) fn input_state(input: &FrameInput) -> InputState {
    InputState {
        up: input.up,
        left: input.left,
        down: input.down,
        right: input.right,
        pause_toggle: input.pause_toggle,
        pointer: input.pointer.map(|pointer| ScreenPoint::new(pointer.x, pointer.y)),
    }
}
