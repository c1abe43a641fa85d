#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Player movement and collision resolution.
//!
//! Held keys produce a tentative position that is resolved against the arena
//! according to the configured [`MovementPolicy`]. Obstacle contact is
//! evaluated separately in screen space and never blocks movement.

use forest_survival_core::{
    ArenaConfig, Camera, Command, InputState, MovementPolicy, Obstacle, PlayerSnapshot, Position,
    Rect, Viewport,
};

/// Pure system that turns held keys into player moves and tracks tree contact.
#[derive(Clone, Copy, Debug)]
pub struct Movement {
    policy: MovementPolicy,
    arena: ArenaConfig,
    viewport: Viewport,
}

impl Movement {
    /// Creates a movement system for the given arena and drawing surface.
    #[must_use]
    pub const fn new(policy: MovementPolicy, arena: ArenaConfig, viewport: Viewport) -> Self {
        Self {
            policy,
            arena,
            viewport,
        }
    }

    /// Emits a move for the player when held keys change its position.
    pub fn handle(&self, input: &InputState, player: &PlayerSnapshot, out: &mut Vec<Command>) {
        if let Some(to) = self.resolve(input, player) {
            out.push(Command::MovePlayer { to });
        }
    }

    /// Resolves held keys into the player's next position.
    ///
    /// Returns `None` when no key is held or the policy rejects every axis.
    #[must_use]
    pub fn resolve(&self, input: &InputState, player: &PlayerSnapshot) -> Option<Position> {
        if !input.any_direction() {
            return None;
        }

        let current = player.position;
        let tentative = tentative_position(input, current, player.speed);
        let resolved = match self.policy {
            MovementPolicy::AxisClamp => self.clamp_axes(current, tentative, player),
            MovementPolicy::FenceRollback => self.roll_back(current, tentative, player),
        };

        (resolved != current).then_some(resolved)
    }

    /// Compares the player's screen box with every tree and emits latch changes.
    ///
    /// The player is drawn at the viewport centre, so trees are projected
    /// through the camera before the overlap test.
    pub fn handle_contacts(
        &self,
        player: &PlayerSnapshot,
        obstacles: &[Obstacle],
        out: &mut Vec<Command>,
    ) {
        let camera = Camera::follow(player.footprint(), self.viewport);
        let player_box = camera.project(player.footprint());

        for obstacle in obstacles {
            let touching = camera.project(obstacle.footprint()).overlaps(&player_box);
            match (touching, obstacle.collided) {
                (true, false) => out.push(Command::StrikeObstacle {
                    obstacle: obstacle.id,
                }),
                (false, true) => out.push(Command::ReleaseObstacle {
                    obstacle: obstacle.id,
                }),
                _ => {}
            }
        }
    }

    fn clamp_axes(
        &self,
        current: Position,
        tentative: Position,
        player: &PlayerSnapshot,
    ) -> Position {
        let max_x = self.arena.width - player.size.width;
        let max_y = self.arena.height - player.size.height;

        let x = if (0.0..=max_x).contains(&tentative.x) {
            tentative.x
        } else {
            current.x
        };
        let y = if (0.0..=max_y).contains(&tentative.y) {
            tentative.y
        } else {
            current.y
        };
        Position::new(x, y)
    }

    fn roll_back(
        &self,
        current: Position,
        tentative: Position,
        player: &PlayerSnapshot,
    ) -> Position {
        let half_width = player.size.width * 0.5;
        let half_height = player.size.height * 0.5;
        let fence = self.arena.fence_thickness;
        let allowed = Rect::new(
            fence + half_width,
            fence + half_height,
            self.arena.width - 2.0 * (fence + half_width),
            self.arena.height - 2.0 * (fence + half_height),
        );
        let center = tentative.offset(half_width, half_height);

        let inside = center.x >= allowed.x
            && center.x <= allowed.right()
            && center.y >= allowed.y
            && center.y <= allowed.bottom();
        if inside {
            tentative
        } else {
            log::trace!("move into fence band rolled back");
            current
        }
    }
}

fn tentative_position(input: &InputState, current: Position, speed: f32) -> Position {
    let mut dx = 0.0;
    let mut dy = 0.0;
    if input.up {
        dy -= speed;
    }
    if input.left {
        dx -= speed;
    }
    if input.down {
        dy += speed;
    }
    if input.right {
        dx += speed;
    }
    current.offset(dx, dy)
}
