#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Forest Survival adapters.
//!
//! Scenes are described in world units together with the camera offset that
//! keeps the player centred. Backends add the offset when drawing and never
//! consult the simulation directly.

use anyhow::Result as AnyResult;
use forest_survival_core::{GameState, Rect, Tint};
use glam::Vec2;
use std::time::Duration;

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Converts a simulation tint into an opaque color.
    #[must_use]
    pub const fn from_tint(tint: Tint) -> Self {
        Self::from_rgb_u8(tint.red(), tint.green(), tint.blue())
    }

    /// Returns the same color with its alpha replaced, clamped to 0.0..=1.0.
    #[must_use]
    pub fn with_alpha(self, alpha: f32) -> Self {
        Self {
            alpha: alpha.clamp(0.0, 1.0),
            ..self
        }
    }
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct FrameInput {
    /// Move up is held.
    pub up: bool,
    /// Move left is held.
    pub left: bool,
    /// Move down is held.
    pub down: bool,
    /// Move right is held.
    pub right: bool,
    /// Whether the adapter detected a pause toggle press on this frame.
    pub pause_toggle: bool,
    /// Cursor position in window pixels, if the cursor is over the window.
    pub pointer: Option<Vec2>,
}

/// Axis-aligned rectangle in world units with its fill color.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneRect {
    /// Top-left corner.
    pub origin: Vec2,
    /// Width and height.
    pub size: Vec2,
    /// Fill color.
    pub color: Color,
}

impl SceneRect {
    /// Creates a rectangle from a simulation footprint.
    #[must_use]
    pub fn from_footprint(rect: Rect, color: Color) -> Self {
        Self {
            origin: Vec2::new(rect.x, rect.y),
            size: Vec2::new(rect.width, rect.height),
            color,
        }
    }

    /// Centre of the rectangle.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        self.origin + self.size * 0.5
    }
}

/// Outline drawn around the playable arena.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FencePresentation {
    /// Arena width and height in world units.
    pub extent: Vec2,
    /// Stroke width.
    pub thickness: f32,
    /// Stroke color.
    pub color: Color,
}

impl FencePresentation {
    /// Brown fence matching the forest palette.
    #[must_use]
    pub fn new(extent: Vec2, thickness: f32) -> Self {
        Self {
            extent,
            thickness,
            color: Color::from_rgb_u8(0x8b, 0x45, 0x13),
        }
    }
}

/// Player figure; drawn around the body centre and rotated by `facing`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerPresentation {
    /// Footprint of the player in world units.
    pub body: SceneRect,
    /// Heading in radians from the positive x axis.
    pub facing: f32,
}

/// Health bar contents.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HealthPresentation {
    /// Remaining hit points.
    pub current: f32,
    /// Hit points at the start of the game.
    pub maximum: f32,
}

impl HealthPresentation {
    /// Share of the bar that should be filled, in 0.0..=1.0.
    #[must_use]
    pub fn fill_fraction(&self) -> f32 {
        if self.maximum <= f32::EPSILON {
            return 0.0;
        }
        (self.current / self.maximum).clamp(0.0, 1.0)
    }

    /// Text shown on top of the bar.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{}/{}", self.current.max(0.0).round(), self.maximum.round())
    }
}

/// Full-screen message drawn over the scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Banner {
    /// The simulation is paused.
    Paused,
    /// The player has run out of health.
    GameOver,
}

impl Banner {
    /// Banner matching a lifecycle state, if the state shows one.
    #[must_use]
    pub const fn for_state(state: GameState) -> Option<Self> {
        match state {
            GameState::Running => None,
            GameState::Paused => Some(Self::Paused),
            GameState::Over => Some(Self::GameOver),
        }
    }

    /// Text rendered for the banner.
    #[must_use]
    pub const fn text(&self) -> &'static str {
        match self {
            Self::Paused => "PAUSED",
            Self::GameOver => "GAME OVER",
        }
    }
}

/// Scene description consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Trees in planting order.
    pub trees: Vec<SceneRect>,
    /// Arena outline.
    pub fence: FencePresentation,
    /// The player figure.
    pub player: PlayerPresentation,
    /// Active enemies.
    pub enemies: Vec<SceneRect>,
    /// Health bar contents.
    pub health: HealthPresentation,
    /// Opacity of the red damage overlay; zero hides it.
    pub overlay_opacity: f32,
    /// Message drawn over the scene.
    pub banner: Option<Banner>,
    /// Offset added to world coordinates to obtain screen coordinates.
    pub camera_offset: Vec2,
}

impl Scene {
    /// Creates a scene containing only the fence and the player.
    #[must_use]
    pub fn new(
        fence: FencePresentation,
        player: PlayerPresentation,
        health: HealthPresentation,
    ) -> Self {
        Self {
            trees: Vec::new(),
            fence,
            player,
            enemies: Vec::new(),
            health,
            overlay_opacity: 0.0,
            banner: None,
            camera_offset: Vec2::ZERO,
        }
    }

    /// Translates a world-space point into screen space.
    #[must_use]
    pub fn to_screen(&self, world: Vec2) -> Vec2 {
        world + self.camera_offset
    }
}

/// Visual presentation parameters for a scene.
#[derive(Clone, Debug)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Window dimensions in pixels.
    pub window_size: (u32, u32),
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Creates a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, window_size: (u32, u32), clear_color: Color, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            window_size,
            clear_color,
            scene,
        }
    }
}

/// Time spent by the simulation while producing a frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameSimulationBreakdown {
    /// Time spent stepping the session.
    pub simulation: Duration,
    /// Time spent rebuilding the scene from the world.
    pub scene_population: Duration,
}

/// Trait implemented by rendering backends capable of presenting Forest Survival scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the frame delta, per-frame
    /// input captured by the adapter, and may mutate the scene before it is
    /// rendered.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) -> FrameSimulationBreakdown + 'static;
}
