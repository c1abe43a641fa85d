#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for Forest Survival.
//!
//! Opens a window, polls the movement keys, the pause key and the cursor
//! each frame, then draws the scene with the camera offset applied. The game
//! has no sound, so macroquad is built without its `audio` feature.

use anyhow::Result;
use forest_survival_rendering::{
    Color, FencePresentation, FrameInput, FrameSimulationBreakdown, HealthPresentation,
    PlayerPresentation, Presentation, RenderingBackend, Scene, SceneRect,
};
use glam::Vec2;
use macroquad::input::{is_key_down, is_key_pressed, mouse_position, KeyCode};
use macroquad::math::Vec2 as MacroquadVec2;
use std::{
    collections::VecDeque,
    time::{Duration, Instant},
};

const HEALTH_BAR_ORIGIN: Vec2 = Vec2::new(20.0, 20.0);
const HEALTH_BAR_SIZE: Vec2 = Vec2::new(200.0, 20.0);
const HEAD_COLOR: Color = Color::from_rgb_u8(0xff, 0xa0, 0x7a);
const SHOULDER_COLOR: Color = Color::from_rgb_u8(0x80, 0x80, 0x80);
const FEET_COLOR: Color = Color::from_rgb_u8(0x00, 0x00, 0x00);
const FLASHLIGHT_COLOR: Color = Color::from_rgb_u8(0xd3, 0xd3, 0xd3);

#[derive(Clone, Copy, Debug, Default)]
struct KeyboardShortcuts {
    /// `Q` quits the game loop.
    quit_requested: bool,
    /// `Escape` or `P` toggles pause.
    pause_toggle: bool,
}

impl KeyboardShortcuts {
    fn poll() -> Self {
        Self {
            quit_requested: is_key_pressed(KeyCode::Q),
            pause_toggle: is_key_pressed(KeyCode::Escape) || is_key_pressed(KeyCode::P),
        }
    }
}

/// Rendering backend implemented on top of macroquad.
#[derive(Debug, Default)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
    show_fps: bool,
}

impl MacroquadBackend {
    /// Returns a backend that requests the platform's default swap interval.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the backend to request a specific swap interval from the platform.
    #[must_use]
    pub fn with_swap_interval(mut self, swap_interval: Option<i32>) -> Self {
        self.swap_interval = swap_interval;
        self
    }

    /// Configures the backend to either synchronise presentation with the display refresh rate
    /// or render as fast as possible.
    #[must_use]
    pub fn with_vsync(self, enabled: bool) -> Self {
        let swap_interval = if enabled { Some(1) } else { Some(0) };
        self.with_swap_interval(swap_interval)
    }

    /// Configures whether the backend prints frame timing metrics once per second.
    #[must_use]
    pub fn with_show_fps(mut self, show: bool) -> Self {
        self.show_fps = show;
        self
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct FrameBreakdown {
    frame: Duration,
    simulation: Duration,
    scene_population: Duration,
    render: Duration,
}

/// Tracks the average frames-per-second produced by the render loop.
#[derive(Debug, Default)]
struct FpsCounter {
    elapsed: Duration,
    frames: u32,
    frame_times: VecDeque<Duration>,
    window_duration: Duration,
    simulation_accum: Duration,
    scene_population_accum: Duration,
    render_accum: Duration,
}

#[derive(Clone, Copy, Debug)]
struct FpsMetrics {
    per_second: f32,
    trailing_ten_seconds: f32,
    avg_simulation: Duration,
    avg_scene_population: Duration,
    avg_render: Duration,
}

impl FpsCounter {
    /// Records a rendered frame and returns the per-second and trailing ten-second averages once
    /// one second has elapsed.
    fn record_frame(&mut self, breakdown: FrameBreakdown) -> Option<FpsMetrics> {
        self.elapsed += breakdown.frame;
        self.frames = self.frames.saturating_add(1);
        self.simulation_accum += breakdown.simulation;
        self.scene_population_accum += breakdown.scene_population;
        self.render_accum += breakdown.render;

        self.frame_times.push_back(breakdown.frame);
        self.window_duration += breakdown.frame;

        let trailing_window = Duration::from_secs(10);
        while self.window_duration > trailing_window {
            match self.frame_times.pop_front() {
                Some(removed) => {
                    self.window_duration = self.window_duration.saturating_sub(removed);
                }
                None => break,
            }
        }

        if self.elapsed < Duration::from_secs(1) {
            return None;
        }

        let seconds = self.elapsed.as_secs_f32();
        let frames = self.frames.max(1);
        let per_second = self.frames as f32 / seconds;
        let window_seconds = self.window_duration.as_secs_f32();
        let trailing_ten_seconds = if window_seconds <= f32::EPSILON {
            per_second
        } else {
            self.frame_times.len() as f32 / window_seconds
        };
        let metrics = FpsMetrics {
            per_second,
            trailing_ten_seconds,
            avg_simulation: self.simulation_accum / frames,
            avg_scene_population: self.scene_population_accum / frames,
            avg_render: self.render_accum / frames,
        };

        self.elapsed = Duration::ZERO;
        self.frames = 0;
        self.simulation_accum = Duration::ZERO;
        self.scene_population_accum = Duration::ZERO;
        self.render_accum = Duration::ZERO;
        Some(metrics)
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) -> FrameSimulationBreakdown + 'static,
    {
        let Self {
            swap_interval,
            show_fps,
        } = self;

        let Presentation {
            window_title,
            window_size: (window_width, window_height),
            clear_color,
            scene,
        } = presentation;

        let mut config = macroquad::window::Conf {
            window_title,
            window_width: i32::try_from(window_width)?,
            window_height: i32::try_from(window_height)?,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        macroquad::Window::from_config(config, async move {
            let mut scene = scene;
            let background = to_macroquad_color(clear_color);
            let mut fps_counter = FpsCounter::default();

            loop {
                let keyboard = KeyboardShortcuts::poll();
                if keyboard.quit_requested {
                    break;
                }

                macroquad::window::clear_background(background);

                let dt_seconds = macroquad::time::get_frame_time();
                let frame_dt = Duration::from_secs_f32(dt_seconds.max(0.0));
                let frame_input = gather_frame_input(keyboard);

                let simulation_breakdown = update_scene(frame_dt, frame_input, &mut scene);

                let render_start = Instant::now();
                let screen = Vec2::new(
                    macroquad::window::screen_width(),
                    macroquad::window::screen_height(),
                );
                draw_scene(&scene, screen);
                let render_duration = render_start.elapsed();

                let fps_metrics = fps_counter.record_frame(FrameBreakdown {
                    frame: frame_dt,
                    simulation: simulation_breakdown.simulation,
                    scene_population: simulation_breakdown.scene_population,
                    render: render_duration,
                });
                if show_fps {
                    if let Some(FpsMetrics {
                        per_second,
                        trailing_ten_seconds,
                        avg_simulation,
                        avg_scene_population,
                        avg_render,
                    }) = fps_metrics
                    {
                        println!(
                            "FPS: {:.2} (10s avg: {:.2}) | sim: {:>6.2}ms scene: {:>6.2}ms render: {:>6.2}ms",
                            per_second,
                            trailing_ten_seconds,
                            avg_simulation.as_secs_f64() * 1_000.0,
                            avg_scene_population.as_secs_f64() * 1_000.0,
                            avg_render.as_secs_f64() * 1_000.0,
                        );
                    }
                }

                macroquad::window::next_frame().await;
            }
        });

        Ok(())
    }
}

fn gather_frame_input(keyboard: KeyboardShortcuts) -> FrameInput {
    let (cursor_x, cursor_y) = mouse_position();
    FrameInput {
        up: is_key_down(KeyCode::W) || is_key_down(KeyCode::Up),
        left: is_key_down(KeyCode::A) || is_key_down(KeyCode::Left),
        down: is_key_down(KeyCode::S) || is_key_down(KeyCode::Down),
        right: is_key_down(KeyCode::D) || is_key_down(KeyCode::Right),
        pause_toggle: keyboard.pause_toggle,
        pointer: Some(Vec2::new(cursor_x, cursor_y)),
    }
}

fn draw_scene(scene: &Scene, screen: Vec2) {
    for tree in &scene.trees {
        draw_rect(scene, tree);
    }
    draw_fence(scene, &scene.fence);
    for enemy in &scene.enemies {
        draw_rect(scene, enemy);
    }
    draw_player(scene, &scene.player);
    draw_health_bar(&scene.health);

    if scene.overlay_opacity > 0.0 {
        let overlay = Color::from_rgb_u8(0xff, 0x00, 0x00).with_alpha(scene.overlay_opacity);
        macroquad::shapes::draw_rectangle(0.0, 0.0, screen.x, screen.y, to_macroquad_color(overlay));
    }

    if let Some(banner) = scene.banner {
        let _ = macroquad::text::draw_text(
            banner.text(),
            screen.x * 0.5 - 100.0,
            screen.y * 0.5,
            48.0,
            macroquad::color::WHITE,
        );
    }
}

fn draw_rect(scene: &Scene, rect: &SceneRect) {
    let origin = scene.to_screen(rect.origin);
    macroquad::shapes::draw_rectangle(
        origin.x,
        origin.y,
        rect.size.x,
        rect.size.y,
        to_macroquad_color(rect.color),
    );
}

fn draw_fence(scene: &Scene, fence: &FencePresentation) {
    let origin = scene.to_screen(Vec2::ZERO);
    macroquad::shapes::draw_rectangle_lines(
        origin.x,
        origin.y,
        fence.extent.x,
        fence.extent.y,
        fence.thickness,
        to_macroquad_color(fence.color),
    );
}

/// Oriented quad described by its four corners in screen space.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Quad([Vec2; 4]);

#[derive(Clone, Copy, Debug, PartialEq)]
struct PlayerFigure {
    head: Quad,
    shoulders: Quad,
    feet: [Quad; 2],
    flashlight: Quad,
}

/// Lays the player parts out around `center`, facing along `facing`.
///
/// Parts are rectangles in the player's own frame, where +x points forward
/// and +y points to the player's right.
fn player_figure(center: Vec2, facing: f32, size: f32) -> PlayerFigure {
    let forward = Vec2::from_angle(facing);
    let side = forward.perp();
    let part = |x: f32, y: f32, width: f32, height: f32| {
        let corner = |lx: f32, ly: f32| center + forward * (lx * size) + side * (ly * size);
        Quad([
            corner(x, y),
            corner(x + width, y),
            corner(x + width, y + height),
            corner(x, y + height),
        ])
    };

    PlayerFigure {
        head: part(-0.25, -0.25, 0.5, 0.5),
        shoulders: part(-0.5, 0.0, 1.0, 0.5),
        feet: [part(-0.5, 0.5, 0.5, 0.25), part(0.0, 0.5, 0.5, 0.25)],
        flashlight: part(0.25, -0.125, 0.5, 0.25),
    }
}

fn draw_player(scene: &Scene, player: &PlayerPresentation) {
    let center = scene.to_screen(player.body.center());
    let figure = player_figure(center, player.facing, player.body.size.x);

    draw_quad(figure.head, HEAD_COLOR);
    draw_quad(figure.shoulders, SHOULDER_COLOR);
    for foot in figure.feet {
        draw_quad(foot, FEET_COLOR);
    }
    draw_quad(figure.flashlight, FLASHLIGHT_COLOR);
}

fn draw_quad(quad: Quad, color: Color) {
    let [p1, p2, p3, p4] = quad.0.map(|corner| MacroquadVec2::new(corner.x, corner.y));
    let color = to_macroquad_color(color);
    macroquad::shapes::draw_triangle(p1, p2, p3, color);
    macroquad::shapes::draw_triangle(p1, p3, p4, color);
}

fn draw_health_bar(health: &HealthPresentation) {
    macroquad::shapes::draw_rectangle(
        HEALTH_BAR_ORIGIN.x,
        HEALTH_BAR_ORIGIN.y,
        HEALTH_BAR_SIZE.x,
        HEALTH_BAR_SIZE.y,
        macroquad::color::BLACK,
    );
    macroquad::shapes::draw_rectangle(
        HEALTH_BAR_ORIGIN.x,
        HEALTH_BAR_ORIGIN.y,
        HEALTH_BAR_SIZE.x * health.fill_fraction(),
        HEALTH_BAR_SIZE.y,
        macroquad::color::RED,
    );
    let _ = macroquad::text::draw_text(
        &health.label(),
        HEALTH_BAR_ORIGIN.x + 4.0,
        HEALTH_BAR_ORIGIN.y + HEALTH_BAR_SIZE.y - 4.0,
        HEALTH_BAR_SIZE.y,
        macroquad::color::WHITE,
    );
}

fn to_macroquad_color(color: Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_vec2_close(actual: Vec2, expected: Vec2) {
        assert!(
            (actual - expected).length() <= 1e-4,
            "expected {expected:?}, got {actual:?}"
        );
    }

    #[test]
    fn player_figure_faces_right_at_zero_radians() {
        let figure = player_figure(Vec2::new(100.0, 100.0), 0.0, 20.0);

        assert_vec2_close(figure.head.0[0], Vec2::new(95.0, 95.0));
        assert_vec2_close(figure.head.0[2], Vec2::new(105.0, 105.0));
        assert_vec2_close(figure.flashlight.0[0], Vec2::new(105.0, 97.5));
        assert_vec2_close(figure.flashlight.0[2], Vec2::new(115.0, 102.5));
    }

    #[test]
    fn player_figure_rotates_with_facing() {
        let right = player_figure(Vec2::ZERO, 0.0, 20.0);
        let down = player_figure(Vec2::ZERO, std::f32::consts::FRAC_PI_2, 20.0);

        let parts = |figure: PlayerFigure| {
            [figure.head, figure.shoulders, figure.feet[0], figure.feet[1], figure.flashlight]
        };
        for (a, b) in parts(right).iter().zip(parts(down).iter()) {
            for (corner, rotated) in a.0.iter().zip(b.0.iter()) {
                assert_vec2_close(corner.perp(), *rotated);
            }
        }
    }

    #[test]
    fn shoulders_span_the_player_width() {
        let figure = player_figure(Vec2::ZERO, 0.0, 20.0);
        let [a, b, _, d] = figure.shoulders.0;

        assert_vec2_close(a, Vec2::new(-10.0, 0.0));
        assert!(((b - a).length() - 20.0).abs() <= 1e-4);
        assert!(((d - a).length() - 10.0).abs() <= 1e-4);
    }

    #[test]
    fn feet_sit_side_by_side_behind_the_shoulders() {
        let figure = player_figure(Vec2::ZERO, 0.0, 20.0);
        let [left, right] = figure.feet;

        assert_vec2_close(left.0[0], Vec2::new(-10.0, 10.0));
        assert_vec2_close(left.0[2], Vec2::new(0.0, 15.0));
        assert_vec2_close(right.0[0], Vec2::new(0.0, 10.0));
        assert_vec2_close(right.0[2], Vec2::new(10.0, 15.0));
    }

    #[test]
    fn color_conversion_keeps_alpha() {
        let color = to_macroquad_color(Color::new(0.25, 0.5, 0.75, 0.3));

        assert_eq!(color.r, 0.25);
        assert_eq!(color.g, 0.5);
        assert_eq!(color.b, 0.75);
        assert_eq!(color.a, 0.3);
    }

    #[test]
    fn fps_counter_reports_average_frames_per_second() {
        let mut counter = FpsCounter::default();
        let frame = |millis| FrameBreakdown {
            frame: Duration::from_millis(millis),
            ..FrameBreakdown::default()
        };
        assert!(counter.record_frame(frame(250)).is_none());
        assert!(counter.record_frame(frame(250)).is_none());
        assert!(counter.record_frame(frame(250)).is_none());

        let metrics = counter
            .record_frame(frame(250))
            .expect("should report FPS after one second of samples");
        assert!((metrics.per_second - 4.0).abs() <= 1e-3);
        assert!((metrics.trailing_ten_seconds - 4.0).abs() <= 1e-3);
        assert!(counter.record_frame(frame(250)).is_none());
    }

    #[test]
    fn fps_counter_averages_simulation_time() {
        let mut counter = FpsCounter::default();
        let frame = FrameBreakdown {
            frame: Duration::from_millis(500),
            simulation: Duration::from_millis(4),
            scene_population: Duration::from_millis(2),
            render: Duration::from_millis(6),
        };

        assert!(counter.record_frame(frame).is_none());
        let metrics = counter.record_frame(frame).expect("one second elapsed");

        assert_eq!(metrics.avg_simulation, Duration::from_millis(4));
        assert_eq!(metrics.avg_scene_population, Duration::from_millis(2));
        assert_eq!(metrics.avg_render, Duration::from_millis(6));
    }
}
