#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for Light Cycles.
//!
//! Macroquad's optional audio stack depends on native ALSA development
//! libraries, which are unavailable in the containerised CI environment.
//! To keep `cargo test` usable everywhere we depend on macroquad without its
//! default `audio` feature. Consumers that need sound playback can opt back
//! in by enabling `macroquad/audio` in their own `Cargo.toml` dependency
//! specification.

use glam::Vec2;
use light_cycles_core::CellCoord;
use macroquad::{
    input::{is_key_down, is_key_pressed, KeyCode},
    text::{draw_text, measure_text},
};
use light_cycles_rendering::{
    Color, CyclePresentation, FrameInput, Presentation, RenderingBackend, Scene,
    TrailPresentation,
};
use std::time::Duration;

const TRAIL_MIN_ALPHA: f32 = 0.15;
const CYCLE_INSET_FRACTION: f32 = 0.1;
const BANNER_FONT_SIZE: u16 = 74;
const BANNER_DETAIL_FONT_SIZE: u16 = 40;
const FPS_FONT_SIZE: u16 = 20;

/// Snapshot of the keyboard observed during a single frame.
#[derive(Clone, Copy, Debug, Default)]
struct KeyboardState {
    /// `Escape` or `Q` to quit the game loop.
    quit_requested: bool,
    directional: FrameInput,
}

impl KeyboardState {
    fn poll() -> Self {
        let quit_requested = is_key_pressed(KeyCode::Escape) || is_key_pressed(KeyCode::Q);
        let directional = FrameInput {
            left: is_key_down(KeyCode::Left),
            right: is_key_down(KeyCode::Right),
            up: is_key_down(KeyCode::Up),
            down: is_key_down(KeyCode::Down),
        };

        Self {
            quit_requested,
            directional,
        }
    }
}

/// Rendering backend implemented on top of macroquad.
#[derive(Clone, Copy, Debug, Default)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
}

impl MacroquadBackend {
    /// Creates a backend with default platform settings.
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
    /// or, when disabled, run frames back to back.
    #[must_use]
    pub fn with_vsync(self, enabled: bool) -> Self {
        let swap_interval = if enabled { Some(1) } else { Some(0) };
        self.with_swap_interval(swap_interval)
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> anyhow::Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static,
    {
        let Presentation {
            window_title,
            clear_color,
            scene,
            show_fps,
        } = presentation;

        let window_width = scene.arena.width().ceil() as i32;
        let window_height = scene.arena.height().ceil() as i32;
        let mut config = macroquad::window::Conf {
            window_title,
            window_width: window_width.max(1),
            window_height: window_height.max(1),
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = self.swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        macroquad::Window::from_config(config, async move {
            let mut scene = scene;
            let background = to_macroquad_color(clear_color);

            loop {
                let keyboard = KeyboardState::poll();
                if keyboard.quit_requested {
                    break;
                }

                macroquad::window::clear_background(background);

                let dt_seconds = macroquad::time::get_frame_time();
                let frame_dt = Duration::from_secs_f32(dt_seconds.max(0.0));

                update_scene(frame_dt, keyboard.directional, &mut scene);

                let metrics = SceneMetrics::from_scene(&scene);
                for trail in &scene.trails {
                    draw_trail(trail, &metrics);
                }
                for cycle in &scene.cycles {
                    draw_cycle(cycle, &metrics);
                }
                if let Some(banner) = scene.banner {
                    draw_banner(banner.headline(), banner.detail());
                }
                if show_fps {
                    draw_fps_counter();
                }

                macroquad::window::next_frame().await;
            }
        });

        Ok(())
    }
}

/// Screen-space placement derived from the scene and the current window size.
#[derive(Clone, Copy, Debug)]
struct SceneMetrics {
    offset: Vec2,
    cell_step: f32,
}

impl SceneMetrics {
    fn from_scene(scene: &Scene) -> Self {
        let screen_width = macroquad::window::screen_width();
        let screen_height = macroquad::window::screen_height();
        let world_width = scene.arena.width().max(f32::EPSILON);
        let world_height = scene.arena.height().max(f32::EPSILON);

        let scale = (screen_width / world_width).min(screen_height / world_height);
        let offset = Vec2::new(
            (screen_width - world_width * scale) / 2.0,
            (screen_height - world_height * scale) / 2.0,
        );

        Self {
            offset,
            cell_step: scene.arena.cell_length * scale,
        }
    }

    fn cell_to_screen(&self, cell: CellCoord) -> Vec2 {
        self.offset + Vec2::new(cell.column() as f32, cell.row() as f32) * self.cell_step
    }
}

fn draw_trail(trail: &TrailPresentation, metrics: &SceneMetrics) {
    if trail.cells.is_empty() {
        return;
    }

    // Older segments fade toward the background, newest stays opaque.
    let count = trail.cells.len() as f32;
    let step = metrics.cell_step;
    for (index, cell) in trail.cells.iter().enumerate() {
        let age = (index as f32 + 1.0) / count;
        let alpha = TRAIL_MIN_ALPHA + (1.0 - TRAIL_MIN_ALPHA) * age;
        let origin = metrics.cell_to_screen(*cell);
        macroquad::shapes::draw_rectangle(
            origin.x,
            origin.y,
            step,
            step,
            to_macroquad_color(trail.color.with_alpha(alpha)),
        );
    }
}

fn draw_cycle(cycle: &CyclePresentation, metrics: &SceneMetrics) {
    let cell = metrics.cell_step;
    let inset = cell * CYCLE_INSET_FRACTION;
    let origin = metrics.cell_to_screen(cycle.cell);

    let color = if cycle.crashed {
        cycle.color.with_alpha(0.4)
    } else {
        cycle.color
    };
    macroquad::shapes::draw_rectangle(
        origin.x + inset,
        origin.y + inset,
        cell - inset * 2.0,
        cell - inset * 2.0,
        to_macroquad_color(color),
    );
}

fn draw_banner(headline: &str, detail: &str) {
    let screen_width = macroquad::window::screen_width();
    let screen_height = macroquad::window::screen_height();

    let headline_size = measure_text(headline, None, BANNER_FONT_SIZE, 1.0);
    draw_text(
        headline,
        (screen_width - headline_size.width) / 2.0,
        screen_height / 2.0,
        f32::from(BANNER_FONT_SIZE),
        macroquad::color::WHITE,
    );

    let detail_size = measure_text(detail, None, BANNER_DETAIL_FONT_SIZE, 1.0);
    draw_text(
        detail,
        (screen_width - detail_size.width) / 2.0,
        screen_height / 2.0 + f32::from(BANNER_FONT_SIZE),
        f32::from(BANNER_DETAIL_FONT_SIZE),
        macroquad::color::WHITE,
    );
}

fn draw_fps_counter() {
    let label = format!("{} fps", macroquad::time::get_fps());
    draw_text(
        &label,
        8.0,
        f32::from(FPS_FONT_SIZE),
        f32::from(FPS_FONT_SIZE),
        macroquad::color::WHITE,
    );
}

fn to_macroquad_color(color: Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}
