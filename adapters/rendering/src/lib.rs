#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Light Cycles adapters.
//!
//! The scene types describe one frame's worth of drawable state in world
//! units; backends translate them to screen space. Nothing here touches the
//! simulation directly, so the renderer always observes a fully committed
//! tick.

use anyhow::Result as AnyResult;
use glam::Vec2;
use light_cycles_core::{CellCoord, Heading, Outcome, PlayerId};
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

    /// Returns the same color with the provided alpha channel.
    #[must_use]
    pub fn with_alpha(self, alpha: f32) -> Self {
        Self {
            alpha: alpha.clamp(0.0, 1.0),
            ..self
        }
    }
}

/// Input snapshot gathered by backends before updating the scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct FrameInput {
    /// Whether the left directional signal is held.
    pub left: bool,
    /// Whether the right directional signal is held.
    pub right: bool,
    /// Whether the up directional signal is held.
    pub up: bool,
    /// Whether the down directional signal is held.
    pub down: bool,
}

/// Presentation of the arena's cell lattice.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ArenaPresentation {
    /// Number of cell columns in the arena.
    pub columns: u32,
    /// Number of cell rows in the arena.
    pub rows: u32,
    /// Side length of a single square cell expressed in world units.
    pub cell_length: f32,
}

impl ArenaPresentation {
    /// Creates a new arena presentation descriptor.
    #[must_use]
    pub const fn new(columns: u32, rows: u32, cell_length: f32) -> Self {
        Self {
            columns,
            rows,
            cell_length,
        }
    }

    /// Total width of the arena measured in world units.
    #[must_use]
    pub fn width(&self) -> f32 {
        self.columns as f32 * self.cell_length
    }

    /// Total height of the arena measured in world units.
    #[must_use]
    pub fn height(&self) -> f32 {
        self.rows as f32 * self.cell_length
    }

    /// Converts a cell coordinate to the world-space position of its
    /// upper-left corner.
    #[must_use]
    pub fn cell_to_world(&self, cell: CellCoord) -> Vec2 {
        Vec2::new(
            cell.column() as f32 * self.cell_length,
            cell.row() as f32 * self.cell_length,
        )
    }
}

/// Drawable state of a single cycle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CyclePresentation {
    /// Identifier of the cycle.
    pub player: PlayerId,
    /// Cell currently occupied by the cycle.
    pub cell: CellCoord,
    /// Heading the cycle faces.
    pub heading: Heading,
    /// Fill color of the cycle's body.
    pub color: Color,
    /// Whether the cycle has crashed and is frozen.
    pub crashed: bool,
}

/// Drawable trail of a single cycle, oldest cell first.
///
/// Backends fade the trail from transparent (oldest) to opaque (newest) by
/// ramping alpha along the sequence.
#[derive(Clone, Debug, PartialEq)]
pub struct TrailPresentation {
    /// Identifier of the cycle that produced the trail.
    pub player: PlayerId,
    /// Base color of the trail segments.
    pub color: Color,
    /// Cells composing the trail, oldest first.
    pub cells: Vec<CellCoord>,
}

/// End-of-match banner shown once the arena is frozen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OutcomeBanner {
    /// Final result of the match.
    pub outcome: Outcome,
}

impl OutcomeBanner {
    /// Headline text displayed in the center of the arena.
    #[must_use]
    pub const fn headline(&self) -> &'static str {
        "GAME OVER"
    }

    /// Supporting line naming the match result.
    #[must_use]
    pub const fn detail(&self) -> &'static str {
        match self.outcome {
            Outcome::PlayerOneWins => "Player 1 wins",
            Outcome::PlayerTwoWins => "Player 2 wins",
            Outcome::Draw => "Draw",
        }
    }
}

/// Scene description combining the arena, trails, and both cycles.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Arena lattice that frames the play area.
    pub arena: ArenaPresentation,
    /// Trails currently visible in the arena.
    pub trails: Vec<TrailPresentation>,
    /// Both cycles, drawn over their trails.
    pub cycles: Vec<CyclePresentation>,
    /// Banner shown once the match has ended.
    pub banner: Option<OutcomeBanner>,
}

impl Scene {
    /// Creates a new scene descriptor.
    #[must_use]
    pub const fn new(
        arena: ArenaPresentation,
        trails: Vec<TrailPresentation>,
        cycles: Vec<CyclePresentation>,
        banner: Option<OutcomeBanner>,
    ) -> Self {
        Self {
            arena,
            trails,
            cycles,
            banner,
        }
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Scene content that should be displayed.
    pub scene: Scene,
    /// Whether the backend overlays a frame-rate counter.
    pub show_fps: bool,
}

impl Presentation {
    /// Constructs a new presentation descriptor without an FPS overlay.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            scene,
            show_fps: false,
        }
    }

    /// Enables or disables the backend's frame-rate overlay.
    #[must_use]
    pub fn with_fps_counter(mut self, enabled: bool) -> Self {
        self.show_fps = enabled;
        self
    }
}

/// Rendering backend capable of presenting Light Cycles scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the frame delta and the
    /// per-frame input captured by the backend, and may mutate the scene
    /// before it is rendered. The backend checks for a quit request once per
    /// loop iteration, at the boundary between frames.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_to_world_scales_by_cell_length() {
        let arena = ArenaPresentation::new(40, 30, 20.0);

        assert_eq!(arena.cell_to_world(CellCoord::new(0, 0)), Vec2::ZERO);
        assert_eq!(
            arena.cell_to_world(CellCoord::new(3, 2)),
            Vec2::new(60.0, 40.0)
        );
        assert_eq!(arena.width(), 800.0);
        assert_eq!(arena.height(), 600.0);
    }

    #[test]
    fn with_alpha_clamps_to_unit_range() {
        let color = Color::from_rgb_u8(255, 0, 0);

        assert_eq!(color.with_alpha(0.5).alpha, 0.5);
        assert_eq!(color.with_alpha(2.0).alpha, 1.0);
        assert_eq!(color.with_alpha(-1.0).alpha, 0.0);
    }

    #[test]
    fn banner_names_each_outcome() {
        let banner = |outcome| OutcomeBanner { outcome };

        assert_eq!(banner(Outcome::PlayerOneWins).detail(), "Player 1 wins");
        assert_eq!(banner(Outcome::PlayerTwoWins).detail(), "Player 2 wins");
        assert_eq!(banner(Outcome::Draw).detail(), "Draw");
        assert_eq!(banner(Outcome::Draw).headline(), "GAME OVER");
    }
}
