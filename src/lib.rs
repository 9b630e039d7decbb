//! Circuit City - animated topic visualizations
//!
//! Core modules:
//! - `catalog`: Static topic catalogs (names, colors, category tags)
//! - `sim`: Entity pool, layout, per-tick simulation and pointer interaction
//! - `renderer`: Surface abstraction and the render pass
//! - `driver`: Start/stop loop driver owning one visualization instance
//! - `settings`: Persisted render preferences
//! - `achievements`: Collection notification sink

pub mod achievements;
pub mod catalog;
pub mod driver;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use achievements::{CollectionLog, CollectionSink};
pub use catalog::{Catalog, Category, Rgb, Tag, Tier, Topic};
pub use driver::{LoopState, Visualization};
pub use settings::{QualityPreset, Settings};

/// Simulation and layout constants
pub mod consts {
    /// Assumed frame time; the loop does not measure real elapsed time
    pub const FRAME_DT: f32 = 0.016;

    /// Circuit grid columns
    pub const GRID_COLS: usize = 3;
    /// Node placement jitter (half-widths)
    pub const NODE_JITTER_X: f32 = 25.0;
    pub const NODE_JITTER_Y: f32 = 15.0;
    /// Connection generation
    pub const CONNECTION_CHANCE: f32 = 0.4;
    pub const CONNECTION_MAX_DISTANCE: f32 = 200.0;
    pub const CONNECTION_MIN_STRENGTH: f32 = 0.3;
    /// Ticks a connection stays lit after activation (2 s at 16 ms/tick)
    pub const CONNECTION_HOLD_TICKS: u64 = 125;

    /// Node pulse
    pub const PULSE_STEP: f32 = 0.05;
    pub const PULSE_AMPLITUDE: f32 = 0.1;

    /// Trail capacities
    pub const PACKET_TRAIL_LEN: usize = 8;
    pub const BUBBLE_TRAIL_LEN: usize = 10;

    /// Particle velocity damping per tick
    pub const PARTICLE_FRICTION: f32 = 0.98;

    /// Bubble motion
    pub const WOBBLE_STEP: f32 = 0.02;
    pub const WOBBLE_AMPLITUDE: f32 = 0.5;
    pub const WOBBLE_Y_FREQUENCY: f32 = 0.01;
    /// Bubbles are dropped once this far below the surface
    pub const BUBBLE_EXIT_MARGIN: f32 = 100.0;
    pub const BUBBLE_SPAWN_Y: f32 = -50.0;
    pub const DEFAULT_STREAMS: usize = 5;

    /// Ambient behavior, per tick
    pub const NODE_TOGGLE_CHANCE: f32 = 0.02;
    pub const AMBIENT_PACKET_CHANCE: f32 = 0.3;
    pub const BUBBLE_SPAWN_CHANCE: f32 = 0.02;

    /// Interaction
    pub const NODE_HOVER_MARGIN: f32 = 20.0;
    pub const BUBBLE_HOVER_MARGIN: f32 = 10.0;
    pub const NODE_CLICK_MARGIN: f32 = 10.0;
    pub const POWER_STEP: f32 = 0.2;
    pub const ACTIVATION_PACKET_CHANCE: f32 = 0.7;

    /// Background lattice spacing
    pub const GRID_SPACING: f32 = 30.0;

    /// Collection toast visibility
    pub const TOAST_DURATION_MS: f64 = 3000.0;
}
