//! Simulation module
//!
//! Entity pool, layout, interaction and the per-tick step. Nothing here draws
//! or touches the platform:
//! - Fixed assumed frame time only
//! - All randomness through an injected [`RandomSource`]
//! - Stable iteration order (nodes by id, transients by spawn order)

pub mod interaction;
pub mod layout;
pub mod rng;
pub mod state;
pub mod tick;

pub use interaction::{activate_connections, bubble_hovered, click, hovered_nodes, node_hovered};
pub use layout::{layout, relayout};
pub use rng::{FixedRandom, RandomSource, ScriptedRandom, seeded};
pub use state::{
    Bubble, BurstKind, Connection, Node, NodeId, Packet, Particle, SceneState, Trail, Variant,
    VizEvent,
};
pub use tick::{TickInput, tick};
