//! Entity pool and scene state
//!
//! One [`SceneState`] per visualization instance. Transient entities
//! (packets, particles, bubbles) are created and destroyed here; nodes and
//! connections are rebuilt only by layout.

use std::collections::VecDeque;

use glam::Vec2;

use super::rng::RandomSource;
use crate::catalog::{Catalog, Rgb, Tag, Topic};
use crate::consts::*;

/// Which visualization this scene runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    /// Circuit Board City: grid of nodes wired by connections
    Circuit,
    /// Digital Waterfall: bubbles falling down vertical lanes
    Waterfall { streams: usize },
}

impl Variant {
    pub fn waterfall() -> Self {
        Variant::Waterfall {
            streams: DEFAULT_STREAMS,
        }
    }

    pub fn is_circuit(&self) -> bool {
        matches!(self, Variant::Circuit)
    }
}

/// Fixed-capacity position history, oldest first
#[derive(Debug, Clone)]
pub struct Trail {
    points: VecDeque<Vec2>,
    capacity: usize,
}

impl Trail {
    pub fn new(capacity: usize) -> Self {
        Self {
            points: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Append the newest point, evicting the oldest when full
    pub fn push(&mut self, p: Vec2) {
        if self.capacity == 0 {
            return;
        }
        self.points.push_back(p);
        while self.points.len() > self.capacity {
            self.points.pop_front();
        }
    }

    /// Points from oldest to newest
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &Vec2> {
        self.points.iter()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }
}

/// Index of a node in [`SceneState::nodes`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

/// A circuit component, one per catalog topic
#[derive(Debug, Clone)]
pub struct Node {
    pub id: NodeId,
    pub topic: String,
    pub tag: Tag,
    pub importance: u8,
    pub color: Rgb,
    pub pos: Vec2,
    pub radius: f32,
    pub active: bool,
    /// Idle pulse accumulator (radians)
    pub pulse_phase: f32,
    /// Power level in 0..=1
    pub power: f32,
}

impl Node {
    pub fn radius_for(importance: u8) -> f32 {
        15.0 + importance as f32 * 3.0
    }

    /// Display scale for this tick's pulse; never stored back into `radius`
    pub fn pulse_scale(&self) -> f32 {
        1.0 + PULSE_AMPLITUDE * self.pulse_phase.sin()
    }

    /// Strictly inside `radius + margin`
    pub fn within(&self, p: Vec2, margin: f32) -> bool {
        self.pos.distance(p) < self.radius + margin
    }
}

/// Wire between two nodes
#[derive(Debug, Clone)]
pub struct Connection {
    pub from: NodeId,
    pub to: NodeId,
    pub strength: f32,
    pub active: bool,
    /// Tick at which an activation lapses
    pub deactivate_at: Option<u64>,
}

impl Connection {
    pub fn new(from: NodeId, to: NodeId, strength: f32) -> Self {
        Self {
            from,
            to,
            strength,
            active: false,
            deactivate_at: None,
        }
    }

    pub fn touches(&self, id: NodeId) -> bool {
        self.from == id || self.to == id
    }
}

/// Data packet travelling between two nodes
#[derive(Debug, Clone)]
pub struct Packet {
    pub pos: Vec2,
    pub target: Vec2,
    /// Completion gate, 0..=1; advances by `speed` per tick
    pub progress: f32,
    pub speed: f32,
    pub color: Rgb,
    pub size: f32,
    pub trail: Trail,
}

/// Visual spark
#[derive(Debug, Clone)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: Rgb,
    /// Starts at 1, removed once <= 0
    pub life: f32,
    pub decay: f32,
    pub size: f32,
}

/// Falling topic bubble (waterfall)
#[derive(Debug, Clone)]
pub struct Bubble {
    pub id: u32,
    pub topic: String,
    pub tag: Tag,
    pub color: Rgb,
    pub pos: Vec2,
    pub radius: f32,
    /// Fall speed, units per tick
    pub speed: f32,
    pub wobble_phase: f32,
    pub trail: Trail,
}

impl Bubble {
    pub fn radius_for(difficulty: u8) -> f32 {
        15.0 + difficulty as f32 * 5.0
    }

    pub fn within(&self, p: Vec2, margin: f32) -> bool {
        self.pos.distance(p) < self.radius + margin
    }
}

/// Particle burst presets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BurstKind {
    /// Packet reached its target
    Arrival,
    /// Node clicked
    Collect,
    /// Bubble popped
    Pop,
}

impl BurstKind {
    pub fn count(self) -> usize {
        match self {
            BurstKind::Arrival => 8,
            BurstKind::Collect => 20,
            BurstKind::Pop => 15,
        }
    }

    /// Max absolute initial velocity per axis
    fn velocity(self) -> f32 {
        match self {
            BurstKind::Arrival => 3.0,
            BurstKind::Collect => 6.0,
            BurstKind::Pop => 4.0,
        }
    }

    fn decay(self) -> f32 {
        match self {
            BurstKind::Arrival | BurstKind::Pop => 0.03,
            BurstKind::Collect => 0.04,
        }
    }

    fn size_range(self) -> (f32, f32) {
        match self {
            BurstKind::Arrival => (2.0, 4.0),
            BurstKind::Collect => (2.0, 6.0),
            BurstKind::Pop => (2.0, 5.0),
        }
    }
}

/// Notification for the presentation layer
#[derive(Debug, Clone, PartialEq)]
pub enum VizEvent {
    /// A node was clicked or a bubble popped
    Collected { topic: String, tag: Tag },
    /// A connection activation launched a packet from this topic
    DataFlow { topic: String, tag: Tag },
}

impl VizEvent {
    pub fn topic(&self) -> &str {
        match self {
            VizEvent::Collected { topic, .. } | VizEvent::DataFlow { topic, .. } => topic,
        }
    }

    pub fn tag(&self) -> Tag {
        match self {
            VizEvent::Collected { tag, .. } | VizEvent::DataFlow { tag, .. } => *tag,
        }
    }
}

/// Complete per-instance state
#[derive(Debug, Clone)]
pub struct SceneState {
    pub variant: Variant,
    pub catalog: Catalog,
    /// Surface size the current layout was built for
    pub size: Vec2,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Seconds of assumed frame time elapsed
    pub elapsed: f32,
    pub nodes: Vec<Node>,
    pub connections: Vec<Connection>,
    pub packets: Vec<Packet>,
    pub particles: Vec<Particle>,
    pub bubbles: Vec<Bubble>,
    /// Waterfall lane x positions
    pub streams: Vec<f32>,
    events: Vec<VizEvent>,
    next_bubble_id: u32,
}

impl SceneState {
    /// Empty scene; call [`super::layout::layout`] to populate it
    pub fn new(variant: Variant, catalog: Catalog, size: Vec2) -> Self {
        Self {
            variant,
            catalog,
            size,
            time_ticks: 0,
            elapsed: 0.0,
            nodes: Vec::new(),
            connections: Vec::new(),
            packets: Vec::new(),
            particles: Vec::new(),
            bubbles: Vec::new(),
            streams: Vec::new(),
            events: Vec::new(),
            next_bubble_id: 1,
        }
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0)
    }

    /// Launch a packet from one node toward another. Returns false if either
    /// endpoint is missing.
    pub fn spawn_packet(&mut self, from: NodeId, to: NodeId, rng: &mut impl RandomSource) -> bool {
        let (Some(origin), Some(target)) = (self.node(from), self.node(to)) else {
            return false;
        };
        let (pos, target, color) = (origin.pos, target.pos, origin.color);
        let speed = rng.range(0.02, 0.05);
        let size = rng.range(3.0, 6.0);
        self.packets.push(Packet {
            pos,
            target,
            progress: 0.0,
            speed,
            color,
            size,
            trail: Trail::new(PACKET_TRAIL_LEN),
        });
        true
    }

    /// Spawn a burst of particles at `at`
    pub fn spawn_burst(&mut self, at: Vec2, color: Rgb, kind: BurstKind, rng: &mut impl RandomSource) {
        let (min_size, max_size) = kind.size_range();
        let v = kind.velocity();
        self.particles.reserve(kind.count());
        for _ in 0..kind.count() {
            let vel = Vec2::new(rng.jitter(v), rng.jitter(v));
            let size = rng.range(min_size, max_size);
            self.particles.push(Particle {
                pos: at,
                vel,
                color,
                life: 1.0,
                decay: kind.decay(),
                size,
            });
        }
    }

    /// Spawn a bubble for `topic` at the top of lane `x`
    pub fn spawn_bubble(&mut self, x: f32, topic: &Topic, rng: &mut impl RandomSource) -> u32 {
        let speed = rng.range(1.0, 3.0);
        let wobble_phase = rng.range(0.0, std::f32::consts::TAU);
        self.push_bubble(
            topic,
            Vec2::new(x, BUBBLE_SPAWN_Y),
            speed,
            wobble_phase,
        )
    }

    /// Insert a bubble with explicit motion parameters
    pub fn push_bubble(&mut self, topic: &Topic, pos: Vec2, speed: f32, wobble_phase: f32) -> u32 {
        let id = self.next_bubble_id;
        self.next_bubble_id += 1;
        self.bubbles.push(Bubble {
            id,
            topic: topic.name.clone(),
            tag: topic.tag,
            color: topic.color,
            pos,
            radius: Bubble::radius_for(topic.importance),
            speed,
            wobble_phase,
            trail: Trail::new(BUBBLE_TRAIL_LEN),
        });
        id
    }

    pub fn emit(&mut self, event: VizEvent) {
        self.events.push(event);
    }

    /// Pending notifications, oldest first
    pub fn events(&self) -> &[VizEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<VizEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn active_node_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.active).count()
    }
}
