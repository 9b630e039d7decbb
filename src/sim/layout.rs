//! Initial placement and re-layout on resize

use glam::Vec2;

use super::rng::RandomSource;
use super::state::{Connection, Node, NodeId, SceneState, Variant};
use crate::consts::*;

/// Populate the scene for its variant at the current size
pub fn layout(state: &mut SceneState, rng: &mut impl RandomSource) {
    match state.variant {
        Variant::Circuit => {
            layout_nodes(state, rng);
            layout_connections(state, rng);
            log::info!(
                "Grade {} circuit: {} nodes, {} connections",
                state.catalog.grade,
                state.nodes.len(),
                state.connections.len()
            );
        }
        Variant::Waterfall { streams } => {
            layout_streams(state, streams);
            log::info!("Grade {} waterfall: {} streams", state.catalog.grade, streams);
        }
    }
}

/// Surface resized. Circuit scenes are rebuilt from scratch; waterfall scenes
/// only move their lanes and keep bubbles in flight.
pub fn relayout(state: &mut SceneState, size: Vec2, rng: &mut impl RandomSource) {
    log::debug!("Resize {}x{} -> {}x{}", state.size.x, state.size.y, size.x, size.y);
    state.size = size;
    layout(state, rng);
}

/// One node per topic on a 3-column grid with jitter
fn layout_nodes(state: &mut SceneState, rng: &mut impl RandomSource) {
    state.nodes.clear();
    state.connections.clear();

    let count = state.catalog.len();
    if count == 0 {
        return;
    }
    let cols = GRID_COLS;
    let rows = count.div_ceil(cols);
    let cell = Vec2::new(
        state.size.x / (cols + 1) as f32,
        state.size.y / (rows + 1) as f32,
    );

    state.nodes.reserve(count);
    for (index, topic) in state.catalog.topics().iter().enumerate() {
        let col = index % cols;
        let row = index / cols;
        let center = Vec2::new(cell.x * (col + 1) as f32, cell.y * (row + 1) as f32);
        let pos = center
            + Vec2::new(
                rng.jitter(NODE_JITTER_X),
                rng.jitter(NODE_JITTER_Y),
            );

        state.nodes.push(Node {
            id: NodeId(index),
            topic: topic.name.clone(),
            tag: topic.tag,
            importance: topic.importance,
            color: topic.color,
            pos,
            radius: Node::radius_for(topic.importance),
            active: rng.next_f32() > 0.5,
            pulse_phase: rng.range(0.0, std::f32::consts::TAU),
            power: rng.range(0.3, 1.0),
        });
    }
}

/// Wire compatible, nearby node pairs. Every ordered pair `(a, b)` is
/// considered and accepted when `a`'s category lists `b`'s, so a pair listed
/// on both sides may be wired in both directions.
fn layout_connections(state: &mut SceneState, rng: &mut impl RandomSource) {
    for a in &state.nodes {
        let Some(cat_a) = a.tag.category() else {
            continue;
        };
        for b in &state.nodes {
            if a.id == b.id {
                continue;
            }
            let Some(cat_b) = b.tag.category() else {
                continue;
            };
            if !cat_a.accepts(cat_b) || !rng.chance(CONNECTION_CHANCE) {
                continue;
            }
            if a.pos.distance(b.pos) < CONNECTION_MAX_DISTANCE {
                let strength = rng.range(CONNECTION_MIN_STRENGTH, 1.0);
                state.connections.push(Connection::new(a.id, b.id, strength));
            }
        }
    }
}

/// Evenly spaced lane x positions
fn layout_streams(state: &mut SceneState, streams: usize) {
    let spacing = state.size.x / (streams + 1) as f32;
    state.streams = (0..streams).map(|i| spacing * (i + 1) as f32).collect();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, Rgb, Topic};
    use crate::sim::rng::{FixedRandom, seeded};

    fn circuit(size: Vec2) -> SceneState {
        SceneState::new(Variant::Circuit, Catalog::circuit(10), size)
    }

    #[test]
    fn test_layout_one_node_per_topic() {
        let mut state = circuit(Vec2::new(900.0, 600.0));
        layout(&mut state, &mut seeded(7));
        assert_eq!(state.nodes.len(), 9);
        for (i, node) in state.nodes.iter().enumerate() {
            assert_eq!(node.id, NodeId(i));
            assert_eq!(Some(&node.topic), state.catalog.get(i).map(|t| &t.name));
        }
    }

    #[test]
    fn test_grid_positions_within_jitter() {
        let mut state = circuit(Vec2::new(900.0, 600.0));
        layout(&mut state, &mut seeded(3));
        // 3x3 grid: cells of 225 x 150
        for node in &state.nodes {
            let i = node.id.0;
            let center = Vec2::new(225.0 * (i % 3 + 1) as f32, 150.0 * (i / 3 + 1) as f32);
            let d = node.pos - center;
            assert!(d.x.abs() <= NODE_JITTER_X && d.y.abs() <= NODE_JITTER_Y);
            assert!((0.3..=1.0).contains(&node.power));
        }
    }

    #[test]
    fn test_no_jitter_at_midpoint() {
        let mut state = circuit(Vec2::new(900.0, 600.0));
        layout(&mut state, &mut FixedRandom(0.5));
        assert_eq!(state.nodes[0].pos, Vec2::new(225.0, 150.0));
        assert_eq!(state.nodes[8].pos, Vec2::new(675.0, 450.0));
        // 0.5 is not > 0.5
        assert!(!state.nodes[0].active);
        assert_eq!(state.nodes[0].radius, 15.0 + 5.0 * 3.0);
    }

    #[test]
    fn test_connections_respect_matrix_and_distance() {
        for seed in 0..20 {
            let mut state = circuit(Vec2::new(600.0, 500.0));
            layout(&mut state, &mut seeded(seed));
            for c in &state.connections {
                let a = state.node(c.from).expect("endpoint");
                let b = state.node(c.to).expect("endpoint");
                assert_ne!(c.from, c.to);
                let (ca, cb) = (a.tag.category().unwrap(), b.tag.category().unwrap());
                assert!(ca.accepts(cb));
                assert!(a.pos.distance(b.pos) < CONNECTION_MAX_DISTANCE);
                assert!((0.3..=1.0).contains(&c.strength));
                assert!(!c.active);
            }
        }
    }

    #[test]
    fn test_forced_connections() {
        // Two compatible topics side by side, every roll passes
        let catalog = Catalog::new(
            10,
            Rgb::hex(0x06b6d4),
            vec![
                Topic::new("CPU", Rgb::hex(0x111111), crate::Category::Processor, 1),
                Topic::new("RAM", Rgb::hex(0x222222), crate::Category::Memory, 1),
            ],
        );
        let mut state = SceneState::new(Variant::Circuit, catalog, Vec2::new(400.0, 200.0));
        layout(&mut state, &mut FixedRandom(0.0));
        // both ordered pairs accepted
        assert_eq!(state.connections.len(), 2);
    }

    #[test]
    fn test_one_sided_rule_still_connects() {
        // memory lists network, network does not list memory
        let catalog = Catalog::new(
            10,
            Rgb::hex(0x06b6d4),
            vec![
                Topic::new("RAM", Rgb::hex(0x222222), crate::Category::Memory, 1),
                Topic::new("NET", Rgb::hex(0x333333), crate::Category::Network, 1),
            ],
        );
        let mut state = SceneState::new(Variant::Circuit, catalog, Vec2::new(400.0, 200.0));
        layout(&mut state, &mut FixedRandom(0.0));
        assert_eq!(state.connections.len(), 1);
        assert_eq!(state.connections[0].from, state.nodes[0].id);
        assert_eq!(state.connections[0].to, state.nodes[1].id);
    }

    #[test]
    fn test_builtin_catalog_links_storage_to_networks() {
        // Storage and Networks share a row 150 apart
        let mut state = circuit(Vec2::new(600.0, 400.0));
        layout(&mut state, &mut FixedRandom(0.0));
        let linked = state.connections.iter().any(|c| {
            let from = state.node(c.from).and_then(|n| n.tag.category());
            let to = state.node(c.to).and_then(|n| n.tag.category());
            from == Some(crate::Category::Memory) && to == Some(crate::Category::Network)
        });
        assert!(linked);
    }

    #[test]
    fn test_relayout_clears_and_rebuilds() {
        let mut state = circuit(Vec2::new(900.0, 600.0));
        let mut rng = seeded(11);
        layout(&mut state, &mut rng);
        relayout(&mut state, Vec2::new(450.0, 300.0), &mut rng);
        assert_eq!(state.nodes.len(), 9);
        assert_eq!(state.size, Vec2::new(450.0, 300.0));
        assert!(state.nodes.iter().all(|n| n.pos.x < 450.0 && n.pos.y < 300.0));
    }

    #[test]
    fn test_streams_evenly_spaced() {
        let mut state = SceneState::new(Variant::waterfall(), Catalog::waterfall(11), Vec2::new(600.0, 400.0));
        layout(&mut state, &mut FixedRandom(0.5));
        assert_eq!(state.streams, vec![100.0, 200.0, 300.0, 400.0, 500.0]);
        assert!(state.nodes.is_empty());
    }

    #[test]
    fn test_waterfall_resize_keeps_bubbles() {
        let mut state = SceneState::new(Variant::waterfall(), Catalog::waterfall(11), Vec2::new(600.0, 400.0));
        let mut rng = FixedRandom(0.5);
        layout(&mut state, &mut rng);
        let topic = state.catalog.topics()[0].clone();
        state.spawn_bubble(100.0, &topic, &mut rng);
        relayout(&mut state, Vec2::new(1200.0, 400.0), &mut rng);
        assert_eq!(state.bubbles.len(), 1);
        assert_eq!(state.streams[0], 200.0);
    }
}
