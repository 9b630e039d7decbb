//! Pointer hit-testing and click handling

use glam::Vec2;

use super::rng::RandomSource;
use super::state::{Bubble, BurstKind, Node, NodeId, SceneState, Variant, VizEvent};
use crate::consts::*;

/// Hover: pointer within `radius + 20` of a node center
pub fn node_hovered(node: &Node, pointer: Option<Vec2>) -> bool {
    pointer.is_some_and(|p| node.within(p, NODE_HOVER_MARGIN))
}

/// Hover: pointer within `radius + 10` of a bubble center
pub fn bubble_hovered(bubble: &Bubble, pointer: Option<Vec2>) -> bool {
    pointer.is_some_and(|p| bubble.within(p, BUBBLE_HOVER_MARGIN))
}

/// Ids of every node under the pointer
pub fn hovered_nodes(state: &SceneState, pointer: Option<Vec2>) -> Vec<NodeId> {
    state
        .nodes
        .iter()
        .filter(|n| node_hovered(n, pointer))
        .map(|n| n.id)
        .collect()
}

/// Light every connection touching `id` until the hold deadline, launching a
/// packet along each with probability 0.7. A later activation pushes the
/// deadline out. Returns the number of packets launched.
pub fn activate_connections(state: &mut SceneState, id: NodeId, rng: &mut impl RandomSource) -> usize {
    let deadline = state.time_ticks + CONNECTION_HOLD_TICKS;
    let mut routes = Vec::new();
    for conn in state.connections.iter_mut().filter(|c| c.touches(id)) {
        conn.active = true;
        conn.deactivate_at = Some(deadline);
        if rng.chance(ACTIVATION_PACKET_CHANCE) {
            routes.push((conn.from, conn.to));
        }
    }

    let mut launched = 0;
    for (from, to) in routes {
        if !state.spawn_packet(from, to, rng) {
            continue;
        }
        launched += 1;
        if let Some(origin) = state.node(from) {
            let event = VizEvent::DataFlow {
                topic: origin.topic.clone(),
                tag: origin.tag,
            };
            state.emit(event);
        }
    }
    launched
}

/// Handle a click at `at`. Returns how many nodes or bubbles were collected.
pub fn click(state: &mut SceneState, at: Vec2, rng: &mut impl RandomSource) -> usize {
    match state.variant {
        Variant::Circuit => click_nodes(state, at, rng),
        Variant::Waterfall { .. } => usize::from(pop_bubble(state, at, rng)),
    }
}

/// Every node within `radius + 10` is collected, not just the nearest
fn click_nodes(state: &mut SceneState, at: Vec2, rng: &mut impl RandomSource) -> usize {
    let hits: Vec<NodeId> = state
        .nodes
        .iter()
        .filter(|n| n.within(at, NODE_CLICK_MARGIN))
        .map(|n| n.id)
        .collect();

    for &id in &hits {
        collect_node(state, id, at, rng);
        activate_connections(state, id, rng);
    }
    hits.len()
}

fn collect_node(state: &mut SceneState, id: NodeId, at: Vec2, rng: &mut impl RandomSource) {
    let Some(node) = state.node_mut(id) else {
        return;
    };
    node.power = (node.power + POWER_STEP).min(1.0);
    node.active = true;
    let (color, event) = (
        node.color,
        VizEvent::Collected {
            topic: node.topic.clone(),
            tag: node.tag,
        },
    );

    log::debug!("Collected node {} ({})", event.topic(), event.tag().as_str());
    state.spawn_burst(at, color, BurstKind::Collect, rng);
    state.emit(event);
}

/// Pop the nearest bubble whose body contains `at`
fn pop_bubble(state: &mut SceneState, at: Vec2, rng: &mut impl RandomSource) -> bool {
    let nearest = state
        .bubbles
        .iter()
        .enumerate()
        .filter(|(_, b)| b.within(at, 0.0))
        .min_by(|(_, a), (_, b)| a.pos.distance_squared(at).total_cmp(&b.pos.distance_squared(at)))
        .map(|(i, _)| i);

    let Some(index) = nearest else {
        return false;
    };
    let bubble = state.bubbles.remove(index);
    log::debug!("Popped bubble {} ({})", bubble.topic, bubble.tag.as_str());
    state.spawn_burst(at, bubble.color, BurstKind::Pop, rng);
    state.emit(VizEvent::Collected {
        topic: bubble.topic,
        tag: bubble.tag,
    });
    true
}
