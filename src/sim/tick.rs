//! Per-frame simulation step
//!
//! Advances the scene by one assumed 16 ms frame. Sub-step order matters:
//! later steps see what earlier ones spawned (arrival bursts are integrated in
//! the same tick they appear).

use glam::Vec2;

use super::interaction::{activate_connections, hovered_nodes};
use super::rng::RandomSource;
use super::state::{BurstKind, NodeId, SceneState, Variant};
use crate::consts::*;

/// Input sampled for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Latest pointer position in surface coordinates
    pub pointer: Option<Vec2>,
}

/// Advance the scene by one tick
pub fn tick(state: &mut SceneState, input: &TickInput, rng: &mut impl RandomSource) {
    state.time_ticks += 1;
    state.elapsed += FRAME_DT;

    expire_connections(state);

    // Hovered nodes keep their wiring lit
    if state.variant.is_circuit() {
        for id in hovered_nodes(state, input.pointer) {
            activate_connections(state, id, rng);
        }
    }

    for node in &mut state.nodes {
        node.pulse_phase += PULSE_STEP;
    }

    update_packets(state, rng);
    update_particles(state);

    if matches!(state.variant, Variant::Waterfall { .. }) {
        update_bubbles(state);
    }

    // Ambient flicker
    if rng.chance(NODE_TOGGLE_CHANCE) && !state.nodes.is_empty() {
        let i = rng.index(state.nodes.len());
        let node = &mut state.nodes[i];
        node.active = !node.active;
        log::trace!("Toggled {} -> {}", node.topic, node.active);
    }

    if state.variant.is_circuit() {
        ambient_packet(state, rng);
    } else {
        ambient_bubble(state, rng);
    }
}

/// Lapse activations whose hold deadline has passed
fn expire_connections(state: &mut SceneState) {
    let now = state.time_ticks;
    for conn in &mut state.connections {
        if conn.deactivate_at.is_some_and(|t| t <= now) {
            conn.active = false;
            conn.deactivate_at = None;
        }
    }
}

/// Move packets toward their targets. Position closes a `speed` fraction of
/// the remaining gap each tick while `progress` alone decides arrival, so a
/// packet can finish short of its target.
fn update_packets(state: &mut SceneState, rng: &mut impl RandomSource) {
    let mut arrivals = Vec::new();
    state.packets.retain_mut(|p| {
        p.progress += p.speed;
        p.pos += (p.target - p.pos) * p.speed;
        p.trail.push(p.pos);
        if p.progress >= 1.0 {
            arrivals.push((p.target, p.color));
            false
        } else {
            true
        }
    });

    for (at, color) in arrivals {
        state.spawn_burst(at, color, BurstKind::Arrival, rng);
    }
}

fn update_particles(state: &mut SceneState) {
    state.particles.retain_mut(|p| {
        p.pos += p.vel;
        p.vel *= PARTICLE_FRICTION;
        p.life -= p.decay;
        p.life > 0.0
    });
}

fn update_bubbles(state: &mut SceneState) {
    let floor = state.size.y + BUBBLE_EXIT_MARGIN;
    state.bubbles.retain_mut(|b| {
        b.pos.y += b.speed;
        b.pos.x += (b.wobble_phase + b.pos.y * WOBBLE_Y_FREQUENCY).sin() * WOBBLE_AMPLITUDE;
        b.wobble_phase += WOBBLE_STEP;
        b.trail.push(b.pos);
        b.pos.y <= floor
    });
}

/// Random packet between two distinct active nodes
fn ambient_packet(state: &mut SceneState, rng: &mut impl RandomSource) {
    if !rng.chance(AMBIENT_PACKET_CHANCE) {
        return;
    }
    let active: Vec<NodeId> = state.nodes.iter().filter(|n| n.active).map(|n| n.id).collect();
    if active.len() < 2 {
        return;
    }
    let a = rng.index(active.len());
    let b = (a + 1 + rng.index(active.len() - 1)) % active.len();
    if state.spawn_packet(active[a], active[b], rng) {
        log::trace!("Ambient packet {:?} -> {:?}", active[a], active[b]);
    }
}

/// Random bubble on a random lane
fn ambient_bubble(state: &mut SceneState, rng: &mut impl RandomSource) {
    if !rng.chance(BUBBLE_SPAWN_CHANCE) || state.streams.is_empty() || state.catalog.is_empty() {
        return;
    }
    let x = state.streams[rng.index(state.streams.len())];
    let topic_index = rng.index(state.catalog.len());
    let Some(topic) = state.catalog.get(topic_index).cloned() else {
        return;
    };
    let id = state.spawn_bubble(x, &topic, rng);
    log::trace!("Bubble {} ({}) at x={}", id, topic.name, x);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, Rgb};
    use crate::sim::layout::layout;
    use crate::sim::rng::{FixedRandom, ScriptedRandom, seeded};
    use crate::sim::state::{Connection, Packet, Particle, Trail};
    use proptest::prelude::*;

    fn quiet() -> FixedRandom {
        FixedRandom(0.99)
    }

    fn circuit() -> SceneState {
        let mut state = SceneState::new(Variant::Circuit, Catalog::circuit(10), Vec2::new(900.0, 600.0));
        layout(&mut state, &mut quiet());
        state
    }

    fn waterfall() -> SceneState {
        let mut state = SceneState::new(Variant::waterfall(), Catalog::waterfall(10), Vec2::new(600.0, 600.0));
        layout(&mut state, &mut quiet());
        state
    }

    #[test]
    fn test_nine_topic_scene_single_tick() {
        let mut state = circuit();
        assert_eq!(state.nodes.len(), 9);
        let ids: Vec<usize> = state.nodes.iter().map(|n| n.id.0).collect();
        assert_eq!(ids, (0..9).collect::<Vec<_>>());

        tick(&mut state, &TickInput::default(), &mut quiet());
        assert_eq!(state.nodes.len(), 9);
        assert!(state.packets.is_empty());
        assert_eq!(state.time_ticks, 1);
    }

    #[test]
    fn test_forced_ambient_packet() {
        let mut state = circuit();
        assert_eq!(state.active_node_count(), 9);
        // toggle roll fails, packet roll passes, pick nodes 0 and 1
        let mut rng = ScriptedRandom::new([0.99, 0.0, 0.0, 0.0], 0.5);
        tick(&mut state, &TickInput::default(), &mut rng);
        assert_eq!(state.packets.len(), 1);
        assert_eq!(state.packets[0].pos, state.nodes[0].pos);
        assert_eq!(state.packets[0].target, state.nodes[1].pos);
        assert_eq!(state.packets[0].progress, 0.0);
    }

    #[test]
    fn test_ambient_packet_needs_two_active() {
        let mut state = circuit();
        for node in state.nodes.iter_mut().skip(1) {
            node.active = false;
        }
        tick(&mut state, &TickInput::default(), &mut ScriptedRandom::new([0.99, 0.0], 0.0));
        assert!(state.packets.is_empty());
    }

    #[test]
    fn test_pulse_advances() {
        let mut state = circuit();
        let before = state.nodes[3].pulse_phase;
        let radius = state.nodes[3].radius;
        tick(&mut state, &TickInput::default(), &mut quiet());
        assert!((state.nodes[3].pulse_phase - before - PULSE_STEP).abs() < 1e-5);
        assert_eq!(state.nodes[3].radius, radius);
    }

    #[test]
    fn test_ambient_toggle() {
        let mut state = circuit();
        tick(&mut state, &TickInput::default(), &mut ScriptedRandom::new([0.0, 0.0], 0.99));
        assert!(!state.nodes[0].active);
        assert!(state.nodes[1].active);
    }

    #[test]
    fn test_packet_arrival_burst() {
        let mut state = circuit();
        let target = state.nodes[1].pos;
        state.packets.push(Packet {
            pos: state.nodes[0].pos,
            target,
            progress: 0.0,
            speed: 0.25,
            color: Rgb::hex(0x3b82f6),
            size: 4.0,
            trail: Trail::new(PACKET_TRAIL_LEN),
        });

        // FixedRandom(0.5): zero burst velocity, no ambient spawns
        let mut rng = FixedRandom(0.5);
        for _ in 0..3 {
            tick(&mut state, &TickInput::default(), &mut rng);
            assert_eq!(state.packets.len(), 1);
            assert!(state.particles.is_empty());
        }
        tick(&mut state, &TickInput::default(), &mut rng);
        assert!(state.packets.is_empty());
        assert_eq!(state.particles.len(), 8);
        for p in &state.particles {
            assert_eq!(p.pos, target);
            assert_eq!(p.color, Rgb::hex(0x3b82f6));
        }
    }

    #[test]
    fn test_packet_settles_short_of_target() {
        let mut state = circuit();
        let origin = state.nodes[0].pos;
        let target = state.nodes[1].pos;
        state.packets.push(Packet {
            pos: origin,
            target,
            progress: 0.0,
            speed: 0.25,
            color: Rgb::hex(0xffffff),
            size: 4.0,
            trail: Trail::new(PACKET_TRAIL_LEN),
        });
        for _ in 0..3 {
            tick(&mut state, &TickInput::default(), &mut quiet());
        }
        // three exponential steps cover 1 - 0.75^3 of the gap
        let expected = origin + (target - origin) * (1.0 - 0.75f32.powi(3));
        assert!(state.packets[0].pos.distance(expected) < 1e-3);
        assert_eq!(state.packets[0].trail.len(), 3);
    }

    #[test]
    fn test_particle_friction_and_removal() {
        let mut state = circuit();
        state.particles.push(Particle {
            pos: Vec2::ZERO,
            vel: Vec2::new(10.0, 0.0),
            color: Rgb::hex(0xffffff),
            life: 0.05,
            decay: 0.03,
            size: 2.0,
        });
        tick(&mut state, &TickInput::default(), &mut quiet());
        let p = &state.particles[0];
        assert_eq!(p.pos, Vec2::new(10.0, 0.0));
        assert!((p.vel.x - 9.8).abs() < 1e-5);
        tick(&mut state, &TickInput::default(), &mut quiet());
        assert!(state.particles.is_empty());
    }

    #[test]
    fn test_connection_deadline() {
        let mut state = circuit();
        state.connections.push(Connection::new(NodeId(0), NodeId(1), 0.5));
        activate_connections(&mut state, NodeId(0), &mut quiet());

        for _ in 0..CONNECTION_HOLD_TICKS - 1 {
            tick(&mut state, &TickInput::default(), &mut quiet());
        }
        assert!(state.connections[0].active);
        tick(&mut state, &TickInput::default(), &mut quiet());
        assert!(!state.connections[0].active);
        assert_eq!(state.connections[0].deactivate_at, None);
    }

    #[test]
    fn test_reactivation_extends_hold() {
        let mut state = circuit();
        state.connections.push(Connection::new(NodeId(0), NodeId(1), 0.5));
        activate_connections(&mut state, NodeId(0), &mut quiet());
        for _ in 0..100 {
            tick(&mut state, &TickInput::default(), &mut quiet());
        }
        activate_connections(&mut state, NodeId(1), &mut quiet());
        for _ in 0..100 {
            tick(&mut state, &TickInput::default(), &mut quiet());
        }
        assert!(state.connections[0].active);
        assert_eq!(state.connections[0].deactivate_at, Some(100 + CONNECTION_HOLD_TICKS));
    }

    #[test]
    fn test_hover_lights_connections_without_collecting() {
        let mut state = circuit();
        state.connections.push(Connection::new(NodeId(2), NodeId(5), 0.5));
        let power = state.nodes[2].power;
        let input = TickInput {
            pointer: Some(state.nodes[2].pos),
        };
        tick(&mut state, &input, &mut quiet());
        assert!(state.connections[0].active);
        assert_eq!(state.nodes[2].power, power);
        assert!(state.particles.is_empty());
        assert!(state.events().is_empty());
    }

    #[test]
    fn test_bubble_falls_and_exits() {
        let mut state = waterfall();
        let topic = state.catalog.topics()[0].clone();
        state.push_bubble(&topic, Vec2::new(100.0, -50.0), 2.0, 0.0);

        let mut ticks = 0;
        while let Some(b) = state.bubbles.first() {
            assert!(b.pos.y <= 700.0);
            assert!(b.trail.len() <= BUBBLE_TRAIL_LEN);
            tick(&mut state, &TickInput::default(), &mut quiet());
            ticks += 1;
            assert!(ticks < 1000);
        }
        // y reaches 702 on tick 376
        assert_eq!(ticks, 376);
    }

    #[test]
    fn test_bubble_wobble() {
        let mut state = waterfall();
        let topic = state.catalog.topics()[0].clone();
        state.push_bubble(&topic, Vec2::new(100.0, 0.0), 2.0, 0.0);
        tick(&mut state, &TickInput::default(), &mut quiet());
        let b = &state.bubbles[0];
        assert_eq!(b.pos.y, 2.0);
        assert!((b.pos.x - (100.0 + (0.02f32).sin() * 0.5)).abs() < 1e-5);
        assert!((b.wobble_phase - WOBBLE_STEP).abs() < 1e-6);
    }

    #[test]
    fn test_forced_bubble_spawn() {
        let mut state = waterfall();
        // toggle roll, spawn roll, lane 4 of 5, topic 0, speed, wobble
        let mut rng = ScriptedRandom::new([0.99, 0.0, 0.9, 0.0], 0.5);
        tick(&mut state, &TickInput::default(), &mut rng);
        assert_eq!(state.bubbles.len(), 1);
        let b = &state.bubbles[0];
        assert_eq!(b.pos, Vec2::new(500.0, BUBBLE_SPAWN_Y));
        assert_eq!(b.topic, "ICT Basics");
        assert_eq!(b.radius, 40.0);
    }

    #[test]
    fn test_waterfall_never_spawns_packets() {
        let mut state = waterfall();
        for _ in 0..50 {
            tick(&mut state, &TickInput::default(), &mut FixedRandom(0.0));
        }
        assert!(state.packets.is_empty());
        assert!(state.nodes.is_empty());
        assert!(!state.bubbles.is_empty());
    }

    #[test]
    fn test_determinism() {
        let mut a = SceneState::new(Variant::Circuit, Catalog::circuit(11), Vec2::new(800.0, 500.0));
        let mut b = a.clone();
        let (mut rng_a, mut rng_b) = (seeded(99), seeded(99));
        layout(&mut a, &mut rng_a);
        layout(&mut b, &mut rng_b);
        let input = TickInput {
            pointer: Some(Vec2::new(400.0, 250.0)),
        };
        for _ in 0..300 {
            tick(&mut a, &input, &mut rng_a);
            tick(&mut b, &input, &mut rng_b);
        }
        assert_eq!(a.packets.len(), b.packets.len());
        assert_eq!(a.particles.len(), b.particles.len());
        assert_eq!(a.active_node_count(), b.active_node_count());
    }

    proptest! {
        #[test]
        fn prop_particle_life_decays_exactly(decay in 0.01f32..0.2, life in 0.05f32..1.0) {
            let mut state = circuit();
            state.particles.push(Particle {
                pos: Vec2::ZERO,
                vel: Vec2::ZERO,
                color: Rgb::hex(0xffffff),
                life,
                decay,
                size: 2.0,
            });
            let mut expected = life;
            loop {
                tick(&mut state, &TickInput::default(), &mut quiet());
                expected -= decay;
                if expected <= 0.0 {
                    prop_assert!(state.particles.is_empty());
                    break;
                }
                prop_assert_eq!(state.particles.len(), 1);
                prop_assert_eq!(state.particles[0].life, expected);
            }
        }

        #[test]
        fn prop_trails_bounded_over_long_runs(seed in 0u64..64, ticks in 1usize..600) {
            let mut state = SceneState::new(Variant::Circuit, Catalog::circuit(10), Vec2::new(900.0, 600.0));
            let mut rng = seeded(seed);
            layout(&mut state, &mut rng);
            for _ in 0..ticks {
                tick(&mut state, &TickInput::default(), &mut rng);
                for p in &state.packets {
                    prop_assert!(p.trail.len() <= PACKET_TRAIL_LEN);
                }
            }
        }
    }
}
