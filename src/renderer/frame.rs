//! Render pass
//!
//! Pure function of the scene, the pointer and the settings. Layers, back to
//! front: fade, grid, connections or stream lanes, nodes or bubbles, packets
//! and falling trails, particles.

use glam::Vec2;

use super::shapes::{self, Glyph};
use super::surface::{ColorStop, Paint, Path, Rgba, Surface, TextAlign};
use crate::catalog::{Rgb, Tag};
use crate::consts::GRID_SPACING;
use crate::settings::Settings;
use crate::sim::interaction::{bubble_hovered, node_hovered};
use crate::sim::state::{Bubble, Connection, Node, SceneState, Trail, Variant};

/// Page background, composited at low alpha each frame
pub const BACKGROUND: Rgb = Rgb::new(15, 23, 42);

const LABEL_FONT: &str = "bold 12px Arial";
const BUBBLE_FONT: &str = "bold 11px Arial";

/// Draw one frame of `state`
pub fn render(state: &SceneState, pointer: Option<Vec2>, settings: &Settings, surface: &mut impl Surface) {
    let size = surface.size();

    surface.save();
    surface.set_fill(BACKGROUND.alpha(settings.fade_alpha()).into());
    surface.fill_rect(Vec2::ZERO, size);
    surface.restore();

    if settings.grid_enabled() {
        draw_grid(state.catalog.accent, size, surface);
    }

    match state.variant {
        Variant::Circuit => {
            for conn in &state.connections {
                draw_connection(state, conn, settings, surface);
            }
            for node in &state.nodes {
                draw_node(node, node_hovered(node, pointer), settings, surface);
            }
        }
        Variant::Waterfall { .. } => {
            draw_streams(state, size, surface);
            for bubble in &state.bubbles {
                draw_bubble(bubble, bubble_hovered(bubble, pointer), settings, surface);
            }
        }
    }

    for bubble in &state.bubbles {
        draw_trail(&bubble.trail, bubble.color, bubble.radius * 0.3, settings, surface);
    }
    for packet in &state.packets {
        draw_trail(&packet.trail, packet.color, packet.size, settings, surface);

        surface.save();
        surface.set_fill(packet.color.into());
        glow(surface, settings, packet.color.into(), 15.0);
        surface.fill_path(&Path::new().circle(packet.pos, packet.size));
        surface.set_fill(Rgba::WHITE.with_alpha(0.8).into());
        surface.fill_path(&Path::new().circle(packet.pos - Vec2::splat(packet.size * 0.3), packet.size * 0.4));
        surface.restore();
    }

    for particle in &state.particles {
        surface.save();
        surface.set_alpha(particle.life.clamp(0.0, 1.0));
        surface.set_fill(particle.color.into());
        glow(surface, settings, particle.color.into(), 8.0);
        surface.fill_path(&Path::new().circle(particle.pos, particle.size));
        surface.restore();
    }
}

/// Info line for the first hovered node or bubble, if any
pub fn hover_caption(state: &SceneState, pointer: Option<Vec2>) -> Option<String> {
    let topic = match state.variant {
        Variant::Circuit => state
            .nodes
            .iter()
            .find(|n| node_hovered(n, pointer))
            .map(|n| n.topic.as_str()),
        Variant::Waterfall { .. } => state
            .bubbles
            .iter()
            .find(|b| bubble_hovered(b, pointer))
            .map(|b| b.topic.as_str()),
    }?;
    state.catalog.describe(topic)
}

/// Shadow blur scaled by the glow setting
fn glow(surface: &mut impl Surface, settings: &Settings, color: Rgba, blur: f32) {
    surface.set_shadow(color, blur * settings.glow_scale());
}

fn draw_grid(accent: Rgb, size: Vec2, surface: &mut impl Surface) {
    let mut path = Path::new();
    let mut x = 0.0;
    while x < size.x {
        path = path.move_to(Vec2::new(x, 0.0)).line_to(Vec2::new(x, size.y));
        x += GRID_SPACING;
    }
    let mut y = 0.0;
    while y < size.y {
        path = path.move_to(Vec2::new(0.0, y)).line_to(Vec2::new(size.x, y));
        y += GRID_SPACING;
    }

    surface.save();
    surface.set_stroke(accent.alpha(0.1).into(), 1.0);
    surface.stroke_path(&path);
    surface.restore();
}

/// Curved trace between two nodes. Missing endpoints are skipped.
fn draw_connection(state: &SceneState, conn: &Connection, settings: &Settings, surface: &mut impl Surface) {
    let (Some(from), Some(to)) = (state.node(conn.from), state.node(conn.to)) else {
        return;
    };
    let accent = state.catalog.accent;
    let alpha = if conn.active { 0.8 } else { 0.3 };

    surface.save();
    surface.set_stroke(
        Paint::Linear {
            from: from.pos,
            to: to.pos,
            stops: vec![
                ColorStop::new(0.0, accent.alpha(alpha)),
                ColorStop::new(0.5, accent.alpha(alpha * 1.5)),
                ColorStop::new(1.0, accent.alpha(alpha)),
            ],
        },
        if conn.active { 4.0 } else { 2.0 },
    );
    glow(surface, settings, accent.alpha(0.5), if conn.active { 10.0 } else { 0.0 });

    let ctrl = (from.pos + to.pos) / 2.0 + Vec2::new(20.0, 0.0);
    surface.stroke_path(&Path::new().move_to(from.pos).quad_to(ctrl, to.pos));
    surface.restore();
}

fn draw_node(node: &Node, hovered: bool, settings: &Settings, surface: &mut impl Surface) {
    surface.save();

    if node.active || hovered {
        let halo = node.radius * if hovered { 3.0 } else { 2.0 };
        surface.set_fill(Paint::Radial {
            center: node.pos,
            inner: 0.0,
            outer: halo,
            stops: vec![
                ColorStop::new(0.0, node.color.alpha(0.3)),
                ColorStop::new(1.0, Rgba::TRANSPARENT),
            ],
        });
        surface.fill_path(&Path::new().circle(node.pos, halo));
    }

    // Power dims the body, never below 60%
    surface.set_alpha(0.6 + 0.4 * node.power.clamp(0.0, 1.0));
    surface.set_fill(node.color.into());
    glow(surface, settings, node.color.into(), if hovered { 20.0 } else { 10.0 });

    let radius = node.radius * node.pulse_scale();
    match node.tag {
        Tag::Category(category) => {
            surface.fill_path(&shapes::body(category, node.pos, radius));
            match shapes::glyph(category, node.pos, radius) {
                Glyph::Stroke { path, width, alpha } => {
                    surface.set_stroke(Rgba::WHITE.with_alpha(alpha).into(), width);
                    surface.stroke_path(&path);
                }
                Glyph::Fill { path, alpha } => {
                    surface.set_fill(Rgba::WHITE.with_alpha(alpha).into());
                    surface.fill_path(&path);
                }
            }
        }
        Tag::Tier(_) => surface.fill_path(&Path::new().circle(node.pos, radius)),
    }

    if hovered && settings.labels {
        surface.set_alpha(1.0);
        surface.set_fill(Rgba::WHITE.into());
        surface.fill_text(
            &node.topic,
            node.pos - Vec2::new(0.0, node.radius + 15.0),
            LABEL_FONT,
            TextAlign::Center,
        );
    }

    surface.restore();
}

/// Faint vertical lanes under the bubbles
fn draw_streams(state: &SceneState, size: Vec2, surface: &mut impl Surface) {
    let accent = state.catalog.accent;
    for &x in &state.streams {
        surface.save();
        surface.set_stroke(
            Paint::Linear {
                from: Vec2::new(x, 0.0),
                to: Vec2::new(x, size.y),
                stops: vec![
                    ColorStop::new(0.0, accent.alpha(0.0)),
                    ColorStop::new(0.5, accent.alpha(0.15)),
                    ColorStop::new(1.0, accent.alpha(0.0)),
                ],
            },
            2.0,
        );
        surface.stroke_path(&Path::new().move_to(Vec2::new(x, 0.0)).line_to(Vec2::new(x, size.y)));
        surface.restore();
    }
}

fn draw_bubble(bubble: &Bubble, hovered: bool, settings: &Settings, surface: &mut impl Surface) {
    let radius = bubble.radius * if hovered { 1.2 } else { 1.0 };
    surface.save();

    if hovered {
        surface.set_fill(Paint::Radial {
            center: bubble.pos,
            inner: 0.0,
            outer: radius * 2.0,
            stops: vec![
                ColorStop::new(0.0, bubble.color.alpha(0.3)),
                ColorStop::new(1.0, Rgba::TRANSPARENT),
            ],
        });
        surface.fill_path(&Path::new().circle(bubble.pos, radius * 2.0));
    }

    surface.set_fill(Paint::Radial {
        center: bubble.pos - Vec2::splat(radius * 0.3),
        inner: 0.0,
        outer: radius,
        stops: vec![
            ColorStop::new(0.0, Rgba::WHITE.with_alpha(0.8)),
            ColorStop::new(0.3, bubble.color.alpha(0.9)),
            ColorStop::new(1.0, bubble.color.alpha(0.4)),
        ],
    });
    glow(surface, settings, bubble.color.into(), if hovered { 20.0 } else { 10.0 });
    surface.fill_path(&Path::new().circle(bubble.pos, radius));

    surface.set_shadow(Rgba::TRANSPARENT, 0.0);
    surface.set_fill(Rgba::WHITE.into());
    surface.fill_text(&bubble.topic, bubble.pos, BUBBLE_FONT, TextAlign::Center);

    if hovered && settings.labels {
        surface.fill_text(
            bubble.tag.as_str(),
            bubble.pos - Vec2::new(0.0, radius + 15.0),
            LABEL_FONT,
            TextAlign::Center,
        );
    }

    surface.restore();
}

/// Oldest point most transparent. Reduced quality drops the oldest points.
fn draw_trail(trail: &Trail, color: Rgb, size: f32, settings: &Settings, surface: &mut impl Surface) {
    let len = trail.len();
    let shown = settings.trail_points(len);
    if shown == 0 {
        return;
    }

    surface.save();
    surface.set_fill(color.into());
    for (i, point) in trail.iter().enumerate().skip(len - shown) {
        let alpha = i as f32 / len as f32 * 0.5;
        surface.set_alpha(alpha);
        surface.fill_path(&Path::new().circle(*point, size * (alpha + 0.3)));
    }
    surface.restore();
}
