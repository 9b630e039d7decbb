//! Shape generation for node bodies
//!
//! Each category has a body outline and a white glyph drawn over it. Sizes
//! scale with the pulsed radius.

use glam::Vec2;
use std::f32::consts::{FRAC_PI_2, FRAC_PI_3};

use super::surface::Path;
use crate::catalog::Category;

/// Filled body outline
pub fn body(category: Category, center: Vec2, radius: f32) -> Path {
    match category {
        Category::Processor => processor_body(center, radius),
        Category::Memory => memory_body(center, radius),
        Category::Network => Path::new().polygon(&hexagon(center, radius)),
        Category::Interface => Path::new().polygon(&diamond(center, radius)),
        Category::Shield => Path::new().polygon(&shield(center, radius)),
    }
}

/// Processor: rounded square, side `1.5r`
fn processor_body(center: Vec2, radius: f32) -> Path {
    let size = radius * 1.5;
    Path::new().round_rect(center - Vec2::splat(size / 2.0), Vec2::splat(size), 5.0)
}

/// Memory: rounded chip, `2r x 1.2r`
fn memory_body(center: Vec2, radius: f32) -> Path {
    let size = Vec2::new(radius * 2.0, radius * 1.2);
    Path::new().round_rect(center - size / 2.0, size, 3.0)
}

fn hexagon(center: Vec2, radius: f32) -> [Vec2; 6] {
    std::array::from_fn(|i| center + Vec2::from_angle(i as f32 * FRAC_PI_3) * radius)
}

fn diamond(center: Vec2, radius: f32) -> [Vec2; 4] {
    [
        center + Vec2::new(0.0, -radius),
        center + Vec2::new(radius, 0.0),
        center + Vec2::new(0.0, radius),
        center + Vec2::new(-radius, 0.0),
    ]
}

/// Pointed-bottom shield pentagon
fn shield(center: Vec2, radius: f32) -> [Vec2; 6] {
    [
        center + Vec2::new(0.0, -radius),
        center + Vec2::new(radius * 0.8, -radius * 0.3),
        center + Vec2::new(radius * 0.8, radius * 0.5),
        center + Vec2::new(0.0, radius),
        center + Vec2::new(-radius * 0.8, radius * 0.5),
        center + Vec2::new(-radius * 0.8, -radius * 0.3),
    ]
}

/// How a glyph is painted
#[derive(Debug, Clone, PartialEq)]
pub enum Glyph {
    /// Stroked with the given width and white alpha
    Stroke { path: Path, width: f32, alpha: f32 },
    /// Filled white at the given alpha
    Fill { path: Path, alpha: f32 },
}

/// Category marking drawn over the body
pub fn glyph(category: Category, center: Vec2, radius: f32) -> Glyph {
    match category {
        Category::Processor => {
            // 3x3 grid lines across the die
            let size = radius * 1.5;
            let half = size / 2.0;
            let mut path = Path::new();
            for i in 1..3 {
                let offset = size / 3.0 * i as f32 - half;
                path = path
                    .move_to(center + Vec2::new(-half, offset))
                    .line_to(center + Vec2::new(half, offset))
                    .move_to(center + Vec2::new(offset, -half))
                    .line_to(center + Vec2::new(offset, half));
            }
            Glyph::Stroke {
                path,
                width: 1.0,
                alpha: 0.6,
            }
        }
        Category::Memory => {
            // four horizontal cell segments
            let size = Vec2::new(radius * 2.0, radius * 1.2);
            let top_left = center - size / 2.0;
            let mut path = Path::new();
            for i in 0..4 {
                let y = top_left.y + size.y / 4.0 * i as f32 + 2.0;
                path = path.rect(
                    Vec2::new(top_left.x + 5.0, y),
                    Vec2::new((size.x - 10.0).max(0.0), (size.y / 4.0 - 4.0).max(0.0)),
                );
            }
            Glyph::Fill { path, alpha: 0.3 }
        }
        Category::Network => {
            // hub ring with four spokes
            let mut path = Path::new().circle(center, radius * 0.3);
            for i in 0..4 {
                let dir = Vec2::from_angle(i as f32 * FRAC_PI_2);
                path = path.move_to(center).line_to(center + dir * radius * 0.6);
            }
            Glyph::Stroke {
                path,
                width: 2.0,
                alpha: 0.8,
            }
        }
        Category::Interface => Glyph::Stroke {
            path: cross(center, radius * 0.5, radius * 0.5),
            width: 2.0,
            alpha: 0.6,
        },
        Category::Shield => Glyph::Stroke {
            path: cross(center, radius * 0.3, radius * 0.4),
            width: 2.0,
            alpha: 0.8,
        },
    }
}

fn cross(center: Vec2, half_w: f32, half_h: f32) -> Path {
    Path::new()
        .move_to(center - Vec2::new(half_w, 0.0))
        .line_to(center + Vec2::new(half_w, 0.0))
        .move_to(center - Vec2::new(0.0, half_h))
        .line_to(center + Vec2::new(0.0, half_h))
}
