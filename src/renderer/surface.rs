//! Drawing surface abstraction
//!
//! The render pass only talks to [`Surface`]. The browser backend maps it onto
//! a 2D canvas context; tests and the native demo use a recording backend.

use glam::Vec2;

use crate::catalog::Rgb;

/// Straight (non-premultiplied) RGBA color, alpha in 0..=1
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0.0);
    pub const WHITE: Rgba = Rgba::new(255, 255, 255, 1.0);

    pub const fn new(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn from_rgb(rgb: Rgb, a: f32) -> Self {
        Self::new(rgb.r, rgb.g, rgb.b, a.clamp(0.0, 1.0))
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Self {
            a: a.clamp(0.0, 1.0),
            ..self
        }
    }

    /// CSS `rgba(...)` form
    pub fn css(&self) -> String {
        format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

impl From<Rgb> for Rgba {
    fn from(rgb: Rgb) -> Self {
        Self::from_rgb(rgb, 1.0)
    }
}

/// Gradient color stop, offset in 0..=1
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorStop {
    pub offset: f32,
    pub color: Rgba,
}

impl ColorStop {
    pub fn new(offset: f32, color: Rgba) -> Self {
        Self { offset, color }
    }
}

/// Fill or stroke source
#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    Solid(Rgba),
    Linear {
        from: Vec2,
        to: Vec2,
        stops: Vec<ColorStop>,
    },
    Radial {
        center: Vec2,
        inner: f32,
        outer: f32,
        stops: Vec<ColorStop>,
    },
}

impl From<Rgba> for Paint {
    fn from(c: Rgba) -> Self {
        Paint::Solid(c)
    }
}

impl From<Rgb> for Paint {
    fn from(c: Rgb) -> Self {
        Paint::Solid(c.into())
    }
}

/// Single path command, mirroring the canvas path API
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCmd {
    MoveTo(Vec2),
    LineTo(Vec2),
    QuadTo { ctrl: Vec2, to: Vec2 },
    Arc { center: Vec2, radius: f32, start: f32, end: f32 },
    Rect { origin: Vec2, size: Vec2 },
    Close,
}

/// Retained path, built with chained calls
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Path {
    cmds: Vec<PathCmd>,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn move_to(mut self, p: Vec2) -> Self {
        self.cmds.push(PathCmd::MoveTo(p));
        self
    }

    pub fn line_to(mut self, p: Vec2) -> Self {
        self.cmds.push(PathCmd::LineTo(p));
        self
    }

    pub fn quad_to(mut self, ctrl: Vec2, to: Vec2) -> Self {
        self.cmds.push(PathCmd::QuadTo { ctrl, to });
        self
    }

    pub fn arc(mut self, center: Vec2, radius: f32, start: f32, end: f32) -> Self {
        self.cmds.push(PathCmd::Arc {
            center,
            radius: radius.max(0.0),
            start,
            end,
        });
        self
    }

    /// Full circle
    pub fn circle(self, center: Vec2, radius: f32) -> Self {
        self.arc(center, radius, 0.0, std::f32::consts::TAU)
    }

    pub fn rect(mut self, origin: Vec2, size: Vec2) -> Self {
        self.cmds.push(PathCmd::Rect { origin, size });
        self
    }

    /// Rounded rectangle built from quadratic corners
    pub fn round_rect(self, origin: Vec2, size: Vec2, radius: f32) -> Self {
        let r = radius.min(size.x / 2.0).min(size.y / 2.0).max(0.0);
        let (x, y, w, h) = (origin.x, origin.y, size.x, size.y);
        self.move_to(Vec2::new(x + r, y))
            .line_to(Vec2::new(x + w - r, y))
            .quad_to(Vec2::new(x + w, y), Vec2::new(x + w, y + r))
            .line_to(Vec2::new(x + w, y + h - r))
            .quad_to(Vec2::new(x + w, y + h), Vec2::new(x + w - r, y + h))
            .line_to(Vec2::new(x + r, y + h))
            .quad_to(Vec2::new(x, y + h), Vec2::new(x, y + h - r))
            .line_to(Vec2::new(x, y + r))
            .quad_to(Vec2::new(x, y), Vec2::new(x + r, y))
            .close()
    }

    /// Closed polygon through the given points
    pub fn polygon(mut self, points: &[Vec2]) -> Self {
        let Some((first, rest)) = points.split_first() else {
            return self;
        };
        self = self.move_to(*first);
        for p in rest {
            self = self.line_to(*p);
        }
        self.close()
    }

    pub fn close(mut self) -> Self {
        self.cmds.push(PathCmd::Close);
        self
    }

    pub fn cmds(&self) -> &[PathCmd] {
        &self.cmds
    }

    pub fn is_empty(&self) -> bool {
        self.cmds.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    Left,
    #[default]
    Center,
    Right,
}

impl TextAlign {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
            TextAlign::Right => "right",
        }
    }
}

/// 2D raster target.
///
/// State setters (`set_*`) follow canvas semantics: they persist until changed
/// or until the matching `restore`.
pub trait Surface {
    /// Current size in surface units
    fn size(&self) -> Vec2;

    fn save(&mut self);
    fn restore(&mut self);

    fn set_fill(&mut self, paint: Paint);
    fn set_stroke(&mut self, paint: Paint, width: f32);
    /// Global alpha multiplier for subsequent draws
    fn set_alpha(&mut self, alpha: f32);
    /// Drop shadow used as glow; `blur == 0` disables it
    fn set_shadow(&mut self, color: Rgba, blur: f32);

    fn fill_rect(&mut self, origin: Vec2, size: Vec2);
    fn fill_path(&mut self, path: &Path);
    fn stroke_path(&mut self, path: &Path);
    fn fill_text(&mut self, text: &str, at: Vec2, font: &str, align: TextAlign);
}
