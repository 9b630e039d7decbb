//! Capturing surface
//!
//! Records every call as a [`DrawCmd`]. Used by tests and the native headless
//! demo in place of a browser canvas.

use glam::Vec2;

use super::surface::{Paint, Path, PathCmd, Rgba, Surface, TextAlign};

/// One recorded surface call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    Save,
    Restore,
    SetFill(Paint),
    SetStroke(Paint, f32),
    SetAlpha(f32),
    SetShadow(Rgba, f32),
    FillRect { origin: Vec2, size: Vec2 },
    FillPath(Path),
    StrokePath(Path),
    FillText {
        text: String,
        at: Vec2,
        font: String,
        align: TextAlign,
    },
}

#[derive(Debug, Clone)]
pub struct RecordingSurface {
    size: Vec2,
    cmds: Vec<DrawCmd>,
    depth: usize,
}

impl RecordingSurface {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            size: Vec2::new(width, height),
            cmds: Vec::new(),
            depth: 0,
        }
    }

    /// Simulate the host resizing the surface
    pub fn resize(&mut self, width: f32, height: f32) {
        self.size = Vec2::new(width, height);
    }

    pub fn cmds(&self) -> &[DrawCmd] {
        &self.cmds
    }

    pub fn clear(&mut self) {
        self.cmds.clear();
    }

    /// Unbalanced `save` calls
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Text drawn so far, in order
    pub fn texts(&self) -> Vec<&str> {
        self.cmds
            .iter()
            .filter_map(|c| match c {
                DrawCmd::FillText { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Every filled arc as `(center, radius)`
    pub fn filled_arcs(&self) -> Vec<(Vec2, f32)> {
        self.cmds
            .iter()
            .filter_map(|c| match c {
                DrawCmd::FillPath(path) => Some(path),
                _ => None,
            })
            .flat_map(|path| path.cmds().iter())
            .filter_map(|c| match c {
                PathCmd::Arc { center, radius, .. } => Some((*center, *radius)),
                _ => None,
            })
            .collect()
    }

    /// Every point passed to a path, rect or text call
    pub fn points(&self) -> Vec<Vec2> {
        let mut out = Vec::new();
        for cmd in &self.cmds {
            match cmd {
                DrawCmd::FillRect { origin, .. } => out.push(*origin),
                DrawCmd::FillText { at, .. } => out.push(*at),
                DrawCmd::FillPath(path) | DrawCmd::StrokePath(path) => {
                    for c in path.cmds() {
                        match *c {
                            PathCmd::MoveTo(p) | PathCmd::LineTo(p) => out.push(p),
                            PathCmd::QuadTo { to, .. } => out.push(to),
                            PathCmd::Arc { center, .. } => out.push(center),
                            PathCmd::Rect { origin, .. } => out.push(origin),
                            PathCmd::Close => {}
                        }
                    }
                }
                _ => {}
            }
        }
        out
    }
}

impl Surface for RecordingSurface {
    fn size(&self) -> Vec2 {
        self.size
    }

    fn save(&mut self) {
        self.depth += 1;
        self.cmds.push(DrawCmd::Save);
    }

    fn restore(&mut self) {
        self.depth = self.depth.saturating_sub(1);
        self.cmds.push(DrawCmd::Restore);
    }

    fn set_fill(&mut self, paint: Paint) {
        self.cmds.push(DrawCmd::SetFill(paint));
    }

    fn set_stroke(&mut self, paint: Paint, width: f32) {
        self.cmds.push(DrawCmd::SetStroke(paint, width));
    }

    fn set_alpha(&mut self, alpha: f32) {
        self.cmds.push(DrawCmd::SetAlpha(alpha));
    }

    fn set_shadow(&mut self, color: Rgba, blur: f32) {
        self.cmds.push(DrawCmd::SetShadow(color, blur));
    }

    fn fill_rect(&mut self, origin: Vec2, size: Vec2) {
        self.cmds.push(DrawCmd::FillRect { origin, size });
    }

    fn fill_path(&mut self, path: &Path) {
        self.cmds.push(DrawCmd::FillPath(path.clone()));
    }

    fn stroke_path(&mut self, path: &Path) {
        self.cmds.push(DrawCmd::StrokePath(path.clone()));
    }

    fn fill_text(&mut self, text: &str, at: Vec2, font: &str, align: TextAlign) {
        self.cmds.push(DrawCmd::FillText {
            text: text.to_string(),
            at,
            font: font.to_string(),
            align,
        });
    }
}
