//! Canvas 2D backend (WASM only)

use glam::Vec2;
use web_sys::{CanvasGradient, CanvasRenderingContext2d, HtmlCanvasElement};

use super::surface::{Paint, Path, PathCmd, Rgba, Surface, TextAlign};

/// [`Surface`] over an `HtmlCanvasElement`'s 2D context
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn new(canvas: HtmlCanvasElement, ctx: CanvasRenderingContext2d) -> Self {
        Self { canvas, ctx }
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    /// Match the backing store to the element's laid-out size
    pub fn fit_to_element(&self) {
        let (w, h) = (self.canvas.offset_width(), self.canvas.offset_height());
        if w > 0 && h > 0 && (w as u32 != self.canvas.width() || h as u32 != self.canvas.height()) {
            self.canvas.set_width(w as u32);
            self.canvas.set_height(h as u32);
        }
    }

    fn gradient(&self, paint: &Paint) -> Option<CanvasGradient> {
        let (gradient, stops) = match paint {
            Paint::Solid(_) => return None,
            Paint::Linear { from, to, stops } => (
                self.ctx
                    .create_linear_gradient(from.x as f64, from.y as f64, to.x as f64, to.y as f64),
                stops,
            ),
            Paint::Radial {
                center,
                inner,
                outer,
                stops,
            } => (
                self.ctx
                    .create_radial_gradient(
                        center.x as f64,
                        center.y as f64,
                        *inner as f64,
                        center.x as f64,
                        center.y as f64,
                        *outer as f64,
                    )
                    .ok()?,
                stops,
            ),
        };
        for stop in stops {
            let _ = gradient.add_color_stop(stop.offset.clamp(0.0, 1.0), &stop.color.css());
        }
        Some(gradient)
    }

    fn trace(&self, path: &Path) {
        self.ctx.begin_path();
        for cmd in path.cmds() {
            match *cmd {
                PathCmd::MoveTo(p) => self.ctx.move_to(p.x as f64, p.y as f64),
                PathCmd::LineTo(p) => self.ctx.line_to(p.x as f64, p.y as f64),
                PathCmd::QuadTo { ctrl, to } => {
                    self.ctx
                        .quadratic_curve_to(ctrl.x as f64, ctrl.y as f64, to.x as f64, to.y as f64)
                }
                PathCmd::Arc {
                    center,
                    radius,
                    start,
                    end,
                } => {
                    let _ = self.ctx.arc(
                        center.x as f64,
                        center.y as f64,
                        radius as f64,
                        start as f64,
                        end as f64,
                    );
                }
                PathCmd::Rect { origin, size } => {
                    self.ctx
                        .rect(origin.x as f64, origin.y as f64, size.x as f64, size.y as f64)
                }
                PathCmd::Close => self.ctx.close_path(),
            }
        }
    }
}

impl Surface for CanvasSurface {
    fn size(&self) -> Vec2 {
        Vec2::new(self.canvas.width() as f32, self.canvas.height() as f32)
    }

    fn save(&mut self) {
        self.ctx.save();
    }

    fn restore(&mut self) {
        self.ctx.restore();
    }

    fn set_fill(&mut self, paint: Paint) {
        match &paint {
            Paint::Solid(color) => self.ctx.set_fill_style_str(&color.css()),
            _ => {
                if let Some(gradient) = self.gradient(&paint) {
                    self.ctx.set_fill_style_canvas_gradient(&gradient);
                }
            }
        }
    }

    fn set_stroke(&mut self, paint: Paint, width: f32) {
        match &paint {
            Paint::Solid(color) => self.ctx.set_stroke_style_str(&color.css()),
            _ => {
                if let Some(gradient) = self.gradient(&paint) {
                    self.ctx.set_stroke_style_canvas_gradient(&gradient);
                }
            }
        }
        self.ctx.set_line_width(width as f64);
    }

    fn set_alpha(&mut self, alpha: f32) {
        self.ctx.set_global_alpha(alpha.clamp(0.0, 1.0) as f64);
    }

    fn set_shadow(&mut self, color: Rgba, blur: f32) {
        self.ctx.set_shadow_color(&color.css());
        self.ctx.set_shadow_blur(blur.max(0.0) as f64);
    }

    fn fill_rect(&mut self, origin: Vec2, size: Vec2) {
        self.ctx
            .fill_rect(origin.x as f64, origin.y as f64, size.x as f64, size.y as f64);
    }

    fn fill_path(&mut self, path: &Path) {
        self.trace(path);
        self.ctx.fill();
    }

    fn stroke_path(&mut self, path: &Path) {
        self.trace(path);
        self.ctx.stroke();
    }

    fn fill_text(&mut self, text: &str, at: Vec2, font: &str, align: TextAlign) {
        self.ctx.set_font(font);
        self.ctx.set_text_align(align.as_str());
        let _ = self.ctx.fill_text(text, at.x as f64, at.y as f64);
    }
}
