//! `RasterTarget` on a 2D canvas context
//!
//! The visible mask draws straight into the mounted `<canvas>`; the
//! accumulation layer is a detached offscreen canvas. Blob holes use the
//! context's `blur()` filter with `destination-out`, strokes use round caps
//! and joins, so the browser's rasterizer does the per-pixel work.

use glam::Vec2;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement};

use crate::error::OverlayError;
use crate::renderer::{Color, CompositeMode, Paint, RasterTarget};

/// A canvas element and its 2D context, with a logical-to-device scale
#[derive(Debug, Clone)]
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    context: CanvasRenderingContext2d,
    scale: f32,
}

impl CanvasSurface {
    /// Wrap `canvas`; fails if it has no 2D context
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, OverlayError> {
        let context = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .and_then(|ctx| ctx.dyn_into::<CanvasRenderingContext2d>().ok())
            .ok_or(OverlayError::ContextUnavailable)?;
        Ok(Self {
            canvas,
            context,
            scale: 1.0,
        })
    }

    /// A detached canvas, never attached to the document
    pub fn offscreen(document: &Document) -> Result<Self, OverlayError> {
        let canvas = document
            .create_element("canvas")
            .ok()
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
            .ok_or(OverlayError::ContextUnavailable)?;
        Self::new(canvas)
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    fn device_size(&self) -> (f64, f64) {
        (f64::from(self.canvas.width()), f64::from(self.canvas.height()))
    }

    fn apply_scale(&self) {
        let s = f64::from(self.scale);
        check(self.context.set_transform(s, 0.0, 0.0, s, 0.0, 0.0), "setTransform");
    }

    fn reset_transform(&self) {
        check(self.context.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0), "setTransform");
    }

    /// Run `draw` with `paint` applied; context state is restored afterwards
    fn with_paint(&self, paint: &Paint, draw: impl FnOnce(&CanvasRenderingContext2d)) {
        let ctx = &self.context;
        ctx.save();
        check(
            ctx.set_global_composite_operation(composite_operation(paint.mode)),
            "globalCompositeOperation",
        );
        let style = css_color(paint.color);
        ctx.set_fill_style_str(&style);
        ctx.set_stroke_style_str(&style);

        // Filter lengths ignore the transform, so scale to device px here
        let (w, h) = self.device_size();
        let sigma = (f64::from(paint.blur.max(0.0)) * f64::from(self.scale)).min(w.max(h));
        if sigma > 0.0 {
            ctx.set_filter(&format!("blur({sigma}px)"));
        }

        draw(ctx);
        ctx.restore();
    }
}

impl RasterTarget for CanvasSurface {
    fn resize(&mut self, width: u32, height: u32) {
        // Assigning either dimension also resets the context state
        self.canvas.set_width(width.max(1));
        self.canvas.set_height(height.max(1));
        self.apply_scale();
    }

    fn set_scale(&mut self, scale: f32) {
        self.scale = if scale.is_finite() && scale > 0.0 { scale } else { 1.0 };
        self.apply_scale();
    }

    fn clear(&mut self) {
        let (w, h) = self.device_size();
        self.context.save();
        self.reset_transform();
        self.context.clear_rect(0.0, 0.0, w, h);
        self.context.restore();
    }

    fn fill(&mut self, paint: &Paint) {
        let (w, h) = self.device_size();
        self.with_paint(paint, |ctx| {
            check(ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0), "setTransform");
            ctx.fill_rect(0.0, 0.0, w, h);
        });
    }

    fn fill_polygon(&mut self, points: &[Vec2], paint: &Paint) {
        let [first, rest @ ..] = points else {
            return;
        };
        if rest.len() < 2 {
            return;
        }
        self.with_paint(paint, |ctx| {
            ctx.begin_path();
            ctx.move_to(f64::from(first.x), f64::from(first.y));
            for p in rest {
                ctx.line_to(f64::from(p.x), f64::from(p.y));
            }
            ctx.close_path();
            ctx.fill();
        });
    }

    fn stroke_segment(&mut self, from: Vec2, to: Vec2, width: f32, paint: &Paint) {
        if width.is_nan() || width <= 0.0 {
            return;
        }
        self.with_paint(paint, |ctx| {
            ctx.set_line_width(f64::from(width));
            ctx.set_line_cap("round");
            ctx.set_line_join("round");
            ctx.begin_path();
            ctx.move_to(f64::from(from.x), f64::from(from.y));
            ctx.line_to(f64::from(to.x), f64::from(to.y));
            ctx.stroke();
        });
    }

    fn draw_surface(&mut self, src: &Self, mode: CompositeMode) {
        let ctx = &self.context;
        ctx.save();
        check(
            ctx.set_global_composite_operation(composite_operation(mode)),
            "globalCompositeOperation",
        );
        self.reset_transform();
        check(
            ctx.draw_image_with_html_canvas_element(&src.canvas, 0.0, 0.0),
            "drawImage",
        );
        ctx.restore();
    }
}

fn composite_operation(mode: CompositeMode) -> &'static str {
    match mode {
        CompositeMode::SourceOver => "source-over",
        CompositeMode::DestinationOut => "destination-out",
    }
}

fn css_color(color: Color) -> String {
    let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    format!(
        "rgba({}, {}, {}, {})",
        channel(color.r),
        channel(color.g),
        channel(color.b),
        color.a.clamp(0.0, 1.0)
    )
}

fn check(result: Result<(), JsValue>, what: &str) {
    if let Err(e) = result {
        log::warn!("{what} failed: {:?}", e);
    }
}
