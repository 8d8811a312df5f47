//! Host-independent overlay
//!
//! Wires the viewport, blob field, compositor and eraser together. Hosts
//! feed it events and frame timestamps; after `unmount` everything they send
//! is ignored.

use glam::Vec2;

use crate::eraser::Eraser;
use crate::field::{BlobField, default_anchors};
use crate::renderer::{Compositor, RasterTarget, Surface};
use crate::settings::OverlaySettings;
use crate::viewport::{Viewport, ViewportManager};

/// Input delivered by the host, in surface-local logical coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OverlayEvent {
    PointerDown(Vec2),
    PointerMove(Vec2),
    PointerUp,
    /// Pointer left the surface mid-drag
    PointerLeave,
    Resize {
        width: f32,
        height: f32,
        pixel_density: f32,
    },
}

/// The mounted overlay, drawing into surfaces of type `S`
#[derive(Debug, Clone)]
pub struct Overlay<S = Surface> {
    settings: OverlaySettings,
    viewports: ViewportManager<S>,
    field: BlobField,
    compositor: Compositor,
    eraser: Eraser,
    mounted: bool,
}

impl Overlay<Surface> {
    /// Overlay rendering into CPU surfaces
    pub fn new(settings: OverlaySettings, width: f32, height: f32, pixel_density: f32) -> Self {
        Self::with_surfaces(settings, Surface::new(1, 1), Surface::new(1, 1), width, height, pixel_density)
    }
}

impl<S: RasterTarget> Overlay<S> {
    /// Overlay rendering into caller-supplied mask and accumulation surfaces
    pub fn with_surfaces(
        settings: OverlaySettings,
        mask: S,
        accumulation: S,
        width: f32,
        height: f32,
        pixel_density: f32,
    ) -> Self {
        let settings = settings.sanitized();
        let viewports = ViewportManager::with_surfaces(mask, accumulation, width, height, pixel_density);
        let field = build_field(&settings, viewports.viewport());
        log::info!(
            "Overlay mounted: {}x{} @{}, {} blobs",
            viewports.viewport().width,
            viewports.viewport().height,
            viewports.viewport().pixel_density,
            field.len()
        );

        Self {
            compositor: Compositor::new(settings.blur_px),
            eraser: Eraser::new(settings.eraser_radius),
            settings,
            viewports,
            field,
            mounted: true,
        }
    }

    pub fn settings(&self) -> &OverlaySettings {
        &self.settings
    }

    pub fn viewport(&self) -> &Viewport {
        self.viewports.viewport()
    }

    pub fn field(&self) -> &BlobField {
        &self.field
    }

    pub fn eraser(&self) -> &Eraser {
        &self.eraser
    }

    /// The visible mask as of the last rendered frame
    pub fn mask(&self) -> &S {
        self.viewports.mask()
    }

    pub fn accumulation(&self) -> &S {
        self.viewports.accumulation()
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Apply one host event; returns whether it was handled
    pub fn handle_event(&mut self, event: OverlayEvent) -> bool {
        if !self.mounted {
            log::trace!("Ignoring {:?} after unmount", event);
            return false;
        }

        match event {
            OverlayEvent::PointerDown(p) => self.eraser.pointer_down(p),
            OverlayEvent::PointerMove(p) => {
                self.eraser.pointer_move(p, self.viewports.accumulation_mut());
            }
            OverlayEvent::PointerUp | OverlayEvent::PointerLeave => self.eraser.pointer_up(),
            OverlayEvent::Resize {
                width,
                height,
                pixel_density,
            } => self.resize(width, height, pixel_density),
        }
        true
    }

    /// Reconfigure for a new viewport; erasure history is discarded
    pub fn resize(&mut self, width: f32, height: f32, pixel_density: f32) {
        if !self.mounted {
            return;
        }
        self.viewports.configure(width, height, pixel_density);
        self.field = build_field(&self.settings, self.viewports.viewport());
        log::info!(
            "Overlay resized to {}x{} @{}",
            self.viewport().width,
            self.viewport().height,
            self.viewport().pixel_density
        );
    }

    /// Render the frame for time `t` (ms); returns false once unmounted
    pub fn render(&mut self, time_ms: f64) -> bool {
        if !self.mounted {
            return false;
        }
        let (mask, accumulation) = self.viewports.surfaces_mut();
        self.compositor
            .render_frame(mask, accumulation, &self.field, time_ms);
        true
    }

    /// Stop accepting events and frames
    pub fn unmount(&mut self) {
        if self.mounted {
            self.mounted = false;
            self.eraser.pointer_up();
            log::info!(
                "Overlay unmounted after {} frames",
                self.compositor.frames()
            );
        }
    }
}

/// Field from the first `blob_count` anchors of the current viewport
fn build_field(settings: &OverlaySettings, viewport: &Viewport) -> BlobField {
    let anchors = default_anchors(viewport);
    let count = settings.blob_count.min(anchors.len());
    BlobField::new(&anchors[..count], &settings.blob_params())
}
