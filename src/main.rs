//! Amoeba Overlay entry point
//!
//! Web: mounts onto the `#overlay` canvas and keeps it mounted for the page's
//! lifetime. Native: renders a scripted erase gesture to a PNG.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_host {
    use std::cell::RefCell;

    use amoeba_overlay::platform::web::{MountHandle, mount_by_id};

    /// Canvas the page-level overlay mounts onto
    const CANVAS_ID: &str = "overlay";

    thread_local! {
        static MOUNTED: RefCell<Option<MountHandle>> = const { RefCell::new(None) };
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Amoeba overlay starting...");

        match mount_by_id(CANVAS_ID, None) {
            Ok(handle) => {
                MOUNTED.with(|m| *m.borrow_mut() = Some(handle));
                log::info!("Amoeba overlay running!");
            }
            // No canvas or no 2d context: the page simply shows no overlay
            Err(e) => log::warn!("Overlay not started: {e}"),
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_host::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Amoeba overlay (native) starting...");
    log::info!("Native mode renders one frame headless - run with `trunk serve` for the live overlay");

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "overlay.png".to_string());

    if let Err(e) = render_scene(&path) {
        log::error!("Failed to write {}: {}", path, e);
        std::process::exit(1);
    }
    log::info!("Wrote {}", path);
}

/// A curved drag across the middle of a 1000x800 viewport, rendered at 1s
#[cfg(not(target_arch = "wasm32"))]
fn render_scene(path: &str) -> Result<(), image::ImageError> {
    use amoeba_overlay::{Overlay, OverlayEvent, OverlaySettings};
    use glam::Vec2;
    use image::ImageEncoder;
    use std::f32::consts::PI;

    let settings = OverlaySettings {
        blob_count: 4,
        ..Default::default()
    };
    let mut overlay = Overlay::new(settings, 1000.0, 800.0, 1.0);

    let start = Vec2::new(350.0, 500.0);
    overlay.handle_event(OverlayEvent::PointerDown(start));
    for step in 1..=24 {
        let t = step as f32 / 24.0;
        let p = start + Vec2::new(300.0 * t, -120.0 * (t * PI).sin());
        overlay.handle_event(OverlayEvent::PointerMove(p));
    }
    overlay.handle_event(OverlayEvent::PointerUp);
    overlay.render(1000.0);

    let mask = overlay.mask();
    let output = std::fs::File::create(path)?;
    let encoder = image::codecs::png::PngEncoder::new(output);
    encoder.write_image(
        &mask.to_straight_rgba(),
        mask.width(),
        mask.height(),
        image::ExtendedColorType::Rgba8,
    )?;
    Ok(())
}
