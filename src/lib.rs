// motion_core: scroll-driven effects engine for a single-page portfolio.
// Every animation decision is made here; JS is plumbing that forwards
// browser events (with their timestamps) and applies the returned styles.

mod assets;
mod contact;
mod error;
mod observer;
mod parallax;
mod reveal;
mod scrollspy;
mod starfield;
mod trail;
mod types;

use wasm_bindgen::prelude::*;

pub use assets::{ImageLoadTracker, WasmImageTracker};
pub use contact::{
    resolve_boundary_reply, BoundaryOutcome, ContactForm, ContactMessage, ContactType,
    SubmitStatus, WasmContactForm,
};
pub use error::EngineError;
pub use observer::{MarginValue, RootMargin, ViewportObserver};
pub use parallax::{ParallaxEngine, WasmParallax};
pub use reveal::{RevealController, RevealState, WasmRevealController};
pub use scrollspy::{
    ease_out_cubic, ScrollAnimator, ScrollSpyNavigator, SectionMetrics, WasmScrollSpy,
};
pub use starfield::{
    BlackHole, DriftingStar, Planet, Star, StarFieldGenerator, StarLayer, WasmStarField,
};
pub use trail::{
    is_interactive, is_over_interactive, MotionTrailEngine, PointerState, TargetDescriptor,
    TouchRipple, TouchRipples, TrailDot, TrailPoint, WasmTouchRipples, WasmTrailEngine,
};
pub use types::*;

/// Initialize panic hook for better error messages in browser console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Validate a full engine config and return it with defaults filled in, so
/// the host can construct the per-concern engines from one object.
#[wasm_bindgen]
pub fn effective_config(config_json: &str) -> Result<String, JsValue> {
    let config: EngineConfig = serde_json::from_str(config_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid config: {}", e)))?;

    serde_json::to_string(&config)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}
