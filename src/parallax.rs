// Parallax offset, recomputed from scratch on every sample: the element's
// distance from the viewport center times the configured speed. Centering on
// viewport-middle makes the drift symmetric whether the element is scrolled
// in from above or below.

use wasm_bindgen::prelude::*;

use crate::types::{Direction, ParallaxSettings};

/// Computes the vertical drift for one parallax element.
#[derive(Debug)]
pub struct ParallaxEngine {
    settings: ParallaxSettings,
    reduced_motion: bool,
}

impl ParallaxEngine {
    /// `reduced_motion` is the runtime's accessibility preference. When set,
    /// the engine is a permanent no-op; honoring it is a correctness
    /// requirement, not an optimization.
    pub fn new(settings: ParallaxSettings, reduced_motion: bool) -> Self {
        ParallaxEngine {
            settings,
            reduced_motion,
        }
    }

    /// False under reduced motion; the host must not attach scroll listeners
    /// for an inactive engine.
    pub fn is_active(&self) -> bool {
        !self.reduced_motion
    }

    /// Raw offset for the current element geometry. Zero exactly when the
    /// element's center sits on the viewport's center.
    pub fn offset(&self, element_top: f32, element_height: f32, viewport_height: f32) -> f32 {
        if self.reduced_motion {
            return 0.0;
        }

        let element_center = element_top + element_height / 2.0;
        let distance_from_center = element_center - viewport_height / 2.0;
        distance_from_center * self.settings.speed
    }

    /// Signed translation: `Up` drifts against the offset, `Down` with it.
    pub fn translate_y(&self, element_top: f32, element_height: f32, viewport_height: f32) -> f32 {
        let offset = self.offset(element_top, element_height, viewport_height);
        match self.settings.direction {
            Direction::Up => -offset,
            Direction::Down => offset,
        }
    }

    /// CSS transform for the current sample.
    pub fn transform(&self, element_top: f32, element_height: f32, viewport_height: f32) -> String {
        format!(
            "translateY({}px)",
            self.translate_y(element_top, element_height, viewport_height)
        )
    }
}

// =============================================================================
// WASM Bindings
// =============================================================================

/// WASM-exposed parallax engine. The host samples it on mount and on each
/// scroll event with the element's current bounding geometry.
#[wasm_bindgen]
pub struct WasmParallax {
    inner: ParallaxEngine,
}

#[wasm_bindgen]
impl WasmParallax {
    /// Create from a `ParallaxSettings` JSON object and the runtime's
    /// reduced-motion preference.
    #[wasm_bindgen(constructor)]
    pub fn new(settings_json: &str, reduced_motion: bool) -> Result<WasmParallax, JsValue> {
        let settings: ParallaxSettings = serde_json::from_str(settings_json)
            .map_err(|e| JsValue::from_str(&format!("Invalid parallax settings: {}", e)))?;

        Ok(WasmParallax {
            inner: ParallaxEngine::new(settings, reduced_motion),
        })
    }

    pub fn is_active(&self) -> bool {
        self.inner.is_active()
    }

    pub fn offset(&self, element_top: f32, element_height: f32, viewport_height: f32) -> f32 {
        self.inner.offset(element_top, element_height, viewport_height)
    }

    pub fn transform(&self, element_top: f32, element_height: f32, viewport_height: f32) -> String {
        self.inner.transform(element_top, element_height, viewport_height)
    }
}
