// Decorative field generation for the cosmic backdrop, nav bar, and footer.
// All randomness flows through a caller-supplied Rng, so a seeded generator
// reproduces a field exactly and the host renders the same sky it hydrated
// with.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

use crate::types::StarSettings;

/// A twinkling star pinned to a percentage position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Star {
    /// Diameter in px.
    pub size: f32,
    /// Position in percent of the container.
    pub x: f32,
    pub y: f32,
    pub opacity: f32,
    pub twinkle_delay_s: f32,
    pub twinkle_duration_s: f32,
}

/// A star that also drifts across the container. Negative delays start the
/// drift mid-animation so a fresh mount does not look synchronized.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DriftingStar {
    pub size: f32,
    pub x: f32,
    pub y: f32,
    pub opacity: f32,
    pub twinkle_duration_s: f32,
    pub drift_duration_s: f32,
    pub drift_delay_s: f32,
}

/// A glowing planet blob.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Planet {
    pub size: f32,
    pub x: f32,
    pub y: f32,
    pub drift_duration_s: f32,
    pub drift_delay_s: f32,
    /// HSL hue; the host renders `hsl(hue, 70%, 60%)`.
    pub hue: f32,
}

/// A slow-drifting black hole with its accretion ring.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlackHole {
    pub size: f32,
    pub x: f32,
    pub y: f32,
    pub drift_duration_s: f32,
    pub drift_delay_s: f32,
}

/// Parallax depth layer of the star field. Nearer layers are bigger,
/// brighter, and drift faster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StarLayer {
    Near,
    Mid,
    Far,
}

impl StarLayer {
    pub fn count(&self) -> usize {
        match self {
            StarLayer::Near => 50,
            StarLayer::Mid => 100,
            StarLayer::Far => 150,
        }
    }
}

/// Generates every decorative population from one injected random source.
#[derive(Debug)]
pub struct StarFieldGenerator<R: Rng> {
    rng: R,
}

impl<R: Rng> StarFieldGenerator<R> {
    pub fn new(rng: R) -> Self {
        StarFieldGenerator { rng }
    }

    /// Small twinkling stars for the nav bar and footer chrome.
    pub fn nav_stars(&mut self, count: usize) -> Vec<Star> {
        (0..count)
            .map(|_| Star {
                size: self.rng.gen_range(1.0..3.0),
                x: self.rng.gen_range(0.0..100.0),
                y: self.rng.gen_range(0.0..100.0),
                opacity: self.rng.gen_range(0.2..1.0),
                twinkle_delay_s: self.rng.gen_range(0.0..4.0),
                twinkle_duration_s: self.rng.gen_range(3.0..5.0),
            })
            .collect()
    }

    /// The dense full-screen backdrop population.
    pub fn backdrop(&mut self, count: usize) -> Vec<DriftingStar> {
        (0..count)
            .map(|_| DriftingStar {
                size: self.rng.gen_range(1.0..3.0),
                x: self.rng.gen_range(0.0..100.0),
                y: self.rng.gen_range(0.0..100.0),
                opacity: self.rng.gen_range(0.5..1.0),
                twinkle_duration_s: self.rng.gen_range(2.0..5.0),
                drift_duration_s: self.rng.gen_range(50.0..200.0),
                drift_delay_s: -self.rng.gen_range(0.0..100.0),
            })
            .collect()
    }

    /// One parallax depth layer.
    pub fn layer(&mut self, layer: StarLayer) -> Vec<DriftingStar> {
        let (size, opacity, twinkle, drift, delay) = match layer {
            StarLayer::Near => (1.0..3.0, 0.2..1.0, 3.0..5.0, 30.0..50.0, 0.0..20.0),
            StarLayer::Mid => (0.5..2.0, 0.3..1.0, 4.0..7.0, 60.0..100.0, 0.0..40.0),
            StarLayer::Far => (0.2..1.2, 0.2..0.8, 5.0..9.0, 90.0..150.0, 0.0..60.0),
        };

        (0..layer.count())
            .map(|_| DriftingStar {
                size: self.rng.gen_range(size.clone()),
                x: self.rng.gen_range(0.0..100.0),
                y: self.rng.gen_range(0.0..100.0),
                opacity: self.rng.gen_range(opacity.clone()),
                twinkle_duration_s: self.rng.gen_range(twinkle.clone()),
                drift_duration_s: self.rng.gen_range(drift.clone()),
                drift_delay_s: -self.rng.gen_range(delay.clone()),
            })
            .collect()
    }

    pub fn planets(&mut self, count: usize) -> Vec<Planet> {
        (0..count)
            .map(|_| Planet {
                size: self.rng.gen_range(20.0..60.0),
                x: self.rng.gen_range(10.0..90.0),
                y: self.rng.gen_range(10.0..90.0),
                drift_duration_s: self.rng.gen_range(100.0..300.0),
                drift_delay_s: -self.rng.gen_range(0.0..100.0),
                hue: self.rng.gen_range(0.0..360.0),
            })
            .collect()
    }

    pub fn black_holes(&mut self, count: usize) -> Vec<BlackHole> {
        (0..count)
            .map(|_| BlackHole {
                size: self.rng.gen_range(40.0..100.0),
                x: self.rng.gen_range(10.0..90.0),
                y: self.rng.gen_range(10.0..90.0),
                drift_duration_s: self.rng.gen_range(200.0..500.0),
                drift_delay_s: -self.rng.gen_range(0.0..100.0),
            })
            .collect()
    }
}

// =============================================================================
// WASM Bindings
// =============================================================================

/// WASM-exposed star-field generator, seeded by the host (any number, e.g.
/// `Date.now()`). The same seed yields the same sky.
#[wasm_bindgen]
pub struct WasmStarField {
    generator: StarFieldGenerator<SmallRng>,
    settings: StarSettings,
}

#[wasm_bindgen]
impl WasmStarField {
    /// Create from a `StarSettings` JSON object (`{}` for defaults) and a
    /// numeric seed.
    #[wasm_bindgen(constructor)]
    pub fn new(settings_json: &str, seed: f64) -> Result<WasmStarField, JsValue> {
        let settings: StarSettings = serde_json::from_str(settings_json)
            .map_err(|e| JsValue::from_str(&format!("Invalid star settings: {}", e)))?;

        Ok(WasmStarField {
            generator: StarFieldGenerator::new(SmallRng::seed_from_u64(seed as u64)),
            settings,
        })
    }

    pub fn nav_stars(&mut self) -> Result<String, JsValue> {
        let stars = self.generator.nav_stars(self.settings.nav_stars);
        to_json(&stars)
    }

    pub fn backdrop(&mut self) -> Result<String, JsValue> {
        let stars = self.generator.backdrop(self.settings.backdrop_stars);
        to_json(&stars)
    }

    /// `layer` is one of `"near"`, `"mid"`, `"far"`.
    pub fn layer(&mut self, layer: &str) -> Result<String, JsValue> {
        let layer = match layer {
            "near" => StarLayer::Near,
            "mid" => StarLayer::Mid,
            "far" => StarLayer::Far,
            other => {
                return Err(JsValue::from_str(&format!("Unknown star layer: {}", other)));
            }
        };
        let stars = self.generator.layer(layer);
        to_json(&stars)
    }

    pub fn planets(&mut self) -> Result<String, JsValue> {
        let planets = self.generator.planets(self.settings.planets);
        to_json(&planets)
    }

    pub fn black_holes(&mut self) -> Result<String, JsValue> {
        let holes = self.generator.black_holes(self.settings.black_holes);
        to_json(&holes)
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}
