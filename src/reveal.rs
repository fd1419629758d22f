// Reveal state for one animated element. Dual trigger: intersection signal
// OR a wall-clock safety timer, whichever fires first. A reveal is never
// withheld indefinitely by a missed or misconfigured observation.

use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

use crate::error::EngineError;
use crate::observer::ViewportObserver;
use crate::types::{RevealSettings, Timestamp};

/// Elements force-reveal this long after hydration even if the observer
/// never fires.
const FORCE_REVEAL_AFTER_US: u64 = 1_000_000;

/// Presentation state of one revealable element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RevealState {
    /// Suppressed by a paint-hiding fallback class, waiting for reveal.
    Hidden,
    /// Plainly styled content. Also the state of any non-interactive render
    /// so content survives disabled or slow scripting.
    FallbackVisible,
    /// Fully styled and animated. Terminal.
    Revealed,
}

impl RevealState {
    pub fn as_str(&self) -> &'static str {
        match self {
            RevealState::Hidden => "hidden",
            RevealState::FallbackVisible => "fallback-visible",
            RevealState::Revealed => "revealed",
        }
    }
}

/// Decides the presentation state for one element from the intersection
/// signal and the safety timer, and composes the class list the host
/// applies.
#[derive(Debug)]
pub struct RevealController {
    settings: RevealSettings,
    observer: ViewportObserver,
    hydrated_at: Option<Timestamp>,
    revealed: bool,
}

impl RevealController {
    pub fn new(settings: RevealSettings) -> Result<Self, EngineError> {
        let observer = ViewportObserver::new(
            settings.threshold,
            &settings.root_margin,
            settings.trigger_once,
        )?;

        Ok(RevealController {
            settings,
            observer,
            hydrated_at: None,
            revealed: false,
        })
    }

    /// Client-side mount: start observing and arm the safety timer.
    pub fn hydrate(&mut self, now: Timestamp) -> Result<(), EngineError> {
        self.observer.observe()?;
        self.hydrated_at = Some(now);
        Ok(())
    }

    /// Fail safe for runtimes without the observation API: reveal now.
    pub fn observer_unavailable(&mut self) {
        self.observer.api_unavailable();
        self.revealed = true;
    }

    /// Feed one intersection callback from the host.
    pub fn on_intersection(&mut self, intersection_ratio: f32, is_intersecting: bool) -> RevealState {
        if self.observer.on_entry(intersection_ratio, is_intersecting) {
            self.revealed = true;
        }
        self.state()
    }

    /// Poll on a frame tick. Applies the safety timer, whose completion
    /// condition is elapsed wall-clock time, not frame count.
    pub fn poll(&mut self, now: Timestamp) -> RevealState {
        if !self.revealed {
            if let Some(hydrated_at) = self.hydrated_at {
                if now.since(hydrated_at) >= FORCE_REVEAL_AFTER_US {
                    self.revealed = true;
                }
            }
        }
        self.state()
    }

    pub fn state(&self) -> RevealState {
        if self.revealed {
            return RevealState::Revealed;
        }
        // Never invisible before interactivity is established.
        if self.hydrated_at.is_none() {
            return RevealState::FallbackVisible;
        }
        if fallback_suppresses_paint(&self.settings.fallback_class) {
            RevealState::Hidden
        } else {
            RevealState::FallbackVisible
        }
    }

    /// The host should unobserve the DOM node once this returns true.
    pub fn wants_detach(&self) -> bool {
        self.observer.wants_detach()
    }

    /// Teardown on unmount; releases the observation. Idempotent.
    pub fn teardown(&mut self) {
        self.observer.unobserve();
    }

    /// Class list for the current state, composed the way the markup
    /// expects: the animation class plus either `in-view` or the fallback.
    /// Before hydration only the fallback class applies.
    pub fn class_list(&self) -> String {
        if self.hydrated_at.is_none() {
            return self.settings.fallback_class.clone();
        }

        let marker = match self.state() {
            RevealState::Revealed => "in-view",
            _ => self.settings.fallback_class.as_str(),
        };

        if self.settings.animation_class.is_empty() {
            marker.to_string()
        } else {
            format!("{} {}", self.settings.animation_class, marker)
        }
    }

    /// `transition-delay` style value. Presentation only: the logical
    /// transition moment is unaffected.
    pub fn transition_delay(&self) -> String {
        format!("{}ms", self.settings.delay_ms)
    }
}

/// The original fallback convention: an `opacity-0` utility as the leading
/// token means the element paints nothing until revealed.
fn fallback_suppresses_paint(fallback_class: &str) -> bool {
    fallback_class.split_whitespace().next() == Some("opacity-0")
}

// =============================================================================
// WASM Bindings
// =============================================================================

/// WASM-exposed reveal controller for one element.
///
/// The host forwards intersection callbacks and frame polls with its own
/// clock readings (`performance.now()` milliseconds) and applies the
/// returned class list.
#[wasm_bindgen]
pub struct WasmRevealController {
    inner: RevealController,
}

#[wasm_bindgen]
impl WasmRevealController {
    /// Create from a `RevealSettings` JSON object (`{}` for defaults).
    #[wasm_bindgen(constructor)]
    pub fn new(settings_json: &str) -> Result<WasmRevealController, JsValue> {
        let settings: RevealSettings = serde_json::from_str(settings_json)
            .map_err(|e| JsValue::from_str(&format!("Invalid reveal settings: {}", e)))?;

        let inner = RevealController::new(settings)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        Ok(WasmRevealController { inner })
    }

    pub fn hydrate(&mut self, now_ms: f64) -> Result<(), JsValue> {
        self.inner
            .hydrate(Timestamp::from_millis_f64(now_ms))
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    pub fn on_intersection(&mut self, intersection_ratio: f32, is_intersecting: bool) -> String {
        self.inner
            .on_intersection(intersection_ratio, is_intersecting)
            .as_str()
            .to_string()
    }

    pub fn poll(&mut self, now_ms: f64) -> String {
        self.inner
            .poll(Timestamp::from_millis_f64(now_ms))
            .as_str()
            .to_string()
    }

    pub fn state(&self) -> String {
        self.inner.state().as_str().to_string()
    }

    pub fn class_list(&self) -> String {
        self.inner.class_list()
    }

    pub fn transition_delay(&self) -> String {
        self.inner.transition_delay()
    }

    pub fn wants_detach(&self) -> bool {
        self.inner.wants_detach()
    }

    pub fn observer_unavailable(&mut self) {
        self.inner.observer_unavailable();
    }

    pub fn teardown(&mut self) {
        self.inner.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller(settings: RevealSettings) -> RevealController {
        RevealController::new(settings).unwrap()
    }

    fn hydrated(settings: RevealSettings) -> RevealController {
        let mut ctl = controller(settings);
        ctl.hydrate(Timestamp::from_micros(0)).unwrap();
        ctl
    }

    #[test]
    fn pre_hydration_is_fallback_visible() {
        let ctl = controller(RevealSettings::default());
        assert_eq!(ctl.state(), RevealState::FallbackVisible);
        assert_eq!(ctl.class_list(), "opacity-0");
    }

    #[test]
    fn default_fallback_hides_after_hydration() {
        let ctl = hydrated(RevealSettings::default());
        assert_eq!(ctl.state(), RevealState::Hidden);
    }

    #[test]
    fn non_suppressing_fallback_stays_visible() {
        let settings = RevealSettings {
            fallback_class: "blur-sm".to_string(),
            ..Default::default()
        };
        let ctl = hydrated(settings);
        assert_eq!(ctl.state(), RevealState::FallbackVisible);
    }

    #[test]
    fn intersection_reveals() {
        let mut ctl = hydrated(RevealSettings::default());
        let state = ctl.on_intersection(0.5, true);
        assert_eq!(state, RevealState::Revealed);
    }

    #[test]
    fn safety_timer_reveals_without_observer() {
        let mut ctl = hydrated(RevealSettings::default());

        assert_eq!(ctl.poll(Timestamp::from_micros(999_999)), RevealState::Hidden);
        assert_eq!(
            ctl.poll(Timestamp::from_micros(1_000_000)),
            RevealState::Revealed
        );
    }

    #[test]
    fn revealed_is_terminal() {
        let mut ctl = hydrated(RevealSettings::default());
        ctl.on_intersection(0.9, true);

        // Neither leaving the viewport nor later polls regress the state.
        assert_eq!(ctl.on_intersection(0.0, false), RevealState::Revealed);
        assert_eq!(ctl.poll(Timestamp::from_micros(5)), RevealState::Revealed);
    }

    #[test]
    fn delay_is_presentation_only() {
        let settings = RevealSettings {
            delay_ms: 300,
            ..Default::default()
        };
        let mut ctl = hydrated(settings);
        assert_eq!(ctl.transition_delay(), "300ms");

        // The logical transition happens at the intersection, delay or not.
        assert_eq!(ctl.on_intersection(1.0, true), RevealState::Revealed);
    }

    #[test]
    fn class_list_composition() {
        let settings = RevealSettings {
            animation_class: "fade-up".to_string(),
            ..Default::default()
        };
        let mut ctl = controller(settings);
        assert_eq!(ctl.class_list(), "opacity-0");

        ctl.hydrate(Timestamp::from_micros(0)).unwrap();
        assert_eq!(ctl.class_list(), "fade-up opacity-0");

        ctl.on_intersection(1.0, true);
        assert_eq!(ctl.class_list(), "fade-up in-view");
    }

    #[test]
    fn unavailable_observer_reveals_immediately() {
        let mut ctl = controller(RevealSettings::default());
        ctl.observer_unavailable();
        assert_eq!(ctl.state(), RevealState::Revealed);
    }

    #[test]
    fn wasm_reveal_controller_from_json() {
        let mut ctl =
            WasmRevealController::new(r#"{"animation_class":"fade-up","delay_ms":150}"#)
                .expect("Should parse valid settings");

        ctl.hydrate(0.0).expect("hydrate");
        assert_eq!(ctl.state(), "hidden");
        assert_eq!(ctl.poll(1000.0), "revealed");
        assert_eq!(ctl.class_list(), "fade-up in-view");
        assert_eq!(ctl.transition_delay(), "150ms");
    }
}
