// Section tracking against the scroll position, plus the wall-clock
// smooth-scroll animator. Both read scrollY but share no state with the
// parallax engine; the host may attach their listeners independently.

use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

use crate::types::{ScrollSettings, Timestamp};

/// Measured geometry for one page section, re-read by the host on every
/// scroll tick (layout can shift as images load).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionMetrics {
    pub id: String,
    pub top: f64,
    pub height: f64,
}

/// Tracks which section is active for navigation highlighting, plus the
/// scroll-dependent chrome flags (navbar style, back-to-top visibility).
#[derive(Debug)]
pub struct ScrollSpyNavigator {
    settings: ScrollSettings,
    active: String,
    nav_scrolled: bool,
    back_to_top_visible: bool,
}

impl ScrollSpyNavigator {
    pub fn new(settings: ScrollSettings) -> Self {
        let active = settings.sections.first().cloned().unwrap_or_default();
        ScrollSpyNavigator {
            settings,
            active,
            nav_scrolled: false,
            back_to_top_visible: false,
        }
    }

    /// Feed one scroll sample. Scans the configured section order and
    /// activates the first section whose `[top, top + height)` interval
    /// contains `scroll_y` plus the lookahead; first match wins, and with no
    /// match (above the first section, below the last, or a section missing
    /// from `metrics`) the previous active section is retained.
    ///
    /// Sections are assumed non-overlapping; the in-order tie-break is an
    /// artifact of the scan, not a guarantee.
    pub fn on_scroll(&mut self, scroll_y: f64, metrics: &[SectionMetrics]) -> &str {
        self.nav_scrolled = scroll_y > self.settings.nav_scrolled_threshold_px;
        self.back_to_top_visible = scroll_y > self.settings.back_to_top_threshold_px;

        let position = scroll_y + self.settings.lookahead_px;

        for id in &self.settings.sections {
            if let Some(section) = metrics.iter().find(|m| &m.id == id) {
                if position >= section.top && position < section.top + section.height {
                    self.active = id.clone();
                    break;
                }
            }
        }

        &self.active
    }

    pub fn active(&self) -> &str {
        &self.active
    }

    /// Immediate activation on a navigation click, ahead of the scroll
    /// animation catching up.
    pub fn set_active(&mut self, section_id: &str) {
        if self.settings.sections.iter().any(|s| s == section_id) {
            self.active = section_id.to_string();
        }
    }

    pub fn nav_scrolled(&self) -> bool {
        self.nav_scrolled
    }

    pub fn back_to_top_visible(&self) -> bool {
        self.back_to_top_visible
    }

    /// Scroll destination for a section, compensating for the fixed navbar.
    pub fn scroll_target(&self, section_top: f64) -> f64 {
        (section_top - self.settings.nav_offset_px).max(0.0)
    }

    /// Start a smooth scroll from the current position to a section.
    pub fn animate_to_section(
        &self,
        current_scroll: f64,
        section_top: f64,
        now: Timestamp,
    ) -> ScrollAnimator {
        ScrollAnimator::begin(
            current_scroll,
            self.scroll_target(section_top),
            now,
            self.settings.scroll_duration_us,
        )
    }

    /// Back-to-top reuses the same animator targeting offset zero.
    pub fn animate_to_top(&self, current_scroll: f64, now: Timestamp) -> ScrollAnimator {
        ScrollAnimator::begin(current_scroll, 0.0, now, self.settings.scroll_duration_us)
    }
}

/// Cubic ease-out: decelerates into the target.
pub fn ease_out_cubic(t: f64) -> f64 {
    let u = t - 1.0;
    u * u * u + 1.0
}

/// Wall-clock scroll animation. Sampled from the host's animation-frame
/// loop; completion is a function of elapsed time, not frame count, so a
/// degraded frame rate still finishes on schedule.
#[derive(Debug, Clone)]
pub struct ScrollAnimator {
    start: f64,
    target: f64,
    started_at: Timestamp,
    duration_us: u64,
    finished: bool,
}

impl ScrollAnimator {
    pub fn begin(start: f64, target: f64, now: Timestamp, duration_us: u64) -> Self {
        ScrollAnimator {
            start,
            target,
            started_at: now,
            duration_us: duration_us.max(1),
            finished: false,
        }
    }

    /// Position for the given clock reading. The final frame snaps to the
    /// exact target: no overshoot, no residual frame-rounding delta.
    pub fn sample(&mut self, now: Timestamp) -> f64 {
        let elapsed = now.since(self.started_at);
        if elapsed >= self.duration_us {
            self.finished = true;
            return self.target;
        }

        let progress = elapsed as f64 / self.duration_us as f64;
        self.start + (self.target - self.start) * ease_out_cubic(progress)
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn target(&self) -> f64 {
        self.target
    }
}

// =============================================================================
// WASM Bindings
// =============================================================================

/// WASM-exposed scroll-spy. The host feeds scroll samples with freshly
/// measured section geometry and drives at most one scroll animation at a
/// time from its frame loop.
#[wasm_bindgen]
pub struct WasmScrollSpy {
    inner: ScrollSpyNavigator,
    animation: Option<ScrollAnimator>,
}

#[wasm_bindgen]
impl WasmScrollSpy {
    /// Create from a `ScrollSettings` JSON object (`{}` for defaults).
    #[wasm_bindgen(constructor)]
    pub fn new(settings_json: &str) -> Result<WasmScrollSpy, JsValue> {
        let settings: ScrollSettings = serde_json::from_str(settings_json)
            .map_err(|e| JsValue::from_str(&format!("Invalid scroll settings: {}", e)))?;

        Ok(WasmScrollSpy {
            inner: ScrollSpyNavigator::new(settings),
            animation: None,
        })
    }

    /// `metrics_json` is an array of `{id, top, height}` objects. Returns
    /// the active section id.
    pub fn on_scroll(&mut self, scroll_y: f64, metrics_json: &str) -> Result<String, JsValue> {
        let metrics: Vec<SectionMetrics> = serde_json::from_str(metrics_json)
            .map_err(|e| JsValue::from_str(&format!("Invalid section metrics: {}", e)))?;

        Ok(self.inner.on_scroll(scroll_y, &metrics).to_string())
    }

    pub fn active(&self) -> String {
        self.inner.active().to_string()
    }

    pub fn set_active(&mut self, section_id: &str) {
        self.inner.set_active(section_id);
    }

    pub fn nav_scrolled(&self) -> bool {
        self.inner.nav_scrolled()
    }

    pub fn back_to_top_visible(&self) -> bool {
        self.inner.back_to_top_visible()
    }

    pub fn begin_scroll_to(&mut self, current_scroll: f64, section_top: f64, now_ms: f64) {
        self.animation = Some(self.inner.animate_to_section(
            current_scroll,
            section_top,
            Timestamp::from_millis_f64(now_ms),
        ));
    }

    pub fn begin_scroll_to_top(&mut self, current_scroll: f64, now_ms: f64) {
        self.animation = Some(
            self.inner
                .animate_to_top(current_scroll, Timestamp::from_millis_f64(now_ms)),
        );
    }

    /// Sample the running animation and return the scroll position to
    /// apply. Check `is_animating` first; with no animation this returns 0.
    pub fn animation_sample(&mut self, now_ms: f64) -> f64 {
        match &mut self.animation {
            Some(animation) => {
                let position = animation.sample(Timestamp::from_millis_f64(now_ms));
                if animation.is_finished() {
                    self.animation = None;
                }
                position
            }
            None => 0.0,
        }
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }
}
