// Pointer trail: a bounded, time-ordered queue of recent pointer positions
// plus the decay clock that fades it out. Insertion is throttled to ~60Hz,
// pruning runs on an externally driven ~30Hz tick so the trail decays even
// when the pointer stops moving.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

use crate::types::{PixelPoint, Timestamp, TrailSettings};

/// Touch ripples outlive trail points a little.
const RIPPLE_LIFETIME_US: u64 = 1_000_000;
const RIPPLE_SWEEP_INTERVAL_US: u64 = 500_000;

/// One recorded pointer position. Owned exclusively by the engine's queue.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrailPoint {
    pub position: PixelPoint,
    pub timestamp: Timestamp,
}

/// A dot of the sparse fading overlay.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrailDot {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub opacity: f32,
}

/// Whether the pointer is inside the window at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerState {
    /// Pointer outside the window; nothing renders.
    Idle,
    /// Pointer inside; indicator visible, trail accumulating.
    Active,
}

/// One element of the ancestor chain under the pointer, as reported by the
/// host. Tag names and classes are matched case-insensitively on the tag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetDescriptor {
    pub tag: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub classes: Vec<String>,
}

const INTERACTIVE_TAGS: [&str; 5] = ["a", "button", "input", "select", "textarea"];
const INTERACTIVE_ROLES: [&str; 6] = ["button", "link", "checkbox", "radio", "switch", "tab"];
const INTERACTIVE_CLASSES: [&str; 3] = ["cursor-pointer", "button", "btn"];

/// An element counts as interactive by tag, ARIA role, or class convention.
pub fn is_interactive(target: &TargetDescriptor) -> bool {
    if INTERACTIVE_TAGS.contains(&target.tag.to_ascii_lowercase().as_str()) {
        return true;
    }

    if let Some(role) = &target.role {
        if INTERACTIVE_ROLES.contains(&role.as_str()) {
            return true;
        }
    }

    target
        .classes
        .iter()
        .any(|class| INTERACTIVE_CLASSES.contains(&class.as_str()))
}

/// True when any element of the ancestor chain is interactive. The host
/// passes the chain from the event target up to (excluding) the body.
pub fn is_over_interactive(ancestors: &[TargetDescriptor]) -> bool {
    ancestors.iter().any(is_interactive)
}

/// Maintains the trail queue and pointer presentation state.
#[derive(Debug)]
pub struct MotionTrailEngine {
    settings: TrailSettings,
    points: VecDeque<TrailPoint>,
    pointer_state: PointerState,
    position: PixelPoint,
    clicking: bool,
    hovering: bool,
    last_update: Option<Timestamp>,
    last_prune: Option<Timestamp>,
}

impl MotionTrailEngine {
    pub fn new(settings: TrailSettings) -> Self {
        let capacity = settings.max_points;
        MotionTrailEngine {
            settings,
            points: VecDeque::with_capacity(capacity),
            pointer_state: PointerState::Idle,
            position: PixelPoint::default(),
            clicking: false,
            hovering: false,
            last_update: None,
            last_prune: None,
        }
    }

    pub fn pointer_entered(&mut self) {
        self.pointer_state = PointerState::Active;
    }

    pub fn pointer_left(&mut self) {
        // Queued points are kept; they decay on their own clock.
        self.pointer_state = PointerState::Idle;
    }

    pub fn pointer_down(&mut self) {
        self.clicking = true;
    }

    pub fn pointer_up(&mut self) {
        self.clicking = false;
    }

    /// Feed one pointer-move event. Returns false when the event falls
    /// inside the throttle window and was dropped entirely.
    ///
    /// Over an interactive target the indicator still follows the pointer
    /// but the trail stops accumulating.
    pub fn pointer_moved(
        &mut self,
        position: PixelPoint,
        now: Timestamp,
        ancestors: &[TargetDescriptor],
    ) -> bool {
        if let Some(last) = self.last_update {
            if now.since(last) < self.settings.update_threshold_us {
                return false;
            }
        }
        self.last_update = Some(now);

        self.pointer_state = PointerState::Active;
        self.position = position;
        self.hovering = is_over_interactive(ancestors);

        if !self.hovering {
            self.points.push_back(TrailPoint {
                position,
                timestamp: now,
            });
            while self.points.len() > self.settings.max_points {
                self.points.pop_front();
            }
        }

        true
    }

    /// One decay tick, rate-limited to the configured prune interval.
    /// Removes expired points from the front; never reorders. Returns how
    /// many points were dropped.
    pub fn tick(&mut self, now: Timestamp) -> usize {
        if let Some(last) = self.last_prune {
            if now.since(last) < self.settings.prune_interval_us {
                return 0;
            }
        }
        self.last_prune = Some(now);

        let before = self.points.len();
        while let Some(front) = self.points.front() {
            if now.since(front.timestamp) >= self.settings.point_lifetime_us {
                self.points.pop_front();
            } else {
                break;
            }
        }
        before - self.points.len()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> impl Iterator<Item = &TrailPoint> {
        self.points.iter()
    }

    pub fn pointer_state(&self) -> PointerState {
        self.pointer_state
    }

    pub fn position(&self) -> PixelPoint {
        self.position
    }

    pub fn is_clicking(&self) -> bool {
        self.clicking
    }

    pub fn is_hovering(&self) -> bool {
        self.hovering
    }

    /// The trail overlay hides while idle or over an interactive target.
    pub fn overlay_visible(&self) -> bool {
        self.pointer_state == PointerState::Active && !self.hovering
    }

    /// Connected SVG path through every queued point, oldest first.
    /// Empty below two points.
    pub fn path_data(&self) -> String {
        if self.points.len() < 2 {
            return String::new();
        }

        let mut path = String::new();
        for (i, point) in self.points.iter().enumerate() {
            let command = if i == 0 { 'M' } else { 'L' };
            if i > 0 {
                path.push(' ');
            }
            path.push(command);
            path.push_str(&format!(" {} {}", point.position.x, point.position.y));
        }
        path
    }

    /// Fraction of life remaining for a point of the given age. Reaches
    /// exactly 0 at the lifetime and never increases with age.
    pub fn point_opacity(&self, age_us: u64) -> f32 {
        let lifetime = self.settings.point_lifetime_us as f32;
        1.0 - (age_us as f32 / lifetime).min(1.0)
    }

    /// Sparse dot overlay: every 4th point plus the newest, with age-faded
    /// opacity. Empty until the trail has more than three points.
    pub fn dots(&self, now: Timestamp) -> Vec<TrailDot> {
        if self.points.len() <= 3 {
            return Vec::new();
        }

        let last_index = self.points.len() - 1;
        let accent_index = self.points.len() / 4;

        self.points
            .iter()
            .enumerate()
            .filter(|(i, _)| i % 4 == 0 || *i == last_index)
            .enumerate()
            .map(|(dot_index, (_, point))| {
                let age = now.since(point.timestamp);
                TrailDot {
                    x: point.position.x,
                    y: point.position.y,
                    radius: if dot_index + 1 == accent_index { 3.0 } else { 1.5 },
                    opacity: self.point_opacity(age),
                }
            })
            .collect()
    }
}

/// Touch ripple bookkeeping for coarse-pointer devices. Same ownership rules
/// as the trail queue, on a slower sweep.
#[derive(Debug, Default)]
pub struct TouchRipples {
    ripples: Vec<TouchRipple>,
    next_id: u64,
    last_sweep: Option<Timestamp>,
}

/// One expanding touch ring.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TouchRipple {
    pub id: u64,
    pub position: PixelPoint,
    pub timestamp: Timestamp,
}

impl TouchRipples {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record every contact point of one touch-start event.
    pub fn touch_start(&mut self, positions: &[PixelPoint], now: Timestamp) {
        for &position in positions {
            self.ripples.push(TouchRipple {
                id: self.next_id,
                position,
                timestamp: now,
            });
            self.next_id += 1;
        }
    }

    /// Drop expired ripples; rate-limited sweep. Returns how many were
    /// removed.
    pub fn sweep(&mut self, now: Timestamp) -> usize {
        if let Some(last) = self.last_sweep {
            if now.since(last) < RIPPLE_SWEEP_INTERVAL_US {
                return 0;
            }
        }
        self.last_sweep = Some(now);

        let before = self.ripples.len();
        self.ripples
            .retain(|ripple| now.since(ripple.timestamp) < RIPPLE_LIFETIME_US);
        before - self.ripples.len()
    }

    pub fn active(&self) -> &[TouchRipple] {
        &self.ripples
    }
}

// =============================================================================
// WASM Bindings
// =============================================================================

/// WASM-exposed trail engine. The host forwards pointer events with its
/// clock readings and an ancestor-chain JSON, drives `tick` from its
/// animation-frame loop, and renders the returned path and dots.
#[wasm_bindgen]
pub struct WasmTrailEngine {
    inner: MotionTrailEngine,
}

#[wasm_bindgen]
impl WasmTrailEngine {
    /// Create from a `TrailSettings` JSON object (`{}` for defaults).
    #[wasm_bindgen(constructor)]
    pub fn new(settings_json: &str) -> Result<WasmTrailEngine, JsValue> {
        let settings: TrailSettings = serde_json::from_str(settings_json)
            .map_err(|e| JsValue::from_str(&format!("Invalid trail settings: {}", e)))?;

        Ok(WasmTrailEngine {
            inner: MotionTrailEngine::new(settings),
        })
    }

    pub fn pointer_entered(&mut self) {
        self.inner.pointer_entered();
    }

    pub fn pointer_left(&mut self) {
        self.inner.pointer_left();
    }

    pub fn pointer_down(&mut self) {
        self.inner.pointer_down();
    }

    pub fn pointer_up(&mut self) {
        self.inner.pointer_up();
    }

    /// `ancestors_json` is an array of `{tag, role?, classes?}` objects for
    /// the chain under the pointer.
    pub fn pointer_moved(
        &mut self,
        x: f32,
        y: f32,
        now_ms: f64,
        ancestors_json: &str,
    ) -> Result<bool, JsValue> {
        let ancestors: Vec<TargetDescriptor> = serde_json::from_str(ancestors_json)
            .map_err(|e| JsValue::from_str(&format!("Invalid ancestor chain: {}", e)))?;

        Ok(self.inner.pointer_moved(
            PixelPoint::new(x, y),
            Timestamp::from_millis_f64(now_ms),
            &ancestors,
        ))
    }

    pub fn tick(&mut self, now_ms: f64) -> usize {
        self.inner.tick(Timestamp::from_millis_f64(now_ms))
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn path_data(&self) -> String {
        self.inner.path_data()
    }

    /// JSON array of `{x, y, radius, opacity}` dots.
    pub fn dots(&self, now_ms: f64) -> Result<String, JsValue> {
        let dots = self.inner.dots(Timestamp::from_millis_f64(now_ms));
        serde_json::to_string(&dots)
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
    }

    pub fn overlay_visible(&self) -> bool {
        self.inner.overlay_visible()
    }

    pub fn is_clicking(&self) -> bool {
        self.inner.is_clicking()
    }

    pub fn is_hovering(&self) -> bool {
        self.inner.is_hovering()
    }
}

/// WASM-exposed touch ripple tracker.
#[wasm_bindgen]
#[derive(Default)]
pub struct WasmTouchRipples {
    inner: TouchRipples,
}

#[wasm_bindgen]
impl WasmTouchRipples {
    #[wasm_bindgen(constructor)]
    pub fn new() -> WasmTouchRipples {
        WasmTouchRipples {
            inner: TouchRipples::new(),
        }
    }

    /// `positions_json` is an array of `{x, y}` contact points.
    pub fn touch_start(&mut self, positions_json: &str, now_ms: f64) -> Result<(), JsValue> {
        let positions: Vec<PixelPoint> = serde_json::from_str(positions_json)
            .map_err(|e| JsValue::from_str(&format!("Invalid touch points: {}", e)))?;

        self.inner
            .touch_start(&positions, Timestamp::from_millis_f64(now_ms));
        Ok(())
    }

    pub fn sweep(&mut self, now_ms: f64) -> usize {
        self.inner.sweep(Timestamp::from_millis_f64(now_ms))
    }

    /// JSON array of active ripples.
    pub fn active(&self) -> Result<String, JsValue> {
        serde_json::to_string(self.inner.active())
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn engine() -> MotionTrailEngine {
        MotionTrailEngine::new(TrailSettings::default())
    }

    fn ts(ms: u64) -> Timestamp {
        Timestamp::from_micros(ms * 1000)
    }

    fn plain_target() -> Vec<TargetDescriptor> {
        vec![TargetDescriptor {
            tag: "div".to_string(),
            role: None,
            classes: vec!["hero".to_string()],
        }]
    }

    fn button_target() -> Vec<TargetDescriptor> {
        vec![
            TargetDescriptor {
                tag: "span".to_string(),
                role: None,
                classes: vec![],
            },
            TargetDescriptor {
                tag: "button".to_string(),
                role: None,
                classes: vec![],
            },
        ]
    }

    #[test]
    fn moves_append_points() {
        let mut e = engine();
        assert!(e.pointer_moved(PixelPoint::new(10.0, 20.0), ts(0), &plain_target()));
        assert!(e.pointer_moved(PixelPoint::new(12.0, 22.0), ts(20), &plain_target()));
        assert_eq!(e.len(), 2);
        assert_eq!(e.pointer_state(), PointerState::Active);
    }

    #[test]
    fn throttle_drops_fast_moves() {
        let mut e = engine();
        assert!(e.pointer_moved(PixelPoint::new(0.0, 0.0), ts(0), &plain_target()));
        // 10ms later: inside the 16ms window.
        assert!(!e.pointer_moved(PixelPoint::new(1.0, 1.0), ts(10), &plain_target()));
        assert_eq!(e.len(), 1);
        assert!(e.pointer_moved(PixelPoint::new(2.0, 2.0), ts(16), &plain_target()));
    }

    #[test]
    fn queue_is_bounded_with_fifo_eviction() {
        let mut e = engine();
        for i in 0..40u64 {
            e.pointer_moved(
                PixelPoint::new(i as f32, 0.0),
                ts(i * 20),
                &plain_target(),
            );
        }
        assert_eq!(e.len(), 15);
        // Oldest points were evicted: the front is move #25.
        assert_eq!(e.points().next().unwrap().position.x, 25.0);
    }

    #[test]
    fn interactive_target_suspends_accumulation() {
        let mut e = engine();
        e.pointer_moved(PixelPoint::new(0.0, 0.0), ts(0), &plain_target());
        // Accepted (not throttled) but no point queued over a button.
        assert!(e.pointer_moved(PixelPoint::new(5.0, 5.0), ts(20), &button_target()));
        assert_eq!(e.len(), 1);
        assert!(e.is_hovering());
        assert!(!e.overlay_visible());
        // The indicator keeps following regardless.
        assert_eq!(e.position(), PixelPoint::new(5.0, 5.0));
    }

    #[test]
    fn interactive_classifier_matches_tag_role_and_class() {
        let anchor = TargetDescriptor {
            tag: "A".to_string(),
            role: None,
            classes: vec![],
        };
        assert!(is_interactive(&anchor));

        let tab = TargetDescriptor {
            tag: "div".to_string(),
            role: Some("tab".to_string()),
            classes: vec![],
        };
        assert!(is_interactive(&tab));

        let styled = TargetDescriptor {
            tag: "div".to_string(),
            role: None,
            classes: vec!["card".to_string(), "cursor-pointer".to_string()],
        };
        assert!(is_interactive(&styled));

        let plain = TargetDescriptor {
            tag: "p".to_string(),
            role: Some("presentation".to_string()),
            classes: vec!["prose".to_string()],
        };
        assert!(!is_interactive(&plain));
    }

    #[test]
    fn tick_prunes_expired_points() {
        let mut e = engine();
        e.pointer_moved(PixelPoint::new(0.0, 0.0), ts(0), &plain_target());
        e.pointer_moved(PixelPoint::new(1.0, 1.0), ts(400), &plain_target());

        // First point is 800ms old at t=800: expired.
        assert_eq!(e.tick(ts(800)), 1);
        assert_eq!(e.len(), 1);

        // Next tick inside the 30ms gate is a no-op.
        assert_eq!(e.tick(ts(810)), 0);

        // Decay continues with no pointer activity at all.
        assert_eq!(e.tick(ts(1200)), 1);
        assert!(e.is_empty());
    }

    #[test]
    fn pointer_leave_hides_but_keeps_points() {
        let mut e = engine();
        e.pointer_moved(PixelPoint::new(0.0, 0.0), ts(0), &plain_target());
        e.pointer_left();
        assert_eq!(e.pointer_state(), PointerState::Idle);
        assert!(!e.overlay_visible());
        assert_eq!(e.len(), 1);
    }

    #[test]
    fn path_data_connects_points_in_order() {
        let mut e = engine();
        assert_eq!(e.path_data(), "");

        e.pointer_moved(PixelPoint::new(1.0, 2.0), ts(0), &plain_target());
        assert_eq!(e.path_data(), "");

        e.pointer_moved(PixelPoint::new(3.0, 4.0), ts(20), &plain_target());
        e.pointer_moved(PixelPoint::new(5.0, 6.0), ts(40), &plain_target());
        assert_eq!(e.path_data(), "M 1 2 L 3 4 L 5 6");
    }

    #[test]
    fn opacity_fades_to_exactly_zero() {
        let e = engine();
        assert_eq!(e.point_opacity(0), 1.0);
        assert_eq!(e.point_opacity(800_000), 0.0);
        assert_eq!(e.point_opacity(2_000_000), 0.0);
        assert!(e.point_opacity(400_000) > 0.0);
    }

    #[test]
    fn dots_subsample_every_fourth_point() {
        let mut e = engine();
        for i in 0..8u64 {
            e.pointer_moved(PixelPoint::new(i as f32, 0.0), ts(i * 20), &plain_target());
        }

        let dots = e.dots(ts(160));
        // Indices 0 and 4, plus the newest point (index 7).
        assert_eq!(dots.len(), 3);
        assert_eq!(dots[0].x, 0.0);
        assert_eq!(dots[1].x, 4.0);
        assert_eq!(dots[2].x, 7.0);
        // Freshest dot is the most opaque.
        assert!(dots[2].opacity > dots[0].opacity);
    }

    #[test]
    fn few_points_render_no_dots() {
        let mut e = engine();
        for i in 0..3u64 {
            e.pointer_moved(PixelPoint::new(i as f32, 0.0), ts(i * 20), &plain_target());
        }
        assert!(e.dots(ts(100)).is_empty());
    }

    #[test]
    fn touch_ripples_expire_on_sweep() {
        let mut t = TouchRipples::new();
        t.touch_start(
            &[PixelPoint::new(0.0, 0.0), PixelPoint::new(5.0, 5.0)],
            ts(0),
        );
        assert_eq!(t.active().len(), 2);
        // Distinct ids even within one burst.
        assert_ne!(t.active()[0].id, t.active()[1].id);

        assert_eq!(t.sweep(ts(500)), 0);
        assert_eq!(t.sweep(ts(1000)), 2);
        assert!(t.active().is_empty());
    }

    #[test]
    fn wasm_trail_engine_round_trip() {
        let mut e = WasmTrailEngine::new("{}").expect("Should parse empty settings");
        e.pointer_moved(10.0, 20.0, 0.0, r#"[{"tag":"div"}]"#)
            .expect("move");
        e.pointer_moved(30.0, 40.0, 20.0, r#"[{"tag":"div"}]"#)
            .expect("move");

        assert_eq!(e.len(), 2);
        assert_eq!(e.path_data(), "M 10 20 L 30 40");
        assert!(e.overlay_visible());
    }

    // =========================================================================
    // Property-Based Tests
    // =========================================================================

    mod property_tests {
        use super::*;

        /// Strategy for an arbitrary pointer-move session: per-event time
        /// gaps (microseconds) and positions.
        fn moves_strategy() -> impl Strategy<Value = Vec<(u64, f32, f32)>> {
            prop::collection::vec(
                (0u64..100_000, -2000.0f32..2000.0, -2000.0f32..2000.0),
                0..200,
            )
        }

        proptest! {
            /// Property: the queue never exceeds its cap after any sequence
            /// of insertions, and timestamps stay in insertion order.
            #[test]
            fn queue_stays_bounded_and_ordered(moves in moves_strategy()) {
                let mut e = MotionTrailEngine::new(TrailSettings::default());
                let mut now = 0u64;

                for (gap, x, y) in moves {
                    now += gap;
                    e.pointer_moved(
                        PixelPoint::new(x, y),
                        Timestamp::from_micros(now),
                        &[],
                    );

                    prop_assert!(
                        e.len() <= 15,
                        "queue grew past cap: {} points",
                        e.len()
                    );

                    let stamps: Vec<u64> =
                        e.points().map(|p| p.timestamp.as_micros()).collect();
                    for pair in stamps.windows(2) {
                        prop_assert!(
                            pair[0] <= pair[1],
                            "queue order violated: {:?}",
                            stamps
                        );
                    }
                }
            }

            /// Property: after an un-gated prune tick, no queued point is
            /// older than the lifetime.
            #[test]
            fn prune_removes_every_expired_point(
                moves in moves_strategy(),
                settle in 0u64..2_000_000,
            ) {
                let mut e = MotionTrailEngine::new(TrailSettings::default());
                let mut now = 0u64;

                for (gap, x, y) in moves {
                    now += gap;
                    e.pointer_moved(
                        PixelPoint::new(x, y),
                        Timestamp::from_micros(now),
                        &[],
                    );
                }

                now += settle;
                e.tick(Timestamp::from_micros(now));

                for point in e.points() {
                    let age = Timestamp::from_micros(now).since(point.timestamp);
                    prop_assert!(
                        age < 800_000,
                        "expired point survived prune: age {} us",
                        age
                    );
                }
            }

            /// Property: opacity is monotonically non-increasing with age
            /// and exactly zero from the lifetime onwards.
            #[test]
            fn opacity_monotone_in_age(a in 0u64..2_000_000, b in 0u64..2_000_000) {
                let e = MotionTrailEngine::new(TrailSettings::default());
                let (young, old) = if a <= b { (a, b) } else { (b, a) };

                prop_assert!(e.point_opacity(young) >= e.point_opacity(old));
                if old >= 800_000 {
                    prop_assert_eq!(e.point_opacity(old), 0.0);
                }
            }

            /// Property: throttling never rejects a move that arrives at or
            /// after the threshold since the last accepted one.
            #[test]
            fn throttle_accepts_spaced_moves(gaps in prop::collection::vec(16_000u64..200_000, 1..50)) {
                let mut e = MotionTrailEngine::new(TrailSettings::default());
                let mut now = 0u64;

                prop_assert!(e.pointer_moved(
                    PixelPoint::new(0.0, 0.0),
                    Timestamp::from_micros(now),
                    &[],
                ));

                for gap in gaps {
                    now += gap;
                    prop_assert!(e.pointer_moved(
                        PixelPoint::new(0.0, 0.0),
                        Timestamp::from_micros(now),
                        &[],
                    ));
                }
            }
        }
    }
}
