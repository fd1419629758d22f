// Intersection signal handling: one observation per element lifetime,
// trigger-once latching, and the fail-safe for runtimes without the
// observation API.

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// One component of a root-margin shorthand.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MarginValue {
    Px(f32),
    Percent(f32),
}

/// Parsed CSS margin shorthand for the observation root.
///
/// The browser applies the margin itself; the engine parses it so a typo in
/// config surfaces as a typed error instead of a silently dead observer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RootMargin {
    pub top: MarginValue,
    pub right: MarginValue,
    pub bottom: MarginValue,
    pub left: MarginValue,
}

impl RootMargin {
    pub fn zero() -> Self {
        RootMargin {
            top: MarginValue::Px(0.0),
            right: MarginValue::Px(0.0),
            bottom: MarginValue::Px(0.0),
            left: MarginValue::Px(0.0),
        }
    }

    /// Parse a 1-4 value margin shorthand (`"0px"`, `"-50px 0px"`, ...).
    /// Values must carry a `px` or `%` unit, as the observation API requires.
    pub fn parse(input: &str) -> Result<Self, EngineError> {
        let invalid = || EngineError::InvalidRootMargin(input.to_string());

        let values: Vec<MarginValue> = input
            .split_whitespace()
            .map(parse_margin_value)
            .collect::<Option<Vec<_>>>()
            .ok_or_else(invalid)?;

        let (top, right, bottom, left) = match values.as_slice() {
            [all] => (*all, *all, *all, *all),
            [tb, lr] => (*tb, *lr, *tb, *lr),
            [t, lr, b] => (*t, *lr, *b, *lr),
            [t, r, b, l] => (*t, *r, *b, *l),
            _ => return Err(invalid()),
        };

        Ok(RootMargin {
            top,
            right,
            bottom,
            left,
        })
    }
}

fn parse_margin_value(token: &str) -> Option<MarginValue> {
    if let Some(number) = token.strip_suffix("px") {
        number.parse().ok().map(MarginValue::Px)
    } else if let Some(number) = token.strip_suffix('%') {
        number.parse().ok().map(MarginValue::Percent)
    } else {
        None
    }
}

/// Lifecycle of one observation. Exactly one registration per element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ObservationPhase {
    Idle,
    Observing,
    Detached,
}

/// Tracks one element's "has entered the viewport" signal from intersection
/// callbacks forwarded by the host.
#[derive(Debug)]
pub struct ViewportObserver {
    threshold: f32,
    root_margin: RootMargin,
    trigger_once: bool,
    phase: ObservationPhase,
    intersecting: bool,
}

impl ViewportObserver {
    pub fn new(threshold: f32, root_margin: &str, trigger_once: bool) -> Result<Self, EngineError> {
        if !(0.0..=1.0).contains(&threshold) {
            return Err(EngineError::InvalidConfig(format!(
                "threshold {threshold} outside [0, 1]"
            )));
        }

        Ok(ViewportObserver {
            threshold,
            root_margin: RootMargin::parse(root_margin)?,
            trigger_once,
            phase: ObservationPhase::Idle,
            intersecting: false,
        })
    }

    pub fn root_margin(&self) -> RootMargin {
        self.root_margin
    }

    /// Start observing. A second registration for the same element is a
    /// config error (it would leak a callback).
    pub fn observe(&mut self) -> Result<(), EngineError> {
        match self.phase {
            ObservationPhase::Idle => {
                self.phase = ObservationPhase::Observing;
                Ok(())
            }
            ObservationPhase::Observing => Err(EngineError::ObservationState("observing")),
            ObservationPhase::Detached => Err(EngineError::ObservationState("detached")),
        }
    }

    /// Feed one intersection callback. Returns the current signal.
    ///
    /// The signal turns true when the reported ratio meets the threshold
    /// while intersecting. With `trigger_once` the observation detaches on
    /// that first success and the signal never reverts; otherwise leaving
    /// the viewport turns it false again.
    pub fn on_entry(&mut self, intersection_ratio: f32, is_intersecting: bool) -> bool {
        if self.phase != ObservationPhase::Observing {
            // Late callbacks after detach (or before observe) change nothing.
            return self.intersecting;
        }

        if is_intersecting && intersection_ratio >= self.threshold {
            self.intersecting = true;
            if self.trigger_once {
                self.phase = ObservationPhase::Detached;
            }
        } else if !is_intersecting {
            self.intersecting = false;
        }

        self.intersecting
    }

    /// The host should unobserve the DOM node once this returns true.
    pub fn wants_detach(&self) -> bool {
        self.phase == ObservationPhase::Detached
    }

    /// Teardown on unmount. Idempotent: trigger-once observations have often
    /// already detached themselves. Returns whether a live observation was
    /// actually released.
    pub fn unobserve(&mut self) -> bool {
        let was_observing = self.phase == ObservationPhase::Observing;
        self.phase = ObservationPhase::Detached;
        was_observing
    }

    /// Fail safe: the runtime has no observation API, so the element is
    /// treated as immediately and permanently visible.
    pub fn api_unavailable(&mut self) {
        log::warn!("intersection API unavailable; treating element as visible");
        self.intersecting = true;
        self.phase = ObservationPhase::Detached;
    }

    pub fn is_intersecting(&self) -> bool {
        self.intersecting
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn observer(threshold: f32, trigger_once: bool) -> ViewportObserver {
        let mut obs = ViewportObserver::new(threshold, "0px", trigger_once).unwrap();
        obs.observe().unwrap();
        obs
    }

    #[test]
    fn trigger_once_latches_and_detaches() {
        let mut obs = observer(0.2, true);
        assert!(!obs.is_intersecting());

        assert!(obs.on_entry(0.5, true));
        assert!(obs.wants_detach());

        // Leaving the viewport afterwards cannot un-latch the signal.
        assert!(obs.on_entry(0.0, false));
        assert!(obs.is_intersecting());
    }

    #[test]
    fn repeating_observer_toggles() {
        let mut obs = observer(0.2, false);

        assert!(obs.on_entry(0.5, true));
        assert!(!obs.on_entry(0.0, false));
        assert!(obs.on_entry(0.9, true));
    }

    #[test]
    fn ratio_below_threshold_does_not_fire() {
        let mut obs = observer(0.5, true);
        assert!(!obs.on_entry(0.3, true));
        assert!(!obs.wants_detach());
        assert!(obs.on_entry(0.5, true));
    }

    #[test]
    fn double_observe_is_rejected() {
        let mut obs = ViewportObserver::new(0.2, "0px", true).unwrap();
        obs.observe().unwrap();
        assert!(obs.observe().is_err());
    }

    #[test]
    fn unobserve_is_idempotent() {
        let mut obs = observer(0.2, true);
        obs.on_entry(1.0, true);
        // Already self-detached; teardown releases nothing but does not fail.
        assert!(!obs.unobserve());
        assert!(!obs.unobserve());
    }

    #[test]
    fn unavailable_api_fails_safe_to_visible() {
        let mut obs = ViewportObserver::new(0.2, "0px", true).unwrap();
        obs.api_unavailable();
        assert!(obs.is_intersecting());
        // Signals after the fallback are ignored.
        assert!(obs.on_entry(0.0, false));
    }

    #[test]
    fn invalid_threshold_is_rejected() {
        assert!(ViewportObserver::new(1.5, "0px", true).is_err());
        assert!(ViewportObserver::new(-0.1, "0px", true).is_err());
    }

    #[test]
    fn root_margin_shorthand_expansion() {
        let m = RootMargin::parse("0px").unwrap();
        assert_eq!(m.top, MarginValue::Px(0.0));
        assert_eq!(m.left, MarginValue::Px(0.0));

        let m = RootMargin::parse("-50px 10%").unwrap();
        assert_eq!(m.top, MarginValue::Px(-50.0));
        assert_eq!(m.bottom, MarginValue::Px(-50.0));
        assert_eq!(m.right, MarginValue::Percent(10.0));
        assert_eq!(m.left, MarginValue::Percent(10.0));

        let m = RootMargin::parse("1px 2px 3px 4px").unwrap();
        assert_eq!(m.right, MarginValue::Px(2.0));
        assert_eq!(m.left, MarginValue::Px(4.0));
    }

    #[test]
    fn root_margin_rejects_unitless_and_overflow() {
        assert!(RootMargin::parse("10").is_err());
        assert!(RootMargin::parse("").is_err());
        assert!(RootMargin::parse("1px 2px 3px 4px 5px").is_err());
        assert!(RootMargin::parse("abcpx").is_err());
    }
}
