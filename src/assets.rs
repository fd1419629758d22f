// Image load accounting for the project gallery. A failed image counts as
// loaded and shows a placeholder glyph; the gallery must never wait on a
// broken asset.

use wasm_bindgen::prelude::*;

/// Counts image load/error signals against an expected total.
#[derive(Debug)]
pub struct ImageLoadTracker {
    expected: usize,
    loaded: usize,
    placeholders: Vec<String>,
}

impl ImageLoadTracker {
    pub fn new(expected: usize) -> Self {
        ImageLoadTracker {
            expected,
            loaded: 0,
            placeholders: Vec::new(),
        }
    }

    /// Record a successful load. Returns true once everything is in.
    pub fn record_loaded(&mut self) -> bool {
        self.loaded += 1;
        self.is_complete()
    }

    /// Record a failed load: the image still counts toward completion and
    /// its slot renders the placeholder glyph.
    pub fn record_error(&mut self, path: &str) -> bool {
        log::warn!("image failed to load, using placeholder: {path}");
        self.placeholders.push(path.to_string());
        self.record_loaded()
    }

    pub fn loaded(&self) -> usize {
        self.loaded
    }

    pub fn is_complete(&self) -> bool {
        self.loaded >= self.expected
    }

    pub fn uses_placeholder(&self, path: &str) -> bool {
        self.placeholders.iter().any(|p| p == path)
    }

    pub fn placeholders(&self) -> &[String] {
        &self.placeholders
    }
}

// =============================================================================
// WASM Bindings
// =============================================================================

/// WASM-exposed image tracker. The host wires `onLoad`/`onError` handlers to
/// the record calls and flips off its skeleton state when either returns
/// true.
#[wasm_bindgen]
pub struct WasmImageTracker {
    inner: ImageLoadTracker,
}

#[wasm_bindgen]
impl WasmImageTracker {
    #[wasm_bindgen(constructor)]
    pub fn new(expected: usize) -> WasmImageTracker {
        WasmImageTracker {
            inner: ImageLoadTracker::new(expected),
        }
    }

    pub fn record_loaded(&mut self) -> bool {
        self.inner.record_loaded()
    }

    pub fn record_error(&mut self, path: &str) -> bool {
        self.inner.record_error(path)
    }

    pub fn loaded(&self) -> usize {
        self.inner.loaded()
    }

    pub fn is_complete(&self) -> bool {
        self.inner.is_complete()
    }

    pub fn uses_placeholder(&self, path: &str) -> bool {
        self.inner.uses_placeholder(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completes_when_all_loaded() {
        let mut tracker = ImageLoadTracker::new(3);
        assert!(!tracker.record_loaded());
        assert!(!tracker.record_loaded());
        assert!(tracker.record_loaded());
        assert!(tracker.is_complete());
    }

    #[test]
    fn errors_count_toward_completion() {
        let mut tracker = ImageLoadTracker::new(2);
        assert!(!tracker.record_loaded());
        // The broken image completes the set instead of stalling it.
        assert!(tracker.record_error("/projects/shot.png"));
        assert!(tracker.uses_placeholder("/projects/shot.png"));
        assert!(!tracker.uses_placeholder("/projects/other.png"));
    }

    #[test]
    fn zero_expected_is_immediately_complete() {
        let tracker = ImageLoadTracker::new(0);
        assert!(tracker.is_complete());
    }
}
