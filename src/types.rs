// Strong typing over strings. Newtypes for timestamps and pixel units, plus
// the serde-backed configuration the host hands across the boundary.

use serde::{Deserialize, Serialize};

/// Timestamp in microseconds. Newtype for type safety.
///
/// Host clocks (`performance.now()`) are float milliseconds; they cross the
/// boundary through [`Timestamp::from_millis_f64`] and stay integral inside
/// the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct Timestamp(u64);

impl Timestamp {
    pub fn from_micros(us: u64) -> Self {
        Timestamp(us)
    }

    /// Convert a float-millisecond host clock reading. Negative readings
    /// clamp to zero.
    pub fn from_millis_f64(ms: f64) -> Self {
        Timestamp((ms.max(0.0) * 1000.0) as u64)
    }

    pub fn as_micros(&self) -> u64 {
        self.0
    }

    pub fn as_millis(&self) -> f64 {
        self.0 as f64 / 1000.0
    }

    pub fn as_secs(&self) -> f64 {
        self.0 as f64 / 1_000_000.0
    }

    /// Elapsed time since `earlier`, saturating at zero for out-of-order
    /// clock readings.
    pub fn since(&self, earlier: Timestamp) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}

/// A point in viewport pixels (CSS pixels, origin top-left).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct PixelPoint {
    pub x: f32,
    pub y: f32,
}

impl PixelPoint {
    pub fn new(x: f32, y: f32) -> Self {
        PixelPoint { x, y }
    }
}

/// Vertical direction of a parallax drift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Up,
    Down,
}

/// Engine configuration passed from JS. Every section and field has a
/// default, so `{}` is a valid config.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct EngineConfig {
    #[serde(default)]
    pub reveal: RevealSettings,
    #[serde(default)]
    pub parallax: ParallaxSettings,
    #[serde(default)]
    pub trail: TrailSettings,
    #[serde(default)]
    pub scroll: ScrollSettings,
    #[serde(default)]
    pub stars: StarSettings,
}

/// Reveal-on-intersection settings for one element.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevealSettings {
    /// Intersection ratio that counts as "entered the viewport".
    #[serde(default = "default_threshold")]
    pub threshold: f32,
    /// CSS margin shorthand applied to the observation root.
    #[serde(default = "default_root_margin")]
    pub root_margin: String,
    /// Detach after the first successful intersection.
    #[serde(default = "default_true")]
    pub trigger_once: bool,
    /// Presentation delay surfaced as `transition-delay`. Does not move the
    /// logical transition.
    #[serde(default)]
    pub delay_ms: u32,
    /// Class applied while revealed (alongside `in-view`).
    #[serde(default)]
    pub animation_class: String,
    /// Class applied before reveal. The default suppresses paint.
    #[serde(default = "default_fallback_class")]
    pub fallback_class: String,
}

impl Default for RevealSettings {
    fn default() -> Self {
        RevealSettings {
            threshold: default_threshold(),
            root_margin: default_root_margin(),
            trigger_once: true,
            delay_ms: 0,
            animation_class: String::new(),
            fallback_class: default_fallback_class(),
        }
    }
}

fn default_threshold() -> f32 {
    0.2
}

fn default_root_margin() -> String {
    "0px".to_string()
}

fn default_fallback_class() -> String {
    "opacity-0".to_string()
}

fn default_true() -> bool {
    true
}

/// Parallax drift settings for one element.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParallaxSettings {
    /// Offset multiplier. Negative values drift against the scroll.
    #[serde(default = "default_parallax_speed")]
    pub speed: f32,
    #[serde(default)]
    pub direction: Direction,
}

impl Default for ParallaxSettings {
    fn default() -> Self {
        ParallaxSettings {
            speed: default_parallax_speed(),
            direction: Direction::Up,
        }
    }
}

fn default_parallax_speed() -> f32 {
    0.2
}

/// Pointer-trail settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrailSettings {
    /// Hard cap on queued trail points; older points are evicted first.
    #[serde(default = "default_max_points")]
    pub max_points: usize,
    /// Age at which a point leaves the trail.
    #[serde(default = "default_point_lifetime")]
    pub point_lifetime_us: u64,
    /// Minimum spacing between accepted pointer-move samples (~60 Hz).
    #[serde(default = "default_update_threshold")]
    pub update_threshold_us: u64,
    /// Minimum spacing between prune sweeps (~30 Hz).
    #[serde(default = "default_prune_interval")]
    pub prune_interval_us: u64,
}

impl Default for TrailSettings {
    fn default() -> Self {
        TrailSettings {
            max_points: default_max_points(),
            point_lifetime_us: default_point_lifetime(),
            update_threshold_us: default_update_threshold(),
            prune_interval_us: default_prune_interval(),
        }
    }
}

fn default_max_points() -> usize {
    15
}

fn default_point_lifetime() -> u64 {
    800_000 // 800ms
}

fn default_update_threshold() -> u64 {
    16_000 // one 60Hz frame
}

fn default_prune_interval() -> u64 {
    30_000 // ~30Hz
}

/// Section tracking and smooth-scroll settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrollSettings {
    /// Page sections in document order. First match wins.
    #[serde(default = "default_sections")]
    pub sections: Vec<String>,
    /// Lookahead added to scrollY so a section activates slightly early.
    #[serde(default = "default_lookahead")]
    pub lookahead_px: f64,
    /// Fixed-navbar height subtracted from scroll targets.
    #[serde(default = "default_nav_offset")]
    pub nav_offset_px: f64,
    /// Wall-clock duration of the smooth-scroll animation.
    #[serde(default = "default_scroll_duration")]
    pub scroll_duration_us: u64,
    /// scrollY past which the navbar switches to its scrolled style.
    #[serde(default = "default_nav_scrolled_threshold")]
    pub nav_scrolled_threshold_px: f64,
    /// scrollY past which the back-to-top control shows.
    #[serde(default = "default_back_to_top_threshold")]
    pub back_to_top_threshold_px: f64,
}

impl Default for ScrollSettings {
    fn default() -> Self {
        ScrollSettings {
            sections: default_sections(),
            lookahead_px: default_lookahead(),
            nav_offset_px: default_nav_offset(),
            scroll_duration_us: default_scroll_duration(),
            nav_scrolled_threshold_px: default_nav_scrolled_threshold(),
            back_to_top_threshold_px: default_back_to_top_threshold(),
        }
    }
}

fn default_sections() -> Vec<String> {
    ["home", "about", "skills", "projects"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_lookahead() -> f64 {
    100.0
}

fn default_nav_offset() -> f64 {
    80.0
}

fn default_scroll_duration() -> u64 {
    1_000_000 // 1s
}

fn default_nav_scrolled_threshold() -> f64 {
    20.0
}

fn default_back_to_top_threshold() -> f64 {
    500.0
}

/// Decorative star-field sizing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StarSettings {
    #[serde(default = "default_nav_stars")]
    pub nav_stars: usize,
    #[serde(default = "default_backdrop_stars")]
    pub backdrop_stars: usize,
    #[serde(default = "default_planets")]
    pub planets: usize,
    #[serde(default = "default_black_holes")]
    pub black_holes: usize,
}

impl Default for StarSettings {
    fn default() -> Self {
        StarSettings {
            nav_stars: default_nav_stars(),
            backdrop_stars: default_backdrop_stars(),
            planets: default_planets(),
            black_holes: default_black_holes(),
        }
    }
}

fn default_nav_stars() -> usize {
    20
}

fn default_backdrop_stars() -> usize {
    300
}

fn default_planets() -> usize {
    3
}

fn default_black_holes() -> usize {
    2
}
