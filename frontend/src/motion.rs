//! Scroll and animation math shared by the page components. Nothing in here
//! touches the DOM, so it runs under plain `cargo test`.

pub const NAV_SCROLL_THRESHOLD: f64 = 60.0;

pub const COUNTER_DURATION_MS: f64 = 1_500.0;
pub const COUNTER_STAGGER_MS: u32 = 100;

pub fn ease_out_cubic(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(3)
}

/// Nav bar switches to its compact look once the page is scrolled past the threshold.
pub fn is_scrolled(offset: f64) -> bool {
    offset > NAV_SCROLL_THRESHOLD
}

/// Reads a `data-count` value the way `parseInt(v, 10)` does, except that
/// input with no leading digits yields 0 instead of NaN and values past the
/// `i64` range saturate.
pub fn parse_count(raw: &str) -> i64 {
    let s = raw.trim_start();
    let (sign, digits) = match s.as_bytes().first() {
        Some(b'-') => (-1, &s[1..]),
        Some(b'+') => (1, &s[1..]),
        _ => (1, s),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return 0;
    }
    match digits[..end].parse::<i64>() {
        Ok(n) => sign * n,
        Err(_) if sign < 0 => i64::MIN,
        Err(_) => i64::MAX,
    }
}

pub fn counter_delay_ms(index: usize) -> u32 {
    COUNTER_STAGGER_MS.saturating_mul(index as u32)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CounterFrame {
    pub value: i64,
    pub done: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CounterAnimation {
    pub target: i64,
    pub duration_ms: f64,
}

impl CounterAnimation {
    pub fn new(target: i64) -> Self {
        Self { target, duration_ms: COUNTER_DURATION_MS }
    }

    pub fn frame(&self, elapsed_ms: f64) -> CounterFrame {
        let progress = if self.duration_ms <= 0.0 {
            1.0
        } else {
            (elapsed_ms / self.duration_ms).clamp(0.0, 1.0)
        };
        if progress >= 1.0 {
            return CounterFrame { value: self.target, done: true };
        }
        let value = (self.target as f64 * ease_out_cubic(progress)).round() as i64;
        CounterFrame { value, done: false }
    }
}

/// Page offset that puts `target_top` (viewport-relative) just under a nav bar of `nav_height`.
pub fn anchor_scroll_top(target_top: f64, scroll_y: f64, nav_height: f64) -> f64 {
    target_top + scroll_y - nav_height
}

/// Hero background transform, or `None` once the hero has scrolled out of view.
pub fn parallax_transform(scrolled: f64, viewport_height: f64) -> Option<String> {
    if scrolled >= viewport_height {
        return None;
    }
    Some(format!(
        "scale({}) translateY({}px)",
        1.05 - scrolled * 0.00005,
        scrolled * 0.2
    ))
}
