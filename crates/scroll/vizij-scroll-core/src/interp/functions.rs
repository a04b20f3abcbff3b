//! Interpolation helpers:
//! - value_at (clamped linear map, rounded to hundredths)
//! - progress (scroll position as a fraction of `over`)
//! - round_hundredths (half away from zero)
//! - format_css_number (JS-style number text for style values)

/// Round to two decimals, half away from zero.
#[inline]
pub fn round_hundredths(x: f64) -> f64 {
    // Every f64 at or above 2^52 is already an integer.
    if x.abs() >= 4_503_599_627_370_496.0 {
        return x;
    }
    (x * 100.0).round() / 100.0
}

/// A scroll distance is usable when it is finite and strictly positive.
#[inline]
pub fn is_valid_over(over: f64) -> bool {
    over.is_finite() && over > 0.0
}

/// Fraction of `over` covered by `scroll_pos`, clamped to `[0, 1]`. NaN maps
/// to 0.
#[inline]
pub fn progress(over: f64, scroll_pos: f64) -> f64 {
    if scroll_pos.is_nan() {
        return 0.0;
    }
    (scroll_pos / over).clamp(0.0, 1.0)
}

/// Linear scroll-to-value map.
///
/// `from + (to - from) * scroll_pos / over`, rounded to hundredths, then clamped
/// to `[min(from, to), max(from, to)]`. A NaN endpoint or position, or an
/// `over` rejected by [`is_valid_over`], yields `from`.
pub fn value_at(from: f64, to: f64, over: f64, scroll_pos: f64) -> f64 {
    // 0 * inf would otherwise produce NaN for degenerate tweens.
    if from == to || from.is_nan() || to.is_nan() || scroll_pos.is_nan() {
        return from;
    }
    if !is_valid_over(over) {
        return from;
    }
    // Positions past either end clamp to that end, so the position can be
    // clamped up front without changing the result.
    let pos = scroll_pos.clamp(0.0, over);
    let span = to - from;
    let raw = if span.is_finite() {
        let scaled = span * pos;
        if scaled.is_finite() {
            from + scaled / over
        } else {
            from + span * (pos / over)
        }
    } else {
        // Endpoints of opposite sign near f64::MAX.
        let t = progress(over, pos);
        from * (1.0 - t) + to * t
    };
    if raw.is_nan() {
        return from;
    }
    let rounded = round_hundredths(raw);
    if from <= to {
        rounded.clamp(from, to)
    } else {
        rounded.clamp(to, from)
    }
}

/// Format a number the way a style value expects it: `1` rather than `1.0`,
/// and never `-0`.
pub fn format_css_number(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    format!("{value}")
}
