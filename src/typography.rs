//! Typography Fit - bounded font-size reduction against an area estimate
//!
//! Each glyph is estimated at 0.6em wide and 1.2em tall. The estimate is
//! deliberately font-agnostic: it only has to be monotone in text length.

use serde::{Deserialize, Serialize};

/// Average glyph advance relative to font size.
pub const CHAR_WIDTH_EM: f64 = 0.6;
/// Line box height relative to font size.
pub const LINE_HEIGHT_EM: f64 = 1.2;
/// Share of the bounds the text may occupy.
pub const DEFAULT_FILL_RATIO: f64 = 0.9;
pub const DEFAULT_STEP: f64 = 2.0;

/// Tunables for [`find_fit_font_size_with`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FitParams {
    pub step: f64,
    pub fill_ratio: f64,
}

impl Default for FitParams {
    fn default() -> Self {
        Self {
            step: DEFAULT_STEP,
            fill_ratio: DEFAULT_FILL_RATIO,
        }
    }
}

/// Estimated area the text occupies at `font_size`.
#[allow(clippy::cast_precision_loss)]
pub fn estimated_text_area(text: &str, font_size: f64) -> f64 {
    let chars = text.chars().count() as f64;
    chars * (CHAR_WIDTH_EM * font_size) * (LINE_HEIGHT_EM * font_size)
}

/// Largest size in `[min_size, max_size]`, stepping down from `max_size`,
/// whose estimated area fits 90% of the bounds.
pub fn find_fit_font_size(
    text: &str,
    bounds_width: f64,
    bounds_height: f64,
    min_size: f64,
    max_size: f64,
) -> f64 {
    find_fit_font_size_with(text, bounds_width, bounds_height, min_size, max_size, FitParams::default())
}

/// As [`find_fit_font_size`] with explicit step and fill ratio.
///
/// Iterations are bounded by `(max_size - min_size) / step`. An inverted
/// range yields `min_size`.
pub fn find_fit_font_size_with(
    text: &str,
    bounds_width: f64,
    bounds_height: f64,
    min_size: f64,
    max_size: f64,
    params: FitParams,
) -> f64 {
    if max_size <= min_size {
        return min_size;
    }

    let budget = bounds_width.max(0.0) * bounds_height.max(0.0) * params.fill_ratio;
    let step = if params.step > 0.0 { params.step } else { DEFAULT_STEP };

    let mut size = max_size;
    while size > min_size && estimated_text_area(text, size) > budget {
        size -= step;
    }
    size.max(min_size)
}

/// Lines the text wraps to at `font_size` inside `width`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
pub fn estimated_line_count(text: &str, width: f64, font_size: f64) -> u32 {
    let chars = text.chars().count();
    if chars == 0 {
        return 0;
    }
    let per_line = (width / (CHAR_WIDTH_EM * font_size)).floor().max(1.0) as usize;
    chars.div_ceil(per_line) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_keeps_max_size() {
        assert_eq!(find_fit_font_size("Hi", 900.0, 140.0, 16.0, 96.0), 96.0);
    }

    #[test]
    fn test_long_text_shrinks() {
        let text = "An unusually long headline that would never fit at display size";
        let size = find_fit_font_size(text, 900.0, 140.0, 16.0, 96.0);
        assert!(size < 96.0);
        assert!(estimated_text_area(text, size) <= 900.0 * 140.0 * 0.9 || size == 16.0);
    }

    #[test]
    fn test_floor_at_min_size() {
        let text = "x".repeat(10_000);
        assert_eq!(find_fit_font_size(&text, 100.0, 20.0, 12.0, 97.0), 12.0);
        assert_eq!(find_fit_font_size("abc", 0.0, 0.0, 12.0, 40.0), 12.0);
    }

    #[test]
    fn test_inverted_range_returns_min() {
        assert_eq!(find_fit_font_size("abc", 100.0, 100.0, 30.0, 20.0), 30.0);
    }

    #[test]
    fn test_monotonic_in_length() {
        let mut previous = f64::MAX;
        for len in 0..400 {
            let text = "a".repeat(len);
            let size = find_fit_font_size(&text, 600.0, 120.0, 10.0, 120.0);
            assert!(size <= previous, "len {len}: {size} > {previous}");
            previous = size;
        }
    }

    #[test]
    fn test_counts_chars_not_bytes() {
        let ascii = find_fit_font_size("aaaaaaaaaaaaaaaaaaaa", 200.0, 40.0, 8.0, 64.0);
        let accented = find_fit_font_size("éééééééééééééééééééé", 200.0, 40.0, 8.0, 64.0);
        assert_eq!(ascii, accented);
    }

    #[test]
    fn test_line_count() {
        assert_eq!(estimated_line_count("", 100.0, 10.0), 0);
        // 6px per char at 10px -> 16 chars per 100px line
        assert_eq!(estimated_line_count(&"a".repeat(16), 100.0, 10.0), 1);
        assert_eq!(estimated_line_count(&"a".repeat(17), 100.0, 10.0), 2);
    }
}
