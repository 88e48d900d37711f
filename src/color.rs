//! Color Harmony - hex/HSL conversion, harmony schemes, contrast enforcement
//!
//! All functions are pure. Malformed hex input fails fast with
//! [`ColorError::InvalidColorFormat`]; callers should validate upstream.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Replacement foreground on dark backgrounds.
pub const WHITE: &str = "#FFFFFF";
/// Replacement foreground on light backgrounds.
pub const NEAR_BLACK: &str = "#1A1A2E";

/// WCAG AAA minimum for primary (headline) text.
pub const PRIMARY_TEXT_CONTRAST: f64 = 7.0;
/// WCAG AA minimum for secondary text.
pub const SECONDARY_TEXT_CONTRAST: f64 = 4.5;

const NEUTRAL_TINT_SATURATION: f64 = 15.0;
const DARK_NEUTRAL_LIGHTNESS: f64 = 8.0;
const LIGHT_NEUTRAL_LIGHTNESS: f64 = 96.0;
const MONOCHROME_STEP: f64 = 20.0;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    #[error("Invalid color format: {0:?} (expected #RRGGBB)")]
    InvalidColorFormat(String),
}

/// 8-bit sRGB triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Parse `#RRGGBB` or `RRGGBB`, case-insensitive.
    pub fn from_hex(hex: &str) -> Result<Self, ColorError> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ColorError::InvalidColorFormat(hex.to_string()));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&digits[i..i + 2], 16)
                .map_err(|_| ColorError::InvalidColorFormat(hex.to_string()))
        };
        Ok(Self {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
        })
    }

    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// HSL triple. `h` in [0, 360), `s` and `l` in [0, 100].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hsl {
    pub h: f64,
    pub s: f64,
    pub l: f64,
}

impl Hsl {
    /// Builds a normalized triple: hue wrapped, saturation/lightness clamped.
    pub fn new(h: f64, s: f64, l: f64) -> Self {
        Self {
            h: normalize_hue(h),
            s: clamp_percent(s),
            l: clamp_percent(l),
        }
    }

    pub fn rotate(self, degrees: f64) -> Self {
        Self::new(self.h + degrees, self.s, self.l)
    }

    pub fn with_lightness(self, l: f64) -> Self {
        Self::new(self.h, self.s, l)
    }

    pub fn with_saturation(self, s: f64) -> Self {
        Self::new(self.h, s, self.l)
    }
}

pub fn normalize_hue(h: f64) -> f64 {
    let wrapped = h.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

fn clamp_percent(v: f64) -> f64 {
    v.clamp(0.0, 100.0)
}

pub fn rgb_to_hsl(rgb: Rgb) -> Hsl {
    let r = f64::from(rgb.r) / 255.0;
    let g = f64::from(rgb.g) / 255.0;
    let b = f64::from(rgb.b) / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;

    if max == min {
        return Hsl { h: 0.0, s: 0.0, l: l * 100.0 };
    }

    let d = max - min;
    let s = if l > 0.5 { d / (2.0 - max - min) } else { d / (max + min) };
    let h = if max == r {
        (g - b) / d + if g < b { 6.0 } else { 0.0 }
    } else if max == g {
        (b - r) / d + 2.0
    } else {
        (r - g) / d + 4.0
    };

    Hsl {
        h: normalize_hue(h * 60.0),
        s: s * 100.0,
        l: l * 100.0,
    }
}

pub fn hsl_to_rgb(hsl: Hsl) -> Rgb {
    let hsl = Hsl::new(hsl.h, hsl.s, hsl.l);
    let h = hsl.h / 360.0;
    let s = hsl.s / 100.0;
    let l = hsl.l / 100.0;

    let (r, g, b) = if s == 0.0 {
        (l, l, l)
    } else {
        let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;
        (
            hue_to_channel(p, q, h + 1.0 / 3.0),
            hue_to_channel(p, q, h),
            hue_to_channel(p, q, h - 1.0 / 3.0),
        )
    };

    Rgb {
        r: to_byte(r),
        g: to_byte(g),
        b: to_byte(b),
    }
}

fn hue_to_channel(p: f64, q: f64, mut t: f64) -> f64 {
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_byte(channel: f64) -> u8 {
    (channel * 255.0).round().clamp(0.0, 255.0) as u8
}

pub fn hex_to_hsl(hex: &str) -> Result<Hsl, ColorError> {
    Rgb::from_hex(hex).map(rgb_to_hsl)
}

pub fn hsl_to_hex(hsl: Hsl) -> String {
    hsl_to_rgb(hsl).to_hex()
}

/// Uppercase `#RRGGBB` form of a valid hex color.
pub fn normalize_hex(hex: &str) -> Result<String, ColorError> {
    Rgb::from_hex(hex).map(Rgb::to_hex)
}

pub fn shift_hue(hex: &str, degrees: f64) -> Result<String, ColorError> {
    Ok(hsl_to_hex(hex_to_hsl(hex)?.rotate(degrees)))
}

/// Lowers every channel by `percent` of full scale, saturating at zero.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn darken(hex: &str, percent: f64) -> Result<String, ColorError> {
    let rgb = Rgb::from_hex(hex)?;
    let amount = (percent.clamp(0.0, 100.0) * 2.55).round() as u8;
    Ok(Rgb {
        r: rgb.r.saturating_sub(amount),
        g: rgb.g.saturating_sub(amount),
        b: rgb.b.saturating_sub(amount),
    }
    .to_hex())
}

// --- Harmony ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HarmonyScheme {
    Complementary,
    Analogous,
    Triadic,
    SplitComplementary,
    Tetradic,
    Monochromatic,
}

impl HarmonyScheme {
    pub const ALL: [Self; 6] = [
        Self::Complementary,
        Self::Analogous,
        Self::Triadic,
        Self::SplitComplementary,
        Self::Tetradic,
        Self::Monochromatic,
    ];

    /// Fixed hue offsets of the companion colors, in degrees.
    pub fn hue_offsets(self) -> &'static [f64] {
        match self {
            Self::Complementary => &[180.0],
            Self::Analogous => &[-30.0, 30.0],
            Self::Triadic => &[120.0, 240.0],
            Self::SplitComplementary => &[150.0, 210.0],
            Self::Tetradic => &[90.0, 180.0, 270.0],
            Self::Monochromatic => &[],
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Complementary => "complementary",
            Self::Analogous => "analogous",
            Self::Triadic => "triadic",
            Self::SplitComplementary => "split-complementary",
            Self::Tetradic => "tetradic",
            Self::Monochromatic => "monochromatic",
        }
    }
}

impl fmt::Display for HarmonyScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HarmonyScheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|scheme| scheme.as_str() == key)
            .ok_or_else(|| format!("unknown harmony scheme: {s}"))
    }
}

/// A color carried both as render-ready hex and as the exact HSL it was built from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Swatch {
    pub hex: String,
    pub hsl: Hsl,
}

impl Swatch {
    pub fn from_hsl(hsl: Hsl) -> Self {
        Self { hex: hsl_to_hex(hsl), hsl }
    }

    pub fn from_hex(hex: &str) -> Result<Self, ColorError> {
        let rgb = Rgb::from_hex(hex)?;
        Ok(Self { hex: rgb.to_hex(), hsl: rgb_to_hsl(rgb) })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Harmony {
    pub scheme: HarmonyScheme,
    pub base: Swatch,
    pub companions: Vec<Swatch>,
    /// Hue-tinted near-black for backgrounds.
    pub background_neutral: Swatch,
    /// Hue-tinted near-white for text.
    pub text_neutral: Swatch,
}

impl Harmony {
    /// Base followed by the companions.
    pub fn colors(&self) -> Vec<&Swatch> {
        std::iter::once(&self.base).chain(&self.companions).collect()
    }
}

/// Companion colors at the scheme's fixed hue offsets, holding base saturation
/// and lightness. Monochromatic steps lightness instead of hue.
pub fn generate_harmony(base: &str, scheme: HarmonyScheme) -> Result<Harmony, ColorError> {
    let base = Swatch::from_hex(base)?;
    let hsl = base.hsl;

    let companions = match scheme {
        HarmonyScheme::Monochromatic => vec![
            Swatch::from_hsl(hsl.with_lightness(hsl.l - MONOCHROME_STEP)),
            Swatch::from_hsl(hsl.with_lightness(hsl.l + MONOCHROME_STEP)),
        ],
        _ => scheme
            .hue_offsets()
            .iter()
            .map(|offset| Swatch::from_hsl(hsl.rotate(*offset)))
            .collect(),
    };

    let tint = hsl.s.min(NEUTRAL_TINT_SATURATION);
    Ok(Harmony {
        scheme,
        companions,
        background_neutral: Swatch::from_hsl(Hsl::new(hsl.h, tint, DARK_NEUTRAL_LIGHTNESS)),
        text_neutral: Swatch::from_hsl(Hsl::new(hsl.h, tint, LIGHT_NEUTRAL_LIGHTNESS)),
        base,
    })
}

// --- Contrast ---

/// WCAG relative luminance in [0, 1].
pub fn relative_luminance(rgb: Rgb) -> f64 {
    let linear = |c: u8| {
        let c = f64::from(c) / 255.0;
        if c <= 0.03928 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    };
    0.2126 * linear(rgb.r) + 0.7152 * linear(rgb.g) + 0.0722 * linear(rgb.b)
}

fn ratio_of(a: Rgb, b: Rgb) -> f64 {
    let la = relative_luminance(a);
    let lb = relative_luminance(b);
    (la.max(lb) + 0.05) / (la.min(lb) + 0.05)
}

/// Contrast ratio in [1, 21].
pub fn contrast_ratio(a: &str, b: &str) -> Result<f64, ColorError> {
    Ok(ratio_of(Rgb::from_hex(a)?, Rgb::from_hex(b)?))
}

/// Returns `fg` (normalized) when it meets `min_ratio` against `bg`, otherwise
/// [`WHITE`] on dark backgrounds and [`NEAR_BLACK`] on light ones.
pub fn ensure_contrast(fg: &str, bg: &str, min_ratio: f64) -> Result<String, ColorError> {
    let fg_rgb = Rgb::from_hex(fg)?;
    let bg_rgb = Rgb::from_hex(bg)?;

    if ratio_of(fg_rgb, bg_rgb) >= min_ratio {
        return Ok(fg_rgb.to_hex());
    }

    let replacement = if relative_luminance(bg_rgb) < 0.5 { WHITE } else { NEAR_BLACK };
    tracing::debug!(fg, bg, min_ratio, replacement, "foreground replaced for contrast");
    Ok(replacement.to_string())
}

// --- Palette harmony score ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HarmonyScore {
    pub overall: u32,
    pub balance: u32,
    pub contrast: u32,
    pub saturation_harmony: u32,
    pub temperature: u32,
}

/// Scores an existing palette: hue spread, lightness range, saturation
/// consistency and warm/cool balance. Fewer than two colors scores zero.
pub fn score_palette_harmony<S: AsRef<str>>(colors: &[S]) -> Result<HarmonyScore, ColorError> {
    if colors.len() < 2 {
        return Ok(HarmonyScore::default());
    }

    let hsl: Vec<Hsl> = colors
        .iter()
        .map(|c| hex_to_hsl(c.as_ref()))
        .collect::<Result<_, _>>()?;

    let hues: Vec<f64> = hsl.iter().map(|c| c.h).collect();
    let balance = std_dev(&hues).min(100.0);

    let (min_l, max_l) = hsl
        .iter()
        .fold((f64::MAX, f64::MIN), |(lo, hi), c| (lo.min(c.l), hi.max(c.l)));
    let contrast = ((max_l - min_l) / 80.0 * 100.0).min(100.0);

    let saturations: Vec<f64> = hsl.iter().map(|c| c.s).collect();
    let saturation_harmony = (100.0 - std_dev(&saturations)).max(0.0);

    let warm = hues.iter().filter(|h| **h < 60.0 || **h >= 300.0).count();
    let cool = hues.iter().filter(|h| (120.0..300.0).contains(*h)).count();
    #[allow(clippy::cast_precision_loss)]
    let temperature = 100.0 - (warm.abs_diff(cool) as f64 / hues.len() as f64) * 100.0;

    let overall = balance * 0.3 + contrast * 0.3 + saturation_harmony * 0.2 + temperature * 0.2;

    Ok(HarmonyScore {
        overall: to_score(overall),
        balance: to_score(balance),
        contrast: to_score(contrast),
        saturation_harmony: to_score(saturation_harmony),
        temperature: to_score(temperature),
    })
}

#[allow(clippy::cast_precision_loss)]
fn std_dev(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    (values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n).sqrt()
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub(crate) fn to_score(v: f64) -> u32 {
    v.round().clamp(0.0, 100.0) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hue_distance(a: f64, b: f64) -> f64 {
        let d = (a - b).abs() % 360.0;
        d.min(360.0 - d)
    }

    #[test]
    fn test_hex_parsing() {
        assert_eq!(Rgb::from_hex("#ff4757").unwrap(), Rgb { r: 255, g: 71, b: 87 });
        assert_eq!(Rgb::from_hex("FF4757").unwrap().to_hex(), "#FF4757");
        for bad in ["", "#", "#FFF", "#GG0000", "#FF47578", "rgb(0,0,0)", "#ÿÿÿ"] {
            assert!(
                matches!(Rgb::from_hex(bad), Err(ColorError::InvalidColorFormat(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_hsl_round_trip_within_one_unit() {
        // Lightness survives 8-bit hex everywhere. Hue and saturation are
        // checked only where chroma spans enough 8-bit steps: near black,
        // near white or near grey a single step moves them by several units.
        let mut h = 0.0;
        while h < 360.0 {
            let mut s = 0.0;
            while s <= 100.0 {
                let mut l = 0.0;
                while l <= 100.0 {
                    let back = hex_to_hsl(&hsl_to_hex(Hsl::new(h, s, l))).unwrap();
                    assert!((back.l - l).abs() <= 1.0, "light {l} -> {} at h={h} s={s}", back.l);
                    if s >= 40.0 && (35.0..=65.0).contains(&l) {
                        assert!(hue_distance(back.h, h) <= 1.0, "hue {h} -> {}", back.h);
                        assert!((back.s - s).abs() <= 1.0, "sat {s} -> {} at h={h} l={l}", back.s);
                    }
                    l += 5.0;
                }
                s += 10.0;
            }
            h += 7.5;
        }
    }

    #[test]
    fn test_lightness_round_trip_for_greys() {
        for l in 0..=100 {
            let back = hex_to_hsl(&hsl_to_hex(Hsl::new(0.0, 0.0, f64::from(l)))).unwrap();
            assert!((back.l - f64::from(l)).abs() <= 1.0);
            assert_eq!(back.s, 0.0);
        }
    }

    #[test]
    fn test_hex_round_trip_exact() {
        for hex in ["#FF4757", "#000000", "#FFFFFF", "#1A1A2E", "#3498DB", "#D4AF37", "#7F7F80"] {
            assert_eq!(hsl_to_hex(hex_to_hsl(hex).unwrap()), hex);
        }
    }

    #[test]
    fn test_complementary_scenario() {
        let harmony = generate_harmony("#FF4757", HarmonyScheme::Complementary).unwrap();
        let colors = harmony.colors();
        assert_eq!(colors.len(), 2);
        let base = colors[0].hsl;
        let second = colors[1].hsl;
        assert!((second.h - (base.h + 180.0) % 360.0).abs() < 1e-9);
        assert_eq!(second.s, base.s);
        assert_eq!(second.l, base.l);
    }

    #[test]
    fn test_scheme_offsets_and_neutrals() {
        for scheme in HarmonyScheme::ALL {
            let harmony = generate_harmony("#3498DB", scheme).unwrap();
            let base = harmony.base.hsl;
            for (swatch, offset) in harmony.companions.iter().zip(scheme.hue_offsets()) {
                assert!(hue_distance(swatch.hsl.h, base.h + offset) < 1e-9);
                assert_eq!(swatch.hsl.s, base.s);
            }
            assert!(harmony.background_neutral.hsl.l < 10.0);
            assert!(harmony.text_neutral.hsl.l > 90.0);
            assert_eq!(harmony.background_neutral.hsl.h, base.h);
        }
        let mono = generate_harmony("#3498DB", HarmonyScheme::Monochromatic).unwrap();
        assert_eq!(mono.companions.len(), 2);
        assert!(mono.companions[0].hsl.l < mono.base.hsl.l);
        assert!(mono.companions[1].hsl.l > mono.base.hsl.l);
    }

    #[test]
    fn test_scheme_parsing() {
        assert_eq!("split_complementary".parse::<HarmonyScheme>().unwrap(), HarmonyScheme::SplitComplementary);
        assert_eq!("Tetradic".parse::<HarmonyScheme>().unwrap(), HarmonyScheme::Tetradic);
        assert!("rainbow".parse::<HarmonyScheme>().is_err());
    }

    #[test]
    fn test_contrast_extremes() {
        let ratio = contrast_ratio("#FFFFFF", "#000000").unwrap();
        assert!((ratio - 21.0).abs() < 1e-9);
        assert!((contrast_ratio("#777777", "#777777").unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_ensure_contrast_invariant() {
        let samples = [
            "#000000", "#FFFFFF", "#FF4757", "#3498DB", "#777777", "#1A1A2E", "#F5F5F5", "#D4AF37",
            "#2ECC71", "#808080", "#404040", "#C0C0C0",
        ];
        for fg in samples {
            for bg in samples {
                for ratio in [3.0, PRIMARY_TEXT_CONTRAST, SECONDARY_TEXT_CONTRAST] {
                    let out = ensure_contrast(fg, bg, ratio).unwrap();
                    let meets = contrast_ratio(&out, bg).unwrap() >= ratio;
                    assert!(meets || out == WHITE || out == NEAR_BLACK, "{fg} on {bg} -> {out}");
                }
            }
        }
    }

    #[test]
    fn test_ensure_contrast_keeps_passing_fg() {
        assert_eq!(ensure_contrast("#ffffff", "#000000", 7.0).unwrap(), "#FFFFFF");
        assert_eq!(ensure_contrast("#777777", "#000000", 7.0).unwrap(), WHITE);
        assert_eq!(ensure_contrast("#777777", "#FFFFFF", 7.0).unwrap(), NEAR_BLACK);
        assert!(ensure_contrast("nope", "#FFFFFF", 7.0).is_err());
    }

    #[test]
    fn test_darken_saturates() {
        assert_eq!(darken("#3498DB", 20.0).unwrap(), "#0165A8");
        assert_eq!(darken("#101010", 50.0).unwrap(), "#000000");
    }

    #[test]
    fn test_palette_harmony_score() {
        assert_eq!(score_palette_harmony(&["#FF0000"]).unwrap(), HarmonyScore::default());
        let score = score_palette_harmony(&["#FF4757", "#47FFEF", "#1A1A2E"]).unwrap();
        assert!(score.overall > 0 && score.overall <= 100);
        assert!(score.contrast > 0);
        assert!(score_palette_harmony(&["#FF4757", "bad"]).is_err());
    }
}
