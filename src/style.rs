//! Style Tables - fixed font/color lookups keyed by style and tone
//!
//! Style tokens arrive from an upstream strategic-analysis step; these tables
//! derive them from a single brand color when that step is not available.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::color::{darken, hex_to_hsl, hsl_to_hex, normalize_hex, ColorError, HarmonyScheme, Hsl};
use crate::document::{Border, Shadow, TextAlign};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VisualStyle {
    Luxury,
    Bold,
    Minimal,
    Playful,
    Editorial,
}

impl VisualStyle {
    pub const ALL: [Self; 5] = [Self::Luxury, Self::Bold, Self::Minimal, Self::Playful, Self::Editorial];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Luxury => "luxury",
            Self::Bold => "bold",
            Self::Minimal => "minimal",
            Self::Playful => "playful",
            Self::Editorial => "editorial",
        }
    }

    pub fn type_contrast(self) -> TypeContrast {
        match self {
            Self::Luxury => TypeContrast::Subtle,
            Self::Bold => TypeContrast::Extreme,
            Self::Minimal | Self::Playful | Self::Editorial => TypeContrast::Strong,
        }
    }

    pub fn harmony_scheme(self) -> HarmonyScheme {
        match self {
            Self::Luxury | Self::Minimal => HarmonyScheme::Monochromatic,
            Self::Bold => HarmonyScheme::Complementary,
            Self::Playful => HarmonyScheme::Triadic,
            Self::Editorial => HarmonyScheme::Analogous,
        }
    }

    pub fn default_tone(self) -> Tone {
        match self {
            Self::Luxury => Tone::Luxury,
            Self::Bold => Tone::Bold,
            Self::Minimal => Tone::Minimal,
            Self::Playful => Tone::Playful,
            Self::Editorial => Tone::Editorial,
        }
    }

    pub fn text_align(self) -> TextAlign {
        match self {
            Self::Luxury | Self::Minimal => TextAlign::Center,
            Self::Bold | Self::Playful | Self::Editorial => TextAlign::Left,
        }
    }

    pub fn cta_corner_radius(self) -> f64 {
        match self {
            Self::Minimal => 8.0,
            Self::Luxury => 0.0,
            Self::Bold | Self::Playful | Self::Editorial => 16.0,
        }
    }
}

impl fmt::Display for VisualStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VisualStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|style| style.as_str() == key)
            .ok_or_else(|| format!("unknown visual style: {s}"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    #[default]
    Professional,
    Luxury,
    Bold,
    Playful,
    Minimal,
    Editorial,
}

impl Tone {
    pub const ALL: [Self; 6] = [
        Self::Professional,
        Self::Luxury,
        Self::Bold,
        Self::Playful,
        Self::Minimal,
        Self::Editorial,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Professional => "professional",
            Self::Luxury => "luxury",
            Self::Bold => "bold",
            Self::Playful => "playful",
            Self::Minimal => "minimal",
            Self::Editorial => "editorial",
        }
    }

    /// Heading / body / CTA families.
    pub fn font_pairing(self) -> FontPairing {
        let (heading, body, cta) = match self {
            Self::Professional => ("Montserrat", "Inter", "Montserrat"),
            Self::Luxury => ("Playfair Display", "Raleway", "Raleway"),
            Self::Bold => ("Bebas Neue", "DM Sans", "Bebas Neue"),
            Self::Playful => ("Outfit", "Manrope", "Outfit"),
            Self::Minimal => ("Space Grotesk", "Inter", "Space Grotesk"),
            Self::Editorial => ("Crimson Pro", "Source Sans Pro", "Source Sans Pro"),
        };
        FontPairing {
            heading: heading.to_string(),
            body: body.to_string(),
            cta: cta.to_string(),
        }
    }

    fn heading_weight(self) -> u16 {
        match self {
            Self::Luxury => 400,
            Self::Bold => 900,
            _ => 700,
        }
    }

    fn heading_letter_spacing(self) -> f64 {
        match self {
            Self::Luxury => 0.05,
            Self::Minimal => -0.02,
            _ => 0.0,
        }
    }
}

impl FromStr for Tone {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|tone| tone.as_str() == key)
            .ok_or_else(|| format!("unknown tone: {s}"))
    }
}

/// Heading-to-body size ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeContrast {
    Subtle,
    Strong,
    Extreme,
}

impl TypeContrast {
    pub fn heading_multiplier(self) -> f64 {
        match self {
            Self::Subtle => 2.0,
            Self::Strong => 3.5,
            Self::Extreme => 5.0,
        }
    }
}

const HEADING_BASE_SIZE: f64 = 64.0;
const BODY_BASE_SIZE: f64 = 18.0;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FontPairing {
    pub heading: String,
    pub body: String,
    pub cta: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FontSpec {
    pub family: String,
    pub weight: u16,
    pub size: f64,
    pub line_height: f64,
    pub letter_spacing: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Typography {
    pub heading: FontSpec,
    pub body: FontSpec,
    pub cta_family: String,
    pub contrast: TypeContrast,
}

pub fn select_font_pairing(tone: Tone, contrast: TypeContrast) -> Typography {
    let pairing = tone.font_pairing();
    Typography {
        heading: FontSpec {
            family: pairing.heading,
            weight: tone.heading_weight(),
            size: HEADING_BASE_SIZE * contrast.heading_multiplier(),
            line_height: 1.1,
            letter_spacing: tone.heading_letter_spacing(),
        },
        body: FontSpec {
            family: pairing.body,
            weight: 400,
            size: BODY_BASE_SIZE,
            line_height: 1.5,
            letter_spacing: 0.0,
        },
        cta_family: pairing.cta,
        contrast,
    }
}

/// Five-role palette as hex strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Palette {
    pub primary: String,
    pub secondary: String,
    pub accent: String,
    pub background: String,
    pub text: String,
    pub scheme: HarmonyScheme,
}

impl Palette {
    pub fn validate(&self) -> Result<(), ColorError> {
        for hex in [&self.primary, &self.secondary, &self.accent, &self.background, &self.text] {
            normalize_hex(hex)?;
        }
        Ok(())
    }
}

const GOLD: Hsl = Hsl { h: 45.0, s: 80.0, l: 50.0 };

/// Style-specific palette derived from one brand color.
pub fn generate_color_harmony(base: &str, style: VisualStyle) -> Result<Palette, ColorError> {
    let b = hex_to_hsl(base)?;
    let roles: [Hsl; 5] = match style {
        VisualStyle::Luxury => [
            b,
            Hsl::new(b.h, b.s * 0.6, b.l * 1.2),
            GOLD,
            Hsl::new(b.h, b.s * 0.3, 95.0),
            Hsl::new(b.h, b.s, 20.0),
        ],
        VisualStyle::Bold => [
            b,
            b.rotate(180.0),
            Hsl::new(b.h + 30.0, 90.0, 55.0),
            Hsl::new(0.0, 0.0, 10.0),
            Hsl::new(0.0, 0.0, 98.0),
        ],
        VisualStyle::Playful => [
            b,
            b.rotate(120.0),
            b.rotate(240.0),
            Hsl::new(b.h, 20.0, 95.0),
            Hsl::new(b.h, b.s, 25.0),
        ],
        VisualStyle::Minimal => [
            Hsl::new(0.0, 0.0, 20.0),
            Hsl::new(0.0, 0.0, 60.0),
            b,
            Hsl::new(0.0, 0.0, 98.0),
            Hsl::new(0.0, 0.0, 15.0),
        ],
        VisualStyle::Editorial => [
            b,
            Hsl::new(b.h + 30.0, b.s * 0.8, b.l),
            Hsl::new(b.h - 30.0, b.s * 0.8, b.l),
            Hsl::new(b.h, 10.0, 96.0),
            Hsl::new(b.h, b.s, 18.0),
        ],
    };
    let [primary, secondary, accent, background, text] = roles.map(hsl_to_hex);
    Ok(Palette {
        primary,
        secondary,
        accent,
        background,
        text,
        scheme: style.harmony_scheme(),
    })
}

/// CTA treatment per style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ButtonStyle {
    pub background: String,
    pub shadow: Shadow,
    pub border: Option<Border>,
    pub corner_radius: f64,
}

pub fn button_style(accent: &str, style: VisualStyle) -> Result<ButtonStyle, ColorError> {
    let accent = normalize_hex(accent)?;
    let shadow = |color: &str, blur: f64, offset_y: f64, opacity: f64| Shadow {
        color: color.to_string(),
        blur,
        offset_x: 0.0,
        offset_y,
        opacity,
    };
    let (background, shadow, border) = match style {
        VisualStyle::Minimal => (accent.clone(), shadow("#000000", 20.0, 8.0, 0.15), None),
        VisualStyle::Bold => (accent.clone(), shadow(&accent, 25.0, 12.0, 0.4), None),
        VisualStyle::Luxury => (
            "#000000".to_string(),
            shadow("#000000", 30.0, 6.0, 0.3),
            Some(Border { color: accent.clone(), width: 1.0 }),
        ),
        VisualStyle::Playful => (accent.clone(), shadow("#000000", 22.0, 10.0, 0.2), None),
        VisualStyle::Editorial => (
            accent.clone(),
            shadow("#000000", 18.0, 7.0, 0.18),
            Some(Border { color: darken(&accent, 20.0)?, width: 1.0 }),
        ),
    };
    Ok(ButtonStyle {
        background,
        shadow,
        border,
        corner_radius: style.cta_corner_radius(),
    })
}

/// Color and font tokens consumed by the composer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleTokens {
    pub style: VisualStyle,
    #[serde(default)]
    pub tone: Tone,
    pub palette: Palette,
    pub fonts: FontPairing,
    /// Falls back to the style's own contrast.
    #[serde(default)]
    pub contrast: Option<TypeContrast>,
}

impl StyleTokens {
    pub fn from_brand_color(brand_color: &str, style: VisualStyle, tone: Tone) -> Result<Self, ColorError> {
        Ok(Self {
            style,
            tone,
            palette: generate_color_harmony(brand_color, style)?,
            fonts: tone.font_pairing(),
            contrast: None,
        })
    }

    pub fn type_contrast(&self) -> TypeContrast {
        self.contrast.unwrap_or_else(|| self.style.type_contrast())
    }

    pub fn typography(&self) -> Typography {
        let mut typography = select_font_pairing(self.tone, self.type_contrast());
        typography.heading.family = self.fonts.heading.clone();
        typography.body.family = self.fonts.body.clone();
        typography.cta_family = self.fonts.cta.clone();
        typography
    }
}
