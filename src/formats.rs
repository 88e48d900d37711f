//! Format Table - named target canvases and their safe zones
//!
//! The table is static configuration: callers pick from it, they do not edit it.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::document::{check_canvas, Bounds, DocumentError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdFormat {
    Square,
    Story,
    Reels,
    Vertical,
    Wide,
}

impl AdFormat {
    pub const ALL: [Self; 5] = [Self::Square, Self::Story, Self::Reels, Self::Vertical, Self::Wide];

    /// Formats fanned out when the caller does not choose.
    pub const DEFAULT_SET: [Self; 4] = [Self::Square, Self::Story, Self::Vertical, Self::Wide];

    pub fn id(self) -> &'static str {
        match self {
            Self::Square => "square",
            Self::Story => "story",
            Self::Reels => "reels",
            Self::Vertical => "vertical",
            Self::Wide => "wide",
        }
    }

    pub fn spec(self) -> FormatSpec {
        let (name, width, height, safe_zone) = match self {
            Self::Square => ("Feed Square (1:1)", 1080, 1080, SafeZone::uniform(40)),
            // top: profile header, bottom: reply bar
            Self::Story => ("Story (9:16)", 1080, 1920, SafeZone::new(250, 300, 40, 40)),
            Self::Reels => ("Reels (9:16)", 1080, 1920, SafeZone::new(200, 350, 40, 40)),
            Self::Vertical => ("Short-form Vertical (9:16)", 1080, 1920, SafeZone::new(100, 400, 40, 40)),
            Self::Wide => ("Wide (1.91:1)", 1200, 627, SafeZone::uniform(40)),
        };
        FormatSpec {
            id: self.id().to_string(),
            name: name.to_string(),
            width,
            height,
            safe_zone,
        }
    }
}

impl fmt::Display for AdFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for AdFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        let aliased = match key.as_str() {
            "feed" | "meta_feed" => "square",
            "meta_story" => "story",
            "meta_reels" => "reels",
            "tiktok" | "short_form_vertical" => "vertical",
            "linkedin" | "landscape" => "wide",
            other => other,
        };
        Self::ALL
            .into_iter()
            .find(|f| f.id() == aliased)
            .ok_or_else(|| format!("unknown format: {s}"))
    }
}

/// Four-sided inset in pixels reserved for platform chrome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SafeZone {
    pub top: u32,
    pub bottom: u32,
    pub left: u32,
    pub right: u32,
}

impl SafeZone {
    pub const fn new(top: u32, bottom: u32, left: u32, right: u32) -> Self {
        Self { top, bottom, left, right }
    }

    pub const fn uniform(inset: u32) -> Self {
        Self::new(inset, inset, inset, inset)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormatSpec {
    pub id: String,
    pub name: String,
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub safe_zone: SafeZone,
}

impl FormatSpec {
    /// Checked constructor: positive canvas, each inset below half its dimension.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        width: u32,
        height: u32,
        safe_zone: SafeZone,
    ) -> Result<Self, DocumentError> {
        let spec = Self {
            id: id.into(),
            name: name.into(),
            width,
            height,
            safe_zone,
        };
        spec.validate()?;
        Ok(spec)
    }

    pub fn validate(&self) -> Result<(), DocumentError> {
        check_canvas(self.width, self.height)?;
        let SafeZone { top, bottom, left, right } = self.safe_zone;
        let checks = [
            ("top", top, self.height),
            ("bottom", bottom, self.height),
            ("left", left, self.width),
            ("right", right, self.width),
        ];
        for (side, inset, dimension) in checks {
            if u64::from(inset) * 2 >= u64::from(dimension) {
                return Err(DocumentError::InvalidFormat(format!(
                    "{}: {side} inset {inset} must be below half of {dimension}",
                    self.id
                )));
            }
        }
        Ok(())
    }

    pub fn aspect_ratio(&self) -> f64 {
        f64::from(self.width) / f64::from(self.height)
    }

    /// Canvas area left after removing the inset bands.
    pub fn safe_area(&self) -> Bounds {
        let z = self.safe_zone;
        Bounds::new(
            f64::from(z.left),
            f64::from(z.top),
            f64::from(self.width) - f64::from(z.left) - f64::from(z.right),
            f64::from(self.height) - f64::from(z.top) - f64::from(z.bottom),
        )
    }

    /// The four inset bands, each as a canvas box. Empty bands are skipped.
    pub fn inset_bands(&self) -> Vec<Bounds> {
        let w = f64::from(self.width);
        let h = f64::from(self.height);
        let z = self.safe_zone;
        [
            Bounds::new(0.0, 0.0, w, f64::from(z.top)),
            Bounds::new(0.0, h - f64::from(z.bottom), w, f64::from(z.bottom)),
            Bounds::new(0.0, 0.0, f64::from(z.left), h),
            Bounds::new(w - f64::from(z.right), 0.0, f64::from(z.right), h),
        ]
        .into_iter()
        .filter(|band| band.area() > 0.0)
        .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    #[default]
    Meta,
    Tiktok,
    Linkedin,
    All,
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "meta" | "facebook" | "instagram" => Ok(Self::Meta),
            "tiktok" => Ok(Self::Tiktok),
            "linkedin" => Ok(Self::Linkedin),
            "all" => Ok(Self::All),
            other => Err(format!("unknown platform: {other}")),
        }
    }
}

/// Formats a platform places ads in.
pub fn recommended_formats(platform: Platform) -> Vec<AdFormat> {
    match platform {
        Platform::Meta => vec![AdFormat::Square, AdFormat::Story, AdFormat::Reels],
        Platform::Tiktok => vec![AdFormat::Vertical],
        Platform::Linkedin => vec![AdFormat::Wide],
        Platform::All => AdFormat::ALL.to_vec(),
    }
}

/// Every built-in format spec, in table order.
pub fn format_table() -> Vec<FormatSpec> {
    AdFormat::ALL.into_iter().map(AdFormat::spec).collect()
}
