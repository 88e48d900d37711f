//! Layout Geometry - per-style bounding boxes for the composer
//!
//! Positions and proportional sizes scale with the canvas. Fixed pixel
//! heights are authored against a 1080px reference canvas and scale by
//! `height / 1080` so the programs stay proportional on any target.

use serde::{Deserialize, Serialize};

use crate::document::{check_canvas, Bounds, DocumentError};
use crate::style::VisualStyle;

/// Edge length of the reference canvas the fixed sizes are authored for.
pub const REFERENCE_CANVAS: f64 = 1080.0;
pub const GRID_COLUMNS: f64 = 12.0;
const PADDING_RATIO: f64 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutBoxes {
    pub headline: Bounds,
    pub subheadline: Bounds,
    pub product: Bounds,
    pub cta: Bounds,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub badge: Option<Bounds>,
}

impl LayoutBoxes {
    /// Every box, badge last when present.
    pub fn boxes(&self) -> Vec<Bounds> {
        let mut out = vec![self.headline, self.subheadline, self.product, self.cta];
        out.extend(self.badge);
        out
    }
}

/// Compositional program for `style` on a `width` x `height` canvas.
///
/// - luxury: centered, symmetric, generous whitespace
/// - bold: diagonal and asymmetric, with a promo badge
/// - minimal: twelve-column grid
/// - playful: scattered, organic offsets
/// - editorial: Z-pattern, magazine-style
pub fn calculate_layout(style: VisualStyle, width: u32, height: u32) -> Result<LayoutBoxes, DocumentError> {
    check_canvas(width, height)?;
    let w = f64::from(width);
    let h = f64::from(height);
    let pad = w * PADDING_RATIO;
    // fixed heights, reference px
    let fh = |px: f64| px * h / REFERENCE_CANVAS;

    let boxes = match style {
        VisualStyle::Luxury => LayoutBoxes {
            headline: Bounds::new(pad, h * 0.15, w - pad * 2.0, fh(180.0)),
            subheadline: Bounds::new(pad * 2.0, h * 0.35, w - pad * 4.0, fh(100.0)),
            product: Bounds::new(w * 0.2, h * 0.5, w * 0.6, h * 0.35),
            cta: Bounds::new(pad * 3.0, h * 0.88, w - pad * 6.0, fh(70.0)),
            badge: None,
        },
        VisualStyle::Bold => {
            let badge = 150.0 * w.min(h) / REFERENCE_CANVAS;
            LayoutBoxes {
                headline: Bounds::new(pad, h * 0.08, w * 0.7, fh(200.0)),
                subheadline: Bounds::new(w * 0.55, h * 0.25, w * 0.4, fh(80.0)),
                product: Bounds::new(0.0, h * 0.35, w * 0.8, h * 0.45),
                cta: Bounds::new(w * 0.6, h * 0.85, 350.0 * w / REFERENCE_CANVAS, fh(85.0)),
                badge: Some(Bounds::new(w * 0.05, h * 0.05, badge, badge)),
            }
        }
        VisualStyle::Minimal => {
            let unit = w / GRID_COLUMNS;
            LayoutBoxes {
                headline: Bounds::new(unit, h * 0.12, unit * 10.0, fh(140.0)),
                subheadline: Bounds::new(unit, h * 0.28, unit * 8.0, fh(60.0)),
                product: Bounds::new(unit, h * 0.42, unit * 10.0, h * 0.38),
                cta: Bounds::new(unit * 2.0, h * 0.88, unit * 8.0, fh(65.0)),
                badge: None,
            }
        }
        VisualStyle::Playful => LayoutBoxes {
            headline: Bounds::new(pad * 1.5, h * 0.1, w * 0.8, fh(160.0)),
            subheadline: Bounds::new(pad * 2.5, h * 0.27, w * 0.7, fh(90.0)),
            product: Bounds::new(w * 0.1, h * 0.4, w * 0.8, h * 0.4),
            cta: Bounds::new(pad * 2.0, h * 0.86, w - pad * 4.0, fh(75.0)),
            badge: None,
        },
        VisualStyle::Editorial => LayoutBoxes {
            headline: Bounds::new(pad * 1.2, h * 0.1, w - pad * 2.4, fh(150.0)),
            subheadline: Bounds::new(pad * 1.2, h * 0.26, w * 0.65, fh(70.0)),
            product: Bounds::new(w * 0.15, h * 0.38, w * 0.7, h * 0.42),
            cta: Bounds::new(w * 0.65, h * 0.87, w * 0.3, fh(60.0)),
            badge: None,
        },
    };
    Ok(boxes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_minimal_grid_square() {
        let boxes = calculate_layout(VisualStyle::Minimal, 1080, 1080).unwrap();
        assert!(approx(boxes.headline.x, 90.0));
        assert!(approx(boxes.headline.width, 900.0));
        assert!(approx(boxes.headline.height, 140.0));
        assert!(approx(boxes.cta.x, 180.0));
        assert!(boxes.badge.is_none());
    }

    #[test]
    fn test_only_bold_has_badge() {
        for style in VisualStyle::ALL {
            let boxes = calculate_layout(style, 1080, 1080).unwrap();
            assert_eq!(boxes.badge.is_some(), style == VisualStyle::Bold, "{style}");
        }
    }

    #[test]
    fn test_boxes_stay_on_canvas() {
        for style in VisualStyle::ALL {
            for (w, h) in [(1080, 1080), (1080, 1920), (1200, 627)] {
                let canvas = Bounds::new(0.0, 0.0, f64::from(w), f64::from(h));
                for b in calculate_layout(style, w, h).unwrap().boxes() {
                    assert!(canvas.contains(&b), "{style} {w}x{h}: {b:?}");
                }
            }
        }
    }

    #[test]
    fn test_fixed_heights_scale_with_canvas() {
        let tall = calculate_layout(VisualStyle::Luxury, 1080, 1920).unwrap();
        assert!(approx(tall.headline.height, 180.0 * 1920.0 / 1080.0));
        let bold = calculate_layout(VisualStyle::Bold, 1200, 627).unwrap();
        let badge = bold.badge.unwrap();
        assert!(approx(badge.width, badge.height));
    }

    #[test]
    fn test_zero_canvas_is_an_error() {
        assert!(matches!(
            calculate_layout(VisualStyle::Minimal, 0, 1080),
            Err(DocumentError::InvalidCanvas { .. })
        ));
    }
}
