//! Focal-Point Resizer - re-derive a document for another canvas
//!
//! A resize is one uniform transform (scale + crop offset) applied to every
//! layer, followed by a safe-zone pass. Inputs are never mutated; every call
//! returns a fresh document sized exactly to the target format.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::config::EngineConfig;
use crate::document::{AdDocument, Bounds, DocumentError, Layer, LayerKind, Role};
use crate::formats::{AdFormat, FormatSpec};
use crate::typography::CHAR_WIDTH_EM;

/// Floor for [`auto_scale_text`].
pub const MIN_AUTO_FONT_SIZE: f64 = 12.0;

/// Canvas coordinate of the subject, in source pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FocalPoint {
    pub x: f64,
    pub y: f64,
}

/// Product center, else CTA center, else headline center, else canvas center.
/// Groups are searched too; the first layer of the best tier wins.
pub fn detect_focal_point(doc: &AdDocument) -> FocalPoint {
    let mut best: Option<(u8, Bounds)> = None;
    for layer in doc.all_layers() {
        let tier = match (&layer.kind, layer.role) {
            (LayerKind::Product(_), _) => 0,
            (LayerKind::Cta(_), _) | (_, Some(Role::Cta)) => 1,
            (_, Some(Role::Headline)) => 2,
            _ => continue,
        };
        if best.map_or(true, |(current, _)| tier < current) {
            best = Some((tier, layer.bounds));
            if tier == 0 {
                break;
            }
        }
    }
    let (x, y) = best.map_or_else(|| doc.canvas().center(), |(_, bounds)| bounds.center());
    FocalPoint { x, y }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResizeMode {
    /// Matching aspect ratios: each axis scales independently.
    Proportional,
    /// Uniform cover scale with a focal-centered crop on one axis.
    Crop,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CropPlan {
    pub mode: ResizeMode,
    pub scale_x: f64,
    pub scale_y: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl CropPlan {
    /// Scale applied to sizes that have no axis: fonts, radii, shadows.
    pub fn uniform_scale(&self) -> f64 {
        self.scale_x.min(self.scale_y)
    }

    pub fn apply(&self, b: Bounds) -> Bounds {
        Bounds::new(
            b.x * self.scale_x + self.offset_x,
            b.y * self.scale_y + self.offset_y,
            b.width * self.scale_x,
            b.height * self.scale_y,
        )
    }
}

/// Transform taking a `src_width` x `src_height` canvas onto `target`.
///
/// The crop offset is clamped to `[-(scaled - target), 0]` so the scaled
/// canvas always covers the target; no aspect ratio is unresizable.
pub fn plan_crop(src_width: u32, src_height: u32, target: &FormatSpec, focal: FocalPoint, aspect_epsilon: f64) -> CropPlan {
    let (sw, sh) = (f64::from(src_width), f64::from(src_height));
    let (tw, th) = (f64::from(target.width), f64::from(target.height));
    let src_ratio = sw / sh;
    let target_ratio = tw / th;

    if (src_ratio - target_ratio).abs() <= aspect_epsilon {
        return CropPlan {
            mode: ResizeMode::Proportional,
            scale_x: tw / sw,
            scale_y: th / sh,
            offset_x: 0.0,
            offset_y: 0.0,
        };
    }

    let (scale, offset_x, offset_y) = if target_ratio > src_ratio {
        // wider target: fit width, crop top/bottom
        let scale = tw / sw;
        (scale, 0.0, crop_offset(th, sh * scale, focal.y * scale))
    } else {
        // taller target: fit height, crop left/right
        let scale = th / sh;
        (scale, crop_offset(tw, sw * scale, focal.x * scale), 0.0)
    };

    CropPlan {
        mode: ResizeMode::Crop,
        scale_x: scale,
        scale_y: scale,
        offset_x,
        offset_y,
    }
}

fn crop_offset(target: f64, scaled: f64, focal: f64) -> f64 {
    let overflow = (scaled - target).max(0.0);
    (target / 2.0 - focal).max(-overflow).min(0.0)
}

fn transform_layer(layer: &Layer, plan: &CropPlan, canvas: Bounds) -> Layer {
    let mut out = layer.clone();
    let s = plan.uniform_scale();
    out.bounds = plan.apply(layer.bounds).rounded();

    match &mut out.kind {
        LayerKind::Background(_) => out.bounds = canvas,
        LayerKind::Image(img) | LayerKind::Product(img) => {
            img.shadow = img.shadow.as_ref().map(|sh| sh.scaled(s));
        }
        LayerKind::Text(text) => {
            text.font_size *= s;
            text.shadow = text.shadow.as_ref().map(|sh| sh.scaled(s));
        }
        LayerKind::Cta(cta) => {
            cta.font_size *= s;
            cta.corner_radius *= s;
            cta.shadow = cta.shadow.as_ref().map(|sh| sh.scaled(s));
        }
        LayerKind::Shape(shape) => shape.corner_radius *= s,
        LayerKind::Group(group) => {
            group.children = group
                .children
                .iter()
                .map(|child| transform_layer(child, plan, canvas))
                .collect();
        }
    }
    out
}

/// Keeps every layer out of the format's inset bands.
///
/// Layers are shifted into the safe area; a layer larger than the safe area
/// on an axis is shrunk to it. Text and CTA fonts shrink by the larger of
/// the two reductions. Groups are fitted child by child and then take the
/// union of their children's bounds.
pub fn apply_safe_zone(layers: &[Layer], spec: &FormatSpec) -> Vec<Layer> {
    let safe = spec.safe_area();
    layers.iter().map(|layer| fit_layer(layer, safe)).collect()
}

fn fit_layer(layer: &Layer, safe: Bounds) -> Layer {
    let mut out = layer.clone();

    if let LayerKind::Group(group) = &mut out.kind {
        group.children = group.children.iter().map(|child| fit_layer(child, safe)).collect();
        if let Some(union) = group.children.iter().map(|c| c.bounds).reduce(|a, b| a.union(&b)) {
            out.bounds = union;
            return out;
        }
    }

    let b = layer.bounds;
    let (x, width, fw) = fit_axis(b.x, b.width, safe.x, safe.right());
    let (y, height, fh) = fit_axis(b.y, b.height, safe.y, safe.bottom());
    out.bounds = Bounds::new(x, y, width, height);

    if out.bounds != b {
        tracing::debug!(layer = %layer.id, kind = layer.kind.name(), ?b, after = ?out.bounds, "safe zone adjusted");
    }

    let factor = fw.min(fh);
    if factor < 1.0 {
        match &mut out.kind {
            LayerKind::Text(text) => text.font_size = (text.font_size * factor).round().max(1.0),
            LayerKind::Cta(cta) => cta.font_size = (cta.font_size * factor).round().max(1.0),
            LayerKind::Background(_)
            | LayerKind::Image(_)
            | LayerKind::Product(_)
            | LayerKind::Shape(_)
            | LayerKind::Group(_) => {}
        }
    }
    out
}

/// Position, size and shrink factor of one axis inside `[lo, hi]`.
fn fit_axis(pos: f64, size: f64, lo: f64, hi: f64) -> (f64, f64, f64) {
    let room = hi - lo;
    if size > room {
        let factor = if size > 0.0 { room / size } else { 1.0 };
        (lo, room, factor)
    } else if pos < lo {
        (lo, size, 1.0)
    } else if pos + size > hi {
        (hi - size, size, 1.0)
    } else {
        (pos, size, 1.0)
    }
}

/// Shrinks the font of a text or CTA layer whose estimated single-line
/// width exceeds `max_width`, and clamps the layer to that width.
pub fn auto_scale_text(layer: &Layer, max_width: f64) -> Layer {
    let mut out = layer.clone();
    let (Some(text), Some(size)) = (layer.text(), layer.font_size()) else {
        return out;
    };
    #[allow(clippy::cast_precision_loss)]
    let estimated = text.chars().count() as f64 * size * CHAR_WIDTH_EM;
    if estimated <= max_width {
        return out;
    }
    let scaled = (size * max_width / estimated).round().max(MIN_AUTO_FONT_SIZE);
    match &mut out.kind {
        LayerKind::Text(t) => t.font_size = scaled,
        LayerKind::Cta(c) => c.font_size = scaled,
        _ => {}
    }
    out.bounds.width = max_width;
    out
}

#[derive(Debug, Clone)]
pub struct Resizer {
    aspect_epsilon: f64,
}

impl Default for Resizer {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}

impl Resizer {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            aspect_epsilon: config.resize.aspect_epsilon,
        }
    }

    /// New document for `target`. `focal` defaults to the detected focal point.
    pub fn smart_resize(&self, doc: &AdDocument, target: &FormatSpec, focal: Option<FocalPoint>) -> Result<AdDocument, DocumentError> {
        doc.validate()?;
        target.validate()?;

        let focal = focal.unwrap_or_else(|| detect_focal_point(doc));
        let plan = plan_crop(doc.width, doc.height, target, focal, self.aspect_epsilon);
        let canvas = Bounds::new(0.0, 0.0, f64::from(target.width), f64::from(target.height));

        let transformed: Vec<Layer> = doc.layers.iter().map(|l| transform_layer(l, &plan, canvas)).collect();

        tracing::debug!(
            source = %doc.id,
            target = %target.id,
            mode = ?plan.mode,
            scale = plan.uniform_scale(),
            offset_x = plan.offset_x,
            offset_y = plan.offset_y,
            "resize planned"
        );

        Ok(AdDocument {
            id: format!("{}_{}", doc.id, target.id),
            name: format!("{} ({})", doc.name, target.name),
            width: target.width,
            height: target.height,
            background_color: doc.background_color.clone(),
            layers: apply_safe_zone(&transformed, target),
        })
    }

    /// One document per format, all cropped around the same focal point.
    pub fn generate_multi_format_ads(
        &self,
        doc: &AdDocument,
        formats: &[AdFormat],
    ) -> Result<BTreeMap<AdFormat, AdDocument>, DocumentError> {
        let focal = detect_focal_point(doc);
        let mut out = BTreeMap::new();
        for format in formats {
            out.insert(*format, self.smart_resize(doc, &format.spec(), Some(focal))?);
        }
        tracing::info!(source = %doc.id, formats = out.len(), "formats generated");
        Ok(out)
    }

    pub fn export_format(&self, doc: &AdDocument, format: AdFormat) -> Result<AdDocument, DocumentError> {
        self.smart_resize(doc, &format.spec(), None)
    }
}

pub fn smart_resize(doc: &AdDocument, target: &FormatSpec, focal: Option<FocalPoint>) -> Result<AdDocument, DocumentError> {
    Resizer::default().smart_resize(doc, target, focal)
}

pub fn generate_multi_format_ads(doc: &AdDocument, formats: &[AdFormat]) -> Result<BTreeMap<AdFormat, AdDocument>, DocumentError> {
    Resizer::default().generate_multi_format_ads(doc, formats)
}

pub fn export_format(doc: &AdDocument, format: AdFormat) -> Result<AdDocument, DocumentError> {
    Resizer::default().export_format(doc, format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{BackgroundLayer, GroupLayer, ImageLayer, ShapeLayer, TextAlign, TextLayer};
    use crate::formats::SafeZone;

    fn text(id: &str, bounds: Bounds, size: f64) -> Layer {
        Layer::new(
            id,
            id,
            bounds,
            LayerKind::Text(TextLayer {
                text: "Sample copy".into(),
                font_family: "Inter".into(),
                font_weight: 400,
                font_size: size,
                color: "#000000".into(),
                align: TextAlign::Left,
                line_height: 1.2,
                shadow: None,
            }),
        )
    }

    fn product(bounds: Bounds) -> Layer {
        Layer::new("product", "Product", bounds, LayerKind::Product(ImageLayer::default()))
    }

    fn square_doc() -> AdDocument {
        let mut doc = AdDocument::new(1080, 1080, "#FFFFFF").unwrap();
        doc.id = "ad".into();
        doc.layers = vec![
            Layer::new("bg", "Background", doc.canvas(), LayerKind::Background(BackgroundLayer::default())),
            product(Bounds::new(340.0, 340.0, 400.0, 400.0)),
            text("headline", Bounds::new(90.0, 100.0, 900.0, 140.0), 72.0).with_role(Role::Headline),
        ];
        doc
    }

    #[test]
    fn test_focal_priority() {
        let mut doc = square_doc();
        assert_eq!(detect_focal_point(&doc), FocalPoint { x: 540.0, y: 540.0 });
        doc.layers.remove(1);
        assert_eq!(detect_focal_point(&doc), FocalPoint { x: 540.0, y: 170.0 });
        doc.layers.clear();
        assert_eq!(detect_focal_point(&doc), FocalPoint { x: 540.0, y: 540.0 });
    }

    #[test]
    fn test_focal_finds_product_inside_group() {
        let mut doc = square_doc();
        let nested = product(Bounds::new(0.0, 0.0, 100.0, 100.0));
        doc.layers = vec![
            text("headline", Bounds::new(0.0, 900.0, 100.0, 100.0), 20.0).with_role(Role::Headline),
            Layer::new("g", "Group", Bounds::default(), LayerKind::Group(GroupLayer { children: vec![nested] })),
        ];
        assert_eq!(detect_focal_point(&doc), FocalPoint { x: 50.0, y: 50.0 });
    }

    #[test]
    fn test_crop_plan_wider_target() {
        let wide = AdFormat::Wide.spec();
        let plan = plan_crop(1080, 1080, &wide, FocalPoint { x: 540.0, y: 540.0 }, 1e-3);
        assert_eq!(plan.mode, ResizeMode::Crop);
        let scale = 1200.0 / 1080.0;
        assert!((plan.scale_x - scale).abs() < 1e-12);
        assert_eq!(plan.offset_x, 0.0);
        let overflow = 1080.0 * scale - 627.0;
        assert!(plan.offset_y <= 0.0 && plan.offset_y >= -overflow);
    }

    #[test]
    fn test_crop_offset_clamped_at_edges() {
        let story = AdFormat::Story.spec();
        let left = plan_crop(1080, 1080, &story, FocalPoint { x: 0.0, y: 540.0 }, 1e-3);
        assert_eq!(left.offset_x, 0.0);
        let right = plan_crop(1080, 1080, &story, FocalPoint { x: 1080.0, y: 540.0 }, 1e-3);
        assert!((right.offset_x + 840.0).abs() < 1e-9);
    }

    #[test]
    fn test_matching_ratio_is_proportional() {
        let spec = FormatSpec::new("half", "Half", 540, 540, SafeZone::default()).unwrap();
        let resized = smart_resize(&square_doc(), &spec, None).unwrap();
        let headline = resized.find_by_role(Role::Headline).unwrap();
        assert_eq!(headline.bounds, Bounds::new(45.0, 50.0, 450.0, 70.0));
        assert_eq!(headline.font_size(), Some(36.0));
    }

    #[test]
    fn test_own_format_without_insets_is_identity() {
        let doc = square_doc();
        let own = FormatSpec::new("own", "Own", 1080, 1080, SafeZone::default()).unwrap();
        let resized = smart_resize(&doc, &own, None).unwrap();
        assert_eq!((resized.width, resized.height), (doc.width, doc.height));
        assert_eq!(resized.layers, doc.layers);
    }

    #[test]
    fn test_input_untouched_and_canvas_exact() {
        let doc = square_doc();
        let before = doc.clone();
        for format in AdFormat::ALL {
            let resized = export_format(&doc, format).unwrap();
            let spec = format.spec();
            assert_eq!((resized.width, resized.height), (spec.width, spec.height));
            assert_eq!(resized.id, format!("ad_{}", spec.id));
        }
        assert_eq!(doc, before);
    }

    #[test]
    fn test_safe_zone_shift_and_shrink() {
        let spec = FormatSpec::new("t", "T", 1000, 1000, SafeZone::new(100, 100, 50, 50)).unwrap();
        let layers = vec![
            text("top", Bounds::new(100.0, 20.0, 200.0, 50.0), 40.0),
            text("wide", Bounds::new(0.0, 500.0, 1800.0, 50.0), 40.0),
            Layer::new("shape", "Shape", Bounds::new(980.0, 500.0, 100.0, 100.0), LayerKind::Shape(ShapeLayer { fill: "#000000".into(), corner_radius: 0.0 })),
        ];
        let out = apply_safe_zone(&layers, &spec);
        assert_eq!(out[0].bounds, Bounds::new(100.0, 100.0, 200.0, 50.0));
        assert_eq!(out[0].font_size(), Some(40.0));
        assert_eq!(out[1].bounds, Bounds::new(50.0, 500.0, 900.0, 50.0));
        assert_eq!(out[1].font_size(), Some(20.0));
        assert_eq!(out[2].bounds, Bounds::new(850.0, 500.0, 100.0, 100.0));
    }

    #[test]
    fn test_safe_zone_group_takes_child_union() {
        let spec = FormatSpec::new("t", "T", 1000, 1000, SafeZone::uniform(100)).unwrap();
        let group = Layer::new(
            "g",
            "Group",
            Bounds::new(0.0, 0.0, 300.0, 300.0),
            LayerKind::Group(GroupLayer {
                children: vec![
                    text("a", Bounds::new(0.0, 0.0, 100.0, 100.0), 20.0),
                    text("b", Bounds::new(200.0, 200.0, 100.0, 100.0), 20.0),
                ],
            }),
        );
        let out = apply_safe_zone(&[group], &spec);
        assert_eq!(out[0].bounds, Bounds::new(100.0, 100.0, 200.0, 200.0));
    }

    #[test]
    fn test_multi_format_shares_focal_point() {
        let formats = [AdFormat::Square, AdFormat::Story, AdFormat::Wide];
        let out = generate_multi_format_ads(&square_doc(), &formats).unwrap();
        assert_eq!(out.len(), 3);
        assert_eq!(out[&AdFormat::Story].height, 1920);
        assert!(out.keys().copied().eq(formats));
    }

    #[test]
    fn test_auto_scale_text() {
        let layer = text("t", Bounds::new(0.0, 0.0, 800.0, 60.0), 40.0);
        // 11 chars * 40 * 0.6 = 264
        assert_eq!(auto_scale_text(&layer, 300.0), layer);
        let scaled = auto_scale_text(&layer, 132.0);
        assert_eq!(scaled.font_size(), Some(20.0));
        assert_eq!(scaled.bounds.width, 132.0);
        assert_eq!(auto_scale_text(&layer, 10.0).font_size(), Some(MIN_AUTO_FONT_SIZE));
        let shape = Layer::new("s", "s", Bounds::default(), LayerKind::Shape(ShapeLayer { fill: "#000000".into(), corner_radius: 0.0 }));
        assert_eq!(auto_scale_text(&shape, 1.0), shape);
    }

    #[test]
    fn test_invalid_inputs_rejected() {
        let mut doc = square_doc();
        doc.width = 0;
        assert!(smart_resize(&doc, &AdFormat::Square.spec(), None).is_err());
        let bad = FormatSpec {
            id: "bad".into(),
            name: "Bad".into(),
            width: 100,
            height: 100,
            safe_zone: SafeZone::uniform(60),
        };
        assert!(smart_resize(&square_doc(), &bad, None).is_err());
    }
}
