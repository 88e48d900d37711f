//! Document Composer - content + geometry + tokens into an AdDocument
//!
//! Composition happens in two steps: build a styled template for the
//! canvas, then bind the brief's content into it. Binding is shared with
//! [`Composer::compose_template`], so caller-supplied templates go through
//! the same role resolution, font fitting and contrast enforcement.
//!
//! Missing content is never an error: the template's default copy stays.

use serde::{Deserialize, Serialize};

use crate::color::{ensure_contrast, relative_luminance, Rgb};
use crate::config::{ContrastConfig, EngineConfig, TypographyConfig};
use crate::document::{
    AdDocument, BackgroundLayer, Bounds, CtaLayer, DocumentError, FitMode, GroupLayer, ImageLayer, Layer,
    LayerKind, Role, Shadow, ShapeLayer, TextAlign, TextLayer,
};
use crate::layout::{calculate_layout, REFERENCE_CANVAS};
use crate::style::{button_style, StyleTokens, VisualStyle};
use crate::typography::find_fit_font_size_with;

pub const DEFAULT_HEADLINE: &str = "PREMIUM PRODUCT";
pub const DEFAULT_BODY: &str = "The perfect solution for you";
pub const DEFAULT_CTA: &str = "SHOP NOW";
pub const DEFAULT_BADGE: &str = "SALE";

const Z_BACKGROUND: i32 = 0;
const Z_PRODUCT: i32 = 2;
const Z_TEXT: i32 = 3;
const Z_CTA: i32 = 4;
const Z_BADGE: i32 = 5;

const BADGE_ROTATION: f64 = -15.0;
const CTA_FONT_SIZE: f64 = 22.0;
const BADGE_FONT_SIZE: f64 = 36.0;

/// Copy and asset references from the content-generation step.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContentBrief {
    pub brand_name: Option<String>,
    pub headline: Option<String>,
    /// Subheadline or description copy.
    pub description: Option<String>,
    pub cta: Option<String>,
    pub social_proof: Option<String>,
    pub offer: Option<String>,
    pub product_image: Option<String>,
    pub background_image: Option<String>,
}

/// Brief field a text-bearing layer receives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentSlot {
    Headline,
    Body,
    Cta,
    Price,
    SocialProof,
}

impl ContentSlot {
    pub fn value(self, brief: &ContentBrief) -> Option<&str> {
        let field = match self {
            Self::Headline => &brief.headline,
            Self::Body => &brief.description,
            Self::Cta => &brief.cta,
            Self::Price => &brief.offer,
            Self::SocialProof => &brief.social_proof,
        };
        field.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }
}

impl From<Role> for ContentSlot {
    fn from(role: Role) -> Self {
        match role {
            Role::Headline => Self::Headline,
            Role::Subheadline | Role::Description => Self::Body,
            Role::Cta => Self::Cta,
            Role::Price => Self::Price,
            Role::SocialProof => Self::SocialProof,
        }
    }
}

/// How a slot was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BindingTier {
    Role,
    NameHeuristic,
    /// CTA layers fall back to the CTA slot when their name says nothing.
    Kind,
}

/// Checked in order. Body comes first: "subheadline" contains "headline".
const NAME_HEURISTICS: &[(&[&str], ContentSlot)] = &[
    (&["subheadline", "description"], ContentSlot::Body),
    (&["headline", "hook"], ContentSlot::Headline),
    (&["social", "proof", "review", "testimonial"], ContentSlot::SocialProof),
    (&["cta", "button", "→"], ContentSlot::Cta),
];

/// Slot for a text-bearing layer: explicit role first, then name heuristics,
/// then the layer kind for CTAs. Layers without text never bind.
pub fn resolve_slot(layer: &Layer) -> Option<(ContentSlot, BindingTier)> {
    layer.text()?;
    if let Some(role) = layer.role {
        return Some((role.into(), BindingTier::Role));
    }
    let label = if layer.name.is_empty() { &layer.id } else { &layer.name };
    let key = label.to_lowercase();
    let by_name = NAME_HEURISTICS
        .iter()
        .find(|(needles, _)| needles.iter().any(|n| key.contains(n)))
        .map(|(_, slot)| (*slot, BindingTier::NameHeuristic));
    match (&layer.kind, by_name) {
        (_, Some(found)) => Some(found),
        (LayerKind::Cta(_), None) => Some((ContentSlot::Cta, BindingTier::Kind)),
        _ => None,
    }
}

/// Product contact shadow strength.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShadowPreset {
    Subtle,
    Normal,
    Dramatic,
}

impl ShadowPreset {
    pub fn for_style(style: VisualStyle) -> Self {
        match style {
            VisualStyle::Luxury => Self::Subtle,
            VisualStyle::Bold => Self::Dramatic,
            VisualStyle::Minimal | VisualStyle::Playful | VisualStyle::Editorial => Self::Normal,
        }
    }

    /// Metrics are authored for a 500px subject and scale with its longer side.
    /// Opacity scales too, capped at fully opaque.
    pub fn shadow_for(self, subject: Bounds) -> Shadow {
        let (blur, offset_y, opacity) = match self {
            Self::Subtle => (12.0, 4.0, 0.15),
            Self::Normal => (24.0, 10.0, 0.25),
            Self::Dramatic => (40.0, 20.0, 0.4),
        };
        let scale = subject.width.max(subject.height) / 500.0;
        Shadow {
            color: "#000000".to_string(),
            blur: blur * scale,
            offset_x: 0.0,
            offset_y: offset_y * scale,
            opacity: (opacity * scale).clamp(0.0, 1.0),
        }
    }
}

/// Shadow that keeps text legible; stronger when text and backdrop
/// luminances are close.
pub fn readability_shadow(backdrop: &str, text_color: &str) -> Result<Shadow, DocumentError> {
    let bg = relative_luminance(Rgb::from_hex(backdrop)?);
    let fg = relative_luminance(Rgb::from_hex(text_color)?);
    let light_backdrop = bg > 0.5;

    let shadow = if (bg - fg).abs() < 0.4 {
        Shadow {
            color: if light_backdrop { "#000000" } else { "#FFFFFF" }.to_string(),
            blur: 8.0,
            offset_x: 0.0,
            offset_y: 2.0,
            opacity: 0.8,
        }
    } else {
        Shadow {
            color: "#000000".to_string(),
            blur: 4.0,
            offset_x: 0.0,
            offset_y: 1.0,
            opacity: if light_backdrop { 0.25 } else { 0.4 },
        }
    };
    Ok(shadow)
}

#[derive(Debug, Clone)]
pub struct Composer {
    width: u32,
    height: u32,
    typography: TypographyConfig,
    contrast: ContrastConfig,
    shadow: ShadowPreset,
}

impl Default for Composer {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}

impl Composer {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            width: 1080,
            height: 1080,
            typography: config.typography.clone(),
            contrast: config.contrast.clone(),
            shadow: ShadowPreset::Normal,
        }
    }

    /// Contact shadow given to template products that carry none.
    pub fn with_shadow_preset(mut self, preset: ShadowPreset) -> Self {
        self.shadow = preset;
        self
    }

    /// Canvas the composed document is laid out on.
    pub fn with_canvas(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn compose(&self, brief: &ContentBrief, tokens: &StyleTokens) -> Result<AdDocument, DocumentError> {
        let template = self.build_template(tokens, brief.brand_name.as_deref())?;
        let doc = self.compose_template(&template, brief)?;
        tracing::info!(
            id = %doc.id,
            style = %tokens.style,
            layers = doc.layers.len(),
            "document composed"
        );
        Ok(doc)
    }

    /// Styled document with default copy for `tokens.style`.
    pub fn build_template(&self, tokens: &StyleTokens, brand_name: Option<&str>) -> Result<AdDocument, DocumentError> {
        tokens.palette.validate()?;
        let style = tokens.style;
        let palette = &tokens.palette;
        let typography = tokens.typography();
        let boxes = calculate_layout(style, self.width, self.height)?;
        let button = button_style(&palette.accent, style)?;

        let scale = f64::from(self.width) / REFERENCE_CANVAS;
        let align = style.text_align();

        let mut doc = AdDocument::new(self.width, self.height, palette.background.clone())?;
        doc.id = format!("ad_{style}_{}x{}", self.width, self.height);
        doc.name = match brand_name.map(str::trim).filter(|s| !s.is_empty()) {
            Some(brand) => format!("{brand} {} Ad", title_case(style.as_str())),
            None => format!("{} Template", title_case(style.as_str())),
        };

        let mut layers = vec![
            Layer::new(
                "background",
                "Background",
                doc.canvas(),
                LayerKind::Background(BackgroundLayer {
                    color: Some(palette.background.clone()),
                    image_ref: None,
                }),
            )
            .with_z_index(Z_BACKGROUND),
            Layer::new(
                "product",
                "Product Image",
                boxes.product,
                LayerKind::Product(ImageLayer {
                    image_ref: None,
                    fit: FitMode::Contain,
                    shadow: Some(ShadowPreset::for_style(style).shadow_for(boxes.product)),
                }),
            )
            .with_z_index(Z_PRODUCT),
            Layer::new(
                "headline",
                "Headline",
                boxes.headline,
                LayerKind::Text(TextLayer {
                    text: DEFAULT_HEADLINE.to_string(),
                    font_family: typography.heading.family.clone(),
                    font_weight: typography.heading.weight,
                    font_size: typography.heading.size * scale,
                    color: palette.text.clone(),
                    align,
                    line_height: typography.heading.line_height,
                    shadow: None,
                }),
            )
            .with_role(Role::Headline)
            .with_z_index(Z_TEXT),
            Layer::new(
                "subheadline",
                "Subheadline",
                boxes.subheadline,
                LayerKind::Text(TextLayer {
                    text: DEFAULT_BODY.to_string(),
                    font_family: typography.body.family.clone(),
                    font_weight: 600,
                    font_size: typography.body.size * 1.3 * scale,
                    color: palette.secondary.clone(),
                    align,
                    line_height: 1.4,
                    shadow: None,
                }),
            )
            .with_role(Role::Subheadline)
            .with_z_index(Z_TEXT),
            Layer::new(
                "cta",
                "Call to Action",
                boxes.cta,
                LayerKind::Cta(CtaLayer {
                    text: DEFAULT_CTA.to_string(),
                    font_family: typography.cta_family.clone(),
                    font_weight: 800,
                    font_size: CTA_FONT_SIZE * scale,
                    background_color: button.background.clone(),
                    text_color: if style == VisualStyle::Luxury {
                        palette.accent.clone()
                    } else {
                        "#FFFFFF".to_string()
                    },
                    corner_radius: button.corner_radius,
                    shadow: Some(button.shadow),
                    border: button.border,
                }),
            )
            .with_role(Role::Cta)
            .with_z_index(Z_CTA),
        ];

        if let Some(badge) = boxes.badge {
            let label = Bounds::new(
                badge.x + badge.width * 0.15,
                badge.y + badge.height * 0.3,
                badge.width * 0.7,
                badge.height * 0.4,
            );
            let children = vec![
                Layer::new(
                    "badge-shape",
                    "Badge Shape",
                    badge,
                    LayerKind::Shape(ShapeLayer {
                        fill: palette.accent.clone(),
                        corner_radius: badge.width / 2.0,
                    }),
                )
                .with_rotation(BADGE_ROTATION),
                Layer::new(
                    "badge-text",
                    "Badge Text",
                    label,
                    LayerKind::Text(TextLayer {
                        text: DEFAULT_BADGE.to_string(),
                        font_family: typography.heading.family.clone(),
                        font_weight: 900,
                        font_size: BADGE_FONT_SIZE * scale,
                        color: "#FFFFFF".to_string(),
                        align: TextAlign::Center,
                        line_height: 1.0,
                        shadow: None,
                    }),
                )
                .with_role(Role::Price)
                .with_rotation(BADGE_ROTATION),
            ];
            layers.push(
                Layer::new("badge", "Promo Badge", badge, LayerKind::Group(GroupLayer { children }))
                    .with_z_index(Z_BADGE),
            );
        }

        doc.layers = layers;
        Ok(doc)
    }

    /// Binds `brief` into a copy of `template`. The template is not modified.
    pub fn compose_template(&self, template: &AdDocument, brief: &ContentBrief) -> Result<AdDocument, DocumentError> {
        template.validate()?;
        let mut doc = template.clone();
        let backdrop = doc
            .layers
            .iter()
            .find_map(|layer| match &layer.kind {
                LayerKind::Background(bg) => bg.color.clone(),
                _ => None,
            })
            .unwrap_or_else(|| doc.background_color.clone());
        self.bind_layers(&mut doc.layers, brief, &backdrop)?;
        Ok(doc)
    }

    fn bind_layers(&self, layers: &mut [Layer], brief: &ContentBrief, backdrop: &str) -> Result<(), DocumentError> {
        // Shapes at this level act as the backdrop of anything they enclose.
        let panels: Vec<(Bounds, String)> = layers
            .iter()
            .filter_map(|layer| match &layer.kind {
                LayerKind::Shape(shape) => Some((layer.bounds, shape.fill.clone())),
                _ => None,
            })
            .collect();

        for layer in layers.iter_mut() {
            let local = panels
                .iter()
                .find(|(bounds, _)| bounds.contains(&layer.bounds))
                .map_or(backdrop, |(_, fill)| fill.as_str());

            if layer.text().is_some() {
                self.bind_text(layer, brief, local)?;
                continue;
            }
            let bounds = layer.bounds;
            match &mut layer.kind {
                LayerKind::Group(group) => self.bind_layers(&mut group.children, brief, local)?,
                LayerKind::Background(bg) => {
                    if let Some(image) = &brief.background_image {
                        bg.image_ref = Some(image.clone());
                    }
                }
                LayerKind::Product(product) => {
                    if let Some(image) = &brief.product_image {
                        product.image_ref = Some(image.clone());
                    }
                    if product.shadow.is_none() {
                        product.shadow = Some(self.shadow.shadow_for(bounds));
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn bind_text(&self, layer: &mut Layer, brief: &ContentBrief, backdrop: &str) -> Result<(), DocumentError> {
        // Unbound layers keep their copy but are still fitted and contrast-checked.
        let slot = resolve_slot(layer).map(|(slot, tier)| {
            tracing::debug!(layer = %layer.id, ?slot, ?tier, "slot resolved");
            slot
        });
        let content = slot.and_then(|slot| slot.value(brief));
        if slot.is_some() && content.is_none() {
            tracing::debug!(layer = %layer.id, ?slot, "no content for slot, keeping template copy");
        }

        let (min_size, min_ratio) = match slot {
            Some(ContentSlot::Headline) => (self.typography.headline_min_size, self.contrast.primary_min),
            Some(ContentSlot::Cta) => (self.typography.cta_min_size, self.contrast.secondary_min),
            Some(ContentSlot::Body | ContentSlot::Price | ContentSlot::SocialProof) | None => {
                (self.typography.body_min_size, self.contrast.secondary_min)
            }
        };
        let bounds = layer.bounds;
        let params = self.typography.fit_params();
        let fit = |text: &str, current: f64| {
            find_fit_font_size_with(text, bounds.width, bounds.height, min_size, current.max(min_size), params)
        };

        match &mut layer.kind {
            LayerKind::Text(text) => {
                if let Some(copy) = content {
                    text.text = copy.to_string();
                }
                text.font_size = fit(&text.text, text.font_size);
                text.color = ensure_contrast(&text.color, backdrop, min_ratio)?;
                if text.shadow.is_none() {
                    text.shadow = Some(readability_shadow(backdrop, &text.color)?);
                }
            }
            LayerKind::Cta(cta) => {
                if let Some(copy) = content {
                    cta.text = copy.to_string();
                }
                cta.font_size = fit(&cta.text, cta.font_size);
                cta.text_color = ensure_contrast(&cta.text_color, &cta.background_color, min_ratio)?;
            }
            _ => {}
        }
        Ok(())
    }
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// [`Composer::compose`] with default configuration on a 1080x1080 canvas.
pub fn compose(brief: &ContentBrief, tokens: &StyleTokens) -> Result<AdDocument, DocumentError> {
    Composer::default().compose(brief, tokens)
}

/// [`Composer::compose_template`] with default configuration.
pub fn compose_template(template: &AdDocument, brief: &ContentBrief) -> Result<AdDocument, DocumentError> {
    Composer::default().compose_template(template, brief)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::contrast_ratio;
    use crate::typography::estimated_text_area;

    fn tokens(style: VisualStyle) -> StyleTokens {
        StyleTokens::from_brand_color("#FF4757", style, style.default_tone()).unwrap()
    }

    fn brief() -> ContentBrief {
        ContentBrief {
            brand_name: Some("Acme".into()),
            headline: Some("Run Faster Today".into()),
            description: Some("Lightweight trainers for every distance".into()),
            cta: Some("Get Yours".into()),
            offer: Some("-30%".into()),
            product_image: Some("assets/shoe.png".into()),
            ..ContentBrief::default()
        }
    }

    fn text_of<'a>(doc: &'a AdDocument, id: &str) -> &'a str {
        doc.all_layers()
            .into_iter()
            .find(|l| l.id == id)
            .and_then(Layer::text)
            .unwrap()
    }

    fn text_layer(name: &str) -> Layer {
        Layer::new(
            name.to_lowercase(),
            name,
            Bounds::new(0.0, 0.0, 500.0, 100.0),
            LayerKind::Text(TextLayer {
                text: "x".into(),
                font_family: "Inter".into(),
                font_weight: 400,
                font_size: 20.0,
                color: "#000000".into(),
                align: Default::default(),
                line_height: 1.2,
                shadow: None,
            }),
        )
    }

    #[test]
    fn test_role_beats_name() {
        let layer = text_layer("Headline").with_role(Role::Cta);
        assert_eq!(resolve_slot(&layer), Some((ContentSlot::Cta, BindingTier::Role)));
    }

    #[test]
    fn test_name_heuristics_order() {
        let cases = [
            ("Subheadline", Some(ContentSlot::Body)),
            ("Main Headline", Some(ContentSlot::Headline)),
            ("Opening hook", Some(ContentSlot::Headline)),
            ("Product Description", Some(ContentSlot::Body)),
            ("Buy Button", Some(ContentSlot::Cta)),
            ("Shop →", Some(ContentSlot::Cta)),
            ("Social Proof", Some(ContentSlot::SocialProof)),
            ("Customer Reviews", Some(ContentSlot::SocialProof)),
            ("Disclaimer", None),
        ];
        for (name, expected) in cases {
            let resolved = resolve_slot(&text_layer(name)).map(|(slot, _)| slot);
            assert_eq!(resolved, expected, "{name}");
        }
    }

    #[test]
    fn test_non_text_layers_never_bind() {
        let layer = Layer::new(
            "cta-bg",
            "CTA background",
            Bounds::default(),
            LayerKind::Shape(ShapeLayer { fill: "#000000".into(), corner_radius: 0.0 }),
        );
        assert_eq!(resolve_slot(&layer), None);
    }

    #[test]
    fn test_compose_binds_content() {
        let doc = compose(&brief(), &tokens(VisualStyle::Bold)).unwrap();
        assert_eq!(text_of(&doc, "headline"), "Run Faster Today");
        assert_eq!(text_of(&doc, "subheadline"), "Lightweight trainers for every distance");
        assert_eq!(text_of(&doc, "cta"), "Get Yours");
        assert_eq!(text_of(&doc, "badge-text"), "-30%");
        let product = doc.layers.iter().find(|l| l.id == "product").unwrap();
        match &product.kind {
            LayerKind::Product(img) => {
                assert_eq!(img.image_ref.as_deref(), Some("assets/shoe.png"));
                assert!(img.shadow.is_some());
            }
            other => panic!("unexpected kind {}", other.name()),
        }
        assert_eq!(doc.name, "Acme Bold Ad");
    }

    #[test]
    fn test_missing_content_keeps_defaults() {
        let doc = compose(&ContentBrief::default(), &tokens(VisualStyle::Minimal)).unwrap();
        assert_eq!(text_of(&doc, "headline"), DEFAULT_HEADLINE);
        assert_eq!(text_of(&doc, "subheadline"), DEFAULT_BODY);
        assert_eq!(text_of(&doc, "cta"), DEFAULT_CTA);
        assert!(doc.find_by_role(Role::Price).is_none());
    }

    #[test]
    fn test_blank_content_counts_as_missing() {
        let brief = ContentBrief { headline: Some("   ".into()), ..ContentBrief::default() };
        let doc = compose(&brief, &tokens(VisualStyle::Editorial)).unwrap();
        assert_eq!(text_of(&doc, "headline"), DEFAULT_HEADLINE);
    }

    #[test]
    fn test_text_meets_contrast_or_fallback() {
        for style in VisualStyle::ALL {
            let doc = compose(&brief(), &tokens(style)).unwrap();
            let headline = doc.find_by_role(Role::Headline).unwrap();
            if let LayerKind::Text(t) = &headline.kind {
                let ratio = contrast_ratio(&t.color, &doc.background_color).unwrap();
                assert!(ratio >= 7.0 || t.color == "#FFFFFF" || t.color == "#1A1A2E", "{style}");
                assert!(t.shadow.is_some());
            }
            let cta = doc.find_by_role(Role::Cta).unwrap();
            if let LayerKind::Cta(c) = &cta.kind {
                let ratio = contrast_ratio(&c.text_color, &c.background_color).unwrap();
                assert!(ratio >= 4.5 || c.text_color == "#FFFFFF" || c.text_color == "#1A1A2E", "{style}");
            }
        }
    }

    #[test]
    fn test_fonts_fit_their_boxes() {
        let long = ContentBrief {
            headline: Some("An extraordinarily long headline that keeps going well past any sane length".into()),
            ..brief()
        };
        let doc = compose(&long, &tokens(VisualStyle::Playful)).unwrap();
        let headline = doc.find_by_role(Role::Headline).unwrap();
        let size = headline.font_size().unwrap();
        let budget = headline.bounds.area() * 0.9;
        assert!(estimated_text_area(headline.text().unwrap(), size) <= budget || size == 32.0);
    }

    #[test]
    fn test_z_order_and_badge() {
        let doc = compose(&brief(), &tokens(VisualStyle::Bold)).unwrap();
        let ids: Vec<_> = doc.paint_order().iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, ["background", "product", "headline", "subheadline", "cta", "badge"]);
        let badge = doc.layers.iter().find(|l| l.id == "badge").unwrap();
        assert_eq!(badge.children().len(), 2);
        assert_eq!(badge.children()[0].rotation, BADGE_ROTATION);
    }

    #[test]
    fn test_compose_template_leaves_input_untouched() {
        let composer = Composer::default();
        let template = composer.build_template(&tokens(VisualStyle::Luxury), None).unwrap();
        let snapshot = template.clone();
        let doc = composer.compose_template(&template, &brief()).unwrap();
        assert_eq!(template, snapshot);
        assert_ne!(doc, template);
        assert_eq!(template.name, "Luxury Template");
    }

    #[test]
    fn test_heuristic_binding_in_custom_template() {
        let mut template = AdDocument::new(800, 800, "#FFFFFF").unwrap();
        template.layers = vec![text_layer("Main Headline"), text_layer("Subheadline")];
        let doc = compose_template(&template, &brief()).unwrap();
        assert_eq!(doc.layers[0].text(), Some("Run Faster Today"));
        assert_eq!(doc.layers[1].text(), Some("Lightweight trainers for every distance"));
    }

    #[test]
    fn test_shadow_presets_scale() {
        let small = ShadowPreset::Normal.shadow_for(Bounds::new(0.0, 0.0, 500.0, 250.0));
        assert_eq!(small.blur, 24.0);
        let large = ShadowPreset::Normal.shadow_for(Bounds::new(0.0, 0.0, 1000.0, 100.0));
        assert_eq!(large.blur, 48.0);
        assert_eq!(small.opacity, 0.25);
        assert_eq!(large.opacity, 0.5);
        let huge = ShadowPreset::Dramatic.shadow_for(Bounds::new(0.0, 0.0, 2000.0, 2000.0));
        assert_eq!(huge.opacity, 1.0);
        assert_eq!(ShadowPreset::for_style(VisualStyle::Luxury), ShadowPreset::Subtle);
    }

    #[test]
    fn test_invalid_palette_is_error() {
        let mut bad = tokens(VisualStyle::Minimal);
        bad.palette.text = "black".into();
        assert!(matches!(compose(&brief(), &bad), Err(DocumentError::Color(_))));
    }

    fn cta_layer(name: &str) -> Layer {
        Layer::new(
            name.to_lowercase(),
            name,
            Bounds::new(100.0, 600.0, 300.0, 80.0),
            LayerKind::Cta(CtaLayer {
                text: "Click".into(),
                font_family: "Inter".into(),
                font_weight: 700,
                font_size: 24.0,
                background_color: "#000000".into(),
                text_color: "#FFFFFF".into(),
                corner_radius: 8.0,
                shadow: None,
                border: None,
            }),
        )
    }

    #[test]
    fn test_cta_kind_binds_without_name_match() {
        let layer = cta_layer("Primary");
        assert_eq!(resolve_slot(&layer), Some((ContentSlot::Cta, BindingTier::Kind)));

        let mut template = AdDocument::new(800, 800, "#FFFFFF").unwrap();
        template.layers = vec![layer];
        let doc = compose_template(&template, &brief()).unwrap();
        assert_eq!(doc.layers[0].text(), Some("Get Yours"));
    }

    #[test]
    fn test_social_proof_binds_by_name() {
        let mut template = AdDocument::new(800, 800, "#FFFFFF").unwrap();
        template.layers = vec![text_layer("Customer Reviews")];
        let brief = ContentBrief { social_proof: Some("Rated 4.9 by 10k runners".into()), ..brief() };
        let doc = compose_template(&template, &brief).unwrap();
        assert_eq!(doc.layers[0].text(), Some("Rated 4.9 by 10k runners"));
    }

    #[test]
    fn test_unbound_text_is_fitted_and_readable() {
        let mut template = AdDocument::new(800, 800, "#FFFFFF").unwrap();
        let mut disclaimer = text_layer("Disclaimer");
        disclaimer.bounds = Bounds::new(20.0, 740.0, 300.0, 40.0);
        if let LayerKind::Text(t) = &mut disclaimer.kind {
            t.text = "Terms apply. See store for full offer details.".into();
            t.font_size = 96.0;
            t.color = "#FFFFFF".into();
        }
        template.layers = vec![disclaimer];

        let doc = compose_template(&template, &brief()).unwrap();
        let layer = &doc.layers[0];
        assert_eq!(layer.text(), Some("Terms apply. See store for full offer details."));
        let size = layer.font_size().unwrap();
        assert!(size < 96.0 && size >= 14.0, "{size}");
        match &layer.kind {
            LayerKind::Text(t) => {
                assert!(contrast_ratio(&t.color, "#FFFFFF").unwrap() >= 4.5, "{}", t.color);
                assert!(t.shadow.is_some());
            }
            other => panic!("unexpected kind {}", other.name()),
        }
    }

    #[test]
    fn test_template_product_gets_contact_shadow() {
        let bounds = Bounds::new(240.0, 240.0, 600.0, 600.0);
        let mut template = AdDocument::new(1080, 1080, "#FFFFFF").unwrap();
        template.layers = vec![Layer::new("product", "Product", bounds, LayerKind::Product(ImageLayer::default()))];

        let doc = compose_template(&template, &brief()).unwrap();
        match &doc.layers[0].kind {
            LayerKind::Product(img) => {
                assert_eq!(img.shadow, Some(ShadowPreset::Normal.shadow_for(bounds)));
                assert_eq!(img.image_ref.as_deref(), Some("assets/shoe.png"));
            }
            other => panic!("unexpected kind {}", other.name()),
        }

        let dramatic = Composer::default().with_shadow_preset(ShadowPreset::Dramatic);
        let doc = dramatic.compose_template(&template, &ContentBrief::default()).unwrap();
        match &doc.layers[0].kind {
            LayerKind::Product(img) => assert_eq!(img.shadow, Some(ShadowPreset::Dramatic.shadow_for(bounds))),
            other => panic!("unexpected kind {}", other.name()),
        }
    }
}
