//! Ad Document - the canonical layer tree
//!
//! Layers are a tagged union over their kind. Group children keep
//! canvas-absolute coordinates and are owned exclusively by their group.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::color::ColorError;

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Invalid canvas {width}x{height}: dimensions must be positive")]
    InvalidCanvas { width: u32, height: u32 },

    #[error("Invalid format spec: {0}")]
    InvalidFormat(String),

    #[error(transparent)]
    Color(#[from] ColorError),
}

/// Axis-aligned box in canvas pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn area(&self) -> f64 {
        self.width.max(0.0) * self.height.max(0.0)
    }

    /// Smallest box containing both.
    pub fn union(&self, other: &Self) -> Self {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        Self {
            x,
            y,
            width: self.right().max(other.right()) - x,
            height: self.bottom().max(other.bottom()) - y,
        }
    }

    pub fn intersects(&self, other: &Self) -> bool {
        self.x < other.right() && other.x < self.right() && self.y < other.bottom() && other.y < self.bottom()
    }

    pub fn contains(&self, other: &Self) -> bool {
        other.x >= self.x && other.y >= self.y && other.right() <= self.right() && other.bottom() <= self.bottom()
    }

    pub fn rounded(&self) -> Self {
        Self {
            x: self.x.round(),
            y: self.y.round(),
            width: self.width.round(),
            height: self.height.round(),
        }
    }
}

/// Semantic role used for content binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Headline,
    Subheadline,
    Description,
    Cta,
    Price,
    SocialProof,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FitMode {
    Contain,
    #[default]
    Cover,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shadow {
    pub color: String,
    pub blur: f64,
    pub offset_x: f64,
    pub offset_y: f64,
    pub opacity: f64,
}

impl Shadow {
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            color: self.color.clone(),
            blur: self.blur * factor,
            offset_x: self.offset_x * factor,
            offset_y: self.offset_y * factor,
            opacity: self.opacity,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Border {
    pub color: String,
    pub width: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackgroundLayer {
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub image_ref: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageLayer {
    #[serde(default)]
    pub image_ref: Option<String>,
    #[serde(default)]
    pub fit: FitMode,
    #[serde(default)]
    pub shadow: Option<Shadow>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextLayer {
    pub text: String,
    pub font_family: String,
    pub font_weight: u16,
    pub font_size: f64,
    pub color: String,
    #[serde(default)]
    pub align: TextAlign,
    #[serde(default = "default_line_height")]
    pub line_height: f64,
    #[serde(default)]
    pub shadow: Option<Shadow>,
}

fn default_line_height() -> f64 { 1.2 }

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CtaLayer {
    pub text: String,
    pub font_family: String,
    pub font_weight: u16,
    pub font_size: f64,
    pub background_color: String,
    pub text_color: String,
    #[serde(default)]
    pub corner_radius: f64,
    #[serde(default)]
    pub shadow: Option<Shadow>,
    #[serde(default)]
    pub border: Option<Border>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeLayer {
    pub fill: String,
    #[serde(default)]
    pub corner_radius: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GroupLayer {
    #[serde(default)]
    pub children: Vec<Layer>,
}

/// Kind-specific payload; the `type` tag is flattened into the layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LayerKind {
    Background(BackgroundLayer),
    Image(ImageLayer),
    Product(ImageLayer),
    Text(TextLayer),
    Cta(CtaLayer),
    Shape(ShapeLayer),
    Group(GroupLayer),
}

impl LayerKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Background(_) => "background",
            Self::Image(_) => "image",
            Self::Product(_) => "product",
            Self::Text(_) => "text",
            Self::Cta(_) => "cta",
            Self::Shape(_) => "shape",
            Self::Group(_) => "group",
        }
    }
}

fn default_true() -> bool { true }
fn default_opacity() -> f64 { 1.0 }

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Layer {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(flatten)]
    pub bounds: Bounds,
    #[serde(default)]
    pub rotation: f64,
    #[serde(default = "default_opacity")]
    pub opacity: f64,
    #[serde(default)]
    pub z_index: Option<i32>,
    #[serde(default)]
    pub locked: bool,
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(flatten)]
    pub kind: LayerKind,
}

impl Layer {
    pub fn new(id: impl Into<String>, name: impl Into<String>, bounds: Bounds, kind: LayerKind) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            bounds,
            rotation: 0.0,
            opacity: 1.0,
            z_index: None,
            locked: false,
            visible: true,
            role: None,
            kind,
        }
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    pub fn with_z_index(mut self, z: i32) -> Self {
        self.z_index = Some(z);
        self
    }

    pub fn with_rotation(mut self, degrees: f64) -> Self {
        self.rotation = degrees;
        self
    }

    /// Visible copy carried by text and CTA layers.
    pub fn text(&self) -> Option<&str> {
        match &self.kind {
            LayerKind::Text(t) => Some(&t.text),
            LayerKind::Cta(c) => Some(&c.text),
            _ => None,
        }
    }

    pub fn font_size(&self) -> Option<f64> {
        match &self.kind {
            LayerKind::Text(t) => Some(t.font_size),
            LayerKind::Cta(c) => Some(c.font_size),
            _ => None,
        }
    }

    pub fn font_family(&self) -> Option<&str> {
        match &self.kind {
            LayerKind::Text(t) => Some(&t.font_family),
            LayerKind::Cta(c) => Some(&c.font_family),
            _ => None,
        }
    }

    /// Every color this layer paints with.
    pub fn colors(&self) -> Vec<&str> {
        match &self.kind {
            LayerKind::Background(b) => b.color.as_deref().into_iter().collect(),
            LayerKind::Text(t) => vec![t.color.as_str()],
            LayerKind::Cta(c) => vec![c.background_color.as_str(), c.text_color.as_str()],
            LayerKind::Shape(s) => vec![s.fill.as_str()],
            LayerKind::Image(_) | LayerKind::Product(_) | LayerKind::Group(_) => vec![],
        }
    }

    pub fn children(&self) -> &[Layer] {
        match &self.kind {
            LayerKind::Group(g) => &g.children,
            _ => &[],
        }
    }

    pub fn is_group(&self) -> bool {
        matches!(self.kind, LayerKind::Group(_))
    }

    /// Depth-first walk: the layer itself, then its descendants.
    pub fn walk<'a>(&'a self, out: &mut Vec<&'a Layer>) {
        out.push(self);
        for child in self.children() {
            child.walk(out);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdDocument {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub background_color: String,
    #[serde(default)]
    pub layers: Vec<Layer>,
}

impl AdDocument {
    pub fn new(width: u32, height: u32, background_color: impl Into<String>) -> Result<Self, DocumentError> {
        check_canvas(width, height)?;
        Ok(Self {
            id: String::new(),
            name: String::new(),
            width,
            height,
            background_color: background_color.into(),
            layers: vec![],
        })
    }

    pub fn validate(&self) -> Result<(), DocumentError> {
        check_canvas(self.width, self.height)
    }

    pub fn canvas(&self) -> Bounds {
        Bounds::new(0.0, 0.0, f64::from(self.width), f64::from(self.height))
    }

    pub fn aspect_ratio(&self) -> f64 {
        f64::from(self.width) / f64::from(self.height)
    }

    /// All layers, groups before their children, in list order.
    pub fn all_layers(&self) -> Vec<&Layer> {
        let mut out = Vec::new();
        for layer in &self.layers {
            layer.walk(&mut out);
        }
        out
    }

    /// Non-group layers in list order.
    pub fn leaf_layers(&self) -> Vec<&Layer> {
        self.all_layers().into_iter().filter(|l| !l.is_group()).collect()
    }

    /// Top-level layers in paint order: explicit z-index wins, list order breaks ties.
    pub fn paint_order(&self) -> Vec<&Layer> {
        let mut ordered: Vec<(usize, &Layer)> = self.layers.iter().enumerate().collect();
        ordered.sort_by_key(|(idx, layer)| (layer.z_index.unwrap_or(0), *idx));
        ordered.into_iter().map(|(_, layer)| layer).collect()
    }

    pub fn find_by_role(&self, role: Role) -> Option<&Layer> {
        self.all_layers().into_iter().find(|l| l.role == Some(role))
    }
}

pub(crate) fn check_canvas(width: u32, height: u32) -> Result<(), DocumentError> {
    if width == 0 || height == 0 {
        return Err(DocumentError::InvalidCanvas { width, height });
    }
    Ok(())
}
