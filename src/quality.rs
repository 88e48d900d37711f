//! Quality Scoring - Rule/Report Separation
//!
//! Each rule scores one dimension and reports the issues behind its
//! deductions. The scorer weights the dimensions and turns the result into
//! feedback. A score below threshold is a normal report, not an error.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::color::{hex_to_hsl, to_score, Hsl};
use crate::config::EngineConfig;
use crate::document::{AdDocument, Layer, LayerKind, Role};
use crate::formats::{FormatSpec, Platform};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Dimension {
    VisualAppeal,
    CopyClarity,
    BrandConsistency,
    ConversionPotential,
    PlatformOptimization,
}

impl Dimension {
    pub const ALL: [Self; 5] = [
        Self::VisualAppeal,
        Self::CopyClarity,
        Self::BrandConsistency,
        Self::ConversionPotential,
        Self::PlatformOptimization,
    ];

    pub fn weight(self) -> f64 {
        match self {
            Self::VisualAppeal => 0.30,
            Self::CopyClarity => 0.25,
            Self::BrandConsistency => 0.20,
            Self::ConversionPotential => 0.15,
            Self::PlatformOptimization => 0.10,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::VisualAppeal => "visual appeal",
            Self::CopyClarity => "copy clarity",
            Self::BrandConsistency => "brand consistency",
            Self::ConversionPotential => "conversion potential",
            Self::PlatformOptimization => "platform optimization",
        }
    }

    /// Suggestion emitted when the dimension scores below its bar.
    fn suggestion(self) -> (u32, &'static str) {
        match self {
            Self::VisualAppeal => (80, "Improve visual balance and composition"),
            Self::CopyClarity => (80, "Simplify copy for better readability"),
            Self::BrandConsistency => (80, "Use brand colors more consistently"),
            Self::ConversionPotential => (80, "Add stronger CTA or urgency elements"),
            Self::PlatformOptimization => (90, "Optimize dimensions and text size for platform"),
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One deduction and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityIssue {
    pub dimension: Dimension,
    pub message: String,
    pub penalty: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DimensionScore {
    pub score: u32,
    pub issues: Vec<QualityIssue>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    pub visual_appeal: u32,
    pub copy_clarity: u32,
    pub brand_consistency: u32,
    pub conversion_potential: u32,
    pub platform_optimization: u32,
}

impl ScoreBreakdown {
    pub fn get(&self, dimension: Dimension) -> u32 {
        match dimension {
            Dimension::VisualAppeal => self.visual_appeal,
            Dimension::CopyClarity => self.copy_clarity,
            Dimension::BrandConsistency => self.brand_consistency,
            Dimension::ConversionPotential => self.conversion_potential,
            Dimension::PlatformOptimization => self.platform_optimization,
        }
    }

    fn set(&mut self, dimension: Dimension, score: u32) {
        let slot = match dimension {
            Dimension::VisualAppeal => &mut self.visual_appeal,
            Dimension::CopyClarity => &mut self.copy_clarity,
            Dimension::BrandConsistency => &mut self.brand_consistency,
            Dimension::ConversionPotential => &mut self.conversion_potential,
            Dimension::PlatformOptimization => &mut self.platform_optimization,
        };
        *slot = score;
    }

    /// Weighted total, rounded.
    pub fn weighted_total(&self) -> u32 {
        to_score(
            Dimension::ALL
                .iter()
                .map(|d| f64::from(self.get(*d)) * d.weight())
                .sum(),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScoreContext {
    pub brand_color: Option<String>,
    pub platform: Platform,
    /// Overrides the platform's canonical dimensions when present.
    pub target: Option<FormatSpec>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityReport {
    pub total_score: u32,
    pub breakdown: ScoreBreakdown,
    pub passed: bool,
    pub feedback: Vec<String>,
    pub reasoning: String,
    pub issues: Vec<QualityIssue>,
}

/// Quality rule trait - scores one dimension
pub trait QualityRule: Send + Sync {
    fn dimension(&self) -> Dimension;
    fn score(&self, doc: &AdDocument, ctx: &ScoreContext) -> DimensionScore;
}

/// Accumulates deductions from a starting score.
struct Tally {
    dimension: Dimension,
    score: i64,
    issues: Vec<QualityIssue>,
}

impl Tally {
    fn new(dimension: Dimension, start: i64) -> Self {
        Self { dimension, score: start, issues: vec![] }
    }

    fn deduct(&mut self, penalty: u32, message: impl Into<String>) {
        self.score -= i64::from(penalty);
        self.issues.push(QualityIssue {
            dimension: self.dimension,
            message: message.into(),
            penalty,
        });
    }

    fn bonus(&mut self, points: i64) {
        self.score += points;
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn finish(self) -> DimensionScore {
        DimensionScore {
            score: self.score.clamp(0, 100) as u32,
            issues: self.issues,
        }
    }
}

fn is_copy(layer: &Layer) -> bool {
    matches!(layer.kind, LayerKind::Text(_) | LayerKind::Cta(_))
}

fn is_cta(layer: &Layer) -> bool {
    matches!(layer.kind, LayerKind::Cta(_)) || layer.role == Some(Role::Cta)
}

// --- Concrete Rules ---

pub struct VisualAppealRule;

impl QualityRule for VisualAppealRule {
    fn dimension(&self) -> Dimension { Dimension::VisualAppeal }

    fn score(&self, doc: &AdDocument, _ctx: &ScoreContext) -> DimensionScore {
        let mut tally = Tally::new(self.dimension(), 100);
        let leaves = doc.leaf_layers();

        match doc.layers.len() {
            n if n < 3 => tally.deduct(15, "Too few layers - design feels empty"),
            n if n > 12 => tally.deduct(10, "Too many layers - design feels cluttered"),
            _ => {}
        }
        if !leaves.iter().any(|l| is_copy(l)) {
            tally.deduct(20, "No text layers - missing copy");
        }
        let has_visual = leaves.iter().any(|l| {
            matches!(l.kind, LayerKind::Product(_) | LayerKind::Image(_) | LayerKind::Background(_))
        });
        if !has_visual {
            tally.deduct(15, "No image layers - missing visual anchor");
        }
        if !leaves.iter().any(|l| is_cta(l)) {
            tally.deduct(10, "No CTA button - missing conversion trigger");
        }

        // Backgrounds fill the canvas by definition; whitespace is measured over content.
        let canvas = doc.canvas().area();
        if canvas > 0.0 {
            let covered: f64 = doc
                .layers
                .iter()
                .filter(|l| !matches!(l.kind, LayerKind::Background(_)))
                .map(|l| l.bounds.area())
                .sum();
            let coverage = covered / canvas;
            if coverage > 0.9 {
                tally.deduct(10, "Too little whitespace - feels cramped");
            } else if coverage < 0.3 {
                tally.deduct(5, "Too much whitespace - underutilized space");
            }
        }
        tally.finish()
    }
}

pub struct CopyClarityRule;

impl QualityRule for CopyClarityRule {
    fn dimension(&self) -> Dimension { Dimension::CopyClarity }

    fn score(&self, doc: &AdDocument, _ctx: &ScoreContext) -> DimensionScore {
        let leaves = doc.leaf_layers();
        if !leaves.iter().any(|l| matches!(l.kind, LayerKind::Text(_))) {
            return DimensionScore {
                score: 0,
                issues: vec![QualityIssue {
                    dimension: self.dimension(),
                    message: "No text layers - nothing to read".to_string(),
                    penalty: 100,
                }],
            };
        }

        let mut tally = Tally::new(self.dimension(), 100);
        let mut has_body = false;
        for layer in leaves.iter().filter(|l| is_copy(l)) {
            let text = layer.text().unwrap_or_default();
            let len = text.chars().count();

            if layer.role == Some(Role::Headline) {
                if len > 60 {
                    tally.deduct(10, "Headline too long - hard to read");
                } else if len < 10 {
                    tally.deduct(5, "Headline too short - not impactful");
                }
            }
            let has_letters = text.chars().any(char::is_alphabetic);
            if has_letters && len > 20 && text == text.to_uppercase() {
                tally.deduct(5, "Excessive all caps - hard to read");
            }
            if layer.font_size().unwrap_or(16.0) < 14.0 && len > 50 {
                tally.deduct(8, "Small font with long text - readability issue");
            }
            has_body |= matches!(layer.role, Some(Role::Description | Role::Subheadline)) || len > 50;
        }
        if !has_body {
            tally.deduct(5, "Missing descriptive copy");
        }
        tally.finish()
    }
}

const HUE_TOLERANCE: f64 = 30.0;
const TONE_TOLERANCE: f64 = 20.0;

fn hue_distance(a: f64, b: f64) -> f64 {
    let d = (a - b).abs() % 360.0;
    d.min(360.0 - d)
}

fn similar(a: Hsl, b: Hsl) -> bool {
    hue_distance(a.h, b.h) < HUE_TOLERANCE && (a.s - b.s).abs() < TONE_TOLERANCE && (a.l - b.l).abs() < TONE_TOLERANCE
}

pub struct BrandConsistencyRule;

impl QualityRule for BrandConsistencyRule {
    fn dimension(&self) -> Dimension { Dimension::BrandConsistency }

    fn score(&self, doc: &AdDocument, ctx: &ScoreContext) -> DimensionScore {
        let Some(raw) = ctx.brand_color.as_deref() else {
            return DimensionScore { score: 80, issues: vec![] };
        };
        let brand = match hex_to_hsl(raw) {
            Ok(hsl) => hsl,
            Err(err) => {
                tracing::warn!(brand_color = raw, %err, "brand color unparseable, scoring without it");
                return DimensionScore { score: 80, issues: vec![] };
            }
        };

        let mut tally = Tally::new(self.dimension(), 100);
        let leaves = doc.leaf_layers();
        let branded = leaves
            .iter()
            .filter(|l| l.colors().into_iter().filter_map(|c| hex_to_hsl(c).ok()).any(|c| similar(c, brand)))
            .count();
        match branded {
            0 => tally.deduct(20, "Brand color not used"),
            1 => tally.deduct(5, "Brand color used minimally"),
            _ => {}
        }

        let families: BTreeSet<&str> = leaves.iter().filter_map(|l| l.font_family()).collect();
        if families.len() > 3 {
            tally.deduct(10, format!("Too many font families ({})", families.len()));
        }
        tally.finish()
    }
}

const STRONG_VERBS: &[&str] = &["get", "start", "join", "claim", "unlock", "discover", "try"];
const URGENCY_WORDS: &[&str] = &["now", "today", "limited", "ending", "last chance", "hurry"];
const PROOF_WORDS: &[&str] = &["trusted", "rated", "customers", "users", "reviews"];

pub struct ConversionPotentialRule;

impl QualityRule for ConversionPotentialRule {
    fn dimension(&self) -> Dimension { Dimension::ConversionPotential }

    fn score(&self, doc: &AdDocument, _ctx: &ScoreContext) -> DimensionScore {
        let mut tally = Tally::new(self.dimension(), 70);
        let leaves = doc.leaf_layers();

        match leaves.iter().find(|l| is_cta(l)) {
            Some(cta) => {
                tally.bonus(15);
                let text = cta.text().unwrap_or_default().to_lowercase();
                if STRONG_VERBS.iter().any(|v| text.contains(v)) {
                    tally.bonus(10);
                }
            }
            None => tally.deduct(20, "No call to action"),
        }

        let all_text = leaves
            .iter()
            .filter_map(|l| l.text())
            .map(str::to_lowercase)
            .collect::<Vec<_>>()
            .join(" ");
        if URGENCY_WORDS.iter().any(|w| all_text.contains(w)) {
            tally.bonus(5);
        }
        if PROOF_WORDS.iter().any(|w| all_text.contains(w)) {
            tally.bonus(10);
        }
        tally.finish()
    }
}

/// Canonical width, height and minimum text size per platform.
pub fn platform_requirements(platform: Platform) -> (u32, u32, f64) {
    match platform {
        Platform::Meta | Platform::All => (1080, 1350, 16.0),
        Platform::Tiktok => (1080, 1920, 18.0),
        Platform::Linkedin => (1200, 627, 14.0),
    }
}

/// Share of the canvas feed placements tolerate as text.
const FEED_TEXT_AREA_LIMIT: f64 = 0.25;

pub struct PlatformOptimizationRule;

impl QualityRule for PlatformOptimizationRule {
    fn dimension(&self) -> Dimension { Dimension::PlatformOptimization }

    fn score(&self, doc: &AdDocument, ctx: &ScoreContext) -> DimensionScore {
        let mut tally = Tally::new(self.dimension(), 100);
        let (mut width, mut height, min_text) = platform_requirements(ctx.platform);
        if let Some(target) = &ctx.target {
            width = target.width;
            height = target.height;
        }

        if (doc.width, doc.height) != (width, height) {
            tally.deduct(
                15,
                format!("Canvas {}x{} does not match {width}x{height}", doc.width, doc.height),
            );
        }

        let copy: Vec<&Layer> = doc.leaf_layers().into_iter().filter(|l| is_copy(l)).collect();
        if copy.iter().any(|l| l.font_size().unwrap_or(16.0) < min_text) {
            tally.deduct(10, format!("Text below {min_text}px minimum"));
        }

        let canvas = doc.canvas().area();
        if matches!(ctx.platform, Platform::Meta | Platform::All) && canvas > 0.0 {
            let text_area: f64 = copy.iter().map(|l| l.bounds.area()).sum();
            if text_area / canvas > FEED_TEXT_AREA_LIMIT {
                tally.deduct(10, "Too much text area for feed placement");
            }
        }
        tally.finish()
    }
}

/// Orchestrates the rules and builds the report.
pub struct QualityScorer {
    rules: Vec<Box<dyn QualityRule>>,
    pass_threshold: u32,
}

impl QualityScorer {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            rules: vec![
                Box::new(VisualAppealRule),
                Box::new(CopyClarityRule),
                Box::new(BrandConsistencyRule),
                Box::new(ConversionPotentialRule),
                Box::new(PlatformOptimizationRule),
            ],
            pass_threshold: config.quality.pass_threshold,
        }
    }

    pub fn pass_threshold(&self) -> u32 {
        self.pass_threshold
    }

    pub fn score(&self, doc: &AdDocument, ctx: &ScoreContext) -> QualityReport {
        let mut breakdown = ScoreBreakdown::default();
        let mut issues = vec![];

        for rule in &self.rules {
            let result = rule.score(doc, ctx);
            breakdown.set(rule.dimension(), result.score);
            issues.extend(result.issues);
        }

        let total_score = breakdown.weighted_total();
        let passed = total_score >= self.pass_threshold;
        tracing::info!(id = %doc.id, total_score, passed, "ad scored");

        QualityReport {
            total_score,
            breakdown,
            passed,
            feedback: feedback(&breakdown, &issues),
            reasoning: reasoning(&breakdown, total_score),
            issues,
        }
    }
}

impl Default for QualityScorer {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}

fn feedback(breakdown: &ScoreBreakdown, issues: &[QualityIssue]) -> Vec<String> {
    let mut out: Vec<String> = issues.iter().map(|i| i.message.clone()).collect();
    for dimension in Dimension::ALL {
        let (bar, suggestion) = dimension.suggestion();
        if breakdown.get(dimension) < bar {
            out.push(suggestion.to_string());
        }
    }
    if out.is_empty() {
        out.push("Ad meets quality standards".to_string());
    }
    out
}

fn reasoning(breakdown: &ScoreBreakdown, total: u32) -> String {
    let pick = |keep: fn(u32) -> bool| -> Vec<&str> {
        Dimension::ALL
            .into_iter()
            .filter(|d| keep(breakdown.get(*d)))
            .map(Dimension::label)
            .collect()
    };
    let strengths = pick(|s| s >= 90);
    let weaknesses = pick(|s| s < 75);

    let mut parts = vec![format!("Total quality score: {total}/100.")];
    if !strengths.is_empty() {
        parts.push(format!("Strong in {}.", strengths.join(", ")));
    }
    if !weaknesses.is_empty() {
        parts.push(format!("Needs improvement in {}.", weaknesses.join(", ")));
    }
    parts.join(" ")
}

/// [`QualityScorer::score`] with default configuration.
pub fn score_ad_quality(doc: &AdDocument, ctx: &ScoreContext) -> QualityReport {
    QualityScorer::default().score(doc, ctx)
}
