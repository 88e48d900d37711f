//! AdCompose Core - Ad Composition Engine
//!
//! # The Five Laws (Non-Negotiable)
//! 1. Documents Are Data: every layer is a serializable tagged variant
//! 2. Inputs Are Never Mutated: resize and score return new values
//! 3. Contrast Is Enforced, Not Suggested
//! 4. Safe Zones Are Absolute
//! 5. Every Emitted Document Is Scored

pub mod color;
pub mod typography;
pub mod document;
pub mod formats;
pub mod style;
pub mod layout;
pub mod compose;
pub mod resize;
pub mod quality;
pub mod config;
pub mod hashing;
pub mod pipeline;

pub use color::{contrast_ratio, ensure_contrast, generate_harmony, hex_to_hsl, hsl_to_hex, ColorError, HarmonyScheme, Hsl};
pub use typography::find_fit_font_size;
pub use document::{AdDocument, Bounds, DocumentError, Layer, LayerKind, Role};
pub use formats::{AdFormat, FormatSpec, Platform, SafeZone};
pub use style::{StyleTokens, Tone, VisualStyle};
pub use layout::{calculate_layout, LayoutBoxes};
pub use compose::{compose, compose_template, Composer, ContentBrief};
pub use resize::{apply_safe_zone, detect_focal_point, generate_multi_format_ads, smart_resize, FocalPoint, Resizer};
pub use quality::{score_ad_quality, QualityReport, QualityScorer, ScoreContext};
pub use config::{ConfigError, EngineConfig};
pub use hashing::{canonical_json, compute_document_hash, compute_job_hash};
pub use pipeline::{CompiledAd, ComposeRequest, CompositionPipeline, PipelineError};

pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");
