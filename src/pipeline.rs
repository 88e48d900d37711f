//! Composition Pipeline - Single Entry Point
//!
//! compile MUST score every document it emits, master and variants alike.
//! A failing score is recorded in the manifest, never turned into an error.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::color::ColorError;
use crate::compose::{Composer, ContentBrief};
use crate::config::{ConfigError, EngineConfig};
use crate::document::{AdDocument, DocumentError};
use crate::formats::{AdFormat, Platform};
use crate::hashing::{compute_document_hash, compute_job_hash};
use crate::quality::{QualityReport, QualityScorer, ScoreContext};
use crate::resize::Resizer;
use crate::style::{StyleTokens, Tone, VisualStyle};
use crate::ENGINE_VERSION;

#[cfg(feature = "test-hooks")]
use std::sync::atomic::{AtomicU32, Ordering};

#[cfg(feature = "test-hooks")]
static SCORE_CALL_COUNT: AtomicU32 = AtomicU32::new(0);

#[cfg(feature = "test-hooks")]
pub fn get_score_call_count() -> u32 {
    SCORE_CALL_COUNT.load(Ordering::SeqCst)
}

#[cfg(feature = "test-hooks")]
pub fn reset_score_call_count() {
    SCORE_CALL_COUNT.store(0, Ordering::SeqCst);
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Config requires engine >= {0}, current is {1}")]
    EngineVersionMismatch(String, String),

    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error(transparent)]
    Color(#[from] ColorError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Everything needed to compose and fan out one ad.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComposeRequest {
    #[serde(default)]
    pub brief: ContentBrief,
    /// Explicit tokens win over `brandColor` + `style` + `tone`.
    #[serde(default)]
    pub tokens: Option<StyleTokens>,
    #[serde(default)]
    pub brand_color: Option<String>,
    #[serde(default)]
    pub style: Option<VisualStyle>,
    #[serde(default)]
    pub tone: Option<Tone>,
    #[serde(default)]
    pub platform: Platform,
    /// Falls back to the config's default formats.
    #[serde(default)]
    pub formats: Option<Vec<AdFormat>>,
}

impl ComposeRequest {
    pub fn resolve_tokens(&self) -> Result<StyleTokens, PipelineError> {
        if let Some(tokens) = &self.tokens {
            return Ok(tokens.clone());
        }
        let brand = self.brand_color.as_deref().ok_or_else(|| {
            PipelineError::InvalidRequest("either tokens or brandColor is required".into())
        })?;
        let style = self.style.unwrap_or(VisualStyle::Minimal);
        let tone = self.tone.unwrap_or_else(|| style.default_tone());
        Ok(StyleTokens::from_brand_color(brand, style, tone)?)
    }

    /// Brand color the scorer checks against.
    pub fn brand_color(&self) -> Option<String> {
        self.brand_color
            .clone()
            .or_else(|| self.tokens.as_ref().map(|t| t.palette.primary.clone()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedAd {
    /// `master` or a format id.
    pub label: String,
    pub document_hash: String,
    pub quality: QualityReport,
    pub document: AdDocument,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompiledAd {
    pub id: String,
    pub engine_version: String,
    pub created_at: DateTime<Utc>,
    pub job_hash: String,
    pub master: RenderedAd,
    pub variants: Vec<RenderedAd>,
}

impl CompiledAd {
    pub fn all_passed(&self) -> bool {
        self.master.quality.passed && self.variants.iter().all(|v| v.quality.passed)
    }
}

/// The composition pipeline - single entry point for compose, resize and score
pub struct CompositionPipeline {
    config: EngineConfig,
    composer: Composer,
    resizer: Resizer,
    scorer: QualityScorer,
}

impl CompositionPipeline {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            composer: Composer::new(&config),
            resizer: Resizer::new(&config),
            scorer: QualityScorer::new(&config),
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn composer(&self) -> &Composer {
        &self.composer
    }

    pub fn resizer(&self) -> &Resizer {
        &self.resizer
    }

    /// Score a document
    ///
    /// This is the ONLY scoring entry point.
    pub fn score(&self, doc: &AdDocument, ctx: &ScoreContext) -> QualityReport {
        #[cfg(feature = "test-hooks")]
        SCORE_CALL_COUNT.fetch_add(1, Ordering::SeqCst);

        let report = self.scorer.score(doc, ctx);
        if !report.passed {
            tracing::warn!(
                id = %doc.id,
                total_score = report.total_score,
                threshold = self.scorer.pass_threshold(),
                "score below threshold"
            );
        }
        report
    }

    /// Compose, score, fan out and score each format.
    ///
    /// CRITICAL: every emitted document passes through score. No bypass.
    pub fn compile(&self, request: &ComposeRequest) -> Result<CompiledAd, PipelineError> {
        self.check_engine_version()?;

        let tokens = request.resolve_tokens()?;
        let master_doc = self.composer.compose(&request.brief, &tokens)?;
        let brand_color = request.brand_color();

        let master_ctx = ScoreContext {
            brand_color: brand_color.clone(),
            platform: request.platform,
            target: None,
        };
        let master = self.render("master".to_string(), master_doc, &master_ctx)?;

        let formats = request.formats.as_deref().unwrap_or(&self.config.default_formats);
        let mut variants = Vec::with_capacity(formats.len());
        for (format, doc) in self.resizer.generate_multi_format_ads(&master.document, formats)? {
            let ctx = ScoreContext {
                brand_color: brand_color.clone(),
                platform: request.platform,
                target: Some(format.spec()),
            };
            variants.push(self.render(format.id().to_string(), doc, &ctx)?);
        }

        let compiled = CompiledAd {
            id: Uuid::new_v4().to_string(),
            engine_version: ENGINE_VERSION.to_string(),
            created_at: Utc::now(),
            job_hash: compute_job_hash(request, ENGINE_VERSION)?,
            master,
            variants,
        };
        tracing::info!(
            id = %compiled.id,
            variants = compiled.variants.len(),
            all_passed = compiled.all_passed(),
            "ad compiled"
        );
        Ok(compiled)
    }

    fn render(&self, label: String, document: AdDocument, ctx: &ScoreContext) -> Result<RenderedAd, PipelineError> {
        let quality = self.score(&document, ctx);
        Ok(RenderedAd {
            label,
            document_hash: compute_document_hash(&document)?,
            quality,
            document,
        })
    }

    fn check_engine_version(&self) -> Result<(), PipelineError> {
        let engine_ver = semver::Version::parse(ENGINE_VERSION)
            .map_err(|e| PipelineError::InvalidRequest(format!("invalid engine version: {e}")))?;
        let min_ver = semver::Version::parse(&self.config.engine_min_version)
            .map_err(|e| ConfigError::Invalid(format!("engineMinVersion: {e}")))?;

        if engine_ver < min_ver {
            return Err(PipelineError::EngineVersionMismatch(
                self.config.engine_min_version.clone(),
                ENGINE_VERSION.to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for CompositionPipeline {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}
