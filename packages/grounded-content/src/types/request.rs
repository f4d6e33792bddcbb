//! Request types - the input side of the pipeline.
//!
//! A `GenerationRequest` is immutable once built by the normalizer. The
//! raw input and stored preferences are the two mergeable shapes it is
//! built from.

use serde::{Deserialize, Serialize};

/// The kind of content artifact being generated.
///
/// Each kind carries a platform-derived length ceiling that the
/// normalizer clamps `max_length` against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    /// Short-form feed post
    Post,

    /// Long-form article
    Article,

    /// Multi-slide carousel (one section per slide)
    MultiSlide,

    /// Video/audio script
    Script,

    /// Reply to an existing post
    Reply,
}

impl ContentType {
    /// Parse a content type from its wire name.
    ///
    /// Accepts both `multi_slide` and `multi-slide` spellings.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "post" => Some(Self::Post),
            "article" => Some(Self::Article),
            "multi_slide" | "multi-slide" | "multislide" => Some(Self::MultiSlide),
            "script" => Some(Self::Script),
            "reply" => Some(Self::Reply),
            _ => None,
        }
    }

    /// Platform-derived ceiling for `max_length`, in characters.
    ///
    /// Hand-tuned per platform norms; treat as tunable defaults.
    pub fn length_ceiling(&self) -> usize {
        match self {
            Self::Post => 3_000,
            Self::Article => 100_000,
            Self::MultiSlide => 8_000,
            Self::Script => 15_000,
            Self::Reply => 1_000,
        }
    }

    /// Wire name of this content type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Post => "post",
            Self::Article => "article",
            Self::MultiSlide => "multi_slide",
            Self::Script => "script",
            Self::Reply => "reply",
        }
    }
}

impl Default for ContentType {
    fn default() -> Self {
        Self::Post
    }
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How much external research backs the generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroundingLevel {
    /// No research - generate from the request alone
    Off,

    /// Heuristic queries only
    Basic,

    /// Heuristic queries plus generator-synthesized queries
    Enhanced,
}

impl GroundingLevel {
    /// Parse a grounding level from its wire name.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "off" => Some(Self::Off),
            "basic" => Some(Self::Basic),
            "enhanced" => Some(Self::Enhanced),
            _ => None,
        }
    }

    /// Whether any research runs at this level.
    pub fn is_enabled(&self) -> bool {
        !matches!(self, Self::Off)
    }
}

impl Default for GroundingLevel {
    fn default() -> Self {
        Self::Basic
    }
}

/// Platform constraints applied to the draft.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Constraints {
    /// Maximum draft length in characters (clamped to the content type ceiling)
    pub max_length: Option<usize>,

    /// Require at least one hashtag in the draft
    #[serde(default)]
    pub require_hashtags: bool,

    /// Require a call-to-action in the draft
    #[serde(default)]
    pub require_cta: bool,
}

impl Constraints {
    /// Create empty constraints.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum length.
    pub fn with_max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }

    /// Require hashtags.
    pub fn with_hashtags(mut self) -> Self {
        self.require_hashtags = true;
        self
    }

    /// Require a call-to-action.
    pub fn with_cta(mut self) -> Self {
        self.require_cta = true;
        self
    }
}

/// A validated, fully-populated generation request.
///
/// Built once by the normalizer and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Topic to write about
    pub topic: String,

    /// Industry context (e.g. "healthcare", "fintech")
    pub industry: String,

    /// Desired tone (e.g. "professional", "casual")
    pub tone: String,

    /// Target audience description
    pub audience: String,

    /// Kind of artifact to produce
    pub content_type: ContentType,

    /// Platform constraints
    pub constraints: Constraints,

    /// How much research backs the generation
    pub grounding_level: GroundingLevel,
}

/// Raw, partially-specified input from the caller.
///
/// Every field is optional; the normalizer fills gaps from stored
/// preferences and built-in defaults, with raw input winning.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawGenerationRequest {
    pub topic: Option<String>,
    pub industry: Option<String>,
    pub tone: Option<String>,
    pub audience: Option<String>,

    /// Content type as a wire string; unknown values are a validation error.
    pub content_type: Option<String>,

    /// Grounding level as a wire string; unknown values are a validation error.
    pub grounding_level: Option<String>,

    pub max_length: Option<usize>,
    pub require_hashtags: Option<bool>,
    pub require_cta: Option<bool>,
}

impl RawGenerationRequest {
    /// Create an empty raw request.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the topic.
    pub fn with_topic(mut self, topic: impl Into<String>) -> Self {
        self.topic = Some(topic.into());
        self
    }

    /// Set the industry.
    pub fn with_industry(mut self, industry: impl Into<String>) -> Self {
        self.industry = Some(industry.into());
        self
    }

    /// Set the tone.
    pub fn with_tone(mut self, tone: impl Into<String>) -> Self {
        self.tone = Some(tone.into());
        self
    }

    /// Set the audience.
    pub fn with_audience(mut self, audience: impl Into<String>) -> Self {
        self.audience = Some(audience.into());
        self
    }

    /// Set the content type by wire name.
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Set the grounding level by wire name.
    pub fn with_grounding_level(mut self, level: impl Into<String>) -> Self {
        self.grounding_level = Some(level.into());
        self
    }

    /// Set the maximum length constraint.
    pub fn with_max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }

    /// Require hashtags.
    pub fn with_hashtags(mut self) -> Self {
        self.require_hashtags = Some(true);
        self
    }

    /// Require a call-to-action.
    pub fn with_cta(mut self) -> Self {
        self.require_cta = Some(true);
        self
    }
}

/// Preferences supplied by the external preference store.
///
/// The pipeline never reads storage itself - the caller passes these in.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoredPreferences {
    pub industry: Option<String>,
    pub tone: Option<String>,
    pub audience: Option<String>,
    pub content_type: Option<String>,
    pub grounding_level: Option<String>,
    pub require_hashtags: Option<bool>,
    pub require_cta: Option<bool>,
}

impl StoredPreferences {
    /// Create empty preferences.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the preferred industry.
    pub fn with_industry(mut self, industry: impl Into<String>) -> Self {
        self.industry = Some(industry.into());
        self
    }

    /// Set the preferred tone.
    pub fn with_tone(mut self, tone: impl Into<String>) -> Self {
        self.tone = Some(tone.into());
        self
    }

    /// Set the preferred audience.
    pub fn with_audience(mut self, audience: impl Into<String>) -> Self {
        self.audience = Some(audience.into());
        self
    }

    /// Set the preferred content type by wire name.
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Set the preferred grounding level by wire name.
    pub fn with_grounding_level(mut self, level: impl Into<String>) -> Self {
        self.grounding_level = Some(level.into());
        self
    }
}
