use serde::{Deserialize, Serialize};

/// A configured origin the generation backend is asked to research.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceKind {
    Twitter,
    YouTube,
    Rss,
}

impl SourceKind {
    pub fn label(&self) -> &'static str {
        match self {
            SourceKind::Twitter => "Twitter",
            SourceKind::YouTube => "YouTube",
            SourceKind::Rss => "RSS Feed",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        match slug.to_lowercase().as_str() {
            "twitter" => Some(SourceKind::Twitter),
            "youtube" => Some(SourceKind::YouTube),
            "rss" => Some(SourceKind::Rss),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Source {
    pub kind: SourceKind,
    pub value: String,
}

impl Source {
    pub fn new(kind: SourceKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}

/// Tone override for a single draft. `Default` means no override: the draft
/// should rely solely on the writing style samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tone {
    #[default]
    Default,
    Professional,
    Casual,
    Enthusiastic,
    Witty,
    Urgent,
}

impl Tone {
    pub fn label(&self) -> &'static str {
        match self {
            Tone::Default => "Default (from Style)",
            Tone::Professional => "Professional",
            Tone::Casual => "Casual",
            Tone::Enthusiastic => "Enthusiastic",
            Tone::Witty => "Witty",
            Tone::Urgent => "Urgent",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        match slug.to_lowercase().as_str() {
            "default" => Some(Tone::Default),
            "professional" => Some(Tone::Professional),
            "casual" => Some(Tone::Casual),
            "enthusiastic" => Some(Tone::Enthusiastic),
            "witty" => Some(Tone::Witty),
            "urgent" => Some(Tone::Urgent),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CuratedLink {
    pub title: String,
    pub url: String,
    pub summary: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trend {
    pub title: String,
    pub explainer: String,
    pub link: String,
}

/// One generated newsletter. Produced atomically by a single generation call;
/// `subject` and `introduction` are required on the wire, while the two lists
/// default to empty so a draft with no links or trends still deserializes.
///
/// The prompt asks for 3 links and 2 trends, but nothing here enforces those
/// counts. Consumers must iterate the actual list lengths.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsletterDraft {
    pub subject: String,
    pub introduction: String,
    #[serde(rename = "curatedLinks", default)]
    pub curated_links: Vec<CuratedLink>,
    #[serde(rename = "trendsToWatch", default)]
    pub trends_to_watch: Vec<Trend>,
}

/// A citation the backend attached to its answer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WebSource {
    #[serde(default)]
    pub uri: String,
    #[serde(default)]
    pub title: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GroundingChunk {
    #[serde(default)]
    pub web: WebSource,
}

/// On-disk envelope for a saved draft file.
#[derive(Debug, Serialize, Deserialize)]
pub struct SavedDraft {
    pub version: String,
    pub created_at: String,
    pub draft: NewsletterDraft,
    pub citations: Vec<GroundingChunk>,
}

impl SavedDraft {
    pub fn new(draft: NewsletterDraft, citations: Vec<GroundingChunk>) -> Self {
        Self {
            version: "1.0".to_string(),
            created_at: chrono::Utc::now().to_rfc3339(),
            draft,
            citations,
        }
    }
}
