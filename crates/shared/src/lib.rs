// Public modules
pub mod config;
pub mod drafter;
pub mod error;
pub mod export;
pub mod gemini;
pub mod io;
pub mod models;
pub mod prompt;

// Re-export commonly used types
pub use config::Settings;
pub use drafter::{DraftGenerator, DraftOutcome};
pub use error::{BackendFailure, DraftError};
pub use gemini::{GeminiClient, GenerationBackend, GenerationOutput};
pub use io::{get_default_drafts_dir, list_draft_files, load_draft, save_draft, save_draft_to};
pub use models::{
    CuratedLink, GroundingChunk, NewsletterDraft, SavedDraft, Source, SourceKind, Tone, Trend,
};
