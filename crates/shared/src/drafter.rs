use crate::config::Settings;
use crate::error::{BackendFailure, DraftError};
use crate::gemini::GenerationBackend;
use crate::models::{GroundingChunk, NewsletterDraft, Tone};
use crate::prompt;

/// Result of one successful generation call.
#[derive(Debug, Clone)]
pub struct DraftOutcome {
    pub draft: NewsletterDraft,
    pub citations: Vec<GroundingChunk>,
}

/// Orchestrates one draft-generation call: guard clauses, prompt assembly, the
/// remote call, and recovery of a structured draft from the raw response.
///
/// Holds no per-call state. Configuration is captured by value at call start
/// and never re-read mid-flight; callers run at most one call at a time.
pub struct DraftGenerator<B: GenerationBackend> {
    backend: B,
}

impl<B: GenerationBackend> DraftGenerator<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub async fn generate(
        &self,
        settings: &Settings,
        tone: Tone,
    ) -> Result<DraftOutcome, DraftError> {
        if settings.api_key.trim().is_empty() {
            return Err(DraftError::MissingCredential);
        }
        if settings.sources.is_empty() || settings.style_samples.is_empty() {
            return Err(DraftError::InvalidConfiguration(
                "Please add at least one source and provide at least one writing style sample."
                    .to_string(),
            ));
        }

        // Rebuilt fresh every call; sources, samples and tone may have changed.
        let prompt_text = prompt::build_prompt(&settings.sources, &settings.style_samples, tone);
        let schema = prompt::response_schema();

        let output = self
            .backend
            .generate(&prompt_text, &schema)
            .await
            .map_err(|failure| match failure {
                BackendFailure::Timeout(detail) => {
                    tracing::warn!(detail = %detail, "generation request timed out");
                    DraftError::RequestTimeout
                }
                BackendFailure::Other(detail) => {
                    tracing::error!(detail = %detail, "generation request failed");
                    DraftError::BackendError { detail }
                }
            })?;

        let candidate = extract_json_candidate(&output.text);
        match serde_json::from_str::<NewsletterDraft>(candidate) {
            Ok(draft) => Ok(DraftOutcome {
                draft,
                citations: output.citations,
            }),
            Err(e) => {
                tracing::error!(
                    error = %e,
                    candidate = %candidate,
                    raw = %output.text,
                    "failed to parse draft JSON from response"
                );
                Err(DraftError::MalformedResponse { raw: output.text })
            }
        }
    }
}

/// Locate the JSON payload inside a possibly noisy response. The model can wrap
/// the object in a ```json fence or in surrounding prose; try the fence first,
/// then fall back to slicing from the first '{' to the last '}'. If neither
/// works the full raw text is returned and left to fail at parse time.
pub fn extract_json_candidate(raw: &str) -> &str {
    if let Some(fence_start) = raw.find("```json") {
        let inner = &raw[fence_start + "```json".len()..];
        if let Some(fence_end) = inner.find("```") {
            return inner[..fence_end].trim();
        }
    }

    if let Some(start) = raw.find('{') {
        if let Some(end) = raw.rfind('}') {
            if end > start {
                return &raw[start..=end];
            }
        }
    }

    raw
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BackendFailure;
    use crate::gemini::GenerationOutput;
    use crate::models::{Source, SourceKind, WebSource};
    use serde_json::Value;
    use std::sync::atomic::{AtomicUsize, Ordering};

    // ==================== Extraction Tests ====================

    #[test]
    fn test_extract_fenced_json_block() {
        let raw = "Here is your draft:\n```json\n{\"subject\":\"S\"}\n```\nHope it helps!";
        assert_eq!(extract_json_candidate(raw), "{\"subject\":\"S\"}");
    }

    #[test]
    fn test_extract_bracket_slice_from_prose() {
        let raw = "Sure! {\"subject\":\"S\",\"nested\":{\"a\":1}} Let me know.";
        assert_eq!(
            extract_json_candidate(raw),
            "{\"subject\":\"S\",\"nested\":{\"a\":1}}"
        );
    }

    #[test]
    fn test_extract_unterminated_fence_falls_back_to_brackets() {
        let raw = "```json {\"subject\":\"S\"}";
        assert_eq!(extract_json_candidate(raw), "{\"subject\":\"S\"}");
    }

    #[test]
    fn test_extract_no_structure_returns_raw() {
        let raw = "I could not produce a draft this time.";
        assert_eq!(extract_json_candidate(raw), raw);
    }

    // ==================== Mock Backend ====================

    enum MockReply {
        Text(&'static str),
        Failure(fn() -> BackendFailure),
    }

    struct MockBackend {
        reply: MockReply,
        citations: Vec<GroundingChunk>,
        calls: AtomicUsize,
    }

    impl MockBackend {
        fn with_text(text: &'static str) -> Self {
            Self {
                reply: MockReply::Text(text),
                citations: Vec::new(),
                calls: AtomicUsize::new(0),
            }
        }

        fn with_failure(make: fn() -> BackendFailure) -> Self {
            Self {
                reply: MockReply::Failure(make),
                citations: Vec::new(),
                calls: AtomicUsize::new(0),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait::async_trait]
    impl GenerationBackend for MockBackend {
        async fn generate(
            &self,
            _prompt: &str,
            _schema: &Value,
        ) -> Result<GenerationOutput, BackendFailure> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.reply {
                MockReply::Text(text) => Ok(GenerationOutput {
                    text: text.to_string(),
                    citations: self.citations.clone(),
                }),
                MockReply::Failure(make) => Err(make()),
            }
        }
    }

    fn valid_settings() -> Settings {
        Settings {
            api_key: "test-key".to_string(),
            sources: vec![Source::new(SourceKind::Twitter, "#ai")],
            style_samples: vec!["Hey everyone!".to_string()],
        }
    }

    // ==================== Guard Clause Tests ====================

    #[tokio::test]
    async fn test_missing_credential_fails_without_call() {
        let backend = MockBackend::with_text("{}");
        let mut settings = valid_settings();
        settings.api_key = "   ".to_string();

        let generator = DraftGenerator::new(backend);
        let err = generator.generate(&settings, Tone::Default).await.unwrap_err();
        assert!(matches!(err, DraftError::MissingCredential));
        assert_eq!(generator.backend.call_count(), 0);
    }

    #[tokio::test]
    async fn test_empty_sources_fail_without_call() {
        let backend = MockBackend::with_text("{}");
        let mut settings = valid_settings();
        settings.sources.clear();

        let generator = DraftGenerator::new(backend);
        let err = generator.generate(&settings, Tone::Default).await.unwrap_err();
        assert!(matches!(err, DraftError::InvalidConfiguration(_)));
        assert_eq!(generator.backend.call_count(), 0);
    }

    #[tokio::test]
    async fn test_empty_style_samples_fail_without_call() {
        let backend = MockBackend::with_text("{}");
        let mut settings = valid_settings();
        settings.style_samples.clear();

        let generator = DraftGenerator::new(backend);
        let err = generator.generate(&settings, Tone::Default).await.unwrap_err();
        assert!(matches!(err, DraftError::InvalidConfiguration(_)));
        assert_eq!(generator.backend.call_count(), 0);
    }

    // ==================== Normalization Tests ====================

    #[tokio::test]
    async fn test_noisy_fenced_response_normalizes() {
        let backend = MockBackend::with_text(
            "noise ```json {\"subject\":\"S\",\"introduction\":\"I\",\"curatedLinks\":[],\"trendsToWatch\":[]} ``` more noise",
        );
        let generator = DraftGenerator::new(backend);

        let outcome = generator
            .generate(&valid_settings(), Tone::Default)
            .await
            .unwrap();
        assert_eq!(outcome.draft.subject, "S");
        assert_eq!(outcome.draft.introduction, "I");
        assert!(outcome.draft.curated_links.is_empty());
        assert!(outcome.draft.trends_to_watch.is_empty());
    }

    #[tokio::test]
    async fn test_prose_wrapped_response_normalizes() {
        let backend = MockBackend::with_text(
            "Here you go: {\"subject\":\"Weekly AI\",\"introduction\":\"Hi!\",\"curatedLinks\":[{\"title\":\"T\",\"url\":\"https://a.com\",\"summary\":\"s\"}],\"trendsToWatch\":[]} enjoy",
        );
        let generator = DraftGenerator::new(backend);

        let outcome = generator
            .generate(&valid_settings(), Tone::Default)
            .await
            .unwrap();
        assert_eq!(outcome.draft.subject, "Weekly AI");
        assert_eq!(outcome.draft.curated_links.len(), 1);
    }

    #[tokio::test]
    async fn test_citations_pass_through() {
        let mut backend = MockBackend::with_text(
            "{\"subject\":\"S\",\"introduction\":\"I\",\"curatedLinks\":[],\"trendsToWatch\":[]}",
        );
        backend.citations = vec![GroundingChunk {
            web: WebSource {
                uri: "https://a.com".to_string(),
                title: "A".to_string(),
            },
        }];
        let generator = DraftGenerator::new(backend);

        let outcome = generator
            .generate(&valid_settings(), Tone::Default)
            .await
            .unwrap();
        assert_eq!(outcome.citations.len(), 1);
        assert_eq!(outcome.citations[0].web.title, "A");
    }

    #[tokio::test]
    async fn test_unrecoverable_text_is_malformed_response() {
        let raw = "I'm sorry, I was unable to draft a newsletter today.";
        let backend = MockBackend::with_text(raw);
        let generator = DraftGenerator::new(backend);

        let err = generator
            .generate(&valid_settings(), Tone::Default)
            .await
            .unwrap_err();
        match err {
            DraftError::MalformedResponse { raw: preserved } => assert_eq!(preserved, raw),
            other => panic!("expected MalformedResponse, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_parseable_but_wrong_shape_is_malformed_response() {
        // Valid JSON, but missing the required subject/introduction fields.
        let backend = MockBackend::with_text("{\"topics\": []}");
        let generator = DraftGenerator::new(backend);

        let err = generator
            .generate(&valid_settings(), Tone::Default)
            .await
            .unwrap_err();
        assert!(matches!(err, DraftError::MalformedResponse { .. }));
    }

    // ==================== Failure Classification Tests ====================

    #[tokio::test]
    async fn test_backend_timeout_maps_to_request_timeout() {
        let backend =
            MockBackend::with_failure(|| BackendFailure::Timeout("deadline exceeded".to_string()));
        let generator = DraftGenerator::new(backend);

        let err = generator
            .generate(&valid_settings(), Tone::Default)
            .await
            .unwrap_err();
        assert!(matches!(err, DraftError::RequestTimeout));
    }

    #[tokio::test]
    async fn test_backend_failure_maps_to_backend_error() {
        let backend =
            MockBackend::with_failure(|| BackendFailure::Other("401 unauthorized".to_string()));
        let generator = DraftGenerator::new(backend);

        let err = generator
            .generate(&valid_settings(), Tone::Default)
            .await
            .unwrap_err();
        match err {
            DraftError::BackendError { detail } => assert!(detail.contains("401")),
            other => panic!("expected BackendError, got {:?}", other),
        }
    }
}
