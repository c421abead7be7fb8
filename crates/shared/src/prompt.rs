use serde_json::{json, Value};

use crate::models::{Source, SourceKind, Tone};

/// Separator placed between writing-style samples so the model can tell where
/// one sample ends and the next begins.
pub const STYLE_SAMPLE_DELIMITER: &str = "\n\n---\n\n";

/// Render one source as a human-readable research clause.
pub fn source_clause(source: &Source) -> String {
    match source.kind {
        SourceKind::Twitter => {
            format!("trending topics on Twitter about \"{}\"", source.value)
        }
        SourceKind::YouTube => {
            format!(
                "latest popular videos from YouTube channel \"{}\"",
                source.value
            )
        }
        SourceKind::Rss => {
            format!("top stories from the RSS feed \"{}\"", source.value)
        }
    }
}

/// Join all source clauses into one research-scope phrase. Empty clauses are
/// dropped so the join never produces doubled separators.
pub fn research_scope(sources: &[Source]) -> String {
    sources
        .iter()
        .map(source_clause)
        .filter(|clause| !clause.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Concatenate all style samples into one block with a distinct delimiter.
pub fn style_block(samples: &[String]) -> String {
    samples.join(STYLE_SAMPLE_DELIMITER)
}

/// The tone-adjustment instruction, or `None` when tone is the no-override
/// sentinel. A selected tone is a subtle shift layered on the base style, not a
/// replacement for it.
pub fn tone_instruction(tone: Tone) -> Option<String> {
    if tone == Tone::Default {
        return None;
    }
    Some(format!(
        "4. **Tone Adjustment**: For this specific draft, adjust the writing tone to be more \
         \"{}\". This should be a subtle shift that complements the user's primary writing \
         style, not replace it.",
        tone.label()
    ))
}

/// Assemble the full instruction prompt. Pure function of its inputs; callers
/// recompute it for every call since sources, samples and tone may change
/// between calls.
pub fn build_prompt(sources: &[Source], style_samples: &[String], tone: Tone) -> String {
    let scope = research_scope(sources);
    let style = style_block(style_samples);
    let tone_step = tone_instruction(tone).unwrap_or_default();

    format!(
        r#"You are CreatorPulse, an expert content curator and newsletter writer. Your task is to perform a real-time web search, analyze the results, and then draft a newsletter in a specific user's voice.

1. **Research Task**: First, use Google Search to find the most recent, interesting, and trending content based on these topics: {scope}. Focus on content suitable for a tech, business, or creator-focused newsletter.

2. **Analyze Writing Style**: Next, deeply understand the user's tone, voice, and formatting from these examples. This is the primary style you must replicate. Each sample is separated by '---'.
    ---
    WRITING STYLE SAMPLES:
    {style}
    ---

3. **Generate Newsletter Draft**: Based on your search results and the user's style, generate a complete newsletter draft. It MUST include:
    - A compelling subject line.
    - An engaging introduction paragraph.
    - A list of 3 curated links, each with a short, insightful summary written in the user's voice. Use the real URLs from your search results.
    - A "Trends to Watch" section with the top 2 emerging trends, each with a title, a one-sentence explainer, and a relevant link from your search results.

{tone_step}

5. **Output Format**: Return the draft as a single, valid JSON object matching the provided schema. Do not include any markdown formatting like ```json."#
    )
}

/// The machine-checkable output schema attached to the generation call. Counts
/// (3 links, 2 trends) are prose guidance only; the schema cannot enforce them.
pub fn response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "subject": {
                "type": "STRING",
                "description": "A compelling email subject line."
            },
            "introduction": {
                "type": "STRING",
                "description": "Engaging intro paragraph in the user's voice."
            },
            "curatedLinks": {
                "type": "ARRAY",
                "description": "List of curated links with summaries.",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "title": { "type": "STRING" },
                        "url": { "type": "STRING" },
                        "summary": { "type": "STRING" }
                    },
                    "required": ["title", "url", "summary"]
                }
            },
            "trendsToWatch": {
                "type": "ARRAY",
                "description": "List of emerging trends to watch.",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "title": { "type": "STRING" },
                        "explainer": { "type": "STRING" },
                        "link": { "type": "STRING" }
                    },
                    "required": ["title", "explainer", "link"]
                }
            }
        },
        "required": ["subject", "introduction", "curatedLinks", "trendsToWatch"]
    })
}
