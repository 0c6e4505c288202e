//! Prompt construction and response parsing for model-assisted correction.
//!
//! The model call itself happens elsewhere; this module only builds the
//! request text and reads the reply.
//!
//! # Example
//!
//! ```
//! use bibnorm::correction::{build_prompt, parse_response};
//! use bibnorm::CitationStyle;
//!
//! let prompt = build_prompt("silva j. obra. atlas 2020", CitationStyle::Abnt);
//! assert!(prompt.user.contains("silva j. obra. atlas 2020"));
//!
//! let reply = "```json\n{\"correctedText\": \"SILVA, J. Obra. Atlas, 2020.\", \"changes\": [\"caixa alta\"]}\n```";
//! let correction = parse_response(reply).unwrap();
//! assert_eq!(correction.corrected_text, "SILVA, J. Obra. Atlas, 2020.");
//! ```

use crate::{CitationStyle, ReferenceError, Result};
use serde::{Deserialize, Serialize};

pub const CORRECTION_SYSTEM: &str = "\
You are a meticulous bibliographic editor. \
You rewrite reference lists so that every entry follows the requested citation style. \
Never invent authors, titles, years or publishers that are not in the input. \
You MUST respond with valid JSON only, with no explanations.";

pub const CORRECTION_PROMPT: &str = r#"Rewrite the following references in {style_name} style.

INPUT:
{text}

OUTPUT SCHEMA (return exactly this structure):
{
  "correctedText": "string",
  "changes": ["string"]
}

RULES:
1. Keep one reference per paragraph, in the input order.
2. List every change you made in "changes", one short sentence each.
3. If a reference is already correct, leave it unchanged.
4. Return ONLY the JSON object."#;

/// The two messages sent to the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CorrectionPrompt {
    pub system: String,
    pub user: String,
}

/// The model's reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Correction {
    pub corrected_text: String,
    #[serde(default)]
    pub changes: Vec<String>,
}

fn style_name(style: CitationStyle) -> &'static str {
    match style {
        CitationStyle::Abnt => "ABNT (NBR 6023)",
        CitationStyle::Apa => "APA (7th edition)",
        CitationStyle::Vancouver => "Vancouver",
        CitationStyle::Mla => "MLA (9th edition)",
    }
}

/// Builds the correction request for `text` in `style`.
pub fn build_prompt(text: &str, style: CitationStyle) -> CorrectionPrompt {
    CorrectionPrompt {
        system: CORRECTION_SYSTEM.to_string(),
        user: CORRECTION_PROMPT
            .replace("{style_name}", style_name(style))
            .replace("{text}", text.trim()),
    }
}

/// Reads the model's reply.
///
/// Code fences and prose around the JSON object are ignored.
///
/// # Errors
///
/// [`ReferenceError::InvalidInput`] when the reply holds no JSON object or the
/// corrected text is blank; [`ReferenceError::Json`] when the object does not
/// match the expected shape.
pub fn parse_response(raw: &str) -> Result<Correction> {
    let object = match (raw.find('{'), raw.rfind('}')) {
        (Some(start), Some(end)) if start < end => &raw[start..=end],
        _ => {
            return Err(ReferenceError::InvalidInput(
                "model reply contains no JSON object".to_string(),
            ));
        }
    };

    let correction: Correction = serde_json::from_str(object)?;
    if correction.corrected_text.trim().is_empty() {
        return Err(ReferenceError::InvalidInput(
            "model reply has an empty correctedText".to_string(),
        ));
    }
    Ok(correction)
}
