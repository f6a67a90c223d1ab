// Result view: turns the raw reply into something that always renders

use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use crate::core::types::TranslationResponse;

pub const NO_TEXT_FOUND: &str = "No text found";
pub const NO_TRANSLATION_AVAILABLE: &str = "No translation available";
pub const NO_ORIGINAL_TEXT_FOUND: &str = "No original text found";
pub const NO_TRANSLATION_FOUND: &str = "No translation found";
pub const ERROR_PARSING_ORIGINAL: &str = "Error parsing original text";
pub const ERROR_PARSING_TRANSLATION: &str = "Error parsing translation";

/// The two strings the result screen shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultView {
    pub original_text: String,
    pub translated_text: String,
}

impl ResultView {
    fn new(original_text: &str, translated_text: &str) -> Self {
        Self {
            original_text: original_text.to_string(),
            translated_text: translated_text.to_string(),
        }
    }
}

/// Never fails: missing replies and unparsable JSON become placeholder text.
pub fn parse_result(raw: Option<&str>) -> ResultView {
    let raw = match raw {
        Some(raw) if !raw.is_empty() => raw,
        _ => return ResultView::new(NO_TEXT_FOUND, NO_TRANSLATION_AVAILABLE),
    };

    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Null) => {
            warn!("Error parsing result: reply is null");
            ResultView::new(ERROR_PARSING_ORIGINAL, ERROR_PARSING_TRANSLATION)
        }
        Ok(reply) => ResultView {
            original_text: string_field_or(&reply, "originalText", NO_ORIGINAL_TEXT_FOUND),
            translated_text: string_field_or(&reply, "translation", NO_TRANSLATION_FOUND),
        },
        Err(e) => {
            warn!("Error parsing result: {}", e);
            ResultView::new(ERROR_PARSING_ORIGINAL, ERROR_PARSING_TRANSLATION)
        }
    }
}

/// Strict parse requiring all four string fields.
pub fn parse_response(raw: &str) -> Result<TranslationResponse, serde_json::Error> {
    serde_json::from_str(raw)
}

pub fn render_text(view: &ResultView) -> String {
    format!(
        "Translation Result\n\nOriginal Text\n{}\n\nTranslation\n{}\n",
        view.original_text, view.translated_text
    )
}

fn string_field_or(reply: &Value, key: &str, fallback: &str) -> String {
    match reply.get(key) {
        Some(Value::String(text)) if !text.is_empty() => text.clone(),
        _ => fallback.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPLY: &str =
        r#"{"originalText":"Hola","translation":"Hello","sourceLanguage":"es","targetLanguage":"en"}"#;

    #[test]
    fn test_parse_valid_reply() {
        let view = parse_result(Some(REPLY));
        assert_eq!(view.original_text, "Hola");
        assert_eq!(view.translated_text, "Hello");
    }

    #[test]
    fn test_parse_invalid_json_uses_error_placeholders() {
        let view = parse_result(Some("not json"));
        assert_eq!(view.original_text, "Error parsing original text");
        assert_eq!(view.translated_text, "Error parsing translation");
    }

    #[test]
    fn test_parse_missing_reply_uses_empty_placeholders() {
        for raw in [None, Some("")] {
            let view = parse_result(raw);
            assert_eq!(view.original_text, "No text found");
            assert_eq!(view.translated_text, "No translation available");
        }
    }

    #[test]
    fn test_parse_missing_fields_use_field_placeholders() {
        let view = parse_result(Some(r#"{"originalText":"","sourceLanguage":"es"}"#));
        assert_eq!(view.original_text, "No original text found");
        assert_eq!(view.translated_text, "No translation found");

        let view = parse_result(Some(r#"{"originalText":null,"translation":"Hello"}"#));
        assert_eq!(view.original_text, "No original text found");
        assert_eq!(view.translated_text, "Hello");
    }

    #[test]
    fn test_valid_json_of_the_wrong_shape() {
        let view = parse_result(Some(r#"{"originalText":42,"translation":"x"}"#));
        assert_eq!(view.original_text, NO_ORIGINAL_TEXT_FOUND);
        assert_eq!(view.translated_text, "x");

        let view = parse_result(Some("[1, 2]"));
        assert_eq!(view.original_text, NO_ORIGINAL_TEXT_FOUND);
        assert_eq!(view.translated_text, NO_TRANSLATION_FOUND);

        let view = parse_result(Some("null"));
        assert_eq!(view.original_text, ERROR_PARSING_ORIGINAL);
        assert_eq!(view.translated_text, ERROR_PARSING_TRANSLATION);
    }

    #[test]
    fn test_strict_parse() {
        let response = parse_response(REPLY).unwrap();
        assert_eq!(response.source_language, "es");
        assert_eq!(response.target_language, "en");

        assert!(parse_response(r#"{"originalText":"Hola"}"#).is_err());
    }

    #[test]
    fn test_render_text() {
        let rendered = render_text(&parse_result(Some(REPLY)));
        assert_eq!(
            rendered,
            "Translation Result\n\nOriginal Text\nHola\n\nTranslation\nHello\n"
        );
    }
}
