//! 结构校验：ResearchResponse 及其 JSON Schema
//!
//! 先解析为通用 JSON（区分语法错误），再按固定结构反序列化：
//! 四个字段缺一不可、类型必须正确、不允许多余字段。

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::ValidationFailure;

/// Agent 应返回的结构化研究结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ResearchResponse {
    pub topic: String,
    pub summary: String,
    pub sources: Vec<String>,
    pub tools_used: Vec<String>,
}

/// 校验候选片段，成功返回 ResearchResponse
pub fn validate_span(span: &str) -> Result<ResearchResponse, ValidationFailure> {
    let value: Value =
        serde_json::from_str(span).map_err(|e| ValidationFailure::Syntax(e.to_string()))?;
    if !value.is_object() {
        return Err(ValidationFailure::Shape("expected a JSON object".to_string()));
    }
    serde_json::from_value(value).map_err(|e| ValidationFailure::Shape(e.to_string()))
}

/// 放进 system prompt 的格式说明（内嵌 ResearchResponse 的 JSON Schema）
pub fn format_instructions() -> String {
    let schema = schemars::schema_for!(ResearchResponse);
    let schema = serde_json::to_string_pretty(&schema).unwrap_or_default();
    format!(
        "The output must be a single JSON object that conforms to the JSON schema below. \
         All four properties are required and no other properties are allowed.\n\n\
         Here is the output schema:\n```\n{schema}\n```"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_record() {
        let span = r#"{"topic":"Rust","summary":"Systems language.","sources":["a","b"],"tools_used":["search"]}"#;
        let record = validate_span(span).unwrap();
        assert_eq!(record.topic, "Rust");
        assert_eq!(record.summary, "Systems language.");
        assert_eq!(record.sources, vec!["a", "b"]);
        assert_eq!(record.tools_used, vec!["search"]);
    }

    #[test]
    fn test_empty_lists_are_valid() {
        let span = r#"{"topic":"t","summary":"s","sources":[],"tools_used":[]}"#;
        let record = validate_span(span).unwrap();
        assert!(record.sources.is_empty());
        assert!(record.tools_used.is_empty());
    }

    #[test]
    fn test_escaped_strings_round_trip() {
        let span = r#"{"topic":"a \"quoted\" {brace}","summary":"line\nbreak","sources":["ü"],"tools_used":[]}"#;
        let record = validate_span(span).unwrap();
        assert_eq!(record.topic, "a \"quoted\" {brace}");
        assert_eq!(record.summary, "line\nbreak");
        assert_eq!(record.sources, vec!["ü"]);
    }

    #[test]
    fn test_unterminated_string_is_syntax_error() {
        let span = r#"{"topic":"oops,"summary":"s"}"#;
        assert!(matches!(validate_span(span), Err(ValidationFailure::Syntax(_))));
    }

    #[test]
    fn test_missing_field() {
        let span = r#"{"topic":"t","summary":"s","sources":[]}"#;
        let err = validate_span(span).unwrap_err();
        match err {
            ValidationFailure::Shape(msg) => assert!(msg.contains("tools_used")),
            other => panic!("Expected Shape, got {other:?}"),
        }
    }

    #[test]
    fn test_wrong_types() {
        let cases = [
            r#"{"topic":1,"summary":"s","sources":[],"tools_used":[]}"#,
            r#"{"topic":"t","summary":null,"sources":[],"tools_used":[]}"#,
            r#"{"topic":"t","summary":"s","sources":"a","tools_used":[]}"#,
            r#"{"topic":"t","summary":"s","sources":[1],"tools_used":[]}"#,
        ];
        for span in cases {
            assert!(
                matches!(validate_span(span), Err(ValidationFailure::Shape(_))),
                "should reject {span}"
            );
        }
    }

    #[test]
    fn test_extra_field_rejected() {
        let span = r#"{"topic":"t","summary":"s","sources":[],"tools_used":[],"confidence":0.9}"#;
        assert!(matches!(validate_span(span), Err(ValidationFailure::Shape(_))));
    }

    #[test]
    fn test_non_object_rejected() {
        assert!(matches!(validate_span("[1, 2]"), Err(ValidationFailure::Shape(_))));
    }

    #[test]
    fn test_format_instructions_mention_fields() {
        let text = format_instructions();
        for field in ["topic", "summary", "sources", "tools_used"] {
            assert!(text.contains(field), "missing {field}");
        }
    }
}
