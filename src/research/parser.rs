//! 解析 Agent 输出：提取 + 校验，得到 Structured 或 Fallback

use crate::core::ParseFailure;
use crate::research::{extract_json_span, validate_span, ExtractionStrategy, ResearchResponse};

/// 单轮结果：要么是合法的结构化记录，要么是原文降级
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnResult {
    Structured(ResearchResponse),
    Fallback(String),
}

impl TurnResult {
    pub fn is_structured(&self) -> bool {
        matches!(self, TurnResult::Structured(_))
    }
}

/// 从 Agent 原始输出中解析 ResearchResponse；失败交给 RecoveryEngine 降级
pub fn parse_research_output(
    raw: &str,
    strategy: ExtractionStrategy,
) -> Result<ResearchResponse, ParseFailure> {
    let span = extract_json_span(raw, strategy)?;
    tracing::debug!(span_len = span.len(), "extracted candidate span");
    Ok(validate_span(span)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ExtractionFailure, ValidationFailure};

    #[test]
    fn test_parse_noisy_output() {
        let raw = "Thinking... {\"topic\":\"Quantum Computing\",\"summary\":\"A brief overview.\",\"sources\":[\"wiki\"],\"tools_used\":[]} done";
        let record = parse_research_output(raw, ExtractionStrategy::FirstLast).unwrap();
        assert_eq!(record.topic, "Quantum Computing");
        assert_eq!(record.summary, "A brief overview.");
        assert_eq!(record.sources, vec!["wiki"]);
        assert!(record.tools_used.is_empty());
    }

    #[test]
    fn test_parse_without_json() {
        let err = parse_research_output("no structure here", ExtractionStrategy::FirstLast)
            .unwrap_err();
        assert_eq!(err, ParseFailure::Extraction(ExtractionFailure));
    }

    #[test]
    fn test_parse_invalid_json() {
        let err = parse_research_output("{\"topic\": \"unterminated}", ExtractionStrategy::FirstLast)
            .unwrap_err();
        assert!(matches!(
            err,
            ParseFailure::Validation(ValidationFailure::Syntax(_))
        ));
    }

    #[test]
    fn test_two_fragments_depend_on_strategy() {
        let raw = "{\"topic\":\"t\",\"summary\":\"s\",\"sources\":[],\"tools_used\":[]} also {\"x\":1}";
        assert!(matches!(
            parse_research_output(raw, ExtractionStrategy::FirstLast),
            Err(ParseFailure::Validation(_))
        ));
        assert!(parse_research_output(raw, ExtractionStrategy::Balanced).is_ok());
    }
}
