//! 结构化提取：从 Agent 的自由文本中定位 JSON 对象片段
//!
//! 默认策略 FirstLast：第一个 `{` 到最后一个 `}`（含两端）。该启发式不做括号配对，
//! 输出中有多个独立 JSON 片段、或字符串值里含字面量花括号时会提取错误；
//! 现有 prompt 依赖此行为，故保留为默认。
//! Balanced 策略按嵌套深度扫描（跳过字符串字面量内的括号），取深度回到 0 的位置。

use serde::Deserialize;

use crate::core::ExtractionFailure;

/// 提取策略（配置 `[extraction] strategy`）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionStrategy {
    #[default]
    FirstLast,
    Balanced,
}

/// 按策略提取候选片段，返回原文切片
pub fn extract_json_span(
    raw: &str,
    strategy: ExtractionStrategy,
) -> Result<&str, ExtractionFailure> {
    match strategy {
        ExtractionStrategy::FirstLast => first_to_last(raw),
        ExtractionStrategy::Balanced => balanced(raw),
    }
}

fn first_to_last(raw: &str) -> Result<&str, ExtractionFailure> {
    let start = raw.find('{').ok_or(ExtractionFailure)?;
    let end = raw.rfind('}').ok_or(ExtractionFailure)?;
    if end <= start {
        return Err(ExtractionFailure);
    }
    Ok(&raw[start..=end])
}

fn balanced(raw: &str) -> Result<&str, ExtractionFailure> {
    let start = raw.find('{').ok_or(ExtractionFailure)?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    // 花括号、引号、反斜杠都是 ASCII，按字节扫描不会落在多字节字符中间
    for (offset, byte) in raw.as_bytes()[start..].iter().enumerate() {
        if in_string {
            match byte {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match byte {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Ok(&raw[start..=start + offset]);
                }
            }
            _ => {}
        }
    }
    Err(ExtractionFailure)
}
