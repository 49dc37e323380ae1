//! 渲染：TurnResult -> 屏幕文本 / 朗读文本

use crate::research::{ResearchResponse, TurnResult};

/// 降级结果朗读时的固定前缀
pub const FALLBACK_SPEECH_PREFIX: &str =
    "I couldn't format the research perfectly, but here's what I found: ";
/// 未使用工具时的固定说明
pub const NO_TOOLS_REMARK: &str = "No special tools were used for this research.";
/// 朗读时最多念出的来源条数
const SPOKEN_SOURCES: usize = 2;

fn join_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "(none)".to_string()
    } else {
        items.join(", ")
    }
}

/// 屏幕文本；Fallback 原样输出。写入历史的也是这一形式
pub fn render_text(result: &TurnResult) -> String {
    match result {
        TurnResult::Structured(record) => format!(
            "Topic: {}\nSummary: {}\nSources: {}\nTools used: {}",
            record.topic,
            record.summary,
            join_or_none(&record.sources),
            join_or_none(&record.tools_used),
        ),
        TurnResult::Fallback(raw) => raw.clone(),
    }
}

/// 朗读文本
pub fn compose_speech(result: &TurnResult) -> String {
    match result {
        TurnResult::Structured(record) => speak_record(record),
        TurnResult::Fallback(raw) => format!("{FALLBACK_SPEECH_PREFIX}{raw}"),
    }
}

fn speak_record(record: &ResearchResponse) -> String {
    let mut speech = format!(
        "Here's what I found about {}. {}",
        record.topic, record.summary
    );
    if !record.sources.is_empty() {
        let first: Vec<&str> = record
            .sources
            .iter()
            .take(SPOKEN_SOURCES)
            .map(String::as_str)
            .collect();
        speech.push_str(&format!(" Some of my sources include {}.", first.join(", ")));
    }
    if record.tools_used.is_empty() {
        speech.push(' ');
        speech.push_str(NO_TOOLS_REMARK);
    } else {
        speech.push_str(&format!(
            " I used these tools: {}.",
            record.tools_used.join(", ")
        ));
    }
    speech
}
