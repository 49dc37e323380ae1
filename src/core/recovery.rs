//! 错误恢复引擎
//!
//! 提取/校验失败（ParseFailure）降级为原文，仍写入历史；
//! TurnError 映射为 RecoveryAction：输入与 Agent 失败给出诊断并跳过本轮，输入关闭则结束循环。

use crate::core::{InputFailure, ParseFailure, RecoveryAction, TurnError};
use crate::research::TurnResult;

/// 语义化错误恢复：将错误映射为可执行动作（降级 / 跳过 / 终止）
#[derive(Debug, Default)]
pub struct RecoveryEngine;

impl RecoveryEngine {
    pub fn new() -> Self {
        Self
    }

    /// 解析失败时原样保留 Agent 输出
    pub fn fallback(&self, failure: &ParseFailure, raw: &str) -> TurnResult {
        tracing::debug!(kind = failure.kind(), raw_len = raw.len(), "fallback to raw output");
        TurnResult::Fallback(raw.to_string())
    }

    pub fn handle(&self, err: &TurnError) -> RecoveryAction {
        match err {
            TurnError::Input(InputFailure::Closed) => RecoveryAction::Terminate,
            TurnError::Input(failure) => RecoveryAction::Skip {
                diagnostic: input_diagnostic(failure),
            },
            TurnError::AgentInvocation(msg) => RecoveryAction::Skip {
                diagnostic: format!("Sorry, the research agent failed to respond: {msg}"),
            },
        }
    }
}

fn input_diagnostic(failure: &InputFailure) -> String {
    match failure {
        InputFailure::Timeout => {
            "I didn't hear anything before the listening timeout. Please try again.".to_string()
        }
        InputFailure::UnintelligibleAudio => {
            "Sorry, I couldn't understand what you said. Please try again.".to_string()
        }
        InputFailure::ServiceUnavailable(detail) => {
            format!("The speech recognition service is unavailable: {detail}")
        }
        InputFailure::Other(detail) => format!("Something went wrong reading your input: {detail}"),
        InputFailure::Closed => "Input closed.".to_string(),
    }
}
