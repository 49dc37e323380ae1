//! 单轮对话中的错误类型与恢复动作
//!
//! 与 RecoveryEngine 配合：ParseFailure 总是降级为原文；TurnError 决定 Skip / Terminate。
//! 每种错误都在编排器边界被捕获，不会让主循环退出。

use thiserror::Error;

/// 输入通道失败（文本或语音）
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputFailure {
    #[error("Listening timed out")]
    Timeout,

    #[error("Unintelligible audio")]
    UnintelligibleAudio,

    #[error("Speech service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Input error: {0}")]
    Other(String),

    /// 输入流已关闭（stdin EOF 等），视为外部中断
    #[error("Input closed")]
    Closed,
}

/// 从 Agent 输出中找不到 `{ ... }` 片段
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("No JSON object found in agent output")]
pub struct ExtractionFailure;

/// 提取出的片段无法通过结构校验
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationFailure {
    /// JSON 语法错误（如未闭合的字符串）
    #[error("JSON syntax error: {0}")]
    Syntax(String),

    /// 语法合法但字段缺失、类型不符或有多余字段
    #[error("Schema mismatch: {0}")]
    Shape(String),
}

/// Agent 输出无法解析为结构化记录；手里有原文，总能降级
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseFailure {
    #[error(transparent)]
    Extraction(#[from] ExtractionFailure),

    #[error(transparent)]
    Validation(#[from] ValidationFailure),
}

impl ParseFailure {
    pub fn kind(&self) -> &'static str {
        match self {
            ParseFailure::Extraction(_) => "extraction",
            ParseFailure::Validation(_) => "validation",
        }
    }
}

/// 没有 Agent 输出可降级、只能跳过或结束本轮的错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TurnError {
    #[error(transparent)]
    Input(#[from] InputFailure),

    #[error("Agent invocation failed: {0}")]
    AgentInvocation(String),
}

impl TurnError {
    /// 日志用的错误类别名
    pub fn kind(&self) -> &'static str {
        match self {
            TurnError::Input(InputFailure::Timeout) => "input_timeout",
            TurnError::Input(InputFailure::UnintelligibleAudio) => "input_unintelligible",
            TurnError::Input(InputFailure::ServiceUnavailable(_)) => "input_service_unavailable",
            TurnError::Input(InputFailure::Other(_)) => "input_other",
            TurnError::Input(InputFailure::Closed) => "input_closed",
            TurnError::AgentInvocation(_) => "agent_invocation",
        }
    }
}

/// 恢复引擎对 TurnError 给出的动作
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecoveryAction {
    /// 提示用户后跳过本轮（不写历史）
    Skip { diagnostic: String },
    /// 外部中断，结束循环
    Terminate,
}
