//! 编排器状态：单轮阶段与退出指令
//!
//! AwaitingInput -> Invoking -> Extracting -> Rendering -> AwaitingInput；
//! 只有在 AwaitingInput 收到退出指令（或外部中断）时进入 Terminated。

use serde::Serialize;

/// 退出指令（去首尾空白、忽略大小写、整词匹配）
pub const TERMINATION_TOKENS: &[&str] = &["exit", "quit", "goodbye", "stop"];

/// 编排器阶段
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum TurnPhase {
    AwaitingInput,
    Invoking,
    Extracting,
    Rendering,
    Terminated,
}

impl TurnPhase {
    pub fn is_terminal(self) -> bool {
        self == TurnPhase::Terminated
    }
}

/// 是否为退出指令；"exitable" 之类的子串不算
pub fn is_termination(input: &str) -> bool {
    let normalized = input.trim().to_lowercase();
    TERMINATION_TOKENS.contains(&normalized.as_str())
}
