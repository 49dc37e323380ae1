//! 输入通道：文本控制台 / 语音 / 脚本回放
//!
//! 所有通道实现 InputChannel::acquire，返回规范化的 Query 或分类后的 InputFailure。

pub mod scripted;
pub mod text;
pub mod voice;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::core::InputFailure;

pub use scripted::ScriptedChannel;
pub use text::TextChannel;
pub use voice::{ListenSettings, ServiceRetry, VoiceChannel};

/// 输入来源，同时决定输出方式（voice 会额外朗读）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelKind {
    #[default]
    Text,
    Voice,
}

/// 用户问题（已去除首尾空白）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub text: String,
    pub origin: ChannelKind,
}

impl Query {
    pub fn new(text: impl Into<String>, origin: ChannelKind) -> Self {
        Self {
            text: text.into().trim().to_string(),
            origin,
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::new(text, ChannelKind::Text)
    }

    pub fn voice(text: impl Into<String>) -> Self {
        Self::new(text, ChannelKind::Voice)
    }
}

/// 输入通道能力
#[async_trait]
pub trait InputChannel: Send {
    fn kind(&self) -> ChannelKind;

    async fn acquire(&mut self) -> Result<Query, InputFailure>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_is_trimmed() {
        let q = Query::text("  what is rust \n");
        assert_eq!(q.text, "what is rust");
        assert_eq!(q.origin, ChannelKind::Text);
        assert_eq!(Query::voice(" hi ").origin, ChannelKind::Voice);
    }
}
