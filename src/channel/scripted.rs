//! 脚本通道：按顺序回放预设输入，用于确定性测试

use std::collections::VecDeque;

use async_trait::async_trait;

use crate::channel::{ChannelKind, InputChannel, Query};
use crate::core::InputFailure;

/// 回放完后报告 Closed
#[derive(Debug, Clone)]
pub struct ScriptedChannel {
    kind: ChannelKind,
    items: VecDeque<Result<Query, InputFailure>>,
}

impl ScriptedChannel {
    pub fn new(kind: ChannelKind, items: impl IntoIterator<Item = Result<Query, InputFailure>>) -> Self {
        Self {
            kind,
            items: items.into_iter().collect(),
        }
    }

    /// 纯文本脚本
    pub fn lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            ChannelKind::Text,
            lines.into_iter().map(|l| Ok(Query::text(l))),
        )
    }

    pub fn remaining(&self) -> usize {
        self.items.len()
    }
}

#[async_trait]
impl InputChannel for ScriptedChannel {
    fn kind(&self) -> ChannelKind {
        self.kind
    }

    async fn acquire(&mut self) -> Result<Query, InputFailure> {
        self.items.pop_front().unwrap_or(Err(InputFailure::Closed))
    }
}
