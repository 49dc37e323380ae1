//! 短期记忆：对话历史
//!
//! 进程生命周期内只追加、不剪枝的对话记录（user/assistant 交替），
//! 由编排器独占写入，并在下一轮调用 Agent 时原样传入。

use serde::{Deserialize, Serialize};

/// 消息角色（与 LLM API 一致）；System 仅用于拼 prompt，不进入对话历史
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    User,
    Assistant,
    System,
}

/// 单条消息
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }
}

/// 对话历史：有序、只追加、无上限
#[derive(Clone, Debug, Default)]
pub struct ConversationHistory {
    messages: Vec<Message>,
}

impl ConversationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, role: Role, content: impl Into<String>) {
        self.messages.push(Message {
            role,
            content: content.into(),
        });
    }

    /// 一轮完整对话：先 user(query)，再 assistant(渲染后的回答)
    pub fn append_exchange(&mut self, query: &str, rendered: &str) {
        self.append(Role::User, query);
        self.append(Role::Assistant, rendered);
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn iter(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_keeps_order() {
        let mut history = ConversationHistory::new();
        history.append_exchange("q1", "a1");
        history.append_exchange("q2", "a2");

        let roles: Vec<_> = history.iter().map(|m| m.role.clone()).collect();
        assert_eq!(
            roles,
            vec![Role::User, Role::Assistant, Role::User, Role::Assistant]
        );
        assert_eq!(history.messages()[2].content, "q2");
        assert_eq!(history.messages()[3].content, "a2");
    }

    #[test]
    fn test_history_is_unbounded() {
        let mut history = ConversationHistory::new();
        for i in 0..500 {
            history.append_exchange(&format!("q{i}"), &format!("a{i}"));
        }
        assert_eq!(history.len(), 1000);
        assert_eq!(history.messages()[0].content, "q0");
    }

    #[test]
    fn test_new_history_is_empty() {
        let history = ConversationHistory::new();
        assert!(history.is_empty());
        assert_eq!(history.len(), 0);
    }
}
