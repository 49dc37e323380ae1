//! Mock LLM 客户端（用于测试与离线运行，无需 API）
//!
//! - MockLlmClient：取最后一条 User 消息，包装成一条合法的研究结果 JSON
//! - ScriptedLlmClient：按顺序回放预设输出，并记录每次收到的消息，供测试断言

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::llm::LlmClient;
use crate::memory::{Message, Role};

/// Mock 客户端：回显用户最后一条消息
#[derive(Debug, Default)]
pub struct MockLlmClient;

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn complete(&self, messages: &[Message]) -> Result<String, String> {
        let last_user = messages
            .iter()
            .rev()
            .find(|m| matches!(m.role, Role::User))
            .map(|m| m.content.as_str())
            .unwrap_or("(no input)");

        let record = serde_json::json!({
            "topic": last_user,
            "summary": format!("Echo from Mock: {last_user}"),
            "sources": [],
            "tools_used": [],
        });
        Ok(format!("Mock reasoning done. {record}"))
    }
}

/// 脚本化客户端：依次返回预设结果，耗尽后返回错误
#[derive(Debug, Default)]
pub struct ScriptedLlmClient {
    replies: Mutex<VecDeque<Result<String, String>>>,
    calls: Mutex<Vec<Vec<Message>>>,
}

impl ScriptedLlmClient {
    pub fn new(replies: impl IntoIterator<Item = Result<String, String>>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().collect()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// 每次 complete 收到的完整消息列表（含 system）
    pub fn calls(&self) -> Vec<Vec<Message>> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl LlmClient for ScriptedLlmClient {
    async fn complete(&self, messages: &[Message]) -> Result<String, String> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(messages.to_vec());
        }
        self.replies
            .lock()
            .map_err(|e| e.to_string())?
            .pop_front()
            .unwrap_or_else(|| Err("script exhausted".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::research::{parse_research_output, ExtractionStrategy};

    #[tokio::test]
    async fn test_mock_output_parses() {
        let client = MockLlmClient;
        let out = client
            .complete(&[Message::system("sys"), Message::user("rust \"ownership\"")])
            .await
            .unwrap();
        let record = parse_research_output(&out, ExtractionStrategy::FirstLast).unwrap();
        assert_eq!(record.topic, "rust \"ownership\"");
    }

    #[tokio::test]
    async fn test_scripted_replays_in_order() {
        let client = ScriptedLlmClient::new(vec![Ok("one".to_string()), Err("down".to_string())]);
        assert_eq!(client.complete(&[]).await, Ok("one".to_string()));
        assert_eq!(client.complete(&[]).await, Err("down".to_string()));
        assert_eq!(client.complete(&[]).await, Err("script exhausted".to_string()));
        assert_eq!(client.calls().len(), 3);
    }
}
