//! 研究 Agent 调用
//!
//! ResearchAgent 是编排器眼中的外部协作者：invoke(query, history) -> 原始文本。
//! LlmResearchAgent 在 LlmClient 之上拼装 system prompt（含格式说明）、历史与本轮问题。
//! 这里不做重试、不加超时，失败原样上抛由编排器归类。

use std::sync::Arc;

use async_trait::async_trait;

use crate::core::TurnError;
use crate::llm::LlmClient;
use crate::memory::Message;
use crate::research::format_instructions;

/// 外部 Agent 协作者
#[async_trait]
pub trait ResearchAgent: Send + Sync {
    async fn invoke(&self, query: &str, history: &[Message]) -> Result<String, TurnError>;
}

/// 研究助理的基础 system prompt，格式说明追加在后
pub const RESEARCH_SYSTEM_PROMPT: &str = "You are a research assistant that will help generate a research paper. \
Answer the user query and use the necessary tools. \
Wrap the output in this format and provide no other text.";

/// 基于 LlmClient 的研究 Agent
pub struct LlmResearchAgent {
    llm: Arc<dyn LlmClient>,
    system_prompt: String,
}

impl LlmResearchAgent {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self::with_system_prompt(llm, RESEARCH_SYSTEM_PROMPT)
    }

    pub fn with_system_prompt(llm: Arc<dyn LlmClient>, base_prompt: &str) -> Self {
        Self {
            llm,
            system_prompt: format!("{}\n{}", base_prompt, format_instructions()),
        }
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    /// system + 历史 + 本轮问题
    fn build_messages(&self, query: &str, history: &[Message]) -> Vec<Message> {
        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(Message::system(self.system_prompt.clone()));
        messages.extend(history.iter().cloned());
        messages.push(Message::user(query.to_string()));
        messages
    }
}

#[async_trait]
impl ResearchAgent for LlmResearchAgent {
    async fn invoke(&self, query: &str, history: &[Message]) -> Result<String, TurnError> {
        let messages = self.build_messages(query, history);
        let output = self
            .llm
            .complete(&messages)
            .await
            .map_err(TurnError::AgentInvocation)?;

        let (prompt, completion, total) = self.llm.token_usage();
        tracing::debug!(
            prompt_tokens = prompt,
            completion_tokens = completion,
            total_tokens = total,
            output_len = output.len(),
            "agent responded"
        );
        Ok(output)
    }
}
