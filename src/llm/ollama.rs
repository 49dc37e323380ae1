//! Ollama 本地模型客户端（OpenAI 兼容格式）
//!
//! Ollama 在 /v1 下提供 OpenAI 兼容接口，无需 API Key。
//! - Base URL: http://localhost:11434/v1
//! - 默认模型: qwen3:0.6b，温度 0

use crate::llm::OpenAiClient;

/// Ollama 常量
pub const OLLAMA_BASE_URL: &str = "http://localhost:11434/v1";
pub const OLLAMA_DEFAULT_MODEL: &str = "qwen3:0.6b";

/// 创建 Ollama 客户端；base_url 为空时使用本机默认端口
pub fn create_ollama_client(base_url: Option<&str>, model: &str, temperature: f32) -> OpenAiClient {
    let base_url = base_url.unwrap_or(OLLAMA_BASE_URL);
    OpenAiClient::new(Some(base_url), model, Some("ollama"), temperature)
}
