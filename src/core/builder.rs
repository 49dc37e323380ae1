//! 编排器构建：根据配置选择 LLM 后端、输入通道与语音合成

use std::sync::Arc;

use anyhow::Context;

use crate::agent::LlmResearchAgent;
use crate::channel::{ChannelKind, InputChannel, TextChannel, VoiceChannel};
use crate::config::AppConfig;
use crate::core::TurnOrchestrator;
use crate::llm::{create_ollama_client, LlmClient, MockLlmClient, OpenAiClient};
use crate::memory::ConversationHistory;
use crate::speech::{CommandRecognizer, CommandSynthesizer, SpeechSynthesizer};

/// 根据配置与环境变量选择 LLM 后端（Ollama / OpenAI 兼容 / Mock）
pub fn create_llm_from_config(cfg: &AppConfig) -> Arc<dyn LlmClient> {
    let llm = &cfg.llm;
    match llm.provider.to_lowercase().as_str() {
        "ollama" => {
            tracing::info!("Using Ollama LLM ({})", llm.model);
            Arc::new(create_ollama_client(
                llm.base_url.as_deref(),
                &llm.model,
                llm.temperature,
            ))
        }
        "openai" => match std::env::var("OPENAI_API_KEY") {
            Ok(key) => {
                tracing::info!("Using OpenAI LLM ({})", llm.model);
                Arc::new(OpenAiClient::new(
                    llm.base_url.as_deref(),
                    &llm.model,
                    Some(key.as_str()),
                    llm.temperature,
                ))
            }
            Err(_) => {
                tracing::warn!("OPENAI_API_KEY not set, using Mock LLM");
                Arc::new(MockLlmClient)
            }
        },
        "mock" => Arc::new(MockLlmClient),
        other => {
            tracing::warn!("Unknown LLM provider '{}', using Mock LLM", other);
            Arc::new(MockLlmClient)
        }
    }
}

/// 编排器构建器：统一文本与语音两种接入方式
pub struct OrchestratorBuilder {
    config: AppConfig,
    llm: Option<Arc<dyn LlmClient>>,
    history: ConversationHistory,
}

impl OrchestratorBuilder {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            llm: None,
            history: ConversationHistory::new(),
        }
    }

    /// 覆盖配置中的 LLM 后端
    pub fn with_llm(mut self, llm: Arc<dyn LlmClient>) -> Self {
        self.llm = Some(llm);
        self
    }

    /// 注入已有历史
    pub fn with_history(mut self, history: ConversationHistory) -> Self {
        self.history = history;
        self
    }

    fn build_channel(&self) -> anyhow::Result<Box<dyn InputChannel>> {
        match self.config.app.channel {
            ChannelKind::Text => Ok(Box::new(TextChannel::stdin(self.config.app.prompt.clone()))),
            ChannelKind::Voice => {
                let recognizer = CommandRecognizer::new(self.config.voice.recognizer_command.clone())
                    .context("voice channel requires [voice] recognizer_command")?;
                Ok(Box::new(VoiceChannel::new(
                    Arc::new(recognizer),
                    self.config.voice.listen_settings(),
                )))
            }
        }
    }

    fn build_synthesizer(&self) -> Option<Arc<dyn SpeechSynthesizer>> {
        if self.config.app.channel != ChannelKind::Voice {
            return None;
        }
        let synth = CommandSynthesizer::new(self.config.voice.synthesizer_command.clone());
        if synth.is_none() {
            tracing::warn!("No synthesizer_command configured, answers will only be printed");
        }
        synth.map(|s| Arc::new(s) as Arc<dyn SpeechSynthesizer>)
    }

    pub fn build(self) -> anyhow::Result<TurnOrchestrator> {
        let channel = self.build_channel()?;
        let synthesizer = self.build_synthesizer();
        let llm = self
            .llm
            .clone()
            .unwrap_or_else(|| create_llm_from_config(&self.config));
        let agent = Arc::new(LlmResearchAgent::new(llm));

        let mut orchestrator = TurnOrchestrator::new(channel, agent, self.history)
            .with_strategy(self.config.extraction.strategy);
        if let Some(synth) = synthesizer {
            orchestrator = orchestrator.with_synthesizer(synth);
        }
        Ok(orchestrator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::TurnPhase;

    #[test]
    fn test_voice_without_recognizer_fails() {
        let mut cfg = AppConfig::default();
        cfg.app.channel = ChannelKind::Voice;
        assert!(OrchestratorBuilder::new(cfg).build().is_err());
    }

    #[tokio::test]
    async fn test_build_text_orchestrator() {
        let mut cfg = AppConfig::default();
        cfg.llm.provider = "mock".to_string();
        let orch = OrchestratorBuilder::new(cfg).build().unwrap();
        assert_eq!(orch.phase(), TurnPhase::AwaitingInput);
        assert!(orch.history().is_empty());
    }

    #[tokio::test]
    async fn test_build_voice_orchestrator() {
        let mut cfg = AppConfig::default();
        cfg.app.channel = ChannelKind::Voice;
        cfg.voice.recognizer_command = vec!["listen".to_string()];
        cfg.llm.provider = "mock".to_string();
        let orch = OrchestratorBuilder::new(cfg).build().unwrap();
        assert_eq!(orch.phase(), TurnPhase::AwaitingInput);
    }
}
