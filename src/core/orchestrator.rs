//! 编排器：主控循环
//!
//! 每轮：读取输入 -> 调用 Agent -> 提取 + 校验 -> 渲染（失败则降级为原文）-> 写入历史。
//! 任何一轮的失败都在这里被归类、提示并吞下，循环只会因退出指令或外部中断结束。

use std::sync::Arc;

use tracing::Instrument;
use uuid::Uuid;

use crate::agent::ResearchAgent;
use crate::channel::{ChannelKind, InputChannel};
use crate::core::state::is_termination;
use crate::core::{RecoveryAction, RecoveryEngine, TurnError, TurnPhase};
use crate::memory::ConversationHistory;
use crate::output::{compose_speech, render_text, OutputSink, StdoutSink};
use crate::research::{parse_research_output, ExtractionStrategy, TurnResult};
use crate::speech::SpeechSynthesizer;

/// 收到退出指令时的告别语
pub const FAREWELL: &str = "Exiting chat. Goodbye!";

/// 单轮结果
#[derive(Debug, Clone, PartialEq)]
pub enum TurnOutcome {
    /// 拿到了回答（结构化或降级），历史已追加两条
    Completed(TurnResult),
    /// 本轮失败并已提示用户，历史未变
    Skipped(TurnError),
    Terminated,
}

/// 对话编排器；历史由构造方注入，编排器独占写入
pub struct TurnOrchestrator {
    channel: Box<dyn InputChannel>,
    agent: Arc<dyn ResearchAgent>,
    recovery: RecoveryEngine,
    strategy: ExtractionStrategy,
    output: Box<dyn OutputSink>,
    synthesizer: Option<Arc<dyn SpeechSynthesizer>>,
    history: ConversationHistory,
    phase: TurnPhase,
    turns: usize,
    session_id: Uuid,
}

impl TurnOrchestrator {
    pub fn new(
        channel: Box<dyn InputChannel>,
        agent: Arc<dyn ResearchAgent>,
        history: ConversationHistory,
    ) -> Self {
        Self {
            channel,
            agent,
            recovery: RecoveryEngine::new(),
            strategy: ExtractionStrategy::default(),
            output: Box::new(StdoutSink),
            synthesizer: None,
            history,
            phase: TurnPhase::AwaitingInput,
            turns: 0,
            session_id: Uuid::new_v4(),
        }
    }

    /// 设置屏幕输出目标
    pub fn with_output(mut self, output: Box<dyn OutputSink>) -> Self {
        self.output = output;
        self
    }

    /// 设置语音合成（仅语音通道会朗读）
    pub fn with_synthesizer(mut self, synthesizer: Arc<dyn SpeechSynthesizer>) -> Self {
        self.synthesizer = Some(synthesizer);
        self
    }

    /// 设置提取策略
    pub fn with_strategy(mut self, strategy: ExtractionStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    pub fn history(&self) -> &ConversationHistory {
        &self.history
    }

    pub fn into_history(self) -> ConversationHistory {
        self.history
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// 主循环：直到退出指令或输入关闭
    pub async fn run(&mut self) {
        tracing::info!(
            session = %self.session_id,
            channel = ?self.channel.kind(),
            "conversation started"
        );
        loop {
            self.turns += 1;
            let span = tracing::info_span!("turn", session = %self.session_id, turn = self.turns);
            if let TurnOutcome::Terminated = self.step().instrument(span).await {
                break;
            }
        }
        tracing::info!(
            session = %self.session_id,
            history_len = self.history.len(),
            "conversation ended"
        );
    }

    /// 执行一轮
    pub async fn step(&mut self) -> TurnOutcome {
        if self.phase.is_terminal() {
            return TurnOutcome::Terminated;
        }
        self.set_phase(TurnPhase::AwaitingInput);

        let query = match self.channel.acquire().await {
            Ok(query) => query,
            Err(failure) => return self.fail_turn(TurnError::Input(failure)).await,
        };

        if is_termination(&query.text) {
            self.report(FAREWELL).await;
            self.set_phase(TurnPhase::Terminated);
            return TurnOutcome::Terminated;
        }

        self.set_phase(TurnPhase::Invoking);
        let raw = match self.agent.invoke(&query.text, self.history.messages()).await {
            Ok(raw) => raw,
            Err(err) => return self.fail_turn(err).await,
        };

        self.set_phase(TurnPhase::Extracting);
        let result = match parse_research_output(&raw, self.strategy) {
            Ok(record) => TurnResult::Structured(record),
            Err(failure) => {
                tracing::warn!(kind = failure.kind(), error = %failure, "falling back to raw agent output");
                self.recovery.fallback(&failure, &raw)
            }
        };

        self.set_phase(TurnPhase::Rendering);
        let rendered = render_text(&result);
        self.output.emit(&rendered);
        if self.speaks() {
            self.speak(&compose_speech(&result)).await;
        }

        self.history.append_exchange(&query.text, &rendered);
        tracing::info!(
            structured = result.is_structured(),
            history_len = self.history.len(),
            "turn completed"
        );
        self.set_phase(TurnPhase::AwaitingInput);
        TurnOutcome::Completed(result)
    }

    /// 没有 Agent 输出可降级的失败：提示后跳过，或因输入关闭结束
    async fn fail_turn(&mut self, err: TurnError) -> TurnOutcome {
        match self.recovery.handle(&err) {
            RecoveryAction::Skip { diagnostic } => {
                tracing::warn!(kind = err.kind(), error = %err, "turn skipped");
                self.report(&diagnostic).await;
                self.set_phase(TurnPhase::AwaitingInput);
                TurnOutcome::Skipped(err)
            }
            RecoveryAction::Terminate => {
                tracing::info!("input closed, ending conversation");
                self.set_phase(TurnPhase::Terminated);
                TurnOutcome::Terminated
            }
        }
    }

    fn set_phase(&mut self, phase: TurnPhase) {
        if self.phase != phase {
            tracing::debug!(from = ?self.phase, to = ?phase, "phase transition");
            self.phase = phase;
        }
    }

    fn speaks(&self) -> bool {
        self.channel.kind() == ChannelKind::Voice && self.synthesizer.is_some()
    }

    /// 打印，语音通道同时朗读
    async fn report(&mut self, text: &str) {
        self.output.emit(text);
        if self.speaks() {
            self.speak(text).await;
        }
    }

    async fn speak(&self, text: &str) {
        if let Some(synth) = &self.synthesizer {
            if let Err(e) = synth.speak(text).await {
                tracing::warn!(error = %e, "speech synthesis failed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::LlmResearchAgent;
    use crate::channel::{Query, ScriptedChannel};
    use crate::core::InputFailure;
    use crate::llm::ScriptedLlmClient;
    use crate::output::BufferSink;

    const VALID: &str = r#"{"topic":"Bees","summary":"They pollinate.","sources":["a"],"tools_used":[]}"#;

    fn orchestrator(
        channel: ScriptedChannel,
        replies: Vec<Result<String, String>>,
    ) -> (TurnOrchestrator, BufferSink) {
        let llm = Arc::new(ScriptedLlmClient::new(replies));
        let agent = Arc::new(LlmResearchAgent::new(llm));
        let sink = BufferSink::new();
        let orch = TurnOrchestrator::new(Box::new(channel), agent, ConversationHistory::new())
            .with_output(Box::new(sink.clone()));
        (orch, sink)
    }

    #[tokio::test]
    async fn test_termination_before_agent_call() {
        let (mut orch, sink) = orchestrator(ScriptedChannel::lines([" Exit "]), vec![]);
        assert_eq!(orch.step().await, TurnOutcome::Terminated);
        assert_eq!(orch.phase(), TurnPhase::Terminated);
        assert!(orch.history().is_empty());
        assert_eq!(sink.lines(), vec![FAREWELL]);
        // 终止后不再读取输入
        assert_eq!(orch.step().await, TurnOutcome::Terminated);
    }

    #[tokio::test]
    async fn test_non_token_input_is_forwarded() {
        let (mut orch, _) = orchestrator(
            ScriptedChannel::lines(["exitable"]),
            vec![Ok(VALID.to_string())],
        );
        assert!(matches!(orch.step().await, TurnOutcome::Completed(_)));
        assert_eq!(orch.phase(), TurnPhase::AwaitingInput);
        assert_eq!(orch.history().len(), 2);
    }

    #[tokio::test]
    async fn test_input_failure_skips_without_history() {
        let channel = ScriptedChannel::new(
            ChannelKind::Text,
            vec![Err(InputFailure::Other("empty query".to_string()))],
        );
        let (mut orch, sink) = orchestrator(channel, vec![]);
        let outcome = orch.step().await;
        assert_eq!(
            outcome,
            TurnOutcome::Skipped(TurnError::Input(InputFailure::Other("empty query".to_string())))
        );
        assert!(orch.history().is_empty());
        assert_eq!(sink.lines().len(), 1);
        assert_eq!(orch.phase(), TurnPhase::AwaitingInput);
    }

    #[tokio::test]
    async fn test_agent_failure_skips_without_history() {
        let (mut orch, sink) = orchestrator(
            ScriptedChannel::lines(["q"]),
            vec![Err("connection refused".to_string())],
        );
        let outcome = orch.step().await;
        assert!(matches!(outcome, TurnOutcome::Skipped(TurnError::AgentInvocation(_))));
        assert!(orch.history().is_empty());
        assert!(sink.lines()[0].contains("connection refused"));
    }

    #[tokio::test]
    async fn test_fallback_still_written_to_history() {
        let (mut orch, sink) = orchestrator(
            ScriptedChannel::lines(["q"]),
            vec![Ok("no structure at all".to_string())],
        );
        let outcome = orch.step().await;
        assert_eq!(
            outcome,
            TurnOutcome::Completed(TurnResult::Fallback("no structure at all".to_string()))
        );
        assert_eq!(sink.lines(), vec!["no structure at all"]);
        let history = orch.into_history();
        assert_eq!(history.len(), 2);
        assert_eq!(history.messages()[1].content, "no structure at all");
    }

    #[tokio::test]
    async fn test_run_survives_failures_until_closed() {
        let channel = ScriptedChannel::new(
            ChannelKind::Text,
            vec![
                Ok(Query::text("one")),
                Err(InputFailure::Other("boom".to_string())),
                Ok(Query::text("two")),
                Ok(Query::text("three")),
            ],
        );
        let (mut orch, _) = orchestrator(
            channel,
            vec![
                Ok(VALID.to_string()),
                Err("timeout".to_string()),
                Ok("{ not json".to_string()),
            ],
        );
        orch.run().await;
        assert_eq!(orch.phase(), TurnPhase::Terminated);
        // one -> structured, two -> agent failure, three -> fallback
        assert_eq!(orch.history().len(), 4);
        assert_eq!(orch.history().messages()[2].content, "three");
        assert_eq!(orch.history().messages()[3].content, "{ not json");
    }
}
