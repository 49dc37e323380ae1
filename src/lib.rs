//! Sage - Rust 研究助理对话前端
//!
//! 模块划分：
//! - **agent**: 研究 Agent 调用（system prompt + 历史 + 问题 -> 原始文本）
//! - **channel**: 输入通道（文本控制台 / 语音 / 脚本回放）
//! - **config**: 应用配置加载（TOML + 环境变量）
//! - **core**: 编排器、阶段状态、错误分类与恢复
//! - **llm**: LLM 客户端抽象与实现（OpenAI 兼容 / Ollama / Mock）
//! - **memory**: 进程内对话历史
//! - **observability**: tracing 初始化
//! - **output**: 屏幕 / 朗读渲染与输出目标
//! - **research**: 结构化提取、结构校验、Structured / Fallback 结果
//! - **speech**: 语音识别 / 合成协作者

pub mod agent;
pub mod channel;
pub mod config;
pub mod core;
pub mod llm;
pub mod memory;
pub mod observability;
pub mod output;
pub mod research;
pub mod speech;

pub use crate::core::{OrchestratorBuilder, TurnOrchestrator, TurnOutcome};
pub use research::{ResearchResponse, TurnResult};
