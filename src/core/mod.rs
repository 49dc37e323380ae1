//! 核心编排层：错误与恢复、阶段状态、编排器及其构建

pub mod builder;
pub mod error;
pub mod orchestrator;
pub mod recovery;
pub mod state;

pub use builder::{create_llm_from_config, OrchestratorBuilder};
pub use error::{
    ExtractionFailure, InputFailure, ParseFailure, RecoveryAction, TurnError, ValidationFailure,
};
pub use orchestrator::{TurnOrchestrator, TurnOutcome, FAREWELL};
pub use recovery::RecoveryEngine;
pub use state::{is_termination, TurnPhase, TERMINATION_TOKENS};
