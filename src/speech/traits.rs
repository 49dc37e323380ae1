//! 语音协作者抽象：识别（STT）与合成（TTS）

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

/// 语音识别失败
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecognitionError {
    #[error("No speech before timeout")]
    Timeout,

    #[error("Speech was unintelligible")]
    Unintelligible,

    #[error("Recognition service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Recognition failed: {0}")]
    Other(String),
}

/// 语音识别：先按环境噪声校准，再在超时与单句时长限制内录音并转写
#[async_trait]
pub trait SpeechRecognizer: Send + Sync {
    async fn calibrate(&self, duration: Duration) -> Result<(), RecognitionError>;

    async fn listen(
        &self,
        timeout: Duration,
        phrase_limit: Duration,
    ) -> Result<String, RecognitionError>;
}

/// 语音合成：阻塞直到播放结束
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    async fn speak(&self, text: &str) -> Result<(), String>;
}
