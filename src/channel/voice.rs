//! 语音通道：校准环境噪声 -> 限时录音 -> 转写
//!
//! 识别服务连续不可用时（如录音程序不存在），下一次录音前按指数退避等待，
//! 避免主循环空转；任何其它结果都会清零退避。

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::channel::{ChannelKind, InputChannel, Query};
use crate::core::InputFailure;
use crate::speech::{RecognitionError, SpeechRecognizer};

/// 录音参数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListenSettings {
    pub calibration: Duration,
    /// 等待开口的最长时间
    pub timeout: Duration,
    /// 单句最长时长
    pub phrase_limit: Duration,
    pub service_retry: ServiceRetry,
}

impl Default for ListenSettings {
    fn default() -> Self {
        Self {
            calibration: Duration::from_millis(500),
            timeout: Duration::from_secs(5),
            phrase_limit: Duration::from_secs(10),
            service_retry: ServiceRetry::default(),
        }
    }
}

/// 识别服务不可用时的退避：base * 2^n，封顶 max
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceRetry {
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for ServiceRetry {
    fn default() -> Self {
        Self {
            base_delay_ms: 1_000,
            max_delay_ms: 8_000,
        }
    }
}

impl ServiceRetry {
    /// attempt 从 0 开始，对应第一次失败之后的等待
    pub fn backoff(&self, attempt: u32) -> Duration {
        let multiplier = 1_u64 << attempt.min(16);
        let delay_ms = self
            .base_delay_ms
            .saturating_mul(multiplier)
            .min(self.max_delay_ms);
        Duration::from_millis(delay_ms)
    }
}

pub struct VoiceChannel {
    recognizer: Arc<dyn SpeechRecognizer>,
    settings: ListenSettings,
    /// 连续 ServiceUnavailable 的次数
    unavailable_streak: u32,
}

impl VoiceChannel {
    pub fn new(recognizer: Arc<dyn SpeechRecognizer>, settings: ListenSettings) -> Self {
        Self {
            recognizer,
            settings,
            unavailable_streak: 0,
        }
    }

    async fn capture(&self) -> Result<Query, InputFailure> {
        self.recognizer.calibrate(self.settings.calibration).await?;
        tracing::info!("Listening...");
        let transcript = self
            .recognizer
            .listen(self.settings.timeout, self.settings.phrase_limit)
            .await?;

        let query = Query::voice(transcript);
        if query.text.is_empty() {
            return Err(InputFailure::UnintelligibleAudio);
        }
        tracing::info!(query = %query.text, "heard");
        Ok(query)
    }
}

impl From<RecognitionError> for InputFailure {
    fn from(err: RecognitionError) -> Self {
        match err {
            RecognitionError::Timeout => InputFailure::Timeout,
            RecognitionError::Unintelligible => InputFailure::UnintelligibleAudio,
            RecognitionError::ServiceUnavailable(detail) => InputFailure::ServiceUnavailable(detail),
            RecognitionError::Other(detail) => InputFailure::Other(detail),
        }
    }
}

#[async_trait]
impl InputChannel for VoiceChannel {
    fn kind(&self) -> ChannelKind {
        ChannelKind::Voice
    }

    async fn acquire(&mut self) -> Result<Query, InputFailure> {
        if self.unavailable_streak > 0 {
            let delay = self
                .settings
                .service_retry
                .backoff(self.unavailable_streak - 1);
            if !delay.is_zero() {
                tracing::debug!(
                    streak = self.unavailable_streak,
                    delay_ms = delay.as_millis() as u64,
                    "speech service unavailable, backing off"
                );
                tokio::time::sleep(delay).await;
            }
        }

        let result = self.capture().await;
        if matches!(result, Err(InputFailure::ServiceUnavailable(_))) {
            self.unavailable_streak = self.unavailable_streak.saturating_add(1);
        } else {
            self.unavailable_streak = 0;
        }
        result
    }
}
