//! 语音协作者的测试替身

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::speech::{RecognitionError, SpeechRecognizer, SpeechSynthesizer};

/// 依次回放预设转写结果；耗尽后报告 ServiceUnavailable
#[derive(Debug, Default)]
pub struct ScriptedRecognizer {
    results: Mutex<VecDeque<Result<String, RecognitionError>>>,
    calibrations: AtomicUsize,
}

impl ScriptedRecognizer {
    pub fn new(results: impl IntoIterator<Item = Result<String, RecognitionError>>) -> Self {
        Self {
            results: Mutex::new(results.into_iter().collect()),
            calibrations: AtomicUsize::new(0),
        }
    }

    pub fn calibrations(&self) -> usize {
        self.calibrations.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SpeechRecognizer for ScriptedRecognizer {
    async fn calibrate(&self, _duration: Duration) -> Result<(), RecognitionError> {
        self.calibrations.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn listen(
        &self,
        _timeout: Duration,
        _phrase_limit: Duration,
    ) -> Result<String, RecognitionError> {
        self.results
            .lock()
            .map_err(|e| RecognitionError::Other(e.to_string()))?
            .pop_front()
            .unwrap_or_else(|| {
                Err(RecognitionError::ServiceUnavailable(
                    "script exhausted".to_string(),
                ))
            })
    }
}

/// 记录所有朗读内容；可共享给测试断言
#[derive(Debug, Clone, Default)]
pub struct RecordingSynthesizer {
    spoken: Arc<Mutex<Vec<String>>>,
    fail: bool,
}

impl RecordingSynthesizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// 每次 speak 都记录后返回错误，用于验证朗读失败不影响本轮
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn spoken(&self) -> Vec<String> {
        self.spoken.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl SpeechSynthesizer for RecordingSynthesizer {
    async fn speak(&self, text: &str) -> Result<(), String> {
        if let Ok(mut spoken) = self.spoken.lock() {
            spoken.push(text.to_string());
        }
        if self.fail {
            return Err("audio device unavailable".to_string());
        }
        Ok(())
    }
}
