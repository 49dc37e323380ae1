//! 基于外部命令的语音适配器
//!
//! CommandRecognizer：运行外部录音+转写程序，stdout 为转写文本，
//! 附加参数 `--calibrate-ms N --timeout-ms N --phrase-limit-ms N`（均为毫秒）。
//! 退出码约定：0 成功，2 听不清，3 服务不可用，4 等待说话超时，其它为 Other。
//! CommandSynthesizer：把文本写入外部程序（如 espeak）的 stdin 并等待其退出。

use std::process::Stdio;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::speech::{RecognitionError, SpeechRecognizer, SpeechSynthesizer};

const EXIT_UNINTELLIGIBLE: i32 = 2;
const EXIT_SERVICE_UNAVAILABLE: i32 = 3;
const EXIT_WAIT_TIMEOUT: i32 = 4;

/// 把 ["prog", "arg", ...] 拆成程序名与参数
fn split_command(command: Vec<String>) -> Option<(String, Vec<String>)> {
    let mut parts = command.into_iter();
    let program = parts.next().filter(|p| !p.trim().is_empty())?;
    Some((program, parts.collect()))
}

/// 外部命令语音识别
pub struct CommandRecognizer {
    program: String,
    args: Vec<String>,
    /// 最近一次 calibrate 的时长（毫秒），下一次 listen 时传给外部程序
    calibration_ms: AtomicU64,
}

impl CommandRecognizer {
    /// command 为空时返回 None
    pub fn new(command: Vec<String>) -> Option<Self> {
        let (program, args) = split_command(command)?;
        Some(Self {
            program,
            args,
            calibration_ms: AtomicU64::new(0),
        })
    }
}

#[async_trait]
impl SpeechRecognizer for CommandRecognizer {
    async fn calibrate(&self, duration: Duration) -> Result<(), RecognitionError> {
        self.calibration_ms
            .store(duration.as_millis() as u64, Ordering::Relaxed);
        Ok(())
    }

    async fn listen(
        &self,
        timeout: Duration,
        phrase_limit: Duration,
    ) -> Result<String, RecognitionError> {
        let calibration_ms = self.calibration_ms.load(Ordering::Relaxed);
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .arg("--calibrate-ms")
            .arg(calibration_ms.to_string())
            .arg("--timeout-ms")
            .arg(timeout.as_millis().to_string())
            .arg("--phrase-limit-ms")
            .arg(phrase_limit.as_millis().to_string())
            .stdin(Stdio::null())
            .kill_on_drop(true);

        tracing::debug!(program = %self.program, "recognizer listen");

        let bound = timeout + phrase_limit + Duration::from_millis(calibration_ms);
        let output = tokio::time::timeout(bound, cmd.output())
            .await
            .map_err(|_| RecognitionError::Timeout)?
            .map_err(|e| RecognitionError::ServiceUnavailable(e.to_string()))?;

        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        match output.status.code() {
            Some(0) => {
                let text = String::from_utf8_lossy(&output.stdout).trim().to_string();
                if text.is_empty() {
                    Err(RecognitionError::Unintelligible)
                } else {
                    Ok(text)
                }
            }
            Some(EXIT_UNINTELLIGIBLE) => Err(RecognitionError::Unintelligible),
            Some(EXIT_SERVICE_UNAVAILABLE) => Err(RecognitionError::ServiceUnavailable(stderr)),
            Some(EXIT_WAIT_TIMEOUT) => Err(RecognitionError::Timeout),
            _ => Err(RecognitionError::Other(format!(
                "Exit {:?}\nstderr: {}",
                output.status, stderr
            ))),
        }
    }
}

/// 外部命令语音合成
pub struct CommandSynthesizer {
    program: String,
    args: Vec<String>,
}

impl CommandSynthesizer {
    pub fn new(command: Vec<String>) -> Option<Self> {
        let (program, args) = split_command(command)?;
        Some(Self { program, args })
    }
}

#[async_trait]
impl SpeechSynthesizer for CommandSynthesizer {
    async fn speak(&self, text: &str) -> Result<(), String> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .spawn()
            .map_err(|e| format!("Spawn failed: {}", e))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(text.as_bytes())
                .await
                .map_err(|e| format!("Write failed: {}", e))?;
        }

        let status = child
            .wait()
            .await
            .map_err(|e| format!("Wait failed: {}", e))?;
        if !status.success() {
            return Err(format!("Exit {:?}", status));
        }
        Ok(())
    }
}
