//! 应用配置：从 config/default.toml 与环境变量加载
//!
//! 加载顺序：先读 TOML 文件，再用环境变量 `SAGE__*` 覆盖（双下划线表示嵌套，如 `SAGE__LLM__PROVIDER=openai`）。

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::channel::{ChannelKind, ListenSettings, ServiceRetry};
use crate::llm::OLLAMA_DEFAULT_MODEL;
use crate::research::ExtractionStrategy;

/// 应用配置根（对应 config/default.toml 的顶层）
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub app: AppSection,
    pub llm: LlmSection,
    pub voice: VoiceSection,
    pub extraction: ExtractionSection,
}

/// [app] 段：应用名、输入通道、提示符
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppSection {
    pub name: Option<String>,
    pub channel: ChannelKind,
    /// 文本通道的输入提示符
    pub prompt: String,
}

impl Default for AppSection {
    fn default() -> Self {
        Self {
            name: None,
            channel: ChannelKind::Text,
            prompt: default_prompt(),
        }
    }
}

fn default_prompt() -> String {
    "let start chatting: ".to_string()
}

/// [llm] 段：后端选择、模型与温度
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmSection {
    /// 后端：ollama / openai / mock
    pub provider: String,
    pub model: String,
    pub base_url: Option<String>,
    pub temperature: f32,
}

impl Default for LlmSection {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: OLLAMA_DEFAULT_MODEL.to_string(),
            base_url: None,
            temperature: 0.0,
        }
    }
}

fn default_provider() -> String {
    "ollama".to_string()
}

/// [voice] 段：录音参数与外部语音命令
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct VoiceSection {
    pub listen_timeout_secs: u64,
    pub phrase_limit_secs: u64,
    pub ambient_calibration_ms: u64,
    /// 识别服务连续不可用时的退避起点与上限
    pub service_retry_base_ms: u64,
    pub service_retry_max_ms: u64,
    /// 录音 + 转写程序，如 ["python3", "scripts/listen.py"]
    pub recognizer_command: Vec<String>,
    /// 朗读程序，从 stdin 读文本，如 ["espeak"]
    pub synthesizer_command: Vec<String>,
}

impl Default for VoiceSection {
    fn default() -> Self {
        Self {
            listen_timeout_secs: 5,
            phrase_limit_secs: 10,
            ambient_calibration_ms: 500,
            service_retry_base_ms: 1_000,
            service_retry_max_ms: 8_000,
            recognizer_command: Vec::new(),
            synthesizer_command: vec!["espeak".to_string()],
        }
    }
}

impl VoiceSection {
    pub fn listen_settings(&self) -> ListenSettings {
        ListenSettings {
            calibration: Duration::from_millis(self.ambient_calibration_ms),
            timeout: Duration::from_secs(self.listen_timeout_secs),
            phrase_limit: Duration::from_secs(self.phrase_limit_secs),
            service_retry: ServiceRetry {
                base_delay_ms: self.service_retry_base_ms,
                max_delay_ms: self.service_retry_max_ms,
            },
        }
    }
}

/// [extraction] 段：JSON 片段提取策略
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ExtractionSection {
    pub strategy: ExtractionStrategy,
}

/// 从 config 目录加载配置，环境变量 SAGE__* 可覆盖
///
/// 1. 按顺序查找 config/default.toml、../config/default.toml、default.toml，找到则作为第一源
/// 2. 若传入 config_path 且文件存在，则追加该文件（可覆盖前面的键）
/// 3. 最后叠加环境变量 SAGE__*（双下划线表示嵌套键）
pub fn load_config(config_path: Option<PathBuf>) -> Result<AppConfig, config::ConfigError> {
    let mut builder = config::Config::builder();

    let default_names = ["config/default", "../config/default", "default"];
    for name in default_names {
        let path = format!("{}.toml", name);
        if std::path::Path::new(&path).exists() {
            builder = builder.add_source(config::File::with_name(name).required(false));
            break;
        }
    }

    if let Some(ref path) = config_path {
        if path.exists() {
            builder = builder.add_source(config::File::from(path.clone()).required(false));
        }
    }

    builder = builder.add_source(
        config::Environment::with_prefix("SAGE")
            .separator("__")
            .try_parsing(true),
    );

    let c = builder.build()?;
    c.try_deserialize()
}
