//! 语音层：识别 / 合成协作者抽象、外部命令适配器与测试替身

pub mod command;
pub mod mock;
pub mod traits;

pub use command::{CommandRecognizer, CommandSynthesizer};
pub use mock::{RecordingSynthesizer, ScriptedRecognizer};
pub use traits::{RecognitionError, SpeechRecognizer, SpeechSynthesizer};
