//! 输出层：结果渲染（屏幕 / 朗读）与输出目标

pub mod render;
pub mod sink;

pub use render::{compose_speech, render_text, FALLBACK_SPEECH_PREFIX, NO_TOOLS_REMARK};
pub use sink::{BufferSink, OutputSink, StdoutSink};
