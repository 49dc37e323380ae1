//! 输出目标：stdout 或内存缓冲（测试用）

use std::sync::{Arc, Mutex};

/// 屏幕输出
pub trait OutputSink: Send {
    fn emit(&mut self, text: &str);
}

/// 直接打印到标准输出
#[derive(Debug, Default)]
pub struct StdoutSink;

impl OutputSink for StdoutSink {
    fn emit(&mut self, text: &str) {
        println!("{text}");
    }
}

/// 内存缓冲；clone 后共享同一份内容
#[derive(Debug, Clone, Default)]
pub struct BufferSink {
    lines: Arc<Mutex<Vec<String>>>,
}

impl BufferSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().map(|l| l.clone()).unwrap_or_default()
    }
}

impl OutputSink for BufferSink {
    fn emit(&mut self, text: &str) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.push(text.to_string());
        }
    }
}
