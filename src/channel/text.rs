//! 文本通道：打印提示符，读取一行

use async_trait::async_trait;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, Stdin, Stdout};

use crate::channel::{ChannelKind, InputChannel, Query};
use crate::core::InputFailure;

/// 控制台文本输入；reader / writer 可替换，便于测试
pub struct TextChannel<R, W> {
    reader: R,
    writer: W,
    prompt: String,
}

impl TextChannel<BufReader<Stdin>, Stdout> {
    pub fn stdin(prompt: impl Into<String>) -> Self {
        Self::new(BufReader::new(tokio::io::stdin()), tokio::io::stdout(), prompt)
    }
}

impl<R, W> TextChannel<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(reader: R, writer: W, prompt: impl Into<String>) -> Self {
        Self {
            reader,
            writer,
            prompt: prompt.into(),
        }
    }

    pub fn into_writer(self) -> W {
        self.writer
    }

    async fn show_prompt(&mut self) -> std::io::Result<()> {
        self.writer.write_all(self.prompt.as_bytes()).await?;
        self.writer.flush().await
    }
}

#[async_trait]
impl<R, W> InputChannel for TextChannel<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    fn kind(&self) -> ChannelKind {
        ChannelKind::Text
    }

    async fn acquire(&mut self) -> Result<Query, InputFailure> {
        self.show_prompt()
            .await
            .map_err(|e| InputFailure::Other(e.to_string()))?;

        let mut line = String::new();
        let read = self
            .reader
            .read_line(&mut line)
            .await
            .map_err(|e| InputFailure::Other(e.to_string()))?;
        if read == 0 {
            return Err(InputFailure::Closed);
        }

        let query = Query::text(line);
        if query.text.is_empty() {
            return Err(InputFailure::Other("empty query".to_string()));
        }
        Ok(query)
    }
}
