//! Line-oriented console over any async reader/writer pair.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::error::BackOfficeError;

pub struct Console<R, W> {
    input: R,
    output: W,
}

impl<R, W> Console<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Next line without its terminator and surrounding whitespace, or
    /// `None` once the input is exhausted.
    pub async fn read_line(&mut self) -> Result<Option<String>, BackOfficeError> {
        let mut line = String::new();
        if self.input.read_line(&mut line).await? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Like [`Console::read_line`], but end of input is an error.
    pub async fn expect_line(&mut self) -> Result<String, BackOfficeError> {
        self.read_line().await?.ok_or(BackOfficeError::EndOfInput)
    }

    pub async fn println(&mut self, line: &str) -> Result<(), BackOfficeError> {
        self.output.write_all(line.as_bytes()).await?;
        self.output.write_all(b"\n").await?;
        self.output.flush().await?;
        Ok(())
    }

    /// Print `text` without a newline and read the answer.
    pub async fn prompt(&mut self, text: &str) -> Result<String, BackOfficeError> {
        self.output.write_all(text.as_bytes()).await?;
        self.output.flush().await?;
        self.expect_line().await
    }

    pub fn into_output(self) -> W {
        self.output
    }
}
