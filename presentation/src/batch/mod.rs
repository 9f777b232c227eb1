//! Line-oriented batch mode
//!
//! Reads one message per input line, relays it, and copies each reply to the
//! output as it streams. The first failure ends the run; its class decides
//! the process exit code.

use chatbridge_application::{ChatRelay, LlmGateway, RelayError};
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Errors that end a batch run
#[derive(Error, Debug)]
pub enum BatchError {
    #[error("Failed to read input: {0}")]
    Input(#[source] std::io::Error),

    #[error("Failed to chat: {0}")]
    Chat(#[from] RelayError),

    #[error("Failed to write output: {0}")]
    Output(#[source] std::io::Error),
}

impl BatchError {
    /// Process exit status for this failure class
    pub fn exit_code(&self) -> i32 {
        match self {
            BatchError::Chat(_) => 1,
            BatchError::Input(_) => 2,
            BatchError::Output(_) => 3,
        }
    }
}

/// Drives a [`ChatRelay`] from a line-oriented input
pub struct BatchRunner<G: LlmGateway + 'static> {
    relay: ChatRelay<G>,
}

impl<G: LlmGateway + 'static> BatchRunner<G> {
    pub fn new(relay: ChatRelay<G>) -> Self {
        Self { relay }
    }

    pub fn relay(&self) -> &ChatRelay<G> {
        &self.relay
    }

    /// Relay every line of `input` until end of input.
    ///
    /// Returns the number of messages relayed.
    pub async fn run<R, W>(
        &self,
        cancel: &CancellationToken,
        input: R,
        mut output: W,
    ) -> Result<usize, BatchError>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = input.lines();
        let mut turns = 0;

        while let Some(line) = lines.next_line().await.map_err(BatchError::Input)? {
            let mut reply = self.relay.send(cancel, &line).await?;
            while let Some(chunk) = reply.next_chunk().await {
                output
                    .write_all(chunk?.as_bytes())
                    .await
                    .map_err(BatchError::Output)?;
                output.flush().await.map_err(BatchError::Output)?;
            }
            turns += 1;
            debug!(turns, "Reply copied");
        }

        info!(turns, "Input finished");
        Ok(turns)
    }
}
