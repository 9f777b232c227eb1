//! Read end of a relayed assistant response.

use super::RelayError;
use bytes::Bytes;
use futures::stream::{Map, Stream, StreamExt};
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::mpsc;
use tokio_util::io::StreamReader;

type ChunkToBytes = fn(Result<String, RelayError>) -> Result<Bytes, RelayError>;

/// Byte-oriented view of a [`ResponseStream`], see [`ResponseStream::into_reader`].
pub type ResponseReader = StreamReader<Map<ResponseStream, ChunkToBytes>, Bytes>;

/// Handle returned by [`ChatRelay::send`](super::ChatRelay::send).
///
/// Each item is one fragment exactly as the model emitted it. `None` means
/// the reply ended cleanly; an `Err` item is the last item and carries the
/// mid-stream failure. Dropping the handle abandons the reply.
pub struct ResponseStream {
    receiver: mpsc::Receiver<Result<String, RelayError>>,
}

impl ResponseStream {
    pub(crate) fn new(receiver: mpsc::Receiver<Result<String, RelayError>>) -> Self {
        Self { receiver }
    }

    /// Wait for the next fragment.
    pub async fn next_chunk(&mut self) -> Option<Result<String, RelayError>> {
        self.receiver.recv().await
    }

    /// Consume the stream and collect all text into a single string.
    pub async fn collect_text(mut self) -> Result<String, RelayError> {
        let mut full_text = String::new();
        while let Some(chunk) = self.next_chunk().await {
            full_text.push_str(&chunk?);
        }
        Ok(full_text)
    }

    /// Convert into an [`AsyncRead`](tokio::io::AsyncRead).
    ///
    /// A mid-stream failure surfaces as an `io::Error` on the read that
    /// follows the last delivered byte.
    pub fn into_reader(self) -> ResponseReader {
        StreamReader::new(self.map(chunk_to_bytes as ChunkToBytes))
    }
}

fn chunk_to_bytes(chunk: Result<String, RelayError>) -> Result<Bytes, RelayError> {
    chunk.map(Bytes::from)
}

impl Stream for ResponseStream {
    type Item = Result<String, RelayError>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.receiver.poll_recv(cx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatbridge_domain::Model;
    use tokio::io::AsyncReadExt;

    async fn stream_of(items: Vec<Result<String, RelayError>>) -> ResponseStream {
        let (tx, rx) = mpsc::channel(items.len().max(1));
        for item in items {
            tx.send(item).await.unwrap();
        }
        ResponseStream::new(rx)
    }

    #[tokio::test]
    async fn test_collect_text_concatenates_chunks() {
        let stream = stream_of(vec![Ok("Hel".into()), Ok("lo".into())]).await;
        assert_eq!(stream.collect_text().await.unwrap(), "Hello");
    }

    #[tokio::test]
    async fn test_collect_text_returns_error() {
        let stream = stream_of(vec![
            Ok("Hel".into()),
            Err(RelayError::Upstream {
                model: Model::Gpt4o,
                message: "reset".into(),
            }),
        ])
        .await;
        let err = stream.collect_text().await.unwrap_err();
        assert!(matches!(err, RelayError::Upstream { .. }));
    }

    #[tokio::test]
    async fn test_reader_yields_bytes_then_error() {
        let stream = stream_of(vec![
            Ok("abc".into()),
            Err(RelayError::Upstream {
                model: Model::Gpt4o,
                message: "reset".into(),
            }),
        ])
        .await;
        let mut reader = stream.into_reader();

        let mut buf = [0u8; 16];
        let n = reader.read(&mut buf).await.unwrap();
        assert_eq!(&buf[..n], b"abc");

        let err = reader.read(&mut buf).await.unwrap_err();
        assert!(err.to_string().contains("gpt-4o failed to respond"));
    }

    #[tokio::test]
    async fn test_reader_honours_small_buffers() {
        let stream = stream_of(vec![Ok("Hello!".into())]).await;
        let mut reader = stream.into_reader();

        let mut buf = [0u8; 4];
        let n = reader.read(&mut buf).await.unwrap();
        assert_eq!(&buf[..n], b"Hell");
        let n = reader.read(&mut buf).await.unwrap();
        assert_eq!(&buf[..n], b"o!");
        assert_eq!(reader.read(&mut buf).await.unwrap(), 0);
    }
}
