use bytes::{Bytes, BytesMut};
use futures::stream::BoxStream;
use futures::StreamExt;
use reqwest::header::{CACHE_CONTROL, PRAGMA};
use reqwest::{Client, StatusCode};
use thiserror::Error;
use tracing::debug;

use super::models::TransportKind;

/// Display is the bare cause so it can be embedded in a status line.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("{0}")]
    Request(#[from] reqwest::Error),

    #[error("{0}")]
    Status(u16),

    #[error("{0}")]
    Network(String),

    /// An `AssetSource` ended its event stream without `Completed` or `Failed`
    #[error("connection closed before the download completed")]
    Interrupted,
}

/// What a transport reports while a single request is in flight.
///
/// A well-formed stream is `Opened`, any number of `Received`, then exactly
/// one of `Completed` or `Failed`. A stream may also consist of a lone
/// `Failed` when the request never got a usable response.
#[derive(Debug)]
pub enum TransportEvent {
    Opened { total: Option<u64> },
    Received { len: u64 },
    Completed(Bytes),
    Failed(TransportError),
}

/// Both transport variants behind one capability
pub trait AssetSource: Send + Sync {
    fn open(&self, kind: TransportKind, url: &str) -> BoxStream<'static, TransportEvent>;
}

/// Statuses the buffered transport accepts on completion
pub fn buffered_accepts(status: StatusCode) -> bool {
    status == StatusCode::OK || status == StatusCode::PARTIAL_CONTENT
}

#[derive(Debug, Clone, Default)]
pub struct HttpSource {
    client: Client,
}

impl HttpSource {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }
}

impl AssetSource for HttpSource {
    fn open(&self, kind: TransportKind, url: &str) -> BoxStream<'static, TransportEvent> {
        futures::stream::unfold(
            TransferState::Start {
                client: self.client.clone(),
                url: url.to_string(),
                kind,
            },
            |state| async move {
                match state {
                    TransferState::Start { client, url, kind } => {
                        debug!(%url, ?kind, "start fetch");

                        let request = match kind {
                            // Force revalidation against the origin
                            TransportKind::Streaming => client
                                .get(&url)
                                .header(CACHE_CONTROL, "no-cache")
                                .header(PRAGMA, "no-cache"),
                            TransportKind::Buffered => client.get(&url),
                        };

                        let response = match request.send().await {
                            Ok(response) => response,
                            Err(e) => {
                                return Some((
                                    TransportEvent::Failed(e.into()),
                                    TransferState::Finished,
                                ))
                            }
                        };

                        let status = response.status();
                        if kind == TransportKind::Streaming && !status.is_success() {
                            return Some((
                                TransportEvent::Failed(TransportError::Status(status.as_u16())),
                                TransferState::Finished,
                            ));
                        }

                        let total = response.content_length();
                        Some((
                            TransportEvent::Opened { total },
                            TransferState::Receiving {
                                stream: response.bytes_stream().boxed(),
                                kind,
                                status,
                                buffer: BytesMut::new(),
                            },
                        ))
                    }
                    TransferState::Receiving {
                        mut stream,
                        kind,
                        status,
                        mut buffer,
                    } => match stream.next().await {
                        Some(Ok(chunk)) => {
                            buffer.extend_from_slice(&chunk);
                            Some((
                                TransportEvent::Received {
                                    len: chunk.len() as u64,
                                },
                                TransferState::Receiving {
                                    stream,
                                    kind,
                                    status,
                                    buffer,
                                },
                            ))
                        }
                        Some(Err(e)) => {
                            Some((TransportEvent::Failed(e.into()), TransferState::Finished))
                        }
                        None => {
                            // The buffered variant only judges the status once the body is in
                            if kind == TransportKind::Buffered && !buffered_accepts(status) {
                                return Some((
                                    TransportEvent::Failed(TransportError::Status(
                                        status.as_u16(),
                                    )),
                                    TransferState::Finished,
                                ));
                            }
                            Some((
                                TransportEvent::Completed(buffer.freeze()),
                                TransferState::Finished,
                            ))
                        }
                    },
                    TransferState::Finished => None,
                }
            },
        )
        .boxed()
    }
}

enum TransferState {
    Start {
        client: Client,
        url: String,
        kind: TransportKind,
    },
    Receiving {
        stream: BoxStream<'static, reqwest::Result<Bytes>>,
        kind: TransportKind,
        status: StatusCode,
        buffer: BytesMut,
    },
    Finished,
}
