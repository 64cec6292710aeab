use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use bytes::Bytes;
use futures::stream::BoxStream;
use futures::StreamExt;

use super::progress::ProgressSink;
use crate::api::{AssetSource, TransportError, TransportEvent, TransportKind};
use crate::domain::ProgressUpdate;

/// Records every write so tests can inspect the whole status history.
#[derive(Default)]
pub struct RecordingSink {
    lines: Mutex<Vec<String>>,
    updates: Mutex<Vec<ProgressUpdate>>,
}

impl RecordingSink {
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }

    pub fn updates(&self) -> Vec<ProgressUpdate> {
        self.updates.lock().unwrap().clone()
    }
}

impl ProgressSink for RecordingSink {
    fn show(&self, text: &str) {
        self.lines.lock().unwrap().push(text.to_string());
    }

    fn progress(&self, update: &ProgressUpdate) {
        self.updates.lock().unwrap().push(update.clone());
        self.show(&update.message);
    }
}

/// Plays back one prepared event script per `open` call and remembers the
/// requests it saw.
#[derive(Default)]
pub struct ScriptedSource {
    scripts: Mutex<VecDeque<Vec<TransportEvent>>>,
    calls: Mutex<Vec<(TransportKind, String)>>,
}

impl ScriptedSource {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn push(&self, script: Vec<TransportEvent>) {
        self.scripts.lock().unwrap().push_back(script);
    }

    pub fn calls(&self) -> Vec<(TransportKind, String)> {
        self.calls.lock().unwrap().clone()
    }
}

impl AssetSource for ScriptedSource {
    fn open(&self, kind: TransportKind, url: &str) -> BoxStream<'static, TransportEvent> {
        self.calls.lock().unwrap().push((kind, url.to_string()));
        let script = self
            .scripts
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| vec![failed(TransportError::Network("no script".into()))]);
        futures::stream::iter(script).boxed()
    }
}

/// Opened, one `Received` per chunk, then `Completed` with the joined payload.
pub fn success(chunks: &[&[u8]], total: Option<u64>) -> Vec<TransportEvent> {
    let mut events = vec![TransportEvent::Opened { total }];
    let mut payload = Vec::new();
    for chunk in chunks {
        events.push(TransportEvent::Received {
            len: chunk.len() as u64,
        });
        payload.extend_from_slice(chunk);
    }
    events.push(TransportEvent::Completed(Bytes::from(payload)));
    events
}

pub fn failed(err: TransportError) -> TransportEvent {
    TransportEvent::Failed(err)
}
