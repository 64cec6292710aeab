use std::path::PathBuf;
use std::sync::Arc;

use futures::{Stream, StreamExt};
use iced::Task;
use tracing::{error, info};

use crate::api::{HttpSource, LoaderConfig};
use crate::application::{stage_assets, AssetFetcher, Orchestrator, RetryPolicy};
use crate::domain::AppError;
use crate::ui::LoadingView;
use crate::utils::Labeler;

pub struct LoadingApp {
    view: LoadingView,
}

#[derive(Debug, Clone)]
pub enum Message {
    /// Latest line written to the progress sink
    Status(String),
    /// Every asset is staged; carries the bootstrap entry point
    HandedOff(Result<PathBuf, String>),
    /// A download failed and the sequence stopped
    LoadFailed(String),
}

impl LoadingApp {
    pub fn new(config: Result<LoaderConfig, AppError>) -> (Self, Task<Message>) {
        let mut app = Self {
            view: LoadingView::default(),
        };

        match config.and_then(load_sequence) {
            Ok(stream) => (app, Task::stream(stream)),
            Err(e) => {
                error!("{}", e);
                app.view.failed = true;
                app.view.status_message = e.to_string();
                (app, Task::none())
            }
        }
    }
}

/// Wire the loader to a channel-backed sink and merge the status lines with
/// the final outcome into one message stream that ends with the outcome.
fn load_sequence(config: LoaderConfig) -> Result<impl Stream<Item = Message>, AppError> {
    let urls = config.resolve_assets()?;
    let policy = RetryPolicy::new(config.attempts)?;
    let labeler = Labeler::new(config.labels, config.fallback_label);
    let (tx, rx) = futures::channel::mpsc::unbounded();

    let fetcher = AssetFetcher::new(Arc::new(HttpSource::new()), Arc::new(tx))
        .with_labeler(labeler)
        .with_policy(policy)
        .with_cache_bust(config.cache_bust);
    let orchestrator = Orchestrator::new(fetcher, urls);
    let staging_dir = config.staging_dir;
    let entry = config.bootstrap;

    let outcome = async move {
        let mut ready = None;
        if let Err(e) = orchestrator.run(|assets| ready = Some(assets)).await {
            return Message::LoadFailed(e.to_string());
        }
        let assets = ready.unwrap_or_default();
        Message::HandedOff(
            stage_assets(&staging_dir, &assets, &entry)
                .await
                .map_err(|e| e.to_string()),
        )
    };

    let merged = futures::stream::select(
        rx.map(Step::Status),
        futures::stream::once(outcome).map(Step::Done),
    )
    .boxed();

    // The outcome is held back until every status line has been delivered
    Ok(futures::stream::unfold(
        (merged, None),
        |(mut merged, mut done)| async move {
            loop {
                match merged.next().await {
                    Some(Step::Status(text)) => {
                        return Some((Message::Status(text), (merged, done)))
                    }
                    Some(Step::Done(message)) => done = Some(message),
                    None => return done.take().map(|message| (message, (merged, None))),
                }
            }
        },
    ))
}

enum Step {
    Status(String),
    Done(Message),
}

pub fn update(app: &mut LoadingApp, message: Message) -> Task<Message> {
    match message {
        Message::Status(text) => {
            app.view.status_message = text;
        }
        Message::HandedOff(Ok(entry)) => {
            info!(entry = %entry.display(), "handed off to bootstrap");
            app.view.detail = format!("Ready: {}", entry.display());
        }
        Message::HandedOff(Err(e)) => {
            error!("hand-off failed: {}", e);
            app.view.failed = true;
            app.view.detail = format!("Hand-off failed: {}", e);
        }
        Message::LoadFailed(e) => {
            // The status line already shows the failure; it stays there
            error!("loading stopped: {}", e);
            app.view.failed = true;
        }
    }
    Task::none()
}

pub fn view(app: &LoadingApp) -> iced::Element<'_, Message> {
    app.view.view()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{AssetEntry, TransportKind};
    use crate::application::orchestrator::STARTING_APP;

    fn config(server: &mockito::Server, staging_dir: PathBuf) -> LoaderConfig {
        LoaderConfig {
            base_url: format!("{}/", server.url()),
            assets: vec![AssetEntry::new("main.dart.js")],
            attempts: vec![TransportKind::Streaming],
            staging_dir,
            ..Default::default()
        }
    }

    async fn drive(config: LoaderConfig) -> (LoadingApp, Vec<Message>) {
        let mut app = LoadingApp {
            view: LoadingView::default(),
        };
        let messages: Vec<Message> = load_sequence(config).unwrap().collect().await;
        for message in messages.clone() {
            let _ = update(&mut app, message);
        }
        (app, messages)
    }

    #[tokio::test]
    async fn test_failed_load_freezes_on_failure_line() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/main.dart.js")
            .with_status(404)
            .create_async()
            .await;
        let tmp = tempfile::tempdir().unwrap();

        let (app, messages) = drive(config(&server, tmp.path().join("staged"))).await;

        assert!(matches!(messages.last(), Some(Message::LoadFailed(_))));
        assert!(!messages
            .iter()
            .any(|m| matches!(m, Message::HandedOff(_))));
        assert_eq!(app.view.status_message, "Fetching user interface: 404");
        assert!(app.view.failed);
        assert!(!tmp.path().join("staged").exists());
    }

    #[tokio::test]
    async fn test_successful_load_hands_off_once() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/main.dart.js")
            .with_status(200)
            .with_body("void main() {}")
            .create_async()
            .await;
        let tmp = tempfile::tempdir().unwrap();
        let staging_dir = tmp.path().join("staged");

        let (app, messages) = drive(config(&server, staging_dir.clone())).await;

        let hand_offs: Vec<&Result<PathBuf, String>> = messages
            .iter()
            .filter_map(|m| match m {
                Message::HandedOff(result) => Some(result),
                _ => None,
            })
            .collect();
        assert_eq!(hand_offs.len(), 1);
        assert_eq!(
            hand_offs[0].as_ref().unwrap(),
            &staging_dir.join("flutter_bootstrap.js")
        );
        assert!(matches!(messages.last(), Some(Message::HandedOff(Ok(_)))));
        assert!(messages
            .iter()
            .any(|m| matches!(m, Message::Status(text) if text == STARTING_APP)));

        assert_eq!(app.view.status_message, STARTING_APP);
        assert!(!app.view.failed);
        assert_eq!(
            std::fs::read(staging_dir.join("main.dart.js")).unwrap(),
            b"void main() {}"
        );
    }
}
