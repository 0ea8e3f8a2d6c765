//! Shared test utilities and mock infrastructure.

#![allow(dead_code, unused_imports)]

pub mod mock_fact_server;

use async_trait::async_trait;
use counterfact::counter::{CounterModel, FactError, FactService, FetchSettings};
use counterfact::observation::Animation;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

/// Create a temporary config file with the given contents.
pub fn temp_config(content: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join("config.toml");
    std::fs::write(&config_path, content).expect("Failed to write config");
    (temp_dir, config_path)
}

/// Fetch settings with the default one-second delay and no auto-dismiss.
pub fn settings() -> FetchSettings {
    FetchSettings {
        delay: Duration::from_secs(1),
        auto_dismiss: None,
        animation: Some(Animation::default()),
    }
}

pub fn model(settings: FetchSettings) -> Arc<CounterModel> {
    Arc::new(CounterModel::new(settings))
}

/// One scripted reply from [`ScriptedService`].
#[derive(Debug, Clone)]
pub enum Reply {
    Fact(String),
    Status(u16),
    /// Answer after this long.
    Delayed(Duration, String),
}

/// A [`FactService`] returning scripted replies in order and recording
/// the numbers it was asked about.
#[derive(Default)]
pub struct ScriptedService {
    replies: Mutex<VecDeque<Reply>>,
    requests: Mutex<Vec<i64>>,
    calls: AtomicUsize,
}

impl ScriptedService {
    pub fn new(replies: impl IntoIterator<Item = Reply>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().collect()),
            ..Self::default()
        }
    }

    pub fn requests(&self) -> Vec<i64> {
        self.requests.lock().clone()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FactService for ScriptedService {
    async fn fetch(&self, number: i64) -> Result<String, FactError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().push(number);
        let reply = self.replies.lock().pop_front();
        let url = format!("http://facts.test/{number}");
        match reply {
            Some(Reply::Fact(text)) => Ok(text),
            Some(Reply::Status(status)) => Err(FactError::Status { url, status }),
            Some(Reply::Delayed(after, text)) => {
                tokio::time::sleep(after).await;
                Ok(text)
            }
            None => Err(FactError::EmptyBody { url }),
        }
    }
}
