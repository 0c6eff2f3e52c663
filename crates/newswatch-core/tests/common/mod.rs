//! In-memory collaborators for exercising the engine and command handlers.

#![allow(dead_code)]

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use newswatch_core::{
    default_filter_keywords, Article, ArticleSource, ChatId, Engine, EngineConfig, FetchError,
    Notifier, SendError, StateStore, StoreError,
};

pub const DESTINATION: &str = "-100777";

#[derive(Default)]
pub struct FakeSource {
    latest: Mutex<Option<Article>>,
    fail: AtomicBool,
    calls: AtomicUsize,
}

impl FakeSource {
    pub fn publish(&self, id: &str, title: &str) {
        *self.latest.lock().unwrap() = Some(Article::new(
            id,
            Some(title.to_string()),
            Some(format!("https://academy.example/{id}")),
        ));
    }

    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ArticleSource for FakeSource {
    async fn fetch_latest(&self) -> Result<Article, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(FetchError::Transport("connection refused".to_string()));
        }
        self.latest.lock().unwrap().clone().ok_or(FetchError::Empty)
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<(ChatId, String)>>,
    attempts: AtomicUsize,
    fail: AtomicBool,
}

impl RecordingNotifier {
    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    pub fn sent(&self) -> Vec<(ChatId, String)> {
        self.sent.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    async fn send(&self, chat: &ChatId, text: &str) -> Result<(), SendError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(SendError::Rejected {
                code: 400,
                description: "Bad Request: chat not found".to_string(),
            });
        }
        self.sent
            .lock()
            .unwrap()
            .push((chat.clone(), text.to_string()));
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryStore {
    last_seen: Mutex<Option<String>>,
    keywords: Mutex<Option<BTreeSet<String>>>,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    pub fn with_state(last_seen: Option<&str>, keywords: &[&str]) -> Self {
        let store = Self::default();
        *store.last_seen.lock().unwrap() = last_seen.map(str::to_string);
        *store.keywords.lock().unwrap() = Some(keywords.iter().map(|k| (*k).to_string()).collect());
        store
    }

    /// Marker set, filter record never written.
    pub fn with_last_seen(last_seen: &str) -> Self {
        let store = Self::default();
        *store.last_seen.lock().unwrap() = Some(last_seen.to_string());
        store
    }

    pub fn set_failing_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn last_seen(&self) -> Option<String> {
        self.last_seen.lock().unwrap().clone()
    }

    pub fn keywords(&self) -> Option<BTreeSet<String>> {
        self.keywords.lock().unwrap().clone()
    }

    fn check_writable(&self) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Io {
                path: "memory".to_string(),
                source: std::io::Error::other("disk full"),
            });
        }
        Ok(())
    }
}

impl StateStore for MemoryStore {
    fn read_last_seen_id(&self) -> Result<Option<String>, StoreError> {
        Ok(self.last_seen())
    }

    fn write_last_seen_id(&self, id: &str) -> Result<(), StoreError> {
        self.check_writable()?;
        *self.last_seen.lock().unwrap() = Some(id.to_string());
        Ok(())
    }

    fn clear_last_seen_id(&self) -> Result<(), StoreError> {
        self.check_writable()?;
        self.last_seen
            .lock()
            .unwrap()
            .take()
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }

    fn read_filter_keywords(&self) -> Result<BTreeSet<String>, StoreError> {
        let mut guard = self.keywords.lock().unwrap();
        Ok(guard.get_or_insert_with(default_filter_keywords).clone())
    }

    fn write_filter_keywords(&self, keywords: &BTreeSet<String>) -> Result<(), StoreError> {
        self.check_writable()?;
        *self.keywords.lock().unwrap() = Some(keywords.clone());
        Ok(())
    }
}

pub struct Harness {
    pub source: Arc<FakeSource>,
    pub notifier: Arc<RecordingNotifier>,
    pub store: Arc<MemoryStore>,
    pub engine: Engine<Arc<FakeSource>, Arc<RecordingNotifier>, Arc<MemoryStore>>,
}

pub fn harness(store: MemoryStore) -> Harness {
    let source = Arc::new(FakeSource::default());
    let notifier = Arc::new(RecordingNotifier::default());
    let store = Arc::new(store);
    let engine = Engine::new(
        Arc::clone(&source),
        Arc::clone(&notifier),
        Arc::clone(&store),
        EngineConfig::new(ChatId::new(DESTINATION)),
    );
    Harness {
        source,
        notifier,
        store,
        engine,
    }
}
