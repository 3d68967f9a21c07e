// src/notify/recorder.rs
use anyhow::Result;
use std::sync::Mutex;

use super::{Notice, NoticeLevel, Notifier};

/// Keeps every notice in memory, oldest first.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    seen: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.seen.lock().expect("recorder mutex poisoned").clone()
    }

    pub fn messages(&self) -> Vec<String> {
        self.notices().into_iter().map(|n| n.message).collect()
    }

    pub fn count(&self, level: NoticeLevel) -> usize {
        self.seen
            .lock()
            .expect("recorder mutex poisoned")
            .iter()
            .filter(|n| n.level == level)
            .count()
    }

    pub fn len(&self) -> usize {
        self.seen.lock().expect("recorder mutex poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait::async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, notice: &Notice) -> Result<()> {
        self.seen
            .lock()
            .expect("recorder mutex poisoned")
            .push(notice.clone());
        Ok(())
    }
}
