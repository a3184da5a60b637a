use std::sync::Arc;
use std::sync::mpsc;
use std::time::Duration;

use crate::api::{ApiError, PostApi};
use crate::edit::SubmitRequest;
use crate::model::{Post, PostId};

/// A finished submit, reported back to the event loop
#[derive(Debug)]
pub struct SubmitResult {
    pub id: PostId,
    pub result: Result<Post, ApiError>,
}

/// Runs submit requests on background threads and hands the answers back
/// to the UI thread through a channel polled each tick.
pub struct Submitter {
    api: Arc<dyn PostApi>,
    tx: mpsc::Sender<SubmitResult>,
    rx: mpsc::Receiver<SubmitResult>,
}

impl Submitter {
    pub fn new(api: Arc<dyn PostApi>) -> Self {
        let (tx, rx) = mpsc::channel();
        Submitter { api, tx, rx }
    }

    pub fn spawn(&self, request: SubmitRequest) {
        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        std::thread::spawn(move || {
            let result = api.call(&request.url, &request.options);
            let _ = tx.send(SubmitResult {
                id: request.draft.id,
                result,
            });
        });
    }

    /// Non-blocking poll for finished submits
    pub fn poll(&self) -> Vec<SubmitResult> {
        let mut results = Vec::new();
        while let Ok(result) = self.rx.try_recv() {
            results.push(result);
        }
        results
    }

    /// Block until one submit finishes or `timeout` passes
    pub fn wait(&self, timeout: Duration) -> Option<SubmitResult> {
        self.rx.recv_timeout(timeout).ok()
    }
}
