// Scripted JsonFetcher for unit tests.

use crate::error::AqiError;
use crate::http::fetcher::JsonFetcher;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

#[derive(Clone, Default)]
pub(crate) struct FakeFetcher {
    responses: Arc<Mutex<VecDeque<Result<serde_json::Value, AqiError>>>>,
    requests: Arc<Mutex<Vec<String>>>,
}

impl FakeFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_json(&self, value: serde_json::Value) {
        self.responses.lock().unwrap().push_back(Ok(value));
    }

    pub fn push_error(&self, error: AqiError) {
        self.responses.lock().unwrap().push_back(Err(error));
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

impl JsonFetcher for FakeFetcher {
    async fn get_json(&self, url: &str) -> Result<serde_json::Value, AqiError> {
        self.requests.lock().unwrap().push(url.to_string());
        let next = self.responses.lock().unwrap().pop_front();
        next.unwrap_or_else(|| panic!("no scripted response for {}", url))
    }
}
