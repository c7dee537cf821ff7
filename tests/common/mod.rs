// Shared helpers for the integration tests. Not every test binary uses all of them.
#![allow(dead_code)]

use std::{
    collections::VecDeque,
    sync::{Mutex, MutexGuard},
    time::Duration,
};

use async_trait::async_trait;
use brewscout::{
    coffee::http::{ApiRequest, ApiResponse, Transport},
    config::{ClientConfig, RetryPolicy},
    error::InvokeError,
    types::ShopRecord,
};
use reqwest::{Method, StatusCode};

/// What the scripted transport does with one request.
#[derive(Debug, Clone)]
pub enum Step {
    Respond(u16, String),
    /// Never answers, so only the invoker's bound ends the call.
    Hang,
    NetworkError(String),
}

pub fn respond(status: u16, body: impl Into<String>) -> Step {
    Step::Respond(status, body.into())
}

pub fn token_body(token: &str) -> Step {
    respond(200, format!(r#"{{"token":"{}"}}"#, token))
}

pub fn shops_body(shops: &[ShopRecord]) -> Step {
    respond(200, serde_json::to_string(shops).unwrap())
}

/// In-memory [`Transport`] answering token (`POST`) and shop (`GET`) requests
/// from two queues and recording every request it receives.
#[derive(Default)]
pub struct ScriptedTransport {
    token_steps: Mutex<VecDeque<Step>>,
    shop_steps: Mutex<VecDeque<Step>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_token(self, step: Step) -> Self {
        self.token_steps.lock().unwrap().push_back(step);
        self
    }

    pub fn on_shops(self, step: Step) -> Self {
        self.shop_steps.lock().unwrap().push_back(step);
        self
    }

    pub fn requests(&self) -> MutexGuard<'_, Vec<ApiRequest>> {
        self.requests.lock().unwrap()
    }

    pub fn call_count(&self) -> usize {
        self.requests().len()
    }

    pub fn token_calls(&self) -> usize {
        self.requests()
            .iter()
            .filter(|r| r.method == Method::POST)
            .count()
    }

    pub fn shop_calls(&self) -> usize {
        self.requests()
            .iter()
            .filter(|r| r.method == Method::GET)
            .count()
    }

    pub fn shop_urls(&self) -> Vec<String> {
        self.requests()
            .iter()
            .filter(|r| r.method == Method::GET)
            .map(|r| r.url.clone())
            .collect()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, InvokeError> {
        let queue = if request.method == Method::POST {
            &self.token_steps
        } else {
            &self.shop_steps
        };
        self.requests.lock().unwrap().push(request);

        let step = queue
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| respond(500, "unscripted request"));

        match step {
            Step::Respond(status, body) => Ok(ApiResponse::new(
                StatusCode::from_u16(status).unwrap(),
                body,
            )),
            Step::Hang => std::future::pending().await,
            Step::NetworkError(message) => Err(InvokeError::Network(message)),
        }
    }
}

pub fn shop(name: &str, x: &str, y: &str) -> ShopRecord {
    ShopRecord {
        name: name.to_string(),
        x: x.to_string(),
        y: y.to_string(),
    }
}

/// Default endpoints, timeout and backoff with the default retry budgets.
pub fn test_config() -> ClientConfig {
    ClientConfig::default()
}

pub fn config_with(retry: RetryPolicy) -> ClientConfig {
    ClientConfig::default().with_retry(retry)
}

pub const BACKOFF: Duration = Duration::from_secs(5);
