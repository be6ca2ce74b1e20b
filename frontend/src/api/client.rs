use futures::future::{select, Either};
use reqwest::{Client, RequestBuilder, Response};
use std::{future::Future, time::Duration};

use crate::{api::types::ApiError, config};

#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: Option<String>,
    timeout: Option<Duration>,
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new()
    }
}

impl ApiClient {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            base_url: None,
            timeout: None,
        }
    }

    pub fn new_with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: Some(base_url.into()),
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub(crate) fn http_client(&self) -> &Client {
        &self.client
    }

    pub(crate) async fn resolved_base_url(&self) -> String {
        let base = match &self.base_url {
            Some(base) => base.clone(),
            None => config::await_api_base_url().await,
        };
        base.trim_end_matches('/').to_string()
    }

    async fn resolved_timeout(&self) -> Duration {
        match self.timeout {
            Some(timeout) => timeout,
            None => config::await_auth_timeout().await,
        }
    }

    /// Sends the request and hands the response to `read`, giving up with a
    /// `TIMEOUT` error once the configured deadline passes. The deadline
    /// covers reading the body as well as the headers.
    pub(crate) async fn call<T, F, Fut>(&self, request: RequestBuilder, read: F) -> Result<T, ApiError>
    where
        F: FnOnce(Response) -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        let timeout = self.resolved_timeout().await;
        call_with_timeout(request, timeout, read).await
    }
}

fn timeout_error(timeout: Duration) -> ApiError {
    ApiError::timeout(format!(
        "The server did not respond within {} seconds",
        timeout.as_secs_f32()
    ))
}

fn send_error(err: reqwest::Error) -> ApiError {
    ApiError::request_failed(format!("Request failed: {}", err))
}

/// Maps a failed body read. Native clients report the request deadline
/// expiring mid-body as a timeout.
pub(crate) fn read_error(err: reqwest::Error, context: &str) -> ApiError {
    if err.is_timeout() {
        ApiError::timeout("The server stopped responding")
    } else {
        ApiError::unknown(format!("{}: {}", context, err))
    }
}

/// Resolves to the call's result unless `deadline` fires first.
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
pub(crate) async fn race_deadline<T, C, D>(call: C, deadline: D, timeout: Duration) -> Result<T, ApiError>
where
    C: Future<Output = Result<T, ApiError>>,
    D: Future<Output = ()>,
{
    futures::pin_mut!(call, deadline);
    match select(call, deadline).await {
        Either::Left((result, _)) => result,
        Either::Right(_) => Err(timeout_error(timeout)),
    }
}

#[cfg(not(target_arch = "wasm32"))]
async fn call_with_timeout<T, F, Fut>(
    request: RequestBuilder,
    timeout: Duration,
    read: F,
) -> Result<T, ApiError>
where
    F: FnOnce(Response) -> Fut,
    Fut: Future<Output = Result<T, ApiError>>,
{
    let response = request.timeout(timeout).send().await.map_err(|err| {
        if err.is_timeout() {
            timeout_error(timeout)
        } else {
            send_error(err)
        }
    })?;
    read(response).await
}

#[cfg(target_arch = "wasm32")]
async fn call_with_timeout<T, F, Fut>(
    request: RequestBuilder,
    timeout: Duration,
    read: F,
) -> Result<T, ApiError>
where
    F: FnOnce(Response) -> Fut,
    Fut: Future<Output = Result<T, ApiError>>,
{
    let call = async move {
        let response = request.send().await.map_err(send_error)?;
        read(response).await
    };
    race_deadline(call, gloo_timers::future::sleep(timeout), timeout).await
}
