//! Sends requests and captures their responses.
//!
//! # Design
//! `RequestExecutor` pairs a `ClientConfig` with the `ConnectionManager`
//! that owns the reusable client. `execute` takes `&mut self` and returns
//! the capture by value, so one instance runs one request at a time and
//! callers never read a stale response left over from an earlier call.
//! Each call is a single attempt: transport and parse failures are returned
//! as they happened.

use serde::Serialize;
use tracing::info;

use crate::config::{ClientConfig, CloseMode};
use crate::connection::{header_map, ConnectionManager};
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse, RequestBody};
use crate::template::has_placeholder;

#[derive(Debug)]
pub struct RequestExecutor {
    config: ClientConfig,
    connection: ConnectionManager,
}

impl Default for RequestExecutor {
    fn default() -> Self {
        Self::new(ClientConfig::default())
    }
}

impl RequestExecutor {
    pub fn new(config: ClientConfig) -> Self {
        let connection = ConnectionManager::new(&config);
        Self { config, connection }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn is_connected(&self) -> bool {
        self.connection.is_open()
    }

    /// Release the connection context. Never fails.
    pub fn close(&mut self) {
        self.connection.close();
    }

    /// Send `request` once and capture its status and JSON body.
    pub async fn execute(&mut self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        if request.url.trim().is_empty() {
            return Err(ApiError::Configuration("request URL is empty".to_string()));
        }
        if has_placeholder(&request.url) {
            return Err(ApiError::Configuration(format!(
                "request URL has unresolved placeholders: {}",
                request.url
            )));
        }

        log_request(&request);

        let mut headers = self.config.base_headers();
        headers.extend(request.headers.iter().cloned());
        let headers = header_map(&headers)?;

        let method = request.method;
        let client = self.connection.ensure_connection()?;
        let builder = client.request(method.into(), &request.url).headers(headers);
        let builder = match &request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(body) => builder.json(body),
            RequestBody::Form(pairs) => builder.form(pairs),
        };

        let result = dispatch(builder).await;

        if self.config.close_mode == CloseMode::EveryCall {
            info!("Closing connection from HTTP call: {method}");
            self.connection.close();
        }

        let response = result?;
        info!(status = response.status, "Response body: {}", response.body);
        Ok(response)
    }

    pub async fn get(&mut self, url: &str, headers: &[(&str, &str)]) -> Result<HttpResponse, ApiError> {
        self.execute(HttpRequest::get(url).with_headers(headers.iter().copied()))
            .await
    }

    pub async fn post<B: Serialize + ?Sized>(
        &mut self,
        url: &str,
        body: &B,
        headers: &[(&str, &str)],
    ) -> Result<HttpResponse, ApiError> {
        let request = HttpRequest::post(url, body)?.with_headers(headers.iter().copied());
        self.execute(request).await
    }

    pub async fn post_form(
        &mut self,
        url: &str,
        pairs: &[(&str, &str)],
        headers: &[(&str, &str)],
    ) -> Result<HttpResponse, ApiError> {
        let request = HttpRequest::form_post(url, pairs.iter().copied()).with_headers(headers.iter().copied());
        self.execute(request).await
    }

    pub async fn put<B: Serialize + ?Sized>(
        &mut self,
        url: &str,
        body: &B,
        headers: &[(&str, &str)],
    ) -> Result<HttpResponse, ApiError> {
        let request = HttpRequest::put(url, body)?.with_headers(headers.iter().copied());
        self.execute(request).await
    }

    pub async fn patch<B: Serialize + ?Sized>(
        &mut self,
        url: &str,
        body: &B,
        headers: &[(&str, &str)],
    ) -> Result<HttpResponse, ApiError> {
        let request = HttpRequest::patch(url, body)?.with_headers(headers.iter().copied());
        self.execute(request).await
    }

    pub async fn delete(&mut self, url: &str, headers: &[(&str, &str)]) -> Result<HttpResponse, ApiError> {
        self.execute(HttpRequest::delete(url).with_headers(headers.iter().copied()))
            .await
    }
}

async fn dispatch(builder: reqwest::RequestBuilder) -> Result<HttpResponse, ApiError> {
    let response = builder.send().await?;
    let status = response.status().as_u16();
    let text = response.text().await?;
    match serde_json::from_str(&text) {
        Ok(body) => Ok(HttpResponse { status, body }),
        Err(source) => Err(ApiError::Parse {
            status,
            body: text,
            source,
        }),
    }
}

fn log_request(request: &HttpRequest) {
    let method = request.method;
    info!("Executing '{method}' REST request with URL: {}", request.url);

    if request.headers.is_empty() {
        info!("No additional headers provided.");
    } else {
        info!("Headers:");
        for (name, value) in &request.headers {
            info!("  {name}: {value}");
        }
    }

    if method.has_body() {
        match &request.body {
            RequestBody::Json(body) => info!("{method} Body: {body}"),
            RequestBody::Form(pairs) => {
                let fields: Vec<String> = pairs.iter().map(|(k, v)| format!("{k}={v}")).collect();
                info!("{method} Form: {}", fields.join("&"));
            }
            RequestBody::Empty => info!("{method} Body: <empty>"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn empty_url_is_rejected_without_connecting() {
        let mut executor = RequestExecutor::default();
        let err = executor.get("  ", &[]).await.unwrap_err();
        assert!(matches!(err, ApiError::Configuration(_)));
        assert!(!executor.is_connected());
    }

    #[tokio::test]
    async fn unresolved_placeholder_is_rejected() {
        let mut executor = RequestExecutor::default();
        let err = executor
            .get("http://127.0.0.1/get/json?key={{key}}", &[])
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Configuration(ref m) if m.contains("{{key}}")));
        assert!(!executor.is_connected());
    }

    #[tokio::test]
    async fn refused_connection_is_transport_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let mut executor = RequestExecutor::default();
        let err = executor.get(&format!("http://{addr}/"), &[]).await.unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)));
        assert!(executor.is_connected());
    }
}
