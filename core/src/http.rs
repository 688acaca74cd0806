//! HTTP transport types.
//!
//! # Design
//! `HttpRequest` describes one call as plain data and is consumed by
//! `RequestExecutor::execute`, so a descriptor is never reused or changed
//! after dispatch. `HttpResponse` is the capture of one call, returned by
//! value; nothing is cached on the executor between calls.

use std::fmt::{self, Display};

use serde::Serialize;
use serde_json::Value;

use crate::error::ApiError;

/// HTTP method for a request. `FormPost` is a POST whose body is sent
/// `application/x-www-form-urlencoded`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    FormPost,
}

impl HttpMethod {
    pub fn has_body(self) -> bool {
        !matches!(self, HttpMethod::Get | HttpMethod::Delete)
    }
}

impl Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post | HttpMethod::FormPost => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        };
        write!(f, "{label}")
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post | HttpMethod::FormPost => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Patch => reqwest::Method::PATCH,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

/// Request payload.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum RequestBody {
    #[default]
    Empty,
    Json(Value),
    Form(Vec<(String, String)>),
}

/// An HTTP request described as plain data.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: RequestBody,
}

impl HttpRequest {
    fn new(method: HttpMethod, url: impl Into<String>, body: RequestBody) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            body,
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, url, RequestBody::Empty)
    }

    pub fn delete(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, url, RequestBody::Empty)
    }

    pub fn post<B: Serialize + ?Sized>(url: impl Into<String>, body: &B) -> Result<Self, ApiError> {
        Ok(Self::new(HttpMethod::Post, url, json_body(body)?))
    }

    pub fn put<B: Serialize + ?Sized>(url: impl Into<String>, body: &B) -> Result<Self, ApiError> {
        Ok(Self::new(HttpMethod::Put, url, json_body(body)?))
    }

    pub fn patch<B: Serialize + ?Sized>(url: impl Into<String>, body: &B) -> Result<Self, ApiError> {
        Ok(Self::new(HttpMethod::Patch, url, json_body(body)?))
    }

    pub fn form_post<K, V>(url: impl Into<String>, pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let pairs = pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
        Self::new(HttpMethod::FormPost, url, RequestBody::Form(pairs))
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_headers<K, V>(mut self, headers: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.headers
            .extend(headers.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }
}

fn json_body<B: Serialize + ?Sized>(body: &B) -> Result<RequestBody, ApiError> {
    serde_json::to_value(body)
        .map(RequestBody::Json)
        .map_err(|e| ApiError::Configuration(format!("request body is not serializable: {e}")))
}

/// Status code and parsed JSON body of one executed request.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Value,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}
