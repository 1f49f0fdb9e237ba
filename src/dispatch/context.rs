//! Per-request state and the cooperative handler chain.
//!
//! # Responsibilities
//! - Expose the request (method, path, params, query, form, headers, body)
//! - Buffer the response (status, headers, body) until dispatch finishes
//! - Drive the handler chain through an explicit cursor
//!
//! # Design Decisions
//! - One Context per request, never shared; it owns its response buffer
//! - The cursor is advanced before a handler runs, so a panic unwinding out
//!   of a handler never leaves the cursor pointing at it
//! - `next` runs exactly one handler; a handler that does not call `next`
//!   ends the chain

use std::fmt;
use std::sync::Arc;

use axum::body::{Body, Bytes};
use axum::http::header::{HeaderName, HeaderValue, CONTENT_TYPE};
use axum::http::{HeaderMap, Method, Request, Response, StatusCode, Uri};
use percent_encoding::percent_decode_str;
use serde::Serialize;
use thiserror::Error;

use super::engine::DispatchSettings;
use super::handler::HandlerFunc;
use crate::routing::Params;

const TEXT_HTML_UTF8: &str = "text/html; charset=utf-8";
const APPLICATION_JSON_UTF8: &str = "application/json; charset=utf-8";
const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

/// Errors returned by response-writing primitives.
#[derive(Debug, Error)]
pub enum ContextError {
    #[error("failed to serialize response body: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("invalid response header: {0}")]
    Header(#[from] axum::http::Error),
}

/// Request-scoped state handed to every handler in the chain.
pub struct Context {
    method: Method,
    uri: Uri,
    path: String,
    headers: HeaderMap,
    body: Bytes,
    params: Params,

    status: StatusCode,
    response_headers: HeaderMap,
    response_body: Vec<u8>,

    handlers: Vec<HandlerFunc>,
    index: usize,
    aborted: bool,
    settings: Arc<DispatchSettings>,
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("params", &self.params)
            .field("status", &self.status)
            .field("handlers", &self.handlers.len())
            .field("index", &self.index)
            .field("aborted", &self.aborted)
            .finish()
    }
}

impl Context {
    /// Create a context for one buffered request.
    pub fn new(request: Request<Bytes>, settings: Arc<DispatchSettings>) -> Self {
        let (parts, body) = request.into_parts();
        let path = percent_decode_str(parts.uri.path())
            .decode_utf8_lossy()
            .into_owned();
        Self {
            method: parts.method,
            uri: parts.uri,
            path,
            headers: parts.headers,
            body,
            params: Params::new(),
            status: StatusCode::OK,
            response_headers: HeaderMap::new(),
            response_body: Vec::new(),
            handlers: Vec::new(),
            index: 0,
            aborted: false,
            settings,
        }
    }

    pub(crate) fn push_handlers<I>(&mut self, handlers: I)
    where
        I: IntoIterator<Item = HandlerFunc>,
    {
        self.handlers.extend(handlers);
    }

    pub(crate) fn set_params(&mut self, params: Params) {
        self.params = params;
    }

    // ---- chain control ----

    /// Run the next handler in the chain, if any.
    ///
    /// Code before this call in a middleware runs in registration order, code
    /// after it runs in reverse order once downstream handlers return.
    pub fn next(&mut self) {
        let Some(handler) = self.handlers.get(self.index).cloned() else {
            return;
        };
        self.index += 1;
        handler(self);
    }

    /// Skip every remaining handler and answer 500 with the configured failure message.
    pub fn abort(&mut self) {
        self.index = self.handlers.len();
        self.aborted = true;
        let message = self.settings.failure_message.clone();
        self.fail(StatusCode::INTERNAL_SERVER_ERROR, message);
    }

    pub fn is_aborted(&self) -> bool {
        self.aborted
    }

    /// Number of handlers already started.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Length of the assembled chain.
    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    // ---- request ----

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    /// Percent-decoded request path; routing and group matching use this form.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Path parameter by name, empty if absent.
    pub fn param(&self, key: &str) -> &str {
        self.params.get(key).map(String::as_str).unwrap_or("")
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Decoded query-string value, empty if absent.
    pub fn query(&self, key: &str) -> String {
        self.uri
            .query()
            .and_then(|query| form_value(query.as_bytes(), key))
            .unwrap_or_default()
    }

    /// Urlencoded body value, falling back to the query string; empty if absent.
    pub fn post_form(&self, key: &str) -> String {
        let is_form = self
            .request_header(CONTENT_TYPE.as_str())
            .map(|ct| ct.starts_with(FORM_URLENCODED))
            .unwrap_or(false);
        if is_form {
            if let Some(value) = form_value(&self.body, key) {
                return value;
            }
        }
        self.query(key)
    }

    pub fn request_header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    // ---- response ----

    pub fn status(&mut self, code: StatusCode) {
        self.status = code;
    }

    pub fn status_code(&self) -> StatusCode {
        self.status
    }

    pub fn set_header<K, V>(&mut self, key: K, value: V) -> Result<(), ContextError>
    where
        HeaderName: TryFrom<K>,
        <HeaderName as TryFrom<K>>::Error: Into<axum::http::Error>,
        HeaderValue: TryFrom<V>,
        <HeaderValue as TryFrom<V>>::Error: Into<axum::http::Error>,
    {
        let name = HeaderName::try_from(key).map_err(|e| ContextError::Header(e.into()))?;
        let value = HeaderValue::try_from(value).map_err(|e| ContextError::Header(e.into()))?;
        self.response_headers.insert(name, value);
        Ok(())
    }

    pub fn response_header(&self, name: &str) -> Option<&str> {
        self.response_headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn response_body(&self) -> &[u8] {
        &self.response_body
    }

    /// Write a text body.
    pub fn string(&mut self, code: StatusCode, body: impl AsRef<str>) {
        self.set_content_type(TEXT_HTML_UTF8);
        self.status = code;
        self.response_body.extend_from_slice(body.as_ref().as_bytes());
    }

    /// Write `value` as JSON. Nothing is written if encoding fails.
    pub fn json<T>(&mut self, code: StatusCode, value: &T) -> Result<(), ContextError>
    where
        T: Serialize + ?Sized,
    {
        let encoded = serde_json::to_vec(value)?;
        self.set_content_type(APPLICATION_JSON_UTF8);
        self.status = code;
        self.response_body.extend_from_slice(&encoded);
        Ok(())
    }

    /// Write raw bytes.
    pub fn data(&mut self, code: StatusCode, data: impl AsRef<[u8]>) {
        self.status = code;
        self.response_body.extend_from_slice(data.as_ref());
    }

    /// Replace the buffered response with an error message.
    pub fn fail(&mut self, code: StatusCode, message: impl Into<String>) {
        self.set_content_type(TEXT_HTML_UTF8);
        self.status = code;
        self.response_body = message.into().into_bytes();
    }

    fn set_content_type(&mut self, value: &'static str) {
        self.response_headers
            .insert(CONTENT_TYPE, HeaderValue::from_static(value));
    }

    /// Consume the context into the single response for this request.
    pub fn into_response(self) -> Response<Body> {
        let mut response = Response::new(Body::from(self.response_body));
        *response.status_mut() = self.status;
        *response.headers_mut() = self.response_headers;
        response
    }
}

fn form_value(input: &[u8], key: &str) -> Option<String> {
    url::form_urlencoded::parse(input)
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
}
