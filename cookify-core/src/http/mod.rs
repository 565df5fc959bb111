//! HTTP access to the recipe source.
//!
//! All outgoing requests go through the `HttpClient` trait so the pipeline can
//! run against `MockClient` in tests. Retries live in `retry`, one policy per
//! call site.

mod client;
mod retry;

pub use client::{
    HttpClient, MockClient, MockResponse, ReqwestClient, ReqwestClientBuilder, DEFAULT_TIMEOUT,
};
pub use retry::{fetch_json_with_retry, RetryPolicy};
