//! Example demonstrating the four interceptor hooks.
//!
//! This example shows how to:
//! - Replace outgoing headers with `before_request`
//! - Unwrap response envelopes with `on_success`
//! - Recover from HTTP failures with `on_response_fail`
//! - Recover from transport faults with `on_request_fail`
//!
//! Run with: `cargo run --example interceptors`

use http::HeaderValue;
use kofetch::{Client, Error, Interceptors};
use serde_json::{json, Value};

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter("kofetch=debug,interceptors=info")
        .init();

    let interceptors = Interceptors::builder()
        .before_request(|mut headers| {
            headers.insert("authorization", HeaderValue::from_static("Bearer demo-token"));
            headers
        })
        .on_success(|body| async move {
            // Attach a marker so callers can see the hook ran.
            Ok(json!({ "intercepted": true, "data": body }))
        })
        .on_response_fail(|err| async move {
            if err.status_code == 404 {
                tracing::info!(url = %err.request_url, "Treating 404 as empty result");
                Ok(Value::Null)
            } else {
                Err(err.into())
            }
        })
        .on_request_fail(|fault| async move {
            tracing::warn!(%fault, "Transport fault, serving cached value");
            Ok(json!({ "cached": true }))
        })
        .build();

    let client = Client::builder()
        .base_url("https://jsonplaceholder.typicode.com")
        .default_header("Accept", "application/json")?
        .interceptors(interceptors.clone())
        .build()?;

    println!("=== on_success ===");
    let todo: Value = client.get("/todos/1", None, None).await?;
    println!("{}", todo);
    println!();

    println!("=== on_response_fail ===");
    let missing: Value = client.get("/todos/999999", None, None).await?;
    println!("404 resolved to: {}", missing);
    println!();

    println!("=== on_request_fail ===");
    let offline = Client::builder()
        .base_url("http://127.0.0.1:9")
        .interceptors(interceptors)
        .build()?;
    let cached: Value = offline.get("/todos/1", None, None).await?;
    println!("Transport fault resolved to: {}", cached);

    Ok(())
}
