//! Example demonstrating error handling without interceptors.
//!
//! This example shows how to:
//! - Tell HTTP failures apart from transport faults
//! - Read the normalized error record
//! - Inspect JSON and plain-text failure bodies
//!
//! Run with: `cargo run --example error_handling`

use kofetch::{Client, Error, ResponseBody};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct Post {
    id: u32,
    title: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter("kofetch=info")
        .init();

    let client = Client::builder()
        .base_url("https://jsonplaceholder.typicode.com")
        .build()?;

    println!("=== Example 1: Handling HTTP Errors ===");
    match client.get::<Post>("/posts/999999", None, None).await {
        Ok(post) => println!("Success: {:?}", post),
        Err(Error::Http(err)) => {
            println!("HTTP Error!");
            println!("  Name: {}", err.name);
            println!("  Status code: {}", err.status_code);
            println!("  Message: {}", err.message);
            println!("  URL: {}", err.request_url);
            println!("  Content-Type: {:?}", err.request_headers.get("content-type"));
            match &err.response_body {
                ResponseBody::Json(value) => println!("  JSON body: {}", value),
                ResponseBody::Text(text) => println!("  Text body: {}", text),
            }
        }
        Err(e) => println!("Other error: {}", e),
    }
    println!();

    println!("=== Example 2: Handling Transport Faults ===");
    let bad_client = Client::builder()
        .base_url("https://this-domain-does-not-exist-12345.com")
        .build()?;

    match bad_client.get::<serde_json::Value>("/", None, None).await {
        Ok(_) => println!("Unexpected success"),
        Err(Error::Transport(fault)) => {
            println!("Transport fault!");
            println!("  Kind: {}", fault.kind());
            println!("  Message: {}", fault.message());
        }
        Err(e) => println!("Other error: {}", e),
    }
    println!();

    println!("=== Example 3: Using Error Methods ===");
    if let Err(e) = client.get::<Post>("/posts/999999", None, None).await {
        println!("Error occurred: {}", e);

        if let Some(status) = e.status() {
            println!("  HTTP status: {}", status);
        }

        if let Some(normalized) = e.normalized() {
            println!("  Body is JSON: {}", normalized.response_body.as_json().is_some());
        }

        if e.transport_fault().is_none() {
            println!("  A response was received");
        }
    }

    Ok(())
}
