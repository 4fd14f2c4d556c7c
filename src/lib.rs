//! # kofetch - a minimal HTTP client with interceptor hooks
//!
//! kofetch wraps an HTTP transport in a single request pipeline shared by
//! every verb:
//!
//! 1. **Build** the request: default headers merged with per-call overrides,
//!    an optional `before_request` hook, base URL + path + query string, and a
//!    JSON body.
//! 2. **Send** it through a [`Transport`] (`reqwest` by default).
//! 3. **Classify** the response: `200..=299` is a success and its body is
//!    parsed as JSON; anything else becomes a [`NormalizedError`].
//! 4. **Dispatch** to at most one hook: `on_success`, `on_request_fail` (no
//!    response at all) or `on_response_fail` (non-2xx response).
//!
//! ## Quick Start
//!
//! ```no_run
//! use kofetch::{Client, Interceptors};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize)]
//! struct CreateTodo {
//!     title: String,
//! }
//!
//! #[derive(Deserialize)]
//! struct Todo {
//!     id: u64,
//!     title: String,
//!     completed: bool,
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), kofetch::Error> {
//!     let client = Client::builder()
//!         .base_url("https://jsonplaceholder.typicode.com")
//!         .default_header("Content-Type", "application/json")?
//!         .build()?;
//!
//!     let todo: Todo = client.get("/todos/1", None, None).await?;
//!     println!("{}: {} (done: {})", todo.id, todo.title, todo.completed);
//!
//!     let new_todo = CreateTodo { title: "write docs".to_string() };
//!     let created: Todo = client.post("/todos", &new_todo, None).await?;
//!     println!("Created todo {}", created.id);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! A failed call carries exactly one of two shapes. [`Error::Transport`] means
//! no response was ever received. [`Error::Http`] means a response arrived with
//! a status outside the success range:
//!
//! ```no_run
//! use kofetch::{Client, Error, ResponseBody};
//!
//! # async fn example() -> Result<(), Error> {
//! # let client = Client::builder().base_url("https://api.example.com").build()?;
//! match client.get::<serde_json::Value>("/endpoint", None, None).await {
//!     Ok(value) => println!("Success: {value}"),
//!     Err(Error::Http(err)) => match &err.response_body {
//!         ResponseBody::Json(body) => eprintln!("{}: {body}", err.name),
//!         ResponseBody::Text(text) => eprintln!("{}: {text}", err.name),
//!     },
//!     Err(Error::Transport(fault)) => eprintln!("No response ({:?}): {fault}", fault.kind()),
//!     Err(e) => eprintln!("Other error: {e}"),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Interceptors
//!
//! A configured failure hook owns recovery for its branch: what it returns is
//! the call's result. To keep failing, return an error from the hook.
//!
//! ```no_run
//! use kofetch::{Client, Error, Interceptors};
//!
//! # async fn example() -> Result<(), Error> {
//! let interceptors = Interceptors::builder()
//!     .on_request_fail(|fault| async move {
//!         tracing::warn!(%fault, "offline, serving empty result");
//!         Ok(serde_json::json!([]))
//!     })
//!     .on_response_fail(|err| async move {
//!         if err.status_code == 404 {
//!             Ok(serde_json::Value::Null)
//!         } else {
//!             Err(err.into())
//!         }
//!     })
//!     .build();
//!
//! let client = Client::builder()
//!     .base_url("https://api.example.com")
//!     .interceptors(interceptors)
//!     .build()?;
//! # Ok(())
//! # }
//! ```

mod client;
mod error;
pub mod interceptor;
pub mod query;
pub mod request;
mod response;
pub mod transport;

pub use client::{Client, ClientBuilder, ClientConfig};
pub use error::{Error, FaultKind, NormalizedError, ResponseBody, Result, TransportFault};
pub use interceptor::{Interceptors, InterceptorsBuilder, Outcome};
pub use query::{QueryParams, QueryValue};
pub use request::{RequestDescriptor, RequestMetadata};
pub use response::{classify, RawResponse, ResponseOutcome};
pub use transport::{ReqwestTransport, Transport};
