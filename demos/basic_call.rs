//! Basic example demonstrating simple GET and POST requests.
//!
//! This example shows how to:
//! - Create a client with a base URL and default headers
//! - Make GET requests with query parameters
//! - Make POST requests with a JSON body
//!
//! Run with: `cargo run --example basic_call`

use kofetch::{Client, Error, QueryParams};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct Post {
    #[serde(rename = "userId")]
    user_id: u32,
    id: u32,
    title: String,
    body: String,
}

#[derive(Debug, Serialize)]
struct NewPost {
    title: String,
    body: String,
    #[serde(rename = "userId")]
    user_id: u32,
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter("kofetch=debug,basic_call=info")
        .init();

    let client = Client::builder()
        .base_url("https://jsonplaceholder.typicode.com")
        .default_header("Content-Type", "application/json; charset=UTF-8")?
        .build()?;

    println!("=== GET Request Example ===");
    let post: Post = client.get("/posts/1", None, None).await?;

    println!("Post ID: {}", post.id);
    println!("Title: {}", post.title);
    println!("Body: {}", post.body);
    println!();

    println!("=== GET With Query Parameters ===");
    let params = QueryParams::new().with("userId", 1);
    let posts: Vec<Post> = client.get("/posts", Some(&params), None).await?;
    println!("User 1 has {} posts", posts.len());
    println!();

    println!("=== POST Request Example ===");
    let new_post = NewPost {
        title: "My New Post".to_string(),
        body: "This is the content of my new post!".to_string(),
        user_id: 1,
    };

    let created: Post = client.post("/posts", &new_post, None).await?;

    println!("Created post ID: {}", created.id);
    println!("Title: {}", created.title);

    Ok(())
}
