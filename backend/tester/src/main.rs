use std::{env, process::exit};

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};

const DEFAULT_API_URL: &str = "http://localhost:3000/api/feedback";

const TEST_NAME: &str = "Alice Test";
const TEST_FEEDBACK: &str = "End-to-End verified!";

#[tokio::main]
async fn main() {
    let api_url = env::args()
        .nth(1)
        .or_else(|| env::var("API_URL").ok())
        .unwrap_or_else(|| DEFAULT_API_URL.to_string());

    println!("--- STARTING API TEST against {api_url} ---");

    let client = Client::new();
    let mut failures = 0;

    println!("\n1. Fetching current feedback...");
    match list(&client, &api_url).await {
        Ok(body) => println!("Current count: {}", body["count"]),
        Err(e) => {
            println!("Failed to connect: {e}");
            exit(1);
        }
    }

    println!("\n2. Submitting new feedback ({TEST_NAME})...");
    let payload = json!({ "name": TEST_NAME, "feedback": TEST_FEEDBACK });
    match client.post(&api_url).json(&payload).send().await {
        Ok(response) if response.status() == StatusCode::CREATED => {
            let body: Value = response.json().await.unwrap_or_default();
            println!(
                "POST success: {} - {}",
                body["data"]["name"], body["data"]["feedback"]
            );
        }
        Ok(response) => {
            failures += 1;
            println!("POST failed with {}", response.status());
        }
        Err(e) => {
            failures += 1;
            println!("POST error: {e}");
        }
    }

    println!("\n3. Verifying persistence...");
    match list(&client, &api_url).await {
        Ok(body) if body["data"][0]["name"] == TEST_NAME => {
            println!("Persistence verified: {TEST_NAME} is the newest entry");
        }
        Ok(body) => {
            let found = body["data"]
                .as_array()
                .is_some_and(|data| data.iter().any(|entry| entry["name"] == TEST_NAME));

            if found {
                println!("Persistence verified: found {TEST_NAME}, but not as the newest entry");
            } else {
                failures += 1;
                println!("Persistence failed: {TEST_NAME} not found");
            }
        }
        Err(e) => {
            failures += 1;
            println!("GET error: {e}");
        }
    }

    println!("\n4. Testing error handling (empty body)...");
    match client.post(&api_url).json(&json!({})).send().await {
        Ok(response) if response.status() == StatusCode::BAD_REQUEST => {
            println!("Error handling verified: received 400 Bad Request");
        }
        Ok(response) => {
            failures += 1;
            println!("Error handling failed: {}", response.status());
        }
        Err(e) => {
            failures += 1;
            println!("POST error: {e}");
        }
    }

    println!("\n--- TEST COMPLETE, {failures} failure(s) ---");

    if failures > 0 {
        exit(1);
    }
}

async fn list(client: &Client, api_url: &str) -> Result<Value, reqwest::Error> {
    client
        .get(api_url)
        .send()
        .await?
        .error_for_status()?
        .json()
        .await
}
