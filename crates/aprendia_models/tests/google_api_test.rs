//! Live tests against Google APIs.
//!
//! Run with `cargo test -p aprendia_models --features api -- --ignored`
//! and `GEMINI_API_KEY` set.

#![cfg(feature = "api")]

use aprendia_interface::GenerationClient;
use aprendia_models::GoogleGenerationClient;

fn client() -> GoogleGenerationClient {
    let _ = dotenvy::dotenv();
    let key = std::env::var("GEMINI_API_KEY").expect("GEMINI_API_KEY not set");
    GoogleGenerationClient::from_api_key(key).expect("client")
}

#[tokio::test]
#[ignore]
async fn test_generate_pairs() {
    let client = client();
    let text = client
        .generate_text("Write two lines in the form english|spanish about a cat.")
        .await
        .expect("generation");

    assert!(text.contains('|'), "expected a separator in: {}", text);
}

#[tokio::test]
#[ignore]
async fn test_synthesize_spanish() {
    let client = client();
    let audio = client
        .synthesize_speech("es", "Hola, ¿cómo estás?")
        .await
        .expect("synthesis");

    assert!(audio.len() > 100);
}
