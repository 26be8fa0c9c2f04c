use aprendia_error::{AprendiaResult, GenerationError, GenerationErrorKind};
use aprendia_interface::GenerationClient;
use aprendia_server::{AppConfig, build_app};
use aprendia_storage::InMemoryRepository;
use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;
use tower::ServiceExt;

const CHAPTER_TEXT: &str = "\
The cat is hungry.|El gato tiene hambre.
It looks for food.|Busca comida.
It finds some fish.|Encuentra pescado.";

const QUIZ_TEXT: &str = "\
El gato tiene ¿qué?|hambre
Busca <BLANK>.|comida";

/// Mock provider: chapters and quizzes get canned text, topic "FAIL" errors.
#[derive(Default)]
struct MockClient {
    prompts: Mutex<Vec<String>>,
}

#[async_trait]
impl GenerationClient for MockClient {
    async fn generate_text(&self, prompt: &str) -> AprendiaResult<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        if prompt.contains("- Topic: FAIL") {
            return Err(GenerationError::new(GenerationErrorKind::HttpError {
                status_code: 500,
                message: "internal error".to_string(),
            })
            .into());
        }
        if prompt.contains("Create 5 quiz questions now:") {
            Ok(QUIZ_TEXT.to_string())
        } else {
            Ok(CHAPTER_TEXT.to_string())
        }
    }

    async fn synthesize_speech(&self, locale: &str, text: &str) -> AprendiaResult<Vec<u8>> {
        Ok(format!("{}|{}", locale, text).into_bytes())
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}

struct TestApp {
    audio_dir: TempDir,
    router: Router,
    client: Arc<MockClient>,
}

fn app() -> TestApp {
    let audio_dir = TempDir::new().expect("temp dir");
    let config = AppConfig::default().with_audio_dir(audio_dir.path());
    let client = Arc::new(MockClient::default());
    let (_service, router) = build_app(
        &config,
        Arc::clone(&client),
        Arc::new(InMemoryRepository::new()),
    );
    TestApp {
        audio_dir,
        router,
        client,
    }
}

async fn send(
    router: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

fn cats_story(topic: &str) -> Value {
    json!({
        "title": "Cats",
        "source_locale": "en",
        "target_locale": "es",
        "language_level": "A1",
        "age_level": "toddler",
        "topic": topic,
        "conversation_type": "narration",
        "min_sentence_length": 3,
        "max_sentence_length": 10
    })
}

/// Polls a studiable until its job has published sentences or recorded an error.
async fn wait_for_job(router: &Router, studiable_id: u64) -> Value {
    for _ in 0..200 {
        let uri = format!("/studiables/{}", studiable_id);
        let (status, body) = send(router, "GET", &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        let done = body["sentences"].as_array().is_some_and(|s| !s.is_empty())
            || body["metadata"].get("error").is_some();
        if done {
            return body;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("job for studiable {} did not finish", studiable_id);
}

#[tokio::test]
async fn test_story_creation_generates_first_chapter() {
    let app = app();

    let (status, created) = send(&app.router, "POST", "/stories", Some(cats_story("cats"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(created["status"], "processing");
    assert_eq!(created["story"]["title"], "Cats");
    assert_eq!(created["story"]["metadata"]["language_level"], "A1");
    let story_id = created["story"]["id"].as_u64().unwrap();
    let chapter_id = created["chapter_id"].as_u64().unwrap();

    let (status, story) = send(&app.router, "GET", &format!("/stories/{}", story_id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(story["title"], "Cats");
    assert_eq!(story["studiable_ids"], json!([chapter_id]));

    let chapter = wait_for_job(&app.router, chapter_id).await;
    assert_eq!(chapter["title"], "Chapter 1");
    assert_eq!(chapter["story_id"], story_id);
    assert_eq!(chapter["metadata"]["type"], "chapter");
    assert_eq!(chapter["metadata"]["chapter_number"], 1);
    assert!(chapter["metadata"].get("error").is_none());

    let sentences = chapter["sentences"].as_array().unwrap();
    assert_eq!(sentences.len(), 3);
    for (i, sentence) in sentences.iter().enumerate() {
        assert_eq!(sentence["order"], i);
        assert!(!sentence["source_audio"].as_str().unwrap().is_empty());
        assert!(!sentence["target_audio"].as_str().unwrap().is_empty());
    }
    assert_eq!(sentences[0]["source_text"], "The cat is hungry.");
    assert_eq!(sentences[0]["target_text"], "El gato tiene hambre.");

    let (stories_status, stories) = send(&app.router, "GET", "/stories", None).await;
    assert_eq!(stories_status, StatusCode::OK);
    assert_eq!(stories.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_audio_is_served_under_prefix() {
    let app = app();
    let (_, created) = send(&app.router, "POST", "/stories", Some(cats_story("cats"))).await;
    let chapter = wait_for_job(&app.router, created["chapter_id"].as_u64().unwrap()).await;

    let url = chapter["sentences"][0]["target_audio"].as_str().unwrap().to_string();
    assert!(url.starts_with("/audio/es/es_"));

    let response = app
        .router
        .clone()
        .oneshot(Request::builder().uri(&url).body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[..], "es|El gato tiene hambre.".as_bytes());
}

#[tokio::test]
async fn test_chapter_numbers_are_per_story() {
    let app = app();
    let (_, first) = send(&app.router, "POST", "/stories", Some(cats_story("cats"))).await;
    let (_, second) = send(&app.router, "POST", "/stories", Some(cats_story("dogs"))).await;
    let first_id = first["story"]["id"].as_u64().unwrap();
    let second_id = second["story"]["id"].as_u64().unwrap();
    wait_for_job(&app.router, first["chapter_id"].as_u64().unwrap()).await;

    let uri = format!("/stories/{}/studiables", first_id);
    let mut chapter_ids = Vec::new();
    for _ in 0..2 {
        let chapter = json!({ "type": "chapter" });
        let (status, body) = send(&app.router, "POST", &uri, Some(chapter)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "processing");
        chapter_ids.push(body["studiable_id"].as_u64().unwrap());
    }
    let (_, other) = send(
        &app.router,
        "POST",
        &format!("/stories/{}/studiables", second_id),
        Some(json!({ "type": "chapter" })),
    )
    .await;

    let second_chapter = wait_for_job(&app.router, chapter_ids[0]).await;
    let third_chapter = wait_for_job(&app.router, chapter_ids[1]).await;
    let other_chapter = wait_for_job(&app.router, other["studiable_id"].as_u64().unwrap()).await;

    assert_eq!(second_chapter["metadata"]["chapter_number"], 2);
    assert_eq!(third_chapter["title"], "Chapter 3");
    assert_eq!(other_chapter["metadata"]["chapter_number"], 2);

    // Leveling fields omitted from the request come from the earlier chapter.
    assert_eq!(second_chapter["metadata"]["topic"], "cats");
    assert_eq!(second_chapter["metadata"]["conversation_type"], "narration");

    let prompts = app.client.prompts.lock().unwrap().clone();
    assert!(
        prompts
            .iter()
            .any(|p| p.starts_with("Continue the following story")
                && p.contains("The cat is hungry.")),
        "later chapters continue from earlier text"
    );

    let (status, list) = send(&app.router, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_quiz_swaps_question_and_answer() {
    let app = app();
    let (_, created) = send(&app.router, "POST", "/stories", Some(cats_story("cats"))).await;
    let story_id = created["story"]["id"].as_u64().unwrap();
    let chapter_id = created["chapter_id"].as_u64().unwrap();
    wait_for_job(&app.router, chapter_id).await;

    let (status, body) = send(
        &app.router,
        "POST",
        &format!("/stories/{}/studiables", story_id),
        Some(json!({ "type": "quiz", "parent_studiable_id": chapter_id })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let quiz = wait_for_job(&app.router, body["studiable_id"].as_u64().unwrap()).await;
    assert_eq!(quiz["title"], "Quiz for Chapter 1");
    assert_eq!(quiz["metadata"]["type"], "quiz");
    assert_eq!(quiz["metadata"]["parent_studiable_id"], chapter_id);
    assert_eq!(quiz["metadata"]["language_level"], "A1");

    let sentences = quiz["sentences"].as_array().unwrap();
    assert_eq!(sentences.len(), 2);
    assert_eq!(sentences[0]["source_text"], "hambre");
    assert_eq!(sentences[0]["target_text"], "El gato tiene ¿qué?");
    assert!(sentences[0]["source_audio"].as_str().unwrap().starts_with("/audio/es/"));
}

#[tokio::test]
async fn test_quiz_over_failed_chapter_records_error() {
    let app = app();
    let (_, created) = send(&app.router, "POST", "/stories", Some(cats_story("FAIL"))).await;
    let story_id = created["story"]["id"].as_u64().unwrap();
    let chapter_id = created["chapter_id"].as_u64().unwrap();
    wait_for_job(&app.router, chapter_id).await;

    let (_, body) = send(
        &app.router,
        "POST",
        &format!("/stories/{}/studiables", story_id),
        Some(json!({ "type": "quiz", "parent_studiable_id": chapter_id })),
    )
    .await;
    let quiz = wait_for_job(&app.router, body["studiable_id"].as_u64().unwrap()).await;

    assert!(quiz["sentences"].as_array().unwrap().is_empty());
    assert!(
        quiz["metadata"]["error"]
            .as_str()
            .unwrap()
            .contains("has no sentences")
    );
}

#[tokio::test]
async fn test_text_failure_is_recorded_on_chapter() {
    let app = app();
    let (status, created) = send(&app.router, "POST", "/stories", Some(cats_story("FAIL"))).await;
    assert_eq!(status, StatusCode::OK, "job failures never fail the request");

    let chapter = wait_for_job(&app.router, created["chapter_id"].as_u64().unwrap()).await;
    assert!(chapter["sentences"].as_array().unwrap().is_empty());
    assert!(chapter["metadata"]["error"].as_str().unwrap().contains("500"));

    let (_, metrics) = send(&app.router, "GET", "/metrics", None).await;
    assert_eq!(metrics["jobs_failed"], 1);
}

#[tokio::test]
async fn test_missing_entities_are_404() {
    let app = app();

    for (method, uri, body) in [
        ("GET", "/stories/42", None),
        ("GET", "/stories/42/studiables", None),
        ("POST", "/stories/42/studiables", Some(json!({ "type": "chapter" }))),
        ("GET", "/studiables/42", None),
    ] {
        let (status, body) = send(&app.router, method, uri, body).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{} {}", method, uri);
        assert!(body["detail"].as_str().unwrap().contains("not found"));
    }

    let (_, created) = send(&app.router, "POST", "/stories", Some(cats_story("cats"))).await;
    let story_id = created["story"]["id"].as_u64().unwrap();
    let (status, _) = send(
        &app.router,
        "POST",
        &format!("/stories/{}/studiables", story_id),
        Some(json!({ "type": "quiz", "parent_studiable_id": 999 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_invalid_requests_are_400() {
    let app = app();
    let (_, created) = send(&app.router, "POST", "/stories", Some(cats_story("cats"))).await;
    let uri = format!("/stories/{}/studiables", created["story"]["id"].as_u64().unwrap());

    let flashcards = json!({ "type": "flashcards" });
    let (status, body) = send(&app.router, "POST", &uri, Some(flashcards)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Invalid studiable type: flashcards");

    let (status, body) = send(&app.router, "POST", &uri, Some(json!({ "type": "quiz" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].as_str().unwrap().contains("parent_studiable_id"));

    let mut inverted = cats_story("cats");
    inverted["min_sentence_length"] = json!(12);
    let (status, _) = send(&app.router, "POST", "/stories", Some(inverted)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_path_like_locales_are_rejected() {
    let app = app();

    for (field, locale) in [
        ("source_locale", "../../x"),
        ("target_locale", "/tmp/elsewhere"),
        ("target_locale", ""),
    ] {
        let mut story = cats_story("cats");
        story[field] = json!(locale);
        let (status, body) = send(&app.router, "POST", "/stories", Some(story)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{} = {:?}", field, locale);
        assert!(body["detail"].as_str().unwrap().contains("Invalid locale"));
    }

    let (_, stories) = send(&app.router, "GET", "/stories", None).await;
    assert!(stories.as_array().unwrap().is_empty());
    let audio_root = std::fs::read_dir(app.audio_dir.path()).unwrap().count();
    assert_eq!(audio_root, 0);
}

#[tokio::test]
async fn test_health_and_root() {
    let app = app();

    let (status, health) = send(&app.router, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(health, json!({ "status": "healthy" }));

    let (status, root) = send(&app.router, "GET", "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(root["message"], "Aprendia API");
    assert!(root["version"].is_string());
}

#[tokio::test]
async fn test_trailing_slash_prefix_publishes_servable_urls() {
    use std::io::Write;

    let audio_dir = TempDir::new().expect("temp dir");
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(
        file,
        "audio_dir = \"{}\"\naudio_url_prefix = \"/media/\"",
        audio_dir.path().display()
    )
    .unwrap();
    let config = AppConfig::load(Some(file.path())).unwrap();
    let (_service, router) = build_app(
        &config,
        Arc::new(MockClient::default()),
        Arc::new(InMemoryRepository::new()),
    );

    let (_, created) = send(&router, "POST", "/stories", Some(cats_story("cats"))).await;
    let chapter = wait_for_job(&router, created["chapter_id"].as_u64().unwrap()).await;
    let url = chapter["sentences"][0]["source_audio"].as_str().unwrap().to_string();
    assert!(url.starts_with("/media/en/en_"), "{}", url);

    let response = router
        .clone()
        .oneshot(Request::builder().uri(&url).body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
