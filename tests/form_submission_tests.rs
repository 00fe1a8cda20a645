use inference_hub::{
    Error,
    blob::BlobStore,
    config::BackendConfig,
    form::{FormState, RequestForm},
    remote::{CallOutcome, RemoteFailure, RemoteResponse},
    services::{
        CompletionMode, StyleMode, StyleTransfer, SummarizeResponse, Summarizer, TextCompletion,
    },
};
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::json;

mod common;
use common::{
    COMPLETE_FALLBACK, MockRemote, STYLE_FALLBACK, SUMMARIZE_FALLBACK, content_image, style_image,
};

fn summarizer_form() -> RequestForm<Summarizer> {
    Summarizer::new(&BackendConfig { port: 8000 }).into_form()
}

fn completion_form() -> RequestForm<TextCompletion> {
    TextCompletion::new(&BackendConfig { port: 8002 }).into_form()
}

fn style_form(blobs: &BlobStore) -> RequestForm<StyleTransfer> {
    StyleTransfer::new(&BackendConfig { port: 8001 }, blobs.clone()).into_form()
}

#[rstest]
#[case("")]
#[case("   ")]
#[case("\n\t ")]
#[tokio::test]
async fn test_blank_text_never_reaches_network(#[case] text: &str) {
    let remote = MockRemote::new().with_json(json!({"summary": "unused"}));
    let mut form = summarizer_form();
    form.input_mut().text = text.to_string();

    assert!(!form.can_submit());
    let err = form.submit(&remote).await.unwrap_err();

    assert!(matches!(err, Error::Validation(_)));
    assert_eq!(form.error(), Some("Please enter some text to summarize"));
    assert_eq!(remote.call_count(), 0);
    assert!(!form.is_busy());
    assert_eq!(form.state(), FormState::Failed);
}

#[tokio::test]
async fn test_blank_prompt_never_reaches_network() {
    let remote = MockRemote::new();
    let mut form = completion_form();
    form.input_mut().prompt = "  ".to_string();

    assert!(form.submit(&remote).await.is_err());
    assert_eq!(form.error(), Some("Please enter a prompt to complete"));
    assert_eq!(remote.call_count(), 0);
}

#[tokio::test]
async fn test_missing_image_never_reaches_network() {
    let remote = MockRemote::new();
    let blobs = BlobStore::new();
    let mut form = style_form(&blobs);
    form.input_mut().content_image = Some(content_image());

    assert!(!form.can_submit());
    assert!(form.submit(&remote).await.is_err());
    assert_eq!(form.error(), Some("Please select both content and style images"));
    assert_eq!(remote.call_count(), 0);
}

#[rstest]
#[case(0.0)]
#[case(0.05)]
#[case(1.1)]
#[tokio::test]
async fn test_alpha_out_of_range_never_reaches_network(#[case] alpha: f64) {
    let remote = MockRemote::new().with_binary("image/png", b"unused");
    let blobs = BlobStore::new();
    let mut form = style_form(&blobs);
    form.input_mut().content_image = Some(content_image());
    form.input_mut().style_image = Some(style_image());
    form.input_mut().alpha = alpha;

    assert!(!form.can_submit());
    let err = form.submit(&remote).await.unwrap_err();

    assert!(matches!(err, Error::Validation(_)));
    assert_eq!(form.error(), Some("Style strength must be between 0.1 and 1.0"));
    assert_eq!(remote.call_count(), 0);
    assert_eq!(form.state(), FormState::Failed);
    assert!(blobs.is_empty());
}

#[tokio::test]
async fn test_success_displays_summary_and_clears_previous_error() {
    let remote = MockRemote::new()
        .with_failure(Some(500), Some("model crashed"))
        .with_json(json!({"summary": "X"}));
    let mut form = summarizer_form();
    form.input_mut().text = "A long article".to_string();

    assert!(form.submit(&remote).await.is_err());
    assert_eq!(form.error(), Some("model crashed"));

    form.submit(&remote).await.unwrap();

    assert_eq!(form.error(), None);
    assert_eq!(
        form.result(),
        Some(&SummarizeResponse {
            summary: "X".to_string()
        })
    );
    assert_eq!(form.state(), FormState::Succeeded);
    assert_eq!(remote.call_count(), 2);
}

#[tokio::test]
async fn test_server_detail_is_displayed_verbatim() {
    let remote = MockRemote::new().with_failure(Some(422), Some("bad input"));
    let mut form = summarizer_form();
    form.input_mut().text = "text".to_string();

    let err = form.submit(&remote).await.unwrap_err();

    assert_eq!(err.to_string(), "bad input");
    assert_eq!(form.error(), Some("bad input"));
    assert!(form.result().is_none());
}

#[tokio::test]
async fn test_missing_detail_uses_service_fallback() {
    let mut summarize = summarizer_form();
    summarize.input_mut().text = "text".to_string();
    let remote = MockRemote::new().with_failure(Some(500), None);
    assert!(summarize.submit(&remote).await.is_err());
    assert_eq!(summarize.error(), Some(SUMMARIZE_FALLBACK));

    let mut complete = completion_form();
    complete.input_mut().prompt = "Once".to_string();
    // No queued reply: the mock behaves like a refused connection.
    assert!(complete.submit(&MockRemote::new()).await.is_err());
    assert_eq!(complete.error(), Some(COMPLETE_FALLBACK));

    let blobs = BlobStore::new();
    let mut style = style_form(&blobs);
    style.input_mut().content_image = Some(content_image());
    style.input_mut().style_image = Some(style_image());
    let remote = MockRemote::new().with_failure(None, None);
    assert!(style.submit(&remote).await.is_err());
    assert_eq!(style.error(), Some(STYLE_FALLBACK));
}

#[tokio::test]
async fn test_undecodable_success_body_uses_fallback() {
    let remote = MockRemote::new().with_json(json!({"unexpected": true}));
    let mut form = summarizer_form();
    form.input_mut().text = "text".to_string();

    assert!(form.submit(&remote).await.is_err());
    assert_eq!(form.error(), Some(SUMMARIZE_FALLBACK));
}

#[test]
fn test_busy_for_the_duration_of_the_call() {
    let mut form = summarizer_form();
    form.input_mut().text = "text".to_string();
    assert!(!form.is_busy());

    let pending = form.begin_submit().unwrap();
    assert!(form.is_busy());
    assert!(!form.can_submit());
    assert_eq!(form.state(), FormState::Loading);

    let applied = form.complete(pending, Err(RemoteFailure::transport()));

    assert!(applied);
    assert!(!form.is_busy());
    assert_eq!(form.state(), FormState::Failed);
    assert!(form.can_submit());
}

#[test]
fn test_second_submit_rejected_while_in_flight() {
    let mut form = summarizer_form();
    form.input_mut().text = "text".to_string();

    let first = form.begin_submit().unwrap();
    let err = form.begin_submit().unwrap_err();
    assert!(matches!(err, Error::Busy));
    assert_eq!(form.generation(), first.generation);

    assert!(form.complete(
        first,
        Ok(RemoteResponse::Json(json!({"summary": "done"})))
    ));
    assert_eq!(form.result().map(|r| r.summary.as_str()), Some("done"));
}

#[test]
fn test_response_after_reset_is_discarded() {
    let mut form = summarizer_form();
    form.input_mut().text = "text".to_string();

    let pending = form.begin_submit().unwrap();
    form.reset();

    let applied = form.complete(pending, Ok(RemoteResponse::Json(json!({"summary": "late"}))));

    assert!(!applied);
    assert!(form.result().is_none());
    assert_eq!(form.error(), None);
    assert_eq!(form.state(), FormState::Idle);
}

#[test]
fn test_stale_generation_cannot_overwrite_newer_result() {
    let mut form = summarizer_form();
    form.input_mut().text = "first".to_string();
    let first = form.begin_submit().unwrap();
    form.reset();

    form.input_mut().text = "second".to_string();
    let second = form.begin_submit().unwrap();
    assert!(second.generation > first.generation);

    assert!(form.settle(
        second.generation,
        CallOutcome::Ok(SummarizeResponse {
            summary: "new".to_string()
        })
    ));
    assert!(!form.settle(
        first.generation,
        CallOutcome::Ok(SummarizeResponse {
            summary: "old".to_string()
        })
    ));

    assert_eq!(form.result().map(|r| r.summary.as_str()), Some("new"));
}

#[tokio::test]
async fn test_reset_clears_everything_and_releases_blob() {
    let blobs = BlobStore::new();
    let remote = MockRemote::new().with_binary("image/png", b"stylized");
    let mut form = style_form(&blobs);
    form.input_mut().content_image = Some(content_image());
    form.input_mut().style_image = Some(style_image());
    form.input_mut().alpha = 0.4;

    form.submit(&remote).await.unwrap();
    assert_eq!(blobs.len(), 1);
    let handle = &form.result().unwrap().result_image;
    assert_eq!(&handle.data().unwrap()[..], b"stylized");

    form.reset();

    assert!(blobs.is_empty());
    assert!(form.result().is_none());
    assert_eq!(form.error(), None);
    assert!(form.input().content_image.is_none());
    assert!(form.input().style_image.is_none());
    assert_eq!(form.input().alpha, 1.0);
    assert_eq!(form.input().mode, StyleMode::Blended);
}

#[tokio::test]
async fn test_superseded_blob_is_released() {
    let blobs = BlobStore::new();
    let remote = MockRemote::new()
        .with_binary("image/png", b"first")
        .with_binary("image/png", b"second");
    let mut form = style_form(&blobs);
    form.input_mut().content_image = Some(content_image());
    form.input_mut().style_image = Some(style_image());

    form.submit(&remote).await.unwrap();
    let first_id = form.result().unwrap().result_image.id();

    form.submit(&remote).await.unwrap();

    assert_eq!(blobs.len(), 1);
    assert!(!blobs.contains(&first_id));
    assert_eq!(
        &form.result().unwrap().result_image.data().unwrap()[..],
        b"second"
    );
}

#[tokio::test]
async fn test_reset_restores_default_summarize_input() {
    let remote = MockRemote::new().with_json(json!({"summary": "S"}));
    let mut form = summarizer_form();
    form.input_mut().text = "text".to_string();
    form.input_mut().min_length = 10;
    form.input_mut().max_length = 200;
    form.submit(&remote).await.unwrap();

    form.reset();

    assert_eq!(form.input().text, "");
    assert_eq!(form.input().min_length, 30);
    assert_eq!(form.input().max_length, 100);
    assert!(form.result().is_none());
}

#[tokio::test]
async fn test_multi_completion_count_follows_server() {
    let remote = MockRemote::new().with_json(json!({"completions": ["a", "b"]}));
    let mut form = completion_form();
    form.input_mut().prompt = "Il était une fois".to_string();
    form.input_mut().mode = CompletionMode::Multi;
    form.input_mut().num_sequences = 5;

    form.submit(&remote).await.unwrap();

    assert_eq!(form.result().unwrap().completions.len(), 2);
    let requests = remote.get_requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].path, "/api/complete/multi-complete");
}

#[tokio::test]
async fn test_single_completion_yields_one_entry() {
    let remote = MockRemote::new().with_json(json!({"completion": "Il était une fois un roi"}));
    let mut form = completion_form();
    form.input_mut().prompt = "Il était une fois".to_string();

    form.submit(&remote).await.unwrap();

    assert_eq!(
        form.result().unwrap().completions,
        vec!["Il était une fois un roi".to_string()]
    );
}
