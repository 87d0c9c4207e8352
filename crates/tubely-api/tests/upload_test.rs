//! Upload flows: multipart ingestion, orientation-prefixed keys, stored
//! playback references, and signed read-back.

mod helpers;

use axum::http::StatusCode;
use axum_test::multipart::{MultipartForm, Part};
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

use helpers::media::FakeMediaTool;
use helpers::{
    setup_app, setup_app_with_config, setup_landscape_app, test_config, TestApp, TEST_BUCKET,
};

const MP4_BYTES: &[u8] = b"\x00\x00\x00\x18ftypmp42fake-payload";
const PNG_BYTES: &[u8] = b"\x89PNG\r\nfake-thumbnail";

async fn create_video(app: &TestApp, user: Uuid) -> Uuid {
    let response = app
        .server
        .post("/api/videos")
        .add_header("Authorization", app.bearer(user))
        .json(&json!({ "title": "upload target", "description": "" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    let body: serde_json::Value = response.json();
    body["id"].as_str().unwrap().parse().unwrap()
}

fn file_part(field: &str, data: &'static [u8], file_name: &str, mime: &str) -> MultipartForm {
    let part = Part::bytes(bytes::Bytes::from_static(data))
        .file_name(file_name)
        .mime_type(mime);
    MultipartForm::new().add_part(field.to_string(), part)
}

async fn put_video(app: &TestApp, user: Uuid, video_id: Uuid, form: MultipartForm) -> StatusCode {
    app.server
        .put(&format!("/api/videos/{}/video", video_id))
        .add_header("Authorization", app.bearer(user))
        .multipart(form)
        .await
        .status_code()
}

#[tokio::test]
async fn video_upload_end_to_end() {
    let app = setup_landscape_app().await;
    let user = Uuid::new_v4();
    let video_id = create_video(&app, user).await;

    let response = app
        .server
        .put(&format!("/api/videos/{}/video", video_id))
        .add_header("Authorization", app.bearer(user))
        .multipart(file_part("video", MP4_BYTES, "cooking.mp4", "video/mp4"))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    // Exactly one object, keyed by orientation prefix plus a random token.
    let keys = app.storage.keys();
    assert_eq!(keys.len(), 1);
    let key = &keys[0];
    let token = key.strip_prefix("landscape/").expect("landscape prefix");
    assert_eq!(token.len(), 43);

    let (data, content_type) = app.storage.get(key).unwrap();
    assert_eq!(&data[..], MP4_BYTES);
    assert_eq!(content_type, "video/mp4");

    // The durable record holds the bucket,key reference, not a URL.
    let stored = app.videos.get(video_id).await.unwrap().unwrap();
    assert_eq!(
        stored.video_url.as_deref(),
        Some(format!("{},{}", TEST_BUCKET, key).as_str())
    );

    // The response carries a signed URL with the 5 second expiry.
    let body: serde_json::Value = response.json();
    let url = body["video_url"].as_str().unwrap();
    assert_ne!(url, stored.video_url.as_deref().unwrap());
    assert!(url.contains(key));
    assert!(url.contains("X-Amz-Expires=5"));
}

#[tokio::test]
async fn read_back_signs_without_mutating_the_record() {
    let app = setup_landscape_app().await;
    let user = Uuid::new_v4();
    let video_id = create_video(&app, user).await;
    let status = put_video(
        &app,
        user,
        video_id,
        file_part("video", MP4_BYTES, "a.mp4", "video/mp4"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let response = app
        .server
        .get(&format!("/api/videos/{}", video_id))
        .add_header("Authorization", app.bearer(user))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: serde_json::Value = response.json();
    let url = body["video_url"].as_str().unwrap();
    assert!(url.contains("X-Amz-Expires=5"));

    let stored = app.videos.get(video_id).await.unwrap().unwrap();
    let reference = stored.video_url.unwrap();
    assert!(reference.starts_with(TEST_BUCKET));
    assert_ne!(url, reference);
}

#[tokio::test]
async fn portrait_and_square_videos_get_their_own_prefixes() {
    for (tool, prefix) in [
        (FakeMediaTool::portrait(), "portrait/"),
        (FakeMediaTool::square(), "other/"),
    ] {
        let app = setup_app(Arc::new(tool)).await;
        let user = Uuid::new_v4();
        let video_id = create_video(&app, user).await;
        let status = put_video(
            &app,
            user,
            video_id,
            file_part("video", MP4_BYTES, "a.mp4", "video/mp4"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let keys = app.storage.keys();
        assert_eq!(keys.len(), 1);
        assert!(
            keys[0].starts_with(prefix),
            "expected {} prefix, got {}",
            prefix,
            keys[0]
        );
    }
}

#[tokio::test]
async fn non_owner_upload_leaves_no_trace() {
    let app = setup_landscape_app().await;
    let owner = Uuid::new_v4();
    let video_id = create_video(&app, owner).await;

    let status = put_video(
        &app,
        Uuid::new_v4(),
        video_id,
        file_part("video", MP4_BYTES, "a.mp4", "video/mp4"),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    assert_eq!(app.storage.object_count(), 0);
    let stored = app.videos.get(video_id).await.unwrap().unwrap();
    assert!(stored.video_url.is_none());
}

#[tokio::test]
async fn upload_to_unknown_video_is_not_found() {
    let app = setup_landscape_app().await;
    let status = put_video(
        &app,
        Uuid::new_v4(),
        Uuid::new_v4(),
        file_part("video", MP4_BYTES, "a.mp4", "video/mp4"),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(app.storage.object_count(), 0);
}

#[tokio::test]
async fn undeclared_media_type_is_rejected() {
    let app = setup_landscape_app().await;
    let user = Uuid::new_v4();
    let video_id = create_video(&app, user).await;

    let status = put_video(
        &app,
        user,
        video_id,
        file_part("video", MP4_BYTES, "a.mov", "video/quicktime"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(app.storage.object_count(), 0);
}

#[tokio::test]
async fn fields_before_the_video_field_are_skipped() {
    let app = setup_landscape_app().await;
    let user = Uuid::new_v4();
    let video_id = create_video(&app, user).await;

    let form = MultipartForm::new()
        .add_text("notes", "ignored metadata")
        .add_part(
            "video",
            Part::bytes(bytes::Bytes::from_static(MP4_BYTES))
                .file_name("a.mp4")
                .mime_type("video/mp4"),
        );
    let status = put_video(&app, user, video_id, form).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(app.storage.object_count(), 1);
}

#[tokio::test]
async fn upload_over_the_ceiling_is_rejected_mid_copy() {
    let mut config = test_config();
    config.max_video_upload_bytes = MP4_BYTES.len() - 1;
    let app = setup_app_with_config(config, Arc::new(FakeMediaTool::landscape())).await;
    let user = Uuid::new_v4();
    let video_id = create_video(&app, user).await;

    let status = put_video(
        &app,
        user,
        video_id,
        file_part("video", MP4_BYTES, "a.mp4", "video/mp4"),
    )
    .await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);

    assert_eq!(app.storage.object_count(), 0);
    let stored = app.videos.get(video_id).await.unwrap().unwrap();
    assert!(stored.video_url.is_none());
}

#[tokio::test]
async fn missing_video_field_is_rejected() {
    let app = setup_landscape_app().await;
    let user = Uuid::new_v4();
    let video_id = create_video(&app, user).await;

    let status = put_video(
        &app,
        user,
        video_id,
        file_part("file", MP4_BYTES, "a.mp4", "video/mp4"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn probe_failure_stores_nothing() {
    let app = setup_app(Arc::new(FakeMediaTool::no_video_stream())).await;
    let user = Uuid::new_v4();
    let video_id = create_video(&app, user).await;

    let status = put_video(
        &app,
        user,
        video_id,
        file_part("video", MP4_BYTES, "a.mp4", "video/mp4"),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    assert_eq!(app.storage.object_count(), 0);
    let stored = app.videos.get(video_id).await.unwrap().unwrap();
    assert!(stored.video_url.is_none());
}

#[tokio::test]
async fn thumbnail_upload_persists_public_url() {
    let app = setup_landscape_app().await;
    let user = Uuid::new_v4();
    let video_id = create_video(&app, user).await;

    let response = app
        .server
        .put(&format!("/api/videos/{}/thumbnail", video_id))
        .add_header("Authorization", app.bearer(user))
        .multipart(file_part("thumbnail", PNG_BYTES, "thumb.png", "image/png"))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let keys = app.storage.keys();
    assert_eq!(keys.len(), 1);
    let key = &keys[0];
    assert!(key.starts_with("thumbnails/"));
    assert!(key.ends_with(".png"));

    // Thumbnails are public: the stored URL is the final URL, no signing.
    let stored = app.videos.get(video_id).await.unwrap().unwrap();
    let url = stored.thumbnail_url.as_deref().unwrap();
    assert!(url.ends_with(key.as_str()));

    let body: serde_json::Value = response.json();
    assert_eq!(body["thumbnail_url"].as_str(), Some(url));
}

#[tokio::test]
async fn thumbnail_upload_requires_ownership() {
    let app = setup_landscape_app().await;
    let owner = Uuid::new_v4();
    let video_id = create_video(&app, owner).await;

    let response = app
        .server
        .put(&format!("/api/videos/{}/thumbnail", video_id))
        .add_header("Authorization", app.bearer(Uuid::new_v4()))
        .multipart(file_part("thumbnail", PNG_BYTES, "thumb.png", "image/png"))
        .await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
    assert_eq!(app.storage.object_count(), 0);
}

#[tokio::test]
async fn thumbnail_rejects_unsupported_type() {
    let app = setup_landscape_app().await;
    let user = Uuid::new_v4();
    let video_id = create_video(&app, user).await;

    let response = app
        .server
        .put(&format!("/api/videos/{}/thumbnail", video_id))
        .add_header("Authorization", app.bearer(user))
        .multipart(file_part("thumbnail", PNG_BYTES, "thumb.gif", "image/gif"))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(app.storage.object_count(), 0);
}
