//! Skill video API tests.

mod common;

use axum::http::{Method, StatusCode};
use common::{business_token, get_request, get_request_with_auth, json_request_with_auth, TestApp};
use domain::models::VideoStats;
use serde_json::{json, Value};

const CREATE: &str = "/api/business/skill-video/create/";

async fn create_video(app: &TestApp, token: &str, url: &str, title: &str) -> Value {
    let (status, body) = app
        .send(json_request_with_auth(
            Method::POST,
            CREATE,
            json!({ "youtube_url": url, "title": title, "description": "Warm-up" }),
            token,
        ))
        .await;
    assert_eq!(status, StatusCode::CREATED, "video create failed: {}", body);
    body["data"].clone()
}

#[tokio::test]
async fn test_create_from_watch_url() {
    let app = TestApp::new();
    let (status, body) = app
        .send(json_request_with_auth(
            Method::POST,
            CREATE,
            json!({
                "youtube_url": "https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=42s",
                "title": "Plank basics"
            }),
            &business_token(3),
        ))
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Skill video created successfully");
    assert_eq!(body["data"]["youtube_video_id"], "dQw4w9WgXcQ");
    assert_eq!(body["data"]["business_id"], 3);
    assert_eq!(body["data"]["is_locked"], true);
}

#[tokio::test]
async fn test_create_from_short_url() {
    let app = TestApp::new();
    let video = create_video(
        &app,
        &business_token(3),
        "https://youtu.be/abc123XYZ_-?si=share",
        "Stretching",
    )
    .await;

    assert_eq!(video["youtube_video_id"], "abc123XYZ_-");
}

#[tokio::test]
async fn test_invalid_url_is_rejected() {
    let app = TestApp::new();
    let (status, body) = app
        .send(json_request_with_auth(
            Method::POST,
            CREATE,
            json!({ "youtube_url": "https://vimeo.com/12345", "title": "Nope" }),
            &business_token(3),
        ))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"][0]["field"], "youtube_url");
    assert_eq!(body["details"][0]["message"], "Invalid YouTube URL");
}

#[tokio::test]
async fn test_missing_title_is_rejected() {
    let app = TestApp::new();
    let (status, body) = app
        .send(json_request_with_auth(
            Method::POST,
            CREATE,
            json!({ "youtube_url": "https://youtu.be/abc" }),
            &business_token(3),
        ))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"][0]["field"], "title");
}

#[tokio::test]
async fn test_business_list_is_tenant_scoped() {
    let app = TestApp::new();
    let token_a = business_token(1);
    let token_b = business_token(2);

    let older = create_video(&app, &token_a, "https://youtu.be/one", "One").await;
    let newer = create_video(&app, &token_a, "https://youtu.be/two", "Two").await;
    create_video(&app, &token_b, "https://youtu.be/three", "Three").await;

    let (status, body) = app
        .send(get_request_with_auth("/api/business/skill-video/list/", &token_a))
        .await;

    assert_eq!(status, StatusCode::OK);
    let listed = body.as_array().unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0]["id"], newer["id"]);
    assert_eq!(listed[1]["id"], older["id"]);
}

#[tokio::test]
async fn test_detail_includes_stats() {
    let app = TestApp::with_stats(VideoStats {
        views: 1200,
        likes: 85,
        comments: 9,
    });
    let token = business_token(1);
    let video = create_video(&app, &token, "https://youtu.be/stats", "Stats").await;

    let (status, body) = app
        .send(get_request_with_auth(
            &format!("/api/business/skill-video/detail/?video_id={}", video["id"]),
            &token,
        ))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["video"]["id"], video["id"]);
    assert_eq!(body["video"]["title"], "Stats");
    assert_eq!(
        body["youtube_stats"],
        json!({ "views": 1200, "likes": 85, "comments": 9 })
    );
}

#[tokio::test]
async fn test_detail_of_foreign_video_is_not_found() {
    let app = TestApp::new();
    let video = create_video(&app, &business_token(1), "https://youtu.be/mine", "Mine").await;

    let (status, body) = app
        .send(get_request_with_auth(
            &format!("/api/business/skill-video/detail/?video_id={}", video["id"]),
            &business_token(2),
        ))
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Video not found");
}

#[tokio::test]
async fn test_detail_requires_integer_video_id() {
    let app = TestApp::new();
    let token = business_token(1);

    let (status, body) = app
        .send(get_request_with_auth("/api/business/skill-video/detail/", &token))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"][0]["field"], "video_id");

    let (status, _) = app
        .send(get_request_with_auth(
            "/api/business/skill-video/detail/?video_id=abc",
            &token,
        ))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_member_list_spans_businesses() {
    let app = TestApp::new();
    create_video(&app, &business_token(1), "https://youtu.be/a1", "A").await;
    let newest = create_video(&app, &business_token(2), "https://youtu.be/b1", "B").await;

    let (status, body) = app.send(get_request("/api/member/skill-video/list/")).await;

    assert_eq!(status, StatusCode::OK);
    let listed = body.as_array().unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0]["id"], newest["id"]);
}
