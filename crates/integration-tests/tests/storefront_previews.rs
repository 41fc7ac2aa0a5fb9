//! Audio preview toggles on the product detail view.

use pulsepack_integration_tests::TestServer;

const CLIP: &str = "/static/audio/midnight-trap-loop.mp3";

#[tokio::test]
async fn test_product_detail_lists_clips() {
    let server = TestServer::start().await;

    let (status, body) = server.get("/products/1").await;
    assert_eq!(status, 200);
    assert!(body.contains("Dark Trap Loop"));
    assert!(body.contains("808 Showcase"));
    assert!(!body.contains("preview-audio"));
}

#[tokio::test]
async fn test_play_toggle_and_end() {
    let server = TestServer::start().await;
    let play = [("product_id", "1"), ("url", CLIP)];

    let (_, body) = server.post_form("/previews/play", &play).await;
    assert!(body.contains("preview-audio"));

    // Playing the same clip again stops it.
    let (_, body) = server.post_form("/previews/play", &play).await;
    assert!(!body.contains("preview-audio"));

    server.post_form("/previews/play", &play).await;
    let (_, body) = server
        .post_form("/previews/ended", &[("product_id", "1")])
        .await;
    assert!(!body.contains("preview-audio"));
}

#[tokio::test]
async fn test_play_rejects_foreign_clip() {
    let server = TestServer::start().await;

    let (status, _) = server
        .post_form(
            "/previews/play",
            &[("product_id", "2"), ("url", CLIP)],
        )
        .await;
    assert_eq!(status, 400);
}
