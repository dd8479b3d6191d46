//! End-to-end pipeline runs against mock provider and CDN endpoints.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use vwv_models::{Platform, PipelineStage, ProjectKey};
use vwv_pipeline::{Pipeline, PipelineConfig};
use vwv_providers::{JamendoClient, PixabayClient, ProviderRegistry, SearchProvider};

fn test_config(root: &Path) -> PipelineConfig {
    PipelineConfig {
        workspace_root: root.to_path_buf(),
        per_keyword_quota: 3,
        fetch_videos: true,
        max_download_parallel: 4,
        download_timeout: Duration::from_secs(5),
    }
}

fn pixabay_registry(server_uri: &str, with_music: bool) -> ProviderRegistry {
    let pixabay: Arc<dyn SearchProvider> =
        Arc::new(PixabayClient::new("test-key").with_base_url(server_uri));
    let music: Vec<Arc<dyn SearchProvider>> = if with_music {
        vec![Arc::new(
            JamendoClient::new("test-id").with_base_url(server_uri),
        )]
    } else {
        Vec::new()
    };
    ProviderRegistry::from_providers(vec![pixabay.clone()], vec![pixabay], music)
}

async fn mount_cdn_asset(server: &MockServer, url_path: &str, content_type: &str, fill: u8) {
    Mock::given(method("GET"))
        .and(path(url_path.to_string()))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", content_type)
                .set_body_bytes(vec![fill; 128]),
        )
        .mount(server)
        .await;
}

async fn mount_image_search(server: &MockServer, keyword: &str, urls: &[String]) {
    let hits: Vec<_> = urls
        .iter()
        .map(|u| json!({"largeImageURL": u, "imageWidth": 1920, "imageHeight": 1080}))
        .collect();
    Mock::given(method("GET"))
        .and(path("/api/"))
        .and(query_param("q", keyword))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "hits": hits })))
        .mount(server)
        .await;
}

async fn mount_video_search(server: &MockServer, keyword: &str, url: &str, w: u32, h: u32) {
    Mock::given(method("GET"))
        .and(path("/api/videos/"))
        .and(query_param("q", keyword))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "hits": [{
                "duration": 12,
                "videos": {"large": {"url": url, "width": w, "height": h}}
            }]
        })))
        .mount(server)
        .await;
}

async fn mount_track_search(server: &MockServer, query: &str, url: &str) {
    Mock::given(method("GET"))
        .and(path("/v3.0/tracks/"))
        .and(query_param("search", query))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{"audio": url, "duration": 180}]
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_happy_path_produces_ordered_manifest_and_completes() {
    let server = MockServer::start().await;
    let root = tempfile::tempdir().unwrap();

    mount_image_search(
        &server,
        "nature",
        &[
            format!("{}/cdn/nature_one.jpg", server.uri()),
            format!("{}/cdn/nature_two.jpg", server.uri()),
        ],
    )
    .await;
    mount_video_search(
        &server,
        "nature",
        &format!("{}/cdn/nature_clip.mp4", server.uri()),
        1080,
        1920,
    )
    .await;
    mount_image_search(
        &server,
        "ocean",
        &[format!("{}/cdn/ocean_one.jpg", server.uri())],
    )
    .await;
    mount_video_search(
        &server,
        "ocean",
        &format!("{}/cdn/ocean_clip.mp4", server.uri()),
        1080,
        1920,
    )
    .await;
    mount_track_search(
        &server,
        "nature ocean",
        &format!("{}/cdn/calm_track.mp3", server.uri()),
    )
    .await;

    mount_cdn_asset(&server, "/cdn/nature_one.jpg", "image/jpeg", 1).await;
    mount_cdn_asset(&server, "/cdn/nature_two.jpg", "image/jpeg", 2).await;
    mount_cdn_asset(&server, "/cdn/nature_clip.mp4", "video/mp4", 3).await;
    mount_cdn_asset(&server, "/cdn/ocean_one.jpg", "image/jpeg", 4).await;
    mount_cdn_asset(&server, "/cdn/ocean_clip.mp4", "video/mp4", 5).await;
    mount_cdn_asset(&server, "/cdn/calm_track.mp3", "audio/mpeg", 6).await;

    let pipeline = Pipeline::new(
        pixabay_registry(&server.uri(), true),
        test_config(root.path()),
    );
    let key = ProjectKey::new(1, 10);

    let outcome = pipeline
        .run_and_wait(key, Platform::Tiktok, vec!["nature".into(), "ocean".into()])
        .await;
    assert!(outcome.accepted);

    let status = pipeline.status(key).await;
    assert_eq!(status.stage, PipelineStage::Complete);
    assert!(pipeline.is_manifest_ready(key).await);

    let manifest = pipeline.load_manifest(key).await;
    assert_eq!(manifest.project_id, 10);
    // Keyword order, images before the keyword's video.
    assert_eq!(
        manifest.media_clips,
        vec![
            "media/nature.jpg",
            "media/nature_1.jpg",
            "media/nature.mp4",
            "media/ocean.jpg",
            "media/ocean.mp4",
        ]
    );
    assert_eq!(manifest.music_clips, vec!["music/nature_ocean.mp3"]);

    // The clips exist on disk under the workspace.
    let ws = pipeline.workspace_for(key);
    for clip in manifest.media_clips.iter().chain(&manifest.music_clips) {
        assert!(ws.root().join(clip).is_file(), "missing {}", clip);
    }
}

#[tokio::test]
async fn test_empty_keywords_yield_empty_manifest_and_complete() {
    let server = MockServer::start().await;
    let root = tempfile::tempdir().unwrap();

    let pipeline = Pipeline::new(
        pixabay_registry(&server.uri(), true),
        test_config(root.path()),
    );
    let key = ProjectKey::new(2, 20);

    let outcome = pipeline.run_and_wait(key, Platform::Youtube, vec![]).await;
    assert!(outcome.accepted);

    let status = pipeline.status(key).await;
    assert_eq!(status.stage, PipelineStage::Complete);

    let manifest = pipeline.load_manifest(key).await;
    assert!(manifest.media_clips.is_empty());
    assert!(manifest.music_clips.is_empty());
    assert!(pipeline.is_manifest_ready(key).await);
}

#[tokio::test]
async fn test_second_trigger_rejected_while_run_active() {
    let server = MockServer::start().await;
    let root = tempfile::tempdir().unwrap();

    // Slow search keeps the first run holding the lock.
    Mock::given(method("GET"))
        .and(path("/api/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"hits": []}))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/videos/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"hits": []})))
        .mount(&server)
        .await;

    let pipeline = Pipeline::new(
        pixabay_registry(&server.uri(), false),
        test_config(root.path()),
    );
    let key = ProjectKey::new(3, 30);

    let first = pipeline.trigger(key, Platform::Youtube, vec!["slow".into()]);
    assert!(first.accepted);

    let second = pipeline.trigger(key, Platform::Youtube, vec!["slow".into()]);
    assert!(!second.accepted);
    assert!(second.message.contains("already processing"));

    // After the first run finishes, the lock is free again.
    loop {
        tokio::time::sleep(Duration::from_millis(50)).await;
        if pipeline.status(key).await.stage.is_terminal() {
            break;
        }
    }
    let third = pipeline.trigger(key, Platform::Youtube, vec![]);
    assert!(third.accepted);
}

#[tokio::test]
async fn test_failed_download_is_skipped_and_run_completes() {
    let server = MockServer::start().await;
    let root = tempfile::tempdir().unwrap();

    mount_image_search(
        &server,
        "city",
        &[
            format!("{}/cdn/gone.jpg", server.uri()),
            format!("{}/cdn/city.jpg", server.uri()),
        ],
    )
    .await;
    mount_video_search(&server, "city", &format!("{}/cdn/none.mp4", server.uri()), 1080, 1920)
        .await;

    Mock::given(method("GET"))
        .and(path("/cdn/gone.jpg"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/cdn/none.mp4"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    mount_cdn_asset(&server, "/cdn/city.jpg", "image/jpeg", 9).await;

    let pipeline = Pipeline::new(
        pixabay_registry(&server.uri(), false),
        test_config(root.path()),
    );
    let key = ProjectKey::new(4, 40);

    pipeline
        .run_and_wait(key, Platform::Tiktok, vec!["city".into()])
        .await;

    assert_eq!(pipeline.status(key).await.stage, PipelineStage::Complete);
    let manifest = pipeline.load_manifest(key).await;
    assert_eq!(manifest.media_clips, vec!["media/city.jpg"]);
}

#[tokio::test]
async fn test_unreachable_provider_degrades_to_empty_results() {
    let server = MockServer::start().await;
    let root = tempfile::tempdir().unwrap();

    // Image/video provider points at a dead endpoint; music still works.
    let dead: Arc<dyn SearchProvider> =
        Arc::new(PixabayClient::new("k").with_base_url("http://127.0.0.1:9"));
    let music: Arc<dyn SearchProvider> =
        Arc::new(JamendoClient::new("test-id").with_base_url(server.uri()));
    let registry =
        ProviderRegistry::from_providers(vec![dead.clone()], vec![dead], vec![music]);

    mount_track_search(
        &server,
        "sunset beach",
        &format!("{}/cdn/track.mp3", server.uri()),
    )
    .await;
    mount_cdn_asset(&server, "/cdn/track.mp3", "audio/mpeg", 7).await;

    let pipeline = Pipeline::new(registry, test_config(root.path()));
    let key = ProjectKey::new(5, 50);

    pipeline
        .run_and_wait(key, Platform::Instagram, vec!["sunset".into(), "beach".into()])
        .await;

    assert_eq!(pipeline.status(key).await.stage, PipelineStage::Complete);
    let manifest = pipeline.load_manifest(key).await;
    assert!(manifest.media_clips.is_empty());
    assert_eq!(manifest.music_clips, vec!["music/sunset_beach.mp3"]);
}

#[tokio::test]
async fn test_horizontal_video_filtered_for_vertical_platform() {
    let server = MockServer::start().await;
    let root = tempfile::tempdir().unwrap();

    mount_image_search(
        &server,
        "skyline",
        &[format!("{}/cdn/skyline.jpg", server.uri())],
    )
    .await;
    // 16:9 footage: fine for YouTube, rejected for TikTok.
    mount_video_search(
        &server,
        "skyline",
        &format!("{}/cdn/skyline.mp4", server.uri()),
        1920,
        1080,
    )
    .await;
    mount_cdn_asset(&server, "/cdn/skyline.jpg", "image/jpeg", 11).await;
    mount_cdn_asset(&server, "/cdn/skyline.mp4", "video/mp4", 12).await;

    let pipeline = Pipeline::new(
        pixabay_registry(&server.uri(), false),
        test_config(root.path()),
    );

    let tiktok_key = ProjectKey::new(6, 60);
    pipeline
        .run_and_wait(tiktok_key, Platform::Tiktok, vec!["skyline".into()])
        .await;
    let manifest = pipeline.load_manifest(tiktok_key).await;
    assert_eq!(manifest.media_clips, vec!["media/skyline.jpg"]);

    let youtube_key = ProjectKey::new(6, 61);
    pipeline
        .run_and_wait(youtube_key, Platform::Youtube, vec!["skyline".into()])
        .await;
    let manifest = pipeline.load_manifest(youtube_key).await;
    assert_eq!(
        manifest.media_clips,
        vec!["media/skyline.jpg", "media/skyline.mp4"]
    );
}

#[tokio::test]
async fn test_blocked_workspace_reaches_error_status() {
    let server = MockServer::start().await;
    let root = tempfile::tempdir().unwrap();

    let pipeline = Pipeline::new(
        pixabay_registry(&server.uri(), false),
        test_config(root.path()),
    );
    let key = ProjectKey::new(8, 80);

    // A file where the media directory should be makes workspace setup
    // fail while the status artifact stays writable.
    let ws = pipeline.workspace_for(key);
    std::fs::create_dir_all(ws.root()).unwrap();
    std::fs::write(ws.media_dir(), b"not a directory").unwrap();

    let outcome = pipeline
        .run_and_wait(key, Platform::Youtube, vec!["nature".into()])
        .await;
    assert!(outcome.accepted);

    let status = pipeline.status(key).await;
    assert_eq!(status.stage, PipelineStage::Error);
    assert!(!pipeline.is_manifest_ready(key).await);
}

#[tokio::test]
async fn test_quota_caps_candidates_per_keyword_per_kind() {
    let server = MockServer::start().await;
    let root = tempfile::tempdir().unwrap();

    let urls: Vec<String> = (0..6)
        .map(|i| format!("{}/cdn/forest_{}.jpg", server.uri(), i))
        .collect();
    mount_image_search(&server, "forest", &urls).await;
    for i in 0..6 {
        mount_cdn_asset(
            &server,
            &format!("/cdn/forest_{}.jpg", i),
            "image/jpeg",
            i as u8 + 1,
        )
        .await;
    }

    let mut config = test_config(root.path());
    config.per_keyword_quota = 2;
    config.fetch_videos = false;

    let pipeline = Pipeline::new(pixabay_registry(&server.uri(), false), config);
    let key = ProjectKey::new(7, 70);

    pipeline
        .run_and_wait(key, Platform::Youtube, vec!["forest".into()])
        .await;

    let manifest = pipeline.load_manifest(key).await;
    assert_eq!(manifest.media_clips.len(), 2);
}
