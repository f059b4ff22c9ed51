//! HTTP surface tests: feeds, webhook, admin API.

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use blog_server::http::webhook::WebhookResponse;
use blog_server::http::HttpServer;
use blog_server::reload::ReloadTrigger;
use blog_server::AppState;

mod common;

use common::{app_state, server_config, start_server, Fixture, RSS_AND_ATOM, RSS_AND_SITEMAP};

async fn loaded(fixture: &Fixture, configure: impl FnOnce(&mut blog_server::ServerConfig)) -> (AppState, Router) {
    let mut config = server_config(fixture);
    configure(&mut config);
    let state = app_state(config, fixture);
    state.orchestrator.reload(ReloadTrigger::Startup).await.unwrap();
    let router = HttpServer::build_router(state.clone());
    (state, router)
}

async fn send(router: &Router, method: Method, uri: &str, headers: &[(&str, &str)]) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    router.clone().oneshot(builder.body(Body::empty()).unwrap()).await.unwrap()
}

async fn body_string(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn test_feeds_served_with_content_type() {
    let fixture = Fixture::blog(RSS_AND_ATOM);
    let (_state, router) = loaded(&fixture, |_| {}).await;

    let res = send(&router, Method::GET, "/rss.xml", &[]).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()[header::CONTENT_TYPE], "application/rss+xml; charset=utf-8");
    assert_eq!(res.headers()["x-snapshot-generation"], "1");
    assert!(res.headers().contains_key("x-request-id"));
    let body = body_string(res).await;
    assert!(body.contains("<title>Test Blog</title>"));

    let res = send(&router, Method::GET, "/atom.xml", &[]).await;
    assert_eq!(res.headers()[header::CONTENT_TYPE], "application/atom+xml; charset=utf-8");
    assert!(body_string(res).await.contains("<name>Ada</name>"));

    let res = send(&router, Method::HEAD, "/rss.xml", &[]).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert!(body_string(res).await.is_empty());

    let res = send(&router, Method::POST, "/rss.xml", &[]).await;
    assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(res.headers()[header::ALLOW], "GET, HEAD");

    let res = send(&router, Method::GET, "/sitemap.xml", &[]).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = send(&router, Method::GET, "/healthz", &[]).await;
    assert_eq!(body_string(res).await, "ok");
}

#[tokio::test]
async fn test_request_id_is_propagated() {
    let fixture = Fixture::blog(RSS_AND_ATOM);
    let (_state, router) = loaded(&fixture, |_| {}).await;

    let res = send(&router, Method::GET, "/healthz", &[("x-request-id", "trace-me")]).await;
    assert_eq!(res.headers()["x-request-id"], "trace-me");
}

#[tokio::test]
async fn test_configured_headers_applied() {
    let fixture = Fixture::blog(RSS_AND_ATOM);
    let (_state, router) = loaded(&fixture, |config| {
        config
            .headers
            .insert("cache-control".into(), "public, max-age=300".into());
    })
    .await;

    let res = send(&router, Method::GET, "/rss.xml", &[]).await;
    assert_eq!(res.headers()[header::CACHE_CONTROL], "public, max-age=300");
}

#[tokio::test]
async fn test_unknown_hosts_rejected_when_domains_set() {
    let fixture = Fixture::blog(RSS_AND_ATOM);
    let (_state, router) = loaded(&fixture, |config| {
        config.domains = vec!["blog.example.com".into(), "*.blog.example.net".into()];
    })
    .await;

    let res = send(&router, Method::GET, "/rss.xml", &[("host", "blog.example.com")]).await;
    assert_eq!(res.status(), StatusCode::OK);
    let res = send(&router, Method::GET, "/rss.xml", &[("host", "www.blog.example.net:8080")]).await;
    assert_eq!(res.status(), StatusCode::OK);

    let res = send(&router, Method::GET, "/rss.xml", &[("host", "mirror.example.com")]).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert!(res.headers().contains_key("x-request-id"));
    let res = send(&router, Method::GET, "/healthz", &[("host", "blog.example.net")]).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let res = send(&router, Method::GET, "/rss.xml", &[]).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_any_host_accepted_without_domains() {
    let fixture = Fixture::blog(RSS_AND_ATOM);
    let (_state, router) = loaded(&fixture, |_| {}).await;

    let res = send(&router, Method::GET, "/rss.xml", &[("host", "anything.test")]).await;
    assert_eq!(res.status(), StatusCode::OK);
}

async fn explode() -> &'static str {
    panic!("template missing")
}

#[tokio::test]
async fn test_handler_panic_becomes_500() {
    let fixture = Fixture::blog(RSS_AND_ATOM);
    let mut config = server_config(&fixture);
    config
        .headers
        .insert("cache-control".into(), "no-store".into());
    let router = HttpServer::with_middleware(Router::new().route("/boom", get(explode)), &config);

    for _ in 0..2 {
        let res = send(&router, Method::GET, "/boom", &[]).await;
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(res.headers().contains_key("x-request-id"));
        assert_eq!(res.headers()[header::CACHE_CONTROL], "no-store");
        assert_eq!(body_string(res).await, "internal server error");
    }
}

async fn stall() -> &'static str {
    tokio::time::sleep(std::time::Duration::from_secs(5)).await;
    "late"
}

#[tokio::test]
async fn test_slow_request_times_out_with_408() {
    let fixture = Fixture::blog(RSS_AND_ATOM);
    let mut config = server_config(&fixture);
    config.timeouts.request_secs = 1;
    let router = HttpServer::with_middleware(Router::new().route("/stall", get(stall)), &config);

    let res = send(&router, Method::GET, "/stall", &[]).await;
    assert_eq!(res.status(), StatusCode::REQUEST_TIMEOUT);
}

#[tokio::test]
async fn test_webhook_reloads_and_checks_secret() {
    let fixture = Fixture::blog(RSS_AND_ATOM);
    let (_state, router) = loaded(&fixture, |config| {
        config.webhook.secret = Some("hook-secret".into());
    })
    .await;

    fixture.set_feeds(RSS_AND_SITEMAP);

    let res = send(&router, Method::POST, "/webhooks/reload", &[]).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let res = send(&router, Method::POST, "/webhooks/reload", &[("x-webhook-secret", "wrong")]).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = send(&router, Method::GET, "/webhooks/reload", &[]).await;
    assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);

    let res = send(&router, Method::POST, "/webhooks/reload", &[("x-webhook-secret", "hook-secret")]).await;
    assert_eq!(res.status(), StatusCode::OK);
    let report: WebhookResponse = serde_json::from_str(&body_string(res).await).unwrap();
    assert_eq!(report.generation, 2);
    assert_eq!((report.tags, report.series, report.posts), (2, 1, 2));
    let paths: Vec<&str> = report.feeds.iter().map(|f| f.path.as_str()).collect();
    assert_eq!(paths, vec!["/rss.xml", "/sitemap.xml"]);

    assert_eq!(send(&router, Method::GET, "/atom.xml", &[]).await.status(), StatusCode::NOT_FOUND);
    let res = send(&router, Method::GET, "/sitemap.xml", &[]).await;
    assert_eq!(res.headers()[header::CONTENT_TYPE], "application/xml; charset=utf-8");
}

#[tokio::test]
async fn test_webhook_reports_failure() {
    let fixture = Fixture::blog(RSS_AND_ATOM);
    let (state, router) = loaded(&fixture, |_| {}).await;

    fixture.write("posts/third.yaml", "slug: third\ntitle: Third\ntags: [golang]\ncreated: 2024-03-01T00:00:00Z\nmodified: 2024-03-01T00:00:00Z\n");

    let res = send(&router, Method::POST, "/webhooks/reload", &[]).await;
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let failure: Value = serde_json::from_str(&body_string(res).await).unwrap();
    assert_eq!(failure["category"], "validation");
    assert_eq!(failure["identifier"], "posts[third].tags");
    assert!(failure["message"].as_str().unwrap().contains("golang"));

    // Still serving generation 1
    assert_eq!(state.snapshot.generation(), 1);
    let res = send(&router, Method::GET, "/rss.xml", &[]).await;
    assert_eq!(res.headers()["x-snapshot-generation"], "1");
}

#[tokio::test]
async fn test_admin_requires_bearer_key() {
    let fixture = Fixture::blog(RSS_AND_ATOM);
    let (_state, router) = loaded(&fixture, |_| {}).await;

    let res = send(&router, Method::GET, "/admin/status", &[]).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let res = send(&router, Method::GET, "/admin/status", &[("authorization", "Bearer nope")]).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let auth = [("authorization", "Bearer test-key")];

    let res = send(&router, Method::GET, "/admin/status", &auth).await;
    assert_eq!(res.status(), StatusCode::OK);
    let status: Value = serde_json::from_str(&body_string(res).await).unwrap();
    assert_eq!(status["phase"], "idle");
    assert_eq!(status["generation"], 1);
    assert_eq!(status["posts"], 2);
    assert!(status["last_failure"].is_null());

    let res = send(&router, Method::GET, "/admin/tags", &auth).await;
    let tags: Value = serde_json::from_str(&body_string(res).await).unwrap();
    let slugs: Vec<&str> = tags.as_array().unwrap().iter().map(|t| t["slug"].as_str().unwrap()).collect();
    assert_eq!(slugs, vec!["rust", "web"]);

    let res = send(&router, Method::GET, "/admin/series", &auth).await;
    let series: Value = serde_json::from_str(&body_string(res).await).unwrap();
    assert_eq!(series[0]["slug"], "tour");

    let res = send(&router, Method::GET, "/admin/tags/rust", &auth).await;
    let rust: Value = serde_json::from_str(&body_string(res).await).unwrap();
    assert_eq!(rust["post_slugs"], serde_json::json!(["second", "first"]));
    assert_eq!(rust["color"], "#dea584");

    let res = send(&router, Method::GET, "/admin/tags/missing", &auth).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = send(&router, Method::GET, "/admin/links", &auth).await;
    let links: Value = serde_json::from_str(&body_string(res).await).unwrap();
    assert_eq!(links[0]["url"], "https://www.rust-lang.org/");

    let res = send(&router, Method::GET, "/admin/routes", &auth).await;
    let routes: Value = serde_json::from_str(&body_string(res).await).unwrap();
    assert_eq!(
        routes,
        serde_json::json!([
            {"kind": "atom", "path": "/atom.xml"},
            {"kind": "rss", "path": "/rss.xml"},
        ])
    );

    let res = send(&router, Method::POST, "/admin/reload", &auth).await;
    assert_eq!(res.status(), StatusCode::OK);
    let report: Value = serde_json::from_str(&body_string(res).await).unwrap();
    assert_eq!(report["generation"], 2);
    assert_eq!(report["trigger"], "admin");
}

#[tokio::test]
async fn test_admin_status_reports_last_failure() {
    let fixture = Fixture::blog(RSS_AND_ATOM);
    let (_state, router) = loaded(&fixture, |_| {}).await;

    fixture.set_feeds("atom:\n  url: relative.xml\n");
    let auth = [("authorization", "Bearer test-key")];
    let res = send(&router, Method::POST, "/admin/reload", &auth).await;
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let res = send(&router, Method::GET, "/admin/status", &auth).await;
    let status: Value = serde_json::from_str(&body_string(res).await).unwrap();
    assert_eq!(status["generation"], 1);
    assert_eq!(status["last_failure"]["category"], "build");
    assert_eq!(status["last_failure"]["identifier"], "atom");
}

#[tokio::test]
async fn test_served_over_tcp() {
    let fixture = Fixture::blog(RSS_AND_ATOM);
    let state = app_state(server_config(&fixture), &fixture);
    state.orchestrator.reload(ReloadTrigger::Startup).await.unwrap();
    let (addr, shutdown) = start_server(state).await;

    let client = reqwest::Client::new();
    let res = client.get(format!("http://{addr}/atom.xml")).send().await.unwrap();
    assert_eq!(res.status(), 200);
    assert!(res.text().await.unwrap().contains("https://blog.example.com/posts/first.html"));

    fixture.set_feeds(RSS_AND_SITEMAP);
    let res = client
        .post(format!("http://{addr}/webhooks/reload"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    let report: WebhookResponse = res.json().await.unwrap();
    assert_eq!(report.generation, 2);

    let res = client.get(format!("http://{addr}/atom.xml")).send().await.unwrap();
    assert_eq!(res.status(), 404);
    let res = client.get(format!("http://{addr}/sitemap.xml")).send().await.unwrap();
    assert_eq!(res.status(), 200);

    shutdown.trigger();
}
