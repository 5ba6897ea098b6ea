//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: route matching, dispatch, error
//! mapping and access logging. Matching ignores the HTTP method.

use crate::config::AppState;
use crate::handler::error::HandlerError;
use crate::handler::static_files;
use crate::http;
use crate::logger::{self, AccessLogEntry};
use crate::routing::Handler;
use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::header::{HeaderName, HeaderValue, REFERER, SERVER, USER_AGENT};
use hyper::{Request, Response, Version};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Main entry point for HTTP request handling
///
/// The request body is never read, so any body type is accepted.
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();
    let path = req.uri().path();

    let mut response = route_request(path, &state).await;
    apply_server_header(&mut response, &state.config.http.server_name);

    if state.config.logging.access_log {
        log_access(&req, &response, peer_addr, started, &state);
    }
    Ok(response)
}

/// Resolve the path and run its handler, mapping failures onto 404/500
async fn route_request(path: &str, state: &AppState) -> Response<Full<Bytes>> {
    let Some(route) = state.router.resolve(path) else {
        logger::log_debug(&format!("No route matched {path}"));
        if state.config.debug {
            let patterns: Vec<&str> = state
                .router
                .routes()
                .iter()
                .map(|r| r.pattern.as_str())
                .collect();
            return http::build_debug_404_response(path, &patterns);
        }
        return http::build_404_response();
    };

    logger::log_debug(&format!("{path} -> {}", route.handler.describe()));
    match dispatch(route.handler, state).await {
        Ok(response) => response,
        Err(err) => {
            logger::log_error(&format!("{path}: {err}"));
            http::build_500_response(&err, state.config.debug)
        }
    }
}

/// Run a single handler
pub async fn dispatch(
    handler: Handler,
    state: &AppState,
) -> Result<Response<Full<Bytes>>, HandlerError> {
    match handler {
        Handler::Index { template } => static_files::serve_index(&state.templates, template).await,
        Handler::Script(asset) => static_files::serve_script(&state.assets, asset).await,
        Handler::Redirect { target } => Ok(http::build_redirect_response(target)),
    }
}

fn apply_server_header(response: &mut Response<Full<Bytes>>, server_name: &str) {
    match HeaderValue::from_str(server_name) {
        Ok(value) => {
            response.headers_mut().insert(SERVER, value);
        }
        Err(_) => logger::log_warning(&format!("Invalid server name header: {server_name:?}")),
    }
}

fn log_access<B>(
    req: &Request<B>,
    response: &Response<Full<Bytes>>,
    peer_addr: SocketAddr,
    started: Instant,
    state: &AppState,
) {
    let header = |name: HeaderName| {
        req.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string)
    };

    let mut entry = AccessLogEntry::new(
        peer_addr.ip().to_string(),
        req.method().to_string(),
        req.uri().path().to_string(),
    );
    entry.query = req.uri().query().map(ToString::to_string);
    entry.http_version = version_label(req.version()).to_string();
    entry.status = response.status().as_u16();
    entry.body_bytes = response
        .body()
        .size_hint()
        .exact()
        .and_then(|n| usize::try_from(n).ok())
        .unwrap_or(0);
    entry.referer = header(REFERER);
    entry.user_agent = header(USER_AGENT);
    entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);

    logger::log_access(&entry, &state.config.logging.access_log_format);
}

const fn version_label(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "0.9",
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        Version::HTTP_3 => "3",
        _ => "1.1",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, Profile};
    use crate::routing::{RouteEntry, Router, TRANSLATE_API_URL};
    use config::{File, FileFormat};
    use http_body_util::BodyExt;
    use std::path::Path;
    use tempfile::TempDir;

    const TR_URL_BODY: &[u8] = b"var Doc = function (sid, url) { this.srv = \"tr-url\"; };";
    const LIB_BODY: &[u8] = b"window.ya_ = window.ya_ || {};";
    const INDEX_BODY: &str = "<!DOCTYPE html><title>landing</title>";

    fn peer() -> SocketAddr {
        "127.0.0.1:50000".parse().unwrap()
    }

    fn site_dir() -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        std::fs::create_dir_all(root.join("assets/yandex")).unwrap();
        std::fs::create_dir_all(root.join("templates/landingpage")).unwrap();
        std::fs::write(root.join("assets/yandex/lib.js"), LIB_BODY).unwrap();
        std::fs::write(root.join("assets/yandex/tr-url.js"), TR_URL_BODY).unwrap();
        std::fs::write(root.join("templates/landingpage/index.html"), INDEX_BODY).unwrap();
        dir
    }

    fn config_for(base_dir: &Path, profile: Profile) -> Config {
        let toml = format!(
            "secret_key = 'test-secret'\n\
             [database]\nurl = 'postgres://db/landing'\n\
             [paths]\nbase_dir = '{}'\n\
             [logging]\naccess_log = false\n\
             [http]\nserver_name = 'landingpage-test'\n",
            base_dir.display()
        );
        Config::from_source(File::from_str(&toml, FileFormat::Toml), profile).unwrap()
    }

    fn state_for(base_dir: &Path, profile: Profile) -> Arc<AppState> {
        Arc::new(AppState::new(config_for(base_dir, profile)).unwrap())
    }

    async fn get(state: &Arc<AppState>, uri: &str) -> Response<Full<Bytes>> {
        let req = Request::builder().uri(uri).body(()).unwrap();
        handle_request(req, Arc::clone(state), peer()).await.unwrap()
    }

    async fn body_of(resp: Response<Full<Bytes>>) -> Bytes {
        resp.into_body().collect().await.unwrap().to_bytes()
    }

    #[tokio::test]
    async fn test_index_renders_template() {
        let dir = site_dir();
        let state = state_for(dir.path(), Profile::Production);

        let resp = get(&state, "/").await;
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.headers().get(SERVER).unwrap(), "landingpage-test");
        assert_eq!(body_of(resp).await.as_ref(), INDEX_BODY.as_bytes());
    }

    #[tokio::test]
    async fn test_scripts_are_served_verbatim() {
        let dir = site_dir();
        let state = state_for(dir.path(), Profile::Production);

        for (uri, expected) in [
            ("/v1.98/js/lib.js", LIB_BODY),
            ("/v1.98/js/lib.js?v=3", LIB_BODY),
            ("/v1.98/js/tr-url.js", TR_URL_BODY),
            ("/v1.98/js/tr-url.js/anything", TR_URL_BODY),
        ] {
            let resp = get(&state, uri).await;
            assert_eq!(resp.status(), 200, "{uri}");
            assert_eq!(
                resp.headers().get("Content-Type").unwrap(),
                "application/x-javascript"
            );
            assert_eq!(body_of(resp).await.as_ref(), expected, "{uri}");
        }
    }

    #[tokio::test]
    async fn test_translate_redirect_ignores_parameters() {
        let dir = site_dir();
        let state = state_for(dir.path(), Profile::Production);

        for uri in [
            "/api/v1/tr/translate",
            "/api/v1/tr/translate?lang=en-ru&text=hello",
            "/api/v1/tr/translate/extra/path?srv=tr-url",
        ] {
            let resp = get(&state, uri).await;
            assert_eq!(resp.status(), 302, "{uri}");
            assert_eq!(resp.headers().get("Location").unwrap(), TRANSLATE_API_URL);
        }
    }

    #[tokio::test]
    async fn test_method_is_ignored() {
        let dir = site_dir();
        let state = state_for(dir.path(), Profile::Production);

        let req = Request::builder()
            .method("POST")
            .uri("/api/v1/tr/translate")
            .body(())
            .unwrap();
        let resp = handle_request(req, Arc::clone(&state), peer()).await.unwrap();
        assert_eq!(resp.status(), 302);
    }

    #[tokio::test]
    async fn test_deleted_script_is_server_error() {
        let dir = site_dir();
        let state = state_for(dir.path(), Profile::Production);

        assert_eq!(get(&state, "/v1.98/js/lib.js").await.status(), 200);
        std::fs::remove_file(dir.path().join("assets/yandex/lib.js")).unwrap();

        let resp = get(&state, "/v1.98/js/lib.js").await;
        assert_eq!(resp.status(), 500);
        // The production body does not leak file system details
        let body = body_of(resp).await;
        assert!(!String::from_utf8_lossy(&body).contains("lib.js"));
    }

    #[tokio::test]
    async fn test_missing_template_is_server_error_with_debug_detail() {
        let dir = site_dir();
        std::fs::remove_file(dir.path().join("templates/landingpage/index.html")).unwrap();
        let state = state_for(dir.path(), Profile::Development);

        let resp = get(&state, "/").await;
        assert_eq!(resp.status(), 500);
        let body = String::from_utf8_lossy(&body_of(resp).await).into_owned();
        assert!(body.contains("landingpage/index.html"));
        // The io error appears once, as the cause line
        assert_eq!(body.matches("os error").count(), 1, "{body}");
        assert!(body.contains("caused by:"));
    }

    #[tokio::test]
    async fn test_percent_encoded_path_is_routed() {
        let dir = site_dir();
        let state = state_for(dir.path(), Profile::Production);

        let resp = get(&state, "/v1%2E98/js/lib.js").await;
        assert_eq!(resp.status(), 200);
        assert_eq!(body_of(resp).await.as_ref(), LIB_BODY);

        assert_eq!(get(&state, "/v1.98/js/%FFlib.js").await.status(), 404);
    }

    #[tokio::test]
    async fn test_unmatched_path_is_not_found() {
        let dir = site_dir();

        let state = state_for(dir.path(), Profile::Production);
        let resp = get(&state, "/admin/").await;
        assert_eq!(resp.status(), 404);
        assert_eq!(body_of(resp).await.as_ref(), b"404 Not Found");

        let state = state_for(dir.path(), Profile::Development);
        let resp = get(&state, "/admin/").await;
        assert_eq!(resp.status(), 404);
        let body = String::from_utf8_lossy(&body_of(resp).await).into_owned();
        assert!(body.contains("/admin/"));
        assert!(body.contains(r"^v1\.98/js/lib\.js"));
    }

    #[tokio::test]
    async fn test_custom_route_order_is_respected() {
        let dir = site_dir();
        let router = Router::compile(vec![
            RouteEntry::new("^v1", Handler::Redirect { target: "https://first.example" }),
            RouteEntry::new(
                r"^v1\.98/js/lib\.js",
                Handler::Script(crate::routing::LIB_JS),
            ),
        ])
        .unwrap();
        let state = Arc::new(AppState::with_router(
            config_for(dir.path(), Profile::Production),
            router,
        ));

        let resp = get(&state, "/v1.98/js/lib.js").await;
        assert_eq!(resp.status(), 302);
        assert_eq!(resp.headers().get("Location").unwrap(), "https://first.example");
    }
}
