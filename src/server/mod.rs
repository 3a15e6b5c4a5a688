// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! HTTP host for the widget callback pipeline.
//!
//! Every request first passes through the request-initialization phase. A
//! listener that terminates the request (the callback dispatcher, for any
//! request carrying `widget_ajax`) answers it directly; everything else falls
//! through to the routes.

mod html;

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::{header, StatusCode, Uri};
use axum::middleware::{self, Next};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use url::Url;

use crate::config::{Config, WidgetInstanceConfig};
use crate::dispatch::CallbackDispatcher;
use crate::errors::HostError;
use crate::hooks::ActionHooks;
use crate::nonce::HmacNonces;
use crate::observability::messages::server::ServerListening;
use crate::observability::messages::StructuredLog;
use crate::pipeline::{InitOutcome, RequestPipeline, Termination};
use crate::registry::{WidgetConstruction, WidgetRegistry};
use crate::request::RequestContext;

/// Shared state handed to the middleware and routes.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<RequestPipeline>,
    pub registry: Arc<WidgetRegistry>,
    pub nonces: Arc<HmacNonces>,
    pub widgets: Arc<Vec<WidgetInstanceConfig>>,
    pub public_base_url: Url,
}

/// The assembled host: pipeline wired, ready to serve.
pub struct WidgetHost {
    state: AppState,
    bind_addr: String,
}

impl WidgetHost {
    /// Assemble from configuration, keying nonces with the configured secret.
    pub fn from_config(
        config: &Config,
        registry: WidgetRegistry,
        hooks: ActionHooks,
    ) -> Result<Self, HostError> {
        Self::from_config_with_secret(config, config.nonce.resolve_secret(), registry, hooks)
    }

    /// Like [`WidgetHost::from_config`], with the secret already resolved.
    pub fn from_config_with_secret(
        config: &Config,
        secret: Option<String>,
        registry: WidgetRegistry,
        hooks: ActionHooks,
    ) -> Result<Self, HostError> {
        let secret = secret.ok_or(HostError::MissingNonceSecret)?;
        let nonces = HmacNonces::new(secret.as_bytes(), config.nonce.lifetime_seconds)
            .map_err(|e| HostError::NonceKey(e.to_string()))?;

        Self::with_nonces(config, registry, hooks, Arc::new(nonces))
    }

    pub fn with_nonces(
        config: &Config,
        registry: WidgetRegistry,
        hooks: ActionHooks,
        nonces: Arc<HmacNonces>,
    ) -> Result<Self, HostError> {
        let registry = Arc::new(registry);
        let public_base_url = Url::parse(&config.server.public_base_url)?;

        let dispatcher = Arc::new(CallbackDispatcher::new(
            registry.clone(),
            Arc::new(hooks),
            nonces.clone(),
        ));
        let mut pipeline = RequestPipeline::new();
        dispatcher.load(&mut pipeline)?;

        Ok(Self {
            state: AppState {
                pipeline: Arc::new(pipeline),
                registry,
                nonces,
                widgets: Arc::new(config.widgets.clone()),
                public_base_url,
            },
            bind_addr: config.server.bind_addr.clone(),
        })
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn router(&self) -> Router {
        router(self.state.clone())
    }

    /// Bind the configured address and serve until the process stops.
    pub async fn serve(self) -> Result<(), HostError> {
        let listener = TcpListener::bind(&self.bind_addr).await?;
        self.serve_on(listener).await
    }

    pub async fn serve_on(self, listener: TcpListener) -> Result<(), HostError> {
        let local_addr = listener.local_addr()?.to_string();
        ServerListening {
            bind_addr: &local_addr,
            public_base_url: self.state.public_base_url.as_str(),
            widget_count: self.state.widgets.len(),
        }
        .log();

        axum::serve(listener, self.router()).await?;
        Ok(())
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .fallback(not_found)
        .layer(middleware::from_fn_with_state(state.clone(), run_init_phase))
        .with_state(state)
}

/// Rebuild the absolute request URL from the public base and the request target.
///
/// The target's path and query are copied onto the base verbatim, so a path
/// such as `//other.host/` stays a path and never changes the host.
pub fn request_context(base: &Url, uri: &Uri) -> RequestContext {
    let mut url = base.clone();
    url.set_path(uri.path());
    url.set_query(uri.query());
    RequestContext::from_url(url)
}

async fn run_init_phase(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let ctx = request_context(&state.public_base_url, request.uri());

    match state.pipeline.run_init(&ctx).await {
        InitOutcome::Continue => next.run(request).await,
        InitOutcome::Terminate(termination) => termination_response(termination),
    }
}

/// Turn a pipeline termination into the HTTP response that ends the request.
pub fn termination_response(termination: Termination) -> Response {
    match termination {
        Termination::Exit => StatusCode::OK.into_response(),
        Termination::Respond(ajax) => {
            let status =
                StatusCode::from_u16(ajax.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            (status, [(header::CONTENT_TYPE, ajax.content_type)], ajax.body).into_response()
        }
        Termination::Die { message } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Html(html::fatal_page(&message)),
        )
            .into_response(),
    }
}

async fn not_found() -> StatusCode {
    StatusCode::NOT_FOUND
}

async fn index(State(state): State<AppState>, uri: Uri) -> Html<String> {
    let ctx = request_context(&state.public_base_url, &uri);
    let current = ctx.url();

    let fragments: Vec<String> = state
        .widgets
        .iter()
        .filter_map(|placed| {
            let mut widget = state
                .registry
                .construct(&placed.class, WidgetConstruction::Renderable)?;
            widget.set_id(placed.id.clone());
            let callback_url = widget.ajax_url(current, &placed.class, state.nonces.as_ref());
            Some(widget.render(&callback_url))
        })
        .collect();

    Html(html::index_page(&fragments))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{NonceConfig, ServerConfig};
    use crate::errors::AJAX_NOT_IMPLEMENTED;
    use crate::traits::{AjaxResponse, NonceIssuer};
    use crate::widgets::register_builtin_widgets;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;

    const SECRET: &str = "server-test-secret-0123456789";

    fn test_config() -> Config {
        Config {
            server: ServerConfig {
                bind_addr: "127.0.0.1:0".to_string(),
                public_base_url: "http://widgets.test/".to_string(),
            },
            nonce: NonceConfig {
                secret: Some(SECRET.to_string()),
                lifetime_seconds: 86_400,
            },
            widgets: vec![
                WidgetInstanceConfig {
                    class: "echo".to_string(),
                    id: "echo-1".to_string(),
                },
                WidgetInstanceConfig {
                    class: "hit_counter".to_string(),
                    id: "counter-1".to_string(),
                },
            ],
        }
    }

    fn test_host() -> WidgetHost {
        let mut registry = WidgetRegistry::new();
        register_builtin_widgets(&mut registry).unwrap();
        WidgetHost::from_config(&test_config(), registry, ActionHooks::new()).unwrap()
    }

    async fn body_string(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    /// Start the host on an ephemeral port and return its address.
    async fn spawn_host(host: WidgetHost) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        tokio::spawn(host.serve_on(listener));
        addr
    }

    async fn raw_get(addr: &str, target: &str) -> String {
        let mut stream = TcpStream::connect(addr).await.unwrap();
        let request = format!(
            "GET {} HTTP/1.1\r\nHost: widgets.test\r\nConnection: close\r\n\r\n",
            target
        );
        stream.write_all(request.as_bytes()).await.unwrap();
        let mut raw = String::new();
        stream.read_to_string(&mut raw).await.unwrap();
        raw
    }

    #[test]
    fn test_request_context_uses_public_base() {
        let base = Url::parse("https://widgets.test/").unwrap();
        let uri: Uri = "/blog/post?widget_ajax=echo&x=1".parse().unwrap();

        let ctx = request_context(&base, &uri);
        assert_eq!(ctx.url().as_str(), "https://widgets.test/blog/post?widget_ajax=echo&x=1");
        assert_eq!(ctx.param("x"), Some("1"));
    }

    #[test]
    fn test_request_context_keeps_host_for_double_slash_paths() {
        let base = Url::parse("https://widgets.test/").unwrap();

        let uri: Uri = "//evil.example/x?widget_ajax=echo".parse().unwrap();
        let ctx = request_context(&base, &uri);
        assert_eq!(ctx.url().host_str(), Some("widgets.test"));
        assert_eq!(ctx.url().path(), "//evil.example/x");
        assert_eq!(ctx.param("widget_ajax"), Some("echo"));

        let uri: Uri = "//a:99999/?widget_ajax=echo".parse().unwrap();
        let ctx = request_context(&base, &uri);
        assert_eq!(ctx.url().host_str(), Some("widgets.test"));
        assert_eq!(ctx.param("widget_ajax"), Some("echo"));
    }

    #[tokio::test]
    async fn test_exit_is_empty_ok() {
        let response = termination_response(Termination::Exit);
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, "");
    }

    #[tokio::test]
    async fn test_respond_keeps_status_and_content_type() {
        let response = termination_response(Termination::Respond(AjaxResponse::new(
            202,
            "application/json",
            "{}",
        )));

        assert_eq!(response.status(), StatusCode::ACCEPTED);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
        assert_eq!(body_string(response).await, "{}");
    }

    #[tokio::test]
    async fn test_die_is_fatal_page() {
        let response = termination_response(Termination::Die {
            message: AJAX_NOT_IMPLEMENTED.to_string(),
        });

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body_string(response).await.contains(AJAX_NOT_IMPLEMENTED));
    }

    #[test]
    fn test_missing_secret_is_rejected() {
        let mut config = test_config();
        config.nonce.secret = None;

        let result = WidgetHost::from_config_with_secret(
            &config,
            None,
            WidgetRegistry::new(),
            ActionHooks::new(),
        );
        assert!(matches!(result, Err(HostError::MissingNonceSecret)));
    }

    #[tokio::test]
    async fn test_index_renders_callback_urls() {
        let host = test_host();
        let addr = spawn_host(host).await;

        let raw = raw_get(&addr, "/?page=2").await;
        assert!(raw.starts_with("HTTP/1.1 200"));
        assert!(raw.contains("widget-echo"));
        assert!(raw.contains("widget-hit-counter"));
        assert!(raw.contains("http://widgets.test/?page=2&amp;widget_ajax=echo&amp;widget_id=echo-1&amp;nonce="));
    }

    #[tokio::test]
    async fn test_callback_request_is_answered_by_widget() {
        let host = test_host();
        let nonce = host.state().nonces.create("hit_counter");
        let addr = spawn_host(host).await;

        let target = format!("/?widget_ajax=hit_counter&widget_id=counter-1&nonce={nonce}");
        let raw = raw_get(&addr, &target).await;

        assert!(raw.starts_with("HTTP/1.1 200"));
        assert!(raw.contains("application/json"));
        assert!(raw.contains(r#""hits":1"#));
        assert!(raw.contains(r#""id":"counter-1""#));
    }

    #[tokio::test]
    async fn test_forged_callback_ends_request_silently() {
        let addr = spawn_host(test_host()).await;

        let raw = raw_get(&addr, "/?widget_ajax=echo&nonce=0000000000").await;

        assert!(raw.starts_with("HTTP/1.1 200"));
        assert!(!raw.contains("<html>"));
        assert!(!raw.contains("params"));
    }

    #[tokio::test]
    async fn test_callback_on_any_path_is_dispatched() {
        let host = test_host();
        let nonce = host.state().nonces.create("echo");
        let addr = spawn_host(host).await;

        let target = format!("/blog/post?q=rust&widget_ajax=echo&nonce={nonce}");
        let raw = raw_get(&addr, &target).await;

        assert!(raw.starts_with("HTTP/1.1 200"));
        assert!(raw.contains(r#""q":"rust""#));
    }

    #[tokio::test]
    async fn test_callback_with_double_slash_target_still_terminates() {
        let addr = spawn_host(test_host()).await;

        let raw = raw_get(&addr, "//a:99999/?widget_ajax=echo&nonce=0000000000").await;

        assert!(raw.starts_with("HTTP/1.1 200"));
        assert!(!raw.contains("params"));
    }

    #[tokio::test]
    async fn test_unrouted_path_falls_through_to_404() {
        let addr = spawn_host(test_host()).await;

        let raw = raw_get(&addr, "/nowhere").await;
        assert!(raw.starts_with("HTTP/1.1 404"));
    }
}
