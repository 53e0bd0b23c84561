#![allow(dead_code)]

use async_trait::async_trait;
use axum::Router;
use axum::extract::ConnectInfo;
use axum_test::TestServer;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::mpsc;
use tower::Layer;

use linktrack::domain::allow_list::AllowList;
use linktrack::geo::{GeoError, GeoResolver, LocationLabel};
use linktrack::notify::{Notifier, NotifyError};
use linktrack::routes::app_router;
use linktrack::state::AppState;

/// Injects a fixed peer address so handlers using `ConnectInfo` work under
/// `TestServer`.
#[derive(Clone)]
pub struct MockConnectInfoLayer;

impl<S> Layer<S> for MockConnectInfoLayer {
    type Service = MockConnectInfoService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MockConnectInfoService { inner }
    }
}

#[derive(Clone)]
pub struct MockConnectInfoService<S> {
    inner: S,
}

impl<S, B> tower::Service<axum::http::Request<B>> for MockConnectInfoService<S>
where
    S: tower::Service<axum::http::Request<B>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: axum::http::Request<B>) -> Self::Future {
        let addr: SocketAddr = "127.0.0.1:12345".parse().unwrap();
        req.extensions_mut().insert(ConnectInfo(addr));
        self.inner.call(req)
    }
}

/// Geo double returning a fixed label and counting calls.
pub struct StaticGeo {
    label: &'static str,
    calls: Arc<AtomicUsize>,
}

impl StaticGeo {
    pub fn new(label: &'static str) -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (
            Self {
                label,
                calls: calls.clone(),
            },
            calls,
        )
    }
}

#[async_trait]
impl GeoResolver for StaticGeo {
    async fn resolve(&self, _ip: &str) -> Result<LocationLabel, GeoError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(LocationLabel::new(self.label))
    }
}

/// Geo double that always fails, counting calls.
pub struct FailingGeo {
    calls: Arc<AtomicUsize>,
}

impl FailingGeo {
    pub fn new() -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (
            Self {
                calls: calls.clone(),
            },
            calls,
        )
    }
}

#[async_trait]
impl GeoResolver for FailingGeo {
    async fn resolve(&self, _ip: &str) -> Result<LocationLabel, GeoError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(GeoError::ProviderFailure)
    }
}

/// Notifier double recording delivered messages on a channel.
pub struct RecordingNotifier {
    tx: mpsc::UnboundedSender<String>,
}

impl RecordingNotifier {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, text: &str) -> Result<(), NotifyError> {
        let _ = self.tx.send(text.to_string());
        Ok(())
    }
}

/// Notifier double that always fails delivery.
pub struct FailingNotifier;

#[async_trait]
impl Notifier for FailingNotifier {
    async fn send(&self, _text: &str) -> Result<(), NotifyError> {
        Err(NotifyError::Provider("delivery refused".to_string()))
    }
}

pub fn test_state(
    allowed_hosts: &[&str],
    geo: Arc<dyn GeoResolver>,
    notifier: Arc<dyn Notifier>,
) -> AppState {
    AppState::new(Arc::new(AllowList::new(allowed_hosts)), geo, notifier)
}

pub fn test_app(state: AppState) -> Router {
    app_router(state).layer(MockConnectInfoLayer)
}

pub fn test_server(state: AppState) -> TestServer {
    TestServer::new(test_app(state)).unwrap()
}
