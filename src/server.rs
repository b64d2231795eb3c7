// axum front: turns every incoming request into one Index run
use crate::core::{Result, Settings};
use crate::database::{Database, PgDatabase};
use crate::http::Request;
use crate::index::Index;
use crate::paths::Paths;
use crate::session::{MemorySessionStore, SessionStore};
use axum::Router;
use axum::body::to_bytes;
use axum::extract::{ConnectInfo, State};
use axum::http::request::Parts;
use axum::http::{HeaderName, StatusCode, header};
use axum::response::{IntoResponse, Response};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

/// Предел тела запроса с формой
const BODY_LIMIT: usize = 64 * 1024;

const X_FORWARDED_PROTO: HeaderName = HeaderName::from_static("x-forwarded-proto");

pub type DatabaseFactory = Arc<dyn Fn() -> Box<dyn Database> + Send + Sync>;

/// Общее состояние сервера
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub paths: Arc<Paths>,
    pub store: Arc<dyn SessionStore>,
    pub database: DatabaseFactory,
}

impl AppState {
    /// Состояние с PostgreSQL и хранилищем сессий в памяти
    #[must_use]
    pub fn new(settings: Settings) -> Self {
        Self::with_parts(settings, Arc::new(MemorySessionStore::new()), Arc::new(|| {
            Box::new(PgDatabase::new()) as Box<dyn Database>
        }))
    }

    #[must_use]
    pub fn with_parts(settings: Settings, store: Arc<dyn SessionStore>, database: DatabaseFactory) -> Self {
        Self {
            settings: Arc::new(settings),
            paths: Arc::new(Paths::standard()),
            store,
            database,
        }
    }
}

/// HTTPS по схеме запроса или, если разрешено, по `X-Forwarded-Proto`
fn is_https(parts: &Parts, trust_forwarded_proto: bool) -> bool {
    if parts.uri.scheme_str() == Some("https") {
        return true;
    }
    trust_forwarded_proto
        && parts
            .headers
            .get(&X_FORWARDED_PROTO)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(',').next())
            .is_some_and(|proto| proto.trim().eq_ignore_ascii_case("https"))
}

fn is_form(parts: &Parts) -> bool {
    parts
        .headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("application/x-www-form-urlencoded"))
}

async fn handle(
    State(state): State<AppState>,
    connect: Option<ConnectInfo<SocketAddr>>,
    request: axum::extract::Request,
) -> Response {
    let (parts, body) = request.into_parts();
    let bytes = match to_bytes(body, BODY_LIMIT).await {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!("Failed to read request body: {}", e);
            return StatusCode::PAYLOAD_TOO_LARGE.into_response();
        }
    };

    let target = parts.uri.path_and_query().map_or("/", |target| target.as_str());
    let mut request = Request::new(parts.method.clone(), target)
        .with_headers(parts.headers.clone())
        .with_https(is_https(&parts, state.settings.server.trust_forwarded_proto))
        .with_client(connect.map(|ConnectInfo(address)| address));
    if is_form(&parts) {
        request = request.with_form_body(&String::from_utf8_lossy(&bytes));
    }

    let index = Index::new(&state.settings, &state.paths, state.store.as_ref(), (state.database)(), request);
    index.do_execute().await.into_response()
}

pub fn create_router(state: AppState) -> Router {
    Router::new().fallback(handle).layer(TraceLayer::new_for_http()).with_state(state)
}

/// Периодически удаляет истёкшие сессии из хранилища
pub fn spawn_session_purge(store: Arc<dyn SessionStore>, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period.max(Duration::from_secs(1)));
        loop {
            interval.tick().await;
            match store.purge_expired().await {
                Ok(0) => {}
                Ok(purged) => debug!(purged, "expired sessions removed"),
                Err(e) => warn!("Failed to purge sessions: {}", e),
            }
        }
    })
}

pub async fn serve(state: AppState, listen: &str) -> Result<()> {
    let listener = TcpListener::bind(listen).await?;
    info!("pgsite listening on {}", listener.local_addr()?);

    let purge = spawn_session_purge(
        Arc::clone(&state.store),
        Duration::from_secs(state.settings.session.purge_interval),
    );

    let app = create_router(state);
    let served = axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>()).await;
    purge.abort();
    served?;
    Ok(())
}
