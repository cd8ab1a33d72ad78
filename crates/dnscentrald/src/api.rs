//! HTTP surface of the dashboard
//!
//! Every request builds its own client from the [`ClientFactory`], runs
//! its query inside one provider session and releases the session before
//! answering. No state is shared between requests apart from the static
//! configuration held in [`AppState`].

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
};
use dnscentral_core::{
    Aggregator, DomainFilter, DomainSummary, Error, IpMatch, NetcupCredentials, ServerDirectory,
    ServerGroup,
};
use dnscentral_netcup::{NetcupClient, RpcTransport};
use indexmap::IndexMap;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, error};

/// Client type used by request handlers
pub type DashboardClient = NetcupClient<Arc<dyn RpcTransport>>;

const STATUS_SUCCESS: &str = "success";
const STATUS_ERROR: &str = "error";

static INDEX_HTML: &str = include_str!("../static/index.html");

/// Builds a fresh, session-less client per request
#[derive(Clone)]
pub struct ClientFactory {
    credentials: NetcupCredentials,
    transport: Arc<dyn RpcTransport>,
}

impl ClientFactory {
    pub fn new(credentials: NetcupCredentials, transport: Arc<dyn RpcTransport>) -> Self {
        Self {
            credentials,
            transport,
        }
    }

    pub fn client(&self) -> DashboardClient {
        NetcupClient::new(self.credentials.clone(), Arc::clone(&self.transport))
    }
}

/// Shared, read-only state of the dashboard
#[derive(Clone)]
pub struct AppState {
    pub factory: ClientFactory,
    pub servers: Arc<ServerDirectory>,
    pub filter: Arc<DomainFilter>,
}

impl AppState {
    pub fn new(factory: ClientFactory, servers: ServerDirectory, filter: DomainFilter) -> Self {
        Self {
            factory,
            servers: Arc::new(servers),
            filter: Arc::new(filter),
        }
    }
}

#[derive(Debug, Serialize)]
struct DomainsResponse {
    status: &'static str,
    domains: Vec<DomainSummary>,
}

#[derive(Debug, Serialize)]
struct DomainsByIpResponse {
    status: &'static str,
    ip: String,
    domains: Vec<IpMatch>,
}

#[derive(Debug, Serialize)]
struct ServersResponse {
    status: &'static str,
    servers: IndexMap<String, ServerGroup>,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    netcup: bool,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    status: &'static str,
    message: String,
}

/// A failed request, answered with 500 and `{status: "error", message}`
#[derive(Debug)]
pub struct ApiError(Error);

impl From<Error> for ApiError {
    fn from(e: Error) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        error!("Request failed: {}", self.0);
        let body = ErrorResponse {
            status: STATUS_ERROR,
            message: self.0.to_string(),
        };
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

/// Dashboard routes
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/domains", get(api_domains))
        .route("/api/domains/by-ip/{ip}", get(api_domains_by_ip))
        .route("/api/servers", get(api_servers))
        .route("/api/health", get(api_health))
        .with_state(state)
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn api_domains(State(state): State<AppState>) -> Result<Json<DomainsResponse>, ApiError> {
    let AppState {
        factory,
        servers,
        filter,
    } = state;

    let domains = factory
        .client()
        .with_session(move |c| {
            Box::pin(async move {
                let mut aggregator = Aggregator::new(c, &servers, &filter);
                aggregator.domain_summaries().await
            })
        })
        .await?;

    Ok(Json(DomainsResponse {
        status: STATUS_SUCCESS,
        domains,
    }))
}

async fn api_domains_by_ip(
    State(state): State<AppState>,
    Path(ip): Path<String>,
) -> Result<Json<DomainsByIpResponse>, ApiError> {
    let AppState {
        factory,
        servers,
        filter,
    } = state;
    let target = ip.clone();

    let domains = factory
        .client()
        .with_session(move |c| {
            Box::pin(async move {
                let mut aggregator = Aggregator::new(c, &servers, &filter);
                aggregator.domains_by_ip(&target).await
            })
        })
        .await?;

    Ok(Json(DomainsByIpResponse {
        status: STATUS_SUCCESS,
        ip,
        domains,
    }))
}

async fn api_servers(State(state): State<AppState>) -> Result<Json<ServersResponse>, ApiError> {
    let AppState {
        factory,
        servers,
        filter,
    } = state;

    let groups = factory
        .client()
        .with_session(move |c| {
            Box::pin(async move {
                let mut aggregator = Aggregator::new(c, &servers, &filter);
                aggregator.servers().await
            })
        })
        .await?;

    Ok(Json(ServersResponse {
        status: STATUS_SUCCESS,
        servers: groups,
    }))
}

/// Reports whether a provider session can be opened; never fails
async fn api_health(State(state): State<AppState>) -> Json<HealthResponse> {
    let result = state
        .factory
        .client()
        .with_session(|_| Box::pin(async { Ok(()) }))
        .await;

    if let Err(ref e) = result {
        debug!("Health check failed: {}", e);
    }

    Json(HealthResponse {
        netcup: result.is_ok(),
    })
}
