use axum::Json;
use axum::Router;
use axum::extract::{Path, Query, State};
use axum::http::{StatusCode, header::CONTENT_TYPE};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use serde::Deserialize;

use super::config::GraphServiceConfig;
use super::error::ServiceError;
use super::state::ServiceState;
use crate::client::DirectoryLookup;
use crate::types::{DirectoryUser, UserPrincipalName};

/// Create the directory lookup router.
///
/// Registers two routes under the configured base path:
///
/// - `GET|POST {path}?username=<upn>` resolves the principal name and
///   answers `200` `text/plain` with body `User: <id>`.
/// - `GET {path}/{username}` answers `200` with the JSON user record.
///
/// Unknown users answer `404`, a missing or invalid `username` answers
/// `400`, and upstream failures answer `502`.
pub fn user_routes<L: DirectoryLookup>(config: GraphServiceConfig, lookup: L) -> Router {
    let route_path = config.route_path;
    let state = ServiceState::new(lookup);

    Router::new()
        .route(
            &route_path,
            get(lookup_user::<L>).post(lookup_user::<L>),
        )
        .route(&format!("{route_path}/{{username}}"), get(fetch_user::<L>))
        .with_state(state)
}

#[derive(Deserialize)]
struct LookupParams {
    username: Option<String>,
}

async fn lookup_user<L: DirectoryLookup>(
    State(state): State<ServiceState<L>>,
    Query(params): Query<LookupParams>,
) -> Result<Response, ServiceError> {
    let username = parse_username(params.username.ok_or(ServiceError::MissingUsername)?)?;
    tracing::debug!(username = %username, "user id lookup requested");

    let user_id = state.lookup.lookup_user_id(&username).await?;
    tracing::info!(username = %username, user_id = %user_id, "user id lookup succeeded");

    Ok((
        StatusCode::OK,
        [(CONTENT_TYPE, "text/plain; charset=utf-8")],
        format!("User: {user_id}"),
    )
        .into_response())
}

async fn fetch_user<L: DirectoryLookup>(
    State(state): State<ServiceState<L>>,
    Path(username): Path<String>,
) -> Result<Json<DirectoryUser>, ServiceError> {
    let username = parse_username(username)?;
    tracing::debug!(username = %username, "user record fetch requested");

    let user = state.lookup.get_user(&username).await?;
    tracing::info!(username = %username, user_id = %user.id, "user record fetch succeeded");

    Ok(Json(user))
}

fn parse_username(raw: String) -> Result<UserPrincipalName, ServiceError> {
    UserPrincipalName::try_from(raw).map_err(|e| match e {
        crate::error::Error::InvalidPrincipalName(name) => ServiceError::InvalidUsername(name),
        other => ServiceError::Upstream(other.to_string()),
    })
}
