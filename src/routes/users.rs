//! User CRUD endpoints
//!
//! ## Endpoints
//!
//! - `POST /users` - Create a user (any supplied `id` is replaced)
//! - `GET /users` - List all users
//! - `GET /users/{id}` - Get a user by id
//! - `GET /users/un/{username}` - Get the first user with this username
//! - `PUT /users` - Set every field of the user with the body's `id`
//! - `DELETE /users/{id}` - Delete a user, responds with the deleted count
//!
//! Each handler performs exactly one storage call. Errors are returned to
//! [`dispatch`], which renders them as JSON failure responses.

use bson::oid::ObjectId;
use bytes::Bytes;
use http_body_util::Full;
use hyper::header::{HeaderValue, CONTENT_TYPE};
use hyper::{Method, Response, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::db::UserDoc;
use crate::server::AppState;
use crate::types::{Result, User, UserbaseError};

type FullBody = Full<Bytes>;

// =============================================================================
// Request/Response Types
// =============================================================================

/// Body of a delete response
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct DeleteResponse {
    /// Number of deleted documents (0 or 1)
    pub status: u64,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
    code: &'static str,
}

// =============================================================================
// Response Helpers
// =============================================================================

fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response<FullBody> {
    let json = serde_json::to_string(body).unwrap_or_else(|_| "{}".to_string());
    let mut response = Response::new(Full::new(Bytes::from(json)));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    response
}

/// Render an error as `{"error": ..., "code": ...}`
pub fn error_response(err: UserbaseError) -> Response<FullBody> {
    let code = err.code();
    let (status, message) = err.into_status_code_and_body();
    json_response(
        status,
        &ErrorResponse {
            error: message,
            code,
        },
    )
}

// =============================================================================
// Route Handler
// =============================================================================

#[derive(Debug, PartialEq)]
enum Route<'a> {
    /// `/users`
    Collection,
    /// `/users/{id}`
    ById(&'a str),
    /// `/users/un/{username}`
    ByUsername(&'a str),
}

fn parse_route(path: &str) -> Option<Route<'_>> {
    let path = match path.strip_suffix('/') {
        Some(trimmed) if !trimmed.is_empty() => trimmed,
        _ => path,
    };

    let rest = path.strip_prefix("/users")?;
    if rest.is_empty() {
        return Some(Route::Collection);
    }

    let rest = rest.strip_prefix('/')?;
    if let Some(username) = rest.strip_prefix("un/") {
        return (!username.is_empty() && !username.contains('/'))
            .then_some(Route::ByUsername(username));
    }

    (!rest.is_empty() && !rest.contains('/')).then_some(Route::ById(rest))
}

/// Route a request with an already collected body
pub async fn dispatch(
    state: &AppState,
    method: &Method,
    path: &str,
    body: Bytes,
) -> Response<FullBody> {
    let result = match (method, parse_route(path)) {
        (&Method::POST, Some(Route::Collection)) => handle_create_user(state, &body).await,
        (&Method::GET, Some(Route::Collection)) => handle_list_users(state).await,
        (&Method::GET, Some(Route::ById(id))) => handle_get_user(state, id).await,
        (&Method::GET, Some(Route::ByUsername(username))) => {
            handle_get_user_by_username(state, username).await
        }
        (&Method::PUT, Some(Route::Collection)) => handle_update_user(state, &body).await,
        (&Method::DELETE, Some(Route::ById(id))) => handle_delete_user(state, id).await,
        _ => Err(UserbaseError::NotFound(format!("No route for {} {}", method, path))),
    };

    result.unwrap_or_else(|err| {
        if err.is_client_error() {
            warn!("{} {} failed: {}", method, path, err);
        } else {
            error!("{} {} failed: {}", method, path, err);
        }
        error_response(err)
    })
}

// =============================================================================
// Endpoint Handlers
// =============================================================================

fn decode_user(body: &[u8]) -> Result<User> {
    Ok(serde_json::from_slice(body)?)
}

fn parse_id(id: &str) -> Result<ObjectId> {
    Ok(ObjectId::parse_str(id)?)
}

/// POST /users
async fn handle_create_user(state: &AppState, body: &[u8]) -> Result<Response<FullBody>> {
    let user = decode_user(body)?;
    let stored = state.store.insert(UserDoc::from(user)).await?;
    let user = User::from(stored);

    if let Some(id) = user.id {
        info!("User {} created", id);
    }
    Ok(json_response(StatusCode::OK, &user))
}

/// GET /users
async fn handle_list_users(state: &AppState) -> Result<Response<FullBody>> {
    let users: Vec<User> = state
        .store
        .find_all()
        .await?
        .into_iter()
        .map(User::from)
        .collect();

    Ok(json_response(StatusCode::OK, &users))
}

/// GET /users/{id}
async fn handle_get_user(state: &AppState, id: &str) -> Result<Response<FullBody>> {
    let oid = parse_id(id)?;
    let user_doc = state
        .store
        .find_by_id(oid)
        .await?
        .ok_or_else(|| UserbaseError::NotFound(format!("User {}", id)))?;

    Ok(json_response(StatusCode::OK, &User::from(user_doc)))
}

/// GET /users/un/{username}
async fn handle_get_user_by_username(
    state: &AppState,
    username: &str,
) -> Result<Response<FullBody>> {
    let username = urlencoding::decode(username)
        .map_err(|e| UserbaseError::BadRequest(format!("Invalid username encoding: {}", e)))?;

    let user_doc = state
        .store
        .find_by_username(&username)
        .await?
        .ok_or_else(|| UserbaseError::NotFound(format!("User with username {:?}", username)))?;

    Ok(json_response(StatusCode::OK, &User::from(user_doc)))
}

/// PUT /users
///
/// Echoes the request body whether or not a user matched.
async fn handle_update_user(state: &AppState, body: &[u8]) -> Result<Response<FullBody>> {
    let user = decode_user(body)?;
    if user.id.is_none() {
        return Err(UserbaseError::BadRequest("User ID is required".into()));
    }

    let matched = state.store.update_fields(&UserDoc::from(user.clone())).await?;
    if matched == 0 {
        debug!("Update matched no user (id {:?})", user.id);
    }

    Ok(json_response(StatusCode::OK, &user))
}

/// DELETE /users/{id}
async fn handle_delete_user(state: &AppState, id: &str) -> Result<Response<FullBody>> {
    let oid = parse_id(id)?;
    let deleted = state.store.delete_by_id(oid).await?;

    if deleted > 0 {
        info!("User {} deleted", id);
    }
    Ok(json_response(StatusCode::OK, &DeleteResponse { status: deleted }))
}
