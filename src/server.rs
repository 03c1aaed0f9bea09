use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Result;
use async_trait::async_trait;
use axum::extract::{FromRequestParts, Path, Query, State};
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::catalog::{
    Champion, Element, EquipSlot, Surge, Weapon, WeaponDraft, WeaponFilter, WeaponType,
};
use crate::config::Config;
use crate::loadout::{Loadout, LoadoutDraft};
use crate::recommend::service::recommend;
use crate::recommend::{RecommendError, Recommendation, RecommendationRequest};
use crate::store::Store;

const USER_HEADER: &str = "X-User-Id";

#[derive(Clone)]
pub struct ApiState {
    config: Config,
    db_path: PathBuf,
}

impl ApiState {
    pub fn new(config: Config) -> Self {
        Self {
            db_path: config.resolved_db_path(),
            config,
        }
    }
}

#[derive(Debug, Serialize)]
struct ApiResponse<T: Serialize> {
    ok: bool,
    data: T,
}

#[derive(Debug, Serialize)]
struct ApiErrorBody {
    ok: bool,
    error: String,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl std::fmt::Display) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.to_string(),
        }
    }

    fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }

    fn forbidden(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::FORBIDDEN,
            message: message.into(),
        }
    }

    fn internal(error: impl std::fmt::Display) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: error.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            warn!(error = %self.message, "request failed");
        }
        let body = Json(ApiErrorBody {
            ok: false,
            error: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<RecommendError> for ApiError {
    fn from(error: RecommendError) -> Self {
        match error {
            RecommendError::UnknownSurge(_) => Self::bad_request(error),
            RecommendError::Store(inner) => Self::internal(inner),
        }
    }
}

type ApiResult<T> = std::result::Result<Json<ApiResponse<T>>, ApiError>;

/// Caller identity taken from the `X-User-Id` header.
pub struct UserId(pub String);

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for UserId {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(USER_HEADER)
            .ok_or_else(|| ApiError::bad_request(format!("missing {USER_HEADER} header")))?;
        let value = header
            .to_str()
            .map_err(|_| ApiError::bad_request(format!("invalid {USER_HEADER} header value")))?
            .trim();
        if value.is_empty() {
            return Err(ApiError::bad_request(format!("empty {USER_HEADER} header")));
        }
        Ok(UserId(value.to_string()))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
struct WeaponQuery {
    slot: Option<String>,
    element: Option<String>,
    weapon_type: Option<String>,
}

impl WeaponQuery {
    fn into_filter(self) -> std::result::Result<WeaponFilter, ApiError> {
        Ok(WeaponFilter {
            slot: parse_opt::<EquipSlot>(self.slot)?,
            element: parse_opt::<Element>(self.element)?,
            weapon_type: parse_opt::<WeaponType>(self.weapon_type)?,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
struct AssignRequest {
    weapon_id: i64,
    slot: EquipSlot,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
}

#[derive(Debug, Serialize)]
struct DeletedResponse {
    deleted: bool,
}

#[derive(Debug, Serialize)]
struct RecommendationsResponse {
    surge: String,
    recommendations: Vec<Recommendation>,
}

pub fn build_router(state: ApiState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/v1/config", get(show_config))
        .route("/v1/weapons", get(list_weapons).post(create_weapon))
        .route(
            "/v1/weapons/:id",
            get(get_weapon).put(update_weapon).delete(delete_weapon),
        )
        .route("/v1/champions", get(list_champions))
        .route("/v1/surges", get(list_surges))
        .route("/v1/loadouts", get(list_loadouts).post(create_loadout))
        .route(
            "/v1/loadouts/:id",
            get(get_loadout).put(update_loadout).delete(delete_loadout),
        )
        .route("/v1/loadouts/:id/weapons", post(assign_weapon))
        .route(
            "/v1/loadouts/:id/weapons/:assignment_id",
            delete(unassign_weapon),
        )
        .route("/v1/recommendations", post(recommendations))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn run_server(config: Config, bind: SocketAddr) -> Result<()> {
    let state = ApiState::new(config);
    if state.config.catalog.seed_on_start {
        let report = Store::open(&state.db_path)?.seed_reference_data()?;
        info!(
            weapons = report.weapons,
            champions = report.champions,
            surges = report.surges,
            "catalog ready"
        );
    }

    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind(bind).await?;
    info!("REST API listening on http://{bind}");
    axum::serve(listener, app).await?;
    Ok(())
}

async fn health() -> Json<ApiResponse<HealthResponse>> {
    ok(HealthResponse { status: "ok" })
}

async fn show_config(State(state): State<ApiState>) -> Json<ApiResponse<Config>> {
    ok(state.config)
}

async fn list_weapons(
    State(state): State<ApiState>,
    _user: UserId,
    Query(query): Query<WeaponQuery>,
) -> ApiResult<Vec<Weapon>> {
    let filter = query.into_filter()?;
    let store = open_store(&state)?;
    let weapons = store.list_weapons(&filter).map_err(ApiError::internal)?;
    Ok(ok(weapons))
}

async fn get_weapon(
    State(state): State<ApiState>,
    _user: UserId,
    Path(id): Path<i64>,
) -> ApiResult<Weapon> {
    let store = open_store(&state)?;
    store
        .weapon(id)
        .map_err(ApiError::internal)?
        .map(ok)
        .ok_or_else(|| ApiError::not_found(format!("weapon {id} not found")))
}

async fn create_weapon(
    State(state): State<ApiState>,
    UserId(user): UserId,
    Json(draft): Json<WeaponDraft>,
) -> std::result::Result<(StatusCode, Json<ApiResponse<Weapon>>), ApiError> {
    require_admin(&state, &user)?;
    draft.validate().map_err(ApiError::bad_request)?;
    let store = open_store(&state)?;
    let weapon = store.create_weapon(&draft).map_err(ApiError::internal)?;
    info!(user, weapon_id = weapon.id, name = %weapon.name, "weapon created");
    Ok((StatusCode::CREATED, ok(weapon)))
}

async fn update_weapon(
    State(state): State<ApiState>,
    UserId(user): UserId,
    Path(id): Path<i64>,
    Json(draft): Json<WeaponDraft>,
) -> ApiResult<Weapon> {
    require_admin(&state, &user)?;
    draft.validate().map_err(ApiError::bad_request)?;
    let store = open_store(&state)?;
    if !store.update_weapon(id, &draft).map_err(ApiError::internal)? {
        return Err(ApiError::not_found(format!("weapon {id} not found")));
    }
    store
        .weapon(id)
        .map_err(ApiError::internal)?
        .map(ok)
        .ok_or_else(|| ApiError::not_found(format!("weapon {id} not found")))
}

async fn delete_weapon(
    State(state): State<ApiState>,
    UserId(user): UserId,
    Path(id): Path<i64>,
) -> ApiResult<DeletedResponse> {
    require_admin(&state, &user)?;
    let store = open_store(&state)?;
    if !store.delete_weapon(id).map_err(ApiError::internal)? {
        return Err(ApiError::not_found(format!("weapon {id} not found")));
    }
    info!(user, weapon_id = id, "weapon deleted");
    Ok(ok(DeletedResponse { deleted: true }))
}

async fn list_champions(State(state): State<ApiState>, _user: UserId) -> ApiResult<Vec<Champion>> {
    let store = open_store(&state)?;
    Ok(ok(store.list_champions().map_err(ApiError::internal)?))
}

async fn list_surges(State(state): State<ApiState>, _user: UserId) -> ApiResult<Vec<Surge>> {
    let store = open_store(&state)?;
    Ok(ok(store.list_surges().map_err(ApiError::internal)?))
}

async fn list_loadouts(
    State(state): State<ApiState>,
    UserId(user): UserId,
) -> ApiResult<Vec<Loadout>> {
    let store = open_store(&state)?;
    Ok(ok(store.user_loadouts(&user).map_err(ApiError::internal)?))
}

async fn get_loadout(
    State(state): State<ApiState>,
    UserId(user): UserId,
    Path(id): Path<i64>,
) -> ApiResult<Loadout> {
    let store = open_store(&state)?;
    find_loadout(&store, id, &user).map(ok)
}

async fn create_loadout(
    State(state): State<ApiState>,
    UserId(user): UserId,
    Json(draft): Json<LoadoutDraft>,
) -> std::result::Result<(StatusCode, Json<ApiResponse<Loadout>>), ApiError> {
    draft.validate().map_err(ApiError::bad_request)?;
    let store = open_store(&state)?;
    let loadout = store
        .create_loadout(&user, &draft)
        .map_err(ApiError::internal)?;
    info!(user, loadout_id = loadout.id, "loadout created");
    Ok((StatusCode::CREATED, ok(loadout)))
}

async fn update_loadout(
    State(state): State<ApiState>,
    UserId(user): UserId,
    Path(id): Path<i64>,
    Json(draft): Json<LoadoutDraft>,
) -> ApiResult<Loadout> {
    draft.validate().map_err(ApiError::bad_request)?;
    let store = open_store(&state)?;
    if !store
        .update_loadout(id, &user, &draft)
        .map_err(ApiError::internal)?
    {
        return Err(loadout_not_found(id));
    }
    find_loadout(&store, id, &user).map(ok)
}

async fn delete_loadout(
    State(state): State<ApiState>,
    UserId(user): UserId,
    Path(id): Path<i64>,
) -> ApiResult<DeletedResponse> {
    let store = open_store(&state)?;
    if !store.delete_loadout(id, &user).map_err(ApiError::internal)? {
        return Err(loadout_not_found(id));
    }
    info!(user, loadout_id = id, "loadout deleted");
    Ok(ok(DeletedResponse { deleted: true }))
}

async fn assign_weapon(
    State(state): State<ApiState>,
    UserId(user): UserId,
    Path(id): Path<i64>,
    Json(request): Json<AssignRequest>,
) -> ApiResult<Loadout> {
    let store = open_store(&state)?;
    find_loadout(&store, id, &user)?;
    if store.weapon(request.weapon_id).map_err(ApiError::internal)?.is_none() {
        return Err(ApiError::bad_request(format!(
            "weapon {} not found",
            request.weapon_id
        )));
    }
    store
        .assign_weapon(id, request.weapon_id, request.slot, &user)
        .map_err(ApiError::internal)?;
    find_loadout(&store, id, &user).map(ok)
}

async fn unassign_weapon(
    State(state): State<ApiState>,
    UserId(user): UserId,
    Path((id, assignment_id)): Path<(i64, i64)>,
) -> ApiResult<Loadout> {
    let store = open_store(&state)?;
    let loadout = find_loadout(&store, id, &user)?;
    if !loadout.weapons.iter().any(|a| a.id == assignment_id) {
        return Err(ApiError::not_found(format!(
            "assignment {assignment_id} not found in loadout {id}"
        )));
    }
    store
        .unassign_weapon(assignment_id, &user)
        .map_err(ApiError::internal)?;
    find_loadout(&store, id, &user).map(ok)
}

async fn recommendations(
    State(state): State<ApiState>,
    UserId(user): UserId,
    Json(request): Json<RecommendationRequest>,
) -> ApiResult<RecommendationsResponse> {
    let store = open_store(&state)?;
    let recommendations = recommend(&store, &user, &request)?;
    Ok(ok(RecommendationsResponse {
        surge: request.surge,
        recommendations,
    }))
}

fn find_loadout(store: &Store, id: i64, owner: &str) -> std::result::Result<Loadout, ApiError> {
    store
        .loadout(id, owner)
        .map_err(ApiError::internal)?
        .ok_or_else(|| loadout_not_found(id))
}

fn loadout_not_found(id: i64) -> ApiError {
    ApiError::not_found(format!("loadout {id} not found"))
}

fn require_admin(state: &ApiState, user: &str) -> std::result::Result<(), ApiError> {
    if state.config.is_admin(user) {
        Ok(())
    } else {
        Err(ApiError::forbidden("catalog changes require an admin user"))
    }
}

fn parse_opt<T>(value: Option<String>) -> std::result::Result<Option<T>, ApiError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .filter(|v| !v.trim().is_empty())
        .map(|v| v.parse::<T>().map_err(ApiError::bad_request))
        .transpose()
}

fn ok<T: Serialize>(data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse { ok: true, data })
}

fn open_store(state: &ApiState) -> std::result::Result<Store, ApiError> {
    Store::open(&state.db_path).map_err(ApiError::internal)
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;

    struct Harness {
        _dir: tempfile::TempDir,
        app: Router,
    }

    fn harness() -> Harness {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut config = Config::default();
        config.storage.db_path = dir.path().join("api.db").display().to_string();
        config.catalog.admin_users = vec!["zavala".to_string()];
        let state = ApiState::new(config);
        Store::open(&state.db_path)
            .expect("open store")
            .seed_reference_data()
            .expect("seed");
        Harness {
            _dir: dir,
            app: build_router(state),
        }
    }

    async fn call(
        app: &Router,
        method: Method,
        uri: &str,
        user: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(user) = user {
            builder = builder.header(USER_HEADER, user);
        }
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let resp = app.clone().oneshot(request).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn weapon_id(app: &Router, name: &str) -> i64 {
        let (_, body) = call(app, Method::GET, "/v1/weapons", Some("alice"), None).await;
        body["data"]
            .as_array()
            .unwrap()
            .iter()
            .find(|w| w["name"] == name)
            .and_then(|w| w["id"].as_i64())
            .unwrap()
    }

    #[tokio::test]
    async fn health_needs_no_user() {
        let h = harness();
        let (status, body) = call(&h.app, Method::GET, "/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["status"], "ok");
    }

    #[tokio::test]
    async fn missing_user_header_is_rejected() {
        let h = harness();
        let (status, body) = call(&h.app, Method::GET, "/v1/loadouts", None, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["ok"], false);
    }

    #[tokio::test]
    async fn weapons_can_be_filtered_by_query() {
        let h = harness();
        let (status, body) = call(
            &h.app,
            Method::GET,
            "/v1/weapons?slot=heavy&element=solar",
            Some("alice"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let weapons = body["data"].as_array().unwrap();
        assert!(!weapons.is_empty());
        assert!(weapons
            .iter()
            .all(|w| w["slot"] == "heavy" && w["element"] == "solar"));

        let (status, _) = call(
            &h.app,
            Method::GET,
            "/v1/weapons?element=plasma",
            Some("alice"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn catalog_writes_require_admin() {
        let h = harness();
        let draft = json!({
            "name": "Ace of Spades",
            "weapon_type": "hand_cannon",
            "element": "kinetic",
            "slot": "primary",
            "ammo_type": "primary"
        });
        let (status, _) = call(
            &h.app,
            Method::POST,
            "/v1/weapons",
            Some("alice"),
            Some(draft.clone()),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, body) =
            call(&h.app, Method::POST, "/v1/weapons", Some("zavala"), Some(draft)).await;
        assert_eq!(status, StatusCode::CREATED);
        let id = body["data"]["id"].as_i64().unwrap();

        let (status, _) = call(&h.app, Method::DELETE, &format!("/v1/weapons/{id}"), Some("zavala"), None).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = call(&h.app, Method::GET, &format!("/v1/weapons/{id}"), Some("zavala"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn loadout_lifecycle_and_recommendation() {
        let h = harness();
        let (status, body) = call(
            &h.app,
            Method::POST,
            "/v1/loadouts",
            Some("alice"),
            Some(json!({ "name": "Solar sweep" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let loadout_id = body["data"]["id"].as_i64().unwrap();

        let gjallarhorn = weapon_id(&h.app, "Gjallarhorn").await;
        let (status, body) = call(
            &h.app,
            Method::POST,
            &format!("/v1/loadouts/{loadout_id}/weapons"),
            Some("alice"),
            Some(json!({ "weapon_id": gjallarhorn, "slot": "heavy" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["weapons"].as_array().unwrap().len(), 1);

        // other users cannot see it
        let (status, _) = call(&h.app, Method::GET, &format!("/v1/loadouts/{loadout_id}"), Some("bob"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = call(
            &h.app,
            Method::POST,
            "/v1/recommendations",
            Some("alice"),
            Some(json!({ "surge": "Solar Surge", "champion_ids": [] })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let ranked = body["data"]["recommendations"].as_array().unwrap();
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0]["score"], 30);
        assert_eq!(ranked[0]["reasons"][0], "1/1 weapons match active surge (Solar)");

        let assignment_id = body["data"]["recommendations"][0]["loadout"]["weapons"][0]["id"]
            .as_i64()
            .unwrap();
        let (status, body) = call(
            &h.app,
            Method::DELETE,
            &format!("/v1/loadouts/{loadout_id}/weapons/{assignment_id}"),
            Some("alice"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["data"]["weapons"].as_array().unwrap().is_empty());

        let (status, _) = call(&h.app, Method::DELETE, &format!("/v1/loadouts/{loadout_id}"), Some("alice"), None).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn unknown_surge_is_a_bad_request() {
        let h = harness();
        let (status, body) = call(
            &h.app,
            Method::POST,
            "/v1/recommendations",
            Some("alice"),
            Some(json!({ "surge": "Strand Surge" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "invalid surge selected: Strand Surge");
    }

    #[tokio::test]
    async fn blank_loadout_name_is_rejected() {
        let h = harness();
        let (status, body) = call(
            &h.app,
            Method::POST,
            "/v1/loadouts",
            Some("alice"),
            Some(json!({ "name": "  " })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "name is required");
    }
}
