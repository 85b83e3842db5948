//! JSON endpoints consumed by the viewer

use super::{ApiError, AppState};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use debugview_common::{
    constants::{
        ADD_DATA_PATH, ALL_DATA_PATH, DB_LIST_PATH, DELETE_DATA_PATH, HEALTH_PATH, SERVICE_NAME,
        TABLE_LIST_PATH, UPDATE_DATA_PATH,
    },
    DataPayload, DataQuery, DbListResponse, ErrorResponse, HealthResponse, MutationQuery,
    MutationResponse, TableListQuery, TableListResponse,
};

/// Build the API router
pub fn router() -> Router<AppState> {
    Router::new()
        .route(HEALTH_PATH, get(health_check))
        .route(DB_LIST_PATH, get(get_db_list))
        .route(TABLE_LIST_PATH, get(get_table_list))
        .route(ALL_DATA_PATH, get(get_all_data))
        .route(ADD_DATA_PATH, get(add_data))
        .route(UPDATE_DATA_PATH, get(update_data))
        .route(DELETE_DATA_PATH, get(delete_data))
}

/// Health check, also identifies this service to the viewer
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let databases = state
        .store
        .databases()
        .await
        .map(|dbs| dbs.len())
        .unwrap_or(0);

    Json(HealthResponse {
        service: SERVICE_NAME.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        databases,
    })
}

async fn get_db_list(State(state): State<AppState>) -> Result<Json<DbListResponse>, ApiError> {
    let rows = state.store.databases().await?;
    Ok(Json(DbListResponse { rows }))
}

async fn get_table_list(
    State(state): State<AppState>,
    Query(query): Query<TableListQuery>,
) -> Result<Json<TableListResponse>, ApiError> {
    let rows = state.store.tables(&query.db_name).await?;
    tracing::debug!("getTableList for {}: {:?}", query.db_name, rows);
    Ok(Json(TableListResponse { rows }))
}

async fn get_all_data(
    State(state): State<AppState>,
    Query(query): Query<DataQuery>,
) -> Result<Json<DataPayload>, ApiError> {
    tracing::debug!(
        "getAllData called with dbName={}, tableName={}",
        query.db_name,
        query.table_name
    );
    let payload = state
        .store
        .all_data(&query.db_name, &query.table_name)
        .await?;
    Ok(Json(payload))
}

async fn add_data(State(state): State<AppState>, Query(query): Query<MutationQuery>) -> Response {
    put_value(state, query, "Added successfully").await
}

async fn update_data(State(state): State<AppState>, Query(query): Query<MutationQuery>) -> Response {
    put_value(state, query, "Updated successfully").await
}

async fn delete_data(State(state): State<AppState>, Query(query): Query<MutationQuery>) -> Response {
    if query.key.is_empty() {
        return missing_key();
    }

    match state.store.delete(&query.db_name, &query.key).await {
        Ok(()) => success("Deleted successfully"),
        Err(e) => ApiError(e).into_response(),
    }
}

async fn put_value(state: AppState, query: MutationQuery, message: &str) -> Response {
    if query.key.is_empty() {
        return missing_key();
    }

    let value = query.value.unwrap_or_default();
    tracing::debug!(
        "Writing dbName={}, key={}, value={}",
        query.db_name,
        query.key,
        value
    );

    match state.store.put(&query.db_name, &query.key, &value).await {
        Ok(()) => success(message),
        Err(e) => ApiError(e).into_response(),
    }
}

fn success(message: &str) -> Response {
    Json(MutationResponse {
        success: true,
        message: message.to_string(),
    })
    .into_response()
}

fn missing_key() -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: "Missing key".to_string(),
        }),
    )
        .into_response()
}
