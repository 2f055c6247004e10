//! Route handlers: decode JSON into engine types, serialize every engine
//! call behind one lock, and encode the results back out. Engine validation
//! failures surface as 400s; only a poisoned lock is a 500.

use std::sync::{Arc, Mutex, MutexGuard};

use axum::Json;
use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use clearmine_core::{BoardConfig, GameEngine, GameError};
use tracing::debug;

use crate::proto::{
    AutoMarkResponse, BoardView, ConfigBody, ErrorBody, FlagResponse, PositionBody,
    RevealResponse, SelectionBody,
};

pub type SharedEngine = Arc<Mutex<GameEngine>>;

pub fn router(engine: SharedEngine) -> Router {
    Router::new()
        .route("/api/board", get(get_board).options(preflight))
        .route("/api/reveal", post(post_reveal).options(preflight))
        .route("/api/flag", post(post_flag).options(preflight))
        .route("/api/auto-mark", post(post_auto_mark).options(preflight))
        .route("/api/reset", post(post_reset).options(preflight))
        .layer(axum::middleware::map_response(with_cors_headers))
        .with_state(engine)
}

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Internal(String),
}

impl From<GameError> for ApiError {
    fn from(err: GameError) -> Self {
        Self::BadRequest(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            Self::BadRequest(error) => (StatusCode::BAD_REQUEST, error),
            Self::Internal(error) => (StatusCode::INTERNAL_SERVER_ERROR, error),
        };
        (status, Json(ErrorBody { error })).into_response()
    }
}

fn lock_engine(engine: &SharedEngine) -> Result<MutexGuard<'_, GameEngine>, ApiError> {
    engine
        .lock()
        .map_err(|_| ApiError::Internal("engine lock poisoned".into()))
}

async fn get_board(State(engine): State<SharedEngine>) -> Result<Json<BoardView>, ApiError> {
    let engine = lock_engine(&engine)?;
    Ok(Json(BoardView::from(engine.snapshot())))
}

async fn post_reveal(
    State(engine): State<SharedEngine>,
    Json(body): Json<PositionBody>,
) -> Result<Json<RevealResponse>, ApiError> {
    let position = body.into_position()?;
    let mut engine = lock_engine(&engine)?;
    let result = engine.reveal_cell(position)?;
    debug!(?position, hit_mine = result.hit_mine, "reveal handled");
    let status = engine.status();
    Ok(Json(RevealResponse::new(result, status)))
}

async fn post_flag(
    State(engine): State<SharedEngine>,
    Json(body): Json<PositionBody>,
) -> Result<Json<FlagResponse>, ApiError> {
    let position = body.into_position()?;
    let mut engine = lock_engine(&engine)?;
    let result = engine.toggle_flag(position)?;
    let status = engine.status();
    Ok(Json(FlagResponse::new(result, status)))
}

async fn post_auto_mark(
    State(engine): State<SharedEngine>,
    Json(body): Json<SelectionBody>,
) -> Result<Json<AutoMarkResponse>, ApiError> {
    let selection = body.into_selection();
    let mut engine = lock_engine(&engine)?;
    let result = engine.auto_mark(selection);
    let flags_remaining = engine.flags_remaining();
    let status = engine.status();
    Ok(Json(AutoMarkResponse::new(result, flags_remaining, status)))
}

/// Reset accepts an empty body (reuse the last config) or a full config, so
/// the payload is inspected before any JSON decoding happens.
async fn post_reset(
    State(engine): State<SharedEngine>,
    body: Bytes,
) -> Result<Json<BoardView>, ApiError> {
    let config = parse_optional_config(&body)?;
    let mut engine = lock_engine(&engine)?;
    engine.reset(config)?;
    debug!(?config, "board reset");
    Ok(Json(BoardView::from(engine.snapshot())))
}

fn parse_optional_config(body: &[u8]) -> Result<Option<BoardConfig>, ApiError> {
    if body.iter().all(|byte| byte.is_ascii_whitespace()) {
        return Ok(None);
    }

    let parsed: ConfigBody = serde_json::from_slice(body)
        .map_err(|err| ApiError::BadRequest(format!("invalid board configuration: {err}")))?;
    parsed.into_config().map(Some).map_err(ApiError::from)
}

async fn preflight() -> StatusCode {
    StatusCode::NO_CONTENT
}

/// The browser client is served from a different origin, so every response
/// carries permissive CORS headers.
async fn with_cors_headers(mut response: Response) -> Response {
    let headers = response.headers_mut();
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("content-type"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET,POST,OPTIONS"),
    );
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use clearmine_core::GameStatus;

    fn shared_engine() -> SharedEngine {
        Arc::new(Mutex::new(
            GameEngine::new(BoardConfig::default()).unwrap(),
        ))
    }

    #[tokio::test]
    async fn board_endpoint_returns_the_full_default_grid() {
        let Json(view) = get_board(State(shared_engine())).await.unwrap();

        assert_eq!(view.rows, 16);
        assert_eq!(view.columns, 16);
        assert_eq!(view.mines, 40);
        assert_eq!(view.flags_remaining, 40);
        assert_eq!(view.status, GameStatus::Playing);
        assert_eq!(view.cells.len(), 256);
        assert!(view.cells.iter().all(|cell| !cell.is_mine));
    }

    #[tokio::test]
    async fn reveal_rejects_coordinates_off_the_board() {
        let engine = shared_engine();

        let err = post_reveal(
            State(engine),
            Json(PositionBody {
                row: 99,
                column: 0,
            }),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, ApiError::BadRequest(_)));
    }

    #[tokio::test]
    async fn reveal_reports_updated_cells_and_counters() {
        let engine = shared_engine();

        let Json(response) = post_reveal(
            State(engine.clone()),
            Json(PositionBody { row: 0, column: 0 }),
        )
        .await
        .unwrap();

        assert!(!response.hit_mine);
        assert!(!response.updated_cells.is_empty());
        assert_eq!(response.flags_remaining, 40);
        assert_eq!(response.status, GameStatus::Playing);
    }

    #[tokio::test]
    async fn flag_round_trip_keeps_the_budget() {
        let engine = shared_engine();

        let Json(first) = post_flag(
            State(engine.clone()),
            Json(PositionBody { row: 3, column: 3 }),
        )
        .await
        .unwrap();
        assert_eq!(first.flags_remaining, 39);

        let Json(second) = post_flag(
            State(engine),
            Json(PositionBody { row: 3, column: 3 }),
        )
        .await
        .unwrap();
        assert_eq!(second.flags_remaining, 40);
    }

    #[tokio::test]
    async fn auto_mark_without_deductions_echoes_counters() {
        let engine = shared_engine();

        let Json(response) = post_auto_mark(
            State(engine),
            Json(SelectionBody {
                row_begin: 0,
                col_begin: 0,
                row_end: 15,
                col_end: 15,
            }),
        )
        .await
        .unwrap();

        assert!(response.flagged_cells.is_empty());
        assert_eq!(response.flags_remaining, 40);
        assert_eq!(response.status, GameStatus::Playing);
    }

    #[tokio::test]
    async fn reset_with_a_config_replaces_the_board() {
        let engine = shared_engine();

        let Json(view) = post_reset(
            State(engine),
            Bytes::from_static(br#"{"rows":9,"columns":9,"mines":10}"#),
        )
        .await
        .unwrap();

        assert_eq!(view.rows, 9);
        assert_eq!(view.columns, 9);
        assert_eq!(view.mines, 10);
        assert_eq!(view.flags_remaining, 10);
        assert_eq!(view.cells.len(), 81);
    }

    #[tokio::test]
    async fn reset_with_an_empty_body_reuses_the_config() {
        let engine = shared_engine();

        let Json(view) = post_reset(State(engine), Bytes::from_static(b"  \n"))
            .await
            .unwrap();

        assert_eq!(view.rows, 16);
        assert_eq!(view.mines, 40);
    }

    #[tokio::test]
    async fn reset_rejects_an_invalid_config() {
        let engine = shared_engine();

        let err = post_reset(
            State(engine.clone()),
            Bytes::from_static(br#"{"rows":9,"columns":9,"mines":82}"#),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));

        // The running board is untouched.
        let Json(view) = get_board(State(engine)).await.unwrap();
        assert_eq!(view.rows, 16);
    }
}
