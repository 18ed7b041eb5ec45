// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

mod scheduler;

use std::str::FromStr;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{State as AxumState, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::{NaiveTime, Weekday};
use chrono_tz::Tz;
use clap::Parser;
use roster::RankingSignal;
use roster_api::{
    ApiError, AssignOneRequest, AssignOneResponse, ConsistencyResponse, ErrorKind,
    LifecycleResponse, PlanningRequest, PlanningResponse, ShiftStatusRequest, ShiftStatusResponse,
    UnassignOneRequest, UnassignOneResponse, assign_one, check_consistency,
    run_assignment_engine, unassign_one, update_shift_status,
};
use roster_domain::{
    DEFAULT_HOUR_CAP, DEFAULT_RETENTION_COUNT, DEFAULT_SHIFT_HOURS, SchedulingPolicy,
};
use roster_store::SqliteStore;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::{error, info, warn};

use crate::scheduler::{LifecycleSchedule, run_lifecycle_now, run_scheduler};

/// Roster Server - HTTP server for shift scheduling
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long)]
    database: Option<String>,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// IANA timezone the lifecycle schedule and "today" are read in
    #[arg(long, default_value = "Europe/Paris")]
    timezone: String,

    /// Weekday of the weekly lifecycle run
    #[arg(long, default_value = "monday")]
    lifecycle_weekday: String,

    /// Local time (HH:MM) of the weekly lifecycle run
    #[arg(long, default_value = "03:00")]
    lifecycle_time: String,

    /// Number of weeks kept in the rolling window
    #[arg(long, default_value_t = DEFAULT_RETENTION_COUNT)]
    retention_weeks: usize,

    /// Maximum accumulated hours for students
    #[arg(long, default_value_t = DEFAULT_HOUR_CAP)]
    hour_cap: u32,

    /// Hours credited per assigned shift
    #[arg(long, default_value_t = DEFAULT_SHIFT_HOURS)]
    shift_hours: u32,

    /// Default ranking for students (`points` or `productivity`)
    #[arg(long, default_value = "points")]
    ranking: String,

    /// Do not start the weekly lifecycle trigger
    #[arg(long)]
    disable_scheduler: bool,
}

/// Settings derived from the command line.
#[derive(Debug, Clone)]
struct ServerConfig {
    policy: SchedulingPolicy,
    ranking: RankingSignal,
    schedule: LifecycleSchedule,
}

/// Validates the command line into a [`ServerConfig`].
fn build_config(args: &Args) -> Result<ServerConfig, String> {
    let timezone: Tz = args
        .timezone
        .parse()
        .map_err(|_| format!("Unknown timezone '{}'", args.timezone))?;
    let weekday: Weekday = args
        .lifecycle_weekday
        .parse()
        .map_err(|_| format!("Unknown weekday '{}'", args.lifecycle_weekday))?;
    let time: NaiveTime = NaiveTime::parse_from_str(&args.lifecycle_time, "%H:%M")
        .map_err(|e| format!("Invalid lifecycle time '{}': {e}", args.lifecycle_time))?;
    let ranking: RankingSignal = RankingSignal::from_str(&args.ranking)?;

    let policy: SchedulingPolicy = SchedulingPolicy {
        retention_count: args.retention_weeks,
        hour_cap: args.hour_cap,
        shift_hours: args.shift_hours,
        ..SchedulingPolicy::default()
    };
    policy.validate().map_err(|e| e.to_string())?;

    Ok(ServerConfig {
        policy,
        ranking,
        schedule: LifecycleSchedule {
            weekday,
            time,
            timezone,
        },
    })
}

/// Application state shared across handlers.
#[derive(Clone)]
struct AppState {
    /// The record store.
    store: Arc<SqliteStore>,
    /// Scheduling rules.
    policy: Arc<SchedulingPolicy>,
    /// Student ranking used when a planning request does not name one.
    ranking: RankingSignal,
    /// Timezone "today" is computed in.
    timezone: Tz,
}

/// Error response type.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Error indicator.
    error: bool,
    /// One of `validation`, `not_found`, `constraint_violation`, `store_failure`.
    kind: String,
    /// The failed constraint, for constraint violations.
    #[serde(skip_serializing_if = "Option::is_none")]
    constraint: Option<String>,
    /// Error message.
    message: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The error kind.
    kind: ErrorKind,
    /// The failed constraint, if any.
    constraint: Option<&'static str>,
    /// The error message.
    message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            kind: self.kind.as_str().to_string(),
            constraint: self.constraint.map(str::to_string),
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let kind: ErrorKind = err.kind();
        let status: StatusCode = match kind {
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::ConstraintViolation => StatusCode::CONFLICT,
            ErrorKind::StoreFailure => {
                error!(error = %err, "Record store failure");
                StatusCode::SERVICE_UNAVAILABLE
            }
        };
        Self {
            status,
            kind,
            constraint: err.constraint(),
            message: err.to_string(),
        }
    }
}

impl From<JsonRejection> for HttpError {
    fn from(rejection: JsonRejection) -> Self {
        warn!(error = %rejection.body_text(), "Rejected request body");
        Self {
            status: StatusCode::BAD_REQUEST,
            kind: ErrorKind::Validation,
            constraint: None,
            message: rejection.body_text(),
        }
    }
}

async fn handle_update_shift_status(
    AxumState(app_state): AxumState<AppState>,
    payload: Result<Json<ShiftStatusRequest>, JsonRejection>,
) -> Result<Json<ShiftStatusResponse>, HttpError> {
    let Json(req) = payload?;
    info!(shift_id = ?req.shift_id, status = ?req.status, "Handling shift status request");
    let response: ShiftStatusResponse = update_shift_status(app_state.store.as_ref(), &req).await?;
    Ok(Json(response))
}

async fn handle_run_planning(
    AxumState(app_state): AxumState<AppState>,
    payload: Result<Json<PlanningRequest>, JsonRejection>,
) -> Result<Json<PlanningResponse>, HttpError> {
    let Json(mut req) = payload?;
    if req.ranking.is_none() {
        req.ranking = Some(app_state.ranking.to_string());
    }
    info!(week_id = ?req.week_id, shift_ids = ?req.shift_ids, "Handling planning run");
    let response: PlanningResponse = run_assignment_engine(
        app_state.store.as_ref(),
        &req,
        OffsetDateTime::now_utc(),
        &app_state.policy,
    )
    .await?;
    Ok(Json(response))
}

async fn handle_assign(
    AxumState(app_state): AxumState<AppState>,
    payload: Result<Json<AssignOneRequest>, JsonRejection>,
) -> Result<Json<AssignOneResponse>, HttpError> {
    let Json(req) = payload?;
    info!(shift_id = ?req.shift_id, application_id = ?req.application_id, "Handling assign request");
    let response: AssignOneResponse = assign_one(
        app_state.store.as_ref(),
        &req,
        OffsetDateTime::now_utc(),
        &app_state.policy,
    )
    .await?;
    Ok(Json(response))
}

async fn handle_unassign(
    AxumState(app_state): AxumState<AppState>,
    payload: Result<Json<UnassignOneRequest>, JsonRejection>,
) -> Result<Json<UnassignOneResponse>, HttpError> {
    let Json(req) = payload?;
    info!(shift_id = ?req.shift_id, worker_id = ?req.worker_id, "Handling unassign request");
    let response: UnassignOneResponse =
        unassign_one(app_state.store.as_ref(), &req, &app_state.policy).await?;
    Ok(Json(response))
}

async fn handle_run_lifecycle(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<LifecycleResponse>, HttpError> {
    info!("Handling on-demand lifecycle run");
    let response: LifecycleResponse = run_lifecycle_now(
        app_state.store.as_ref(),
        &app_state.policy,
        app_state.timezone,
    )
    .await?;
    Ok(Json(response))
}

async fn handle_consistency(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<ConsistencyResponse>, HttpError> {
    let response: ConsistencyResponse =
        check_consistency(app_state.store.as_ref(), &app_state.policy).await?;
    Ok(Json(response))
}

fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/shifts/status", post(handle_update_shift_status))
        .route("/planning/run", post(handle_run_planning))
        .route("/assignments", post(handle_assign))
        .route("/assignments/unassign", post(handle_unassign))
        .route("/lifecycle/run", post(handle_run_lifecycle))
        .route("/consistency", get(handle_consistency))
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let args: Args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing Roster Server");
    let config: ServerConfig = build_config(&args)?;

    // Initialize the record store (in-memory or file-based based on CLI argument)
    let store: SqliteStore = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        SqliteStore::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        SqliteStore::new_in_memory()?
    };

    let app_state: AppState = AppState {
        store: Arc::new(store),
        policy: Arc::new(config.policy),
        ranking: config.ranking,
        timezone: config.schedule.timezone,
    };

    if args.disable_scheduler {
        info!("Weekly lifecycle trigger disabled");
    } else {
        info!(
            weekday = %config.schedule.weekday,
            time = %config.schedule.time,
            timezone = %config.schedule.timezone,
            "Starting weekly lifecycle trigger"
        );
        tokio::spawn(run_scheduler(
            Arc::clone(&app_state.store),
            Arc::clone(&app_state.policy),
            config.schedule,
        ));
    }

    // Build router
    let app: Router = build_router(app_state);

    // Bind to address
    let addr: std::net::SocketAddr = format!("127.0.0.1:{}", args.port).parse()?;
    info!("Server listening on {}", addr);

    // Run server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode as HttpStatusCode},
    };
    use roster_domain::{
        Application, ApplicationStatus, ContractType, WeekId, Worker, parse_week_id,
    };
    use roster_store::{RecordStore, StorePath, WriteBatch};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    /// Helper to create test app state with an in-memory database.
    fn create_test_app_state() -> AppState {
        let store: SqliteStore =
            SqliteStore::new_in_memory().expect("Failed to create in-memory store");
        AppState {
            store: Arc::new(store),
            policy: Arc::new(SchedulingPolicy::default()),
            ranking: RankingSignal::Points,
            timezone: chrono_tz::Europe::Paris,
        }
    }

    fn create_test_args() -> Args {
        Args::parse_from(["roster-server"])
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request: Request<Body> = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(body.map_or_else(Body::empty, |b| Body::from(b.to_string())))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        let status: StatusCode = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);
        (status, json)
    }

    /// Runs the lifecycle and returns the Monday of the third week, which
    /// is open to applications.
    async fn seed_window(app: &Router) -> String {
        let (status, body) = send(app, "POST", "/lifecycle/run", None).await;
        assert_eq!(status, HttpStatusCode::OK);
        let created: Vec<Value> = body["created_weeks"].as_array().unwrap().clone();
        assert_eq!(created.len(), 7);
        let week_id: &str = created[2].as_str().unwrap();
        let monday: time::Date = parse_week_id(&WeekId::new(week_id)).unwrap();
        monday.to_string()
    }

    async fn seed_student(store: &SqliteStore, shift_id: &str, capacity: u32) {
        let mut worker: Worker = Worker::new("stu-1".into(), ContractType::HourCapped);
        worker.points = 10.0;
        let application: Application = Application {
            application_id: "a1".into(),
            shift_id: shift_id.into(),
            worker_id: "stu-1".into(),
            status: ApplicationStatus::Applied,
            application_date: OffsetDateTime::UNIX_EPOCH,
        };
        let mut batch: WriteBatch = WriteBatch::new();
        batch
            .set(StorePath::parse("workers/stu-1").unwrap(), &worker)
            .unwrap();
        batch
            .set(StorePath::parse("applications/a1").unwrap(), &application)
            .unwrap();
        batch
            .set(
                StorePath::parse(&format!("shifts/{shift_id}/max_workers")).unwrap(),
                &capacity,
            )
            .unwrap();
        store.write(batch).await.unwrap();
    }

    #[test]
    fn test_default_config_matches_policy_defaults() {
        let config: ServerConfig = build_config(&create_test_args()).unwrap();
        assert_eq!(config.policy, SchedulingPolicy::default());
        assert_eq!(config.ranking, RankingSignal::Points);
        assert_eq!(config.schedule.weekday, Weekday::Mon);
        assert_eq!(
            config.schedule.time,
            NaiveTime::from_hms_opt(3, 0, 0).unwrap()
        );
        assert_eq!(config.schedule.timezone, chrono_tz::Europe::Paris);
    }

    #[test]
    fn test_bad_config_is_rejected() {
        let mut args: Args = create_test_args();
        args.timezone = String::from("Mars/Olympus");
        assert!(build_config(&args).is_err());

        let mut args: Args = create_test_args();
        args.lifecycle_time = String::from("25:00");
        assert!(build_config(&args).is_err());

        let mut args: Args = create_test_args();
        args.retention_weeks = 0;
        assert!(build_config(&args).is_err());

        let mut args: Args = create_test_args();
        args.ranking = String::from("seniority");
        assert!(build_config(&args).is_err());
    }

    #[tokio::test]
    async fn test_shift_status_round_trip() {
        let app: Router = build_router(create_test_app_state());
        let monday: String = seed_window(&app).await;

        let (status, body) = send(
            &app,
            "POST",
            "/shifts/status",
            Some(json!({"shift_id": monday, "status": "closed"})),
        )
        .await;

        assert_eq!(status, HttpStatusCode::OK);
        assert_eq!(body, json!({"shift_id": monday, "status": "closed"}));
    }

    #[tokio::test]
    async fn test_shift_status_missing_field_is_bad_request() {
        let app: Router = build_router(create_test_app_state());

        let (status, body) = send(
            &app,
            "POST",
            "/shifts/status",
            Some(json!({"shift_id": "2026-11-02"})),
        )
        .await;

        assert_eq!(status, HttpStatusCode::BAD_REQUEST);
        assert_eq!(body["error"], json!(true));
        assert_eq!(body["kind"], json!("validation"));
    }

    #[tokio::test]
    async fn test_shift_status_unknown_shift_is_not_found() {
        let app: Router = build_router(create_test_app_state());

        let (status, body) = send(
            &app,
            "POST",
            "/shifts/status",
            Some(json!({"shift_id": "2030-01-01", "status": "closed"})),
        )
        .await;

        assert_eq!(status, HttpStatusCode::NOT_FOUND);
        assert_eq!(body["kind"], json!("not_found"));
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        let app: Router = build_router(create_test_app_state());
        let request: Request<Body> = Request::builder()
            .method("POST")
            .uri("/shifts/status")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), HttpStatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_lifecycle_run_twice_creates_nothing_new() {
        let app: Router = build_router(create_test_app_state());
        seed_window(&app).await;

        let (status, body) = send(&app, "POST", "/lifecycle/run", None).await;

        assert_eq!(status, HttpStatusCode::OK);
        assert_eq!(body["batches_written"], json!(0));
    }

    #[tokio::test]
    async fn test_assign_then_conflict_then_unassign() {
        let app_state: AppState = create_test_app_state();
        let app: Router = build_router(app_state.clone());
        let monday: String = seed_window(&app).await;
        seed_student(&app_state.store, &monday, 1).await;

        let (status, body) = send(
            &app,
            "POST",
            "/assignments",
            Some(json!({"shift_id": monday, "application_id": "a1"})),
        )
        .await;
        assert_eq!(status, HttpStatusCode::OK);
        assert_eq!(body["hours_assigned"], json!(8));

        let (status, body) = send(
            &app,
            "POST",
            "/assignments/unassign",
            Some(json!({"shift_id": monday, "worker_id": "stu-1"})),
        )
        .await;
        assert_eq!(status, HttpStatusCode::OK);
        assert_eq!(body["was_assigned"], json!(true));

        let (status, body) = send(
            &app,
            "POST",
            "/assignments/unassign",
            Some(json!({"shift_id": monday, "worker_id": "stu-1"})),
        )
        .await;
        assert_eq!(status, HttpStatusCode::NOT_FOUND);
        assert_eq!(body["kind"], json!("not_found"));
    }

    #[tokio::test]
    async fn test_full_shift_is_conflict() {
        let app_state: AppState = create_test_app_state();
        let app: Router = build_router(app_state.clone());
        let monday: String = seed_window(&app).await;
        seed_student(&app_state.store, &monday, 0).await;

        let (status, body) = send(
            &app,
            "POST",
            "/assignments",
            Some(json!({"shift_id": monday, "application_id": "a1"})),
        )
        .await;

        assert_eq!(status, HttpStatusCode::CONFLICT);
        assert_eq!(body["kind"], json!("constraint_violation"));
        assert_eq!(body["constraint"], json!("capacity_exceeded"));
    }

    #[tokio::test]
    async fn test_planning_run_and_consistency() {
        let app_state: AppState = create_test_app_state();
        let app: Router = build_router(app_state.clone());
        let monday: String = seed_window(&app).await;
        seed_student(&app_state.store, &monday, 2).await;

        let (status, body) = send(
            &app,
            "POST",
            "/planning/run",
            Some(json!({"shift_ids": [monday]})),
        )
        .await;
        assert_eq!(status, HttpStatusCode::OK);
        assert_eq!(body["committed"], json!(true));
        assert_eq!(body["shifts"][0]["selected"], json!(["stu-1"]));

        let (status, body) = send(&app, "GET", "/consistency", None).await;
        assert_eq!(status, HttpStatusCode::OK);
        assert_eq!(body["discrepancies"], json!([]));
    }

    #[test]
    fn test_store_failure_maps_to_service_unavailable() {
        let err: HttpError = HttpError::from(ApiError::StoreFailure {
            operation: String::from("reading shifts"),
            message: String::from("timeout"),
        });
        assert_eq!(err.status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(err.kind, ErrorKind::StoreFailure);
    }
}
