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

use axum::{
    Json, Router,
    extract::{Path, Query, State as AxumState},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use servicebay_api::{
    ApiError, BookingInfo, CenterInfo, CreateCenterRequest, CreateReservationRequest,
    DueStatusResponse, ListCentersResponse, ListSlotsResponse, RecordServiceRequest,
    RegisterVehicleRequest, ReservationResponse, VehicleInfo, create_center, create_reservation,
    get_booking, get_due_status, get_vehicle, list_centers, list_slots, record_service,
    register_vehicle,
};
use servicebay_domain::{
    DEFAULT_KM_GRACE, DEFAULT_KM_PER_INTERVAL, DEFAULT_MONTHS_GRACE, DEFAULT_MONTHS_PER_INTERVAL,
    MaintenanceDueEvaluator, MaintenancePolicy,
};
use servicebay_persistence::Persistence;
use std::sync::Arc;
use time::OffsetDateTime;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

/// Service Bay Server - HTTP server for the Service Bay scheduling system
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long)]
    database: Option<String>,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// Address to bind the server to
    #[arg(short, long, default_value = "127.0.0.1")]
    bind: String,

    /// Kilometers between two services
    #[arg(long, default_value_t = DEFAULT_KM_PER_INTERVAL)]
    km_per_interval: u32,

    /// Calendar months between two services
    #[arg(long, default_value_t = DEFAULT_MONTHS_PER_INTERVAL)]
    months_per_interval: u32,

    /// Kilometers past a due point before a vehicle is overdue
    #[arg(long, default_value_t = DEFAULT_KM_GRACE)]
    km_grace: u32,

    /// Months past a due point before a vehicle is overdue
    #[arg(long, default_value_t = DEFAULT_MONTHS_GRACE)]
    months_grace: u32,
}

impl Args {
    /// Validates the policy knobs into a `MaintenancePolicy`.
    fn policy(&self) -> Result<MaintenancePolicy, servicebay_domain::DomainError> {
        MaintenancePolicy::new(
            self.km_per_interval,
            self.months_per_interval,
            self.km_grace,
            self.months_grace,
        )
    }
}

/// Application state shared across handlers.
///
/// This contains the persistence layer wrapped in a Mutex to allow
/// safe concurrent access.
#[derive(Clone)]
struct AppState {
    /// The scheduling store.
    persistence: Arc<Mutex<Persistence>>,
    /// Due evaluator configured from the command line.
    evaluator: MaintenanceDueEvaluator,
}

/// Query parameters for the slot listing.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct SlotsQuery {
    /// The requested date (`YYYY-MM-DD`).
    date: String,
}

/// Query parameters for the due evaluation.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct DueQuery {
    /// Evaluation date (`YYYY-MM-DD`); today when absent.
    as_of: Option<String>,
}

/// Error response type.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Error indicator.
    error: bool,
    /// Error message.
    message: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The error message.
    message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let status: StatusCode = match err {
            ApiError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            ApiError::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Conflict { .. } => StatusCode::CONFLICT,
            ApiError::DomainRuleViolation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Internal { .. } => {
                error!(error = %err, "Internal error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        Self {
            status,
            message: err.to_string(),
        }
    }
}

/// Handler for POST `/centers` endpoint.
async fn handle_create_center(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<CreateCenterRequest>,
) -> Result<(StatusCode, Json<CenterInfo>), HttpError> {
    info!(center_id = %req.center_id, "Handling create_center request");

    let center: CenterInfo = create_center(&mut *app_state.persistence.lock().await, &req)?;

    Ok((StatusCode::CREATED, Json(center)))
}

/// Handler for GET `/centers` endpoint.
async fn handle_list_centers(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<ListCentersResponse>, HttpError> {
    let centers: ListCentersResponse = list_centers(&mut *app_state.persistence.lock().await)?;
    Ok(Json(centers))
}

/// Handler for GET `/centers/{center_id}/slots` endpoint.
///
/// Lists the bookable slots of one center for one date.
async fn handle_list_slots(
    AxumState(app_state): AxumState<AppState>,
    Path(center_id): Path<String>,
    Query(query): Query<SlotsQuery>,
) -> Result<Json<ListSlotsResponse>, HttpError> {
    info!(center_id = %center_id, date = %query.date, "Handling list_slots request");

    let response: ListSlotsResponse = list_slots(
        &mut *app_state.persistence.lock().await,
        &center_id,
        &query.date,
        OffsetDateTime::now_utc(),
    )?;

    Ok(Json(response))
}

/// Handler for POST `/vehicles` endpoint.
async fn handle_register_vehicle(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<RegisterVehicleRequest>,
) -> Result<(StatusCode, Json<VehicleInfo>), HttpError> {
    info!(vehicle_id = %req.vehicle_id, "Handling register_vehicle request");

    let vehicle: VehicleInfo = register_vehicle(
        &mut *app_state.persistence.lock().await,
        &req,
        OffsetDateTime::now_utc(),
    )?;

    Ok((StatusCode::CREATED, Json(vehicle)))
}

/// Handler for GET `/vehicles/{vehicle_id}` endpoint.
async fn handle_get_vehicle(
    AxumState(app_state): AxumState<AppState>,
    Path(vehicle_id): Path<String>,
) -> Result<Json<VehicleInfo>, HttpError> {
    let vehicle: VehicleInfo = get_vehicle(&mut *app_state.persistence.lock().await, &vehicle_id)?;
    Ok(Json(vehicle))
}

/// Handler for POST `/vehicles/{vehicle_id}/service` endpoint.
///
/// Records a completed service.
async fn handle_record_service(
    AxumState(app_state): AxumState<AppState>,
    Path(vehicle_id): Path<String>,
    Json(req): Json<RecordServiceRequest>,
) -> Result<Json<VehicleInfo>, HttpError> {
    info!(
        vehicle_id = %vehicle_id,
        odometer_km = req.odometer_km,
        service_date = %req.service_date,
        "Handling record_service request"
    );

    let vehicle: VehicleInfo = record_service(
        &mut *app_state.persistence.lock().await,
        &vehicle_id,
        &req,
        OffsetDateTime::now_utc(),
    )?;

    Ok(Json(vehicle))
}

/// Handler for GET `/vehicles/{vehicle_id}/due` endpoint.
///
/// Evaluates the vehicle against the configured maintenance policy.
async fn handle_get_due_status(
    AxumState(app_state): AxumState<AppState>,
    Path(vehicle_id): Path<String>,
    Query(query): Query<DueQuery>,
) -> Result<Json<DueStatusResponse>, HttpError> {
    info!(vehicle_id = %vehicle_id, as_of = ?query.as_of, "Handling due_status request");

    let status: DueStatusResponse = get_due_status(
        &mut *app_state.persistence.lock().await,
        &app_state.evaluator,
        &vehicle_id,
        query.as_of.as_deref(),
        OffsetDateTime::now_utc(),
    )?;

    Ok(Json(status))
}

/// Handler for POST `/reservations` endpoint.
///
/// Responds `201` for a new booking, `200` for a replayed one and `409`
/// with the typed body when the reservation is turned down.
async fn handle_create_reservation(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<CreateReservationRequest>,
) -> Result<(StatusCode, Json<ReservationResponse>), HttpError> {
    info!(
        vehicle_id = %req.vehicle_id,
        center_id = %req.center_id,
        date = %req.date,
        time = %req.time,
        "Handling create_reservation request"
    );

    let response: ReservationResponse = create_reservation(
        &mut *app_state.persistence.lock().await,
        &req,
        OffsetDateTime::now_utc(),
    )?;

    let status: StatusCode = match (response.is_reserved(), response.replayed) {
        (true, false) => StatusCode::CREATED,
        (true, true) => StatusCode::OK,
        (false, _) => {
            warn!(reason = ?response.reason, "Reservation rejected");
            StatusCode::CONFLICT
        }
    };

    Ok((status, Json(response)))
}

/// Handler for GET `/bookings/{booking_id}` endpoint.
async fn handle_get_booking(
    AxumState(app_state): AxumState<AppState>,
    Path(booking_id): Path<i64>,
) -> Result<Json<BookingInfo>, HttpError> {
    let booking: BookingInfo = get_booking(&mut *app_state.persistence.lock().await, booking_id)?;
    Ok(Json(booking))
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route(
            "/centers",
            post(handle_create_center).get(handle_list_centers),
        )
        .route("/centers/{center_id}/slots", get(handle_list_slots))
        .route("/vehicles", post(handle_register_vehicle))
        .route("/vehicles/{vehicle_id}", get(handle_get_vehicle))
        .route("/vehicles/{vehicle_id}/service", post(handle_record_service))
        .route("/vehicles/{vehicle_id}/due", get(handle_get_due_status))
        .route("/reservations", post(handle_create_reservation))
        .route("/bookings/{booking_id}", get(handle_get_booking))
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

    info!("Initializing Service Bay Server");

    let policy: MaintenancePolicy = args.policy()?;
    info!(
        km_per_interval = policy.km_per_interval(),
        months_per_interval = policy.months_per_interval(),
        km_grace = policy.km_grace(),
        months_grace = policy.months_grace(),
        "Maintenance policy"
    );

    // Initialize persistence (in-memory or file-based based on CLI argument)
    let persistence: Persistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        Persistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()?
    };

    let app_state: AppState = AppState {
        persistence: Arc::new(Mutex::new(persistence)),
        evaluator: MaintenanceDueEvaluator::new(policy),
    };

    // Build router
    let app: Router = build_router(app_state);

    // Bind to address
    let addr: std::net::SocketAddr = format!("{}:{}", args.bind, args.port).parse()?;
    info!("Server listening on {}", addr);

    // Run server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
