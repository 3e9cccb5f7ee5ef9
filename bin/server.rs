// ESG Disclosure - Web Server
// JSON API over the disclosure service (axum)

use anyhow::{Context, Result};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{delete, get},
    Router,
};
use chrono::{Datelike, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use tower_http::cors::CorsLayer;
use tracing::{error, info};

use esg_disclosure::{
    logging, open_database, AppConfig, DisclosureError, DisclosureService, EmissionRecord,
    EnergyConsumption, Finding, MaterialityAssessment, RecordStore, WorkforceDiversity,
};

/// Shared application state
#[derive(Clone)]
struct AppState {
    service: Arc<DisclosureService>,
}

/// API Response wrapper
#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
            error: None,
        }
    }
}

/// Library error carried out of a handler
struct ApiError(DisclosureError);

impl From<DisclosureError> for ApiError {
    fn from(err: DisclosureError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            DisclosureError::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            DisclosureError::NotFound { .. } => StatusCode::NOT_FOUND,
            DisclosureError::InvalidId { .. } => StatusCode::BAD_REQUEST,
            DisclosureError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            error!(error = %self.0, "request failed");
        }

        let body = ApiResponse {
            success: false,
            data: self.0.findings().to_vec(),
            error: Some(self.0.to_string()),
        };
        (status, Json(body)).into_response()
    }
}

type ApiResult<T> = std::result::Result<Json<ApiResponse<T>>, ApiError>;

/// Saved record plus its warnings
#[derive(Serialize)]
struct SubmitResponse<T> {
    record: T,
    warnings: Vec<Finding>,
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

/// Per-kind list/submit/delete handlers; every kind shares one shape.
macro_rules! record_handlers {
    ($list:ident, $submit:ident, $remove:ident, $ty:ty, $store:ident, $submit_fn:ident, $delete_fn:ident) => {
        async fn $list(State(state): State<AppState>) -> ApiResult<Vec<$ty>> {
            Ok(Json(ApiResponse::ok(state.service.$store().get_all()?)))
        }

        async fn $submit(
            State(state): State<AppState>,
            Json(record): Json<$ty>,
        ) -> ApiResult<SubmitResponse<$ty>> {
            let saved = state.service.$submit_fn(record)?;
            Ok(Json(ApiResponse::ok(SubmitResponse {
                record: saved.record,
                warnings: saved.warnings,
            })))
        }

        async fn $remove(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<i64> {
            state.service.$delete_fn(id)?;
            Ok(Json(ApiResponse::ok(id)))
        }
    };
}

record_handlers!(list_emissions, submit_emission, delete_emission, EmissionRecord, emissions, submit_emission, delete_emission);
record_handlers!(list_energy, submit_energy, delete_energy, EnergyConsumption, energy, submit_energy, delete_energy);
record_handlers!(list_workforce, submit_workforce, delete_workforce, WorkforceDiversity, workforce, submit_workforce, delete_workforce);
record_handlers!(list_materiality, submit_materiality, delete_materiality, MaterialityAssessment, materiality, submit_materiality, delete_materiality);

/// GET /api/completeness/:year - ESRS and emissions completeness
async fn get_completeness(
    State(state): State<AppState>,
    Path(year): Path<i32>,
) -> ApiResult<esg_disclosure::YearAssessment> {
    Ok(Json(ApiResponse::ok(state.service.assess_year(year)?)))
}

#[derive(Deserialize)]
struct TrendQuery {
    from: Option<i32>,
    to: Option<i32>,
}

/// GET /api/trend?from=&to= - Total emissions per year
async fn get_trend(
    State(state): State<AppState>,
    Query(query): Query<TrendQuery>,
) -> ApiResult<Vec<esg_disclosure::YearOverYear>> {
    let rows = state.service.year_over_year_between(query.from, query.to)?;
    Ok(Json(ApiResponse::ok(rows)))
}

#[derive(Deserialize)]
struct IntensityQuery {
    base: Decimal,
}

#[derive(Serialize)]
struct IntensityResponse {
    year: i32,
    base: Decimal,
    /// null when the base is zero or negative
    intensity: Option<Decimal>,
}

/// GET /api/intensity/:year?base= - Emissions per unit of activity
async fn get_intensity(
    State(state): State<AppState>,
    Path(year): Path<i32>,
    Query(query): Query<IntensityQuery>,
) -> ApiResult<IntensityResponse> {
    let intensity = state.service.emission_intensity(year, query.base)?;
    Ok(Json(ApiResponse::ok(IntensityResponse {
        year,
        base: query.base,
        intensity,
    })))
}

/// GET /api/verification - Emission record counts per verification status
async fn get_verification_stats(
    State(state): State<AppState>,
) -> ApiResult<std::collections::BTreeMap<String, usize>> {
    Ok(Json(ApiResponse::ok(state.service.verification_statistics()?)))
}

#[derive(Deserialize)]
struct TargetQuery {
    baseline: i32,
    current: i32,
    target: Decimal,
}

/// GET /api/target?baseline=&current=&target= - Reduction target check
async fn get_target(
    State(state): State<AppState>,
    Query(query): Query<TargetQuery>,
) -> ApiResult<esg_disclosure::TargetCheck> {
    let check = state
        .service
        .check_target(query.baseline, query.current, query.target)?;
    Ok(Json(ApiResponse::ok(check)))
}

#[derive(Serialize)]
struct RenewableResponse {
    year: i32,
    share_percentage: Option<Decimal>,
}

/// GET /api/renewable/:year - Renewable share of energy consumption
async fn get_renewable_share(
    State(state): State<AppState>,
    Path(year): Path<i32>,
) -> ApiResult<RenewableResponse> {
    let share_percentage = state.service.renewable_share(year)?;
    Ok(Json(ApiResponse::ok(RenewableResponse {
        year,
        share_percentage,
    })))
}

/// GET /api/topics/:year - Material topics, highest score first
async fn get_material_topics(
    State(state): State<AppState>,
    Path(year): Path<i32>,
) -> ApiResult<Vec<MaterialityAssessment>> {
    Ok(Json(ApiResponse::ok(state.service.material_topics(year)?)))
}

// ============================================================================
// Main Server
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let config_path = std::env::var("ESG_CONFIG").ok();
    let config = AppConfig::load(config_path.as_deref().map(std::path::Path::new))
        .context("Failed to load configuration")?;
    logging::init(&config.log_filter);

    println!("🌐 ESG Disclosure - Web Server");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let conn = open_database(&config.database_path)
        .with_context(|| format!("Failed to open database {:?}", config.database_path))?;
    println!("✓ Database opened: {:?}", config.database_path);

    let context = config.validation_context(Utc::now().year());
    let service = DisclosureService::sqlite(Arc::new(Mutex::new(conn)), context)
        .with_created_by(config.created_by.clone());

    // Create shared state
    let state = AppState {
        service: Arc::new(service),
    };

    // Build API routes
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/emissions", get(list_emissions).post(submit_emission))
        .route("/emissions/:id", delete(delete_emission))
        .route("/energy", get(list_energy).post(submit_energy))
        .route("/energy/:id", delete(delete_energy))
        .route("/workforce", get(list_workforce).post(submit_workforce))
        .route("/workforce/:id", delete(delete_workforce))
        .route("/materiality", get(list_materiality).post(submit_materiality))
        .route("/materiality/:id", delete(delete_materiality))
        .route("/completeness/:year", get(get_completeness))
        .route("/trend", get(get_trend))
        .route("/intensity/:year", get(get_intensity))
        .route("/verification", get(get_verification_stats))
        .route("/target", get(get_target))
        .route("/renewable/:year", get(get_renewable_share))
        .route("/topics/:year", get(get_material_topics))
        .with_state(state);

    let app = Router::new()
        .nest("/api", api_routes)
        .layer(CorsLayer::permissive());

    // Start server
    let addr = std::env::var("ESG_BIND").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    info!(%addr, "server listening");
    println!("\n🚀 Server running on http://{}", addr);
    println!("   API: http://{}/api/health", addr);
    println!("\n   Press Ctrl+C to stop\n");

    axum::serve(listener, app)
        .await
        .context("Failed to start server")?;

    Ok(())
}
