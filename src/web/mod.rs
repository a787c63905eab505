//! Web API module for ETHelper.
//!
//! This module provides the REST API behind the data-entry form and the
//! environment panel, and serves the embedded form itself.
//!
//! # Endpoints
//!
//! - `GET /health` - Health check
//! - `GET /api/status` - Catalog and dataset status
//! - `GET /api/presets` - List presets
//! - `GET /api/form?preset=&level=&typology=&debug=` - Render the form of a preset
//! - `PUT /api/values` - Store form values
//! - `POST /api/populate` - Fill empty values with zeros or defaults
//! - `POST /api/dataset/generate` - Write `output/data.csv`
//! - `GET /api/dataset` - Read back the generated dataset
//! - `GET /api/dataset/download` - Download the generated dataset
//! - `GET /api/migrations/latest` - Most recent ETLocal migration
//! - `POST /api/migrations` - Copy the dataset into a migration
//! - `GET /api/environment` - Services and setup jobs
//! - `POST /api/environment/{service}/setup` - Start a service setup
//! - `GET /api/environment/jobs/{id}` - Setup job status
//! - `POST /api/environment/identity` - Link ETModel to ETEngine
//! - `GET /api/config` - Current configuration
//!
//! Any other path serves the embedded form.

pub mod static_files;

use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::config::Config;
use crate::constants::{APP_NAME, DATASET_FILE_NAME};
use crate::environment::{
    extract_identity_info, update_settings_file, IdentityInfo, Service, ServiceState, SetupJob,
    SetupJobManager, StartError,
};
use crate::models::{KeyCatalog, Level, PresetSummary, Typology};
use crate::services::{
    validate_migration_name, validate_table_name, Completion, FormFilter, FormSession, FormView,
    GeneratedDataset, MigrationReport, PopulateAction, Workspace,
};

// ============================================================================
// Application State
// ============================================================================

/// Shared application state for the web API.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    config: Arc<Config>,
    /// Data root, output directory and migration target
    workspace: Arc<Workspace>,
    /// Key catalog loaded at startup, or why it could not be loaded
    catalog: Result<Arc<KeyCatalog>, String>,
    /// Values entered in the form
    session: Arc<RwLock<FormSession>>,
    /// Background setup jobs
    jobs: Arc<SetupJobManager>,
}

impl AppState {
    /// Creates a new application state running real `docker-compose` setups.
    pub fn new(config: Config) -> Self {
        let jobs = SetupJobManager::new(config.workspace_root(), config.services.clone());
        Self::with_jobs(config, jobs)
    }

    /// Creates a new application state with the given job manager.
    pub fn with_jobs(config: Config, jobs: Arc<SetupJobManager>) -> Self {
        let workspace = Workspace::new(config.clone());

        let catalog = match workspace.catalog() {
            Ok(catalog) => {
                info!("Loaded {} keys from {}", catalog.len(), workspace.data_root().display());
                Ok(Arc::new(catalog))
            }
            Err(e) => {
                warn!("Key catalog unavailable: {e:#}");
                Err(format!("{e:#}"))
            }
        };
        let session = match &catalog {
            Ok(catalog) => FormSession::from_catalog(catalog),
            Err(_) => FormSession::new(),
        };

        Self {
            config: Arc::new(config),
            workspace: Arc::new(workspace),
            catalog,
            session: Arc::new(RwLock::new(session)),
            jobs,
        }
    }

    /// The loaded catalog, or 503 when the key tables are missing.
    fn catalog(&self) -> Result<Arc<KeyCatalog>, (StatusCode, Json<ApiError>)> {
        self.catalog.clone().map_err(|e| {
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ApiError::with_details(
                    "Key catalog unavailable. Check variables/keys.csv and variables/translations.csv",
                    e,
                )),
            )
        })
    }
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Current health status (e.g., "healthy").
    pub status: String,
    /// Application version.
    pub version: String,
}

/// Status response.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    /// Application name.
    pub app: String,
    /// Application version.
    pub version: String,
    /// Data root in use.
    pub data_root: String,
    /// Whether the key catalog is loaded.
    pub catalog_loaded: bool,
    /// Number of catalog keys.
    pub key_count: usize,
    /// Why the catalog could not be loaded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog_error: Option<String>,
    /// "DATASET GENERATED" or "DATASET IN BUILD".
    pub dataset_status: String,
    /// Whether `output/data.csv` exists.
    pub dataset_exists: bool,
}

/// Preset list response.
#[derive(Debug, Serialize)]
pub struct PresetListResponse {
    /// Presets found in the data root.
    pub presets: Vec<PresetSummary>,
    /// Loader warnings.
    pub warnings: Vec<String>,
}

/// Query parameters of the form endpoint.
#[derive(Debug, Deserialize)]
pub struct FormQuery {
    /// Preset to render.
    pub preset: Option<String>,
    /// Only return sections of this level.
    pub level: Option<String>,
    /// Only return sections of this typology.
    pub typology: Option<String>,
    /// Include the per-key trace.
    #[serde(default)]
    pub debug: bool,
}

/// Rendered form.
#[derive(Debug, Serialize)]
pub struct FormResponse {
    /// Sections, counters and diagnostics.
    #[serde(flatten)]
    pub form: FormView,
    /// "DATASET GENERATED" or "DATASET IN BUILD".
    pub dataset_status: String,
    /// Loader warnings.
    pub warnings: Vec<String>,
}

/// Request to store form values.
#[derive(Debug, Deserialize)]
pub struct ValuesRequest {
    /// Preset the form was rendered for.
    pub preset: String,
    /// Values by key.
    pub values: HashMap<String, String>,
}

/// Response after storing form values.
#[derive(Debug, Serialize)]
pub struct ValuesResponse {
    /// Number of values stored.
    pub updated: usize,
    /// Completion over all preset members.
    pub overall: Completion,
    /// Completion over basic members.
    pub basic: Completion,
    /// Completion over advanced members.
    pub advanced: Completion,
    /// Loader warnings.
    pub warnings: Vec<String>,
}

/// Populate actions offered by the form.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PopulateKind {
    /// Set empty preset values to 0.
    Zeros,
    /// Copy defaults into empty basic values.
    BasicDefaults,
    /// Copy defaults into empty advanced values.
    AdvancedDefaults,
}

impl From<PopulateKind> for PopulateAction {
    fn from(kind: PopulateKind) -> Self {
        match kind {
            PopulateKind::Zeros => Self::Zeros,
            PopulateKind::BasicDefaults => Self::Defaults(Level::Basic),
            PopulateKind::AdvancedDefaults => Self::Defaults(Level::Advanced),
        }
    }
}

/// Request to populate empty values.
#[derive(Debug, Deserialize)]
pub struct PopulateRequest {
    /// Active preset.
    pub preset: String,
    /// What to fill in.
    pub action: PopulateKind,
}

/// Response after populating values.
#[derive(Debug, Serialize)]
pub struct PopulateResponse {
    /// Number of values changed.
    pub changed: usize,
    /// Loader warnings.
    pub warnings: Vec<String>,
}

/// Request to generate the dataset.
#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    /// Active preset.
    pub preset: String,
}

/// Response after generating the dataset.
#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    /// Written file and checksum.
    #[serde(flatten)]
    pub dataset: GeneratedDataset,
    /// "DATASET GENERATED".
    pub dataset_status: String,
    /// Loader warnings.
    pub warnings: Vec<String>,
}

/// One column of the generated dataset.
#[derive(Debug, Serialize)]
pub struct DatasetRow {
    /// Key.
    pub key: String,
    /// Value.
    pub value: String,
}

/// Transposed view of the generated dataset.
#[derive(Debug, Serialize)]
pub struct DatasetResponse {
    /// Path of the file.
    pub path: String,
    /// Columns in file order.
    pub rows: Vec<DatasetRow>,
}

/// Most recent migration.
#[derive(Debug, Serialize)]
pub struct LatestMigrationResponse {
    /// Directory searched.
    pub migrate_dir: String,
    /// Name of the newest migration folder.
    pub latest: Option<String>,
}

/// Request to update a migration.
#[derive(Debug, Deserialize)]
pub struct MigrationRequest {
    /// Migration name; the most recent migration when omitted.
    #[serde(default)]
    pub name: Option<String>,
}

/// Environment overview.
#[derive(Debug, Serialize)]
pub struct EnvironmentResponse {
    /// Services and their checkouts.
    pub services: Vec<ServiceState>,
    /// Setup jobs, newest first.
    pub jobs: Vec<SetupJob>,
    /// ETEngine admin password, once scraped.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_password: Option<String>,
    /// ETModel settings file receiving identity credentials.
    pub settings_file: String,
}

/// Request to link ETModel to ETEngine.
#[derive(Debug, Deserialize)]
pub struct IdentityRequest {
    /// Text holding `client_id:` / `client_secret:` lines.
    pub text: String,
}

/// Response after linking identity credentials.
#[derive(Debug, Serialize)]
pub struct IdentityResponse {
    /// Extracted credentials.
    #[serde(flatten)]
    pub identity: IdentityInfo,
    /// Number of rewritten lines.
    pub updated_lines: usize,
    /// File that was updated.
    pub settings_file: String,
}

/// Configuration response.
#[derive(Debug, Serialize)]
pub struct ConfigResponse {
    /// Data root.
    pub data_root: String,
    /// Directory with the sibling checkouts.
    pub workspace_root: String,
    /// ETLocal migration directory.
    pub migrate_dir: String,
    /// Dataset output directory.
    pub output_dir: String,
    /// ETEngine URL.
    pub engine_url: String,
    /// ETModel URL.
    pub model_url: String,
}

/// API error response.
#[derive(Debug, Serialize)]
pub struct ApiError {
    /// Error message.
    pub error: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }

    fn with_details(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: Some(details.into()),
        }
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn bad_request(error: impl Into<String>) -> (StatusCode, Json<ApiError>) {
    (StatusCode::BAD_REQUEST, Json(ApiError::new(error)))
}

fn internal_error(
    error: impl Into<String>,
    source: &anyhow::Error,
) -> (StatusCode, Json<ApiError>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ApiError::with_details(error, format!("{source:#}"))),
    )
}

/// Rejects preset names that are not plain file stems.
fn validate_preset(preset: &str) -> Result<(), (StatusCode, Json<ApiError>)> {
    validate_table_name(preset)
        .map_err(|e| bad_request(format!("Invalid preset name: {e}")))
}

fn parse_filter(query: &FormQuery) -> Result<FormFilter, (StatusCode, Json<ApiError>)> {
    let level = match query.level.as_deref().filter(|l| !l.is_empty()) {
        Some(cell) => Some(
            Level::parse(cell).ok_or_else(|| bad_request(format!("Unknown level '{cell}'")))?,
        ),
        None => None,
    };
    let typology = match query.typology.as_deref().filter(|t| !t.is_empty()) {
        Some(cell) => Some(
            Typology::parse(cell)
                .ok_or_else(|| bad_request(format!("Unknown typology '{cell}'")))?,
        ),
        None => None,
    };
    Ok(FormFilter { level, typology })
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /health - Health check endpoint.
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// GET /api/status - Catalog and dataset status.
async fn get_status(State(state): State<AppState>) -> Json<StatusResponse> {
    let dataset_status = state.session.read().unwrap().status().label().to_string();
    let (key_count, catalog_error) = match &state.catalog {
        Ok(catalog) => (catalog.len(), None),
        Err(e) => (0, Some(e.clone())),
    };

    Json(StatusResponse {
        app: APP_NAME.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        data_root: state.workspace.data_root().display().to_string(),
        catalog_loaded: catalog_error.is_none(),
        key_count,
        catalog_error,
        dataset_status,
        dataset_exists: state.workspace.output().dataset_path().is_file(),
    })
}

/// GET /api/presets - List presets.
async fn list_presets(
    State(state): State<AppState>,
) -> Result<Json<PresetListResponse>, (StatusCode, Json<ApiError>)> {
    let loaded = state
        .workspace
        .store()
        .preset_summaries()
        .map_err(|e| internal_error("Failed to list presets", &e))?;

    Ok(Json(PresetListResponse {
        presets: loaded.value,
        warnings: loaded.warnings,
    }))
}

/// GET /api/form - Render the form of a preset.
async fn get_form(
    State(state): State<AppState>,
    Query(query): Query<FormQuery>,
) -> Result<Json<FormResponse>, (StatusCode, Json<ApiError>)> {
    let catalog = state.catalog()?;
    let preset = query
        .preset
        .as_deref()
        .filter(|p| !p.is_empty())
        .ok_or_else(|| bad_request("Query parameter 'preset' is required"))?;
    validate_preset(preset)?;
    let filter = parse_filter(&query)?;

    let mut session = state.session.write().unwrap();
    let loaded = state
        .workspace
        .form(&catalog, &mut session, preset, filter, query.debug)
        .map_err(|e| internal_error("Failed to render form", &e))?;

    Ok(Json(FormResponse {
        form: loaded.value,
        dataset_status: session.status().label().to_string(),
        warnings: loaded.warnings,
    }))
}

/// PUT /api/values - Store form values.
///
/// Rejected as a whole when any key is not in the catalog.
async fn put_values(
    State(state): State<AppState>,
    Json(request): Json<ValuesRequest>,
) -> Result<Json<ValuesResponse>, (StatusCode, Json<ApiError>)> {
    let catalog = state.catalog()?;
    validate_preset(&request.preset)?;

    let mut unknown: Vec<&str> = request
        .values
        .keys()
        .filter(|key| !catalog.contains(key))
        .map(String::as_str)
        .collect();
    if !unknown.is_empty() {
        unknown.sort_unstable();
        return Err(bad_request(format!("Unknown keys: {}", unknown.join(", "))));
    }

    let mut session = state.session.write().unwrap();
    session.init(&catalog);
    for (key, value) in &request.values {
        session
            .set_value(key, value.clone())
            .map_err(|e| bad_request(e.to_string()))?;
    }

    let loaded = state
        .workspace
        .form(
            &catalog,
            &mut session,
            &request.preset,
            FormFilter::default(),
            false,
        )
        .map_err(|e| internal_error("Failed to render form", &e))?;

    Ok(Json(ValuesResponse {
        updated: request.values.len(),
        overall: loaded.value.overall,
        basic: loaded.value.basic,
        advanced: loaded.value.advanced,
        warnings: loaded.warnings,
    }))
}

/// POST /api/populate - Fill empty values.
async fn populate(
    State(state): State<AppState>,
    Json(request): Json<PopulateRequest>,
) -> Result<Json<PopulateResponse>, (StatusCode, Json<ApiError>)> {
    let catalog = state.catalog()?;
    validate_preset(&request.preset)?;

    let mut session = state.session.write().unwrap();
    let loaded = state
        .workspace
        .populate(&catalog, &mut session, &request.preset, request.action.into())
        .map_err(|e| internal_error("Failed to populate values", &e))?;

    Ok(Json(PopulateResponse {
        changed: loaded.value,
        warnings: loaded.warnings,
    }))
}

/// POST /api/dataset/generate - Write `output/data.csv`.
async fn generate_dataset(
    State(state): State<AppState>,
    Json(request): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>, (StatusCode, Json<ApiError>)> {
    let catalog = state.catalog()?;
    validate_preset(&request.preset)?;

    let mut session = state.session.write().unwrap();
    let loaded = state
        .workspace
        .generate(&catalog, &mut session, &request.preset)
        .map_err(|e| internal_error("Failed to generate dataset", &e))?;

    Ok(Json(GenerateResponse {
        dataset: loaded.value,
        dataset_status: session.status().label().to_string(),
        warnings: loaded.warnings,
    }))
}

/// GET /api/dataset - Read back the generated dataset.
async fn get_dataset(
    State(state): State<AppState>,
) -> Result<Json<DatasetResponse>, (StatusCode, Json<ApiError>)> {
    let contents = state
        .workspace
        .output()
        .read()
        .map_err(|e| internal_error("Failed to read dataset", &e))?
        .ok_or_else(|| {
            (
                StatusCode::NOT_FOUND,
                Json(ApiError::new("No dataset generated yet")),
            )
        })?;

    Ok(Json(DatasetResponse {
        path: contents.path.display().to_string(),
        rows: contents
            .rows
            .into_iter()
            .map(|(key, value)| DatasetRow { key, value })
            .collect(),
    }))
}

/// GET /api/dataset/download - Download `data.csv`.
async fn download_dataset(
    State(state): State<AppState>,
) -> Result<Response, (StatusCode, Json<ApiError>)> {
    let text = state
        .workspace
        .output()
        .read_text()
        .map_err(|e| internal_error("Failed to read dataset", &e))?
        .ok_or_else(|| {
            (
                StatusCode::NOT_FOUND,
                Json(ApiError::new("No dataset generated yet")),
            )
        })?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{DATASET_FILE_NAME}\""),
            ),
        ],
        text,
    )
        .into_response())
}

/// GET /api/migrations/latest - Most recent migration.
async fn latest_migration(
    State(state): State<AppState>,
) -> Result<Json<LatestMigrationResponse>, (StatusCode, Json<ApiError>)> {
    let migrations = state.workspace.migrations();
    let latest = migrations
        .most_recent()
        .map_err(|e| internal_error("Failed to list migrations", &e))?;

    Ok(Json(LatestMigrationResponse {
        migrate_dir: migrations.migrate_dir().display().to_string(),
        latest,
    }))
}

/// POST /api/migrations - Copy the dataset into a migration.
async fn update_migration(
    State(state): State<AppState>,
    Json(request): Json<MigrationRequest>,
) -> Result<Json<MigrationReport>, (StatusCode, Json<ApiError>)> {
    let migrations = state.workspace.migrations();

    let name = match request.name {
        Some(name) => name,
        None => migrations
            .most_recent()
            .map_err(|e| internal_error("Failed to list migrations", &e))?
            .ok_or_else(|| bad_request("No migration name given and no migration found"))?,
    };
    validate_migration_name(&name).map_err(|e| bad_request(e.to_string()))?;

    let report = migrations
        .update(&name)
        .map_err(|e| internal_error(format!("Failed to update migration '{}'", name.trim()), &e))?;

    Ok(Json(report))
}

/// GET /api/environment - Services and setup jobs.
async fn get_environment(State(state): State<AppState>) -> Json<EnvironmentResponse> {
    Json(EnvironmentResponse {
        services: state.jobs.services(),
        jobs: state.jobs.list_jobs(),
        admin_password: state.jobs.admin_password(),
        settings_file: state.jobs.settings_file().display().to_string(),
    })
}

/// POST /api/environment/{service}/setup - Start a service setup.
async fn start_setup(
    State(state): State<AppState>,
    Path(service): Path<String>,
) -> Result<(StatusCode, Json<SetupJob>), (StatusCode, Json<ApiError>)> {
    let service = Service::parse(&service).ok_or_else(|| {
        (
            StatusCode::NOT_FOUND,
            Json(ApiError::new(format!("Unknown service: {service}"))),
        )
    })?;

    match state.jobs.start_setup(service) {
        Ok(job) => Ok((StatusCode::ACCEPTED, Json(job))),
        Err(e) => {
            let status = match &e {
                StartError::AlreadySetUp(_) | StartError::Busy => StatusCode::CONFLICT,
                StartError::MissingDirectory(_) => StatusCode::NOT_FOUND,
                StartError::Queue(_) => StatusCode::INTERNAL_SERVER_ERROR,
            };
            Err((status, Json(ApiError::new(e.to_string()))))
        }
    }
}

/// GET /api/environment/jobs/{id} - Setup job status.
async fn get_job(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Result<Json<SetupJob>, (StatusCode, Json<ApiError>)> {
    state.jobs.get_job(&job_id).map(Json).ok_or_else(|| {
        (
            StatusCode::NOT_FOUND,
            Json(ApiError::new(format!("Job not found: {job_id}"))),
        )
    })
}

/// POST /api/environment/identity - Write identity credentials.
async fn link_identity(
    State(state): State<AppState>,
    Json(request): Json<IdentityRequest>,
) -> Result<Json<IdentityResponse>, (StatusCode, Json<ApiError>)> {
    let identity = extract_identity_info(&request.text);
    if identity.client_id.is_none() && identity.client_secret.is_none() {
        return Err(bad_request("No client_id or client_secret found"));
    }

    let settings_file: PathBuf = state.jobs.settings_file();
    if !settings_file.is_file() {
        return Err((
            StatusCode::NOT_FOUND,
            Json(ApiError::new(format!(
                "Settings file not found: {}",
                settings_file.display()
            ))),
        ));
    }

    let updated_lines = update_settings_file(&settings_file, &identity)
        .map_err(|e| internal_error("Failed to update settings", &e))?;
    info!(
        "Linked identity into {} ({} lines)",
        settings_file.display(),
        updated_lines
    );

    Ok(Json(IdentityResponse {
        identity,
        updated_lines,
        settings_file: settings_file.display().to_string(),
    }))
}

/// GET /api/config - Current configuration.
async fn get_config(State(state): State<AppState>) -> Json<ConfigResponse> {
    let config = &state.config;
    Json(ConfigResponse {
        data_root: config.paths.data_root.display().to_string(),
        workspace_root: config.workspace_root().display().to_string(),
        migrate_dir: config.migrate_dir().display().to_string(),
        output_dir: config.output_dir().display().to_string(),
        engine_url: config.services.engine_url.clone(),
        model_url: config.services.model_url.clone(),
    })
}

// ============================================================================
// Router Setup
// ============================================================================

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    // The server runs next to the browser on the user's machine.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health check
        .route("/health", get(health_check))
        .route("/api/status", get(get_status))
        // Form endpoints
        .route("/api/presets", get(list_presets))
        .route("/api/form", get(get_form))
        .route("/api/values", axum::routing::put(put_values))
        .route("/api/populate", post(populate))
        // Dataset endpoints
        .route("/api/dataset", get(get_dataset))
        .route("/api/dataset/generate", post(generate_dataset))
        .route("/api/dataset/download", get(download_dataset))
        // Migration endpoints
        .route("/api/migrations", post(update_migration))
        .route("/api/migrations/latest", get(latest_migration))
        // Environment endpoints
        .route("/api/environment", get(get_environment))
        .route("/api/environment/identity", post(link_identity))
        .route("/api/environment/jobs/{id}", get(get_job))
        .route("/api/environment/{service}/setup", post(start_setup))
        // Config endpoint
        .route("/api/config", get(get_config))
        .fallback(static_files::serve_static)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Runs the web server.
///
/// # Errors
///
/// Returns an error if the server fails to start.
pub async fn run_server(config: Config, addr: SocketAddr) -> anyhow::Result<()> {
    let state = AppState::new(config);
    let app = create_router(state);

    info!("Starting {} web server on http://{}", APP_NAME, addr);
    if !static_files::has_embedded_assets() {
        warn!("No embedded form found; only the API is available");
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
