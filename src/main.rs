use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use axum_prometheus::PrometheusMetricLayer;
use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use eflyt_triage::config::AppConfig;
use eflyt_triage::error::AppError;
use eflyt_triage::telemetry;
use eflyt_triage::triage::{
    CaseTriageService, EvaluationConfig, FixturePortal, MemoryWorkQueue, RunReport,
    TracingEventLog, TriageSettings,
};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

#[derive(Clone)]
struct AppState {
    readiness: Arc<AtomicBool>,
    metrics: metrics_exporter_prometheus::PrometheusHandle,
    triage: TriageSettings,
}

#[derive(Parser, Debug)]
#[command(
    name = "Relocation Case Triage",
    about = "Run and serve automated triage of relocation registration cases",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Execute one triage run from a worklist CSV export and print the report
    Run(RunArgs),
}

#[derive(Args, Debug, Default)]
struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    port: Option<u16>,
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Worklist CSV export to triage
    #[arg(long)]
    worklist_csv: PathBuf,
    /// Evaluation date for age calculations (defaults to today)
    #[arg(long, value_parser = parse_date)]
    as_of: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
struct TriageRunRequest {
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    as_of: Option<NaiveDate>,
    worklist_csv: String,
}

#[tokio::main]
async fn main() {
    if let Err(err) = run_cli().await {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

async fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => run_server(args).await,
        Command::Run(args) => run_triage(args),
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

fn deserialize_optional_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    opt.map(|value| parse_date(&value).map_err(serde::de::Error::custom))
        .transpose()
}

async fn run_server(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let state = AppState {
        readiness: readiness_flag.clone(),
        metrics: prometheus_handle,
        triage: config.triage.clone(),
    };

    let app = Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/v1/triage/run", post(triage_run_endpoint))
        .layer(prometheus_layer)
        .with_state(state);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "relocation case triage ready");

    axum::serve(listener, app).await?;
    Ok(())
}

fn run_triage(args: RunArgs) -> Result<(), AppError> {
    let RunArgs {
        worklist_csv,
        as_of,
    } = args;

    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let as_of = as_of.unwrap_or_else(|| Local::now().date_naive());
    let portal = FixturePortal::from_path(worklist_csv)?;
    let report = execute_fixture_run(portal, config.triage, as_of)?;

    render_run_report(&report, as_of);
    Ok(())
}

fn execute_fixture_run(
    portal: FixturePortal,
    settings: TriageSettings,
    as_of: NaiveDate,
) -> Result<RunReport, AppError> {
    let portal = Arc::new(portal);
    let queue = Arc::new(MemoryWorkQueue::default());
    let service = CaseTriageService::new(
        portal.clone(),
        portal.clone(),
        portal,
        queue,
        Arc::new(TracingEventLog),
        EvaluationConfig::default(),
        settings,
    );

    Ok(service.run(as_of)?)
}

async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn readiness_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

async fn metrics_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

async fn triage_run_endpoint(
    State(state): State<AppState>,
    Json(payload): Json<TriageRunRequest>,
) -> Result<Json<RunReport>, AppError> {
    let TriageRunRequest {
        as_of,
        worklist_csv,
    } = payload;

    let as_of = as_of.unwrap_or_else(|| Local::now().date_naive());
    let portal = FixturePortal::from_reader(worklist_csv.as_bytes())?;
    let report = execute_fixture_run(portal, state.triage.clone(), as_of)?;

    Ok(Json(report))
}

fn render_run_report(report: &RunReport, as_of: NaiveDate) {
    println!("Triage run (evaluated {as_of})");
    println!(
        "Worklist: {} cases, {} eligible after type filter",
        report.searched, report.eligible
    );
    println!(
        "Approved {}, skipped {}, declined by attempt history {}, deferred {}",
        report.approved, report.skipped, report.declined, report.deferred
    );

    if report.cases.is_empty() {
        println!("\nNo eligible cases.");
        return;
    }

    println!("\nCase breakdown");
    for case in &report.cases {
        println!(
            "- {} | {} | {}",
            case.case_number, case.disposition, case.detail
        );
    }
}
