use chrono::Utc;
use clap::Parser;
use database::{db::create_connection, services::save_catalog::SaveCatalogService};
use datafetcher::{
    api::{CatalogClient, DEFAULT_API_URL},
    catalog::{
        DepartmentListing, build_rows,
        normalize::{normalize_departments, normalize_terms},
    },
    error::{CatalogError, TransportError},
    util::settle,
};
use log::{error, info};
use migration::{Migrator, MigratorTrait};
use models::{instructor::InstructorCache, term::Term};
use sea_orm::DbErr;
use std::process::ExitCode;
use thiserror::Error;

/// Ingests one term of the course catalog into the database
#[derive(Parser, Debug)]
#[command(name = "catalog")]
#[command(version)]
struct Args {
    /// Five-digit term code, e.g. 20241 (defaults to the latest listed term)
    term: Option<Term>,

    /// Database connection string
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,

    /// Root of the catalog API
    #[arg(long, env = "CATALOG_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,
}

#[derive(Debug, Error)]
enum RunError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("{} department listings could not be fetched", .0.len())]
    Retrieval(Vec<TransportError>),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("the catalog lists no terms")]
    NoTerms,

    #[error(transparent)]
    Database(#[from] DbErr),

    #[error("{0} entity types were only partially saved")]
    Upsert(usize),
}

/// Picks the most recent term the catalog serves
async fn latest_term(client: &CatalogClient) -> Result<Term, RunError> {
    let terms = normalize_terms(&client.fetch_terms().await?)
        .map_err(|e| e.context("term listing"))?;

    terms
        .into_iter()
        .max_by_key(Term::code)
        .ok_or(RunError::NoTerms)
}

/// Fetches every department's listing concurrently, failing if any fetch did
async fn fetch_listings(client: &CatalogClient, term: &Term) -> Result<Vec<DepartmentListing>, RunError> {
    let code = term.code();
    let departments = normalize_departments(&client.fetch_departments(&code).await?)
        .map_err(|e| e.context("department listing"))?;
    info!("Got {} departments for {term}", departments.len());

    let code = code.as_str();
    let fetches = departments.into_iter().map(move |department| async move {
        let payload = client.fetch_courses(code, &department.code).await?;
        Ok::<_, TransportError>(DepartmentListing {
            department,
            payload,
        })
    });

    settle(fetches).await.into_result().map_err(|errors| {
        for e in &errors {
            error!("{e}");
        }
        RunError::Retrieval(errors)
    })
}

async fn run(args: Args) -> Result<(), RunError> {
    let client = CatalogClient::new(args.api_url);
    let term = match args.term {
        Some(term) => term,
        None => latest_term(&client).await?,
    };
    info!("Ingesting {term} (term code {})", term.code());

    let listings = fetch_listings(&client, &term).await?;
    info!("Got all courses");

    let mut cache = InstructorCache::new();
    let rows = build_rows(&term, &listings, &mut cache)?;

    let db = create_connection(&args.database_url).await?;
    Migrator::up(&db, None).await?;

    let report = SaveCatalogService::default()
        .save_catalog(&db, &rows, &mut cache, Utc::now().naive_utc())
        .await;

    if !report.is_success() {
        for e in report.failures() {
            error!("{e}");
        }
        return Err(RunError::Upsert(report.failures().count()));
    }

    info!("Ingested {term}: {} instructors on record", cache.len());
    Ok(())
}

/// Orchestrates a full ingestion run
#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
