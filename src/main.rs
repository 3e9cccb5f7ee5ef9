use anyhow::{bail, Context, Result};
use chrono::{Datelike, Utc};
use rust_decimal::Decimal;
use std::env;
use std::path::Path;
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use tracing::info;

use esg_disclosure::{
    import_emissions_from_path, logging, open_database, AppConfig, DisclosureService,
};

const USAGE: &str = "\
Usage:
  esg-disclosure import <csv>
  esg-disclosure report <year>
  esg-disclosure target <baseline_year> <current_year> <target_pct>

Environment: ESG_CONFIG (JSON file), ESG_DB_PATH, ESG_MIN_REPORTING_YEAR, ESG_CREATED_BY, ESG_LOG";

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    if !matches!(args.get(1).map(String::as_str), Some("import" | "report" | "target")) {
        eprintln!("{}", USAGE);
        std::process::exit(2);
    }

    let config_path = env::var("ESG_CONFIG").ok();
    let config = AppConfig::load(config_path.as_deref().map(Path::new))
        .context("Failed to load configuration")?;
    logging::init(&config.log_filter);

    let service = open_service(&config)?;

    match args.get(1).map(String::as_str) {
        Some("import") => {
            let csv_path = args.get(2).context("import needs a CSV path")?;
            run_import(&service, Path::new(csv_path))
        }
        Some("report") => {
            let year = parse_year(args.get(2), "year")?;
            run_report(&service, year)
        }
        Some("target") => {
            let baseline = parse_year(args.get(2), "baseline_year")?;
            let current = parse_year(args.get(3), "current_year")?;
            let pct = args
                .get(4)
                .context("target needs a reduction percentage")
                .and_then(|raw| {
                    Decimal::from_str(raw).with_context(|| format!("'{}' is not a percentage", raw))
                })?;
            run_target(&service, baseline, current, pct)
        }
        _ => unreachable!("command checked above"),
    }
}

fn parse_year(arg: Option<&String>, name: &str) -> Result<i32> {
    let raw = arg.with_context(|| format!("missing {}", name))?;
    raw.parse()
        .with_context(|| format!("{} must be a year, got '{}'", name, raw))
}

fn open_service(config: &AppConfig) -> Result<DisclosureService> {
    let conn = open_database(&config.database_path)
        .with_context(|| format!("Failed to open database {:?}", config.database_path))?;

    let context = config.validation_context(Utc::now().year());
    info!(
        db = %config.database_path.display(),
        min_year = context.min_reporting_year,
        max_year = context.max_reporting_year(),
        "disclosure store opened"
    );

    Ok(DisclosureService::sqlite(Arc::new(Mutex::new(conn)), context)
        .with_created_by(config.created_by.clone()))
}

fn run_import(service: &DisclosureService, csv_path: &Path) -> Result<()> {
    println!("📥 Emission Import - CSV → SQLite");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    if !csv_path.exists() {
        bail!("CSV file not found: {:?}", csv_path);
    }

    println!("\n📂 Loading {:?}...", csv_path);
    let summary = import_emissions_from_path(service, csv_path)?;

    println!("✓ Imported {} of {} rows", summary.imported, summary.total_rows());
    if summary.warnings > 0 {
        println!("⚠️  {} warnings raised (records saved)", summary.warnings);
    }

    for rejected in &summary.rejected {
        println!("❌ Line {}: {}", rejected.line, rejected.reason);
        for finding in &rejected.findings {
            println!("     {}", finding);
        }
    }

    println!("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    if summary.rejected.is_empty() {
        println!("✅ Import complete");
    } else {
        println!("⚠️  Import finished with {} rejected rows", summary.rejected.len());
    }

    Ok(())
}

fn run_report(service: &DisclosureService, year: i32) -> Result<()> {
    println!("📊 ESG Disclosure Report - {}", year);
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let assessment = service.assess_year(year)?;

    println!("\n🧾 ESRS completeness: {}", assessment.esrs.summary());
    if !assessment.esrs.missing.is_empty() {
        println!("   Missing: {}", assessment.esrs.missing.join(", "));
    }

    println!("\n🏭 Emissions completeness: {}", assessment.emissions.summary());
    if !assessment.emissions.missing.is_empty() {
        println!("   Missing: {}", assessment.emissions.missing.join(", "));
    }

    println!("\n📈 Emission trend (tCO2e)");
    let yoy = service.year_over_year()?;
    if yoy.is_empty() {
        println!("   (no emission records)");
    }
    for row in &yoy {
        match row.change_percentage {
            Some(change) => {
                let sign = if change.is_sign_positive() && !change.is_zero() { "+" } else { "" };
                println!("   {}: {} ({}{}%)", row.year, row.total, sign, change.round_dp(2));
            }
            None => println!("   {}: {}", row.year, row.total),
        }
    }

    if let Some(share) = service.renewable_share(year)? {
        println!("\n⚡ Renewable share {}: {}%", year, share.round_dp(2));
    }

    let topics = service.material_topics(year)?;
    if !topics.is_empty() {
        println!("\n🎯 Material topics {}", year);
        for topic in &topics {
            println!("   {} (score {})", topic.topic, topic.materiality_score());
        }
    }

    println!("\n🔍 Verification status");
    for (status, count) in service.verification_statistics()? {
        println!("   {}: {}", status, count);
    }

    Ok(())
}

fn run_target(
    service: &DisclosureService,
    baseline_year: i32,
    current_year: i32,
    target_pct: Decimal,
) -> Result<()> {
    let check = service.check_target(baseline_year, current_year, target_pct)?;

    println!("🎯 Reduction Target Check");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("{}", check.summary());

    if check.achieved {
        println!("✅ Target met");
    } else {
        println!("❌ Target not met");
    }

    Ok(())
}
