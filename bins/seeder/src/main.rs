//! Database seeder for Tieout development and testing.
//!
//! Seeds the demo tenant (Acme Trading Ltd) and then runs every statement
//! and note for March 2024 against it, so a fresh database can be checked
//! end to end.
//!
//! Usage:
//!   seeder            - Seed the configured database, then report
//!   seeder --dry-run  - Load the demo tenant into memory and report only

mod demo;

use std::sync::Arc;

use anyhow::Context;
use tieout_core::notes::NoteCode;
use tieout_core::source::DataSources;
use tieout_core::source::memory::InMemoryStore;
use tieout_core::{EngineSettings, ReportingEngine};
use tieout_db::{PeriodRepository, TenantRepository};
use tieout_shared::config::LoggingConfig;
use tieout_shared::types::{AccountingPeriodId, DateRange};
use tieout_shared::{AppConfig, telemetry};
use tracing::{info, warn};

use demo::{DEMO_TENANT_ID, DemoLedger};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let demo = DemoLedger::build();
    let march = demo
        .first_trading_period()
        .context("demo ledger has no trading period")?
        .range();

    if std::env::args().any(|arg| arg == "--dry-run") {
        telemetry::init(&LoggingConfig::default());

        let store = Arc::new(InMemoryStore::new());
        demo.load_into(&store);
        let engine = ReportingEngine::new(DataSources::from_store(store), EngineSettings::default());
        let period_id = demo
            .first_trading_period()
            .map(|p| p.id)
            .context("demo ledger has no trading period")?;

        info!("Dry run: demo tenant loaded into memory");
        return report(&engine, march, period_id).await;
    }

    let config = AppConfig::load().context("Failed to load configuration")?;
    telemetry::init(&config.logging);

    let db = tieout_db::connect_with(&config.database)
        .await
        .context("Failed to connect to database")?;
    info!("Connected to database");

    if TenantRepository::new(db.clone())
        .find_by_id(DEMO_TENANT_ID)
        .await?
        .is_some()
    {
        info!(tenant_id = %DEMO_TENANT_ID, "Demo tenant already exists, skipping seed");
    } else {
        demo.write_to(&db).await.context("Failed to seed demo tenant")?;
        info!(tenant_id = %DEMO_TENANT_ID, "Seeded demo tenant");
    }

    let period_id = PeriodRepository::new(db.clone())
        .list(DEMO_TENANT_ID, Some(march))
        .await?
        .into_iter()
        .find(|p| p.range() == march)
        .map(|p| p.id)
        .context("March 2024 period missing for demo tenant")?;

    let engine = ReportingEngine::new(
        tieout_db::data_sources(&db),
        EngineSettings::from(&config.reporting),
    );
    report(&engine, march, period_id).await
}

/// Produces every statement and note for `range` and logs the headline figures.
async fn report(
    engine: &ReportingEngine,
    range: DateRange,
    period_id: AccountingPeriodId,
) -> anyhow::Result<()> {
    let tenant = DEMO_TENANT_ID;

    let trial_balance = engine.trial_balance(tenant, range).await?;
    info!(
        debits = %trial_balance.totals.total_debit,
        credits = %trial_balance.totals.total_credit,
        "Trial balance"
    );

    let pnl = engine.profit_and_loss(tenant, range).await?;
    info!(profit = %pnl.profit_or_loss, "Profit and loss");

    let sheet = engine.balance_sheet(tenant, range.to).await?;
    info!(
        assets = %sheet.total_assets,
        liabilities_and_equity = %sheet.liabilities_and_equity,
        balanced = sheet.is_balanced,
        "Balance sheet"
    );

    let equity = engine.changes_in_equity(tenant, range).await?;
    info!(closing = %equity.total.closing, "Changes in equity");

    let cash_flow = engine.cash_flow(tenant, range).await?;
    info!(
        net_change = %cash_flow.net_change_in_cash,
        closing_cash = %cash_flow.closing_cash,
        "Cash flow"
    );

    for code in NoteCode::ALL {
        match engine.ifrs_note(tenant, code, range).await {
            Ok(note) => info!(
                note = code.letter(),
                title = %note.title,
                tie_outs = note.tie_outs.len(),
                "Note ties out"
            ),
            Err(e) => warn!(note = code.letter(), error = %e, "Note failed"),
        }
    }

    let notes = engine.generate_period_close_notes(tenant, period_id).await?;
    for note in &notes {
        info!(
            note_type = note.note_type.as_str(),
            version = note.version,
            lines = note.lines.len(),
            "Period-close note stored"
        );
    }

    info!("Seeding complete!");
    Ok(())
}
