//! Engine tests against the in-memory store.

use std::sync::Arc;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tieout_shared::types::{AccountingPeriodId, DateRange, FixedAssetId, TenantId};

use super::fixture::{Fixture, d, range};
use super::*;
use crate::fiscal::PeriodStatus;
use crate::notes::PeriodCloseNoteType;
use crate::reports::StatementKind;
use crate::source::memory::InMemoryStore;
use crate::source::{DataSources, NoteStore, SourceError};
use crate::subledger::FixedAsset;

#[tokio::test]
async fn test_balance_sheet_balances_with_retained_earnings_plug() {
    let fx = Fixture::new();
    let bs = fx.engine().balance_sheet(fx.tenant, d(2024, 3, 31)).await.unwrap();

    assert_eq!(bs.total_assets, dec!(15600));
    assert_eq!(bs.total_liabilities, dec!(1900));
    assert_eq!(bs.equity.share_capital, dec!(10000));
    assert_eq!(bs.equity.retained_earnings, dec!(3700));
    assert_eq!(bs.total_assets, bs.total_liabilities + bs.total_equity);
    assert!(bs.is_balanced);
}

#[tokio::test]
async fn test_balance_sheet_before_cutover_fails() {
    let fx = Fixture::new();
    let err = fx.engine().balance_sheet(fx.tenant, d(2024, 2, 15)).await.unwrap_err();

    assert_eq!(
        err,
        ReportingError::CutoverViolation { as_of: d(2024, 2, 15), cutover: d(2024, 3, 1) }
    );
}

#[tokio::test]
async fn test_range_entirely_before_cutover_is_all_zero() {
    let fx = Fixture::new();
    let pnl = fx
        .engine()
        .profit_and_loss(fx.tenant, range("2024-01-01", "2024-02-15"))
        .await
        .unwrap();

    assert_eq!(*pnl, ProfitAndLossReport::empty(range("2024-01-01", "2024-02-15")));
}

#[tokio::test]
async fn test_range_straddling_cutover_is_clipped() {
    let fx = Fixture::new();
    let pnl = fx
        .engine()
        .profit_and_loss(fx.tenant, range("2024-02-01", "2024-03-15"))
        .await
        .unwrap();

    assert_eq!(pnl.range, range("2024-03-01", "2024-03-15"));
    // The February sale sits before the cutover.
    assert_eq!(pnl.revenue.total, dec!(5000));
}

#[tokio::test]
async fn test_coverage_gap_is_reported() {
    let store = Arc::new(InMemoryStore::new());
    let tenant = TenantId::new();
    store.add_tenant(Fixture::profile(tenant));
    store.add_period(Fixture::period(tenant, "Jan", d(2024, 1, 1), d(2024, 1, 31), PeriodStatus::Open));
    store.add_period(Fixture::period(tenant, "Feb", d(2024, 2, 5), d(2024, 2, 28), PeriodStatus::Open));
    let engine = ReportingEngine::new(DataSources::from_store(store), EngineSettings::default());

    let err = engine
        .profit_and_loss(tenant, range("2024-01-01", "2024-02-28"))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ReportingError::PeriodCoverageGap { first_uncovered, .. } if first_uncovered == d(2024, 2, 1)
    ));

    assert!(engine.profit_and_loss(tenant, range("2024-01-01", "2024-01-31")).await.is_ok());
}

#[tokio::test]
async fn test_statements_tie_to_balance_sheet() {
    let fx = Fixture::new();
    let engine = fx.engine();
    let march = range("2024-03-01", "2024-03-31");

    let bs = engine.balance_sheet(fx.tenant, march.to).await.unwrap();
    let soce = engine.changes_in_equity(fx.tenant, march).await.unwrap();
    let cf = engine.cash_flow(fx.tenant, march).await.unwrap();

    assert_eq!(soce.total.opening, dec!(10700));
    assert_eq!(soce.total.profit_or_loss, dec!(3000));
    assert_eq!(soce.total.other_movements, Decimal::ZERO);
    assert_eq!(soce.total.closing, bs.equity.total);

    assert_eq!(cf.opening_cash, dec!(10700));
    assert_eq!(cf.closing_cash, bs.net_cash());
    assert_eq!(cf.ppe_purchases(), dec!(6000));
    assert_eq!(cf.operating.total, dec!(3000));
    assert_eq!(cf.unclassified, Decimal::ZERO);
}

#[tokio::test]
async fn test_trial_balance_is_balanced() {
    let fx = Fixture::new();
    let tb = fx
        .engine()
        .trial_balance(fx.tenant, range("2024-03-01", "2024-03-31"))
        .await
        .unwrap();

    assert!(tb.totals.is_balanced);
    assert_eq!(tb.totals.total_debit, dec!(16000));
}

#[tokio::test]
async fn test_every_note_ties_out() {
    let fx = Fixture::new();
    let engine = fx.engine();
    let march = range("2024-03-01", "2024-03-31");

    for code in NoteCode::ALL {
        let note = engine.ifrs_note(fx.tenant, code, march).await.unwrap();
        assert_eq!(note.code, code);
        assert_eq!(note.entity_name, "Acme Trading Ltd");
        assert!(!note.tie_outs.is_empty());
        assert!(note.tie_outs.iter().all(|t| t.difference.is_zero()));
    }
}

#[tokio::test]
async fn test_ppe_note_fails_when_purchase_is_expensed() {
    let fx = Fixture::new();
    // Capitalised in the register, but the cash payment hit an expense account.
    fx.store.add_fixed_asset(FixedAsset {
        id: FixedAssetId::new(),
        tenant_id: fx.tenant,
        name: "Laptop".to_string(),
        cost: dec!(1200),
        acquisition_date: d(2024, 3, 15),
        disposal_date: None,
    });
    fx.post(d(2024, 3, 15), fx.expenses, fx.cash, dec!(1200));

    let err = fx
        .engine()
        .ifrs_note(fx.tenant, NoteCode::PropertyPlantEquipment, range("2024-03-01", "2024-03-31"))
        .await
        .unwrap_err();

    let ReportingError::Reconciliation(failure) = err else {
        panic!("expected a reconciliation error, got {err:?}");
    };
    assert_eq!(failure.note, NoteCode::PropertyPlantEquipment);
    assert_eq!(failure.statement, StatementKind::CashFlow);
    assert_eq!(failure.difference, dec!(1200));
    assert!(failure.to_string().contains("Note C"));
}

#[tokio::test]
async fn test_tax_note_requires_tagged_accounts() {
    let fx = Fixture::without_tax_tags();
    let err = fx
        .engine()
        .ifrs_note(fx.tenant, NoteCode::IncomeTax, range("2024-03-01", "2024-03-31"))
        .await
        .unwrap_err();

    assert!(matches!(err, ReportingError::Configuration(ref msg) if msg.contains("TAX:")));
}

#[tokio::test]
async fn test_notes_require_legal_name() {
    let fx = Fixture::new();
    fx.store.add_tenant(TenantProfile {
        legal_name: None,
        ..Fixture::profile(fx.tenant)
    });

    let err = fx
        .engine()
        .ifrs_note(fx.tenant, NoteCode::TradeReceivables, range("2024-03-01", "2024-03-31"))
        .await
        .unwrap_err();
    assert!(matches!(err, ReportingError::Configuration(_)));
}

#[tokio::test]
async fn test_note_range_before_cutover_fails() {
    let fx = Fixture::new();
    let err = fx
        .engine()
        .ifrs_note(fx.tenant, NoteCode::TradePayables, range("2024-01-01", "2024-01-31"))
        .await
        .unwrap_err();
    assert!(matches!(err, ReportingError::CutoverViolation { .. }));
}

#[tokio::test]
async fn test_period_close_notes_are_versioned() {
    let fx = Fixture::new();
    let engine = fx.engine();

    let first = engine.generate_period_close_notes(fx.tenant, fx.march).await.unwrap();
    let second = engine.generate_period_close_notes(fx.tenant, fx.march).await.unwrap();

    assert_eq!(first.len(), 3);
    assert!(first.iter().all(|n| n.version == 1));
    assert!(second.iter().all(|n| n.version == 2));
    assert_eq!(
        first.iter().map(|n| &n.lines).collect::<Vec<_>>(),
        second.iter().map(|n| &n.lines).collect::<Vec<_>>()
    );

    let tax = second
        .iter()
        .find(|n| n.note_type == PeriodCloseNoteType::TaxReconciliation)
        .unwrap();
    let amounts: Vec<Decimal> = tax.lines.iter().map(|l| l.amount).collect();
    assert_eq!(amounts, vec![dec!(3900), dec!(975.00), dec!(-75.00), dec!(900), dec!(23.08)]);
}

/// Note store whose writes always fail, as a rolled-back transaction would.
struct RejectingNotes {
    inner: Arc<InMemoryStore>,
    single_writes: std::sync::atomic::AtomicUsize,
}

#[async_trait::async_trait]
impl NoteStore for RejectingNotes {
    async fn upsert_note(&self, _note: DisclosureNote) -> Result<DisclosureNote, SourceError> {
        self.single_writes.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        Err(SourceError::Unavailable("write failed".into()))
    }

    async fn replace_period_notes(
        &self,
        _notes: Vec<DisclosureNote>,
    ) -> Result<Vec<DisclosureNote>, SourceError> {
        Err(SourceError::Unavailable("write failed".into()))
    }

    async fn list_notes(
        &self,
        tenant_id: TenantId,
        period_id: AccountingPeriodId,
    ) -> Result<Vec<DisclosureNote>, SourceError> {
        self.inner.list_notes(tenant_id, period_id).await
    }
}

#[tokio::test]
async fn test_failed_period_close_write_keeps_previous_versions() {
    let fx = Fixture::new();
    fx.engine().generate_period_close_notes(fx.tenant, fx.march).await.unwrap();

    let notes = Arc::new(RejectingNotes {
        inner: fx.store.clone(),
        single_writes: std::sync::atomic::AtomicUsize::new(0),
    });
    let mut sources = DataSources::from_store(fx.store.clone());
    sources.notes = notes.clone();
    let engine = ReportingEngine::new(sources, EngineSettings::default());

    let err = engine.generate_period_close_notes(fx.tenant, fx.march).await.unwrap_err();
    assert!(matches!(err, ReportingError::DataStore(_)));
    assert_eq!(notes.single_writes.load(std::sync::atomic::Ordering::SeqCst), 0);

    let stored = fx.store.list_notes(fx.tenant, fx.march).await.unwrap();
    assert_eq!(stored.len(), 3);
    assert!(stored.iter().all(|n| n.version == 1));
}

#[tokio::test]
async fn test_inverted_range_is_a_validation_error() {
    let fx = Fixture::new();
    let engine = fx.engine();
    let inverted = DateRange { from: d(2024, 3, 31), to: d(2024, 3, 1) };

    let err = engine.profit_and_loss(fx.tenant, inverted).await.unwrap_err();
    assert!(matches!(err, ReportingError::Validation(_)));
    assert!(matches!(
        engine.trial_balance(fx.tenant, inverted).await.unwrap_err(),
        ReportingError::Validation(_)
    ));
    assert!(matches!(
        engine.cash_flow(fx.tenant, inverted).await.unwrap_err(),
        ReportingError::Validation(_)
    ));
    assert!(matches!(
        engine.changes_in_equity(fx.tenant, inverted).await.unwrap_err(),
        ReportingError::Validation(_)
    ));
    assert!(matches!(
        engine.ifrs_note(fx.tenant, NoteCode::TradeReceivables, inverted).await.unwrap_err(),
        ReportingError::Validation(_)
    ));
}

#[tokio::test]
async fn test_period_close_notes_need_statutory_rate_and_known_period() {
    let fx = Fixture::new();
    let engine = fx.engine();

    let err = engine
        .generate_period_close_notes(fx.tenant, AccountingPeriodId::new())
        .await
        .unwrap_err();
    assert!(matches!(err, ReportingError::PeriodNotFound(_)));

    fx.store.add_tenant(TenantProfile {
        statutory_tax_rate: None,
        ..Fixture::profile(fx.tenant)
    });
    let err = engine.generate_period_close_notes(fx.tenant, fx.march).await.unwrap_err();
    assert!(matches!(err, ReportingError::Configuration(_)));
}

#[tokio::test]
async fn test_cached_until_tenant_invalidated() {
    let fx = Fixture::new();
    let engine = fx.engine();
    let as_of = d(2024, 3, 31);

    let before = engine.balance_sheet(fx.tenant, as_of).await.unwrap();
    fx.post(d(2024, 3, 30), fx.cash, fx.sales, dec!(50));

    let cached = engine.balance_sheet(fx.tenant, as_of).await.unwrap();
    assert_eq!(cached.total_assets, before.total_assets);

    engine.invalidate_tenant(fx.tenant);
    let fresh = engine.balance_sheet(fx.tenant, as_of).await.unwrap();
    assert_eq!(fresh.total_assets, before.total_assets + dec!(50));
}

#[tokio::test]
async fn test_identical_inputs_give_identical_totals() {
    let fx = Fixture::new();
    let engine = fx.uncached_engine();
    let march = range("2024-03-01", "2024-03-31");

    let a = engine.cash_flow(fx.tenant, march).await.unwrap();
    let b = engine.cash_flow(fx.tenant, march).await.unwrap();
    assert_eq!(a, b);
    assert_eq!(a.net_change_in_cash.to_string(), b.net_change_in_cash.to_string());
}

#[tokio::test]
async fn test_store_failure_is_a_hard_error() {
    let fx = Fixture::new();
    fx.store.set_unavailable(true);

    let err = fx
        .uncached_engine()
        .trial_balance(fx.tenant, range("2024-03-01", "2024-03-31"))
        .await
        .unwrap_err();
    assert!(matches!(err, ReportingError::DataStore(_)));
}

#[tokio::test]
async fn test_unknown_tenant() {
    let fx = Fixture::new();
    let other = TenantId::new();
    let err = fx
        .engine()
        .trial_balance(other, range("2024-03-01", "2024-03-31"))
        .await
        .unwrap_err();
    assert_eq!(err, ReportingError::TenantNotFound(other));
}

#[tokio::test]
async fn test_classification_report_flags_fallbacks() {
    let fx = Fixture::new();
    let report = fx.engine().classification_report(fx.tenant).await.unwrap();

    let review: Vec<&str> = report.needs_review().map(|e| e.code.as_str()).collect();
    assert_eq!(review, vec!["1900"]);
}
