//! The reporting engine.
//!
//! Wires the collaborators, the period normalizer, the aggregator, the
//! statement computers and the note builders together. Every public method
//! takes a tenant and date parameters and either returns a complete,
//! reconciled result or an error; nothing is ever written to the ledger.
//!
//! Point-in-time checks (cutover, coverage up to the as-of date) run on
//! every balance sheet request before the cache is consulted, so the cached
//! balance sheet can be shared with the opening positions that SOCE and the
//! cash flow statement read internally.

mod settings;

#[cfg(test)]
pub(crate) mod fixture;
#[cfg(test)]
mod tests;

pub use settings::EngineSettings;

use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};

use chrono::NaiveDate;
use futures::FutureExt;
use tieout_shared::types::{AccountingPeriodId, DateRange, TenantId};

use crate::audit::{self, AuditEvent, AuditKind, AuditSink, TracingAuditSink};
use crate::cache::{CacheKey, CachedStatement, MokaStatementCache, StatementCache, StatementKey};
use crate::classify::{
    AccountClassifier, BalanceSheetBucket, ClassificationReport, ClassificationSource,
};
use crate::fiscal::{AccountingPeriod, PeriodNormalizer, RangeResolution};
use crate::ledger::{Account, AccountBalance, AccountFilter, AccountType, LedgerAggregator, PostingWindow};
use crate::notes::{
    AgeingSchedule, DisclosureNote, IfrsNote, IncomeTaxMovement, NoteCode, NoteContext, NoteService,
    PeriodCloseNoteType, PpeSchedule,
};
use crate::reports::{
    BalanceSheetReport, CashFlowInputs, CashFlowReport, ChangesInEquityReport, ProfitAndLossReport,
    ReportService, ReportingError, TrialBalanceReport,
};
use crate::source::DataSources;
use crate::subledger::OpenItemKind;
use crate::tenant::TenantProfile;

/// Computes statements and notes for any tenant.
pub struct ReportingEngine {
    sources: DataSources,
    cache: Arc<dyn StatementCache>,
    audit: Arc<dyn AuditSink>,
    settings: EngineSettings,
    reviewed_charts: Mutex<HashSet<TenantId>>,
}

impl std::fmt::Debug for ReportingEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReportingEngine")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl ReportingEngine {
    /// Creates an engine with a Moka statement cache and audit events
    /// written to the log.
    #[must_use]
    pub fn new(sources: DataSources, settings: EngineSettings) -> Self {
        let cache = MokaStatementCache::new(settings.cache_capacity, settings.cache_ttl);
        Self {
            sources,
            cache: Arc::new(cache),
            audit: Arc::new(TracingAuditSink),
            settings,
            reviewed_charts: Mutex::new(HashSet::new()),
        }
    }

    /// Replaces the statement cache.
    #[must_use]
    pub fn with_cache(mut self, cache: Arc<dyn StatementCache>) -> Self {
        self.cache = cache;
        self
    }

    /// Replaces the audit sink.
    #[must_use]
    pub fn with_audit_sink(mut self, audit: Arc<dyn AuditSink>) -> Self {
        self.audit = audit;
        self
    }

    /// Engine settings.
    #[must_use]
    pub const fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    // ------------------------------------------------------------------
    // Statements
    // ------------------------------------------------------------------

    /// Trial balance over `range`.
    pub async fn trial_balance(
        &self,
        tenant_id: TenantId,
        range: DateRange,
    ) -> Result<Arc<TrialBalanceReport>, ReportingError> {
        let range = range.validated()?;
        let key = CacheKey {
            tenant_id,
            statement: StatementKey::TrialBalance(range),
        };
        let report = self
            .cache
            .get_or_compute(key, self.compute_trial_balance(tenant_id, range).boxed())
            .await?
            .into_trial_balance()?;
        self.audit_statement(key, range.to_string());
        Ok(report)
    }

    /// Profit and loss over `range`.
    pub async fn profit_and_loss(
        &self,
        tenant_id: TenantId,
        range: DateRange,
    ) -> Result<Arc<ProfitAndLossReport>, ReportingError> {
        let range = range.validated()?;
        let report = self.cached_profit_and_loss(tenant_id, range).await?;
        self.audit_statement(
            CacheKey {
                tenant_id,
                statement: StatementKey::ProfitAndLoss(range),
            },
            range.to_string(),
        );
        Ok(report)
    }

    /// Balance sheet at the end of `as_of`.
    ///
    /// # Errors
    ///
    /// Fails with `CutoverViolation` if `as_of` is before the cutover date,
    /// and with `PeriodCoverageGap` if the periods leading up to `as_of`
    /// have a hole.
    pub async fn balance_sheet(
        &self,
        tenant_id: TenantId,
        as_of: NaiveDate,
    ) -> Result<Arc<BalanceSheetReport>, ReportingError> {
        self.require_tenant(tenant_id).await?;
        let periods = self.periods(tenant_id).await?;
        PeriodNormalizer::check_as_of(&periods, as_of)?;

        let report = self.cached_balance_sheet(tenant_id, as_of).await?;
        self.audit_statement(
            CacheKey {
                tenant_id,
                statement: StatementKey::BalanceSheet(as_of),
            },
            format!("asOf={as_of}"),
        );
        Ok(report)
    }

    /// Statement of changes in equity over `range`.
    pub async fn changes_in_equity(
        &self,
        tenant_id: TenantId,
        range: DateRange,
    ) -> Result<Arc<ChangesInEquityReport>, ReportingError> {
        let range = range.validated()?;
        let key = CacheKey {
            tenant_id,
            statement: StatementKey::ChangesInEquity(range),
        };
        let report = self
            .cache
            .get_or_compute(key, self.compute_changes_in_equity(tenant_id, range).boxed())
            .await?
            .into_changes_in_equity()?;
        self.audit_statement(key, range.to_string());
        Ok(report)
    }

    /// Cash flow statement over `range`.
    pub async fn cash_flow(
        &self,
        tenant_id: TenantId,
        range: DateRange,
    ) -> Result<Arc<CashFlowReport>, ReportingError> {
        let range = range.validated()?;
        let report = self.cached_cash_flow(tenant_id, range).await?;
        self.audit_statement(
            CacheKey {
                tenant_id,
                statement: StatementKey::CashFlow(range),
            },
            range.to_string(),
        );
        Ok(report)
    }

    // ------------------------------------------------------------------
    // Notes
    // ------------------------------------------------------------------

    /// Builds IFRS note `code` for `range` and ties it out to the statements.
    ///
    /// Notes need a range on or after the cutover date: their balance sheet
    /// figures are point-in-time values at the end of the range.
    ///
    /// # Errors
    ///
    /// `Configuration` when the tenant has no legal name or currency, or the
    /// chart has no account the note can be computed from; `Reconciliation`
    /// when a figure does not tie out.
    pub async fn ifrs_note(
        &self,
        tenant_id: TenantId,
        code: NoteCode,
        range: DateRange,
    ) -> Result<IfrsNote, ReportingError> {
        let range = range.validated()?;
        let profile = self.require_tenant(tenant_id).await?;
        let identity = profile
            .reporting_identity()
            .map_err(ReportingError::Configuration)?;
        let chart = self.chart(tenant_id).await?;
        Self::require_note_accounts(code, &chart)?;

        let periods = self.periods(tenant_id).await?;
        let range = Self::resolve_note_range(&periods, range)?;
        let ctx = NoteContext {
            identity: &identity,
            range,
            tolerance: self.settings.tie_out_tolerance,
        };

        let note = match code {
            NoteCode::PropertyPlantEquipment => self.ppe_note(&ctx, tenant_id).await,
            NoteCode::IncomeTax => self.income_tax_note(&ctx, tenant_id, &chart).await,
            NoteCode::TradeReceivables | NoteCode::TradePayables => {
                self.ageing_note(&ctx, tenant_id, code).await
            }
        };

        match &note {
            Ok(_) => audit::emit(
                &self.audit,
                AuditEvent::now(tenant_id, AuditKind::IfrsNote, code.letter(), range.to_string()),
            ),
            Err(ReportingError::Reconciliation(failure)) => tracing::warn!(
                note = %failure.note,
                statement = %failure.statement,
                tie_out = %failure.tie_out,
                difference = %failure.difference,
                "note does not tie out"
            ),
            Err(_) => {}
        }
        note
    }

    /// Regenerates and stores the period-close notes of one accounting period.
    ///
    /// Each note replaces the previously stored note of the same type, with
    /// its version incremented. The three notes are stored in one write, so
    /// a failure leaves the previous versions in place.
    ///
    /// # Errors
    ///
    /// `PeriodNotFound` for an unknown period, `Configuration` when the
    /// tenant has no statutory tax rate.
    pub async fn generate_period_close_notes(
        &self,
        tenant_id: TenantId,
        period_id: AccountingPeriodId,
    ) -> Result<Vec<DisclosureNote>, ReportingError> {
        let profile = self.require_tenant(tenant_id).await?;
        let statutory_rate = profile
            .statutory_rate()
            .map_err(ReportingError::Configuration)?;
        let period = self
            .sources
            .periods
            .find_period(tenant_id, period_id)
            .await?
            .ok_or(ReportingError::PeriodNotFound(period_id))?;

        let periods = self.periods(tenant_id).await?;
        let range = Self::resolve_note_range(&periods, period.range())?;

        let profit_and_loss = self.cached_profit_and_loss(tenant_id, range).await?;
        let assets = self.sources.subledgers.fixed_assets(tenant_id).await?;
        let charges = self
            .sources
            .subledgers
            .depreciation_charges(tenant_id, PostingWindow::up_to(range.to))
            .await?;
        let schedule = PpeSchedule::compute(range, &assets, &charges);
        let charges_in_period: Vec<_> = charges
            .into_iter()
            .filter(|c| range.contains(c.charge_date))
            .collect();

        let generated = [
            (
                PeriodCloseNoteType::PpeMovement,
                NoteService::ppe_movement_lines(&schedule),
            ),
            (
                PeriodCloseNoteType::Depreciation,
                NoteService::depreciation_lines(&assets, &charges_in_period),
            ),
            (
                PeriodCloseNoteType::TaxReconciliation,
                NoteService::tax_reconciliation_lines(&profit_and_loss, statutory_rate),
            ),
        ];

        let notes = generated
            .into_iter()
            .map(|(note_type, lines)| DisclosureNote::generated(tenant_id, period.id, note_type, lines))
            .collect();
        let stored = self.sources.notes.replace_period_notes(notes).await?;

        tracing::info!(notes = stored.len(), period = %period.name, "period-close notes stored");
        audit::emit(
            &self.audit,
            AuditEvent::now(
                tenant_id,
                AuditKind::PeriodCloseNotes,
                period.name.clone(),
                range.to_string(),
            ),
        );
        Ok(stored)
    }

    /// The tenant's reporting profile.
    ///
    /// # Errors
    ///
    /// `TenantNotFound` for an unknown tenant.
    pub async fn tenant_profile(&self, tenant_id: TenantId) -> Result<TenantProfile, ReportingError> {
        self.require_tenant(tenant_id).await
    }

    /// How every balance sheet account of the tenant is classified.
    pub async fn classification_report(
        &self,
        tenant_id: TenantId,
    ) -> Result<ClassificationReport, ReportingError> {
        self.require_tenant(tenant_id).await?;
        let chart = self.chart(tenant_id).await?;
        Ok(ClassificationReport::build(tenant_id, &chart))
    }

    // ------------------------------------------------------------------
    // Cache control
    // ------------------------------------------------------------------

    /// Drops cached statements of one tenant, e.g. after new postings.
    pub fn invalidate_tenant(&self, tenant_id: TenantId) {
        self.cache.invalidate_tenant(tenant_id);
        self.reviewed().remove(&tenant_id);
        tracing::debug!(%tenant_id, "statement cache invalidated");
    }

    /// Drops every cached statement.
    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
        self.reviewed().clear();
        tracing::debug!("statement cache cleared");
    }

    // ------------------------------------------------------------------
    // Cached building blocks
    // ------------------------------------------------------------------

    async fn cached_profit_and_loss(
        &self,
        tenant_id: TenantId,
        range: DateRange,
    ) -> Result<Arc<ProfitAndLossReport>, ReportingError> {
        let key = CacheKey {
            tenant_id,
            statement: StatementKey::ProfitAndLoss(range),
        };
        self.cache
            .get_or_compute(key, self.compute_profit_and_loss(tenant_id, range).boxed())
            .await?
            .into_profit_and_loss()
    }

    async fn cached_balance_sheet(
        &self,
        tenant_id: TenantId,
        as_of: NaiveDate,
    ) -> Result<Arc<BalanceSheetReport>, ReportingError> {
        let key = CacheKey {
            tenant_id,
            statement: StatementKey::BalanceSheet(as_of),
        };
        self.cache
            .get_or_compute(key, self.compute_balance_sheet(tenant_id, as_of).boxed())
            .await?
            .into_balance_sheet()
    }

    async fn cached_cash_flow(
        &self,
        tenant_id: TenantId,
        range: DateRange,
    ) -> Result<Arc<CashFlowReport>, ReportingError> {
        let key = CacheKey {
            tenant_id,
            statement: StatementKey::CashFlow(range),
        };
        self.cache
            .get_or_compute(key, self.compute_cash_flow(tenant_id, range).boxed())
            .await?
            .into_cash_flow()
    }

    /// Balance sheet the day before `range` starts.
    async fn opening_balance_sheet(
        &self,
        tenant_id: TenantId,
        range: DateRange,
    ) -> Result<Arc<BalanceSheetReport>, ReportingError> {
        let day_before = range.day_before().ok_or_else(|| {
            ReportingError::Validation(format!("range {range} starts at the earliest date"))
        })?;
        self.cached_balance_sheet(tenant_id, day_before).await
    }

    // ------------------------------------------------------------------
    // Computation (runs on cache misses)
    // ------------------------------------------------------------------

    async fn compute_trial_balance(
        &self,
        tenant_id: TenantId,
        range: DateRange,
    ) -> Result<CachedStatement, ReportingError> {
        let report = match self.effective_range(tenant_id, range).await? {
            RangeResolution::BeforeCutover => TrialBalanceReport::empty(range),
            RangeResolution::Effective(effective) => {
                let balances = self
                    .balances(tenant_id, &AccountFilter::All, PostingWindow::range(effective))
                    .await?;
                ReportService::generate_trial_balance(effective, &balances)
            }
        };
        Ok(CachedStatement::TrialBalance(Arc::new(report)))
    }

    async fn compute_profit_and_loss(
        &self,
        tenant_id: TenantId,
        range: DateRange,
    ) -> Result<CachedStatement, ReportingError> {
        let report = match self.effective_range(tenant_id, range).await? {
            RangeResolution::BeforeCutover => ProfitAndLossReport::empty(range),
            RangeResolution::Effective(effective) => {
                let filter = AccountFilter::Types(vec![AccountType::Income, AccountType::Expense]);
                let balances = self
                    .balances(tenant_id, &filter, PostingWindow::range(effective))
                    .await?;
                ReportService::generate_profit_and_loss(effective, &balances)
            }
        };
        Ok(CachedStatement::ProfitAndLoss(Arc::new(report)))
    }

    async fn compute_balance_sheet(
        &self,
        tenant_id: TenantId,
        as_of: NaiveDate,
    ) -> Result<CachedStatement, ReportingError> {
        let balances = self
            .balances(tenant_id, &AccountFilter::All, PostingWindow::up_to(as_of))
            .await?;
        let report = ReportService::generate_balance_sheet(as_of, &balances);
        if !report.is_balanced {
            return Err(ReportingError::Internal(format!(
                "balance sheet at {as_of} does not balance: assets {}, liabilities and equity {}",
                report.total_assets, report.liabilities_and_equity
            )));
        }
        Ok(CachedStatement::BalanceSheet(Arc::new(report)))
    }

    async fn compute_changes_in_equity(
        &self,
        tenant_id: TenantId,
        range: DateRange,
    ) -> Result<CachedStatement, ReportingError> {
        let effective = match self.effective_range(tenant_id, range).await? {
            RangeResolution::BeforeCutover => {
                return Ok(CachedStatement::ChangesInEquity(Arc::new(
                    ChangesInEquityReport::empty(range),
                )));
            }
            RangeResolution::Effective(effective) => effective,
        };

        let opening = self.opening_balance_sheet(tenant_id, effective).await?;
        let closing = self.cached_balance_sheet(tenant_id, effective.to).await?;
        let profit_and_loss = self.cached_profit_and_loss(tenant_id, effective).await?;
        let equity_balances = self
            .balances(
                tenant_id,
                &AccountFilter::Types(vec![AccountType::Equity]),
                PostingWindow::range(effective),
            )
            .await?;

        let report = ReportService::generate_changes_in_equity(
            effective,
            &opening,
            &closing,
            &profit_and_loss,
            &equity_balances,
        );
        Ok(CachedStatement::ChangesInEquity(Arc::new(report)))
    }

    async fn compute_cash_flow(
        &self,
        tenant_id: TenantId,
        range: DateRange,
    ) -> Result<CachedStatement, ReportingError> {
        let effective = match self.effective_range(tenant_id, range).await? {
            RangeResolution::BeforeCutover => {
                return Ok(CachedStatement::CashFlow(Arc::new(CashFlowReport::empty(range))));
            }
            RangeResolution::Effective(effective) => effective,
        };

        let opening = self.opening_balance_sheet(tenant_id, effective).await?;
        let closing = self.cached_balance_sheet(tenant_id, effective.to).await?;
        let profit_and_loss = self.cached_profit_and_loss(tenant_id, effective).await?;
        let chart = self.chart(tenant_id).await?;

        let cash_accounts = ReportService::cash_account_ids(&chart);
        let cash_entry_lines = if cash_accounts.is_empty() {
            Vec::new()
        } else {
            self.sources
                .ledger
                .entries_touching(tenant_id, &cash_accounts, effective)
                .await?
        };

        let report = ReportService::generate_cash_flow(CashFlowInputs {
            range: effective,
            profit_and_loss: &profit_and_loss,
            opening: &opening,
            closing: &closing,
            chart: &chart,
            cash_entry_lines: &cash_entry_lines,
        });
        Ok(CachedStatement::CashFlow(Arc::new(report)))
    }

    async fn ppe_note(&self, ctx: &NoteContext<'_>, tenant_id: TenantId) -> Result<IfrsNote, ReportingError> {
        let range = ctx.range;
        let profit_and_loss = self.cached_profit_and_loss(tenant_id, range).await?;
        let cash_flow = self.cached_cash_flow(tenant_id, range).await?;
        let balance_sheet = self.cached_balance_sheet(tenant_id, range.to).await?;

        let assets = self.sources.subledgers.fixed_assets(tenant_id).await?;
        let charges = self
            .sources
            .subledgers
            .depreciation_charges(tenant_id, PostingWindow::up_to(range.to))
            .await?;
        let schedule = PpeSchedule::compute(range, &assets, &charges);

        Ok(NoteService::ppe_note(
            ctx,
            &schedule,
            &profit_and_loss,
            &cash_flow,
            &balance_sheet,
        )?)
    }

    async fn income_tax_note(
        &self,
        ctx: &NoteContext<'_>,
        tenant_id: TenantId,
        chart: &[Account],
    ) -> Result<IfrsNote, ReportingError> {
        let range = ctx.range;
        let profit_and_loss = self.cached_profit_and_loss(tenant_id, range).await?;
        let balance_sheet = self.cached_balance_sheet(tenant_id, range.to).await?;

        let tax_accounts: Vec<_> = chart
            .iter()
            .filter(|a| a.is_tax_control())
            .map(|a| a.id)
            .collect();
        let lines = self
            .sources
            .ledger
            .lines_on(tenant_id, &tax_accounts, PostingWindow::up_to(range.to))
            .await?;
        let movement = IncomeTaxMovement::compute(range, &lines);

        Ok(NoteService::income_tax_note(
            ctx,
            &movement,
            &profit_and_loss,
            &balance_sheet,
        )?)
    }

    async fn ageing_note(
        &self,
        ctx: &NoteContext<'_>,
        tenant_id: TenantId,
        code: NoteCode,
    ) -> Result<IfrsNote, ReportingError> {
        let as_of = ctx.range.to;
        let kind = if code == NoteCode::TradeReceivables {
            OpenItemKind::Receivable
        } else {
            OpenItemKind::Payable
        };
        let balance_sheet = self.cached_balance_sheet(tenant_id, as_of).await?;
        let items = self
            .sources
            .subledgers
            .open_items(tenant_id, kind, as_of)
            .await?;
        let schedule = AgeingSchedule::compute(as_of, &items);

        Ok(NoteService::ageing_note(ctx, code, &schedule, &balance_sheet)?)
    }

    // ------------------------------------------------------------------
    // Collaborator access
    // ------------------------------------------------------------------

    async fn require_tenant(&self, tenant_id: TenantId) -> Result<TenantProfile, ReportingError> {
        self.sources
            .tenants
            .tenant_profile(tenant_id)
            .await?
            .ok_or(ReportingError::TenantNotFound(tenant_id))
    }

    async fn periods(&self, tenant_id: TenantId) -> Result<Vec<AccountingPeriod>, ReportingError> {
        Ok(self.sources.periods.list_periods(tenant_id, None).await?)
    }

    async fn effective_range(
        &self,
        tenant_id: TenantId,
        range: DateRange,
    ) -> Result<RangeResolution, ReportingError> {
        self.require_tenant(tenant_id).await?;
        let periods = self.periods(tenant_id).await?;
        let resolution = PeriodNormalizer::resolve_range(&periods, range)?;
        if let RangeResolution::Effective(effective) = resolution
            && effective != range
        {
            tracing::debug!(requested = %range, %effective, "range clipped to cutover");
        }
        Ok(resolution)
    }

    fn resolve_note_range(
        periods: &[AccountingPeriod],
        range: DateRange,
    ) -> Result<DateRange, ReportingError> {
        match PeriodNormalizer::resolve_range(periods, range)? {
            RangeResolution::Effective(effective) => Ok(effective),
            RangeResolution::BeforeCutover => {
                let cutover = PeriodNormalizer::cutover_date(periods).ok_or_else(|| {
                    ReportingError::Internal("range before cutover without a cutover".to_string())
                })?;
                Err(ReportingError::CutoverViolation {
                    as_of: range.to,
                    cutover,
                })
            }
        }
    }

    async fn chart(&self, tenant_id: TenantId) -> Result<Vec<Account>, ReportingError> {
        let chart = self.sources.accounts.list_accounts(tenant_id).await?;
        if self.reviewed().insert(tenant_id) {
            Self::log_classification(tenant_id, &chart);
        }
        Ok(chart)
    }

    async fn balances(
        &self,
        tenant_id: TenantId,
        filter: &AccountFilter,
        window: PostingWindow,
    ) -> Result<Vec<AccountBalance>, ReportingError> {
        let chart = self.chart(tenant_id).await?;
        Ok(LedgerAggregator::aggregate(
            self.sources.ledger.as_ref(),
            tenant_id,
            &chart,
            filter,
            window,
        )
        .await?)
    }

    fn require_note_accounts(code: NoteCode, chart: &[Account]) -> Result<(), ReportingError> {
        let has_bucket = |bucket| {
            chart
                .iter()
                .any(|a| AccountClassifier::classify(a).bucket == Some(bucket))
        };
        let missing = match code {
            NoteCode::PropertyPlantEquipment if !has_bucket(BalanceSheetBucket::PpeCost) => {
                Some("no account is classified as property, plant and equipment")
            }
            NoteCode::IncomeTax if !chart.iter().any(Account::is_tax_control) => {
                Some("no account carries a TAX: tag")
            }
            NoteCode::TradeReceivables if !has_bucket(BalanceSheetBucket::TradeReceivables) => {
                Some("no account is classified as trade receivables")
            }
            NoteCode::TradePayables if !has_bucket(BalanceSheetBucket::TradePayables) => {
                Some("no account is classified as trade payables")
            }
            _ => None,
        };
        match missing {
            Some(reason) => Err(ReportingError::Configuration(format!(
                "note {code} cannot be prepared: {reason}"
            ))),
            None => Ok(()),
        }
    }

    fn log_classification(tenant_id: TenantId, chart: &[Account]) {
        let report = ClassificationReport::build(tenant_id, chart);
        let heuristic = report
            .entries
            .iter()
            .filter(|e| e.source != ClassificationSource::Tagged)
            .count();
        let review: Vec<String> = report
            .needs_review()
            .map(|e| match e.bucket {
                Some(bucket) => format!("{} {} -> {}", e.code, e.name, bucket.key()),
                None => format!("{} {} -> retained earnings", e.code, e.name),
            })
            .collect();

        if review.is_empty() {
            tracing::info!(%tenant_id, accounts = report.entries.len(), heuristic, "chart classified");
        } else {
            tracing::warn!(
                %tenant_id,
                accounts = report.entries.len(),
                heuristic,
                needs_review = %review.join("; "),
                "accounts classified by fallback; tag them explicitly"
            );
        }
    }

    fn reviewed(&self) -> std::sync::MutexGuard<'_, HashSet<TenantId>> {
        self.reviewed_charts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn audit_statement(&self, key: CacheKey, parameters: String) {
        audit::emit(
            &self.audit,
            AuditEvent::now(
                key.tenant_id,
                AuditKind::Statement,
                key.statement.kind().code(),
                parameters,
            ),
        );
    }
}
