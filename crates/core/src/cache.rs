//! Statement caching.
//!
//! Statements are recomputed from the ledger on every miss; the cache only
//! saves repeated work within its time-to-live. It is keyed per tenant and
//! can only be invalidated per tenant or as a whole.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use futures::future::BoxFuture;
use moka::future::Cache;
use tieout_shared::types::{DateRange, TenantId};

use crate::reports::{
    BalanceSheetReport, CashFlowReport, ChangesInEquityReport, ProfitAndLossReport, ReportingError,
    StatementKind, TrialBalanceReport,
};

/// Date parameters of a cached statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatementKey {
    /// Trial balance over a range.
    TrialBalance(DateRange),
    /// Profit and loss over a range.
    ProfitAndLoss(DateRange),
    /// Balance sheet at a date.
    BalanceSheet(NaiveDate),
    /// Changes in equity over a range.
    ChangesInEquity(DateRange),
    /// Cash flow over a range.
    CashFlow(DateRange),
}

impl StatementKey {
    /// The statement this key is for.
    #[must_use]
    pub const fn kind(&self) -> StatementKind {
        match self {
            Self::TrialBalance(_) => StatementKind::TrialBalance,
            Self::ProfitAndLoss(_) => StatementKind::ProfitAndLoss,
            Self::BalanceSheet(_) => StatementKind::BalanceSheet,
            Self::ChangesInEquity(_) => StatementKind::ChangesInEquity,
            Self::CashFlow(_) => StatementKind::CashFlow,
        }
    }
}

/// Full cache key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKey {
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// Statement and date parameters.
    pub statement: StatementKey,
}

/// A cached statement.
#[derive(Debug, Clone)]
pub enum CachedStatement {
    /// Trial balance.
    TrialBalance(Arc<TrialBalanceReport>),
    /// Profit and loss.
    ProfitAndLoss(Arc<ProfitAndLossReport>),
    /// Balance sheet.
    BalanceSheet(Arc<BalanceSheetReport>),
    /// Changes in equity.
    ChangesInEquity(Arc<ChangesInEquityReport>),
    /// Cash flow.
    CashFlow(Arc<CashFlowReport>),
}

macro_rules! cached_accessor {
    ($fn_name:ident, $variant:ident, $report:ty) => {
        #[doc = concat!("Unwraps a cached `", stringify!($variant), "`.")]
        ///
        /// # Errors
        ///
        /// Returns `ReportingError::Internal` if the entry holds another statement.
        pub fn $fn_name(self) -> Result<Arc<$report>, ReportingError> {
            match self {
                Self::$variant(report) => Ok(report),
                other => Err(ReportingError::Internal(format!(
                    "cache entry holds {} where {} was expected",
                    other.kind(),
                    StatementKind::$variant
                ))),
            }
        }
    };
}

impl CachedStatement {
    /// The statement held.
    #[must_use]
    pub const fn kind(&self) -> StatementKind {
        match self {
            Self::TrialBalance(_) => StatementKind::TrialBalance,
            Self::ProfitAndLoss(_) => StatementKind::ProfitAndLoss,
            Self::BalanceSheet(_) => StatementKind::BalanceSheet,
            Self::ChangesInEquity(_) => StatementKind::ChangesInEquity,
            Self::CashFlow(_) => StatementKind::CashFlow,
        }
    }

    cached_accessor!(into_trial_balance, TrialBalance, TrialBalanceReport);
    cached_accessor!(into_profit_and_loss, ProfitAndLoss, ProfitAndLossReport);
    cached_accessor!(into_balance_sheet, BalanceSheet, BalanceSheetReport);
    cached_accessor!(into_changes_in_equity, ChangesInEquity, ChangesInEquityReport);
    cached_accessor!(into_cash_flow, CashFlow, CashFlowReport);
}

/// Future computing a statement on a cache miss.
pub type StatementFuture<'a> = BoxFuture<'a, Result<CachedStatement, ReportingError>>;

/// Get-or-compute cache for statements.
#[async_trait]
pub trait StatementCache: Send + Sync {
    /// Returns the cached statement for `key`, or runs `compute` and caches
    /// its result. Failures are returned but never cached.
    ///
    /// Concurrent misses on the same key run `compute` once.
    async fn get_or_compute<'a>(
        &'a self,
        key: CacheKey,
        compute: StatementFuture<'a>,
    ) -> Result<CachedStatement, ReportingError>;

    /// Drops every entry of one tenant.
    fn invalidate_tenant(&self, tenant_id: TenantId);

    /// Drops every entry.
    fn invalidate_all(&self);
}

/// Production cache backed by Moka.
#[derive(Clone)]
pub struct MokaStatementCache {
    cache: Cache<CacheKey, CachedStatement>,
}

impl MokaStatementCache {
    /// Creates a cache holding at most `max_capacity` statements for `ttl`.
    #[must_use]
    pub fn new(max_capacity: u64, ttl: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(ttl)
            .support_invalidation_closures()
            .build();
        Self { cache }
    }

    /// Number of entries, including ones not yet evicted.
    #[must_use]
    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }

    /// Applies pending evictions and invalidations.
    pub async fn run_pending_tasks(&self) {
        self.cache.run_pending_tasks().await;
    }
}

impl std::fmt::Debug for MokaStatementCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MokaStatementCache")
            .field("entry_count", &self.cache.entry_count())
            .finish()
    }
}

#[async_trait]
impl StatementCache for MokaStatementCache {
    async fn get_or_compute<'a>(
        &'a self,
        key: CacheKey,
        compute: StatementFuture<'a>,
    ) -> Result<CachedStatement, ReportingError> {
        let entry = self
            .cache
            .entry(key)
            .or_try_insert_with(compute)
            .await
            .map_err(|err| (*err).clone())?;

        tracing::debug!(
            tenant_id = %key.tenant_id,
            statement = %key.statement.kind(),
            hit = !entry.is_fresh(),
            "statement cache lookup"
        );
        Ok(entry.into_value())
    }

    fn invalidate_tenant(&self, tenant_id: TenantId) {
        if let Err(err) = self
            .cache
            .invalidate_entries_if(move |key, _| key.tenant_id == tenant_id)
        {
            tracing::warn!(%tenant_id, error = %err, "tenant invalidation failed, clearing cache");
            self.cache.invalidate_all();
        }
    }

    fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }
}

/// Pass-through cache: every call computes.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCache;

#[async_trait]
impl StatementCache for NoCache {
    async fn get_or_compute<'a>(
        &'a self,
        _key: CacheKey,
        compute: StatementFuture<'a>,
    ) -> Result<CachedStatement, ReportingError> {
        compute.await
    }

    fn invalidate_tenant(&self, _tenant_id: TenantId) {}

    fn invalidate_all(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::FutureExt;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn bs_key(tenant_id: TenantId) -> CacheKey {
        CacheKey {
            tenant_id,
            statement: StatementKey::BalanceSheet(d(2024, 3, 31)),
        }
    }

    fn compute(counter: &AtomicUsize) -> StatementFuture<'_> {
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(20)).await;
            Ok(CachedStatement::BalanceSheet(Arc::new(BalanceSheetReport::empty(d(2024, 3, 31)))))
        }
        .boxed()
    }

    fn cache() -> MokaStatementCache {
        MokaStatementCache::new(100, Duration::from_secs(60))
    }

    #[tokio::test]
    async fn test_concurrent_misses_compute_once() {
        let cache = cache();
        let counter = AtomicUsize::new(0);
        let key = bs_key(TenantId::new());

        let (a, b) = tokio::join!(
            cache.get_or_compute(key, compute(&counter)),
            cache.get_or_compute(key, compute(&counter)),
        );

        assert!(a.is_ok() && b.is_ok());
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_errors_are_not_cached() {
        let cache = cache();
        let counter = AtomicUsize::new(0);
        let key = bs_key(TenantId::new());

        let failed = cache
            .get_or_compute(key, async { Err(ReportingError::Internal("boom".into())) }.boxed())
            .await;
        assert_eq!(failed.unwrap_err(), ReportingError::Internal("boom".into()));

        cache.get_or_compute(key, compute(&counter)).await.unwrap();
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_invalidate_tenant_keeps_other_tenants() {
        let cache = cache();
        let counter = AtomicUsize::new(0);
        let first = bs_key(TenantId::new());
        let second = bs_key(TenantId::new());

        cache.get_or_compute(first, compute(&counter)).await.unwrap();
        cache.get_or_compute(second, compute(&counter)).await.unwrap();
        assert_eq!(counter.load(Ordering::SeqCst), 2);

        cache.invalidate_tenant(first.tenant_id);
        cache.get_or_compute(first, compute(&counter)).await.unwrap();
        cache.get_or_compute(second, compute(&counter)).await.unwrap();
        assert_eq!(counter.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_no_cache_always_computes() {
        let counter = AtomicUsize::new(0);
        let key = bs_key(TenantId::new());

        NoCache.get_or_compute(key, compute(&counter)).await.unwrap();
        NoCache.get_or_compute(key, compute(&counter)).await.unwrap();
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_accessor_rejects_wrong_statement() {
        let cached = CachedStatement::BalanceSheet(Arc::new(BalanceSheetReport::empty(d(2024, 3, 31))));
        assert!(cached.clone().into_balance_sheet().is_ok());
        assert!(matches!(cached.into_cash_flow(), Err(ReportingError::Internal(_))));
    }
}
