//! Dashboard metrics.
//!
//! Reads the same statements the engine produces and keeps the result in a
//! cache of its own, keyed by tenant and date.

use std::sync::Arc;

use chrono::{Datelike, NaiveDate};
use moka::future::Cache;
use tieout_shared::types::{DateRange, TenantId};

use super::types::{CashPosition, DashboardMetrics, PnlSummary};
use crate::classify::BalanceSheetBucket;
use crate::engine::ReportingEngine;
use crate::reports::ReportingError;

/// Dashboard metrics on top of a [`ReportingEngine`].
#[derive(Clone)]
pub struct DashboardService {
    engine: Arc<ReportingEngine>,
    cache: Cache<(TenantId, NaiveDate), Arc<DashboardMetrics>>,
}

impl std::fmt::Debug for DashboardService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DashboardService")
            .field("cached", &self.cache.entry_count())
            .finish_non_exhaustive()
    }
}

impl DashboardService {
    /// Creates the service, sizing its cache from the engine settings.
    #[must_use]
    pub fn new(engine: Arc<ReportingEngine>) -> Self {
        let settings = engine.settings();
        let cache = Cache::builder()
            .max_capacity(settings.cache_capacity)
            .time_to_live(settings.dashboard_cache_ttl)
            .support_invalidation_closures()
            .build();
        Self { engine, cache }
    }

    /// Headline metrics for `tenant_id` at the end of `as_of`.
    pub async fn metrics(
        &self,
        tenant_id: TenantId,
        as_of: NaiveDate,
    ) -> Result<Arc<DashboardMetrics>, ReportingError> {
        self.cache
            .try_get_with((tenant_id, as_of), self.compute(tenant_id, as_of))
            .await
            .map_err(|err| (*err).clone())
    }

    /// Drops cached metrics and statements of one tenant.
    pub fn invalidate_tenant(&self, tenant_id: TenantId) {
        self.engine.invalidate_tenant(tenant_id);
        if let Err(err) = self
            .cache
            .invalidate_entries_if(move |(tenant, _), _| *tenant == tenant_id)
        {
            tracing::warn!(%tenant_id, error = %err, "dashboard invalidation failed, clearing cache");
            self.cache.invalidate_all();
        }
    }

    /// Drops every cached metric and statement.
    pub fn invalidate_all(&self) {
        self.engine.invalidate_all();
        self.cache.invalidate_all();
    }

    async fn compute(
        &self,
        tenant_id: TenantId,
        as_of: NaiveDate,
    ) -> Result<Arc<DashboardMetrics>, ReportingError> {
        let profile = self.engine.tenant_profile(tenant_id).await?;
        let year_start = fiscal_year_start(as_of, profile.fiscal_start_month())?;
        let month_start = as_of.with_day(1).ok_or_else(|| {
            ReportingError::Internal(format!("no first day of month for {as_of}"))
        })?;

        let year_to_date = self
            .engine
            .profit_and_loss(tenant_id, DateRange::new(year_start, as_of)?)
            .await?;
        let month_to_date = self
            .engine
            .profit_and_loss(tenant_id, DateRange::new(month_start, as_of)?)
            .await?;
        let balance_sheet = self.engine.balance_sheet(tenant_id, as_of).await?;

        tracing::debug!(%tenant_id, %as_of, "dashboard metrics computed");
        Ok(Arc::new(DashboardMetrics {
            tenant_id,
            as_of,
            currency: profile.currency,
            year_to_date: PnlSummary::from(year_to_date.as_ref()),
            month_to_date: PnlSummary::from(month_to_date.as_ref()),
            cash_position: CashPosition {
                net_cash: balance_sheet.net_cash(),
                cash: balance_sheet.bucket(BalanceSheetBucket::Cash),
                overdraft: balance_sheet.bucket(BalanceSheetBucket::BankOverdraft),
            },
            receivables: balance_sheet.bucket(BalanceSheetBucket::TradeReceivables),
            payables: balance_sheet.bucket(BalanceSheetBucket::TradePayables),
        }))
    }
}

/// First day of the fiscal year containing `date`.
fn fiscal_year_start(date: NaiveDate, start_month: u32) -> Result<NaiveDate, ReportingError> {
    let year = if date.month() >= start_month {
        date.year()
    } else {
        date.year() - 1
    };
    NaiveDate::from_ymd_opt(year, start_month, 1).ok_or_else(|| {
        ReportingError::Validation(format!("invalid fiscal year start month {start_month}"))
    })
}
