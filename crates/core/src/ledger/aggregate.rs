//! Ledger aggregation.
//!
//! Turns raw per-account debit/credit sums from a [`LedgerSource`] into
//! [`AccountBalance`]s joined with the chart. Only `POSTED` entries are ever
//! summed; the source is trusted for that, but its answer is checked for
//! accounts it was never asked about.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tieout_shared::types::{AccountId, DateRange, TenantId};

use super::account::{Account, AccountType};
use super::balance::{AccountBalance, AccountTotals};
use crate::source::{LedgerSource, SourceError};

/// Dates whose postings are included in an aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PostingWindow {
    /// First date (inclusive). `None` means from the beginning of the ledger.
    pub from: Option<NaiveDate>,
    /// Last date (inclusive).
    pub to: NaiveDate,
}

impl PostingWindow {
    /// Postings dated within `range`.
    #[must_use]
    pub const fn range(range: DateRange) -> Self {
        Self {
            from: Some(range.from),
            to: range.to,
        }
    }

    /// Every posting dated on or before `as_of`.
    #[must_use]
    pub const fn up_to(as_of: NaiveDate) -> Self {
        Self {
            from: None,
            to: as_of,
        }
    }

    /// Returns true if `date` falls inside the window.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        date <= self.to && self.from.is_none_or(|from| date >= from)
    }
}

/// Which accounts to aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountFilter {
    /// Every account in the chart.
    All,
    /// Accounts of the given types.
    Types(Vec<AccountType>),
    /// Specific accounts.
    Accounts(Vec<AccountId>),
}

impl AccountFilter {
    /// Returns true if `account` passes the filter.
    #[must_use]
    pub fn matches(&self, account: &Account) -> bool {
        match self {
            Self::All => true,
            Self::Types(types) => types.contains(&account.account_type),
            Self::Accounts(ids) => ids.contains(&account.id),
        }
    }
}

/// A summing request sent to a [`LedgerSource`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateQuery {
    /// Tenant whose ledger is summed.
    pub tenant_id: TenantId,
    /// Accounts to sum. Never empty.
    pub account_ids: Vec<AccountId>,
    /// Posting dates to include.
    pub window: PostingWindow,
}

/// Joins ledger sums with the chart of accounts.
pub struct LedgerAggregator;

impl LedgerAggregator {
    /// Aggregates posted lines per account for the accounts matching `filter`.
    ///
    /// Every selected account appears in the result, with zero totals if it
    /// has no postings in the window. Results are ordered by account code.
    ///
    /// # Errors
    ///
    /// Propagates the source's failure, or returns
    /// `SourceError::Inconsistent` if the source answers for an account that
    /// was not requested, answers twice for one account, or returns a
    /// negative sum.
    pub async fn aggregate(
        ledger: &dyn LedgerSource,
        tenant_id: TenantId,
        chart: &[Account],
        filter: &AccountFilter,
        window: PostingWindow,
    ) -> Result<Vec<AccountBalance>, SourceError> {
        let mut selected: Vec<&Account> = chart.iter().filter(|a| filter.matches(a)).collect();
        if selected.is_empty() {
            return Ok(Vec::new());
        }
        selected.sort_by(|a, b| a.code.cmp(&b.code).then(a.id.cmp(&b.id)));

        let query = AggregateQuery {
            tenant_id,
            account_ids: selected.iter().map(|a| a.id).collect(),
            window,
        };
        let totals = ledger.sum_postings(&query).await?;
        let by_account = Self::index_totals(&query, totals)?;

        Ok(selected
            .into_iter()
            .map(|account| {
                let totals = by_account
                    .get(&account.id)
                    .copied()
                    .unwrap_or_else(|| AccountTotals::zero(account.id));
                AccountBalance::new(account.clone(), totals.debit, totals.credit)
            })
            .collect())
    }

    fn index_totals(
        query: &AggregateQuery,
        totals: Vec<AccountTotals>,
    ) -> Result<HashMap<AccountId, AccountTotals>, SourceError> {
        let requested: HashSet<AccountId> = query.account_ids.iter().copied().collect();
        let mut by_account = HashMap::with_capacity(totals.len());

        for row in totals {
            if !requested.contains(&row.account_id) {
                return Err(SourceError::Inconsistent(format!(
                    "ledger returned totals for unrequested account {}",
                    row.account_id
                )));
            }
            if row.debit < Decimal::ZERO || row.credit < Decimal::ZERO {
                return Err(SourceError::Inconsistent(format!(
                    "ledger returned negative totals for account {}",
                    row.account_id
                )));
            }
            if by_account.insert(row.account_id, row).is_some() {
                return Err(SourceError::Inconsistent(format!(
                    "ledger returned duplicate totals for account {}",
                    row.account_id
                )));
            }
        }

        Ok(by_account)
    }
}
