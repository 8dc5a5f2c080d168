//! Per-tenant classification report.
//!
//! Lists how every balance sheet account was classified so that fallbacks
//! and rejected tags can be reviewed and fixed with explicit tags.

use serde::{Deserialize, Serialize};
use tieout_shared::types::{AccountId, TenantId};

use super::bucket::{BalanceSheetBucket, ClassificationTag};
use super::keywords::{AccountClassifier, ClassificationSource};
use crate::ledger::{Account, AccountType};

/// Classification of one account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationReportEntry {
    /// Account ID.
    pub account_id: AccountId,
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Account type.
    pub account_type: AccountType,
    /// Resulting bucket.
    pub bucket: Option<BalanceSheetBucket>,
    /// How the bucket was decided.
    pub source: ClassificationSource,
    /// Tag that was ignored.
    pub rejected_tag: Option<ClassificationTag>,
}

impl ClassificationReportEntry {
    /// Returns true if the entry deserves a look.
    #[must_use]
    pub fn needs_review(&self) -> bool {
        self.source == ClassificationSource::Fallback || self.rejected_tag.is_some()
    }
}

/// Classification of a tenant's balance sheet accounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationReport {
    /// Tenant.
    pub tenant_id: TenantId,
    /// One entry per balance sheet account, ordered by code.
    pub entries: Vec<ClassificationReportEntry>,
}

impl ClassificationReport {
    /// Builds the report for a chart of accounts.
    #[must_use]
    pub fn build(tenant_id: TenantId, chart: &[Account]) -> Self {
        let mut entries: Vec<ClassificationReportEntry> = chart
            .iter()
            .filter(|a| a.account_type.is_balance_sheet())
            .map(|account| {
                let classification = AccountClassifier::classify(account);
                ClassificationReportEntry {
                    account_id: account.id,
                    code: account.code.clone(),
                    name: account.name.clone(),
                    account_type: account.account_type,
                    bucket: classification.bucket,
                    source: classification.source,
                    rejected_tag: classification.rejected_tag,
                }
            })
            .collect();
        entries.sort_by(|a, b| a.code.cmp(&b.code));

        Self { tenant_id, entries }
    }

    /// Entries that fell back to a catch-all bucket or had a tag rejected.
    pub fn needs_review(&self) -> impl Iterator<Item = &ClassificationReportEntry> {
        self.entries.iter().filter(|e| e.needs_review())
    }

    /// Equity accounts folded into retained earnings.
    pub fn retained_earnings_accounts(&self) -> impl Iterator<Item = &ClassificationReportEntry> {
        self.entries
            .iter()
            .filter(|e| e.source == ClassificationSource::RetainedEarnings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(code: &str, name: &str, account_type: AccountType) -> Account {
        Account {
            id: AccountId::new(),
            tenant_id: TenantId::new(),
            code: code.to_string(),
            name: name.to_string(),
            account_type,
            classification: None,
            tax_tag: None,
        }
    }

    #[test]
    fn test_report_flags_fallbacks_and_rejected_tags() {
        let mut tagged_wrong = account("1000", "Cash at bank", AccountType::Asset);
        tagged_wrong.classification = Some(BalanceSheetBucket::ShareCapital);

        let chart = vec![
            account("4000", "Sales", AccountType::Income),
            account("1999", "Suspense", AccountType::Asset),
            tagged_wrong,
            account("3200", "Retained earnings", AccountType::Equity),
            account("2000", "Accounts payable", AccountType::Liability),
        ];

        let report = ClassificationReport::build(TenantId::new(), &chart);

        assert_eq!(report.entries.len(), 4);
        assert_eq!(report.entries[0].code, "1000");

        let review: Vec<&str> = report.needs_review().map(|e| e.code.as_str()).collect();
        assert_eq!(review, vec!["1000", "1999"]);

        let retained: Vec<&str> = report
            .retained_earnings_accounts()
            .map(|e| e.code.as_str())
            .collect();
        assert_eq!(retained, vec!["3200"]);
    }
}
