//! Account classification by explicit tag or keyword heuristics.
//!
//! Precedence: a valid [`ClassificationTag`] on the account wins. Otherwise
//! keyword rules are tried in order and the first match wins. Assets and
//! liabilities that match nothing land in a catch-all bucket; equity that
//! matches nothing is left out and ends up in the retained earnings plug.

use serde::{Deserialize, Serialize};

use super::bucket::{BalanceSheetBucket, ClassificationTag};
use crate::ledger::{Account, AccountType};

/// How an account's bucket was decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationSource {
    /// Explicit classification tag.
    Tagged,
    /// A keyword rule matched.
    Keyword,
    /// Nothing matched; catch-all bucket used.
    Fallback,
    /// Equity account that matched nothing; part of retained earnings.
    RetainedEarnings,
    /// Income or expense account.
    ProfitAndLoss,
}

/// Result of classifying one account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    /// Bucket, if the account is presented on its own balance sheet line.
    pub bucket: Option<BalanceSheetBucket>,
    /// How the bucket was decided.
    pub source: ClassificationSource,
    /// Tag on the account that was ignored because it does not fit the
    /// account type.
    pub rejected_tag: Option<ClassificationTag>,
}

/// Lower-cased, word-separated account text for phrase matching.
pub(crate) struct Haystack(String);

impl Haystack {
    pub(crate) fn new(code: &str, name: &str) -> Self {
        let words: Vec<String> = format!("{code} {name}")
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .map(str::to_lowercase)
            .collect();
        Self(format!(" {} ", words.join(" ")))
    }

    pub(crate) fn of(account: &Account) -> Self {
        Self::new(&account.code, &account.name)
    }

    pub(crate) fn has(&self, phrase: &str) -> bool {
        self.0.contains(&format!(" {phrase} "))
    }

    pub(crate) fn any(&self, phrases: &[&str]) -> bool {
        phrases.iter().any(|p| self.has(p))
    }
}

const RECEIVABLE: &[&str] = &["receivable", "receivables", "debtor", "debtors"];
const PAYABLE: &[&str] = &["payable", "payables", "creditor", "creditors"];
const NON_CURRENT: &[&str] = &["non current", "noncurrent", "long term"];

/// Classifies accounts into balance sheet buckets.
pub struct AccountClassifier;

impl AccountClassifier {
    /// Classifies one account.
    #[must_use]
    pub fn classify(account: &Account) -> Classification {
        if account.account_type.is_profit_and_loss() {
            return Classification {
                bucket: None,
                source: ClassificationSource::ProfitAndLoss,
                rejected_tag: account.classification,
            };
        }

        let rejected_tag = match account.classification {
            Some(tag) if tag.accepts(account.account_type) => {
                return Classification {
                    bucket: Some(tag),
                    source: ClassificationSource::Tagged,
                    rejected_tag: None,
                };
            }
            other => other,
        };

        let haystack = Haystack::of(account);
        let (bucket, source) = match Self::match_keywords(&haystack, account.account_type) {
            Some(bucket) => (Some(bucket), ClassificationSource::Keyword),
            None => match Self::fallback(&haystack, account.account_type) {
                Some(bucket) => (Some(bucket), ClassificationSource::Fallback),
                None => (None, ClassificationSource::RetainedEarnings),
            },
        };

        Classification {
            bucket,
            source,
            rejected_tag,
        }
    }

    /// Keyword bucket for a code, name and type, without tags or fallbacks.
    #[must_use]
    pub fn keyword_bucket(code: &str, name: &str, account_type: AccountType) -> Option<BalanceSheetBucket> {
        Self::match_keywords(&Haystack::new(code, name), account_type)
    }

    fn match_keywords(h: &Haystack, account_type: AccountType) -> Option<BalanceSheetBucket> {
        match account_type {
            AccountType::Asset => Self::match_asset(h),
            AccountType::Liability => Self::match_liability(h),
            AccountType::Equity => Self::match_equity(h),
            AccountType::Income | AccountType::Expense => None,
        }
    }

    fn match_asset(h: &Haystack) -> Option<BalanceSheetBucket> {
        use BalanceSheetBucket as B;

        if (h.has("accumulated") || h.has("provision"))
            && h.any(&["depreciation", "amortisation", "amortization", "depn"])
        {
            return Some(B::AccumulatedDepreciation);
        }
        if h.any(&["cash", "bank", "banks", "petty cash", "cash equivalents", "deposit account"]) {
            return Some(B::Cash);
        }
        if h.any(&["vat", "gst", "input tax", "sales tax"]) {
            return Some(B::VatReceivable);
        }
        if h.any(&["prepayment", "prepayments", "prepaid"]) {
            return Some(B::Prepayments);
        }
        if h.any(RECEIVABLE)
            && h.any(&["trade", "accounts", "customer", "customers", "sales ledger"])
        {
            return Some(B::TradeReceivables);
        }
        if h.any(&[
            "inventory",
            "inventories",
            "stock",
            "stocks",
            "raw materials",
            "finished goods",
            "work in progress",
        ]) {
            return Some(B::Inventory);
        }
        if h.any(&[
            "intangible",
            "intangibles",
            "goodwill",
            "software",
            "patent",
            "patents",
            "trademark",
            "trademarks",
            "licence",
            "licences",
            "development costs",
        ]) {
            return Some(B::IntangibleAssets);
        }
        if h.any(&[
            "property",
            "plant",
            "equipment",
            "machinery",
            "vehicle",
            "vehicles",
            "motor",
            "furniture",
            "fixtures",
            "fittings",
            "building",
            "buildings",
            "land",
            "leasehold",
            "computers",
            "ppe",
            "fixed asset",
            "fixed assets",
        ]) {
            return Some(B::PpeCost);
        }
        if h.any(RECEIVABLE) || h.any(&["loan", "loans", "deposit", "deposits"]) {
            return Some(B::OtherReceivables);
        }
        None
    }

    fn match_liability(h: &Haystack) -> Option<BalanceSheetBucket> {
        use BalanceSheetBucket as B;

        if h.any(&["overdraft", "overdrafts", "overdrawn"]) {
            return Some(B::BankOverdraft);
        }
        if h.any(&["vat", "gst", "output tax", "sales tax"]) {
            return Some(B::VatPayable);
        }
        if h.has("deferred tax") {
            return Some(B::OtherNonCurrentLiabilities);
        }
        if h.any(&[
            "income tax",
            "corporation tax",
            "corporate tax",
            "tax payable",
            "taxation",
            "current tax",
        ]) {
            return Some(B::IncomeTaxPayable);
        }
        if h.any(PAYABLE)
            && h.any(&[
                "trade",
                "accounts",
                "supplier",
                "suppliers",
                "vendor",
                "vendors",
                "purchase ledger",
            ])
        {
            return Some(B::TradePayables);
        }
        if h.any(&["accrual", "accruals", "accrued"]) {
            return Some(B::Accruals);
        }
        if h.any(&[
            "deferred income",
            "deferred revenue",
            "unearned",
            "contract liability",
            "contract liabilities",
            "received in advance",
        ]) {
            return Some(B::DeferredIncome);
        }
        if h.any(&[
            "loan",
            "loans",
            "borrowing",
            "borrowings",
            "mortgage",
            "debenture",
            "debentures",
            "note payable",
            "notes payable",
            "credit facility",
            "bond",
            "bonds",
        ]) {
            if h.any(&["short term", "current portion", "due within one year", "revolving"]) {
                return Some(B::ShortTermBorrowings);
            }
            return Some(B::Borrowings);
        }
        if h.any(NON_CURRENT) {
            return Some(B::OtherNonCurrentLiabilities);
        }
        None
    }

    fn match_equity(h: &Haystack) -> Option<BalanceSheetBucket> {
        if h.any(&[
            "share capital",
            "capital stock",
            "common stock",
            "ordinary shares",
            "preference shares",
            "share premium",
            "paid in capital",
            "contributed capital",
            "issued capital",
        ]) {
            return Some(BalanceSheetBucket::ShareCapital);
        }
        if h.any(&[
            "reserve",
            "reserves",
            "revaluation surplus",
            "other comprehensive income",
        ]) && !h.has("retained")
        {
            return Some(BalanceSheetBucket::OtherReserves);
        }
        None
    }

    fn fallback(h: &Haystack, account_type: AccountType) -> Option<BalanceSheetBucket> {
        match account_type {
            AccountType::Asset => Some(BalanceSheetBucket::OtherReceivables),
            AccountType::Liability if h.any(NON_CURRENT) => {
                Some(BalanceSheetBucket::OtherNonCurrentLiabilities)
            }
            AccountType::Liability => Some(BalanceSheetBucket::OtherCurrentLiabilities),
            AccountType::Equity | AccountType::Income | AccountType::Expense => None,
        }
    }
}
