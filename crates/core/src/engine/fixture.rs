//! Test fixture: one tenant migrated on 2024-03-01.
//!
//! A closed "Opening Balances" period runs to 2024-02-29 and monthly periods
//! follow. March 2024 has a PPE purchase, a credit sale partly collected, rent
//! on account, depreciation and a tax charge.

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tieout_shared::types::{
    AccountId, AccountingPeriodId, DateRange, FixedAssetId, JournalEntryId, JournalLineId, TenantId,
};

use super::{EngineSettings, ReportingEngine};
use crate::cache::NoCache;
use crate::fiscal::{AccountingPeriod, OPENING_BALANCES_PERIOD, PeriodStatus};
use crate::ledger::{Account, AccountType, EntryStatus, JournalEntry, JournalLine};
use crate::source::DataSources;
use crate::source::memory::InMemoryStore;
use crate::subledger::{DepreciationCharge, FixedAsset, OpenItem, OpenItemKind};
use crate::tenant::TenantProfile;

pub(crate) fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

pub(crate) fn range(from: &str, to: &str) -> DateRange {
    DateRange::parse(from, to).unwrap()
}

pub(crate) struct Fixture {
    pub(crate) store: Arc<InMemoryStore>,
    pub(crate) tenant: TenantId,
    pub(crate) march: AccountingPeriodId,
    pub(crate) cash: AccountId,
    pub(crate) sales: AccountId,
    pub(crate) expenses: AccountId,
}

impl Fixture {
    pub(crate) fn new() -> Self {
        Self::build(true)
    }

    pub(crate) fn without_tax_tags() -> Self {
        Self::build(false)
    }

    fn build(tax_tagged: bool) -> Self {
        let store = Arc::new(InMemoryStore::new());
        let tenant = TenantId::new();
        store.add_tenant(Self::profile(tenant));

        store.add_period(Self::period(tenant, OPENING_BALANCES_PERIOD, d(2023, 1, 1), d(2024, 2, 29), PeriodStatus::Closed));
        let mut march = AccountingPeriodId::new();
        for month in 3..=12 {
            let start = d(2024, month, 1);
            let end = if month == 12 { d(2024, 12, 31) } else { d(2024, month + 1, 1).pred_opt().unwrap() };
            let period = Self::period(tenant, &format!("2024-{month:02}"), start, end, PeriodStatus::Open);
            if month == 3 {
                march = period.id;
            }
            store.add_period(period);
        }

        let add = |code: &str, name: &str, account_type: AccountType, tax_tag: Option<&str>| {
            let account = Account {
                id: AccountId::new(),
                tenant_id: tenant,
                code: code.to_string(),
                name: name.to_string(),
                account_type,
                classification: None,
                tax_tag: tax_tag.map(str::to_string),
            };
            let id = account.id;
            store.add_account(account);
            id
        };
        let cash = add("1000", "Cash at bank", AccountType::Asset, None);
        let receivables = add("1100", "Trade receivables", AccountType::Asset, None);
        let plant = add("1500", "Plant and equipment", AccountType::Asset, None);
        let depreciation = add("1510", "Accumulated depreciation - plant", AccountType::Asset, None);
        add("1900", "Sundry balances", AccountType::Asset, None);
        let payables = add("2000", "Trade payables", AccountType::Liability, None);
        let tax_payable = add(
            "2100",
            "Corporation tax payable",
            AccountType::Liability,
            tax_tagged.then_some("TAX:INCOME_TAX"),
        );
        let capital = add("3000", "Share capital", AccountType::Equity, None);
        let sales = add("4000", "Sales", AccountType::Income, None);
        let depreciation_expense = add("6100", "Depreciation expense", AccountType::Expense, None);
        let expenses = add("6200", "Rent", AccountType::Expense, None);
        let tax_expense = add("7900", "Income tax expense", AccountType::Expense, None);

        let fixture = Self { store, tenant, march, cash, sales, expenses };

        // Before the cutover.
        fixture.post(d(2024, 1, 15), cash, capital, dec!(10000));
        fixture.post(d(2024, 2, 10), cash, sales, dec!(700));
        // March.
        fixture.post(d(2024, 3, 5), plant, cash, dec!(6000));
        fixture.post(d(2024, 3, 10), receivables, sales, dec!(5000));
        fixture.post(d(2024, 3, 20), cash, receivables, dec!(3000));
        fixture.post(d(2024, 3, 25), expenses, payables, dec!(1000));
        fixture.post(d(2024, 3, 31), depreciation_expense, depreciation, dec!(100));
        fixture.post(d(2024, 3, 31), tax_expense, tax_payable, dec!(900));

        let forklift = FixedAsset {
            id: FixedAssetId::new(),
            tenant_id: tenant,
            name: "Forklift".to_string(),
            cost: dec!(6000),
            acquisition_date: d(2024, 3, 5),
            disposal_date: None,
        };
        fixture.store.add_depreciation_charge(
            tenant,
            DepreciationCharge { asset_id: forklift.id, charge_date: d(2024, 3, 31), amount: dec!(100) },
        );
        fixture.store.add_fixed_asset(forklift);

        fixture.store.add_open_item(tenant, Self::item(OpenItemKind::Receivable, d(2024, 3, 10), dec!(2000)), None);
        fixture.store.add_open_item(tenant, Self::item(OpenItemKind::Payable, d(2024, 3, 25), dec!(1000)), None);
        fixture
    }

    pub(crate) fn profile(tenant_id: TenantId) -> TenantProfile {
        TenantProfile {
            tenant_id,
            legal_name: Some("Acme Trading Ltd".to_string()),
            currency: Some("GBP".to_string()),
            statutory_tax_rate: Some(dec!(0.25)),
            fiscal_year_start_month: 1,
        }
    }

    pub(crate) fn period(tenant_id: TenantId, name: &str, start: NaiveDate, end: NaiveDate, status: PeriodStatus) -> AccountingPeriod {
        AccountingPeriod {
            id: AccountingPeriodId::new(),
            tenant_id,
            name: name.to_string(),
            start_date: start,
            end_date: end,
            status,
        }
    }

    fn item(kind: OpenItemKind, document_date: NaiveDate, outstanding: Decimal) -> OpenItem {
        OpenItem {
            kind,
            counterparty: "Globex".to_string(),
            document_ref: "DOC-1".to_string(),
            document_date,
            due_date: document_date + chrono::Days::new(30),
            outstanding,
        }
    }

    pub(crate) fn post(&self, date: NaiveDate, debit: AccountId, credit: AccountId, amount: Decimal) {
        self.store.post_entry(JournalEntry {
            id: JournalEntryId::new(),
            tenant_id: self.tenant,
            entry_date: date,
            status: EntryStatus::Posted,
            reference: None,
            description: "fixture".to_string(),
            lines: vec![
                JournalLine { id: JournalLineId::new(), account_id: debit, debit: amount, credit: Decimal::ZERO },
                JournalLine { id: JournalLineId::new(), account_id: credit, debit: Decimal::ZERO, credit: amount },
            ],
        });
    }

    pub(crate) fn engine(&self) -> ReportingEngine {
        ReportingEngine::new(DataSources::from_store(self.store.clone()), EngineSettings::default())
    }

    pub(crate) fn uncached_engine(&self) -> ReportingEngine {
        self.engine().with_cache(Arc::new(NoCache))
    }
}
