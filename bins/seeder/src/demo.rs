//! The demo tenant: Acme Trading Ltd, migrated onto the ledger on 2024-03-01.
//!
//! Balances before March sit in a closed "Opening Balances" period. March has
//! a plant purchase, a credit sale partly collected, rent on account,
//! depreciation and a tax charge, so every note has something to tie out.

use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{ActiveModelTrait, DatabaseConnection, DbErr, Set};
use tieout_core::fiscal::{AccountingPeriod, OPENING_BALANCES_PERIOD, PeriodStatus};
use tieout_core::ledger::{Account, AccountType, EntryStatus, JournalEntry, JournalLine};
use tieout_core::source::memory::InMemoryStore;
use tieout_core::subledger::{DepreciationCharge, FixedAsset, OpenItem, OpenItemKind};
use tieout_core::tenant::TenantProfile;
use tieout_db::entities::{
    accounting_periods, accounts, depreciation_charges, fixed_assets, journal_entries,
    journal_lines, open_items, tenants,
};
use tieout_db::rls::RlsExt;
use tieout_shared::types::{
    AccountId, AccountingPeriodId, FixedAssetId, JournalEntryId, JournalLineId, TenantId,
};
use uuid::Uuid;

/// Fixed ID so the seeder is idempotent.
pub const DEMO_TENANT_ID: TenantId = TenantId::from_uuid(Uuid::from_u128(1));

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

/// Everything seeded for the demo tenant.
pub struct DemoLedger {
    pub profile: TenantProfile,
    pub accounts: Vec<Account>,
    pub periods: Vec<AccountingPeriod>,
    pub entries: Vec<JournalEntry>,
    pub assets: Vec<FixedAsset>,
    pub charges: Vec<DepreciationCharge>,
    pub open_items: Vec<OpenItem>,
}

impl DemoLedger {
    pub fn build() -> Self {
        let tenant_id = DEMO_TENANT_ID;

        let mut periods = vec![AccountingPeriod {
            id: AccountingPeriodId::new(),
            tenant_id,
            name: OPENING_BALANCES_PERIOD.to_string(),
            start_date: date(2023, 1, 1),
            end_date: date(2024, 2, 29),
            status: PeriodStatus::Closed,
        }];
        for month in 3..=12 {
            let start = date(2024, month, 1);
            let end = if month == 12 {
                date(2024, 12, 31)
            } else {
                date(2024, month + 1, 1).pred_opt().unwrap_or(start)
            };
            periods.push(AccountingPeriod {
                id: AccountingPeriodId::new(),
                tenant_id,
                name: start.format("%B %Y").to_string(),
                start_date: start,
                end_date: end,
                status: PeriodStatus::Open,
            });
        }

        let account = |code: &str, name: &str, account_type: AccountType, tax_tag: Option<&str>| {
            Account {
                id: AccountId::new(),
                tenant_id,
                code: code.to_string(),
                name: name.to_string(),
                account_type,
                classification: None,
                tax_tag: tax_tag.map(str::to_string),
            }
        };
        let accounts = vec![
            account("1000", "Cash at bank", AccountType::Asset, None),
            account("1100", "Trade receivables", AccountType::Asset, None),
            account("1500", "Plant and equipment", AccountType::Asset, None),
            account("1510", "Accumulated depreciation - plant", AccountType::Asset, None),
            account("2000", "Trade payables", AccountType::Liability, None),
            account("2100", "Corporation tax payable", AccountType::Liability, Some("TAX:INCOME_TAX")),
            account("3000", "Share capital", AccountType::Equity, None),
            account("4000", "Sales", AccountType::Income, None),
            account("6100", "Depreciation expense", AccountType::Expense, None),
            account("6200", "Rent", AccountType::Expense, None),
            account("7900", "Income tax expense", AccountType::Expense, None),
        ];
        let id = |code: &str| {
            accounts
                .iter()
                .find(|a| a.code == code)
                .map_or_else(AccountId::new, |a| a.id)
        };

        let entry = |day: NaiveDate, description: &str, debit: &str, credit: &str, amount: Decimal| {
            JournalEntry {
                id: JournalEntryId::new(),
                tenant_id,
                entry_date: day,
                status: EntryStatus::Posted,
                reference: None,
                description: description.to_string(),
                lines: vec![
                    JournalLine {
                        id: JournalLineId::new(),
                        account_id: id(debit),
                        debit: amount,
                        credit: Decimal::ZERO,
                    },
                    JournalLine {
                        id: JournalLineId::new(),
                        account_id: id(credit),
                        debit: Decimal::ZERO,
                        credit: amount,
                    },
                ],
            }
        };
        let entries = vec![
            entry(date(2024, 1, 15), "Share issue", "1000", "3000", dec!(10000)),
            entry(date(2024, 2, 10), "Cash sales", "1000", "4000", dec!(700)),
            entry(date(2024, 3, 5), "Forklift purchase", "1500", "1000", dec!(6000)),
            entry(date(2024, 3, 10), "Invoice INV-1001", "1100", "4000", dec!(5000)),
            entry(date(2024, 3, 20), "Receipt against INV-1001", "1000", "1100", dec!(3000)),
            entry(date(2024, 3, 25), "Warehouse rent", "6200", "2000", dec!(1000)),
            entry(date(2024, 3, 31), "Depreciation run", "6100", "1510", dec!(100)),
            entry(date(2024, 3, 31), "Corporation tax charge", "7900", "2100", dec!(900)),
        ];

        let forklift = FixedAsset {
            id: FixedAssetId::new(),
            tenant_id,
            name: "Forklift".to_string(),
            cost: dec!(6000),
            acquisition_date: date(2024, 3, 5),
            disposal_date: None,
        };
        let charges = vec![DepreciationCharge {
            asset_id: forklift.id,
            charge_date: date(2024, 3, 31),
            amount: dec!(100),
        }];

        let item = |kind: OpenItemKind, counterparty: &str, doc: &str, issued: NaiveDate, amount: Decimal| {
            OpenItem {
                kind,
                counterparty: counterparty.to_string(),
                document_ref: doc.to_string(),
                document_date: issued,
                due_date: issued.checked_add_days(Days::new(30)).unwrap_or(issued),
                outstanding: amount,
            }
        };
        let open_items = vec![
            item(OpenItemKind::Receivable, "Globex Corporation", "INV-1001", date(2024, 3, 10), dec!(2000)),
            item(OpenItemKind::Payable, "Initech Properties", "BILL-552", date(2024, 3, 25), dec!(1000)),
        ];

        Self {
            profile: TenantProfile {
                tenant_id,
                legal_name: Some("Acme Trading Ltd".to_string()),
                currency: Some("GBP".to_string()),
                statutory_tax_rate: Some(dec!(0.25)),
                fiscal_year_start_month: 1,
            },
            accounts,
            periods,
            entries,
            assets: vec![forklift],
            charges,
            open_items,
        }
    }

    /// The first monthly period after the cutover.
    pub fn first_trading_period(&self) -> Option<&AccountingPeriod> {
        self.periods.iter().find(|p| !p.is_closed_opening_balances())
    }

    pub fn load_into(&self, store: &InMemoryStore) {
        let tenant_id = self.profile.tenant_id;
        store.add_tenant(self.profile.clone());
        self.accounts.iter().cloned().for_each(|a| store.add_account(a));
        self.periods.iter().cloned().for_each(|p| store.add_period(p));
        self.entries.iter().cloned().for_each(|e| store.post_entry(e));
        self.assets.iter().cloned().for_each(|a| store.add_fixed_asset(a));
        for charge in &self.charges {
            store.add_depreciation_charge(tenant_id, charge.clone());
        }
        for item in &self.open_items {
            store.add_open_item(tenant_id, item.clone(), None);
        }
    }

    /// Writes the whole ledger in one tenant-scoped transaction.
    pub async fn write_to(&self, db: &DatabaseConnection) -> Result<(), DbErr> {
        let tenant_id = self.profile.tenant_id.into_inner();
        let rls = db.with_rls(self.profile.tenant_id).await?;
        let txn = rls.transaction();

        tenants::ActiveModel {
            id: Set(tenant_id),
            name: Set("acme-trading".to_string()),
            legal_name: Set(self.profile.legal_name.clone()),
            currency: Set(self.profile.currency.clone()),
            statutory_tax_rate: Set(self.profile.statutory_tax_rate),
            fiscal_year_start_month: Set(1),
            ..Default::default()
        }
        .insert(txn)
        .await?;

        for account in &self.accounts {
            accounts::ActiveModel {
                id: Set(account.id.into_inner()),
                tenant_id: Set(tenant_id),
                code: Set(account.code.clone()),
                name: Set(account.name.clone()),
                account_type: Set(account.account_type.into()),
                classification: Set(account.classification.map(|c| c.key().to_string())),
                tax_tag: Set(account.tax_tag.clone()),
                ..Default::default()
            }
            .insert(txn)
            .await?;
        }

        for period in &self.periods {
            accounting_periods::ActiveModel {
                id: Set(period.id.into_inner()),
                tenant_id: Set(tenant_id),
                name: Set(period.name.clone()),
                start_date: Set(period.start_date),
                end_date: Set(period.end_date),
                status: Set(period.status.into()),
                ..Default::default()
            }
            .insert(txn)
            .await?;
        }

        for entry in &self.entries {
            journal_entries::ActiveModel {
                id: Set(entry.id.into_inner()),
                tenant_id: Set(tenant_id),
                entry_date: Set(entry.entry_date),
                status: Set(entry.status.into()),
                reference: Set(entry.reference.clone()),
                description: Set(entry.description.clone()),
                ..Default::default()
            }
            .insert(txn)
            .await?;

            for line in &entry.lines {
                journal_lines::ActiveModel {
                    id: Set(line.id.into_inner()),
                    tenant_id: Set(tenant_id),
                    entry_id: Set(entry.id.into_inner()),
                    account_id: Set(line.account_id.into_inner()),
                    debit: Set(line.debit),
                    credit: Set(line.credit),
                }
                .insert(txn)
                .await?;
            }
        }

        for asset in &self.assets {
            fixed_assets::ActiveModel {
                id: Set(asset.id.into_inner()),
                tenant_id: Set(tenant_id),
                name: Set(asset.name.clone()),
                cost: Set(asset.cost),
                acquisition_date: Set(asset.acquisition_date),
                disposal_date: Set(asset.disposal_date),
                ..Default::default()
            }
            .insert(txn)
            .await?;
        }

        for charge in &self.charges {
            depreciation_charges::ActiveModel {
                id: Set(Uuid::now_v7()),
                tenant_id: Set(tenant_id),
                asset_id: Set(charge.asset_id.into_inner()),
                charge_date: Set(charge.charge_date),
                amount: Set(charge.amount),
            }
            .insert(txn)
            .await?;
        }

        for item in &self.open_items {
            open_items::ActiveModel {
                id: Set(Uuid::now_v7()),
                tenant_id: Set(tenant_id),
                kind: Set(item.kind.into()),
                counterparty: Set(item.counterparty.clone()),
                document_ref: Set(item.document_ref.clone()),
                document_date: Set(item.document_date),
                due_date: Set(item.due_date),
                amount: Set(item.outstanding),
                settled_on: Set(None),
            }
            .insert(txn)
            .await?;
        }

        rls.commit().await
    }
}
