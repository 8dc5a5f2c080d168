//! Initial database migration.
//!
//! Creates the enums, ledger and subledger tables, note storage, and the
//! row-level security policies that scope every table to
//! `app.current_tenant_id`.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: ENUMS
        // ============================================================
        db.execute_unprepared(ENUMS_SQL).await?;

        // ============================================================
        // PART 2: TENANTS & CHART OF ACCOUNTS
        // ============================================================
        db.execute_unprepared(TENANTS_SQL).await?;
        db.execute_unprepared(ACCOUNTS_SQL).await?;
        db.execute_unprepared(ACCOUNTING_PERIODS_SQL).await?;

        // ============================================================
        // PART 3: LEDGER
        // ============================================================
        db.execute_unprepared(JOURNAL_ENTRIES_SQL).await?;
        db.execute_unprepared(JOURNAL_LINES_SQL).await?;

        // ============================================================
        // PART 4: SUBLEDGERS
        // ============================================================
        db.execute_unprepared(FIXED_ASSETS_SQL).await?;
        db.execute_unprepared(OPEN_ITEMS_SQL).await?;

        // ============================================================
        // PART 5: PERIOD-CLOSE NOTES
        // ============================================================
        db.execute_unprepared(DISCLOSURE_NOTES_SQL).await?;

        // ============================================================
        // PART 6: ROW LEVEL SECURITY
        // ============================================================
        db.execute_unprepared(RLS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

const ENUMS_SQL: &str = r"
CREATE TYPE account_type AS ENUM ('asset', 'liability', 'equity', 'income', 'expense');
CREATE TYPE period_status AS ENUM ('open', 'soft_closed', 'closed');
CREATE TYPE entry_status AS ENUM ('draft', 'posted', 'void');
CREATE TYPE open_item_kind AS ENUM ('receivable', 'payable');
CREATE TYPE note_type AS ENUM ('ppe_movement', 'depreciation', 'tax_reconciliation');
";

const TENANTS_SQL: &str = r"
CREATE TABLE tenants (
    id UUID PRIMARY KEY,
    name VARCHAR(255) NOT NULL,
    legal_name VARCHAR(255),
    currency CHAR(3),
    statutory_tax_rate NUMERIC(7, 4) CHECK (statutory_tax_rate BETWEEN 0 AND 1),
    fiscal_year_start_month SMALLINT NOT NULL DEFAULT 1
        CHECK (fiscal_year_start_month BETWEEN 1 AND 12),
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";

const ACCOUNTS_SQL: &str = r"
CREATE TABLE accounts (
    id UUID PRIMARY KEY,
    tenant_id UUID NOT NULL REFERENCES tenants(id) ON DELETE CASCADE,
    code VARCHAR(50) NOT NULL,
    name VARCHAR(255) NOT NULL,
    account_type account_type NOT NULL,
    classification VARCHAR(50),
    tax_tag VARCHAR(50),
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    CONSTRAINT uq_accounts_code UNIQUE (tenant_id, code)
);

CREATE INDEX idx_accounts_tenant ON accounts(tenant_id);
";

const ACCOUNTING_PERIODS_SQL: &str = r"
CREATE TABLE accounting_periods (
    id UUID PRIMARY KEY,
    tenant_id UUID NOT NULL REFERENCES tenants(id) ON DELETE CASCADE,
    name VARCHAR(100) NOT NULL,
    start_date DATE NOT NULL,
    end_date DATE NOT NULL,
    status period_status NOT NULL DEFAULT 'open',
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    CONSTRAINT chk_period_dates CHECK (start_date <= end_date)
);

CREATE INDEX idx_periods_tenant_dates ON accounting_periods(tenant_id, start_date, end_date);
";

const JOURNAL_ENTRIES_SQL: &str = r"
CREATE TABLE journal_entries (
    id UUID PRIMARY KEY,
    tenant_id UUID NOT NULL REFERENCES tenants(id) ON DELETE CASCADE,
    entry_date DATE NOT NULL,
    status entry_status NOT NULL DEFAULT 'draft',
    reference VARCHAR(100),
    description TEXT NOT NULL DEFAULT '',
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX idx_entries_tenant_date ON journal_entries(tenant_id, entry_date)
    WHERE status = 'posted';
";

const JOURNAL_LINES_SQL: &str = r"
CREATE TABLE journal_lines (
    id UUID PRIMARY KEY,
    tenant_id UUID NOT NULL REFERENCES tenants(id) ON DELETE CASCADE,
    entry_id UUID NOT NULL REFERENCES journal_entries(id) ON DELETE CASCADE,
    account_id UUID NOT NULL REFERENCES accounts(id),
    debit NUMERIC(19, 4) NOT NULL DEFAULT 0 CHECK (debit >= 0),
    credit NUMERIC(19, 4) NOT NULL DEFAULT 0 CHECK (credit >= 0),

    CONSTRAINT chk_one_side CHECK (debit = 0 OR credit = 0)
);

CREATE INDEX idx_lines_entry ON journal_lines(entry_id);
CREATE INDEX idx_lines_account ON journal_lines(tenant_id, account_id);
";

const FIXED_ASSETS_SQL: &str = r"
CREATE TABLE fixed_assets (
    id UUID PRIMARY KEY,
    tenant_id UUID NOT NULL REFERENCES tenants(id) ON DELETE CASCADE,
    name VARCHAR(255) NOT NULL,
    cost NUMERIC(19, 4) NOT NULL CHECK (cost >= 0),
    acquisition_date DATE NOT NULL,
    disposal_date DATE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    CONSTRAINT chk_disposal_after_acquisition
        CHECK (disposal_date IS NULL OR disposal_date >= acquisition_date)
);

CREATE TABLE depreciation_charges (
    id UUID PRIMARY KEY,
    tenant_id UUID NOT NULL REFERENCES tenants(id) ON DELETE CASCADE,
    asset_id UUID NOT NULL REFERENCES fixed_assets(id) ON DELETE CASCADE,
    charge_date DATE NOT NULL,
    amount NUMERIC(19, 4) NOT NULL
);

CREATE INDEX idx_depreciation_tenant_date ON depreciation_charges(tenant_id, charge_date);
";

const OPEN_ITEMS_SQL: &str = r"
CREATE TABLE open_items (
    id UUID PRIMARY KEY,
    tenant_id UUID NOT NULL REFERENCES tenants(id) ON DELETE CASCADE,
    kind open_item_kind NOT NULL,
    counterparty VARCHAR(255) NOT NULL,
    document_ref VARCHAR(100) NOT NULL,
    document_date DATE NOT NULL,
    due_date DATE NOT NULL,
    amount NUMERIC(19, 4) NOT NULL,
    settled_on DATE
);

CREATE INDEX idx_open_items_tenant_kind ON open_items(tenant_id, kind, document_date);
";

const DISCLOSURE_NOTES_SQL: &str = r"
CREATE TABLE disclosure_notes (
    id UUID PRIMARY KEY,
    tenant_id UUID NOT NULL REFERENCES tenants(id) ON DELETE CASCADE,
    period_id UUID NOT NULL REFERENCES accounting_periods(id) ON DELETE CASCADE,
    note_type note_type NOT NULL,
    version INTEGER NOT NULL DEFAULT 1 CHECK (version >= 1),
    generated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    CONSTRAINT uq_note_per_period UNIQUE (tenant_id, period_id, note_type)
);

CREATE TABLE disclosure_note_lines (
    id UUID PRIMARY KEY,
    tenant_id UUID NOT NULL REFERENCES tenants(id) ON DELETE CASCADE,
    note_id UUID NOT NULL REFERENCES disclosure_notes(id) ON DELETE CASCADE,
    line_no INTEGER NOT NULL,
    label TEXT NOT NULL,
    amount NUMERIC(19, 4) NOT NULL,

    CONSTRAINT uq_note_line UNIQUE (note_id, line_no)
);
";

const RLS_SQL: &str = r"
ALTER TABLE tenants ENABLE ROW LEVEL SECURITY;
ALTER TABLE accounts ENABLE ROW LEVEL SECURITY;
ALTER TABLE accounting_periods ENABLE ROW LEVEL SECURITY;
ALTER TABLE journal_entries ENABLE ROW LEVEL SECURITY;
ALTER TABLE journal_lines ENABLE ROW LEVEL SECURITY;
ALTER TABLE fixed_assets ENABLE ROW LEVEL SECURITY;
ALTER TABLE depreciation_charges ENABLE ROW LEVEL SECURITY;
ALTER TABLE open_items ENABLE ROW LEVEL SECURITY;
ALTER TABLE disclosure_notes ENABLE ROW LEVEL SECURITY;
ALTER TABLE disclosure_note_lines ENABLE ROW LEVEL SECURITY;

-- Table owners bypass RLS unless forced.
ALTER TABLE tenants FORCE ROW LEVEL SECURITY;
ALTER TABLE accounts FORCE ROW LEVEL SECURITY;
ALTER TABLE accounting_periods FORCE ROW LEVEL SECURITY;
ALTER TABLE journal_entries FORCE ROW LEVEL SECURITY;
ALTER TABLE journal_lines FORCE ROW LEVEL SECURITY;
ALTER TABLE fixed_assets FORCE ROW LEVEL SECURITY;
ALTER TABLE depreciation_charges FORCE ROW LEVEL SECURITY;
ALTER TABLE open_items FORCE ROW LEVEL SECURITY;
ALTER TABLE disclosure_notes FORCE ROW LEVEL SECURITY;
ALTER TABLE disclosure_note_lines FORCE ROW LEVEL SECURITY;

CREATE POLICY tenant_isolation ON tenants
    USING (id = current_setting('app.current_tenant_id', true)::UUID);

CREATE POLICY tenant_isolation ON accounts
    USING (tenant_id = current_setting('app.current_tenant_id', true)::UUID);

CREATE POLICY tenant_isolation ON accounting_periods
    USING (tenant_id = current_setting('app.current_tenant_id', true)::UUID);

CREATE POLICY tenant_isolation ON journal_entries
    USING (tenant_id = current_setting('app.current_tenant_id', true)::UUID);

CREATE POLICY tenant_isolation ON journal_lines
    USING (tenant_id = current_setting('app.current_tenant_id', true)::UUID);

CREATE POLICY tenant_isolation ON fixed_assets
    USING (tenant_id = current_setting('app.current_tenant_id', true)::UUID);

CREATE POLICY tenant_isolation ON depreciation_charges
    USING (tenant_id = current_setting('app.current_tenant_id', true)::UUID);

CREATE POLICY tenant_isolation ON open_items
    USING (tenant_id = current_setting('app.current_tenant_id', true)::UUID);

CREATE POLICY tenant_isolation ON disclosure_notes
    USING (tenant_id = current_setting('app.current_tenant_id', true)::UUID);

CREATE POLICY tenant_isolation ON disclosure_note_lines
    USING (tenant_id = current_setting('app.current_tenant_id', true)::UUID);
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS disclosure_note_lines CASCADE;
DROP TABLE IF EXISTS disclosure_notes CASCADE;
DROP TABLE IF EXISTS open_items CASCADE;
DROP TABLE IF EXISTS depreciation_charges CASCADE;
DROP TABLE IF EXISTS fixed_assets CASCADE;
DROP TABLE IF EXISTS journal_lines CASCADE;
DROP TABLE IF EXISTS journal_entries CASCADE;
DROP TABLE IF EXISTS accounting_periods CASCADE;
DROP TABLE IF EXISTS accounts CASCADE;
DROP TABLE IF EXISTS tenants CASCADE;

DROP TYPE IF EXISTS note_type CASCADE;
DROP TYPE IF EXISTS open_item_kind CASCADE;
DROP TYPE IF EXISTS entry_status CASCADE;
DROP TYPE IF EXISTS period_status CASCADE;
DROP TYPE IF EXISTS account_type CASCADE;
";
