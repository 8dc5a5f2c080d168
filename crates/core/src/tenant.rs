//! Tenant reporting profile.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tieout_shared::types::{CurrencyCode, TenantId};

/// Reporting settings of a tenant as stored.
///
/// Fields are optional because a tenant can exist before it is fully set up.
/// Disclosure notes validate the profile with [`TenantProfile::reporting_identity`]
/// before computing anything.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantProfile {
    /// Tenant ID.
    pub tenant_id: TenantId,
    /// Legal name of the reporting entity.
    pub legal_name: Option<String>,
    /// Presentation currency as stored (validated on use).
    pub currency: Option<String>,
    /// Statutory income-tax rate as a fraction, e.g. `0.25`.
    pub statutory_tax_rate: Option<Decimal>,
    /// First month of the fiscal year (1-12).
    pub fiscal_year_start_month: u32,
}

/// Validated identity printed on disclosure notes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportingIdentity {
    /// Legal name of the reporting entity.
    pub legal_name: String,
    /// Presentation currency.
    pub currency: CurrencyCode,
}

impl TenantProfile {
    /// Validates the fields every disclosure note needs.
    ///
    /// # Errors
    ///
    /// Returns a description of the first missing or invalid setting.
    pub fn reporting_identity(&self) -> Result<ReportingIdentity, String> {
        let legal_name = self
            .legal_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .ok_or_else(|| format!("tenant {} has no legal name", self.tenant_id))?;

        let currency = self
            .currency
            .as_deref()
            .ok_or_else(|| format!("tenant {} has no presentation currency", self.tenant_id))?
            .parse::<CurrencyCode>()?;

        Ok(ReportingIdentity {
            legal_name: legal_name.to_string(),
            currency,
        })
    }

    /// Validates the statutory tax rate.
    ///
    /// # Errors
    ///
    /// Returns a description if the rate is missing or outside `[0, 1]`.
    pub fn statutory_rate(&self) -> Result<Decimal, String> {
        match self.statutory_tax_rate {
            None => Err(format!(
                "tenant {} has no statutory tax rate",
                self.tenant_id
            )),
            Some(rate) if rate < Decimal::ZERO || rate > Decimal::ONE => Err(format!(
                "tenant {} has statutory tax rate {rate} outside 0..1",
                self.tenant_id
            )),
            Some(rate) => Ok(rate),
        }
    }

    /// Fiscal year start month, falling back to January when out of range.
    #[must_use]
    pub const fn fiscal_start_month(&self) -> u32 {
        match self.fiscal_year_start_month {
            month @ 1..=12 => month,
            _ => 1,
        }
    }
}
