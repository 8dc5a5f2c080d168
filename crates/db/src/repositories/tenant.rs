//! Tenant repository.

use async_trait::async_trait;
use sea_orm::{DatabaseConnection, EntityTrait};
use tieout_core::source::{SourceError, TenantDirectory};
use tieout_core::tenant::TenantProfile;
use tieout_shared::types::TenantId;

use super::RepositoryError;
use crate::entities::tenants;
use crate::rls::RlsExt;

fn to_profile(model: tenants::Model) -> Result<TenantProfile, RepositoryError> {
    let fiscal_year_start_month = u32::try_from(model.fiscal_year_start_month).map_err(|_| {
        RepositoryError::corrupt(
            "tenants",
            format!("fiscal year start month {}", model.fiscal_year_start_month),
        )
    })?;

    Ok(TenantProfile {
        tenant_id: TenantId::from_uuid(model.id),
        legal_name: model.legal_name,
        currency: model.currency.map(|c| c.trim().to_string()),
        statutory_tax_rate: model.statutory_tax_rate,
        fiscal_year_start_month,
    })
}

/// Reads tenant settings.
#[derive(Debug, Clone)]
pub struct TenantRepository {
    db: DatabaseConnection,
}

impl TenantRepository {
    /// Creates a new tenant repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds a tenant by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, tenant_id: TenantId) -> Result<Option<tenants::Model>, RepositoryError> {
        let rls = self.db.with_rls(tenant_id).await?;
        let tenant = tenants::Entity::find_by_id(tenant_id.into_inner())
            .one(rls.transaction())
            .await?;
        rls.commit().await?;
        Ok(tenant)
    }
}

#[async_trait]
impl TenantDirectory for TenantRepository {
    async fn tenant_profile(
        &self,
        tenant_id: TenantId,
    ) -> Result<Option<TenantProfile>, SourceError> {
        let tenant = self.find_by_id(tenant_id).await?;
        Ok(tenant.map(to_profile).transpose()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn model(month: i16) -> tenants::Model {
        tenants::Model {
            id: Uuid::now_v7(),
            name: "acme".to_string(),
            legal_name: Some("Acme Trading Ltd".to_string()),
            currency: Some("GBP".to_string()),
            statutory_tax_rate: Some(dec!(0.25)),
            fiscal_year_start_month: month,
            created_at: chrono::Utc::now().into(),
            updated_at: chrono::Utc::now().into(),
        }
    }

    #[test]
    fn test_maps_profile() {
        let profile = to_profile(model(4)).unwrap();
        assert_eq!(profile.fiscal_year_start_month, 4);
        assert_eq!(profile.statutory_tax_rate, Some(dec!(0.25)));
        assert_eq!(profile.reporting_identity().unwrap().currency.as_str(), "GBP");
    }

    #[test]
    fn test_negative_month_is_corrupt() {
        assert!(matches!(
            to_profile(model(-1)),
            Err(RepositoryError::Corrupt { table: "tenants", .. })
        ));
    }
}
