use serde::Serialize;
use sqlx::SqlitePool;

use crate::error::{AppError, AppResult};
use crate::models::{CreateOrganizationRequest, Organization, OrganizationStats};
use crate::repository::{OrganizationRepository, SqlOrganizationRepository};

#[derive(Debug, Clone, Serialize)]
pub struct OrganizationList {
    pub data: Vec<Organization>,
    pub count: usize,
}

impl From<Vec<Organization>> for OrganizationList {
    fn from(data: Vec<Organization>) -> Self {
        Self {
            count: data.len(),
            data,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct OrganizationSearch {
    pub data: Vec<Organization>,
    pub count: usize,
    pub query: String,
}

/// Each call works on its own pooled connection, released when the call
/// returns. Nothing is shared between calls except the pool.
#[derive(Clone)]
pub struct OrganizationService {
    pool: SqlitePool,
}

impl OrganizationService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// The name pre-check and the insert are not one transaction. A create
    /// racing past the pre-check is still stopped by the unique index and
    /// surfaces as the same `DuplicateName` error.
    pub async fn create_organization(
        &self,
        request: CreateOrganizationRequest,
    ) -> AppResult<Organization> {
        let mut session = self.pool.acquire().await?;
        let mut repo = SqlOrganizationRepository::new(&mut session);

        if repo.exists_by_name(&request.name).await? {
            return Err(AppError::DuplicateName);
        }

        let mut organization = Organization::new(request.name, request.email, request.license);
        organization.active = request.active;

        repo.insert(&organization).await?;
        tracing::info!(id = %organization.id, name = %organization.name, "Organization created");
        Ok(organization)
    }

    pub async fn get_all_organizations(&self) -> AppResult<OrganizationList> {
        let mut session = self.pool.acquire().await?;
        let organizations = SqlOrganizationRepository::new(&mut session)
            .find_all()
            .await?;
        Ok(organizations.into())
    }

    pub async fn get_active_organizations(&self) -> AppResult<OrganizationList> {
        let mut session = self.pool.acquire().await?;
        let organizations = SqlOrganizationRepository::new(&mut session)
            .find_active()
            .await?;
        Ok(organizations.into())
    }

    pub async fn search_organizations(&self, term: &str) -> AppResult<OrganizationSearch> {
        let mut session = self.pool.acquire().await?;
        let data = SqlOrganizationRepository::new(&mut session)
            .find_by_name_containing(term)
            .await?;
        Ok(OrganizationSearch {
            count: data.len(),
            data,
            query: term.to_string(),
        })
    }

    pub async fn get_stats(&self) -> AppResult<OrganizationStats> {
        let mut session = self.pool.acquire().await?;
        SqlOrganizationRepository::new(&mut session).get_stats().await
    }
}
