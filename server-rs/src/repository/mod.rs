//! Query contract for the organization collection, independent of the
//! storage engine behind it.

use std::future::Future;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::{Organization, OrganizationStats};

pub mod organization;

pub use organization::SqlOrganizationRepository;

pub trait OrganizationRepository: Send {
    /// Every organization, oldest first.
    fn find_all(&mut self) -> impl Future<Output = AppResult<Vec<Organization>>> + Send;

    fn find_by_id(
        &mut self,
        id: Uuid,
    ) -> impl Future<Output = AppResult<Option<Organization>>> + Send;

    fn find_active(&mut self) -> impl Future<Output = AppResult<Vec<Organization>>> + Send;

    fn find_inactive(&mut self) -> impl Future<Output = AppResult<Vec<Organization>>> + Send;

    /// Case-insensitive substring match on `name`.
    fn find_by_name_containing(
        &mut self,
        term: &str,
    ) -> impl Future<Output = AppResult<Vec<Organization>>> + Send;

    fn find_by_email(
        &mut self,
        email: &str,
    ) -> impl Future<Output = AppResult<Option<Organization>>> + Send;

    fn find_by_license(
        &mut self,
        license: &str,
    ) -> impl Future<Output = AppResult<Option<Organization>>> + Send;

    fn exists_by_name(&mut self, name: &str) -> impl Future<Output = AppResult<bool>> + Send;

    fn exists_by_email(&mut self, email: &str) -> impl Future<Output = AppResult<bool>> + Send;

    /// `inactive` is derived as `total - active`.
    fn get_stats(&mut self) -> impl Future<Output = AppResult<OrganizationStats>> + Send;

    /// Inclusive on both ends.
    fn find_created_between(
        &mut self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> impl Future<Output = AppResult<Vec<Organization>>> + Send;

    /// Fails with `AppError::DuplicateName` if the name is already taken.
    fn insert(&mut self, organization: &Organization)
        -> impl Future<Output = AppResult<()>> + Send;

    /// Persists the mutable fields of `organization`. Returns `false` when no
    /// row has its id.
    fn update(&mut self, organization: &Organization)
        -> impl Future<Output = AppResult<bool>> + Send;
}
