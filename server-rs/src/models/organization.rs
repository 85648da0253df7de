use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    pub id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub license: Option<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Organization {
    pub fn new(name: String, email: Option<String>, license: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name,
            email,
            license,
            active: true,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn activate(&mut self) {
        self.active = true;
        self.touch();
    }

    pub fn deactivate(&mut self) {
        self.active = false;
        self.touch();
    }

    /// Overwrites only the fields that are `Some`.
    pub fn update_info(
        &mut self,
        name: Option<String>,
        email: Option<String>,
        license: Option<String>,
    ) {
        if let Some(name) = name {
            self.name = name;
        }
        if let Some(email) = email {
            self.email = Some(email);
        }
        if let Some(license) = license {
            self.license = Some(license);
        }
        self.touch();
    }

    // Wall clock can step backwards; updated_at never goes below created_at.
    fn touch(&mut self) {
        self.updated_at = Utc::now().max(self.created_at);
    }
}

/// Vetted input for creating an organization. Built by
/// [`crate::services::validation::sanitize_create`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateOrganizationRequest {
    pub name: String,
    pub email: Option<String>,
    pub license: Option<String>,
    pub active: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationStats {
    pub total: i64,
    pub active: i64,
    pub inactive: i64,
}

impl OrganizationStats {
    pub fn from_counts(total: i64, active: i64) -> Self {
        Self {
            total,
            active,
            inactive: total - active,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn new_organization_is_active_with_equal_timestamps() {
        let org = Organization::new("Acme".into(), None, None);
        assert!(org.is_active());
        assert_eq!(org.created_at, org.updated_at);
    }

    #[test]
    fn new_organizations_get_distinct_ids() {
        let a = Organization::new("A".into(), None, None);
        let b = Organization::new("B".into(), None, None);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn deactivate_and_activate_toggle_state() {
        let mut org = Organization::new("Acme".into(), None, None);
        org.deactivate();
        assert!(!org.is_active());
        org.activate();
        assert!(org.is_active());
        assert!(org.updated_at >= org.created_at);
    }

    #[test]
    fn update_info_only_touches_given_fields() {
        let mut org = Organization::new(
            "Acme".into(),
            Some("info@acme.com".into()),
            Some("LIC-1".into()),
        );
        org.update_info(None, None, Some("LIC-2".into()));
        assert_eq!(org.name, "Acme");
        assert_eq!(org.email.as_deref(), Some("info@acme.com"));
        assert_eq!(org.license.as_deref(), Some("LIC-2"));
    }

    #[test]
    fn updated_at_never_precedes_created_at() {
        let mut org = Organization::new("Acme".into(), None, None);
        // Simulate a record created "in the future" relative to the local clock.
        org.created_at = Utc::now() + Duration::hours(1);
        org.updated_at = org.created_at;
        org.deactivate();
        assert_eq!(org.updated_at, org.created_at);
    }

    #[test]
    fn serializes_with_camel_case_timestamps() {
        let org = Organization::new("Acme".into(), None, None);
        let value = serde_json::to_value(&org).unwrap();
        assert!(value.get("createdAt").is_some());
        assert!(value.get("updatedAt").is_some());
        assert!(value["email"].is_null());
        assert_eq!(value["active"], true);
    }

    #[test]
    fn stats_inactive_is_derived() {
        let stats = OrganizationStats::from_counts(5, 3);
        assert_eq!(stats.inactive, 2);
        assert_eq!(stats.active + stats.inactive, stats.total);
    }
}
