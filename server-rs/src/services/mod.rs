pub mod organization;
pub mod validation;

pub use organization::OrganizationService;
