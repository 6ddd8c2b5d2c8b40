//! Registry API data models
//!
//! Request types sent to the registry and the loosely-typed records it
//! returns, organized by resource.

mod auth;
mod organization;
mod query;

pub use auth::{CodeRequest, LoginResponse, SignupProfile, VerifyRequest};
pub use organization::{ContactKind, Organization, Participant, ResultBatch};
pub use query::{BirthYearFilter, LegalForm, SearchQuery};
