//! Display model implementations for table and JSON output
//!
//! Display models transform registry records into CLI-friendly formats
//! with appropriate column names and serialization.

mod organization;
mod saved;

pub use organization::{OrganizationRow, render_card, render_details};
pub use saved::SavedRow;
