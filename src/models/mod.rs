//! Display models for CLI output

pub mod display;

pub use display::{OrganizationRow, SavedRow, render_card, render_details};
