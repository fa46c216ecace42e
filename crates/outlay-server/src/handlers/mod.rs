//! HTTP request handlers organized by domain
//!
//! Each submodule contains handlers for a specific API area.

pub mod anomalies;
pub mod categories;
pub mod expenses;
pub mod export;
pub mod instances;
pub mod profiles;
pub mod reports;

// Re-export all handlers for use in router
pub use anomalies::*;
pub use categories::*;
pub use expenses::*;
pub use export::*;
pub use instances::*;
pub use profiles::*;
pub use reports::*;
