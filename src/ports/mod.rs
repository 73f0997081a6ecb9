//! Port traits for external collaborators.

pub mod config_port;
pub mod transaction_port;
pub mod report_port;
