pub mod aggregate;
pub mod alert;
pub mod configuration;
pub mod report;
pub mod settings;
pub mod suggestion;
pub mod transaction;
