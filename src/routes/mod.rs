pub mod reports;
pub mod status;
