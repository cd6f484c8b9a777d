pub mod preferences_service;
pub mod report_service;
pub mod snapshot_service;
