//! Domain aggregates mirrored from the QC backend and the local draft store.

pub mod auth;
pub mod company;
pub mod dashboard;
pub mod draft;
pub mod location;
pub mod machine;
pub mod preferences;
pub mod product;
pub mod qc_entry;
pub mod qc_record;
pub mod qc_template;
pub mod system_log;
pub mod task;
pub mod types;
pub mod user;
