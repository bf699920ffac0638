//! DTO modules that bridge services with templates.

pub mod master_data;
pub mod operator;
pub mod qc;
pub mod settings;
