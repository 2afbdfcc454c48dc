pub mod clean;
pub mod config;
pub mod ingest;
pub mod publish;
pub mod transform;
pub mod validate;
