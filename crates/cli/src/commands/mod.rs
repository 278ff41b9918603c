pub mod feedback;
pub mod generate;
pub mod ingest;
pub mod list;
pub mod show;
pub mod status;
