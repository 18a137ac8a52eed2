//! Historical market data ingestion: canonical bar models, provider
//! implementations, retrying fetch helpers and output sinks.

pub mod io;
pub mod models;
pub mod providers;
pub mod requests;
