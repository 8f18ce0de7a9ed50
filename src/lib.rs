//! Fetch Open States bulk CSV exports, cache the archives on disk and load
//! single tables (optionally joined against their parent table).

pub mod client;
pub mod config;
pub mod error;
pub mod export;
pub mod extract;
pub mod fetch;
pub mod file_type;
pub mod join;
pub mod table;

pub use client::BulkClient;
pub use config::Config;
pub use error::{Error, Result};
pub use file_type::FileType;
pub use table::{parse_rows, Row, Table};
