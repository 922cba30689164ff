#![doc = include_str!("../README.md")]
#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! Kondukt DB Library
//!
//! Database connector descriptors and read/write planners.

pub mod connection;
pub mod dialect;
pub mod options;
pub mod reader;
pub mod table;
pub mod writer;

// Re-exports for convenience
pub use connection::SqlConnection;
pub use connection::clickhouse::Clickhouse;
pub use connection::greenplum::Greenplum;
pub use connection::hive::Hive;
pub use connection::mongodb::{CollectionWriteAction, CollectionWriteOptions, MongoDb};
pub use connection::mssql::Mssql;
pub use connection::mysql::MySql;
pub use connection::oracle::{Oracle, OracleInstance};
pub use connection::postgres::Postgres;
pub use dialect::Dialect;
pub use options::{ReadOptions, TableWriteOptions};
pub use reader::{DbReader, ReadPlan};
pub use table::TableName;
pub use writer::{DbWriter, TableState, WriteAction, WritePlan};
