#![doc = include_str!("../README.md")]
#![forbid(unsafe_code)]
#![warn(missing_docs)]

// Crate namespaces
pub use kondukt_db as db;
pub use kondukt_fs as fs;
pub use kondukt_hwm as hwm;
pub use kondukt_kafka as kafka;
pub use kondukt_transfer as transfer;

// Core types at the root
pub use kondukt_core::{
    CollectionIfExists, Error, FileIfExists, JavaVersion, MavenCoordinate, PathStat,
    RemoteDirectory, RemoteFile, RemotePath, Result, ScalaVersion, SecretString, SparkVersion,
    TableIfExists, TopicIfExists,
};

// The connectors and engines most callers reach for
pub use kondukt_db::{
    Clickhouse, DbReader, DbWriter, Greenplum, Hive, MongoDb, Mssql, MySql, Oracle, Postgres,
    TableName,
};
pub use kondukt_fs::{FileConnection, LocalFs};
pub use kondukt_hwm::{HwmStore, MemoryHwmStore, ReadStrategy, RedbHwmStore};
pub use kondukt_kafka::Kafka;
pub use kondukt_transfer::{Downloader, TransferResult, Uploader};
