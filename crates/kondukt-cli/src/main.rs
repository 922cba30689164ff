#![forbid(unsafe_code)]

//! Kondukt CLI
//!
//! Command-line interface for Kondukt: package-coordinate resolution and
//! local file transfers.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use kondukt_core::{FileIfExists, JavaVersion, MavenCoordinate, ScalaVersion, SparkVersion};
use kondukt_core::RemotePath;
use kondukt_db::{Clickhouse, Greenplum, Hive, MongoDb, Mssql, MySql, Oracle, Postgres};
use kondukt_fs::LocalFs;
use kondukt_kafka::Kafka;
use kondukt_transfer::{Downloader, FileWriteOptions, Uploader};

/// Kondukt Command-Line Interface
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the Maven coordinates required by a connector
    Packages {
        /// Connector name: postgres, mysql, mssql, oracle, clickhouse,
        /// greenplum, hive, mongodb, kafka
        connector: String,

        /// Target Java version (mssql, oracle)
        #[arg(long)]
        java_version: Option<JavaVersion>,

        /// Target Scala binary version (kafka, greenplum, mongodb)
        #[arg(long)]
        scala_version: Option<ScalaVersion>,

        /// Target Spark version (kafka, greenplum)
        #[arg(long)]
        spark_version: Option<SparkVersion>,
    },

    /// Download a directory tree through a local file connection
    Download {
        /// Root of the source file connection
        #[arg(long)]
        source_dir: PathBuf,

        /// Local directory to download into
        #[arg(long)]
        target_dir: PathBuf,

        /// Conflict handling for existing target files
        #[arg(long, default_value = "error")]
        if_exists: FileIfExists,

        /// Download through this temp directory with an atomic rename
        #[arg(long)]
        temp_dir: Option<PathBuf>,

        /// Remove source files after successful download
        #[arg(long)]
        delete_source: bool,
    },

    /// Upload a directory tree through a local file connection
    Upload {
        /// Local directory to upload from
        #[arg(long)]
        source_dir: PathBuf,

        /// Root of the target file connection
        #[arg(long)]
        target_dir: PathBuf,

        /// Conflict handling for existing target files
        #[arg(long, default_value = "error")]
        if_exists: FileIfExists,

        /// Remove local files after successful upload
        #[arg(long)]
        delete_source: bool,
    },
}

fn resolve_packages(
    connector: &str,
    java_version: Option<JavaVersion>,
    scala_version: Option<ScalaVersion>,
    spark_version: Option<SparkVersion>,
) -> Result<Vec<MavenCoordinate>> {
    let packages = match connector.to_ascii_lowercase().as_str() {
        "postgres" => Postgres::get_packages()?,
        "mysql" => MySql::get_packages()?,
        "mssql" => Mssql::get_packages(java_version)?,
        "oracle" => Oracle::get_packages(java_version)?,
        "clickhouse" => Clickhouse::get_packages()?,
        "greenplum" => Greenplum::get_packages(spark_version, scala_version)?,
        "hive" => Hive::get_packages()?,
        "mongodb" => MongoDb::get_packages(scala_version)?,
        "kafka" => Kafka::get_packages(spark_version, scala_version)?,
        other => bail!(
            "unknown connector '{other}', expected one of: postgres, mysql, mssql, \
             oracle, clickhouse, greenplum, hive, mongodb, kafka"
        ),
    };
    Ok(packages)
}

async fn run_download(
    source_dir: PathBuf,
    target_dir: PathBuf,
    if_exists: FileIfExists,
    temp_dir: Option<PathBuf>,
    delete_source: bool,
) -> Result<()> {
    let connection = Arc::new(LocalFs::new(source_dir));
    let options = FileWriteOptions::new()
        .with_if_exists(if_exists)
        .with_delete_source(delete_source);

    let mut downloader = Downloader::new(connection, RemotePath::root(), target_dir)
        .with_options(options);
    if let Some(temp_dir) = temp_dir {
        downloader = downloader.with_temp_dir(temp_dir);
    }

    let result = downloader.run().await?;
    print!("{result}");
    if !result.is_success() {
        bail!("download finished with failures");
    }
    Ok(())
}

async fn run_upload(
    source_dir: PathBuf,
    target_dir: PathBuf,
    if_exists: FileIfExists,
    delete_source: bool,
) -> Result<()> {
    let connection = Arc::new(LocalFs::new(target_dir));
    let options = FileWriteOptions::new()
        .with_if_exists(if_exists)
        .with_delete_source(delete_source);

    let uploader = Uploader::new(connection, source_dir, RemotePath::root())
        .with_options(options);

    let result = uploader.run().await?;
    print!("{result}");
    if !result.is_success() {
        bail!("upload finished with failures");
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .init();
    } else {
        tracing_subscriber::fmt::init();
    }

    match cli.command {
        Command::Packages {
            connector,
            java_version,
            scala_version,
            spark_version,
        } => {
            let packages =
                resolve_packages(&connector, java_version, scala_version, spark_version)?;
            if packages.is_empty() {
                println!("no packages required");
            }
            for package in packages {
                println!("{package}");
            }
        }
        Command::Download {
            source_dir,
            target_dir,
            if_exists,
            temp_dir,
            delete_source,
        } => {
            run_download(source_dir, target_dir, if_exists, temp_dir, delete_source).await?;
        }
        Command::Upload {
            source_dir,
            target_dir,
            if_exists,
            delete_source,
        } => {
            run_upload(source_dir, target_dir, if_exists, delete_source).await?;
        }
    }

    Ok(())
}
