//! Build-tool package coordinates and runtime version types.
//!
//! Connectors expose `get_packages(...)` returning the Maven coordinates
//! required to use them with a given runtime. The version types here
//! carry the parameters those methods accept (`java_version`,
//! `scala_version`, `spark_version`) together with their defaults.

mod coordinate;
mod proptests;
mod versions;

pub use coordinate::MavenCoordinate;
pub use versions::{JavaVersion, ScalaVersion, SparkVersion};
