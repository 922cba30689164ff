//! Remote path model shared by file connections and transfer engines.

mod remote;
mod stat;

pub use remote::RemotePath;
pub use stat::{PathStat, RemoteDirectory, RemoteFile, format_size, path_repr};
