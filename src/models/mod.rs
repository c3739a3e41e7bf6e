//! Data transfer objects for view responses.
//!
//! These structs are serialized to JSON for whatever presentation layer
//! consumes the viewer.
//! - `repo`: RepoInfo, IndexData
//! - `tree`: TreeData, TreeEntry, BlobData
//! - `commit`: CommitInfo, LogData, CommitData
//! - `diff`: FilePatch, DiffData
//! - `refs`: Reference, RefsData

pub mod commit;
pub mod diff;
pub mod refs;
pub mod repo;
pub mod tree;

pub use commit::*;
pub use diff::*;
pub use refs::*;
pub use repo::*;
pub use tree::*;
