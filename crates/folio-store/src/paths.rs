//! The fixed path namespace laid over the flat key-value driver.
//!
//! Layout:
//!
//! ```text
//! /head
//! /stage
//! /projects/{project}/meta
//! /projects/{project}/blobs/{id[0:2]}/{id[2:]}
//! /projects/{project}/snapshots/{snapshotId}
//! /projects/{project}/branches/{branchName}
//! ```
//!
//! Head and stage describe the single local checkout and live at the root;
//! everything content-bearing is namespaced per project. Blob paths fan out
//! on the first two hex chars to keep any one prefix small.

use folio_types::ObjectId;

/// Path of the head pointer.
pub const HEAD: &str = "/head";

/// Path of the persisted stage.
pub const STAGE: &str = "/stage";

/// Path of a project's meta record.
pub fn project_meta(project: &str) -> String {
    format!("/projects/{project}/meta")
}

/// Path of a blob within a project.
pub fn blob(project: &str, id: &ObjectId) -> String {
    let hex = id.to_hex();
    format!("/projects/{project}/blobs/{}/{}", &hex[..2], &hex[2..])
}

/// Path of a snapshot within a project.
pub fn snapshot(project: &str, id: &ObjectId) -> String {
    format!("/projects/{project}/snapshots/{id}")
}

/// Path of a branch within a project.
pub fn branch(project: &str, name: &str) -> String {
    format!("/projects/{project}/branches/{name}")
}

/// Prefix under which all of a project's branches live.
pub fn branches_prefix(project: &str) -> String {
    format!("/projects/{project}/branches/")
}
