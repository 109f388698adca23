//! Merge request bookkeeping.
//!
//! A merge request only tracks a merge; [`complete_merge_request`] is the
//! one call that runs the merge engine on its behalf.

use super::merge::merge_with_resolutions;
use super::{default_author, instrumented, invalid_input, require_branch};
use rusqlite::Connection;
use stepvc_core::errors::{ExErrorKind, VcsError};
use stepvc_core::events::EventBus;
use stepvc_core::model::{now_millis, MergeRequest, MergeRequestStatus, Resolution};
use stepvc_core_types::{new_id, RecordKind};
use stepvc_store::errors::Result;
use stepvc_store::SqliteRepo;

/// Open a pending merge request between two branches of a project
pub fn create_merge_request(
    conn: &Connection,
    project_id: &str,
    source_branch: &str,
    target_branch: &str,
    title: &str,
    description: Option<&str>,
) -> Result<MergeRequest> {
    instrumented("create_merge_request", || {
        let source = require_branch(conn, source_branch)?;
        let target = require_branch(conn, target_branch)?;
        if source.id == target.id {
            return Err(VcsError::MergeIntoSelf {
                branch: source.name,
            }
            .into());
        }
        if source.project_id != project_id || target.project_id != project_id {
            return Err(invalid_input("Both branches must belong to the project")
                .with_project_id(project_id));
        }

        let now = now_millis();
        let mr = MergeRequest {
            id: new_id(RecordKind::MergeRequest),
            project_id: project_id.to_string(),
            source_branch: source.id,
            target_branch: target.id,
            title: title.to_string(),
            description: description.map(str::to_string),
            author: default_author(conn, project_id)?,
            status: MergeRequestStatus::Pending,
            conflicts: None,
            created_at: now,
            updated_at: now,
        };
        SqliteRepo::insert_merge_request(conn, &mr)?;
        Ok(mr)
    })
}

pub fn get_merge_request(conn: &Connection, id: &str) -> Result<MergeRequest> {
    SqliteRepo::get_merge_request(conn, id)?.ok_or_else(|| {
        VcsError::MergeRequestNotFound {
            merge_request_id: id.to_string(),
        }
        .into()
    })
}

/// Set a request's status; merged and closed requests are final
pub fn update_merge_request_status(
    conn: &Connection,
    id: &str,
    status: MergeRequestStatus,
) -> Result<MergeRequest> {
    instrumented("update_merge_request_status", || {
        let mut mr = get_merge_request(conn, id)?;
        if mr.status.is_terminal() && mr.status != status {
            return Err(invalid_input(format!(
                "Merge request is already {}",
                mr.status.as_str()
            ))
            .with_entity_id(id));
        }
        mr.status = status;
        if status != MergeRequestStatus::Conflicted {
            mr.conflicts = None;
        }
        mr.updated_at = now_millis();
        SqliteRepo::put_merge_request(conn, &mr)?;
        Ok(mr)
    })
}

/// Merge requests of a project, newest first
pub fn list_merge_requests(
    conn: &Connection,
    project_id: &str,
    status: Option<MergeRequestStatus>,
) -> Result<Vec<MergeRequest>> {
    SqliteRepo::list_merge_requests(conn, project_id, status)
}

/// Run the merge a request describes and record its outcome
///
/// A clean merge marks the request `merged`. Unresolved conflicts mark it
/// `conflicted` with the conflict list and are not returned as an error.
pub fn complete_merge_request(
    conn: &mut Connection,
    events: &EventBus,
    id: &str,
    resolutions: &[Resolution],
) -> Result<MergeRequest> {
    instrumented("complete_merge_request", || {
        let mut mr = get_merge_request(conn, id)?;
        if mr.status.is_terminal() {
            return Err(invalid_input(format!(
                "Merge request is already {}",
                mr.status.as_str()
            ))
            .with_entity_id(id));
        }

        match merge_with_resolutions(conn, events, &mr.source_branch, &mr.target_branch, resolutions)
        {
            Ok(_) => {
                mr.status = MergeRequestStatus::Merged;
                mr.conflicts = None;
            }
            Err(e) if e.kind() == ExErrorKind::MergeConflict => {
                mr.status = MergeRequestStatus::Conflicted;
                mr.conflicts = e.conflicts().map(<[_]>::to_vec);
            }
            Err(e) => return Err(e),
        }
        mr.updated_at = now_millis();
        SqliteRepo::put_merge_request(conn, &mr)?;
        Ok(mr)
    })
}
