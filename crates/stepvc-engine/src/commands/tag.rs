//! Tags: immutable named pointers to commits.

use super::{default_author, emit, instrumented, invalid_input, require_commit};
use rusqlite::Connection;
use stepvc_core::errors::VcsError;
use stepvc_core::events::{EventBus, EventKind};
use stepvc_core::model::{now_millis, Tag, TagType};
use stepvc_core_types::{new_id, RecordKind};
use stepvc_store::errors::Result;
use stepvc_store::SqliteRepo;

/// Tag a commit; a non-blank message makes the tag annotated
pub fn create_tag(
    conn: &Connection,
    events: &EventBus,
    project_id: &str,
    name: &str,
    commit_id: &str,
    message: Option<&str>,
    author: Option<&str>,
) -> Result<Tag> {
    instrumented("create_tag", || {
        let name = name.trim();
        if name.is_empty() {
            return Err(invalid_input("Tag name cannot be empty").with_project_id(project_id));
        }
        let commit = require_commit(conn, commit_id)?;
        if commit.project_id != project_id {
            return Err(VcsError::CommitNotFound {
                commit_id: commit_id.to_string(),
            }
            .into());
        }

        let tag_type = TagType::for_message(message);
        let author = match author {
            Some(a) => a.to_string(),
            None => default_author(conn, project_id)?,
        };
        let tag = Tag {
            id: new_id(RecordKind::Tag),
            name: name.to_string(),
            project_id: project_id.to_string(),
            commit_id: commit.id,
            tag_type,
            message: match tag_type {
                TagType::Annotated => message.map(str::to_string),
                TagType::Lightweight => None,
            },
            author,
            created_at: now_millis(),
        };
        SqliteRepo::insert_tag(conn, &tag).map_err(|e| e.with_entity_id(name))?;

        emit(events, EventKind::TagCreated, project_id, &tag);
        Ok(tag)
    })
}

/// Tags of a project, newest first
pub fn get_tags(conn: &Connection, project_id: &str) -> Result<Vec<Tag>> {
    SqliteRepo::list_tags(conn, project_id)
}

pub fn get_tag(conn: &Connection, project_id: &str, name: &str) -> Result<Tag> {
    SqliteRepo::get_tag_by_name(conn, project_id, name)?.ok_or_else(|| {
        VcsError::TagNotFound {
            tag: name.to_string(),
        }
        .into()
    })
}

/// Delete a tag by name
pub fn delete_tag(conn: &Connection, project_id: &str, name: &str) -> Result<()> {
    instrumented("delete_tag", || {
        let tag = get_tag(conn, project_id, name)?;
        SqliteRepo::delete_tag(conn, &tag.id)?;
        Ok(())
    })
}
