//! `VersionEngine`: the consumer-facing handle.
//!
//! Owns one SQLite connection and the event bus. Construction applies
//! migrations; a store that cannot be opened or migrated fails with
//! `StoreUnavailable` and no engine is returned.

use crate::commands::{branch, cleanup, commit, merge, merge_request, project, restore, stash, tag};
use crate::{CleanupReport, CommitOptions, MergeOutcome, RestorePreview};
use rusqlite::Connection;
use std::path::Path;
use stepvc_core::errors::{ExError, ExErrorKind};
use stepvc_core::events::{EventBus, ListenerId, VersionEvent};
use stepvc_core::merge::BranchComparison;
use stepvc_core::model::{
    Branch, Change, Commit, MergeRequest, MergeRequestStatus, ProjectConfig,
    ProjectConfigOverrides, ProjectData, Resolution, Snapshot, StashEntry, Tag,
};
use stepvc_store::errors::Result;
use stepvc_store::{db, migrations};

/// Versioning engine over one store
pub struct VersionEngine {
    conn: Connection,
    events: EventBus,
}

impl VersionEngine {
    /// Open (or create) an on-disk store
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_connection(db::open(path)?)
    }

    /// Open a fresh in-memory store
    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(db::open_in_memory()?)
    }

    /// Wrap an existing connection, configuring and migrating it
    pub fn from_connection(mut conn: Connection) -> Result<Self> {
        db::configure(&conn).map_err(unavailable)?;
        migrations::apply_migrations(&mut conn).map_err(unavailable)?;
        Ok(Self {
            conn,
            events: EventBus::new(),
        })
    }

    /// Underlying connection, for read-only inspection
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    // ===== Events =====

    pub fn add_event_listener<F>(&mut self, listener: F) -> ListenerId
    where
        F: Fn(&VersionEvent) + Send + Sync + 'static,
    {
        self.events.add_listener(Box::new(listener))
    }

    pub fn remove_event_listener(&mut self, id: ListenerId) -> bool {
        self.events.remove_listener(id)
    }

    // ===== Project =====

    pub fn init_project(
        &mut self,
        project_id: &str,
        overrides: &ProjectConfigOverrides,
    ) -> Result<ProjectConfig> {
        project::init_project(&mut self.conn, &self.events, project_id, overrides)
    }

    pub fn get_config(&self, project_id: &str) -> Result<ProjectConfig> {
        project::get_config(&self.conn, project_id)
    }

    pub fn update_config(
        &self,
        project_id: &str,
        overrides: &ProjectConfigOverrides,
    ) -> Result<ProjectConfig> {
        project::update_config(&self.conn, project_id, overrides)
    }

    // ===== Commits =====

    pub fn commit(
        &mut self,
        project_id: &str,
        branch_id: &str,
        message: &str,
        data: &ProjectData,
        options: CommitOptions,
    ) -> Result<Commit> {
        commit::commit(
            &mut self.conn,
            &self.events,
            project_id,
            branch_id,
            message,
            data,
            options,
        )
    }

    pub fn rollback(&self, commit_id: &str) -> Result<ProjectData> {
        commit::rollback(&self.conn, commit_id)
    }

    pub fn get_commit(&self, commit_id: &str) -> Result<Commit> {
        commit::get_commit(&self.conn, commit_id)
    }

    pub fn get_snapshot(&self, snapshot_id: &str) -> Result<Snapshot> {
        commit::get_snapshot(&self.conn, snapshot_id)
    }

    pub fn get_commits(&self, project_id: &str, branch_id: Option<&str>) -> Result<Vec<Commit>> {
        commit::get_commits(&self.conn, project_id, branch_id)
    }

    pub fn get_history(
        &self,
        project_id: &str,
        branch_id: &str,
        limit: Option<usize>,
    ) -> Result<Vec<Commit>> {
        commit::get_history(&self.conn, project_id, branch_id, limit)
    }

    pub fn diff_commits(&self, from: &str, to: &str) -> Result<Vec<Change>> {
        commit::diff_commits(&self.conn, from, to)
    }

    // ===== Branches =====

    pub fn create_branch(
        &mut self,
        project_id: &str,
        name: &str,
        from_commit: Option<&str>,
    ) -> Result<Branch> {
        branch::create_branch(&mut self.conn, &self.events, project_id, name, from_commit)
    }

    pub fn switch_branch(&mut self, project_id: &str, branch_id: &str) -> Result<Branch> {
        branch::switch_branch(&mut self.conn, &self.events, project_id, branch_id)
    }

    pub fn delete_branch(&self, project_id: &str, branch_id: &str) -> Result<()> {
        branch::delete_branch(&self.conn, project_id, branch_id)
    }

    pub fn get_branches(&self, project_id: &str) -> Result<Vec<Branch>> {
        branch::get_branches(&self.conn, project_id)
    }

    pub fn get_branch(&self, project_id: &str, branch_id: &str) -> Result<Branch> {
        branch::get_branch(&self.conn, project_id, branch_id)
    }

    pub fn get_branch_by_name(&self, project_id: &str, name: &str) -> Result<Branch> {
        branch::get_branch_by_name(&self.conn, project_id, name)
    }

    pub fn get_active_branch(&self, project_id: &str) -> Result<Option<Branch>> {
        branch::get_active_branch(&self.conn, project_id)
    }

    // ===== Tags =====

    pub fn create_tag(
        &self,
        project_id: &str,
        name: &str,
        commit_id: &str,
        message: Option<&str>,
    ) -> Result<Tag> {
        tag::create_tag(
            &self.conn,
            &self.events,
            project_id,
            name,
            commit_id,
            message,
            None,
        )
    }

    pub fn get_tags(&self, project_id: &str) -> Result<Vec<Tag>> {
        tag::get_tags(&self.conn, project_id)
    }

    pub fn get_tag(&self, project_id: &str, name: &str) -> Result<Tag> {
        tag::get_tag(&self.conn, project_id, name)
    }

    pub fn delete_tag(&self, project_id: &str, name: &str) -> Result<()> {
        tag::delete_tag(&self.conn, project_id, name)
    }

    // ===== Comparison & merge =====

    pub fn compare_branches(&self, source_id: &str, target_id: &str) -> Result<BranchComparison> {
        merge::compare_branches(&self.conn, source_id, target_id)
    }

    pub fn merge_branches(&mut self, source_id: &str, target_id: &str) -> Result<MergeOutcome> {
        merge::merge_branches(&mut self.conn, &self.events, source_id, target_id)
    }

    pub fn merge_with_resolutions(
        &mut self,
        source_id: &str,
        target_id: &str,
        resolutions: &[Resolution],
    ) -> Result<MergeOutcome> {
        merge::merge_with_resolutions(
            &mut self.conn,
            &self.events,
            source_id,
            target_id,
            resolutions,
        )
    }

    // ===== Merge requests =====

    pub fn create_merge_request(
        &self,
        project_id: &str,
        source_branch: &str,
        target_branch: &str,
        title: &str,
        description: Option<&str>,
    ) -> Result<MergeRequest> {
        merge_request::create_merge_request(
            &self.conn,
            project_id,
            source_branch,
            target_branch,
            title,
            description,
        )
    }

    pub fn update_merge_request_status(
        &self,
        id: &str,
        status: MergeRequestStatus,
    ) -> Result<MergeRequest> {
        merge_request::update_merge_request_status(&self.conn, id, status)
    }

    pub fn list_merge_requests(
        &self,
        project_id: &str,
        status: Option<MergeRequestStatus>,
    ) -> Result<Vec<MergeRequest>> {
        merge_request::list_merge_requests(&self.conn, project_id, status)
    }

    pub fn get_merge_request(&self, id: &str) -> Result<MergeRequest> {
        merge_request::get_merge_request(&self.conn, id)
    }

    pub fn complete_merge_request(
        &mut self,
        id: &str,
        resolutions: &[Resolution],
    ) -> Result<MergeRequest> {
        merge_request::complete_merge_request(&mut self.conn, &self.events, id, resolutions)
    }

    // ===== Restore =====

    pub fn preview_restore_from_commit(
        &self,
        project_id: &str,
        branch_id: &str,
        path: &str,
        commit_id: &str,
    ) -> Result<RestorePreview> {
        restore::preview_restore_from_commit(&self.conn, project_id, branch_id, path, commit_id)
    }

    pub fn restore_path_from_commit(
        &mut self,
        project_id: &str,
        branch_id: &str,
        path: &str,
        commit_id: &str,
    ) -> Result<Commit> {
        restore::restore_path_from_commit(
            &mut self.conn,
            &self.events,
            project_id,
            branch_id,
            path,
            commit_id,
        )
    }

    // ===== Retention =====

    pub fn cleanup(&mut self, project_id: &str) -> Result<CleanupReport> {
        cleanup::cleanup(&mut self.conn, project_id)
    }

    // ===== Stash =====

    pub fn stash_changes(
        &self,
        project_id: &str,
        branch_id: &str,
        working: &ProjectData,
        message: &str,
    ) -> Result<StashEntry> {
        stash::stash_changes(&self.conn, project_id, branch_id, working, message)
    }

    pub fn list_stashes(&self, project_id: &str) -> Result<Vec<StashEntry>> {
        stash::list_stashes(&self.conn, project_id)
    }

    pub fn pop_stash(&self, stash_id: &str) -> Result<ProjectData> {
        stash::pop_stash(&self.conn, stash_id)
    }

    pub fn drop_stash(&self, stash_id: &str) -> Result<()> {
        stash::drop_stash(&self.conn, stash_id)
    }
}

fn unavailable(err: ExError) -> ExError {
    if err.kind() == ExErrorKind::StoreUnavailable {
        return err;
    }
    ExError::new(ExErrorKind::StoreUnavailable)
        .with_op("open_store")
        .with_message(format!("Store initialisation failed: {}", err.message()))
        .with_source(err)
}

impl std::fmt::Debug for VersionEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VersionEngine")
            .field("events", &self.events)
            .finish_non_exhaustive()
    }
}
