//! Group-management API over REST.

use std::collections::BTreeSet;

use async_trait::async_trait;
use reqwest::Method;
use teamsync_core::error::{SourceError, SourceResult};
use teamsync_core::ids::{DirectoryId, GroupId};
use teamsync_core::model::RemoteGroup;
use teamsync_core::traits::GroupSource;
use tracing::{debug, info, instrument};

use crate::client::RestClient;
use crate::config::RestConfig;
use crate::wire::{
    CreateGroupRequest, GroupRecord, GroupsResponse, RenameGroupRequest, SetMembersRequest,
};

/// Group API rooted at `{base_url}/groups`.
#[derive(Debug, Clone)]
pub struct RestGroupApi {
    client: RestClient,
}

impl RestGroupApi {
    pub fn new(config: RestConfig) -> SourceResult<Self> {
        Ok(Self {
            client: RestClient::new(config)?,
        })
    }

    fn group_path(id: &GroupId) -> String {
        format!("groups/{}", urlencoding::encode(id.as_str()))
    }
}

fn to_json<T: serde::Serialize>(body: &T) -> SourceResult<serde_json::Value> {
    serde_json::to_value(body)
        .map_err(|e| SourceError::invalid_data(format!("failed to encode request: {e}")))
}

#[async_trait]
impl GroupSource for RestGroupApi {
    #[instrument(skip(self))]
    async fn list_groups(&self) -> SourceResult<Vec<RemoteGroup>> {
        let response: GroupsResponse = self.client.get_json("groups").await?;
        let groups: Vec<RemoteGroup> = response.groups.into_iter().map(Into::into).collect();
        debug!(count = groups.len(), "listed groups");
        Ok(groups)
    }

    #[instrument(skip(self))]
    async fn create_group(&self, handle: &str, display_name: &str) -> SourceResult<RemoteGroup> {
        let body = to_json(&CreateGroupRequest {
            handle,
            name: display_name,
        })?;
        let record: GroupRecord = self.client.send_json(Method::POST, "groups", &body).await?;
        let group = RemoteGroup::from(record);
        info!(id = %group.id, handle = %group.handle, "created group");
        Ok(group)
    }

    #[instrument(skip(self))]
    async fn rename_group(&self, id: &GroupId, display_name: &str) -> SourceResult<()> {
        let body = to_json(&RenameGroupRequest { name: display_name })?;
        self.client
            .send_no_content(Method::PATCH, &Self::group_path(id), &body)
            .await?;
        info!(id = %id, "renamed group");
        Ok(())
    }

    #[instrument(skip(self, member_ids), fields(members = member_ids.len()))]
    async fn set_members(&self, id: &GroupId, member_ids: &BTreeSet<DirectoryId>) -> SourceResult<()> {
        let body = to_json(&SetMembersRequest {
            members: member_ids.iter().map(DirectoryId::as_str).collect(),
        })?;
        let path = format!("{}/members", Self::group_path(id));
        self.client
            .send_no_content(Method::PUT, &path, &body)
            .await?;
        info!(id = %id, "replaced group membership");
        Ok(())
    }
}
