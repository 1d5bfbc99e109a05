//! JSON shapes exchanged with the directory and group APIs.

use serde::{Deserialize, Serialize};
use teamsync_core::ids::{DirectoryId, GroupId};
use teamsync_core::model::{DirectoryPerson, RemoteGroup};

/// Remote ids arrive as numbers or strings.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum WireId {
    Number(u64),
    Text(String),
}

impl WireId {
    fn into_string(self) -> String {
        match self {
            WireId::Number(n) => n.to_string(),
            WireId::Text(s) => s,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct PersonRecord {
    id: WireId,
    username: String,
}

impl From<PersonRecord> for DirectoryPerson {
    fn from(record: PersonRecord) -> Self {
        DirectoryPerson::new(DirectoryId::new(record.id.into_string()), record.username)
    }
}

/// `GET /people` body: either a bare array or wrapped in `people`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum PeopleResponse {
    List(Vec<PersonRecord>),
    Wrapped { people: Vec<PersonRecord> },
}

impl PeopleResponse {
    pub(crate) fn into_records(self) -> Vec<PersonRecord> {
        match self {
            PeopleResponse::List(records) | PeopleResponse::Wrapped { people: records } => records,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct GroupRecord {
    id: WireId,
    handle: String,
    name: String,
    #[serde(default)]
    members: Vec<WireId>,
    #[serde(default)]
    external: bool,
}

impl From<GroupRecord> for RemoteGroup {
    fn from(record: GroupRecord) -> Self {
        let mut group = RemoteGroup::new(
            GroupId::new(record.id.into_string()),
            record.handle,
            record.name,
        )
        .with_members(record.members.into_iter().map(WireId::into_string));
        group.external = record.external;
        group
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct GroupsResponse {
    pub(crate) groups: Vec<GroupRecord>,
}

#[derive(Debug, Serialize)]
pub(crate) struct CreateGroupRequest<'a> {
    pub(crate) handle: &'a str,
    pub(crate) name: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct RenameGroupRequest<'a> {
    pub(crate) name: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct SetMembersRequest<'a> {
    pub(crate) members: Vec<&'a str>,
}
