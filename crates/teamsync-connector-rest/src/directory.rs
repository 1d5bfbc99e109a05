//! Person directory over REST.

use async_trait::async_trait;
use teamsync_core::error::SourceResult;
use teamsync_core::model::DirectoryPerson;
use teamsync_core::traits::DirectorySource;
use tracing::{info, instrument};

use crate::client::RestClient;
use crate::config::RestConfig;
use crate::wire::PeopleResponse;

/// Loads every person from `GET {base_url}/people`.
#[derive(Debug, Clone)]
pub struct RestDirectory {
    client: RestClient,
}

impl RestDirectory {
    pub fn new(config: RestConfig) -> SourceResult<Self> {
        Ok(Self {
            client: RestClient::new(config)?,
        })
    }
}

#[async_trait]
impl DirectorySource for RestDirectory {
    #[instrument(skip(self), fields(base_url = %self.client.config().base_url))]
    async fn load_all_persons(&self) -> SourceResult<Vec<DirectoryPerson>> {
        let response: PeopleResponse = self.client.get_json("people").await?;
        let persons: Vec<DirectoryPerson> = response
            .into_records()
            .into_iter()
            .map(DirectoryPerson::from)
            .collect();

        info!(count = persons.len(), "loaded person directory");
        Ok(persons)
    }
}
