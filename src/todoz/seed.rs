//! # Remote seed
//!
//! On a first run the list is populated from a public placeholder API. The
//! fetch is a single attempt bounded by a whole-request timeout; whatever goes
//! wrong (connection, status, payload) the caller just gets "no seed".

use crate::config::TodozConfig;
use crate::error::{Result, TodozError};
use crate::model::{Record, RecordList};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_SEED_URL: &str = "https://jsonplaceholder.typicode.com/todos?_limit=10";
pub const DEFAULT_SEED_LIMIT: usize = 10;

#[async_trait]
pub trait SeedSource {
    async fn fetch(&self) -> Result<RecordList>;
}

/// Wire shape of one seed item.
#[derive(Debug, Deserialize)]
struct SeedTodo {
    #[serde(rename = "userId", default)]
    user_id: Option<i64>,
    id: i64,
    title: String,
    completed: bool,
}

impl From<SeedTodo> for Record {
    fn from(todo: SeedTodo) -> Self {
        let record = Record::new(todo.id, todo.title).with_completed(todo.completed);
        match todo.user_id {
            Some(user_id) => record.with_owner_tag(user_id.into()),
            None => record,
        }
    }
}

pub struct HttpSeedSource {
    client: reqwest::Client,
    url: String,
    limit: usize,
}

impl HttpSeedSource {
    pub fn new(url: impl Into<String>, limit: usize, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("todoz/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            url: url.into(),
            limit,
        })
    }

    pub fn from_config(config: &TodozConfig) -> Result<Self> {
        Self::new(
            config.seed_url.clone(),
            config.seed_limit,
            Duration::from_secs(config.fetch_timeout_secs),
        )
    }
}

#[async_trait]
impl SeedSource for HttpSeedSource {
    async fn fetch(&self) -> Result<RecordList> {
        tracing::debug!(url = %self.url, "fetching seed");
        let response = self.client.get(&self.url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TodozError::Seed(format!(
                "seed endpoint returned {}",
                status
            )));
        }

        let todos: Vec<SeedTodo> = response.json().await?;
        Ok(RecordList::from_records(
            todos.into_iter().take(self.limit).map(Record::from),
        ))
    }
}

/// A seed that never touches the network.
pub struct StaticSeedSource {
    result: std::result::Result<RecordList, String>,
}

impl StaticSeedSource {
    pub fn new(list: RecordList) -> Self {
        Self { result: Ok(list) }
    }

    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            result: Err(reason.into()),
        }
    }
}

#[async_trait]
impl SeedSource for StaticSeedSource {
    async fn fetch(&self) -> Result<RecordList> {
        self.result.clone().map_err(TodozError::Seed)
    }
}

/// Runs one fetch and folds any failure into `None`.
pub async fn fetch_or_empty<S: SeedSource + ?Sized>(source: &S) -> Option<RecordList> {
    match source.fetch().await {
        Ok(list) => {
            tracing::info!(len = list.len(), "seed fetched");
            Some(list)
        }
        Err(e) => {
            tracing::warn!(error = %e, "seed fetch failed, starting without seed");
            None
        }
    }
}
