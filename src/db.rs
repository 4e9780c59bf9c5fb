use anyhow::Context;
use mongodb::{
    options::ClientOptions,
    results::{DeleteResult, UpdateResult},
    Client, Cursor, Database,
};
use serde::{de::DeserializeOwned, Serialize};

pub async fn connect(uri: &str, database: &str) -> anyhow::Result<Database> {
    let options = ClientOptions::parse(uri)
        .await
        .context("parse MongoDB connection string")?;
    let client = Client::with_options(options).context("build MongoDB client")?;
    Ok(client.database(database))
}

/// Drains a cursor into a Vec. Every list endpoint goes through here.
pub async fn collect_all<T>(mut cursor: Cursor<T>) -> anyhow::Result<Vec<T>>
where
    T: DeserializeOwned + Send + Sync + Unpin,
{
    let mut items = Vec::new();
    while cursor.advance().await? {
        items.push(cursor.deserialize_current()?);
    }
    Ok(items)
}

/// Wire shape for write acknowledgements, mirroring the store's own counters.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSummary {
    pub matched_count: u64,
    pub modified_count: u64,
}

impl From<UpdateResult> for UpdateSummary {
    fn from(result: UpdateResult) -> Self {
        Self {
            matched_count: result.matched_count,
            modified_count: result.modified_count,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteSummary {
    pub deleted_count: u64,
}

impl From<DeleteResult> for DeleteSummary {
    fn from(result: DeleteResult) -> Self {
        Self {
            deleted_count: result.deleted_count,
        }
    }
}
