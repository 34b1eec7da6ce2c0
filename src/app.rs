use std::path::PathBuf;

use tracing::info;

use crate::config::Config;
use crate::error::Result;
use crate::export::export;
use crate::grouping::group_by_label;
use crate::people_api::{try_authenticate, ContactsClient, Credential};

/// What a run produced.
#[derive(Debug)]
pub struct RunSummary {
    pub contacts: usize,
    pub rows: usize,
    pub files: Vec<PathBuf>,
}

// Fetch, group and write contacts with an already obtained credential
pub async fn export_contacts(
    config: &Config,
    client: reqwest::Client,
    credential: &Credential,
) -> Result<RunSummary> {
    let contacts_client = ContactsClient::new(client, config.api.clone());
    let people = contacts_client.fetch(credential).await?;

    let groups = group_by_label(&people, config.api.field_set);
    info!(
        contacts = people.len(),
        labels = groups.len(),
        rows = groups.row_count(),
        "Grouped contacts by label"
    );

    let files = export(&groups, &config.output_dir)?;
    Ok(RunSummary {
        contacts: people.len(),
        rows: groups.row_count(),
        files,
    })
}

// Authenticate, then run the export pipeline once
pub async fn run(config: &Config) -> Result<RunSummary> {
    let client = reqwest::Client::new();

    let credential = try_authenticate(&config.auth, client.clone()).await?;
    let summary = export_contacts(config, client, &credential).await?;

    info!(
        files = summary.files.len(),
        dir = %config.output_dir.display(),
        "Export finished"
    );
    Ok(summary)
}
