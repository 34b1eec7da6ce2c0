use tracing::{debug, warn};

use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::people_api::auth::Credential;
use crate::types::{ConnectionsResponse, Person};

/// Thin client over the People API `people/me/connections` listing.
pub struct ContactsClient {
    client: reqwest::Client,
    config: ApiConfig,
}

impl ContactsClient {
    pub fn new(client: reqwest::Client, config: ApiConfig) -> Self {
        Self { client, config }
    }

    fn connections_url(&self) -> String {
        format!(
            "{}/v1/people/me/connections",
            self.config.base_url.trim_end_matches('/')
        )
    }

    // Fetch one page of connections
    async fn fetch_page(
        &self,
        credential: &Credential,
        page_token: Option<&str>,
    ) -> Result<ConnectionsResponse, ApiError> {
        let page_size = self.config.page_size.to_string();
        let mut query = vec![
            ("pageSize", page_size.as_str()),
            ("personFields", self.config.field_set.person_fields()),
        ];
        if let Some(token) = page_token {
            query.push(("pageToken", token));
        }

        let response = self
            .client
            .get(self.connections_url())
            .bearer_auth(&credential.access_token)
            .query(&query)
            .send()
            .await
            .map_err(ApiError::Transport)?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ApiError::Status { status, body });
        }

        response.json().await.map_err(ApiError::Decode)
    }

    /// Fetches a single page of the user's contacts. Contacts beyond the
    /// configured page size are not downloaded.
    pub async fn fetch_contacts(&self, credential: &Credential) -> Result<Vec<Person>, ApiError> {
        let page = self.fetch_page(credential, None).await?;
        let people = page.connections.unwrap_or_default();
        debug!(count = people.len(), "Fetched contacts page");

        if page.next_page_token.is_some() {
            warn!(
                fetched = people.len(),
                "More contacts are available than one page holds; only the first page was downloaded (use --all-pages)"
            );
        }
        Ok(people)
    }

    /// Follows `nextPageToken` until the listing is exhausted.
    pub async fn fetch_all_contacts(&self, credential: &Credential) -> Result<Vec<Person>, ApiError> {
        let mut people = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let page = self.fetch_page(credential, page_token.as_deref()).await?;
            people.extend(page.connections.unwrap_or_default());
            debug!(total = people.len(), "Fetched contacts page");

            match page.next_page_token {
                Some(token) if !token.is_empty() => {
                    if page_token.as_deref() == Some(token.as_str()) {
                        warn!(page_token = %token, "Server repeated the previous page token; stopping");
                        break;
                    }
                    page_token = Some(token);
                }
                _ => break,
            }
        }

        Ok(people)
    }

    /// Fetches contacts according to the configured pagination mode.
    pub async fn fetch(&self, credential: &Credential) -> Result<Vec<Person>, ApiError> {
        if self.config.all_pages {
            self.fetch_all_contacts(credential).await
        } else {
            self.fetch_contacts(credential).await
        }
    }
}
