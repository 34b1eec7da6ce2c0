use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionsResponse {
    pub connections: Option<Vec<Person>>,
    pub next_page_token: Option<String>,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub resource_name: Option<String>,
    pub names: Option<Vec<Name>>,
    pub email_addresses: Option<Vec<EmailAddress>>,
    pub phone_numbers: Option<Vec<PhoneNumber>>,
    pub biographies: Option<Vec<Biography>>,
    pub memberships: Option<Vec<Membership>>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Name {
    pub display_name: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EmailAddress {
    pub value: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PhoneNumber {
    pub value: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Biography {
    pub value: Option<String>,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct Membership {
    pub metadata: Option<FieldMetadata>,
}

impl Membership {
    /// Source id of the membership, if present and non-empty.
    pub fn source_id(&self) -> Option<&str> {
        self.metadata
            .as_ref()
            .and_then(|m| m.source.as_ref())
            .and_then(|s| s.id.as_deref())
            .filter(|id| !id.is_empty())
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct FieldMetadata {
    pub source: Option<Source>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Source {
    #[serde(rename = "type")]
    pub source_type: Option<String>,
    pub id: Option<String>,
}
