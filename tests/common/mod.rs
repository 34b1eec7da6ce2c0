#![allow(dead_code)]

use chrono::{Duration, Utc};
use contacts_export::people_api::Credential;
use contacts_export::types::Person;

pub fn test_credential() -> Credential {
    Credential {
        access_token: "test_token".to_string(),
        refresh_token: Some("test_refresh".to_string()),
        token_uri: "https://oauth2.googleapis.com/token".to_string(),
        client_id: "client".to_string(),
        client_secret: "secret".to_string(),
        scopes: vec!["https://www.googleapis.com/auth/contacts.readonly".to_string()],
        expiry: Some(Utc::now() + Duration::hours(1)),
    }
}

pub fn people_from_json(json: serde_json::Value) -> Vec<Person> {
    serde_json::from_value(json).unwrap()
}
