use std::path::PathBuf;

pub const DEFAULT_CREDENTIALS_FILE: &str = "credentials.json";
pub const DEFAULT_TOKEN_FILE: &str = "token.json";
pub const DEFAULT_OUTPUT_DIR: &str = "contacts";
pub const DEFAULT_CALLBACK_PORT: u16 = 52571;
pub const DEFAULT_PAGE_SIZE: u32 = 1000;
pub const CONTACTS_READONLY_SCOPE: &str = "https://www.googleapis.com/auth/contacts.readonly";
pub const PEOPLE_API_BASE_URL: &str = "https://people.googleapis.com";

/// Which contact attributes are requested from the API and written out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldSet {
    /// Name and emails only.
    #[default]
    Basic,
    /// Name, emails, phone numbers and notes.
    Extended,
}

impl FieldSet {
    /// The `personFields` query value for this variant.
    pub fn person_fields(&self) -> &'static str {
        match self {
            FieldSet::Basic => "names,emailAddresses,memberships",
            FieldSet::Extended => "names,emailAddresses,phoneNumbers,biographies,memberships",
        }
    }

    /// CSV header columns for this variant.
    pub fn headers(&self) -> &'static [&'static str] {
        match self {
            FieldSet::Basic => &["Name", "Emails"],
            FieldSet::Extended => &["Name", "Emails", "Phones", "Notes"],
        }
    }
}

/// Settings for the credential store.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub credentials_file: PathBuf,
    pub token_file: PathBuf,
    pub scopes: Vec<String>,
    pub callback_port: u16,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            credentials_file: PathBuf::from(DEFAULT_CREDENTIALS_FILE),
            token_file: PathBuf::from(DEFAULT_TOKEN_FILE),
            scopes: vec![CONTACTS_READONLY_SCOPE.to_string()],
            callback_port: DEFAULT_CALLBACK_PORT,
        }
    }
}

/// Settings for the People API client.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub page_size: u32,
    pub field_set: FieldSet,
    pub all_pages: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: PEOPLE_API_BASE_URL.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            field_set: FieldSet::Basic,
            all_pages: false,
        }
    }
}

// Run configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub auth: AuthConfig,
    pub api: ApiConfig,
    pub output_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            auth: AuthConfig::default(),
            api: ApiConfig::default(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
        }
    }
}
