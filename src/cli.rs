use std::path::PathBuf;

use clap::Parser;

use crate::config::{
    ApiConfig, AuthConfig, Config, FieldSet, DEFAULT_CALLBACK_PORT, DEFAULT_CREDENTIALS_FILE,
    DEFAULT_OUTPUT_DIR, DEFAULT_TOKEN_FILE,
};
use crate::people_api::auth::{FileTokenStore, TokenStore};

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct Cli {
    /// OAuth client secret downloaded from the Google Cloud console.
    #[clap(long, default_value = DEFAULT_CREDENTIALS_FILE)]
    pub credentials: PathBuf,

    /// Where the OAuth token is cached between runs.
    #[clap(long, default_value = DEFAULT_TOKEN_FILE)]
    pub token: PathBuf,

    /// Directory that receives one CSV file per label.
    #[clap(long, default_value = DEFAULT_OUTPUT_DIR)]
    pub output_dir: PathBuf,

    /// Local port for the OAuth redirect listener.
    #[clap(long, default_value_t = DEFAULT_CALLBACK_PORT)]
    pub port: u16,

    /// Also export phone numbers and notes.
    #[clap(long)]
    pub extended: bool,

    /// Follow pagination instead of stopping after the first page.
    #[clap(long)]
    pub all_pages: bool,

    /// Delete the cached token and exit.
    #[clap(long)]
    pub clear_token: bool,

    /// Enable debug logging.
    #[clap(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn to_config(&self) -> Config {
        Config {
            auth: AuthConfig {
                credentials_file: self.credentials.clone(),
                token_file: self.token.clone(),
                callback_port: self.port,
                ..AuthConfig::default()
            },
            api: ApiConfig {
                field_set: if self.extended {
                    FieldSet::Extended
                } else {
                    FieldSet::Basic
                },
                all_pages: self.all_pages,
                ..ApiConfig::default()
            },
            output_dir: self.output_dir.clone(),
        }
    }
}

pub fn handle_token_clear(cli: &Cli) -> std::io::Result<()> {
    FileTokenStore::new(&cli.token).remove()?;
    println!("Removed cached token {}. Exiting.", cli.token.display());
    Ok(())
}
