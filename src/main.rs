use clap::Parser;
use contacts_export::app::run;
use contacts_export::cli::{handle_token_clear, Cli};
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .compact()
        .init();

    if cli.clear_token {
        handle_token_clear(&cli)?;
        return Ok(());
    }

    let config = cli.to_config();
    match run(&config).await {
        Ok(summary) => {
            info!(
                contacts = summary.contacts,
                rows = summary.rows,
                files = summary.files.len(),
                "Done"
            );
            Ok(())
        }
        Err(e) => {
            // Files written before the failure are left in place.
            error!("{}", e);
            std::process::exit(1);
        }
    }
}
