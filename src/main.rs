use mailchimp_client::configuration::get_configuration;
use mailchimp_client::payload::Params;
use mailchimp_client::telemetry::get_subscriber;
use mailchimp_client::telemetry::init_subscriber;

/// Initialise telemetry, load config, and print the lists visible to the
/// configured api key (as json, on stdout). Logs go to stderr, so the output
/// can be piped.
#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let subscriber = get_subscriber("mailchimp-client", "info", std::io::stderr);
    init_subscriber(subscriber)?;

    let cfg = get_configuration()?;
    let client = cfg.mailchimp.client()?;

    match client.get_lists(&Params::new()).await {
        Ok(lists) => {
            println!("{}", serde_json::to_string_pretty(&lists)?);
            Ok(())
        }
        Err(e) => {
            tracing::error!(
                error.cause_chain=?e,
                error.message=%e,
                error.status=?e.status(),
                "failed to get lists"
            );
            Err(e.into())
        }
    }
}
