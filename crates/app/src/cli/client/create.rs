use clap::Args;
use jiff::{SignedDuration, Timestamp};
use jobrpc_app::provisioning::NewClient;

use crate::cli::{ProvisioningArgs, client::parse_api_key};

#[derive(Debug, Args)]
pub(crate) struct CreateClientArgs {
    #[command(flatten)]
    provisioning: ProvisioningArgs,

    /// Public API key the client sends in `x-api-key`
    #[arg(long)]
    key: String,

    /// Client display name
    #[arg(long)]
    name: String,

    /// Optional raw secret; generated when omitted
    #[arg(long)]
    secret: Option<String>,

    /// Optional lifetime of the first secret, in hours
    #[arg(long)]
    expires_in_hours: Option<u16>,
}

pub(crate) async fn run(args: CreateClientArgs) -> Result<(), String> {
    let service = args.provisioning.service().await?;

    let created = service
        .create_client(NewClient {
            api_key: parse_api_key(args.key)?,
            name: args.name,
            secret: args.secret,
            expires_at: expires_at(args.expires_in_hours),
        })
        .await
        .map_err(|error| format!("failed to create client: {error}"))?;

    println!("client_uuid: {}", created.client.uuid);
    println!("api_key: {}", created.client.api_key);
    println!("client_name: {}", created.client.name);
    if let Some(expires_at) = created.secret.record.expires_at {
        println!("secret_expires_at: {expires_at}");
    }
    println!("api_secret: {}", created.secret.plaintext.expose());
    println!("store this secret now; it is only shown once");

    Ok(())
}

pub(crate) fn expires_at(hours: Option<u16>) -> Option<Timestamp> {
    hours.map(|hours| Timestamp::now() + SignedDuration::from_hours(i64::from(hours)))
}
