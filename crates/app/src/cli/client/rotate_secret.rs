use clap::Args;

use crate::cli::{
    ProvisioningArgs,
    client::{create::expires_at, parse_api_key},
};

#[derive(Debug, Args)]
pub(crate) struct RotateSecretArgs {
    #[command(flatten)]
    provisioning: ProvisioningArgs,

    /// API key of the client to rotate
    #[arg(long)]
    key: String,

    /// Optional raw secret; generated when omitted
    #[arg(long)]
    secret: Option<String>,

    /// Optional lifetime of the new secret, in hours
    #[arg(long)]
    expires_in_hours: Option<u16>,
}

pub(crate) async fn run(args: RotateSecretArgs) -> Result<(), String> {
    let service = args.provisioning.service().await?;
    let key = parse_api_key(args.key)?;

    let issued = service
        .rotate_secret(&key, args.secret, expires_at(args.expires_in_hours))
        .await
        .map_err(|error| format!("failed to rotate secret: {error}"))?;

    println!("api_key: {key}");
    println!("secret_uuid: {}", issued.record.uuid);
    if let Some(expires_at) = issued.record.expires_at {
        println!("secret_expires_at: {expires_at}");
    }
    println!("api_secret: {}", issued.plaintext.expose());
    println!("store this secret now; it is only shown once");

    Ok(())
}
