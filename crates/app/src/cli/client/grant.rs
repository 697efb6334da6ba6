use clap::Args;
use jobrpc_app::auth::records::GroupName;

use crate::cli::{ProvisioningArgs, client::parse_api_key};

#[derive(Debug, Args)]
pub(crate) struct GrantArgs {
    #[command(flatten)]
    provisioning: ProvisioningArgs,

    /// API key of the client
    #[arg(long)]
    key: String,

    /// Group to grant, created when it does not exist
    #[arg(long)]
    group: String,
}

pub(crate) async fn run(args: GrantArgs) -> Result<(), String> {
    let service = args.provisioning.service().await?;
    let key = parse_api_key(args.key)?;
    let group =
        GroupName::parse(args.group).map_err(|error| format!("invalid group: {error}"))?;

    let grant = service
        .grant_group(&key, &group)
        .await
        .map_err(|error| format!("failed to grant group: {error}"))?;

    if grant.newly_granted {
        println!("granted {} to {key}", grant.group.name);
    } else {
        println!("{key} is already a member of {}", grant.group.name);
    }

    Ok(())
}
