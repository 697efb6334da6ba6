use clap::{Args, Subcommand};
use jobrpc_app::auth::records::ApiKey;

mod create;
mod grant;
mod rotate_secret;

#[derive(Debug, Args)]
pub(crate) struct ClientCommand {
    #[command(subcommand)]
    command: ClientSubcommand,
}

#[derive(Debug, Subcommand)]
enum ClientSubcommand {
    Create(create::CreateClientArgs),
    RotateSecret(rotate_secret::RotateSecretArgs),
    Grant(grant::GrantArgs),
}

pub(crate) async fn run(command: ClientCommand) -> Result<(), String> {
    match command.command {
        ClientSubcommand::Create(args) => create::run(args).await,
        ClientSubcommand::RotateSecret(args) => rotate_secret::run(args).await,
        ClientSubcommand::Grant(args) => grant::run(args).await,
    }
}

pub(crate) fn parse_api_key(raw: String) -> Result<ApiKey, String> {
    ApiKey::parse(raw).map_err(|error| format!("invalid key: {error}"))
}
