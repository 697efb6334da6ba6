use clap::{Args, Parser, Subcommand};
use jobrpc_app::{
    auth::secrets::{MIN_HASH_ITERATIONS, SecretHasher},
    database,
    provisioning::ProvisioningService,
};

mod client;
mod db;
mod seed;
mod sign;

#[derive(Debug, Parser)]
#[command(name = "jobrpc-app", about = "Jobs RPC operator CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Db(db::DbCommand),
    Client(client::ClientCommand),
    Seed(seed::SeedArgs),
    Sign(sign::SignArgs),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        match self.command {
            Commands::Db(command) => db::run(command).await,
            Commands::Client(command) => client::run(command).await,
            Commands::Seed(args) => seed::run(args).await,
            Commands::Sign(args) => sign::run(&args),
        }
    }
}

/// Connection and hashing options shared by every command that writes credentials.
#[derive(Debug, Args)]
pub(crate) struct ProvisioningArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// PBKDF2 work factor for newly stored secrets
    #[arg(long, env = "SECRET_HASH_ITERATIONS", default_value_t = MIN_HASH_ITERATIONS)]
    secret_hash_iterations: u32,
}

impl ProvisioningArgs {
    pub(crate) async fn service(&self) -> Result<ProvisioningService, String> {
        let hasher = SecretHasher::new(self.secret_hash_iterations)
            .map_err(|error| format!("invalid secret-hash-iterations: {error}"))?;

        let pool = database::connect(&self.database_url)
            .await
            .map_err(|error| format!("failed to connect to database: {error}"))?;

        Ok(ProvisioningService::new(pool, hasher))
    }
}
