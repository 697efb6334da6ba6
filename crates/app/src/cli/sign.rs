use clap::Args;
use jiff::Timestamp;
use jobrpc_app::auth::{
    RpcMethod,
    headers::{SIGNATURE_HEADER, TIMESTAMP_HEADER},
    signature::sign,
};

#[derive(Debug, Args)]
pub(crate) struct SignArgs {
    /// Full method path, e.g. `/jobs.v1.Jobs/GetJob`
    #[arg(long)]
    method: String,

    /// Raw client secret
    #[arg(long, env = "API_SECRET", hide_env_values = true)]
    secret: String,

    /// Unix timestamp in seconds; defaults to now
    #[arg(long)]
    timestamp: Option<i64>,
}

pub(crate) fn run(args: &SignArgs) -> Result<(), String> {
    let method = RpcMethod::parse(&args.method).map_err(|error| error.to_string())?;
    let timestamp = args
        .timestamp
        .unwrap_or_else(|| Timestamp::now().as_second())
        .to_string();

    let signature = sign(&args.secret, method.path(), &timestamp)
        .map_err(|error| format!("failed to sign: {error}"))?;

    println!("{TIMESTAMP_HEADER}: {timestamp}");
    println!("{SIGNATURE_HEADER}: {signature}");

    Ok(())
}
