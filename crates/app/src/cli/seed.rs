use clap::Args;

use crate::cli::ProvisioningArgs;

#[derive(Debug, Args)]
pub(crate) struct SeedArgs {
    #[command(flatten)]
    provisioning: ProvisioningArgs,
}

pub(crate) async fn run(args: SeedArgs) -> Result<(), String> {
    let service = args.provisioning.service().await?;

    let report = service
        .seed_development_data()
        .await
        .map_err(|error| format!("failed to seed development data: {error}"))?;

    println!("clients_created: {}", report.clients_created);
    println!("groups_granted: {}", report.groups_granted);
    println!("initial_job_created: {}", report.job_created);

    Ok(())
}
