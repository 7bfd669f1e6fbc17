//! Tests of the verification driver's fault isolation

use std::sync::Arc;

use deploy_scripts::{
    commands::deploy_proxy,
    verify::{verify_implementation, VerificationRequest},
};
use ethers::{providers::Middleware, types::Address};
use eyre::{ensure, Result};

use crate::{
    cli::Cli,
    utils::{deploy_args, deployer_address, verify_args},
};

/// Check that verification failures stay inside the driver: a failing
/// verification must be reported as an outcome, and a deployment whose
/// verification fails must still succeed overall
pub(crate) async fn test_verification_isolation(
    cli: &Cli,
    client: Arc<impl Middleware>,
) -> Result<()> {
    // A driver with no API key fails without escaping its boundary
    let request = VerificationRequest::implementation(Address::zero());
    let outcome = verify_implementation(&verify_args(None), client.clone(), &request).await;
    ensure!(
        !outcome.is_verified(),
        "verification cannot succeed without an API key"
    );

    // A deployment whose verification fails still completes: the devnet has
    // no verification service, so the attempt below is guaranteed to fail
    let owner = deployer_address(&client)?;
    let mut args = deploy_args(cli, owner);
    args.verify = verify_args(Some("invalid-api-key".to_string()));

    let proxy_address = deploy_proxy(args, client, &cli.deployments_path).await?;
    ensure!(
        proxy_address != Address::zero(),
        "deployment failed alongside verification"
    );

    Ok(())
}
