//! Tests of proxy deployment and implementation resolution

use std::sync::Arc;

use deploy_scripts::commands::{deploy_proxy, resolve_implementation};
use ethers::providers::Middleware;
use eyre::{ensure, eyre, Result};

use crate::{
    abis::EutopiaContract,
    cli::Cli,
    constants::TOKEN_NAME,
    utils::{deploy_args, deployer_address},
};

/// Deploy a fresh proxy, then check that the resolved implementation has
/// deployed code and that the initializer ran through the proxy
pub(crate) async fn test_deploy_proxy(cli: &Cli, client: Arc<impl Middleware>) -> Result<()> {
    let owner = deployer_address(&client)?;
    let proxy_address =
        deploy_proxy(deploy_args(cli, owner), client.clone(), &cli.deployments_path).await?;

    let implementation_address = resolve_implementation(client.clone(), proxy_address).await?;
    let code = client
        .get_code(implementation_address, None /* block */)
        .await
        .map_err(|e| eyre!(e.to_string()))?;
    ensure!(
        !code.is_empty(),
        "no code at implementation address {implementation_address:#x}"
    );

    // The initializer set the token name through the proxy
    let eutopia = EutopiaContract::new(proxy_address, client);
    let name = eutopia.name().call().await.map_err(|e| eyre!(e.to_string()))?;
    ensure!(
        name == TOKEN_NAME,
        "proxy reports name {name}, expected {TOKEN_NAME}"
    );

    Ok(())
}

/// Resolve the implementation of a confirmed proxy twice and check the reads
/// agree
pub(crate) async fn test_resolution(cli: &Cli, client: Arc<impl Middleware>) -> Result<()> {
    let owner = deployer_address(&client)?;
    let proxy_address =
        deploy_proxy(deploy_args(cli, owner), client.clone(), &cli.deployments_path).await?;

    let first = resolve_implementation(client.clone(), proxy_address).await?;
    let second = resolve_implementation(client, proxy_address).await?;
    ensure!(
        first == second,
        "resolution is not deterministic: {first:#x} != {second:#x}"
    );

    Ok(())
}
