//! Integration tests for the deploy scripts. These assume that a devnet node
//! is already running locally and that the contract artifacts have been built.

use clap::Parser;
use cli::{Cli, Tests};
use deploy_scripts::utils::setup_client;
use eyre::Result;
use tests::{test_deploy_proxy, test_resolution, test_upgrade, test_verification_isolation};

mod abis;
mod cli;
mod constants;
mod utils;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt().pretty().init();

    let client = setup_client(&cli.priv_key, &cli.rpc_url).await?;

    match cli.test {
        Tests::DeployProxy => test_deploy_proxy(&cli, client).await?,
        Tests::Upgrade => test_upgrade(&cli, client).await?,
        Tests::Resolution => test_resolution(&cli, client).await?,
        Tests::VerificationIsolation => test_verification_isolation(&cli, client).await?,
    }

    println!("Test passed");

    Ok(())
}
