//! Utilities for the integration tests

use std::sync::Arc;

use deploy_scripts::{
    cli::{DeployProxyArgs, UpgradeArgs},
    constants::{
        DEFAULT_COMPILER_VERSION, DEFAULT_FLATTENED_SOURCE, DEFAULT_OPTIMIZER_RUNS,
        DEFAULT_VERIFIED_CONTRACT_NAME,
    },
    verify::VerifyArgs,
};
use ethers::{providers::Middleware, types::Address};
use eyre::{eyre, Result};

use crate::{
    cli::Cli,
    constants::{
        LIQUIDITY_RECEIVER_ADDRESS, RISK_FREE_VALUE_RECEIVER_ADDRESS, ROUTER_ADDRESS,
        TREASURY_RECEIVER_ADDRESS,
    },
};

/// The address the client signs transactions with
pub(crate) fn deployer_address(client: &Arc<impl Middleware>) -> Result<Address> {
    client
        .default_sender()
        .ok_or_else(|| eyre!("client does not have a sender attached"))
}

/// Build the deploy command arguments used by the tests, with the full
/// five-address Eutopia initializer argument list
pub(crate) fn deploy_args(cli: &Cli, owner: Address) -> DeployProxyArgs {
    DeployProxyArgs {
        owner: format!("{owner:#x}"),
        initializer_args: vec![
            format!("{owner:#x}"),
            ROUTER_ADDRESS.to_string(),
            LIQUIDITY_RECEIVER_ADDRESS.to_string(),
            TREASURY_RECEIVER_ADDRESS.to_string(),
            RISK_FREE_VALUE_RECEIVER_ADDRESS.to_string(),
        ],
        implementation_artifact: cli.implementation_artifact.clone(),
        proxy_artifact: cli.proxy_artifact.clone(),
        verify: verify_args(None),
    }
}

/// Build the upgrade command arguments used by the tests
pub(crate) fn upgrade_args(cli: &Cli, proxy_address: Address) -> UpgradeArgs {
    UpgradeArgs {
        proxy: format!("{proxy_address:#x}"),
        implementation_artifact: cli.implementation_artifact.clone(),
        settle_delay_secs: 0,
        verify: verify_args(None),
    }
}

/// Build verification driver arguments with the given API key
pub(crate) fn verify_args(etherscan_api_key: Option<String>) -> VerifyArgs {
    VerifyArgs {
        etherscan_api_key,
        source_path: DEFAULT_FLATTENED_SOURCE.to_string(),
        contract_name: DEFAULT_VERIFIED_CONTRACT_NAME.to_string(),
        compiler_version: DEFAULT_COMPILER_VERSION.to_string(),
        optimizer_runs: DEFAULT_OPTIMIZER_RUNS,
    }
}
