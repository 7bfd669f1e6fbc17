//! Definition of the CLI arguments for integration tests

use clap::{Parser, ValueEnum};
use deploy_scripts::constants::{
    DEFAULT_DEPLOYMENTS_PATH, DEFAULT_IMPLEMENTATION_ARTIFACT, DEFAULT_PROXY_ARTIFACT,
};

use crate::constants::{DEFAULT_DEVNET_HOSTPORT, DEFAULT_DEVNET_PKEY};

/// CLI tool for running integration tests against a running devnet node.
///
/// Assumes that the compiled contract artifacts are available at the
/// configured paths.
#[derive(Parser)]
pub(crate) struct Cli {
    /// Test to run
    #[arg(short, long)]
    pub(crate) test: Tests,

    /// Path to the compiled implementation contract artifact
    #[arg(long, default_value = DEFAULT_IMPLEMENTATION_ARTIFACT)]
    pub(crate) implementation_artifact: String,

    /// Path to the compiled proxy contract artifact
    #[arg(long, default_value = DEFAULT_PROXY_ARTIFACT)]
    pub(crate) proxy_artifact: String,

    /// Path to the file at which deployed contract addresses are recorded
    #[arg(short, long, default_value = DEFAULT_DEPLOYMENTS_PATH)]
    pub(crate) deployments_path: String,

    /// Devnet private key, defaults to the first default anvil key
    #[arg(short, long, default_value = DEFAULT_DEVNET_PKEY)]
    pub(crate) priv_key: String,

    /// Devnet RPC URL
    #[arg(short, long, default_value = DEFAULT_DEVNET_HOSTPORT)]
    pub(crate) rpc_url: String,
}

/// The available integration tests
#[derive(ValueEnum, Clone, Copy)]
pub(crate) enum Tests {
    /// Deploy a fresh proxy and check it is fully wired up
    DeployProxy,
    /// Upgrade a deployed proxy and check state survives
    Upgrade,
    /// Check implementation resolution is deterministic
    Resolution,
    /// Check a verification failure cannot fail a run
    VerificationIsolation,
}
