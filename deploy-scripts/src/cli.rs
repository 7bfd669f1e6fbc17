//! Definitions of CLI arguments and commands for deploy scripts

use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use ethers::providers::Middleware;

use crate::{
    commands::{deploy_proxy, upgrade},
    constants::{
        DEFAULT_DEPLOYMENTS_PATH, DEFAULT_IMPLEMENTATION_ARTIFACT, DEFAULT_PROXY_ARTIFACT,
    },
    errors::ScriptError,
    verify::VerifyArgs,
};

/// Manage the Eutopia token deployment: deploy the upgradeable proxy, upgrade
/// the implementation behind it, and verify the implementation source.
#[derive(Parser)]
pub struct Cli {
    /// Private key of the deployer
    // TODO: Better key management
    #[arg(short, long, env = "PRIVATE_KEY")]
    pub priv_key: String,

    /// Network RPC URL
    #[arg(short, long, env = "RPC_URL")]
    pub rpc_url: String,

    /// Path to the file at which deployed contract addresses are recorded
    #[arg(long, default_value = DEFAULT_DEPLOYMENTS_PATH)]
    pub deployments_path: String,

    /// The command to run
    #[command(subcommand)]
    pub command: Command,
}

/// The subcommands of the deploy scripts
#[derive(Subcommand)]
pub enum Command {
    /// Deploy a new implementation + proxy pair
    DeployProxy(DeployProxyArgs),
    /// Swap the implementation behind an existing proxy
    Upgrade(UpgradeArgs),
}

impl Command {
    /// Run the command against the given RPC client
    pub async fn run(
        self,
        client: Arc<impl Middleware>,
        deployments_path: &str,
    ) -> Result<(), ScriptError> {
        match self {
            Command::DeployProxy(args) => {
                deploy_proxy(args, client, deployments_path).await.map(|_| ())
            }
            Command::Upgrade(args) => upgrade(args, client, deployments_path).await.map(|_| ()),
        }
    }
}

/// Deploy the Eutopia upgradeable proxy contract.
///
/// Concretely, this is a [`TransparentUpgradeableProxy`](https://docs.openzeppelin.com/contracts/5.x/api/proxy#transparent_proxy),
/// which itself deploys a `ProxyAdmin` contract.
///
/// The implementation contract is deployed first, then the proxy is deployed
/// pointing at it, invoking the implementation's initializer in the same
/// transaction. Re-running this command deploys a fresh, unrelated proxy each
/// time; it is the caller's responsibility not to retry blindly.
#[derive(Args)]
pub struct DeployProxyArgs {
    /// Address of the owner for the proxy admin contract
    #[arg(short, long, env = "ETHEREUM_INITIAL_OWNER")]
    pub owner: String,

    /// Ordered values passed to the implementation's initializer, typed
    /// against the initializer's ABI signature.
    ///
    /// For Eutopia this is the initial owner, the swap router, and the
    /// liquidity / treasury / risk-free-value receivers, but any argument
    /// list matching the ABI is accepted.
    #[arg(short, long = "initializer-arg")]
    pub initializer_args: Vec<String>,

    /// Path to the compiled implementation contract artifact
    #[arg(long, default_value = DEFAULT_IMPLEMENTATION_ARTIFACT)]
    pub implementation_artifact: String,

    /// Path to the compiled proxy contract artifact
    #[arg(long, default_value = DEFAULT_PROXY_ARTIFACT)]
    pub proxy_artifact: String,

    /// Verification service arguments
    #[command(flatten)]
    pub verify: VerifyArgs,
}

/// Upgrade the Eutopia implementation behind an existing proxy.
///
/// Deploys a fresh implementation contract, then repoints the proxy's
/// implementation slot at it through the proxy admin. The initializer is
/// never re-invoked: contract state must survive the upgrade.
///
/// Concurrent upgrades against the same proxy are serialized only by the
/// chain's own transaction ordering; the scripts add no locking of their own.
#[derive(Args)]
pub struct UpgradeArgs {
    /// Address of the proxy contract
    #[arg(long)]
    pub proxy: String,

    /// Path to the compiled implementation contract artifact
    #[arg(long, default_value = DEFAULT_IMPLEMENTATION_ARTIFACT)]
    pub implementation_artifact: String,

    /// Seconds to wait between upgrade confirmation and reading the
    /// implementation slot, for RPC nodes that lag behind the chain head
    #[arg(long, default_value_t = 0)]
    pub settle_delay_secs: u64,

    /// Verification service arguments
    #[command(flatten)]
    pub verify: VerifyArgs,
}
