//! Best-effort source verification of deployed implementation contracts.
//!
//! Verification runs after the deployment or upgrade is already final
//! on-chain, so nothing here is allowed to fail the run: every error is
//! caught at this boundary and reported as a [`VerificationOutcome::Failed`].

use std::{fs, sync::Arc, time::Duration};

use clap::Args;
use ethers::{
    abi::Address,
    etherscan::{verify::VerifyContract, Client},
    providers::Middleware,
    types::Chain,
};
use tracing::{info, warn};

use crate::constants::{
    DEFAULT_COMPILER_VERSION, DEFAULT_FLATTENED_SOURCE, DEFAULT_OPTIMIZER_RUNS,
    DEFAULT_VERIFIED_CONTRACT_NAME, VERIFICATION_POLL_INTERVAL_SECS, VERIFICATION_STATUS_POLLS,
};

/// Arguments for the verification service
#[derive(Args, Clone)]
pub struct VerifyArgs {
    /// Etherscan API key. Verification is skipped (and reported as failed)
    /// when unset.
    #[arg(long, env = "ETHERSCAN_API_KEY")]
    pub etherscan_api_key: Option<String>,

    /// Path to the flattened contract source submitted for verification
    #[arg(long, default_value = DEFAULT_FLATTENED_SOURCE)]
    pub source_path: String,

    /// Name of the contract being verified
    #[arg(long, default_value = DEFAULT_VERIFIED_CONTRACT_NAME)]
    pub contract_name: String,

    /// The long-form solc version the contract was compiled with
    #[arg(long, default_value = DEFAULT_COMPILER_VERSION)]
    pub compiler_version: String,

    /// The number of optimizer runs the contract was compiled with
    #[arg(long, default_value_t = DEFAULT_OPTIMIZER_RUNS)]
    pub optimizer_runs: u32,
}

/// A request to verify a deployed contract: its address and the exact
/// constructor argument encoding used at deployment
pub struct VerificationRequest {
    /// The address of the deployed contract
    pub address: Address,
    /// The ABI-encoded constructor arguments, as a hex string without the
    /// leading `0x`. `None` when the contract takes no constructor arguments.
    pub constructor_arguments: Option<String>,
}

impl VerificationRequest {
    /// A request for an implementation contract deployed behind a proxy.
    ///
    /// Upgradeable implementations take no constructor arguments, all
    /// initialization happens through the proxy's delegated initializer.
    pub fn implementation(address: Address) -> Self {
        Self {
            address,
            constructor_arguments: None,
        }
    }
}

/// The terminal state of a verification attempt. Never fatal to the run.
#[derive(Debug)]
pub enum VerificationOutcome {
    /// The verification service accepted and verified the contract source
    Verified,
    /// The verification attempt failed; the deployment itself is unaffected
    Failed {
        /// The captured failure reason
        reason: String,
    },
}

impl VerificationOutcome {
    /// Whether the contract was verified
    pub fn is_verified(&self) -> bool {
        matches!(self, VerificationOutcome::Verified)
    }
}

/// Submit the implementation contract for source verification and await the
/// service's verdict.
///
/// Every failure mode (missing API key, unreachable service, rate limits,
/// already-verified contracts, bytecode mismatches) is captured in the
/// returned outcome; this function never errors past its own boundary.
pub async fn verify_implementation(
    args: &VerifyArgs,
    client: Arc<impl Middleware>,
    request: &VerificationRequest,
) -> VerificationOutcome {
    match try_verify(args, client, request).await {
        Ok(()) => VerificationOutcome::Verified,
        Err(reason) => VerificationOutcome::Failed { reason },
    }
}

/// Print the verification outcome.
///
/// A failure is logged rather than returned so that it cannot affect the
/// run's exit status.
pub fn report_outcome(outcome: &VerificationOutcome) {
    match outcome {
        VerificationOutcome::Verified => println!("Implementation contract verified"),
        VerificationOutcome::Failed { reason } => {
            warn!("implementation verification failed: {reason}");
        }
    }
}

/// The fallible verification flow, with every error stringified at this
/// boundary
async fn try_verify(
    args: &VerifyArgs,
    client: Arc<impl Middleware>,
    request: &VerificationRequest,
) -> Result<(), String> {
    let api_key = args
        .etherscan_api_key
        .as_deref()
        .ok_or("no Etherscan API key configured")?;

    let chain_id = client
        .get_chainid()
        .await
        .map_err(|e| e.to_string())?
        .as_u64();
    let chain = Chain::try_from(chain_id).map_err(|e| e.to_string())?;
    let etherscan = Client::new(chain, api_key).map_err(|e| e.to_string())?;

    let source = fs::read_to_string(&args.source_path)
        .map_err(|e| format!("reading {}: {}", args.source_path, e))?;

    let contract = VerifyContract::new(
        request.address,
        args.contract_name.clone(),
        source,
        args.compiler_version.clone(),
    )
    .constructor_arguments(request.constructor_arguments.clone())
    .optimization(true)
    .runs(args.optimizer_runs);

    let submission = etherscan
        .submit_contract_verification(&contract)
        .await
        .map_err(|e| e.to_string())?;
    if submission.status != "1" {
        return Err(format!("verification rejected: {}", submission.result));
    }

    // The service verifies asynchronously; poll the returned job until it
    // reaches a terminal state
    let guid = submission.result;
    info!("verification submitted, guid {guid}");
    for _ in 0..VERIFICATION_STATUS_POLLS {
        tokio::time::sleep(Duration::from_secs(VERIFICATION_POLL_INTERVAL_SECS)).await;

        let status = etherscan
            .check_contract_verification_status(&guid)
            .await
            .map_err(|e| e.to_string())?;
        if status.result.starts_with("Pending") {
            continue;
        }

        return if status.status == "1" {
            Ok(())
        } else {
            Err(format!("verification failed: {}", status.result))
        };
    }

    Err(format!(
        "verification job {guid} still pending after {VERIFICATION_STATUS_POLLS} status checks"
    ))
}
