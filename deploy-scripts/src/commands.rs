//! Implementations of the proxy deployment & upgrade commands

use std::{str::FromStr, sync::Arc, time::Duration};

use ethers::{
    abi::Address,
    contract::ContractFactory,
    providers::Middleware,
    types::{Bytes, H256},
};
use tracing::info;

use crate::{
    cli::{DeployProxyArgs, UpgradeArgs},
    constants::{
        BEACON_STORAGE_SLOT, IMPLEMENTATION_CONTRACT_KEY, IMPLEMENTATION_STORAGE_SLOT,
        NUM_DEPLOY_CONFIRMATIONS, PROXY_ADMIN_CONTRACT_KEY, PROXY_ADMIN_STORAGE_SLOT,
        PROXY_CONTRACT_KEY,
    },
    errors::ScriptError,
    solidity::ProxyAdminContract,
    utils::{
        address_from_storage_word, initialize_calldata, load_artifact, write_deployed_address,
        ContractArtifact,
    },
    verify::{report_outcome, verify_implementation, VerificationRequest},
};

/// Deploy a new implementation + proxy pair.
///
/// The implementation is deployed first with an empty constructor; the proxy
/// is then deployed pointing at it, and the proxy constructor delegates the
/// encoded initializer call in the same transaction, so a partially
/// initialized proxy is never observable.
///
/// Returns the proxy address once the deployment transactions are mined.
pub async fn deploy_proxy(
    args: DeployProxyArgs,
    client: Arc<impl Middleware>,
    deployments_path: &str,
) -> Result<Address, ScriptError> {
    let implementation_artifact = load_artifact(&args.implementation_artifact)?;
    let proxy_artifact = load_artifact(&args.proxy_artifact)?;

    // Deploy the implementation contract. Upgradeable contracts take no
    // constructor arguments, all state is set through the initializer below.
    let implementation_address =
        deploy_from_artifact(&implementation_artifact, client.clone()).await?;
    info!("implementation deployed at {implementation_address:#x}");

    // Parse proxy contract constructor arguments
    let owner_address = Address::from_str(&args.owner)
        .map_err(|e| ScriptError::CalldataConstruction(e.to_string()))?;

    let init_calldata = Bytes::from(initialize_calldata(
        &implementation_artifact.abi,
        &args.initializer_args,
    )?);

    // Deploy the proxy contract
    let proxy_factory = ContractFactory::new(
        proxy_artifact.abi.clone(),
        proxy_artifact.bytecode.clone(),
        client.clone(),
    );
    let proxy_contract = proxy_factory
        .deploy((implementation_address, owner_address, init_calldata))
        .map_err(|e| ScriptError::ContractDeployment(e.to_string()))?
        .confirmations(NUM_DEPLOY_CONFIRMATIONS)
        .send()
        .await
        .map_err(|e| ScriptError::ContractDeployment(e.to_string()))?;

    let proxy_address = proxy_contract.address();

    // Resolve the implementation address back out of the proxy's storage,
    // confirming the proxy is wired up before reporting anything
    let resolved_implementation = resolve_implementation(client.clone(), proxy_address).await?;

    // Get proxy admin contract address
    // This is the recommended way to get the proxy admin address:
    // https://github.com/OpenZeppelin/openzeppelin-contracts/blob/v5.0.0/contracts/proxy/ERC1967/ERC1967Utils.sol#L104-L106
    let proxy_admin_address =
        read_storage_address(client.clone(), proxy_address, PROXY_ADMIN_STORAGE_SLOT).await?;

    write_deployed_address(deployments_path, PROXY_CONTRACT_KEY, proxy_address)?;
    write_deployed_address(
        deployments_path,
        PROXY_ADMIN_CONTRACT_KEY,
        proxy_admin_address,
    )?;
    write_deployed_address(
        deployments_path,
        IMPLEMENTATION_CONTRACT_KEY,
        resolved_implementation,
    )?;

    println!("Proxy contract deployed at {:#x}", proxy_address);
    println!(
        "Implementation contract deployed at {:#x}",
        resolved_implementation
    );

    // Best-effort source verification. The proxy and implementation are
    // already final on-chain, a verification failure never fails the run.
    let outcome = verify_implementation(
        &args.verify,
        client,
        &VerificationRequest::implementation(resolved_implementation),
    )
    .await;
    report_outcome(&outcome);

    Ok(proxy_address)
}

/// Swap the implementation behind an existing proxy.
///
/// Deploys a fresh implementation contract, then calls `upgradeAndCall` on
/// the proxy's admin with empty calldata. The initializer is never re-invoked
/// here: the proxy's state must be preserved across the upgrade.
///
/// Returns the resolved post-upgrade implementation address.
pub async fn upgrade(
    args: UpgradeArgs,
    client: Arc<impl Middleware>,
    deployments_path: &str,
) -> Result<Address, ScriptError> {
    let implementation_artifact = load_artifact(&args.implementation_artifact)?;

    let proxy_address = Address::from_str(&args.proxy)
        .map_err(|e| ScriptError::CalldataConstruction(e.to_string()))?;

    // Deploy the new implementation contract
    let new_implementation =
        deploy_from_artifact(&implementation_artifact, client.clone()).await?;
    info!("new implementation deployed at {new_implementation:#x}");

    // Upgrades go through the proxy admin, whose address lives in the
    // EIP1967 admin slot of the proxy itself
    let proxy_admin_address =
        read_storage_address(client.clone(), proxy_address, PROXY_ADMIN_STORAGE_SLOT).await?;
    if proxy_admin_address == Address::zero() {
        return Err(ScriptError::ContractInteraction(format!(
            "no proxy admin recorded at {proxy_address:#x}, is it a transparent proxy?"
        )));
    }

    let proxy_admin = ProxyAdminContract::new(proxy_admin_address, client.clone());
    proxy_admin
        .upgrade_and_call(proxy_address, new_implementation, Bytes::new())
        .send()
        .await
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?
        .await
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;

    // Some RPC nodes serve storage reads from a lagging replica, give the
    // upgrade a moment to settle before reading the slot back
    if args.settle_delay_secs > 0 {
        tokio::time::sleep(Duration::from_secs(args.settle_delay_secs)).await;
    }

    let resolved_implementation = resolve_implementation(client.clone(), proxy_address).await?;

    write_deployed_address(
        deployments_path,
        IMPLEMENTATION_CONTRACT_KEY,
        resolved_implementation,
    )?;

    println!("Proxy contract upgraded at {:#x}", proxy_address);
    println!(
        "Implementation contract deployed at {:#x}",
        resolved_implementation
    );

    let outcome = verify_implementation(
        &args.verify,
        client,
        &VerificationRequest::implementation(resolved_implementation),
    )
    .await;
    report_outcome(&outcome);

    Ok(resolved_implementation)
}

/// Resolve the implementation address behind a proxy by reading the EIP1967
/// implementation slot directly from the proxy's account storage.
///
/// The slot is read raw rather than through a contract call: calling through
/// the proxy would be forwarded to the implementation instead of revealing
/// its address.
///
/// This is a pure read. It is only meaningful after the deploy or upgrade
/// transaction has been confirmed, and is deterministic for a confirmed
/// proxy, so it is safe to call repeatedly.
pub async fn resolve_implementation(
    client: Arc<impl Middleware>,
    proxy_address: Address,
) -> Result<Address, ScriptError> {
    let implementation_address =
        read_storage_address(client.clone(), proxy_address, IMPLEMENTATION_STORAGE_SLOT).await?;

    if implementation_address == Address::zero() {
        // Distinguish an uninitialized proxy from a beacon-pattern proxy,
        // which keeps its implementation behind a separate beacon contract
        let beacon_address =
            read_storage_address(client.clone(), proxy_address, BEACON_STORAGE_SLOT).await?;
        if beacon_address != Address::zero() {
            return Err(ScriptError::ImplementationResolution(format!(
                "proxy at {proxy_address:#x} delegates through a beacon at {beacon_address:#x}, beacon proxies are unsupported"
            )));
        }

        return Err(ScriptError::ImplementationResolution(format!(
            "implementation slot of {proxy_address:#x} is empty, the proxy is uninitialized"
        )));
    }

    // The slot may hold anything, require deployed code before trusting it
    let code = client
        .get_code(implementation_address, None /* block */)
        .await
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;
    if code.is_empty() {
        return Err(ScriptError::ImplementationResolution(format!(
            "no code at implementation address {implementation_address:#x}"
        )));
    }

    Ok(implementation_address)
}

/// Deploy a contract from its compiled artifact with an empty constructor,
/// returning its address once the deployment transaction is mined
async fn deploy_from_artifact(
    artifact: &ContractArtifact,
    client: Arc<impl Middleware>,
) -> Result<Address, ScriptError> {
    let factory = ContractFactory::new(
        artifact.abi.clone(),
        artifact.bytecode.clone(),
        client,
    );

    let contract = factory
        .deploy(())
        .map_err(|e| ScriptError::ContractDeployment(e.to_string()))?
        .confirmations(NUM_DEPLOY_CONFIRMATIONS)
        .send()
        .await
        .map_err(|e| ScriptError::ContractDeployment(e.to_string()))?;

    Ok(contract.address())
}

/// Read the address stored at a fixed storage slot of the given contract
async fn read_storage_address(
    client: Arc<impl Middleware>,
    contract_address: Address,
    slot: &str,
) -> Result<Address, ScriptError> {
    let word = client
        .get_storage_at(
            contract_address,
            // Can `unwrap` here since we know the storage slot constitutes a valid H256
            H256::from_str(slot).unwrap(),
            None, /* block */
        )
        .await
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;

    Ok(address_from_storage_word(word))
}
