//! Constants used in the deploy scripts

/// The storage slot containing the implementation contract address in the
/// upgradeable proxy.
///
/// This is specified in EIP1967: https://eips.ethereum.org/EIPS/eip-1967#logic-contract-address
pub const IMPLEMENTATION_STORAGE_SLOT: &str =
    "0x360894a13ba1a3210667c828492db98dca3e2076cc3735a920a3ca505d382bbc";

/// The storage slot containing the proxy admin contract address in the
/// upgradeable proxy.
///
/// This is specified in EIP1967: https://eips.ethereum.org/EIPS/eip-1967#admin-address
pub const PROXY_ADMIN_STORAGE_SLOT: &str =
    "0xb53127684a568b3173ae13b9f8a6016e243e63b6e8ee1178d6a717850b5d6103";

/// The storage slot containing the beacon contract address in a beacon-pattern
/// proxy.
///
/// This is specified in EIP1967: https://eips.ethereum.org/EIPS/eip-1967#beacon-contract-address
pub const BEACON_STORAGE_SLOT: &str =
    "0xa3f0ad74e5423aebfd80d3ef4346578335a9a72aeaee59ff6cb3582b35133d50";

/// The number of bytes stored in a single storage slot
pub const NUM_BYTES_STORAGE_SLOT: usize = 32;

/// The number of bytes in an Ethereum address
pub const NUM_BYTES_ADDRESS: usize = 20;

/// The number of confirmations to wait for the contract deployment transaction
pub const NUM_DEPLOY_CONFIRMATIONS: usize = 0;

/// The name of the initializer method invoked through the proxy in place of a
/// constructor
pub const INITIALIZER_FN_NAME: &str = "initialize";

/// The deployments key in the `deployments.json` file
pub const DEPLOYMENTS_KEY: &str = "deployments";

/// The proxy contract key in the `deployments.json` file
pub const PROXY_CONTRACT_KEY: &str = "eutopia_proxy_contract";

/// The proxy admin contract key in the `deployments.json` file
pub const PROXY_ADMIN_CONTRACT_KEY: &str = "eutopia_proxy_admin_contract";

/// The implementation contract key in the `deployments.json` file
pub const IMPLEMENTATION_CONTRACT_KEY: &str = "eutopia_implementation_contract";

/// The default path of the `deployments.json` file
pub const DEFAULT_DEPLOYMENTS_PATH: &str = "deployments.json";

/// The default path of the compiled Eutopia artifact, as emitted by the
/// contract build step
pub const DEFAULT_IMPLEMENTATION_ARTIFACT: &str = "artifacts/contracts/Eutopia.sol/Eutopia.json";

/// The default path of the compiled TransparentUpgradeableProxy artifact,
/// compiled from https://github.com/OpenZeppelin/openzeppelin-contracts/blob/v5.0.0/contracts/proxy/transparent/TransparentUpgradeableProxy.sol
pub const DEFAULT_PROXY_ARTIFACT: &str =
    "artifacts/@openzeppelin/contracts/proxy/transparent/TransparentUpgradeableProxy.sol/TransparentUpgradeableProxy.json";

/// The default path of the flattened Eutopia source submitted for verification
pub const DEFAULT_FLATTENED_SOURCE: &str = "Eutopia.flattened.sol";

/// The default name of the contract being verified
pub const DEFAULT_VERIFIED_CONTRACT_NAME: &str = "Eutopia";

/// The default solc version the contract is compiled with, in the long form
/// the verification service expects
pub const DEFAULT_COMPILER_VERSION: &str = "v0.8.20+commit.a1b79de6";

/// The default number of optimizer runs the contract is compiled with
pub const DEFAULT_OPTIMIZER_RUNS: u32 = 200;

/// The maximum number of times to poll the verification service for the
/// outcome of a submitted verification job
pub const VERIFICATION_STATUS_POLLS: usize = 10;

/// The number of seconds to wait between verification status polls
pub const VERIFICATION_POLL_INTERVAL_SECS: u64 = 5;
