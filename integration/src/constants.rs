//! Constants used in the integration tests

/// The default hostport that the devnet node runs on
pub(crate) const DEFAULT_DEVNET_HOSTPORT: &str = "http://localhost:8545";

/// The default private key that the anvil devnet is seeded with
pub(crate) const DEFAULT_DEVNET_PKEY: &str =
    "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

/// The name the Eutopia token reports once its initializer has run
pub(crate) const TOKEN_NAME: &str = "Eutopia";

/// Devnet account used as the swap router initializer argument
pub(crate) const ROUTER_ADDRESS: &str = "0x70997970C51812dc3A010C7d01b50e0d17dc79C8";

/// Devnet account used as the liquidity receiver initializer argument
pub(crate) const LIQUIDITY_RECEIVER_ADDRESS: &str = "0x3C44CdDdB6a900fa2b585dd299e03d12FA4293BC";

/// Devnet account used as the treasury receiver initializer argument
pub(crate) const TREASURY_RECEIVER_ADDRESS: &str = "0x90F79bf6EB2c4f870365E785982E1f101E93b906";

/// Devnet account used as the risk-free-value receiver initializer argument
pub(crate) const RISK_FREE_VALUE_RECEIVER_ADDRESS: &str =
    "0x15d34AAf54267DB7D7c367839AAf71A00a2C6A65";
