//! Utilities for the deploy scripts.

use std::{fs, fs::File, io::Read, path::PathBuf, str::FromStr, sync::Arc};

use ethers::{
    abi::{
        token::{LenientTokenizer, Tokenizer},
        Abi, Address, Token,
    },
    middleware::SignerMiddleware,
    providers::{Http, Middleware, Provider},
    signers::{LocalWallet, Signer},
    types::{Bytes, H256},
    utils::hex::FromHex,
};
use json::JsonValue;

use crate::{
    constants::{DEPLOYMENTS_KEY, INITIALIZER_FN_NAME, NUM_BYTES_ADDRESS, NUM_BYTES_STORAGE_SLOT},
    errors::ScriptError,
};

/// A deployable contract artifact as emitted by the contract build step:
/// the contract's ABI and its creation bytecode.
pub struct ContractArtifact {
    /// The name of the contract, if the artifact records one
    pub name: Option<String>,
    /// The contract ABI
    pub abi: Abi,
    /// The creation bytecode of the contract
    pub bytecode: Bytes,
}

/// Sets up the RPC client with which to deploy & upgrade contracts, reading
/// in the private key and RPC url supplied by the caller.
pub async fn setup_client(
    priv_key: &str,
    rpc_url: &str,
) -> Result<Arc<impl Middleware>, ScriptError> {
    let provider = Provider::<Http>::try_from(rpc_url)
        .map_err(|e| ScriptError::ClientInitialization(e.to_string()))?;

    let wallet = LocalWallet::from_str(priv_key)
        .map_err(|e| ScriptError::ClientInitialization(e.to_string()))?;
    let chain_id = provider
        .get_chainid()
        .await
        .map_err(|e| ScriptError::ClientInitialization(e.to_string()))?
        .as_u64();
    let client = Arc::new(SignerMiddleware::new(
        provider,
        wallet.clone().with_chain_id(chain_id),
    ));

    Ok(client)
}

/// Parse a JSON file from disk
pub fn get_json_from_file(file_path: &str) -> Result<JsonValue, ScriptError> {
    let mut file_contents = String::new();
    File::open(file_path)
        .map_err(|e| ScriptError::ReadFile(e.to_string()))?
        .read_to_string(&mut file_contents)
        .map_err(|e| ScriptError::ReadFile(e.to_string()))?;

    json::parse(&file_contents).map_err(|e| ScriptError::ReadFile(e.to_string()))
}

/// Parse a deployed contract address from the deployments file
pub fn parse_addr_from_deployments_file(
    file_path: &str,
    contract_key: &str,
) -> Result<Address, ScriptError> {
    let parsed_json = get_json_from_file(file_path)?;

    Address::from_str(
        parsed_json[DEPLOYMENTS_KEY][contract_key]
            .as_str()
            .ok_or_else(|| {
                ScriptError::ReadFile(
                    "Could not parse contract address from deployments file".to_string(),
                )
            })?,
    )
    .map_err(|e| ScriptError::ReadFile(e.to_string()))
}

/// Write a deployed contract address to the deployments file
pub fn write_deployed_address(
    file_path: &str,
    contract_key: &str,
    address: Address,
) -> Result<(), ScriptError> {
    // If the file doesn't exist, create it
    if !PathBuf::from(file_path).exists() {
        fs::write(file_path, "{}").map_err(|e| ScriptError::WriteFile(e.to_string()))?;
    }
    let mut parsed_json = get_json_from_file(file_path)?;

    parsed_json[DEPLOYMENTS_KEY][contract_key] = JsonValue::String(format!("{address:#x}"));

    fs::write(file_path, json::stringify_pretty(parsed_json, 4))
        .map_err(|e| ScriptError::WriteFile(e.to_string()))?;

    Ok(())
}

/// Load a contract artifact from the compiler's build output.
///
/// Accepts both the Hardhat artifact shape (`"bytecode": "0x..."`) and the
/// Foundry shape (`"bytecode": { "object": "0x..." }`).
pub fn load_artifact(file_path: &str) -> Result<ContractArtifact, ScriptError> {
    let file_contents =
        fs::read_to_string(file_path).map_err(|e| ScriptError::ReadFile(e.to_string()))?;
    parse_artifact(&file_contents)
}

/// Parse a contract artifact from its JSON representation
pub fn parse_artifact(artifact_json: &str) -> Result<ContractArtifact, ScriptError> {
    let artifact: serde_json::Value = serde_json::from_str(artifact_json)
        .map_err(|e| ScriptError::ArtifactParsing(e.to_string()))?;

    let abi: Abi = serde_json::from_value(
        artifact
            .get("abi")
            .cloned()
            .ok_or_else(|| ScriptError::ArtifactParsing("artifact has no `abi` field".to_string()))?,
    )
    .map_err(|e| ScriptError::ArtifactParsing(e.to_string()))?;

    let bytecode_hex = artifact
        .get("bytecode")
        .and_then(|b| b.as_str().or_else(|| b.get("object").and_then(|o| o.as_str())))
        .ok_or_else(|| {
            ScriptError::ArtifactParsing("artifact has no `bytecode` field".to_string())
        })?;

    let bytecode = Bytes::from_hex(bytecode_hex)
        .map_err(|e| ScriptError::ArtifactParsing(e.to_string()))?;
    if bytecode.is_empty() {
        return Err(ScriptError::ArtifactParsing(
            "artifact has empty bytecode, the contract is abstract or an interface".to_string(),
        ));
    }

    let name = artifact
        .get("contractName")
        .and_then(|n| n.as_str())
        .map(String::from);

    Ok(ContractArtifact {
        name,
        abi,
        bytecode,
    })
}

/// Prepare calldata for the implementation contract's initializer method.
///
/// The argument list is configuration-driven and arbitrary-length: each value
/// is tokenized against the parameter type the initializer declares in the
/// artifact ABI.
pub fn initialize_calldata(abi: &Abi, values: &[String]) -> Result<Vec<u8>, ScriptError> {
    let initializer = abi
        .function(INITIALIZER_FN_NAME)
        .map_err(|e| ScriptError::CalldataConstruction(e.to_string()))?;

    if initializer.inputs.len() != values.len() {
        return Err(ScriptError::CalldataConstruction(format!(
            "initializer takes {} arguments, {} provided",
            initializer.inputs.len(),
            values.len(),
        )));
    }

    let tokens = initializer
        .inputs
        .iter()
        .zip(values.iter())
        .map(|(param, value)| {
            LenientTokenizer::tokenize(&param.kind, value)
                .map_err(|e| ScriptError::CalldataConstruction(e.to_string()))
        })
        .collect::<Result<Vec<Token>, ScriptError>>()?;

    initializer
        .encode_input(&tokens)
        .map_err(|e| ScriptError::CalldataConstruction(e.to_string()))
}

/// Extract the address stored in the low-order 20 bytes of a storage word
pub fn address_from_storage_word(word: H256) -> Address {
    Address::from_slice(&word.as_bytes()[NUM_BYTES_STORAGE_SLOT - NUM_BYTES_ADDRESS..])
}

#[cfg(test)]
mod tests {
    //! Tests for the pure deploy-script helpers

    use std::env;

    use super::*;

    /// An ABI declaring a single-argument initializer
    const SINGLE_ARG_INITIALIZER_ABI: &str = r#"[
        {
            "type": "function",
            "name": "initialize",
            "inputs": [{ "name": "initialOwner", "type": "address" }],
            "outputs": [],
            "stateMutability": "nonpayable"
        }
    ]"#;

    /// An ABI declaring the full five-address Eutopia initializer
    const FIVE_ARG_INITIALIZER_ABI: &str = r#"[
        {
            "type": "function",
            "name": "initialize",
            "inputs": [
                { "name": "initialOwner", "type": "address" },
                { "name": "router", "type": "address" },
                { "name": "liquidityReceiver", "type": "address" },
                { "name": "treasuryReceiver", "type": "address" },
                { "name": "riskFreeValueReceiver", "type": "address" }
            ],
            "outputs": [],
            "stateMutability": "nonpayable"
        }
    ]"#;

    /// The selector of `initialize(address)`
    const SINGLE_ARG_INITIALIZER_SELECTOR: [u8; 4] = [0xc4, 0xd6, 0x6d, 0xe8];

    /// A well-formed address used across the tests
    const TEST_ADDRESS: &str = "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266";

    /// Parse one of the inline test ABIs
    fn parse_abi(abi_json: &str) -> Abi {
        serde_json::from_str(abi_json).unwrap()
    }

    /// Encoding a single-address initializer yields the known selector and a
    /// right-aligned address word
    #[test]
    fn test_initialize_calldata_selector_and_encoding() {
        let abi = parse_abi(SINGLE_ARG_INITIALIZER_ABI);
        let calldata = initialize_calldata(&abi, &[TEST_ADDRESS.to_string()]).unwrap();

        assert_eq!(&calldata[..4], &SINGLE_ARG_INITIALIZER_SELECTOR);
        assert_eq!(calldata.len(), 4 + NUM_BYTES_STORAGE_SLOT);

        // The address is right-aligned in its 32-byte argument word
        let expected = Address::from_str(TEST_ADDRESS).unwrap();
        assert_eq!(
            &calldata[4 + NUM_BYTES_STORAGE_SLOT - NUM_BYTES_ADDRESS..],
            expected.as_bytes(),
        );
    }

    /// The encoder follows the ABI arity rather than assuming five arguments
    #[test]
    fn test_initialize_calldata_arbitrary_arity() {
        let abi = parse_abi(FIVE_ARG_INITIALIZER_ABI);
        let values: Vec<String> = (1..=5u8)
            .map(|i| format!("0x{}", hex::encode([i; NUM_BYTES_ADDRESS])))
            .collect();

        let calldata = initialize_calldata(&abi, &values).unwrap();
        assert_eq!(calldata.len(), 4 + 5 * NUM_BYTES_STORAGE_SLOT);

        // Each argument word right-aligns the corresponding address
        for (i, value) in values.iter().enumerate() {
            let expected = Address::from_str(value).unwrap();
            let word_start = 4 + i * NUM_BYTES_STORAGE_SLOT;
            assert_eq!(
                &calldata
                    [word_start + NUM_BYTES_STORAGE_SLOT - NUM_BYTES_ADDRESS..word_start + NUM_BYTES_STORAGE_SLOT],
                expected.as_bytes(),
            );
        }
    }

    /// A value list that does not match the initializer arity is rejected
    #[test]
    fn test_initialize_calldata_wrong_arity() {
        let abi = parse_abi(SINGLE_ARG_INITIALIZER_ABI);
        let values = vec![TEST_ADDRESS.to_string(), TEST_ADDRESS.to_string()];

        assert!(matches!(
            initialize_calldata(&abi, &values),
            Err(ScriptError::CalldataConstruction(_)),
        ));
    }

    /// Encoding the same argument list twice produces identical calldata
    #[test]
    fn test_initialize_calldata_deterministic() {
        let abi = parse_abi(SINGLE_ARG_INITIALIZER_ABI);
        let values = vec![TEST_ADDRESS.to_string()];

        let first = initialize_calldata(&abi, &values).unwrap();
        let second = initialize_calldata(&abi, &values).unwrap();
        assert_eq!(first, second);
    }

    /// Hardhat-shaped artifacts parse into ABI + bytecode
    #[test]
    fn test_parse_artifact_hardhat_shape() {
        let artifact_json = format!(
            r#"{{ "contractName": "Eutopia", "abi": {SINGLE_ARG_INITIALIZER_ABI}, "bytecode": "0x6080604052" }}"#
        );

        let artifact = parse_artifact(&artifact_json).unwrap();
        assert_eq!(artifact.name.as_deref(), Some("Eutopia"));
        assert_eq!(artifact.bytecode.to_vec(), vec![0x60, 0x80, 0x60, 0x40, 0x52]);
        assert!(artifact.abi.function(INITIALIZER_FN_NAME).is_ok());
    }

    /// Foundry-shaped artifacts nest the bytecode under `object`
    #[test]
    fn test_parse_artifact_foundry_shape() {
        let artifact_json = format!(
            r#"{{ "abi": {SINGLE_ARG_INITIALIZER_ABI}, "bytecode": {{ "object": "0x6080" }} }}"#
        );

        let artifact = parse_artifact(&artifact_json).unwrap();
        assert_eq!(artifact.bytecode.to_vec(), vec![0x60, 0x80]);
    }

    /// Artifacts with no deployable bytecode are rejected
    #[test]
    fn test_parse_artifact_rejects_empty_bytecode() {
        let artifact_json =
            format!(r#"{{ "abi": {SINGLE_ARG_INITIALIZER_ABI}, "bytecode": "0x" }}"#);

        assert!(matches!(
            parse_artifact(&artifact_json),
            Err(ScriptError::ArtifactParsing(_)),
        ));
    }

    /// The low-order 20 bytes of a storage word are the address
    #[test]
    fn test_address_from_storage_word() {
        let address = Address::from_str(TEST_ADDRESS).unwrap();
        let mut word = [0u8; NUM_BYTES_STORAGE_SLOT];
        word[NUM_BYTES_STORAGE_SLOT - NUM_BYTES_ADDRESS..].copy_from_slice(address.as_bytes());

        assert_eq!(address_from_storage_word(H256::from(word)), address);
    }

    /// A written deployment address parses back out of the file
    #[test]
    fn test_deployments_file_round_trip() {
        let file_path = env::temp_dir().join("eutopia_deployments_round_trip.json");
        let file_path = file_path.to_str().unwrap();
        let address = Address::from_str(TEST_ADDRESS).unwrap();

        write_deployed_address(file_path, "eutopia_proxy_contract", address).unwrap();
        let parsed = parse_addr_from_deployments_file(file_path, "eutopia_proxy_contract").unwrap();

        assert_eq!(parsed, address);
        fs::remove_file(file_path).unwrap();
    }
}
