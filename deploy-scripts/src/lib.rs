//! Scripts for deploying, upgrading, and verifying the Eutopia token contract
//! behind its upgradeable proxy.

#![deny(missing_docs)]
#![deny(clippy::missing_docs_in_private_items)]

pub mod cli;
pub mod commands;
pub mod constants;
pub mod errors;
mod solidity;
pub mod utils;
pub mod verify;
