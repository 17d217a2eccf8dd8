// SPDX-License-Identifier: MIT
use std::path::PathBuf;
use std::str::FromStr;

use alloy_primitives::B256;
use anyhow::{Context, Result};
use clap::Args;
use tracing::{info, warn};

use host_utils::bundle::ProofBundle;

#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Path to a bundle produced by `fetch`.
    pub path: PathBuf,

    /// Block hash obtained out of band. Without this flag the hash
    /// recorded in the bundle is trusted, which only proves internal
    /// consistency.
    #[arg(long = "block-hash")]
    pub block_hash: Option<String>,
}

pub async fn run(args: VerifyArgs, json_output: bool) -> Result<()> {
    let bundle = ProofBundle::read(&args.path)?;

    info!(
        chain_id = bundle.chain_id,
        block_number = bundle.block_number,
        address = %bundle.address,
        slot = %bundle.slot,
        "Loaded bundle"
    );

    let block_hash = match &args.block_hash {
        Some(s) => B256::from_str(s).context("invalid --block-hash")?,
        None => {
            warn!(
                block_hash = %bundle.block_hash,
                "trusting the block hash recorded in the bundle; \
                 pass --block-hash to pin it to a hash you obtained yourself"
            );
            bundle.block_hash
        }
    };

    let outcome = proof_core::verify(
        &bundle.header_rlp,
        block_hash,
        bundle.address,
        &bundle.account_proof,
        bundle.slot,
        &bundle.storage_proof,
    )
    .context("proof verification failed")?;

    if outcome.value != bundle.claimed_value {
        anyhow::bail!(
            "proof is valid but commits to {} while the bundle claims {}",
            outcome.value,
            bundle.claimed_value
        );
    }

    info!(
        value = %outcome.value,
        storage_root = %outcome.storage_root,
        "Proof verified"
    );

    if json_output {
        let result = serde_json::json!({
            "valid": true,
            "chain_id": bundle.chain_id,
            "block_number": bundle.block_number,
            "block_hash": block_hash,
            "address": bundle.address,
            "slot": bundle.slot,
            "value": outcome.value,
            "storage_root": outcome.storage_root,
        });
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("{}", outcome.value);
    }

    Ok(())
}
