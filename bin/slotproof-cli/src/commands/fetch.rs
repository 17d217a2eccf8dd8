// SPDX-License-Identifier: MIT
use std::path::PathBuf;
use std::str::FromStr;

use alloy_primitives::{Address, B256, U256};
use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use host_utils::bundle::{ProofBundle, BUNDLE_VERSION};
use host_utils::rpc::RpcClient;

use crate::config;

#[derive(Args, Debug)]
pub struct FetchArgs {
    /// Contract or account address.
    pub address: String,

    /// Storage slot, hex or decimal.
    pub slot: String,

    /// Block number; defaults to the latest block.
    #[arg(long)]
    pub block: Option<u64>,

    /// Output bundle path.
    #[arg(long, short, default_value = "proof.json")]
    pub out: PathBuf,

    /// RPC URL. Falls back to SLOTPROOF_RPC_URL, RPC_URL, then
    /// ~/.slotproof/config.toml.
    #[arg(long = "rpc-url")]
    pub rpc_url: Option<String>,
}

pub async fn run(args: FetchArgs, json_output: bool) -> Result<()> {
    let rpc_url = config::resolve_rpc_url(args.rpc_url.as_deref())?;
    let client = RpcClient::new(&rpc_url);

    let address = Address::from_str(&args.address).context("invalid address")?;
    let slot = parse_slot(&args.slot)?;

    let block_number = match args.block {
        Some(n) => n,
        None => client.get_block_number().await.context("fetch latest block number")?,
    };
    let chain_id = client.get_chain_id().await.context("fetch chain id")?;

    info!(block_number, chain_id, %address, %slot, "Fetching proof");

    let fetched = client
        .get_block_by_number(block_number)
        .await
        .context("fetch block header")?;

    let header_rlp = fetched.header.rlp();
    let block_hash = fetched.header.hash();
    if block_hash != fetched.reported_hash {
        anyhow::bail!(
            "re-encoded header hash {} does not match the node's {}; \
             the node may be on a hardfork this serializer does not cover",
            block_hash,
            fetched.reported_hash
        );
    }

    let proof = client
        .get_proof(address, &[slot], block_number)
        .await
        .context("fetch EIP-1186 proof")?;
    let entry = proof
        .storage_proof
        .first()
        .context("RPC returned no storage proof entry")?;

    let bundle = ProofBundle {
        version: BUNDLE_VERSION,
        chain_id,
        block_number,
        block_hash,
        header_rlp: header_rlp.into(),
        address,
        slot,
        account_proof: proof.account_proof.clone(),
        storage_proof: entry.proof.clone(),
        claimed_value: entry.value,
    };

    // Verify before writing; a bundle that does not verify is useless.
    let outcome = proof_core::verify(
        &bundle.header_rlp,
        bundle.block_hash,
        bundle.address,
        &bundle.account_proof,
        bundle.slot,
        &bundle.storage_proof,
    )
    .context("fetched proof does not verify")?;

    if outcome.value != entry.value {
        anyhow::bail!(
            "node reported {} for the slot but its own proof commits to {}",
            entry.value,
            outcome.value
        );
    }

    bundle.write(&args.out)?;

    info!(
        path = %args.out.display(),
        value = %outcome.value,
        storage_root = %outcome.storage_root,
        "Bundle written and verified"
    );

    if json_output {
        let result = serde_json::json!({
            "path": args.out.display().to_string(),
            "chain_id": chain_id,
            "block_number": block_number,
            "block_hash": block_hash,
            "address": address,
            "slot": slot,
            "value": outcome.value,
            "storage_root": outcome.storage_root,
        });
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("{}", outcome.value);
    }

    Ok(())
}

/// Parse a storage slot given as 0x-hex or decimal into its 32-byte form.
fn parse_slot(input: &str) -> Result<B256> {
    let value = U256::from_str(input)
        .with_context(|| format!("invalid storage slot: {input}"))?;
    Ok(B256::from(value.to_be_bytes::<32>()))
}
