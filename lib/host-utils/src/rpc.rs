// SPDX-License-Identifier: MIT
//! Minimal JSON-RPC client for Ethereum node communication.
//!
//! Raw HTTP requests via reqwest; the verifier only needs four methods,
//! so a full provider stack would be dead weight.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use alloy_primitives::{Address, Bytes, B256, U256, U64};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::header::BlockHeader;

/// A minimal Ethereum JSON-RPC client.
#[derive(Clone)]
pub struct RpcClient {
    url: String,
    client: reqwest::Client,
    id: Arc<AtomicU64>,
}

#[derive(Serialize)]
struct JsonRpcRequest<'a> {
    jsonrpc: &'a str,
    method: &'a str,
    params: serde_json::Value,
    id: u64,
}

#[derive(Deserialize)]
struct JsonRpcResponse {
    result: Option<serde_json::Value>,
    error: Option<JsonRpcError>,
}

#[derive(Deserialize, Debug)]
struct JsonRpcError {
    code: i64,
    message: String,
}

/// A header together with the hash the node reported for it. `fetch`
/// cross-checks the re-encoded hash against this before trusting the
/// serialization.
#[derive(Debug, Clone)]
pub struct FetchedHeader {
    pub header: BlockHeader,
    pub reported_hash: B256,
}

/// Response from `eth_getProof` for a single account.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProofResponse {
    pub address: Address,
    pub nonce: U64,
    pub balance: U256,
    pub storage_hash: B256,
    pub code_hash: B256,
    pub account_proof: Vec<Bytes>,
    pub storage_proof: Vec<StorageProofEntry>,
}

/// One storage entry within an `eth_getProof` response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageProofEntry {
    pub key: U256,
    pub value: U256,
    pub proof: Vec<Bytes>,
}

impl RpcClient {
    /// Maximum number of retries for transient failures.
    const MAX_RETRIES: u32 = 5;
    /// Initial backoff delay in milliseconds.
    const INITIAL_BACKOFF_MS: u64 = 1000;
    /// Maximum backoff delay in milliseconds.
    const MAX_BACKOFF_MS: u64 = 30_000;

    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
            client: reqwest::Client::new(),
            id: Arc::new(AtomicU64::new(1)),
        }
    }

    async fn call(&self, method: &str, params: serde_json::Value) -> Result<serde_json::Value> {
        let id = self.id.fetch_add(1, Ordering::Relaxed);
        let request = JsonRpcRequest {
            jsonrpc: "2.0",
            method,
            params,
            id,
        };

        debug!(method, %id, "RPC request");

        let mut last_err = None;
        for attempt in 0..=Self::MAX_RETRIES {
            if attempt > 0 {
                let backoff = std::cmp::min(
                    Self::INITIAL_BACKOFF_MS * 2u64.pow(attempt - 1),
                    Self::MAX_BACKOFF_MS,
                );
                debug!(method, attempt, backoff_ms = backoff, "Retrying RPC request");
                tokio::time::sleep(Duration::from_millis(backoff)).await;
            }

            let response = match self.client.post(&self.url).json(&request).send().await {
                Ok(r) => r,
                Err(e) if e.is_timeout() || e.is_connect() => {
                    last_err = Some(anyhow::anyhow!(e).context(format!(
                        "RPC request to {} failed (attempt {})",
                        method,
                        attempt + 1
                    )));
                    continue;
                }
                Err(e) => {
                    return Err(
                        anyhow::anyhow!(e).context(format!("RPC request to {} failed", method))
                    );
                }
            };

            // Retry on 429 (rate limited) and 5xx server errors
            if response.status() == 429 || response.status().is_server_error() {
                last_err = Some(anyhow::anyhow!(
                    "RPC {} returned status {} (attempt {})",
                    method,
                    response.status(),
                    attempt + 1
                ));
                continue;
            }

            let body: JsonRpcResponse = response
                .json()
                .await
                .with_context(|| format!("Failed to parse RPC response for {}", method))?;

            if let Some(err) = body.error {
                // Retry on rate-limit JSON-RPC errors
                if err.code == -32005 || err.code == 429 {
                    last_err = Some(anyhow::anyhow!(
                        "RPC rate limit for {} (code {}, attempt {})",
                        method,
                        err.code,
                        attempt + 1
                    ));
                    continue;
                }
                anyhow::bail!("RPC error for {}: {} (code {})", method, err.message, err.code);
            }

            return body
                .result
                .with_context(|| format!("RPC response for {} has no result", method));
        }

        Err(last_err.unwrap_or_else(|| anyhow::anyhow!("RPC {} failed after retries", method)))
    }

    /// Get the chain ID.
    pub async fn get_chain_id(&self) -> Result<u64> {
        let result = self.call("eth_chainId", serde_json::json!([])).await?;
        parse_quantity(&result).context("parse chain_id")
    }

    /// Get the latest block number.
    pub async fn get_block_number(&self) -> Result<u64> {
        let result = self.call("eth_blockNumber", serde_json::json!([])).await?;
        parse_quantity(&result).context("parse block number")
    }

    /// Get a block header by number (no transaction bodies).
    pub async fn get_block_by_number(&self, block_number: u64) -> Result<FetchedHeader> {
        let result = self
            .call(
                "eth_getBlockByNumber",
                serde_json::json!([format!("0x{block_number:x}"), false]),
            )
            .await?;

        if result.is_null() {
            anyhow::bail!("block {} not found", block_number);
        }

        let reported_hash: B256 = serde_json::from_value(
            result.get("hash").cloned().context("block has no hash")?,
        )
        .context("parse block hash")?;

        let header: BlockHeader =
            serde_json::from_value(result).context("parse block header fields")?;

        Ok(FetchedHeader {
            header,
            reported_hash,
        })
    }

    /// Get storage value at a slot for an address at a specific block.
    pub async fn get_storage_at(
        &self,
        address: Address,
        slot: B256,
        block_number: u64,
    ) -> Result<U256> {
        let result = self
            .call(
                "eth_getStorageAt",
                serde_json::json!([
                    format!("{address:?}"),
                    format!("{slot}"),
                    format!("0x{block_number:x}")
                ]),
            )
            .await?;
        serde_json::from_value(result).context("parse storage value")
    }

    /// Call `eth_getProof` for an address with a set of storage keys.
    pub async fn get_proof(
        &self,
        address: Address,
        storage_keys: &[B256],
        block_number: u64,
    ) -> Result<ProofResponse> {
        let keys: Vec<String> = storage_keys.iter().map(|k| format!("{k}")).collect();

        let result = self
            .call(
                "eth_getProof",
                serde_json::json!([format!("{address:?}"), keys, format!("0x{block_number:x}")]),
            )
            .await?;

        serde_json::from_value(result).context("parse eth_getProof response")
    }
}

fn parse_quantity(value: &serde_json::Value) -> Result<u64> {
    let s = value.as_str().context("expected a hex quantity string")?;
    let s = s.strip_prefix("0x").unwrap_or(s);
    u64::from_str_radix(s, 16).with_context(|| format!("invalid hex quantity: 0x{s}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quantities_parse_with_and_without_prefix() {
        assert_eq!(parse_quantity(&serde_json::json!("0x1")).unwrap(), 1);
        assert_eq!(parse_quantity(&serde_json::json!("0x12d687")).unwrap(), 1_234_567);
        assert_eq!(parse_quantity(&serde_json::json!("ff")).unwrap(), 255);
        assert!(parse_quantity(&serde_json::json!(7)).is_err());
        assert!(parse_quantity(&serde_json::json!("0xzz")).is_err());
    }

    #[test]
    fn proof_response_deserializes_from_rpc_shape() {
        let json = serde_json::json!({
            "address": "0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa",
            "nonce": "0x1",
            "balance": "0xde0b6b3a7640000",
            "storageHash": "0x2222222222222222222222222222222222222222222222222222222222222222",
            "codeHash": "0x3333333333333333333333333333333333333333333333333333333333333333",
            "accountProof": ["0xf851808080"],
            "storageProof": [{
                "key": "0x0",
                "value": "0x2a",
                "proof": ["0xe2a020"]
            }]
        });

        let proof: ProofResponse = serde_json::from_value(json).unwrap();
        assert_eq!(proof.nonce, U64::from(1));
        assert_eq!(proof.account_proof.len(), 1);
        assert_eq!(proof.storage_proof[0].value, U256::from(42u64));
        assert_eq!(proof.storage_proof[0].proof[0].len(), 3);
    }
}
