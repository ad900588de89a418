//! Typed view of the node's `/status` document.
//!
//! A [`NodeStatus`] is an immutable snapshot of one fetch. It is built fresh
//! on every successful request and discarded when the request completes;
//! nothing here is cached.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The node's self-reported sync/identity/validator snapshot.
#[derive(Debug, Clone, Deserialize)]
pub struct NodeStatus {
    pub result: StatusResult,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatusResult {
    pub node_info: NodeInfo,
    pub sync_info: SyncInfo,
    pub validator_info: ValidatorInfo,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NodeInfo {
    pub id: String,
    pub network: String,
}

/// Sync state of the node. The height stays a decimal string end to end,
/// exactly as Tendermint reports it.
#[derive(Debug, Clone, Deserialize)]
pub struct SyncInfo {
    pub latest_block_hash: String,
    pub latest_block_height: String,
    pub latest_block_time: DateTime<Utc>,
    pub catching_up: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ValidatorInfo {
    pub address: String,
    pub pub_key: PubKey,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PubKey {
    #[serde(rename = "type")]
    pub key_type: String,
    pub value: String,
}

/// Projection of the latest block out of a status document.
#[derive(Debug, Clone, Serialize)]
pub struct Block {
    pub hash: String,
    pub height: String,
    pub time: DateTime<Utc>,
}

impl NodeStatus {
    /// Project the latest block fields out of the sync info.
    pub fn latest_block(&self) -> Block {
        let sync = &self.result.sync_info;
        Block {
            hash: sync.latest_block_hash.clone(),
            height: sync.latest_block_height.clone(),
            time: sync.latest_block_time,
        }
    }
}
