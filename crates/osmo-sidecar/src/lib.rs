//! osmo-sidecar — health-check and status sidecar for an Osmosis node.
//!
//! Polls the node's `/status` RPC and the LCD epoch endpoint, derives an
//! UP/DOWN health verdict that tolerates block staleness around the daily
//! epoch boundary, and republishes a handful of read-only endpoints
//! (`/node_id`, `/pub_key`, `/block`, `/height`, `/health`).

pub mod api;
pub mod config;
pub mod epoch;
pub mod fetch;
pub mod health;
pub mod metrics;
pub mod status;

/// Test helpers shared across unit test modules.
#[cfg(test)]
pub(crate) mod test_helpers {
    use chrono::{DateTime, Utc};

    use crate::epoch::{EpochRecord, EpochsResponse};
    use crate::status::{NodeInfo, NodeStatus, PubKey, StatusResult, SyncInfo, ValidatorInfo};

    /// Build a [`NodeStatus`] with the given sync fields.
    ///
    /// All identity fields are fixed sample values.
    pub(crate) fn sample_status(
        height: &str,
        block_time: DateTime<Utc>,
        catching_up: bool,
    ) -> NodeStatus {
        NodeStatus {
            result: StatusResult {
                node_info: NodeInfo {
                    id: "0a1b2c3d4e5f".into(),
                    network: "osmosis-1".into(),
                },
                sync_info: SyncInfo {
                    latest_block_hash: "A0B1C2D3E4F5".into(),
                    latest_block_height: height.into(),
                    latest_block_time: block_time,
                    catching_up,
                },
                validator_info: ValidatorInfo {
                    address: "CAFEBABECAFEBABE".into(),
                    pub_key: PubKey {
                        key_type: "tendermint/PubKeyEd25519".into(),
                        value: "abcDEF==".into(),
                    },
                },
            },
        }
    }

    /// Build an epoch list containing a `"day"` record with the given start,
    /// plus a `"week"` record to exercise identifier selection.
    pub(crate) fn sample_epochs(day_start: DateTime<Utc>) -> EpochsResponse {
        EpochsResponse {
            epochs: vec![
                EpochRecord {
                    identifier: "week".into(),
                    current_epoch_start_time: day_start,
                },
                EpochRecord {
                    identifier: "day".into(),
                    current_epoch_start_time: day_start,
                },
            ],
        }
    }
}
