//! Chain seam
//!
//! The staking pipeline reads chain state and submits extrinsics through
//! this trait so tests can run against an in-memory chain. The production
//! implementation delegates to `SubtensorClient`.

use async_trait::async_trait;

use bastion_core::{Address, Balance, Netuid, RpcError};
use subtensor_client::{DynamicInfo, SignedExtrinsic, SubmissionReceipt, SubtensorClient};

/// Chain queries and submission used by staking operations
#[async_trait]
pub trait StakingChain: Send + Sync {
    /// Free balance of an account (rao)
    async fn get_balance(&self, address: &Address) -> Result<Balance, RpcError>;

    /// Stake position for (coldkey, hotkey, netuid), in alpha base units
    async fn get_stake(
        &self,
        coldkey: &Address,
        hotkey: &Address,
        netuid: Netuid,
    ) -> Result<Balance, RpcError>;

    /// Pool reserves and classification for a subnet
    async fn get_dynamic_info(&self, netuid: Netuid) -> Result<DynamicInfo, RpcError>;

    /// Fee charged for staking `amount` into `netuid`
    async fn get_stake_fee(
        &self,
        amount: Balance,
        netuid: Netuid,
        coldkey: &Address,
        hotkey: &Address,
    ) -> Result<Balance, RpcError>;

    /// Fee charged for unstaking `amount` from `netuid`
    async fn get_unstake_fee(
        &self,
        amount: Balance,
        netuid: Netuid,
        coldkey: &Address,
        hotkey: &Address,
    ) -> Result<Balance, RpcError>;

    /// Submit a signed extrinsic, optionally waiting for inclusion
    async fn submit_extrinsic(
        &self,
        extrinsic: &SignedExtrinsic,
        wait_for_inclusion: bool,
    ) -> Result<SubmissionReceipt, RpcError>;
}

#[async_trait]
impl StakingChain for SubtensorClient {
    async fn get_balance(&self, address: &Address) -> Result<Balance, RpcError> {
        SubtensorClient::get_balance(self, address).await
    }

    async fn get_stake(
        &self,
        coldkey: &Address,
        hotkey: &Address,
        netuid: Netuid,
    ) -> Result<Balance, RpcError> {
        SubtensorClient::get_stake(self, coldkey, hotkey, netuid).await
    }

    async fn get_dynamic_info(&self, netuid: Netuid) -> Result<DynamicInfo, RpcError> {
        SubtensorClient::get_dynamic_info(self, netuid).await
    }

    async fn get_stake_fee(
        &self,
        amount: Balance,
        netuid: Netuid,
        coldkey: &Address,
        hotkey: &Address,
    ) -> Result<Balance, RpcError> {
        SubtensorClient::get_stake_fee(self, amount, netuid, coldkey, hotkey).await
    }

    async fn get_unstake_fee(
        &self,
        amount: Balance,
        netuid: Netuid,
        coldkey: &Address,
        hotkey: &Address,
    ) -> Result<Balance, RpcError> {
        SubtensorClient::get_unstake_fee(self, amount, netuid, coldkey, hotkey).await
    }

    async fn submit_extrinsic(
        &self,
        extrinsic: &SignedExtrinsic,
        wait_for_inclusion: bool,
    ) -> Result<SubmissionReceipt, RpcError> {
        SubtensorClient::submit_extrinsic(self, extrinsic, wait_for_inclusion).await
    }
}
