//! Pool Snapshot Fetching
//!
//! Every operation fetches its pool state fresh; staleness between the
//! snapshot and submission is exactly the risk the limit price defends
//! against, so nothing here is cached.

use bastion_core::{Balance, Netuid};
use subtensor_client::DynamicInfo;

use crate::chain::StakingChain;
use crate::state::{StakeError, SubnetPool};

/// Fetch and validate a subnet pool snapshot.
pub async fn fetch_pool(
    chain: &dyn StakingChain,
    netuid: Netuid,
) -> Result<SubnetPool, StakeError> {
    let info = chain.get_dynamic_info(netuid).await?;
    pool_from_info(info)
}

/// Convert raw node data into a stamped pool snapshot.
///
/// A dynamic pool with an empty reserve cannot price anything and is
/// rejected before any quote is attempted.
pub fn pool_from_info(info: DynamicInfo) -> Result<SubnetPool, StakeError> {
    if info.is_dynamic && (info.tao_in == 0 || info.alpha_in == 0) {
        return Err(StakeError::InvalidInput(format!(
            "subnet {} reports empty pool reserves",
            info.netuid
        )));
    }

    let pool = SubnetPool::new(
        info.netuid,
        Balance::from_rao(info.tao_in),
        Balance::from_rao(info.alpha_in),
        info.is_dynamic,
    );

    tracing::debug!(
        netuid = pool.netuid,
        price_rao = pool.price_rao(),
        is_dynamic = pool.is_dynamic,
        "fetched pool snapshot"
    );

    Ok(pool)
}
