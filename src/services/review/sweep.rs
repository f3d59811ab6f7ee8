//! 租约回收
//!
//! 认领后长时间未评分（教师掉线、客户端崩溃）的提交会一直占着锁，
//! 周期性地把超过租约时长的 in_review 行放回 pending 队列。

use tracing::{info, warn};

use super::ReviewService;
use crate::errors::Result;

pub async fn release_expired_claims(service: &ReviewService, lease_secs: i64) -> Result<u64> {
    if lease_secs <= 0 {
        warn!("租约时长 {} 非法，跳过本轮回收", lease_secs);
        return Ok(0);
    }

    let reclaimed = service.storage.release_expired_claims(lease_secs).await?;
    if reclaimed > 0 {
        info!("回收了 {} 份超时未评分的认领", reclaimed);
    }
    Ok(reclaimed)
}
