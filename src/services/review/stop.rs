//! 停止批阅会话
//!
//! 只翻会话开关，不触碰该教师已认领、尚未评分的提交：
//! 锁依然有效，由后续评分或租约回收处理。

use tracing::debug;

use super::ReviewService;
use crate::errors::Result;

pub async fn stop_review(
    service: &ReviewService,
    reviewer_id: i64,
    assignment_id: i64,
) -> Result<()> {
    // 会话不存在时什么都不做
    if service
        .storage
        .get_review_session(assignment_id, reviewer_id)
        .await?
        .is_none()
    {
        return Ok(());
    }

    service
        .storage
        .upsert_review_session(assignment_id, reviewer_id, false)
        .await?;
    debug!("教师 {} 停止批阅任务 {}", reviewer_id, assignment_id);
    Ok(())
}
