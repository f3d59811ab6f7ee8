//! 开始批阅会话

use super::ReviewService;
use crate::errors::{ReviewFlowError, Result};
use crate::models::review_sessions::entities::ReviewSession;

pub async fn start_review(
    service: &ReviewService,
    reviewer_id: i64,
    assignment_id: i64,
) -> Result<ReviewSession> {
    let assignment = service
        .storage
        .get_assignment_by_id(assignment_id)
        .await?
        .ok_or_else(|| ReviewFlowError::not_found(format!("任务不存在: {assignment_id}")))?;

    if !service
        .storage
        .is_teacher(assignment.group_id, reviewer_id)
        .await?
    {
        return Err(ReviewFlowError::forbidden("只有群组教师可以批阅该任务"));
    }

    service
        .storage
        .upsert_review_session(assignment_id, reviewer_id, true)
        .await
}
