//! 认领下一份待批提交
//!
//! 认领本身是存储层的原子操作；这里做权限校验，
//! 并在 send_next_for_review 里把提交详情推送给批阅教师。

use super::ReviewService;
use crate::errors::{ReviewFlowError, Result};
use crate::models::submissions::entities::Submission;

pub async fn claim_next(
    service: &ReviewService,
    reviewer_id: i64,
    assignment_id: i64,
) -> Result<Option<Submission>> {
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
        .claim_next_submission(assignment_id, reviewer_id)
        .await
}

pub async fn send_next_for_review(
    service: &ReviewService,
    reviewer_id: i64,
    assignment_id: i64,
) -> Result<Option<Submission>> {
    let claimed = claim_next(service, reviewer_id, assignment_id).await?;

    match &claimed {
        Some(submission) => {
            let text = format!(
                "待批提交 📝\n提交 ID: {}\n任务 ID: {}\n变体: {}\n提交时间 (UTC): {}\n{}{}",
                submission.id,
                submission.assignment_id,
                submission.variant_number,
                submission.submitted_at.format("%Y-%m-%d %H:%M"),
                submission
                    .text_answer
                    .as_deref()
                    .map(|t| format!("答案:\n{t}\n"))
                    .unwrap_or_default(),
                submission
                    .file_url
                    .as_deref()
                    .map(|u| format!("附件: {u}"))
                    .unwrap_or_default(),
            );
            service.notifier.notify(reviewer_id, &text).await;
        }
        None => {
            service
                .notifier
                .notify(reviewer_id, "该任务暂时没有待批的提交")
                .await;
        }
    }

    Ok(claimed)
}
