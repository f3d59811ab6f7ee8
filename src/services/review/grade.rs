//! 评分
//!
//! 先做守卫检查给出精确错误，再走存储层的条件更新落库；
//! 条件更新失败说明检查和落库之间状态被并发改变，重读后重推错误。

use tracing::info;

use super::ReviewService;
use crate::errors::{ReviewFlowError, Result};
use crate::models::submissions::entities::{Submission, SubmissionStatus};

pub const MIN_SCORE: i32 = 0;
pub const MAX_SCORE: i32 = 100;

#[derive(Debug, Clone)]
pub struct GradeOutcome {
    // 提交所属的任务，调用方据此决定是否继续认领下一份
    pub assignment_id: i64,
    pub submission: Submission,
}

pub async fn grade(
    service: &ReviewService,
    reviewer_id: i64,
    submission_id: i64,
    score: i32,
    comment: Option<String>,
) -> Result<GradeOutcome> {
    if !(MIN_SCORE..=MAX_SCORE).contains(&score) {
        return Err(ReviewFlowError::invalid_score(format!(
            "评分必须在 {MIN_SCORE} 到 {MAX_SCORE} 之间，收到: {score}"
        )));
    }

    let submission = service
        .storage
        .get_submission_by_id(submission_id)
        .await?
        .ok_or_else(|| ReviewFlowError::not_found(format!("提交不存在: {submission_id}")))?;

    let assignment = service
        .storage
        .get_assignment_by_id(submission.assignment_id)
        .await?
        .ok_or_else(|| {
            ReviewFlowError::not_found(format!("任务不存在: {}", submission.assignment_id))
        })?;

    if !service
        .storage
        .is_teacher(assignment.group_id, reviewer_id)
        .await?
    {
        return Err(ReviewFlowError::forbidden("只有群组教师可以评分"));
    }

    state_guard(&submission, reviewer_id)?;

    let finalized = service
        .storage
        .finalize_review(submission_id, reviewer_id, score, comment)
        .await?;

    let submission = match finalized {
        Some(s) => s,
        None => {
            // 守卫检查之后、条件更新之前状态被并发改变，重读给出准确错误
            let current = service
                .storage
                .get_submission_by_id(submission_id)
                .await?
                .ok_or_else(|| {
                    ReviewFlowError::not_found(format!("提交不存在: {submission_id}"))
                })?;
            state_guard(&current, reviewer_id)?;
            return Err(ReviewFlowError::not_yet_claimed("提交状态已被并发改变"));
        }
    };

    info!(
        "提交 {} 由教师 {} 评分 {} 分",
        submission.id, reviewer_id, score
    );

    // 通知提交者批阅结果；通知失败不影响已落库的评分
    let text = format!(
        "你的提交已批阅 ✅\n任务 ID: {}\n评分: {}\n{}",
        submission.assignment_id,
        score,
        submission
            .comment
            .as_deref()
            .map(|c| format!("批语: {c}"))
            .unwrap_or_default(),
    );
    service.notifier.notify(submission.user_id, &text).await;

    Ok(GradeOutcome {
        assignment_id: submission.assignment_id,
        submission,
    })
}

// 把提交当前状态映射为精确的评分前置错误
fn state_guard(submission: &Submission, reviewer_id: i64) -> Result<()> {
    match submission.status {
        SubmissionStatus::Reviewed => Err(ReviewFlowError::already_reviewed(format!(
            "提交 {} 已有评分",
            submission.id
        ))),
        SubmissionStatus::Pending => Err(ReviewFlowError::not_yet_claimed(format!(
            "提交 {} 尚未被认领，先认领再评分",
            submission.id
        ))),
        SubmissionStatus::InReview => match submission.locked_by {
            Some(holder) if holder == reviewer_id => Ok(()),
            _ => Err(ReviewFlowError::locked_by_other(format!(
                "提交 {} 已被其他教师认领",
                submission.id
            ))),
        },
    }
}
