//! 学生提交答案
//!
//! 变体分配不存在时走懒创建：按当前学生名单重新计算排序位置，
//! 名单里找不到则退化为哈希兜底。重复提交允许，产生新的 pending 行。

use super::AssignmentService;
use crate::errors::{ReviewFlowError, Result};
use crate::models::assignments::requests::SubmitRequest;
use crate::models::submissions::entities::Submission;
use crate::utils::variant::late_variant;

pub async fn submit(
    service: &AssignmentService,
    user_id: i64,
    request: SubmitRequest,
) -> Result<Submission> {
    let assignment = service
        .storage
        .get_assignment_by_id(request.assignment_id)
        .await?
        .ok_or_else(|| {
            ReviewFlowError::not_found(format!("任务不存在: {}", request.assignment_id))
        })?;

    if !service.storage.is_member(assignment.group_id, user_id).await? {
        return Err(ReviewFlowError::forbidden("你不是该任务所在群组的成员"));
    }

    if chrono::Utc::now() > assignment.deadline {
        return Err(ReviewFlowError::deadline_passed("截止时间已过"));
    }

    // 先查已有分配；没有则按当前名单计算后幂等落库
    let variant = match service
        .storage
        .get_variant_assignment(assignment.id, user_id)
        .await?
    {
        Some(existing) => existing,
        None => {
            let students = service
                .storage
                .list_group_students(assignment.group_id)
                .await?;
            let number = late_variant(assignment.variants_count, user_id, &students)?;
            service
                .storage
                .get_or_create_variant_assignment(assignment.id, user_id, number)
                .await?
        }
    };

    service
        .storage
        .create_submission(
            assignment.id,
            user_id,
            variant.variant_number,
            request.text_answer,
            request.file_url,
        )
        .await
}
