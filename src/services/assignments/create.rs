//! 创建任务
//!
//! 创建成功后立即为群组当前全部学生做一次批量变体分配，
//! 之后加入的学生走提交时的懒创建路径。

use tracing::debug;

use super::AssignmentService;
use crate::errors::{ReviewFlowError, Result};
use crate::models::assignments::{entities::Assignment, requests::CreateAssignmentRequest};
use crate::utils::variant::{assign_variants, validate_variants_count};

pub async fn create_assignment(
    service: &AssignmentService,
    creator_id: i64,
    request: CreateAssignmentRequest,
) -> Result<Assignment> {
    validate_variants_count(request.variants_count)?;

    let group = service
        .storage
        .get_group_by_id(request.group_id)
        .await?
        .ok_or_else(|| {
            ReviewFlowError::not_found(format!("群组不存在: {}", request.group_id))
        })?;

    if !service.storage.is_teacher(group.id, creator_id).await? {
        return Err(ReviewFlowError::forbidden("只有群组教师可以创建任务"));
    }

    let assignment = service
        .storage
        .create_assignment(creator_id, request)
        .await?;

    // 批量变体分配：覆盖创建时刻在册的全部学生
    let students = service.storage.list_group_students(group.id).await?;
    let mapping = assign_variants(assignment.variants_count, &students)?;
    service
        .storage
        .insert_variant_assignments(assignment.id, &mapping)
        .await?;

    debug!(
        "任务 {} 创建完成，分配了 {} 份变体",
        assignment.id,
        mapping.len()
    );

    // 逐个通知学生各自的变体号；通知失败不影响已落库的任务
    for (user_id, variant) in &mapping {
        let text = format!(
            "新任务 ✅\n任务 ID: {}\n标题: {}\n{}你的变体: {}\n截止 (UTC): {}",
            assignment.id,
            assignment.title,
            assignment
                .description
                .as_deref()
                .map(|d| format!("描述: {d}\n"))
                .unwrap_or_default(),
            variant,
            assignment.deadline.format("%Y-%m-%d %H:%M"),
        );
        service.notifier.notify(*user_id, &text).await;
    }

    // 通知全体教师任务已创建
    let teachers = service.storage.list_group_teachers(group.id).await?;
    for teacher_id in teachers {
        let text = format!(
            "群组「{}」创建了任务\n任务 ID: {}\n变体数: {}\n截止 (UTC): {}",
            group.name,
            assignment.id,
            assignment.variants_count,
            assignment.deadline.format("%Y-%m-%d %H:%M"),
        );
        service.notifier.notify(teacher_id, &text).await;
    }

    Ok(assignment)
}
