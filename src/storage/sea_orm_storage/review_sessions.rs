//! 批阅会话存储操作

use super::SeaOrmStorage;
use crate::entity::review_sessions::{ActiveModel, Column, Entity as ReviewSessions};
use crate::errors::{ReviewFlowError, Result};
use crate::models::review_sessions::entities::ReviewSession;
use sea_orm::{ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, Set};

impl SeaOrmStorage {
    /// upsert 会话开关（(assignment_id, reviewer_id) 唯一）
    pub async fn upsert_review_session_impl(
        &self,
        assignment_id: i64,
        reviewer_id: i64,
        active: bool,
    ) -> Result<ReviewSession> {
        let now = chrono::Utc::now().timestamp();

        let existing = ReviewSessions::find()
            .filter(
                Condition::all()
                    .add(Column::AssignmentId.eq(assignment_id))
                    .add(Column::ReviewerId.eq(reviewer_id)),
            )
            .one(&self.db)
            .await
            .map_err(|e| ReviewFlowError::database_operation(format!("查询批阅会话失败: {e}")))?;

        if let Some(found) = existing {
            let mut model = ActiveModel {
                id: Set(found.id),
                ..Default::default()
            };
            model.active = Set(active);
            model.updated_at = Set(now);
            let updated = model.update(&self.db).await.map_err(|e| {
                ReviewFlowError::database_operation(format!("更新批阅会话失败: {e}"))
            })?;
            return Ok(updated.into_review_session());
        }

        let model = ActiveModel {
            assignment_id: Set(assignment_id),
            reviewer_id: Set(reviewer_id),
            active: Set(active),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| ReviewFlowError::database_operation(format!("创建批阅会话失败: {e}")))?;

        Ok(result.into_review_session())
    }

    /// 查询会话
    pub async fn get_review_session_impl(
        &self,
        assignment_id: i64,
        reviewer_id: i64,
    ) -> Result<Option<ReviewSession>> {
        let result = ReviewSessions::find()
            .filter(
                Condition::all()
                    .add(Column::AssignmentId.eq(assignment_id))
                    .add(Column::ReviewerId.eq(reviewer_id)),
            )
            .one(&self.db)
            .await
            .map_err(|e| ReviewFlowError::database_operation(format!("查询批阅会话失败: {e}")))?;

        Ok(result.map(|m| m.into_review_session()))
    }
}
