//! 任务存储操作

use super::SeaOrmStorage;
use crate::entity::assignments::{ActiveModel, Entity as Assignments};
use crate::errors::{ReviewFlowError, Result};
use crate::models::assignments::{entities::Assignment, requests::CreateAssignmentRequest};
use sea_orm::{ActiveModelTrait, EntityTrait, Set};

impl SeaOrmStorage {
    /// 创建任务（创建后不可修改）
    pub async fn create_assignment_impl(
        &self,
        created_by: i64,
        request: CreateAssignmentRequest,
    ) -> Result<Assignment> {
        let model = ActiveModel {
            group_id: Set(request.group_id),
            created_by: Set(created_by),
            variants_count: Set(request.variants_count),
            deadline: Set(request.deadline.timestamp()),
            title: Set(request.title),
            description: Set(request.description),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| ReviewFlowError::database_operation(format!("创建任务失败: {e}")))?;

        Ok(result.into_assignment())
    }

    /// 通过 ID 获取任务
    pub async fn get_assignment_by_id_impl(
        &self,
        assignment_id: i64,
    ) -> Result<Option<Assignment>> {
        let result = Assignments::find_by_id(assignment_id)
            .one(&self.db)
            .await
            .map_err(|e| ReviewFlowError::database_operation(format!("查询任务失败: {e}")))?;

        Ok(result.map(|m| m.into_assignment()))
    }
}
