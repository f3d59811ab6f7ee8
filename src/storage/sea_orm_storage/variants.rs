//! 变体分配存储操作

use super::SeaOrmStorage;
use crate::entity::assignment_variants::{ActiveModel, Column, Entity as AssignmentVariants};
use crate::errors::{ReviewFlowError, Result};
use crate::models::variants::entities::VariantAssignment;
use sea_orm::{ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, Set};

impl SeaOrmStorage {
    /// 批量写入变体分配（任务创建时的全量分配）
    pub async fn insert_variant_assignments_impl(
        &self,
        assignment_id: i64,
        mapping: &[(i64, i32)],
    ) -> Result<()> {
        if mapping.is_empty() {
            return Ok(());
        }

        let models: Vec<ActiveModel> = mapping
            .iter()
            .map(|&(user_id, variant_number)| ActiveModel {
                assignment_id: Set(assignment_id),
                user_id: Set(user_id),
                variant_number: Set(variant_number),
                ..Default::default()
            })
            .collect();

        AssignmentVariants::insert_many(models)
            .exec(&self.db)
            .await
            .map_err(|e| ReviewFlowError::database_operation(format!("写入变体分配失败: {e}")))?;

        Ok(())
    }

    /// 查询某个提交者的变体分配
    pub async fn get_variant_assignment_impl(
        &self,
        assignment_id: i64,
        user_id: i64,
    ) -> Result<Option<VariantAssignment>> {
        let result = AssignmentVariants::find()
            .filter(
                Condition::all()
                    .add(Column::AssignmentId.eq(assignment_id))
                    .add(Column::UserId.eq(user_id)),
            )
            .one(&self.db)
            .await
            .map_err(|e| ReviewFlowError::database_operation(format!("查询变体分配失败: {e}")))?;

        Ok(result.map(|m| m.into_variant_assignment()))
    }

    /// 幂等获取或创建单条变体分配
    ///
    /// 已存在时返回已有行（不覆盖已分配的变体号）；插入撞上
    /// (assignment_id, user_id) 唯一约束时按已存在处理，重新读出。
    pub async fn get_or_create_variant_assignment_impl(
        &self,
        assignment_id: i64,
        user_id: i64,
        variant_number: i32,
    ) -> Result<VariantAssignment> {
        if let Some(existing) = self
            .get_variant_assignment_impl(assignment_id, user_id)
            .await?
        {
            return Ok(existing);
        }

        let model = ActiveModel {
            assignment_id: Set(assignment_id),
            user_id: Set(user_id),
            variant_number: Set(variant_number),
            ..Default::default()
        };

        match model.insert(&self.db).await {
            Ok(inserted) => Ok(inserted.into_variant_assignment()),
            // 与并发插入撞唯一约束：读回赢家写入的行
            Err(_) => self
                .get_variant_assignment_impl(assignment_id, user_id)
                .await?
                .ok_or_else(|| {
                    ReviewFlowError::database_operation(format!(
                        "变体分配写入失败且无法读回: assignment={assignment_id} user={user_id}"
                    ))
                }),
        }
    }
}
