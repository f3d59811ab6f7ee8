//! 群组与成员存储操作
//!
//! 注册、邀请等流程不在本核心范围内；这里只提供成员关系的底座，
//! 供角色判定与变体分配读取。

use super::SeaOrmStorage;
use crate::entity::group_members::{
    ActiveModel as MemberActiveModel, Column as MemberColumn, Entity as GroupMembers,
};
use crate::entity::groups::{ActiveModel as GroupActiveModel, Entity as Groups};
use crate::errors::{ReviewFlowError, Result};
use crate::models::groups::entities::{Group, GroupMember, GroupRole};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    Set,
};

impl SeaOrmStorage {
    /// 创建群组，创建者自动成为教师成员
    pub async fn create_group_impl(&self, owner_id: i64, name: &str) -> Result<Group> {
        let now = chrono::Utc::now().timestamp();

        let model = GroupActiveModel {
            owner_id: Set(owner_id),
            name: Set(name.to_string()),
            created_at: Set(now),
            ..Default::default()
        };

        let group = model
            .insert(&self.db)
            .await
            .map_err(|e| ReviewFlowError::database_operation(format!("创建群组失败: {e}")))?;

        let member = MemberActiveModel {
            group_id: Set(group.id),
            user_id: Set(owner_id),
            role: Set(GroupRole::Teacher.to_string()),
            joined_at: Set(now),
            ..Default::default()
        };
        member
            .insert(&self.db)
            .await
            .map_err(|e| ReviewFlowError::database_operation(format!("添加群主成员失败: {e}")))?;

        Ok(group.into_group())
    }

    /// 通过 ID 获取群组
    pub async fn get_group_by_id_impl(&self, group_id: i64) -> Result<Option<Group>> {
        let result = Groups::find_by_id(group_id)
            .one(&self.db)
            .await
            .map_err(|e| ReviewFlowError::database_operation(format!("查询群组失败: {e}")))?;

        Ok(result.map(|m| m.into_group()))
    }

    /// 添加群组成员；已存在时更新角色（(group_id, user_id) 唯一）
    pub async fn add_group_member_impl(
        &self,
        group_id: i64,
        user_id: i64,
        role: GroupRole,
    ) -> Result<GroupMember> {
        let existing = GroupMembers::find()
            .filter(
                Condition::all()
                    .add(MemberColumn::GroupId.eq(group_id))
                    .add(MemberColumn::UserId.eq(user_id)),
            )
            .one(&self.db)
            .await
            .map_err(|e| ReviewFlowError::database_operation(format!("查询群组成员失败: {e}")))?;

        if let Some(found) = existing {
            let mut model = MemberActiveModel {
                id: Set(found.id),
                ..Default::default()
            };
            model.role = Set(role.to_string());
            let updated = model.update(&self.db).await.map_err(|e| {
                ReviewFlowError::database_operation(format!("更新群组成员角色失败: {e}"))
            })?;
            return Ok(updated.into_group_member());
        }

        let model = MemberActiveModel {
            group_id: Set(group_id),
            user_id: Set(user_id),
            role: Set(role.to_string()),
            joined_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| ReviewFlowError::database_operation(format!("添加群组成员失败: {e}")))?;

        Ok(result.into_group_member())
    }

    /// 按角色列出成员 ID，升序返回（变体分配依赖该顺序）
    pub async fn list_group_members_by_role_impl(
        &self,
        group_id: i64,
        role: GroupRole,
    ) -> Result<Vec<i64>> {
        let members = GroupMembers::find()
            .filter(
                Condition::all()
                    .add(MemberColumn::GroupId.eq(group_id))
                    .add(MemberColumn::Role.eq(role.to_string())),
            )
            .order_by_asc(MemberColumn::UserId)
            .all(&self.db)
            .await
            .map_err(|e| ReviewFlowError::database_operation(format!("查询群组成员失败: {e}")))?;

        Ok(members.into_iter().map(|m| m.user_id).collect())
    }

    /// 用户是否为群组教师
    pub async fn is_teacher_impl(&self, group_id: i64, user_id: i64) -> Result<bool> {
        let count = GroupMembers::find()
            .filter(
                Condition::all()
                    .add(MemberColumn::GroupId.eq(group_id))
                    .add(MemberColumn::UserId.eq(user_id))
                    .add(MemberColumn::Role.eq(GroupRole::Teacher.to_string())),
            )
            .count(&self.db)
            .await
            .map_err(|e| ReviewFlowError::database_operation(format!("查询教师身份失败: {e}")))?;

        Ok(count > 0)
    }

    /// 用户是否为群组成员
    pub async fn is_member_impl(&self, group_id: i64, user_id: i64) -> Result<bool> {
        let count = GroupMembers::find()
            .filter(
                Condition::all()
                    .add(MemberColumn::GroupId.eq(group_id))
                    .add(MemberColumn::UserId.eq(user_id)),
            )
            .count(&self.db)
            .await
            .map_err(|e| ReviewFlowError::database_operation(format!("查询成员身份失败: {e}")))?;

        Ok(count > 0)
    }
}
