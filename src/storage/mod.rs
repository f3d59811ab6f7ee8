use std::sync::Arc;

use crate::models::{
    assignments::{entities::Assignment, requests::CreateAssignmentRequest},
    groups::entities::{Group, GroupMember, GroupRole},
    review_sessions::entities::ReviewSession,
    submissions::entities::Submission,
    variants::entities::VariantAssignment,
};

use crate::errors::Result;

pub mod sea_orm_storage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 群组与成员方法
    // 创建群组（创建者自动成为教师）
    async fn create_group(&self, owner_id: i64, name: &str) -> Result<Group>;
    // 通过ID获取群组信息
    async fn get_group_by_id(&self, group_id: i64) -> Result<Option<Group>>;
    // 添加或更新群组成员（同一用户重复添加时更新角色）
    async fn add_group_member(
        &self,
        group_id: i64,
        user_id: i64,
        role: GroupRole,
    ) -> Result<GroupMember>;
    // 列出群组内全部学生 ID，升序（变体分配的输入顺序）
    async fn list_group_students(&self, group_id: i64) -> Result<Vec<i64>>;
    // 列出群组内全部教师 ID
    async fn list_group_teachers(&self, group_id: i64) -> Result<Vec<i64>>;
    // 用户是否为群组教师
    async fn is_teacher(&self, group_id: i64, user_id: i64) -> Result<bool>;
    // 用户是否为群组成员
    async fn is_member(&self, group_id: i64, user_id: i64) -> Result<bool>;

    /// 任务方法
    // 创建任务
    async fn create_assignment(
        &self,
        created_by: i64,
        request: CreateAssignmentRequest,
    ) -> Result<Assignment>;
    // 通过ID获取任务信息
    async fn get_assignment_by_id(&self, assignment_id: i64) -> Result<Option<Assignment>>;

    /// 变体分配方法
    // 批量写入变体分配（任务创建时）
    async fn insert_variant_assignments(
        &self,
        assignment_id: i64,
        mapping: &[(i64, i32)],
    ) -> Result<()>;
    // 查询某个提交者的变体分配
    async fn get_variant_assignment(
        &self,
        assignment_id: i64,
        user_id: i64,
    ) -> Result<Option<VariantAssignment>>;
    // 幂等获取或创建单条变体分配（迟到提交者的懒创建路径）
    async fn get_or_create_variant_assignment(
        &self,
        assignment_id: i64,
        user_id: i64,
        variant_number: i32,
    ) -> Result<VariantAssignment>;

    /// 提交方法
    // 创建提交，初始状态 pending
    async fn create_submission(
        &self,
        assignment_id: i64,
        user_id: i64,
        variant_number: i32,
        text_answer: Option<String>,
        file_url: Option<String>,
    ) -> Result<Submission>;
    // 通过ID获取提交
    async fn get_submission_by_id(&self, submission_id: i64) -> Result<Option<Submission>>;
    // 原子认领：取最旧的 pending 提交并锁定给 reviewer，队列空返回 None
    async fn claim_next_submission(
        &self,
        assignment_id: i64,
        reviewer_id: i64,
    ) -> Result<Option<Submission>>;
    // 条件终结：仅当提交处于 in_review 且锁持有者为 reviewer 时写入评分，
    // 否则返回 None（状态已被并发改变）
    async fn finalize_review(
        &self,
        submission_id: i64,
        reviewer_id: i64,
        score: i32,
        comment: Option<String>,
    ) -> Result<Option<Submission>>;
    // 回收超过租约时长的认领锁，返回回收行数
    async fn release_expired_claims(&self, lease_secs: i64) -> Result<u64>;

    /// 批阅会话方法
    // upsert 会话开关
    async fn upsert_review_session(
        &self,
        assignment_id: i64,
        reviewer_id: i64,
        active: bool,
    ) -> Result<ReviewSession>;
    // 查询会话
    async fn get_review_session(
        &self,
        assignment_id: i64,
        reviewer_id: i64,
    ) -> Result<Option<ReviewSession>>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
