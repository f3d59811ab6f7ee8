//! 提交存储操作与认领协议
//!
//! 认领是整个系统唯一的串行化点。实现取规范允许的进程内互斥方案：
//! 每个任务一把互斥锁，锁内在同一事务里完成“选最旧 pending 行 +
//! 置为 in_review”，两个并发认领者绝不会拿到同一份提交。
//! 不同任务的认领互不阻塞；认领对已锁行只跳过、从不等待。

use super::SeaOrmStorage;
use crate::entity::submissions::{ActiveModel, Column, Entity as Submissions};
use crate::errors::{ReviewFlowError, Result};
use crate::models::submissions::entities::{Submission, SubmissionStatus};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

impl SeaOrmStorage {
    /// 创建提交，初始状态 pending
    ///
    /// 同一提交者重复提交会产生新行，旧行保持原状态不动。
    pub async fn create_submission_impl(
        &self,
        assignment_id: i64,
        user_id: i64,
        variant_number: i32,
        text_answer: Option<String>,
        file_url: Option<String>,
    ) -> Result<Submission> {
        let model = ActiveModel {
            assignment_id: Set(assignment_id),
            user_id: Set(user_id),
            variant_number: Set(variant_number),
            text_answer: Set(text_answer),
            file_url: Set(file_url),
            submitted_at: Set(chrono::Utc::now().timestamp()),
            status: Set(SubmissionStatus::Pending.to_string()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| ReviewFlowError::database_operation(format!("创建提交失败: {e}")))?;

        Ok(result.into_submission())
    }

    /// 通过 ID 获取提交
    pub async fn get_submission_by_id_impl(
        &self,
        submission_id: i64,
    ) -> Result<Option<Submission>> {
        let result = Submissions::find_by_id(submission_id)
            .one(&self.db)
            .await
            .map_err(|e| ReviewFlowError::database_operation(format!("查询提交失败: {e}")))?;

        Ok(result.map(|m| m.into_submission()))
    }

    /// 原子认领：最旧的 pending 提交交给 reviewer，队列空返回 None
    ///
    /// 排序：submitted_at 升序，时间相同再按 id 升序，保证可复现。
    /// 选行与置锁在同一把任务互斥锁 + 同一事务内完成。
    pub async fn claim_next_submission_impl(
        &self,
        assignment_id: i64,
        reviewer_id: i64,
    ) -> Result<Option<Submission>> {
        let lock = self.claim_lock(assignment_id);
        let _guard = lock.lock().await;

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| ReviewFlowError::database_operation(format!("开启认领事务失败: {e}")))?;

        let oldest = Submissions::find()
            .filter(
                Condition::all()
                    .add(Column::AssignmentId.eq(assignment_id))
                    .add(Column::Status.eq(SubmissionStatus::Pending.to_string())),
            )
            .order_by_asc(Column::SubmittedAt)
            .order_by_asc(Column::Id)
            .one(&txn)
            .await
            .map_err(|e| ReviewFlowError::database_operation(format!("查询待批提交失败: {e}")))?;

        let Some(found) = oldest else {
            txn.commit()
                .await
                .map_err(|e| ReviewFlowError::database_operation(format!("提交事务失败: {e}")))?;
            return Ok(None);
        };

        let mut model = ActiveModel {
            id: Set(found.id),
            ..Default::default()
        };
        model.status = Set(SubmissionStatus::InReview.to_string());
        model.locked_by = Set(Some(reviewer_id));
        model.locked_at = Set(Some(chrono::Utc::now().timestamp()));

        let claimed = model
            .update(&txn)
            .await
            .map_err(|e| ReviewFlowError::database_operation(format!("锁定提交失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| ReviewFlowError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(Some(claimed.into_submission()))
    }

    /// 条件终结：仅当提交仍由 reviewer 持锁批阅中时写入评分
    ///
    /// 条件不满足（状态被并发改变）返回 None，由服务层重新判定原因。
    /// locked_by 保留不清，作为“谁批阅的”审计痕迹。
    pub async fn finalize_review_impl(
        &self,
        submission_id: i64,
        reviewer_id: i64,
        score: i32,
        comment: Option<String>,
    ) -> Result<Option<Submission>> {
        let result = Submissions::update_many()
            .col_expr(
                Column::Status,
                Expr::value(SubmissionStatus::Reviewed.to_string()),
            )
            .col_expr(Column::Score, Expr::value(Some(score)))
            .col_expr(Column::Comment, Expr::value(comment))
            .col_expr(
                Column::ReviewedAt,
                Expr::value(Some(chrono::Utc::now().timestamp())),
            )
            .filter(
                Condition::all()
                    .add(Column::Id.eq(submission_id))
                    .add(Column::Status.eq(SubmissionStatus::InReview.to_string()))
                    .add(Column::LockedBy.eq(reviewer_id)),
            )
            .exec(&self.db)
            .await
            .map_err(|e| ReviewFlowError::database_operation(format!("写入评分失败: {e}")))?;

        if result.rows_affected == 0 {
            return Ok(None);
        }

        self.get_submission_by_id_impl(submission_id).await
    }

    /// 回收超过租约时长的认领锁
    ///
    /// in_review 且 locked_at 早于租约窗口的行回到 pending，清空锁字段，
    /// 返回回收行数。由后台任务周期调用。
    pub async fn release_expired_claims_impl(&self, lease_secs: i64) -> Result<u64> {
        let cutoff = chrono::Utc::now().timestamp() - lease_secs;

        let result = Submissions::update_many()
            .col_expr(
                Column::Status,
                Expr::value(SubmissionStatus::Pending.to_string()),
            )
            .col_expr(Column::LockedBy, Expr::value(None::<i64>))
            .col_expr(Column::LockedAt, Expr::value(None::<i64>))
            .filter(
                Condition::all()
                    .add(Column::Status.eq(SubmissionStatus::InReview.to_string()))
                    .add(Column::LockedAt.lt(cutoff)),
            )
            .exec(&self.db)
            .await
            .map_err(|e| ReviewFlowError::database_operation(format!("回收认领锁失败: {e}")))?;

        Ok(result.rows_affected)
    }
}
