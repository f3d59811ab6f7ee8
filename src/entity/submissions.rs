//! 提交实体
//!
//! status / locked_by / locked_at 只由认领协议写入，score / comment /
//! reviewed_at 只由评分流程写入，提交行一旦创建不会删除。

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "submissions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub assignment_id: i64,
    pub user_id: i64,
    pub variant_number: i32,
    #[sea_orm(column_type = "Text", nullable)]
    pub text_answer: Option<String>,
    pub file_url: Option<String>,
    pub submitted_at: i64,
    pub status: String,
    pub locked_by: Option<i64>,
    pub locked_at: Option<i64>,
    pub score: Option<i32>,
    #[sea_orm(column_type = "Text", nullable)]
    pub comment: Option<String>,
    pub reviewed_at: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::assignments::Entity",
        from = "Column::AssignmentId",
        to = "super::assignments::Column::Id"
    )]
    Assignment,
}

impl Related<super::assignments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Assignment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// 从数据库模型转换为业务模型
impl Model {
    pub fn into_submission(self) -> crate::models::submissions::entities::Submission {
        use crate::models::submissions::entities::{Submission, SubmissionStatus};
        use chrono::{DateTime, Utc};

        Submission {
            id: self.id,
            assignment_id: self.assignment_id,
            user_id: self.user_id,
            variant_number: self.variant_number,
            text_answer: self.text_answer,
            file_url: self.file_url,
            submitted_at: DateTime::<Utc>::from_timestamp(self.submitted_at, 0)
                .unwrap_or_default(),
            status: self
                .status
                .parse::<SubmissionStatus>()
                .unwrap_or(SubmissionStatus::Pending),
            locked_by: self.locked_by,
            locked_at: self
                .locked_at
                .and_then(|t| DateTime::<Utc>::from_timestamp(t, 0)),
            score: self.score,
            comment: self.comment,
            reviewed_at: self
                .reviewed_at
                .and_then(|t| DateTime::<Utc>::from_timestamp(t, 0)),
        }
    }
}
