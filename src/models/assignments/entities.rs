use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assignment {
    // 唯一 ID
    pub id: i64,
    // 所属群组 ID
    pub group_id: i64,
    // 创建者（教师）ID
    pub created_by: i64,
    // 变体数量，1..=100
    pub variants_count: i32,
    // 截止时间
    pub deadline: chrono::DateTime<chrono::Utc>,
    // 任务标题
    pub title: String,
    // 任务描述
    pub description: Option<String>,
    // 创建时间
    pub created_at: chrono::DateTime<chrono::Utc>,
}
