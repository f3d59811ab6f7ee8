use serde::{Deserialize, Serialize};

// 一位教师对一个任务的批阅开关
//
// (assignment_id, reviewer_id) 维度唯一，upsert 语义，跨重启持久。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewSession {
    pub id: i64,
    pub assignment_id: i64,
    pub reviewer_id: i64,
    pub active: bool,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
