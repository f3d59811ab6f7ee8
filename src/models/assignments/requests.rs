use serde::{Deserialize, Serialize};

// 创建任务请求
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAssignmentRequest {
    pub group_id: i64,
    pub variants_count: i32,
    pub deadline: chrono::DateTime<chrono::Utc>,
    pub title: String,
    pub description: Option<String>,
}

// 提交答案请求，文本与文件链接至少其一
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitRequest {
    pub assignment_id: i64,
    pub text_answer: Option<String>,
    pub file_url: Option<String>,
}
