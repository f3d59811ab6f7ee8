use serde::{Deserialize, Serialize};

// 提交生命周期状态
//
// pending -> in_review -> reviewed，单向推进：
// pending -> in_review 只由认领协议触发，in_review -> reviewed 只由评分触发。
// 租约回收（运维补充能力）是唯一允许 in_review 回到 pending 的路径。
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    Pending,  // 待批阅
    InReview, // 已被某位教师认领
    Reviewed, // 已评分，终态
}

impl SubmissionStatus {
    pub const PENDING: &'static str = "pending";
    pub const IN_REVIEW: &'static str = "in_review";
    pub const REVIEWED: &'static str = "reviewed";
}

impl<'de> Deserialize<'de> for SubmissionStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        match s.as_str() {
            "pending" => Ok(SubmissionStatus::Pending),
            "in_review" => Ok(SubmissionStatus::InReview),
            "reviewed" => Ok(SubmissionStatus::Reviewed),
            _ => Err(serde::de::Error::custom(format!(
                "无效的提交状态: '{s}'. 支持的状态: pending, in_review, reviewed"
            ))),
        }
    }
}

impl std::fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubmissionStatus::Pending => write!(f, "pending"),
            SubmissionStatus::InReview => write!(f, "in_review"),
            SubmissionStatus::Reviewed => write!(f, "reviewed"),
        }
    }
}

impl std::str::FromStr for SubmissionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(SubmissionStatus::Pending),
            "in_review" => Ok(SubmissionStatus::InReview),
            "reviewed" => Ok(SubmissionStatus::Reviewed),
            _ => Err(format!("Invalid submission status: {s}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Submission {
    // 唯一 ID
    pub id: i64,
    // 所属任务 ID
    pub assignment_id: i64,
    // 提交者 ID
    pub user_id: i64,
    // 提交者的变体号
    pub variant_number: i32,
    // 文本答案
    pub text_answer: Option<String>,
    // 文件/外部链接
    pub file_url: Option<String>,
    // 提交时间
    pub submitted_at: chrono::DateTime<chrono::Utc>,
    // 生命周期状态
    pub status: SubmissionStatus,
    // 锁持有者（批阅教师），与 locked_at 同设同清
    pub locked_by: Option<i64>,
    // 认领时间
    pub locked_at: Option<chrono::DateTime<chrono::Utc>>,
    // 评分 0..=100，仅终态有值
    pub score: Option<i32>,
    // 批语
    pub comment: Option<String>,
    // 评分时间
    pub reviewed_at: Option<chrono::DateTime<chrono::Utc>>,
}
