//! 业务数据模型
//!
//! 与 entity 模块的数据库实体分离，时间戳在转换时统一为 chrono 类型。

pub mod assignments;
pub mod groups;
pub mod review_sessions;
pub mod submissions;
pub mod variants;

pub use submissions::entities::{Submission, SubmissionStatus};
