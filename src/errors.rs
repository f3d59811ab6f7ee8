//! 统一错误处理模块
//!
//! 使用宏自动生成错误类型，支持错误代码和类型名称。
//! 业务规则失败（认领、评分、权限）与存储基础设施失败共用同一套错误枚举，
//! 调用方通过 code() 区分并决定是否把 message 原样回显给最终用户。

use std::fmt;

/// 定义错误类型的宏
///
/// 自动生成：
/// - enum 定义
/// - code() 方法 - 返回错误代码
/// - error_type() 方法 - 返回错误类型名称
/// - message() 方法 - 返回错误详情
/// - 便捷构造函数
macro_rules! define_reviewflow_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal)
    ),* $(,)?) => {
        #[derive(Debug, Clone)]
        pub enum ReviewFlowError {
            $($variant(String),)*
        }

        impl ReviewFlowError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(ReviewFlowError::$variant(_) => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(ReviewFlowError::$variant(_) => $type_name,)*
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> &str {
                match self {
                    $(ReviewFlowError::$variant(msg) => msg,)*
                }
            }
        }

        // 生成便捷构造函数
        paste::paste! {
            impl ReviewFlowError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        ReviewFlowError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_reviewflow_errors! {
    // 存储基础设施错误（相当于 StorageUnavailable，是否重试由调用方决定）
    DatabaseConfig("E001", "Database Configuration Error"),
    DatabaseConnection("E002", "Database Connection Error"),
    DatabaseOperation("E003", "Database Operation Error"),
    Serialization("E004", "Serialization Error"),
    DateParse("E005", "Date Parse Error"),
    Validation("E006", "Validation Error"),
    // 业务规则错误，均为本地校验失败，核心不做自动重试
    NotFound("E101", "Resource Not Found"),
    Forbidden("E102", "Permission Denied"),
    InvalidVariantCount("E103", "Invalid Variant Count"),
    InvalidScore("E104", "Invalid Score"),
    DeadlinePassed("E105", "Deadline Passed"),
    NotYetClaimed("E106", "Submission Not Yet Claimed"),
    LockedByOther("E107", "Submission Locked By Another Reviewer"),
    AlreadyReviewed("E108", "Submission Already Reviewed"),
}

impl ReviewFlowError {
    /// 格式化为彩色输出（用于开发环境）
    #[cfg(debug_assertions)]
    pub fn format_colored(&self) -> String {
        format!(
            "\x1b[1;31m[ERROR]\x1b[0m \x1b[33m{}\x1b[0m \x1b[31m{}\x1b[0m\n  {}",
            self.code(),
            self.error_type(),
            self.message()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for ReviewFlowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for ReviewFlowError {}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for ReviewFlowError {
    fn from(err: sea_orm::DbErr) -> Self {
        ReviewFlowError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for ReviewFlowError {
    fn from(err: std::io::Error) -> Self {
        ReviewFlowError::DatabaseOperation(err.to_string())
    }
}

impl From<serde_json::Error> for ReviewFlowError {
    fn from(err: serde_json::Error) -> Self {
        ReviewFlowError::Serialization(err.to_string())
    }
}

impl From<chrono::ParseError> for ReviewFlowError {
    fn from(err: chrono::ParseError) -> Self {
        ReviewFlowError::DateParse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ReviewFlowError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(ReviewFlowError::database_config("test").code(), "E001");
        assert_eq!(ReviewFlowError::not_found("test").code(), "E101");
        assert_eq!(
            ReviewFlowError::invalid_variant_count("test").code(),
            "E103"
        );
        assert_eq!(ReviewFlowError::locked_by_other("test").code(), "E107");
    }

    #[test]
    fn test_error_types() {
        assert_eq!(
            ReviewFlowError::invalid_score("test").error_type(),
            "Invalid Score"
        );
        assert_eq!(
            ReviewFlowError::not_yet_claimed("test").error_type(),
            "Submission Not Yet Claimed"
        );
    }

    #[test]
    fn test_error_message() {
        let err = ReviewFlowError::forbidden("仅群组教师可操作");
        assert_eq!(err.message(), "仅群组教师可操作");
    }

    #[test]
    fn test_format_simple() {
        let err = ReviewFlowError::already_reviewed("submission 42");
        let formatted = err.format_simple();
        assert!(formatted.contains("Already Reviewed"));
        assert!(formatted.contains("submission 42"));
    }
}
