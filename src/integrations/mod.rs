//! 外部消息通道
//!
//! 核心对通知是“发出即忘”：发送失败只记录日志，绝不回滚已提交的状态变更。
//! 具体通道（机器人 API、webhook 等）由宿主系统注入实现。

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

/// 出站通知接口
#[async_trait]
pub trait Notifier: Send + Sync {
    /// 给单个用户发送一条文本消息，返回是否发送成功
    async fn notify(&self, user_id: i64, text: &str) -> bool;
}

/// 仅写日志的通知实现，用于开发环境和没有配置真实通道的部署
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, user_id: i64, text: &str) -> bool {
        info!("通知用户 {}: {}", user_id, text);
        true
    }
}

pub fn create_notifier() -> Arc<dyn Notifier> {
    Arc::new(LogNotifier)
}

#[cfg(test)]
pub mod testing {
    use super::*;
    use tokio::sync::Mutex;

    /// 记录所有外发消息的测试实现
    #[derive(Default)]
    pub struct RecordingNotifier {
        pub sent: Mutex<Vec<(i64, String)>>,
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        async fn notify(&self, user_id: i64, text: &str) -> bool {
            self.sent.lock().await.push((user_id, text.to_string()));
            true
        }
    }

    impl RecordingNotifier {
        pub async fn messages_for(&self, user_id: i64) -> Vec<String> {
            self.sent
                .lock()
                .await
                .iter()
                .filter(|(uid, _)| *uid == user_id)
                .map(|(_, text)| text.clone())
                .collect()
        }
    }
}
