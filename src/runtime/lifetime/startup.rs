use std::sync::Arc;

use tracing::warn;

use crate::integrations::{Notifier, create_notifier};
use crate::services::{AssignmentService, ReviewService};
use crate::storage::Storage;

pub struct StartupContext {
    pub storage: Arc<dyn Storage>,
    pub notifier: Arc<dyn Notifier>,
    pub assignments: Arc<AssignmentService>,
    pub review: Arc<ReviewService>,
}

/// 准备服务启动的上下文
/// 包括存储、通知渠道和业务服务
pub async fn prepare_server_startup() -> StartupContext {
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    let storage = crate::storage::create_storage()
        .await
        .expect("Failed to create storage backend");
    warn!("Storage backend initialized and migrations completed");

    let notifier = create_notifier();

    let assignments = Arc::new(AssignmentService::new(storage.clone(), notifier.clone()));
    let review = Arc::new(ReviewService::new(storage.clone(), notifier.clone()));

    StartupContext {
        storage,
        notifier,
        assignments,
        review,
    }
}
