//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。
//! 认领协议的互斥在这里实现：每个任务一把进程内互斥锁，锁内完成
//! “选最旧 pending + 置为 in_review”的事务，见 submissions 子模块。

mod assignments;
mod groups;
mod review_sessions;
mod submissions;
mod variants;

use crate::config::AppConfig;
use crate::errors::{ReviewFlowError, Result};
use dashmap::DashMap;
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
    // 任务 ID -> 认领互斥锁。共享同一张表的克隆实例必须共享同一组锁
    pub(crate) claim_locks: Arc<DashMap<i64, Arc<Mutex<()>>>>,
}

impl SeaOrmStorage {
    /// 从全局配置创建存储实例
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        Self::new_with_url(
            &config.database.url,
            config.database.pool_size,
            config.database.timeout,
        )
        .await
    }

    /// 用显式连接参数创建存储实例（测试里直接传 sqlite 内存库）
    pub async fn new_with_url(url: &str, pool_size: u32, timeout: u64) -> Result<Self> {
        let db_url = Self::build_database_url(url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite://") {
            Self::connect_sqlite(&db_url, pool_size, timeout).await?
        } else {
            Self::connect_generic(&db_url, pool_size, timeout).await?
        };

        // 运行迁移
        Migrator::up(&db, None)
            .await
            .map_err(|e| ReviewFlowError::database_operation(format!("数据库迁移失败: {e}")))?;

        info!("SeaORM 存储初始化完成，数据库: {}", db_url);

        Ok(Self {
            db,
            claim_locks: Arc::new(DashMap::new()),
        })
    }

    /// 取某个任务的认领互斥锁
    pub(crate) fn claim_lock(&self, assignment_id: i64) -> Arc<Mutex<()>> {
        self.claim_locks
            .entry(assignment_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(url: &str, pool_size: u32, timeout: u64) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| ReviewFlowError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory");

        // 内存库只能单连接，多个连接各自是独立的空库
        let max_connections = if url.contains(":memory:") { 1 } else { pool_size };

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(timeout))
            .idle_timeout(Duration::from_secs(300))
            .connect_with(opt)
            .await
            .map_err(|e| ReviewFlowError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, pool_size: u32, timeout: u64) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(pool_size)
            .min_connections(5)
            .connect_timeout(Duration::from_secs(timeout))
            .acquire_timeout(Duration::from_secs(timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt)
            .await
            .map_err(|e| ReviewFlowError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite://") {
            Ok(url.to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") || url == ":memory:" {
            Ok(format!("sqlite://{}?mode=rwc", url))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(ReviewFlowError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }
}

// Storage trait 实现
use crate::models::{
    assignments::{entities::Assignment, requests::CreateAssignmentRequest},
    groups::entities::{Group, GroupMember, GroupRole},
    review_sessions::entities::ReviewSession,
    submissions::entities::Submission,
    variants::entities::VariantAssignment,
};
use crate::storage::Storage;
use async_trait::async_trait;

#[async_trait]
impl Storage for SeaOrmStorage {
    // 群组模块
    async fn create_group(&self, owner_id: i64, name: &str) -> Result<Group> {
        self.create_group_impl(owner_id, name).await
    }

    async fn get_group_by_id(&self, group_id: i64) -> Result<Option<Group>> {
        self.get_group_by_id_impl(group_id).await
    }

    async fn add_group_member(
        &self,
        group_id: i64,
        user_id: i64,
        role: GroupRole,
    ) -> Result<GroupMember> {
        self.add_group_member_impl(group_id, user_id, role).await
    }

    async fn list_group_students(&self, group_id: i64) -> Result<Vec<i64>> {
        self.list_group_members_by_role_impl(group_id, GroupRole::Student)
            .await
    }

    async fn list_group_teachers(&self, group_id: i64) -> Result<Vec<i64>> {
        self.list_group_members_by_role_impl(group_id, GroupRole::Teacher)
            .await
    }

    async fn is_teacher(&self, group_id: i64, user_id: i64) -> Result<bool> {
        self.is_teacher_impl(group_id, user_id).await
    }

    async fn is_member(&self, group_id: i64, user_id: i64) -> Result<bool> {
        self.is_member_impl(group_id, user_id).await
    }

    // 任务模块
    async fn create_assignment(
        &self,
        created_by: i64,
        request: CreateAssignmentRequest,
    ) -> Result<Assignment> {
        self.create_assignment_impl(created_by, request).await
    }

    async fn get_assignment_by_id(&self, assignment_id: i64) -> Result<Option<Assignment>> {
        self.get_assignment_by_id_impl(assignment_id).await
    }

    // 变体分配模块
    async fn insert_variant_assignments(
        &self,
        assignment_id: i64,
        mapping: &[(i64, i32)],
    ) -> Result<()> {
        self.insert_variant_assignments_impl(assignment_id, mapping)
            .await
    }

    async fn get_variant_assignment(
        &self,
        assignment_id: i64,
        user_id: i64,
    ) -> Result<Option<VariantAssignment>> {
        self.get_variant_assignment_impl(assignment_id, user_id)
            .await
    }

    async fn get_or_create_variant_assignment(
        &self,
        assignment_id: i64,
        user_id: i64,
        variant_number: i32,
    ) -> Result<VariantAssignment> {
        self.get_or_create_variant_assignment_impl(assignment_id, user_id, variant_number)
            .await
    }

    // 提交模块
    async fn create_submission(
        &self,
        assignment_id: i64,
        user_id: i64,
        variant_number: i32,
        text_answer: Option<String>,
        file_url: Option<String>,
    ) -> Result<Submission> {
        self.create_submission_impl(assignment_id, user_id, variant_number, text_answer, file_url)
            .await
    }

    async fn get_submission_by_id(&self, submission_id: i64) -> Result<Option<Submission>> {
        self.get_submission_by_id_impl(submission_id).await
    }

    async fn claim_next_submission(
        &self,
        assignment_id: i64,
        reviewer_id: i64,
    ) -> Result<Option<Submission>> {
        self.claim_next_submission_impl(assignment_id, reviewer_id)
            .await
    }

    async fn finalize_review(
        &self,
        submission_id: i64,
        reviewer_id: i64,
        score: i32,
        comment: Option<String>,
    ) -> Result<Option<Submission>> {
        self.finalize_review_impl(submission_id, reviewer_id, score, comment)
            .await
    }

    async fn release_expired_claims(&self, lease_secs: i64) -> Result<u64> {
        self.release_expired_claims_impl(lease_secs).await
    }

    // 批阅会话模块
    async fn upsert_review_session(
        &self,
        assignment_id: i64,
        reviewer_id: i64,
        active: bool,
    ) -> Result<ReviewSession> {
        self.upsert_review_session_impl(assignment_id, reviewer_id, active)
            .await
    }

    async fn get_review_session(
        &self,
        assignment_id: i64,
        reviewer_id: i64,
    ) -> Result<Option<ReviewSession>> {
        self.get_review_session_impl(assignment_id, reviewer_id)
            .await
    }
}
