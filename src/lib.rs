//! ReviewFlow - 提交生命周期与批阅队列核心
//!
//! 教育机器人后端的作业分发与批阅引擎：变体分配、提交收集、
//! 认领式批阅队列与评分落库。
//!
//! # 架构
//! - `config`: 配置管理
//! - `entity`: SeaORM 数据库实体
//! - `errors`: 统一错误处理
//! - `integrations`: 外部消息通道
//! - `models`: 数据模型定义
//! - `runtime`: 运行时生命周期管理
//! - `services`: 业务逻辑层
//! - `storage`: 数据存储层（SeaORM）
//! - `utils`: 工具函数

pub mod config;
pub mod entity;
pub mod errors;
pub mod integrations;
pub mod models;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod utils;
