//! Collect Server - 单店自提订单引擎 (click & collect edge node)
//!
//! # 架构概述
//!
//! 本模块是自提订单服务的主入口，提供以下核心功能：
//!
//! - **生命周期** (`lifecycle`): 订单状态机，事件溯源 + 条件提交
//! - **准入** (`availability`): 店铺可用性闸门（容量、暂停、休假）
//! - **对账** (`reconcile`): 缺货替换与称重差额
//! - **同步** (`sync`): 厨房端实时同步（轮询 + SSE 推送）
//! - **HTTP API** (`api`): RESTful API 接口
//!
//! # 模块结构
//!
//! ```text
//! collect-server/src/
//! ├── core/          # 配置、状态、后台任务
//! ├── lifecycle/     # 订单状态机（actions / appliers / storage / manager）
//! ├── availability/  # 准入控制、容量窗口、预留台账
//! ├── reconcile/     # 缺货与称重对账
//! ├── notify/        # 通知协作方（log / webhook）
//! ├── sync/          # 厨房端同步
//! ├── api/           # HTTP 路由和处理器
//! └── utils/         # 工具函数
//! ```

pub mod api;
pub mod availability;
pub mod catalog;
pub mod core;
pub mod lifecycle;
pub mod notify;
pub mod payment;
pub mod pickup;
pub mod reconcile;
pub mod sweeper;
pub mod sync;
pub mod utils;

// Re-export 公共类型
pub use availability::AvailabilityController;
pub use catalog::{InMemoryCatalog, ProductCatalog, ProductInfo};
pub use core::{Config, Server, ServerState};
pub use lifecycle::{LifecycleManager, LifecycleStorage};
pub use notify::Notifier;
pub use sweeper::StaleOrderSweeper;
pub use sync::SyncService;

// Re-export unified error types from shared
pub use shared::error::{ApiResponse, AppError, AppResult, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};
