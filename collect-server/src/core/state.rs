use std::sync::Arc;

use crate::availability::AvailabilityController;
use crate::catalog::{InMemoryCatalog, ProductCatalog};
use crate::core::Config;
use crate::lifecycle::{LifecycleManager, LifecycleStorage};
use crate::sweeper::StaleOrderSweeper;
use crate::sync::SyncService;

/// 服务器状态 - 持有所有服务的单例引用
///
/// ServerState 是节点的核心数据结构，持有所有服务的共享引用。
/// 使用 Arc 实现浅拷贝，所有权成本极低。
///
/// # 服务组件
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | manager | Arc<LifecycleManager> | 订单状态机 |
/// | availability | Arc<AvailabilityController> | 准入闸门 |
/// | sync | Arc<SyncService> | 厨房端同步 |
/// | catalog | Arc<dyn ProductCatalog> | 商品目录协作方 |
#[derive(Clone)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// 订单生命周期引擎
    pub manager: Arc<LifecycleManager>,
    /// 店铺准入控制
    pub availability: Arc<AvailabilityController>,
    /// 同步服务
    pub sync: Arc<SyncService>,
    /// 商品目录
    pub catalog: Arc<dyn ProductCatalog>,
}

impl ServerState {
    /// 初始化服务器状态
    ///
    /// 按顺序初始化：
    /// 1. 工作目录结构
    /// 2. redb 存储 (work_dir/database/orders.redb)
    /// 3. 协作方 (catalog, notifier)
    /// 4. 引擎 (manager + availability + sync)
    ///
    /// # Panics
    ///
    /// 存储初始化失败时 panic
    pub fn initialize(config: &Config) -> Self {
        Self::initialize_with_catalog(config, Arc::new(InMemoryCatalog::new()))
    }

    /// 初始化服务器状态，注入外部商品目录
    ///
    /// 测试与嵌入场景使用
    pub fn initialize_with_catalog(config: &Config, catalog: Arc<dyn ProductCatalog>) -> Self {
        config
            .ensure_work_dir_structure()
            .expect("Failed to create work directory structure");

        let db_path = config.database_dir().join("orders.redb");
        let storage =
            LifecycleStorage::open(&db_path).expect("Failed to open order storage");

        let notifier = crate::notify::from_config(&config.notifier, config.webhook_url.as_deref());
        let availability = Arc::new(AvailabilityController::new());

        let mut manager = LifecycleManager::new(
            storage,
            catalog.clone(),
            notifier,
            config.lifecycle_settings(),
        );
        manager.set_availability(availability.clone());
        let manager = Arc::new(manager);

        let sync = Arc::new(SyncService::new(manager.clone()));

        Self {
            config: config.clone(),
            manager,
            availability,
            sync,
            catalog,
        }
    }

    /// 构造清扫器 (后台任务与手动触发共用)
    pub fn sweeper(&self) -> StaleOrderSweeper {
        StaleOrderSweeper::new(self.manager.clone(), self.availability.clone())
    }

    /// 启动后台任务
    ///
    /// 必须在 `Server::run()` 之前调用
    pub fn start_background_tasks(&self) {
        crate::core::tasks::spawn_sweeper(self.clone());
    }
}
