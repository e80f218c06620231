use crate::lifecycle::LifecycleSettings;
use std::path::PathBuf;

/// 服务器配置 - 自提订单节点的所有配置项
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | /var/lib/collect | 工作目录 |
/// | HTTP_PORT | 3000 | HTTP 服务端口 |
/// | ENVIRONMENT | development | 运行环境 |
/// | NOTIFIER | log | 通知实现: log \| webhook |
/// | WEBHOOK_URL | - | webhook 通知地址 |
/// | WEIGHT_TOLERANCE_PERCENT | 10 | 称重差额容忍度 (%) |
/// | PENDING_TIMEOUT_MINUTES | 60 | PENDING 订单超时 (分钟) |
/// | SWEEP_INTERVAL_MINUTES | 15 | 清扫周期 (分钟) |
/// | RESERVATION_HOLD_MINUTES | 30 | 购物车预留时长 (分钟) |
/// | AUTO_PAUSE_THRESHOLD | 3 | 触发自动暂停的超时订单数 |
/// | AUTO_PAUSE_WINDOW_MINUTES | 30 | 自动暂停统计窗口 (分钟) |
///
/// # 示例
///
/// ```ignore
/// WORK_DIR=/data/collect HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录，存储数据库、日志等文件
    pub work_dir: String,
    /// HTTP API 服务端口
    pub http_port: u16,
    /// 运行环境: development | staging | production
    pub environment: String,
    /// 通知实现选择
    pub notifier: String,
    /// webhook 通知地址 (notifier = webhook 时必填)
    pub webhook_url: Option<String>,
    /// 称重差额容忍度 (%)
    pub weight_tolerance_percent: f64,
    /// PENDING 订单超时 (分钟)
    pub pending_timeout_minutes: u32,
    /// 清扫周期 (分钟)
    pub sweep_interval_minutes: u64,
    /// 购物车预留时长 (分钟)
    pub reservation_hold_minutes: u32,
    /// 触发自动暂停的超时订单数
    pub auto_pause_threshold: usize,
    /// 自动暂停统计窗口 (分钟)
    pub auto_pause_window_minutes: i64,
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/collect".into()),
            http_port: env_parse("HTTP_PORT", 3000),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            notifier: std::env::var("NOTIFIER").unwrap_or_else(|_| "log".into()),
            webhook_url: std::env::var("WEBHOOK_URL").ok(),
            weight_tolerance_percent: env_parse("WEIGHT_TOLERANCE_PERCENT", 10.0),
            pending_timeout_minutes: env_parse("PENDING_TIMEOUT_MINUTES", 60),
            sweep_interval_minutes: env_parse("SWEEP_INTERVAL_MINUTES", 15),
            reservation_hold_minutes: env_parse("RESERVATION_HOLD_MINUTES", 30),
            auto_pause_threshold: env_parse("AUTO_PAUSE_THRESHOLD", 3),
            auto_pause_window_minutes: env_parse("AUTO_PAUSE_WINDOW_MINUTES", 30),
        }
    }

    /// 使用自定义值覆盖部分配置
    ///
    /// 常用于测试场景
    pub fn with_overrides(work_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.http_port = http_port;
        config
    }

    /// 数据库目录
    pub fn database_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("database")
    }

    /// 日志目录
    pub fn logs_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("logs")
    }

    /// 确保工作目录结构存在
    pub fn ensure_work_dir_structure(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(self.database_dir())?;
        std::fs::create_dir_all(self.logs_dir())?;
        Ok(())
    }

    /// 生命周期引擎参数
    pub fn lifecycle_settings(&self) -> LifecycleSettings {
        LifecycleSettings {
            weight_tolerance_percent: self.weight_tolerance_percent,
            pending_timeout_minutes: self.pending_timeout_minutes,
            auto_pause_threshold: self.auto_pause_threshold,
            auto_pause_window_minutes: self.auto_pause_window_minutes,
        }
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
