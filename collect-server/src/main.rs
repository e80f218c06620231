use collect_server::{Config, Server, ServerState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. 设置环境 (dotenv, 日志)
    let _ = dotenv::dotenv();

    // 2. 加载配置
    let config = Config::from_env();
    config.ensure_work_dir_structure()?;
    collect_server::init_logger_with_file(
        std::env::var("LOG_LEVEL").ok().as_deref(),
        config.logs_dir().to_str(),
    );

    tracing::info!("Collect Server starting...");

    // 3. 初始化服务器状态
    let state = ServerState::initialize(&config);

    // 4. 启动 HTTP 服务器 (Server::run 会自动启动后台任务)
    let server = Server::with_state(config, state);

    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
