mod logging;
mod settings;
mod wiring;

use tracing::info;

/// # Summary
/// 应用启动入口，纯粹的 DI 容器。
/// 负责加载配置、初始化日志，并把具体实现组装进 API 服务。
///
/// # Logic
/// 1. 加载配置 (默认值 → 配置文件 → 环境变量)。
/// 2. 初始化全局日志。
/// 3. 组装数据源、Provider 与仪表盘服务。
/// 4. 启动 HTTP 服务，直到收到退出信号。
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. 加载配置
    let config = settings::load()?;

    // 2. 初始化日志，守卫需存活到进程退出
    let _log_guard = logging::init(&config.logging);
    info!("OrbitDeck starting...");
    info!(credentials = ?config.credentials, city = %config.providers.city, "Configuration loaded");

    // 3. 组装依赖
    let state = wiring::build_state(&config);

    // 4. 启动服务
    orbitdeck_api::server::start_server(state, &config.server.bind_addr()).await?;

    info!("OrbitDeck stopped");
    Ok(())
}
