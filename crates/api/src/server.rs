//! # API 服务启动器
//!
//! 组装 axum 路由、挂载 Swagger UI、配置 CORS 并绑定 TCP 端口对外提供服务。
//! 本模块不直接启动 `main()`, 而是由 `crates/app` 完成依赖组装后调用。

use std::sync::Arc;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;
use utoipa_swagger_ui::SwaggerUi;

use orbitdeck_core::chart::port::ChartRenderer;
use orbitdeck_dashboard::service::DashboardService;

use crate::routes::{chart, dashboard, history, index, layout};

// ============================================================
//  共享应用状态
// ============================================================

/// 全局应用状态，通过 axum 的 `State` 提取器注入到每个 Handler 中。
///
/// # Invariants
/// - 所有字段在服务启动前注入，生命周期与进程等同。
/// - 不含跨请求可变状态，卡片顺序由客户端 Cookie 携带。
#[derive(Clone)]
pub struct AppState {
    /// 仪表盘服务 (组合三个数据提供者)
    pub dashboard: Arc<DashboardService>,
    /// 图表渲染器
    pub charts: Arc<dyn ChartRenderer>,
}

impl AppState {
    pub fn new(dashboard: Arc<DashboardService>, charts: Arc<dyn ChartRenderer>) -> Self {
        Self { dashboard, charts }
    }
}

// ============================================================
//  OpenAPI 文档定义
// ============================================================

/// 全局 OpenAPI 文档结构
#[derive(OpenApi)]
#[openapi(
    info(
        title = "OrbitDeck API",
        version = "0.1.0",
        description = "航天仪表盘 API：地球/火星天气、航天板块股票、航天新闻与历史图表。外部数据源不可用时返回带 origin 标签的兜底或模拟数据。",
        license(name = "MIT")
    ),
    tags(
        (name = "仪表盘 (Dashboard)", description = "当前天气、股票、新闻与完整快照"),
        (name = "历史 (History)", description = "按天回溯的历史序列"),
        (name = "图表 (Chart)", description = "历史序列的 SVG 折线图"),
        (name = "布局 (Layout)", description = "保存在 Cookie 中的卡片顺序")
    )
)]
pub struct ApiDoc;

// ============================================================
//  服务构建与启动
// ============================================================

/// 构建完整的 axum 应用路由树。
///
/// # Logic
/// 1. 注册全部带 OpenAPI 注解的路由。
/// 2. 挂载会话中间件，所有路由都能取到卡片顺序。
/// 3. 合并 Swagger UI 并配置 CORS。
///
/// # Arguments
/// * `state` - 由外部注入的共享状态
pub fn build_router(state: AppState) -> Router {
    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .routes(routes!(index::index))
        .routes(routes!(dashboard::get_weather))
        .routes(routes!(dashboard::get_stocks))
        .routes(routes!(dashboard::get_news))
        .routes(routes!(dashboard::get_dashboard))
        .routes(routes!(history::weather_history))
        .routes(routes!(history::stock_history))
        .routes(routes!(history::news_history))
        .routes(routes!(chart::weather_chart))
        .routes(routes!(chart::stock_chart))
        .routes(routes!(layout::get_layout, layout::update_layout))
        .routes(routes!(layout::reset_layout))
        .layer(axum::middleware::from_fn(
            crate::middleware::session::session_middleware,
        ))
        .with_state(state)
        .split_for_parts();

    // 开发阶段允许所有来源
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    router
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api))
        .layer(cors)
}

/// 等待 Ctrl+C，用于优雅停机
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

/// 绑定端口并启动 HTTP 服务，收到 Ctrl+C 后优雅退出。
///
/// # Arguments
/// * `state` - 由外部注入的共享状态
/// * `bind_addr` - 监听的地址与端口，如 `"0.0.0.0:8080"`
///
/// # Returns
/// 端口绑定或服务运行失败时返回错误。
pub async fn start_server(
    state: AppState,
    bind_addr: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let app = build_router(state);

    tracing::info!("🚀 OrbitDeck listening on {}", bind_addr);
    tracing::info!("📖 Swagger UI: http://{}/swagger-ui/", bind_addr);

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
