//! Web服务器

use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

use mrcs_core::{MrcsError, Result};
use mrcs_model::LoadedArtifacts;

use crate::form;
use crate::handlers::{health, model_info, predict};

/// Web层共享状态：加载完成后只读的工件对
#[derive(Clone)]
pub struct AppState {
    pub artifacts: Arc<LoadedArtifacts>,
}

pub struct WebServer {
    addr: SocketAddr,
    app: Router,
}

impl WebServer {
    /// 由监听地址与已加载的工件构建服务器
    ///
    /// 工件必须在这之前加载成功；没有工件就不应该提供任何页面
    pub fn new(addr: SocketAddr, artifacts: Arc<LoadedArtifacts>) -> Self {
        let app = Self::create_app(AppState { artifacts });
        Self { addr, app }
    }

    fn create_app(state: AppState) -> Router {
        Router::new()
            // 单页预测表单
            .route("/", get(form::form_page))

            // 健康检查
            .route("/health", get(health))

            // API路由
            .nest("/api/v1", api_routes())
            .with_state(state)

            // 全局中间件
            .layer(
                ServiceBuilder::new()
                    .layer(TraceLayer::new_for_http())
                    .layer(
                        CorsLayer::new()
                            .allow_origin(Any)
                            .allow_methods(Any)
                            .allow_headers(Any),
                    ),
            )
    }

    pub async fn run(self) -> Result<()> {
        info!("Starting web server on {}", self.addr);

        let listener = tokio::net::TcpListener::bind(self.addr).await?;
        axum::serve(listener, self.app)
            .await
            .map_err(|e| MrcsError::Internal(format!("Failed to start web server: {}", e)))?;

        Ok(())
    }
}

/// API v1 路由
fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/predict", post(predict))
        .route("/model", get(model_info))
}
