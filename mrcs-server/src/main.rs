//! 孕产妇风险分类服务主程序

use std::net::SocketAddr;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use mrcs_model::{registry, ArtifactPaths};
use mrcs_web::WebServer;

mod config;
use config::MrcsConfig;

/// 服务器命令行参数
#[derive(Parser, Debug)]
#[command(name = "mrcs-server")]
#[command(about = "孕产妇妊娠风险分类服务 (Maternal Risk Classification Service)")]
struct Args {
    /// 监听主机
    #[arg(long)]
    host: Option<String>,

    /// 监听端口
    #[arg(short, long)]
    port: Option<u16>,

    /// 流水线工件路径
    #[arg(short, long)]
    model_path: Option<String>,

    /// 标签解码器工件路径
    #[arg(short, long)]
    encoder_path: Option<String>,

    /// 配置文件路径
    #[arg(short, long)]
    config: Option<String>,

    /// 日志级别
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // 初始化日志
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&args.log_level))
        .init();

    info!("启动孕产妇风险分类服务...");

    // 加载配置并套用命令行覆盖
    let mut config = MrcsConfig::load(args.config.as_deref())?;
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(model_path) = args.model_path {
        config.artifacts.model_path = model_path;
    }
    if let Some(encoder_path) = args.encoder_path {
        config.artifacts.encoder_path = encoder_path;
    }
    config.validate()?;

    let paths = ArtifactPaths::new(
        &config.artifacts.model_path,
        &config.artifacts.encoder_path,
    );

    info!("服务配置:");
    info!("  监听地址: {}:{}", config.server.host, config.server.port);
    info!("  流水线工件: {}", paths.model_path.display());
    info!("  标签工件: {}", paths.encoder_path.display());

    // 启动前独占加载工件，任一失败都拒绝提供页面
    let artifacts = match registry::global().get_or_load(&paths) {
        Ok(artifacts) => artifacts,
        Err(e) => {
            error!("工件加载失败, 服务中止: {}", e);
            return Err(e.into());
        }
    };
    info!(
        "模型 {} 就绪, 风险等级: {:?}",
        artifacts.pipeline.model_name,
        artifacts.decoder.classes()
    );

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("监听地址无效")?;

    // 启动Web服务器
    let server = WebServer::new(addr, artifacts);
    if let Err(e) = server.run().await {
        error!("服务器启动失败: {}", e);
        return Err(e.into());
    }

    Ok(())
}
