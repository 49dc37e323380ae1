//! Sage - Rust 研究助理对话前端
//!
//! 入口：初始化日志、加载配置、构建编排器并运行主循环；Ctrl-C 视为外部中断。
//! 运行时手动构建并以 shutdown_background 结束：stdin 的阻塞读取不会拖住退出。

use anyhow::Context;
use sage::config::{load_config, AppConfig};
use sage::{observability, OrchestratorBuilder};

fn main() -> anyhow::Result<()> {
    observability::init();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to build tokio runtime")?;
    let result = runtime.block_on(run());
    runtime.shutdown_background();
    result
}

async fn run() -> anyhow::Result<()> {
    let cfg = load_config(None).unwrap_or_else(|e| {
        tracing::warn!("Config load failed ({}), using defaults", e);
        AppConfig::default()
    });

    let mut orchestrator = OrchestratorBuilder::new(cfg)
        .build()
        .context("Failed to build orchestrator")?;

    tokio::select! {
        _ = orchestrator.run() => {}
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Interrupted, exiting");
        }
    }

    Ok(())
}
