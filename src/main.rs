//! cosmwasm-signer 主入口

use std::sync::Arc;

use anyhow::Result;
use cosmwasm_signer::{
    api,
    app_state::AppState,
    config::Config,
    infrastructure::logging::init_logging,
};

#[tokio::main]
async fn main() -> Result<()> {
    // 1. 加载环境变量
    dotenvy::dotenv().ok();

    // 2. 加载配置（CONFIG_PATH 指向的文件优先于环境变量）
    let config_path = std::env::var("CONFIG_PATH").ok();
    let config = Config::from_env_and_file(config_path.as_deref())?;

    // 3. 初始化日志
    init_logging(&config.logging).map_err(|e| anyhow::anyhow!("failed to init logging: {}", e))?;

    tracing::info!(
        chain_id = %config.chain.chain_id,
        lcd_url = %config.chain.lcd_url,
        keys_dir = %config.keystore.keys_dir,
        "starting_cosmwasm_signer"
    );

    // 4. 初始化应用状态
    let config = Arc::new(config);
    let state = Arc::new(AppState::new(config.clone())?);

    // 5. 启动服务器
    let app = api::routes(state);
    let listener = tokio::net::TcpListener::bind(&config.server.bind_addr).await?;

    tracing::info!(bind_addr = %config.server.bind_addr, "server_listening");

    axum::serve(listener, app).await?;

    Ok(())
}
