use std::sync::Arc;

use actix_web::{web, HttpServer};
use anyhow::Context;
use log::{error, info};

use gk_api::{create_app, AppState};
use gk_core::domain::entities::oauth::OAuthProvider;
use gk_core::services::{
    AuthService, AuthServiceConfig, OAuthClient, TokenService, TokenServiceConfig,
};
use gk_infra::{
    DatabasePool, HttpOAuthClient, MySqlUserRepository, RedisClient, RedisOAuthStateStore,
    RedisRevocationList,
};
use gk_shared::AppConfig;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();

    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    if let Err(e) = run().await {
        error!("Gatekeep failed: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

async fn run() -> anyhow::Result<()> {
    info!("Starting Gatekeep auth server");

    let config = AppConfig::from_env().context("invalid configuration")?;
    info!("Environment: {}", config.environment);

    let database = DatabasePool::new(config.database.clone())
        .await
        .context("failed to connect to MySQL")?;
    database
        .run_migrations()
        .await
        .context("failed to run migrations")?;

    // Redis is connected lazily; validation fails open while it is down
    let redis = RedisClient::new(config.cache.clone()).context("invalid Redis configuration")?;

    let token_service = Arc::new(TokenService::new(
        RedisRevocationList::new(redis.clone()),
        TokenServiceConfig::from_jwt_config(&config.jwt)?,
    ));

    let oauth_client =
        HttpOAuthClient::new(&config.oauth).context("failed to build the OAuth HTTP client")?;
    for provider in OAuthProvider::ALL {
        let status = if oauth_client.is_configured(provider) {
            "enabled"
        } else {
            "disabled"
        };
        info!("OAuth provider {}: {}", provider, status);
    }

    let auth_service = Arc::new(AuthService::new(
        Arc::new(MySqlUserRepository::new(database.get_pool().clone())),
        token_service,
        Arc::new(oauth_client),
        Arc::new(RedisOAuthStateStore::new(redis.clone())),
        AuthServiceConfig::default(),
    ));

    let state = web::Data::new(
        AppState::new(auth_service)
            .with_probe(Arc::new(database.clone()))
            .with_probe(Arc::new(redis)),
    );

    let bind_address = config.server.bind_address();
    info!("Server will bind to: {}", bind_address);

    let cors = config.cors.clone();
    let environment = config.environment;
    let mut server =
        HttpServer::new(move || create_app(state.clone(), &cors, environment));
    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    server
        .bind(&bind_address)
        .with_context(|| format!("failed to bind {}", bind_address))?
        .run()
        .await?;

    database.close().await;
    info!("Gatekeep stopped");
    Ok(())
}
