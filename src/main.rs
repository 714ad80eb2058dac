use actix_web::{middleware, App, HttpServer};
use exitfailure::ExitFailure;
use runners_high::{cookie_key, identity_middleware, session_middleware, AppState, Config};
use tracing_subscriber::EnvFilter;

#[actix_rt::main]
async fn main() -> Result<(), ExitFailure> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "runners_high=info,actix_web=info".into()),
        )
        .init();

    let config = Config::from_env()?;
    let key = cookie_key(&config);
    let state = AppState::new(&config)?;

    tracing::info!("redirect base: {}", config.redirect_base_url);
    tracing::info!("listening on {}", config.bind_addr);

    let bind_addr = config.bind_addr.clone();
    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::default())
            .wrap(identity_middleware(&config))
            .wrap(session_middleware(&config, key.clone()))
            .configure(|cfg| state.configure(cfg))
    })
    .bind(bind_addr)?
    .run()
    .await?;

    Ok(())
}
