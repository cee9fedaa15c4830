use calorie_web::config::Config;
use calorie_web::routes;
use calorie_web::state::AppState;

#[tokio::main]
async fn main() {
    // A missing `.env` is fine: production sets real environment variables.
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt::init();

    let config = Config::from_env().expect("invalid configuration");
    tracing::info!(api_base_url = %config.api_base_url, "configuration loaded");

    let state = AppState::new(&config);
    let app = routes::app(state);

    let port = config.port;
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, "calorie-web listening");
    axum::serve(listener, app).await.expect("server failed");
}
