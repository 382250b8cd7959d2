use actix_cors::Cors;
use actix_web::dev::Server;
use actix_web::{web, App, HttpServer};
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::net::TcpListener;
use tracing_actix_web::TracingLogger;

use crate::checkout_client::CheckoutClient;
use crate::configuration::{CheckoutSettings, DatabaseSettings, SecretSetting, Settings, UserSettings};
use crate::routes::main_route;

pub struct Application {
    port: u16,
    server: Server,
}

impl Application {
    pub async fn build(configuration: Settings) -> Result<Self, anyhow::Error> {
        let connection_pool = get_connection_pool(&configuration.database);
        let checkout_client = CheckoutClient::new(
            configuration.checkout.base_url.clone(),
            configuration.checkout.secret_key.clone(),
            configuration.checkout.timeout(),
        );
        let address = format!(
            "{}:{}",
            configuration.application.host, configuration.application.port
        );
        let listener = TcpListener::bind(&address)?;
        let port = listener.local_addr()?.port();
        tracing::info!("Listening on {}", address);
        let server = run(
            listener,
            connection_pool,
            checkout_client,
            configuration.secret,
            configuration.user,
            configuration.checkout,
            configuration.application.workers,
        )
        .await?;
        Ok(Self { port, server })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        self.server.await
    }
}

pub fn get_connection_pool(configuration: &DatabaseSettings) -> PgPool {
    PgPoolOptions::new()
        .acquire_timeout(std::time::Duration::from_secs(
            configuration.acquire_timeout_seconds,
        ))
        .connect_lazy_with(configuration.with_db())
}

async fn run(
    listener: TcpListener,
    db_pool: PgPool,
    checkout_client: CheckoutClient,
    secret: SecretSetting,
    user_setting: UserSettings,
    checkout_setting: CheckoutSettings,
    workers: usize,
) -> Result<Server, anyhow::Error> {
    let db_pool = web::Data::new(db_pool);
    let checkout_client = web::Data::new(checkout_client);
    let secret_obj = web::Data::new(secret);
    let user_setting_obj = web::Data::new(user_setting);
    let checkout_setting_obj = web::Data::new(checkout_setting);
    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .wrap(Cors::permissive())
            .app_data(db_pool.clone())
            .app_data(checkout_client.clone())
            .app_data(secret_obj.clone())
            .app_data(user_setting_obj.clone())
            .app_data(checkout_setting_obj.clone())
            .configure(main_route)
    })
    .workers(workers)
    .listen(listener)?
    .run();

    Ok(server)
}
