//! src/startup.rs

use std::net::TcpListener;
use std::sync::Arc;

use actix_web::{dev::Server, web, App, HttpServer};
use tracing_actix_web::TracingLogger;

use crate::{
    activation::ActivationTokenManager,
    configuration::Settings,
    routes::{activate, health_check},
    users::UserRepository,
};

pub struct Application {
    port: u16,
    server: Server,
}

impl Application {
    /// Fails before binding anything if the activation settings are unusable.
    pub async fn build(
        configuration: Settings,
        repository: Arc<dyn UserRepository>,
    ) -> Result<Self, anyhow::Error> {
        let manager = ActivationTokenManager::new(&configuration.activation)?;
        tracing::info!("Using activation manager {:?}", &manager);

        let address = format!(
            "{}:{}",
            configuration.application.host, configuration.application.port
        );
        tracing::info!("Using application address {:?}", &address);
        let listener = TcpListener::bind(address)?;
        let port = listener.local_addr()?.port();
        let server = run(listener, repository, manager)?;

        Ok(Self { port, server })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    // A more expressive name that makes it clear that
    // this function only returns when the application is stopped.
    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        self.server.await
    }
}

pub fn run(
    listener: TcpListener,
    repository: Arc<dyn UserRepository>,
    manager: ActivationTokenManager,
) -> Result<Server, std::io::Error> {
    let repository: web::Data<dyn UserRepository> = web::Data::from(repository);
    let manager = web::Data::new(manager);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .route("/health_check", web::get().to(health_check))
            .route("/activate", web::get().to(activate))
            .app_data(repository.clone())
            .app_data(manager.clone())
    })
    .listen(listener)?
    .run();

    Ok(server)
}
