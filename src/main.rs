//! main.rs

use std::sync::Arc;

use account_activation::{
    configuration::get_configuration, startup::Application, telemetry,
    users::InMemoryUserRepository,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let subscriber =
        telemetry::get_log_subscriber("account_activation".into(), "info".into(), std::io::stdout);
    telemetry::init_log_subscriber(subscriber);

    // Panic if we can't read configuration
    let configuration = get_configuration().expect("Failed to read configuration.");

    let repository = Arc::new(InMemoryUserRepository::new());
    let application = Application::build(configuration, repository).await?;
    application.run_until_stopped().await?;
    Ok(())
}
