use crate::{configuration::get_configuration, utils::configure_database};

#[tracing::instrument(name = "Default Migration")]
pub async fn run_migrations() {
    let configuration = get_configuration().expect("Failed to read configuration.");
    configure_database(&configuration.database).await;
}
