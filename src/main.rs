use excursion_booking_api::{
    configuration::get_configuration,
    startup::Application,
    telemetry::{get_subscriber, init_subscriber},
    utils::run_custom_commands,
};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let subscriber = get_subscriber("excursion-booking-api".into(), "info".into(), std::io::stdout);
    init_subscriber(subscriber);

    let args: Vec<String> = std::env::args().collect();
    if args.len() > 1 {
        return run_custom_commands(args).await;
    }

    let configuration = get_configuration().expect("Failed to read configuration.");
    let application = Application::build(configuration).await?;
    application.run_until_stopped().await?;
    Ok(())
}
