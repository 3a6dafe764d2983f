use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use serde_json::Value;
use tracing::{error, info};
use vaccine_bot::{Config, EnvironmentSource, Response, ScheduledEvent, StdRandom, VaccineBot};

async fn function_handler(event: LambdaEvent<Value>) -> Result<Response, Error> {
    let trigger = ScheduledEvent::from_payload(&event.payload);
    info!(
        request_id = %event.context.request_id,
        event_id = trigger.id.as_deref().unwrap_or("-"),
        detail_type = trigger.detail_type.as_deref().unwrap_or("-"),
        "Handling new request"
    );

    let environment = EnvironmentSource::from_process();
    let config = Config::from_vars(environment.vars()).map_err(|e| {
        error!(stage = e.stage(), "Config error: {}", e);
        Error::from(e)
    })?;
    let service = VaccineBot::new(config, environment).await.map_err(|e| {
        error!(stage = e.stage(), "Failed to initialize bot: {}", e);
        Error::from(e)
    })?;

    let mut rng = StdRandom::from_clock();
    Ok(service.run(&mut rng).await?)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .json()
        .init();

    info!("New execution context created");
    run(service_fn(function_handler)).await
}
