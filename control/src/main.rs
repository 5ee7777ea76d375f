use std::sync::Arc;

use control::{QueueService, ServiceConfig, SortedQueue, SystemBootService};
use itertools::Itertools;
use schema::{Aircraft, AircraftSpecification, Dispatch, QueueError};

#[tokio::main]
pub async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    env_logger::init();

    let config = ServiceConfig::from_env()?;
    log::info!("starting tower with {:?}", config);

    let arrivals = Aircraft::from_csv(&config.aircraft_csv_path)?;
    let boot = Arc::new(SystemBootService::new(config.adjusted_boot_delay()));
    let (service, dispatcher) = QueueService::<_, SortedQueue>::new(boot.clone(), &config);
    let dispatcher = tokio::spawn(dispatcher.run());

    // Queue is closed until the system is booted
    if let Err(e) = service
        .admit(AircraftSpecification::new("Passenger", "Large"))
        .await
    {
        log::warn!("before boot: {}", e);
    }

    let status = boot.boot().await;
    log::info!("boot status: {}", status);

    for arrival in arrivals {
        let enqueued = service.enqueue(arrival).await?;
        println!(
            "enqueued {} at position {} of {}",
            enqueued.enqueued_item, enqueued.added_at_position, enqueued.total_size
        );
    }

    log::info!(
        "queue: [{}]",
        service.snapshot().iter().map(ToString::to_string).join(", ")
    );

    loop {
        match service.dequeue().await {
            Ok(aircraft) => println!("cleared {} ({} waiting)", aircraft, service.size()),
            Err(QueueError::EmptyQueue) => {
                println!("queue empty");
                break;
            }
            Err(e) => return Err(e.into()),
        }
    }

    log::info!(
        "{} unbooted access attempt(s) during the session",
        boot.unbooted_access_attempts()
    );

    drop(service);
    dispatcher.await?;

    Ok(())
}
