// Lambda bootstrap entry point for the notifier function

use lambda_runtime::{Error, run, service_fn};

#[tokio::main]
async fn main() -> Result<(), Error> {
    release_notifier::setup_logging();

    run(service_fn(release_notifier::worker::handler)).await
}
