use payform::app;
use payform::inactivity::DEFAULT_TIMEOUT_SECS;
use std::env;
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    // Parse command line arguments for bind address and inactivity timeout
    let args: Vec<String> = env::args().collect();

    let mut addr = "127.0.0.1:3000".to_string();
    let mut timeout_secs = DEFAULT_TIMEOUT_SECS;

    if args.len() >= 2 {
        addr = args[1].clone();
    }
    if args.len() >= 3 {
        timeout_secs = args[2].parse().unwrap_or(DEFAULT_TIMEOUT_SECS);
    }

    println!(
        "Starting payroll form server on {} with a {} second inactivity timeout",
        addr, timeout_secs
    );
    app::run(&addr, Duration::from_secs(timeout_secs)).await
}
