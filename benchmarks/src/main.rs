use std::time::Instant;

use soa_bench::report::{print_report, write_results};
use soa_bench::{run_all, Config, Report, SystemInfo};
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

fn main() {
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_filter(
                    EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| EnvFilter::new("off")),
                ),
        )
        .init();

    let config = Config::from_env();
    let system = SystemInfo::detect(config.workers);

    println!("SoA column sum benchmark");
    println!();
    println!("System: {}/{}", system.os, system.arch);
    println!("CPU Cores: {}", system.cpus);
    println!("Processing {} users", config.users);
    println!();

    println!("Creating test data...");
    let start = Instant::now();
    let data = soa_types::generate(config.users);
    let gen_ms = start.elapsed().as_secs_f64() * 1000.0;
    info!(users = config.users, gen_ms, "dataset generated");
    println!("Data creation: {:.0}ms", gen_ms);
    println!();

    println!("Running benchmarks...");
    let outcomes = run_all(&data, config.workers);
    let report = Report::new(outcomes, config.users);
    info!(verified = report.verified(), expected = report.expected, "verification");

    print_report(&report);

    match write_results(&config.results_path, &report, &system) {
        Ok(()) => println!("Results saved to {}", config.results_path.display()),
        Err(e) => {
            warn!(path = %config.results_path.display(), error = %e, "results write failed");
            println!("Failed to save results: {}", e);
        }
    }
}
