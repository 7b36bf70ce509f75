use anyhow::Context;
use propsim::{AppError, BatchReport, Config, OutputMode, Scenario, StrategyBatch};

#[tokio::main]
async fn main() {
    // Initialize tracing; logs go to stderr so stdout stays valid JSON.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing_subscriber::filter::LevelFilter::INFO.into()),
        )
        .init();

    // Load configuration
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(AppError::from(e).exit_code());
        }
    };

    if let Err(e) = run(&config).await {
        eprintln!("Error: {:#}", e);
        let code = e.downcast_ref::<AppError>().map_or(1, AppError::exit_code);
        std::process::exit(code);
    }
}

async fn run(config: &Config) -> anyhow::Result<()> {
    let scenario = Scenario::load(&config.scenario_path)
        .map_err(AppError::from)
        .with_context(|| format!("Loading {}", config.scenario_path.display()))?;

    tracing::info!(
        strategies = scenario.strategies.len(),
        timeout_ms = config.strategy_timeout.as_millis() as u64,
        "Running strategy batch"
    );

    let batch = StrategyBatch::new(scenario.investment).with_timeout(config.strategy_timeout);
    let runs = batch.run(scenario.strategies).await;

    let report = BatchReport::new(&runs, config.output_mode == OutputMode::Full);
    let json = serde_json::to_string_pretty(&report).map_err(AppError::from)?;
    println!("{}", json);
    Ok(())
}
