//! Stats command - runs a search and reports API call statistics

use crate::config::AppConfig;

use super::QueryArgs;

pub async fn run(config: &AppConfig, args: QueryArgs) -> anyhow::Result<()> {
    let core = crate::create_search_core(config);

    if let Some(set) = core.aggregator.search_now(&args.text()).await {
        tracing::info!(
            results = set.len(),
            degraded = set.is_degraded(),
            "Search finished"
        );
    }

    let stats = core.history.stats();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!("Total calls:      {}", stats.total_calls);
    println!("Average duration: {} ms", stats.average_duration_ms);
    println!("Error rate:       {:.2}%", stats.error_rate);
    println!("Slow calls:       {}", stats.slow_calls.len());

    if !stats.recent_calls.is_empty() {
        println!("Recent calls:");
        for call in &stats.recent_calls {
            let status = match call.status {
                0 => "no response".to_string(),
                status => status.to_string(),
            };
            match &call.error {
                Some(error) => println!(
                    "  {} {} {} ms  {}",
                    call.endpoint, status, call.duration_ms, error
                ),
                None => println!("  {} {} {} ms", call.endpoint, status, call.duration_ms),
            }
        }
    }

    Ok(())
}
