//! Search command - one immediate aggregated search

use crate::config::AppConfig;

use super::{QueryArgs, print_result_set};

pub async fn run(config: &AppConfig, args: QueryArgs) -> anyhow::Result<()> {
    let core = crate::create_search_core(config);
    let text = args.text();

    let Some(set) = core.aggregator.search_now(&text).await else {
        anyhow::bail!(
            "query must be at least {} characters",
            config.search.min_query_len
        );
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&set)?);
    } else {
        print_result_set(&set);
    }

    Ok(())
}
