//! Token command - fetches a credential through the cache

use crate::config::AppConfig;

pub async fn run(config: &AppConfig) -> anyhow::Result<()> {
    let core = crate::create_search_core(config);

    match core.tokens.get_token().await {
        Some(credential) => {
            println!("token:      {}", credential.masked());
            println!("expires at: {}", credential.expires_at().to_rfc3339());
        }
        None => println!("no credential (anonymous)"),
    }

    Ok(())
}
