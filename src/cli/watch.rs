//! Watch command - a terminal stand-in for the search box
//!
//! Each stdin line is treated as the current contents of the input, so
//! typing `m`, `mr`, `mri` on consecutive lines behaves like keystrokes.

use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::config::AppConfig;
use crate::domain::{SearchPhase, SearchSnapshot};

use super::print_result_set;

pub async fn run(config: &AppConfig) -> anyhow::Result<()> {
    let core = crate::create_search_core(config);
    let mut updates = core.aggregator.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                match line? {
                    Some(line) => core.aggregator.on_input(&line),
                    None => break,
                }
            }
            changed = updates.changed() => {
                if changed.is_err() {
                    return Ok(());
                }
                let snapshot = updates.borrow_and_update().clone();
                print_snapshot(&snapshot);
            }
        }
    }

    // Input closed; let the last query settle before exiting
    let unseen = updates.has_changed().unwrap_or(false);
    let snapshot = updates.borrow_and_update().clone();
    if unseen {
        print_snapshot(&snapshot);
    }
    if is_settled(&snapshot) {
        return Ok(());
    }

    let settle = config.search.debounce() + config.gateway.timeout() + Duration::from_secs(1);
    let _ = tokio::time::timeout(settle, async {
        while updates.changed().await.is_ok() {
            let snapshot = updates.borrow_and_update().clone();
            print_snapshot(&snapshot);
            if is_settled(&snapshot) {
                break;
            }
        }
    })
    .await;

    Ok(())
}

fn is_settled(snapshot: &SearchSnapshot) -> bool {
    matches!(
        snapshot.phase,
        SearchPhase::Idle | SearchPhase::Resolved | SearchPhase::Fallback
    )
}

fn print_snapshot(snapshot: &SearchSnapshot) {
    match (snapshot.phase, &snapshot.results) {
        (SearchPhase::Resolved | SearchPhase::Fallback, Some(set)) => {
            println!("#{} \"{}\"", snapshot.sequence, set.query.text);
            print_result_set(set);
        }
        (SearchPhase::Idle, _) => println!("#{} (cleared)", snapshot.sequence),
        _ => {}
    }
}
