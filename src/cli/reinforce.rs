use anyhow::Result;

use crate::config::SynapseConfig;

/// Run a co-occurrence reinforcement pass over one context.
///
/// Window and minimum increase fall back to the `[reinforcement]` config
/// section when not given on the command line.
pub fn reinforce(
    config: &SynapseConfig,
    context_id: i64,
    window_seconds: Option<i64>,
    min_increase: Option<i64>,
) -> Result<()> {
    let mut conn = crate::db::open_database(config.resolved_db_path())?;

    let window = window_seconds.unwrap_or(config.reinforcement.window_seconds);
    let increase = min_increase.unwrap_or(config.reinforcement.min_increase);

    let result = crate::graph::reinforce::strengthen_by_cooccurrence(
        &mut conn,
        &config.graph,
        context_id,
        window,
        increase,
    )?;

    println!("Reinforcement pass for context {context_id} (window {window}s)");
    println!("  Pairs in window: {}", result.pairs_in_window);
    println!("  Strengthened:    {}", result.strengthened);
    println!("  Created:         {}", result.created);

    Ok(())
}
