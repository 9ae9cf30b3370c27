use anyhow::Result;

use crate::config::SynapseConfig;

/// Enumerate paths between two experiences and print them.
pub fn paths(
    config: &SynapseConfig,
    from: i64,
    to: i64,
    max_depth: usize,
    min_strength: i64,
) -> Result<()> {
    let conn = crate::db::open_database(config.resolved_db_path())?;

    let found = crate::graph::traverse::find_paths(
        &conn,
        &config.graph,
        from,
        to,
        max_depth,
        min_strength,
    )?;

    if found.is_empty() {
        println!("No paths from {from} to {to} within {max_depth} hops.");
        return Ok(());
    }

    println!("{} path(s) from {from} to {to}:", found.len());
    for (index, path) in found.iter().enumerate() {
        let mut line = format!("  {}: {from}", index + 1);
        for step in path {
            line.push_str(&format!(
                " -[{} s{}]-> {}",
                step.connection.connection_type, step.connection.strength, step.experience_id
            ));
        }
        println!("{line}");
    }

    Ok(())
}
