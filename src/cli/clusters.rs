use anyhow::Result;

use crate::config::SynapseConfig;

/// Find and print clusters of highly connected experiences.
pub fn clusters(config: &SynapseConfig, min_connections: usize) -> Result<()> {
    let conn = crate::db::open_database(config.resolved_db_path())?;

    let found =
        crate::graph::clusters::find_clusters(&conn, &config.graph, min_connections)?;

    if found.is_empty() {
        println!("No experiences with {min_connections} or more connections.");
        return Ok(());
    }

    println!("{} cluster(s) at threshold {min_connections}:", found.len());
    for (index, cluster) in found.iter().enumerate() {
        let ids: Vec<String> = cluster.iter().map(|id| id.to_string()).collect();
        println!("  {}: [{}] ({} members)", index + 1, ids.join(", "), cluster.len());
    }

    Ok(())
}
