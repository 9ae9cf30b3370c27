use anyhow::Result;

use crate::config::SynapseConfig;
use crate::graph::types::ConnectionType;

/// Display whole-network statistics in the terminal.
pub fn stats(config: &SynapseConfig) -> Result<()> {
    let conn = crate::db::open_database(config.resolved_db_path())?;

    let response = crate::graph::stats::network_stats(&conn)?;

    println!("Network Statistics");
    println!("{}", "=".repeat(40));
    println!("  Total connections:     {}", response.total_connections);
    println!("  Connected experiences: {}", response.connected_experiences);
    println!("  Total experiences:     {}", response.total_experiences);
    println!("  Average strength:      {:.2}", response.avg_strength);
    println!("  Average degree:        {:.2}", response.avg_degree);
    println!("  Network coverage:      {:.1}%", response.network_coverage * 100.0);
    println!();

    println!("By Type:");
    for ct in ConnectionType::ALL {
        let count = response.by_type.get(ct.as_str()).copied().unwrap_or(0);
        if count > 0 {
            println!("  {:<12} {}", ct.as_str(), count);
        }
    }

    Ok(())
}
