use anyhow::Result;

use crate::config::SynapseConfig;

/// Print centrality metrics for one experience.
pub fn centrality(config: &SynapseConfig, experience_id: i64) -> Result<()> {
    let conn = crate::db::open_database(config.resolved_db_path())?;

    let report = crate::graph::centrality::centrality(&conn, experience_id)?;

    println!("Centrality for experience {experience_id}");
    println!("{}", "=".repeat(40));
    println!("  In-degree:             {}", report.in_degree);
    println!("  Out-degree:            {}", report.out_degree);
    println!("  Degree centrality:     {}", report.degree_centrality);
    println!("  Avg incoming strength: {:.2}", report.avg_incoming_strength);
    println!("  Avg outgoing strength: {:.2}", report.avg_outgoing_strength);
    println!("  Weighted centrality:   {:.2}", report.weighted_centrality);

    Ok(())
}
