//! Schema command implementation

use anyhow::Result;
use std::path::PathBuf;

use super::resolve_snapshot;
use crate::config::Config;
use crate::store::Snapshot;

pub fn run(config: &Config, snapshot: Option<PathBuf>) -> Result<()> {
    let path = resolve_snapshot(snapshot, config)?;
    let snapshot = Snapshot::open(&path)?;

    println!("Snapshot: {}\n", path.display());
    println!("{:<45} {:<10} {}", "Table", "Kind", "Status");
    println!("{}", "-".repeat(65));

    let mut missing_required = 0;
    for status in snapshot.table_report()? {
        let kind = if status.required { "required" } else { "optional" };
        let state = match (status.present, status.required) {
            (true, _) => "present",
            (false, true) => {
                missing_required += 1;
                "MISSING"
            }
            (false, false) => "absent",
        };
        println!("{:<45} {:<10} {}", status.name, kind, state);
    }

    if missing_required > 0 {
        println!("\n❌ {} required table(s) missing, export will fail", missing_required);
    } else {
        println!("\n✅ Snapshot can be exported");
    }
    Ok(())
}
