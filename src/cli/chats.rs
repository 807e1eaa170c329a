//! Chats command implementation

use anyhow::{Context, Result};
use std::path::PathBuf;

use super::{load_contacts, resolve_snapshot};
use crate::archive::ArchiveBuilder;
use crate::config::Config;
use crate::model::Chat;

pub fn run(config: &Config, snapshot: Option<PathBuf>, contacts: Option<PathBuf>) -> Result<()> {
    let snapshot = resolve_snapshot(snapshot, config)?;
    let contacts = load_contacts(contacts, config)?;

    let archive = ArchiveBuilder::new(&contacts)
        .build(&snapshot)
        .with_context(|| format!("Failed to build archive from {}", snapshot.display()))?;

    if archive.chats.is_empty() {
        println!("No chats found in {}", archive.source_db);
        return Ok(());
    }

    println!(
        "{:<17} {:<6} {:>8} {:>6} {}",
        "Last Activity", "Kind", "Messages", "Calls", "Name"
    );
    println!("{}", "-".repeat(80));

    for chat in &archive.chats {
        println!(
            "{:<17} {:<6} {:>8} {:>6} {}",
            last_activity(chat),
            if chat.is_group { "group" } else { "direct" },
            chat.message_count,
            chat.total_calls.unwrap_or(0),
            truncate(&chat.name, 40),
        );
    }

    println!(
        "\n{} chats, {} messages",
        archive.total_chats, archive.total_messages
    );
    Ok(())
}

fn last_activity(chat: &Chat) -> String {
    chat.messages
        .iter()
        .rev()
        .find_map(|m| m.timestamp.as_deref())
        .filter(|ts| ts.len() >= 16)
        .map(|ts| format!("{} {}", &ts[..10], &ts[11..16]))
        .unwrap_or_else(|| "-".to_string())
}

fn truncate(name: &str, max: usize) -> String {
    let name = name.lines().next().unwrap_or(name);
    if name.chars().count() > max {
        let head: String = name.chars().take(max - 3).collect();
        format!("{}...", head)
    } else {
        name.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_is_char_safe() {
        assert_eq!(truncate("Family", 40), "Family");
        assert_eq!(truncate("ääääääää", 6), "äää...");
        assert_eq!(truncate("first\nsecond", 40), "first");
    }
}
