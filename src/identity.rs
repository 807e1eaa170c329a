//! Identifier (JID) resolution
//!
//! Individual addresses look like `15551234567@s.whatsapp.net`, groups like
//! `120363012345678901@g.us`. Almost every table refers to them by `jid._id`.

use std::collections::HashMap;

use crate::contacts::Contacts;
use crate::error::Result;
use crate::store::Snapshot;

const GROUP_SUFFIX: &str = "@g.us";

/// Row-id to identifier index over the `jid` table
#[derive(Debug, Clone, Default)]
pub struct IdentifierIndex {
    by_row: HashMap<i64, String>,
    by_identifier: HashMap<String, i64>,
}

impl IdentifierIndex {
    /// Scan the `jid` table once. Rows with a NULL identifier are skipped.
    pub fn load(snapshot: &Snapshot) -> Result<Self> {
        let mut stmt = snapshot
            .conn()
            .prepare("SELECT _id, raw_string FROM jid ORDER BY _id")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, i64>(0)?, row.get::<_, Option<String>>(1)?))
        })?;

        let mut pairs = vec![];
        for row in rows {
            if let (id, Some(raw)) = row? {
                pairs.push((id, raw));
            }
        }
        Ok(Self::from_rows(pairs))
    }

    /// Build from `(row_id, identifier)` pairs. If an identifier repeats,
    /// the reverse lookup keeps the lowest row-id.
    pub fn from_rows(rows: impl IntoIterator<Item = (i64, String)>) -> Self {
        let mut index = Self::default();
        for (row_id, identifier) in rows {
            index
                .by_identifier
                .entry(identifier.clone())
                .and_modify(|existing| *existing = (*existing).min(row_id))
                .or_insert(row_id);
            index.by_row.insert(row_id, identifier);
        }
        index
    }

    pub fn get(&self, row_id: i64) -> Option<&str> {
        self.by_row.get(&row_id).map(String::as_str)
    }

    /// Identifier for a nullable row-id, or "" when it does not resolve
    pub fn resolve_or_empty(&self, row_id: Option<i64>) -> String {
        row_id
            .and_then(|id| self.get(id))
            .unwrap_or_default()
            .to_string()
    }

    pub fn row_id_of(&self, identifier: &str) -> Option<i64> {
        self.by_identifier.get(identifier).copied()
    }

    pub fn len(&self) -> usize {
        self.by_row.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_row.is_empty()
    }
}

pub fn is_group(identifier: &str) -> bool {
    identifier.ends_with(GROUP_SUFFIX)
}

/// The part before `@`, or the whole identifier when there is none
pub fn local_part(identifier: &str) -> &str {
    identifier
        .split_once('@')
        .map_or(identifier, |(local, _)| local)
}

/// Human-readable name for an identifier.
///
/// Returns the name and whether it came from the contacts mapping. Groups
/// resolve to themselves; unknown individuals fall back to their number.
pub fn resolve_display_name(identifier: &str, contacts: &Contacts) -> (String, bool) {
    if identifier.is_empty() {
        return ("Unknown".to_string(), false);
    }

    if is_group(identifier) {
        return (identifier.to_string(), false);
    }

    let phone = local_part(identifier);
    let plus_prefixed = format!("+{}", phone);
    for variant in [plus_prefixed.as_str(), phone] {
        if let Some(name) = contacts.get(variant) {
            return (name.to_string(), true);
        }
    }

    (phone.to_string(), false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::testing::empty_snapshot;

    #[test]
    fn test_load_index() {
        let snapshot = empty_snapshot();
        snapshot
            .conn()
            .execute_batch(
                "INSERT INTO jid VALUES (1, 'status@broadcast');
                 INSERT INTO jid VALUES (2, '15551234567@s.whatsapp.net');
                 INSERT INTO jid VALUES (3, NULL);
                 INSERT INTO jid VALUES (4, '15551234567@s.whatsapp.net');",
            )
            .unwrap();

        let index = IdentifierIndex::load(&snapshot).unwrap();
        assert_eq!(index.len(), 3);
        assert_eq!(index.get(2), Some("15551234567@s.whatsapp.net"));
        assert_eq!(index.get(3), None);
        assert_eq!(index.row_id_of("15551234567@s.whatsapp.net"), Some(2));
        assert_eq!(index.resolve_or_empty(Some(99)), "");
        assert_eq!(index.resolve_or_empty(None), "");
    }

    #[test]
    fn test_reverse_lookup_prefers_lowest_row_id() {
        let index = IdentifierIndex::from_rows(vec![
            (9, "a@s.whatsapp.net".to_string()),
            (4, "a@s.whatsapp.net".to_string()),
        ]);
        assert_eq!(index.row_id_of("a@s.whatsapp.net"), Some(4));
    }

    #[test]
    fn test_display_name_with_plus_prefixed_contact() {
        let contacts: Contacts = [("+15551234567", "Alice")].into_iter().collect();
        assert_eq!(
            resolve_display_name("15551234567@s.whatsapp.net", &contacts),
            ("Alice".to_string(), true)
        );
    }

    #[test]
    fn test_display_name_with_bare_contact() {
        let contacts: Contacts = [("15551234567", "Alice")].into_iter().collect();
        assert_eq!(
            resolve_display_name("15551234567@s.whatsapp.net", &contacts),
            ("Alice".to_string(), true)
        );
    }

    #[test]
    fn test_display_name_fallbacks() {
        let contacts = Contacts::new();
        assert_eq!(
            resolve_display_name("", &contacts),
            ("Unknown".to_string(), false)
        );
        assert_eq!(
            resolve_display_name("120363000000000000@g.us", &contacts),
            ("120363000000000000@g.us".to_string(), false)
        );
        assert_eq!(
            resolve_display_name("15559876543@s.whatsapp.net", &contacts),
            ("15559876543".to_string(), false)
        );
        assert_eq!(
            resolve_display_name("15559876543", &contacts),
            ("15559876543".to_string(), false)
        );
    }

    #[test]
    fn test_group_never_resolves_through_contacts() {
        let contacts: Contacts = [("+120363000000000000", "Imposter")].into_iter().collect();
        let (name, found) = resolve_display_name("120363000000000000@g.us", &contacts);
        assert_eq!(name, "120363000000000000@g.us");
        assert!(!found);
    }
}
