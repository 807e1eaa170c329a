//! Group membership loader

use super::{push_grouped, IndexLoader, ParticipantIndex};
use crate::error::Result;
use crate::identity::IdentifierIndex;
use crate::model::Participant;
use crate::store::schema;
use crate::store::Snapshot;

pub struct ParticipantLoader;

impl IndexLoader for ParticipantLoader {
    type Index = ParticipantIndex;

    fn name(&self) -> &'static str {
        "participants"
    }

    fn tables(&self) -> &'static [&'static str] {
        &[schema::GROUP_PARTICIPANTS]
    }

    fn load(&self, snapshot: &Snapshot, _ids: &IdentifierIndex) -> Result<Self::Index> {
        let mut stmt = snapshot
            .conn()
            .prepare("SELECT gjid, jid, admin FROM group_participants ORDER BY _id")?;

        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, Option<String>>(0)?,
                row.get::<_, Option<String>>(1)?,
                row.get::<_, Option<i64>>(2)?,
            ))
        })?;

        let mut groups = ParticipantIndex::new();
        for row in rows {
            let (group, member, admin) = row?;
            let Some(group) = group else { continue };
            push_grouped(
                &mut groups,
                group,
                Participant {
                    jid: member.unwrap_or_default(),
                    is_admin: admin.unwrap_or(0) != 0,
                },
            );
        }
        Ok(groups)
    }

    fn count(index: &Self::Index) -> usize {
        index.len()
    }
}
