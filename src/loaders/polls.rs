//! Poll loader
//!
//! A poll is spread over five tables:
//!   - message_poll: one row per poll message
//!   - message_poll_option: the choices, with the app's own vote totals
//!   - message_add_on (type 67) + message_add_on_poll_vote: who voted, when
//!   - message_add_on_poll_vote_selected_option: which option a vote picked
//!
//! Votes are a separate optional stage: without the vote tables polls are
//! still exported, with empty voter lists. Votes whose selected option does
//! not belong to the poll are dropped.

use rusqlite::params;
use std::collections::HashMap;
use tracing::debug;

use super::{load_optional, push_grouped, ByMessage, IndexLoader};
use crate::error::Result;
use crate::identity::IdentifierIndex;
use crate::model::{ms_to_iso, Poll, PollOption, Voter};
use crate::store::schema::{self, ADD_ON_POLL_VOTE};
use crate::store::Snapshot;

/// Voters keyed by (poll message id, selected option id)
type VotesByOption = HashMap<(i64, i64), Vec<Voter>>;

pub struct PollLoader;

struct VoteLoader;

impl PollLoader {
    fn load_polls(snapshot: &Snapshot) -> Result<ByMessage<Poll>> {
        let mut stmt = snapshot.conn().prepare(
            "SELECT message_row_id, selectable_options_count, poll_type FROM message_poll",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                Poll {
                    max_selectable: row.get(1)?,
                    poll_type: row.get(2)?,
                    options: vec![],
                },
            ))
        })?;
        rows.collect::<std::result::Result<_, _>>().map_err(Into::into)
    }

    /// Append options to their polls; options of unknown polls are ignored
    fn attach_options(snapshot: &Snapshot, polls: &mut ByMessage<Poll>) -> Result<()> {
        let mut stmt = snapshot.conn().prepare(
            r#"SELECT message_row_id, _id, option_name, vote_total
               FROM message_poll_option
               ORDER BY _id"#,
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, Option<i64>>(0)?,
                PollOption {
                    option_id: row.get(1)?,
                    text: row.get(2)?,
                    vote_count: row.get::<_, Option<i64>>(3)?.unwrap_or(0),
                    voters: vec![],
                },
            ))
        })?;

        for row in rows {
            let (message_id, option) = row?;
            if let Some(poll) = message_id.and_then(|id| polls.get_mut(&id)) {
                poll.options.push(option);
            }
        }
        Ok(())
    }
}

impl IndexLoader for VoteLoader {
    type Index = VotesByOption;

    fn name(&self) -> &'static str {
        "poll votes"
    }

    fn tables(&self) -> &'static [&'static str] {
        &[
            schema::MESSAGE_ADD_ON,
            schema::MESSAGE_ADD_ON_POLL_VOTE,
            schema::MESSAGE_ADD_ON_POLL_VOTE_SELECTED_OPTION,
        ]
    }

    fn load(&self, snapshot: &Snapshot, ids: &IdentifierIndex) -> Result<Self::Index> {
        let mut stmt = snapshot.conn().prepare(
            r#"SELECT ao.parent_message_row_id, ao.sender_jid_row_id,
                      pv.sender_timestamp, vso.message_poll_option_id
               FROM message_add_on ao
               JOIN message_add_on_poll_vote pv ON pv.message_add_on_row_id = ao._id
               JOIN message_add_on_poll_vote_selected_option vso
                    ON vso.message_add_on_row_id = ao._id
               WHERE ao.message_add_on_type = ?1
               ORDER BY ao._id, vso.message_poll_option_id"#,
        )?;
        let rows = stmt.query_map(params![ADD_ON_POLL_VOTE], |row| {
            Ok((
                row.get::<_, Option<i64>>(0)?,
                row.get::<_, Option<i64>>(1)?,
                row.get::<_, Option<i64>>(2)?,
                row.get::<_, Option<i64>>(3)?,
            ))
        })?;

        let mut votes = VotesByOption::new();
        for row in rows {
            let (message_id, voter_row_id, timestamp, option_id) = row?;
            let (Some(message_id), Some(option_id)) = (message_id, option_id) else {
                continue;
            };
            push_grouped(
                &mut votes,
                (message_id, option_id),
                Voter {
                    from: ids.resolve_or_empty(voter_row_id),
                    timestamp: ms_to_iso(timestamp),
                },
            );
        }
        Ok(votes)
    }

    fn count(index: &Self::Index) -> usize {
        index.values().map(Vec::len).sum()
    }
}

impl IndexLoader for PollLoader {
    type Index = ByMessage<Poll>;

    fn name(&self) -> &'static str {
        "polls"
    }

    fn tables(&self) -> &'static [&'static str] {
        &[schema::MESSAGE_POLL, schema::MESSAGE_POLL_OPTION]
    }

    fn load(&self, snapshot: &Snapshot, ids: &IdentifierIndex) -> Result<Self::Index> {
        let mut polls = Self::load_polls(snapshot)?;
        Self::attach_options(snapshot, &mut polls)?;
        let mut votes = load_optional(&VoteLoader, snapshot, ids)?;

        for (message_id, poll) in polls.iter_mut() {
            for option in poll.options.iter_mut() {
                if let Some(voters) = votes.remove(&(*message_id, option.option_id)) {
                    option.voters = voters;
                }
            }
        }

        if !votes.is_empty() {
            let orphans: usize = votes.values().map(Vec::len).sum();
            debug!(orphans, "dropping poll votes with no matching option");
        }

        Ok(polls)
    }

    fn count(index: &Self::Index) -> usize {
        index.len()
    }
}
