//! Vote toggle state machine.
//!
//! A voter holds at most one vote per resource, remembered by their own
//! browser (the token is trivially clearable; that is the accepted
//! identity model). Pressing a button either adds, removes, or switches
//! the vote; each transition is expressed as counter increments so
//! concurrent voters never lose updates to read-modify-write races.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteKind {
    Like,
    Dislike,
}

impl VoteKind {
    /// The counter field this vote lands on.
    pub fn field(self) -> &'static str {
        match self {
            VoteKind::Like => "likes",
            VoteKind::Dislike => "dislikes",
        }
    }
}

/// One counter adjustment produced by a toggle transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoteDelta {
    pub kind: VoteKind,
    pub delta: i64,
}

/// Computes the next vote state and the increments that realize it.
///
/// Pressing the held vote removes it; pressing the other side removes
/// the old vote and adds the new one; pressing with no held vote adds.
pub fn toggle(previous: Option<VoteKind>, pressed: VoteKind) -> (Option<VoteKind>, Vec<VoteDelta>) {
    match previous {
        Some(prev) if prev == pressed => (
            None,
            vec![VoteDelta {
                kind: pressed,
                delta: -1,
            }],
        ),
        Some(prev) => (
            Some(pressed),
            vec![
                VoteDelta {
                    kind: prev,
                    delta: -1,
                },
                VoteDelta {
                    kind: pressed,
                    delta: 1,
                },
            ],
        ),
        None => (
            Some(pressed),
            vec![VoteDelta {
                kind: pressed,
                delta: 1,
            }],
        ),
    }
}
