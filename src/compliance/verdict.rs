//! Approval verdicts derived from a pull request's review history.

use std::collections::BTreeMap;

use crate::github::{Review, ReviewState};

/// Login GitHub substitutes for deleted accounts.
pub const GHOST_LOGIN: &str = "ghost";

/// Outcome of reducing a pull request's reviews.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApprovalVerdict {
    /// At least one reviewer approved and none requested changes.
    Approved,
    /// A reviewer's latest decisive review requested changes.
    ChangesRequested {
        /// The reviewer holding the change request.
        reviewer: String,
    },
    /// No reviewer approved.
    NoApproval,
}

impl ApprovalVerdict {
    /// Returns true only for [`ApprovalVerdict::Approved`].
    #[must_use]
    pub const fn is_approved(&self) -> bool {
        matches!(self, Self::Approved)
    }
}

/// Reduces reviews, given in submission order, to a verdict.
///
/// Only each reviewer's latest `APPROVED` or `CHANGES_REQUESTED` review
/// counts; comments, dismissals and pending reviews never overwrite it.
/// Reviews without a reviewer, or from the ghost account, are ignored.
///
/// # Examples
///
/// ```
/// use gitwarden::compliance::{ApprovalVerdict, evaluate_reviews};
/// use gitwarden::github::{Review, ReviewState};
///
/// let review = |who: &str, state| Review {
///     reviewer: Some(who.to_owned()),
///     state,
///     submitted_at: None,
/// };
/// let reviews = [
///     review("alice", ReviewState::ChangesRequested),
///     review("alice", ReviewState::Approved),
/// ];
/// assert_eq!(evaluate_reviews(&reviews), ApprovalVerdict::Approved);
/// ```
#[must_use]
pub fn evaluate_reviews(reviews: &[Review]) -> ApprovalVerdict {
    let mut latest: BTreeMap<&str, &ReviewState> = BTreeMap::new();

    for review in reviews {
        let Some(reviewer) = review.reviewer.as_deref() else {
            continue;
        };
        if reviewer.is_empty() || reviewer == GHOST_LOGIN {
            continue;
        }
        if matches!(
            review.state,
            ReviewState::Approved | ReviewState::ChangesRequested
        ) {
            latest.insert(reviewer, &review.state);
        }
    }

    if let Some((reviewer, _)) = latest
        .iter()
        .find(|(_, state)| matches!(state, ReviewState::ChangesRequested))
    {
        return ApprovalVerdict::ChangesRequested {
            reviewer: (*reviewer).to_owned(),
        };
    }

    if latest
        .values()
        .any(|state| matches!(state, ReviewState::Approved))
    {
        ApprovalVerdict::Approved
    } else {
        ApprovalVerdict::NoApproval
    }
}
