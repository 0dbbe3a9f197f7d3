use serde::{Deserialize, Serialize};
use wander_catalog::DecisionStatus;

/// Decision-state rules.
///
/// Every state is reachable from every other one by direct assignment; the
/// gesture helpers only pick a target. Persisting the result is the caller's
/// job.
pub struct StatusMachine;

impl StatusMachine {
    /// Direct assignment, always legal
    pub fn transition(_current: DecisionStatus, target: DecisionStatus) -> DecisionStatus {
        target
    }

    /// REJECTED → UNDECIDED → ACCEPTED, saturating at ACCEPTED
    pub fn upgrade(current: DecisionStatus) -> DecisionStatus {
        match current {
            DecisionStatus::Rejected => DecisionStatus::Undecided,
            DecisionStatus::Undecided | DecisionStatus::Accepted => DecisionStatus::Accepted,
        }
    }

    /// ACCEPTED → UNDECIDED → REJECTED, saturating at REJECTED
    pub fn downgrade(current: DecisionStatus) -> DecisionStatus {
        match current {
            DecisionStatus::Accepted => DecisionStatus::Undecided,
            DecisionStatus::Undecided | DecisionStatus::Rejected => DecisionStatus::Rejected,
        }
    }

    /// Tap gesture: UNDECIDED → ACCEPTED → REJECTED → UNDECIDED
    pub fn cycle(current: DecisionStatus) -> DecisionStatus {
        match current {
            DecisionStatus::Undecided => DecisionStatus::Accepted,
            DecisionStatus::Accepted => DecisionStatus::Rejected,
            DecisionStatus::Rejected => DecisionStatus::Undecided,
        }
    }
}

/// How the user asked for a status change
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StatusGesture {
    Set(DecisionStatus),
    Upgrade,
    Downgrade,
    Cycle,
}

impl StatusGesture {
    pub fn plan(&self, current: DecisionStatus) -> Transition {
        let to = match self {
            StatusGesture::Set(target) => StatusMachine::transition(current, *target),
            StatusGesture::Upgrade => StatusMachine::upgrade(current),
            StatusGesture::Downgrade => StatusMachine::downgrade(current),
            StatusGesture::Cycle => StatusMachine::cycle(current),
        };
        Transition { from: current, to }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Transition {
    pub from: DecisionStatus,
    pub to: DecisionStatus,
}

impl Transition {
    pub fn is_noop(&self) -> bool {
        self.from == self.to
    }

    /// Decided offers must leave any comparison working set
    pub fn leaves_working_set(&self) -> bool {
        self.to.is_decided()
    }
}
