use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

/// Lifecycle of a payment. `Approved` and `Rejected` are terminal.
#[derive(Default, Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum PaymentState {
    #[default]
    None,
    WaitingForApproval,
    Approved,
    Rejected,
}

pub const UNKNOWN_STATE_TITLE: &str = "Unknown";

impl PaymentState {
    pub const ALL: [PaymentState; 4] = [
        PaymentState::None,
        PaymentState::WaitingForApproval,
        PaymentState::Approved,
        PaymentState::Rejected,
    ];

    pub fn allowed_transitions(&self) -> &'static [PaymentState] {
        match self {
            PaymentState::None => &[PaymentState::WaitingForApproval],
            PaymentState::WaitingForApproval => &[PaymentState::Approved, PaymentState::Rejected],
            PaymentState::Approved | PaymentState::Rejected => &[],
        }
    }

    pub fn can_transition_to(&self, to: PaymentState) -> bool {
        self.allowed_transitions().contains(&to)
    }

    pub fn is_terminal(&self) -> bool {
        self.allowed_transitions().is_empty()
    }

    pub fn title(&self) -> &'static str {
        match self {
            PaymentState::None => "None",
            PaymentState::WaitingForApproval => "WaitingForApproval",
            PaymentState::Approved => "Approved",
            PaymentState::Rejected => "Rejected",
        }
    }

    /// Lenient parse: anything unrecognized collapses to `None`.
    pub fn from_title(title: &str) -> Self {
        title.parse().unwrap_or(PaymentState::None)
    }

    pub fn code(&self) -> i32 {
        match self {
            PaymentState::None => 0,
            PaymentState::WaitingForApproval => 1,
            PaymentState::Approved => 2,
            PaymentState::Rejected => 3,
        }
    }

    pub fn from_code(code: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|state| state.code() == code)
    }

    pub fn title_for_code(code: i32) -> &'static str {
        Self::from_code(code)
            .map(|state| state.title())
            .unwrap_or(UNKNOWN_STATE_TITLE)
    }
}

impl Display for PaymentState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.title())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown payment state: {0}")]
pub struct UnknownPaymentState(pub String);

impl FromStr for PaymentState {
    type Err = UnknownPaymentState;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        // "None" is never persisted nor requested.
        match value {
            "WaitingForApproval" => Ok(PaymentState::WaitingForApproval),
            "Approved" => Ok(PaymentState::Approved),
            "Rejected" => Ok(PaymentState::Rejected),
            other => Err(UnknownPaymentState(other.to_string())),
        }
    }
}
