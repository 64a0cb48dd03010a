use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Lifecycle state of a connection request. `pending` is the only
/// non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    Pending,
    Connected,
    Rejected,
    Cancelled,
}

impl ConnectionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Connected => "connected",
            Self::Rejected => "rejected",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }

    /// Legal status transitions: a pending request may be connected,
    /// rejected or cancelled; terminal states only permit the no-op
    /// self-transition.
    pub fn can_transition_to(&self, next: Self) -> bool {
        *self == next || matches!(self, Self::Pending)
    }
}

impl std::str::FromStr for ConnectionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "connected" => Ok(Self::Connected),
            "rejected" => Ok(Self::Rejected),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(format!("invalid connection status: {other}")),
        }
    }
}

impl TryFrom<String> for ConnectionStatus {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl std::fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A directional proposal from `sender_id` to practice with `receiver_id`.
/// At most one row per ordered pair; the mutual-merge path flips the
/// earlier reverse row to `connected` instead of inserting a twin.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ConnectionRequest {
    pub id: i64,
    pub sender_id: i64,
    pub receiver_id: i64,
    #[sqlx(try_from = "String")]
    pub status: ConnectionStatus,
    pub message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ConnectionRequest {
    /// Whether `user_id` is a party to this request.
    pub fn involves(&self, user_id: i64) -> bool {
        self.sender_id == user_id || self.receiver_id == user_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn pending_can_reach_every_terminal_state() {
        let from = ConnectionStatus::Pending;
        assert!(from.can_transition_to(ConnectionStatus::Connected));
        assert!(from.can_transition_to(ConnectionStatus::Rejected));
        assert!(from.can_transition_to(ConnectionStatus::Cancelled));
        assert!(from.can_transition_to(ConnectionStatus::Pending));
    }

    #[test]
    fn terminal_states_only_allow_self_transition() {
        for terminal in [
            ConnectionStatus::Connected,
            ConnectionStatus::Rejected,
            ConnectionStatus::Cancelled,
        ] {
            assert!(terminal.is_terminal());
            assert!(terminal.can_transition_to(terminal));
            assert!(!terminal.can_transition_to(ConnectionStatus::Pending));
            for other in [
                ConnectionStatus::Connected,
                ConnectionStatus::Rejected,
                ConnectionStatus::Cancelled,
            ] {
                if other != terminal {
                    assert!(!terminal.can_transition_to(other));
                }
            }
        }
    }

    #[test]
    fn status_parses_from_wire_values() {
        assert_eq!(
            ConnectionStatus::from_str("pending").unwrap(),
            ConnectionStatus::Pending
        );
        assert_eq!(
            ConnectionStatus::from_str("connected").unwrap(),
            ConnectionStatus::Connected
        );
        assert!(ConnectionStatus::from_str("accepted").is_err());
        assert!(ConnectionStatus::from_str("Pending").is_err());
    }

    #[test]
    fn involves_checks_both_parties() {
        let req = ConnectionRequest {
            id: 1,
            sender_id: 10,
            receiver_id: 20,
            status: ConnectionStatus::Pending,
            message: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert!(req.involves(10));
        assert!(req.involves(20));
        assert!(!req.involves(30));
    }
}
