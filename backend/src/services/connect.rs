use sqlx::PgPool;
use thiserror::Error;

use crate::db::connection_requests;
use crate::error::AppError;
use crate::models::{ConnectionRequest, ConnectionStatus};

/// Why a send attempt was refused. `Duplicate` carries the existing row so
/// callers can show it; it fires for any prior request in the same
/// direction, terminal ones included.
#[derive(Debug, Error)]
pub enum SendRequestError {
    #[error("You cannot send a connection request to yourself.")]
    SelfRequest,

    #[error("Connection request already sent.")]
    Duplicate(Box<ConnectionRequest>),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// What `send_request` should do given the pair's current rows.
#[derive(Debug, PartialEq, Eq)]
pub enum ConnectDecision {
    CreatePending,
    AutoConnect { reverse_id: i64 },
}

/// The two success shapes of a send, kept distinct so audit trails can
/// tell a fresh request from a mutual merge.
#[derive(Debug, Clone)]
pub enum ConnectOutcome {
    Created(ConnectionRequest),
    AutoConnected(ConnectionRequest),
}

/// Pure decision for a send from `sender_id` to `receiver_id`.
///
/// A reverse request that is still pending signals mutual interest: the
/// existing reverse row transitions to connected and no new row is
/// created. A reverse row in any terminal state does not block a fresh
/// forward request.
pub fn decide(
    sender_id: i64,
    receiver_id: i64,
    forward: Option<&ConnectionRequest>,
    reverse: Option<&ConnectionRequest>,
) -> Result<ConnectDecision, SendRequestError> {
    if sender_id == receiver_id {
        return Err(SendRequestError::SelfRequest);
    }

    if let Some(existing) = forward {
        return Err(SendRequestError::Duplicate(Box::new(existing.clone())));
    }

    match reverse {
        Some(rev) if rev.status == ConnectionStatus::Pending => Ok(ConnectDecision::AutoConnect {
            reverse_id: rev.id,
        }),
        _ => Ok(ConnectDecision::CreatePending),
    }
}

/// Apply a send transactionally. The pair is serialized with an advisory
/// lock so two opposite-direction sends cannot both observe "no rows" and
/// insert twin pending requests.
pub async fn send_request(
    pool: &PgPool,
    sender_id: i64,
    receiver_id: i64,
    message: Option<String>,
) -> Result<ConnectOutcome, SendRequestError> {
    if sender_id == receiver_id {
        return Err(SendRequestError::SelfRequest);
    }

    let mut tx = pool.begin().await?;

    connection_requests::lock_pair(&mut *tx, sender_id, receiver_id).await?;
    let forward = connection_requests::get_directional(&mut *tx, sender_id, receiver_id).await?;
    let reverse = connection_requests::get_directional(&mut *tx, receiver_id, sender_id).await?;

    let outcome = match decide(sender_id, receiver_id, forward.as_ref(), reverse.as_ref())? {
        ConnectDecision::AutoConnect { reverse_id } => {
            let updated =
                connection_requests::set_status(&mut *tx, reverse_id, ConnectionStatus::Connected)
                    .await?
                    .ok_or(sqlx::Error::RowNotFound)?;
            ConnectOutcome::AutoConnected(updated)
        }
        ConnectDecision::CreatePending => {
            let created = connection_requests::insert_request(
                &mut *tx,
                sender_id,
                receiver_id,
                message.as_deref(),
            )
            .await?;
            ConnectOutcome::Created(created)
        }
    };

    tx.commit().await?;

    Ok(outcome)
}

/// Overwrite a request's status on behalf of one of its parties,
/// within the legal transition table. Setting the current status again is
/// a no-op success.
pub async fn change_status(
    pool: &PgPool,
    request_id: i64,
    actor_user_id: i64,
    new_status: ConnectionStatus,
) -> Result<ConnectionRequest, AppError> {
    let request = connection_requests::get_request(pool, request_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Connection request not found.".to_string()))?;

    if !request.involves(actor_user_id) {
        return Err(AppError::Forbidden(
            "Unauthorized to update this connection request.".to_string(),
        ));
    }

    if request.status == new_status {
        return Ok(request);
    }

    if !request.status.can_transition_to(new_status) {
        return Err(AppError::Conflict(format!(
            "Cannot change a {} request to {}.",
            request.status, new_status
        )));
    }

    connection_requests::set_status(pool, request_id, new_status)
        .await?
        .ok_or_else(|| AppError::NotFound("Connection request not found.".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn request(id: i64, sender: i64, receiver: i64, status: ConnectionStatus) -> ConnectionRequest {
        ConnectionRequest {
            id,
            sender_id: sender,
            receiver_id: receiver,
            status,
            message: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn self_request_is_refused() {
        let result = decide(3, 3, None, None);
        assert!(matches!(result, Err(SendRequestError::SelfRequest)));
    }

    #[test]
    fn clean_pair_creates_a_pending_request() {
        let decision = decide(1, 2, None, None).unwrap();
        assert_eq!(decision, ConnectDecision::CreatePending);
    }

    #[test]
    fn any_forward_request_reports_duplicate() {
        for status in [
            ConnectionStatus::Pending,
            ConnectionStatus::Connected,
            ConnectionStatus::Rejected,
            ConnectionStatus::Cancelled,
        ] {
            let forward = request(9, 1, 2, status);
            match decide(1, 2, Some(&forward), None) {
                Err(SendRequestError::Duplicate(existing)) => assert_eq!(existing.id, 9),
                other => panic!("expected duplicate, got {other:?}"),
            }
        }
    }

    #[test]
    fn reverse_pending_auto_connects_the_reverse_row() {
        let reverse = request(7, 2, 1, ConnectionStatus::Pending);
        let decision = decide(1, 2, None, Some(&reverse)).unwrap();
        assert_eq!(decision, ConnectDecision::AutoConnect { reverse_id: 7 });
    }

    #[test]
    fn terminal_reverse_request_does_not_block_a_new_send() {
        for status in [
            ConnectionStatus::Connected,
            ConnectionStatus::Rejected,
            ConnectionStatus::Cancelled,
        ] {
            let reverse = request(7, 2, 1, status);
            let decision = decide(1, 2, None, Some(&reverse)).unwrap();
            assert_eq!(decision, ConnectDecision::CreatePending);
        }
    }

    #[test]
    fn duplicate_check_runs_before_mutual_merge() {
        // Both directions exist (legacy data): the forward duplicate wins.
        let forward = request(5, 1, 2, ConnectionStatus::Rejected);
        let reverse = request(6, 2, 1, ConnectionStatus::Pending);
        assert!(matches!(
            decide(1, 2, Some(&forward), Some(&reverse)),
            Err(SendRequestError::Duplicate(_))
        ));
    }
}
