use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::AppError;

/// The authenticated caller. Authentication itself lives upstream; the
/// gateway asserts the user with an `x-user-id` header and this extractor
/// only refuses requests that arrive without one.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser(pub i64);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = parts
            .headers
            .get("x-user-id")
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.parse::<i64>().ok());

        match user_id {
            Some(id) if id > 0 => Ok(Self(id)),
            _ => Err(AppError::Unauthorized("Authentication required".to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_with_header(value: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/speaking/partners");
        if let Some(v) = value {
            builder = builder.header("x-user-id", v);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[tokio::test]
    async fn extracts_a_positive_user_id() {
        let mut parts = parts_with_header(Some("42"));
        let user = AuthUser::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(user.0, 42);
    }

    #[tokio::test]
    async fn missing_header_is_unauthorized() {
        let mut parts = parts_with_header(None);
        let result = AuthUser::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn garbage_and_non_positive_ids_are_unauthorized() {
        for bad in ["abc", "0", "-3", ""] {
            let mut parts = parts_with_header(Some(bad));
            let result = AuthUser::from_request_parts(&mut parts, &()).await;
            assert!(matches!(result, Err(AppError::Unauthorized(_))), "{bad}");
        }
    }
}
