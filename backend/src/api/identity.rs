//! Caller identity extraction.
//!
//! Handlers that need an authenticated caller take a [`Caller`] argument;
//! extraction reads the `Authorization: Bearer <token>` header and resolves
//! it through the configured [`SessionService`]. Missing, malformed, or
//! unknown tokens all yield the same `auth_required` rejection.

use actix_web::dev::Payload;
use actix_web::http::header;
use actix_web::{FromRequest, HttpRequest, web};
use futures_util::future::LocalBoxFuture;

use crate::api::error::ApiError;
use crate::domain::UserId;
use crate::server::AppState;

/// The authenticated caller of the current request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller(pub UserId);

impl Caller {
    /// The caller's user id.
    #[must_use]
    pub const fn id(&self) -> UserId {
        self.0
    }
}

pub(crate) fn bearer_token(req: &HttpRequest) -> Option<String> {
    let header = req.headers().get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = header.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        return None;
    }
    Some(token.to_owned())
}

impl FromRequest for Caller {
    type Error = ApiError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let token = bearer_token(req);
        let state = req.app_data::<web::Data<AppState>>().cloned();
        Box::pin(async move {
            let Some(token) = token else {
                return Err(ApiError::auth_required());
            };
            let state = state.ok_or_else(|| {
                tracing::error!("application state missing from request extensions");
                ApiError::from(crate::domain::ports::SessionError::Unavailable {
                    message: "application state missing".to_owned(),
                })
            })?;
            match state.sessions.resolve(&token).await? {
                Some(user) => Ok(Self(user)),
                None => Err(ApiError::auth_required()),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::test::TestRequest;

    use super::*;
    use crate::domain::SwapCoordinator;
    use crate::domain::ports::session::MockSessionService;
    use crate::outbound::MemoryAccounts;

    fn state_with(sessions: MockSessionService) -> web::Data<AppState> {
        web::Data::new(AppState::new(
            Arc::new(SwapCoordinator::new()),
            Arc::new(MemoryAccounts::new()),
            Arc::new(sessions),
        ))
    }

    #[actix_web::test]
    async fn known_token_resolves_to_the_caller() {
        let user = UserId::random();
        let mut sessions = MockSessionService::new();
        sessions
            .expect_resolve()
            .withf(|token| token == "tok-1")
            .returning(move |_| Ok(Some(user)));

        let req = TestRequest::default()
            .app_data(state_with(sessions))
            .insert_header((header::AUTHORIZATION, "Bearer tok-1"))
            .to_http_request();
        let caller = Caller::from_request(&req, &mut Payload::None)
            .await
            .expect("token resolves");
        assert_eq!(caller.id(), user);
    }

    #[actix_web::test]
    async fn unknown_token_is_rejected() {
        let mut sessions = MockSessionService::new();
        sessions.expect_resolve().returning(|_| Ok(None));

        let req = TestRequest::default()
            .app_data(state_with(sessions))
            .insert_header((header::AUTHORIZATION, "Bearer stale"))
            .to_http_request();
        let err = Caller::from_request(&req, &mut Payload::None)
            .await
            .expect_err("stale token rejected");
        assert_eq!(err.code(), crate::domain::ErrorCode::AuthRequired);
    }

    #[actix_web::test]
    async fn missing_header_never_reaches_the_session_service() {
        let sessions = MockSessionService::new();

        let req = TestRequest::default()
            .app_data(state_with(sessions))
            .to_http_request();
        let err = Caller::from_request(&req, &mut Payload::None)
            .await
            .expect_err("missing header rejected");
        assert_eq!(err.code(), crate::domain::ErrorCode::AuthRequired);
    }

    #[test]
    fn bearer_token_parses_well_formed_header() {
        let req = TestRequest::default()
            .insert_header((header::AUTHORIZATION, "Bearer abc123"))
            .to_http_request();
        assert_eq!(bearer_token(&req).as_deref(), Some("abc123"));
    }

    #[test]
    fn bearer_token_rejects_other_schemes_and_empty_tokens() {
        let basic = TestRequest::default()
            .insert_header((header::AUTHORIZATION, "Basic abc123"))
            .to_http_request();
        assert_eq!(bearer_token(&basic), None);

        let empty = TestRequest::default()
            .insert_header((header::AUTHORIZATION, "Bearer   "))
            .to_http_request();
        assert_eq!(bearer_token(&empty), None);

        let missing = TestRequest::default().to_http_request();
        assert_eq!(bearer_token(&missing), None);
    }
}
