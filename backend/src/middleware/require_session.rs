//! Session gate for browser-facing routes.
//!
//! [`RequireSession`] restores the cookie session before the wrapped service
//! runs and applies [`guard`]. Anything but [`GuardDecision::Render`] becomes a
//! `303 See Other` to the login path carrying the original target in `next`.
//! JSON API routes do not use this middleware; they answer `401` through
//! [`SessionContext::require_user`].

use std::task::{Context, Poll};

use actix_session::SessionExt;
use actix_web::body::EitherBody;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header;
use actix_web::{Error, HttpResponse, web};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::debug;
use url::form_urlencoded;

use crate::domain::{Error as DomainError, GuardDecision, LoginPath, guard};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Redirect requests without a logged-in user to `login_path`.
///
/// Must sit inside the session middleware and requires
/// `web::Data<HttpState>` in the application data.
///
/// # Examples
/// ```
/// use actix_web::web;
/// use campaign_auth::domain::LoginPath;
/// use campaign_auth::middleware::RequireSession;
///
/// let scope = web::scope("/dashboard").wrap(RequireSession::new(LoginPath::default()));
/// ```
#[derive(Clone, Debug, Default)]
pub struct RequireSession {
    login_path: LoginPath,
}

impl RequireSession {
    /// Gate redirecting anonymous requests to `login_path`.
    pub fn new(login_path: LoginPath) -> Self {
        Self { login_path }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequireSession
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireSessionMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireSessionMiddleware {
            service,
            login_path: self.login_path.clone(),
        }))
    }
}

/// Service wrapper produced by [`RequireSession`].
pub struct RequireSessionMiddleware<S> {
    service: S,
    login_path: LoginPath,
}

impl<S> RequireSessionMiddleware<S> {
    fn decide(&self, req: &ServiceRequest) -> Result<GuardDecision, DomainError> {
        let state = req
            .app_data::<web::Data<HttpState>>()
            .ok_or_else(|| DomainError::internal("http state is not configured"))?;
        let session = SessionContext::new(req.get_session());
        let auth = session.auth_state(state)?;
        Ok(guard(&auth, &self.login_path))
    }
}

impl<S, B> Service<ServiceRequest> for RequireSessionMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        match self.decide(&req) {
            Ok(GuardDecision::Render) => {
                let fut = self.service.call(req);
                Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) })
            }
            Ok(GuardDecision::Redirect(login_path)) => {
                Box::pin(ready(Ok(redirect(req, &login_path))))
            }
            // Restoring always leaves the loading state.
            Ok(GuardDecision::Pending) => {
                let login_path = self.login_path.clone();
                Box::pin(ready(Ok(redirect(req, &login_path))))
            }
            Err(error) => Box::pin(ready(Ok(req.error_response(error).map_into_right_body()))),
        }
    }
}

fn redirect<B>(req: ServiceRequest, login_path: &LoginPath) -> ServiceResponse<EitherBody<B>> {
    let target = req
        .uri()
        .path_and_query()
        .map_or_else(|| req.path().to_owned(), ToString::to_string);
    let location = login_location(login_path, &target);
    debug!(target = %target, location = %location, "redirecting to login");
    let response = HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .insert_header((header::CACHE_CONTROL, "no-store"))
        .finish();
    req.into_response(response).map_into_right_body()
}

fn login_location(login_path: &LoginPath, target: &str) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("next", target)
        .finish();
    let separator = if login_path.as_ref().contains('?') { '&' } else { '?' };
    format!("{login_path}{separator}{query}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ELECTORAL_USER_KEY;
    use crate::inbound::http::auth::login;
    use crate::inbound::http::test_utils::{demo_state, session_cookie, test_session_middleware};
    use actix_session::Session;
    use actix_web::cookie::Cookie;
    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use rstest::rstest;
    use serde_json::json;

    fn location<B>(res: &ServiceResponse<B>) -> &str {
        res.headers()
            .get(header::LOCATION)
            .expect("location header")
            .to_str()
            .expect("ascii location")
    }

    fn test_app(
        login_path: LoginPath,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            ServiceRequest,
            Config = (),
            Response = ServiceResponse,
            Error = Error,
            InitError = (),
        >,
    > {
        App::new()
            .app_data(web::Data::new(demo_state()))
            .wrap(test_session_middleware())
            .service(web::scope("/api/v1").service(login))
            .route(
                "/tamper",
                web::get().to(|session: Session| async move {
                    session
                        .insert(ELECTORAL_USER_KEY, "not json")
                        .expect("insert blob");
                    HttpResponse::Ok()
                }),
            )
            .service(
                web::scope("/dashboard")
                    .wrap(RequireSession::new(login_path))
                    .route("", web::get().to(|| async { HttpResponse::Ok().body("panels") }))
                    .route(
                        "/audits",
                        web::get().to(|| async { HttpResponse::Ok().body("audits") }),
                    ),
            )
    }

    #[rstest]
    #[case::bare("/login", "/dashboard", "/login?next=%2Fdashboard")]
    #[case::nested("/login", "/dashboard/audits?tab=2", "/login?next=%2Fdashboard%2Faudits%3Ftab%3D2")]
    #[case::login_with_query("/auth?from=app", "/dashboard", "/auth?from=app&next=%2Fdashboard")]
    #[actix_web::test]
    async fn anonymous_requests_are_redirected(
        #[case] login_path: &str,
        #[case] uri: &str,
        #[case] expected: &str,
    ) {
        let app =
            test::init_service(test_app(LoginPath::new(login_path).expect("login path"))).await;
        let res = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&res), expected);
    }

    #[actix_web::test]
    async fn authenticated_requests_render() {
        let app = test::init_service(test_app(LoginPath::default())).await;
        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/login")
                .set_json(json!({ "identifier": "votante", "password": "votante1" }))
                .to_request(),
        )
        .await;
        let cookie: Cookie<'static> = session_cookie(&res);

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/dashboard")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(test::read_body(res).await, "panels");
    }

    #[actix_web::test]
    async fn corrupt_sessions_are_redirected() {
        let app = test::init_service(test_app(LoginPath::default())).await;
        let res =
            test::call_service(&app, test::TestRequest::get().uri("/tamper").to_request()).await;
        let cookie = session_cookie(&res);

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/dashboard")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
    }

    #[actix_web::test]
    async fn missing_state_is_an_internal_error() {
        let app = test::init_service(
            App::new().wrap(test_session_middleware()).service(
                web::scope("/dashboard")
                    .wrap(RequireSession::default())
                    .route("", web::get().to(HttpResponse::Ok)),
            ),
        )
        .await;
        let res = test::call_service(
            &app,
            test::TestRequest::get().uri("/dashboard").to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
