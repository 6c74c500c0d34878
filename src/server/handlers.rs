use super::access::{AccessDecision, AccessState, RouteEvent, decide};
use super::types::LoginForm;
use super::views;
use crate::{
    auth::{CredentialValidator, SessionStore, cookie},
    config::Config,
    presenter::{self, INVALID_CREDENTIALS_MESSAGE, ViewModel},
    relay::{IMAGE_FIELD, UploadRelay, UploadRequest},
};
use axum::{
    Form,
    extract::{Multipart, State, multipart::MultipartRejection, rejection::FormRejection},
    http::{HeaderMap, StatusCode, header},
    response::{AppendHeaders, Html, IntoResponse, Redirect, Response},
};
use std::sync::Arc;
use tracing::{error, info, warn};

const LOGIN_ROUTE: &str = "/";
const PREDICT_ROUTE: &str = "/predict";

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub credentials: Arc<CredentialValidator>,
    pub sessions: Arc<dyn SessionStore>,
    pub relay: Arc<UploadRelay>,
}

impl AppState {
    fn session_token(&self, headers: &HeaderMap) -> Option<String> {
        cookie::extract_cookie(headers, &self.config.auth.session_cookie_name)
    }

    async fn access(&self, headers: &HeaderMap) -> AccessState {
        let token = self.session_token(headers);
        AccessState::from(self.sessions.is_authenticated(token.as_deref()).await)
    }
}

pub async fn login_page(State(state): State<AppState>, headers: HeaderMap) -> Response {
    match decide(state.access(&headers).await, RouteEvent::ShowLogin) {
        AccessDecision::RenderLogin => Html(views::login_page(None)).into_response(),
        other => follow(other),
    }
}

pub async fn login_submit(
    State(state): State<AppState>,
    headers: HeaderMap,
    form: Result<Form<LoginForm>, FormRejection>,
) -> Response {
    match decide(state.access(&headers).await, RouteEvent::SubmitLogin) {
        AccessDecision::AttemptLogin => {}
        other => return follow(other),
    }

    // an unreadable body counts as a login with empty fields
    let form = match form {
        Ok(Form(form)) => form,
        Err(rejection) => {
            warn!("Login submitted without a form body: {}", rejection);
            LoginForm::default()
        }
    };

    if !state.credentials.validate(&form.username, &form.password) {
        warn!("Rejected login attempt for user: {}", form.username);
        return Html(views::login_page(Some(INVALID_CREDENTIALS_MESSAGE))).into_response();
    }

    let token = state.sessions.start_session(&form.username).await;
    info!("User {} logged in", form.username);

    let auth = &state.config.auth;
    (
        AppendHeaders([
            (header::SET_COOKIE, cookie::session_cookie(auth, token.as_str())),
            (header::SET_COOKIE, cookie::marker_cookie(auth)),
        ]),
        Redirect::to(PREDICT_ROUTE),
    )
        .into_response()
}

pub async fn predict_page(State(state): State<AppState>, headers: HeaderMap) -> Response {
    match decide(state.access(&headers).await, RouteEvent::ShowPredict) {
        AccessDecision::RenderPredict => {
            Html(views::predict_page(&ViewModel::empty())).into_response()
        }
        other => follow(other),
    }
}

pub async fn predict_submit(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    match decide(state.access(&headers).await, RouteEvent::SubmitPredict) {
        AccessDecision::RelayUpload => {}
        other => return follow(other),
    }

    let view = match multipart {
        Ok(multipart) => match read_upload(multipart).await {
            Ok(Some(upload)) => presenter::present(state.relay.relay(upload).await),
            Ok(None) => {
                info!("Prediction submitted without an image");
                ViewModel::missing_upload()
            }
            Err(e) => {
                error!("Failed to read uploaded image: {}", e);
                ViewModel::unexpected(e)
            }
        },
        Err(rejection) => {
            warn!("Prediction submitted without multipart body: {}", rejection);
            ViewModel::missing_upload()
        }
    };

    Html(views::predict_page(&view)).into_response()
}

pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let decision = decide(state.access(&headers).await, RouteEvent::Logout);
    if decision != AccessDecision::EndSession {
        return follow(decision);
    }

    let token = state.session_token(&headers);
    state.sessions.end_session(token.as_deref()).await;

    let auth = &state.config.auth;
    (
        AppendHeaders([
            (
                header::SET_COOKIE,
                cookie::build_clear_cookie(&auth.session_cookie_name),
            ),
            (
                header::SET_COOKIE,
                cookie::build_clear_cookie(&auth.marker_cookie_name),
            ),
        ]),
        Redirect::to(LOGIN_ROUTE),
    )
        .into_response()
}

pub async fn fallback(State(state): State<AppState>, headers: HeaderMap) -> Response {
    match decide(state.access(&headers).await, RouteEvent::Unknown) {
        AccessDecision::NotFound => {
            (StatusCode::NOT_FOUND, Html(views::not_found_page())).into_response()
        }
        other => follow(other),
    }
}

/// Responses for decisions that need no further work from the handler.
fn follow(decision: AccessDecision) -> Response {
    match decision {
        AccessDecision::RedirectToLogin => Redirect::to(LOGIN_ROUTE).into_response(),
        AccessDecision::RedirectToPredict => Redirect::to(PREDICT_ROUTE).into_response(),
        AccessDecision::NotFound => {
            (StatusCode::NOT_FOUND, Html(views::not_found_page())).into_response()
        }
        other => {
            error!("Handler cannot follow access decision {:?}", other);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Pulls the `image` part out of the form. Other parts are ignored.
async fn read_upload(
    mut multipart: Multipart,
) -> Result<Option<UploadRequest>, axum::extract::multipart::MultipartError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        let content_type = field.content_type().map(str::to_string);
        let content = field.bytes().await?;

        let mut upload = UploadRequest::new(filename, content);
        upload.content_type = content_type;
        return Ok(Some(upload));
    }

    Ok(None)
}
