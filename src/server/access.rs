use tracing::debug;

/// Whether the current client holds a live session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessState {
    Anonymous,
    Authenticated,
}

impl From<bool> for AccessState {
    fn from(authenticated: bool) -> Self {
        if authenticated {
            AccessState::Authenticated
        } else {
            AccessState::Anonymous
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteEvent {
    ShowLogin,
    SubmitLogin,
    ShowPredict,
    SubmitPredict,
    Logout,
    Unknown,
}

/// What a handler should do for a given state and route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    RenderLogin,
    AttemptLogin,
    RenderPredict,
    RelayUpload,
    EndSession,
    RedirectToLogin,
    RedirectToPredict,
    NotFound,
}

pub fn decide(state: AccessState, event: RouteEvent) -> AccessDecision {
    let decision = match (state, event) {
        (AccessState::Anonymous, RouteEvent::ShowLogin) => AccessDecision::RenderLogin,
        (AccessState::Anonymous, RouteEvent::SubmitLogin) => AccessDecision::AttemptLogin,
        // logging out twice still clears the client's cookies
        (_, RouteEvent::Logout) => AccessDecision::EndSession,
        (AccessState::Anonymous, _) => AccessDecision::RedirectToLogin,
        (AccessState::Authenticated, RouteEvent::ShowLogin | RouteEvent::SubmitLogin) => {
            AccessDecision::RedirectToPredict
        }
        (AccessState::Authenticated, RouteEvent::ShowPredict) => AccessDecision::RenderPredict,
        (AccessState::Authenticated, RouteEvent::SubmitPredict) => AccessDecision::RelayUpload,
        (AccessState::Authenticated, RouteEvent::Unknown) => AccessDecision::NotFound,
    };

    debug!("Access {:?} + {:?} -> {:?}", state, event, decision);
    decision
}
