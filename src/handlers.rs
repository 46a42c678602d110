use crate::errors::{AppError, GatewayError};
use crate::gateway::{LOGIN_ERROR, Outcome};
use crate::loads;
use crate::mock::ClassFilter;
use crate::models::{
    ActivityForm, Identity, LoginForm, NewActivity, RegisterForm, Registration, SessionSnapshot,
};
use crate::navigation::{HomeTab, LoadAction, Page};
use crate::state::{AppState, AuthTab, AuthView};
use crate::stats::complete_locally;
use crate::toast::Severity;
use crate::ui::render_page;
use axum::{
    Form, Json,
    extract::{Path, State},
    response::{Html, Redirect},
};
use chrono::Local;
use tracing::{debug, error, info, warn};

pub const LOGIN_SUCCESS: &str = "Login realizado com sucesso!";
pub const REGISTER_SUCCESS: &str = "Registro realizado! Faça login.";
pub const ACTIVITY_CREATED: &str = "Atividade agendada!";
pub const ACTIVITY_COMPLETED: &str = "Atividade concluída!";

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let today = Local::now().date_naive();
    let client = state.client.lock().await;
    Html(render_page(&client, &state.config, today))
}

pub async fn session_snapshot(State(state): State<AppState>) -> Json<SessionSnapshot> {
    let client = state.client.lock().await;
    Json(SessionSnapshot {
        authenticated: client.session.is_active(),
        page: client.navigator.current_page().slug().to_string(),
        home_tab: client.navigator.current_home_tab().slug().to_string(),
        mock: state.config.is_mock(),
    })
}

pub async fn login(State(state): State<AppState>, Form(form): Form<LoginForm>) -> Redirect {
    let email = form.email.trim().to_string();
    let result = state.gateway.login(&email, &form.password).await;

    let ticket = {
        let mut client = state.client.lock().await;
        match result {
            Ok(response) if response.access_token.trim().is_empty() => {
                warn!("login response carried no token");
                client.auth_view.email = Some(email);
                client.report(&GatewayError::Transport(LOGIN_ERROR.to_string()));
                None
            }
            Ok(response) => {
                let identity = Identity {
                    email,
                    display_name: response.display_name,
                };
                if let Err(err) = client.session.establish(response.access_token, identity).await {
                    error!(error = %err, "session token not persisted");
                }
                info!("login succeeded");
                client.reset_views();
                client.auth_view = AuthView::default();
                client.toasts.show(LOGIN_SUCCESS, Severity::Success);
                client.navigator.activate_page(Page::Home)
            }
            Err(err) => {
                client.auth_view.email = Some(email);
                client.report(&err);
                None
            }
        }
    };

    if let Some(ticket) = ticket {
        loads::run(&state, ticket).await;
    }
    Redirect::to("/")
}

pub async fn register(State(state): State<AppState>, Form(form): Form<RegisterForm>) -> Redirect {
    let registration = Registration::from(form);
    let result = state.gateway.register(&registration).await;

    let mut client = state.client.lock().await;
    match result {
        Ok(()) => {
            info!(email = %registration.email, "registration accepted");
            client.auth_view = AuthView {
                tab: AuthTab::Login,
                email: Some(registration.email),
            };
            client.toasts.show(REGISTER_SUCCESS, Severity::Success);
        }
        Err(err) => client.report(&err),
    }
    Redirect::to("/")
}

pub async fn switch_auth_tab(
    State(state): State<AppState>,
    Path(tab): Path<String>,
) -> Result<Redirect, AppError> {
    let tab = AuthTab::from_slug(&tab)
        .ok_or_else(|| AppError::not_found(format!("unknown auth tab '{tab}'")))?;
    state.client.lock().await.auth_view.tab = tab;
    Ok(Redirect::to("/"))
}

pub async fn logout(State(state): State<AppState>) -> Result<Redirect, AppError> {
    let mut client = state.client.lock().await;
    client.reset_views();
    client.auth_view = AuthView::default();
    client.toasts.clear();
    client.session.clear().await?;
    info!("logged out");
    Ok(Redirect::to("/"))
}

pub async fn activate_page(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Redirect, AppError> {
    let page = Page::from_slug(&slug)
        .ok_or_else(|| AppError::not_found(format!("unknown page '{slug}'")))?;
    loads::activate_page(&state, page).await;
    Ok(Redirect::to("/"))
}

pub async fn activate_home_tab(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Redirect, AppError> {
    let tab = HomeTab::from_slug(&slug)
        .ok_or_else(|| AppError::not_found(format!("unknown home tab '{slug}'")))?;
    loads::activate_home_tab(&state, tab).await;
    Ok(Redirect::to("/"))
}

pub async fn create_activity(
    State(state): State<AppState>,
    Form(form): Form<ActivityForm>,
) -> Result<Redirect, AppError> {
    let Some(token) = state.token().await else {
        return Ok(Redirect::to("/"));
    };
    let activity = NewActivity::from(form);
    validate_activity(&activity)?;

    let outcome = state.gateway.create_activity(Some(&token), &activity).await;

    let created = {
        let mut client = state.client.lock().await;
        if client.session.token() != Some(token.as_str()) {
            debug!("session changed while creating activity");
            return Ok(Redirect::to("/"));
        }
        match outcome {
            Outcome::Success(()) => {
                client.toasts.show(ACTIVITY_CREATED, Severity::Success);
                true
            }
            Outcome::Unauthenticated => false,
            Outcome::Failure(err) => {
                client.report(&err);
                false
            }
        }
    };

    if created {
        loads::reload(&state, LoadAction::PlannerInit).await;
    }
    Ok(Redirect::to("/"))
}

fn validate_activity(activity: &NewActivity) -> Result<(), AppError> {
    if activity.title.is_empty() {
        return Err(AppError::bad_request("title is required"));
    }
    if activity.duration_minutes == 0 {
        return Err(AppError::bad_request("duration_minutes must be positive"));
    }
    Ok(())
}

pub async fn complete_activity(State(state): State<AppState>, Path(id): Path<u64>) -> Redirect {
    let Some(token) = state.token().await else {
        return Redirect::to("/");
    };

    let outcome = state.gateway.complete_activity(Some(&token), id).await;

    let mut client = state.client.lock().await;
    if client.session.token() != Some(token.as_str()) {
        debug!(id, "session changed while completing activity");
        return Redirect::to("/");
    }
    match outcome {
        Outcome::Success(()) => {
            if !complete_locally(&mut client.activities, id) {
                warn!(id, "activity already complete or not loaded");
            }
            client.repaint_activities();
            client.toasts.show(ACTIVITY_COMPLETED, Severity::Success);
        }
        Outcome::Unauthenticated => {}
        Outcome::Failure(err) => client.report(&err),
    }
    Redirect::to("/")
}

pub async fn filter_classes(
    State(state): State<AppState>,
    Form(filter): Form<ClassFilter>,
) -> Redirect {
    let mut client = state.client.lock().await;
    if client.session.is_active() {
        client.class_filter = filter;
    }
    Redirect::to("/")
}
