use crate::gateway::Outcome;
use crate::navigation::{HomeTab, LoadAction, Page, Ticket};
use crate::render::{render_metrics, render_program_grid, render_stats};
use crate::state::{AppState, ClientState};
use tracing::{debug, info};

/// Activates a page and runs its load. Without a session nothing happens.
pub async fn activate_page(state: &AppState, page: Page) {
    let ticket = {
        let mut client = state.client.lock().await;
        if !client.session.is_active() {
            debug!(page = page.slug(), "ignoring navigation without session");
            return;
        }
        client.navigator.activate_page(page)
    };
    if let Some(ticket) = ticket {
        run(state, ticket).await;
    }
}

pub async fn activate_home_tab(state: &AppState, tab: HomeTab) {
    let ticket = {
        let mut client = state.client.lock().await;
        if !client.session.is_active() {
            return;
        }
        client.navigator.activate_home_tab(tab)
    };
    if let Some(ticket) = ticket {
        run(state, ticket).await;
    }
}

/// Reissues a load for a view, e.g. after creating an activity.
pub async fn reload(state: &AppState, action: LoadAction) {
    let ticket = state.client.lock().await.navigator.issue(action);
    run(state, ticket).await;
}

/// Startup: a restored session lands on the home page with its data.
pub async fn bootstrap(state: &AppState) {
    let restored = state.client.lock().await.session.is_active();
    if restored {
        info!("session restored; loading dashboard");
        activate_page(state, Page::Home).await;
    }
}

pub async fn run(state: &AppState, ticket: Ticket) {
    let token = state.token().await;
    let token = token.as_deref();
    match ticket.action {
        LoadAction::Dashboard => load_dashboard(state, ticket, token).await,
        LoadAction::PlannerInit | LoadAction::DayToDay => load_history(state, ticket, token).await,
        LoadAction::Programs => load_programs(state, ticket, token).await,
    }
}

fn still_current(client: &ClientState, ticket: &Ticket) -> bool {
    let current = client.session.is_active() && client.navigator.is_current(ticket);
    if !current {
        debug!(?ticket, "discarding stale response");
    }
    current
}

async fn load_dashboard(state: &AppState, ticket: Ticket, token: Option<&str>) {
    let gateway = &state.gateway;
    let (stats, metrics) = tokio::join!(
        gateway.fetch_overview_stats(token),
        gateway.fetch_ai_metrics(token, state.config.unit_id)
    );

    let mut client = state.client.lock().await;
    if !still_current(&client, &ticket) {
        return;
    }

    let stats_failed = match stats {
        Outcome::Success(stats) => {
            render_stats(&mut client.dom, &stats);
            false
        }
        Outcome::Unauthenticated => {
            debug!("dashboard load skipped without session");
            false
        }
        Outcome::Failure(err) => {
            client.report(&err);
            true
        }
    };
    // One toast per load: a stats failure already covers the dashboard.
    match metrics {
        Outcome::Success(metrics) => render_metrics(&mut client.dom, Some(&metrics)),
        Outcome::Unauthenticated => {}
        Outcome::Failure(err) if stats_failed => {
            debug!(error = %err, "ai metrics unavailable")
        }
        Outcome::Failure(err) => client.report(&err),
    }
}

async fn load_history(state: &AppState, ticket: Ticket, token: Option<&str>) {
    let outcome = state.gateway.fetch_activity_history(token).await;

    let mut client = state.client.lock().await;
    if !still_current(&client, &ticket) {
        return;
    }

    match outcome {
        Outcome::Success(activities) => {
            debug!(count = activities.len(), "agenda loaded");
            client.activities = activities;
            client.repaint_activities();
        }
        Outcome::Unauthenticated => debug!("agenda load skipped without session"),
        Outcome::Failure(err) => client.report(&err),
    }
}

async fn load_programs(state: &AppState, ticket: Ticket, token: Option<&str>) {
    let outcome = state.gateway.fetch_programs(token).await;

    let mut client = state.client.lock().await;
    if !still_current(&client, &ticket) {
        return;
    }

    match outcome {
        Outcome::Success(programs) => render_program_grid(&mut client.dom, &programs),
        Outcome::Unauthenticated => debug!("program load skipped without session"),
        Outcome::Failure(err) => client.report(&err),
    }
}
