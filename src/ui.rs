use crate::config::Config;
use crate::mock::{ClassFilter, dataset};
use crate::navigation::{HomeTab, Page};
use crate::render::{
    Slot, escape, render_available_classes, render_class_details, render_class_schedule,
    render_penalties,
};
use crate::state::{AuthTab, ClientState};
use chrono::{Datelike, NaiveDate};

const WEEKDAYS: [&str; 7] = [
    "segunda-feira",
    "terça-feira",
    "quarta-feira",
    "quinta-feira",
    "sexta-feira",
    "sábado",
    "domingo",
];

const MONTHS: [&str; 12] = [
    "janeiro",
    "fevereiro",
    "março",
    "abril",
    "maio",
    "junho",
    "julho",
    "agosto",
    "setembro",
    "outubro",
    "novembro",
    "dezembro",
];

const ACCOUNT_TYPES: [(&str, &str); 3] = [
    ("gestor", "Gestor"),
    ("instrutor", "Instrutor"),
    ("colaborador", "Colaborador"),
];

/// `segunda-feira, 19 de outubro de 2026`
pub fn long_date_pt(date: NaiveDate) -> String {
    format!(
        "{}, {} de {} de {}",
        WEEKDAYS[date.weekday().num_days_from_monday() as usize],
        date.day(),
        MONTHS[date.month0() as usize],
        date.year()
    )
}

pub fn render_page(client: &ClientState, config: &Config, today: NaiveDate) -> String {
    let body = if client.session.is_active() {
        render_dashboard(client, config, today)
    } else {
        render_auth(client, config)
    };
    PAGE_HTML
        .replace("{{STYLE}}", STYLE)
        .replace("{{TOAST}}", &render_toast(client))
        .replace("{{BODY}}", &body)
}

fn render_toast(client: &ClientState) -> String {
    match client.toasts.visible() {
        Some((toast, remaining)) => format!(
            r#"<div id="toast" class="toast {class} show" role="status">{message}</div>
  <script>setTimeout(() => document.getElementById('toast').classList.remove('show'), {ms});</script>"#,
            class = toast.severity.css_class(),
            message = escape(&toast.message),
            ms = remaining.as_millis(),
        ),
        None => r#"<div id="toast" class="toast" role="status"></div>"#.to_string(),
    }
}

fn render_auth(client: &ClientState, config: &Config) -> String {
    let view = &client.auth_view;
    let (login_class, register_class) = match view.tab {
        AuthTab::Login => ("tab active", "tab"),
        AuthTab::Register => ("tab", "tab active"),
    };
    let form = match view.tab {
        AuthTab::Login => format!(
            r#"<form id="login-form" class="auth-form" method="post" action="/login">
        <label>E-mail<input id="login-email" name="email" type="email" value="{email}" required /></label>
        <label>Senha<input id="login-password" name="password" type="password" required /></label>
        <button class="btn-primary" type="submit">Entrar</button>
      </form>"#,
            email = escape(view.email.as_deref().unwrap_or_default()),
        ),
        AuthTab::Register => {
            let options: String = ACCOUNT_TYPES
                .iter()
                .map(|(value, label)| format!(r#"<option value="{value}">{label}</option>"#))
                .collect();
            format!(
                r#"<form id="register-form" class="auth-form" method="post" action="/register">
        <label>Nome<input id="register-name" name="name" required /></label>
        <label>E-mail<input id="register-email" name="email" type="email" required /></label>
        <label>Senha<input id="register-password" name="password" type="password" required /></label>
        <label>Tipo de conta<select name="account_type">{options}</select></label>
        <label>Unidade<input name="unit_id" type="number" min="1" value="{unit}" required /></label>
        <button class="btn-primary" type="submit">Criar conta</button>
      </form>"#,
                unit = config.unit_id,
            )
        }
    };

    format!(
        r#"<main class="app auth" id="login-section">
    <header>
      <h1>Myvivio</h1>
      <p class="subtitle">CRM para academias e bem-estar corporativo.</p>
    </header>
    <div class="tabs" role="tablist">
      <form method="post" action="/auth/login"><button class="{login_class}" type="submit">Entrar</button></form>
      <form method="post" action="/auth/register"><button class="{register_class}" type="submit">Registrar</button></form>
    </div>
    {form}
  </main>"#
    )
}

fn render_dashboard(client: &ClientState, config: &Config, today: NaiveDate) -> String {
    let current = client.navigator.current_page();
    let nav: String = Page::ALL
        .into_iter()
        .map(|page| {
            let class = if page == current { "nav-item active" } else { "nav-item" };
            format!(
                r#"<form method="post" action="/pages/{slug}"><button class="{class}" type="submit">{title}</button></form>"#,
                slug = page.slug(),
                title = page.title(),
            )
        })
        .collect();

    let user = client
        .session
        .identity()
        .map(|identity| escape(identity.label()))
        .unwrap_or_else(|| "Usuário".to_string());
    let mode = if config.is_mock() {
        r#"<span class="badge">dados de demonstração</span>"#
    } else {
        ""
    };

    let section = match current {
        Page::Home => home_section(client),
        Page::Planner => planner_section(client),
        Page::Training => training_section(client),
        Page::Classes => classes_section(&client.class_filter),
    };

    format!(
        r#"<main class="app" id="dashboard-section">
    <header class="topbar">
      <div>
        <h1>Olá, <span id="greetingName">{user}</span></h1>
        <p class="subtitle" id="currentDate">{date}</p>
      </div>
      <div class="topbar-actions">{mode}<form method="post" action="/logout"><button class="btn-secondary" type="submit">Sair</button></form></div>
    </header>
    <nav class="nav">{nav}</nav>
    {section}
  </main>"#,
        date = long_date_pt(today),
    )
}

fn stat(client: &ClientState, label: &str, slot: Slot) -> String {
    format!(
        r#"<div class="stat"><span class="label">{label}</span><span id="{id}" class="value">{value}</span></div>"#,
        id = slot.id(),
        value = client.dom.get(slot),
    )
}

fn home_section(client: &ClientState) -> String {
    let current_tab = client.navigator.current_home_tab();
    let tabs: String = HomeTab::ALL
        .into_iter()
        .map(|tab| {
            let class = if tab == current_tab { "tab active" } else { "tab" };
            format!(
                r#"<form method="post" action="/home/tabs/{slug}"><button class="{class}" type="submit">{title}</button></form>"#,
                slug = tab.slug(),
                title = tab.title(),
            )
        })
        .collect();

    let content = match current_tab {
        HomeTab::Overview => format!(
            r#"<section class="panel">{churn}{total}{active}{visitors}</section>
      <h2>Programas</h2>
      <section class="panel">{expired}{unassigned}{assigned}</section>
      <h2>Métricas de IA</h2>
      <section class="panel">{engagement}{roi}{productivity}{members}</section>"#,
            churn = stat(client, "Risco de desistência", Slot::ChurnRisk),
            total = stat(client, "Usuários totais", Slot::TotalUsers),
            active = stat(client, "Usuários ativos", Slot::ActiveUsers),
            visitors = stat(client, "Visitantes", Slot::Visitors),
            expired = stat(client, "Expirados", Slot::ProgramsExpired),
            unassigned = stat(client, "Não atribuídos", Slot::ProgramsUnassigned),
            assigned = stat(client, "Atribuídos", Slot::ProgramsAssigned),
            engagement = stat(client, "Engajamento", Slot::Engagement),
            roi = stat(client, "ROI", Slot::Roi),
            productivity = stat(client, "Produtividade", Slot::Productivity),
            members = stat(client, "Membros ativos", Slot::ActiveMembers),
        ),
        HomeTab::DayToDay => format!(
            r#"<section class="panel">{todo}{done}</section>
      <div class="timeline" id="{timeline_id}">{timeline}</div>"#,
            todo = stat(client, "A fazer", Slot::TodoCount),
            done = stat(client, "Concluídas", Slot::DoneCount),
            timeline_id = Slot::Timeline.id(),
            timeline = client.dom.get(Slot::Timeline),
        ),
    };

    format!(
        r#"<section class="page" id="home-page">
      <div class="tabs" role="tablist">{tabs}</div>
      {content}
    </section>"#
    )
}

fn planner_section(client: &ClientState) -> String {
    format!(
        r#"<section class="page" id="planner-page">
      <h2>Nova atividade</h2>
      <form id="practice-form" class="card-form" method="post" action="/agendas">
        <label>Título<input name="title" required /></label>
        <label>Descrição<input name="description" /></label>
        <label>Tipo de atividade<input name="activity_type" required /></label>
        <label>Duração (min)<input name="duration_minutes" type="number" min="1" required /></label>
        <button class="btn-primary" type="submit">Agendar</button>
      </form>
      <h2>Histórico</h2>
      <div class="timeline" id="{id}">{list}</div>
    </section>"#,
        id = Slot::PlannerList.id(),
        list = client.dom.get(Slot::PlannerList),
    )
}

fn training_section(client: &ClientState) -> String {
    format!(
        r#"<section class="page" id="training-page">
      <h2>Programas</h2>
      <div class="program-grid" id="{id}">{grid}</div>
    </section>"#,
        id = Slot::ProgramGrid.id(),
        grid = client.dom.get(Slot::ProgramGrid),
    )
}

fn select(name: &str, options: &[&str], selected: &str) -> String {
    let options: String = options
        .iter()
        .map(|option| {
            let marker = if *option == selected { " selected" } else { "" };
            format!(
                r#"<option value="{value}"{marker}>{value}</option>"#,
                value = escape(option)
            )
        })
        .collect();
    format!(r#"<select name="{name}">{options}</select>"#)
}

fn classes_section(filter: &ClassFilter) -> String {
    let data = dataset();
    format!(
        r#"<section class="page" id="classes-page">
      <h2>Agenda de aulas</h2>
      <form class="filters" method="post" action="/classes/filter">
        {classes}{rooms}{instructors}
        <button class="btn-secondary" type="submit">Filtrar</button>
      </form>
      {schedule}
      <h2>Vagas abertas</h2>
      <div class="class-grid">{available}</div>
      <h2>Aulas recentes</h2>
      <div class="class-grid">{details}</div>
      <h2>Penalidades por falta</h2>
      <div class="penalty-grid">{penalties}</div>
    </section>"#,
        classes = select("class", &data.filters.classes, &filter.class),
        rooms = select("room", &data.filters.rooms, &filter.room),
        instructors = select("instructor", &data.filters.instructors, &filter.instructor),
        schedule = render_class_schedule(&data.filtered_schedule(filter)),
        available = render_available_classes(&data.available),
        details = render_class_details(&data.classes),
        penalties = render_penalties(&data.penalties),
    )
}

const PAGE_HTML: &str = r#"<!DOCTYPE html>
<html lang="pt-BR">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Myvivio CRM</title>
  <style>{{STYLE}}</style>
</head>
<body>
  {{BODY}}
  {{TOAST}}
</body>
</html>
"#;

const STYLE: &str = r#"
    @import url('https://fonts.googleapis.com/css2?family=Space+Grotesk:wght@400;500;600&family=Fraunces:wght@600&display=swap');

    :root {
      --bg-1: #f8f3e6;
      --bg-2: #f5d3a7;
      --ink: #2b2a28;
      --accent: #ff6b4a;
      --accent-2: #2f4858;
      --card: rgba(255, 255, 255, 0.86);
      --shadow: 0 24px 60px rgba(47, 72, 88, 0.18);
    }

    * { box-sizing: border-box; }

    body {
      margin: 0;
      min-height: 100vh;
      background: radial-gradient(circle at top, var(--bg-2), transparent 60%),
        linear-gradient(135deg, var(--bg-1), #ffe9d4 60%, #f9f2e9 100%);
      color: var(--ink);
      font-family: "Space Grotesk", "Trebuchet MS", sans-serif;
      display: grid;
      place-items: center;
      padding: 32px 18px 48px;
    }

    .app {
      width: min(1040px, 100%);
      background: var(--card);
      backdrop-filter: blur(12px);
      border-radius: 28px;
      box-shadow: var(--shadow);
      padding: 36px;
      display: grid;
      gap: 24px;
    }

    .app.auth { width: min(460px, 100%); }

    h1 {
      font-family: "Fraunces", "Georgia", serif;
      font-weight: 600;
      font-size: clamp(1.8rem, 4vw, 2.6rem);
      margin: 0;
    }

    h2 { margin: 8px 0 0; font-size: 1.2rem; }

    .subtitle { margin: 0; color: #5f5c57; }

    .topbar { display: flex; justify-content: space-between; align-items: center; gap: 16px; }
    .topbar-actions { display: flex; align-items: center; gap: 12px; }
    .badge { font-size: 0.8rem; padding: 4px 10px; border-radius: 999px; background: rgba(47, 72, 88, 0.1); }

    form { margin: 0; }

    .nav, .tabs { display: flex; flex-wrap: wrap; gap: 6px; padding: 6px; background: rgba(47, 72, 88, 0.08); border-radius: 999px; }

    .panel, .program-grid, .class-grid, .penalty-grid {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(180px, 1fr));
      gap: 16px;
    }

    .stat, .program-card, .class-card, .penalty-card, .timeline-item {
      background: white;
      border-radius: 18px;
      padding: 16px;
      border: 1px solid rgba(47, 72, 88, 0.08);
      display: grid;
      gap: 8px;
    }

    .stat .label { font-size: 0.8rem; text-transform: uppercase; letter-spacing: 0.12em; color: #8b857d; }
    .stat .value { font-size: 1.6rem; font-weight: 600; color: var(--accent-2); }

    .timeline { display: grid; gap: 10px; }
    .timeline-item { grid-template-columns: 1fr auto; align-items: center; }
    .timeline-item.done .timeline-label { color: #2d7a4b; }
    .timeline-description { margin: 0; grid-column: 1; color: #6f6a65; font-size: 0.9rem; }

    .status-expired { border-left: 6px solid #c63b2b; }
    .status-unassigned { border-left: 6px solid #e0a800; }
    .status-assigned { border-left: 6px solid #2d7a4b; }
    .status-other { border-left: 6px solid #8b857d; }

    .empty-state { color: #8b857d; text-align: center; padding: 24px; }

    .auth-form, .card-form, .filters { display: grid; gap: 12px; }
    .filters { grid-template-columns: repeat(auto-fit, minmax(160px, 1fr)); }
    label { display: grid; gap: 6px; font-size: 0.9rem; }
    input, select { padding: 10px 14px; border-radius: 12px; border: 1px solid rgba(47, 72, 88, 0.2); font: inherit; }

    button {
      appearance: none;
      border: none;
      border-radius: 999px;
      padding: 10px 16px;
      font: inherit;
      font-weight: 600;
      cursor: pointer;
      background: transparent;
      color: #6b645d;
    }

    .tab.active, .nav-item.active { background: white; color: var(--accent-2); box-shadow: 0 8px 16px rgba(47, 72, 88, 0.12); }
    .btn-primary, .btn-complete { background: var(--accent); color: white; }
    .btn-secondary { background: var(--accent-2); color: white; }

    .schedule { width: 100%; border-collapse: collapse; background: white; border-radius: 18px; overflow: hidden; }
    .schedule th, .schedule td { padding: 10px 12px; text-align: left; border-bottom: 1px solid rgba(47, 72, 88, 0.08); }
    .roster { list-style: none; padding: 0; margin: 0; display: flex; flex-wrap: wrap; gap: 6px; font-size: 0.85rem; }
    .roster .absent { color: #c63b2b; }
    .avatar { display: inline-block; min-width: 2em; font-weight: 600; color: var(--accent-2); }
    .penalty-status.blocked { color: #c63b2b; font-weight: 600; }

    .toast {
      position: fixed;
      bottom: 24px;
      right: 24px;
      padding: 14px 20px;
      border-radius: 14px;
      color: white;
      background: var(--accent-2);
      opacity: 0;
      pointer-events: none;
      transition: opacity 200ms ease;
    }
    .toast.show { opacity: 1; }
    .toast.success { background: #2d7a4b; }
    .toast.error { background: #c63b2b; }

    @media (max-width: 600px) {
      .app { padding: 28px 22px; }
      .topbar { flex-direction: column; align-items: flex-start; }
    }
"#;
