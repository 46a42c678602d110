//! Formatting of fetched data into HTML fragments.
//!
//! Renderers never touch the network or the session. They write into a
//! [`Dom`], a fixed set of on-screen slots that the page shell lays out.

use crate::mock::{AvailableClass, ClassSession, Penalty, ScheduleEntry};
use crate::models::{AiMetrics, DashboardStats, Program, ScheduledActivity};
use crate::stats::summarize;
use std::collections::BTreeMap;

pub const EMPTY_ACTIVITIES: &str = "Nenhuma atividade encontrada";
pub const EMPTY_PROGRAMS: &str = "Nenhum programa encontrado";
pub const EMPTY_SCHEDULE: &str = "Nenhuma aula encontrada para os filtros selecionados";
pub const PENDING_LABEL: &str = "Pendente";
pub const DONE_LABEL: &str = "Concluída";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Slot {
    ChurnRisk,
    TotalUsers,
    ActiveUsers,
    Visitors,
    ProgramsExpired,
    ProgramsUnassigned,
    ProgramsAssigned,
    Engagement,
    Roi,
    Productivity,
    ActiveMembers,
    TodoCount,
    DoneCount,
    Timeline,
    PlannerList,
    ProgramGrid,
}

impl Slot {
    pub const ALL: [Slot; 16] = [
        Slot::ChurnRisk,
        Slot::TotalUsers,
        Slot::ActiveUsers,
        Slot::Visitors,
        Slot::ProgramsExpired,
        Slot::ProgramsUnassigned,
        Slot::ProgramsAssigned,
        Slot::Engagement,
        Slot::Roi,
        Slot::Productivity,
        Slot::ActiveMembers,
        Slot::TodoCount,
        Slot::DoneCount,
        Slot::Timeline,
        Slot::PlannerList,
        Slot::ProgramGrid,
    ];

    /// Element id in the page shell.
    pub fn id(self) -> &'static str {
        match self {
            Slot::ChurnRisk => "riscoDesistencia",
            Slot::TotalUsers => "usuariosTotais",
            Slot::ActiveUsers => "usuariosAtivos",
            Slot::Visitors => "visitantes",
            Slot::ProgramsExpired => "programasExpirados",
            Slot::ProgramsUnassigned => "programasNaoAtribuidos",
            Slot::ProgramsAssigned => "programasAtribuidos",
            Slot::Engagement => "taxaEngajamento",
            Slot::Roi => "roi",
            Slot::Productivity => "produtividade",
            Slot::ActiveMembers => "membrosAtivos",
            Slot::TodoCount => "todoCount",
            Slot::DoneCount => "doneCount",
            Slot::Timeline => "timeline",
            Slot::PlannerList => "plannerList",
            Slot::ProgramGrid => "programGrid",
        }
    }

    fn initial(self) -> &'static str {
        match self {
            Slot::Timeline | Slot::PlannerList | Slot::ProgramGrid => "",
            _ => "0",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Dom {
    slots: BTreeMap<Slot, String>,
}

impl Default for Dom {
    fn default() -> Self {
        Self {
            slots: Slot::ALL
                .into_iter()
                .map(|slot| (slot, slot.initial().to_string()))
                .collect(),
        }
    }
}

impl Dom {
    pub fn get(&self, slot: Slot) -> &str {
        self.slots.get(&slot).map(String::as_str).unwrap_or_default()
    }

    pub fn set(&mut self, slot: Slot, html: impl Into<String>) {
        self.slots.insert(slot, html.into());
    }
}

pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            // Keeps user text from forming template placeholders.
            '{' => escaped.push_str("&#123;"),
            '}' => escaped.push_str("&#125;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Rounds to two decimals and drops a trailing `.0`.
pub fn format_number(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    if rounded == 0.0 {
        return "0".to_string();
    }
    rounded.to_string()
}

fn count(value: Option<u64>) -> String {
    value.unwrap_or(0).to_string()
}

pub fn render_stats(dom: &mut Dom, stats: &DashboardStats) {
    let programs = stats.programs.clone().unwrap_or_default();
    dom.set(Slot::ChurnRisk, format_number(stats.churn_risk.unwrap_or(0.0)));
    dom.set(Slot::TotalUsers, count(stats.total_users));
    dom.set(Slot::ActiveUsers, count(stats.active_users));
    dom.set(Slot::Visitors, count(stats.visitors));
    dom.set(Slot::ProgramsExpired, count(programs.expired));
    dom.set(Slot::ProgramsUnassigned, count(programs.unassigned));
    dom.set(Slot::ProgramsAssigned, count(programs.assigned));
}

pub fn render_metrics(dom: &mut Dom, metrics: Option<&AiMetrics>) {
    let Some(metrics) = metrics else {
        return;
    };
    let percent = |value: Option<f64>| format!("{}%", format_number(value.unwrap_or(0.0)));
    dom.set(Slot::Engagement, percent(metrics.engagement_rate));
    dom.set(Slot::Roi, percent(metrics.roi));
    dom.set(Slot::Productivity, percent(metrics.productivity));
    dom.set(Slot::ActiveMembers, count(metrics.active_members));
}

/// Plain-text reading of a row, e.g. `30 min / A / X - Pendente`.
pub fn activity_row_label(activity: &ScheduledActivity) -> String {
    format!(
        "{} min / {} / {} - {}",
        activity.duration_minutes.unwrap_or(0),
        activity.title,
        activity.activity_type.as_deref().unwrap_or("-"),
        if activity.completed {
            DONE_LABEL
        } else {
            PENDING_LABEL
        }
    )
}

fn empty_state(message: &str) -> String {
    format!(r#"<p class="empty-state">{}</p>"#, escape(message))
}

fn activity_row(activity: &ScheduledActivity, with_description: bool) -> String {
    let state = if activity.completed { "done" } else { "pending" };
    let description = match activity.description.as_deref() {
        Some(text) if with_description && !text.is_empty() => {
            format!(r#"<p class="timeline-description">{}</p>"#, escape(text))
        }
        _ => String::new(),
    };
    let action = if activity.completed {
        String::new()
    } else {
        format!(
            r#"<form method="post" action="/agendas/{}/complete"><button class="btn-complete" type="submit">Concluir</button></form>"#,
            activity.id
        )
    };
    format!(
        r#"<div class="timeline-item {state}" data-id="{id}"><span class="timeline-label">{label}</span>{description}{action}</div>"#,
        id = activity.id,
        label = escape(&activity_row_label(activity)),
    )
}

pub fn render_activity_list(dom: &mut Dom, slot: Slot, activities: &[ScheduledActivity]) {
    if activities.is_empty() {
        dom.set(slot, empty_state(EMPTY_ACTIVITIES));
        return;
    }
    let with_description = slot == Slot::PlannerList;
    let rows: String = activities
        .iter()
        .map(|activity| activity_row(activity, with_description))
        .collect();
    dom.set(slot, rows);
}

pub fn render_day_to_day(dom: &mut Dom, activities: &[ScheduledActivity]) {
    let summary = summarize(activities);
    dom.set(Slot::TodoCount, summary.todo.to_string());
    dom.set(Slot::DoneCount, summary.done.to_string());
    render_activity_list(dom, Slot::Timeline, activities);
}

pub fn render_program_grid(dom: &mut Dom, programs: &[Program]) {
    if programs.is_empty() {
        dom.set(Slot::ProgramGrid, empty_state(EMPTY_PROGRAMS));
        return;
    }
    let cards: String = programs
        .iter()
        .map(|program| {
            format!(
                r#"<div class="program-card {class}"><h4>{name}</h4><span class="program-status">{status}</span><span class="program-enrolled">{enrolled} matriculados</span></div>"#,
                class = program.status.css_class(),
                name = escape(&program.name),
                status = escape(program.status.label()),
                enrolled = count(program.enrolled),
            )
        })
        .collect();
    dom.set(Slot::ProgramGrid, cards);
}

pub fn render_class_schedule(entries: &[&ScheduleEntry]) -> String {
    if entries.is_empty() {
        return empty_state(EMPTY_SCHEDULE);
    }
    let rows: String = entries
        .iter()
        .map(|entry| {
            format!(
                "<tr><td>{}</td><td>{} - {}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                escape(entry.date),
                escape(entry.start),
                escape(entry.end),
                escape(entry.kind),
                escape(entry.room),
                escape(entry.instructor),
            )
        })
        .collect();
    format!(
        r#"<table class="schedule"><thead><tr><th>Data</th><th>Horário</th><th>Aula</th><th>Sala</th><th>Instrutor</th></tr></thead><tbody>{rows}</tbody></table>"#
    )
}

pub fn render_class_details(classes: &[ClassSession]) -> String {
    classes
        .iter()
        .map(|class| {
            let roster: String = class
                .roster
                .iter()
                .map(|enrollee| {
                    format!(
                        r#"<li class="{state}"><span class="avatar">{avatar}</span>{name}</li>"#,
                        state = if enrollee.present { "present" } else { "absent" },
                        avatar = escape(enrollee.avatar),
                        name = escape(enrollee.name),
                    )
                })
                .collect();
            format!(
                r#"<div class="class-card"><h4>{name}</h4><p>{instructor} · {room} · {date} {start} - {end}</p><p class="class-occupancy">{occupied}/{capacity} vagas · {present} presentes · {absent} ausentes · {waitlist} em espera</p><ul class="roster">{roster}</ul></div>"#,
                name = escape(class.name),
                instructor = escape(class.instructor),
                room = escape(class.room),
                date = escape(class.date),
                start = escape(class.start),
                end = escape(class.end),
                occupied = class.occupied,
                capacity = class.capacity,
                present = class.present,
                absent = class.absent,
                waitlist = class.waitlist,
            )
        })
        .collect()
}

pub fn render_available_classes(classes: &[AvailableClass]) -> String {
    classes
        .iter()
        .map(|class| {
            format!(
                r#"<div class="class-card"><h4>{name}</h4><p>{kind} · {instructor} · {room}</p><p>{date} {start} - {end}</p><span class="class-seats">{seats} vagas livres</span></div>"#,
                name = escape(class.name),
                kind = escape(class.kind),
                instructor = escape(class.instructor),
                room = escape(class.room),
                date = escape(class.date),
                start = escape(class.start),
                end = escape(class.end),
                seats = class.open_seats,
            )
        })
        .collect()
}

pub fn render_penalties(penalties: &[Penalty]) -> String {
    penalties
        .iter()
        .map(|penalty| {
            let absences: String = penalty
                .absences
                .iter()
                .map(|absence| {
                    format!(
                        "<li>{} · {} · {} {} · {}</li>",
                        escape(absence.class),
                        escape(absence.instructor),
                        escape(absence.date),
                        escape(absence.time_range),
                        escape(absence.room),
                    )
                })
                .collect();
            let status = if penalty.blocked {
                format!(
                    r#"<span class="penalty-status blocked">Bloqueado · {} dias restantes</span>"#,
                    penalty.days_blocked_remaining
                )
            } else {
                r#"<span class="penalty-status">Ativo</span>"#.to_string()
            };
            format!(
                r#"<div class="penalty-card"><h4><span class="avatar">{avatar}</span>{name}</h4>{status}<p>{total} falta(s) desde {first}</p><ul>{absences}</ul></div>"#,
                avatar = escape(penalty.member.avatar),
                name = escape(penalty.member.name),
                total = penalty.total_absences,
                first = escape(penalty.first_absence),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{ClassFilter, dataset};
    use crate::models::{ProgramCounts, ProgramStatus};

    fn activity(id: u64, title: &str, completed: bool) -> ScheduledActivity {
        ScheduledActivity {
            id,
            title: title.to_string(),
            description: Some("Descrição".to_string()),
            activity_type: Some("X".to_string()),
            duration_minutes: Some(30),
            completed,
            date: None,
        }
    }

    #[test]
    fn missing_stats_render_as_zero() {
        let mut dom = Dom::default();
        dom.set(Slot::Visitors, "stale");
        render_stats(&mut dom, &DashboardStats::default());
        for slot in [
            Slot::ChurnRisk,
            Slot::TotalUsers,
            Slot::ActiveUsers,
            Slot::Visitors,
            Slot::ProgramsExpired,
            Slot::ProgramsUnassigned,
            Slot::ProgramsAssigned,
        ] {
            assert_eq!(dom.get(slot), "0", "{slot:?}");
        }
    }

    #[test]
    fn stats_render_present_values() {
        let mut dom = Dom::default();
        let stats = DashboardStats {
            churn_risk: Some(0.35),
            total_users: Some(120),
            active_users: None,
            visitors: Some(7),
            programs: Some(ProgramCounts {
                expired: Some(2),
                unassigned: None,
                assigned: Some(5),
            }),
        };
        render_stats(&mut dom, &stats);
        assert_eq!(dom.get(Slot::ChurnRisk), "0.35");
        assert_eq!(dom.get(Slot::TotalUsers), "120");
        assert_eq!(dom.get(Slot::ActiveUsers), "0");
        assert_eq!(dom.get(Slot::ProgramsUnassigned), "0");
        assert_eq!(dom.get(Slot::ProgramsAssigned), "5");
    }

    #[test]
    fn metrics_get_percent_suffix_and_absent_metrics_keep_content() {
        let mut dom = Dom::default();
        let metrics = AiMetrics {
            engagement_rate: Some(93.75),
            roi: None,
            productivity: Some(12.0),
            active_members: Some(45),
        };
        render_metrics(&mut dom, Some(&metrics));
        assert_eq!(dom.get(Slot::Engagement), "93.75%");
        assert_eq!(dom.get(Slot::Roi), "0%");
        assert_eq!(dom.get(Slot::Productivity), "12%");
        assert_eq!(dom.get(Slot::ActiveMembers), "45");

        render_metrics(&mut dom, None);
        assert_eq!(dom.get(Slot::Engagement), "93.75%");
    }

    #[test]
    fn empty_sequences_render_one_placeholder_and_no_rows() {
        let mut dom = Dom::default();
        render_day_to_day(&mut dom, &[]);
        render_program_grid(&mut dom, &[]);

        let timeline = dom.get(Slot::Timeline);
        assert_eq!(timeline.matches("empty-state").count(), 1);
        assert_eq!(timeline.matches("timeline-item").count(), 0);
        assert!(timeline.contains(EMPTY_ACTIVITIES));

        let grid = dom.get(Slot::ProgramGrid);
        assert_eq!(grid.matches("empty-state").count(), 1);
        assert_eq!(grid.matches("program-card").count(), 0);
        assert!(grid.contains(EMPTY_PROGRAMS));
    }

    #[test]
    fn single_pending_activity_reads_as_expected() {
        let activity = ScheduledActivity {
            id: 1,
            title: "A".to_string(),
            description: None,
            activity_type: Some("X".to_string()),
            duration_minutes: Some(30),
            completed: false,
            date: None,
        };
        let mut dom = Dom::default();
        render_day_to_day(&mut dom, std::slice::from_ref(&activity));

        assert_eq!(activity_row_label(&activity), "30 min / A / X - Pendente");
        assert_eq!(dom.get(Slot::TodoCount), "1");
        assert_eq!(dom.get(Slot::DoneCount), "0");
        let timeline = dom.get(Slot::Timeline);
        assert_eq!(timeline.matches("timeline-item").count(), 1);
        assert!(timeline.contains("30 min / A / X - Pendente"));
    }

    #[test]
    fn only_incomplete_rows_get_a_complete_action() {
        let mut dom = Dom::default();
        render_activity_list(
            &mut dom,
            Slot::PlannerList,
            &[activity(1, "Aberta", false), activity(2, "Feita", true)],
        );
        let html = dom.get(Slot::PlannerList);
        assert!(html.contains(r#"action="/agendas/1/complete""#));
        assert!(!html.contains(r#"action="/agendas/2/complete""#));
        assert!(html.contains("Feita / X - Concluída"));
        assert!(html.contains("timeline-description"));
    }

    #[test]
    fn titles_are_escaped() {
        let mut dom = Dom::default();
        render_activity_list(&mut dom, Slot::Timeline, &[activity(1, "<b>A&B</b>", false)]);
        assert!(dom.get(Slot::Timeline).contains("&lt;b&gt;A&amp;B&lt;/b&gt;"));
    }

    #[test]
    fn program_cards_carry_status_class() {
        let mut dom = Dom::default();
        let programs = vec![
            Program {
                id: Some(1),
                name: "Hipertrofia".to_string(),
                status: ProgramStatus::Assigned,
                enrolled: Some(12),
            },
            Program {
                id: Some(2),
                name: "Emagrecimento".to_string(),
                status: ProgramStatus::Expired,
                enrolled: None,
            },
        ];
        render_program_grid(&mut dom, &programs);
        let html = dom.get(Slot::ProgramGrid);
        assert_eq!(html.matches("program-card").count(), 2);
        assert!(html.contains("program-card status-assigned"));
        assert!(html.contains("program-card status-expired"));
        assert!(html.contains("12 matriculados"));
        assert!(html.contains("0 matriculados"));
    }

    #[test]
    fn mock_pages_render_schedule_details_and_penalties() {
        let data = dataset();
        let schedule = render_class_schedule(&data.filtered_schedule(&ClassFilter::default()));
        assert_eq!(schedule.matches("<tr><td>").count(), 8);

        let details = render_class_details(&data.classes);
        assert_eq!(details.matches(r#"<li class="absent">"#).count(), 3);

        let penalties = render_penalties(&data.penalties);
        assert_eq!(penalties.matches("Bloqueado").count(), 2);

        assert!(render_class_schedule(&[]).contains(EMPTY_SCHEDULE));
    }

    #[test]
    fn numbers_drop_needless_decimals() {
        assert_eq!(format_number(0.0), "0");
        assert_eq!(format_number(12.0), "12");
        assert_eq!(format_number(0.1 + 0.2), "0.3");
    }
}
