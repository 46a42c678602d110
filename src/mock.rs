//! Static classes, instructors, rooms, weekly schedule and no-show penalties
//! for running the client without a backend.

use crate::errors::GatewayError;
use crate::gateway::{Gateway, Outcome};
use crate::models::{
    AiMetrics, DashboardStats, LoginResponse, NewActivity, Program, ProgramCounts, ProgramStatus,
    Registration, ScheduledActivity,
};
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use once_cell::sync::Lazy;
use serde::Deserialize;
use std::collections::BTreeSet;
use std::sync::Mutex;
use tracing::info;

pub const MOCK_TOKEN: &str = "mock-token";
/// Reference day for the mock schedule; earlier classes count as finished.
pub const MOCK_TODAY: &str = "2025-10-16";
const ANY_CLASS: &str = "Todas";
const ANY_ROOM: &str = "Todas";
const ANY_INSTRUCTOR: &str = "Todos";

#[derive(Debug, Clone)]
pub struct MockUser {
    pub id: u32,
    pub name: &'static str,
    pub email: &'static str,
    pub avatar: &'static str,
    pub active_enrollments: Vec<&'static str>,
    pub blocked: bool,
}

#[derive(Debug, Clone)]
pub struct Enrollee {
    pub id: u32,
    pub name: &'static str,
    pub avatar: &'static str,
    pub enrolled_on: &'static str,
    pub present: bool,
}

#[derive(Debug, Clone)]
pub struct ClassSession {
    pub id: &'static str,
    pub name: &'static str,
    pub instructor: &'static str,
    pub date: &'static str,
    pub start: &'static str,
    pub end: &'static str,
    pub room: &'static str,
    pub capacity: u32,
    pub occupied: u32,
    pub present: u32,
    pub absent: u32,
    pub waitlist: u32,
    pub roster: Vec<Enrollee>,
}

impl ClassSession {
    pub fn duration_minutes(&self) -> Option<u32> {
        duration_minutes(self.start, self.end)
    }

    pub fn free_seats(&self) -> u32 {
        self.capacity.saturating_sub(self.occupied)
    }
}

#[derive(Debug, Clone)]
pub struct AvailableClass {
    pub id: &'static str,
    pub name: &'static str,
    pub kind: &'static str,
    pub date: &'static str,
    pub start: &'static str,
    pub end: &'static str,
    pub open_seats: u32,
    pub instructor: &'static str,
    pub room: &'static str,
}

#[derive(Debug, Clone)]
pub struct ScheduleEntry {
    pub id: &'static str,
    pub kind: &'static str,
    pub room: &'static str,
    pub instructor: &'static str,
    pub date: &'static str,
    pub start: &'static str,
    pub end: &'static str,
}

impl ScheduleEntry {
    pub fn date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(self.date, "%Y-%m-%d").ok()
    }

    pub fn duration_minutes(&self) -> Option<u32> {
        duration_minutes(self.start, self.end)
    }
}

#[derive(Debug, Clone)]
pub struct PenalizedMember {
    pub id: u32,
    pub name: &'static str,
    pub avatar: &'static str,
}

#[derive(Debug, Clone)]
pub struct Absence {
    pub class: &'static str,
    pub instructor: &'static str,
    pub date: &'static str,
    pub time_range: &'static str,
    pub room: &'static str,
}

#[derive(Debug, Clone)]
pub struct Penalty {
    pub id: u32,
    pub member: PenalizedMember,
    pub absences: Vec<Absence>,
    pub total_absences: u32,
    pub blocked: bool,
    pub days_blocked_remaining: u32,
    pub first_absence: &'static str,
}

#[derive(Debug, Clone)]
pub struct FilterOptions {
    pub classes: Vec<&'static str>,
    pub rooms: Vec<&'static str>,
    pub instructors: Vec<&'static str>,
}

#[derive(Debug, Clone)]
pub struct MockDataset {
    pub user: MockUser,
    pub classes: Vec<ClassSession>,
    pub available: Vec<AvailableClass>,
    pub schedule: Vec<ScheduleEntry>,
    pub penalties: Vec<Penalty>,
    pub filters: FilterOptions,
}

/// Schedule filter as picked on the classes page. "Todas"/"Todos" or an empty
/// value matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ClassFilter {
    #[serde(default)]
    pub class: String,
    #[serde(default)]
    pub room: String,
    #[serde(default)]
    pub instructor: String,
}

impl ClassFilter {
    pub fn matches(&self, entry: &ScheduleEntry) -> bool {
        accepts(&self.class, ANY_CLASS, entry.kind)
            && accepts(&self.room, ANY_ROOM, entry.room)
            && accepts(&self.instructor, ANY_INSTRUCTOR, entry.instructor)
    }
}

fn accepts(selected: &str, wildcard: &str, value: &str) -> bool {
    let selected = selected.trim();
    selected.is_empty() || selected == wildcard || selected == value
}

fn duration_minutes(start: &str, end: &str) -> Option<u32> {
    let start = NaiveTime::parse_from_str(start, "%H:%M").ok()?;
    let end = NaiveTime::parse_from_str(end, "%H:%M").ok()?;
    u32::try_from((end - start).num_minutes()).ok()
}

impl MockDataset {
    pub fn class(&self, id: &str) -> Option<&ClassSession> {
        self.classes.iter().find(|class| class.id == id)
    }

    pub fn filtered_schedule(&self, filter: &ClassFilter) -> Vec<&ScheduleEntry> {
        self.schedule
            .iter()
            .filter(|entry| filter.matches(entry))
            .collect()
    }

    pub fn blocked_members(&self) -> usize {
        self.penalties.iter().filter(|penalty| penalty.blocked).count()
    }
}

pub fn dataset() -> &'static MockDataset {
    &DATASET
}

fn enrollee(
    id: u32,
    name: &'static str,
    avatar: &'static str,
    enrolled_on: &'static str,
    present: bool,
) -> Enrollee {
    Enrollee {
        id,
        name,
        avatar,
        enrolled_on,
        present,
    }
}

fn entry(
    id: &'static str,
    kind: &'static str,
    room: &'static str,
    instructor: &'static str,
    date: &'static str,
    start: &'static str,
    end: &'static str,
) -> ScheduleEntry {
    ScheduleEntry {
        id,
        kind,
        room,
        instructor,
        date,
        start,
        end,
    }
}

fn absence(
    class: &'static str,
    instructor: &'static str,
    date: &'static str,
    time_range: &'static str,
    room: &'static str,
) -> Absence {
    Absence {
        class,
        instructor,
        date,
        time_range,
        room,
    }
}

static DATASET: Lazy<MockDataset> = Lazy::new(|| MockDataset {
    user: MockUser {
        id: 1,
        name: "Usuário Teste",
        email: "usuario@teste.com",
        avatar: "UT",
        active_enrollments: vec!["aula_1", "aula_5"],
        blocked: false,
    },
    classes: vec![
        ClassSession {
            id: "aula_1",
            name: "GINÁSIO",
            instructor: "Ramalho Sidnei",
            date: "2025-10-13",
            start: "07:00",
            end: "09:00",
            room: "GINÁSIO",
            capacity: 30,
            occupied: 21,
            present: 21,
            absent: 0,
            waitlist: 0,
            roster: vec![
                enrollee(1, "Brito André", "BA", "2025-10-10", true),
                enrollee(2, "Choi Sung", "CS", "2025-10-10", true),
                enrollee(3, "Ferrao Jose", "FJ", "2025-10-10", true),
                enrollee(4, "Ferreira Ricardo", "FR", "2025-10-10", true),
                enrollee(5, "Silva João", "SJ", "2025-10-11", true),
                enrollee(6, "Costa Maria", "CM", "2025-10-11", true),
                enrollee(7, "Santos Pedro", "SP", "2025-10-11", true),
                enrollee(8, "Oliveira Ana", "OA", "2025-10-11", true),
                enrollee(9, "Lima Carlos", "LC", "2025-10-12", true),
                enrollee(10, "Martins Paula", "MP", "2025-10-12", true),
                enrollee(11, "Rodrigues Bruno", "RB", "2025-10-12", true),
                enrollee(12, "Fernandes Carla", "FC", "2025-10-12", true),
                enrollee(13, "Almeida Rita", "AR", "2025-10-12", true),
                enrollee(14, "Sousa Miguel", "SM", "2025-10-12", true),
                enrollee(15, "Pereira Laura", "PL", "2025-10-12", true),
                enrollee(16, "Gomes Tiago", "GT", "2025-10-12", true),
                enrollee(17, "Ribeiro Sofia", "RS", "2025-10-12", true),
                enrollee(18, "Castro Diogo", "CD", "2025-10-12", true),
                enrollee(19, "Moreira Helena", "MH", "2025-10-12", true),
                enrollee(20, "Correia Vasco", "CV", "2025-10-12", true),
                enrollee(21, "Monteiro Inês", "MI", "2025-10-12", true),
            ],
        },
        ClassSession {
            id: "aula_2",
            name: "YOGA",
            instructor: "Ana Costa",
            date: "2025-10-14",
            start: "07:00",
            end: "08:00",
            room: "Sala 1",
            capacity: 20,
            occupied: 15,
            present: 14,
            absent: 1,
            waitlist: 2,
            roster: vec![
                enrollee(22, "Costa Sandra", "CS", "2025-10-11", true),
                enrollee(23, "Silva Teresa", "ST", "2025-10-11", true),
                enrollee(24, "Lopes André", "LA", "2025-10-11", false),
                enrollee(25, "Neves Catarina", "NC", "2025-10-12", true),
                enrollee(26, "Pinto Rui", "PR", "2025-10-12", true),
                enrollee(27, "Cunha Beatriz", "CB", "2025-10-12", true),
                enrollee(28, "Teixeira Marco", "TM", "2025-10-12", true),
                enrollee(29, "Barros Isabel", "BI", "2025-10-13", true),
                enrollee(30, "Cardoso Hugo", "CH", "2025-10-13", true),
                enrollee(31, "Azevedo Liliana", "AL", "2025-10-13", true),
                enrollee(32, "Mendes Filipe", "MF", "2025-10-13", true),
                enrollee(33, "Coelho Marta", "CM", "2025-10-13", true),
                enrollee(34, "Dias Rafael", "DR", "2025-10-13", true),
                enrollee(35, "Campos Joana", "CJ", "2025-10-13", true),
                enrollee(36, "Xavier Gonçalo", "XG", "2025-10-13", true),
            ],
        },
        ClassSession {
            id: "aula_3",
            name: "PILATES",
            instructor: "Patrício Susana",
            date: "2025-10-15",
            start: "18:00",
            end: "19:00",
            room: "Sala 2",
            capacity: 15,
            occupied: 12,
            present: 10,
            absent: 2,
            waitlist: 0,
            roster: vec![
                enrollee(37, "Antunes Vera", "AV", "2025-10-12", true),
                enrollee(38, "Baptista Nuno", "BN", "2025-10-12", false),
                enrollee(39, "Carvalho Sónia", "CS", "2025-10-12", true),
                enrollee(40, "Duarte Paulo", "DP", "2025-10-13", true),
                enrollee(41, "Esteves Clara", "EC", "2025-10-13", true),
                enrollee(42, "Fonseca Luís", "FL", "2025-10-13", false),
                enrollee(43, "Garcia Patrícia", "GP", "2025-10-13", true),
                enrollee(44, "Henriques Sérgio", "HS", "2025-10-14", true),
                enrollee(45, "Inácio Raquel", "IR", "2025-10-14", true),
                enrollee(46, "Jorge Válter", "JV", "2025-10-14", true),
                enrollee(47, "Leal Andreia", "LA", "2025-10-14", true),
                enrollee(48, "Matos Ricardo", "MR", "2025-10-14", true),
            ],
        },
    ],
    available: vec![
        AvailableClass {
            id: "aula_2",
            name: "YOGA",
            kind: "YOGA",
            date: "2025-10-14",
            start: "07:00",
            end: "08:00",
            open_seats: 5,
            instructor: "Ana Costa",
            room: "Sala 1",
        },
        AvailableClass {
            id: "aula_3",
            name: "PILATES",
            kind: "PILATES",
            date: "2025-10-15",
            start: "18:00",
            end: "19:00",
            open_seats: 3,
            instructor: "Patrício Susana",
            room: "Sala 2",
        },
        AvailableClass {
            id: "aula_4",
            name: "CROSSFIT",
            kind: "CROSSFIT",
            date: "2025-10-16",
            start: "19:00",
            end: "20:00",
            open_seats: 10,
            instructor: "João Silva",
            room: "Área Externa",
        },
        AvailableClass {
            id: "aula_5",
            name: "NATAÇÃO",
            kind: "NATAÇÃO",
            date: "2025-10-17",
            start: "06:00",
            end: "07:00",
            open_seats: 8,
            instructor: "Carlos Mendes",
            room: "Piscina",
        },
    ],
    schedule: vec![
        entry("aula_1", "GINÁSIO", "GINÁSIO", "Ramalho Sidnei", "2025-10-13", "07:00", "09:00"),
        entry("aula_2", "YOGA", "Sala 1", "Ana Costa", "2025-10-14", "07:00", "08:00"),
        entry("aula_3", "PILATES", "Sala 2", "Patrício Susana", "2025-10-15", "18:00", "19:00"),
        entry("aula_4", "CROSSFIT", "Área Externa", "João Silva", "2025-10-16", "19:00", "20:00"),
        entry("aula_5", "NATAÇÃO", "Piscina", "Carlos Mendes", "2025-10-17", "06:00", "07:00"),
        entry("aula_6", "YOGA", "Sala 1", "Ana Costa", "2025-10-18", "19:00", "20:00"),
        entry("aula_7", "GINÁSIO", "GINÁSIO", "Ramalho Sidnei", "2025-10-19", "07:00", "09:00"),
        entry("aula_8", "PILATES", "Sala 2", "Patrício Susana", "2025-10-20", "09:00", "10:00"),
    ],
    penalties: vec![
        Penalty {
            id: 1,
            member: PenalizedMember {
                id: 101,
                name: "Filipa Mendes",
                avatar: "BF",
            },
            absences: vec![absence(
                "PILATES",
                "Patrício Susana",
                "2025-10-07",
                "13:00 - 13:45",
                "STUDIO",
            )],
            total_absences: 1,
            blocked: false,
            days_blocked_remaining: 0,
            first_absence: "2025-10-07",
        },
        Penalty {
            id: 2,
            member: PenalizedMember {
                id: 102,
                name: "Brito Maria",
                avatar: "BY",
            },
            absences: vec![
                absence("YOGA", "Ana Costa", "2025-10-08", "07:00 - 08:00", "Sala 1"),
                absence("GINÁSIO", "Ramalho Sidnei", "2025-10-11", "19:00 - 20:00", "GINÁSIO"),
            ],
            total_absences: 2,
            blocked: true,
            days_blocked_remaining: 5,
            first_absence: "2025-10-08",
        },
        Penalty {
            id: 3,
            member: PenalizedMember {
                id: 103,
                name: "Caeiro Maria Helena",
                avatar: "BA",
            },
            absences: vec![
                absence("CROSSFIT", "João Silva", "2025-10-09", "19:00 - 20:00", "Área Externa"),
                absence("NATAÇÃO", "Carlos Mendes", "2025-10-12", "06:00 - 07:00", "Piscina"),
            ],
            total_absences: 2,
            blocked: true,
            days_blocked_remaining: 3,
            first_absence: "2025-10-09",
        },
    ],
    filters: FilterOptions {
        classes: vec![ANY_CLASS, "YOGA", "PILATES", "GINÁSIO", "NATAÇÃO", "CROSSFIT"],
        rooms: vec![
            ANY_ROOM,
            "Sala 1",
            "Sala 2",
            "GINÁSIO",
            "Piscina",
            "Área Externa",
            "STUDIO",
        ],
        instructors: vec![
            ANY_INSTRUCTOR,
            "João Silva",
            "Ana Costa",
            "Ramalho Sidnei",
            "Patrício Susana",
            "Carlos Mendes",
        ],
    },
});

/// Serves the mock dataset through the same interface as the live backend.
pub struct MockGateway {
    data: &'static MockDataset,
    activities: Mutex<Vec<ScheduledActivity>>,
}

impl Default for MockGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl MockGateway {
    pub fn new() -> Self {
        let data = dataset();
        Self {
            data,
            activities: Mutex::new(seed_activities(data)),
        }
    }

    fn today() -> Option<NaiveDate> {
        NaiveDate::parse_from_str(MOCK_TODAY, "%Y-%m-%d").ok()
    }

    fn with_activities<T>(&self, f: impl FnOnce(&mut Vec<ScheduledActivity>) -> T) -> T {
        let mut guard = self
            .activities
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut guard)
    }

    fn programs(&self) -> Vec<Program> {
        let today = Self::today();
        self.data
            .schedule
            .iter()
            .map(|entry| {
                let status = if entry.date() < today {
                    ProgramStatus::Expired
                } else if self.data.user.active_enrollments.contains(&entry.id) {
                    ProgramStatus::Assigned
                } else {
                    ProgramStatus::Unassigned
                };
                Program {
                    id: entry.id.trim_start_matches("aula_").parse().ok(),
                    name: format!("{} · {}", entry.kind, entry.date),
                    status,
                    enrolled: Some(
                        self.data
                            .class(entry.id)
                            .map(|class| u64::from(class.occupied))
                            .unwrap_or(0),
                    ),
                }
            })
            .collect()
    }
}

fn seed_activities(data: &MockDataset) -> Vec<ScheduledActivity> {
    let today = NaiveDate::parse_from_str(MOCK_TODAY, "%Y-%m-%d").ok();
    data.schedule
        .iter()
        .zip(1u64..)
        .map(|(entry, id)| ScheduledActivity {
            id,
            title: format!("{} {}", entry.kind, entry.start),
            description: Some(format!("{} · {}", entry.instructor, entry.room)),
            activity_type: Some(entry.kind.to_string()),
            duration_minutes: entry.duration_minutes(),
            completed: entry.date() < today,
            date: Some(entry.date.to_string()),
        })
        .collect()
}

fn percent(part: u32, whole: u32) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    (f64::from(part) * 10_000.0 / f64::from(whole)).round() / 100.0
}

#[async_trait]
impl Gateway for MockGateway {
    async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, GatewayError> {
        if email.trim() == self.data.user.email && !password.is_empty() {
            info!(email, "mock login");
            Ok(LoginResponse {
                access_token: MOCK_TOKEN.to_string(),
                display_name: Some(self.data.user.name.to_string()),
            })
        } else {
            Err(GatewayError::Authentication)
        }
    }

    async fn register(&self, registration: &Registration) -> Result<(), GatewayError> {
        if registration.email == self.data.user.email {
            return Err(GatewayError::Validation("E-mail já cadastrado".to_string()));
        }
        info!(email = %registration.email, "mock registration");
        Ok(())
    }

    async fn fetch_overview_stats(&self, token: Option<&str>) -> Outcome<DashboardStats> {
        if token.is_none() {
            return Outcome::Unauthenticated;
        }
        let members: BTreeSet<u32> = self
            .data
            .classes
            .iter()
            .flat_map(|class| class.roster.iter().map(|enrollee| enrollee.id))
            .collect();
        let present: BTreeSet<u32> = self
            .data
            .classes
            .iter()
            .flat_map(|class| class.roster.iter())
            .filter(|enrollee| enrollee.present)
            .map(|enrollee| enrollee.id)
            .collect();
        let total = members.len() as u64;
        let blocked = self.data.blocked_members() as u32;
        let programs = self.programs();
        let count = |status: ProgramStatus| {
            programs
                .iter()
                .filter(|program| program.status == status)
                .count() as u64
        };

        Outcome::Success(DashboardStats {
            churn_risk: Some(percent(blocked, members.len() as u32)),
            total_users: Some(total),
            active_users: Some(present.len() as u64),
            visitors: Some(self.data.classes.iter().map(|c| u64::from(c.waitlist)).sum()),
            programs: Some(ProgramCounts {
                expired: Some(count(ProgramStatus::Expired)),
                unassigned: Some(count(ProgramStatus::Unassigned)),
                assigned: Some(count(ProgramStatus::Assigned)),
            }),
        })
    }

    async fn fetch_ai_metrics(&self, token: Option<&str>, _unit_id: u32) -> Outcome<AiMetrics> {
        if token.is_none() {
            return Outcome::Unauthenticated;
        }
        let classes = &self.data.classes;
        let occupied: u32 = classes.iter().map(|class| class.occupied).sum();
        let present: u32 = classes.iter().map(|class| class.present).sum();
        let capacity: u32 = classes.iter().map(|class| class.capacity).sum();
        let waitlist: u32 = classes.iter().map(|class| class.waitlist).sum();

        Outcome::Success(AiMetrics {
            engagement_rate: Some(percent(present, occupied)),
            roi: Some(percent(occupied + waitlist, capacity)),
            productivity: Some(percent(occupied, capacity)),
            active_members: Some(u64::from(present)),
        })
    }

    async fn fetch_activity_history(&self, token: Option<&str>) -> Outcome<Vec<ScheduledActivity>> {
        if token.is_none() {
            return Outcome::Unauthenticated;
        }
        Outcome::Success(self.with_activities(|activities| activities.clone()))
    }

    async fn create_activity(&self, token: Option<&str>, activity: &NewActivity) -> Outcome<()> {
        if token.is_none() {
            return Outcome::Unauthenticated;
        }
        self.with_activities(|activities| {
            let id = activities.iter().map(|a| a.id).max().unwrap_or(0) + 1;
            activities.push(ScheduledActivity {
                id,
                title: activity.title.clone(),
                description: Some(activity.description.clone()).filter(|d| !d.is_empty()),
                activity_type: Some(activity.activity_type.clone()),
                duration_minutes: Some(activity.duration_minutes),
                completed: false,
                date: Some(MOCK_TODAY.to_string()),
            });
        });
        Outcome::Success(())
    }

    async fn complete_activity(&self, token: Option<&str>, id: u64) -> Outcome<()> {
        if token.is_none() {
            return Outcome::Unauthenticated;
        }
        self.with_activities(|activities| {
            match activities.iter_mut().find(|activity| activity.id == id) {
                Some(activity) => {
                    activity.mark_complete();
                    Outcome::Success(())
                }
                None => Outcome::Failure(GatewayError::Transport(
                    "Agenda não encontrada".to_string(),
                )),
            }
        })
    }

    async fn fetch_programs(&self, token: Option<&str>) -> Outcome<Vec<Program>> {
        if token.is_none() {
            return Outcome::Unauthenticated;
        }
        Outcome::Success(self.programs())
    }
}
