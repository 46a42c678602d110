use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub email: String,
    pub display_name: Option<String>,
}

impl Identity {
    pub fn label(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.email)
    }
}

#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    #[serde(rename = "senha")]
    pub password: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    #[serde(default, rename = "nome")]
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Registration {
    pub email: String,
    #[serde(rename = "senha")]
    pub password: String,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "tipo")]
    pub account_type: String,
    #[serde(rename = "unidade_id")]
    pub unit_id: u32,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DashboardStats {
    #[serde(default, rename = "risco_desistencia")]
    pub churn_risk: Option<f64>,
    #[serde(default, rename = "usuarios_totais")]
    pub total_users: Option<u64>,
    #[serde(default, rename = "usuarios_ativos")]
    pub active_users: Option<u64>,
    #[serde(default, rename = "visitantes")]
    pub visitors: Option<u64>,
    #[serde(default, rename = "programas")]
    pub programs: Option<ProgramCounts>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProgramCounts {
    #[serde(default, rename = "expirado", alias = "expirados")]
    pub expired: Option<u64>,
    #[serde(
        default,
        rename = "não-atribuído",
        alias = "nao_atribuidos",
        alias = "não_atribuído"
    )]
    pub unassigned: Option<u64>,
    #[serde(default, rename = "atribuído", alias = "atribuidos")]
    pub assigned: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AiMetrics {
    #[serde(default, rename = "taxa_engajamento", alias = "engajamento")]
    pub engagement_rate: Option<f64>,
    #[serde(default)]
    pub roi: Option<f64>,
    #[serde(default, rename = "produtividade")]
    pub productivity: Option<f64>,
    #[serde(default, rename = "usuarios_ativos")]
    pub active_members: Option<u64>,
}

/// An agenda entry. The only client-side transition is incomplete -> complete.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScheduledActivity {
    pub id: u64,
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(default, rename = "descricao")]
    pub description: Option<String>,
    #[serde(default, rename = "tipo_atividade")]
    pub activity_type: Option<String>,
    #[serde(default, rename = "duracao_minutos")]
    pub duration_minutes: Option<u32>,
    #[serde(default, rename = "concluida")]
    pub completed: bool,
    #[serde(default, rename = "data")]
    pub date: Option<String>,
}

impl ScheduledActivity {
    pub fn mark_complete(&mut self) {
        self.completed = true;
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NewActivity {
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "descricao")]
    pub description: String,
    #[serde(rename = "tipo_atividade")]
    pub activity_type: String,
    #[serde(rename = "duracao_minutos")]
    pub duration_minutes: u32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Program {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(rename = "nome")]
    pub name: String,
    pub status: ProgramStatus,
    #[serde(default, rename = "usuarios_matriculados")]
    pub enrolled: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum ProgramStatus {
    Expired,
    Unassigned,
    Assigned,
    Other(String),
}

impl From<String> for ProgramStatus {
    fn from(raw: String) -> Self {
        let normalized = raw.trim().to_lowercase().replace(['-', '_'], " ");
        match normalized.as_str() {
            "expirado" => Self::Expired,
            "não atribuído" | "nao atribuido" => Self::Unassigned,
            "atribuído" | "atribuido" => Self::Assigned,
            _ => Self::Other(raw),
        }
    }
}

impl ProgramStatus {
    pub fn label(&self) -> &str {
        match self {
            Self::Expired => "Expirado",
            Self::Unassigned => "Não atribuído",
            Self::Assigned => "Atribuído",
            Self::Other(raw) => raw,
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            Self::Expired => "status-expired",
            Self::Unassigned => "status-unassigned",
            Self::Assigned => "status-assigned",
            Self::Other(_) => "status-other",
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub account_type: String,
    pub unit_id: u32,
}

impl From<RegisterForm> for Registration {
    fn from(form: RegisterForm) -> Self {
        Self {
            email: form.email.trim().to_string(),
            password: form.password,
            name: form.name.trim().to_string(),
            account_type: form.account_type,
            unit_id: form.unit_id,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ActivityForm {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub activity_type: String,
    pub duration_minutes: u32,
}

impl From<ActivityForm> for NewActivity {
    fn from(form: ActivityForm) -> Self {
        Self {
            title: form.title.trim().to_string(),
            description: form.description.trim().to_string(),
            activity_type: form.activity_type.trim().to_string(),
            duration_minutes: form.duration_minutes,
        }
    }
}

/// What `/api/session` reports about the client instance.
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub authenticated: bool,
    pub page: String,
    pub home_tab: String,
    pub mock: bool,
}
