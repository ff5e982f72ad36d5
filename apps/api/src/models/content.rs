use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

// ────────────────────────────────────────────────────────────────────────────
// Singleton rows
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PersonalInfo {
    pub id: Uuid,
    pub name: String,
    pub title: String,
    pub subtitle: Option<String>,
    pub email: String,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub profile_picture_url: Option<String>,
    pub linkedin_url: Option<String>,
    pub github_url: Option<String>,
    pub instagram_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PersonalInfoInput {
    pub name: String,
    pub title: String,
    pub subtitle: Option<String>,
    pub email: String,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub profile_picture_url: Option<String>,
    pub linkedin_url: Option<String>,
    pub github_url: Option<String>,
    pub instagram_url: Option<String>,
}

/// Stat fields are free-form display strings ("5+", "98%").
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AboutInfo {
    pub id: Uuid,
    pub summary: String,
    pub years_experience: String,
    pub projects_completed: String,
    pub technologies_count: String,
    pub client_satisfaction: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AboutInfoInput {
    pub summary: String,
    pub years_experience: String,
    pub projects_completed: String,
    pub technologies_count: String,
    pub client_satisfaction: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Ordered collection rows
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Experience {
    pub id: Uuid,
    pub title: String,
    pub company: String,
    pub location: String,
    pub duration: String,
    pub description: Vec<String>,
    pub order_index: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExperienceInput {
    pub title: String,
    pub company: String,
    #[serde(default)]
    pub location: String,
    pub duration: String,
    #[serde(default)]
    pub description: Vec<String>,
    pub order_index: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Project {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub technologies: Vec<String>,
    pub github_url: Option<String>,
    pub live_url: Option<String>,
    pub image_url: Option<String>,
    pub order_index: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProjectInput {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub technologies: Vec<String>,
    pub github_url: Option<String>,
    pub live_url: Option<String>,
    pub image_url: Option<String>,
    pub order_index: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Education {
    pub id: Uuid,
    pub degree: String,
    pub institution: String,
    pub location: String,
    pub duration: String,
    pub grade: Option<String>,
    pub order_index: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EducationInput {
    pub degree: String,
    pub institution: String,
    #[serde(default)]
    pub location: String,
    pub duration: String,
    pub grade: Option<String>,
    pub order_index: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Certificate {
    pub id: Uuid,
    pub title: String,
    pub issuer: String,
    pub date: String,
    pub credential_id: Option<String>,
    pub credential_url: Option<String>,
    pub order_index: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CertificateInput {
    pub title: String,
    pub issuer: String,
    pub date: String,
    pub credential_id: Option<String>,
    pub credential_url: Option<String>,
    pub order_index: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Achievement {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub icon_type: String,
    pub date: String,
    pub category: String,
    pub order_index: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AchievementInput {
    pub title: String,
    pub description: String,
    #[serde(default = "default_achievement_icon")]
    pub icon_type: String,
    pub date: String,
    pub category: String,
    pub order_index: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SocialLink {
    pub id: Uuid,
    pub platform: String,
    pub url: String,
    pub icon_type: String,
    pub is_active: bool,
    pub order_index: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SocialLinkInput {
    pub platform: String,
    pub url: String,
    #[serde(default = "default_social_icon")]
    pub icon_type: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
    pub order_index: Option<i32>,
}

fn default_achievement_icon() -> String {
    "award".to_string()
}

fn default_social_icon() -> String {
    "link".to_string()
}

fn default_true() -> bool {
    true
}
