use serde::Serialize;
use sqlx::PgPool;
use tracing::debug;

use crate::content::repository::{first, list};
use crate::models::content::{
    AboutInfo, Achievement, Certificate, Education, Experience, PersonalInfo, Project, SocialLink,
};

/// Every public section of the portfolio, read at one point in time.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PortfolioSnapshot {
    pub personal_info: Option<PersonalInfo>,
    pub about_info: Option<AboutInfo>,
    pub experiences: Vec<Experience>,
    pub projects: Vec<Project>,
    pub education: Vec<Education>,
    pub certificates: Vec<Certificate>,
    pub achievements: Vec<Achievement>,
    /// Active links only.
    pub social_links: Vec<SocialLink>,
}

/// Reads all eight content tables concurrently.
///
/// Any failed read fails the whole snapshot; callers never see a partial one.
pub async fn load_snapshot(pool: &PgPool) -> Result<PortfolioSnapshot, sqlx::Error> {
    let (
        personal_info,
        about_info,
        experiences,
        projects,
        education,
        certificates,
        achievements,
        social_links,
    ) = tokio::try_join!(
        first::<PersonalInfo>(pool),
        first::<AboutInfo>(pool),
        list::<Experience>(pool, true),
        list::<Project>(pool, true),
        list::<Education>(pool, true),
        list::<Certificate>(pool, true),
        list::<Achievement>(pool, true),
        list::<SocialLink>(pool, true),
    )?;

    debug!(
        experiences = experiences.len(),
        projects = projects.len(),
        education = education.len(),
        certificates = certificates.len(),
        achievements = achievements.len(),
        social_links = social_links.len(),
        "Loaded portfolio snapshot"
    );

    Ok(PortfolioSnapshot {
        personal_info,
        about_info,
        experiences,
        projects,
        education,
        certificates,
        achievements,
        social_links,
    })
}
