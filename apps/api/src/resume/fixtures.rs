//! Sample portfolio content shared by the resume tests.

use chrono::Utc;
use uuid::Uuid;

use crate::content::snapshot::PortfolioSnapshot;
use crate::models::content::{
    AboutInfo, Achievement, Certificate, Education, Experience, PersonalInfo, Project, SocialLink,
};

pub fn personal_info() -> PersonalInfo {
    PersonalInfo {
        id: Uuid::new_v4(),
        name: "Ada Lovelace".to_string(),
        title: "Software Engineer".to_string(),
        subtitle: Some("Compilers & <systems>".to_string()),
        email: "ada@example.com".to_string(),
        phone: Some("+44 20 7946 0000".to_string()),
        location: Some("London".to_string()),
        profile_picture_url: None,
        linkedin_url: None,
        github_url: Some("https://github.com/ada".to_string()),
        instagram_url: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn social_link(platform: &str, url: &str) -> SocialLink {
    SocialLink {
        id: Uuid::new_v4(),
        platform: platform.to_string(),
        url: url.to_string(),
        icon_type: "link".to_string(),
        is_active: true,
        order_index: 0,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn project(n: i32) -> Project {
    Project {
        id: Uuid::new_v4(),
        title: format!("Project {n}"),
        description: format!("Description of project {n}"),
        technologies: vec!["Rust".to_string(), "PostgreSQL".to_string()],
        github_url: None,
        live_url: None,
        image_url: None,
        order_index: n,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn sample_snapshot() -> PortfolioSnapshot {
    PortfolioSnapshot {
        personal_info: Some(personal_info()),
        about_info: Some(AboutInfo {
            id: Uuid::new_v4(),
            summary: "Builds analytical engines.\nWrites the programs too.".to_string(),
            years_experience: "8+".to_string(),
            projects_completed: "40+".to_string(),
            technologies_count: "15+".to_string(),
            client_satisfaction: "100%".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }),
        experiences: vec![Experience {
            id: Uuid::new_v4(),
            title: "Lead Engineer".to_string(),
            company: "Analytical Engines Ltd".to_string(),
            location: "London".to_string(),
            duration: "2021 - Present".to_string(),
            description: vec![
                "Designed the first published algorithm".to_string(),
                "Mentored a team of four".to_string(),
            ],
            order_index: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }],
        projects: (1..=5).map(project).collect(),
        education: vec![Education {
            id: Uuid::new_v4(),
            degree: "BSc Mathematics".to_string(),
            institution: "University of London".to_string(),
            location: "London".to_string(),
            duration: "2012 - 2016".to_string(),
            grade: Some("First Class".to_string()),
            order_index: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }],
        certificates: vec![Certificate {
            id: Uuid::new_v4(),
            title: "Cloud Architect".to_string(),
            issuer: "Example Cloud".to_string(),
            date: "2023".to_string(),
            credential_id: Some("ABC-123".to_string()),
            credential_url: None,
            order_index: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }],
        achievements: vec![Achievement {
            id: Uuid::new_v4(),
            title: "Hackathon Winner".to_string(),
            description: "First place out of 120 teams".to_string(),
            icon_type: "trophy".to_string(),
            date: "2022".to_string(),
            category: "Technical".to_string(),
            order_index: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }],
        social_links: vec![
            social_link("GitHub", "https://github.com/ada"),
            social_link("Website", "https://ada.dev/"),
        ],
    }
}
