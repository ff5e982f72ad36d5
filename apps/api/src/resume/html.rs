//! Standalone HTML rendering of the resume, used for the preview endpoint.
//!
//! Built with `maud`, so every interpolated value is escaped. Sections with no
//! rows are left out entirely.

use maud::{html, Markup, PreEscaped, DOCTYPE};

use crate::content::snapshot::PortfolioSnapshot;
use crate::models::content::{AboutInfo, Achievement, Certificate, Education, Experience, Project};
use crate::resume::contact::contact_items;
use crate::resume::MAX_RESUME_PROJECTS;

const STYLE: &str = r#"
* { margin: 0; padding: 0; box-sizing: border-box; }
body { font-family: Arial, Helvetica, sans-serif; line-height: 1.4; color: #000; background: #fff; font-size: 11px; }
.resume-container { max-width: 210mm; min-height: 297mm; margin: 0 auto; padding: 15mm; }
.header { display: flex; align-items: flex-start; gap: 20px; margin-bottom: 20px; padding-bottom: 15px; border-bottom: 2px solid #000; }
.profile-image, .profile-placeholder { width: 80px; height: 80px; border: 1px solid #000; border-radius: 4px; }
.profile-image { object-fit: cover; }
.profile-placeholder { display: flex; align-items: center; justify-content: center; font-size: 24px; font-weight: bold; background: #f5f5f5; }
.header-content { flex: 1; }
.name { font-size: 24px; font-weight: bold; margin-bottom: 5px; text-transform: uppercase; letter-spacing: 1px; }
.title { font-size: 14px; font-weight: bold; margin-bottom: 3px; }
.subtitle { font-size: 11px; color: #333; margin-bottom: 10px; }
.contact-info { display: grid; grid-template-columns: repeat(2, 1fr); gap: 3px 20px; font-size: 10px; }
.section { margin-bottom: 18px; }
.section-title { font-size: 13px; font-weight: bold; text-transform: uppercase; border-bottom: 1px solid #999; padding-bottom: 3px; margin-bottom: 10px; }
.stats { display: grid; grid-template-columns: repeat(4, 1fr); gap: 10px; margin-top: 10px; text-align: center; }
.stat-number { font-size: 16px; font-weight: bold; display: block; }
.stat-label { font-size: 9px; color: #444; text-transform: uppercase; }
.experience-item, .project-item, .education-item, .certificate-item, .achievement-item { margin-bottom: 12px; }
.item-header, .certificate-info { display: flex; justify-content: space-between; align-items: flex-start; }
.item-title, .certificate-title, .achievement-title { font-weight: bold; font-size: 12px; }
.item-company, .certificate-issuer { font-size: 11px; }
.item-location, .item-date, .certificate-date, .achievement-meta { font-size: 9px; color: #666; white-space: nowrap; }
.item-description ul { margin: 5px 0 0 16px; }
.technologies { margin-top: 5px; }
.tech-tag { display: inline-block; border: 1px solid #999; border-radius: 3px; padding: 1px 6px; margin: 0 4px 4px 0; font-size: 9px; }
.credential-id { font-size: 9px; color: #666; font-family: monospace; margin-top: 3px; }
@page { margin: 0; size: A4; }
@media print { body { -webkit-print-color-adjust: exact; print-color-adjust: exact; } }
"#;

/// First character of the name, uppercased. `U` when there is no name.
pub fn initial(name: Option<&str>) -> String {
    name.and_then(|n| n.trim().chars().next())
        .map(|c| c.to_uppercase().collect())
        .unwrap_or_else(|| "U".to_string())
}

fn section(title: &str, body: Markup) -> Markup {
    html! {
        div.section {
            h2.section-title { (title) }
            (body)
        }
    }
}

fn header(snapshot: &PortfolioSnapshot) -> Markup {
    let info = snapshot.personal_info.as_ref();
    let name = info.map(|i| i.name.as_str()).filter(|n| !n.trim().is_empty());
    let title = info.map(|i| i.title.as_str()).filter(|t| !t.trim().is_empty());
    let picture = info
        .and_then(|i| i.profile_picture_url.as_deref())
        .filter(|url| !url.trim().is_empty());
    let subtitle = info
        .and_then(|i| i.subtitle.as_deref())
        .filter(|s| !s.trim().is_empty());

    html! {
        div.header {
            div.profile-image-container {
                @if let Some(url) = picture {
                    img src=(url) alt="Profile" class="profile-image";
                } @else {
                    div class="profile-placeholder" { (initial(name)) }
                }
            }
            div.header-content {
                h1.name { (name.unwrap_or("Your Name")) }
                div.title { (title.unwrap_or("Professional Title")) }
                @if let Some(subtitle) = subtitle {
                    div.subtitle { (subtitle) }
                }
                div.contact-info {
                    @for item in contact_items(snapshot) {
                        div.contact-item {
                            strong { (item.label) ":" }
                            " " (item.value)
                        }
                    }
                }
            }
        }
    }
}

fn summary(about: &AboutInfo) -> Markup {
    let stats = [
        (&about.years_experience, "Years Experience"),
        (&about.projects_completed, "Projects Completed"),
        (&about.technologies_count, "Technologies"),
        (&about.client_satisfaction, "Client Satisfaction"),
    ];

    section(
        "Professional Summary",
        html! {
            div.summary-text {
                @for (i, line) in about.summary.split('\n').enumerate() {
                    @if i > 0 { br; }
                    (line)
                }
            }
            div.stats {
                @for (value, label) in stats {
                    div.stat-item {
                        span.stat-number { (value) }
                        div.stat-label { (label) }
                    }
                }
            }
        },
    )
}

fn item_header(title: &str, subtitle: &str, location: &str, date: &str) -> Markup {
    html! {
        div.item-header {
            div {
                div.item-title { (title) }
                div.item-company { (subtitle) }
                div.item-location { (location) }
            }
            div.item-date { (date) }
        }
    }
}

fn experiences(rows: &[Experience]) -> Markup {
    section(
        "Professional Experience",
        html! {
            @for exp in rows {
                div.experience-item {
                    (item_header(&exp.title, &exp.company, &exp.location, &exp.duration))
                    div.item-description {
                        ul {
                            @for point in &exp.description {
                                li { (point) }
                            }
                        }
                    }
                }
            }
        },
    )
}

fn projects(rows: &[Project]) -> Markup {
    section(
        "Key Projects",
        html! {
            @for project in rows.iter().take(MAX_RESUME_PROJECTS) {
                div.project-item {
                    div.item-title { (project.title) }
                    div.item-description { (project.description) }
                    div.technologies {
                        @for tech in &project.technologies {
                            span.tech-tag { (tech) }
                        }
                    }
                }
            }
        },
    )
}

fn education(rows: &[Education]) -> Markup {
    section(
        "Education",
        html! {
            @for edu in rows {
                div.education-item {
                    (item_header(&edu.degree, &edu.institution, &edu.location, &edu.duration))
                    @if let Some(grade) = edu.grade.as_deref().filter(|g| !g.trim().is_empty()) {
                        div.grade {
                            strong { "Grade:" }
                            " " (grade)
                        }
                    }
                }
            }
        },
    )
}

fn certificates(rows: &[Certificate]) -> Markup {
    section(
        "Certifications",
        html! {
            @for cert in rows {
                div.certificate-item {
                    div.certificate-info {
                        div {
                            div.certificate-title { (cert.title) }
                            div.certificate-issuer { (cert.issuer) }
                        }
                        div.certificate-date { (cert.date) }
                    }
                    @if let Some(id) = cert.credential_id.as_deref().filter(|c| !c.trim().is_empty()) {
                        div.credential-id { "Credential ID: " (id) }
                    }
                }
            }
        },
    )
}

fn achievements(rows: &[Achievement]) -> Markup {
    section(
        "Key Achievements",
        html! {
            @for achievement in rows {
                div.achievement-item {
                    div.achievement-content {
                        div.achievement-title { (achievement.title) }
                        div.achievement-description { (achievement.description) }
                        div.achievement-meta {
                            (achievement.category) " \u{2022} " (achievement.date)
                        }
                    }
                }
            }
        },
    )
}

/// Renders the complete resume document.
pub fn render_html(snapshot: &PortfolioSnapshot) -> Markup {
    let page_title = snapshot
        .personal_info
        .as_ref()
        .map(|i| i.name.as_str())
        .filter(|n| !n.trim().is_empty())
        .unwrap_or("Resume");

    html! {
        (DOCTYPE)
        html {
            head {
                meta charset="UTF-8";
                title { (page_title) }
                style { (PreEscaped(STYLE)) }
            }
            body {
                div.resume-container {
                    (header(snapshot))
                    @if let Some(about) = &snapshot.about_info {
                        (summary(about))
                    }
                    @if !snapshot.experiences.is_empty() {
                        (experiences(&snapshot.experiences))
                    }
                    @if !snapshot.projects.is_empty() {
                        (projects(&snapshot.projects))
                    }
                    @if !snapshot.education.is_empty() {
                        (education(&snapshot.education))
                    }
                    @if !snapshot.certificates.is_empty() {
                        (certificates(&snapshot.certificates))
                    }
                    @if !snapshot.achievements.is_empty() {
                        (achievements(&snapshot.achievements))
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resume::fixtures::sample_snapshot;

    #[test]
    fn test_initial() {
        assert_eq!(initial(Some("ada")), "A");
        assert_eq!(initial(Some("  ")), "U");
        assert_eq!(initial(None), "U");
    }

    #[test]
    fn test_empty_snapshot_uses_defaults_and_omits_sections() {
        let html = render_html(&PortfolioSnapshot::default()).into_string();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Resume</title>"));
        assert!(html.contains("Your Name"));
        assert!(html.contains("Professional Title"));
        assert!(html.contains("<div class=\"profile-placeholder\">U</div>"));
        for title in [
            "Professional Summary",
            "Professional Experience",
            "Key Projects",
            "Education",
            "Certifications",
            "Key Achievements",
        ] {
            assert!(!html.contains(title), "unexpected section {title}");
        }
    }

    #[test]
    fn test_full_snapshot_renders_every_section() {
        let html = render_html(&sample_snapshot()).into_string();
        assert!(html.contains("<title>Ada Lovelace</title>"));
        assert!(html.contains("<div class=\"profile-placeholder\">A</div>"));
        assert!(html.contains("Builds analytical engines.<br>Writes the programs too."));
        assert!(html.contains("Client Satisfaction"));
        assert!(html.contains("<li>Mentored a team of four</li>"));
        assert!(html.contains("<strong>Grade:</strong> First Class"));
        assert!(html.contains("Credential ID: ABC-123"));
        assert!(html.contains("Technical \u{2022} 2022"));
        assert!(html.contains("<strong>GitHub:</strong> @ada"));
    }

    #[test]
    fn test_only_first_four_projects() {
        let html = render_html(&sample_snapshot()).into_string();
        assert!(html.contains("Project 4"));
        assert!(!html.contains("Project 5"));
    }

    #[test]
    fn test_content_is_escaped() {
        let html = render_html(&sample_snapshot()).into_string();
        assert!(html.contains("Compilers &amp; &lt;systems&gt;"));
        assert!(!html.contains("<systems>"));
    }

    #[test]
    fn test_profile_picture_replaces_placeholder() {
        let mut snapshot = sample_snapshot();
        if let Some(info) = snapshot.personal_info.as_mut() {
            info.profile_picture_url = Some("https://cdn.example.com/me.png".to_string());
        }
        let html = render_html(&snapshot).into_string();
        assert!(html.contains("<img src=\"https://cdn.example.com/me.png\""));
        assert!(!html.contains("profile-placeholder\">"));
    }

    #[test]
    fn test_attribute_values_are_escaped() {
        let mut snapshot = sample_snapshot();
        if let Some(info) = snapshot.personal_info.as_mut() {
            info.profile_picture_url = Some(r#"x" onerror="alert(1)"#.to_string());
        }
        let html = render_html(&snapshot).into_string();
        assert!(html.contains(r#"src="x&quot; onerror=&quot;alert(1)""#));
    }
}
