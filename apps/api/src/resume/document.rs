//! Flows the resume sections onto one continuous A4-width column.
//!
//! Mirrors the section order and omission rules of the HTML document. All text
//! is folded to the built-in font charset first so measured widths match what
//! the PDF writer emits.

use crate::content::snapshot::PortfolioSnapshot;
use crate::layout::{to_builtin_charset, Column, ColumnBuilder, FontFamily, PageConfig, Style};
use crate::resume::contact::contact_items;
use crate::resume::html::initial;
use crate::resume::MAX_RESUME_PROJECTS;

const NAME: Style = Style::new(FontFamily::HelveticaBold, 20.0);
const TITLE: Style = Style::new(FontFamily::HelveticaBold, 13.0);
const SUBTITLE: Style = Style::new(FontFamily::Helvetica, 10.0);
const CONTACT: Style = Style::new(FontFamily::Helvetica, 9.0);
const SECTION: Style = Style::new(FontFamily::HelveticaBold, 12.0);
const ITEM_TITLE: Style = Style::new(FontFamily::HelveticaBold, 11.0);
const BODY: Style = Style::new(FontFamily::Helvetica, 10.0);
const META: Style = Style::new(FontFamily::Helvetica, 9.0);
const BADGE: Style = Style::new(FontFamily::HelveticaBold, 18.0);

/// Side of the square holding the name's initial.
const BADGE_MM: f32 = 22.0;
const HEADER_INDENT_MM: f32 = BADGE_MM + 6.0;

const SECTION_GAP_MM: f32 = 5.0;
const ITEM_GAP_MM: f32 = 3.0;
const BULLET_INDENT_MM: f32 = 2.0;

fn fold(s: &str) -> String {
    to_builtin_charset(s.trim())
}

/// Section heading with a thin rule. Kept on the same page as the first
/// line of its content.
fn section_title(b: &mut ColumnBuilder<'_>, config: &PageConfig, title: &str) {
    let needed = config.line_height_mm(SECTION.size_pt) + config.line_height_mm(ITEM_TITLE.size_pt) + 2.0;
    b.keep_together(needed);
    b.paragraph(&title.to_uppercase(), SECTION, 0.0);
    b.rule(0.5, 0.6, 2.0);
}

fn meta_line(b: &mut ColumnBuilder<'_>, text: &str) {
    if !text.trim().is_empty() {
        b.paragraph(&fold(text), META, 0.0);
    }
}

fn header(b: &mut ColumnBuilder<'_>, snapshot: &PortfolioSnapshot) {
    let info = snapshot.personal_info.as_ref();
    let name = info
        .map(|i| i.name.trim())
        .filter(|n| !n.is_empty())
        .unwrap_or("Your Name");
    let title = info
        .map(|i| i.title.trim())
        .filter(|t| !t.is_empty())
        .unwrap_or("Professional Title");

    let badge = fold(&initial(info.map(|i| i.name.as_str())));
    let badge_bottom = b.frame(&badge, BADGE, BADGE_MM);
    b.paragraph(&fold(&name.to_uppercase()), NAME, HEADER_INDENT_MM);
    b.paragraph(&fold(title), TITLE, HEADER_INDENT_MM);
    if let Some(subtitle) = info
        .and_then(|i| i.subtitle.as_deref())
        .filter(|s| !s.trim().is_empty())
    {
        b.paragraph(&fold(subtitle), SUBTITLE, HEADER_INDENT_MM);
    }

    let contacts = contact_items(snapshot)
        .iter()
        .map(|item| format!("{}: {}", item.label, item.value))
        .collect::<Vec<_>>()
        .join("   |   ");
    if !contacts.is_empty() {
        b.gap(1.0);
        b.paragraph(&fold(&contacts), CONTACT, HEADER_INDENT_MM);
    }
    b.clear_to(badge_bottom);
    b.gap(2.0);
    b.rule(1.5, 0.0, SECTION_GAP_MM);
}

/// Lays out the resume. The column is as tall as the content needs.
pub fn layout_resume(snapshot: &PortfolioSnapshot, config: &PageConfig) -> Column {
    let mut b = ColumnBuilder::new(config);
    header(&mut b, snapshot);

    if let Some(about) = &snapshot.about_info {
        section_title(&mut b, config, "Professional Summary");
        for line in about.summary.lines().filter(|l| !l.trim().is_empty()) {
            b.paragraph(&fold(line), BODY, 0.0);
        }
        let stats = [
            (&about.years_experience, "Years Experience"),
            (&about.projects_completed, "Projects Completed"),
            (&about.technologies_count, "Technologies"),
            (&about.client_satisfaction, "Client Satisfaction"),
        ]
        .iter()
        .map(|(value, label)| format!("{} {label}", value.trim()))
        .collect::<Vec<_>>()
        .join("   |   ");
        b.gap(1.5);
        b.paragraph(&fold(&stats), ITEM_TITLE, 0.0);
        b.gap(SECTION_GAP_MM);
    }

    if !snapshot.experiences.is_empty() {
        section_title(&mut b, config, "Professional Experience");
        for exp in &snapshot.experiences {
            b.split_line(&fold(&exp.title), ITEM_TITLE, &fold(&exp.duration), META);
            b.paragraph(&fold(&exp.company), BODY, 0.0);
            meta_line(&mut b, &exp.location);
            for point in exp.description.iter().filter(|d| !d.trim().is_empty()) {
                b.bullet("-", &fold(point), BODY, BULLET_INDENT_MM);
            }
            b.gap(ITEM_GAP_MM);
        }
        b.gap(SECTION_GAP_MM - ITEM_GAP_MM);
    }

    if !snapshot.projects.is_empty() {
        section_title(&mut b, config, "Key Projects");
        for project in snapshot.projects.iter().take(MAX_RESUME_PROJECTS) {
            b.paragraph(&fold(&project.title), ITEM_TITLE, 0.0);
            b.paragraph(&fold(&project.description), BODY, 0.0);
            if !project.technologies.is_empty() {
                meta_line(&mut b, &project.technologies.join("  |  "));
            }
            b.gap(ITEM_GAP_MM);
        }
        b.gap(SECTION_GAP_MM - ITEM_GAP_MM);
    }

    if !snapshot.education.is_empty() {
        section_title(&mut b, config, "Education");
        for edu in &snapshot.education {
            b.split_line(&fold(&edu.degree), ITEM_TITLE, &fold(&edu.duration), META);
            b.paragraph(&fold(&edu.institution), BODY, 0.0);
            meta_line(&mut b, &edu.location);
            if let Some(grade) = edu.grade.as_deref().filter(|g| !g.trim().is_empty()) {
                b.paragraph(&fold(&format!("Grade: {grade}")), BODY, 0.0);
            }
            b.gap(ITEM_GAP_MM);
        }
        b.gap(SECTION_GAP_MM - ITEM_GAP_MM);
    }

    if !snapshot.certificates.is_empty() {
        section_title(&mut b, config, "Certifications");
        for cert in &snapshot.certificates {
            b.split_line(&fold(&cert.title), ITEM_TITLE, &fold(&cert.date), META);
            b.paragraph(&fold(&cert.issuer), BODY, 0.0);
            if let Some(id) = cert.credential_id.as_deref().filter(|c| !c.trim().is_empty()) {
                meta_line(&mut b, &format!("Credential ID: {id}"));
            }
            b.gap(ITEM_GAP_MM);
        }
        b.gap(SECTION_GAP_MM - ITEM_GAP_MM);
    }

    if !snapshot.achievements.is_empty() {
        section_title(&mut b, config, "Key Achievements");
        for achievement in &snapshot.achievements {
            b.paragraph(&fold(&achievement.title), ITEM_TITLE, 0.0);
            b.paragraph(&fold(&achievement.description), BODY, 0.0);
            meta_line(
                &mut b,
                &format!("{} | {}", achievement.category.trim(), achievement.date.trim()),
            );
            b.gap(ITEM_GAP_MM);
        }
    }

    b.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{a4_page_config, paginate, Item};
    use crate::resume::fixtures::{project, sample_snapshot};

    fn texts(column: &Column) -> Vec<String> {
        column
            .items
            .iter()
            .filter_map(|item| match item {
                Item::Text(run) => Some(run.text.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_empty_snapshot_is_header_only() {
        let config = a4_page_config();
        let column = layout_resume(&PortfolioSnapshot::default(), &config);
        let lines = texts(&column);
        assert_eq!(lines, vec!["U", "YOUR NAME", "Professional Title"]);
        assert_eq!(paginate(&column, &config).len(), 1);
    }

    #[test]
    fn test_header_sits_beside_initial_frame() {
        let config = a4_page_config();
        let column = layout_resume(&sample_snapshot(), &config);
        let Item::Frame(frame) = &column.items[0] else {
            panic!("expected the initial frame first");
        };
        let runs: Vec<_> = column
            .items
            .iter()
            .filter_map(|item| match item {
                Item::Text(run) => Some(run),
                _ => None,
            })
            .collect();
        assert_eq!(runs[0].text, "A");
        let name = runs.iter().find(|r| r.text == "ADA LOVELACE").unwrap();
        assert!(name.x_mm >= frame.x_mm + frame.width_mm);
        assert!((name.top_mm - frame.top_mm).abs() < 1e-4);

        // The first section starts below the frame.
        let summary = runs.iter().find(|r| r.text == "PROFESSIONAL SUMMARY").unwrap();
        assert!(summary.top_mm > frame.top_mm + frame.height_mm);
    }

    #[test]
    fn test_sections_appear_in_order() {
        let config = a4_page_config();
        let lines = texts(&layout_resume(&sample_snapshot(), &config));
        let position = |needle: &str| {
            lines
                .iter()
                .position(|l| l == needle)
                .unwrap_or_else(|| panic!("missing {needle}"))
        };
        let order = [
            position("PROFESSIONAL SUMMARY"),
            position("PROFESSIONAL EXPERIENCE"),
            position("KEY PROJECTS"),
            position("EDUCATION"),
            position("CERTIFICATIONS"),
            position("KEY ACHIEVEMENTS"),
        ];
        assert!(order.windows(2).all(|w| w[0] < w[1]));
        assert!(lines.iter().any(|l| l == "Grade: First Class"));
        assert!(lines.iter().any(|l| l == "Credential ID: ABC-123"));
        assert!(lines.iter().any(|l| l == "Technical | 2022"));
        assert!(lines.join(" ").contains("GitHub: @ada"));
    }

    #[test]
    fn test_projects_capped_at_four() {
        let config = a4_page_config();
        let lines = texts(&layout_resume(&sample_snapshot(), &config));
        assert!(lines.iter().any(|l| l == "Project 4"));
        assert!(!lines.iter().any(|l| l == "Project 5"));
    }

    #[test]
    fn test_text_is_folded_to_builtin_charset() {
        let config = a4_page_config();
        let mut snapshot = sample_snapshot();
        snapshot.projects = vec![project(1)];
        snapshot.projects[0].title = "Café \u{2014} naïve".to_string();
        let lines = texts(&layout_resume(&snapshot, &config));
        assert!(lines.iter().any(|l| l == "Cafe - naive"));
        assert!(lines.iter().all(|l| l.chars().all(|c| (' '..='~').contains(&c))));
    }

    #[test]
    fn test_long_resume_paginates() {
        let config = a4_page_config();
        let mut snapshot = sample_snapshot();
        let template = snapshot.experiences[0].clone();
        snapshot.experiences = (0..30).map(|_| template.clone()).collect();
        let column = layout_resume(&snapshot, &config);
        let pages = paginate(&column, &config);
        assert!(pages.len() > 1);
        for page in &pages {
            for item in &page.items {
                assert!(item.bottom_mm() <= config.page_height_mm - config.margin_mm + 0.02);
            }
        }
    }
}
