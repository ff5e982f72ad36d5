//! Contact line for the resume header.

use serde::Serialize;

use crate::content::snapshot::PortfolioSnapshot;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactItem {
    pub label: String,
    pub value: String,
}

impl ContactItem {
    fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        ContactItem {
            label: label.into(),
            value: value.into(),
        }
    }
}

fn strip_host_prefix<'a>(clean: &'a str, hosts: &[&str]) -> Option<&'a str> {
    hosts.iter().find_map(|host| clean.strip_prefix(host))
}

fn handle_from_path(rest: &str) -> String {
    format!("@{}", rest.trim_end_matches('/'))
}

/// Short display form of a profile URL, e.g. `https://github.com/ada` → `@ada`.
///
/// The platform name decides which host prefix is stripped. `mailto:` and
/// `tel:` links become the bare address or number. Anything else shows its
/// last path segment.
pub fn social_handle(url: &str, platform: &str) -> String {
    let url = url.trim();
    if url.is_empty() {
        return String::new();
    }

    let without_scheme = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url);
    let clean = without_scheme
        .strip_prefix("www.")
        .unwrap_or(without_scheme);
    let platform = platform.to_lowercase();

    let known_host = if platform.contains("github") {
        Some(&["github.com/"][..])
    } else if platform.contains("linkedin") {
        Some(&["linkedin.com/in/"][..])
    } else if platform.contains("twitter") {
        Some(&["twitter.com/", "x.com/"][..])
    } else if platform.contains("instagram") {
        Some(&["instagram.com/"][..])
    } else {
        None
    };

    if let Some(hosts) = known_host {
        return match strip_host_prefix(clean, hosts) {
            Some(rest) if !rest.trim_end_matches('/').is_empty() => handle_from_path(rest),
            _ => clean.trim_end_matches('/').to_string(),
        };
    }

    if let Some(address) = url.strip_prefix("mailto:") {
        return address.to_string();
    }
    if let Some(number) = url.strip_prefix("tel:") {
        return number.chars().filter(|c| !c.is_whitespace()).collect();
    }

    clean
        .split('/')
        .filter(|segment| !segment.is_empty())
        .last()
        .map(str::to_string)
        .unwrap_or_else(|| clean.to_string())
}

/// Email, phone and location from personal info, then one item per active
/// social link. Without social links, the profile URLs on personal info stand in.
pub fn contact_items(snapshot: &PortfolioSnapshot) -> Vec<ContactItem> {
    let mut items = Vec::new();
    let personal = snapshot.personal_info.as_ref();

    if let Some(info) = personal {
        if !info.email.trim().is_empty() {
            items.push(ContactItem::new("Email", info.email.trim()));
        }
        if let Some(phone) = info.phone.as_deref().filter(|p| !p.trim().is_empty()) {
            items.push(ContactItem::new("Phone", phone.trim()));
        }
        if let Some(location) = info.location.as_deref().filter(|l| !l.trim().is_empty()) {
            items.push(ContactItem::new("Location", location.trim()));
        }
    }

    for link in &snapshot.social_links {
        items.push(ContactItem::new(
            link.platform.clone(),
            social_handle(&link.url, &link.platform),
        ));
    }

    if snapshot.social_links.is_empty() {
        if let Some(info) = personal {
            let fallbacks = [
                ("LinkedIn", info.linkedin_url.as_deref()),
                ("GitHub", info.github_url.as_deref()),
                ("Instagram", info.instagram_url.as_deref()),
            ];
            for (platform, url) in fallbacks {
                if let Some(url) = url.filter(|u| !u.trim().is_empty()) {
                    items.push(ContactItem::new(platform, social_handle(url, platform)));
                }
            }
        }
    }

    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resume::fixtures::{personal_info, sample_snapshot, social_link};

    #[test]
    fn test_github_handle() {
        assert_eq!(social_handle("https://github.com/ada", "GitHub"), "@ada");
        assert_eq!(social_handle("https://www.github.com/ada/", "github"), "@ada");
    }

    #[test]
    fn test_linkedin_handle_strips_trailing_slash() {
        assert_eq!(
            social_handle("https://www.linkedin.com/in/ada-lovelace/", "LinkedIn"),
            "@ada-lovelace"
        );
    }

    #[test]
    fn test_twitter_and_instagram_handles() {
        assert_eq!(social_handle("https://twitter.com/ada", "Twitter"), "@ada");
        assert_eq!(social_handle("http://instagram.com/ada.l/", "Instagram"), "@ada.l");
    }

    #[test]
    fn test_mailto_and_tel() {
        assert_eq!(social_handle("mailto:ada@example.com", "Mail"), "ada@example.com");
        assert_eq!(social_handle("tel:+44 20 7946 0000", "Phone"), "+442079460000");
    }

    #[test]
    fn test_other_platform_uses_last_segment() {
        assert_eq!(social_handle("https://dev.to/ada", "Dev"), "ada");
        assert_eq!(social_handle("https://example.com/", "Website"), "example.com");
        assert_eq!(social_handle("", "Website"), "");
    }

    #[test]
    fn test_known_platform_with_foreign_host_keeps_clean_url() {
        assert_eq!(
            social_handle("https://gitlab.com/ada/", "GitHub mirror"),
            "gitlab.com/ada"
        );
    }

    #[test]
    fn test_contact_items_prefers_social_links() {
        let snapshot = sample_snapshot();
        let items = contact_items(&snapshot);
        let labels: Vec<_> = items.iter().map(|i| i.label.as_str()).collect();
        assert_eq!(labels, vec!["Email", "Phone", "Location", "GitHub", "Website"]);
        assert_eq!(items[3].value, "@ada");
    }

    #[test]
    fn test_contact_items_falls_back_to_personal_urls() {
        let mut snapshot = sample_snapshot();
        snapshot.social_links.clear();
        let mut info = personal_info();
        info.phone = None;
        info.linkedin_url = Some("https://linkedin.com/in/ada/".to_string());
        info.instagram_url = Some("  ".to_string());
        snapshot.personal_info = Some(info);

        let items = contact_items(&snapshot);
        assert_eq!(
            items,
            vec![
                ContactItem::new("Email", "ada@example.com"),
                ContactItem::new("Location", "London"),
                ContactItem::new("LinkedIn", "@ada"),
                ContactItem::new("GitHub", "@ada"),
            ]
        );
    }

    #[test]
    fn test_contact_items_empty_without_personal_info() {
        let mut snapshot = PortfolioSnapshot::default();
        assert!(contact_items(&snapshot).is_empty());
        snapshot.social_links.push(social_link("GitHub", "https://github.com/ada"));
        assert_eq!(contact_items(&snapshot).len(), 1);
    }
}
