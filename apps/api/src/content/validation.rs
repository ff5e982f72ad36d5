//! Input validation for admin content forms and the public contact form.
//!
//! Every check appends to a single error list so a form submission reports all
//! of its problems at once instead of failing on the first field.

use serde::{Deserialize, Serialize};

use crate::models::contact::ContactMessageInput;
use crate::models::content::{
    AboutInfoInput, AchievementInput, CertificateInput, EducationInput, ExperienceInput,
    PersonalInfoInput, ProjectInput, SocialLinkInput,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        FieldError {
            field: field.into(),
            message: message.into(),
        }
    }
}

pub const MAX_SHORT_TEXT: usize = 200;
pub const MAX_LONG_TEXT: usize = 5000;
const MAX_LIST_ITEMS: usize = 50;

pub const ACHIEVEMENT_ICONS: &[&str] = &["award", "trophy", "target", "star"];

pub const SOCIAL_ICONS: &[&str] = &[
    "github",
    "linkedin",
    "instagram",
    "twitter",
    "mail",
    "phone",
    "map-pin",
    "link",
];

/// Implemented by every input type accepted from a form.
pub trait Validate {
    fn validate(&self) -> Result<(), Vec<FieldError>>;
}

/// Collects field errors across a whole form.
#[derive(Debug, Default)]
pub struct Checker {
    errors: Vec<FieldError>,
}

impl Checker {
    pub fn new() -> Self {
        Self::default()
    }

    fn fail(&mut self, field: &str, message: impl Into<String>) {
        self.errors.push(FieldError::new(field, message));
    }

    pub fn required(&mut self, field: &str, value: &str, max_len: usize) -> &mut Self {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            self.fail(field, "is required");
        } else if trimmed.chars().count() > max_len {
            self.fail(field, format!("must be at most {max_len} characters"));
        }
        self
    }

    pub fn optional(&mut self, field: &str, value: Option<&str>, max_len: usize) -> &mut Self {
        if let Some(v) = value {
            if v.trim().chars().count() > max_len {
                self.fail(field, format!("must be at most {max_len} characters"));
            }
        }
        self
    }

    pub fn email(&mut self, field: &str, value: &str) -> &mut Self {
        if value.trim().is_empty() {
            self.fail(field, "is required");
        } else if !looks_like_email(value.trim()) {
            self.fail(field, "must be a valid email address");
        }
        self
    }

    /// Blank optional URLs are treated as absent.
    pub fn optional_url(&mut self, field: &str, value: Option<&str>) -> &mut Self {
        if let Some(v) = value.map(str::trim).filter(|v| !v.is_empty()) {
            if !is_http_url(v) {
                self.fail(field, "must be an http(s) URL");
            }
        }
        self
    }

    pub fn link_url(&mut self, field: &str, value: &str) -> &mut Self {
        let v = value.trim();
        if v.is_empty() {
            self.fail(field, "is required");
        } else if !(is_http_url(v) || is_mailto(v) || is_tel(v)) {
            self.fail(field, "must be an http(s), mailto: or tel: URL");
        }
        self
    }

    pub fn one_of(&mut self, field: &str, value: &str, allowed: &[&str]) -> &mut Self {
        if !allowed.contains(&value) {
            self.fail(field, format!("must be one of: {}", allowed.join(", ")));
        }
        self
    }

    pub fn items(&mut self, field: &str, values: &[String], max_len: usize) -> &mut Self {
        if values.len() > MAX_LIST_ITEMS {
            self.fail(field, format!("must have at most {MAX_LIST_ITEMS} items"));
        }
        if values.iter().any(|v| v.trim().is_empty()) {
            self.fail(field, "must not contain blank items");
        }
        if values.iter().any(|v| v.chars().count() > max_len) {
            self.fail(field, format!("items must be at most {max_len} characters"));
        }
        self
    }

    pub fn order_index(&mut self, value: Option<i32>) -> &mut Self {
        if matches!(value, Some(v) if v < 0) {
            self.fail("order_index", "must not be negative");
        }
        self
    }

    pub fn finish(&mut self) -> Result<(), Vec<FieldError>> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(std::mem::take(&mut self.errors))
        }
    }
}

fn looks_like_email(s: &str) -> bool {
    if s.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = s.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty() && !tld.ends_with('.'))
}

fn is_http_url(s: &str) -> bool {
    let rest = s
        .strip_prefix("https://")
        .or_else(|| s.strip_prefix("http://"));
    matches!(rest, Some(r) if !r.is_empty() && !r.starts_with('/') && !r.contains(char::is_whitespace))
}

fn is_mailto(s: &str) -> bool {
    s.strip_prefix("mailto:").is_some_and(looks_like_email)
}

fn is_tel(s: &str) -> bool {
    s.strip_prefix("tel:").is_some_and(|n| {
        n.chars().any(|c| c.is_ascii_digit())
            && n
                .chars()
                .all(|c| c.is_ascii_digit() || matches!(c, '+' | ' ' | '-' | '(' | ')'))
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Per-form rules
// ────────────────────────────────────────────────────────────────────────────

impl Validate for PersonalInfoInput {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        Checker::new()
            .required("name", &self.name, MAX_SHORT_TEXT)
            .required("title", &self.title, MAX_SHORT_TEXT)
            .optional("subtitle", self.subtitle.as_deref(), MAX_SHORT_TEXT)
            .email("email", &self.email)
            .optional("phone", self.phone.as_deref(), 40)
            .optional("location", self.location.as_deref(), MAX_SHORT_TEXT)
            .optional_url("profile_picture_url", self.profile_picture_url.as_deref())
            .optional_url("linkedin_url", self.linkedin_url.as_deref())
            .optional_url("github_url", self.github_url.as_deref())
            .optional_url("instagram_url", self.instagram_url.as_deref())
            .finish()
    }
}

impl Validate for AboutInfoInput {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        Checker::new()
            .required("summary", &self.summary, MAX_LONG_TEXT)
            .required("years_experience", &self.years_experience, 20)
            .required("projects_completed", &self.projects_completed, 20)
            .required("technologies_count", &self.technologies_count, 20)
            .required("client_satisfaction", &self.client_satisfaction, 20)
            .finish()
    }
}

impl Validate for ExperienceInput {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        Checker::new()
            .required("title", &self.title, MAX_SHORT_TEXT)
            .required("company", &self.company, MAX_SHORT_TEXT)
            .optional("location", Some(&self.location), MAX_SHORT_TEXT)
            .required("duration", &self.duration, 100)
            .items("description", &self.description, 1000)
            .order_index(self.order_index)
            .finish()
    }
}

impl Validate for ProjectInput {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        Checker::new()
            .required("title", &self.title, MAX_SHORT_TEXT)
            .required("description", &self.description, MAX_LONG_TEXT)
            .items("technologies", &self.technologies, 60)
            .optional_url("github_url", self.github_url.as_deref())
            .optional_url("live_url", self.live_url.as_deref())
            .optional_url("image_url", self.image_url.as_deref())
            .order_index(self.order_index)
            .finish()
    }
}

impl Validate for EducationInput {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        Checker::new()
            .required("degree", &self.degree, MAX_SHORT_TEXT)
            .required("institution", &self.institution, MAX_SHORT_TEXT)
            .optional("location", Some(&self.location), MAX_SHORT_TEXT)
            .required("duration", &self.duration, 100)
            .optional("grade", self.grade.as_deref(), 50)
            .order_index(self.order_index)
            .finish()
    }
}

impl Validate for CertificateInput {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        Checker::new()
            .required("title", &self.title, MAX_SHORT_TEXT)
            .required("issuer", &self.issuer, MAX_SHORT_TEXT)
            .required("date", &self.date, 50)
            .optional("credential_id", self.credential_id.as_deref(), 100)
            .optional_url("credential_url", self.credential_url.as_deref())
            .order_index(self.order_index)
            .finish()
    }
}

impl Validate for AchievementInput {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        Checker::new()
            .required("title", &self.title, MAX_SHORT_TEXT)
            .required("description", &self.description, MAX_LONG_TEXT)
            .one_of("icon_type", &self.icon_type, ACHIEVEMENT_ICONS)
            .required("date", &self.date, 50)
            .required("category", &self.category, 100)
            .order_index(self.order_index)
            .finish()
    }
}

impl Validate for SocialLinkInput {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        Checker::new()
            .required("platform", &self.platform, 50)
            .link_url("url", &self.url)
            .one_of("icon_type", &self.icon_type, SOCIAL_ICONS)
            .order_index(self.order_index)
            .finish()
    }
}

impl Validate for ContactMessageInput {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        Checker::new()
            .required("name", &self.name, MAX_SHORT_TEXT)
            .email("email", &self.email)
            .required("subject", &self.subject, MAX_SHORT_TEXT)
            .required("message", &self.message, MAX_LONG_TEXT)
            .finish()
    }
}
