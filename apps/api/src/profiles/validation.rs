use chrono::NaiveDate;
use serde::Serialize;

use crate::models::profile::Profile;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldIssue {
    pub field: String,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProfileValidation {
    pub passed: bool,
    pub issues: Vec<FieldIssue>,
}

impl ProfileValidation {
    /// One human-readable line listing every issue.
    pub fn message(&self) -> String {
        self.issues
            .iter()
            .map(|i| format!("{}: {}", i.field, i.reason))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Validates a normalized profile before it is saved.
///
/// Required: full name, email, target position.
/// Dates, when present, must be `YYYY-MM`.
pub fn validate_profile(profile: &Profile) -> ProfileValidation {
    let mut issues = Vec::new();
    let mut push = |field: String, reason: &str| {
        issues.push(FieldIssue {
            field,
            reason: reason.to_string(),
        })
    };

    if profile.personal_info.full_name.is_empty() {
        push("personal_info.full_name".to_string(), "is required");
    }
    if profile.personal_info.email.is_empty() {
        push("personal_info.email".to_string(), "is required");
    } else if !is_plausible_email(&profile.personal_info.email) {
        push("personal_info.email".to_string(), "is not a valid email address");
    }
    if profile.career_goals.target_position.is_empty() {
        push("career_goals.target_position".to_string(), "is required");
    }

    for (i, entry) in profile.experience.iter().enumerate() {
        for (name, value) in [("start_date", &entry.start_date), ("end_date", &entry.end_date)] {
            if let Some(date) = value {
                if !is_year_month(date) {
                    push(format!("experience[{i}].{name}"), "must be YYYY-MM");
                }
            }
        }
        if let (Some(start), Some(end), false) =
            (&entry.start_date, &entry.end_date, entry.current)
        {
            if is_year_month(start) && is_year_month(end) && end < start {
                push(format!("experience[{i}].end_date"), "is before start_date");
            }
        }
    }

    for (i, entry) in profile.education.iter().enumerate() {
        if let Some(date) = &entry.graduation_date {
            if !is_year_month(date) {
                push(format!("education[{i}].graduation_date"), "must be YYYY-MM");
            }
        }
    }

    ProfileValidation {
        passed: issues.is_empty(),
        issues,
    }
}

fn is_plausible_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !email.chars().any(char::is_whitespace)
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
}

fn is_year_month(value: &str) -> bool {
    value.len() == 7 && NaiveDate::parse_from_str(&format!("{value}-01"), "%Y-%m-%d").is_ok()
}
