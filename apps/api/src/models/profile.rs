use serde::{Deserialize, Deserializer, Serialize};

/// A user's structured profile. One per user, stored inside the user's document.
///
/// Every field defaults to empty so a freshly registered user's `{}` decodes
/// to `Profile::default()`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    pub personal_info: PersonalInfo,
    pub career_goals: CareerGoals,
    pub experience: Vec<ExperienceEntry>,
    pub education: Vec<EducationEntry>,
    pub skills: Skills,
    pub projects: Vec<ProjectEntry>,
    #[serde(deserialize_with = "line_list")]
    pub certifications: Vec<String>,
    pub links: Links,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonalInfo {
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub location: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CareerGoals {
    pub target_position: String,
    pub target_industry: Option<String>,
    pub experience_level: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperienceEntry {
    pub company: String,
    pub job_title: String,
    pub location: Option<String>,
    /// `YYYY-MM`
    pub start_date: Option<String>,
    /// `YYYY-MM`; ignored when `current` is set.
    pub end_date: Option<String>,
    pub current: bool,
    pub responsibilities: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EducationEntry {
    pub institution: String,
    pub degree: String,
    /// `YYYY-MM`
    pub graduation_date: Option<String>,
    pub gpa: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Skills {
    #[serde(deserialize_with = "comma_list")]
    pub technical: Vec<String>,
    #[serde(deserialize_with = "comma_list")]
    pub soft: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectEntry {
    pub title: String,
    pub description: String,
    #[serde(deserialize_with = "comma_list")]
    pub technologies: Vec<String>,
    pub link: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Links {
    pub linkedin: Option<String>,
    pub github: Option<String>,
    pub portfolio: Option<String>,
}

impl Links {
    /// Present links as `(platform, url)` pairs.
    pub fn present(&self) -> Vec<(&'static str, &str)> {
        [
            ("LinkedIn", self.linkedin.as_deref()),
            ("GitHub", self.github.as_deref()),
            ("Portfolio", self.portfolio.as_deref()),
        ]
        .into_iter()
        .filter_map(|(name, url)| url.map(|u| (name, u)))
        .collect()
    }
}

impl Profile {
    /// True when nothing identifying has been saved yet.
    pub fn is_empty(&self) -> bool {
        self.personal_info.full_name.trim().is_empty()
    }

    /// Trims every string, turns blank optionals into `None` and drops empty list items.
    pub fn normalized(mut self) -> Self {
        let p = &mut self.personal_info;
        trim_in_place(&mut p.full_name);
        trim_in_place(&mut p.email);
        trim_opt(&mut p.phone);
        trim_opt(&mut p.location);

        let g = &mut self.career_goals;
        trim_in_place(&mut g.target_position);
        trim_opt(&mut g.target_industry);
        trim_opt(&mut g.experience_level);

        for e in &mut self.experience {
            trim_in_place(&mut e.company);
            trim_in_place(&mut e.job_title);
            trim_in_place(&mut e.responsibilities);
            trim_opt(&mut e.location);
            trim_opt(&mut e.start_date);
            trim_opt(&mut e.end_date);
        }
        self.experience
            .retain(|e| !(e.company.is_empty() && e.job_title.is_empty()));

        for e in &mut self.education {
            trim_in_place(&mut e.institution);
            trim_in_place(&mut e.degree);
            trim_opt(&mut e.graduation_date);
            trim_opt(&mut e.gpa);
        }
        self.education
            .retain(|e| !(e.institution.is_empty() && e.degree.is_empty()));

        for p in &mut self.projects {
            trim_in_place(&mut p.title);
            trim_in_place(&mut p.description);
            trim_list(&mut p.technologies);
            trim_opt(&mut p.link);
        }
        self.projects.retain(|p| !p.title.is_empty());

        trim_list(&mut self.skills.technical);
        trim_list(&mut self.skills.soft);
        trim_list(&mut self.certifications);

        trim_opt(&mut self.links.linkedin);
        trim_opt(&mut self.links.github);
        trim_opt(&mut self.links.portfolio);

        self
    }
}

/// Splits free-form list input ("Python, SQL" or one item per line) into trimmed items.
pub fn split_list(raw: &str, separator: char) -> Vec<String> {
    raw.split(separator)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// List fields accept either a JSON array or the raw form text.
#[derive(Deserialize)]
#[serde(untagged)]
enum ListInput {
    Items(Vec<String>),
    Text(String),
}

fn comma_list<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    Ok(match ListInput::deserialize(deserializer)? {
        ListInput::Items(items) => items,
        ListInput::Text(raw) => split_list(&raw, ','),
    })
}

fn line_list<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    Ok(match ListInput::deserialize(deserializer)? {
        ListInput::Items(items) => items,
        ListInput::Text(raw) => split_list(&raw, '\n'),
    })
}

fn trim_in_place(s: &mut String) {
    let trimmed = s.trim();
    if trimmed.len() != s.len() {
        *s = trimmed.to_string();
    }
}

fn trim_opt(value: &mut Option<String>) {
    *value = value
        .take()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());
}

fn trim_list(items: &mut Vec<String>) {
    for item in items.iter_mut() {
        trim_in_place(item);
    }
    items.retain(|s| !s.is_empty());
}
