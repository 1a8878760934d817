use tracing::info;

use crate::db::UserStore;
use crate::errors::AppError;
use crate::models::profile::Profile;

/// Upserts the user's profile. Last write wins.
pub async fn save(
    users: &dyn UserStore,
    username: &str,
    profile: &Profile,
) -> Result<(), AppError> {
    users.save_profile(username, profile).await?;
    info!(username = %username, "profile saved");
    Ok(())
}

/// Returns the stored profile, or the empty default when nothing has been saved.
pub async fn load(users: &dyn UserStore, username: &str) -> Result<Profile, AppError> {
    Ok(users.load_profile(username).await?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accounts::service::register;
    use crate::models::profile::{EducationEntry, ExperienceEntry};
    use crate::testing::{sample_profile, MemoryUserStore};

    #[tokio::test]
    async fn test_save_then_load_returns_identical_profile() {
        let users = MemoryUserStore::default();
        register(&users, "ada", "pw").await.unwrap();

        let mut profile = sample_profile();
        profile.experience.push(ExperienceEntry {
            company: "Analytical Engines Ltd".to_string(),
            job_title: "Programmer".to_string(),
            start_date: Some("1842-01".to_string()),
            current: true,
            responsibilities: "Wrote the first published algorithm".to_string(),
            ..Default::default()
        });
        profile.education.push(EducationEntry {
            institution: "Home tutoring".to_string(),
            degree: "Mathematics".to_string(),
            ..Default::default()
        });

        save(&users, "ada", &profile).await.unwrap();
        assert_eq!(load(&users, "ada").await.unwrap(), profile);
    }

    #[tokio::test]
    async fn test_load_without_saved_profile_is_default() {
        let users = MemoryUserStore::default();
        register(&users, "grace", "pw").await.unwrap();
        assert_eq!(load(&users, "grace").await.unwrap(), Profile::default());
    }

    #[tokio::test]
    async fn test_load_for_unknown_user_is_default_not_error() {
        let users = MemoryUserStore::default();
        assert_eq!(load(&users, "nobody").await.unwrap(), Profile::default());
    }

    #[tokio::test]
    async fn test_last_write_wins() {
        let users = MemoryUserStore::default();
        register(&users, "ada", "pw").await.unwrap();

        let first = sample_profile();
        let mut second = sample_profile();
        second.personal_info.full_name = "Augusta Ada King".to_string();

        save(&users, "ada", &first).await.unwrap();
        save(&users, "ada", &second).await.unwrap();
        assert_eq!(load(&users, "ada").await.unwrap(), second);
    }

    #[tokio::test]
    async fn test_save_for_unknown_user_is_not_found() {
        let users = MemoryUserStore::default();
        let err = save(&users, "nobody", &sample_profile()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
