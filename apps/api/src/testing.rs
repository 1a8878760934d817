//! In-memory stores, scripted models and fixtures shared by unit and router tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use uuid::Uuid;

use crate::accounts::session::{Session, SessionStore};
use crate::db::UserStore;
use crate::errors::AppError;
use crate::export::PdfRenderer;
use crate::llm_client::{ChatModel, LlmError};
use crate::models::profile::{CareerGoals, PersonalInfo, Profile, Skills};
use crate::models::user::UserRow;
use crate::state::AppState;

#[derive(Default)]
pub struct MemoryUserStore {
    users: Mutex<HashMap<String, (UserRow, Option<Profile>)>>,
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_user(&self, username: &str) -> Result<Option<UserRow>, AppError> {
        let users = self.users.lock().unwrap();
        Ok(users.get(username).map(|(user, _)| user.clone()))
    }

    async fn insert_user(&self, user: &UserRow) -> Result<bool, AppError> {
        let mut users = self.users.lock().unwrap();
        if users.contains_key(&user.username) {
            return Ok(false);
        }
        users.insert(user.username.clone(), (user.clone(), None));
        Ok(true)
    }

    async fn save_profile(&self, username: &str, profile: &Profile) -> Result<(), AppError> {
        let mut users = self.users.lock().unwrap();
        match users.get_mut(username) {
            Some((_, stored)) => {
                *stored = Some(profile.clone());
                Ok(())
            }
            None => Err(AppError::NotFound(format!("User '{username}' not found"))),
        }
    }

    async fn load_profile(&self, username: &str) -> Result<Option<Profile>, AppError> {
        let users = self.users.lock().unwrap();
        Ok(users
            .get(username)
            .map(|(_, profile)| profile.clone().unwrap_or_default()))
    }
}

#[derive(Default)]
pub struct MemorySessionStore {
    sessions: Mutex<HashMap<Uuid, Session>>,
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn get(&self, token: Uuid) -> Result<Option<Session>, AppError> {
        Ok(self.sessions.lock().unwrap().get(&token).cloned())
    }

    async fn put(&self, session: &Session) -> Result<(), AppError> {
        self.sessions
            .lock()
            .unwrap()
            .insert(session.token, session.clone());
        Ok(())
    }

    async fn update(&self, session: &Session) -> Result<bool, AppError> {
        let mut sessions = self.sessions.lock().unwrap();
        match sessions.get_mut(&session.token) {
            Some(stored) => {
                *stored = session.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn destroy(&self, token: Uuid) -> Result<(), AppError> {
        self.sessions.lock().unwrap().remove(&token);
        Ok(())
    }
}

/// Answers with the prompt it was given.
pub struct EchoModel;

#[async_trait]
impl ChatModel for EchoModel {
    async fn complete(&self, _system: &str, prompt: &str) -> Result<String, LlmError> {
        Ok(prompt.to_string())
    }

    fn model_name(&self) -> &str {
        "echo"
    }
}

/// Always fails as if the hosted model returned a server error.
pub struct FailingModel;

#[async_trait]
impl ChatModel for FailingModel {
    async fn complete(&self, _system: &str, _prompt: &str) -> Result<String, LlmError> {
        Err(LlmError::Api {
            status: 500,
            message: "model overloaded".to_string(),
        })
    }

    fn model_name(&self) -> &str {
        "failing"
    }
}

/// Returns a fixed reply regardless of the prompt.
pub struct ScriptedModel {
    reply: String,
}

impl ScriptedModel {
    pub fn new(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
        }
    }
}

#[async_trait]
impl ChatModel for ScriptedModel {
    async fn complete(&self, _system: &str, _prompt: &str) -> Result<String, LlmError> {
        Ok(self.reply.clone())
    }

    fn model_name(&self) -> &str {
        "scripted"
    }
}

/// Name and one technical skill, nothing else.
pub fn ada_profile() -> Profile {
    Profile {
        personal_info: PersonalInfo {
            full_name: "Ada".to_string(),
            ..Default::default()
        },
        skills: Skills {
            technical: vec!["C++".to_string()],
            ..Default::default()
        },
        ..Default::default()
    }
}

/// A profile that passes validation.
pub fn sample_profile() -> Profile {
    Profile {
        personal_info: PersonalInfo {
            full_name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            phone: None,
            location: Some("London".to_string()),
        },
        career_goals: CareerGoals {
            target_position: "Software Engineer".to_string(),
            target_industry: Some("Computing".to_string()),
            experience_level: None,
        },
        skills: Skills {
            technical: vec!["C++".to_string(), "Rust".to_string()],
            soft: vec!["Mentoring".to_string()],
        },
        certifications: vec!["Difference Engine Operator".to_string()],
        ..Default::default()
    }
}

/// App state over in-memory stores and the given model.
pub fn test_state(model: Arc<dyn ChatModel>) -> AppState {
    AppState {
        users: Arc::new(MemoryUserStore::default()),
        sessions: Arc::new(MemorySessionStore::default()),
        model,
        pdf: PdfRenderer::new("portfolio-test-renderer-that-does-not-exist"),
    }
}
