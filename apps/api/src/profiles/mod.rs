// Profile repository: one structured profile per user, embedded in the user document.

pub mod handlers;
pub mod repository;
pub mod validation;
