use askama::Template;

pub mod auth;
pub mod donations;
pub mod events;
pub mod milestones;
pub mod pages;
pub mod profile;
pub mod surveys;
pub mod users;

/// Generic error page shared by handlers whose failure has no better home.
#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub message: String,
}
