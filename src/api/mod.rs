// src/api/mod.rs
//! One typed accessor per gateway service. Each method issues exactly one
//! request (except `CareerArkApi::arc_data`, which resolves the profile
//! first) and returns the backend's JSON unmodified.

pub mod admin;
pub mod ai;
pub mod applications;
pub mod auth;
pub mod billing;
pub mod career_ark;
pub mod credits;
pub mod cv_workflow;
pub mod cvs;
pub mod feedback;
pub mod jobs;
pub mod profile;

pub use admin::AdminApi;
pub use ai::AiApi;
pub use applications::ApplicationsApi;
pub use auth::AuthApi;
pub use billing::BillingApi;
pub use career_ark::CareerArkApi;
pub use credits::CreditsApi;
pub use cv_workflow::{CvSession, CvWorkflowApi};
pub use cvs::CvsApi;
pub use feedback::FeedbackApi;
pub use jobs::JobsApi;
pub use profile::ProfileApi;
