// src/cli.rs
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;

use cv_tailor::api::CvSession;
use cv_tailor::auth::TokenCheck;
use cv_tailor::types::{
    CreditAdjustment, CreditReason, Feedback, FeedbackKind, LoginRequest, NewJob, SocialProvider,
    UserListQuery,
};
use cv_tailor::{ApiClient, CvImport, ImportOutcome};

#[derive(Parser)]
#[command(name = "cv-tailor")]
#[command(about = "Tailor CVs against job postings through the CV API gateway")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Log in and store the session token
    Login { email: String, password: String },
    /// End the session and forget the token
    Logout,
    /// Show the logged-in user
    Whoami,
    /// Check the stored token's expiry locally
    CheckToken,
    /// Check the Career Ark service is up
    Health,
    /// Print the OAuth entry point for a provider
    SocialUrl {
        #[arg(value_enum)]
        provider: SocialProvider,
    },
    /// Upload a CV into Career Ark and wait for extraction
    Import { file: PathBuf },
    /// Manage tracked job postings
    Jobs {
        #[command(subcommand)]
        action: JobsCommand,
    },
    /// List past applications
    History,
    /// Send feedback to the product team
    Feedback {
        message: String,
        #[arg(long, value_enum, default_value = "general")]
        kind: FeedbackKind,
        #[arg(long)]
        email: Option<String>,
    },
    /// Match the profile against a job description file
    Preview { job_description: PathBuf },
    /// Generate a tailored CV and cover letter for a job description file
    Generate { job_description: PathBuf },
    /// Show remaining credits
    Credits,
    /// Admin console (requires an admin session)
    Admin {
        #[command(subcommand)]
        action: AdminCommand,
    },
}

#[derive(Subcommand)]
pub enum AdminCommand {
    Analytics,
    Users {
        #[arg(long, default_value_t = 0)]
        skip: u32,
        #[arg(long, default_value_t = 50)]
        limit: u32,
        #[arg(long)]
        search: Option<String>,
    },
    User { id: String },
    /// Grant (positive) or deduct (negative) credits
    AdjustCredits {
        id: String,
        #[arg(allow_hyphen_values = true)]
        amount: i64,
        #[arg(long, value_enum)]
        reason: CreditReason,
        #[arg(long)]
        notes: Option<String>,
    },
    CreditHistory { id: String },
    Activity { id: String },
    Profile { id: String },
}

#[derive(Subcommand)]
pub enum JobsCommand {
    List,
    Add {
        title: String,
        company: String,
        /// File holding the job description
        description: PathBuf,
    },
    Remove { id: String },
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(value).context("Failed to render response")?
    );
    Ok(())
}

fn read_text(path: &PathBuf) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

pub async fn handle_command(cli: Cli, client: &ApiClient) -> Result<()> {
    match cli.command {
        Command::Login { email, password } => {
            let response = client
                .accounts()
                .login(&LoginRequest { email, password })
                .await?;
            print_json(&response)?;
        }

        Command::Logout => {
            let response = client.accounts().logout().await?;
            print_json(&response)?;
        }

        Command::Whoami => print_json(&client.accounts().current_user().await?)?,

        Command::CheckToken => match client.auth().check_token_expiration()? {
            TokenCheck::Valid(claims) => {
                println!(
                    "Session valid for user {} until {}",
                    claims.user_id().unwrap_or_else(|| "<unknown>".to_string()),
                    claims
                        .expires_at()
                        .map(|t| t.to_rfc3339())
                        .unwrap_or_else(|| "<no expiry>".to_string())
                );
            }
            TokenCheck::Missing => println!("Not logged in"),
            TokenCheck::Expired | TokenCheck::Invalid => {
                println!("Session expired, log in again")
            }
        },

        Command::Health => print_json(&client.career_ark().health().await?)?,

        Command::SocialUrl { provider } => {
            println!("{}", client.accounts().social_auth_url(provider))
        }

        Command::Import { file } => {
            let outcome = CvImport::new(client)
                .run(&file, |progress| {
                    eprintln!("[{:>3}%] {}", progress.percent, progress.status);
                })
                .await?;

            match &outcome {
                ImportOutcome::Completed {
                    sections: Some(sections),
                    ..
                } => {
                    info!("Import {} produced {} entries", outcome.task_id(), sections.total_entries());
                    print_json(sections)?;
                }
                _ => {
                    let message = outcome
                        .error_message()
                        .unwrap_or_else(|| "Import finished".to_string());
                    anyhow::bail!("{}", message);
                }
            }
        }

        Command::Jobs { action } => match action {
            JobsCommand::List => print_json(&client.jobs().list().await?)?,
            JobsCommand::Add {
                title,
                company,
                description,
            } => {
                let job = NewJob {
                    title,
                    company,
                    description: read_text(&description)?,
                };
                print_json(&client.jobs().create(&job).await?)?;
            }
            JobsCommand::Remove { id } => print_json(&client.jobs().delete(&id).await?)?,
        },

        Command::History => print_json(&client.applications().history().await?)?,

        Command::Feedback {
            message,
            kind,
            email,
        } => {
            let feedback = Feedback {
                message,
                kind,
                email,
            };
            print_json(&client.feedback().submit(&feedback).await?)?;
        }

        Command::Preview { job_description } => {
            let description = read_text(&job_description)?;
            let mut session = CvSession::new(client);
            session.start_for_current_user().await?;
            let preview = session.preview(&description).await;
            session.end().await?;
            let preview = preview?;
            eprintln!("Keyword coverage: {}%", preview.keyword_coverage_percent());
            print_json(&preview)?;
        }

        Command::Generate { job_description } => {
            let description = read_text(&job_description)?;
            let mut session = CvSession::new(client);
            session.start_for_current_user().await?;
            let generated = session.generate(&description).await;
            session.end().await?;
            print_json(&generated?)?;
        }

        Command::Credits => {
            let credits = client.credits().balance().await?;
            eprintln!("Total credits: {}", credits.total());
            print_json(&credits)?;
        }

        Command::Admin { action } => handle_admin(action, client).await?,
    }

    Ok(())
}

async fn handle_admin(action: AdminCommand, client: &ApiClient) -> Result<()> {
    let admin = client.admin();
    match action {
        AdminCommand::Analytics => print_json(&admin.analytics().await?)?,
        AdminCommand::Users {
            skip,
            limit,
            search,
        } => {
            let query =
                UserListQuery::page(skip, limit).search(search.as_deref().unwrap_or_default());
            print_json(&admin.list_users(&query).await?)?;
        }
        AdminCommand::User { id } => print_json(&admin.user_detail(&id).await?)?,
        AdminCommand::AdjustCredits {
            id,
            amount,
            reason,
            notes,
        } => {
            let adjustment = CreditAdjustment {
                amount,
                reason,
                notes,
            };
            print_json(&admin.adjust_credits(&id, &adjustment).await?)?;
        }
        AdminCommand::CreditHistory { id } => print_json(&admin.credit_history(&id).await?)?,
        AdminCommand::Activity { id } => print_json(&admin.user_activity(&id).await?)?,
        AdminCommand::Profile { id } => print_json(&admin.user_profile(&id).await?)?,
    }
    Ok(())
}
