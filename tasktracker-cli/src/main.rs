use self::{
    admin::AdminSubcommand, config::Environment, profile::ProfileSubcommand, tag::TagSubcommand,
    task::TaskSubcommand,
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tasktracker_config::Configuration;
use tasktracker_error::{Error, Result};
use tasktracker_service::{
    admin::AdminService, auth::AuthService, profile::ProfileService, tag::TagService,
    task::TaskService, ApiClient,
};

mod admin;
mod auth;
mod config;
mod profile;
mod tag;
mod task;

#[derive(Subcommand)]
enum AppSubcommand {
    /// Create a new account, the password is read from TASKTRACKER_PASSWORD
    Register { username: String, email: String },

    /// Check the credentials from the environment
    Login,

    /// Log in and out again
    Logout,

    /// Show who you are logged in as
    Me,

    /// Manage your tasks
    #[clap(subcommand)]
    Task(TaskSubcommand),

    /// Manage your tags
    #[clap(subcommand)]
    Tag(TagSubcommand),

    /// Show and edit your profile
    #[clap(subcommand)]
    Profile(ProfileSubcommand),

    /// Administrate users
    #[clap(subcommand)]
    Admin(AdminSubcommand),
}

/// CLI for the task tracker
#[derive(Parser)]
#[command(about, author, version)]
struct App {
    /// Path to the configuration file
    #[arg(long, short)]
    config: Option<PathBuf>,

    #[clap(subcommand)]
    subcommand: AppSubcommand,
}

async fn run(app: App) -> Result<()> {
    let config = match app.config {
        Some(path) => Configuration::load(path).await?,
        None => Configuration::default(),
    };
    let env = Environment::from_env()?;

    let client = ApiClient::new(&config)?;
    // The backend rejects unsafe requests without a token, but reads still work
    client.prime().await.ok();

    let auth = AuthService::new(client.clone());
    match app.subcommand {
        AppSubcommand::Register { username, email } => {
            self::auth::register(&auth, &env, username, email).await?;
        }
        AppSubcommand::Login => {
            self::auth::login(&auth, &env).await?;
            println!("Login successful");
        }
        AppSubcommand::Logout => {
            self::auth::login(&auth, &env).await?;
            self::auth::logout(&auth).await;
        }
        AppSubcommand::Me => {
            self::auth::login(&auth, &env).await?;
            self::auth::me(&auth).await?;
        }
        AppSubcommand::Task(cmd) => {
            self::auth::login(&auth, &env).await?;
            self::task::handle(cmd, TaskService::builder().client(client).build()).await?;
        }
        AppSubcommand::Tag(cmd) => {
            self::auth::login(&auth, &env).await?;
            self::tag::handle(cmd, TagService::builder().client(client).build()).await?;
        }
        AppSubcommand::Profile(cmd) => {
            self::auth::login(&auth, &env).await?;
            self::profile::handle(cmd, ProfileService::builder().client(client).build()).await?;
        }
        AppSubcommand::Admin(cmd) => {
            self::auth::login(&auth, &env).await?;
            self::admin::handle(cmd, AdminService::builder().client(client).build()).await?;
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    dotenvy::dotenv().ok();

    let app = App::parse();
    tasktracker_observability::initialise()?;

    run(app).await.map_err(Error::into_error)?;

    Ok(())
}

#[cfg(test)]
mod test {
    use super::{App, AppSubcommand};
    use crate::task::TaskSubcommand;
    use clap::{CommandFactory, Parser};
    use tasktracker_type::task::TaskStatus;

    #[test]
    fn verify_cli() {
        App::command().debug_assert();
    }

    #[test]
    fn task_status_argument() {
        let app = App::try_parse_from([
            "tasktracker",
            "task",
            "create",
            "Buy milk",
            "--status",
            "in_progress",
        ])
        .unwrap();

        let AppSubcommand::Task(TaskSubcommand::Create { title, status, .. }) = app.subcommand
        else {
            panic!("parsed into the wrong subcommand");
        };
        assert_eq!(title, "Buy milk");
        assert_eq!(status, TaskStatus::InProgress);
    }
}
