use clap::Subcommand;
use tasktracker_error::Result;
use tasktracker_service::admin::AdminService;
use tasktracker_type::user::User;

#[derive(Subcommand)]
pub enum AdminSubcommand {
    /// List all users
    Users,

    /// Enable a disabled user or disable an enabled one
    Toggle {
        /// ID of the user
        id: i64,
    },
}

fn print_user(user: &User) {
    let state = if user.enabled { "enabled" } else { "disabled" };
    println!(
        "#{} {} <{}> {} ({state})",
        user.id, user.username, user.email, user.role
    );
}

pub async fn handle(cmd: AdminSubcommand, admin: AdminService) -> Result<()> {
    match cmd {
        AdminSubcommand::Users => admin.users().await?.iter().for_each(print_user),
        AdminSubcommand::Toggle { id } => print_user(&admin.toggle_enabled(id).await?),
    }

    Ok(())
}
