use clap::Subcommand;
use tasktracker_error::Result;
use tasktracker_service::profile::ProfileService;
use tasktracker_type::profile::{Profile, ProfileRequest};

#[derive(Subcommand)]
pub enum ProfileSubcommand {
    /// Show your profile
    Show,

    /// Change your profile, omitted fields are cleared
    Update {
        #[arg(long)]
        first_name: Option<String>,

        #[arg(long)]
        last_name: Option<String>,

        #[arg(long)]
        email: Option<String>,
    },
}

fn print_profile(profile: &Profile) {
    let field = |value: &Option<String>| value.clone().unwrap_or_else(|| "-".into());

    println!("Username:   {}", field(&profile.username));
    println!("First name: {}", field(&profile.first_name));
    println!("Last name:  {}", field(&profile.last_name));
    println!("Email:      {}", field(&profile.email));
}

pub async fn handle(cmd: ProfileSubcommand, profiles: ProfileService) -> Result<()> {
    match cmd {
        ProfileSubcommand::Show => print_profile(&profiles.get().await?),
        ProfileSubcommand::Update {
            first_name,
            last_name,
            email,
        } => {
            let request = ProfileRequest {
                first_name,
                last_name,
                email,
            };
            print_profile(&profiles.update(&request).await?);
        }
    }

    Ok(())
}
