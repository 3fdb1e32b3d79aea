use clap::Subcommand;
use tasktracker_error::Result;
use tasktracker_service::tag::TagService;
use tasktracker_type::tag::{Tag, TagRequest};

#[derive(Subcommand)]
pub enum TagSubcommand {
    /// List your tags
    List {
        #[arg(long)]
        user: Option<i64>,
    },

    /// Show a single tag
    Get { id: i64 },

    /// Create a new tag
    Create {
        name: String,

        /// Hex colour code, e.g. #FF5733
        #[arg(long, short)]
        color: Option<String>,
    },

    /// Rename or recolour a tag
    Update {
        id: i64,

        name: String,

        #[arg(long, short)]
        color: Option<String>,
    },

    /// Delete a tag
    Delete { id: i64 },

    /// Search tags by name
    Search { query: String },

    /// Count your tags
    Count,
}

fn print_tag(tag: &Tag) {
    let id = tag.id.map_or_else(|| "-".into(), |id| id.to_string());
    match tag.color {
        Some(ref color) => println!("#{id} {} ({color})", tag.name),
        None => println!("#{id} {}", tag.name),
    }
}

pub async fn handle(cmd: TagSubcommand, tags: TagService) -> Result<()> {
    match cmd {
        TagSubcommand::List { user } => tags.list(user).await?.iter().for_each(print_tag),
        TagSubcommand::Get { id } => print_tag(&tags.get(id).await?),
        TagSubcommand::Create { name, color } => {
            print_tag(&tags.create(&TagRequest { name, color }).await?);
        }
        TagSubcommand::Update { id, name, color } => {
            print_tag(&tags.update(id, &TagRequest { name, color }).await?);
        }
        TagSubcommand::Delete { id } => {
            tags.delete(id).await?;
            println!("Deleted tag #{id}");
        }
        TagSubcommand::Search { query } => tags.search(&query).await?.iter().for_each(print_tag),
        TagSubcommand::Count => println!("{}", tags.count().await?),
    }

    Ok(())
}
