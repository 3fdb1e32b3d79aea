use clap::Subcommand;
use tasktracker_error::Result;
use tasktracker_service::task::TaskService;
use tasktracker_type::task::{Task, TaskRequest, TaskStatus};

#[derive(Subcommand)]
pub enum TaskSubcommand {
    /// List your tasks
    List {
        /// List the tasks of this user instead
        #[arg(long)]
        user: Option<i64>,
    },

    /// Show a single task
    Get { id: i64 },

    /// Create a new task
    Create {
        title: String,

        #[arg(long, short)]
        description: Option<String>,

        /// One of TODO, IN_PROGRESS or DONE
        #[arg(long, short, default_value_t = TaskStatus::Todo)]
        status: TaskStatus,
    },

    /// Replace the contents of a task
    Update {
        id: i64,

        title: String,

        #[arg(long, short)]
        description: Option<String>,

        #[arg(long, short, default_value_t = TaskStatus::Todo)]
        status: TaskStatus,
    },

    /// Delete a task
    Delete { id: i64 },

    /// Search your tasks
    Search { query: String },
}

fn print_task(task: &Task) {
    let id = task.id.map_or_else(|| "-".into(), |id| id.to_string());
    println!("#{id} [{}] {}", task.status, task.title);

    if let Some(ref description) = task.description {
        println!("    {description}");
    }

    if !task.tags.is_empty() {
        let tags: Vec<&str> = task.tags.iter().map(|tag| tag.name.as_str()).collect();
        println!("    tags: {}", tags.join(", "));
    }
}

fn request(title: String, description: Option<String>, status: TaskStatus) -> TaskRequest {
    TaskRequest {
        title,
        description,
        status,
    }
}

pub async fn handle(cmd: TaskSubcommand, tasks: TaskService) -> Result<()> {
    match cmd {
        TaskSubcommand::List { user } => {
            let list = tasks.list(user).await?;
            if list.is_empty() {
                println!("No tasks");
            }
            list.iter().for_each(print_task);
        }
        TaskSubcommand::Get { id } => print_task(&tasks.get(id).await?),
        TaskSubcommand::Create {
            title,
            description,
            status,
        } => print_task(&tasks.create(&request(title, description, status)).await?),
        TaskSubcommand::Update {
            id,
            title,
            description,
            status,
        } => print_task(&tasks.update(id, &request(title, description, status)).await?),
        TaskSubcommand::Delete { id } => {
            tasks.delete(id).await?;
            println!("Deleted task #{id}");
        }
        TaskSubcommand::Search { query } => tasks.search(&query).await?.iter().for_each(print_task),
    }

    Ok(())
}
