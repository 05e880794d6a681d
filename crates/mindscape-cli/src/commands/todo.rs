use clap::Subcommand;
use mindscape_core::storage::{Config, Database};
use mindscape_core::todo::{TodoLedger, DASHBOARD_PREVIEW};
use uuid::Uuid;

#[derive(Subcommand)]
pub enum TodoAction {
    /// Add a todo
    Add {
        /// Todo title
        title: String,
    },
    /// List todos
    List {
        /// Only the first few, as on the dashboard
        #[arg(long)]
        preview: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Flip a todo between done and not done
    Toggle {
        /// Todo ID
        id: String,
    },
    /// Delete a todo
    Delete {
        /// Todo ID
        id: String,
    },
    /// Show or set the daily goal (0-100)
    Goal {
        /// New goal
        value: Option<u32>,
    },
    /// Delete every todo (the goal is kept)
    Reset {
        /// Confirm the reset
        #[arg(long)]
        yes: bool,
    },
}

fn parse_id(raw: &str) -> Result<Uuid, Box<dyn std::error::Error>> {
    Uuid::parse_str(raw.trim()).map_err(|e| format!("invalid todo id '{raw}': {e}").into())
}

pub fn run(action: TodoAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let db = Database::open()?;
    let mut todos = TodoLedger::load_with_default_goal(&db, config.todo.default_goal);

    match action {
        TodoAction::Add { title } => match todos.add(&title)? {
            Some(event) => println!("{}", serde_json::to_string_pretty(&event)?),
            None => eprintln!("todo title is blank, nothing added"),
        },
        TodoAction::List { preview, json } => {
            let limit = if preview { DASHBOARD_PREVIEW } else { todos.len() };
            let shown = todos.preview(limit);
            if json {
                println!("{}", serde_json::to_string_pretty(shown.items)?);
                return Ok(());
            }
            println!(
                "{}/{} done (goal {}, {:.0}%)",
                todos.completed_count(),
                todos.len(),
                todos.goal(),
                todos.progress() * 100.0
            );
            for item in shown.items {
                let mark = if item.is_complete { "x" } else { " " };
                println!("[{mark}] {}  {}", item.title, item.id);
            }
            if shown.overflow > 0 {
                println!("+{} more", shown.overflow);
            }
        }
        TodoAction::Toggle { id } => {
            let id = parse_id(&id)?;
            match todos.toggle(id)? {
                Some(event) => println!("{}", serde_json::to_string_pretty(&event)?),
                None => return Err(format!("todo not found: {id}").into()),
            }
        }
        TodoAction::Delete { id } => {
            let id = parse_id(&id)?;
            match todos.delete(id)? {
                Some(event) => println!("{}", serde_json::to_string_pretty(&event)?),
                None => return Err(format!("todo not found: {id}").into()),
            }
        }
        TodoAction::Goal { value } => match value {
            Some(goal) => {
                let event = todos.set_goal(goal)?;
                println!("{}", serde_json::to_string_pretty(&event)?);
            }
            None => println!("{}", todos.goal()),
        },
        TodoAction::Reset { yes } => {
            if !yes {
                return Err("refusing to delete every todo without --yes".into());
            }
            let event = todos.reset_all()?;
            println!("{}", serde_json::to_string_pretty(&event)?);
        }
    }
    Ok(())
}
