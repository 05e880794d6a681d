use chrono::{Local, Timelike};
use clap::Subcommand;
use mindscape_core::profile;
use mindscape_core::storage::Database;

#[derive(Subcommand)]
pub enum ProfileAction {
    /// Show the display name
    Name,
    /// Set the display name (empty clears it)
    SetName {
        /// New display name
        name: String,
    },
    /// Print the time-of-day greeting
    Greet,
}

pub fn run(action: ProfileAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;

    match action {
        ProfileAction::Name => {
            let name = profile::user_name(&db);
            if name.is_empty() {
                println!("(not set)");
            } else {
                println!("{name}");
            }
        }
        ProfileAction::SetName { name } => {
            profile::set_user_name(&db, &name)?;
            println!("ok");
        }
        ProfileAction::Greet => {
            let name = profile::user_name(&db);
            println!("{}", profile::greeting(Local::now().hour(), &name));
        }
    }
    Ok(())
}
