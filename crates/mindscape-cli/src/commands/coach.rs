use std::io::{BufRead, Write};

use chrono::Local;
use clap::Subcommand;
use mindscape_core::calendar::DailyRatingLedger;
use mindscape_core::coach::{Coach, DayContext};
use mindscape_core::credentials::{keyring_store, HF_KEY_ENTRY};
use mindscape_core::storage::{Config, Database};
use mindscape_core::todo::TodoLedger;

#[derive(Subcommand)]
pub enum CoachAction {
    /// Print a motivational message for today
    Motivate,
    /// Chat with the coach (empty line or "quit" to exit)
    Chat,
    /// Check that the model endpoint is reachable
    Ping,
    /// Store the API key in the OS keyring
    SetKey {
        /// API key
        key: String,
    },
    /// Remove the API key from the OS keyring
    ClearKey,
}

fn day_context(db: &Database, config: &Config) -> DayContext {
    let calendar = DailyRatingLedger::load(db);
    let todos = TodoLedger::load_with_default_goal(db, config.todo.default_goal);
    DayContext {
        today_rating: calendar.rating_for(Local::now().date_naive()),
        completed_todos: todos.completed_count(),
        todo_goal: todos.goal(),
    }
}

/// A coach with today's context and a runtime to drive it.
struct Session {
    rt: tokio::runtime::Runtime,
    coach: Coach,
    ctx: DayContext,
}

impl Session {
    fn open() -> Result<Self, Box<dyn std::error::Error>> {
        let config = Config::load_or_default();
        let db = Database::open()?;
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        Ok(Self {
            rt,
            coach: Coach::from_config(&config.coach),
            ctx: day_context(&db, &config),
        })
    }
}

pub fn run(action: CoachAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        CoachAction::Motivate => {
            let s = Session::open()?;
            let motivation = s.rt.block_on(s.coach.motivation(&s.ctx));
            if motivation.is_error {
                eprintln!("{}", motivation.message);
            } else {
                println!("{}", motivation.message);
            }
        }
        CoachAction::Chat => {
            let mut s = Session::open()?;
            let stdin = std::io::stdin();
            let mut stdout = std::io::stdout();
            loop {
                print!("you> ");
                stdout.flush()?;
                let mut line = String::new();
                if stdin.lock().read_line(&mut line)? == 0 {
                    break;
                }
                let line = line.trim();
                if line.is_empty() || line == "quit" {
                    break;
                }
                if let Some(reply) = s.rt.block_on(s.coach.send_chat(line, &s.ctx)) {
                    println!("coach> {}", reply.text);
                }
            }
        }
        CoachAction::Ping => {
            let s = Session::open()?;
            let status = s.rt.block_on(s.coach.client().ping())?;
            match status {
                200 => println!("{status}: endpoint reachable"),
                503 => println!("{status}: model loading, try again shortly"),
                _ => return Err(format!("endpoint answered HTTP {status}").into()),
            }
        }
        CoachAction::SetKey { key } => {
            let key = key.trim();
            if key.is_empty() {
                return Err("API key cannot be empty".into());
            }
            keyring_store::set(HF_KEY_ENTRY, key)?;
            println!("API key stored");
        }
        CoachAction::ClearKey => {
            keyring_store::delete(HF_KEY_ENTRY)?;
            println!("API key removed");
        }
    }
    Ok(())
}
