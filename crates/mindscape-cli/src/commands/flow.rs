use clap::Subcommand;
use mindscape_core::flow::{FlowTimer, MAX_DURATION_SECS};
use mindscape_core::storage::{Config, Database, KeyValueStoreExt};
use mindscape_core::Event;

const TIMER_KEY: &str = "flowTimer";

#[derive(Subcommand)]
pub enum FlowAction {
    /// Print current timer state as JSON
    Status,
    /// Start, pause, or move on to the next phase
    Toggle,
    /// Change phase durations (MM:SS, H:MM:SS or seconds)
    Set {
        /// Flow duration
        #[arg(long = "flow")]
        flow: Option<String>,
        /// Break duration
        #[arg(long = "break")]
        brk: Option<String>,
    },
    /// Back to an idle flow phase with all sets restored
    Reset,
}

fn load_timer(db: &Database) -> FlowTimer {
    db.get_json::<FlowTimer>(TIMER_KEY)
        .unwrap_or_else(|| FlowTimer::from_config(&Config::load_or_default().flow))
}

fn save_timer(db: &Database, timer: &FlowTimer) -> Result<(), Box<dyn std::error::Error>> {
    db.set_json(TIMER_KEY, timer)?;
    Ok(())
}

/// Parse `SS`, `MM:SS` or `H:MM:SS` into seconds.
fn parse_duration(raw: &str) -> Result<u64, Box<dyn std::error::Error>> {
    let parts: Vec<u64> = raw
        .trim()
        .split(':')
        .map(|p| p.parse::<u64>())
        .collect::<Result<_, _>>()
        .map_err(|_| format!("invalid duration '{raw}'"))?;
    let secs = match parts.as_slice() {
        [s] => *s,
        [m, s] if *s < 60 => m * 60 + s,
        [h, m, s] if *m < 60 && *s < 60 => h * 3600 + m * 60 + s,
        _ => return Err(format!("invalid duration '{raw}'").into()),
    };
    if secs > MAX_DURATION_SECS {
        return Err(format!("duration '{raw}' exceeds 5:59:59").into());
    }
    Ok(secs)
}

fn snapshot(timer: &FlowTimer) -> serde_json::Value {
    serde_json::json!({
        "phase": timer.phase(),
        "state": timer.state(),
        "display": timer.display(),
        "remaining_secs": timer.remaining_secs(),
        "progress": timer.progress(),
        "sets_remaining": timer.sets_remaining(),
        "flow_secs": timer.flow_secs(),
        "break_secs": timer.break_secs(),
    })
}

fn print_event(event: &Event) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(event)?);
    if let Event::PhaseCompleted { phase, .. } = event {
        let (title, body) = phase.completion_message();
        eprintln!("{title} {body}");
    }
    Ok(())
}

pub fn run(action: FlowAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let mut timer = load_timer(&db);

    // Catch up on wall-clock time since the last invocation.
    if let Some(event) = timer.tick() {
        print_event(&event)?;
    }

    match action {
        FlowAction::Status => {
            println!("{}", serde_json::to_string_pretty(&snapshot(&timer))?);
        }
        FlowAction::Toggle => {
            if let Some(event) = timer.toggle() {
                print_event(&event)?;
            }
        }
        FlowAction::Set { flow, brk } => {
            if flow.is_none() && brk.is_none() {
                return Err("nothing to set; pass --flow and/or --break".into());
            }
            if let Some(raw) = flow {
                timer.set_flow_duration(parse_duration(&raw)?);
            }
            if let Some(raw) = brk {
                timer.set_break_duration(parse_duration(&raw)?);
            }
            println!("{}", serde_json::to_string_pretty(&snapshot(&timer))?);
        }
        FlowAction::Reset => {
            timer.reset();
            println!("{}", serde_json::to_string_pretty(&snapshot(&timer))?);
        }
    }

    save_timer(&db, &timer)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn durations_parse() {
        assert_eq!(parse_duration("90").unwrap(), 90);
        assert_eq!(parse_duration("45:00").unwrap(), 2700);
        assert_eq!(parse_duration("5:30").unwrap(), 330);
        assert_eq!(parse_duration("1:02:03").unwrap(), 3723);
        assert!(parse_duration("1:75").is_err());
        assert!(parse_duration("6:00:00").is_err());
        assert!(parse_duration("soon").is_err());
    }
}
