//! services/client/src/cli.rs
//!
//! Argument definitions and command dispatch for the `habits` binary.

use crate::error::{ClientError, ClientResult};
use crate::session::AuthOutcome;
use crate::state::AppState;
use chrono::{Datelike, NaiveDate};
use clap::{Args, Parser, Subcommand, ValueEnum};
use habit_tracker_core::domain::{
    CheckinRange, Frequency, HabitFilter, HabitUpdate, NewCheckin, NewHabit, TrendRange,
};
use serde::Serialize;
use std::io::Write;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "habits")]
#[command(about = "Track habits against the habit tracker backend")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Log in and remember the session
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "HABITS_PASSWORD")]
        password: String,
    },
    /// Create an account and remember the session
    Register {
        #[arg(long)]
        email: String,
        #[arg(long, env = "HABITS_PASSWORD")]
        password: String,
        #[arg(long = "name")]
        display_name: String,
        #[arg(long, default_value = "UTC")]
        timezone: String,
    },
    /// Forget the current session
    Logout,
    /// Show the current session
    Whoami,
    /// Manage habits
    #[command(subcommand)]
    Habits(HabitCommand),
    /// Record a completion for a habit
    Checkin {
        habit_id: String,
        #[arg(long, default_value_t = 1.0)]
        quantity: f64,
    },
    /// List check-ins, today's by default
    Checkins {
        #[arg(long)]
        from: Option<NaiveDate>,
        #[arg(long)]
        to: Option<NaiveDate>,
    },
    /// Show completions and streaks for a month
    Calendar {
        #[arg(long)]
        year: Option<i32>,
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
        month: Option<u32>,
    },
    /// Show trends for one habit
    Trends {
        habit_id: String,
        #[arg(long, default_value = "30d")]
        range: String,
    },
}

#[derive(Subcommand)]
pub enum HabitCommand {
    /// List habits
    List {
        #[arg(long = "user")]
        user_id: Option<String>,
    },
    /// Create a habit
    Create(CreateArgs),
    /// Change fields of a habit
    Update(UpdateArgs),
    /// Delete a habit
    Delete { id: String },
}

#[derive(Args)]
pub struct CreateArgs {
    #[arg(long)]
    title: String,
    #[arg(long)]
    description: Option<String>,
    #[arg(long, default_value = "✅")]
    emoji: String,
    #[arg(long, value_enum, default_value_t = FrequencyArg::Daily)]
    frequency: FrequencyArg,
}

#[derive(Args)]
pub struct UpdateArgs {
    id: String,
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    emoji: Option<String>,
    #[arg(long, value_enum)]
    frequency: Option<FrequencyArg>,
    #[arg(long)]
    completed: Option<bool>,
}

#[derive(Clone, Copy, ValueEnum)]
enum FrequencyArg {
    Daily,
    Weekly,
    Custom,
}

impl From<FrequencyArg> for Frequency {
    fn from(arg: FrequencyArg) -> Self {
        match arg {
            FrequencyArg::Daily => Frequency::Daily,
            FrequencyArg::Weekly => Frequency::Weekly,
            FrequencyArg::Custom => Frequency::Custom,
        }
    }
}

//=========================================================================================
// Dispatch
//=========================================================================================

/// How a command ended when it did not error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    Success,
    Failure,
}

impl From<Exit> for ExitCode {
    fn from(exit: Exit) -> Self {
        match exit {
            Exit::Success => ExitCode::SUCCESS,
            Exit::Failure => ExitCode::FAILURE,
        }
    }
}

/// Where command results and diagnostics are written.
pub struct Console<O, E> {
    pub out: O,
    pub err: E,
}

impl<O: Write, E: Write> Console<O, E> {
    fn json<T: Serialize>(&mut self, value: &T) -> ClientResult<()> {
        serde_json::to_writer_pretty(&mut self.out, value).map_err(ClientError::Encode)?;
        writeln!(self.out)?;
        Ok(())
    }

    fn report(&mut self, outcome: AuthOutcome) -> ClientResult<Exit> {
        match outcome {
            AuthOutcome::Success(session) => {
                writeln!(
                    self.out,
                    "Logged in as {} <{}>",
                    session.display_name, session.email
                )?;
                Ok(Exit::Success)
            }
            AuthOutcome::Failure { error } => {
                writeln!(self.err, "Authentication failed: {}", error)?;
                Ok(Exit::Failure)
            }
        }
    }
}

/// Restores the persisted session, then runs one command. `today` anchors the
/// date defaults of `checkins` and `calendar`.
pub async fn run<O: Write, E: Write>(
    command: Command,
    state: &AppState,
    today: NaiveDate,
    console: &mut Console<O, E>,
) -> ClientResult<Exit> {
    state.sessions.restore();
    let gateway = &state.gateway;

    match command {
        Command::Login { email, password } => {
            return console.report(state.sessions.login(&email, &password).await);
        }
        Command::Register {
            email,
            password,
            display_name,
            timezone,
        } => {
            return console.report(
                state
                    .sessions
                    .register(&email, &password, &display_name, &timezone)
                    .await,
            );
        }
        Command::Logout => {
            state.sessions.logout();
            writeln!(console.out, "Logged out")?;
        }
        Command::Whoami => match state.sessions.session() {
            Some(session) => writeln!(
                console.out,
                "{} <{}> ({})",
                session.display_name, session.email, session.user_id
            )?,
            None => {
                writeln!(console.err, "Not logged in")?;
                return Ok(Exit::Failure);
            }
        },
        Command::Habits(HabitCommand::List { user_id }) => {
            let filter = user_id.map(HabitFilter::for_user);
            console.json(&gateway.get_habits(filter.as_ref()).await?)?;
        }
        Command::Habits(HabitCommand::Create(args)) => {
            let mut habit = NewHabit::new(args.title)
                .with_emoji(args.emoji)
                .with_frequency(args.frequency.into());
            if let Some(description) = args.description {
                habit = habit.with_description(description);
            }
            if let Some(session) = state.sessions.session() {
                habit = habit.for_user(session.user_id);
            }
            console.json(&gateway.create_habit(&habit).await?)?;
        }
        Command::Habits(HabitCommand::Update(args)) => {
            let update = HabitUpdate {
                title: args.title,
                description: args.description,
                emoji: args.emoji,
                frequency: args.frequency.map(Frequency::from),
                is_completed: args.completed,
            };
            if update.is_empty() {
                writeln!(console.err, "Nothing to update")?;
                return Ok(Exit::Failure);
            }
            console.json(&gateway.update_habit(&args.id, &update).await?)?;
        }
        Command::Habits(HabitCommand::Delete { id }) => {
            gateway.delete_habit(&id).await?;
            writeln!(console.out, "Deleted {}", id)?;
        }
        Command::Checkin { habit_id, quantity } => {
            let mut checkin = NewCheckin::now();
            checkin.quantity = quantity;
            console.json(&gateway.create_checkin(&habit_id, &checkin).await?)?;
        }
        Command::Checkins { from, to } => {
            let range = match (from, to) {
                (None, None) => CheckinRange::day(today),
                (from, to) => CheckinRange { from, to },
            };
            console.json(&gateway.get_checkins(&range).await?)?;
        }
        Command::Calendar { year, month } => {
            let year = year.unwrap_or_else(|| today.year());
            let month = month.unwrap_or_else(|| today.month());
            console.json(&gateway.get_calendar(year, month).await?)?;
        }
        Command::Trends { habit_id, range } => {
            console.json(&gateway.get_habit_trends(&habit_id, &TrendRange::new(range)).await?)?;
        }
    }

    Ok(Exit::Success)
}
