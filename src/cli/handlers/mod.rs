mod init;
pub use init::cmd_init;

use std::path::PathBuf;

use regex::RegexBuilder;
use serde::Serialize;
use tracing::debug;

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::config_io;
use crate::io::kv::DirKv;
use crate::io::task_store::TaskStore;
use crate::logging;
use crate::model::config::Config;
use crate::model::date_key::DateKey;
use crate::model::task::{NewTask, TaskId, TaskRef};
use crate::ops::{search, task_ops};
use crate::util::date::{relative_day, today};
use crate::view::screen::{self, Outcome, View};

/// Everything a command needs: the store, settings and the reference day
pub struct Session {
    pub data_dir: PathBuf,
    pub store: TaskStore<DirKv>,
    pub config: Config,
    pub today: DateKey,
    pub json: bool,
}

impl Session {
    pub fn open(data_dir: PathBuf, config: Config, json: bool) -> Self {
        let kv = DirKv::new(&data_dir);
        Session {
            data_dir,
            store: TaskStore::new(kv),
            config,
            today: today(),
            json,
        }
    }
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let data_dir = config_io::resolve_data_dir(cli.data_dir.as_deref());
    let config = config_io::read_config(&data_dir)?;
    logging::init(&config.log.level, cli.verbose);
    debug!(data_dir = %data_dir.display(), "opening task store");

    let mut session = Session::open(data_dir, config, cli.json);
    match cli.command.unwrap_or(Commands::Today) {
        // Init is normally handled in main.rs before the config is read
        Commands::Init(args) => cmd_init(&session.data_dir, args),

        // Views
        Commands::Today => cmd_today(&session),
        Commands::Past => cmd_past(&session),
        Commands::Future => cmd_future(&session),
        Commands::Show(args) => cmd_show(&session, args),
        Commands::Search(args) => cmd_search(&session, args),
        Commands::Dates => cmd_dates(&session),

        // Mutations
        Commands::Add(args) => cmd_add(&mut session, args),
        Commands::Done(args) => cmd_done(&mut session, args),
        Commands::Rm(args) => cmd_rm(&mut session, args),
        Commands::Clear(args) => cmd_clear(&mut session, args),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{}", line);
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_view(session: &Session, view: &View) -> Result<(), Box<dyn std::error::Error>> {
    if session.json {
        print_json(&view_to_json(view))
    } else {
        print_lines(&format_view(view, &session.config.display));
        Ok(())
    }
}

fn print_outcome(session: &Session, outcome: &Outcome, id: Option<TaskId>) -> Result<(), Box<dyn std::error::Error>> {
    if session.json {
        print_json(&outcome_to_json(outcome, id))
    } else {
        print_lines(&format_outcome(outcome, &session.config.display));
        Ok(())
    }
}

fn parse_date_or_today(session: &Session, date: Option<&str>) -> Result<DateKey, Box<dyn std::error::Error>> {
    match date {
        Some(d) => Ok(DateKey::parse(d)?),
        None => Ok(session.today),
    }
}

/// Turn `<ID>` / `--index N --date D` into a concrete date and task reference.
fn resolve_task(session: &Session, args: &TaskArgs) -> Result<(DateKey, TaskRef), Box<dyn std::error::Error>> {
    let date = args.date.as_deref().map(DateKey::parse).transpose()?;

    if let Some(position) = args.index {
        let date = date.ok_or("--index requires --date")?;
        if position == 0 {
            return Err("positions start at 1".into());
        }
        return Ok((date, TaskRef::Index(position - 1)));
    }

    let prefix = args.id.as_deref().ok_or("a task id or --index is required")?;
    let (date, id) = task_ops::resolve_id_prefix(&session.store, prefix, date.as_ref())?;
    Ok((date, TaskRef::Id(id)))
}

// ---------------------------------------------------------------------------
// View commands
// ---------------------------------------------------------------------------

fn cmd_today(session: &Session) -> Result<(), Box<dyn std::error::Error>> {
    print_view(session, &screen::render_today(&session.store, &session.today))
}

fn cmd_past(session: &Session) -> Result<(), Box<dyn std::error::Error>> {
    print_view(session, &screen::render_past(&session.store, &session.today))
}

fn cmd_future(session: &Session) -> Result<(), Box<dyn std::error::Error>> {
    print_view(session, &screen::render_future(&session.store, &session.today))
}

fn cmd_show(session: &Session, args: ShowArgs) -> Result<(), Box<dyn std::error::Error>> {
    let date = DateKey::parse(&args.date)?;
    print_view(session, &screen::render_date(&session.store, &date, &session.today))
}

fn cmd_search(session: &Session, args: SearchArgs) -> Result<(), Box<dyn std::error::Error>> {
    let re = RegexBuilder::new(&args.pattern)
        .case_insensitive(args.ignore_case)
        .build()?;
    let hits = search::search_tasks(&session.store, &re);

    if session.json {
        let results: Vec<SearchHitJson> = hits.iter().map(hit_to_json).collect();
        return print_json(&results);
    }
    if hits.is_empty() {
        println!("No tasks found");
        return Ok(());
    }
    for hit in &hits {
        println!("{}", format_search_hit(hit, &session.config.display));
    }
    Ok(())
}

fn cmd_dates(session: &Session) -> Result<(), Box<dyn std::error::Error>> {
    let summaries: Vec<_> = session
        .store
        .all_dates()
        .into_iter()
        .map(|date| {
            let tasks = session.store.get(&date);
            (date, relative_day(&date, &session.today), tasks)
        })
        .filter(|(_, _, tasks)| !tasks.is_empty())
        .collect();

    if session.json {
        let results: Vec<DateSummaryJson> = summaries
            .iter()
            .map(|(date, class, tasks)| DateSummaryJson {
                date: *date,
                day: day_class_name(*class),
                tasks: tasks.len(),
                done: tasks.iter().filter(|t| t.done).count(),
            })
            .collect();
        return print_json(&results);
    }
    if summaries.is_empty() {
        println!("No tasks found");
        return Ok(());
    }
    for (date, class, tasks) in &summaries {
        println!("{}", format_date_summary(date, *class, tasks));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Mutation commands
// ---------------------------------------------------------------------------

fn cmd_add(session: &mut Session, args: AddArgs) -> Result<(), Box<dyn std::error::Error>> {
    let date = args.date.unwrap_or_else(|| session.today.to_string());
    let new_task = NewTask::parse(&date, &args.time, &args.description.join(" "))?;
    let (id, outcome) = screen::handle_add_task(&mut session.store, new_task, &session.today)?;
    print_outcome(session, &outcome, Some(id))
}

fn cmd_done(session: &mut Session, args: TaskArgs) -> Result<(), Box<dyn std::error::Error>> {
    let (date, task_ref) = resolve_task(session, &args)?;
    let outcome = screen::handle_toggle_task(&mut session.store, &date, task_ref, &session.today)?;
    print_outcome(session, &outcome, None)
}

fn cmd_rm(session: &mut Session, args: TaskArgs) -> Result<(), Box<dyn std::error::Error>> {
    let (date, task_ref) = resolve_task(session, &args)?;
    let outcome = screen::handle_delete_task(&mut session.store, &date, task_ref, &session.today)?;
    print_outcome(session, &outcome, None)
}

fn cmd_clear(session: &mut Session, args: ClearArgs) -> Result<(), Box<dyn std::error::Error>> {
    let date = parse_date_or_today(session, args.date.as_deref())?;
    let removed = task_ops::clear_done(&mut session.store, &date)?;

    if session.json {
        #[derive(Serialize)]
        struct ClearJson {
            date: DateKey,
            removed: usize,
        }
        return print_json(&ClearJson { date, removed });
    }
    let noun = if removed == 1 { "task" } else { "tasks" };
    println!("cleared {} done {} from {}", removed, noun, date);
    Ok(())
}
