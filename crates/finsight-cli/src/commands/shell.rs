//! Interactive session
//!
//! Reads commands from stdin and keeps insights fresh in the background:
//! every change to the ledger restarts the debounce window, and new
//! insights are printed as soon as they are published.

use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use chrono::NaiveDate;
use finsight_core::{
    import::{parse_amount, parse_date},
    BlobStore, InsightsDebouncer, Summarizer, TransactionStore,
};
use tokio::io::{AsyncBufReadExt, BufReader};

use super::{
    cmd_add, cmd_categories, cmd_delete, cmd_import, cmd_list, cmd_trend, print_insights,
};

/// One parsed shell line
#[derive(Debug, Clone, PartialEq)]
pub enum ShellCommand {
    Add {
        date: Option<NaiveDate>,
        amount: f64,
        description: String,
    },
    List {
        search: Option<String>,
    },
    Delete {
        id: String,
    },
    Import {
        file: PathBuf,
    },
    Trend,
    Categories,
    Insights,
    Help,
    Quit,
}

const HELP: &str = "\
   add [date] <amount> <description>   Record a transaction
   list [text]                         List transactions (optionally filtered)
   delete <id>                         Delete by id or id prefix
   import <file>                       Import a CSV file
   trend                               Spending per day
   categories                          Spending per category
   insights                            Latest insights
   help                                Show this help
   quit                                Leave the session";

/// Parse a shell line; blank lines yield `None`
pub fn parse_shell_line(line: &str) -> std::result::Result<Option<ShellCommand>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    let command = match verb.to_lowercase().as_str() {
        "add" => parse_add(rest)?,
        "list" | "ls" => ShellCommand::List {
            search: (!rest.is_empty()).then(|| rest.to_string()),
        },
        "delete" | "rm" => {
            if rest.is_empty() {
                return Err("usage: delete <id>".into());
            }
            ShellCommand::Delete {
                id: rest.to_string(),
            }
        }
        "import" => {
            if rest.is_empty() {
                return Err("usage: import <file>".into());
            }
            ShellCommand::Import {
                file: PathBuf::from(rest),
            }
        }
        "trend" => ShellCommand::Trend,
        "categories" | "cats" => ShellCommand::Categories,
        "insights" => ShellCommand::Insights,
        "help" | "?" => ShellCommand::Help,
        "quit" | "exit" | "q" => ShellCommand::Quit,
        other => return Err(format!("unknown command '{}' (try 'help')", other)),
    };

    Ok(Some(command))
}

fn parse_add(rest: &str) -> std::result::Result<ShellCommand, String> {
    const USAGE: &str = "usage: add [date] <amount> <description>";

    let mut tokens = rest.split_whitespace();
    let first = tokens.next().ok_or(USAGE)?;

    let (date, amount_token) = match parse_date(first) {
        Ok(date) => (Some(date), tokens.next().ok_or(USAGE)?),
        Err(_) => (None, first),
    };

    let amount = parse_amount(amount_token).map_err(|e| e.to_string())?;
    let description = tokens.collect::<Vec<_>>().join(" ");
    if description.is_empty() {
        return Err(USAGE.into());
    }

    Ok(ShellCommand::Add {
        date,
        amount,
        description,
    })
}

/// Run one command; returns false when the session should end
pub async fn run_shell_command<B: BlobStore>(
    store: &TransactionStore<B>,
    debouncer: &InsightsDebouncer,
    command: ShellCommand,
) -> Result<bool> {
    match command {
        ShellCommand::Add {
            date,
            amount,
            description,
        } => {
            let date = date.map(|d| d.format("%Y-%m-%d").to_string());
            cmd_add(store, date.as_deref(), &description, amount).await?;
            debouncer.schedule(store.list());
        }
        ShellCommand::List { search } => cmd_list(store, search.as_deref(), 20, false)?,
        ShellCommand::Delete { id } => {
            cmd_delete(store, &id)?;
            debouncer.schedule(store.list());
        }
        ShellCommand::Import { file } => {
            cmd_import(store, &file).await?;
            debouncer.schedule(store.list());
        }
        ShellCommand::Trend => cmd_trend(store, false)?,
        ShellCommand::Categories => cmd_categories(store, false, false)?,
        ShellCommand::Insights => match debouncer.latest() {
            Some(insights) if !debouncer.is_pending() => print_insights(&insights),
            _ => println!("   ⏳ Insights are being refreshed..."),
        },
        ShellCommand::Help => println!("{}", HELP),
        ShellCommand::Quit => return Ok(false),
    }

    Ok(true)
}

pub async fn cmd_shell<B: BlobStore>(
    store: &TransactionStore<B>,
    summarizer: Summarizer,
    window: Duration,
) -> Result<()> {
    let debouncer = InsightsDebouncer::new(summarizer, window);
    let mut updates = debouncer.subscribe();
    debouncer.schedule(store.list());

    println!("💰 FinSight interactive session ({} transactions)", store.list().len());
    println!(
        "   Insights refresh {}ms after the last change.",
        debouncer.window().as_millis()
    );
    println!("   Type 'help' for commands, 'quit' to leave.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("finsight> ");
        std::io::stdout().flush()?;

        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match parse_shell_line(&line) {
                    Ok(None) => {}
                    Ok(Some(command)) => match run_shell_command(store, &debouncer, command).await {
                        Ok(true) => {}
                        Ok(false) => break,
                        Err(e) => println!("   ❌ {:#}", e),
                    },
                    Err(msg) => println!("   {}", msg),
                }
            }
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let latest = updates.borrow_and_update().clone();
                if let Some(insights) = latest {
                    println!();
                    print_insights(&insights);
                }
            }
        }
    }

    debouncer.cancel();
    println!("👋 Bye!");
    Ok(())
}
