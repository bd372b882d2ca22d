//! Todos CLI
//!
//! Command-line client for the todos API and its query log.
//!
//! # Usage
//!
//! ```bash
//! todos --help
//! todos add "buy milk"
//! todos list
//! todos queries
//! ```

#![deny(unsafe_code)]

mod client;

use clap::{Parser, Subcommand};
use client::{ApiClient, StatsView};
use shared::models::{LogEntry, QueryStatus, Todo};

/// Todos CLI - manage todos and inspect the API's query log
#[derive(Parser)]
#[command(name = "todos")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// API base URL
    #[arg(
        short,
        long,
        env = "TODOS_API_URL",
        default_value = "http://localhost:5000/api"
    )]
    api_url: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Check API and database health
    Health,
    /// List all todos
    List,
    /// Create a todo
    Add {
        /// Task description
        task: String,
    },
    /// Rename a todo
    Edit {
        /// Todo id
        id: i64,
        /// New task description
        task: String,
    },
    /// Flip a todo's completed flag
    Toggle {
        /// Todo id
        id: i64,
    },
    /// Delete a todo
    Remove {
        /// Todo id
        id: i64,
    },
    /// Show recently executed queries
    Queries,
    /// Clear the query log
    ClearQueries,
    /// Show todo and query statistics
    Stats,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let client = ApiClient::new(cli.api_url);

    match cli.command {
        Some(Commands::Health) => {
            let health = client.health().await?;
            println!(
                "{} ({})",
                health["status"].as_str().unwrap_or("unknown"),
                client.base_url()
            );
        }
        Some(Commands::List) => {
            let todos = client.list_todos().await?;
            if todos.is_empty() {
                println!("No todos");
            }
            for todo in &todos {
                println!("{}", format_todo(todo));
            }
        }
        Some(Commands::Add { task }) => {
            let todo = client.create_todo(&task).await?;
            println!("Created {}", format_todo(&todo));
        }
        Some(Commands::Edit { id, task }) => {
            let todo = client.update_todo(id, &task).await?;
            println!("Updated {}", format_todo(&todo));
        }
        Some(Commands::Toggle { id }) => {
            let todo = client.toggle_todo(id).await?;
            println!("{}", format_todo(&todo));
        }
        Some(Commands::Remove { id }) => {
            let todo = client.delete_todo(id).await?;
            println!("Deleted {}", format_todo(&todo));
        }
        Some(Commands::Queries) => {
            let log = client.queries().await?;
            println!("{} queries", log.total);
            for entry in &log.queries {
                println!("{}", format_entry(entry));
            }
        }
        Some(Commands::ClearQueries) => {
            println!("{}", client.clear_queries().await?);
        }
        Some(Commands::Stats) => {
            println!("{}", format_stats(&client.stats().await?));
        }
        None => {
            println!("Todos CLI v{}", env!("CARGO_PKG_VERSION"));
            println!("Use --help for usage information");
        }
    }

    Ok(())
}

fn format_todo(todo: &Todo) -> String {
    let mark = if todo.is_completed() { 'x' } else { ' ' };
    format!("[{mark}] #{} {}", todo.id, todo.task)
}

fn format_entry(entry: &LogEntry) -> String {
    let timing = entry
        .execution_time
        .map_or_else(|| "-".to_string(), |ms| format!("{ms}ms"));
    let outcome = match entry.status {
        QueryStatus::Success => format!("rows={}", entry.row_count.unwrap_or(0)),
        QueryStatus::Error => entry.error.clone().unwrap_or_default(),
        QueryStatus::Pending => String::new(),
    };
    let params = if entry.params.is_empty() {
        String::new()
    } else {
        format!(" {}", serde_json::to_string(&entry.params).unwrap_or_default())
    };

    format!(
        "#{:<5} {:<7} {:>6}  {}{params}  {outcome}",
        entry.id, entry.status, timing, entry.query
    )
    .trim_end()
    .to_string()
}

fn format_stats(stats: &StatsView) -> String {
    format!(
        "todos:   {} total, {} completed, {} pending\n\
         queries: {} logged, {} ok, {} failed, {}ms average",
        stats.database.total_todos,
        stats.database.completed_todos,
        stats.database.pending_todos,
        stats.queries.total_executed,
        stats.queries.successful_queries,
        stats.queries.failed_queries,
        stats.queries.average_execution_time,
    )
}
