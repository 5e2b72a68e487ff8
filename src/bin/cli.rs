//! Wellbeing Journal CLI
//!
//! Command-line front end for the journal service:
//! - Register, log in and out
//! - Write, edit and delete entries
//! - Show the mood dashboard

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::io::{BufRead, Read, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{fmt::writer::BoxMakeWriter, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};
use wellbeing_journal::views::{self, SummaryView};
use wellbeing_journal::{
    ActionError, App, Config, FileTokenStore, JournalClient, LoggingConfig, Session,
};

#[derive(Parser)]
#[command(name = "journal")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Personal journal with automatic mood tracking")]
#[command(long_about = "Write journal entries and follow your mood over time.\nSentiment is analyzed by the journal service.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: standard locations)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Journal service URL (overrides config)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Output format (text, json)
    #[arg(short, long, default_value = "text", global = true)]
    pub format: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create an account and log in
    Register {
        username: String,
        email: String,
        /// Password (prompted if omitted)
        #[arg(short, long)]
        password: Option<String>,
    },

    /// Log in
    Login {
        username: String,
        /// Password (prompted if omitted)
        #[arg(short, long)]
        password: Option<String>,
    },

    /// Log out and forget the stored session
    Logout,

    /// Show the signed-in user
    Whoami,

    /// Check the journal service and session
    Status,

    /// Summary, mood chart and entries
    Dashboard,

    /// List entries, newest first
    List,

    /// Show one entry in full
    Show { id: i64 },

    /// Write a new entry
    New {
        #[arg(short, long)]
        title: String,
        /// Entry text (read from stdin if omitted)
        #[arg(short, long)]
        content: Option<String>,
    },

    /// Edit an entry; omitted fields keep their current value
    Edit {
        id: i64,
        #[arg(short, long)]
        title: Option<String>,
        #[arg(short, long)]
        content: Option<String>,
    },

    /// Delete an entry
    Delete {
        id: i64,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Mood summary
    Summary,

    /// Mood trend chart
    Chart,

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    if let Some(url) = &cli.api_url {
        config.api.base_url = url.clone();
    }

    init_logging(&config.logging)?;

    if let Commands::Config { output } = &cli.command {
        let content = wellbeing_journal::config::generate_default_config();
        match output {
            Some(path) => {
                if let Some(parent) = path.parent() {
                    std::fs::create_dir_all(parent)?;
                }
                std::fs::write(path, &content)?;
                println!("Config written to {:?}", path);
            }
            None => print!("{}", content),
        }
        return Ok(());
    }

    let token_path = config.session.token_path();
    let session = Session::restore(FileTokenStore::new(&token_path))
        .await
        .with_context(|| format!("Failed to read session from {:?}", token_path))?;
    let client = JournalClient::new(config.api.client_config(), Arc::new(session))?;
    let mut app = App::new(client);
    let json = cli.format == "json";

    let result = match cli.command {
        Commands::Register {
            username,
            email,
            password,
        } => {
            let password = read_password(password)?;
            app.register(&username, &email, &password).await.map(|_| {
                println!("Welcome, {}! Your account is ready and you are logged in.", username);
            })
        }

        Commands::Login { username, password } => {
            let password = read_password(password)?;
            app.login(&username, &password).await.map(|_| {
                println!("Logged in as {}", username);
            })
        }

        Commands::Logout => app.logout().await.map(|_| println!("Logged out")),

        Commands::Whoami => app.current_user().await.and_then(|user| {
            output(json, &user, |user| println!("{} <{}>", user.username, user.email))
        }),

        Commands::Status => {
            status(&app, &config.api.base_url).await;
            Ok(())
        }

        Commands::Dashboard => app.load_dashboard().await.and_then(|data| {
            output(json, data, |data| {
                println!("Wellbeing Journal");
                println!();
                print!("{}", views::render_dashboard(data));
            })
        }),

        Commands::List => app.list_entries().await.and_then(|entries| {
            output(json, &entries, |entries| print!("{}", views::render_entries(entries)))
        }),

        Commands::Show { id } => app.entry(id).await.and_then(|entry| {
            output(json, &entry, |entry| print!("{}", views::entry::render_full(entry)))
        }),

        Commands::New { title, content } => {
            let content = match content {
                Some(content) => content,
                None => read_stdin("Write your entry, then press Ctrl-D:")?,
            };
            app.save_entry(None, &title, &content).await.and_then(|entry| {
                output(json, &entry, |entry| {
                    println!("Created entry #{} ({} {})", entry.id, entry.sentiment.symbol(), entry.sentiment);
                })
            })
        }

        Commands::Edit { id, title, content } => match app.entry(id).await {
            Ok(current) => {
                let title = title.unwrap_or(current.title);
                let content = content.unwrap_or(current.content);
                app.save_entry(Some(id), &title, &content).await.and_then(|entry| {
                    output(json, &entry, |entry| {
                        println!("Updated entry #{} ({} {})", entry.id, entry.sentiment.symbol(), entry.sentiment);
                    })
                })
            }
            Err(e) => Err(e),
        },

        Commands::Delete { id, yes } => {
            if !yes && !confirm("Are you sure you want to delete this entry?")? {
                println!("Cancelled");
                return Ok(());
            }
            app.delete_entry(id).await.map(|_| println!("Deleted entry #{}", id))
        }

        Commands::Summary => app.summary().await.and_then(|summary| {
            output(json, &summary, |summary| {
                print!("{}", SummaryView::from_summary(summary).render())
            })
        }),

        Commands::Chart => app.list_entries().await.and_then(|entries| {
            output(json, &views::trend_points(&entries), |_| {
                print!("{}", views::render_chart(&entries))
            })
        }),

        Commands::Config { .. } => Ok(()),
    };

    if let Err(e) = result {
        report(&e);
        std::process::exit(1);
    }

    Ok(())
}

fn init_logging(config: &LoggingConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("wellbeing_journal={0},journal={0}", config.level))
    });

    let writer = match &config.file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path))?;
            BoxMakeWriter::new(std::sync::Mutex::new(file))
        }
        None => BoxMakeWriter::new(std::io::stderr),
    };

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_ansi(config.file.is_none());
    let fmt_layer = if config.format == "json" {
        fmt_layer.json().boxed()
    } else {
        fmt_layer.boxed()
    };

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(filter)
        .init();

    Ok(())
}

async fn status(app: &App, api_url: &str) {
    println!("Wellbeing Journal v{}", env!("CARGO_PKG_VERSION"));
    println!();

    match app.client().health().await {
        Ok(health) => println!("Service: {} ({})", health.status, api_url),
        Err(e) => {
            println!("Service: unreachable ({})", api_url);
            println!("  {}", e);
        }
    }

    if app.client().session().is_logged_in() {
        match app.client().auth().current_user().await {
            Ok(user) => println!("Session: logged in as {}", user.username),
            Err(e) if e.is_unauthorized() => println!("Session: expired (run `journal login`)"),
            Err(e) => println!("Session: stored, not verified ({})", e),
        }
    } else {
        println!("Session: logged out");
    }
}

fn report(error: &ActionError) {
    eprintln!("{}", error);
    match error {
        ActionError::SessionExpired | ActionError::LoginRequired => {
            eprintln!();
            eprintln!("Log in with:");
            eprintln!("  journal login <username>");
        }
        _ => {}
    }
}

/// Print `value` as pretty JSON, or hand it to `text` for the plain rendering
fn output<T: serde::Serialize>(json: bool, value: &T, text: impl FnOnce(&T)) -> Result<(), ActionError> {
    if json {
        let rendered =
            serde_json::to_string_pretty(value).map_err(|e| ActionError::Failed(e.to_string()))?;
        println!("{}", rendered);
    } else {
        text(value);
    }
    Ok(())
}

fn read_password(password: Option<String>) -> anyhow::Result<String> {
    if let Some(password) = password {
        return Ok(password);
    }
    if let Ok(password) = std::env::var("JOURNAL_PASSWORD") {
        return Ok(password);
    }

    eprint!("Password: ");
    std::io::stderr().flush()?;
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

fn read_stdin(prompt: &str) -> anyhow::Result<String> {
    eprintln!("{}", prompt);
    let mut content = String::new();
    std::io::stdin().read_to_string(&mut content)?;
    Ok(content.trim_end().to_string())
}

fn confirm(question: &str) -> anyhow::Result<bool> {
    eprint!("{} [y/N] ", question);
    std::io::stderr().flush()?;
    let mut answer = String::new();
    std::io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}
