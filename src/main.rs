use std::io;

use anyhow::Result;
use clap::{Parser, Subcommand};

use expense_tracker::auth::{authenticate, TerminalPassword, PASSWORD_ENV};
use expense_tracker::cli::{
    handle_add, handle_backup_command, handle_delete, handle_export, handle_history, handle_list,
    handle_password_command, handle_show, handle_summary_command, AddArgs, BackupCommands, DeleteArgs,
    ExportArgs, ListArgs, Menu, PasswordCommands, ShowArgs, SummaryCommands,
};
use expense_tracker::config::{Settings, TrackerPaths};
use expense_tracker::models::BudgetLimits;
use expense_tracker::storage::Storage;
use expense_tracker::{init_tracing, web};

#[derive(Parser)]
#[command(
    name = "expense",
    version,
    about = "Flat-file personal expense tracker",
    long_about = "Record dated expenses and income in a CSV file, check them against \
                  monthly and yearly budgets, summarize, export and back up your data. \
                  Run without a subcommand for the interactive menu."
)]
struct Cli {
    /// Monthly spending limit for this run (overrides the saved setting)
    #[arg(long, global = true, value_name = "AMOUNT")]
    monthly_budget: Option<String>,

    /// Yearly spending limit for this run (defaults to twelve monthly limits)
    #[arg(long, global = true, value_name = "AMOUNT")]
    yearly_budget: Option<String>,

    /// Access password, when one is set
    #[arg(long, global = true, env = PASSWORD_ENV, hide_env_values = true)]
    password: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the data directory, record file and settings
    Init,

    /// Add a record
    Add(AddArgs),

    /// List records with their positions
    #[command(alias = "ls")]
    List(ListArgs),

    /// Show one record in detail
    Show(ShowArgs),

    /// Delete a record by position or id
    #[command(alias = "rm")]
    Delete(DeleteArgs),

    /// Monthly or yearly summary
    #[command(subcommand)]
    Summary(SummaryCommands),

    /// Export all records
    Export(ExportArgs),

    /// Backup management commands
    #[command(subcommand)]
    Backup(BackupCommands),

    /// Set or clear the access password
    #[command(subcommand)]
    Password(PasswordCommands),

    /// Interactive numbered menu
    Menu,

    /// Serve the web form
    Serve {
        /// Address to listen on (defaults to the saved setting)
        #[arg(long, value_name = "HOST:PORT")]
        addr: Option<String>,
    },

    /// Show current configuration and paths
    Config,

    /// Show recent changes from the audit log
    History {
        /// Number of entries to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let paths = TrackerPaths::new()?;
    let mut settings = Settings::load_or_create(&paths)?;
    let limits = settings.budget.overridden_by(BudgetLimits::parse(
        cli.monthly_budget.as_deref(),
        cli.yearly_budget.as_deref(),
    )?);

    let command = cli.command.unwrap_or(Commands::Menu);

    let mut terminal = TerminalPassword;
    if !matches!(command, Commands::Config) {
        authenticate(&settings, cli.password.as_deref(), &mut terminal)?;
    }

    let storage = Storage::new(paths.clone())?;

    match command {
        Commands::Init => {
            println!("Initializing expense tracker at: {}", paths.base_dir().display());
            if storage.records.ensure_exists()? {
                println!("Created {}", storage.records.path().display());
            } else {
                // Rewriting gives rows from older layouts a persistent id
                let records = storage.records.list_all()?;
                storage.records.replace_all(&records)?;
                println!(
                    "Found existing data file with {} record(s): {}",
                    records.len(),
                    storage.records.path().display()
                );
            }
            settings.save(&paths)?;
            println!("Initialization complete!");
        }
        Commands::Add(args) => handle_add(&storage, &limits, args)?,
        Commands::List(args) => handle_list(&storage, args)?,
        Commands::Show(args) => handle_show(&storage, args)?,
        Commands::Delete(args) => handle_delete(&storage, args)?,
        Commands::Summary(cmd) => handle_summary_command(&storage, &limits, cmd)?,
        Commands::Export(args) => handle_export(&storage, args)?,
        Commands::Backup(cmd) => handle_backup_command(&storage, &settings, cmd)?,
        Commands::Password(cmd) => {
            handle_password_command(&paths, &mut settings, &mut terminal, cmd)?
        }
        Commands::Menu => {
            let stdin = io::stdin();
            Menu::new(
                &storage,
                &settings,
                limits,
                &mut terminal,
                stdin.lock(),
                io::stdout(),
            )
            .run()?;
        }
        Commands::Serve { addr } => {
            let addr = addr.unwrap_or_else(|| settings.server_addr.clone());
            println!("Serving on http://{}", addr);
            println!("Press Ctrl+C to stop.");

            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(web::serve(storage, limits, &addr))?;
        }
        Commands::History { limit } => handle_history(&storage, limit)?,
        Commands::Config => print_config(&paths, &settings, &limits),
    }

    Ok(())
}

fn print_config(paths: &TrackerPaths, settings: &Settings, limits: &BudgetLimits) {
    let limit = |value: Option<expense_tracker::models::Money>| {
        value.map_or_else(|| "none".to_string(), |m| m.to_string())
    };

    println!("Expense Tracker Configuration");
    println!("=============================");
    println!("Base directory:   {}", paths.base_dir().display());
    println!("Data file:        {}", paths.records_file().display());
    println!("Backup directory: {}", paths.backup_dir().display());
    println!("Audit log:        {}", paths.audit_log().display());
    println!("Settings file:    {}", paths.settings_file().display());
    println!("Initialized:      {}", paths.is_initialized());
    println!();
    println!("Settings:");
    println!("  Monthly budget:  {}", limit(limits.monthly));
    println!("  Yearly budget:   {}", limit(limits.yearly));
    println!("  Password set:    {}", settings.has_password());
    println!("  Session timeout: {} minutes", settings.session_timeout_minutes);
    println!("  Backup retention: {}", settings.backup_retention);
    println!("  Server address:  {}", settings.server_addr);
}
