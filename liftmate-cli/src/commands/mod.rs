mod config_cmd;
mod exercises;
mod goals;
mod history;
mod photos;
mod settings;
mod start;
mod stats;
mod templates;
pub mod template_parser;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use liftmate::{Config, Storage};

pub use goals::GoalsCreateCommand;
pub use start::StartCommand;
pub use stats::StatsCommand;

#[derive(Parser)]
#[command(name = "liftmate")]
#[command(about = "Strength training log with guided workout sessions", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to configuration file
    #[arg(long, global = true, env = "LIFTMATE_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a workout from a template
    Start(StartCommand),

    /// Manage workout templates
    #[command(subcommand)]
    Templates(TemplatesSubcommands),

    /// Manage the exercise catalogue
    #[command(subcommand)]
    Exercises(ExercisesSubcommands),

    /// Browse completed workouts
    #[command(subcommand)]
    History(HistorySubcommands),

    /// Show training statistics
    Stats(StatsCommand),

    /// Manage goals
    #[command(subcommand)]
    Goals(GoalsSubcommands),

    /// Manage progress photos
    #[command(subcommand)]
    Photos(PhotosSubcommands),

    /// View or change settings
    #[command(subcommand)]
    Settings(SettingsSubcommands),

    /// View or change your profile
    #[command(subcommand)]
    Profile(ProfileSubcommands),

    /// Manage configuration
    #[command(subcommand)]
    Config(ConfigSubcommands),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand)]
enum TemplatesSubcommands {
    /// List templates, most recently used first
    List,

    /// Show the exercises and sets of a template
    Show {
        /// Template ID or name
        template: String,
    },

    /// Create a template
    Create {
        /// Template name (prompted when omitted)
        #[arg(short, long)]
        name: Option<String>,

        /// Optional description
        #[arg(short, long)]
        description: Option<String>,

        /// Exercise plan as "NAME:SETSxREPS[@REST]", repeatable
        #[arg(short, long = "exercise")]
        exercises: Vec<String>,
    },

    /// Delete a template
    Delete {
        /// Template ID or name
        template: String,

        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Subcommand)]
enum ExercisesSubcommands {
    /// List the exercise catalogue
    List {
        /// Only exercises that target this muscle
        #[arg(short, long)]
        muscle: Option<String>,
    },

    /// Add an exercise
    Add {
        /// Exercise name
        name: String,

        /// Comma-separated muscle groups
        #[arg(short, long, value_delimiter = ',')]
        muscles: Vec<String>,
    },

    /// Delete an exercise
    Delete {
        /// Exercise ID or name
        exercise: String,
    },
}

#[derive(Subcommand)]
enum HistorySubcommands {
    /// List completed workouts grouped by week
    List {
        /// Search template and exercise names
        #[arg(short, long)]
        search: Option<String>,

        /// all, week, month, 3months or year
        #[arg(short, long, default_value = "all")]
        period: String,

        /// Number of workouts to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Show workout details
    Show {
        /// Workout ID
        id: String,
    },

    /// Delete a workout
    Delete {
        /// Workout ID
        id: String,

        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Subcommand)]
enum GoalsSubcommands {
    /// List goals
    List {
        /// Include completed goals
        #[arg(short, long)]
        all: bool,
    },

    /// Create a goal
    Create(GoalsCreateCommand),

    /// Record progress on a goal
    Progress {
        /// Goal ID
        id: String,

        /// Current value
        value: f64,
    },

    /// Update lift and visit goals from workout history
    Refresh,

    /// Mark goal as complete
    Complete {
        /// Goal ID
        id: String,
    },

    /// Delete a goal
    Delete {
        /// Goal ID
        id: String,

        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Subcommand)]
enum PhotosSubcommands {
    /// List progress photos
    List {
        /// front, back or side
        #[arg(short, long)]
        category: Option<String>,
    },

    /// Store a progress photo
    Add {
        /// Image file to copy in
        path: PathBuf,

        /// front, back or side
        #[arg(short, long, default_value = "front")]
        category: String,

        /// Optional notes
        #[arg(short, long)]
        notes: Option<String>,
    },

    /// Delete a progress photo
    Delete {
        /// Photo ID
        id: String,
    },

    /// Compare the earliest and latest photo of a category
    Compare {
        /// front, back or side
        #[arg(short, long, default_value = "front")]
        category: String,
    },
}

#[derive(Subcommand)]
enum SettingsSubcommands {
    /// Show current settings
    Show,

    /// Set the weight unit
    Unit {
        /// kg or lbs
        unit: String,
    },
}

#[derive(Subcommand)]
enum ProfileSubcommands {
    /// Show your profile
    Show,

    /// Update profile fields
    Set {
        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        sex: Option<String>,

        #[arg(long)]
        age: Option<u32>,
    },
}

#[derive(Subcommand)]
enum ConfigSubcommands {
    /// Show current configuration
    Show,

    /// Initialize configuration with defaults
    Init {
        /// Overwrite existing config
        #[arg(short, long)]
        force: bool,
    },

    /// Print the configuration file location
    Path,
}

/// Loaded configuration plus an open database
pub struct AppContext {
    pub config: Config,
    pub storage: Storage,
}

impl AppContext {
    pub fn open(config_path: Option<&PathBuf>) -> Result<Self> {
        let config = load_config(config_path)?;
        if !config.ui.color {
            colored::control::set_override(false);
        }

        let storage = Storage::init(&config)?;
        Ok(Self { config, storage })
    }
}

fn config_path(explicit: Option<&PathBuf>) -> Result<PathBuf> {
    match explicit {
        Some(path) => Ok(path.clone()),
        None => Config::config_file(),
    }
}

fn load_config(explicit: Option<&PathBuf>) -> Result<Config> {
    Config::load_from(&config_path(explicit)?)
}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        if self.verbose {
            tracing::debug!("Verbose mode enabled");
        }

        let config = self.config.as_ref();

        match self.command {
            Commands::Config(subcmd) => match subcmd {
                ConfigSubcommands::Show => config_cmd::show_config(&config_path(config)?),
                ConfigSubcommands::Init { force } => {
                    config_cmd::init_config(&config_path(config)?, force)
                }
                ConfigSubcommands::Path => config_cmd::print_path(&config_path(config)?),
            },
            Commands::Completions { shell } => {
                generate_completions(shell);
                Ok(())
            }
            command => {
                let ctx = AppContext::open(config)?;
                run(command, &ctx).await
            }
        }
    }
}

async fn run(command: Commands, ctx: &AppContext) -> Result<()> {
    match command {
        Commands::Start(cmd) => cmd.execute(ctx).await,
        Commands::Templates(subcmd) => match subcmd {
            TemplatesSubcommands::List => templates::list_templates(ctx),
            TemplatesSubcommands::Show { template } => templates::show_template(ctx, &template),
            TemplatesSubcommands::Create {
                name,
                description,
                exercises,
            } => templates::create_template(ctx, name, description, &exercises),
            TemplatesSubcommands::Delete { template, force } => {
                templates::delete_template(ctx, &template, force)
            }
        },
        Commands::Exercises(subcmd) => match subcmd {
            ExercisesSubcommands::List { muscle } => {
                exercises::list_exercises(ctx, muscle.as_deref())
            }
            ExercisesSubcommands::Add { name, muscles } => {
                exercises::add_exercise(ctx, &name, muscles)
            }
            ExercisesSubcommands::Delete { exercise } => {
                exercises::delete_exercise(ctx, &exercise)
            }
        },
        Commands::History(subcmd) => match subcmd {
            HistorySubcommands::List {
                search,
                period,
                limit,
            } => history::list_workouts(ctx, search.as_deref(), &period, limit),
            HistorySubcommands::Show { id } => history::show_workout(ctx, &id),
            HistorySubcommands::Delete { id, force } => history::delete_workout(ctx, &id, force),
        },
        Commands::Stats(cmd) => cmd.execute(ctx),
        Commands::Goals(subcmd) => match subcmd {
            GoalsSubcommands::List { all } => goals::list_goals(ctx, all),
            GoalsSubcommands::Create(cmd) => cmd.execute(ctx),
            GoalsSubcommands::Progress { id, value } => goals::update_progress(ctx, &id, value),
            GoalsSubcommands::Refresh => goals::refresh_goals(ctx),
            GoalsSubcommands::Complete { id } => goals::complete_goal(ctx, &id),
            GoalsSubcommands::Delete { id, force } => goals::delete_goal(ctx, &id, force),
        },
        Commands::Photos(subcmd) => match subcmd {
            PhotosSubcommands::List { category } => photos::list_photos(ctx, category.as_deref()),
            PhotosSubcommands::Add {
                path,
                category,
                notes,
            } => photos::add_photo(ctx, &path, &category, notes),
            PhotosSubcommands::Delete { id } => photos::delete_photo(ctx, &id),
            PhotosSubcommands::Compare { category } => photos::compare_photos(ctx, &category),
        },
        Commands::Settings(subcmd) => match subcmd {
            SettingsSubcommands::Show => settings::show_settings(ctx),
            SettingsSubcommands::Unit { unit } => settings::set_unit(ctx, &unit),
        },
        Commands::Profile(subcmd) => match subcmd {
            ProfileSubcommands::Show => settings::show_profile(ctx),
            ProfileSubcommands::Set { name, sex, age } => {
                settings::set_profile(ctx, name, sex, age)
            }
        },
        // Handled before storage is opened
        Commands::Config(_) | Commands::Completions { .. } => Ok(()),
    }
}

fn generate_completions(shell: clap_complete::Shell) {
    use clap::CommandFactory;
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
}

/// Ask before a destructive action unless `force` is set
pub(crate) fn confirm(prompt: &str, force: bool) -> Result<bool> {
    if force {
        return Ok(true);
    }

    Ok(dialoguer::Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()?)
}
