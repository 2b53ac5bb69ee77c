use anyhow::Result;
use clap::{Parser, Subcommand};
use gymflow_core::exercise::NewExercise;
use gymflow_core::student::StudentProfileUpdate;
use gymflow_core::virtualization::{DeviceClass, WindowParams};
use gymflow_infrastructure::AppConfig;

mod app;
mod commands;
mod logging;

#[derive(Parser)]
#[command(name = "gymflow")]
#[command(about = "GymFlow - gym management from the terminal", long_about = None)]
struct Cli {
    /// Log level for the log file when RUST_LOG is unset (overrides config)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Also print debug logs to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute list batching and the visible window
    Window {
        #[arg(long, default_value_t = 0.0)]
        offset: f64,
        #[arg(long, default_value_t = 700.0)]
        height: f64,
        #[arg(long, default_value_t = 140.0)]
        item_height: f64,
        #[arg(long, default_value_t = 5)]
        overscan: usize,
        #[arg(long)]
        total: usize,
        /// low, standard or high (defaults to the configured class)
        #[arg(long)]
        device: Option<DeviceClass>,
    },
    #[command(flatten)]
    Backend(BackendCommand),
}

/// Commands that talk to the backend.
#[derive(Subcommand)]
enum BackendCommand {
    /// Sign in with email and password
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "GYMFLOW_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Sign out and forget the stored session
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Show what the navigation gate decides for a location
    Gate {
        #[arg(default_value = "/")]
        location: String,
    },
    /// Send a password reset email
    ResetPassword {
        #[arg(long)]
        email: String,
    },
    /// Manage students
    Students {
        #[command(subcommand)]
        action: StudentsAction,
    },
    /// Manage workout programs
    Workouts {
        #[command(subcommand)]
        action: WorkoutsAction,
    },
    /// Browse and extend the exercise library
    Exercises {
        #[command(subcommand)]
        action: ExercisesAction,
    },
    /// Invite a new student by email
    Invite {
        #[arg(long)]
        email: String,
        #[arg(long)]
        name: String,
    },
}

#[derive(Subcommand)]
enum StudentsAction {
    /// List your students
    List {
        /// Bypass the cache
        #[arg(long)]
        refresh: bool,
    },
    /// Show one student
    Show { id: String },
    /// Activate or deactivate a student
    SetActive {
        id: String,
        #[arg(action = clap::ArgAction::Set)]
        active: bool,
    },
    /// Update profile fields
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        goals: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },
}

#[derive(Subcommand)]
enum WorkoutsAction {
    /// List workouts visible to you
    List,
    /// Create a workout for one of your students
    Create {
        #[arg(long)]
        student: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: Option<String>,
        /// EXERCISE_ID:SETSxREPS[:REST_SECONDS[:WEIGHT_KG]], repeatable
        #[arg(long = "exercise", required = true)]
        exercises: Vec<String>,
    },
}

#[derive(Subcommand)]
enum ExercisesAction {
    /// List the exercise library
    List,
    /// Add an exercise to the library
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        muscle_group: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        video_url: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    let level = cli.log_level.as_deref().unwrap_or(&config.log.level);
    let _log_guard = logging::init(level, cli.verbose)?;

    let command = match cli.command {
        Commands::Window {
            offset,
            height,
            item_height,
            overscan,
            total,
            device,
        } => {
            return commands::window::show(
                device.unwrap_or(config.list.device_class),
                WindowParams {
                    scroll_offset: offset,
                    container_height: height,
                    item_height,
                    overscan,
                    total_items: total,
                },
            );
        }
        Commands::Backend(command) => command,
    };

    let app = app::App::start(&config).await?;
    let result = run(&app, command).await;
    app.shutdown();
    if let Err(err) = &result {
        tracing::error!(error = %err, "command failed");
    }
    result
}

async fn run(app: &app::App, command: BackendCommand) -> Result<()> {
    match command {
        BackendCommand::Login { email, password } => commands::auth::login(app, &email, &password).await,
        BackendCommand::Logout => commands::auth::logout(app).await,
        BackendCommand::Whoami => commands::auth::whoami(app),
        BackendCommand::Gate { location } => commands::auth::gate(app, &location),
        BackendCommand::ResetPassword { email } => commands::auth::reset_password(app, &email).await,
        BackendCommand::Students { action } => match action {
            StudentsAction::List { refresh } => commands::students::list(app, refresh).await,
            StudentsAction::Show { id } => commands::students::show(app, &id).await,
            StudentsAction::SetActive { id, active } => {
                commands::students::set_active(app, &id, active).await
            }
            StudentsAction::Update {
                id,
                name,
                phone,
                goals,
                notes,
            } => {
                let update = StudentProfileUpdate {
                    full_name: name,
                    phone,
                    goals,
                    notes,
                };
                commands::students::update(app, &id, update).await
            }
        },
        BackendCommand::Workouts { action } => match action {
            WorkoutsAction::List => commands::workouts::list(app).await,
            WorkoutsAction::Create {
                student,
                name,
                description,
                exercises,
            } => commands::workouts::create(app, student, name, description, &exercises).await,
        },
        BackendCommand::Exercises { action } => match action {
            ExercisesAction::List => commands::exercises::list(app).await,
            ExercisesAction::Create {
                name,
                muscle_group,
                description,
                video_url,
            } => {
                let exercise = NewExercise {
                    name,
                    muscle_group,
                    description,
                    video_url,
                };
                commands::exercises::create(app, exercise).await
            }
        },
        BackendCommand::Invite { email, name } => commands::invite::invite(app, &email, &name).await,
    }
}
