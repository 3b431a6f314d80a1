//! `yatri`: the Nomad Yatri command-line client.
//!
//! Keeps one login per context, like the web app keeps one per browser,
//! and drives the admin, host and volunteer dashboards from the terminal.

mod commands;

use std::io::Write;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;
use yatri_client::{ApplicationStatus, SortOrder};
use yatri_session::ClientConfig;

/// Nomad Yatri CLI tool.
#[derive(Parser, Debug)]
#[command(name = "yatri", about = "Nomad Yatri CLI client")]
struct Cli {
    /// Path to client config file (default: ~/.yatri/config.toml).
    #[arg(long = "config", global = true)]
    config: Option<String>,

    /// Output format: table or json.
    #[arg(long = "output", short = 'o', global = true, default_value = "table")]
    output: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Manage contexts (one backend + login each).
    Context {
        #[command(subcommand)]
        action: ContextAction,
    },

    /// Switch the current context.
    Use {
        #[command(subcommand)]
        what: UseWhat,
    },

    /// Login to the current context's backend.
    Login {
        #[arg(long)]
        email: Option<String>,
        /// Password (prefer the interactive prompt).
        #[arg(long)]
        password: Option<String>,
    },

    /// Logout and clear the context's token.
    Logout,

    /// Verify the stored token and show the session.
    Whoami,

    /// Admin dashboard.
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },

    /// Host dashboard.
    Host {
        #[command(subcommand)]
        action: HostAction,
    },

    /// Volunteer dashboard.
    Volunteer {
        #[command(subcommand)]
        action: VolunteerAction,
    },

    /// Public program pages.
    Program {
        #[command(subcommand)]
        action: ProgramAction,
    },

    /// Show version.
    Version,
}

#[derive(Subcommand, Debug)]
enum ContextAction {
    /// Create a new context.
    Create {
        name: String,
        /// Backend base URL, e.g. http://localhost:5000/api.
        #[arg(long)]
        server: Option<String>,
    },
    /// List all contexts.
    List,
    /// Set properties on a context.
    Set {
        name: String,
        #[arg(long)]
        server: Option<String>,
    },
    /// Delete a context.
    Delete { name: String },
}

#[derive(Subcommand, Debug)]
enum UseWhat {
    /// Switch to a context.
    Context { name: String },
}

#[derive(Subcommand, Debug)]
enum AdminAction {
    /// Platform totals.
    Stats,
    /// List users.
    Users {
        /// Filter by role: all, admin, host or volunteer.
        #[arg(long, default_value = "all")]
        role: String,
        #[arg(long, default_value = "createdAt")]
        sort_by: String,
        /// ASC or DESC.
        #[arg(long, default_value = "DESC")]
        order: SortOrder,
    },
    /// List all programs.
    Programs,
    /// Flip a program between active and inactive.
    Toggle { id: i64 },
    /// Delete a user and their profiles.
    DeleteUser {
        id: i64,
        /// Skip confirmation.
        #[arg(long = "yes", short = 'y')]
        yes: bool,
    },
}

#[derive(clap::Args, Debug)]
struct ProgramFields {
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    category: Option<String>,
    #[arg(long)]
    sub_category: Option<String>,
    #[arg(long)]
    location: Option<String>,
    #[arg(long)]
    duration: Option<String>,
    #[arg(long)]
    max_volunteers: Option<u32>,
    /// Image file to upload (repeatable).
    #[arg(long = "image")]
    images: Vec<String>,
}

impl From<ProgramFields> for commands::host::ProgramArgs {
    fn from(f: ProgramFields) -> Self {
        Self {
            title: f.title,
            description: f.description,
            category: f.category,
            sub_category: f.sub_category,
            location: f.location,
            duration: f.duration,
            max_volunteers: f.max_volunteers,
            images: f.images,
        }
    }
}

#[derive(Subcommand, Debug)]
enum HostAction {
    /// Show the property profile.
    Profile,
    /// Update the property profile.
    UpdateProfile {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        property_name: Option<String>,
        #[arg(long)]
        location: Option<String>,
        #[arg(long)]
        accommodation: Option<String>,
        #[arg(long)]
        meals: Option<String>,
        #[arg(long)]
        work_required: Option<String>,
        #[arg(long)]
        capacity: Option<String>,
        #[arg(long)]
        contact: Option<String>,
        /// Property image to upload (repeatable).
        #[arg(long = "image")]
        images: Vec<String>,
    },
    /// List own programs.
    Programs,
    /// List incoming applications.
    Applications,
    /// Accept an application.
    Accept { id: i64 },
    /// Reject an application.
    Reject { id: i64 },
    /// Post a new program. At least one --image is required.
    CreateProgram {
        #[command(flatten)]
        fields: ProgramFields,
    },
    /// Edit a program; omitted fields keep their value.
    UpdateProgram {
        id: i64,
        #[command(flatten)]
        fields: ProgramFields,
    },
    /// Delete a program.
    DeleteProgram {
        id: i64,
        #[arg(long = "yes", short = 'y')]
        yes: bool,
    },
}

#[derive(Subcommand, Debug)]
enum VolunteerAction {
    /// Show the volunteer profile.
    Profile,
    /// List own applications.
    Applications,
    /// Create or replace the volunteer profile.
    SetProfile {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        age: String,
        #[arg(long, default_value = "")]
        country: String,
        /// Comma separated.
        #[arg(long, default_value = "")]
        skills: String,
        /// Comma separated.
        #[arg(long, default_value = "")]
        interests: String,
        /// Comma separated.
        #[arg(long, default_value = "")]
        languages: String,
        /// Photo file to upload.
        #[arg(long)]
        photo: Option<String>,
    },
    /// Apply to a program.
    Apply { program_id: String },
}

#[derive(Subcommand, Debug)]
enum ProgramAction {
    /// Show a program.
    Show { id: String },
}

fn prompt(label: &str) -> anyhow::Result<String> {
    eprint!("{}", label);
    std::io::stderr().flush()?;
    let mut s = String::new();
    std::io::stdin().read_line(&mut s)?;
    Ok(s.trim().to_string())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    let config_path = cli
        .config
        .map(PathBuf::from)
        .unwrap_or_else(ClientConfig::default_path);
    let json = match cli.output.as_str() {
        "json" => true,
        "table" => false,
        other => anyhow::bail!("Unknown output format \"{}\" (expected table or json).", other),
    };
    debug!("client config: {}", config_path.display());

    match cli.command {
        Commands::Context { action } => match action {
            ContextAction::Create { name, server } => {
                commands::context::create(&name, server.as_deref(), &config_path)?;
            }
            ContextAction::List => {
                commands::context::list(&config_path)?;
            }
            ContextAction::Set { name, server } => {
                commands::context::set(&name, server.as_deref(), &config_path)?;
            }
            ContextAction::Delete { name } => {
                commands::context::delete(&name, &config_path)?;
            }
        },

        Commands::Use { what } => match what {
            UseWhat::Context { name } => {
                commands::context::use_context(&name, &config_path)?;
            }
        },

        Commands::Login { email, password } => {
            let email = match email {
                Some(e) => e,
                None => prompt("Email: ")?,
            };
            let password = match password {
                Some(p) => p,
                None => rpassword::prompt_password("Password: ")?,
            };
            if email.is_empty() || password.is_empty() {
                anyhow::bail!("Email and password are required.");
            }
            commands::login::login(&email, &password, &config_path).await?;
        }

        Commands::Logout => {
            commands::login::logout(&config_path).await?;
        }

        Commands::Whoami => {
            commands::login::whoami(json, &config_path).await?;
        }

        Commands::Admin { action } => match action {
            AdminAction::Stats => commands::admin::stats(json, &config_path).await?,
            AdminAction::Users {
                role,
                sort_by,
                order,
            } => {
                let filters = commands::admin::Filters {
                    role: &role,
                    sort_by: &sort_by,
                    order,
                };
                commands::admin::users(json, filters, &config_path).await?;
            }
            AdminAction::Programs => commands::admin::programs(json, &config_path).await?,
            AdminAction::Toggle { id } => commands::admin::toggle(id, &config_path).await?,
            AdminAction::DeleteUser { id, yes } => {
                commands::admin::delete_user(id, yes, &config_path).await?;
            }
        },

        Commands::Host { action } => match action {
            HostAction::Profile => commands::host::profile(json, &config_path).await?,
            HostAction::UpdateProfile {
                name,
                property_name,
                location,
                accommodation,
                meals,
                work_required,
                capacity,
                contact,
                images,
            } => {
                let args = commands::host::ProfileArgs {
                    name,
                    property_name,
                    location,
                    acomodation_type: accommodation,
                    meals,
                    work_required,
                    capacity,
                    contact,
                    images,
                };
                commands::host::update_profile(args, &config_path).await?;
            }
            HostAction::Programs => commands::host::programs(json, &config_path).await?,
            HostAction::Applications => commands::host::applications(json, &config_path).await?,
            HostAction::Accept { id } => {
                commands::host::set_status(id, ApplicationStatus::Accepted, &config_path).await?;
            }
            HostAction::Reject { id } => {
                commands::host::set_status(id, ApplicationStatus::Rejected, &config_path).await?;
            }
            HostAction::CreateProgram { fields } => {
                commands::host::create_program(fields.into(), &config_path).await?;
            }
            HostAction::UpdateProgram { id, fields } => {
                commands::host::update_program(id, fields.into(), &config_path).await?;
            }
            HostAction::DeleteProgram { id, yes } => {
                commands::host::delete_program(id, yes, &config_path).await?;
            }
        },

        Commands::Volunteer { action } => match action {
            VolunteerAction::Profile => commands::volunteer::profile(json, &config_path).await?,
            VolunteerAction::Applications => {
                commands::volunteer::applications(json, &config_path).await?;
            }
            VolunteerAction::SetProfile {
                name,
                age,
                country,
                skills,
                interests,
                languages,
                photo,
            } => {
                let args = commands::volunteer::ProfileArgs {
                    name,
                    age,
                    country,
                    skills,
                    interests,
                    languages,
                    photo,
                };
                commands::volunteer::set_profile(args, &config_path).await?;
            }
            VolunteerAction::Apply { program_id } => {
                commands::volunteer::apply(&program_id, &config_path).await?;
            }
        },

        Commands::Program { action } => match action {
            ProgramAction::Show { id } => commands::program::show(&id, json, &config_path).await?,
        },

        Commands::Version => {
            println!("yatri {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
