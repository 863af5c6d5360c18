use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use propdesk::prelude::*;
use propdesk::{ENV_API_URL, ENV_TIMEOUT_SECS};
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Propdesk(#[from] PropdeskError),
    #[error("not logged in; run `propdesk login` first")]
    NotLoggedIn,
    #[error("failed to read {path}: {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid JSON output: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<ApiError> for CliError {
    fn from(e: ApiError) -> Self {
        Self::Propdesk(e.into())
    }
}

impl From<SessionError> for CliError {
    fn from(e: SessionError) -> Self {
        Self::Propdesk(e.into())
    }
}

#[derive(Parser, Debug)]
#[command(name = "propdesk", about = "Propdesk property-management CLI")]
struct Cli {
    #[arg(long, env = ENV_API_URL, default_value = "http://localhost:3000/api")]
    base_url: String,

    #[arg(long, env = ENV_TIMEOUT_SECS, default_value_t = 30)]
    timeout_secs: u64,

    /// Where the token and cached user are kept between runs.
    #[arg(long, env = "PROPDESK_SESSION_FILE", default_value = ".propdesk-session.json")]
    session_file: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "PROPDESK_PASSWORD")]
        password: String,
    },
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        phone: String,
        #[arg(long, env = "PROPDESK_PASSWORD")]
        password: String,
    },
    /// Requests a password-reset link.
    ResetPassword {
        #[arg(long)]
        email: String,
    },
    Logout,
    /// Prints the signed-in user, refreshed from the server.
    Whoami,
    Plots(PlotsCommand),
    Rooms(RoomsCommand),
    Tenants(TenantsCommand),
}

#[derive(Args, Debug)]
struct PlotsCommand {
    #[command(subcommand)]
    command: PlotsSubcommand,
}

#[derive(Subcommand, Debug)]
enum PlotsSubcommand {
    List,
    Get {
        id: String,
    },
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        address: String,
        #[arg(long)]
        description: Option<String>,
    },
    Delete {
        id: String,
    },
    UploadImage {
        id: String,
        file: PathBuf,
        #[arg(long, default_value = "image/jpeg")]
        mime: String,
    },
}

#[derive(Args, Debug)]
struct RoomsCommand {
    #[command(subcommand)]
    command: RoomsSubcommand,
}

#[derive(Subcommand, Debug)]
enum RoomsSubcommand {
    List {
        #[arg(long)]
        plot: Option<String>,
    },
    Get {
        id: String,
    },
    Create {
        #[arg(long)]
        plot: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        rent: f64,
    },
    Delete {
        id: String,
    },
}

#[derive(Args, Debug)]
struct TenantsCommand {
    #[command(subcommand)]
    command: TenantsSubcommand,
}

#[derive(Subcommand, Debug)]
enum TenantsSubcommand {
    List {
        #[arg(long)]
        room: Option<String>,
    },
    Get {
        id: String,
    },
    Delete {
        id: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    propdesk::init_tracing();

    let cli = Cli::parse();
    let client = PropdeskBuilder::new()
        .base_url(cli.base_url)
        .timeout(Duration::from_secs(cli.timeout_secs))
        .build(FileStore::new(cli.session_file))?;

    let session = client.session().initialize().await;
    tracing::debug!(logged_in = session.is_logged_in(), "session restored");

    match cli.command {
        Command::Login { email, password } => {
            let session = client
                .sign_in(&LoginCredentials { email, password })
                .await?;
            match session.user() {
                Some(user) => eprintln!("logged in as {} <{}>", user.name, user.email),
                None => eprintln!("logged in"),
            }
            Ok(())
        }
        Command::Register {
            name,
            email,
            phone,
            password,
        } => {
            let session = client
                .sign_up(&RegisterCredentials {
                    name,
                    email,
                    phone,
                    password,
                })
                .await?;
            if session.is_some() {
                eprintln!("registered and logged in");
            } else {
                eprintln!("registered");
            }
            Ok(())
        }
        Command::ResetPassword { email } => {
            let resp = client
                .auth()
                .reset_password(&ResetPasswordCredentials {
                    email,
                    password: None,
                    token: None,
                })
                .await?;
            eprintln!(
                "{}",
                resp.message.as_deref().unwrap_or("reset link requested")
            );
            Ok(())
        }
        Command::Logout => {
            client.session().logout().await?;
            eprintln!("logged out");
            Ok(())
        }
        Command::Whoami => {
            require_login(&client)?;
            let session = client.session().refresh().await?;
            print_json(&session.user())
        }
        Command::Plots(cmd) => {
            require_login(&client)?;
            run_plots(&client, cmd.command).await
        }
        Command::Rooms(cmd) => {
            require_login(&client)?;
            run_rooms(&client, cmd.command).await
        }
        Command::Tenants(cmd) => {
            require_login(&client)?;
            run_tenants(&client, cmd.command).await
        }
    }
}

fn require_login(client: &Propdesk<FileStore>) -> Result<(), CliError> {
    if client.session().get_state().is_logged_in() {
        Ok(())
    } else {
        Err(CliError::NotLoggedIn)
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn run_plots(client: &Propdesk<FileStore>, cmd: PlotsSubcommand) -> Result<(), CliError> {
    let plots = client.plots();
    match cmd {
        PlotsSubcommand::List => print_json(&plots.list().await?),
        PlotsSubcommand::Get { id } => print_json(&plots.get(&id).await?),
        PlotsSubcommand::Create {
            name,
            address,
            description,
        } => {
            let plot = plots
                .create(&NewPlot {
                    name,
                    address,
                    description,
                })
                .await?;
            eprintln!("created plot: {}", plot.id);
            print_json(&plot)
        }
        PlotsSubcommand::Delete { id } => {
            plots.delete(&id).await?;
            eprintln!("deleted plot: {id}");
            Ok(())
        }
        PlotsSubcommand::UploadImage { id, file, mime } => {
            let bytes = tokio::fs::read(&file)
                .await
                .map_err(|source| CliError::ReadFile {
                    path: file.clone(),
                    source,
                })?;
            let file_name = file
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "upload".to_string());
            let plot = plots
                .upload_image(&id, Upload::new(file_name, mime, bytes))
                .await?;
            print_json(&plot)
        }
    }
}

async fn run_rooms(client: &Propdesk<FileStore>, cmd: RoomsSubcommand) -> Result<(), CliError> {
    let rooms = client.rooms();
    match cmd {
        RoomsSubcommand::List { plot: Some(plot) } => print_json(&rooms.list_for_plot(&plot).await?),
        RoomsSubcommand::List { plot: None } => print_json(&rooms.list().await?),
        RoomsSubcommand::Get { id } => print_json(&rooms.get(&id).await?),
        RoomsSubcommand::Create { plot, name, rent } => {
            let room = rooms
                .create(&NewRoom {
                    plot_id: plot,
                    name,
                    rent,
                    status: RoomStatus::Vacant,
                })
                .await?;
            eprintln!("created room: {}", room.id);
            print_json(&room)
        }
        RoomsSubcommand::Delete { id } => {
            rooms.delete(&id).await?;
            eprintln!("deleted room: {id}");
            Ok(())
        }
    }
}

async fn run_tenants(
    client: &Propdesk<FileStore>,
    cmd: TenantsSubcommand,
) -> Result<(), CliError> {
    let tenants = client.tenants();
    match cmd {
        TenantsSubcommand::List { room: Some(room) } => {
            print_json(&tenants.list_for_room(&room).await?)
        }
        TenantsSubcommand::List { room: None } => print_json(&tenants.list().await?),
        TenantsSubcommand::Get { id } => print_json(&tenants.get(&id).await?),
        TenantsSubcommand::Delete { id } => {
            tenants.delete(&id).await?;
            eprintln!("deleted tenant: {id}");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("propdesk").chain(args.iter().copied()))
            .expect("arguments should parse")
    }

    #[test]
    fn test_command_tree_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_login_takes_email_and_password() {
        let cli = parse(&["login", "--email", "a@x.com", "--password", "secret"]);
        assert!(matches!(
            cli.command,
            Command::Login { ref email, ref password } if email == "a@x.com" && password == "secret"
        ));
    }

    #[test]
    fn test_global_flags_override_defaults() {
        let cli = parse(&[
            "--base-url",
            "https://api.example.com/api",
            "--timeout-secs",
            "5",
            "--session-file",
            "/tmp/s.json",
            "logout",
        ]);
        assert_eq!(cli.base_url, "https://api.example.com/api");
        assert_eq!(cli.timeout_secs, 5);
        assert_eq!(cli.session_file, PathBuf::from("/tmp/s.json"));
        assert!(matches!(cli.command, Command::Logout));
    }

    #[test]
    fn test_rooms_list_accepts_plot_filter() {
        let cli = parse(&["rooms", "list", "--plot", "p1"]);
        let Command::Rooms(rooms) = cli.command else {
            panic!("expected rooms command");
        };
        assert!(matches!(rooms.command, RoomsSubcommand::List { plot: Some(ref p) } if p == "p1"));
    }

    #[test]
    fn test_plots_upload_image_defaults_to_jpeg() {
        let cli = parse(&["plots", "upload-image", "p1", "front.jpg"]);
        let Command::Plots(plots) = cli.command else {
            panic!("expected plots command");
        };
        assert!(matches!(
            plots.command,
            PlotsSubcommand::UploadImage { ref mime, .. } if mime == "image/jpeg"
        ));
    }

    #[test]
    fn test_rooms_create_requires_rent() {
        let result = Cli::try_parse_from(["propdesk", "rooms", "create", "--plot", "p1", "--name", "1A"]);
        assert!(result.is_err());
    }
}
