use anyhow::{Context, Result};
use board_client::api::{ApiClient, BoardApi, ProfileImage, RegistrationForm};
use board_client::config::{default_config_path, Config};
use board_client::pages::{self, LoginPage, PostListPage, RegisterPage, SubmitOutcome};
use board_client::session::{FileTokenStore, Session};
use board_client::ui::TerminalView;
use clap::{Parser, Subcommand};
use console::style;
use dialoguer::{Input, Password};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "board", version, about = "Community board client")]
struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true, env = "BOARD_CONFIG")]
    config: Option<PathBuf>,

    /// Raise log verbosity to debug
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Sign in and store the session
    Login {
        #[arg(long)]
        email: Option<String>,
    },
    /// Create an account
    Register {
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        nickname: Option<String>,
        /// JPEG, PNG or GIF used as the avatar
        #[arg(long)]
        profile_image: Option<PathBuf>,
    },
    /// List posts, newest first
    Posts {
        /// How many pages to fetch
        #[arg(long, default_value_t = 1)]
        pages: u32,
    },
    /// Forget the stored session
    Logout,
    /// Show configuration and sign-in state
    Status,
}

struct App {
    config: Config,
    config_path: Option<PathBuf>,
    session: Session,
    api: Arc<dyn BoardApi>,
}

impl App {
    fn new(config_path: Option<PathBuf>) -> Result<Self> {
        let config = Config::load(config_path.as_deref())?;
        let session_path = config.session_path()?;
        let session = Session::new(Arc::new(FileTokenStore::new(session_path)));
        let api: Arc<dyn BoardApi> = Arc::new(ApiClient::new(&config.api, session.clone())?);
        Ok(Self {
            config,
            config_path: config_path.or_else(default_config_path),
            session,
            api,
        })
    }
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn prompt(label: &str, preset: Option<String>) -> Result<String> {
    if let Some(value) = preset {
        return Ok(value);
    }
    Input::<String>::new()
        .with_prompt(label)
        .interact_text()
        .with_context(|| format!("reading {label}"))
}

fn prompt_secret(label: &str) -> Result<String> {
    Password::new()
        .with_prompt(label)
        .interact()
        .with_context(|| format!("reading {label}"))
}

fn exit_code(outcome: SubmitOutcome) -> ExitCode {
    match outcome {
        SubmitOutcome::Succeeded => ExitCode::SUCCESS,
        SubmitOutcome::Invalid | SubmitOutcome::Failed => ExitCode::FAILURE,
    }
}

async fn login(app: &App, email: Option<String>) -> Result<ExitCode> {
    let mut page = LoginPage::new(app.api.clone(), app.session.clone(), TerminalView::new());
    if page.init() {
        println!("Already signed in.");
        return Ok(ExitCode::SUCCESS);
    }

    let email = prompt("Email", email)?;
    let password = prompt_secret("Password")?;
    let outcome = page.submit(&email, &password).await;
    if outcome == SubmitOutcome::Succeeded {
        println!("{} Signed in as {}", style("✓").green(), style(email.trim()).bold());
    }
    Ok(exit_code(outcome))
}

async fn register(
    app: &App,
    email: Option<String>,
    nickname: Option<String>,
    profile_image: Option<PathBuf>,
) -> Result<ExitCode> {
    let mut page = RegisterPage::new(
        app.api.clone(),
        app.session.clone(),
        TerminalView::new(),
        app.config.upload.profile_image_rules(),
    );
    if page.init() {
        println!("Already signed in. Log out first to create another account.");
        return Ok(ExitCode::SUCCESS);
    }

    if let Some(path) = profile_image {
        let image = ProfileImage::from_path(&path)?;
        if !page.on_profile_image_selected(Some(image)) {
            return Ok(ExitCode::FAILURE);
        }
    }

    // Interactive fields re-prompt until the blur checks pass; flag values
    // get one shot.
    let interactive_email = email.is_none();
    let email = loop {
        let value = prompt("Email", email.clone())?;
        if page.on_email_blur(&value).await || !interactive_email {
            break value;
        }
    };

    let interactive_nickname = nickname.is_none();
    let nickname = loop {
        let value = prompt("Nickname", nickname.clone())?;
        if page.on_nickname_blur(&value).await || !interactive_nickname {
            break value;
        }
    };

    let password = prompt_secret("Password")?;
    page.on_password_input(&password, "");
    let password_confirm = prompt_secret("Confirm password")?;
    page.on_password_confirm_input(&password, &password_confirm);

    let outcome = page
        .submit(RegistrationForm {
            email,
            password,
            password_confirm,
            nickname,
            profile_image: None,
        })
        .await;
    Ok(exit_code(outcome))
}

async fn posts(app: &App, pages: u32) -> Result<ExitCode> {
    let mut page = PostListPage::new(
        app.api.clone(),
        app.session.clone(),
        TerminalView::new(),
        app.config.board.page_size,
    );
    if let Err(e) = page.init().await {
        tracing::debug!("First page failed: {e}");
        return Ok(ExitCode::FAILURE);
    }
    for _ in 1..pages {
        if !page.has_more() {
            break;
        }
        page.load_more().await;
    }
    if page.has_more() {
        println!(
            "{}",
            style(format!("More posts available (next page {}).", page.current_page())).dim()
        );
    }
    Ok(ExitCode::SUCCESS)
}

fn status(app: &App) -> Result<ExitCode> {
    let config_path = app
        .config_path
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "(defaults)".into());
    println!("config:   {config_path}");
    println!("api:      {}", app.config.api.base_url);
    println!("timeout:  {}s", app.config.api.timeout_secs);
    println!("session:  {}", app.config.session_path()?.display());
    let state = if app.session.is_authenticated() {
        style("signed in").green()
    } else {
        style("signed out").yellow()
    };
    println!("state:    {state}");
    Ok(ExitCode::SUCCESS)
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let app = App::new(cli.config)?;

    match cli.command {
        Command::Login { email } => login(&app, email).await,
        Command::Register {
            email,
            nickname,
            profile_image,
        } => register(&app, email, nickname, profile_image).await,
        Command::Posts { pages } => posts(&app, pages).await,
        Command::Logout => {
            let mut view = TerminalView::new();
            if pages::logout(&app.session, &mut view)? {
                println!("Signed out.");
            } else if !app.session.is_authenticated() {
                println!("Not signed in.");
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Status => status(&app),
    }
}
