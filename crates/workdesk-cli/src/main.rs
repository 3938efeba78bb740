//! Workdesk console.
//!
//! Interactive terminal front end over the Workdesk client core. All
//! business logic lives behind the REST API; the console renders
//! guarded screens, the capability menu and the realtime notification
//! stream.
//!
//! # Environment Variables
//!
//! - `WORKDESK_API_URL`: API base URL
//! - `WORKDESK_WS_URL`: realtime gateway websocket URL
//! - `WORKDESK_SESSION_DIR`: session storage directory
//! - `WORKDESK_DEBUG`: enable debug logging (`true`/`false`)
//! - `WORKDESK_LOG`: tracing filter override (e.g. `workdesk_notify=trace`)

mod command;

use anyhow::Result;
use clap::Parser;
use command::{Command, HELP};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;
use workdesk_api::ApiClient;
use workdesk_app::{
    connect_notifications, menu_for, ApiBroadcastAuth, Navigation, ScreenRegistry, SessionContext,
};
use workdesk_auth::FileSessionStore;
use workdesk_notify::{NotificationHub, WebSocketTransport};
use workdesk_types::NotificationId;

/// Workdesk console
#[derive(Parser, Debug)]
#[command(name = "workdesk")]
#[command(version, about, long_about = None)]
struct Args {
    /// API base URL (also: WORKDESK_API_URL)
    #[arg(long, env = "WORKDESK_API_URL", default_value = "http://localhost:8000/api")]
    api_url: String,

    /// Realtime gateway websocket URL (also: WORKDESK_WS_URL)
    #[arg(
        long,
        env = "WORKDESK_WS_URL",
        default_value = "ws://localhost:6001/app/workdesk?protocol=7"
    )]
    ws_url: String,

    /// Session storage directory (also: WORKDESK_SESSION_DIR)
    #[arg(long, env = "WORKDESK_SESSION_DIR")]
    session_dir: Option<PathBuf>,

    /// Enable debug logging (also: WORKDESK_DEBUG)
    #[arg(short, long, env = "WORKDESK_DEBUG")]
    debug: bool,

    /// Tracing filter override (also: WORKDESK_LOG)
    #[arg(long, env = "WORKDESK_LOG")]
    log: Option<String>,
}

impl Args {
    fn session_dir(&self) -> PathBuf {
        self.session_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(".workdesk"))
    }
}

fn init_tracing(args: &Args) {
    let fallback = if args.debug { "workdesk=debug,info" } else { "warn" };
    let filter = match &args.log {
        Some(directives) => EnvFilter::new(directives),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

struct Console {
    ctx: SessionContext<FileSessionStore>,
    registry: ScreenRegistry,
    ws_url: String,
    hub: Option<Arc<NotificationHub>>,
}

impl Console {
    fn new(ctx: SessionContext<FileSessionStore>, ws_url: String) -> Self {
        Self {
            ctx,
            registry: ScreenRegistry::standard(),
            ws_url,
            hub: None,
        }
    }

    async fn login(&mut self, email: &str, password: &str) {
        match self.ctx.login(email, password).await {
            Ok(session) => {
                println!("logged in as {session}");
                self.connect().await;
            }
            Err(err) => println!("login failed: {err}"),
        }
    }

    /// Connects to the realtime gateway, opens the session's
    /// subscription set and starts the toast printer.
    async fn connect(&mut self) {
        let Some(session) = self.ctx.current() else {
            return;
        };

        let auth = Arc::new(ApiBroadcastAuth::new(Arc::clone(self.ctx.api())));
        let transport = match WebSocketTransport::connect(&self.ws_url, Some(auth)).await {
            Ok(transport) => Arc::new(transport),
            Err(err) => {
                println!("notifications unavailable: {err}");
                return;
            }
        };
        let api: &ApiClient = self.ctx.api();

        match connect_notifications(transport, api, session.user_id()).await {
            Ok((hub, center, mut toasts)) => {
                self.ctx.attach_center(center);
                self.hub = Some(hub);
                tokio::spawn(async move {
                    while let Some(toast) = toasts.recv().await {
                        println!("** {}", toast.message);
                    }
                });
            }
            Err(err) => println!("notifications unavailable: {err}"),
        }
    }

    async fn logout(&mut self) {
        self.hub = None;
        match self.ctx.logout().await {
            Ok(()) => println!("logged out"),
            Err(err) => println!("logout failed: {err}"),
        }
    }

    fn menu(&self) {
        let menu = menu_for(self.ctx.capability());
        if menu.is_empty() {
            println!("(no menu; log in first)");
            return;
        }
        for group in menu {
            println!("{}", group.title);
            for item in group.items {
                println!("  {:<24} {}", item.title, item.path);
                for child in item.children {
                    println!("    {:<22} {}", child.title, child.path);
                }
            }
        }
    }

    async fn open(&mut self, path: &str) {
        let session = self.ctx.current();
        match self.registry.open(session.as_ref(), path) {
            Navigation::Screen(route) => {
                println!("== {} ==", route.title);
                self.render(path).await;
            }
            Navigation::Login { return_to } => {
                println!("please log in first (you will land on {return_to})");
            }
            Navigation::Unauthorized => println!("your role cannot open this screen"),
            Navigation::NotFound => println!("no screen at {path}"),
        }
    }

    /// Fetches and prints a screen's data. Unlisted screens only show
    /// their title.
    async fn render(&mut self, path: &str) {
        let api = Arc::clone(self.ctx.api());
        let outcome = match path {
            "/status-projects" => self.ctx.check(api.status_projects().await).await.map(|rows| {
                for row in &rows {
                    println!("{:<12} {:<32} {:>5.1}%", row.pn, row.name, row.progress);
                }
                rows.len()
            }),
            "/outstanding-projects" => {
                self.ctx.check(api.outstanding_projects().await).await.map(|rows| {
                    for row in &rows {
                        println!("{:<12} {:<32} {:>14.2}", row.pn, row.name, row.outstanding);
                    }
                    rows.len()
                })
            }
            "/clients" => self.ctx.check(api.clients().await).await.map(|rows| {
                for row in &rows {
                    println!("{}", row.name);
                }
                rows.len()
            }),
            "/phc" => self.ctx.check(api.phcs().await).await.map(|rows| {
                for phc in &rows {
                    println!("#{:<6} {}", phc.id, phc.project_name);
                }
                rows.len()
            }),
            "/wo-summary" => self.ctx.check(api.wo_summary().await).await.map(|rows| {
                for wo in &rows {
                    println!(
                        "{:<12} {:<12} {}",
                        wo.wo_number,
                        wo.status,
                        wo.description.as_deref().unwrap_or("-")
                    );
                }
                rows.len()
            }),
            _ => return,
        };

        match outcome {
            Ok(count) => println!("({count} rows)"),
            Err(err) => println!("load failed: {err}"),
        }
    }

    async fn notifications(&self) {
        let Some(hub) = &self.hub else {
            println!("(not connected; log in first)");
            return;
        };
        let list = hub.notifications();
        if list.is_empty() {
            println!("(no notifications)");
            return;
        }
        for n in list {
            let marker = if n.is_read() { " " } else { "*" };
            println!("{marker} {:<6} {}", n.id, n.message);
        }
    }

    async fn read(&mut self, id: i64) {
        let Some(hub) = self.hub.clone() else {
            println!("(not connected; log in first)");
            return;
        };
        let api = Arc::clone(self.ctx.api());
        let result = hub.mark_read(&*api, NotificationId(id)).await;
        match self.ctx.check(result).await {
            Ok(()) => println!("notification {id} marked read"),
            Err(err) => println!("mark read failed: {err}"),
        }
    }

    fn whoami(&self) {
        match self.ctx.current() {
            Some(session) => println!("{session}"),
            None => println!("not logged in"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(&args);

    let store = FileSessionStore::new(args.session_dir())?;
    let api = Arc::new(ApiClient::new(&args.api_url)?);
    let mut console = Console::new(SessionContext::new(store, api), args.ws_url.clone());

    // Pick up a persisted, unexpired session from a previous run.
    match console.ctx.restore().await {
        Ok(Some(session)) => {
            info!(%session, "session restored");
            println!("welcome back, {session}");
            console.connect().await;
        }
        Ok(None) => {}
        Err(err) => println!("could not restore session: {err}"),
    }

    let mut editor = DefaultEditor::new()?;
    loop {
        let line = match editor.readline("workdesk> ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(err) => return Err(err.into()),
        };
        let _ = editor.add_history_entry(&line);

        let command = match Command::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(usage) => {
                println!("{usage}");
                continue;
            }
        };

        match command {
            Command::Login { email } => {
                let password = match editor.readline("password: ") {
                    Ok(password) => password,
                    Err(_) => continue,
                };
                console.login(&email, &password).await;
            }
            Command::Logout => console.logout().await,
            Command::Menu => console.menu(),
            Command::Open { path } => console.open(&path).await,
            Command::Notifications => console.notifications().await,
            Command::Read { id } => console.read(id).await,
            Command::Whoami => console.whoami(),
            Command::Help => println!("{HELP}"),
            Command::Quit => break,
        }
    }

    Ok(())
}
