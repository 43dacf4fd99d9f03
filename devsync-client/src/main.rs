use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use devsync_client::{
    nav_items, ClientConfig, FileCredentialStore, LoginResponse, PageLoad, Project, Session,
};
use devsync_playground::{
    host_page, Buffers, DirectoryDownloader, ExecutionSandbox, InboundSignal, Language,
    Notification, NotificationService, Playground, SrcdocFrame,
};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "devsync", version, about = "DevSync playground from the terminal")]
struct Cli {
    /// YAML config file. Missing file means defaults.
    #[arg(long, global = true, default_value = "devsync.yaml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug, Default)]
struct Sources {
    /// Saved project (JSON). The single-buffer flags below override its buffers.
    #[arg(long)]
    project: Option<PathBuf>,
    /// Markup buffer (html). Defaults to the starter snippet.
    #[arg(long)]
    markup: Option<PathBuf>,
    /// Style buffer (css).
    #[arg(long)]
    style: Option<PathBuf>,
    /// Script buffer (js).
    #[arg(long)]
    script: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print or write the composed document.
    Compose {
        #[command(flatten)]
        sources: Sources,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Write a host page with the document in a sandboxed frame.
    Preview {
        #[command(flatten)]
        sources: Sources,
        #[arg(long, default_value = "preview.html")]
        out: PathBuf,
        /// Page URL whose `?message=` is shown as a toast on the page.
        #[arg(long)]
        url: Option<String>,
    },
    /// Save the composed document as project.html.
    Export {
        #[command(flatten)]
        sources: Sources,
        /// Target directory (overrides config).
        #[arg(long)]
        dir: Option<PathBuf>,
    },
    /// Save the buffers as a JSON project file.
    Save {
        #[command(flatten)]
        sources: Sources,
        #[arg(long, default_value = "project.json")]
        out: PathBuf,
        /// Open tab to record (html, css or js).
        #[arg(long)]
        active: Option<String>,
    },
    /// Run page-load handling for a URL.
    Open { url: String },
    /// Apply a saved backend login response (JSON).
    Login {
        #[arg(long)]
        response: PathBuf,
    },
    Logout,
    Status,
    /// List header navigation for the current session.
    Nav,
}

impl Sources {
    fn load(&self) -> anyhow::Result<Buffers> {
        let mut buffers = match &self.project {
            Some(path) => Project::load(path)?.buffers,
            None => Buffers::default(),
        };
        if let Some(path) = &self.markup {
            buffers.markup = read(path)?;
        }
        if let Some(path) = &self.style {
            buffers.style = read(path)?;
        }
        if let Some(path) = &self.script {
            buffers.script = read(path)?;
        }
        Ok(buffers)
    }
}

fn read(path: &Path) -> anyhow::Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn print_notification(notification: Option<Notification>) {
    if let Some(n) = notification {
        println!("[{}] {}", n.kind.title(), n.message);
    }
}

fn playground(
    buffers: Buffers,
    export_dir: &Path,
    notifier: &NotificationService,
) -> Playground<SrcdocFrame, DirectoryDownloader> {
    Playground::with_buffers(
        buffers,
        ExecutionSandbox::new(SrcdocFrame::default()),
        DirectoryDownloader::new(export_dir),
        notifier.clone(),
    )
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = ClientConfig::load(&cli.config)?;
    let notifier = NotificationService::new();

    match cli.command {
        Command::Compose { sources, out } => {
            let document = sources.load()?.compose();
            match out {
                Some(path) => {
                    fs::write(&path, document.as_bytes())
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    println!("{}", path.display());
                }
                None => print!("{}", document),
            }
        }
        Command::Preview { sources, out, url } => {
            let pg = playground(sources.load()?, &config.export_dir, &notifier);
            if let Some(url) = url {
                InboundSignal::from_url(&url)?.announce(&notifier);
            }
            let frame = pg.with_preview(|p| {
                p.sandbox()
                    .context()
                    .map(|f| f.markup().to_string())
                    .unwrap_or_default()
            });
            let page = host_page("DevSync", &frame, notifier.current().as_ref());
            fs::write(&out, page).with_context(|| format!("failed to write {}", out.display()))?;
            println!("{}", out.display());
        }
        Command::Export { sources, dir } => {
            let dir = dir.unwrap_or_else(|| config.export_dir.clone());
            let mut pg = playground(sources.load()?, &dir, &notifier);
            let result = pg.export();
            print_notification(notifier.current());
            result?;
            if let Some(path) = pg.exporter().downloader().last_saved() {
                println!("{}", path.display());
            }
        }
        Command::Save {
            sources,
            out,
            active,
        } => {
            let active = active.map(|tag| tag.parse::<Language>()).transpose()?;
            let project = Project {
                buffers: sources.load()?,
                active,
            };
            project.save(&out)?;
            println!("{}", out.display());
        }
        Command::Open { url } => {
            let mut session = Session::open(FileCredentialStore::new(&config.credentials_path))?;
            let secret = config.jwt_secret();
            let page_load = PageLoad {
                policy: config.signal_policy,
                jwt_secret: secret.as_deref(),
            };
            let report = page_load.handle(&url, &notifier, &mut session)?;
            print_notification(notifier.current());
            if let Some(reason) = report.login_refused {
                println!("login not applied: {}", reason);
            }
            println!("logged in: {}", report.logged_in);
        }
        Command::Login { response } => {
            let mut session = Session::open(FileCredentialStore::new(&config.credentials_path))?;
            let response: LoginResponse = serde_json::from_str(&read(&response)?)
                .context("login response is not valid JSON")?;
            let result = session.complete_login(&response, &notifier);
            print_notification(notifier.current());
            result?;
        }
        Command::Logout => {
            let mut session = Session::open(FileCredentialStore::new(&config.credentials_path))?;
            session.logout()?;
            println!("logged in: false");
        }
        Command::Status => {
            let session = Session::open(FileCredentialStore::new(&config.credentials_path))?;
            println!("logged in: {}", session.is_logged_in());
        }
        Command::Nav => {
            let session = Session::open(FileCredentialStore::new(&config.credentials_path))?;
            for item in nav_items(session.is_logged_in()) {
                println!("{:<12} {}", item.name, item.route.path());
            }
        }
    }

    Ok(())
}
