use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use job_admin::{
    api,
    app::App,
    config::AppConfig,
    menu::render_menu_tree,
    routes::RouteFilterKind,
};

#[derive(Parser)]
#[command(name = "job-admin")]
#[command(about = "Navigation backend for the job administration console")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the menu store and route table over HTTP
    Serve {
        /// Address to bind
        #[arg(long)]
        host: Option<String>,

        /// Port for HTTP API
        #[arg(short, long)]
        port: Option<u16>,

        /// Route filter applied by the update hook
        #[arg(long, value_enum)]
        route_filter: Option<RouteFilterKind>,

        /// Skip the menu load normally started at boot
        #[arg(long)]
        no_initial_load: bool,
    },
    /// Load the menu tree from the configured source and print it
    Menus {
        /// Print JSON instead of a tree
        #[arg(long)]
        json: bool,
    },
    /// Print the route table
    Routes,
    /// Resolve a path against the route table
    Resolve {
        /// URL path, e.g. /home
        path: String,
    },
}

/// Initialize tracing to stderr so command output on stdout stays clean.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "job_admin=debug,tower_http=debug".into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn serve(mut config: AppConfig) -> anyhow::Result<()> {
    let app = App::bootstrap(&config);
    if config.load_on_startup {
        app.spawn_initial_load();
    }

    let router = api::create_router(app);
    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    config.port = listener.local_addr()?.port();
    tracing::info!("job-admin listening on http://{}", config.bind_addr());

    axum::serve(listener, router).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let mut config = AppConfig::load();

    match cli.command {
        Some(Commands::Serve {
            host,
            port,
            route_filter,
            no_initial_load,
        }) => {
            if let Some(host) = host {
                config.host = host;
            }
            if let Some(port) = port {
                config.port = port;
            }
            if let Some(route_filter) = route_filter {
                config.route_filter = route_filter;
            }
            if no_initial_load {
                config.load_on_startup = false;
            }
            serve(config).await?;
        }
        Some(Commands::Menus { json }) => {
            let app = App::bootstrap(&config);
            let menus = app.menus.load_menus().await?;
            if json {
                println!("{}", serde_json::to_string_pretty(menus.as_slice())?);
            } else {
                print!("{}", render_menu_tree(&menus));
            }
        }
        Some(Commands::Routes) => {
            let app = App::bootstrap(&config);
            println!("{}", serde_json::to_string_pretty(app.routes.routes())?);
        }
        Some(Commands::Resolve { path }) => {
            let app = App::bootstrap(&config);
            let found = app.routes.resolve(&path)?;
            println!("{} -> {} ({})", found.path, found.chain().join(" > "), found.view.chunk);
        }
        None => serve(config).await?,
    }

    Ok(())
}
