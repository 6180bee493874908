use docindex::api::metrics::METRICS;
use docindex::api::serve_http;
use docindex::config::Config;
use docindex::db::Database;

use log::*;
use std::io;
use std::sync::Arc;

const DEFAULT_CONFIG: &str = "docindex.toml";

fn setup_logger() {
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", concat!(env!("CARGO_PKG_NAME"), "=info"));
    }
    env_logger::init();
}

fn print_help() {
    println!("docindex v{}", env!("CARGO_PKG_VERSION"));
    println!("Full-text search over a generated documentation search index\n");
    println!("USAGE:");
    println!("    docindex [OPTIONS] [CONFIG_FILE]\n");
    println!("OPTIONS:");
    println!("    -h, --help       Show this help message\n");
    println!("ARGUMENTS:");
    println!("    [CONFIG_FILE]    Path to configuration file (default: {DEFAULT_CONFIG})\n");
    println!("CONFIGURATION:");
    println!("The configuration file uses a simple key=value format with sections.\n");
    println!("[index] - Document source and index construction");
    println!("  docs_path = \"output/web/lunr-pretext-search-index.js\"  # Generated data file");
    println!("  title_boost = 2.0                          # Relevance weight of titles");
    println!("  body_boost = 1.0                           # Relevance weight of bodies");
    println!("  retain_positions = true                    # Keep term positions for match data");
    println!("  writer_heap_bytes = 50000000               # Index writer memory budget\n");
    println!("[search] - Query limits");
    println!("  default_limit = 25                         # Hits returned when no limit is given");
    println!("  max_limit = 100                            # Upper bound on a requested limit\n");
    println!("[http] - HTTP API server configuration");
    println!("  bind_addr = \"127.0.0.1:8080\"               # HTTP server bind address");
    println!("  enabled = true                             # Set false to run without HTTP\n");
    println!("EXAMPLES:");
    println!("    docindex                                  # Use {DEFAULT_CONFIG} or defaults");
    println!("    docindex myconfig.toml                    # Use custom config file");
    println!("    docindex --help                           # Show this help");
}

fn load_config(path: Option<&str>) -> io::Result<Config> {
    match path {
        Some(path) => Config::load(path),
        None => match Config::load(DEFAULT_CONFIG) {
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                info!("{} not found, using defaults", DEFAULT_CONFIG);
                Ok(Config::default())
            }
            other => other,
        },
    }
}

fn main() {
    let arg = std::env::args().nth(1);
    if matches!(arg.as_deref(), Some("-h" | "--help")) {
        print_help();
        return;
    }

    setup_logger();
    let cfg = match load_config(arg.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!(
                "failed to read config {}: {}",
                arg.as_deref().unwrap_or(DEFAULT_CONFIG),
                e
            );
            std::process::exit(1);
        }
    };
    info!("config loaded");

    if let Err(e) = run_server(Arc::new(cfg)) {
        eprintln!("docindex: {e}");
        std::process::exit(1);
    }
}

fn run_server(cfg: Arc<Config>) -> io::Result<()> {
    let db = Database::open(&cfg);

    // Dedicated pool for HTTP
    let http_runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(4)
        .thread_name("http-worker")
        .enable_all()
        .build()?;

    let _http_handle = {
        let cfg = cfg.clone();
        let db = db.clone();
        std::thread::spawn(move || {
            http_runtime.block_on(async move {
                if let Err(e) = serve_http(cfg, db).await {
                    error!("http server failed: {}", e);
                }
            });
        })
    };

    info!("docindex server started; press Ctrl-C to stop.");

    let signal_runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    signal_runtime.block_on(tokio::signal::ctrl_c())?;

    info!("shutting down...");

    METRICS
        .shutting_down
        .store(true, std::sync::atomic::Ordering::Relaxed);

    info!("Goodbye.");
    Ok(())
}
