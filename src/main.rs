use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use retro_quant::PaletteKind;
use retrokit::api;
use retrokit::cli;
use retrokit::models::{AppConfig, PaletteChoice, ProcessingParams, Resolution, ScalingMode};
use retrokit::server;

#[derive(Parser)]
#[command(name = "retrokit")]
#[command(about = "Retro palette quantization and pixel-art restoration")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve,
    /// Reduce a PNG to a retro palette
    Quantize {
        /// Input PNG file
        #[arg(short, long)]
        input: PathBuf,

        /// Output PNG file path
        #[arg(short, long)]
        output: PathBuf,

        /// Preset id, "original", "derive" or "custom" (default from config)
        #[arg(short, long)]
        palette: Option<String>,

        /// Color count for "derive"
        #[arg(long)]
        colors: Option<usize>,

        /// Comma-separated hex colors for "custom" (e.g. "#000000,#FFFFFF")
        #[arg(long)]
        custom: Option<String>,

        /// Target size as WIDTHxHEIGHT
        #[arg(short, long, default_value = "original")]
        resolution: String,

        /// "stretch" or "fit"
        #[arg(short, long, default_value = "stretch")]
        scaling: String,
    },
    /// Report whether a PNG is upscaled pixel art
    DetectScale {
        /// Input PNG file
        #[arg(short, long)]
        input: PathBuf,
    },
    /// Downscale upscaled pixel art to its native resolution
    Restore {
        /// Input PNG file
        #[arg(short, long)]
        input: PathBuf,

        /// Output PNG file path
        #[arg(short, long)]
        output: PathBuf,
    },
    /// List built-in palettes
    Palettes,
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Retrokit API",
        description = "Retro palette quantization and pixel-art restoration",
        version = "0.1.0",
        license(name = "MIT")
    ),
    paths(
        api::handle_quantize,
        api::handle_detect_scale,
        api::handle_restore,
        api::handle_palettes,
        api::handle_cache_stats,
    ),
    components(schemas(
        api::QuantizeResponse,
        api::ScaleResponse,
        api::PaletteInfo,
        retrokit::services::ProcessorStats,
        retrokit::services::CacheStats,
    )),
    tags(
        (name = "Quantize", description = "Palette reduction"),
        (name = "Scale", description = "Pixel-art scale detection and restoration"),
        (name = "Palettes", description = "Built-in palettes"),
        (name = "Cache", description = "Result cache statistics")
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Quantize {
            input,
            output,
            palette,
            colors,
            custom,
            resolution,
            scaling,
        }) => run_quantize_command(
            &input,
            &output,
            palette,
            colors,
            custom,
            &resolution,
            &scaling,
        ),
        Some(Commands::DetectScale { input }) => run_detect_command(&input),
        Some(Commands::Restore { input, output }) => run_restore_command(&input, &output),
        Some(Commands::Palettes) => {
            run_palettes_command();
            Ok(())
        }
        Some(Commands::Serve) => run_server().await,
        None => {
            run_status_command();
            Ok(())
        }
    }
}

/// Minimal logging for one-shot commands
fn init_cli_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "retrokit=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();
}

fn load_config() -> AppConfig {
    let config_file = std::env::var("CONFIG_FILE").ok().map(PathBuf::from);
    AppConfig::load(config_file.as_deref())
}

/// Quantize a PNG file (no server needed)
fn run_quantize_command(
    input: &PathBuf,
    output: &PathBuf,
    palette: Option<String>,
    colors: Option<usize>,
    custom: Option<String>,
    resolution: &str,
    scaling: &str,
) -> anyhow::Result<()> {
    init_cli_logging();
    let config = load_config();

    let name = palette.unwrap_or_else(|| config.defaults.palette.clone());
    let choice = PaletteChoice::from_parts(
        &name,
        Some(colors.unwrap_or(config.defaults.colors)),
        custom.as_deref(),
    )?;
    let params = ProcessingParams::new(choice)
        .with_resolution(resolution.parse::<Resolution>()?)
        .with_scaling(scaling.parse::<ScalingMode>()?);

    let optimize = config.optimize_png;
    let state = server::create_app_state(config);
    let report = cli::quantize_file(&state.processor, input, output, &params, optimize)?;

    let hex: Vec<String> = report.palette.iter().map(|c| c.to_hex()).collect();
    println!(
        "Wrote {} ({}x{}, {} colors, {} bytes)",
        output.display(),
        report.width,
        report.height,
        report.palette.len(),
        report.bytes_written
    );
    if !hex.is_empty() {
        println!("Palette: {}", hex.join(" "));
    }
    Ok(())
}

fn run_detect_command(input: &PathBuf) -> anyhow::Result<()> {
    init_cli_logging();
    let state = server::create_app_state(load_config());

    match cli::detect_file(&state.processor, input)? {
        Some(estimate) => println!("Upscaled pixel art: {estimate}"),
        None => println!("No upscale detected"),
    }
    Ok(())
}

fn run_restore_command(input: &PathBuf, output: &PathBuf) -> anyhow::Result<()> {
    init_cli_logging();
    let config = load_config();
    let optimize = config.optimize_png;
    let state = server::create_app_state(config);

    match cli::restore_file(&state.processor, input, output, optimize)? {
        Some((report, estimate)) => println!(
            "Wrote {} ({}x{}, {estimate})",
            output.display(),
            report.width,
            report.height
        ),
        None => println!("No upscale detected, nothing written"),
    }
    Ok(())
}

fn run_palettes_command() {
    for kind in PaletteKind::ALL {
        let hex: Vec<String> = kind.colors().iter().map(|c| c.to_hex()).collect();
        println!(
            "{:<12} {:<20} {:>2}  {}",
            kind.as_str(),
            kind.display_name(),
            hex.len(),
            hex.join(" ")
        );
    }
}

fn run_status_command() {
    const VERSION: &str = env!("CARGO_PKG_VERSION");

    // Read environment variables
    let bind_addr = std::env::var("BIND_ADDR").ok();
    let config_file = std::env::var("CONFIG_FILE").ok();

    // Header
    println!("Retrokit v{VERSION}");
    println!("Retro palette quantization and pixel-art restoration\n");

    // Environment variables section
    println!("Environment Variables:");
    println!(
        "  BIND_ADDR   = {}",
        bind_addr.as_deref().unwrap_or("0.0.0.0:3000 (default)")
    );
    println!(
        "  CONFIG_FILE = {}",
        config_file.as_deref().unwrap_or("(not set)")
    );

    // Config source
    let config_source = match config_file {
        Some(ref path) if PathBuf::from(path).exists() => path.to_string(),
        Some(_) => "defaults (file not found)".to_string(),
        None => "defaults".to_string(),
    };
    println!("\nConfig: {config_source}");

    println!("\nPalettes:");
    for kind in PaletteKind::ALL {
        println!("  {:<12} {}", kind.as_str(), kind.display_name());
    }

    // Commands
    println!("\nCommands:");
    println!("  retrokit serve          Start the HTTP server");
    println!("  retrokit quantize       Reduce a PNG to a retro palette");
    println!("  retrokit detect-scale   Report upscaled pixel art");
    println!("  retrokit restore        Downscale pixel art to native size");
    println!("  retrokit palettes       List built-in palettes");
    println!("  retrokit --help         Show all options");
}

/// Run the HTTP server
async fn run_server() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "retrokit=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config_file = std::env::var("CONFIG_FILE").ok().map(PathBuf::from);
    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

    tracing::info!(
        config = ?config_file.as_ref().map(|p| p.display().to_string()).unwrap_or_else(|| "defaults".to_string()),
        "Configuration source"
    );
    let config = AppConfig::load(config_file.as_deref());

    // Create application state using shared server module
    let state = server::create_app_state(config);

    // Build router: start with shared API routes, add production-only routes
    let app = server::build_router(state)
        // OpenAPI documentation (production only)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "Retrokit server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
