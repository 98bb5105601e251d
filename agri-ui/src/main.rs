//! agri - farming advisory command line and HTTP service
//!
//! One-shot subcommands render a single flow to the terminal; `serve` runs
//! the JSON API. A failure in one flow prints its message and exits non-zero
//! without touching any other state.

use std::io::BufRead;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use agri_advisor::intent::RECOGNITION_FAILED;
use agri_advisor::water::{self, WaterConditions};
use agri_common::config::{load_config, ConfigSource, TomlConfig};
use agri_common::{Screen, ScreenStore};
use agri_ui::gateway::{ImageUpload, PredictionGateway};
use agri_ui::speech::SpeechSynthesizer;
use agri_ui::{build_router, display, AppState};

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(name = "agri")]
#[command(about = "Smart farming advisor: crop calendar, voice assistant, disease and water checks")]
#[command(version)]
struct Args {
    /// Config file (overrides AGRI_CONFIG and the user config)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Prediction service base URL
    #[arg(long, global = true, env = "AGRI_GATEWAY_URL")]
    gateway_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP service
    Serve {
        /// Port to listen on
        #[arg(short, long, env = "AGRI_PORT")]
        port: Option<u16>,
    },
    /// List crops in the knowledge base
    Crops,
    /// Is this a good month to plant this crop?
    Calendar { month: String, crop: String },
    /// Ask the farming assistant (reads one line from stdin when omitted)
    Ask {
        utterance: Option<String>,
        /// Read the answer aloud
        #[arg(long)]
        speak: bool,
    },
    /// Detect plant disease from an image
    Detect { image: PathBuf },
    /// Estimate water need from an image
    Water { image: PathBuf },
    /// Calculate water need from explicit conditions
    Estimate {
        #[arg(long)]
        crop: String,
        #[arg(long, default_value = "loamy")]
        soil: String,
        #[arg(long, default_value = "vegetative")]
        stage: String,
        #[arg(long, default_value = "sunny")]
        weather: String,
        #[arg(long, default_value = "Healthy")]
        disease: String,
        #[arg(long, default_value = "moist")]
        moisture: String,
        /// Ask the prediction service instead of calculating locally
        #[arg(long)]
        remote: bool,
    },
    /// List crops, soils, stages, weather and moisture options
    Catalogue {
        #[arg(long)]
        remote: bool,
    },
    /// Check that the prediction service is up
    Status,
    /// Show or change the current screen
    Screen { screen: Option<String> },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();

    let loaded = load_config(args.config.as_deref()).context("Failed to load configuration")?;
    let mut config = loaded.config;

    init_tracing(&config);

    match &loaded.source {
        ConfigSource::Defaults => info!("No config file found, using defaults"),
        ConfigSource::Missing(path) => {
            warn!("Config file {} not found, using defaults", path.display())
        }
        ConfigSource::CliArgument(path)
        | ConfigSource::Environment(path)
        | ConfigSource::UserConfig(path) => info!("Loaded config from {}", path.display()),
    }

    if let Some(url) = args.gateway_url {
        config.gateway.base_url = url;
    }

    agri_advisor::validate_tables().context("Knowledge tables are inconsistent")?;

    if let Command::Serve { port } = args.command {
        if let Some(port) = port {
            config.server.port = port;
        }
        serve(config).await?;
        return Ok(ExitCode::SUCCESS);
    }

    match run_command(args.command, &config).await {
        Ok(output) => {
            print!("{}", output);
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            eprintln!("Error: {}", e.user_message());
            Ok(ExitCode::FAILURE)
        }
    }
}

/// `RUST_LOG` wins; otherwise the configured level
fn init_tracing(config: &TomlConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(&config.logging.level))
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn gateway(config: &TomlConfig) -> agri_common::Result<PredictionGateway> {
    Ok(PredictionGateway::new(config.gateway.clone())?)
}

async fn run_command(command: Command, config: &TomlConfig) -> agri_common::Result<String> {
    match command {
        Command::Serve { .. } => Ok(String::new()),

        Command::Crops => Ok(display::render_crop_list(agri_advisor::crops::all())),

        Command::Calendar { month, crop } => {
            let result = agri_advisor::resolve(&month, &crop)?;
            Ok(display::render_calendar(&result))
        }

        Command::Ask { utterance, speak } => {
            let utterance = match utterance {
                Some(u) => u,
                None => read_utterance()?,
            };
            if utterance.trim().is_empty() {
                return Ok(format!("{}\n", RECOGNITION_FAILED));
            }

            let reply = agri_advisor::classify_intent(&utterance);
            let mut output = display::render_reply(&reply);

            if speak {
                let speech = SpeechSynthesizer::from_config(&config.speech);
                if let Err(e) = speech.speak(reply.response).await {
                    output.push_str(&format!("({})\n", e.user_message()));
                }
            }
            Ok(output)
        }

        Command::Detect { image } => {
            let upload = ImageUpload::from_path(&image).await?;
            let prediction = gateway(config)?.predict_disease(upload).await?;
            Ok(display::render_disease(&prediction))
        }

        Command::Water { image } => {
            let upload = ImageUpload::from_path(&image).await?;
            let prediction = gateway(config)?.predict_water(upload).await?;
            Ok(display::render_water_prediction(&prediction))
        }

        Command::Estimate {
            crop,
            soil,
            stage,
            weather,
            disease,
            moisture,
            remote,
        } => {
            let conditions = WaterConditions {
                soil_type: soil,
                growth_stage: stage,
                weather_condition: weather,
                disease_status: disease,
                soil_moisture: moisture,
                ..WaterConditions::for_crop(crop)
            };
            let estimate = if remote {
                gateway(config)?.calculate_water(&conditions).await?
            } else {
                water::calculate(&conditions)?
            };
            Ok(display::render_water_estimate(&estimate))
        }

        Command::Catalogue { remote } => {
            let catalogue = if remote {
                gateway(config)?.catalogue().await?
            } else {
                water::catalogue()
            };
            Ok(display::render_catalogue(&catalogue))
        }

        Command::Status => {
            let status = gateway(config)?.status().await?;
            Ok(display::render_status(&status))
        }

        Command::Screen { screen } => {
            let mut store = ScreenStore::open(&config.state_dir());
            if let Some(id) = screen {
                let target: Screen = id.parse()?;
                store.navigate(target)?;
            }
            Ok(format!("{}\n", store.current()))
        }
    }
}

/// One line of transcript from stdin
fn read_utterance() -> agri_common::Result<String> {
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

async fn serve(config: TomlConfig) -> Result<()> {
    info!("Starting agri v{}", env!("CARGO_PKG_VERSION"));

    let state_dir = config.state_dir();
    let screens = ScreenStore::open(&state_dir);
    info!("Restored screen: {}", screens.current());

    let gateway = PredictionGateway::new(config.gateway.clone())
        .context("Failed to create prediction service client")?;
    info!("Prediction service: {}", config.gateway.base_url);

    let speech = SpeechSynthesizer::from_config(&config.speech);
    if !speech.is_available() {
        info!("No speech synthesizer configured");
    }

    let state = AppState::new(gateway, screens, speech);
    let app = build_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);
    info!("State directory: {}", state_dir.display());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
