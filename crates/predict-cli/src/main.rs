//! Predict CLI - send one prompt to a hosted text model
//!
//! Usage:
//!     predict [OPTIONS] --project <PROJECT> <CONTENT>
//!
//! Environment Variables:
//!     PREDICT_PROJECT_ID: Cloud project that owns the model
//!     PREDICT_LOCATION: Region (default: us-central1)
//!     PREDICT_MODEL: Base model name (default: text-bison@001)
//!     PREDICT_TUNED_MODEL: Tuned model endpoint, overrides the base model
//!     PREDICT_ACCESS_TOKEN: Bearer token; gcloud is used when unset
//!     PREDICT_GCLOUD_PATH: gcloud binary (default: gcloud)
//!     PREDICT_API_ENDPOINT: Override the regional API host
//!     PREDICT_TOKEN_TIMEOUT / PREDICT_REQUEST_TIMEOUT: Timeouts in seconds

use anyhow::{anyhow, Result};
use clap::Parser;
use std::io;
use text_predict::{
    ClientConfig, GcloudTokenProvider, PredictionClient, PredictionRequest, ReqwestTransport,
    StaticTokenProvider, TokenProvider, CLIENT_CONFIG, DEFAULT_LOCATION, DEFAULT_MODEL_NAME,
};
use tracing::{debug, level_filters::LevelFilter, Level};
use tracing_subscriber::EnvFilter;

/// Text prediction against a hosted language model
#[derive(Parser, Debug)]
#[command(name = "predict")]
#[command(about = "Send a prompt to a hosted text-generation model and print the response")]
#[command(after_help = r#"Examples:
    # Ask the default base model, authenticating with gcloud
    predict --project my-project "What is the meaning of 42?"

    # Use a tuned model endpoint
    predict --project my-project --tuned-model 1234567890 "Summarize this ticket"

    # Supply a token directly
    predict --project my-project --access-token "$(gcloud auth print-access-token)" "Hello"
"#)]
struct Cli {
    // Target options
    /// Cloud project ID
    #[arg(long, env = "PREDICT_PROJECT_ID")]
    project: String,

    /// Region hosting the model
    #[arg(long, env = "PREDICT_LOCATION", default_value = DEFAULT_LOCATION)]
    location: String,

    /// Base model name
    #[arg(long, env = "PREDICT_MODEL", default_value = DEFAULT_MODEL_NAME)]
    model: String,

    /// Tuned model's deployed endpoint: an endpoint id or
    /// projects/../locations/../endpoints/.. (model resource names
    /// projects/../models/.. are not accepted; use the endpoint id)
    #[arg(long, env = "PREDICT_TUNED_MODEL", default_value = "")]
    tuned_model: String,

    // Sampling options
    /// Sampling temperature
    #[arg(long, default_value_t = 0.2)]
    temperature: f64,

    /// Maximum number of output tokens
    #[arg(long, default_value_t = 256)]
    max_decode_steps: u32,

    /// Top-k sampling candidates
    #[arg(long, default_value_t = 40)]
    top_k: u32,

    /// Top-p (nucleus) sampling mass
    #[arg(long, default_value_t = 0.8)]
    top_p: f64,

    // Credential options
    /// Bearer token (skips gcloud)
    #[arg(long, env = "PREDICT_ACCESS_TOKEN", hide_env_values = true)]
    access_token: Option<String>,

    /// gcloud binary used to fetch a token
    #[arg(long, env = "PREDICT_GCLOUD_PATH", default_value = "gcloud")]
    gcloud_path: String,

    /// API host override, e.g. http://localhost:8080
    #[arg(long, env = "PREDICT_API_ENDPOINT")]
    api_endpoint: Option<String>,

    // Other options
    /// Verbose logging
    #[arg(short = 'v', long, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log errors
    #[arg(short = 'q', long)]
    quiet: bool,

    /// Prompt text
    content: String,
}

impl Cli {
    fn to_request(&self) -> PredictionRequest {
        PredictionRequest::new(&self.project, &self.content)
            .with_location(&self.location)
            .with_model_name(&self.model)
            .with_tuned_model_name(&self.tuned_model)
            .with_temperature(self.temperature)
            .with_max_decode_steps(self.max_decode_steps)
            .with_top_k(self.top_k)
            .with_top_p(self.top_p)
    }

    fn to_config(&self) -> ClientConfig {
        let config = CLIENT_CONFIG.clone();
        match &self.api_endpoint {
            Some(endpoint) => config.with_api_endpoint(endpoint),
            None => config,
        }
    }

    fn log_level(&self) -> Level {
        if self.verbose {
            Level::DEBUG
        } else if self.quiet {
            Level::ERROR
        } else {
            Level::WARN
        }
    }
}

/// Log to stderr so stdout carries only the response
fn init_tracing(level: Level) {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(level).into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Fail before any network call when gcloud is not installed
fn check_gcloud(gcloud_path: &str) -> Result<()> {
    which::which(gcloud_path).map(|_| ()).map_err(|_| {
        anyhow!(
            "Authentication failed: '{}' is not installed or not in PATH. \
             Install the Google Cloud CLI and run `gcloud auth login`, or pass --access-token.",
            gcloud_path
        )
    })
}

async fn run_prediction<P: TokenProvider>(
    config: ClientConfig,
    tokens: P,
    request: &PredictionRequest,
) -> Result<()> {
    let transport = ReqwestTransport::new(config.request_timeout)?;
    let client = PredictionClient::new(config, tokens, transport);
    client.predict_to(request, &mut io::stdout()).await?;
    Ok(())
}

async fn run(args: Cli) -> Result<()> {
    let request = args.to_request();
    let config = args.to_config();
    debug!(
        "Project: {}, location: {}, model: {}",
        request.project_id, request.location, request.model_name
    );

    match &args.access_token {
        Some(token) => run_prediction(config, StaticTokenProvider::new(token), &request).await,
        None => {
            check_gcloud(&args.gcloud_path)?;
            let tokens = GcloudTokenProvider::with_path(&args.gcloud_path)
                .with_timeout(config.token_timeout);
            run_prediction(config, tokens, &request).await
        }
    }
}

#[tokio::main]
async fn main() {
    let args = Cli::parse();
    init_tracing(args.log_level());

    if let Err(e) = run(args).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
