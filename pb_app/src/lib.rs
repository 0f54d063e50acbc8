use figment::{Figment, providers::Env};
use thiserror::Error;

pub trait ContextProvider<Config>: Sized {
    fn new(
        config: Config,
    ) -> impl Future<Output = Result<Self, AppContextError>>;
}

#[derive(Debug, Error)]
pub enum AppContextError {
    #[error("failed to load configuration: {0}")]
    Config(#[from] Box<figment::Error>),
    #[error("failed to initialize application context: {0}")]
    Context(String),
}

impl From<figment::Error> for AppContextError {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}

/// Installs the JSON log subscriber shared by every Postboard service.
///
/// Safe to call more than once; only the first call installs the
/// subscriber.
pub fn init_tracing() {
    // https://docs.aws.amazon.com/lambda/latest/dg/rust-logging.html
    let _ = tracing_subscriber::fmt()
        .json()
        // allow log level to be overridden by RUST_LOG env var
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        // this needs to be set to remove duplicated information in the log.
        .with_current_span(false)
        // ANSI color codes show up in a confusing manner in CloudWatch logs.
        .with_ansi(false)
        // the log collector adds the ingestion time.
        .without_time()
        // remove the name of the function from every log entry
        .with_target(false)
        .try_init();
}

/// Extracts the service configuration from raw environment variables.
///
/// `SUPABASE_URL` maps to a `supabase_url` field, and so on.
///
/// # Errors
/// If a required variable is missing or a value cannot be parsed into the
/// configuration type.
pub fn load_config<Config>() -> Result<Config, AppContextError>
where
    Config: for<'de> serde::Deserialize<'de>,
{
    let figment = Figment::new().merge(Env::raw());

    Ok(figment.extract()?)
}

/// Initialize the application context with configuration from environment
/// variables.
///
/// # Returns
/// The application context built by the `ContextProvider` implementation.
///
/// # Errors
/// If the configuration cannot be extracted from the environment variables
/// or if the context itself cannot be built from it.
pub async fn create_app_context<A, Config>() -> Result<A, AppContextError>
where
    A: ContextProvider<Config>,
    Config: for<'de> serde::Deserialize<'de>,
{
    init_tracing();

    let config: Config = load_config()?;

    let context = A::new(config).await?;

    tracing::info!("application context initialized");

    Ok(context)
}
