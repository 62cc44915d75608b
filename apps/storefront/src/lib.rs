//! # eKart Storefront Library
//!
//! Host for the eKart cart engine: wires configuration, local storage and the
//! catalog together and exposes the commands the UI (and the `ekart` CLI)
//! call.
//!
//! ## Module Organization
//! ```text
//! ekart_storefront/
//! ├── lib.rs          ◄─── You are here (startup & CLI dispatch)
//! ├── cli.rs          ◄─── clap argument definitions
//! ├── output.rs       ◄─── JSON / text rendering
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── cart.rs     ◄─── CartEngine (shared cart + persistence + listeners)
//! │   ├── catalog.rs  ◄─── Read-only product catalog
//! │   └── config.rs   ◄─── StorefrontConfig (TOML + EKART_* env)
//! ├── commands/
//! │   ├── mod.rs      ◄─── Command exports
//! │   ├── product.rs  ◄─── Catalog browsing
//! │   ├── cart.rs     ◄─── Cart manipulation
//! │   └── checkout.rs ◄─── Order placement
//! └── error.rs        ◄─── API error type for commands
//! ```
//!
//! ## State Management
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Storefront                                           │
//! │                                                                         │
//! │  ┌──────────────────┐ ┌──────────────────┐ ┌──────────────────────┐   │
//! │  │   CartEngine     │ │   CatalogState   │ │  StorefrontConfig    │   │
//! │  │                  │ │                  │ │                      │   │
//! │  │  • Current cart  │ │  • Products      │ │  • Pricing policy    │   │
//! │  │  • Storage       │ │  • Categories    │ │  • Storage backend   │   │
//! │  │  • Listeners     │ │                  │ │  • Catalog path      │   │
//! │  └──────────────────┘ └──────────────────┘ └──────────────────────┘   │
//! │                                                                         │
//! │  Each command takes only the state it needs.                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod cli;
pub mod commands;
pub mod error;
pub mod output;
pub mod state;

use std::sync::Arc;

use ekart_store::{CartStorage, FileStorage, MemoryStorage};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use cli::{CartAction, Cli, Commands, ConfigAction};
use error::{ApiError, ApiResult, ErrorCode};
use output::Output;
use state::{CartEngine, CatalogState, StorageBackend, StorefrontConfig};

/// Everything a running storefront holds.
#[derive(Debug, Clone)]
pub struct Storefront {
    pub config: StorefrontConfig,
    pub engine: CartEngine,
    pub catalog: CatalogState,
}

impl Storefront {
    /// Opens storage, restores the cart and loads the catalog.
    ///
    /// ## Startup Sequence
    /// ```text
    /// ┌─────────────────────────────────────────────────────────────────────────┐
    /// │  1. Open Storage ─────────────────────────────────────────────────────► │
    /// │     • file: <data_dir>/ekart-cart-storage.json                          │
    /// │     • memory: nothing survives the process                              │
    /// │                                                                         │
    /// │  2. Restore Cart ─────────────────────────────────────────────────────► │
    /// │     • CartEngine::init (corrupt / old-version data is discarded)        │
    /// │                                                                         │
    /// │  3. Load Catalog ─────────────────────────────────────────────────────► │
    /// │     • catalog.path JSON, or the built-in sample catalog                 │
    /// └─────────────────────────────────────────────────────────────────────────┘
    /// ```
    pub fn open(config: StorefrontConfig) -> ApiResult<Self> {
        let storage = open_storage(&config)?;
        let engine = CartEngine::init(storage, config.pricing_policy());
        let catalog = load_catalog(&config)?;

        info!(
            store = %config.store.name,
            products = catalog.products().len(),
            cart_items = engine.with_cart(|c| c.total_items()),
            "Storefront ready"
        );

        Ok(Storefront {
            config,
            engine,
            catalog,
        })
    }
}

/// Opens the configured storage backend.
pub fn open_storage(config: &StorefrontConfig) -> ApiResult<Arc<dyn CartStorage>> {
    match config.storage.backend {
        StorageBackend::Memory => {
            debug!("Using in-memory cart storage");
            Ok(Arc::new(MemoryStorage::new()))
        }
        StorageBackend::File => {
            let dir = config.data_dir().ok_or_else(|| {
                ApiError::new(
                    ErrorCode::ConfigError,
                    "Could not determine a data directory; set storage.data_dir or EKART_DATA_DIR",
                )
            })?;
            let storage = FileStorage::open(&dir)?;
            debug!(dir = %dir.display(), "Using file cart storage");
            Ok(Arc::new(storage))
        }
    }
}

/// The configured catalog file, or the sample catalog.
pub fn load_catalog(config: &StorefrontConfig) -> ApiResult<CatalogState> {
    match &config.catalog.path {
        Some(path) => CatalogState::from_file(path),
        None => Ok(CatalogState::sample()),
    }
}

/// Initializes the tracing subscriber for structured logging.
///
/// Logs go to stderr so `--json` output on stdout stays parseable.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=ekart=trace` - Show trace for ekart crates only
/// - Default: WARN (`--verbose`: `info,ekart=debug`)
pub fn init_tracing(verbose: bool) {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();

    tracing_subscriber::fmt()
        .with_env_filter(log_filter(verbose, rust_log.as_deref()))
        .with_writer(std::io::stderr)
        .init();
}

/// `RUST_LOG` when it parses, otherwise the `--verbose` dependent default.
fn log_filter(verbose: bool, rust_log: Option<&str>) -> EnvFilter {
    let default = if verbose { "info,ekart=debug" } else { "warn" };
    rust_log
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(default))
}

/// Runs one CLI invocation.
pub fn run(cli: Cli) -> ApiResult<()> {
    let out = Output::new(cli.json);
    let config = StorefrontConfig::load(cli.config.clone())?;

    if let Commands::Config { action } = &cli.command {
        return match action {
            ConfigAction::Show => {
                let text = toml::to_string_pretty(&config).map_err(|e| {
                    ApiError::new(ErrorCode::ConfigError, e.to_string())
                })?;
                out.emit(&config, |_| text)
            }
            ConfigAction::Init => {
                config.save(cli.config.clone())?;
                out.emit(&config, |_| "Configuration written\n".to_string())
            }
        };
    }

    let app = Storefront::open(config)?;
    let engine = &app.engine;
    let catalog = &app.catalog;

    match cli.command {
        Commands::Products(args) => {
            let list = commands::product::list_products(catalog, engine, &args.filters(), args.sort)?;
            out.emit(&list, output::products_text)?;
        }
        Commands::Product { id } => {
            let product = commands::product::get_product(catalog, engine, &id)?;
            out.emit(&product, output::product_text)?;
        }
        Commands::Cart { action } => {
            let cart = match action.unwrap_or(CartAction::Show) {
                CartAction::Show => commands::cart::get_cart(engine),
                CartAction::Add {
                    product_id,
                    quantity,
                } => commands::cart::add_to_cart(engine, catalog, &product_id, Some(quantity))?,
                CartAction::Update {
                    product_id,
                    quantity,
                } => commands::cart::update_cart_item(engine, &product_id, quantity)?,
                CartAction::Remove { product_id } => {
                    commands::cart::remove_from_cart(engine, &product_id)
                }
                CartAction::Clear => commands::cart::clear_cart(engine),
            };
            out.emit(&cart, output::cart_text)?;
        }
        Commands::Checkout(args) => {
            let form = args.to_form()?;
            let confirmation = commands::checkout::place_order(engine, &form)?;
            out.emit(&confirmation, output::order_text)?;
        }
        Commands::Config { .. } => {}
    }

    // Mutations persist best-effort; surface a failed write before exiting.
    engine.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::Level;
    use tracing_subscriber::filter::LevelFilter;
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::Registry;

    fn debug_enabled(filter: EnvFilter) -> bool {
        let subscriber = Registry::default().with(filter);
        tracing::subscriber::with_default(subscriber, || {
            tracing::enabled!(target: "ekart_storefront::state::cart", Level::DEBUG)
        })
    }

    #[test]
    fn test_default_filter_is_warn() {
        let filter = log_filter(false, None);
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::WARN));
        assert!(!debug_enabled(log_filter(false, None)));
    }

    #[test]
    fn test_verbose_enables_debug_for_ekart() {
        let filter = log_filter(true, None);
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::DEBUG));
        assert!(debug_enabled(log_filter(true, None)));
    }

    #[test]
    fn test_rust_log_wins_over_verbose() {
        assert!(!debug_enabled(log_filter(true, Some("error"))));
        assert!(debug_enabled(log_filter(false, Some("ekart_storefront=debug"))));
        // Unparseable directives fall back to the default.
        assert_eq!(
            log_filter(false, Some("ekart=loud")).max_level_hint(),
            Some(LevelFilter::WARN)
        );
    }
}
