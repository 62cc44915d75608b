//! Command-line arguments for the `ekart` binary.
//!
//! ```text
//! ekart [--json] [--config FILE] [-v]
//!   products [--category ID]... [--min-price C] [--max-price C] [--min-rating R]
//!            [--in-stock] [--brand B]... [--tag T]... [--search Q] [--sort S]
//!   product <ID>
//!   cart [show | add <ID> [-q N] | update <ID> <N> | remove <ID> | clear]
//!   checkout (--form FILE | --email ... --first-name ... )
//!   config (show | init)
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use ekart_core::{
    CardDetails, CheckoutForm, PaymentMethodKind, PriceRange, ProductFilters, ShippingAddress,
    SortOption,
};

use crate::error::{ApiError, ApiResult};

/// eKart storefront: browse the catalog, manage the cart, place orders
#[derive(Debug, Parser)]
#[command(name = "ekart")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Print responses as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List catalog products
    Products(ProductsArgs),

    /// Show one product
    Product {
        /// Product id
        id: String,
    },

    /// Show or change the cart
    Cart {
        #[command(subcommand)]
        action: Option<CartAction>,
    },

    /// Place an order for the cart contents
    Checkout(CheckoutArgs),

    /// Show or write the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, Subcommand)]
pub enum CartAction {
    /// Print the cart (default)
    Show,

    /// Add a product
    Add {
        product_id: String,

        #[arg(short, long, default_value_t = 1)]
        quantity: i64,
    },

    /// Set a line's quantity (0 removes it)
    Update {
        product_id: String,

        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },

    /// Remove a product
    Remove { product_id: String },

    /// Empty the cart
    Clear,
}

#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration as TOML
    Show,

    /// Write the effective configuration to the config file
    Init,
}

#[derive(Debug, Default, Args)]
pub struct ProductsArgs {
    /// Category id (repeatable)
    #[arg(long = "category")]
    pub categories: Vec<String>,

    /// Minimum price in cents
    #[arg(long)]
    pub min_price: Option<i64>,

    /// Maximum price in cents
    #[arg(long)]
    pub max_price: Option<i64>,

    #[arg(long)]
    pub min_rating: Option<f64>,

    /// Hide out-of-stock products
    #[arg(long)]
    pub in_stock: bool,

    /// Brand (repeatable)
    #[arg(long = "brand")]
    pub brands: Vec<String>,

    /// Tag (repeatable)
    #[arg(long = "tag")]
    pub tags: Vec<String>,

    #[arg(long)]
    pub search: Option<String>,

    /// relevance, price-low-to-high, price-high-to-low, rating, newest, popularity
    #[arg(long, default_value = "relevance")]
    pub sort: SortOption,
}

impl ProductsArgs {
    pub fn filters(&self) -> ProductFilters {
        let price_range = match (self.min_price, self.max_price) {
            (None, None) => None,
            (min, max) => Some(PriceRange {
                min_cents: min.unwrap_or(0),
                max_cents: max.unwrap_or(i64::MAX),
            }),
        };

        ProductFilters {
            categories: self.categories.clone(),
            price_range,
            min_rating: self.min_rating,
            in_stock_only: self.in_stock,
            brands: self.brands.clone(),
            tags: self.tags.clone(),
            search: self.search.clone(),
        }
    }
}

#[derive(Debug, Default, Args)]
pub struct CheckoutArgs {
    /// JSON checkout form; the individual flags are ignored when given
    #[arg(long)]
    pub form: Option<PathBuf>,

    #[arg(long, default_value = "")]
    pub email: String,
    #[arg(long, default_value = "")]
    pub first_name: String,
    #[arg(long, default_value = "")]
    pub last_name: String,
    #[arg(long)]
    pub phone: Option<String>,
    #[arg(long, default_value = "")]
    pub address: String,
    #[arg(long, default_value = "")]
    pub city: String,
    #[arg(long, default_value = "")]
    pub state: String,
    #[arg(long, default_value = "")]
    pub postal_code: String,
    #[arg(long, default_value = "US")]
    pub country: String,

    /// credit_card, debit_card, paypal, apple_pay, google_pay
    #[arg(long, default_value = "credit_card", value_parser = parse_payment_method)]
    pub payment: PaymentMethodKind,

    #[arg(long)]
    pub card_number: Option<String>,
    /// MM/YY
    #[arg(long)]
    pub expiry: Option<String>,
    #[arg(long)]
    pub cvv: Option<String>,
    #[arg(long)]
    pub cardholder: Option<String>,
}

impl CheckoutArgs {
    /// Builds the form from `--form` or from the individual flags.
    pub fn to_form(&self) -> ApiResult<CheckoutForm> {
        if let Some(path) = &self.form {
            let contents = std::fs::read_to_string(path).map_err(|e| {
                ApiError::validation(format!("Cannot read form {}: {}", path.display(), e))
            })?;
            return serde_json::from_str(&contents).map_err(|e| {
                ApiError::validation(format!("Form {} is invalid: {}", path.display(), e))
            });
        }

        let card = self.payment.is_card().then(|| CardDetails {
            card_number: self.card_number.clone().unwrap_or_default(),
            expiry_date: self.expiry.clone().unwrap_or_default(),
            cvv: self.cvv.clone().unwrap_or_default(),
            cardholder_name: self
                .cardholder
                .clone()
                .unwrap_or_else(|| format!("{} {}", self.first_name, self.last_name)),
        });

        Ok(CheckoutForm {
            email: self.email.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            phone: self.phone.clone(),
            address: ShippingAddress {
                first_name: self.first_name.clone(),
                last_name: self.last_name.clone(),
                company: None,
                address_line1: self.address.clone(),
                address_line2: None,
                city: self.city.clone(),
                state: self.state.clone(),
                postal_code: self.postal_code.clone(),
                country: self.country.clone(),
            },
            payment_method: self.payment,
            card,
        })
    }
}

fn parse_payment_method(s: &str) -> Result<PaymentMethodKind, String> {
    match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
        "credit_card" | "credit" => Ok(PaymentMethodKind::CreditCard),
        "debit_card" | "debit" => Ok(PaymentMethodKind::DebitCard),
        "paypal" => Ok(PaymentMethodKind::Paypal),
        "apple_pay" => Ok(PaymentMethodKind::ApplePay),
        "google_pay" => Ok(PaymentMethodKind::GooglePay),
        other => Err(format!("unknown payment method: {}", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_cart_add() {
        let cli = Cli::try_parse_from(["ekart", "--json", "cart", "add", "3", "-q", "2"]).unwrap();
        assert!(cli.json);
        match cli.command {
            Commands::Cart {
                action: Some(CartAction::Add { product_id, quantity }),
            } => {
                assert_eq!(product_id, "3");
                assert_eq!(quantity, 2);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_products_filters() {
        let cli = Cli::try_parse_from([
            "ekart",
            "products",
            "--category",
            "1",
            "--max-price",
            "5000",
            "--in-stock",
            "--sort",
            "price-high-to-low",
        ])
        .unwrap();

        let Commands::Products(args) = cli.command else {
            panic!("expected products");
        };
        let filters = args.filters();
        assert_eq!(filters.categories, vec!["1"]);
        assert_eq!(filters.price_range.unwrap().max_cents, 5000);
        assert!(filters.in_stock_only);
        assert_eq!(args.sort, SortOption::PriceHighToLow);
    }

    #[test]
    fn test_checkout_flags_build_form() {
        let cli = Cli::try_parse_from([
            "ekart",
            "checkout",
            "--email",
            "ada@example.com",
            "--first-name",
            "Ada",
            "--last-name",
            "Lovelace",
            "--payment",
            "paypal",
        ])
        .unwrap();

        let Commands::Checkout(args) = cli.command else {
            panic!("expected checkout");
        };
        let form = args.to_form().unwrap();
        assert_eq!(form.address.first_name, "Ada");
        assert_eq!(form.payment_method, PaymentMethodKind::Paypal);
        assert!(form.card.is_none());
    }
}
