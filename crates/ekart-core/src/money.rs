//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely, and the
//! `Currency` code carried by a cart.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In floating point:                                                     │
//! │    0.1 + 0.2 = 0.30000000000000004                                      │
//! │    1.005.toFixed(2) = "1.00"        (binary 1.00499999...)              │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    Prices, subtotals and totals are exact i64 cents.                    │
//! │    Only the tax multiplication produces fractions, and it is rounded    │
//! │    to the cent exactly once, half away from zero.                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use ekart_core::money::{Currency, Money};
//!
//! let price = Money::from_cents(9999); // $99.99
//! let line_total = price * 2;          // $199.98
//! assert_eq!(line_total.format(&Currency::usd()), "$199.98");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Mul, Sub};
use ts_rs::TS;

use crate::types::TaxRate;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit (cents for USD).
///
/// ## Design Decisions
/// - **i64 (signed)**: differences such as "amount left until free shipping"
///   can go negative before being clamped
/// - **Single field tuple struct**: zero-cost abstraction over i64, serializes
///   as a plain JSON number
///
/// ## Where Money Flows
/// ```text
/// Product.price_cents ──► CartLineItem snapshot ──► line total (× quantity)
///                                                        │
///                                    Σ lines ──► Cart.subtotal ──► Cart.tax
///                                                        │
///                                  subtotal + tax + shipping ──► Cart.total
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ```rust
    /// use ekart_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // $10.99
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (dollars) portion.
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit (cents) portion, always 0-99.
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Zero.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Calculates tax at `rate`, rounded to the cent half away from zero.
    ///
    /// ## Implementation
    /// `amount_cents * bps` is exact in i128; adding (or subtracting, for
    /// negative amounts) half of the 10 000 divisor before the truncating
    /// division rounds the 0.5 case away from zero. Returns `None` when the
    /// rounded tax does not fit in `i64` cents.
    ///
    /// ```rust
    /// use ekart_core::money::Money;
    /// use ekart_core::types::TaxRate;
    ///
    /// let rate = TaxRate::from_bps(800); // 8%
    ///
    /// // $99.99 × 8% = $7.9992 → $8.00
    /// assert_eq!(Money::from_cents(9999).calculate_tax(rate).unwrap().cents(), 800);
    ///
    /// // $0.50 × 8% = $0.04 exactly
    /// assert_eq!(Money::from_cents(50).calculate_tax(rate).unwrap().cents(), 4);
    /// ```
    pub fn calculate_tax(&self, rate: TaxRate) -> Option<Money> {
        let scaled = self.0 as i128 * rate.bps() as i128;
        let rounded = if scaled >= 0 {
            (scaled + 5000) / 10000
        } else {
            (scaled - 5000) / 10000
        };
        i64::try_from(rounded).ok().map(Money)
    }

    /// Multiplies a unit price by a quantity, returning `None` on overflow.
    ///
    /// ```rust
    /// use ekart_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(299);
    /// assert_eq!(unit_price.checked_mul_quantity(3), Some(Money::from_cents(897)));
    /// assert_eq!(Money::from_cents(i64::MAX).checked_mul_quantity(2), None);
    /// ```
    #[inline]
    pub fn checked_mul_quantity(&self, qty: i64) -> Option<Self> {
        self.0.checked_mul(qty).map(Money)
    }

    /// Formats the amount for display in `currency`, with thousands separators.
    ///
    /// ```rust
    /// use ekart_core::money::{Currency, Money};
    ///
    /// assert_eq!(Money::from_cents(9999).format(&Currency::usd()), "$99.99");
    /// assert_eq!(Money::from_cents(100000).format(&Currency::usd()), "$1,000.00");
    /// assert_eq!(Money::from_cents(9999).format(&Currency::new("EUR")), "€99.99");
    /// assert_eq!(Money::from_cents(9999).format(&Currency::new("JPY")), "JPY 99.99");
    /// ```
    pub fn format(&self, currency: &Currency) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        let digits = self.dollars().abs().to_string();

        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }

        match currency.symbol() {
            Some(symbol) => format!("{}{}{}.{:02}", sign, symbol, grouped, self.cents_part()),
            None => format!(
                "{}{} {}.{:02}",
                sign,
                currency.code(),
                grouped,
                self.cents_part()
            ),
        }
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Debug-friendly display (`$10.99`). Use [`Money::format`] for UI text.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}${}.{:02}",
            sign,
            self.dollars().abs(),
            self.cents_part()
        )
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

/// Multiplication by i64 (for quantity calculations).
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

// =============================================================================
// Currency
// =============================================================================

/// ISO-4217 currency code attached to a cart.
///
/// The engine never converts between currencies; the code only selects the
/// display symbol.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Currency(String);

impl Currency {
    /// Creates a currency from a code. The code is upper-cased.
    pub fn new(code: impl AsRef<str>) -> Self {
        Currency(code.as_ref().trim().to_ascii_uppercase())
    }

    /// US dollars, the storefront default.
    pub fn usd() -> Self {
        Currency("USD".to_string())
    }

    pub fn code(&self) -> &str {
        &self.0
    }

    /// Display symbol for the currencies the storefront knows about.
    pub fn symbol(&self) -> Option<&'static str> {
        match self.0.as_str() {
            "USD" => Some("$"),
            "EUR" => Some("€"),
            "GBP" => Some("£"),
            "CAD" => Some("CA$"),
            _ => None,
        }
    }
}

impl Default for Currency {
    fn default() -> Self {
        Currency::usd()
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
