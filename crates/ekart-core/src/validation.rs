//! # Validation Module
//!
//! Input validation utilities for the storefront.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: UI (TypeScript)                                              │
//! │  └── Immediate feedback while typing                                   │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Cart engine / checkout command (Rust)                        │
//! │  ├── THIS MODULE: product + quantity preconditions                     │
//! │  └── THIS MODULE: checkout form rules                                  │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Restore from local storage                                   │
//! │  └── Cart::reconcile re-checks every persisted line item               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use ekart_core::validation::{is_valid_email, validate_quantity};
//!
//! assert!(validate_quantity(2).is_ok());
//! assert!(validate_quantity(0).is_err());
//! assert!(is_valid_email("ada@example.com"));
//! ```

use crate::checkout::CheckoutForm;
use crate::error::{CheckoutErrors, ValidationError};
use crate::types::Product;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest search query accepted by the catalog.
pub const MAX_SEARCH_QUERY_LEN: usize = 100;

// =============================================================================
// Cart Preconditions
// =============================================================================

/// Validates a product identifier used as a cart key.
pub fn validate_product_id(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::required("product id"));
    }
    Ok(())
}

/// Validates a quantity passed to an add operation.
///
/// ## Rules
/// - Must be positive (> 0)
///
/// Update operations do not call this: for them a quantity ≤ 0 means
/// "remove the line item".
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }
    Ok(())
}

/// Validates a price in cents.
///
/// ```rust
/// use ekart_core::validation::validate_price_cents;
///
/// assert!(validate_price_cents(1099).is_ok());
/// assert!(validate_price_cents(0).is_ok());     // free item
/// assert!(validate_price_cents(-100).is_err());
/// ```
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }
    Ok(())
}

/// Validates that a product can be snapshotted into a cart line item.
pub fn validate_product(product: &Product) -> ValidationResult<()> {
    validate_product_id(&product.id)?;
    validate_price_cents(product.price_cents)?;
    Ok(())
}

/// Validates a catalog search query and returns it trimmed.
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.chars().count() > MAX_SEARCH_QUERY_LEN {
        return Err(ValidationError::TooLong {
            field: "query".to_string(),
            max: MAX_SEARCH_QUERY_LEN,
        });
    }

    Ok(query.to_string())
}

// =============================================================================
// Contact Field Rules
// =============================================================================

/// `local@domain.tld`: no whitespace, exactly one `@`, and a dot inside the
/// domain with text on both sides.
///
/// ```rust
/// use ekart_core::validation::is_valid_email;
///
/// assert!(is_valid_email("test@example.com"));
/// assert!(!is_valid_email("invalid-email"));
/// assert!(!is_valid_email("test@"));
/// ```
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    if local.is_empty() || domain.contains('@') {
        return false;
    }

    let chars: Vec<char> = domain.chars().collect();
    chars
        .iter()
        .enumerate()
        .any(|(i, c)| *c == '.' && i > 0 && i + 1 < chars.len())
}

/// Optional leading `+`, a non-zero digit, then up to 15 more digits.
/// Spaces, hyphens and parentheses are ignored.
///
/// ```rust
/// use ekart_core::validation::is_valid_phone_number;
///
/// assert!(is_valid_phone_number("+1 (555) 123-4567"));
/// assert!(!is_valid_phone_number("0123"));
/// ```
pub fn is_valid_phone_number(phone: &str) -> bool {
    let cleaned: String = phone
        .chars()
        .filter(|c| !c.is_whitespace() && !matches!(*c, '-' | '(' | ')'))
        .collect();

    let digits = cleaned.strip_prefix('+').unwrap_or(&cleaned);
    let mut chars = digits.chars();

    match chars.next() {
        Some(first) if ('1'..='9').contains(&first) => {}
        _ => return false,
    }

    let rest: Vec<char> = chars.collect();
    rest.len() <= 15 && rest.iter().all(char::is_ascii_digit)
}

/// Postal code check for the countries the storefront ships to.
///
/// - `US`: `12345` or `12345-6789`
/// - `CA`: `K1A 0B1` (upper case)
/// - `UK` / `GB`: `SW1A 1AA`, case-insensitive
///
/// Codes for any other country are accepted as-is.
pub fn is_valid_postal_code(postal_code: &str, country: &str) -> bool {
    match country.trim().to_ascii_uppercase().as_str() {
        "US" => is_us_zip(postal_code),
        "CA" => is_ca_postal_code(postal_code),
        "UK" | "GB" => is_uk_postcode(postal_code),
        _ => true,
    }
}

fn is_us_zip(code: &str) -> bool {
    let all_digits = |s: &str, n: usize| s.len() == n && s.bytes().all(|b| b.is_ascii_digit());

    match code.split_once('-') {
        Some((zip, plus4)) => all_digits(zip, 5) && all_digits(plus4, 4),
        None => all_digits(code, 5),
    }
}

fn is_ca_postal_code(code: &str) -> bool {
    let bytes = code.as_bytes();
    if bytes.len() != 7 || bytes[3] != b' ' {
        return false;
    }

    let upper = |b: u8| b.is_ascii_uppercase();
    let digit = |b: u8| b.is_ascii_digit();

    upper(bytes[0])
        && digit(bytes[1])
        && upper(bytes[2])
        && digit(bytes[4])
        && upper(bytes[5])
        && digit(bytes[6])
}

fn is_uk_postcode(code: &str) -> bool {
    let code = code.to_ascii_uppercase();
    let Some((outward, inward)) = code.split_once(' ') else {
        return false;
    };

    let inward = inward.as_bytes();
    if inward.len() != 3
        || !inward[0].is_ascii_digit()
        || !inward[1].is_ascii_uppercase()
        || !inward[2].is_ascii_uppercase()
    {
        return false;
    }

    // One or two letters, a digit, then an optional letter or digit.
    let outward = outward.as_bytes();
    let letters = outward.iter().take_while(|b| b.is_ascii_uppercase()).count();
    if !(1..=2).contains(&letters) {
        return false;
    }

    match &outward[letters..] {
        [d] => d.is_ascii_digit(),
        [d, extra] => d.is_ascii_digit() && extra.is_ascii_alphanumeric(),
        _ => false,
    }
}

// =============================================================================
// Checkout Form
// =============================================================================

/// Validates a checkout form, collecting every field error.
///
/// Field keys match the checkout page inputs (`email`, `shippingFirstName`,
/// `postalCode`, `cardNumber`, ...). Card fields are only required when a
/// card payment method is selected.
pub fn validate_checkout(form: &CheckoutForm) -> Result<(), CheckoutErrors> {
    let mut errors = CheckoutErrors::new();
    let blank = |s: &str| s.trim().is_empty();

    if blank(&form.email) {
        errors.insert("email", "Email is required");
    } else if !is_valid_email(form.email.trim()) {
        errors.insert("email", "Please enter a valid email address");
    }

    if blank(&form.first_name) {
        errors.insert("firstName", "First name is required");
    }
    if blank(&form.last_name) {
        errors.insert("lastName", "Last name is required");
    }

    if let Some(phone) = form.phone.as_deref().filter(|p| !blank(p.trim())) {
        if !is_valid_phone_number(phone) {
            errors.insert("phone", "Please enter a valid phone number");
        }
    }

    let address = &form.address;
    if blank(&address.first_name) {
        errors.insert("shippingFirstName", "First name is required");
    }
    if blank(&address.last_name) {
        errors.insert("shippingLastName", "Last name is required");
    }
    if blank(&address.address_line1) {
        errors.insert("addressLine1", "Address is required");
    }
    if blank(&address.city) {
        errors.insert("city", "City is required");
    }
    if blank(&address.state) {
        errors.insert("state", "State is required");
    }
    if blank(&address.postal_code) {
        errors.insert("postalCode", "Postal code is required");
    } else if !is_valid_postal_code(address.postal_code.trim(), &address.country) {
        errors.insert("postalCode", "Please enter a valid postal code");
    }

    if form.payment_method.is_card() {
        let card = form.card.clone().unwrap_or_default();
        if blank(&card.card_number) {
            errors.insert("cardNumber", "Card number is required");
        }
        if blank(&card.expiry_date) {
            errors.insert("expiryDate", "Expiry date is required");
        }
        if blank(&card.cvv) {
            errors.insert("cvv", "CVV is required");
        }
        if blank(&card.cardholder_name) {
            errors.insert("cardholderName", "Cardholder name is required");
        }
    }

    errors.into_result()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checkout::{CardDetails, PaymentMethodKind, ShippingAddress};

    fn valid_form() -> CheckoutForm {
        CheckoutForm {
            email: "ada@example.com".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            phone: None,
            address: ShippingAddress {
                first_name: "Ada".to_string(),
                last_name: "Lovelace".to_string(),
                company: None,
                address_line1: "12 Analytical Way".to_string(),
                address_line2: None,
                city: "Springfield".to_string(),
                state: "IL".to_string(),
                postal_code: "62704".to_string(),
                country: "US".to_string(),
            },
            payment_method: PaymentMethodKind::Paypal,
            card: None,
        }
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(1_000).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
    }

    #[test]
    fn test_validate_product() {
        assert!(validate_product(&Product::new("p-1", "Mug", 1200)).is_ok());
        assert!(validate_product(&Product::new("p-free", "Sticker", 0)).is_ok());
        assert!(validate_product(&Product::new("  ", "Blank", 100)).is_err());
        assert!(validate_product(&Product::new("p-2", "Broken", -1)).is_err());
    }

    #[test]
    fn test_validate_search_query() {
        assert_eq!(validate_search_query("  shoes ").unwrap(), "shoes");
        assert!(validate_search_query(&"a".repeat(101)).is_err());
    }

    #[test]
    fn test_is_valid_email() {
        assert!(is_valid_email("test@example.com"));
        assert!(is_valid_email("user.name+tag@shop.co.uk"));
        assert!(!is_valid_email("invalid-email"));
        assert!(!is_valid_email("test@"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("test@example."));
        assert!(!is_valid_email("te st@example.com"));
        assert!(!is_valid_email("a@b@c.com"));
    }

    #[test]
    fn test_is_valid_phone_number() {
        assert!(is_valid_phone_number("1234567890"));
        assert!(is_valid_phone_number("+1-555-123-4567"));
        assert!(!is_valid_phone_number("abc"));
        assert!(!is_valid_phone_number("0555"));
        assert!(!is_valid_phone_number("12345678901234567"));
    }

    #[test]
    fn test_is_valid_postal_code() {
        assert!(is_valid_postal_code("12345", "US"));
        assert!(is_valid_postal_code("12345-6789", "US"));
        assert!(!is_valid_postal_code("1234", "US"));
        assert!(!is_valid_postal_code("12345-67", "US"));

        assert!(is_valid_postal_code("K1A 0B1", "CA"));
        assert!(!is_valid_postal_code("k1a 0b1", "CA"));

        assert!(is_valid_postal_code("SW1A 1AA", "UK"));
        assert!(is_valid_postal_code("m1 1ae", "GB"));
        assert!(!is_valid_postal_code("SW1A1AA", "UK"));

        assert!(is_valid_postal_code("anything", "FR"));
    }

    #[test]
    fn test_validate_checkout_accepts_valid_form() {
        assert!(validate_checkout(&valid_form()).is_ok());
    }

    #[test]
    fn test_validate_checkout_reports_every_missing_field() {
        let mut form = valid_form();
        form.email = String::new();
        form.address.city = "  ".to_string();
        form.address.postal_code = "ABCDE".to_string();

        let errors = validate_checkout(&form).unwrap_err();
        assert_eq!(errors.get("email"), Some("Email is required"));
        assert_eq!(errors.get("city"), Some("City is required"));
        assert_eq!(errors.get("postalCode"), Some("Please enter a valid postal code"));
        assert_eq!(errors.fields.len(), 3);
    }

    #[test]
    fn test_validate_checkout_requires_card_fields_for_cards() {
        let mut form = valid_form();
        form.payment_method = PaymentMethodKind::CreditCard;

        let errors = validate_checkout(&form).unwrap_err();
        assert!(errors.get("cardNumber").is_some());
        assert!(errors.get("cvv").is_some());

        form.card = Some(CardDetails {
            card_number: "4242 4242 4242 4242".to_string(),
            expiry_date: "12/30".to_string(),
            cvv: "123".to_string(),
            cardholder_name: "Ada Lovelace".to_string(),
        });
        assert!(validate_checkout(&form).is_ok());
    }
}
