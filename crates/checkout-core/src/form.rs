//! # Order Form
//!
//! The checkout form and its local constraint validation. Validation never
//! touches the network and never changes UI state; it only reports which
//! fields failed.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Name of the payment-method radio group
pub const PAYMENT_METHOD_FIELD: &str = "payment_method";

/// Input type, for the constraints that depend on it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    #[default]
    Text,
    /// Non-negative decimal (e.g. delivery fee)
    Number,
}

/// A single form input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormField {
    pub name: String,

    #[serde(default)]
    pub value: String,

    #[serde(default)]
    pub required: bool,

    #[serde(default)]
    pub kind: FieldKind,
}

/// The checkout form as submitted by the customer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderForm {
    #[serde(default)]
    fields: Vec<FormField>,

    /// Payment methods offered by the page
    #[serde(default)]
    payment_options: Vec<String>,

    /// Currently checked payment method (radio group: at most one)
    #[serde(default)]
    payment_method: Option<String>,
}

impl OrderForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: add an optional text field
    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.push(name.into(), value.into(), false, FieldKind::Text);
        self
    }

    /// Builder: add a required text field
    pub fn required_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.push(name.into(), value.into(), true, FieldKind::Text);
        self
    }

    /// Builder: add a numeric field
    pub fn number_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.push(name.into(), value.into(), false, FieldKind::Number);
        self
    }

    /// Builder: add a field as read from the page
    pub fn with_field(mut self, field: FormField) -> Self {
        self.fields.push(field);
        self
    }

    /// Builder: offered payment methods
    pub fn payment_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.payment_options = options.into_iter().map(Into::into).collect();
        self
    }

    /// Builder: check a payment method
    pub fn select_payment_method(mut self, method: impl Into<String>) -> Self {
        self.set_payment_method(method);
        self
    }

    /// Check a payment method, unchecking any other
    pub fn set_payment_method(&mut self, method: impl Into<String>) {
        self.payment_method = Some(method.into());
    }

    /// Update a field's value. Returns false if the field does not exist.
    pub fn set_value(&mut self, name: &str, value: impl Into<String>) -> bool {
        match self.fields.iter_mut().find(|f| f.name == name) {
            Some(field) => {
                field.value = value.into();
                true
            }
            None => false,
        }
    }

    fn push(&mut self, name: String, value: String, required: bool, kind: FieldKind) {
        self.fields.push(FormField {
            name,
            value,
            required,
            kind,
        });
    }

    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }

    pub fn payment_method(&self) -> Option<&str> {
        self.payment_method.as_deref()
    }

    pub fn offered_payment_methods(&self) -> &[String] {
        &self.payment_options
    }

    /// Parse a form description from TOML
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

/// Why a field failed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    /// Required value is blank
    Missing,
    /// Value is not a non-negative number
    NotANumber,
    /// No payment method is checked
    NoPaymentMethod,
    /// Checked payment method is not one the page offers
    UnknownPaymentMethod(String),
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::Missing => f.write_str("Please fill out this field."),
            Violation::NotANumber => f.write_str("Please enter a number."),
            Violation::NoPaymentMethod => f.write_str("Please select a payment method."),
            Violation::UnknownPaymentMethod(m) => write!(f, "Unsupported payment method: {}", m),
        }
    }
}

/// Field-level validation failures
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub violations: Vec<(String, Violation)>,
}

impl ValidationReport {
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// First failing field, which is where the browser would put focus
    pub fn first(&self) -> Option<&(String, Violation)> {
        self.violations.first()
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .violations
            .iter()
            .map(|(field, v)| format!("{}: {}", field, v))
            .collect();
        f.write_str(&parts.join("; "))
    }
}

/// Local constraint validation for the order form
#[derive(Debug, Clone, Copy, Default)]
pub struct FormValidator;

impl FormValidator {
    pub fn new() -> Self {
        Self
    }

    /// True when the form may be submitted
    pub fn validate(&self, form: &OrderForm) -> bool {
        self.check(form).is_ok()
    }

    /// Validate and collect every violation
    pub fn check(&self, form: &OrderForm) -> Result<(), ValidationReport> {
        let mut report = ValidationReport::default();

        for field in form.fields() {
            let value = field.value.trim();
            if field.required && value.is_empty() {
                report.violations.push((field.name.clone(), Violation::Missing));
                continue;
            }
            if field.kind == FieldKind::Number
                && !value.is_empty()
                && !is_non_negative_number(value)
            {
                report
                    .violations
                    .push((field.name.clone(), Violation::NotANumber));
            }
        }

        match form.payment_method() {
            None => report
                .violations
                .push((PAYMENT_METHOD_FIELD.to_string(), Violation::NoPaymentMethod)),
            Some(method) if method.trim().is_empty() => report
                .violations
                .push((PAYMENT_METHOD_FIELD.to_string(), Violation::NoPaymentMethod)),
            Some(method) => {
                let offered = form.offered_payment_methods();
                if !offered.is_empty() && !offered.iter().any(|o| o == method) {
                    report.violations.push((
                        PAYMENT_METHOD_FIELD.to_string(),
                        Violation::UnknownPaymentMethod(method.to_string()),
                    ));
                }
            }
        }

        if report.is_empty() {
            Ok(())
        } else {
            Err(report)
        }
    }
}

fn is_non_negative_number(value: &str) -> bool {
    value
        .parse::<f64>()
        .map(|n| n.is_finite() && n >= 0.0)
        .unwrap_or(false)
}
