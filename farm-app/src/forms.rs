//! Form input validation.
//!
//! Each form holds the raw strings a user typed and turns them into a typed
//! request body, or into per-field messages. Validation runs before any
//! request is sent; a form with errors never reaches the backend.

use farm_client::dates::{parse_date, today_string};
use farm_client::*;
use std::collections::BTreeMap;
use std::fmt;
use std::result::Result;

/// Irrigation methods offered by the irrigation form
pub const IRRIGATION_METHODS: [(&str, &str); 5] = [
    ("sprinkler", "Sprinkler"),
    ("drip", "Drip Irrigation"),
    ("flood", "Flood Irrigation"),
    ("manual", "Manual Watering"),
    ("pivot", "Center Pivot"),
];

/// Expense categories offered by the expense form
pub const EXPENSE_CATEGORIES: [(&str, &str); 9] = [
    ("seeds", "Seeds"),
    ("fertilizer", "Fertilizer"),
    ("pesticide", "Pesticide"),
    ("equipment", "Equipment"),
    ("labor", "Labor"),
    ("irrigation", "Irrigation"),
    ("fuel", "Fuel"),
    ("maintenance", "Maintenance"),
    ("other", "Other"),
];

/// Per-field validation messages, keyed by wire field name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<&'static str, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message; the first message for a field is kept
    pub fn insert(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.0.iter().map(|(k, v)| (*k, v.as_str()))
    }

    fn finish<T>(self, value: impl FnOnce() -> T) -> Result<T, FieldErrors> {
        if self.is_empty() {
            Ok(value())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|(k, v)| format!("{}: {}", k, v)).collect();
        f.write_str(&parts.join("; "))
    }
}

/// Parse the leading numeric prefix of `input`, the way browsers' `parseFloat` does.
///
/// `"12.5kg"` gives 12.5, `"  -3"` gives -3, `"1e3x"` gives 1000, and input
/// without a leading number gives `None`.
pub fn parse_float(input: &str) -> Option<f64> {
    let s = input.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }
    if s[end..].starts_with("Infinity") {
        return s[..end + "Infinity".len()].parse().ok();
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        end = frac_end;
    }

    if digits == 0 {
        return None;
    }

    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+') | Some(b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    // A trailing '.' ("5.") is accepted by f64::from_str as well
    s[..end].parse().ok()
}

fn required(errors: &mut FieldErrors, field: &'static str, value: &str, message: &str) -> bool {
    if value.trim().is_empty() {
        errors.insert(field, message);
        false
    } else {
        true
    }
}

fn required_number(
    errors: &mut FieldErrors,
    field: &'static str,
    value: &str,
    label: &str,
) -> Option<f64> {
    if !required(errors, field, value, &format!("{} is required", label)) {
        return None;
    }
    let parsed = parse_float(value);
    if parsed.is_none() {
        errors.insert(field, format!("{} must be a valid number", label));
    }
    parsed
}

fn valid_date(errors: &mut FieldErrors, field: &'static str, value: &str) -> bool {
    if !required(errors, field, value, "Date is required") {
        return false;
    }
    if parse_date(value).is_none() {
        errors.insert(field, "Enter a valid date (YYYY-MM-DD)");
        return false;
    }
    true
}

fn optional(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

// ============================================================================
// Plot
// ============================================================================

/// Add/edit plot form
#[derive(Debug, Clone, PartialEq)]
pub struct PlotForm {
    pub name: String,
    pub acreage: String,
    pub location: String,
    pub caretaker_id: String,
    pub current_crop_id: String,
    pub status: String,
    pub planted_date: String,
    pub expected_harvest_date: String,
    pub notes: String,
}

impl Default for PlotForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            acreage: String::new(),
            location: String::new(),
            caretaker_id: String::new(),
            current_crop_id: String::new(),
            status: PlotStatus::Planting.to_string(),
            planted_date: String::new(),
            expected_harvest_date: String::new(),
            notes: String::new(),
        }
    }
}

impl PlotForm {
    /// Prefill from an existing plot
    pub fn from_plot(plot: &Plot) -> Self {
        let caretaker_id = plot
            .caretaker_id
            .or_else(|| plot.caretaker.as_ref().and_then(CaretakerRef::id));
        Self {
            name: plot.name.clone(),
            acreage: plot.acreage.to_string(),
            location: plot.location.clone().unwrap_or_default(),
            caretaker_id: caretaker_id.map(|id| id.to_string()).unwrap_or_default(),
            current_crop_id: plot
                .current_crop_id
                .map(|id| id.to_string())
                .unwrap_or_default(),
            status: plot.status.to_string(),
            planted_date: plot.planted_date.clone().unwrap_or_default(),
            expected_harvest_date: plot.expected_harvest_date.clone().unwrap_or_default(),
            notes: plot.notes.clone().unwrap_or_default(),
        }
    }

    pub fn validate(&self) -> Result<NewPlot, FieldErrors> {
        let mut errors = FieldErrors::new();

        required(&mut errors, "name", &self.name, "Plot name is required");

        let acreage = parse_float(&self.acreage).filter(|a| *a > 0.0);
        if acreage.is_none() {
            errors.insert("acreage", "Valid acreage is required");
        }

        let caretaker_id = self.caretaker_id.trim().parse::<Id>().ok();
        if caretaker_id.is_none() {
            errors.insert("caretaker_id", "Caretaker is required");
        }

        let current_crop_id = match self.current_crop_id.trim() {
            "" => None,
            raw => match raw.parse::<Id>() {
                Ok(id) => Some(id),
                Err(_) => {
                    errors.insert("current_crop_id", "Select a valid crop");
                    None
                }
            },
        };

        let planted = optional(&self.planted_date);
        let harvest = optional(&self.expected_harvest_date);
        let planted_on = planted.as_deref().map(parse_date);
        let harvest_on = harvest.as_deref().map(parse_date);

        if let Some(None) = planted_on {
            errors.insert("planted_date", "Enter a valid date (YYYY-MM-DD)");
        }
        if let Some(None) = harvest_on {
            errors.insert("expected_harvest_date", "Enter a valid date (YYYY-MM-DD)");
        }
        if let (Some(Some(p)), Some(Some(h))) = (planted_on, harvest_on) {
            if h < p {
                errors.insert(
                    "expected_harvest_date",
                    "Expected harvest date cannot be before the planted date",
                );
            }
        }

        let status = match self.status.trim() {
            "" => PlotStatus::default(),
            raw => PlotStatus::from(raw),
        };

        errors.finish(|| NewPlot {
            name: self.name.clone(),
            acreage: acreage.unwrap_or_default(),
            location: optional(&self.location),
            caretaker_id,
            current_crop_id,
            status,
            planted_date: planted,
            expected_harvest_date: harvest,
            notes: optional(&self.notes),
        })
    }
}

// ============================================================================
// Lifecycle event
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct LifecycleForm {
    pub event_type: String,
    pub title: String,
    pub description: String,
    pub date: String,
    pub notes: String,
    pub yield_amount: String,
    pub yield_unit: String,
}

impl Default for LifecycleForm {
    fn default() -> Self {
        Self {
            event_type: String::new(),
            title: String::new(),
            description: String::new(),
            date: today_string(),
            notes: String::new(),
            yield_amount: String::new(),
            yield_unit: String::new(),
        }
    }
}

impl LifecycleForm {
    /// Build the event for `plot_id`; `crop_id` is the plot's current crop
    pub fn validate(
        &self,
        plot_id: Id,
        crop_id: Option<Id>,
    ) -> Result<NewLifecycleEvent, FieldErrors> {
        let mut errors = FieldErrors::new();

        let event_type = match self.event_type.trim() {
            "" => {
                errors.insert("event_type", "Event type is required");
                None
            }
            raw => {
                let found = LifecycleEventType::from_value(raw);
                if found.is_none() {
                    errors.insert("event_type", "Unknown event type");
                }
                found
            }
        };

        required(&mut errors, "title", &self.title, "Title is required");
        valid_date(&mut errors, "date", &self.date);

        // Yield is only recorded for harvest-stage events
        let takes_yield = event_type.map_or(false, |t| t.carries_yield());
        let yield_amount = match optional(&self.yield_amount) {
            Some(raw) if takes_yield => {
                let parsed = parse_float(&raw);
                if parsed.is_none() {
                    errors.insert("yield_amount", "Yield must be a valid number");
                }
                parsed
            }
            _ => None,
        };
        let yield_unit = if takes_yield {
            optional(&self.yield_unit)
        } else {
            None
        };

        errors.finish(|| NewLifecycleEvent {
            plot_id,
            crop_id,
            event_type: event_type.unwrap_or(LifecycleEventType::Other),
            title: self.title.trim().to_string(),
            description: self.description.clone(),
            date: self.date.trim().to_string(),
            notes: self.notes.clone(),
            yield_amount,
            yield_unit,
        })
    }
}

// ============================================================================
// Activity logs
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct FertilizerForm {
    pub fertilizer_type: String,
    pub quantity: String,
    pub date: String,
    pub cost: String,
}

impl Default for FertilizerForm {
    fn default() -> Self {
        Self {
            fertilizer_type: String::new(),
            quantity: String::new(),
            date: today_string(),
            cost: String::new(),
        }
    }
}

impl FertilizerForm {
    pub fn validate(&self, plot_id: Id) -> Result<NewFertilizer, FieldErrors> {
        let mut errors = FieldErrors::new();
        let quantity = required_number(&mut errors, "quantity", &self.quantity, "Quantity");
        valid_date(&mut errors, "date", &self.date);
        let cost = required_number(&mut errors, "cost", &self.cost, "Cost");

        errors.finish(|| NewFertilizer {
            plot_id,
            fertilizer_type: self.fertilizer_type.trim().to_string(),
            quantity: quantity.unwrap_or_default(),
            date: self.date.trim().to_string(),
            cost: cost.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PesticideForm {
    pub pesticide_type: String,
    pub quantity: String,
    pub date: String,
    pub cost: String,
}

impl Default for PesticideForm {
    fn default() -> Self {
        Self {
            pesticide_type: String::new(),
            quantity: String::new(),
            date: today_string(),
            cost: String::new(),
        }
    }
}

impl PesticideForm {
    pub fn validate(&self, plot_id: Id) -> Result<NewPesticide, FieldErrors> {
        let mut errors = FieldErrors::new();
        let quantity = required_number(&mut errors, "quantity", &self.quantity, "Quantity");
        valid_date(&mut errors, "date", &self.date);
        let cost = required_number(&mut errors, "cost", &self.cost, "Cost");

        errors.finish(|| NewPesticide {
            plot_id,
            pesticide_type: self.pesticide_type.trim().to_string(),
            quantity: quantity.unwrap_or_default(),
            date: self.date.trim().to_string(),
            cost: cost.unwrap_or_default(),
        })
    }
}

/// Irrigation form; quantity and duration are sent exactly as typed
#[derive(Debug, Clone, PartialEq)]
pub struct IrrigationForm {
    pub method: String,
    pub quantity: String,
    pub duration: String,
    pub date: String,
    pub notes: String,
}

impl Default for IrrigationForm {
    fn default() -> Self {
        Self {
            method: IRRIGATION_METHODS[0].0.to_string(),
            quantity: String::new(),
            duration: String::new(),
            date: today_string(),
            notes: String::new(),
        }
    }
}

impl IrrigationForm {
    pub fn validate(&self, plot_id: Id) -> Result<NewIrrigation, FieldErrors> {
        let mut errors = FieldErrors::new();

        if !IRRIGATION_METHODS.iter().any(|(v, _)| *v == self.method) {
            errors.insert("method", "Select an irrigation method");
        }
        required(&mut errors, "quantity", &self.quantity, "Water quantity is required");
        valid_date(&mut errors, "date", &self.date);

        errors.finish(|| NewIrrigation {
            plot_id,
            method: self.method.clone(),
            quantity: self.quantity.clone(),
            duration: self.duration.clone(),
            date: self.date.trim().to_string(),
            notes: self.notes.clone(),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseForm {
    pub category: String,
    pub description: String,
    pub amount: String,
    pub date: String,
    pub notes: String,
}

impl Default for ExpenseForm {
    fn default() -> Self {
        Self {
            category: EXPENSE_CATEGORIES[0].0.to_string(),
            description: String::new(),
            amount: String::new(),
            date: today_string(),
            notes: String::new(),
        }
    }
}

impl ExpenseForm {
    pub fn validate(&self, plot_id: Id) -> Result<NewExpense, FieldErrors> {
        let mut errors = FieldErrors::new();

        if !EXPENSE_CATEGORIES.iter().any(|(v, _)| *v == self.category) {
            errors.insert("category", "Select an expense category");
        }
        required(&mut errors, "description", &self.description, "Description is required");
        let amount = required_number(&mut errors, "amount", &self.amount, "Amount");
        valid_date(&mut errors, "date", &self.date);

        errors.finish(|| NewExpense {
            plot_id,
            category: self.category.clone(),
            description: self.description.trim().to_string(),
            amount: amount.unwrap_or_default(),
            date: self.date.trim().to_string(),
            notes: self.notes.clone(),
        })
    }
}

// ============================================================================
// Account
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> Result<LoginRequest, FieldErrors> {
        let mut errors = FieldErrors::new();
        required(&mut errors, "email", &self.email, "Email is required");
        required(&mut errors, "password", &self.password, "Password is required");

        errors.finish(|| LoginRequest {
            email: self.email.trim().to_string(),
            password: self.password.clone(),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SignupForm {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl SignupForm {
    pub fn validate(&self) -> Result<SignupRequest, FieldErrors> {
        let mut errors = FieldErrors::new();
        required(&mut errors, "name", &self.name, "Name is required");
        required(&mut errors, "email", &self.email, "Email is required");
        required(&mut errors, "password", &self.password, "Password is required");

        errors.finish(|| SignupRequest {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            password: self.password.clone(),
        })
    }
}

/// Settings form; a blank password leaves it unchanged
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileForm {
    pub name: String,
    pub password: String,
}

impl ProfileForm {
    pub fn validate(&self) -> Result<UpdateProfile, FieldErrors> {
        let mut errors = FieldErrors::new();
        required(&mut errors, "name", &self.name, "Name is required");

        errors.finish(|| UpdateProfile {
            name: self.name.trim().to_string(),
            password: (!self.password.is_empty()).then(|| self.password.clone()),
        })
    }
}
