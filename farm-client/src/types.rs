//! Types for the farm REST API

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Record identifier as issued by the server
pub type Id = i64;

// ============================================================================
// Lenient field decoding
// ============================================================================

/// Numeric columns arrive as numbers or numeric strings depending on the
/// endpoint; these helpers accept both.
mod lenient {
    use super::*;
    use serde_json::Value;

    fn to_f64(value: &Value) -> Option<f64> {
        match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn f64<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
        Ok(to_f64(&Value::deserialize(d)?).unwrap_or_default())
    }

    pub fn opt_f64<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
        Ok(to_f64(&Value::deserialize(d)?))
    }

    /// Unrecognized category names decode as no category, leaving the
    /// grouping to the crop catalog
    pub fn opt_category<'de, D: Deserializer<'de>>(
        d: D,
    ) -> Result<Option<CropCategory>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::Null => None,
            value => serde_json::from_value(value).ok(),
        })
    }

    pub fn opt_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::String(s) => Some(s),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
    }
}

// ============================================================================
// Envelope & pagination
// ============================================================================

/// The `{success, data, message}` wrapper most endpoints use
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(default)]
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub pagination: Option<Pagination>,
}

/// Pagination block returned with plot listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    #[serde(default = "first_page", alias = "currentPage")]
    pub page: u32,
    #[serde(default)]
    pub limit: u32,
    #[serde(default, alias = "totalItems", alias = "total_items")]
    pub total: u64,
    #[serde(default = "first_page", alias = "totalPages")]
    pub total_pages: u32,
}

fn first_page() -> u32 {
    1
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            limit: 0,
            total: 0,
            total_pages: 1,
        }
    }
}

impl Pagination {
    /// Whether another page can be requested
    pub fn has_more(&self) -> bool {
        self.page < self.total_pages
    }
}

// ============================================================================
// Plots
// ============================================================================

/// Plot status
///
/// Unknown strings are kept verbatim in `Other` so that derivations can
/// fall through on them instead of failing to decode the plot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PlotStatus {
    Planting,
    Growing,
    Harvested,
    Fallow,
    /// Legacy status meaning "ready to harvest"
    Ready,
    Other(String),
}

impl PlotStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Planting => "planting",
            Self::Growing => "growing",
            Self::Harvested => "harvested",
            Self::Fallow => "fallow",
            Self::Ready => "ready",
            Self::Other(s) => s.as_str(),
        }
    }

    /// Statuses a user may pick when creating or editing a plot
    pub fn selectable() -> [PlotStatus; 4] {
        [Self::Planting, Self::Growing, Self::Harvested, Self::Fallow]
    }
}

impl Default for PlotStatus {
    fn default() -> Self {
        Self::Planting
    }
}

impl From<String> for PlotStatus {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "planting" | "planted" => Self::Planting,
            "growing" => Self::Growing,
            "harvested" => Self::Harvested,
            "fallow" => Self::Fallow,
            "ready" => Self::Ready,
            _ => Self::Other(value),
        }
    }
}

impl From<&str> for PlotStatus {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<PlotStatus> for String {
    fn from(value: PlotStatus) -> Self {
        match value {
            PlotStatus::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for PlotStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Caretaker as embedded in a plot: either a bare name or a record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CaretakerRef {
    Name(String),
    Record {
        #[serde(default)]
        id: Option<Id>,
        name: String,
    },
}

impl CaretakerRef {
    pub fn name(&self) -> &str {
        match self {
            Self::Name(name) => name,
            Self::Record { name, .. } => name,
        }
    }

    pub fn id(&self) -> Option<Id> {
        match self {
            Self::Name(_) => None,
            Self::Record { id, .. } => *id,
        }
    }
}

/// Crop as embedded in a plot: either a bare name or a record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CropRef {
    Name(String),
    Record {
        #[serde(default)]
        id: Option<Id>,
        name: String,
    },
}

impl CropRef {
    pub fn name(&self) -> &str {
        match self {
            Self::Name(name) => name,
            Self::Record { name, .. } => name,
        }
    }
}

/// A parcel of farmland
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plot {
    pub id: Id,
    #[serde(default)]
    pub name: String,
    /// Acreage; older endpoints call this `acres`
    #[serde(default, alias = "acres", deserialize_with = "lenient::f64")]
    pub acreage: f64,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub status: PlotStatus,
    #[serde(default)]
    pub caretaker: Option<CaretakerRef>,
    #[serde(default)]
    pub caretaker_id: Option<Id>,
    #[serde(default, alias = "crop")]
    pub current_crop: Option<CropRef>,
    #[serde(default)]
    pub current_crop_id: Option<Id>,
    #[serde(default)]
    pub planted_date: Option<String>,
    #[serde(default)]
    pub expected_harvest_date: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default, alias = "lastActivity")]
    pub last_activity: Option<String>,
}

impl Plot {
    pub fn caretaker_name(&self) -> Option<&str> {
        self.caretaker.as_ref().map(CaretakerRef::name)
    }

    pub fn crop_name(&self) -> Option<&str> {
        self.current_crop.as_ref().map(CropRef::name)
    }
}

/// Request body for creating or replacing a plot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPlot {
    pub name: String,
    pub acreage: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caretaker_id: Option<Id>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_crop_id: Option<Id>,
    pub status: PlotStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub planted_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_harvest_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Sort direction for listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// Query parameters for the plot listing
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlotQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub sort_by: Option<String>,
    pub sort_order: Option<SortOrder>,
    pub status: Option<PlotStatus>,
    pub caretaker_name: Option<String>,
    pub current_crop_id: Option<Id>,
}

impl PlotQuery {
    /// Query restricted to one status
    pub fn with_status(status: PlotStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    /// Same filters, different page
    pub fn at_page(&self, page: u32) -> Self {
        Self {
            page: Some(page),
            ..self.clone()
        }
    }

    /// Query-string pairs; unset parameters are omitted
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(page) = self.page {
            params.push(("page", page.to_string()));
        }
        if let Some(limit) = self.limit {
            params.push(("limit", limit.to_string()));
        }
        if let Some(ref sort_by) = self.sort_by {
            params.push(("sortBy", sort_by.clone()));
        }
        if let Some(order) = self.sort_order {
            params.push(("sortOrder", order.as_str().to_string()));
        }
        if let Some(ref status) = self.status {
            params.push(("status", status.as_str().to_string()));
        }
        if let Some(ref name) = self.caretaker_name {
            params.push(("caretaker_name", name.clone()));
        }
        if let Some(crop_id) = self.current_crop_id {
            params.push(("current_crop_id", crop_id.to_string()));
        }
        params
    }
}

/// One page of plots
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlotPage {
    pub plots: Vec<Plot>,
    pub pagination: Pagination,
}

/// Plot listings arrive either as a bare array or as `{plots, pagination}`
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum PlotListing {
    Empty,
    Plain(Vec<Plot>),
    Paged {
        #[serde(default, alias = "data")]
        plots: Vec<Plot>,
        #[serde(default)]
        pagination: Option<Pagination>,
    },
}

// ============================================================================
// Reference data
// ============================================================================

/// Crop grouping shown in crop selectors
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CropCategory {
    #[serde(alias = "majorCrops")]
    MajorCrops,
    #[serde(alias = "pulsesLegumes")]
    PulsesLegumes,
    Oilseeds,
    Vegetables,
    Other,
}

impl CropCategory {
    pub fn label(&self) -> &'static str {
        match self {
            Self::MajorCrops => "Major Crops",
            Self::PulsesLegumes => "Pulses & Legumes",
            Self::Oilseeds => "Oilseeds",
            Self::Vegetables => "Vegetables",
            Self::Other => "Other",
        }
    }
}

/// Crop reference record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Crop {
    pub id: Id,
    pub name: String,
    #[serde(default)]
    pub name_urdu: Option<String>,
    #[serde(default)]
    pub variety: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_category")]
    pub category: Option<CropCategory>,
}

/// Person responsible for a plot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Caretaker {
    pub id: Id,
    pub name: String,
    #[serde(default)]
    pub phone: Option<String>,
}

// ============================================================================
// Lifecycle events
// ============================================================================

/// Crop-stage event type (bilingual dictionary)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LifecycleEventType {
    Planting,
    Seedling,
    Vegetative,
    Flowering,
    Fruiting,
    Maturation,
    Harvesting,
    PostHarvest,
    Disease,
    PestControl,
    Fertilization,
    Irrigation,
    Weeding,
    Pruning,
    Other,
}

impl LifecycleEventType {
    /// All event types in display order
    pub const ALL: [LifecycleEventType; 15] = [
        Self::Planting,
        Self::Seedling,
        Self::Vegetative,
        Self::Flowering,
        Self::Fruiting,
        Self::Maturation,
        Self::Harvesting,
        Self::PostHarvest,
        Self::Disease,
        Self::PestControl,
        Self::Fertilization,
        Self::Irrigation,
        Self::Weeding,
        Self::Pruning,
        Self::Other,
    ];

    /// Wire value
    pub fn value(&self) -> &'static str {
        match self {
            Self::Planting => "PLANTING",
            Self::Seedling => "SEEDLING",
            Self::Vegetative => "VEGETATIVE",
            Self::Flowering => "FLOWERING",
            Self::Fruiting => "FRUITING",
            Self::Maturation => "MATURATION",
            Self::Harvesting => "HARVESTING",
            Self::PostHarvest => "POST_HARVEST",
            Self::Disease => "DISEASE",
            Self::PestControl => "PEST_CONTROL",
            Self::Fertilization => "FERTILIZATION",
            Self::Irrigation => "IRRIGATION",
            Self::Weeding => "WEEDING",
            Self::Pruning => "PRUNING",
            Self::Other => "OTHER",
        }
    }

    pub fn label_en(&self) -> &'static str {
        match self {
            Self::Planting => "Planting",
            Self::Seedling => "Seedling",
            Self::Vegetative => "Vegetative Growth",
            Self::Flowering => "Flowering",
            Self::Fruiting => "Fruiting",
            Self::Maturation => "Maturation",
            Self::Harvesting => "Harvesting",
            Self::PostHarvest => "Post Harvest",
            Self::Disease => "Disease Treatment",
            Self::PestControl => "Pest Control",
            Self::Fertilization => "Fertilization",
            Self::Irrigation => "Irrigation",
            Self::Weeding => "Weeding",
            Self::Pruning => "Pruning",
            Self::Other => "Other",
        }
    }

    pub fn label_ur(&self) -> &'static str {
        match self {
            Self::Planting => "بوائی",
            Self::Seedling => "پودا",
            Self::Vegetative => "نشوونما",
            Self::Flowering => "پھول",
            Self::Fruiting => "پھل",
            Self::Maturation => "پختگی",
            Self::Harvesting => "کٹائی",
            Self::PostHarvest => "کٹائی کے بعد",
            Self::Disease => "بیماری کا علاج",
            Self::PestControl => "حشرات کا کنٹرول",
            Self::Fertilization => "کھاد ڈالنا",
            Self::Irrigation => "آبپاشی",
            Self::Weeding => "گھاس نکالنا",
            Self::Pruning => "کانٹ چھانٹ",
            Self::Other => "دوسرا",
        }
    }

    /// Selector label, e.g. "Harvesting (کٹائی)"
    pub fn option_label(&self) -> String {
        format!("{} ({})", self.label_en(), self.label_ur())
    }

    /// Look up a wire value; also accepts the older lowercase names
    pub fn from_value(value: &str) -> Option<Self> {
        let normalized = value.trim().to_ascii_uppercase();
        let found = match normalized.as_str() {
            "PLANTING" | "SOWING" => Self::Planting,
            "SEEDLING" | "GERMINATION" => Self::Seedling,
            "VEGETATIVE" => Self::Vegetative,
            "FLOWERING" => Self::Flowering,
            "FRUITING" => Self::Fruiting,
            "MATURATION" => Self::Maturation,
            "HARVESTING" | "HARVEST" => Self::Harvesting,
            "POST_HARVEST" => Self::PostHarvest,
            "DISEASE" => Self::Disease,
            "PEST_CONTROL" => Self::PestControl,
            "FERTILIZATION" => Self::Fertilization,
            "IRRIGATION" => Self::Irrigation,
            "WEEDING" => Self::Weeding,
            "PRUNING" => Self::Pruning,
            "OTHER" => Self::Other,
            _ => return None,
        };
        Some(found)
    }

    /// Only harvest-stage events carry a yield
    pub fn carries_yield(&self) -> bool {
        matches!(self, Self::Harvesting | Self::PostHarvest)
    }
}

impl From<String> for LifecycleEventType {
    fn from(value: String) -> Self {
        Self::from_value(&value).unwrap_or(Self::Other)
    }
}

impl From<LifecycleEventType> for String {
    fn from(value: LifecycleEventType) -> Self {
        value.value().to_string()
    }
}

impl fmt::Display for LifecycleEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label_en())
    }
}

/// Dated crop-stage record attached to a plot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LifecycleEvent {
    #[serde(default)]
    pub id: Option<Id>,
    pub plot_id: Id,
    #[serde(default)]
    pub crop_id: Option<Id>,
    pub event_type: LifecycleEventType,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub yield_amount: Option<f64>,
    #[serde(default)]
    pub yield_unit: Option<String>,
}

/// Request body for a lifecycle event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewLifecycleEvent {
    pub plot_id: Id,
    pub crop_id: Option<Id>,
    pub event_type: LifecycleEventType,
    pub title: String,
    pub description: String,
    pub date: String,
    pub notes: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yield_amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yield_unit: Option<String>,
}

// ============================================================================
// Activity logs
// ============================================================================

/// Fertilizer application
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FertilizerRecord {
    #[serde(default)]
    pub id: Option<Id>,
    pub plot_id: Id,
    #[serde(default)]
    pub fertilizer_type: Option<String>,
    #[serde(default, deserialize_with = "lenient::f64")]
    pub quantity: f64,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "lenient::f64")]
    pub cost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewFertilizer {
    pub plot_id: Id,
    pub fertilizer_type: String,
    pub quantity: f64,
    pub date: String,
    pub cost: f64,
}

/// Pesticide application
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PesticideRecord {
    #[serde(default)]
    pub id: Option<Id>,
    pub plot_id: Id,
    #[serde(default)]
    pub pesticide_type: Option<String>,
    #[serde(default, deserialize_with = "lenient::f64")]
    pub quantity: f64,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "lenient::f64")]
    pub cost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPesticide {
    pub plot_id: Id,
    pub pesticide_type: String,
    pub quantity: f64,
    pub date: String,
    pub cost: f64,
}

/// Irrigation session; quantity and duration are free text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IrrigationRecord {
    #[serde(default)]
    pub id: Option<Id>,
    pub plot_id: Id,
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub quantity: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub duration: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewIrrigation {
    pub plot_id: Id,
    pub method: String,
    pub quantity: String,
    pub duration: String,
    pub date: String,
    pub notes: String,
}

/// Expense entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseRecord {
    #[serde(default)]
    pub id: Option<Id>,
    pub plot_id: Id,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient::f64")]
    pub amount: f64,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewExpense {
    pub plot_id: Id,
    pub category: String,
    pub description: String,
    pub amount: f64,
    pub date: String,
    pub notes: String,
}

// ============================================================================
// Reminders
// ============================================================================

/// Reminder kind
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ReminderType {
    Watering,
    Fertilizer,
    Spray,
    Harvest,
    Other(String),
}

impl ReminderType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Watering => "watering",
            Self::Fertilizer => "fertilizer",
            Self::Spray => "spray",
            Self::Harvest => "harvest",
            Self::Other(s) => s.as_str(),
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Self::Watering => "Watering",
            Self::Fertilizer => "Fertilizer",
            Self::Spray => "Spray",
            Self::Harvest => "Harvest",
            Self::Other(s) => s.as_str(),
        }
    }
}

impl From<String> for ReminderType {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "watering" => Self::Watering,
            "fertilizer" => Self::Fertilizer,
            "spray" => Self::Spray,
            "harvest" => Self::Harvest,
            _ => Self::Other(value),
        }
    }
}

impl From<&str> for ReminderType {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<ReminderType> for String {
    fn from(value: ReminderType) -> Self {
        match value {
            ReminderType::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for ReminderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scheduled task with a completion flag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reminder {
    pub id: Id,
    pub plot_id: Id,
    #[serde(default)]
    pub crop_id: Option<Id>,
    #[serde(rename = "type")]
    pub reminder_type: ReminderType,
    pub due_date: String,
    /// Completion flag
    #[serde(default)]
    pub sent: bool,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewReminder {
    pub plot_id: Id,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crop_id: Option<Id>,
    #[serde(rename = "type")]
    pub reminder_type: ReminderType,
    pub due_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

// ============================================================================
// Weather & reports
// ============================================================================

/// Current weather summary
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Weather {
    #[serde(default, deserialize_with = "lenient::f64")]
    pub temperature: f64,
    #[serde(default, alias = "expectedRain", deserialize_with = "lenient::f64")]
    pub expected_rain: f64,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub humidity: Option<f64>,
    #[serde(default, alias = "description")]
    pub status: Option<String>,
}

/// Reporting window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Timeframe {
    Week,
    #[default]
    Month,
    Quarter,
    Year,
}

impl Timeframe {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Week => "week",
            Self::Month => "month",
            Self::Quarter => "quarter",
            Self::Year => "year",
        }
    }
}

impl std::str::FromStr for Timeframe {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            "quarter" => Ok(Self::Quarter),
            "year" => Ok(Self::Year),
            other => Err(format!("unknown timeframe '{}'", other)),
        }
    }
}

/// Report filter
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportQuery {
    pub timeframe: Timeframe,
    pub plot_id: Option<Id>,
}

impl ReportQuery {
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("timeframe", self.timeframe.as_str().to_string())];
        if let Some(plot_id) = self.plot_id {
            params.push(("plot_id", plot_id.to_string()));
        }
        params
    }
}

/// Combined report payload; section bodies are server-defined
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportsDashboard {
    #[serde(default)]
    pub financial: Option<serde_json::Value>,
    #[serde(default, alias = "cropYield")]
    pub crop_yield: Option<serde_json::Value>,
    #[serde(default)]
    pub efficiency: Option<serde_json::Value>,
}

// ============================================================================
// Auth
// ============================================================================

/// Account profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(default)]
    pub id: Option<Id>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct UpdateProfile {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl fmt::Debug for SignupRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignupRequest")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl fmt::Debug for UpdateProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpdateProfile")
            .field("name", &self.name)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Payload of a successful login/signup
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthPayload {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub user: Option<User>,
}
