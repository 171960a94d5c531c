//! Onboarding wizard step definitions, typed step payloads, and validation.
//!
//! Each wizard step owns a bounded subset of client (and, for the contact
//! step, account) fields. A submitted step is parsed into a [`StepPayload`]
//! variant carrying a strictly typed field struct; unknown fields are dropped
//! before deserialization and all validation runs before any storage call.

use std::sync::LazyLock;

use regex::Regex;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Wizard steps
// ---------------------------------------------------------------------------

/// The steps of the onboarding wizard, in presentation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    Location,
    Demographics,
    AdditionalInfo,
    ServiceChoice,
    ProductChoice,
    Contact,
}

impl WizardStep {
    /// Every step, in presentation order.
    pub const ALL: [WizardStep; 6] = [
        Self::Location,
        Self::Demographics,
        Self::AdditionalInfo,
        Self::ServiceChoice,
        Self::ProductChoice,
        Self::Contact,
    ];

    /// Parse a step name as it appears in the route.
    pub fn from_name(name: &str) -> Result<Self, CoreError> {
        match name {
            "location" => Ok(Self::Location),
            "demographics" => Ok(Self::Demographics),
            "additional_info" => Ok(Self::AdditionalInfo),
            "service_choice" => Ok(Self::ServiceChoice),
            "product_choice" => Ok(Self::ProductChoice),
            "contact" => Ok(Self::Contact),
            _ => Err(CoreError::Validation(format!(
                "Unknown wizard step '{name}'. Must be one of: location, demographics, \
                 additional_info, service_choice, product_choice, contact"
            ))),
        }
    }

    /// Route/database name of the step.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Location => "location",
            Self::Demographics => "demographics",
            Self::AdditionalInfo => "additional_info",
            Self::ServiceChoice => "service_choice",
            Self::ProductChoice => "product_choice",
            Self::Contact => "contact",
        }
    }

    /// Fixed, ordered list of field names the step accepts.
    pub fn accepted_fields(self) -> &'static [&'static str] {
        match self {
            Self::Location => &[
                FIELD_BUSINESS_NAME,
                FIELD_ADDRESS_STREET,
                FIELD_ADDRESS_CITY,
                FIELD_ADDRESS_STATE,
                FIELD_ADDRESS_ZIP,
                FIELD_WEBSITE,
                FIELD_PHONE,
                FIELD_HOURS_OF_OPERATION,
                FIELD_MICROMARKET_LOCATION,
            ],
            Self::Demographics => &[
                FIELD_NUMBER_OF_PEOPLE,
                FIELD_DEMOGRAPHICS,
                FIELD_NEIGHBORHOOD_INFO,
                FIELD_INDUSTRY,
                FIELD_TARGET_AGE_GROUP,
            ],
            Self::AdditionalInfo => &[FIELD_DIMENSIONS, FIELD_WUGS_VISIT],
            Self::ServiceChoice => &[FIELD_SERVICE_IDS],
            Self::ProductChoice => &[FIELD_PRODUCT_IDS],
            Self::Contact => &[
                FIELD_PHONE,
                FIELD_FIRST_NAME,
                FIELD_LAST_NAME,
                FIELD_USERNAME,
            ],
        }
    }

    /// Fields that must be present for the step to be accepted.
    ///
    /// Steps with no required field still reject a payload that carries
    /// none of their accepted fields.
    pub fn required_fields(self) -> &'static [&'static str] {
        match self {
            Self::Location => &[FIELD_BUSINESS_NAME, FIELD_ADDRESS_ZIP],
            Self::Demographics | Self::AdditionalInfo => &[],
            Self::ServiceChoice => &[FIELD_SERVICE_IDS],
            Self::ProductChoice => &[FIELD_PRODUCT_IDS],
            Self::Contact => &[FIELD_PHONE],
        }
    }
}

impl std::fmt::Display for WizardStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Field names
// ---------------------------------------------------------------------------

pub const FIELD_BUSINESS_NAME: &str = "business_name";
pub const FIELD_ADDRESS_STREET: &str = "address_street";
pub const FIELD_ADDRESS_CITY: &str = "address_city";
pub const FIELD_ADDRESS_STATE: &str = "address_state";
pub const FIELD_ADDRESS_ZIP: &str = "address_zip";
pub const FIELD_WEBSITE: &str = "website";
pub const FIELD_PHONE: &str = "phone";
pub const FIELD_HOURS_OF_OPERATION: &str = "hours_of_operation";
pub const FIELD_MICROMARKET_LOCATION: &str = "micromarket_location";
pub const FIELD_NUMBER_OF_PEOPLE: &str = "number_of_people";
pub const FIELD_DEMOGRAPHICS: &str = "demographics";
pub const FIELD_NEIGHBORHOOD_INFO: &str = "neighborhood_info";
pub const FIELD_INDUSTRY: &str = "industry";
pub const FIELD_TARGET_AGE_GROUP: &str = "target_age_group";
pub const FIELD_DIMENSIONS: &str = "dimensions";
pub const FIELD_WUGS_VISIT: &str = "wugs_visit";
pub const FIELD_SERVICE_IDS: &str = "service_ids";
pub const FIELD_PRODUCT_IDS: &str = "product_ids";
pub const FIELD_FIRST_NAME: &str = "first_name";
pub const FIELD_LAST_NAME: &str = "last_name";
pub const FIELD_USERNAME: &str = "username";

/// Legacy field names still sent by older wizard pages, mapped to their
/// canonical name. The canonical name wins when both are present.
const FIELD_ALIASES: &[(&str, &str)] = &[("age_group", FIELD_TARGET_AGE_GROUP)];

// ---------------------------------------------------------------------------
// Typed step payloads
// ---------------------------------------------------------------------------

/// Fields of the `location` step ("who we are").
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationFields {
    pub business_name: String,
    pub address_street: Option<String>,
    pub address_city: Option<String>,
    pub address_state: Option<String>,
    pub address_zip: String,
    pub website: Option<String>,
    pub phone: Option<String>,
    pub hours_of_operation: Option<String>,
    pub micromarket_location: Option<String>,
}

/// Fields of the `demographics` step ("who we're serving").
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemographicsFields {
    pub number_of_people: Option<i32>,
    pub demographics: Option<String>,
    pub neighborhood_info: Option<String>,
    pub industry: Option<String>,
    pub target_age_group: Option<String>,
}

/// Fields of the `additional_info` step.
///
/// Pictures are deliberately absent: they are only ever appended through the
/// attachment upload path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdditionalInfoFields {
    pub dimensions: Option<String>,
    pub wugs_visit: Option<String>,
}

/// Complete desired set of service catalog ids.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceChoiceFields {
    pub service_ids: Vec<DbId>,
}

/// Complete desired set of product catalog ids.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductChoiceFields {
    pub product_ids: Vec<DbId>,
}

/// Fields of the `contact` step. `phone` lands on the client, the name
/// fields on the managing account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactFields {
    pub phone: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub username: Option<String>,
}

impl ContactFields {
    /// Whether any account-side field is being changed.
    pub fn has_account_changes(&self) -> bool {
        self.first_name.is_some() || self.last_name.is_some() || self.username.is_some()
    }
}

/// A submitted wizard step with its typed field set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "step", content = "fields", rename_all = "snake_case")]
pub enum StepPayload {
    Location(LocationFields),
    Demographics(DemographicsFields),
    AdditionalInfo(AdditionalInfoFields),
    ServiceChoice(ServiceChoiceFields),
    ProductChoice(ProductChoiceFields),
    Contact(ContactFields),
}

impl StepPayload {
    /// Parse, normalize and validate a raw JSON field set for `step`.
    ///
    /// Fields outside the step's accepted list are ignored. The returned
    /// payload is safe to hand to the storage layer.
    pub fn parse(step: WizardStep, fields: &serde_json::Value) -> Result<Self, CoreError> {
        let filtered = filter_accepted_fields(step, fields)?;

        let payload = match step {
            WizardStep::Location => Self::Location(deserialize_fields(step, filtered)?),
            WizardStep::Demographics => Self::Demographics(deserialize_fields(step, filtered)?),
            WizardStep::AdditionalInfo => {
                Self::AdditionalInfo(deserialize_fields(step, filtered)?)
            }
            WizardStep::ServiceChoice => Self::ServiceChoice(deserialize_fields(step, filtered)?),
            WizardStep::ProductChoice => Self::ProductChoice(deserialize_fields(step, filtered)?),
            WizardStep::Contact => Self::Contact(deserialize_fields(step, filtered)?),
        };

        let payload = payload.normalized();
        payload.validate()?;
        Ok(payload)
    }

    /// The wizard step this payload belongs to.
    pub fn step(&self) -> WizardStep {
        match self {
            Self::Location(_) => WizardStep::Location,
            Self::Demographics(_) => WizardStep::Demographics,
            Self::AdditionalInfo(_) => WizardStep::AdditionalInfo,
            Self::ServiceChoice(_) => WizardStep::ServiceChoice,
            Self::ProductChoice(_) => WizardStep::ProductChoice,
            Self::Contact(_) => WizardStep::Contact,
        }
    }

    /// Trim text fields. Blank optional fields become `None` (left unchanged).
    pub fn normalized(self) -> Self {
        match self {
            Self::Location(f) => Self::Location(LocationFields {
                business_name: f.business_name.trim().to_string(),
                address_street: normalize_optional(f.address_street),
                address_city: normalize_optional(f.address_city),
                address_state: normalize_optional(f.address_state),
                address_zip: f.address_zip.trim().to_string(),
                website: normalize_optional(f.website),
                phone: normalize_optional(f.phone),
                hours_of_operation: normalize_optional(f.hours_of_operation),
                micromarket_location: normalize_optional(f.micromarket_location),
            }),
            Self::Demographics(f) => Self::Demographics(DemographicsFields {
                number_of_people: f.number_of_people,
                demographics: normalize_optional(f.demographics),
                neighborhood_info: normalize_optional(f.neighborhood_info),
                industry: normalize_optional(f.industry),
                target_age_group: normalize_optional(f.target_age_group),
            }),
            Self::AdditionalInfo(f) => Self::AdditionalInfo(AdditionalInfoFields {
                dimensions: normalize_optional(f.dimensions),
                wugs_visit: normalize_optional(f.wugs_visit),
            }),
            Self::Contact(f) => Self::Contact(ContactFields {
                phone: f.phone.trim().to_string(),
                first_name: normalize_optional(f.first_name),
                last_name: normalize_optional(f.last_name),
                username: normalize_optional(f.username),
            }),
            other @ (Self::ServiceChoice(_) | Self::ProductChoice(_)) => other,
        }
    }

    /// Validate field values. Performs no I/O.
    pub fn validate(&self) -> Result<(), CoreError> {
        match self {
            Self::Location(f) => {
                require_non_blank(FIELD_BUSINESS_NAME, &f.business_name)?;
                validate_zip(&f.address_zip)?;
                if let Some(website) = &f.website {
                    validate_website(website)?;
                }
                if let Some(phone) = &f.phone {
                    validate_phone(phone)?;
                }
            }
            Self::Demographics(f) => {
                if let Some(n) = f.number_of_people {
                    if n < 0 {
                        return Err(CoreError::Validation(format!(
                            "'{FIELD_NUMBER_OF_PEOPLE}' must be a non-negative integer, got {n}"
                        )));
                    }
                }
                let any = f.number_of_people.is_some()
                    || f.demographics.is_some()
                    || f.neighborhood_info.is_some()
                    || f.industry.is_some()
                    || f.target_age_group.is_some();
                require_any_field(WizardStep::Demographics, any)?;
            }
            Self::AdditionalInfo(f) => {
                require_any_field(
                    WizardStep::AdditionalInfo,
                    f.dimensions.is_some() || f.wugs_visit.is_some(),
                )?;
            }
            Self::ServiceChoice(f) => validate_id_list(FIELD_SERVICE_IDS, &f.service_ids)?,
            Self::ProductChoice(f) => validate_id_list(FIELD_PRODUCT_IDS, &f.product_ids)?,
            Self::Contact(f) => {
                validate_phone(&f.phone)?;
                if let Some(username) = &f.username {
                    validate_username(username)?;
                }
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Parsing helpers
// ---------------------------------------------------------------------------

/// Keep only the step's accepted fields, resolving legacy aliases.
fn filter_accepted_fields(
    step: WizardStep,
    fields: &serde_json::Value,
) -> Result<serde_json::Value, CoreError> {
    let obj = fields.as_object().ok_or_else(|| {
        CoreError::Validation(format!("Step '{step}' fields must be a JSON object"))
    })?;

    let accepted = step.accepted_fields();
    let mut filtered = serde_json::Map::new();

    for &name in accepted {
        if let Some(value) = obj.get(name) {
            // Explicit nulls mean "not submitted".
            if !value.is_null() {
                filtered.insert(name.to_string(), value.clone());
            }
        }
    }

    for &(alias, canonical) in FIELD_ALIASES {
        if !accepted.contains(&canonical) || filtered.contains_key(canonical) {
            continue;
        }
        if let Some(value) = obj.get(alias).filter(|v| !v.is_null()) {
            filtered.insert(canonical.to_string(), value.clone());
        }
    }

    Ok(serde_json::Value::Object(filtered))
}

fn deserialize_fields<T: DeserializeOwned>(
    step: WizardStep,
    fields: serde_json::Value,
) -> Result<T, CoreError> {
    serde_json::from_value(fields)
        .map_err(|e| CoreError::Validation(format!("Invalid '{step}' step fields: {e}")))
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

// ---------------------------------------------------------------------------
// Field validation
// ---------------------------------------------------------------------------

static ZIP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{5}(-\d{4})?$").expect("valid regex"));

/// Minimum number of digits in a phone number.
pub const MIN_PHONE_DIGITS: usize = 7;

/// Maximum number of digits in a phone number (E.164).
pub const MAX_PHONE_DIGITS: usize = 15;

/// Minimum username length.
pub const MIN_USERNAME_LEN: usize = 3;

/// Maximum username length.
pub const MAX_USERNAME_LEN: usize = 64;

/// Validate a US ZIP or ZIP+4 code.
pub fn validate_zip(zip: &str) -> Result<(), CoreError> {
    if ZIP_RE.is_match(zip) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "'{FIELD_ADDRESS_ZIP}' must be a 5-digit ZIP or ZIP+4 code, got '{zip}'"
        )))
    }
}

/// Validate a phone number: digits plus common separators.
pub fn validate_phone(phone: &str) -> Result<(), CoreError> {
    if let Some(c) = phone
        .chars()
        .find(|&c| !(c.is_ascii_digit() || matches!(c, ' ' | '+' | '-' | '(' | ')' | '.')))
    {
        return Err(CoreError::Validation(format!(
            "'{FIELD_PHONE}' contains invalid character '{c}'"
        )));
    }

    let digits = phone.chars().filter(char::is_ascii_digit).count();
    if !(MIN_PHONE_DIGITS..=MAX_PHONE_DIGITS).contains(&digits) {
        return Err(CoreError::Validation(format!(
            "'{FIELD_PHONE}' must contain between {MIN_PHONE_DIGITS} and {MAX_PHONE_DIGITS} \
             digits, got {digits}"
        )));
    }
    Ok(())
}

/// Validate that a website is an absolute http(s) URL.
pub fn validate_website(website: &str) -> Result<(), CoreError> {
    let rest = website
        .strip_prefix("https://")
        .or_else(|| website.strip_prefix("http://"));
    match rest {
        Some(host) if !host.is_empty() && !host.contains(char::is_whitespace) => Ok(()),
        _ => Err(CoreError::Validation(format!(
            "'{FIELD_WEBSITE}' must be an http:// or https:// URL, got '{website}'"
        ))),
    }
}

/// Validate a login name.
pub fn validate_username(username: &str) -> Result<(), CoreError> {
    let len = username.chars().count();
    if !(MIN_USERNAME_LEN..=MAX_USERNAME_LEN).contains(&len) {
        return Err(CoreError::Validation(format!(
            "'{FIELD_USERNAME}' must be between {MIN_USERNAME_LEN} and {MAX_USERNAME_LEN} \
             characters"
        )));
    }
    if username.contains(char::is_whitespace) {
        return Err(CoreError::Validation(format!(
            "'{FIELD_USERNAME}' must not contain whitespace"
        )));
    }
    Ok(())
}

/// Validate that every catalog id in a selection is a positive integer.
pub fn validate_id_list(field: &str, ids: &[DbId]) -> Result<(), CoreError> {
    match ids.iter().find(|&&id| id <= 0) {
        Some(bad) => Err(CoreError::Validation(format!(
            "'{field}' must contain positive ids, got {bad}"
        ))),
        None => Ok(()),
    }
}

fn require_non_blank(field: &str, value: &str) -> Result<(), CoreError> {
    if value.is_empty() {
        return Err(CoreError::Validation(format!(
            "'{field}' is required and must not be blank"
        )));
    }
    Ok(())
}

fn require_any_field(step: WizardStep, any: bool) -> Result<(), CoreError> {
    if any {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Step '{step}' requires at least one of: {}",
            step.accepted_fields().join(", ")
        )))
    }
}

/// Parse a client identifier taken from a route segment.
///
/// Only positive base-10 integers are accepted; anything else is rejected
/// before it can reach storage.
pub fn parse_client_id(raw: &str) -> Result<DbId, CoreError> {
    match raw.parse::<DbId>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(CoreError::Validation(format!(
            "Client id must be a positive integer, got '{raw}'"
        ))),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
