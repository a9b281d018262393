//! Wire types for both API generations.
//!
//! The legacy endpoints return loosely typed rows (numbers as strings,
//! booleans as 0/1), so most legacy structs default missing fields and go
//! through the lenient deserializers below.

use serde::{Deserialize, Deserializer, Serialize};

use crate::scoring::ScoreInput;

/// Accept `"12"`, `12` or `null` for a string field.
pub(crate) fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Str(String),
        Int(i64),
        Float(f64),
        Null,
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Str(s)) => s,
        Some(Raw::Int(n)) => n.to_string(),
        Some(Raw::Float(n)) => n.to_string(),
        Some(Raw::Null) | None => String::new(),
    })
}

/// Accept `true`, `1`, `"1"` or `null` for a boolean field.
pub(crate) fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Bool(bool),
        Int(i64),
        Str(String),
        Null,
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Bool(b)) => b,
        Some(Raw::Int(n)) => n != 0,
        Some(Raw::Str(s)) => matches!(s.trim(), "1" | "true" | "yes"),
        Some(Raw::Null) | None => false,
    })
}

// ---------------------------------------------------------------------------
// Legacy site content
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Blog {
    pub id: u64,
    pub heading: String,
    pub slug: String,
    pub description: String,
    #[serde(deserialize_with = "flag")]
    pub featured: bool,
    pub post_date: Option<String>,
    /// Banner URL as returned by `blogs/list`
    pub blog_banner: Option<String>,
    /// Banner URL as returned by `blog/get`
    pub banner: Option<String>,
    pub blog_category_id: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct BlogCategory {
    pub id: u64,
    pub name: String,
    pub slug: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Faq {
    pub id: u64,
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Testimonial {
    pub id: u64,
    /// Author name
    pub heading: String,
    pub designation: String,
    pub description: String,
    pub user_banner: Option<String>,
    /// Set by `testimonial/get`; 0 when there is no neighbour
    pub next_id: u64,
    pub previous_id: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct State {
    pub id: u64,
    pub state: String,
    pub abbreviation: String,
    pub slug: Option<String>,
}

/// Response of `state/code/list`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct StateListing {
    pub states: Vec<State>,
    pub first_state: Option<State>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct City {
    pub id: u64,
    pub city: String,
    pub slug: Option<String>,
    pub state_id: Option<u64>,
}

/// Response of `city/list`. `count` is the number of cities in the state,
/// not the length of `cities`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CityListing {
    pub cities: Vec<City>,
    pub count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Page {
    pub id: u64,
    pub heading: Option<String>,
    pub description: Option<String>,
    pub seo_title: Option<String>,
    pub seo_description: Option<String>,
    pub seo_keywords: Option<String>,
}

/// A property manager row from the legacy directory.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Agent {
    #[serde(alias = "user_id")]
    pub id: u64,
    pub company_name: String,
    pub slug: String,
    pub address: Option<String>,
    pub about: Option<String>,
    pub photo: Option<String>,
    #[serde(deserialize_with = "flag")]
    pub featured: bool,
    pub category: Option<String>,
    pub email: Option<String>,
    #[serde(deserialize_with = "string_or_number")]
    pub mobile: String,
}

/// A Laravel paginator page.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Paginated<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
    #[serde(default)]
    pub current_page: u64,
    #[serde(default)]
    pub last_page: u64,
    #[serde(default)]
    pub total: u64,
}

impl<T> Default for Paginated<T> {
    fn default() -> Self {
        Self {
            data: Vec::new(),
            current_page: 0,
            last_page: 0,
            total: 0,
        }
    }
}

/// Response of `agents/list`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AgentListing {
    pub agents: Paginated<Agent>,
    #[serde(rename = "cityName")]
    pub city_name: String,
    #[serde(rename = "stateName")]
    pub state_name: String,
}

/// Response of `agent/get`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AgentDetail {
    pub agent_data: Agent,
    #[serde(rename = "cityName")]
    pub city_name: String,
    #[serde(rename = "stateName")]
    pub state_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct QuestionOption {
    pub value: String,
    pub label: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Question {
    pub id: u64,
    pub question_text: String,
    pub input_type: String,
    pub options: Option<Vec<QuestionOption>>,
    pub help_text: Option<String>,
    pub step: Option<u32>,
    #[serde(deserialize_with = "flag")]
    pub is_required: bool,
    pub content_heading: Option<String>,
    pub content_description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct QuestionAnswer {
    pub question_id: u64,
    pub answer: String,
}

/// Body of legacy `lead/save`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegacyLeadRequest {
    pub property_category: u32,
    pub property_address: String,
    pub property_city: String,
    pub property_zip: String,
    pub property_price: String,
    pub full_name: String,
    pub email_address: String,
    pub property_number: String,
    pub exam: Vec<QuestionAnswer>,
}

/// Body of legacy `contact/save`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactRequest {
    pub name: String,
    pub email: String,
    pub mobile: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_id: Option<u64>,
}

/// Body of legacy `agent/save`.
///
/// The endpoint itself reads the first four fields. The rest carry the
/// account and service details the sign-up wizard collects and are left
/// out when empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentRegistration {
    pub company_name: String,
    pub email: String,
    pub mobile: String,
    pub country_code: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub first_name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub last_name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub password: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub password_confirmation: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub city: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub state: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub property_types: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub services: Vec<String>,
}

// ---------------------------------------------------------------------------
// REST API
// ---------------------------------------------------------------------------

/// A property manager from `GET /property-managers`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PropertyManager {
    pub id: u64,
    pub name: String,
    pub slug: String,
    pub address: String,
    pub city: String,
    pub state: String,
    #[serde(deserialize_with = "string_or_number")]
    pub zip_code: String,
    pub phone: String,
    pub email: String,
    pub website: Option<String>,
    pub description: String,
    #[serde(deserialize_with = "string_or_number")]
    pub years_in_business: String,
    #[serde(deserialize_with = "string_or_number")]
    pub rentals_managed: String,
    pub bbb_rating: Option<String>,
    #[serde(deserialize_with = "string_or_number")]
    pub management_fee: String,
    pub tenant_placement_fee: Option<String>,
    pub lease_renewal_fee: Option<String>,
    pub miscellaneous_fees: Option<String>,
    #[serde(deserialize_with = "flag")]
    pub is_featured: bool,
    #[serde(deserialize_with = "flag")]
    pub is_verified: bool,
    pub logo_url: Option<String>,
    pub service_types: Option<Vec<String>>,
}

impl From<&PropertyManager> for ScoreInput {
    fn from(pm: &PropertyManager) -> Self {
        ScoreInput {
            bbb_rating: pm.bbb_rating.clone(),
            years_in_business: pm.years_in_business.clone(),
            rentals_managed: pm.rentals_managed.clone(),
            is_verified: pm.is_verified,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PageMeta {
    pub total: u64,
    pub current_page: u64,
    pub per_page: u64,
    pub last_page: u64,
}

/// Filters for the manager directory. Unset fields are left off the query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ManagerFilters {
    pub state: Option<String>,
    pub city: Option<String>,
    pub search: Option<String>,
    pub property_types: Vec<String>,
    pub min_rating: Option<String>,
    pub min_experience: Option<u32>,
    pub services: Vec<String>,
    pub sort: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LocationResult {
    pub state: String,
    #[serde(rename = "stateCode")]
    pub state_code: String,
    pub city: String,
    pub count: u64,
}

/// Body of `POST /home-page-lead`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadSubmission {
    pub property_type: String,
    pub street_address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number_of_units: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub square_footage: Option<u32>,
    pub additional_services: Vec<String>,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub preferred_contact: String,
    pub source: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LeadConfirmation {
    pub confirmation_number: String,
    pub matched_managers_count: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Profile {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub company_name: String,
    pub bio: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LeadCriteria {
    pub property_types: Vec<String>,
    pub zip_codes: Vec<String>,
    pub min_units: Option<u32>,
    pub max_units: Option<u32>,
    pub service_radius_miles: Option<u32>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct NotificationSettings {
    pub email_notifications: bool,
    pub sms_notifications: bool,
}

/// `GET/PUT /v1/preferences`
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Preferences {
    pub profile: Profile,
    pub lead_criteria: LeadCriteria,
    pub notifications: NotificationSettings,
}

/// A lead assigned to the signed-in manager.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PmLead {
    pub id: u64,
    pub property_type: String,
    pub street_address: String,
    pub city: String,
    pub state: String,
    #[serde(deserialize_with = "string_or_number")]
    pub zip_code: String,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub status: String,
    pub match_score: Option<f64>,
    pub distance_miles: Option<f64>,
    pub created_at: Option<String>,
}
