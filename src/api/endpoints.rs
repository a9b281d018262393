//! Typed calls for every endpoint the sites use.

use serde_json::json;

use super::client::{Ack, ApiClient, Envelope, Query};
use super::error::ApiError;
use super::types::*;

/// How many rows a legacy list returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Length {
    /// The short list shown on the home page
    Half,
    Full,
}

impl Length {
    fn as_str(self) -> &'static str {
        match self {
            Length::Half => "Half",
            Length::Full => "Full",
        }
    }
}

/// Which blog rows to list.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum BlogQuery {
    /// The three most recent posts
    #[default]
    Featured,
    All {
        category_id: Option<u64>,
        search: Option<String>,
    },
}

// -- legacy content --

pub async fn page(client: &ApiClient, page_id: u64) -> Result<Option<Page>, ApiError> {
    client.legacy("page/get", &json!({ "page_id": page_id }), "pageData").await
}

pub async fn blogs(client: &ApiClient, query: &BlogQuery) -> Result<Vec<Blog>, ApiError> {
    let body = match query {
        BlogQuery::Featured => json!({ "type": "Featured" }),
        BlogQuery::All { category_id, search } => json!({
            "type": "All",
            "blog_cate_id": category_id.map(|c| c.to_string()).unwrap_or_default(),
            "search_key": search.clone().unwrap_or_default(),
        }),
    };
    client.legacy("blogs/list", &body, "blogs").await
}

pub async fn blog(client: &ApiClient, slug: &str) -> Result<Blog, ApiError> {
    client.legacy("blog/get", &json!({ "slug": slug }), "blog").await
}

pub async fn blog_categories(client: &ApiClient) -> Result<Vec<BlogCategory>, ApiError> {
    client.legacy("blog-category/list", &json!({}), "blogCategories").await
}

pub async fn faqs(client: &ApiClient) -> Result<Vec<Faq>, ApiError> {
    client.legacy("faq/list", &json!({ "type": "All" }), "faqs").await
}

pub async fn testimonials(client: &ApiClient) -> Result<Vec<Testimonial>, ApiError> {
    client
        .legacy("testimonial/list", &json!({ "type": "Featured" }), "testimonials")
        .await
}

pub async fn testimonial(client: &ApiClient, id: u64) -> Result<Testimonial, ApiError> {
    client.legacy("testimonial/get", &json!({ "id": id }), "testimonial").await
}

pub async fn states(client: &ApiClient, length: Length) -> Result<StateListing, ApiError> {
    client
        .legacy_body(
            "state/code/list",
            &json!({ "type": "Featured", "length": length.as_str() }),
        )
        .await
}

pub async fn cities(client: &ApiClient, state_id: u64, length: Length) -> Result<CityListing, ApiError> {
    client
        .legacy_body(
            "city/list",
            &json!({ "state_id": state_id, "length": length.as_str() }),
        )
        .await
}

/// Managers in a city. `state` is the state's abbreviation slug and `city`
/// the city slug; `category_id` is the legacy property category.
pub async fn agents(
    client: &ApiClient,
    category_id: u32,
    state: &str,
    city: &str,
) -> Result<AgentListing, ApiError> {
    client
        .legacy_body(
            "agents/list",
            &json!({ "cate_id": category_id, "state": state, "city": city }),
        )
        .await
}

pub async fn agent(client: &ApiClient, slug: &str, state: &str, city: &str) -> Result<AgentDetail, ApiError> {
    client
        .legacy_body(
            "agent/get",
            &json!({ "agent_id": slug, "state": state, "city": city }),
        )
        .await
}

pub async fn questions(client: &ApiClient, category: &str) -> Result<Vec<Question>, ApiError> {
    client
        .legacy("question/list", &json!({ "type": category }), "questions")
        .await
}

// -- legacy writes --

pub async fn register_agent(client: &ApiClient, registration: &AgentRegistration) -> Result<Ack, ApiError> {
    client.legacy_write("agent/save", registration).await
}

pub async fn save_lead(client: &ApiClient, lead: &LegacyLeadRequest) -> Result<Ack, ApiError> {
    client.legacy_write("lead/save", lead).await
}

pub async fn send_contact(client: &ApiClient, contact: &ContactRequest) -> Result<Ack, ApiError> {
    client.legacy_write("contact/save", contact).await
}

pub async fn subscribe_newsletter(client: &ApiClient, email: &str) -> Result<Ack, ApiError> {
    client
        .legacy_write("newsletter/save", &json!({ "email_address": email }))
        .await
}

// -- REST --

pub async fn preferences(client: &ApiClient) -> Result<Preferences, ApiError> {
    Ok(client.get("v1/preferences", &Query::new()).await?.data)
}

pub async fn update_preferences(client: &ApiClient, prefs: &Preferences) -> Result<Preferences, ApiError> {
    Ok(client.put("v1/preferences", prefs).await?.data)
}

pub async fn pm_leads(client: &ApiClient, status: Option<&str>, page: Option<u32>) -> Result<Envelope<Vec<PmLead>>, ApiError> {
    let query = Query::new().param("status", status).param("page", page);
    client.get("v1/pm/leads", &query).await
}

pub async fn submit_lead(client: &ApiClient, lead: &LeadSubmission) -> Result<Envelope<LeadConfirmation>, ApiError> {
    client.post("home-page-lead", lead).await
}

pub fn manager_query(filters: &ManagerFilters) -> Query {
    Query::new()
        .param("state", filters.state.as_deref())
        .param("city", filters.city.as_deref())
        .param("search", filters.search.as_deref().filter(|s| !s.trim().is_empty()))
        .list("property_types", &filters.property_types)
        .param("min_rating", filters.min_rating.as_deref())
        .param("min_experience", filters.min_experience)
        .list("services", &filters.services)
        .param("sort", filters.sort.as_deref())
        .param("page", filters.page)
        .param("per_page", filters.per_page)
}

pub async fn property_managers(
    client: &ApiClient,
    filters: &ManagerFilters,
) -> Result<Envelope<Vec<PropertyManager>>, ApiError> {
    client.get("property-managers", &manager_query(filters)).await
}

pub async fn locations(client: &ApiClient, search: &str) -> Result<Vec<LocationResult>, ApiError> {
    let query = Query::new().param("search", Some(search.trim()));
    Ok(client.get("property-managers/locations", &query).await?.data)
}
