//! Read-side loading: per-region load state, concurrent page loads and
//! scored manager lists.

use futures::future::{BoxFuture, FutureExt};
use futures::stream::{FuturesUnordered, StreamExt};
use std::collections::HashSet;

use crate::api::endpoints::{self, BlogQuery, Length};
use crate::api::{
    ApiClient, ApiError, Blog, CityListing, Faq, ManagerFilters, Page, PageMeta, PropertyManager,
    StateListing, Testimonial,
};
use crate::scoring::{calculate_trust_score, ScoreInput, ScoreOutput, TrustScoreConfig};

const HOME_PAGE_ID: u64 = 1;

/// What one region of a page currently shows.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadState<T> {
    Loading,
    Loaded(T),
    /// The call succeeded with nothing to show
    Empty,
    /// The call failed; holds the message to display
    Failed(String),
}

/// Payloads that can come back successfully yet empty.
pub trait Payload {
    fn is_empty_payload(&self) -> bool;
}

impl<T> Payload for Vec<T> {
    fn is_empty_payload(&self) -> bool {
        self.is_empty()
    }
}

impl Payload for StateListing {
    fn is_empty_payload(&self) -> bool {
        self.states.is_empty()
    }
}

impl Payload for CityListing {
    fn is_empty_payload(&self) -> bool {
        self.cities.is_empty()
    }
}

impl Payload for Page {
    fn is_empty_payload(&self) -> bool {
        false
    }
}

impl<T: Payload> LoadState<T> {
    pub fn from_result(result: Result<T, ApiError>) -> Self {
        match result {
            Ok(v) if v.is_empty_payload() => LoadState::Empty,
            Ok(v) => LoadState::Loaded(v),
            Err(e) => LoadState::Failed(e.user_message()),
        }
    }

    /// Same as [`LoadState::from_result`] with `None` counted as empty.
    pub fn from_optional(result: Result<Option<T>, ApiError>) -> Self {
        match result {
            Ok(None) => LoadState::Empty,
            Ok(Some(v)) => Self::from_result(Ok(v)),
            Err(e) => LoadState::Failed(e.user_message()),
        }
    }
}

impl<T> LoadState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn loaded(&self) -> Option<&T> {
        match self {
            LoadState::Loaded(v) => Some(v),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            LoadState::Failed(msg) => Some(msg),
            _ => None,
        }
    }
}

/// Every region of the home page. Regions load and fail independently.
#[derive(Debug, Clone, PartialEq)]
pub struct HomePage {
    pub page: LoadState<Page>,
    pub blogs: LoadState<Vec<Blog>>,
    pub testimonials: LoadState<Vec<Testimonial>>,
    pub faqs: LoadState<Vec<Faq>>,
    pub states: LoadState<StateListing>,
    pub cities: LoadState<CityListing>,
}

impl Default for HomePage {
    fn default() -> Self {
        Self {
            page: LoadState::Loading,
            blogs: LoadState::Loading,
            testimonials: LoadState::Loading,
            faqs: LoadState::Loading,
            states: LoadState::Loading,
            cities: LoadState::Loading,
        }
    }
}

enum Region {
    Page(Result<Option<Page>, ApiError>),
    Blogs(Result<Vec<Blog>, ApiError>),
    Testimonials(Result<Vec<Testimonial>, ApiError>),
    Faqs(Result<Vec<Faq>, ApiError>),
    States(Result<StateListing, ApiError>),
}

/// Issue the home page's independent reads concurrently, then the one
/// chained read (cities of the first state). Each call gets one attempt.
pub async fn load_home_page(client: &ApiClient) -> HomePage {
    let mut home = HomePage::default();

    let mut futures: FuturesUnordered<BoxFuture<'_, Region>> = FuturesUnordered::new();
    futures.push(async move { Region::Page(endpoints::page(client, HOME_PAGE_ID).await) }.boxed());
    futures.push(
        async move { Region::Blogs(endpoints::blogs(client, &BlogQuery::Featured).await) }.boxed(),
    );
    futures.push(async move { Region::Testimonials(endpoints::testimonials(client).await) }.boxed());
    futures.push(async move { Region::Faqs(endpoints::faqs(client).await) }.boxed());
    futures.push(async move { Region::States(endpoints::states(client, Length::Half).await) }.boxed());

    while let Some(region) = futures.next().await {
        match region {
            Region::Page(r) => home.page = LoadState::from_optional(r),
            Region::Blogs(r) => home.blogs = LoadState::from_result(r),
            Region::Testimonials(r) => home.testimonials = LoadState::from_result(r),
            Region::Faqs(r) => home.faqs = LoadState::from_result(r),
            Region::States(r) => home.states = LoadState::from_result(r),
        }
    }

    home.cities = match home.states.loaded() {
        Some(listing) => load_cities_for_first_state(client, listing).await,
        None => LoadState::Empty,
    };

    for (name, failed) in [
        ("page", home.page.error()),
        ("blogs", home.blogs.error()),
        ("testimonials", home.testimonials.error()),
        ("faqs", home.faqs.error()),
        ("states", home.states.error()),
        ("cities", home.cities.error()),
    ] {
        if let Some(msg) = failed {
            log::warn!("home page region {} failed: {}", name, msg);
        }
    }

    home
}

/// The chained read: cities of the listing's first state.
pub async fn load_cities_for_first_state(client: &ApiClient, listing: &StateListing) -> LoadState<CityListing> {
    let first = listing.first_state.as_ref().or_else(|| listing.states.first());
    match first {
        Some(state) => LoadState::from_result(endpoints::cities(client, state.id, Length::Half).await),
        None => LoadState::Empty,
    }
}

/// A manager with its trust score.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredManager {
    pub manager: PropertyManager,
    pub score: ScoreOutput,
}

/// Score managers and sort by trust score descending, ties by name.
/// Managers that appear twice are kept once. Rows without an id are
/// never treated as duplicates.
pub fn score_managers(managers: Vec<PropertyManager>, scoring: &TrustScoreConfig) -> Vec<ScoredManager> {
    let mut seen = HashSet::new();
    let mut scored: Vec<ScoredManager> = managers
        .into_iter()
        .filter(|m| m.id == 0 || seen.insert(m.id))
        .map(|manager| {
            let score = calculate_trust_score(&ScoreInput::from(&manager), scoring);
            ScoredManager { manager, score }
        })
        .collect();

    scored.sort_by(|a, b| {
        b.score
            .score
            .total_cmp(&a.score.score)
            .then_with(|| a.manager.name.cmp(&b.manager.name))
    });
    scored
}

/// Fetch one page of the directory and score it. With an explicit `sort`
/// the server's order is kept.
pub async fn load_managers(
    client: &ApiClient,
    filters: &ManagerFilters,
    scoring: &TrustScoreConfig,
) -> Result<(Vec<ScoredManager>, Option<PageMeta>), ApiError> {
    let envelope = endpoints::property_managers(client, filters).await?;
    log::debug!("fetched {} managers", envelope.data.len());

    let scored = if filters.sort.is_some() {
        envelope
            .data
            .into_iter()
            .map(|manager| {
                let score = calculate_trust_score(&ScoreInput::from(&manager), scoring);
                ScoredManager { manager, score }
            })
            .collect()
    } else {
        score_managers(envelope.data, scoring)
    };

    Ok((scored, envelope.meta))
}
