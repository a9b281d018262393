use std::time::Duration;

use tokio::sync::mpsc;

use crate::api::{Agent, Blog, Faq, LocationResult, PropertyManager, Testimonial};
use crate::fetch::ScoredManager;

/// The text fields a list can be searched by.
pub trait Searchable {
    fn search_fields(&self) -> Vec<&str>;
}

impl Searchable for PropertyManager {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.city.as_str(), self.state.as_str()]
    }
}

impl Searchable for ScoredManager {
    fn search_fields(&self) -> Vec<&str> {
        self.manager.search_fields()
    }
}

impl Searchable for Agent {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.company_name.as_str(), self.about.as_deref().unwrap_or_default()]
    }
}

impl Searchable for Blog {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.heading.as_str(), self.description.as_str()]
    }
}

impl Searchable for Faq {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.question.as_str(), self.answer.as_str()]
    }
}

impl Searchable for Testimonial {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.heading.as_str(), self.designation.as_str(), self.description.as_str()]
    }
}

impl Searchable for LocationResult {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.city.as_str(), self.state.as_str(), self.state_code.as_str()]
    }
}

/// Case-insensitive substring match against any search field. A blank
/// query matches everything.
pub fn matches<T: Searchable>(item: &T, query: &str) -> bool {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    item.search_fields()
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
}

pub fn filter<'a, T: Searchable>(items: &'a [T], query: &str) -> Vec<&'a T> {
    items.iter().filter(|item| matches(*item, query)).collect()
}

/// Forward only the latest value once `quiet` has passed without a new one.
/// A zero `quiet` forwards every value as it arrives. The returned channel
/// closes after the input closes and the last pending value is delivered.
pub fn debounce<T: Send + 'static>(mut input: mpsc::Receiver<T>, quiet: Duration) -> mpsc::Receiver<T> {
    let (tx, output) = mpsc::channel(16);

    tokio::spawn(async move {
        while let Some(mut latest) = input.recv().await {
            if !quiet.is_zero() {
                loop {
                    tokio::select! {
                        next = input.recv() => match next {
                            Some(value) => latest = value,
                            None => break,
                        },
                        _ = tokio::time::sleep(quiet) => break,
                    }
                }
            }
            if tx.send(latest).await.is_err() {
                return;
            }
        }
    });

    output
}
