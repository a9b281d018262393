//! Typed client and toolkit for the Propertifi property-manager directory:
//! trust scoring, fee estimates, chart geometry, lead wizards and the
//! list/detail fetchers behind the `propertifi` CLI.

pub mod api;
pub mod browser;
pub mod chart;
pub mod config;
pub mod credentials;
pub mod fetch;
pub mod output;
pub mod scoring;
pub mod search;
pub mod wizard;
