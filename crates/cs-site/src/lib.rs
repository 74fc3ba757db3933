//! City records, resolution, and search-engine documents for citysite.
//!
//! This crate provides:
//! - [`Cities`]: slug resolution and city/state enumeration over a content source
//! - [`CityRecord`] and friends: the JSON content model
//! - [`sitemap`] and [`robots`]: text generators for root, state, and city hosts
//! - [`states`]: the fixed table of 50 US states
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use cs_site::Cities;
//! use cs_storage::{ArchiveSource, DirSource, LayeredSource};
//!
//! let source = LayeredSource::new(
//!     ArchiveSource::new("data/cities.zip"),
//!     DirSource::new("data/cities"),
//! );
//! let cities = Cities::new(Arc::new(source));
//!
//! if let Some(city) = cities.resolve("austin-tx") {
//!     println!("{}, {}", city.city, city.state_name);
//! }
//! for state in cities.summarize_states() {
//!     println!("{} ({})", state.state_name, state.count);
//! }
//! ```

mod cities;
mod record;
pub mod robots;
pub mod sitemap;
pub mod states;

pub use cities::Cities;
pub use record::{
    About, CityLink, CityRecord, Faq, Hero, InfoBox, NearbyCity, PageMeta, Point, Review, Service,
    ServiceHero, ServicesSection, Stat, StateSummary, WhyChooseUs,
};
