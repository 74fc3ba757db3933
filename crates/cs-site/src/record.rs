//! City record model.
//!
//! A [`CityRecord`] is the full content document for one city landing site.
//! Only the identity fields are required; every content block defaults to
//! empty so older data files still decode.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Content document for one city, keyed by `slug` (e.g. `"austin-tx"`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityRecord {
    /// Unique lowercase identifier, `<city>-<state-code>`.
    pub slug: String,
    /// Display name of the city.
    pub city: String,
    /// Two-letter state code as stored (usually uppercase).
    pub state: String,
    /// Full state name.
    pub state_name: String,
    #[serde(default)]
    pub county_name: String,
    #[serde(default)]
    pub lat: f64,
    #[serde(default)]
    pub lng: f64,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub meta: PageMeta,
    #[serde(default)]
    pub hero: Hero,
    #[serde(default)]
    pub trust_bar: Vec<String>,
    #[serde(default)]
    pub about: About,
    #[serde(default)]
    pub why_choose_us: WhyChooseUs,
    #[serde(default)]
    pub stats: Vec<Stat>,
    #[serde(default)]
    pub services_section: ServicesSection,
    #[serde(default)]
    pub zip_codes: Vec<String>,
    /// Cross-links to nearby city sites. Targets may not exist.
    #[serde(default)]
    pub nearby_cities: Vec<NearbyCity>,
    #[serde(default)]
    pub faqs: Vec<Faq>,
    #[serde(default)]
    pub service_area_text: String,
    #[serde(default)]
    pub reviews: Vec<Review>,
    #[serde(default)]
    pub services: Vec<Service>,
}

impl CityRecord {
    /// Find a service by its identifier.
    #[must_use]
    pub fn service(&self, service_id: &str) -> Option<&Service> {
        self.services.iter().find(|s| s.service_id == service_id)
    }

    /// Whether this city belongs to the given state code (case-insensitive).
    #[must_use]
    pub fn in_state(&self, code: &str) -> bool {
        self.state.eq_ignore_ascii_case(code)
    }
}

/// SEO metadata for a page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageMeta {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Hero {
    pub badge_text: String,
    pub h1_highlight: String,
    pub h1_main: String,
    pub subheadline: String,
    pub cta_label: String,
    pub hero_image_alt: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct About {
    pub badge: String,
    pub h2: String,
    pub body_paragraphs: Vec<String>,
    pub residential_box: InfoBox,
    pub commercial_box: InfoBox,
    pub badge_stat: String,
    pub badge_label: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InfoBox {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WhyChooseUs {
    pub badge: String,
    pub h2: String,
    pub body: String,
    pub points: Vec<Point>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Point {
    pub label: String,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Stat {
    pub val: String,
    pub label: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServicesSection {
    pub h2_prefix: String,
    pub intro: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Faq {
    pub q: String,
    pub a: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Review {
    pub id: u64,
    pub source: String,
    pub author: String,
    pub date: String,
    pub text: String,
    pub rating: f64,
}

/// Weak reference to another city site, used only for cross-linking.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NearbyCity {
    pub name: String,
    pub slug: String,
    pub state: String,
}

/// Service offered in a city. `service_id` is unique within its city.
///
/// Content sections beyond the identity and hero are kept verbatim in
/// `sections` and serialized back inline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub service_id: String,
    #[serde(default)]
    pub service_title: String,
    #[serde(default)]
    pub hero: ServiceHero,
    #[serde(flatten)]
    pub sections: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceHero {
    #[serde(default)]
    pub subheadline: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Derived per-state aggregate. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateSummary {
    /// State code as grouped (uppercase).
    pub state: String,
    /// Full state name taken from the first city in the group.
    pub state_name: String,
    /// Number of cities in the state.
    pub count: usize,
}

/// Short city entry used in state listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CityLink {
    pub city: String,
    pub slug: String,
    pub county_name: String,
}

impl From<&CityRecord> for CityLink {
    fn from(record: &CityRecord) -> Self {
        Self {
            city: record.city.clone(),
            slug: record.slug.clone(),
            county_name: record.county_name.clone(),
        }
    }
}
