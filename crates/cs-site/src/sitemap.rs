//! XML sitemap generation for root, state, and city hosts.
//!
//! All URLs are absolute `https://` URLs built from the configured root
//! domain. `lastmod` values are sampled from a trailing window ending at the
//! supplied `now` to nudge crawlers into revisiting.

use std::fmt::Write as _;

use chrono::{DateTime, TimeDelta, Utc};
use quick_xml::escape::escape;

use crate::record::CityRecord;
use crate::states::state_codes;

/// Width of the window `lastmod` values are sampled from, in seconds (5 days).
pub const LASTMOD_WINDOW_SECS: i64 = 5 * 24 * 60 * 60;

const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// How often a page is expected to change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeFreq {
    Weekly,
    Monthly,
}

impl ChangeFreq {
    fn as_str(self) -> &'static str {
        match self {
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }
}

/// One `<url>` entry of a `<urlset>`.
#[derive(Debug, Clone, PartialEq)]
pub struct UrlEntry {
    pub loc: String,
    pub lastmod: String,
    pub changefreq: ChangeFreq,
    pub priority: f32,
}

/// One `<sitemap>` entry of a `<sitemapindex>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    pub loc: String,
    pub lastmod: String,
}

/// Format a timestamp as RFC 3339 seconds with an explicit `+00:00` offset.
#[must_use]
pub fn format_lastmod(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%dT%H:%M:%S+00:00").to_string()
}

/// Sample a `lastmod` uniformly from the trailing window ending at `now`.
#[must_use]
pub fn random_lastmod(now: DateTime<Utc>) -> String {
    let offset = rand::random_range(0..=LASTMOD_WINDOW_SECS);
    format_lastmod(now - TimeDelta::seconds(offset))
}

/// Render a `<urlset>` document.
#[must_use]
pub fn render_urlset(entries: &[UrlEntry]) -> String {
    let mut xml = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    let _ = writeln!(xml, "<urlset xmlns=\"{SITEMAP_NS}\">");
    for entry in entries {
        let _ = write!(
            xml,
            "  <url>\n    <loc>{}</loc>\n    <lastmod>{}</lastmod>\n    \
             <changefreq>{}</changefreq>\n    <priority>{:.1}</priority>\n  </url>\n",
            escape(entry.loc.as_str()),
            escape(entry.lastmod.as_str()),
            entry.changefreq.as_str(),
            entry.priority,
        );
    }
    xml.push_str("</urlset>\n");
    xml
}

/// Render a `<sitemapindex>` document.
#[must_use]
pub fn render_sitemap_index(entries: &[IndexEntry]) -> String {
    let mut xml = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    let _ = writeln!(xml, "<sitemapindex xmlns=\"{SITEMAP_NS}\">");
    for entry in entries {
        let _ = write!(
            xml,
            "  <sitemap>\n    <loc>{}</loc>\n    <lastmod>{}</lastmod>\n  </sitemap>\n",
            escape(entry.loc.as_str()),
            escape(entry.lastmod.as_str()),
        );
    }
    xml.push_str("</sitemapindex>\n");
    xml
}

fn url(loc: String, lastmod: String, changefreq: ChangeFreq, priority: f32) -> UrlEntry {
    UrlEntry {
        loc,
        lastmod,
        changefreq,
        priority,
    }
}

/// Entries for the root host: the root page, then every state home and
/// state sitemap sharing one `lastmod` per state.
#[must_use]
pub fn root_entries(root_domain: &str, now: DateTime<Utc>) -> Vec<UrlEntry> {
    let mut entries = vec![url(
        format!("https://{root_domain}/"),
        random_lastmod(now),
        ChangeFreq::Weekly,
        1.0,
    )];
    for code in state_codes() {
        let lastmod = random_lastmod(now);
        let host = format!("https://{code}.{root_domain}");
        entries.push(url(format!("{host}/"), lastmod.clone(), ChangeFreq::Weekly, 0.8));
        entries.push(url(format!("{host}/sitemap.xml"), lastmod, ChangeFreq::Weekly, 0.6));
    }
    entries
}

/// Sitemap index for the root host: the main sitemap and all 50 state sitemaps.
#[must_use]
pub fn root_index_entries(root_domain: &str, now: DateTime<Utc>) -> Vec<IndexEntry> {
    let lastmod = format_lastmod(now);
    std::iter::once(format!("https://{root_domain}/main-sitemap.xml"))
        .chain(state_codes().map(|code| format!("https://{code}.{root_domain}/sitemap.xml")))
        .map(|loc| IndexEntry {
            loc,
            lastmod: lastmod.clone(),
        })
        .collect()
}

/// Entries for a state host, or `None` when the state has no cities.
#[must_use]
pub fn state_entries(
    root_domain: &str,
    state: &str,
    cities: &[CityRecord],
    now: DateTime<Utc>,
) -> Option<Vec<UrlEntry>> {
    if cities.is_empty() {
        return None;
    }
    let state = state.to_lowercase();
    let mut entries = vec![url(
        format!("https://{state}.{root_domain}/"),
        random_lastmod(now),
        ChangeFreq::Weekly,
        1.0,
    )];
    for city in cities {
        let lastmod = random_lastmod(now);
        let host = format!("https://{}.{root_domain}", city.slug);
        entries.push(url(format!("{host}/"), lastmod.clone(), ChangeFreq::Weekly, 0.8));
        entries.push(url(format!("{host}/sitemap.xml"), lastmod, ChangeFreq::Weekly, 0.6));
    }
    Some(entries)
}

/// Sitemap index for a state host, or `None` when the state has no cities.
#[must_use]
pub fn state_index_entries(
    root_domain: &str,
    state: &str,
    cities: &[CityRecord],
    now: DateTime<Utc>,
) -> Option<Vec<IndexEntry>> {
    if cities.is_empty() {
        return None;
    }
    let state = state.to_lowercase();
    let lastmod = format_lastmod(now);
    let entries = std::iter::once(format!("https://{state}.{root_domain}/main-sitemap.xml"))
        .chain(
            cities
                .iter()
                .map(|city| format!("https://{}.{root_domain}/sitemap.xml", city.slug)),
        )
        .map(|loc| IndexEntry {
            loc,
            lastmod: lastmod.clone(),
        })
        .collect();
    Some(entries)
}

/// Entries for a city host: home, about, contact, the services listing, and
/// every service page.
#[must_use]
pub fn city_entries(root_domain: &str, city: &CityRecord, now: DateTime<Utc>) -> Vec<UrlEntry> {
    let base = format!("https://{}.{root_domain}", city.slug);
    let mut entries = vec![
        url(format!("{base}/"), random_lastmod(now), ChangeFreq::Weekly, 1.0),
        url(format!("{base}/about"), random_lastmod(now), ChangeFreq::Monthly, 0.8),
        url(format!("{base}/contact"), random_lastmod(now), ChangeFreq::Monthly, 0.8),
        url(format!("{base}/services/"), random_lastmod(now), ChangeFreq::Weekly, 0.9),
    ];
    for service in &city.services {
        entries.push(url(
            format!("{base}/services/{}", service.service_id),
            random_lastmod(now),
            ChangeFreq::Monthly,
            0.7,
        ));
    }
    entries
}
