//! `robots.txt` generation for root, state, and city hosts.

use std::fmt::Write as _;

/// Crawlers refused on every host.
pub const BLOCKED_AI_CRAWLERS: [&str; 14] = [
    "GPTBot",
    "Google-Extended",
    "ClaudeBot",
    "Amazonbot",
    "Applebot-Extended",
    "Bytespider",
    "CCBot",
    "meta-externalagent",
    "Diffbot",
    "omgili",
    "omgilibot",
    "FacebookBot",
    "anthropic-ai",
    "cohere-ai",
];

const BASE_DISALLOW: [&str; 4] = ["/_next/", "/api/", "/data/", "/*.json$"];
const INTERNAL_DISALLOW: [&str; 2] = ["/city-sites/", "/state-sites/"];
const HOST_SITEMAPS: [&str; 3] = ["sitemap.xml", "sitemap-index.xml", "main-sitemap.xml"];

struct RobotsFile<'a> {
    host: String,
    description: &'a str,
    allow: &'a [&'a str],
    disallow: Vec<&'a str>,
    sitemaps: Vec<&'a str>,
    host_directive: bool,
}

impl RobotsFile<'_> {
    fn render(&self) -> String {
        let mut out = String::new();
        let rule = "=".repeat(60);
        let _ = writeln!(out, "# {rule}");
        let _ = writeln!(out, "# robots.txt - {}", self.host);
        let _ = writeln!(out, "# {}", self.description);
        let _ = writeln!(out, "# {rule}");
        out.push('\n');

        out.push_str(
            "# Content signals\n\
             # search:   YES - index pages and return results\n\
             # ai-input: NO  - do not use content for real-time AI answers\n\
             # ai-train: NO  - do not train AI/ML models on this content\n\
             #\n\
             # ANY RESTRICTIONS ARE EXPRESS RESERVATIONS OF RIGHTS UNDER\n\
             # ARTICLE 4, EU DIRECTIVE 2019/790 (DSM COPYRIGHT DIRECTIVE).\n\n",
        );

        out.push_str("# Default: allow legitimate crawlers\nUser-agent: *\n");
        for path in self.allow {
            let _ = writeln!(out, "Allow: {path}");
        }
        for path in &self.disallow {
            let _ = writeln!(out, "Disallow: {path}");
        }
        out.push('\n');

        out.push_str("# Block AI training and scraping bots\n");
        for agent in BLOCKED_AI_CRAWLERS {
            let _ = writeln!(out, "User-agent: {agent}\nDisallow: /\n");
        }

        out.push_str("# Sitemaps\n");
        for sitemap in &self.sitemaps {
            let _ = writeln!(out, "Sitemap: {}/{sitemap}", self.host);
        }
        if self.host_directive {
            let _ = writeln!(out, "\nHost: {}", self.host);
        }
        out
    }
}

/// `robots.txt` for the root domain.
#[must_use]
pub fn root_robots(root_domain: &str) -> String {
    RobotsFile {
        host: format!("https://{root_domain}"),
        description: "Root plumbing directory",
        allow: &["/"],
        disallow: BASE_DISALLOW.into_iter().chain(INTERNAL_DISALLOW).collect(),
        sitemaps: HOST_SITEMAPS.to_vec(),
        host_directive: true,
    }
    .render()
}

/// `robots.txt` for a state subdomain.
#[must_use]
pub fn state_robots(root_domain: &str, state: &str) -> String {
    RobotsFile {
        host: format!("https://{}.{root_domain}", state.to_lowercase()),
        description: "State-level plumbing directory subdomain",
        allow: &["/"],
        disallow: BASE_DISALLOW.to_vec(),
        sitemaps: HOST_SITEMAPS.to_vec(),
        host_directive: false,
    }
    .render()
}

/// `robots.txt` for a city subdomain.
#[must_use]
pub fn city_robots(root_domain: &str, slug: &str) -> String {
    RobotsFile {
        host: format!("https://{}.{root_domain}", slug.to_lowercase()),
        description: "City-level plumbing service subdomain",
        allow: &["/", "/services/", "/about", "/contact"],
        disallow: BASE_DISALLOW.to_vec(),
        sitemaps: HOST_SITEMAPS
            .into_iter()
            .chain(["services-sitemap.xml"])
            .collect(),
        host_directive: false,
    }
    .render()
}
