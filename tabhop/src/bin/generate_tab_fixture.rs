//! Generate a synthetic tab list as JSON for manual runs and benchmarks.
//!
//! Usage:
//!     cargo run --release --bin generate-tab-fixture [count] [output_path]
//!
//! Default: 200 tabs written to ../distribution/synthetic_tabs.json

use rand::seq::SliceRandom;
use rand::Rng;
use std::env;
use std::path::PathBuf;
use tabhop::TabInfo;

/// Default number of tabs to generate
const DEFAULT_COUNT: usize = 200;

/// Share of tabs that are pinned / playing audio / muted
const PINNED_RATIO: f64 = 0.08;
const AUDIBLE_RATIO: f64 = 0.05;
const MUTED_RATIO: f64 = 0.03;

/// (site name, host) pairs for realistic titles and URLs
const SITES: &[(&str, &str)] = &[
    ("GitHub", "github.com"),
    ("Gmail", "mail.google.com"),
    ("YouTube", "www.youtube.com"),
    ("Stack Overflow", "stackoverflow.com"),
    ("Wikipédia", "fr.wikipedia.org"),
    ("docs.rs", "docs.rs"),
    ("Hacker News", "news.ycombinator.com"),
    ("Le Monde", "www.lemonde.fr"),
    ("Spotify", "open.spotify.com"),
    ("Jira", "tabhop.atlassian.net"),
];

/// Words used to build page titles, accented ones included on purpose
const TITLE_WORDS: &[&str] = &[
    "release", "notes", "crème", "brûlée", "résumé", "design", "document", "pull", "request",
    "issue", "café", "naïve", "façade", "über", "roadmap", "meeting", "agenda", "playlist",
    "tutorial", "grapheme", "unicode", "benchmark", "Œuvres", "München", "señor", "déjà", "vu",
];

fn title_for(rng: &mut impl Rng, site: &str) -> String {
    let count = rng.gen_range(2..=6);
    let words: Vec<&str> = (0..count)
        .map(|_| *TITLE_WORDS.choose(rng).unwrap_or(&"page"))
        .collect();
    format!("{} - {}", words.join(" "), site)
}

fn main() {
    let args: Vec<String> = env::args().collect();

    let count = args
        .get(1)
        .map(|s| s.parse::<usize>().expect("count must be a number"))
        .unwrap_or(DEFAULT_COUNT);

    let output_path = if args.len() > 2 {
        PathBuf::from(&args[2])
    } else {
        let manifest_dir = env!("CARGO_MANIFEST_DIR");
        PathBuf::from(manifest_dir)
            .parent()
            .unwrap()
            .join("distribution")
            .join("synthetic_tabs.json")
    };

    if let Some(parent) = output_path.parent() {
        std::fs::create_dir_all(parent).expect("Failed to create output directory");
    }

    println!("Generating {} synthetic tabs...", count);

    let mut rng = rand::thread_rng();
    let active = if count > 0 { rng.gen_range(0..count) } else { 0 };

    let tabs: Vec<TabInfo> = (0..count)
        .map(|i| {
            let (site, host) = SITES[rng.gen_range(0..SITES.len())];
            let title = title_for(&mut rng, site);
            let slug = title
                .split_whitespace()
                .take(3)
                .collect::<Vec<_>>()
                .join("-")
                .to_lowercase();
            TabInfo {
                id: i as i64 + 1,
                title,
                url: format!("https://{}/{}", host, slug),
                active: i == active,
                pinned: rng.gen_bool(PINNED_RATIO),
                audible: rng.gen_bool(AUDIBLE_RATIO),
                muted: rng.gen_bool(MUTED_RATIO),
            }
        })
        .collect();

    let json = serde_json::to_string_pretty(&tabs).expect("Failed to serialize tabs");
    std::fs::write(&output_path, json).expect("Failed to write fixture");

    println!();
    println!("Fixture created: {}", output_path.display());
    println!("  Tabs: {}", tabs.len());
    println!("  Pinned: {}", tabs.iter().filter(|t| t.pinned).count());
    println!(
        "  With audio: {}",
        tabs.iter().filter(|t| t.has_audio()).count()
    );
}
