//! Tool handlers. Each one takes plain string arguments and always returns
//! a report string; the MCP layer and the CLI are thin wrappers over these.

use crate::dates::{self, Clock};
use crate::envelope::{error_text, warning_hint, ErrorCode};
use crate::format::Report;
use chrono::{Datelike, Days, NaiveDate};
use futures::future::join_all;
use futures::FutureExt;
use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use trivia_core::{classify, is_http_url, Category, Outcome, SourceRecord};
use trivia_local::{SourceConfig, Sources};

pub const TOOL_NAMES: &[&str] = &[
    "research_trivia_topic",
    "trivia_for_today",
    "trivia_for_week",
    "search_entertainment_trivia",
    "search_sports_trivia",
    "search_geography_trivia",
    "search_science_trivia",
    "search_trivia",
    "fetch_trivia_from_url",
];

const WEB_RESULTS: usize = 5;
const ARTICLE_RESULTS: usize = 5;
const TODAY_MOVIE_RESULTS: usize = 4;
const WEEK_ENTERTAINMENT_RESULTS: usize = 5;
const CELEBRITY_RESULTS_PER_QUERY: usize = 5;
const ARTICLE_SEARCH_LIMIT: usize = 3;
const ARTICLE_SUMMARIES: usize = 2;

const TODAY_BIRTHS: usize = 12;
const TODAY_EVENTS: usize = 8;
const TODAY_DEATHS: usize = 6;
const TODAY_CELEBRITIES: usize = 8;
const WEEK_BIRTHS_PER_DAY: usize = 2;
const WEEK_EVENTS_PER_DAY: usize = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Depth {
    Normal,
    Deep,
}

impl Depth {
    /// Anything other than "deep" is normal.
    pub fn parse(s: &str) -> Self {
        if s.trim().eq_ignore_ascii_case("deep") {
            Self::Deep
        } else {
            Self::Normal
        }
    }
}

impl fmt::Display for Depth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Normal => "normal",
            Self::Deep => "deep",
        })
    }
}

/// One sub-category of a domain, selected by an exact hint word.
///
/// `suffix` shapes the main web query, `follow_up` a second web query, and
/// `article_suffix` the encyclopedia title search.
struct Variant {
    keys: &'static [&'static str],
    suffix: &'static str,
    follow_up: &'static str,
    article_suffix: &'static str,
}

const fn variant(
    keys: &'static [&'static str],
    suffix: &'static str,
    follow_up: &'static str,
) -> Variant {
    Variant {
        keys,
        suffix,
        follow_up,
        article_suffix: "",
    }
}

const fn titled(variant: Variant, article_suffix: &'static str) -> Variant {
    Variant {
        article_suffix,
        ..variant
    }
}

struct Domain {
    category: Category,
    label: &'static str,
    fallback: Variant,
    variants: &'static [Variant],
}

const DOMAINS: &[Domain] = &[
    Domain {
        category: Category::Entertainment,
        label: "ENTERTAINMENT TRIVIA",
        fallback: variant(&[], " movie tv oscar", " pop culture facts"),
        variants: &[
            titled(
                variant(
                    &["movie", "movies", "film"],
                    " movie trivia facts",
                    " film behind the scenes",
                ),
                " film",
            ),
            titled(
                variant(
                    &["tv", "television", "show"],
                    " tv show trivia",
                    " television series facts",
                ),
                " TV series",
            ),
            variant(&["music", "song", "album"], " music trivia facts", " song history"),
            titled(
                variant(
                    &["oscar", "oscars", "academy", "awards"],
                    " Oscar Academy Award trivia",
                    " award winning",
                ),
                " Academy Award",
            ),
            titled(
                variant(&["emmy", "emmys"], " Emmy Award trivia", " Emmy winning"),
                " Emmy Award",
            ),
        ],
    },
    Domain {
        category: Category::Sports,
        label: "SPORTS TRIVIA",
        fallback: variant(&[], " sports trivia records", " sports history records"),
        variants: &[
            variant(&["nfl", "football"], " NFL football trivia", " Super Bowl history"),
            variant(&["nba", "basketball"], " NBA basketball trivia", " NBA championship"),
            variant(&["mlb", "baseball"], " MLB baseball trivia", " World Series"),
            variant(&["nhl", "hockey"], " NHL hockey trivia", " Stanley Cup"),
            variant(&["soccer", "mls", "premier"], " soccer football trivia", " World Cup"),
            variant(&["olympics", "olympic"], " Olympic trivia", " Olympic medal history"),
        ],
    },
    Domain {
        category: Category::Geography,
        label: "GEOGRAPHY TRIVIA",
        fallback: variant(&[], " geography facts capital landmark", " world facts"),
        variants: &[
            variant(&["capital", "capitals"], " capital city trivia", " capital facts"),
            variant(
                &["landmark", "landmarks", "wonder"],
                " landmark trivia facts",
                " famous places",
            ),
            variant(
                &["country", "countries", "nation"],
                " country facts trivia",
                " nation history",
            ),
            variant(&["flag", "flags"], " flag trivia facts", " flag history meaning"),
        ],
    },
    Domain {
        category: Category::Science,
        label: "SCIENCE TRIVIA",
        fallback: variant(&[], " science discovery facts", " scientific discovery"),
        variants: &[
            variant(&["space", "astronomy", "nasa"], " space astronomy trivia", " NASA facts"),
            variant(&["biology", "nature", "animal"], " biology nature trivia", " animal facts"),
            variant(&["chemistry", "element"], " chemistry trivia", " element facts"),
            variant(&["physics"], " physics trivia facts", " science discovery"),
            variant(
                &["tech", "technology", "computer"],
                " technology trivia",
                " invention history",
            ),
        ],
    },
    Domain {
        category: Category::General,
        label: "TRIVIA SEARCH",
        fallback: variant(&[], " trivia facts", " fun facts"),
        variants: &[],
    },
];

fn domain(category: Category) -> &'static Domain {
    DOMAINS
        .iter()
        .find(|d| d.category == category)
        .unwrap_or(&DOMAINS[DOMAINS.len() - 1])
}

/// Everything one domain search asks the upstreams for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainQueries {
    pub web: String,
    pub follow_up: String,
    pub article: String,
}

/// Pick the variant named by `hint` (exact word, case-insensitive) or the
/// domain fallback, and shape all three queries from it.
pub fn domain_queries(category: Category, hint: &str, query: &str) -> DomainQueries {
    let d = domain(category);
    let hint = hint.trim().to_lowercase();
    let v = d
        .variants
        .iter()
        .find(|v| v.keys.iter().any(|k| *k == hint))
        .unwrap_or(&d.fallback);
    let query = query.trim();
    DomainQueries {
        web: format!("{query}{}", v.suffix),
        follow_up: format!("{query}{}", v.follow_up),
        article: format!("{query}{}", v.article_suffix),
    }
}

/// `query` plus the suffix picked by `hint` (or the domain default).
pub fn composite_query(category: Category, hint: &str, query: &str) -> String {
    domain_queries(category, hint, query).web
}

/// Concatenate several searches in order. Each distinct failure becomes one
/// note under `source`.
fn gather(
    report: &mut Report,
    source: &str,
    outcomes: Vec<Outcome<Vec<SourceRecord>>>,
) -> Vec<SourceRecord> {
    let mut records = Vec::new();
    let mut reasons: Vec<String> = Vec::new();
    for outcome in outcomes {
        match outcome {
            Outcome::Available(rs) => records.extend(rs),
            Outcome::Unavailable(reason) => {
                if !reasons.contains(&reason) {
                    report.unavailable(source, &reason);
                    reasons.push(reason);
                }
            }
        }
    }
    records
}

fn summary_records(o: Outcome<Option<SourceRecord>>) -> Outcome<Vec<SourceRecord>> {
    o.map(|s| s.into_iter().collect())
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// Last line of defense: a handler that panics still returns text.
pub async fn guarded<F>(tool: &'static str, fut: F) -> String
where
    F: Future<Output = String>,
{
    match AssertUnwindSafe(fut).catch_unwind().await {
        Ok(text) if !text.trim().is_empty() => text,
        Ok(_) => {
            tracing::error!(tool, "handler produced empty output");
            error_text(
                ErrorCode::UnexpectedError,
                format!("{tool} produced no output"),
            )
        }
        Err(panic) => {
            let msg = panic_message(panic.as_ref());
            tracing::error!(tool, panic = %msg, "handler panicked");
            error_text(
                ErrorCode::UnexpectedError,
                format!("unexpected failure in {tool}: {msg}"),
            )
        }
    }
}

#[derive(Clone)]
pub struct TriviaTools {
    sources: Sources,
    clock: Clock,
}

impl TriviaTools {
    pub fn new(sources: Sources, clock: Clock) -> Self {
        Self { sources, clock }
    }

    /// Production wiring: `TRIVIA_*` env config, reqwest transport, wall clock.
    pub fn from_env() -> trivia_core::Result<Self> {
        let cfg = SourceConfig::from_env();
        tracing::debug!(
            search = %cfg.search_endpoint,
            rest = %cfg.rest_endpoint,
            api = %cfg.api_endpoint,
            timeout_ms = cfg.timeout.as_millis() as u64,
            "source config"
        );
        Ok(Self::new(Sources::local(&cfg)?, Clock::System))
    }

    /// Dispatch by tool name. `None` for unknown tools.
    pub async fn call(&self, name: &str, args: &BTreeMap<String, String>) -> Option<String> {
        let arg = |k: &str| args.get(k).map(String::as_str).unwrap_or("");
        let out = match name {
            "research_trivia_topic" => {
                self.research_trivia_topic(arg("topic"), arg("depth"))
                    .await
            }
            "trivia_for_today" => self.trivia_for_today(arg("date_override")).await,
            "trivia_for_week" => self.trivia_for_week(arg("start_date")).await,
            "search_entertainment_trivia" => {
                self.search_entertainment_trivia(arg("query"), arg("category"))
                    .await
            }
            "search_sports_trivia" => self.search_sports_trivia(arg("query"), arg("sport")).await,
            "search_geography_trivia" => {
                self.search_geography_trivia(arg("query"), arg("category"))
                    .await
            }
            "search_science_trivia" => self.search_science_trivia(arg("query"), arg("field")).await,
            "search_trivia" => self.search_trivia(arg("category"), arg("query")).await,
            "fetch_trivia_from_url" => self.fetch_trivia_from_url(arg("url")).await,
            _ => return None,
        };
        Some(out)
    }

    pub async fn research_trivia_topic(&self, topic: &str, depth: &str) -> String {
        guarded("research_trivia_topic", self.research(topic, depth)).await
    }

    pub async fn trivia_for_today(&self, date_override: &str) -> String {
        guarded("trivia_for_today", self.today(date_override)).await
    }

    pub async fn trivia_for_week(&self, start_date: &str) -> String {
        guarded("trivia_for_week", self.week(start_date)).await
    }

    pub async fn search_entertainment_trivia(&self, query: &str, category: &str) -> String {
        guarded(
            "search_entertainment_trivia",
            self.domain_search(Category::Entertainment, category, query),
        )
        .await
    }

    pub async fn search_sports_trivia(&self, query: &str, sport: &str) -> String {
        guarded(
            "search_sports_trivia",
            self.domain_search(Category::Sports, sport, query),
        )
        .await
    }

    pub async fn search_geography_trivia(&self, query: &str, category: &str) -> String {
        guarded(
            "search_geography_trivia",
            self.domain_search(Category::Geography, category, query),
        )
        .await
    }

    pub async fn search_science_trivia(&self, query: &str, field: &str) -> String {
        guarded(
            "search_science_trivia",
            self.domain_search(Category::Science, field, query),
        )
        .await
    }

    /// Classify `query` (with `category` as a hint) and run that domain's search.
    pub async fn search_trivia(&self, category: &str, query: &str) -> String {
        guarded("search_trivia", async {
            if query.trim().is_empty() {
                return error_text(ErrorCode::InvalidParams, "Please provide a search query.");
            }
            let routed = classify(query, category);
            tracing::info!(tool = "search_trivia", hint = category, %routed, "routed query");
            self.domain_search(routed, category, query).await
        })
        .await
    }

    pub async fn fetch_trivia_from_url(&self, url: &str) -> String {
        guarded("fetch_trivia_from_url", self.fetch_url(url)).await
    }

    async fn research(&self, topic: &str, depth: &str) -> String {
        let topic = topic.trim();
        if topic.is_empty() {
            return error_text(ErrorCode::InvalidParams, "Please provide a topic to research.");
        }
        let depth = Depth::parse(depth);
        let category = classify(topic, "");
        tracing::info!(tool = "research_trivia_topic", topic, %depth, %category, "tool call");

        let s = &self.sources;
        let mut report = Report::new(format!("🔍 TRIVIA RESEARCH: {}", topic.to_uppercase()))
            .subtitle(format!(
                "Category: {} {} | Depth: {depth}",
                category.emoji(),
                category
            ))
            .footer("✅ Research complete! Use these facts to write your questions.");

        match depth {
            Depth::Normal => {
                let (summary, web) =
                    tokio::join!(s.article_summary(topic), s.search_web(topic, WEB_RESULTS));
                report
                    .outcome("📚 ENCYCLOPEDIA SUMMARY", "encyclopedia summary", summary_records(summary))
                    .outcome("🌐 WEB RESULTS", "web search", web);
            }
            Depth::Deep => {
                let facts_query = format!("{topic} facts trivia");
                let (summary, web, articles, facts) = tokio::join!(
                    s.article_summary(topic),
                    s.search_web(topic, WEB_RESULTS),
                    s.article_search(topic, ARTICLE_RESULTS),
                    s.search_web(&facts_query, WEB_RESULTS),
                );
                report
                    .outcome("📚 ENCYCLOPEDIA SUMMARY", "encyclopedia summary", summary_records(summary))
                    .outcome("🔎 RELATED ARTICLES", "article search", articles)
                    .outcome("🌐 WEB RESULTS", "web search", web)
                    .outcome("🧠 FACTS & TRIVIA", "facts search", facts);
            }
        }
        report.render()
    }

    async fn today(&self, date: &str) -> String {
        let resolved = dates::resolve_month_day(date, self.clock.today());
        let (month, day) = resolved.value;
        let label = dates::month_day_label(month, day);
        tracing::info!(tool = "trivia_for_today", date, month, day, "tool call");

        let movies_query = format!("movies released {label} history famous films");
        let celebrity_queries = [
            format!("famous celebrity birthdays {label}"),
            format!("actors actresses born {label}"),
            format!("famous people born {label} actors singers"),
        ];
        let celebrities = join_all(
            celebrity_queries
                .iter()
                .map(|q| self.sources.search_web(q, CELEBRITY_RESULTS_PER_QUERY)),
        );
        let (feed, movies, celebrities) = tokio::join!(
            self.sources.on_this_day(month, day),
            self.sources.search_web(&movies_query, TODAY_MOVIE_RESULTS),
            celebrities,
        );

        let mut report = Report::new(format!("📅 TRIVIA FOR {label}"))
            .subtitle("Births, events and deaths on this date in history.")
            .footer("✅ Pick a few of these for tonight's date-themed round!");
        if let Some(reason) = feed.reason() {
            report.unavailable("on this day", reason);
        }
        let feed = feed.unwrap_or_empty();
        let mut celebrities = gather(&mut report, "celebrity search", celebrities);
        celebrities.truncate(TODAY_CELEBRITIES);
        report
            .records_or(
                "🎂 FAMOUS BIRTHDAYS",
                take(&feed.births, TODAY_BIRTHS),
                "No births found.",
            )
            .records_or(
                "🏛️ HISTORICAL EVENTS",
                take(&feed.events, TODAY_EVENTS),
                "No events found.",
            )
            .records_or(
                "🕯️ NOTABLE DEATHS",
                take(&feed.deaths, TODAY_DEATHS),
                "No deaths found.",
            )
            .records("🌟 MORE CELEBRITY BIRTHDAYS", &celebrities)
            .outcome("🎬 ENTERTAINMENT ON THIS DATE", "web search", movies);
        add_fallback_note(&mut report, resolved.fallback_note);
        report.render()
    }

    async fn week(&self, start_date: &str) -> String {
        let resolved = dates::resolve_week_start(start_date, self.clock.today());
        let start = resolved.value;
        tracing::info!(tool = "trivia_for_week", start_date, start = %start, "tool call");

        let days: Vec<NaiveDate> = (0..7u64)
            .filter_map(|i| start.checked_add_days(Days::new(i)))
            .collect();
        let ent_query = format!(
            "new movies tv shows {} {}",
            dates::month_name(start.month()),
            start.year()
        );
        let feeds = join_all(
            days.iter()
                .map(|d| self.sources.on_this_day(d.month(), d.day())),
        );
        let (feeds, entertainment) = tokio::join!(
            feeds,
            self.sources
                .search_web(&ent_query, WEEK_ENTERTAINMENT_RESULTS),
        );

        let mut report = Report::new(format!(
            "📆 WEEKLY TRIVIA: Week of {}",
            dates::long_date_label(start)
        ))
        .footer("✅ A week of birthdays and history, ready for themed rounds!");
        if let (Some(first), Some(last)) = (days.first(), days.last()) {
            report = report.subtitle(format!(
                "Days: {} to {}",
                dates::short_day_label(*first),
                dates::short_day_label(*last)
            ));
        }

        let mut births = Vec::new();
        let mut events = Vec::new();
        for (d, feed) in days.iter().zip(feeds) {
            let tag = dates::short_day_label(*d);
            if let Some(reason) = feed.reason() {
                report.unavailable(&format!("on this day {tag}"), reason);
            }
            let feed = feed.unwrap_or_empty();
            births.extend(
                feed.births
                    .into_iter()
                    .take(WEEK_BIRTHS_PER_DAY)
                    .map(|r| tagged(&tag, r)),
            );
            events.extend(
                feed.events
                    .into_iter()
                    .take(WEEK_EVENTS_PER_DAY)
                    .map(|r| tagged(&tag, r)),
            );
        }

        report
            .records_or("🎂 BIRTHDAYS THIS WEEK", &births, "No births found.")
            .records_or("🏛️ THIS WEEK IN HISTORY", &events, "No events found.")
            .outcome("🎬 ENTERTAINMENT THIS MONTH", "web search", entertainment);
        add_fallback_note(&mut report, resolved.fallback_note);
        report.render()
    }

    async fn domain_search(&self, category: Category, hint: &str, query: &str) -> String {
        let query = query.trim();
        if query.is_empty() {
            return error_text(ErrorCode::InvalidParams, "Please provide a search query.");
        }
        let d = domain(category);
        let q = domain_queries(category, hint, query);
        tracing::info!(%category, hint, query, web = %q.web, article = %q.article, "domain search");

        let (articles, web, follow_up) = tokio::join!(
            self.encyclopedia(&q.article),
            self.sources.search_web(&q.web, WEB_RESULTS),
            self.sources.search_web(&q.follow_up, WEB_RESULTS),
        );
        let mut report = Report::new(format!(
            "{} {}: {}",
            category.emoji(),
            d.label,
            query.to_uppercase()
        ))
        .subtitle(format!("Searched: {} | {}", q.web, q.follow_up))
        .footer("✅ Trivia compiled! Double-check surprising facts before using them.");
        report.outcome("📚 ENCYCLOPEDIA", "article search", articles);
        let facts = gather(&mut report, "web search", vec![web, follow_up]);
        report.records("🌐 TRIVIA FACTS", &facts);
        report.render()
    }

    /// Title search, then summaries of the top hits. A hit whose summary is
    /// missing is kept as the search returned it.
    async fn encyclopedia(&self, query: &str) -> Outcome<Vec<SourceRecord>> {
        let hits = match self.sources.article_search(query, ARTICLE_SEARCH_LIMIT).await {
            Outcome::Available(hits) => hits,
            Outcome::Unavailable(reason) => return Outcome::Unavailable(reason),
        };
        let top: Vec<SourceRecord> = hits.into_iter().take(ARTICLE_SUMMARIES).collect();
        let summaries =
            join_all(top.iter().map(|hit| self.sources.article_summary(&hit.title))).await;
        Outcome::Available(
            top.into_iter()
                .zip(summaries)
                .map(|(hit, summary)| summary.into_option().flatten().unwrap_or(hit))
                .collect(),
        )
    }

    async fn fetch_url(&self, url: &str) -> String {
        let url = url.trim();
        if url.is_empty() {
            return error_text(ErrorCode::InvalidParams, "Please provide a URL to fetch.");
        }
        if !is_http_url(url) {
            return error_text(
                ErrorCode::InvalidUrl,
                format!("'{url}' is not an http:// or https:// URL."),
            );
        }
        tracing::info!(tool = "fetch_trivia_from_url", url, "tool call");

        let mut report = Report::new("📄 CONTENT FROM URL")
            .subtitle(format!("Source: {url}"))
            .footer("✅ Content extracted! Skim it for trivia-worthy facts.");
        match self.sources.fetch_page(url).await {
            Outcome::Available(page) => {
                if page.final_url != url && !page.final_url.is_empty() {
                    report = report.subtitle(format!("Redirected to: {}", page.final_url));
                }
                let body = if page.text.trim().is_empty() {
                    "No readable text found on this page."
                } else {
                    page.text.as_str()
                };
                report.text("📝 EXTRACTED TEXT", body);
            }
            Outcome::Unavailable(reason) => {
                report
                    .unavailable("page fetch", &reason)
                    .text("📝 EXTRACTED TEXT", "No content could be fetched.");
            }
        }
        report.render()
    }
}

fn take(records: &[SourceRecord], n: usize) -> &[SourceRecord] {
    &records[..records.len().min(n)]
}

fn tagged(tag: &str, r: SourceRecord) -> SourceRecord {
    SourceRecord {
        title: format!("[{tag}] {}", r.title),
        ..r
    }
}

fn add_fallback_note(report: &mut Report, note: Option<String>) {
    if let Some(note) = note {
        report.note(note);
        if let Some(hint) = warning_hint("date_fallback") {
            report.note(hint);
        }
    }
}
