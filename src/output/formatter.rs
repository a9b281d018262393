use owo_colors::OwoColorize;
use regex::Regex;
use std::io::IsTerminal;
use once_cell::sync::Lazy;
use terminal_size::{terminal_size, Width};

use crate::api::{Blog, Faq, LocationResult, PageMeta};
use crate::fetch::ScoredManager;
use crate::scoring::{FeeReport, FeeStructure, Rating, ScoreOutput};

static TAGS: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("valid tag regex"));

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate text to fit available width, accounting for Unicode
fn truncate(text: &str, max_width: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= max_width {
        text.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

/// Legacy text fields carry HTML; collapse them to one plain line.
fn plain_text(html: &str) -> String {
    let stripped = TAGS.replace_all(html, " ");
    stripped
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn rating_label(rating: Rating, use_colors: bool) -> String {
    let text = format!("{:<9}", rating.to_string());
    if !use_colors {
        return text;
    }
    match rating {
        Rating::Excellent => text.green().to_string(),
        Rating::Good => text.cyan().to_string(),
        Rating::Fair => text.yellow().to_string(),
        Rating::Poor => text.red().to_string(),
    }
}

fn location(city: &str, state: &str) -> String {
    match (city.is_empty(), state.is_empty()) {
        (false, false) => format!("{}, {}", city, state),
        (false, true) => city.to_string(),
        (true, false) => state.to_string(),
        (true, true) => String::new(),
    }
}

/// Format managers as a table with columns: Index, Score, Rating, Name, Location
/// Names are truncated to the terminal width; pipes get them in full.
pub fn format_manager_table(managers: &[ScoredManager], use_colors: bool) -> String {
    if managers.is_empty() {
        return "No property managers found.".to_string();
    }

    let term_width = get_terminal_width();
    let index_width = 3;
    let score_width = 5;
    let rating_width = 9;
    let separator = "  ";

    managers
        .iter()
        .enumerate()
        .map(|(idx, scored)| {
            let index_str = format!("{:>2}.", idx + 1);
            let score_str = format!("{:>width$.0}", scored.score.score, width = score_width);
            let place = location(&scored.manager.city, &scored.manager.state);
            let fixed_width = index_width + 1 + score_width + rating_width + separator.len() * 3 + place.chars().count();

            let name = match term_width {
                Some(width) if width > fixed_width + 10 => truncate(&scored.manager.name, width - fixed_width),
                Some(_) => truncate(&scored.manager.name, 20),
                None => scored.manager.name.clone(),
            };
            let verified = if scored.manager.is_verified { " ✓" } else { "" };

            if use_colors {
                format!(
                    "{} {}{}{}{}{}{}{}{}",
                    index_str.dimmed(),
                    score_str.bold(),
                    separator,
                    rating_label(scored.score.rating, true),
                    separator,
                    name,
                    verified.green(),
                    separator,
                    place.dimmed()
                )
            } else {
                format!(
                    "{} {}{}{}{}{}{}{}{}",
                    index_str,
                    score_str,
                    separator,
                    rating_label(scored.score.rating, false),
                    separator,
                    name,
                    verified,
                    separator,
                    place
                )
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Page footer, e.g. "Page 2 of 5 (93 managers)". Empty for a single page.
pub fn format_page_meta(meta: Option<&PageMeta>) -> String {
    match meta {
        Some(m) if m.last_page > 1 => format!("Page {} of {} ({} managers)", m.current_page, m.last_page, m.total),
        _ => String::new(),
    }
}

/// One line per factor plus the total.
pub fn format_score_breakdown(score: &ScoreOutput, use_colors: bool) -> String {
    let mut lines: Vec<String> = score
        .breakdown
        .iter()
        .map(|f| format!("  {:<12}{:>5.0}  {}", f.label, f.points, f.description))
        .collect();
    let total = format!("  {:<12}{:>5.0}  {}", "Total", score.score, rating_label(score.rating, use_colors).trim_end());
    lines.push(if use_colors { total.bold().to_string() } else { total });
    lines.join("\n")
}

/// Multi-line detail of one manager (verbose mode and `open`)
pub fn format_manager_detail(scored: &ScoredManager, use_colors: bool) -> String {
    let m = &scored.manager;
    let mut out = Vec::new();

    if use_colors {
        out.push(m.name.bold().to_string());
    } else {
        out.push(m.name.clone());
    }
    let place = location(&m.city, &m.state);
    if !place.is_empty() {
        out.push(format!("  Location: {}", place));
    }
    if !m.phone.is_empty() {
        out.push(format!("  Phone: {}", m.phone));
    }
    if let Some(website) = m.website.as_deref().filter(|w| !w.is_empty()) {
        if use_colors {
            out.push(format!("  Website: {}", website.underline()));
        } else {
            out.push(format!("  Website: {}", website));
        }
    }
    if !m.management_fee.is_empty() {
        out.push(format!("  Management fee: {}", m.management_fee));
    }
    out.push("  Trust score:".to_string());
    out.push(format_score_breakdown(&scored.score, use_colors));
    out.join("\n")
}

pub fn format_locations(locations: &[LocationResult]) -> String {
    if locations.is_empty() {
        return "No locations found.".to_string();
    }
    locations
        .iter()
        .map(|l| format!("{}, {} ({} managers)", l.city, l.state_code, l.count))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn format_blog_list(blogs: &[&Blog], use_colors: bool) -> String {
    if blogs.is_empty() {
        return "No blogs found.".to_string();
    }
    let width = get_terminal_width().unwrap_or(100).saturating_sub(4).max(20);

    blogs
        .iter()
        .map(|b| {
            let date = b.post_date.as_deref().unwrap_or("");
            let heading = if use_colors {
                b.heading.bold().to_string()
            } else {
                b.heading.clone()
            };
            let summary = truncate(&plain_text(&b.description), width);
            if date.is_empty() {
                format!("{}\n    {}", heading, summary)
            } else {
                format!("{}  {}\n    {}", heading, date, summary)
            }
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn format_faq_list(faqs: &[&Faq], use_colors: bool) -> String {
    if faqs.is_empty() {
        return "No FAQs found.".to_string();
    }
    faqs.iter()
        .map(|f| {
            let question = if use_colors {
                f.question.bold().to_string()
            } else {
                f.question.clone()
            };
            format!("Q: {}\nA: {}", question, plain_text(&f.answer))
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn money(value: f64) -> String {
    format!("${:.2}", value)
}

/// Fee estimates cheapest first, then totals and recommendations.
pub fn format_fee_report(report: &FeeReport, use_colors: bool) -> String {
    let mut out = Vec::new();
    out.push(format!(
        "Monthly income {}  Annual income {}",
        money(report.total_monthly_income),
        money(report.total_annual_income)
    ));
    out.push(format!(
        "Market average {}% ({} per month)",
        report.market_average_percentage,
        money(report.market_average_monthly)
    ));
    out.push(String::new());

    for (idx, e) in report.estimates.iter().enumerate() {
        let kind = match e.structure {
            FeeStructure::Percentage => "percentage",
            FeeStructure::Flat => "flat",
            FeeStructure::Hybrid => "hybrid",
        };
        let line = format!(
            "{:>2}. {:<11}{:>12}/mo{:>14}/yr  {}",
            idx + 1,
            kind,
            money(e.monthly_fee),
            money(e.annual_fee),
            e.description
        );
        if use_colors && idx == 0 {
            out.push(line.green().to_string());
        } else {
            out.push(line);
        }
    }

    if !report.recommendations.is_empty() {
        out.push(String::new());
        out.extend(report.recommendations.iter().map(|r| format!("- {}", r)));
    }
    out.join("\n")
}
