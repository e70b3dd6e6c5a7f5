//! Output formatting for CLI commands.
//!
//! Supports text and JSON output formats.

use crate::core::{FoodSpot, FoodSpotList};
use crate::error::Error;
use crate::location::{GeoPoint, LOCATION_UNAVAILABLE, format_distance};
use crate::storage::StorageStats;
use serde::Serialize;
use std::fmt::Write;

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// JSON output.
    Json,
}

impl OutputFormat {
    /// Parses format from string.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Text,
        }
    }
}

/// A spot with its distance from the device, when known.
#[derive(Debug, Clone, Serialize)]
pub struct SpotEntry {
    /// The spot.
    #[serde(flatten)]
    pub spot: FoodSpot,
    /// Distance in kilometres.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
}

/// Formats a status response.
#[must_use]
pub fn format_status(stats: &StorageStats, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => format_status_text(stats),
        OutputFormat::Json => format_json(stats),
    }
}

fn format_status_text(stats: &StorageStats) -> String {
    let version = |v: Option<u32>| v.map_or_else(|| "-".to_string(), |v| format!("v{v}"));

    let mut output = String::new();
    output.push_str("munch status\n");
    output.push_str("============\n\n");
    let _ = writeln!(output, "  Lists:         {}", stats.list_count);
    let _ = writeln!(output, "  Spots:         {}", stats.spot_count);
    let _ = writeln!(
        output,
        "  Schema:        lists {}, foodspots {}",
        version(stats.lists_version),
        version(stats.foodspots_version)
    );
    if let Some(size) = stats.db_size {
        let _ = writeln!(output, "  DB size:       {size} bytes");
    }
    output
}

/// Formats the list overview.
#[must_use]
pub fn format_lists(lists: &[FoodSpotList], format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => format_lists_text(lists),
        OutputFormat::Json => format_json(&lists),
    }
}

fn format_lists_text(lists: &[FoodSpotList]) -> String {
    if lists.is_empty() {
        return "No lists found.\n".to_string();
    }

    let mut output = String::new();
    let _ = writeln!(output, "{:<6} {:<24} {:<16} Icon", "ID", "Name", "Owner");
    output.push_str(&"-".repeat(60));
    output.push('\n');

    for list in lists {
        let id = list.id.map_or_else(|| "-".to_string(), |i| i.to_string());
        let _ = writeln!(
            output,
            "{:<6} {:<24} {:<16} {}",
            id,
            truncate(&list.name, 24),
            truncate(&list.owner, 16),
            list.icon
        );
    }

    output
}

/// Formats the spots of a list.
///
/// The distance column appears only when `show_distance` is set.
#[must_use]
pub fn format_spots(entries: &[SpotEntry], show_distance: bool, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => format_spots_text(entries, show_distance),
        OutputFormat::Json => format_json(&entries),
    }
}

fn format_spots_text(entries: &[SpotEntry], show_distance: bool) -> String {
    if entries.is_empty() {
        return "No spots found.\n".to_string();
    }

    let mut output = String::new();
    let _ = write!(
        output,
        "{:<6} {:<24} {:<7} {:<14} {:<17}",
        "ID", "Name", "Rating", "Category", "Added"
    );
    if show_distance {
        output.push_str(" Distance");
    }
    output.push('\n');
    output.push_str(&"-".repeat(if show_distance { 90 } else { 70 }));
    output.push('\n');

    for entry in entries {
        let spot = &entry.spot;
        let id = spot.id.map_or_else(|| "-".to_string(), |i| i.to_string());
        let _ = write!(
            output,
            "{:<6} {:<24} {:<7} {:<14} {:<17}",
            id,
            truncate(&spot.name, 24),
            stars(spot.rating),
            truncate(&spot.category, 14),
            spot.display_date()
        );
        if show_distance {
            let _ = write!(output, " {}", format_distance(entry.distance_km));
        }
        output.push('\n');
    }

    output
}

/// Formats a single spot.
#[must_use]
pub fn format_spot(entry: &SpotEntry, show_distance: bool, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => format_spot_text(entry, show_distance),
        OutputFormat::Json => format_json(entry),
    }
}

fn format_spot_text(entry: &SpotEntry, show_distance: bool) -> String {
    let spot = &entry.spot;
    let mut output = String::new();

    let _ = writeln!(output, "Spot: {}", spot.name);
    let _ = writeln!(output, "  ID:        {}", spot.id.unwrap_or(0));
    let _ = writeln!(output, "  List:      {}", spot.list_id);
    let _ = writeln!(output, "  Address:   {}", spot.address);
    let _ = writeln!(output, "  Rating:    {} ({})", stars(spot.rating), spot.rating);
    if !spot.category.is_empty() {
        let _ = writeln!(output, "  Category:  {}", spot.category);
    }
    if !spot.menu.is_empty() {
        let _ = writeln!(output, "  Menu:      {}", spot.menu);
    }
    if !spot.comment.is_empty() {
        let _ = writeln!(output, "  Comment:   {}", spot.comment);
    }
    let _ = write!(output, "  Added:     {}", spot.display_date());
    if spot.date_recovered {
        output.push_str(" (recovered)");
    }
    output.push('\n');
    if show_distance {
        let _ = writeln!(output, "  Distance:  {}", format_distance(entry.distance_km));
    }

    output
}

/// Formats a device position.
#[must_use]
pub fn format_location(point: Option<GeoPoint>, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => point.map_or_else(
            || format!("{LOCATION_UNAVAILABLE}\n"),
            |p| format!("{p}\n"),
        ),
        OutputFormat::Json => format_json(&serde_json::json!({ "location": point })),
    }
}

/// Formats a computed distance.
#[must_use]
pub fn format_distance_result(km: f64, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => format!("{}\n", format_distance(Some(km))),
        OutputFormat::Json => format_json(&serde_json::json!({ "distance_km": km })),
    }
}

/// Formats an error.
#[must_use]
pub fn format_error(error: &Error, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => error.to_string(),
        OutputFormat::Json => {
            let kind = match error {
                Error::Storage(_) => "storage",
                Error::Validation(_) => "validation",
                Error::Location(_) => "location",
                Error::Io(_) => "io",
                Error::Command(_) => "command",
                Error::Config { .. } => "config",
            };
            format_json(&serde_json::json!({
                "error": kind,
                "message": error.to_string(),
            }))
        }
    }
}

/// Formats a value as pretty JSON.
#[must_use]
pub fn format_json<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
}

fn stars(rating: u8) -> String {
    "*".repeat(usize::from(rating.min(5)))
}

/// Truncates a string to `max_chars` characters with an ellipsis.
#[must_use]
pub fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else if max_chars <= 3 {
        s.chars().take(max_chars).collect()
    } else {
        let head: String = s.chars().take(max_chars - 3).collect();
        format!("{head}...")
    }
}
