//! Human-readable summaries of the profile tree.

use std::fmt;
use std::time::Duration;

use comfy_table::{CellAlignment, ContentArrangement, Table, TableComponent, presets};

use crate::thousands::{fixed_two_decimals, group_thousands};
use crate::{Profile, TickTock, TimeUnit};

const HEADER: [&str; 5] = ["Profile", "Total time", "Percentage", "Hits", "Average"];

/// Snapshot of the statistics of all profiles of a [`TickTock`], ready for printing.
///
/// Created by [`TickTock::stringify_sections()`]. The report has one row per profile, in
/// the same depth-first order as [`TickTock::iter()`]. Every row has both the formatted
/// cells shown when the report is printed and the raw values they were formatted from.
///
/// # Examples
///
/// ```
/// use ticktock::{TickTock, TimeUnit};
///
/// let mut tt = TickTock::new();
///
/// for _ in 0..10 {
///     let mut outer = tt.profile("outer");
///     let _inner = outer.profile("inner");
/// }
///
/// let report = tt.stringify_sections(Some(TimeUnit::Millisecond)).unwrap();
///
/// let labels: Vec<_> = report.rows().iter().map(|row| row.label()).collect();
/// assert_eq!(labels, ["outer", "  inner"]);
/// assert_eq!(report.rows()[1].hits(), "10");
///
/// report.print_to_stdout();
/// ```
#[derive(Clone, Debug)]
pub struct Report {
    rows: Vec<ReportRow>,
}

/// The statistics of one profile in a [`Report`].
#[derive(Clone, Debug)]
pub struct ReportRow {
    label: String,
    total: String,
    percentage: String,
    hits: String,
    mean: String,

    depth: usize,
    total_time: Duration,
    hit_count: u64,
    mean_time: Duration,
}

impl Report {
    pub(crate) fn from_ticktock(ticktock: &TickTock, unit: Option<TimeUnit>) -> Self {
        let top_level_time = ticktock
            .profiles()
            .map(Profile::sum)
            .try_fold(Duration::ZERO, Duration::checked_add)
            .expect("summing top-level times overflows Duration - this indicates an unrealistic scenario");

        let rows = ticktock
            .iter()
            .map(|profile| {
                let parent_time = profile
                    .parent()
                    .map_or(top_level_time, |parent| ticktock.node(parent).sum());

                ReportRow::new(profile, parent_time, unit)
            })
            .collect();

        Self { rows }
    }

    /// The rows of the report, one per profile, in depth-first order.
    #[must_use]
    pub fn rows(&self) -> &[ReportRow] {
        &self.rows
    }

    /// Whether the report has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Lays out the report as a table with a header row, profile names left aligned and
    /// all statistics right aligned.
    fn to_table(&self) -> Table {
        let mut table = Table::new();

        table
            .load_preset(presets::NOTHING)
            .set_content_arrangement(ContentArrangement::Disabled);

        // Columns are separated by " | " and only the header has a line below it.
        table.set_style(TableComponent::VerticalLines, '|');
        table.set_style(TableComponent::HeaderLines, '-');
        table.set_style(TableComponent::MiddleHeaderIntersections, '+');

        table.set_header(HEADER);

        for row in &self.rows {
            table.add_row(row.cells());
        }

        for column in table.column_iter_mut().skip(1) {
            column.set_cell_alignment(CellAlignment::Right);
        }

        table
    }

    /// Prints the report to stdout.
    ///
    /// Prints nothing if no profiles were recorded.
    #[cfg_attr(test, mutants::skip)] // Too difficult to test stdout output reliably - manually tested.
    pub fn print_to_stdout(&self) {
        if self.is_empty() {
            return;
        }

        println!("{self}");
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_table())
    }
}

impl ReportRow {
    fn new(profile: &Profile, parent_time: Duration, unit: Option<TimeUnit>) -> Self {
        let depth = profile.depth();
        let total_time = profile.sum();
        let mean_time = profile.mean();

        let total_unit = unit.unwrap_or_else(|| TimeUnit::suitable_for(total_time));
        let mean_unit = match unit {
            Some(unit) => unit.next_smaller().unwrap_or(unit),
            None => TimeUnit::suitable_for(mean_time),
        };

        Self {
            label: format!("{}{}", "  ".repeat(depth), profile.name()),
            total: total_unit.format(total_time),
            percentage: format_percentage(total_time, parent_time, depth),
            hits: group_thousands(profile.hit_count()),
            mean: mean_unit.format(mean_time),
            depth,
            total_time,
            hit_count: profile.hit_count(),
            mean_time,
        }
    }

    /// The profile name, indented by two spaces per depth level.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The formatted total time.
    #[must_use]
    pub fn total(&self) -> &str {
        &self.total
    }

    /// The formatted share of the enclosing profile's total time, in percent.
    ///
    /// Top-level profiles are compared to the sum of all top-level profiles. Nested
    /// profiles are marked with a `" <"` that grows by `"--"` per extra depth level.
    #[must_use]
    pub fn percentage(&self) -> &str {
        &self.percentage
    }

    /// The formatted hit count.
    #[must_use]
    pub fn hits(&self) -> &str {
        &self.hits
    }

    /// The formatted mean time of one hit.
    #[must_use]
    pub fn mean(&self) -> &str {
        &self.mean
    }

    /// The depth of the profile in the tree.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// The total time of the profile.
    #[must_use]
    pub fn total_time(&self) -> Duration {
        self.total_time
    }

    /// The hit count of the profile.
    #[must_use]
    pub fn hit_count(&self) -> u64 {
        self.hit_count
    }

    /// The mean time of one hit of the profile.
    #[must_use]
    pub fn mean_time(&self) -> Duration {
        self.mean_time
    }

    fn cells(&self) -> [&str; 5] {
        [
            self.label.as_str(),
            self.total.as_str(),
            self.percentage.as_str(),
            self.hits.as_str(),
            self.mean.as_str(),
        ]
    }
}

fn format_percentage(part: Duration, whole: Duration, depth: usize) -> String {
    // Nothing measured means nothing to divide by.
    let percentage = if whole.is_zero() {
        0.0
    } else {
        100.0 * part.as_secs_f64() / whole.as_secs_f64()
    };

    let mut formatted = fixed_two_decimals(percentage);

    if depth != 0 {
        formatted.push_str(" <");
        formatted.push_str(&"--".repeat(depth.saturating_sub(1)));
    }

    formatted
}
