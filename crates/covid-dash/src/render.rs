use dash_core::formatting::{format_count, format_delta, format_percent};
use dash_data::breakdown::BreakdownOutcome;
use dash_data::groupby::GroupTotal;
use dash_data::heatmap::{DateCountryMatrix, HeatmapOutcome};
use dash_data::pages::{
    CountryReport, HeatmapReport, OverviewReport, TrendSummary, TrendsReport,
};

// ── Page renderers ─────────────────────────────────────────────────────────────

/// Render the overview page as plain text.
pub fn render_overview(report: &OverviewReport) -> String {
    let mut lines = title_lines("Global Overview");

    lines.push(String::new());
    lines.extend(kpi_lines(&[
        ("Total cases", format_count(report.total_cases)),
        ("Total deaths", format_count(report.total_deaths)),
        ("Total recovered", format_count(report.total_recovered)),
        ("Mortality rate", format_percent(report.mortality_rate)),
        ("Recovery rate", format_percent(report.recovery_rate)),
    ]));

    if report.table.is_empty() {
        lines.push(String::new());
        lines.push("No data available.".to_string());
        return lines.join("\n");
    }

    push_section(&mut lines, "Top countries by cases");
    lines.extend(table_lines(
        &["Country", "Cases"],
        &group_rows(&report.top_countries),
    ));

    if let Some(shares) = &report.continent_shares {
        push_section(&mut lines, "Cases by continent");
        lines.extend(table_lines(&["Continent", "Cases"], &group_rows(shares)));
    }

    push_section(&mut lines, "All countries");
    let rows: Vec<Vec<String>> = report
        .table
        .iter()
        .map(|row| {
            vec![
                row.country.clone(),
                format_count(row.total_cases),
                format_count(row.total_deaths),
                format_count(row.total_recovered),
            ]
        })
        .collect();
    lines.extend(table_lines(
        &["Country", "Cases", "Deaths", "Recovered"],
        &rows,
    ));

    lines.join("\n")
}

/// Render the country page, or the no-data message when the table was empty.
pub fn render_country(report: Option<&CountryReport>) -> String {
    let Some(report) = report else {
        return "No data available for the selected country and date range.".to_string();
    };

    let mut lines = title_lines("Country Analysis");
    lines.push(format!(
        "{} from {} to {}",
        report.country, report.start, report.end
    ));

    match &report.kpis {
        Some(kpis) => {
            push_section(&mut lines, &format!("Latest ({})", kpis.date));
            lines.extend(kpi_lines(&[
                ("Confirmed", format_count(kpis.confirmed)),
                ("Deaths", format_count(kpis.deaths)),
                ("Recovered", format_count(kpis.recovered)),
                ("Mortality rate", format_percent(kpis.mortality_rate)),
            ]));
        }
        None => {
            lines.push(String::new());
            lines.push("No data available for the selected country and date range.".to_string());
        }
    }

    push_section(&mut lines, "Trends");
    match &report.trends {
        Some(trends) => lines.extend(trend_lines(trends)),
        None => lines.push("  No trend data available for this selection.".to_string()),
    }

    push_section(&mut lines, "Confirmed cases comparison");
    if report.comparison.is_empty() {
        lines.push("  No data available for the selected date range and countries.".to_string());
    } else {
        let rows: Vec<Vec<String>> = report
            .comparison
            .iter()
            .map(|(name, series)| {
                let latest = series.last().map(|point| point.confirmed).unwrap_or(0);
                vec![name.clone(), format_count(latest), series.len().to_string()]
            })
            .collect();
        lines.extend(table_lines(&["Country", "Confirmed", "Days"], &rows));
    }

    push_section(&mut lines, "World extremes");
    if report.world.is_empty() {
        lines.push("  No data available for the selected date range.".to_string());
    } else {
        let mut world = report.world.clone();
        world.sort_by(|a, b| b.confirmed.cmp(&a.confirmed));
        let rows: Vec<Vec<String>> = world
            .iter()
            .map(|entry| {
                vec![
                    entry.country.clone(),
                    format_count(entry.confirmed),
                    format_count(entry.deaths),
                ]
            })
            .collect();
        lines.extend(table_lines(&["Country", "Confirmed", "Deaths"], &rows));
    }

    lines.join("\n")
}

/// Render the global trends page as plain text.
pub fn render_trends(report: &TrendsReport) -> String {
    let mut lines = title_lines("COVID-19 Global Trends");

    let Some(latest) = &report.latest else {
        lines.push(String::new());
        lines.push("No data available.".to_string());
        return lines.join("\n");
    };

    push_section(&mut lines, &format!("Latest ({})", latest.date));
    lines.extend(kpi_lines(&[
        ("Confirmed", format_count(latest.confirmed)),
        ("Deaths", format_count(latest.deaths)),
        ("Recovered", format_count(latest.recovered)),
        ("New cases", format_count(latest.new_cases)),
        ("New deaths", format_count(latest.new_deaths)),
        ("Mortality rate", format_percent(latest.mortality_rate)),
    ]));

    push_section(
        &mut lines,
        &format!("Preview (first {} days)", report.preview.len()),
    );
    let mut header = vec![
        "Date",
        "Confirmed",
        "Deaths",
        "Recovered",
        "New cases",
        "New deaths",
    ];
    if report.has_growth_rate {
        header.push("Growth rate");
    }
    let rows: Vec<Vec<String>> = report
        .preview
        .iter()
        .map(|row| {
            let mut cells = vec![
                row.date.to_string(),
                format_count(row.confirmed),
                format_count(row.deaths),
                format_count(row.recovered),
                format_count(row.new_cases),
                format_count(row.new_deaths),
            ];
            if report.has_growth_rate {
                cells.push(
                    row.growth_rate
                        .map(|rate| format!("{:.2}", rate))
                        .unwrap_or_default(),
                );
            }
            cells
        })
        .collect();
    lines.extend(table_lines(&header, &rows));

    lines.join("\n")
}

/// Render the heatmap page as plain text.
pub fn render_heatmap(report: &HeatmapReport) -> String {
    let mut lines = title_lines("COVID-19 Intensity Heatmap");

    let months: Vec<String> = report.months.iter().map(|month| month.to_string()).collect();
    lines.push(format!("Metric: {}", report.metric.as_str()));
    lines.push(format!("Months: {}", months.join(", ")));

    lines.push(String::new());
    match &report.outcome {
        HeatmapOutcome::Matrix(matrix) => lines.extend(matrix_lines(matrix)),
        HeatmapOutcome::NoData(stage) => lines.push(stage.message().to_string()),
    }

    if let Some(detail) = &report.country_detail {
        push_section(&mut lines, &format!("Country detail: {}", detail.country));
        if detail.no_signal {
            lines.push("  No valid data available for this country.".to_string());
        } else {
            let rows: Vec<Vec<String>> = detail
                .series
                .iter()
                .map(|point| vec![point.date.to_string(), format_count(point.value)])
                .collect();
            lines.extend(table_lines(&["Date", report.metric.as_str()], &rows));
        }
    }

    match &report.breakdown {
        Some(BreakdownOutcome::Breakdown(breakdown)) => {
            push_section(
                &mut lines,
                &format!("Province breakdown ({})", breakdown.date),
            );
            let rows: Vec<Vec<String>> = breakdown
                .rows
                .iter()
                .map(|group| vec![group.key.clone(), format_count(group.value)])
                .collect();
            lines.extend(table_lines(&["Province", report.metric.as_str()], &rows));
        }
        Some(BreakdownOutcome::NoSignal { .. }) => {
            push_section(&mut lines, "Province breakdown");
            lines.push("  No valid province-level data available for this country.".to_string());
        }
        Some(BreakdownOutcome::NotApplicable) => {
            push_section(&mut lines, "Province breakdown");
            lines.push("  No province-level breakdown available for this country.".to_string());
        }
        None => {}
    }

    lines.join("\n")
}

// ── Layout helpers ─────────────────────────────────────────────────────────────

fn title_lines(title: &str) -> Vec<String> {
    vec![title.to_string(), "=".repeat(title.len())]
}

fn push_section(lines: &mut Vec<String>, title: &str) {
    lines.push(String::new());
    lines.push(title.to_string());
}

/// Two-space-indented label/value pairs with aligned values.
fn kpi_lines(pairs: &[(&str, String)]) -> Vec<String> {
    let width = pairs.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
    pairs
        .iter()
        .map(|(label, value)| format!("  {:<width$}  {}", label, value, width = width))
        .collect()
}

/// The three trend statements plus a signed net-change line.
fn trend_lines(trends: &TrendSummary) -> Vec<String> {
    let mut lines = Vec::with_capacity(4);
    lines.push(if trends.confirmed > 0 {
        format!(
            "  Cases increased by {} in the last {} days",
            format_count(trends.confirmed as u64),
            trends.window
        )
    } else {
        "  Cases are stable or decreasing".to_string()
    });
    lines.push(if trends.deaths > 0 {
        format!(
            "  Deaths increased by {} in the last {} days",
            format_count(trends.deaths as u64),
            trends.window
        )
    } else {
        "  Deaths are stable or decreasing".to_string()
    });
    lines.push(if trends.recovered > 0 {
        format!(
            "  Recoveries increased by {} in the last {} days",
            format_count(trends.recovered as u64),
            trends.window
        )
    } else {
        "  Recoveries are not improving".to_string()
    });
    lines.push(format!(
        "  Net change: confirmed {}, deaths {}, recovered {}",
        format_delta(trends.confirmed),
        format_delta(trends.deaths),
        format_delta(trends.recovered)
    ));
    lines
}

fn group_rows(groups: &[GroupTotal]) -> Vec<Vec<String>> {
    groups
        .iter()
        .map(|group| vec![group.key.clone(), format_count(group.value)])
        .collect()
}

/// The date-by-country matrix as an aligned table.
fn matrix_lines(matrix: &DateCountryMatrix) -> Vec<String> {
    let mut header: Vec<&str> = Vec::with_capacity(matrix.countries.len() + 1);
    header.push("Date");
    header.extend(matrix.countries.iter().map(String::as_str));

    let rows: Vec<Vec<String>> = matrix
        .dates
        .iter()
        .zip(&matrix.cells)
        .map(|(date, row)| {
            let mut cells = Vec::with_capacity(row.len() + 1);
            cells.push(date.to_string());
            cells.extend(row.iter().map(|&value| format_count(value)));
            cells
        })
        .collect();

    table_lines(&header, &rows)
}

/// An aligned table: first column left-aligned, the rest right-aligned.
fn table_lines(header: &[&str], rows: &[Vec<String>]) -> Vec<String> {
    let mut widths: Vec<usize> = header.iter().map(|cell| cell.len()).collect();
    for row in rows {
        for (col, cell) in row.iter().enumerate() {
            widths[col] = widths[col].max(cell.len());
        }
    }

    let header: Vec<String> = header.iter().map(|cell| cell.to_string()).collect();
    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(format_table_row(&header, &widths));
    for row in rows {
        lines.push(format_table_row(row, &widths));
    }
    lines
}

fn format_table_row(cells: &[String], widths: &[usize]) -> String {
    let mut line = String::from("  ");
    for (col, cell) in cells.iter().enumerate() {
        if col > 0 {
            line.push_str("  ");
        }
        if col == 0 {
            line.push_str(&format!("{:<width$}", cell, width = widths[col]));
        } else {
            line.push_str(&format!("{:>width$}", cell, width = widths[col]));
        }
    }
    line
}
