mod bootstrap;
mod render;

use anyhow::Result;
use dash_core::config::HeatmapConfig;
use dash_core::models::Metric;
use dash_core::settings::{Page, Settings};
use dash_data::loader;
use dash_data::pages::{self, CountryParams, HeatmapParams};

fn main() -> Result<()> {
    let settings = Settings::load();

    bootstrap::setup_logging(&settings.log_level)?;

    tracing::info!("covid-dash v{} starting", env!("CARGO_PKG_VERSION"));

    let page = settings.selected_page()?;
    let data_dir = bootstrap::resolve_data_dir(settings.data_dir.as_deref())?;
    tracing::info!("Page: {}, data dir: {}", page.as_str(), data_dir.display());

    let json = settings.format == "json";
    let output = match page {
        Page::Overview => {
            let rows = loader::load_summary(&data_dir)?;
            let report = pages::overview_report(&rows);
            if json {
                serde_json::to_string_pretty(&report)?
            } else {
                render::render_overview(&report)
            }
        }

        Page::Country => {
            let rows = loader::load_daily(&data_dir)?;
            let params = CountryParams {
                country: settings.country.clone(),
                compare: settings.compare.clone(),
                start: settings.start_date,
                end: settings.end_date,
                window: settings.window,
            };
            let report = pages::country_report(&rows, &params);
            if json {
                serde_json::to_string_pretty(&report)?
            } else {
                render::render_country(report.as_ref())
            }
        }

        Page::Trends => {
            let rows = loader::load_global(&data_dir)?;
            let report = pages::trends_report(&rows);
            if json {
                serde_json::to_string_pretty(&report)?
            } else {
                render::render_trends(&report)
            }
        }

        Page::Heatmap => {
            let rows = loader::load_grouped(&data_dir)?;
            let metric: Metric = settings.metric.parse()?;
            let params = HeatmapParams {
                months: settings.months.clone(),
                metric,
                country: settings.country.clone(),
                config: HeatmapConfig {
                    top_n: settings.top_n,
                    ..HeatmapConfig::default()
                },
            };
            let report = pages::heatmap_report(&rows, &params);
            if json {
                serde_json::to_string_pretty(&report)?
            } else {
                render::render_heatmap(&report)
            }
        }
    };

    println!("{}", output);
    Ok(())
}
