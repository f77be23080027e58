use crate::api::{HttpResourceClient, ResourceClient};
use crate::config::{Config, DeleteTargeting};
use crate::view::presentation::{self, TABLE_COLUMNS, TableRow};
use crate::view::{DepartmentView, RenderState};
use crate::{cli, tui};
use anyhow::{Context, Result};
use std::sync::Arc;

// Applies command-line overrides on top of the loaded configuration.
fn resolve_config(cli_args: &cli::Cli) -> Result<Config> {
    let mut config = Config::load_or_default(&cli_args.config);
    if let Some(base_url) = &cli_args.base_url {
        config.api.base_url = base_url.clone();
    }
    if cli_args.captured_index {
        config.view.delete_targeting = DeleteTargeting::CapturedIndex;
    }
    config.validate().context("invalid configuration")?;
    Ok(config)
}

fn format_rows(rows: &[TableRow]) -> Vec<String> {
    let data_headers = &TABLE_COLUMNS[..presentation::DATA_COLUMNS];
    let mut widths: Vec<usize> = data_headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row.cells.iter()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let pad = |cells: Vec<&str>| -> String {
        cells
            .iter()
            .zip(widths.iter())
            .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut lines = vec![pad(data_headers.to_vec())];
    lines.extend(
        rows.iter()
            .map(|row| pad(row.cells.iter().map(String::as_str).collect())),
    );
    lines
}

// Fetches once, applies the filter and prints every matching department.
async fn run_headless_mode(view: &mut DepartmentView, client: &dyn ResourceClient) -> Result<()> {
    view.load(client).await;
    match view.render_state() {
        RenderState::Loading | RenderState::Empty => println!("No Departments!"),
        RenderState::Content => {
            let rows = presentation::rows(view.filtered(), false);
            for line in format_rows(&rows) {
                println!("{line}");
            }
            println!(
                "\n{} of {} departments match '{}'",
                rows.len(),
                view.full().len(),
                view.query()
            );
        }
    }
    Ok(())
}

pub async fn run_deptlist(cli_args: cli::Cli) -> Result<()> {
    let config = resolve_config(&cli_args)?;
    let role = config.resolve_role(cli_args.role.as_deref());
    log::info!(
        "Listing departments from {} (role: {}, delete targeting: {:?})",
        config.api.base_url,
        role.as_deref().unwrap_or("none"),
        config.view.delete_targeting
    );

    let client: Arc<dyn ResourceClient> = Arc::new(HttpResourceClient::new(&config.api)?);
    let mut view = DepartmentView::new(role.as_deref(), config.view.delete_targeting);
    view.switch_view(cli_args.view);
    view.set_query(cli_args.filter.clone());

    if cli_args.headless {
        run_headless_mode(&mut view, client.as_ref()).await
    } else {
        tui::run_department_tui(view, client, config.view.page_delay())
    }
}
