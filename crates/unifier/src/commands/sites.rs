//! Site info handlers.

use serde_json::Value;
use tabled::Tabled;
use unifier_api::ApiSession;

use crate::cli::{GlobalOpts, SitesArgs, SitesCommand};
use crate::error::CliError;
use crate::output;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Debug, PartialEq, Eq, Tabled)]
struct SiteRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Role")]
    role: String,
}

impl SiteRow {
    fn new(name: &str, site: &Value) -> Self {
        let field = |key: &str| {
            site.get(key)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_owned()
        };
        Self {
            name: name.to_owned(),
            description: field("desc"),
            id: field("_id"),
            role: field("role"),
        }
    }
}

/// Table for a name-keyed site map. Anything else (an envelope passed
/// through unchanged) is shown as JSON.
fn render_sites(data: &Value) -> String {
    match data.as_object() {
        Some(map) if !map.contains_key("meta") => {
            let rows: Vec<SiteRow> = map.iter().map(|(name, site)| SiteRow::new(name, site)).collect();
            output::render_table(&rows)
        }
        _ => output::render_json_pretty(data),
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    session: &mut ApiSession,
    args: SitesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let (view, data) = match args.command {
        SitesCommand::Simplified(view) => (view, session.site_info_simplified().await),
        SitesCommand::Detailed(view) => (view, session.site_info_detailed().await),
    };
    let data = data.ok_or_else(|| CliError::NoData {
        what: "site info".into(),
    })?;

    let out = if view.json {
        output::render_json_pretty(&data)
    } else {
        render_sites(&data)
    };
    output::print_output(&out, global.quiet);
    Ok(())
}
