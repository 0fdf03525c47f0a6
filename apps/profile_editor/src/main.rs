use std::{path::PathBuf, sync::Arc};

use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use client_core::{
    form::FieldKey,
    render::{EnglishCatalog, PageView},
    routes::Route,
    EditOrganisationProfilePage, HttpOrganisationApi, Navigator, OrganisationState,
    OrganisationStore, SubmitOutcome,
};
use shared::domain::OrganisationId;
use tracing_subscriber::EnvFilter;

mod config;

use config::load_settings;

/// Load an organisation profile, apply edits and save them.
#[derive(Parser, Debug)]
struct Args {
    /// Organisation to edit.
    #[arg(long, conflicts_with = "route", required_unless_present = "route")]
    organisation_id: Option<String>,
    /// Page path instead of an id, e.g. `/edit-organisation-profile/5f1c`.
    #[arg(long)]
    route: Option<String>,
    #[arg(long)]
    api_base_url: Option<String>,
    #[arg(long)]
    config: Option<PathBuf>,
    /// Field edit as `name=value`, e.g. `urls.twitter=acme`. Repeatable.
    #[arg(long = "set", value_name = "FIELD=VALUE")]
    edits: Vec<String>,
    /// Send the edited draft after validating it.
    #[arg(long)]
    submit: bool,
    /// Print the page as HTML instead of a text summary.
    #[arg(long)]
    html: bool,
}

struct PrintNavigator;

impl Navigator for PrintNavigator {
    fn push(&self, route: Route) {
        println!("navigate -> {route}");
    }
}

fn parse_edit(raw: &str) -> Result<(FieldKey, String)> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| anyhow!("edit '{raw}' is not in FIELD=VALUE form"))?;
    let key = FieldKey::parse(name.trim()).ok_or_else(|| {
        let known: Vec<String> = FieldKey::ALL.iter().map(|k| k.name()).collect();
        anyhow!("unknown field '{name}'; expected one of {}", known.join(", "))
    })?;
    Ok((key, value.to_string()))
}

/// The page to open. Other pages' routes are rejected rather than re-targeted.
fn resolve_route(route: Option<&str>, organisation_id: Option<&str>) -> Result<Route> {
    let route = match (route, organisation_id) {
        (Some(raw), _) => raw.parse::<Route>().context("invalid --route")?,
        (None, Some(id)) => Route::EditOrganisationProfile {
            id: OrganisationId::new(id),
        },
        (None, None) => bail!("either --organisation-id or --route is required"),
    };
    if !matches!(route, Route::EditOrganisationProfile { .. }) {
        bail!("--route must be an edit-organisation-profile page, got {route}");
    }
    Ok(route)
}

/// Edits are only applied on top of a record that actually loaded.
fn ensure_loaded(state: &OrganisationState) -> Result<()> {
    match (&state.organisation, &state.error) {
        (Some(_), _) => Ok(()),
        (None, Some(error)) => bail!("{error}"),
        (None, None) => bail!("organisation profile did not load"),
    }
}

fn print_view(view: &PageView, html: bool) {
    if html {
        println!("{}", view.to_html());
        return;
    }
    match view {
        PageView::Loading { text } => println!("{text}"),
        PageView::Loaded(form) => {
            println!("== {}", form.heading);
            if let Some(error) = &form.error {
                println!("!! {error}");
            }
            for field in &form.fields {
                let prefix = field.prefix.unwrap_or_default();
                println!("{:<22} {prefix}{}", field.label, field.value);
                if let Some(error) = &field.error {
                    println!("{:<22} ^ {error}", "");
                }
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    let args = Args::parse();

    let mut settings = load_settings(args.config.as_deref())?;
    if let Some(url) = args.api_base_url {
        settings.api_base_url = url;
    }

    let route = resolve_route(args.route.as_deref(), args.organisation_id.as_deref())?;
    let edits = args
        .edits
        .iter()
        .map(|raw| parse_edit(raw))
        .collect::<Result<Vec<_>>>()?;

    let api = HttpOrganisationApi::with_timeout(&settings.api_base_url, settings.request_timeout())?;
    let store = Arc::new(OrganisationStore::new());
    let page = EditOrganisationProfilePage::for_route(
        &route,
        Arc::new(api),
        store.clone(),
        Arc::new(PrintNavigator),
    )?;

    page.mount().await;
    if let Err(err) = ensure_loaded(&store.snapshot().await) {
        page.unmount();
        return Err(err);
    }
    for (key, value) in edits {
        page.set_field(key, value).await;
    }

    if !args.submit {
        print_view(&page.render(&EnglishCatalog).await, args.html);
        page.unmount();
        return Ok(());
    }

    let outcome = page.submit().await;
    page.unmount();
    match outcome {
        SubmitOutcome::Saved { redirect, .. } => {
            println!("Saved organisation profile; now at {redirect}");
            Ok(())
        }
        SubmitOutcome::Invalid(errors) => {
            for (key, message) in errors.iter() {
                eprintln!("{key}: {message}");
            }
            bail!("{} field(s) failed validation; nothing was sent", errors.len())
        }
        SubmitOutcome::Failed(message) => bail!(message),
        SubmitOutcome::Discarded => bail!("update response arrived after the page closed"),
        SubmitOutcome::NotLoaded => bail!("organisation was not loaded; nothing was sent"),
    }
}
