mod bootstrap;

use std::{borrow::Cow, env, process};

use bootstrap::{AppConfig, OutputFormat, init_logging};
use khaali_application::{DebtService, GroupDebts};
use khaali_infrastructure::JsonGroupDocument;
use khaali_presentation::DebtPresenter;

type CliResult<T> = Result<T, Cow<'static, str>>;

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        process::exit(1);
    }
}

fn run() -> CliResult<()> {
    init_logging();

    let Some(path) = env::args().nth(1) else {
        return Err("Usage: khaali_interpreter <group.json>".into());
    };

    let config = AppConfig::from_env()?;
    tracing::debug!(?config, "Loaded configuration");
    let document = JsonGroupDocument::from_path(&path)
        .map_err(|err| format!("Failed to load '{path}': {err}"))?;

    let service = DebtService::new(&document);
    let debts = service.group_debts(document.group_id());
    let viewer = config.viewer_address.as_deref();

    match config.output {
        OutputFormat::Text => {
            println!("{}", DebtPresenter::render(&debts, &document, viewer));
        }
        OutputFormat::Json => {
            let report = DebtPresenter::report(&debts, &document, viewer);
            let json = serde_json::to_string_pretty(&report)
                .map_err(|err| format!("Failed to serialize debts: {err}"))?;
            println!("{json}");
        }
    }

    if let GroupDebts::Unavailable(err) = &debts {
        return Err(format!("debts for group {} are unavailable: {err}", document.group_id()).into());
    }

    Ok(())
}
