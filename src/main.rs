//! Solar sizer entry point: CLI wiring, config loading, and project store.

use std::process;

use chrono::Utc;
use tracing_subscriber::EnvFilter;

use solar_sizer::cli::{self, CliOptions, ProjectCommand};
use solar_sizer::config::DesignConfig;
use solar_sizer::io::export::export_audit_csv;
use solar_sizer::sizing::inverter::INVERTER_BRANDS;
use solar_sizer::sizing::pv::find_location;
use solar_sizer::sizing::{BatteryDesignInputs, PvDesignInputs, Sizing, SizingReport};
use solar_sizer::state::{Action, AppState, Notice};
use solar_sizer::store::Store;

fn fail(msg: impl std::fmt::Display) -> ! {
    eprintln!("error: {msg}");
    process::exit(1);
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Loads the design source named on the command line and applies overrides.
fn load_config(cli: &CliOptions) -> DesignConfig {
    let mut cfg = if let Some(ref path) = cli.scenario {
        DesignConfig::from_toml_file(path).unwrap_or_else(|e| fail(e))
    } else {
        let name = cli.preset.as_deref().unwrap_or("default");
        DesignConfig::from_preset(name).unwrap_or_else(|e| fail(e))
    };

    if let Some(ref site) = cli.location {
        match find_location(site) {
            Some(preset) => cfg.pv = cfg.pv.with_location(preset),
            None => fail(format!("unknown location \"{site}\"")),
        }
    }
    if let Some(kind) = cli.battery_type {
        cfg.battery.battery_type = kind;
    }
    if let Some(ref path) = cli.store {
        cfg.storage.path = path.clone();
    }

    let errors = cfg.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }
    cfg
}

/// Picks the design inputs for this run.
///
/// A scenario or preset named on the command line replaces the stored
/// inputs. Otherwise the stored inputs stay in force, with `--battery` and
/// `--location` applied on top of them.
fn design_inputs(
    cli: &CliOptions,
    cfg: &DesignConfig,
    state: &AppState,
) -> (BatteryDesignInputs, PvDesignInputs) {
    if cli.scenario.is_some() || cli.preset.is_some() {
        return (cfg.battery.clone(), cfg.pv.clone());
    }
    let mut battery = state.battery_inputs.clone();
    let mut pv = state.pv_inputs.clone();
    if let Some(kind) = cli.battery_type {
        battery.battery_type = kind;
    }
    if let Some(preset) = cli.location.as_deref().and_then(find_location) {
        pv = pv.with_location(preset);
    }
    (battery, pv)
}

fn apply(state: AppState, action: Action) -> (AppState, Notice) {
    let (state, notice) = state.reduce(action);
    if notice.is_error() {
        fail(&notice);
    }
    (state, notice)
}

fn print_projects(state: &AppState) {
    println!("{}", state.dashboard());
    for p in &state.projects {
        println!(
            "#{:<3} {:<24} {:<12} {:>8.2} kWh/day  {}",
            p.id,
            p.name,
            p.status(),
            p.energy_data.totals().total_raw_energy,
            p.created_at.format("%Y-%m-%d %H:%M")
        );
    }
}

fn print_catalogs(report: &SizingReport) {
    if report.inverter.is_ready() {
        println!("\nRecommended inverter brands:");
        for b in &INVERTER_BRANDS {
            println!("  {:<20} {:<28} {}", b.name, b.models.join(", "), b.efficiency);
        }
    }
    if let Some(rec) = report.charge_controller.ready() {
        println!("\n{} controllers ({}):", rec.topology, rec.topology.description());
        for m in rec.catalog {
            println!("  {:<16} {:<22} {:<10} {}", m.brand, m.model, m.rating, m.voltage);
        }
    }
}

fn main() {
    init_tracing();

    let cli = cli::parse_args().unwrap_or_else(|e| {
        eprintln!("error: {e}");
        cli::print_usage();
        process::exit(1);
    });
    let cfg = load_config(&cli);

    let store = Store::new(&cfg.storage.path);
    let persisted = store.load().unwrap_or_else(|e| fail(e));
    let mut state = AppState::from_persisted(persisted.clone());

    if let Some(ProjectCommand::List) = cli.project {
        print_projects(&state);
        return;
    }

    let (battery, pv) = design_inputs(&cli, &cfg, &state);
    state = apply(state, Action::SetBatteryInputs(battery)).0;
    state = apply(state, Action::SetPvInputs(pv)).0;
    for form in &cfg.appliances {
        state = apply(state, Action::AddAppliance(form.clone())).0;
    }

    match cli.project.clone() {
        Some(ProjectCommand::Save { name, notes }) => {
            let (next, notice) = apply(
                state,
                Action::SaveProject {
                    name,
                    notes,
                    at: Utc::now(),
                },
            );
            state = next;
            eprintln!("{notice}");
        }
        Some(ProjectCommand::Load(id)) => state = apply(state, Action::LoadProject(id)).0,
        Some(ProjectCommand::Delete(id)) => {
            let (next, notice) = apply(state, Action::DeleteProject(id));
            if let Err(e) = store.save(&next.persisted()) {
                fail(e);
            }
            eprintln!("{notice}");
            return;
        }
        Some(ProjectCommand::List) | None => {}
    }

    for a in state.energy_data.appliances() {
        println!("{a}");
    }
    let report = state.report();
    println!("\n{report}");
    print_catalogs(&report);

    if cli.advice {
        match state.advice() {
            Sizing::Ready(advice) => println!("\n{advice}"),
            other => println!("\n{other}"),
        }
    }

    if let Some(ref path) = cli.audit_out {
        if let Err(e) = export_audit_csv(&state.energy_data, path) {
            fail(format!("failed to write CSV: {e}"));
        }
        eprintln!("Energy audit written to {}", path.display());
    }

    if state.persisted() != persisted {
        if let Err(e) = store.save(&state.persisted()) {
            fail(e);
        }
    }

    #[cfg(feature = "chat")]
    if let Some(ref question) = cli.ask {
        use std::time::Duration;

        use solar_sizer::chat::{APOLOGY, ChatClient};

        let reply = match ChatClient::new(
            cfg.chat.endpoint.clone(),
            Duration::from_secs(cfg.chat.timeout_secs),
        ) {
            Ok(client) => client.ask(question),
            Err(e) => {
                tracing::warn!(error = %e, "chat client unavailable");
                APOLOGY.to_string()
            }
        };
        println!("\n{reply}");
    }

    #[cfg(feature = "api")]
    if cli.serve {
        use std::net::SocketAddr;

        let addr = SocketAddr::from(([0, 0, 0, 0], cli.port));
        let rt = tokio::runtime::Runtime::new()
            .unwrap_or_else(|e| fail(format!("failed to create tokio runtime: {e}")));
        if let Err(e) = rt.block_on(solar_sizer::api::serve(solar_sizer::api::shared(state), addr)) {
            fail(format!("server error: {e}"));
        }
    }
}
