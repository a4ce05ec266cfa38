use std::env;
use std::path::PathBuf;

use crate::project::ProjectId;
use crate::sizing::BatteryChemistry;

/// Project-store operation requested on the command line.
#[derive(Debug, Clone, PartialEq)]
pub enum ProjectCommand {
    Save { name: String, notes: Option<String> },
    List,
    Load(ProjectId),
    Delete(ProjectId),
}

#[derive(Debug, Clone, PartialEq)]
pub struct CliOptions {
    pub scenario: Option<PathBuf>,
    pub preset: Option<String>,
    pub location: Option<String>,
    pub battery_type: Option<BatteryChemistry>,
    pub audit_out: Option<PathBuf>,
    pub store: Option<PathBuf>,
    pub project: Option<ProjectCommand>,
    pub advice: bool,
    #[cfg(feature = "chat")]
    pub ask: Option<String>,
    #[cfg(feature = "api")]
    pub serve: bool,
    #[cfg(feature = "api")]
    pub port: u16,
}

pub fn parse_args() -> Result<CliOptions, String> {
    let args: Vec<String> = env::args().skip(1).collect();
    parse_args_from(args)
}

pub fn parse_args_from(args: Vec<String>) -> Result<CliOptions, String> {
    if args.len() == 1 && (args[0] == "--help" || args[0] == "-h") {
        print_usage();
        std::process::exit(0);
    }
    parse_options(&args)
}

fn parse_options(args: &[String]) -> Result<CliOptions, String> {
    let mut i = 0usize;
    let mut scenario = None;
    let mut preset = None;
    let mut location = None;
    let mut battery_type = None;
    let mut audit_out = None;
    let mut store = None;
    let mut project = None;
    let mut notes = None;
    let mut advice = false;
    #[cfg(feature = "chat")]
    let mut ask = None;
    #[cfg(feature = "api")]
    let mut serve = false;
    #[cfg(feature = "api")]
    let mut port = 3000u16;

    while i < args.len() {
        let flag = args[i].as_str();
        match flag {
            "--scenario" => {
                i += 1;
                let path = args.next_or_err(
                    i,
                    "missing value for --scenario (expected a TOML file path)",
                )?;
                if scenario.replace(PathBuf::from(path)).is_some() {
                    return Err("--scenario provided more than once".to_string());
                }
            }
            "--preset" => {
                i += 1;
                let name =
                    args.next_or_err(i, "missing value for --preset (expected a preset name)")?;
                if preset.replace(name.to_string()).is_some() {
                    return Err("--preset provided more than once".to_string());
                }
            }
            "--location" => {
                i += 1;
                let name =
                    args.next_or_err(i, "missing value for --location (expected a site name)")?;
                location = Some(name.to_string());
            }
            "--battery" => {
                i += 1;
                let kind = args.next_or_err(
                    i,
                    "missing value for --battery (expected lithium or lead-acid)",
                )?;
                battery_type = Some(kind.parse::<BatteryChemistry>()?);
            }
            "--audit-out" => {
                i += 1;
                let path =
                    args.next_or_err(i, "missing value for --audit-out (expected a file path)")?;
                audit_out = Some(PathBuf::from(path));
            }
            "--store" => {
                i += 1;
                let path =
                    args.next_or_err(i, "missing value for --store (expected a JSON file path)")?;
                store = Some(PathBuf::from(path));
            }
            "--save-project" => {
                i += 1;
                let name = args.next_or_err(
                    i,
                    "missing value for --save-project (expected a project name)",
                )?;
                set_project(
                    &mut project,
                    ProjectCommand::Save {
                        name: name.to_string(),
                        notes: None,
                    },
                )?;
            }
            "--notes" => {
                i += 1;
                let text = args.next_or_err(i, "missing value for --notes (expected text)")?;
                notes = Some(text.to_string());
            }
            "--list-projects" => set_project(&mut project, ProjectCommand::List)?,
            "--load-project" | "--delete-project" => {
                i += 1;
                let raw = args.next_or_err(
                    i,
                    &format!("missing value for {flag} (expected a project id)"),
                )?;
                let id = raw
                    .parse::<u64>()
                    .map(ProjectId)
                    .map_err(|_| format!("{flag} value \"{raw}\" is not a valid project id"))?;
                let cmd = if flag == "--load-project" {
                    ProjectCommand::Load(id)
                } else {
                    ProjectCommand::Delete(id)
                };
                set_project(&mut project, cmd)?;
            }
            "--advice" => advice = true,
            #[cfg(feature = "chat")]
            "--ask" => {
                i += 1;
                let q = args.next_or_err(i, "missing value for --ask (expected a question)")?;
                ask = Some(q.to_string());
            }
            #[cfg(feature = "api")]
            "--serve" => serve = true,
            #[cfg(feature = "api")]
            "--port" => {
                i += 1;
                let raw = args.next_or_err(i, "missing value for --port (expected a u16)")?;
                port = raw
                    .parse::<u16>()
                    .map_err(|_| format!("--port value \"{raw}\" is not a valid u16"))?;
            }
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            other => return Err(format!("unknown argument: {other}")),
        }
        i += 1;
    }

    if scenario.is_some() && preset.is_some() {
        return Err(
            "arguments `--scenario` and `--preset` are mutually exclusive; choose one source"
                .to_string(),
        );
    }

    if scenario.is_none() && preset.is_none() {
        preset = Some("default".to_string());
    }

    match (&mut project, notes) {
        (Some(ProjectCommand::Save { notes: slot, .. }), Some(text)) => *slot = Some(text),
        (_, Some(_)) => return Err("--notes requires --save-project".to_string()),
        _ => {}
    }

    Ok(CliOptions {
        scenario,
        preset,
        location,
        battery_type,
        audit_out,
        store,
        project,
        advice,
        #[cfg(feature = "chat")]
        ask,
        #[cfg(feature = "api")]
        serve,
        #[cfg(feature = "api")]
        port,
    })
}

fn set_project(slot: &mut Option<ProjectCommand>, cmd: ProjectCommand) -> Result<(), String> {
    if slot.replace(cmd).is_some() {
        return Err(
            "project commands (--save-project, --list-projects, --load-project, --delete-project) are mutually exclusive"
                .to_string(),
        );
    }
    Ok(())
}

trait SliceArgExt {
    fn next_or_err(&self, index: usize, err: &str) -> Result<&str, String>;
}

impl SliceArgExt for [String] {
    fn next_or_err(&self, index: usize, err: &str) -> Result<&str, String> {
        self.get(index)
            .map(String::as_str)
            .ok_or_else(|| err.to_string())
    }
}

pub fn print_usage() {
    eprintln!("solar-sizer: off-grid solar installation sizing");
    eprintln!();
    eprintln!("Usage: solar-sizer [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --scenario <path>        Load design from TOML config file");
    eprintln!("  --preset <name>          Use a built-in preset (default, lead_acid, large_home)");
    eprintln!("  --location <site>        Apply a site preset (e.g. Kano)");
    eprintln!("  --battery <type>         Override battery chemistry (lithium, lead-acid)");
    eprintln!("  --audit-out <path>       Export the energy audit to CSV");
    eprintln!("  --store <path>           Project store file (overrides storage.path)");
    eprintln!("  --save-project <name>    Save the design as a project");
    eprintln!("  --notes <text>           Notes for --save-project");
    eprintln!("  --list-projects          List saved projects");
    eprintln!("  --load-project <id>      Size a saved project instead of the config design");
    eprintln!("  --delete-project <id>    Delete a saved project");
    eprintln!("  --advice                 Print optimization advice");
    #[cfg(feature = "chat")]
    eprintln!("  --ask <question>         Ask the troubleshooting assistant");
    #[cfg(feature = "api")]
    {
        eprintln!("  --serve                  Start REST API server after sizing");
        eprintln!("  --port <u16>             API server port (default: 3000)");
    }
    eprintln!("  --help                   Show this help message");
    eprintln!();
    eprintln!("If no --scenario or --preset is given, the default preset's appliances are");
    eprintln!("sized with the battery and PV inputs kept in the store.");
}
