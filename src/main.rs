//! Packlint CLI binary entry point.
//! Resolves configuration, runs the check, prints results, and maps the
//! report onto the process exit status.

use clap::Parser;
use packlint::cli::{Cli, Commands};
use packlint::service::{load_plugins, ServiceBuilder};
use packlint::{config, lint, output, pack, utils};

fn main() {
    let cli = Cli::parse();
    match cli.cmd {
        Commands::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
        }
        Commands::Check {
            workspace_root,
            settings,
            output: out_mode,
            storage,
        } => {
            let eff = config::resolve_effective(
                workspace_root.as_deref(),
                settings.as_deref(),
                out_mode.as_deref(),
                storage.as_deref(),
            );
            // Friendly note if no tool config was found
            if config::load_tool_config(&eff.workspace_root).is_none() {
                eprintln!(
                    "{} {}",
                    utils::note_prefix(),
                    "No packlint.toml found; using defaults."
                );
            }
            let dp_config = match config::get_configuration(&eff.settings_path) {
                Ok(c) => c,
                Err(e) => {
                    eprintln!("{} {}", utils::error_prefix(), e);
                    std::process::exit(2);
                }
            };

            let service = ServiceBuilder::new(eff.storage_path.clone())
                .plugins(load_plugins())
                .build();
            service.load_locale(&dp_config.env.language, "en");

            let roots = pack::find_datapack_roots(&eff.workspace_root, &dp_config);
            output::print_env(&eff.workspace_root, &roots, &eff.output);

            let report = lint::run_check(&service, &eff.workspace_root, &roots, &dp_config);
            output::print_report(&report, &eff.workspace_root, &eff.output);
            output::print_summary(&report.fail, &eff.output);
            if report.fail.total() > 0 {
                std::process::exit(1);
            }
        }
    }
}
