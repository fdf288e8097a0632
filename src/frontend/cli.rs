use clap::{Arg, ArgAction, ArgMatches, Command};
use log::error;

use crate::backend::editor::EditSession;
use crate::backend::networkmodel::NetworkModelBuilder;

use super::examples;
use super::report;


const ARG_SCENARIO: &str      = "scenario";
const ARG_SITES_PER_TECH: &str = "sites per technology";
const ARG_SEED: &str          = "random seed";
const ARG_OPTIMIZE: &str      = "optimize";
const ARG_EXPORT: &str        = "export adjacency";

const SCENARIO_ISLAND: &str = "island";
const SCENARIO_RANDOM: &str = "random";

const DEFAULT_SCENARIO: &str       = SCENARIO_ISLAND;
const DEFAULT_SITES_PER_TECH: &str = "15";
const DEFAULT_SEED: &str           = "42";


pub fn cli() {
    let matches = Command::new("cellnet")
        .version("0.6.0")
        .about("Plans and re-optimizes cellular base-station networks.")
        .arg(
            Arg::new(ARG_SCENARIO)
                .short('s')
                .long("scenario")
                .value_parser([SCENARIO_ISLAND, SCENARIO_RANDOM])
                .default_value(DEFAULT_SCENARIO)
                .help("Choose the candidate scenario")
        )
        .arg(
            Arg::new(ARG_SITES_PER_TECH)
                .short('n')
                .long("sites")
                .value_parser(clap::value_parser!(u32))
                .default_value(DEFAULT_SITES_PER_TECH)
                .help("Set the candidate count per technology \
                       (random scenario)")
        )
        .arg(
            Arg::new(ARG_SEED)
                .long("seed")
                .value_parser(clap::value_parser!(u64))
                .default_value(DEFAULT_SEED)
                .help("Set the random scenario seed")
        )
        .arg(
            Arg::new(ARG_OPTIMIZE)
                .short('o')
                .long("optimize")
                .action(ArgAction::SetTrue)
                .help("Run the tiered site selection before reporting")
        )
        .arg(
            Arg::new(ARG_EXPORT)
                .short('x')
                .long("export")
                .action(ArgAction::SetTrue)
                .help("Print the adjacency interchange listing")
        )
        .get_matches();

    handle_arguments(&matches);
}

fn handle_arguments(matches: &ArgMatches) {
    let Some(scenario) = matches.get_one::<String>(ARG_SCENARIO) else {
        return;
    };

    let builder = match scenario.as_str() {
        SCENARIO_ISLAND => {
            let (records, coverage_units) = examples::island_scenario();

            NetworkModelBuilder::new()
                .set_candidates(records)
                .set_coverage_units(coverage_units)
        }
        SCENARIO_RANDOM => {
            let sites_per_technology = *matches
                .get_one::<u32>(ARG_SITES_PER_TECH)
                .unwrap_or(&15);
            let seed = *matches
                .get_one::<u64>(ARG_SEED)
                .unwrap_or(&42);

            NetworkModelBuilder::new().set_candidates(
                examples::random_scenario(sites_per_technology, seed)
            )
        }
        _ => return,
    };

    let model = match builder.build() {
        Ok(model) => model,
        Err(load_error) => {
            error!("Failed to load the candidate scenario: {load_error}");
            return;
        }
    };

    let mut session = EditSession::new(model);

    if matches.get_flag(ARG_OPTIMIZE) {
        session.optimize();
    } else {
        // Metrics of the unoptimized candidate field.
        session.refresh_metrics();
    }

    let snapshot = session.snapshot();

    println!("{}", report::full_report(&snapshot));
    if matches.get_flag(ARG_EXPORT) {
        println!();
        println!("{}", report::adjacency_export(&snapshot));
    }
}
