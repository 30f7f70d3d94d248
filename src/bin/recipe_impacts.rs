use std::process::ExitCode;

use recipe_impact::execution::ExecutionOptions;
use recipe_impact::ingestion::{ingest_from_paths, IngestionOptions};
use recipe_impact::report::{calculate_recipe_impacts, format_recipe_impact};
use recipe_impact::store::MemoryStore;

const DEFAULT_FOOD_CLASSES_CSV: &str = "data/food_classes.csv";
const DEFAULT_RECIPES_CSV: &str = "data/recipes.csv";

fn main() -> ExitCode {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let mut args = std::env::args().skip(1);
    let food_classes_csv = args
        .next()
        .or_else(|| std::env::var("FOOD_CLASSES_CSV").ok())
        .unwrap_or_else(|| DEFAULT_FOOD_CLASSES_CSV.to_string());
    let recipes_csv = args
        .next()
        .or_else(|| std::env::var("RECIPES_CSV").ok())
        .unwrap_or_else(|| DEFAULT_RECIPES_CSV.to_string());

    let mut options = IngestionOptions::default();
    if let Ok(raw) = std::env::var("IMPACT_THREADS") {
        match raw.parse::<usize>() {
            Ok(n) => {
                options.execution = Some(ExecutionOptions {
                    num_threads: Some(n),
                    ..Default::default()
                })
            }
            Err(e) => {
                log::error!("IMPACT_THREADS must be a positive number (got '{raw}'): {e}");
                return ExitCode::FAILURE;
            }
        }
    }

    log::info!("Reading food classes from {food_classes_csv} and recipes from {recipes_csv}");

    let mut store = MemoryStore::new();
    // The default LogObserver has already logged the failure.
    if ingest_from_paths(&mut store, &food_classes_csv, &recipes_csv, &options).is_err() {
        return ExitCode::FAILURE;
    }

    let impacts = calculate_recipe_impacts(&store);
    if std::env::var("REPORT_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json")) {
        match serde_json::to_string_pretty(&impacts) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                log::error!("Failed to serialize report: {e}");
                return ExitCode::FAILURE;
            }
        }
    } else {
        println!("Recipe Impacts\n");
        for impact in &impacts {
            println!("{}", format_recipe_impact(impact));
        }
    }

    ExitCode::SUCCESS
}
