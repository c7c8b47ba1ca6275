use std::path::PathBuf;
use std::process;

use nimbus_bench::report;
use nimbus_bench::runner::{BenchmarkRunner, RunOptions};
use nimbus_bench::scenes;
use nimbus_sky::{prepare_sky_material, PreparedSky};

const DEFAULT_SKY: &str = include_str!("../../../data/skies/dusk.ron");

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();

    let mut baseline_path: Option<PathBuf> = None;
    let mut output_path: Option<PathBuf> = None;
    let mut material_path: Option<PathBuf> = None;
    let mut regression_threshold = 10.0f64;
    let mut frame_count = 240u32;
    let mut options = RunOptions::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--baseline" => {
                baseline_path = Some(PathBuf::from(flag_value(&args, &mut i)));
            }
            "--output" => {
                output_path = Some(PathBuf::from(flag_value(&args, &mut i)));
            }
            "--material" => {
                material_path = Some(PathBuf::from(flag_value(&args, &mut i)));
            }
            "--regression-threshold" => {
                regression_threshold = parse_flag(&args, &mut i);
            }
            "--frames" => {
                frame_count = parse_flag(&args, &mut i);
            }
            "--far-clip" => {
                options.z_far = Some(parse_flag(&args, &mut i));
            }
            "--show-sky" => options.show_sky = true,
            "--fast-sky" => options.fast_sky = true,
            "--depth-fill" => options.depth_fill = true,
            "--help" | "-h" => {
                eprintln!("Usage: sky-bench [OPTIONS]");
                eprintln!("  --material <path>              Sky material RON (default: bundled dusk sky)");
                eprintln!("  --baseline <path>              Load baseline JSON for comparison");
                eprintln!("  --output <path>                Save current results as JSON baseline");
                eprintln!(
                    "  --regression-threshold <pct>   Regression threshold percentage (default: 10)"
                );
                eprintln!("  --frames <n>                   Frames per scene (default: 240)");
                eprintln!("  --far-clip <dist>              Far clip distance (default: 4096)");
                eprintln!("  --show-sky                     Draw sky in front of everything");
                eprintln!("  --fast-sky                     Skip the sky pass");
                eprintln!("  --depth-fill                   Run the depth prepass path");
                process::exit(0);
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                process::exit(1);
            }
        }
        i += 1;
    }

    let sky = load_sky(material_path.as_ref());
    let sky_name = sky.material().name.clone();
    log::info!(
        "Sky '{}': cloud height {}, {} stages",
        sky_name,
        sky.material().cloud_height,
        sky.material().stages.len()
    );

    let runner = BenchmarkRunner::new(sky, options, frame_count);
    let mut results = Vec::new();

    for config in &scenes::standard_scenes() {
        match runner.run_scene(config) {
            Ok(result) => results.push(result),
            Err(e) => {
                log::error!("Scene '{}' failed: {e}", config.name);
                process::exit(1);
            }
        }
    }

    println!("\n## Sky Pass Benchmark Results\n");
    println!("{}", report::format_markdown(&results));

    if let Some(ref path) = output_path {
        let baseline = report::Baseline {
            timestamp: run_timestamp(),
            sky: sky_name.clone(),
            results: results.clone(),
        };
        if let Err(e) = report::save_baseline(path, &baseline) {
            log::error!("Failed to save baseline to {}: {e}", path.display());
            process::exit(1);
        }
        log::info!("Saved baseline to {}", path.display());
    }

    if let Some(ref path) = baseline_path {
        if let Some(baseline) = report::load_baseline(path) {
            if baseline.sky != sky_name {
                log::warn!(
                    "Baseline was recorded with sky '{}', comparing against '{}'",
                    baseline.sky,
                    sky_name
                );
            }
            let regressions = report::compare(&results, &baseline, regression_threshold);
            println!(
                "{}",
                report::format_comparison(&regressions, regression_threshold)
            );
            if !regressions.is_empty() {
                eprintln!(
                    "ERROR: {} regressions detected, exiting with code 1",
                    regressions.len()
                );
                process::exit(1);
            }
        } else {
            log::warn!("Baseline file not found: {}", path.display());
        }
    }

    log::info!("Benchmark complete.");
}

/// Load and prepare the sky material, exiting on any error.
fn load_sky(path: Option<&PathBuf>) -> PreparedSky {
    let source = match path {
        Some(path) => match std::fs::read_to_string(path) {
            Ok(source) => source,
            Err(e) => {
                log::error!("Failed to read {}: {e}", path.display());
                process::exit(1);
            }
        },
        None => DEFAULT_SKY.to_string(),
    };

    match prepare_sky_material(&source) {
        Ok(sky) => sky,
        Err(e) => {
            log::error!("Failed to load sky material: {e}");
            process::exit(1);
        }
    }
}

/// Advance past a flag and return its value, exiting if it is missing.
fn flag_value<'a>(args: &'a [String], i: &mut usize) -> &'a str {
    let flag = &args[*i];
    *i += 1;
    match args.get(*i) {
        Some(value) => value.as_str(),
        None => {
            eprintln!("Missing value for {}", flag);
            process::exit(1);
        }
    }
}

fn parse_flag<T: std::str::FromStr>(args: &[String], i: &mut usize) -> T {
    let flag = args[*i].clone();
    let value = flag_value(args, i);
    match value.parse() {
        Ok(v) => v,
        Err(_) => {
            eprintln!("Invalid {} value: {}", flag, value);
            process::exit(1);
        }
    }
}

/// Simple run label without a date-time dependency.
fn run_timestamp() -> String {
    format!("sky-bench-{}", process::id())
}
