//! Training utility for Soilsense models.
//!
//! Fits every candidate estimator on a CSV dataset, scores each by R² on a
//! held-out split, and writes the best one (plus its manifest) to the model
//! directory.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin soilsense-train -- [--data <csv>] [--out <dir>] [--target <col>] \
//!     [--seed <u64>] [--test-fraction <f64>]
//! ```

use std::env;
use std::path::PathBuf;

use anyhow::Result;

use soilsense::application::{TrainConfig, TrainingReport, TrainingService};
use soilsense::config::{LogMode, DEFAULT_LOG_FILE};
use soilsense::logging::init_logging;

fn usage() -> String {
    "Usage: soilsense-train [--data <csv>] [--out <model_dir>] [--target <column>] \
[--seed <u64>] [--test-fraction <0..1>]"
        .to_string()
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<TrainConfig, String> {
    let mut config = TrainConfig::default();
    if let Ok(dir) = env::var("SOILSENSE_MODEL_DIR") {
        if !dir.trim().is_empty() {
            config.model_dir = PathBuf::from(dir);
        }
    }

    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--data" => {
                let v = args.next().ok_or_else(usage)?;
                config.data_path = PathBuf::from(v);
            }
            "--out" => {
                let v = args.next().ok_or_else(usage)?;
                config.model_dir = PathBuf::from(v);
            }
            "--target" => {
                config.target = args.next().ok_or_else(usage)?;
            }
            "--seed" => {
                let v = args.next().ok_or_else(usage)?;
                config.seed = v
                    .trim()
                    .parse::<u64>()
                    .map_err(|_| "--seed must be a u64".to_string())?;
            }
            "--test-fraction" => {
                let v = args.next().ok_or_else(usage)?;
                config.test_fraction = v
                    .trim()
                    .parse::<f64>()
                    .ok()
                    .filter(|f| *f > 0.0 && *f < 1.0)
                    .ok_or_else(|| "--test-fraction must be between 0 and 1".to_string())?;
            }
            "-h" | "--help" => return Err(usage()),
            _ => return Err(usage()),
        }
    }
    Ok(config)
}

fn train(config: TrainConfig) -> soilsense::Result<TrainingReport> {
    Ok(TrainingService::new(config).run()?)
}

fn main() -> Result<()> {
    let config = parse_args(env::args().skip(1)).map_err(anyhow::Error::msg)?;
    let _guard = init_logging(LogMode::Stdout, &PathBuf::from(DEFAULT_LOG_FILE))?;

    tracing::info!(
        "Training on {:?} (target {:?}, seed {}, test fraction {})",
        config.data_path,
        config.target,
        config.seed,
        config.test_fraction
    );

    let model_dir = config.model_dir.clone();
    let report = train(config)?;

    println!();
    for score in &report.scores {
        println!("{}: R² = {:.4}", score.estimator, score.r2);
    }
    println!(
        "\nBEST MODEL: {} -> R² = {:.4}",
        report.best.estimator, report.best.r2
    );
    println!(
        "Model saved to {:?} ({} train rows, {} test rows)",
        model_dir, report.n_train, report.n_test
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_flags_override_defaults() {
        let config = parse_args(args(&[
            "--data",
            "soil.csv",
            "--out",
            "out",
            "--target",
            "Yield",
            "--seed",
            "7",
            "--test-fraction",
            "0.25",
        ]))
        .expect("parse");
        assert_eq!(config.data_path, PathBuf::from("soil.csv"));
        assert_eq!(config.model_dir, PathBuf::from("out"));
        assert_eq!(config.target, "Yield");
        assert_eq!(config.seed, 7);
        assert!((config.test_fraction - 0.25).abs() < f64::EPSILON);
    }

    #[test]
    fn test_bad_flags_are_rejected() {
        assert!(parse_args(args(&["--seed", "-1"])).is_err());
        assert!(parse_args(args(&["--test-fraction", "1.5"])).is_err());
        assert!(parse_args(args(&["--data"])).is_err());
        assert!(parse_args(args(&["--bogus"])).is_err());
    }

    #[test]
    fn test_missing_dataset_fails_as_training_error() {
        let temp = tempfile::tempdir().expect("tempdir");
        let config = TrainConfig {
            data_path: temp.path().join("absent.csv"),
            model_dir: temp.path().join("models"),
            ..Default::default()
        };
        assert!(matches!(
            train(config),
            Err(soilsense::SoilsenseError::Training(_))
        ));
    }
}
