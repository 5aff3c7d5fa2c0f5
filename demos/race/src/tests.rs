//! Command-surface tests for the race binary.

#[cfg(test)]
mod run_command {
    use std::path::{Path, PathBuf};

    use clap::Parser;
    use sr_core::Granularity;
    use sr_optimize::OptimizationSettings;
    use sr_sim::load_race_documents;

    use crate::cli::{Cli, Command, RunArgs};
    use crate::{genetic_settings, run};

    fn config_dir() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("../../config")
    }

    fn run_args(argv: &[&str]) -> (Cli, RunArgs) {
        let mut cli = Cli::try_parse_from(argv).unwrap();
        let Command::Run(args) = std::mem::replace(&mut cli.command, Command::HealthCheck) else {
            panic!("expected the run subcommand");
        };
        (cli, args)
    }

    #[test]
    fn no_optimizer_leaves_output_dir_alone() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out");
        let config = config_dir();
        let (cli, args) = run_args(&[
            "race",
            "--race-type",
            "FSGP",
            "--config-dir",
            config.to_str().unwrap(),
            "run",
            "--optimizer",
            "none",
            "--output-dir",
            out.to_str().unwrap(),
        ]);

        let race = cli.race_type.into();
        let sim = load_race_documents(&cli.config_dir, race)
            .unwrap()
            .build_simulation(Granularity(cli.granularity))
            .unwrap();
        run(&sim, race, &args).unwrap();
        assert!(!out.exists());
    }

    #[test]
    fn seed_flag_overrides_settings_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("optimization.json");
        let file = OptimizationSettings { seed: 11, ..OptimizationSettings::for_schedule(8) };
        std::fs::write(&path, serde_json::to_string(&file).unwrap()).unwrap();
        let path = path.to_str().unwrap();

        let (_, args) = run_args(&["race", "run", "--settings", path, "--seed", "42"]);
        assert_eq!(genetic_settings(&args, 8).unwrap().seed, 42);

        let (_, args) = run_args(&["race", "run", "--settings", path]);
        assert_eq!(genetic_settings(&args, 8).unwrap(), file);

        let (_, args) = run_args(&["race", "run", "--seed", "7"]);
        let defaults = genetic_settings(&args, 8).unwrap();
        assert_eq!(defaults, OptimizationSettings { seed: 7, ..OptimizationSettings::for_schedule(8) });
    }
}
