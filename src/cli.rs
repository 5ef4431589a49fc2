use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "oss-licenses",
    about = "Generate a third-party license manifest from resolved dependencies",
    version
)]
pub struct Cli {
    /// JSON list of resolved dependencies (group, name, version, descriptor, archive)
    #[arg(long, value_name = "FILE")]
    pub dependencies: PathBuf,

    /// Override manifest for dependencies without license metadata [default: from config]
    #[arg(long, value_name = "FILE")]
    pub overrides: Option<PathBuf>,

    /// Run config file [default: ./.oss-licenses/config.toml, fallback ~/.config/oss-licenses/config.toml]
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Output directory, overriding `output.dir` from the config
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Debug logging and a table of every dependency without a license
    #[arg(short, long)]
    pub verbose: bool,

    /// Only print summary line
    #[arg(short, long)]
    pub quiet: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_flags() {
        let cli = Cli::try_parse_from([
            "oss-licenses",
            "--dependencies",
            "deps.json",
            "--output-dir",
            "out",
            "-q",
        ])
        .unwrap();
        assert_eq!(cli.dependencies, PathBuf::from("deps.json"));
        assert_eq!(cli.output_dir, Some(PathBuf::from("out")));
        assert!(cli.quiet);
        assert!(cli.overrides.is_none());
    }

    #[test]
    fn test_dependencies_required() {
        assert!(Cli::try_parse_from(["oss-licenses"]).is_err());
    }
}
