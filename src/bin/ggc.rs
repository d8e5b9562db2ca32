//! GGC - Generate Group Commands CLI
//!
//! Command-line interface for writing group analysis commands such as 3dMEMA.

use clap::{ArgAction, ArgMatches, Args, CommandFactory, FromArgMatches, Parser, Subcommand, ValueEnum};
use group_command::command::{CommandSpec, Program};
use group_command::error::Result;
use group_command::format::{add_line_wrappers, WrapStyle};
use group_command::pipeline::{compose_spec, example_config, CommandConfig};
use std::path::PathBuf;

const GENERATE_EXAMPLES: &str = "\
Examples (3dMEMA):

  1. One-sample test, providing just the datasets. Subject IDs are taken
     from the dataset names; betas default to sub-brick 0, t-stats to 1.

       ggc generate --command 3dMEMA --dsets OL*.HEAD

  2. Two-sample test, one --dsets per group directory.

       ggc generate --command 3dMEMA \\
           --dsets groupA/OL*.HEAD --dsets groupB/OL*.HEAD

  3. Paired test with sub-brick labels and extra 3dMEMA options.

       ggc generate --command 3dMEMA --type paired              \\
           --dsets OL*.HEAD --dsets OL*.HEAD                    \\
           --set-labels Vrel Arel                               \\
           --subs-betas 'Vrel#0_Coef' 'Arel#0_Coef'             \\
           --subs-tstats 'Vrel#0_Tstat' 'Arel#0_Tstat'          \\
           -- -mask mask+tlrc -max_zeros 0.25 -jobs 2 -HKtest

Options after `--` are passed to the generated command unchanged.";

/// Output format for the subject table.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum TableFormat {
    Text,
    Json,
    Tsv,
}

/// Output format for the example configuration.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum ConfigFormat {
    Yaml,
    Json,
}

/// Generate group analysis commands from per-subject datasets
#[derive(Parser)]
#[command(name = "ggc")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Verbosity: 0 errors only, 1 warnings, 2 info, 3 debug, 4 trace
    #[arg(long, global = true, default_value = "1")]
    verb: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Inputs shared by `generate` and `subjects`.
#[derive(Args, Debug)]
struct CommandArgs {
    /// Program to write a command for (e.g. 3dMEMA)
    #[arg(short, long)]
    command: String,

    /// Datasets for one group (repeat for a second group)
    #[arg(long, required = true, num_args = 1.., action = ArgAction::Append)]
    dsets: Vec<String>,

    /// Labels for each group of datasets
    #[arg(long, num_args = 1..)]
    set_labels: Option<Vec<String>>,

    /// Beta sub-bricks (index or label), one per group
    #[arg(long, num_args = 1..)]
    subs_betas: Option<Vec<String>>,

    /// T-stat sub-bricks (index or label), one per group
    #[arg(long, num_args = 1..)]
    subs_tstats: Option<Vec<String>>,

    /// Test type (3dMEMA: paired, unpaired)
    #[arg(short = 't', long = "type")]
    test_type: Option<String>,

    /// Output prefix for the generated command
    #[arg(short, long)]
    prefix: Option<String>,

    /// Prefix for each subject ID
    #[arg(long, default_value = "")]
    subj_prefix: String,

    /// Suffix for each subject ID
    #[arg(long, default_value = "")]
    subj_suffix: String,

    /// Options passed through to the generated command (after `--`)
    #[arg(last = true)]
    options: Vec<String>,
}

impl CommandArgs {
    /// Build a config; `groups` holds the datasets of each `--dsets` occurrence.
    fn to_config(&self, groups: Vec<Vec<String>>) -> CommandConfig {
        CommandConfig {
            command: self.command.clone(),
            test_type: self.test_type.clone(),
            prefix: self.prefix.clone(),
            dsets: groups,
            set_labels: self.set_labels.clone(),
            subs_betas: self.subs_betas.clone(),
            subs_tstats: self.subs_tstats.clone(),
            subj_prefix: self.subj_prefix.clone(),
            subj_suffix: self.subj_suffix.clone(),
            options: self.options.clone(),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a command from command-line options
    #[command(after_help = GENERATE_EXAMPLES)]
    Generate {
        #[command(flatten)]
        args: CommandArgs,

        /// Maximum line width of the wrapped command
        #[arg(long, default_value = "80")]
        width: usize,

        /// Also write the command to this file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print the command setup to stderr
        #[arg(long)]
        show: bool,
    },

    /// Generate a command from a YAML configuration file
    Run {
        /// Path to command configuration YAML
        #[arg(short, long)]
        config: PathBuf,

        /// Maximum line width of the wrapped command
        #[arg(long, default_value = "80")]
        width: usize,

        /// Also write the command to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Write an example command configuration
    Example {
        /// Output path for the example configuration
        #[arg(short, long, default_value = "group_command.yaml")]
        output: PathBuf,

        /// Configuration format (JSON is also read by `run`)
        #[arg(short, long, value_enum, default_value = "yaml")]
        format: ConfigFormat,
    },

    /// Show the subject IDs derived for each group
    Subjects {
        #[command(flatten)]
        args: CommandArgs,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: TableFormat,
    },

    /// List supported programs and test types
    Programs,
}

fn main() {
    let matches = Cli::command().get_matches();
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());
    init_logging(cli.verb);

    let groups = matches
        .subcommand()
        .map(|(_, sub)| dset_groups(sub))
        .unwrap_or_default();

    let result = match cli.command {
        Commands::Generate {
            args,
            width,
            output,
            show,
        } => cmd_generate(&args.to_config(groups), width, output.as_ref(), show),

        Commands::Run {
            config,
            width,
            output,
        } => cmd_run(&config, width, output.as_ref()),

        Commands::Example { output, format } => cmd_example(&output, format),

        Commands::Subjects { args, format } => cmd_subjects(&args.to_config(groups), format),

        Commands::Programs => cmd_programs(),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Datasets of each `--dsets` occurrence, in order; empty for other subcommands.
fn dset_groups(matches: &ArgMatches) -> Vec<Vec<String>> {
    matches
        .try_get_occurrences::<String>("dsets")
        .ok()
        .flatten()
        .map(|occurrences| occurrences.map(|values| values.cloned().collect()).collect())
        .unwrap_or_default()
}

/// Map `--verb` onto a default log filter; `RUST_LOG` still wins.
fn init_logging(verb: u8) {
    let level = match verb {
        0 => "error",
        1 => "warn",
        2 => "info",
        3 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

/// Generate a command from flags
fn cmd_generate(
    config: &CommandConfig,
    width: usize,
    output_path: Option<&PathBuf>,
    show: bool,
) -> Result<()> {
    let spec = CommandSpec::from_config(config)?;
    if show {
        eprintln!("{}", spec);
    }
    emit(&spec, width, output_path)
}

/// Generate a command from a YAML configuration
fn cmd_run(config_path: &PathBuf, width: usize, output_path: Option<&PathBuf>) -> Result<()> {
    log::info!("Loading command configuration from {:?}...", config_path);
    let config_str = std::fs::read_to_string(config_path)?;
    let config = CommandConfig::from_yaml(&config_str)?;

    let spec = CommandSpec::from_config(&config)?;
    emit(&spec, width, output_path)
}

/// Compose, wrap and print a command, optionally writing it to a file.
fn emit(spec: &CommandSpec, width: usize, output_path: Option<&PathBuf>) -> Result<()> {
    log::info!(
        "Composing {} command for {} group(s) of sizes {}",
        spec.program(),
        spec.groups().len(),
        spec.groups()
            .iter()
            .map(|g| g.len().to_string())
            .collect::<Vec<_>>()
            .join(", ")
    );

    let command = compose_spec(spec)?;
    let wrapped = add_line_wrappers(&command, &WrapStyle::with_width(width));

    println!("{}", wrapped);

    if let Some(path) = output_path {
        std::fs::write(path, format!("{}\n", wrapped))?;
        log::info!("Wrote command to {:?}", path);
    }

    Ok(())
}

/// Write an example configuration
fn cmd_example(output_path: &PathBuf, format: ConfigFormat) -> Result<()> {
    let config = example_config();
    let text = match format {
        ConfigFormat::Yaml => config.to_yaml()?,
        ConfigFormat::Json => config.to_json()?,
    };

    std::fs::write(output_path, &text)?;
    eprintln!("Wrote example configuration to {:?}", output_path);
    eprintln!();
    eprintln!("Contents:");
    println!("{}", text);

    Ok(())
}

/// Print the subject table
fn cmd_subjects(config: &CommandConfig, format: TableFormat) -> Result<()> {
    let spec = CommandSpec::from_config(config)?;

    match format {
        TableFormat::Json => {
            let table: Vec<_> = spec
                .groups()
                .iter()
                .map(|g| {
                    serde_json::json!({
                        "label": g.label,
                        "subjects": g.subjects,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&table)?);
        }
        TableFormat::Tsv => {
            println!("group\tlabel\tsubject_id\tdataset");
            for (i, group) in spec.groups().iter().enumerate() {
                for subject in group.subjects.iter() {
                    println!(
                        "{}\t{}\t{}\t{}",
                        i + 1,
                        group.label,
                        subject.id,
                        subject.dataset
                    );
                }
            }
        }
        TableFormat::Text => {
            for (i, group) in spec.groups().iter().enumerate() {
                println!("Group {} ({}): {} subjects", i + 1, group.label, group.len());
                for subject in group.subjects.iter() {
                    println!("  {:<12} {}", subject.id, subject.dataset);
                }
            }
        }
    }

    Ok(())
}

/// List supported programs
fn cmd_programs() -> Result<()> {
    println!("Supported programs");
    println!("==================");
    for program in Program::ALL {
        let types: Vec<&str> = program.test_types().iter().map(|t| t.name()).collect();
        println!(
            "  {:<8} test types: {} (max {} groups)",
            program.name(),
            types.join(", "),
            program.max_groups()
        );
    }
    Ok(())
}
