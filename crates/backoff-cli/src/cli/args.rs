use super::*;
#[derive(Parser)]
#[command(author, version, about)]
pub(super) struct Cli {
    #[arg(long, global = true, help = "Path to the config file")]
    pub(super) config: Option<PathBuf>,
    #[arg(
        long,
        global = true,
        value_parser = parse_counter_name,
        help = "Counter name; each counter has its own retained record (default: \"default\")"
    )]
    pub(super) counter: Option<String>,
    #[arg(
        long,
        global = true,
        help = "Directory holding retained records (overrides config)"
    )]
    pub(super) retained_dir: Option<PathBuf>,
    #[command(subcommand)]
    pub(super) command: Commands,
}

#[derive(clap::Subcommand)]
pub(super) enum Commands {
    #[command(about = "Record a failure and print the wait in seconds")]
    Fail,
    #[command(about = "Record a success and clear the counter")]
    Success,
    #[command(about = "Print the current number of consecutive failures")]
    Tries,
    #[command(about = "Show the raw retained record without repairing it")]
    Inspect,
    #[command(about = "Manage config")]
    Config(ConfigArgs),
    #[command(about = "Run a scripted sequence of connection attempts")]
    Simulate(SimulateArgs),
    #[command(about = "Run the built-in backoff self-test")]
    SelfTest,
}

#[derive(Parser)]
pub(super) struct ConfigArgs {
    #[command(subcommand)]
    pub(super) command: ConfigCommands,
}

#[derive(clap::Subcommand)]
pub(super) enum ConfigCommands {
    #[command(about = "Write a config file, recording --retained-dir if given")]
    Init(InitArgs),
    #[command(about = "Print the config")]
    Show,
    #[command(about = "Set backoff minutes for --counter, or for all counters when omitted")]
    SetTable(SetTableArgs),
    #[command(about = "Go back to the default table for --counter, or for all counters")]
    ResetTable,
}

#[derive(Parser)]
pub(super) struct InitArgs {
    #[arg(long, help = "Overwrite an existing config")]
    pub(super) force: bool,
}

#[derive(Parser)]
pub(super) struct SetTableArgs {
    #[arg(
        value_delimiter = ',',
        required = true,
        value_parser = clap::value_parser!(u8).range(1..),
        help = "Wait times in minutes, e.g. 5,10,15"
    )]
    pub(super) minutes: Vec<u8>,
}

#[derive(Parser)]
pub(super) struct SimulateArgs {
    #[command(subcommand)]
    pub(super) mode: SimulateMode,
}

#[derive(clap::Subcommand)]
pub(super) enum SimulateMode {
    #[command(about = "Sleep between attempts; the record is reopened every cycle")]
    Sleep(SleepSimArgs),
    #[command(about = "Stay awake and wait between attempts")]
    NoSleep(OutcomeArgs),
}

#[derive(Parser)]
pub(super) struct SleepSimArgs {
    #[command(flatten)]
    pub(super) outcomes: OutcomeArgs,
    #[arg(long, default_value_t = 15 * 60, help = "Sleep after a successful publish")]
    pub(super) sleep_secs: u32,
}

#[derive(Parser)]
pub(super) struct OutcomeArgs {
    #[arg(
        long,
        value_enum,
        value_delimiter = ',',
        required = true,
        help = "Connection results in order, e.g. fail,fail,ok"
    )]
    pub(super) outcomes: Vec<OutcomeValue>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub(super) enum OutcomeValue {
    Ok,
    Fail,
}

impl From<OutcomeValue> for ConnectOutcome {
    fn from(value: OutcomeValue) -> Self {
        match value {
            OutcomeValue::Ok => ConnectOutcome::Connected,
            OutcomeValue::Fail => ConnectOutcome::TimedOut,
        }
    }
}

pub(super) fn parse_counter_name(value: &str) -> Result<String, String> {
    validate_counter_name(value).map_err(|err| err.to_string())?;
    Ok(value.to_string())
}

pub(super) fn command_label(command: &Commands) -> &'static str {
    match command {
        Commands::Fail => "fail",
        Commands::Success => "success",
        Commands::Tries => "tries",
        Commands::Inspect => "inspect",
        Commands::Config(_) => "config",
        Commands::Simulate(_) => "simulate",
        Commands::SelfTest => "self-test",
    }
}
