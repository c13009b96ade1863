use super::*;

pub(super) fn run() -> anyhow::Result<()> {
    dispatch(Cli::parse())
}

pub(super) fn dispatch(cli: Cli) -> anyhow::Result<()> {
    let Cli {
        config,
        counter,
        retained_dir,
        command,
    } = cli;
    info!(command = command_label(&command), "Running command");
    // Only commands that touch a counter or the config read the config file.
    let context = move || CommandContext::load(config, counter, retained_dir);

    match command {
        Commands::Fail => handle_fail(&context()?),
        Commands::Success => handle_success(&context()?),
        Commands::Tries => handle_tries(&context()?),
        Commands::Inspect => handle_inspect(&context()?),
        Commands::Config(args) => handle_config(args, context()?),
        Commands::Simulate(args) => handle_simulate(args, &context()?),
        Commands::SelfTest => handle_self_test(),
    }
}

/// Resolved config and record location shared by all commands.
pub(super) struct CommandContext {
    pub(super) config_path: PathBuf,
    pub(super) config: BackoffConfig,
    pub(super) counter: Option<String>,
    pub(super) retained_dir: Option<PathBuf>,
}

impl CommandContext {
    pub(super) fn load(
        config_path: Option<PathBuf>,
        counter: Option<String>,
        retained_dir: Option<PathBuf>,
    ) -> anyhow::Result<Self> {
        let config_path = match config_path {
            Some(path) => path,
            None => default_config_path()?,
        };
        let config = BackoffConfig::load(&config_path)
            .with_context(|| format!("load config {}", config_path.display()))?;
        Ok(Self {
            config_path,
            config,
            counter,
            retained_dir,
        })
    }

    pub(super) fn counter_name(&self) -> &str {
        self.counter.as_deref().unwrap_or(DEFAULT_COUNTER)
    }

    pub(super) fn retained_path(&self) -> anyhow::Result<PathBuf> {
        match &self.retained_dir {
            Some(dir) => retained_path_in(dir, self.counter_name()),
            None => self.config.retained_path(self.counter_name()),
        }
    }

    pub(super) fn table(&self) -> anyhow::Result<BackoffTable<'_>> {
        self.config.backoff_table(self.counter_name())
    }

    pub(super) fn open_record(&self) -> anyhow::Result<RetainedFile> {
        let path = self.retained_path()?;
        RetainedFile::open(&path)
    }
}
