use anyhow::{Context, Result, bail};
use log4rs::Handle;
use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::append::rolling_file::RollingFileAppender;
use log4rs::append::rolling_file::policy::compound::CompoundPolicy;
use log4rs::append::rolling_file::policy::compound::roll::fixed_window::FixedWindowRoller;
use log4rs::append::rolling_file::policy::compound::trigger::size::SizeTrigger;
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;
use once_cell::sync::OnceCell;

use crate::config::LogConfig;

const STDERR_PATTERN: &str = "{d(%H:%M:%S)} {h({l:<5})} {t} - {m}{n}";
const FILE_PATTERN: &str = "{d(%Y-%m-%dT%H:%M:%S%.3f%:z)} {l:<5} {t} - {m}{n}";

static HANDLE: OnceCell<Handle> = OnceCell::new();

/// Installs the global logger. Later calls only adjust the configuration of
/// the already installed logger.
pub fn init_logger(cfg: &LogConfig) -> Result<()> {
    let config = build_config(cfg)?;
    if let Some(handle) = HANDLE.get() {
        handle.set_config(config);
        return Ok(());
    }
    let handle = log4rs::init_config(config).context("install logger")?;
    if HANDLE.set(handle).is_err() {
        bail!("logger handle already stored");
    }
    Ok(())
}

fn build_config(cfg: &LogConfig) -> Result<Config> {
    let stderr = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new(STDERR_PATTERN)))
        .build();

    let mut builder =
        Config::builder().appender(Appender::builder().build("stderr", Box::new(stderr)));
    let mut root = Root::builder().appender("stderr");

    if let Some(path) = &cfg.file {
        let archive_pattern = format!("{}.{{}}.gz", path.display());
        let roller = FixedWindowRoller::builder()
            .build(&archive_pattern, cfg.file_count)
            .context("build log roller")?;
        let policy = CompoundPolicy::new(
            Box::new(SizeTrigger::new(cfg.file_max_bytes)),
            Box::new(roller),
        );
        let file = RollingFileAppender::builder()
            .encoder(Box::new(PatternEncoder::new(FILE_PATTERN)))
            .build(path, Box::new(policy))
            .with_context(|| format!("open log file {}", path.display()))?;
        builder = builder.appender(Appender::builder().build("file", Box::new(file)));
        root = root.appender("file");
    }

    builder
        .build(root.build(cfg.level))
        .context("build logger config")
}
