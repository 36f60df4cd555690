//! Run orchestration: resolve, probe, report

use crate::{
    client::{HttpProber, Prober, TcpProber},
    config::{display_config_summary, ConfigValidator, RunConfig, TargetSpec},
    dns::{AddressResolver, FamilyPreference},
    error::{AppError, Result},
    executor::{CancellationController, ProbeScheduler, RunSummary},
    logging::{Logger, LoggerFactory},
    models::Statistics,
    output::{format_statistics, ConsoleReporter, ProbeFormatter, TargetLabel},
    stats::StatisticsAggregator,
};
use std::{io::Write, sync::Arc};
use tokio_util::sync::CancellationToken;

/// What a finished run produced
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub summary: RunSummary,
    pub statistics: Statistics,
    /// Ended by an operator interrupt
    pub interrupted: bool,
}

/// One probe run from validated configuration to printed statistics
pub struct App {
    config: RunConfig,
    loggers: LoggerFactory,
    logger: Logger,
    controller: CancellationController,
    output: Box<dyn Write + Send>,
    handle_signals: bool,
}

impl App {
    /// Run that prints to stdout and stops on Ctrl-C
    pub fn new(config: RunConfig) -> Self {
        let loggers = LoggerFactory::new(&config.options);
        let logger = loggers.create_logger("app");
        let controller = CancellationController::new(loggers.create_logger("signal"));

        Self {
            config,
            loggers,
            logger,
            controller,
            output: Box::new(std::io::stdout()),
            handle_signals: true,
        }
    }

    /// Send probe output somewhere other than stdout
    pub fn with_output(mut self, output: Box<dyn Write + Send>) -> Self {
        self.output = output;
        self
    }

    /// Leave process signals alone; the run then only stops on its own or
    /// through [`App::cancellation_token`]
    pub fn without_signal_handling(mut self) -> Self {
        self.handle_signals = false;
        self
    }

    /// Cancelling this token ends the run early
    pub fn cancellation_token(&self) -> CancellationToken {
        self.controller.token()
    }

    pub async fn run(self) -> Result<RunReport> {
        let App {
            config,
            loggers,
            logger,
            mut controller,
            output,
            handle_signals,
        } = self;
        let options = &config.options;

        if options.verbose {
            for warning in ConfigValidator::warnings(options, &config.target, config.port_flag.as_deref()) {
                logger.warn(&warning).log();
            }
        }
        logger
            .debug("Configuration loaded")
            .field("summary", display_config_summary(options))
            .field("env_file_loaded", config.env_file_loaded)
            .field("session_id", loggers.session_id())
            .log();

        let (prober, label, banner): (Arc<dyn Prober>, TargetLabel, String) = match &config.target {
            TargetSpec::Tcp { host, port } => {
                let resolver = AddressResolver::system(loggers.create_logger("dns"));
                let address = resolver
                    .resolve(host, FamilyPreference::for_host(host, options))
                    .await
                    .map_err(AppError::from)
                    .inspect_err(|e| logger.debug("Address resolution failed").error_info(e).log())?;

                (
                    Arc::new(TcpProber::new(address.socket_addr(*port), options.timeout())),
                    TargetLabel::tcp(&address, *port),
                    ProbeFormatter::tcp_banner(options.locale, host, &address, *port),
                )
            }
            TargetSpec::Http { uri } => (
                Arc::new(HttpProber::new(uri.clone(), options)?),
                TargetLabel::http(uri.as_str()),
                ProbeFormatter::http_banner(options.locale, uri.as_str()),
            ),
        };
        let mode = label.mode();

        let formatter = ProbeFormatter::new(label, options.color, options.verbose)
            .with_locale(options.locale)
            .with_insecure(options.insecure);
        let reporter = Arc::new(ConsoleReporter::with_writer(formatter, output));
        reporter.print(&banner);

        let aggregator = Arc::new(StatisticsAggregator::new());
        let scheduler = ProbeScheduler::new(
            options,
            prober,
            Arc::clone(&aggregator),
            reporter.clone(),
            loggers.create_logger("scheduler"),
        );

        if handle_signals {
            let notice = Arc::clone(&reporter);
            let locale = options.locale;
            controller.listen_for_interrupts(move || notice.print(ProbeFormatter::interrupted(locale)));
        }

        let token = controller.token();
        let worker = tokio::spawn(async move { scheduler.run(token).await });
        let summary = controller.join(worker).await?;

        // The worker has been joined, nothing writes to the aggregator anymore
        let statistics = aggregator.snapshot();
        reporter.print(&format_statistics(options.locale, mode, &statistics));

        Ok(RunReport {
            summary,
            statistics,
            interrupted: controller.was_interrupted(),
        })
    }
}
