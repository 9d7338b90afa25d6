use std::future::Future;
use std::io::BufRead;
use std::time::Duration;

use chrono::{DateTime, Local};
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use crate::core::{
    config::{config_dir_from_env, ConfigManager, Settings},
    coordinator::Coordinator,
    feed::FeedClient,
};
use crate::presentation;

enum LoopCommand {
    Refresh,
    Shutdown,
}

#[derive(Debug, Default, Clone, Copy, PartialEq)]
struct Options {
    /// Fetch a single snapshot and exit
    once: bool,
    /// Print the report as JSON instead of the grouped text view
    json: bool,
}

impl Options {
    fn from_args(args: impl IntoIterator<Item = String>) -> Self {
        let mut options = Self::default();
        for arg in args {
            match arg.as_str() {
                "--once" => options.once = true,
                "--json" => options.json = true,
                other => log::warn!("Ignoring unknown argument: {other}"),
            }
        }
        options
    }
}

/// Route `log` records through a fmt subscriber; `RUST_LOG` overrides the level.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

pub fn run() {
    init_logging();
    let options = Options::from_args(std::env::args().skip(1));
    let config_manager = ConfigManager::new(config_dir_from_env());

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(e) => {
            log::error!("Failed to start async runtime: {e}");
            std::process::exit(1);
        }
    };

    runtime.block_on(monitor_loop(config_manager, options));
    // The stdin reader may still be blocked on a read.
    runtime.shutdown_background();
}

struct Monitor {
    config_manager: ConfigManager,
    settings: Settings,
    client: Option<FeedClient>,
    coordinator: Coordinator,
    options: Options,
}

impl Monitor {
    fn new(config_manager: ConfigManager, options: Options) -> Self {
        let settings = config_manager.load();
        log::info!(
            "Settings loaded from {:?}; feed {} every {}s",
            config_manager.path(),
            settings.base_url,
            settings.poll_interval_secs
        );
        let coordinator = Coordinator::new(settings.thresholds.clone());
        let client = build_client(&settings);
        Self {
            config_manager,
            settings,
            client,
            coordinator,
            options,
        }
    }

    /// Hot-reload: pick up settings changes made since the last refresh.
    fn reload_settings(&mut self) {
        let settings = self.config_manager.load();
        if settings == self.settings {
            return;
        }
        if settings.base_url != self.settings.base_url
            || settings.request_timeout_secs != self.settings.request_timeout_secs
        {
            log::info!("Feed location changed to {}", settings.base_url);
            self.client = build_client(&settings);
        }
        if self.coordinator.update_thresholds(settings.thresholds.clone()) {
            log::info!("Alert thresholds changed, re-evaluating");
        }
        self.settings = settings;
    }

    fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.settings.poll_interval_secs.max(1))
    }

    /// Fetch, evaluate and print. `force` prints even an unchanged report.
    async fn refresh(&mut self, force: bool) {
        self.reload_settings();
        let Some(client) = &self.client else {
            println!("{}", presentation::render_offline("feed client unavailable", None));
            return;
        };

        let fetched_at = Local::now();
        match client.fetch().await {
            Ok(snapshot) => {
                let output = self.coordinator.ingest(snapshot, fetched_at);
                for msg in &output.logs {
                    log::info!("{msg}");
                }
                if output.changed || force {
                    self.print_report(fetched_at);
                }
            }
            Err(e) => {
                let output = self.coordinator.record_failure(&e);
                for msg in &output.logs {
                    log::warn!("{msg}");
                }
                println!(
                    "{}",
                    presentation::render_offline(&e.to_string(), self.coordinator.state().last_success())
                );
            }
        }
    }

    fn print_report(&self, fetched_at: DateTime<Local>) {
        let Some(report) = self.coordinator.report() else {
            return;
        };
        if self.options.json {
            match serde_json::to_string_pretty(report) {
                Ok(json) => println!("{json}"),
                Err(e) => log::error!("Failed to serialize report: {e}"),
            }
        } else {
            println!("{}", presentation::render_report(report, fetched_at));
        }
    }
}

fn build_client(settings: &Settings) -> Option<FeedClient> {
    match FeedClient::new(&settings.base_url, Duration::from_secs(settings.request_timeout_secs)) {
        Ok(client) => Some(client),
        Err(e) => {
            log::error!("Cannot build feed client: {e}");
            None
        }
    }
}

/// Enter refreshes, `q` quits. EOF just stops listening so the monitor keeps
/// running without a terminal.
fn spawn_stdin_reader(tx: mpsc::Sender<LoopCommand>) {
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            let command = match line.trim() {
                "q" | "quit" => LoopCommand::Shutdown,
                _ => LoopCommand::Refresh,
            };
            let stop = matches!(command, LoopCommand::Shutdown);
            if tx.blocking_send(command).is_err() || stop {
                break;
            }
        }
    });
}

async fn monitor_loop(config_manager: ConfigManager, options: Options) {
    let mut monitor = Monitor::new(config_manager, options);

    if options.once {
        monitor.refresh(true).await;
        return;
    }

    let (tx, rx) = mpsc::channel(8);
    spawn_stdin_reader(tx);
    println!("Press Enter to refresh, q to quit.");

    run_until_shutdown(&mut monitor, rx, tokio::signal::ctrl_c()).await;
    log::info!("Shop monitor stopped");
}

/// Poll on the timer and serve stdin commands until `q` or `shutdown` resolves.
/// `shutdown` is created once, so a signal that lands during a refresh still
/// ends the loop on the next pass.
async fn run_until_shutdown<F: Future>(
    monitor: &mut Monitor,
    mut rx: mpsc::Receiver<LoopCommand>,
    shutdown: F,
) {
    tokio::pin!(shutdown);
    let mut stdin_open = true;
    let mut ticker = tokio::time::interval(monitor.poll_interval());
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let before = monitor.poll_interval();
                monitor.refresh(false).await;
                if monitor.poll_interval() != before {
                    ticker = tokio::time::interval_at(
                        tokio::time::Instant::now() + monitor.poll_interval(),
                        monitor.poll_interval(),
                    );
                }
            }
            command = rx.recv(), if stdin_open => match command {
                Some(LoopCommand::Refresh) => {
                    log::info!("Manual refresh");
                    monitor.refresh(true).await;
                    ticker.reset();
                }
                Some(LoopCommand::Shutdown) => break,
                // stdin closed; keep polling
                None => stdin_open = false,
            },
            _ = &mut shutdown => break,
        }
    }
}
