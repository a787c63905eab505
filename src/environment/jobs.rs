//! Background setup jobs for local services.
//!
//! ## Design
//!
//! - Jobs are identified by UUIDs
//! - Concurrency limit of 1 (single setup at a time)
//! - Uses an mpsc channel to hand commands to one worker thread
//! - A service set up successfully is not set up again in the same session
//!
//! The command runner and readiness probe are injected so tests can replace
//! `docker-compose` and HTTP polling.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::PathBuf;
use std::sync::{mpsc, Arc, Mutex, RwLock};
use std::thread;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use uuid::Uuid;

use super::probe::{wait_for_server, HttpProbe, ReadinessProbe};
use super::runner::{CommandRunner, RealCommandRunner};
use super::scrape::extract_admin_password;
use super::{Service, SETUP_COMMANDS};
use crate::config::ServicesConfig;
use crate::constants::SETTINGS_LOCAL_FILE;

/// Maximum number of concurrent setups.
const MAX_CONCURRENT_SETUPS: usize = 1;

/// Setup job status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// Job is queued, waiting to start.
    Pending,
    /// Job is currently running.
    Running,
    /// Job completed successfully.
    Completed,
    /// Job failed.
    Failed,
}

impl JobStatus {
    /// Whether the job reached a final state.
    #[must_use]
    pub fn is_finished(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Running => write!(f, "running"),
            Self::Completed => write!(f, "completed"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// Output of one setup command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepOutput {
    /// Command line that was run.
    pub command: String,
    /// Whether it exited with status 0.
    pub success: bool,
    /// Captured standard output.
    pub stdout: String,
}

/// Setup job information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetupJob {
    /// Unique job identifier.
    pub id: String,
    /// Service being set up.
    pub service: Service,
    /// Current job status.
    pub status: JobStatus,
    /// Time when job was created.
    pub created_at: String,
    /// Time when job started running (if started).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<String>,
    /// Time when job completed (if finished).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,
    /// Error message if job failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Command currently running.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_step: Option<String>,
    /// Progress percentage (0-100).
    pub progress: u8,
    /// Outputs of the commands run so far.
    #[serde(default)]
    pub outputs: Vec<StepOutput>,
    /// ETEngine admin password scraped from the setup output.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_password: Option<String>,
    /// Whether the service answered over HTTP after setup.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_ready: Option<bool>,
}

impl SetupJob {
    /// Creates a new pending setup job.
    fn new(service: Service) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            service,
            status: JobStatus::Pending,
            created_at: chrono::Utc::now().to_rfc3339(),
            started_at: None,
            completed_at: None,
            error: None,
            current_step: None,
            progress: 0,
            outputs: Vec::new(),
            admin_password: None,
            server_ready: None,
        }
    }
}

/// Reasons a setup cannot be started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartError {
    /// The service was already set up in this session.
    AlreadySetUp(Service),
    /// Another setup is running.
    Busy,
    /// The service checkout does not exist.
    MissingDirectory(PathBuf),
    /// The worker could not accept the job.
    Queue(String),
}

impl fmt::Display for StartError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadySetUp(service) => write!(f, "{service} is already set up"),
            Self::Busy => write!(
                f,
                "Setup already in progress. Please wait for it to complete."
            ),
            Self::MissingDirectory(dir) => {
                write!(f, "Service directory not found: {}", dir.display())
            }
            Self::Queue(e) => write!(f, "Failed to queue setup: {e}"),
        }
    }
}

impl std::error::Error for StartError {}

/// Setup command to be executed by worker thread.
struct SetupCommand {
    job_id: String,
    service: Service,
    dir: PathBuf,
    url: String,
}

/// Outcome of the worker for one job.
#[derive(Default)]
struct SetupOutcome {
    admin_password: Option<String>,
    server_ready: Option<bool>,
}

/// Setup state of one service.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceState {
    /// Service
    pub service: Service,
    /// Checkout directory
    pub directory: PathBuf,
    /// Whether the checkout exists
    pub directory_exists: bool,
    /// URL the service answers on
    pub url: String,
    /// Whether the service was set up in this session
    pub set_up: bool,
}

/// Coordinates background setup jobs.
pub struct SetupJobManager {
    /// All jobs indexed by ID.
    jobs: RwLock<HashMap<String, SetupJob>>,
    /// Services set up successfully.
    completed: RwLock<HashSet<Service>>,
    /// Number of currently running jobs.
    running_count: Mutex<usize>,
    /// Channel sender for setup commands.
    command_tx: Mutex<Option<mpsc::Sender<SetupCommand>>>,
    /// Directory holding the service checkouts.
    workspace_root: PathBuf,
    /// URLs and polling settings.
    services: ServicesConfig,
    /// Command runner (real or mock).
    runner: Arc<dyn CommandRunner>,
    /// Readiness probe (real or mock).
    probe: Arc<dyn ReadinessProbe>,
}

impl SetupJobManager {
    /// Creates a manager running real `docker-compose` commands.
    pub fn new(workspace_root: PathBuf, services: ServicesConfig) -> Arc<Self> {
        Self::with_runner(
            workspace_root,
            services,
            Arc::new(RealCommandRunner),
            Arc::new(HttpProbe::default()),
        )
    }

    /// Creates a manager with a custom runner and probe (for testing).
    pub fn with_runner(
        workspace_root: PathBuf,
        services: ServicesConfig,
        runner: Arc<dyn CommandRunner>,
        probe: Arc<dyn ReadinessProbe>,
    ) -> Arc<Self> {
        let manager = Arc::new(Self {
            jobs: RwLock::new(HashMap::new()),
            completed: RwLock::new(HashSet::new()),
            running_count: Mutex::new(0),
            command_tx: Mutex::new(None),
            workspace_root,
            services,
            runner,
            probe,
        });

        manager.start_worker();

        manager
    }

    /// Starts the background worker thread.
    fn start_worker(self: &Arc<Self>) {
        let (tx, rx) = mpsc::channel::<SetupCommand>();
        *self.command_tx.lock().unwrap() = Some(tx);

        let manager = Arc::clone(self);

        thread::spawn(move || {
            for cmd in rx {
                manager.process_setup(cmd);
            }
        });
    }

    /// Processes a setup command.
    fn process_setup(&self, cmd: SetupCommand) {
        {
            let mut jobs = self.jobs.write().unwrap();
            if let Some(job) = jobs.get_mut(&cmd.job_id) {
                job.status = JobStatus::Running;
                job.started_at = Some(chrono::Utc::now().to_rfc3339());
                job.progress = 5;
            }
        }
        info!("Setting up {} in {}", cmd.service, cmd.dir.display());

        let result = self.run_steps(&cmd);

        // Completed must be visible before the slot is released.
        if result.is_ok() {
            self.completed.write().unwrap().insert(cmd.service);
        }
        {
            let mut count = self.running_count.lock().unwrap();
            *count = count.saturating_sub(1);
        }

        let mut jobs = self.jobs.write().unwrap();
        let Some(job) = jobs.get_mut(&cmd.job_id) else {
            return;
        };
        job.completed_at = Some(chrono::Utc::now().to_rfc3339());
        job.current_step = None;

        match result {
            Ok(outcome) => {
                job.status = JobStatus::Completed;
                job.progress = 100;
                job.admin_password = outcome.admin_password;
                job.server_ready = outcome.server_ready;
                info!("{} set up", cmd.service);
            }
            Err(e) => {
                job.status = JobStatus::Failed;
                job.progress = 0;
                job.error = Some(e);
            }
        }
    }

    /// Runs the setup commands of one job, stopping at the first failure.
    fn run_steps(&self, cmd: &SetupCommand) -> Result<SetupOutcome, String> {
        let mut outcome = SetupOutcome::default();
        let steps = SETUP_COMMANDS.len();

        for (idx, command) in SETUP_COMMANDS.iter().enumerate() {
            self.update_job(&cmd.job_id, |job| {
                job.current_step = Some((*command).to_string());
                job.progress = u8::try_from(5 + idx * 80 / steps).unwrap_or(85);
            });

            let output = self.runner.run(&cmd.dir, command).inspect_err(|e| {
                error!("{e}");
            })?;

            if cmd.service.reports_admin_password() && outcome.admin_password.is_none() {
                outcome.admin_password = extract_admin_password(&output.stdout);
            }

            self.update_job(&cmd.job_id, |job| {
                job.outputs.push(StepOutput {
                    command: (*command).to_string(),
                    success: output.success,
                    stdout: output.stdout.clone(),
                });
            });

            if !output.success {
                error!("'{}' failed: {}", command, output.stderr.trim());
                let code = output
                    .code
                    .map_or_else(|| "signal".to_string(), |c| c.to_string());
                return Err(format!("'{command}' exited with {code}"));
            }
        }

        if cmd.service.waits_for_server() {
            self.update_job(&cmd.job_id, |job| {
                job.current_step = Some(format!("Waiting for {}", cmd.url));
                job.progress = 90;
            });
            let ready = wait_for_server(
                self.probe.as_ref(),
                &cmd.url,
                Duration::from_secs(self.services.wait_timeout_secs),
                Duration::from_secs(self.services.poll_interval_secs),
            );
            if ready {
                info!("{} is up at {}", cmd.service, cmd.url);
            } else {
                warn!(
                    "{} did not answer at {} within {}s",
                    cmd.service, cmd.url, self.services.wait_timeout_secs
                );
            }
            outcome.server_ready = Some(ready);
        }

        Ok(outcome)
    }

    fn update_job(&self, job_id: &str, f: impl FnOnce(&mut SetupJob)) {
        let mut jobs = self.jobs.write().unwrap();
        if let Some(job) = jobs.get_mut(job_id) {
            f(job);
        }
    }

    /// Directory of a service checkout.
    #[must_use]
    pub fn service_dir(&self, service: Service) -> PathBuf {
        self.workspace_root.join(service.name())
    }

    /// ETModel's `settings.local.yml`, target of identity linking.
    #[must_use]
    pub fn settings_file(&self) -> PathBuf {
        self.service_dir(Service::Etmodel).join(SETTINGS_LOCAL_FILE)
    }

    /// Starts a new setup job.
    pub fn start_setup(self: &Arc<Self>, service: Service) -> Result<SetupJob, StartError> {
        let dir = self.service_dir(service);
        if !dir.is_dir() {
            return Err(StartError::MissingDirectory(dir));
        }

        {
            // Check and reserve as one step.
            let mut count = self.running_count.lock().unwrap();
            if self.completed.read().unwrap().contains(&service) {
                return Err(StartError::AlreadySetUp(service));
            }
            if *count >= MAX_CONCURRENT_SETUPS {
                return Err(StartError::Busy);
            }
            *count += 1;
        }

        let job = SetupJob::new(service);
        self.jobs
            .write()
            .unwrap()
            .insert(job.id.clone(), job.clone());

        let cmd = SetupCommand {
            job_id: job.id.clone(),
            service,
            dir,
            url: service.url(&self.services),
        };

        let sent = {
            let tx = self.command_tx.lock().unwrap();
            match tx.as_ref() {
                Some(sender) => sender.send(cmd).map_err(|e| e.to_string()),
                None => Err("worker not running".to_string()),
            }
        };
        if let Err(e) = sent {
            let mut count = self.running_count.lock().unwrap();
            *count = count.saturating_sub(1);
            drop(count);
            self.jobs.write().unwrap().remove(&job.id);
            return Err(StartError::Queue(e));
        }

        info!("Queued setup of {} as job {}", service, job.id);
        Ok(job)
    }

    /// Gets the status of a job.
    pub fn get_job(&self, job_id: &str) -> Option<SetupJob> {
        self.jobs.read().unwrap().get(job_id).cloned()
    }

    /// Lists all jobs, newest first.
    pub fn list_jobs(&self) -> Vec<SetupJob> {
        let mut jobs: Vec<SetupJob> = self.jobs.read().unwrap().values().cloned().collect();
        jobs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        jobs
    }

    /// Whether a service was set up in this session.
    pub fn is_set_up(&self, service: Service) -> bool {
        self.completed.read().unwrap().contains(&service)
    }

    /// Admin password from the latest successful ETEngine setup.
    pub fn admin_password(&self) -> Option<String> {
        self.list_jobs()
            .into_iter()
            .filter(|job| job.service == Service::Etengine && job.status == JobStatus::Completed)
            .find_map(|job| job.admin_password)
    }

    /// Setup state of every service.
    pub fn services(&self) -> Vec<ServiceState> {
        Service::ALL
            .into_iter()
            .map(|service| {
                let directory = self.service_dir(service);
                ServiceState {
                    service,
                    directory_exists: directory.is_dir(),
                    directory,
                    url: service.url(&self.services),
                    set_up: self.is_set_up(service),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::runner::{CommandOutput, MockCommandRunner};
    use std::time::Instant;
    use tempfile::TempDir;

    struct FixedProbe(bool);

    impl ReadinessProbe for FixedProbe {
        fn is_ready(&self, _url: &str) -> bool {
            self.0
        }
    }

    fn fast_services() -> ServicesConfig {
        ServicesConfig {
            wait_timeout_secs: 1,
            poll_interval_secs: 1,
            ..ServicesConfig::default()
        }
    }

    fn workspace() -> TempDir {
        let temp_dir = TempDir::new().unwrap();
        std::fs::create_dir(temp_dir.path().join("etengine")).unwrap();
        std::fs::create_dir(temp_dir.path().join("etmodel")).unwrap();
        temp_dir
    }

    fn manager_with(
        root: &TempDir,
        runner: MockCommandRunner,
        ready: bool,
    ) -> (Arc<SetupJobManager>, Arc<MockCommandRunner>) {
        let runner = Arc::new(runner);
        let manager = SetupJobManager::with_runner(
            root.path().to_path_buf(),
            fast_services(),
            runner.clone(),
            Arc::new(FixedProbe(ready)),
        );
        (manager, runner)
    }

    fn wait_finished(manager: &SetupJobManager, job_id: &str) -> SetupJob {
        let start = Instant::now();
        loop {
            let job = manager.get_job(job_id).unwrap();
            if job.status.is_finished() || start.elapsed() > Duration::from_secs(5) {
                return job;
            }
            thread::sleep(Duration::from_millis(10));
        }
    }

    #[test]
    fn test_job_status_display() {
        assert_eq!(JobStatus::Pending.to_string(), "pending");
        assert_eq!(JobStatus::Running.to_string(), "running");
        assert_eq!(JobStatus::Completed.to_string(), "completed");
        assert_eq!(JobStatus::Failed.to_string(), "failed");
    }

    #[test]
    fn test_setup_job_new() {
        let job = SetupJob::new(Service::Etmodel);

        assert!(!job.id.is_empty());
        assert_eq!(job.status, JobStatus::Pending);
        assert_eq!(job.progress, 0);
        assert!(job.outputs.is_empty());
        assert!(job.admin_password.is_none());
    }

    #[test]
    fn test_engine_setup_scrapes_password() {
        let root = workspace();
        let runner = MockCommandRunner::new().with_output(
            SETUP_COMMANDS[2],
            CommandOutput::ok("Created admin user admin@example.org with password: hunter2 |\n"),
        );
        let (manager, runner) = manager_with(&root, runner, true);

        let job = manager.start_setup(Service::Etengine).unwrap();
        let job = wait_finished(&manager, &job.id);

        assert_eq!(job.status, JobStatus::Completed);
        assert_eq!(job.outputs.len(), 4);
        assert_eq!(job.admin_password.as_deref(), Some("hunter2"));
        assert_eq!(job.server_ready, None);
        assert_eq!(manager.admin_password().as_deref(), Some("hunter2"));

        let calls = runner.calls();
        assert_eq!(calls.len(), 4);
        assert!(calls.iter().all(|(dir, _)| dir.ends_with("etengine")));
        assert_eq!(calls[0].1, "docker-compose build");
    }

    #[test]
    fn test_setup_stops_at_first_failure() {
        let root = workspace();
        let runner = MockCommandRunner::new()
            .with_output(SETUP_COMMANDS[1], CommandOutput::failed(2, "bundler error"));
        let (manager, runner) = manager_with(&root, runner, true);

        let job = manager.start_setup(Service::Etmodel).unwrap();
        let job = wait_finished(&manager, &job.id);

        assert_eq!(job.status, JobStatus::Failed);
        assert!(job.error.unwrap().contains("exited with 2"));
        assert_eq!(runner.calls().len(), 2);
        assert!(!manager.is_set_up(Service::Etmodel));
    }

    #[test]
    fn test_model_setup_waits_for_server() {
        let root = workspace();
        let (manager, _) = manager_with(&root, MockCommandRunner::new(), true);

        let job = manager.start_setup(Service::Etmodel).unwrap();
        let job = wait_finished(&manager, &job.id);

        assert_eq!(job.status, JobStatus::Completed);
        assert_eq!(job.server_ready, Some(true));
    }

    #[test]
    fn test_model_setup_completes_when_server_never_answers() {
        let root = workspace();
        let (manager, _) = manager_with(&root, MockCommandRunner::new(), false);

        let job = manager.start_setup(Service::Etmodel).unwrap();
        let job = wait_finished(&manager, &job.id);

        assert_eq!(job.status, JobStatus::Completed);
        assert_eq!(job.server_ready, Some(false));
    }

    #[test]
    fn test_service_not_set_up_twice() {
        let root = workspace();
        let (manager, _) = manager_with(&root, MockCommandRunner::new(), true);

        let job = manager.start_setup(Service::Etengine).unwrap();
        wait_finished(&manager, &job.id);

        let err = manager.start_setup(Service::Etengine).unwrap_err();
        assert_eq!(err, StartError::AlreadySetUp(Service::Etengine));
    }

    #[test]
    fn test_retry_while_busy_never_sets_up_twice() {
        let root = workspace();
        let mut accepted = 0;

        for _ in 0..100 {
            let (manager, _) = manager_with(&root, MockCommandRunner::new(), true);
            manager.start_setup(Service::Etengine).unwrap();

            loop {
                match manager.start_setup(Service::Etengine) {
                    Err(StartError::Busy) => thread::yield_now(),
                    Err(StartError::AlreadySetUp(_)) => break,
                    Ok(_) => {
                        accepted += 1;
                        break;
                    }
                    Err(e) => panic!("unexpected error: {e}"),
                }
            }
        }

        assert_eq!(accepted, 0);
    }

    #[test]
    fn test_missing_service_directory() {
        let root = TempDir::new().unwrap();
        let (manager, _) = manager_with(&root, MockCommandRunner::new(), true);

        let err = manager.start_setup(Service::Etengine).unwrap_err();
        assert!(matches!(err, StartError::MissingDirectory(_)));
        assert!(err.to_string().contains("Service directory not found"));
    }

    #[test]
    fn test_services_state() {
        let root = workspace();
        let (manager, _) = manager_with(&root, MockCommandRunner::new(), true);

        let states = manager.services();
        assert_eq!(states.len(), 2);
        assert!(states.iter().all(|s| s.directory_exists && !s.set_up));
        assert_eq!(states[1].url, "http://localhost:3001");
    }
}
