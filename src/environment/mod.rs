//! Local ETEngine / ETModel environment bring-up.
//!
//! Each service is a sibling checkout of the data root that ships a
//! `docker-compose` setup. Setting a service up runs a fixed command
//! sequence inside its directory as a background job; the scraped admin
//! password and command outputs are kept on the job.

pub mod jobs;
pub mod probe;
pub mod runner;
pub mod scrape;

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::ServicesConfig;

pub use jobs::{JobStatus, ServiceState, SetupJob, SetupJobManager, StartError};
pub use probe::{wait_for_server, HttpProbe, ReadinessProbe};
pub use runner::{CommandOutput, CommandRunner, MockCommandRunner, RealCommandRunner};
pub use scrape::{extract_admin_password, extract_identity_info, update_settings_file, IdentityInfo};

/// Commands run, in order, inside a service directory.
pub const SETUP_COMMANDS: [&str; 4] = [
    "docker-compose build",
    "docker-compose run --rm web bundle install",
    "docker-compose run --rm web bash -c 'bin/rails db:drop && bin/setup'",
    "docker-compose up -d",
];

/// A locally run service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Service {
    /// The calculation engine
    Etengine,
    /// The front-end model
    Etmodel,
}

impl Service {
    /// Both services in bring-up order.
    pub const ALL: [Self; 2] = [Self::Etengine, Self::Etmodel];

    /// Directory name of the checkout (also the API name).
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Etengine => "etengine",
            Self::Etmodel => "etmodel",
        }
    }

    /// Parses a service name, ignoring case.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|service| service.name().eq_ignore_ascii_case(name.trim()))
    }

    /// URL the service answers on once started.
    #[must_use]
    pub fn url(self, services: &ServicesConfig) -> String {
        match self {
            Self::Etengine => services.engine_url.clone(),
            Self::Etmodel => services.model_url.clone(),
        }
    }

    /// Whether setup output carries the admin password.
    #[must_use]
    pub fn reports_admin_password(self) -> bool {
        self == Self::Etengine
    }

    /// Whether setup waits for the service to answer over HTTP.
    #[must_use]
    pub fn waits_for_server(self) -> bool {
        self == Self::Etmodel
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
