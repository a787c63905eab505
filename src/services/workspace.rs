//! One data root plus the ETLocal checkout it exports to.
//!
//! Ties the loader, resolver, session and outputs together so the web and
//! command-line surfaces run the same form operations.

use anyhow::Result;
use std::path::Path;

use crate::config::Config;
use crate::models::KeyCatalog;

use super::data_store::{DataStore, Loaded};
use super::dataset::{GeneratedDataset, OutputDir};
use super::migration::MigrationService;
use super::resolver::{resolve, FormFilter, FormView};
use super::session::{FormSession, PopulateAction};

/// Data root, output directory and migration target of one configuration.
#[derive(Debug, Clone)]
pub struct Workspace {
    config: Config,
    store: DataStore,
    output: OutputDir,
    migrations: MigrationService,
}

impl Workspace {
    /// Builds a workspace from configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        let store = DataStore::new(&config.paths.data_root);
        let output = OutputDir::new(config.output_dir());
        let migrations = MigrationService::new(config.migrate_dir(), output.clone());
        Self {
            config,
            store,
            output,
            migrations,
        }
    }

    /// Configuration in use.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Data root.
    #[must_use]
    pub fn data_root(&self) -> &Path {
        self.store.root()
    }

    /// Table loader.
    #[must_use]
    pub fn store(&self) -> &DataStore {
        &self.store
    }

    /// Output directory.
    #[must_use]
    pub fn output(&self) -> &OutputDir {
        &self.output
    }

    /// ETLocal migrations.
    #[must_use]
    pub fn migrations(&self) -> &MigrationService {
        &self.migrations
    }

    /// Loads the key catalog. Fails when the key or translation table is
    /// missing or empty.
    pub fn catalog(&self) -> Result<KeyCatalog> {
        self.store.load_catalog()
    }

    /// Renders the form of `preset` over `session`.
    ///
    /// Catalog keys get an (empty) value if new, and keys outside the preset
    /// are forced to "0" when empty, before the resolver runs.
    pub fn form(
        &self,
        catalog: &KeyCatalog,
        session: &mut FormSession,
        preset: &str,
        filter: FormFilter,
        debug: bool,
    ) -> Result<Loaded<FormView>> {
        let mut warnings = Vec::new();
        let preset = self.store.load_preset(preset)?.collect_into(&mut warnings);

        session.init(catalog);
        session.apply_preset(&preset);

        let resolution = resolve(catalog, &preset, session.values());
        Ok(Loaded {
            value: FormView::build(&preset.name, &resolution, filter, debug),
            warnings,
        })
    }

    /// Runs a populate action for `preset`. Returns the number of changed values.
    pub fn populate(
        &self,
        catalog: &KeyCatalog,
        session: &mut FormSession,
        preset: &str,
        action: PopulateAction,
    ) -> Result<Loaded<usize>> {
        let mut warnings = Vec::new();
        let preset = self.store.load_preset(preset)?.collect_into(&mut warnings);

        session.init(catalog);
        let changed = session.populate(&preset, action);

        Ok(Loaded {
            value: changed,
            warnings,
        })
    }

    /// Writes the session values to `output/data.csv` and marks the session
    /// as generated.
    pub fn generate(
        &self,
        catalog: &KeyCatalog,
        session: &mut FormSession,
        preset: &str,
    ) -> Result<Loaded<GeneratedDataset>> {
        let mut warnings = Vec::new();
        let preset = self.store.load_preset(preset)?.collect_into(&mut warnings);

        session.init(catalog);
        session.apply_preset(&preset);

        let generated = self.output.generate(&session.columns())?;
        session.mark_generated();

        Ok(Loaded {
            value: generated,
            warnings,
        })
    }
}
