//! Ecosystem -> registry client factory
//!
//! One `Registry` per ecosystem, all sharing the same HTTP client and built
//! from the configured URL templates.

use std::collections::HashMap;
use std::sync::Arc;

use crate::config::RegistriesConfig;
use crate::parser::types::Ecosystem;
use crate::version::registries::{
    GoProxyRegistry, MavenCentralRegistry, NpmRegistry, PypiRegistry, RubyGemsRegistry,
};
use crate::version::registry::Registry;

/// Build the registry client for a single ecosystem
pub fn create_registry(
    ecosystem: Ecosystem,
    registries: &RegistriesConfig,
    client: &reqwest::Client,
) -> Arc<dyn Registry> {
    let template = registries.template(ecosystem);
    let client = client.clone();

    match ecosystem {
        Ecosystem::Node => Arc::new(NpmRegistry::new(template, client)),
        Ecosystem::Python => Arc::new(PypiRegistry::new(template, client)),
        Ecosystem::Ruby => Arc::new(RubyGemsRegistry::new(template, client)),
        Ecosystem::Maven => Arc::new(MavenCentralRegistry::new(template, client)),
        Ecosystem::Go => Arc::new(GoProxyRegistry::new(template, client)),
    }
}

/// Create registry clients for all supported ecosystems
pub fn create_registries(
    registries: &RegistriesConfig,
    client: &reqwest::Client,
) -> HashMap<Ecosystem, Arc<dyn Registry>> {
    Ecosystem::ALL
        .into_iter()
        .map(|ecosystem| (ecosystem, create_registry(ecosystem, registries, client)))
        .collect()
}
