//! Scope-by-scope resolution of a variables document
//!
//! Global, environment and datacenter scopes are resolved strictly in that
//! order, and within a scope literals come first followed by `secrets`,
//! `kv_secrets` and `kv1_secrets`. Nothing is deduplicated: a later scope
//! that redeclares a name simply appends another output for it.

use crate::readers::{KvV1Reader, SecretBackend, SecretReader, SimpleSecretReader, VersionedKvReader};
use crate::topology::{LazyTopology, Topology};
use buildenv_core::{
    KvVersion, Output, OutputList, Result, Scope, ScopeKind, SecretCategory, Variables,
};
use buildenv_vault::SecretStore;
use std::sync::Arc;

/// Resolves variables documents against a secret store
pub struct EnvReader {
    /// `None` resolves literals only and never contacts a store
    store: Option<Arc<dyn SecretStore>>,
    topology: LazyTopology,
    /// Protocol assumed for reads when mount introspection is unavailable
    undetected_version: KvVersion,
}

impl EnvReader {
    #[must_use]
    pub fn new(store: Arc<dyn SecretStore>) -> Self {
        Self {
            store: Some(store),
            topology: LazyTopology::new(),
            undetected_version: KvVersion::V2,
        }
    }

    /// A reader that skips every secret declaration
    #[must_use]
    pub fn literals_only() -> Self {
        Self {
            store: None,
            topology: LazyTopology::new(),
            undetected_version: KvVersion::V2,
        }
    }

    #[must_use]
    pub fn with_undetected_version(mut self, version: KvVersion) -> Self {
        self.undetected_version = version;
        self
    }

    /// Use a known topology instead of asking the store
    #[must_use]
    pub fn with_topology(mut self, topology: Topology) -> Self {
        self.topology = LazyTopology::ready(topology);
        self
    }

    #[must_use]
    pub fn skips_secrets(&self) -> bool {
        self.store.is_none()
    }

    /// Resolve the global scope, then `environment` and `datacenter` when non-empty.
    ///
    /// Unknown environment or datacenter names resolve as empty scopes. The
    /// first secret error aborts the run and no outputs are returned.
    pub async fn resolve(
        &self,
        variables: &Variables,
        environment: &str,
        datacenter: &str,
    ) -> Result<OutputList> {
        let empty = Scope::default();
        let mut outputs = OutputList::new();

        self.resolve_scope(ScopeKind::Global, &variables.scope, &mut outputs)
            .await?;

        if !environment.is_empty() {
            let scope = variables
                .environment(environment)
                .map(|env| &env.scope)
                .unwrap_or(&empty);
            self.resolve_scope(
                ScopeKind::Environment(environment.to_string()),
                scope,
                &mut outputs,
            )
            .await?;
        }

        if !datacenter.is_empty() {
            let scope = variables
                .datacenter(environment, datacenter)
                .unwrap_or(&empty);
            self.resolve_scope(
                ScopeKind::Datacenter(datacenter.to_string()),
                scope,
                &mut outputs,
            )
            .await?;
        }

        tracing::debug!(
            outputs = outputs.variables().count(),
            "Resolved variables"
        );
        Ok(outputs)
    }

    async fn resolve_scope(
        &self,
        kind: ScopeKind,
        scope: &Scope,
        outputs: &mut OutputList,
    ) -> Result<()> {
        outputs.push(Output::comment(kind.comment()));
        outputs.extend(scope.literal_outputs());

        let Some(store) = &self.store else {
            if scope.has_secrets() {
                tracing::debug!(scope = %kind, "Skipping secret declarations");
            }
            return Ok(());
        };

        let backend = SecretBackend::new(store.as_ref(), &self.topology, self.undetected_version);

        let reader = SimpleSecretReader::new(&backend);
        for simple in scope.simple_secrets() {
            let read = reader
                .read(&simple)
                .await
                .map_err(|e| e.in_scope(kind.clone(), SecretCategory::Secrets))?;
            outputs.extend(read);
        }

        let reader = VersionedKvReader::new(&backend);
        for secret in &scope.kv_secrets {
            let read = reader
                .read(secret)
                .await
                .map_err(|e| e.in_scope(kind.clone(), SecretCategory::KvSecrets))?;
            outputs.extend(read);
        }

        let reader = KvV1Reader::new(&backend);
        for secret in &scope.kv1_secrets {
            let read = reader
                .read(secret)
                .await
                .map_err(|e| e.in_scope(kind.clone(), SecretCategory::Kv1Secrets))?;
            outputs.extend(read);
        }

        Ok(())
    }
}
