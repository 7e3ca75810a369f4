use tubegraph_domain::ports::BoxFuture;
use tubegraph_domain::ports::Repositories;
use tubegraph_domain::ports::db::{DbAdapter, DbError};

use crate::config::AppConfig;
use crate::repositories::memory_repositories;

/// Health probe for the in-process store. It cannot be unreachable, so the
/// check only confirms the user collection answers.
#[derive(Clone)]
pub struct MemoryAdapter {
    repos: Repositories,
}

impl MemoryAdapter {
    pub fn new(repos: Repositories) -> Self {
        Self { repos }
    }
}

impl DbAdapter for MemoryAdapter {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn health_check(&self) -> BoxFuture<'_, Result<(), DbError>> {
        let users = self.repos.users.clone();
        Box::pin(async move {
            users
                .get_many(&[])
                .await
                .map(|_| ())
                .map_err(|err| DbError::Unavailable(err.to_string()))?;
            tracing::debug!("memory store health check succeeded");
            Ok(())
        })
    }
}

/// Builds the relation store named by `data_backend`.
pub fn build_store(config: &AppConfig) -> anyhow::Result<(Repositories, MemoryAdapter)> {
    match config.data_backend.as_str() {
        "memory" => {
            let repos = memory_repositories();
            let adapter = MemoryAdapter::new(repos.clone());
            Ok((repos, adapter))
        }
        other => Err(anyhow::anyhow!("unsupported data_backend '{other}'")),
    }
}
