//! Workflow option sets.
//!
//! Every recognized option is enumerated here with its type and default;
//! the CLI fills these in once at workflow entry.

/// Options for the create-environment workflow.
#[derive(Debug, Clone)]
pub struct CreateOptions {
    /// Remove the scratch working copy when the run finishes.
    pub cleanup_temp_dir: bool,
}

impl Default for CreateOptions {
    fn default() -> Self {
        Self {
            cleanup_temp_dir: true,
        }
    }
}

/// Options for the deploy workflow.
#[derive(Debug, Clone)]
pub struct DeployOptions {
    pub cleanup_temp_dir: bool,
    /// Back up dev before the force-push and the target before the deploy.
    pub create_backup: bool,
    /// Clear the target environment's caches after the deploy.
    pub clear_cache: bool,
    /// Rebase strategy passed to `git rebase -X`; empty means plain rebase.
    pub merge_strategy: String,
    /// Annotation message for the deployment tag.
    pub message: String,
}

impl Default for DeployOptions {
    fn default() -> Self {
        Self {
            cleanup_temp_dir: true,
            create_backup: false,
            clear_cache: false,
            merge_strategy: "theirs".to_string(),
            message: "Hotfix deployment".to_string(),
        }
    }
}

impl DeployOptions {
    pub fn rebase_strategy(&self) -> Option<&str> {
        if self.merge_strategy.is_empty() {
            None
        } else {
            Some(&self.merge_strategy)
        }
    }
}
