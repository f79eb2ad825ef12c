//! Recording test doubles shared by the workflow integration tests.
//!
//! Every gateway, git, and prompt interaction is appended to one shared
//! event log so tests can assert both the exact step order of a workflow
//! and the absence of mutations after a precondition failure.

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::rc::Rc;

use terminus_hotfix::context::WorkflowContext;
use terminus_hotfix::error::Result;
use terminus_hotfix::gateway::{BackupPlan, EnvRecord, Gateway, ModeChange, Site, WorkflowRecord};
use terminus_hotfix::git::Git;
use terminus_hotfix::job::{JobHandle, JobProgress};
use terminus_hotfix::prompt::Confirm;

pub type EventLog = Rc<RefCell<Vec<String>>>;

pub fn event_log() -> EventLog {
    Rc::new(RefCell::new(Vec::new()))
}

/// Rebase a resolved context's scratch paths into a test-owned temp root so
/// parallel tests never share a directory.
pub fn scope_workspace(ctx: &mut WorkflowContext, root: &tempfile::TempDir) {
    ctx.temp_dir = root.path().join("scratch");
    ctx.work_dir = ctx.temp_dir.join(&ctx.site.name);
}

/// Events recorded after context resolution finished, i.e. the workflow's
/// own steps.
pub fn events_after_resolution(events: &EventLog) -> Vec<String> {
    events
        .borrow()
        .iter()
        .filter(|e| !e.starts_with("resolve."))
        .cloned()
        .collect()
}

/// Assert `expected` appears in `events` in order (other events may be
/// interleaved).
pub fn assert_ordered(events: &[String], expected: &[&str]) {
    let mut position = 0;
    for step in expected {
        match events[position..].iter().position(|e| e == step) {
            Some(offset) => position += offset + 1,
            None => panic!(
                "expected '{}' after position {} in events: {:#?}",
                step, position, events
            ),
        }
    }
}

pub struct InstantJob {
    pub label: String,
    pub succeeded: bool,
    pub message: String,
}

impl JobHandle for InstantJob {
    fn describe(&self) -> String {
        self.label.clone()
    }

    fn check(&mut self) -> Result<JobProgress> {
        Ok(JobProgress::Done {
            succeeded: self.succeeded,
            message: self.message.clone(),
        })
    }
}

pub struct MockGateway {
    pub events: EventLog,
    pub site_name: String,
    pub frozen: bool,
    pub env_ids: Vec<String>,
    /// Deployed target refs per environment, raw wire form.
    pub deployed: BTreeMap<String, String>,
    pub branches: BTreeSet<String>,
    pub jobs_succeed: bool,
    pub latest: RefCell<WorkflowRecord>,
}

impl MockGateway {
    /// Site `demo` with dev/test/live plus a `hotfix` multidev, a `hotfix`
    /// branch, live deployed at tag 7, and an already-finished deployment
    /// workflow in the log.
    pub fn demo(events: EventLog) -> Self {
        let mut deployed = BTreeMap::new();
        deployed.insert("dev".into(), "refs/heads/master".into());
        deployed.insert("test".into(), "refs/tags/pantheon_test_4".into());
        deployed.insert("live".into(), "refs/tags/pantheon_live_7".into());
        deployed.insert("hotfix".into(), "refs/heads/hotfix".into());

        Self {
            events,
            site_name: "demo".into(),
            frozen: false,
            env_ids: vec!["dev".into(), "test".into(), "live".into(), "hotfix".into()],
            deployed,
            branches: BTreeSet::from(["master".to_string(), "hotfix".to_string()]),
            jobs_succeed: true,
            latest: RefCell::new(WorkflowRecord {
                created_at: 4_102_444_800, // far future, always past the baseline
                description: "Deploy code to \"live\"".into(),
                status: "succeeded".into(),
                succeeded: true,
            }),
        }
    }

    fn record(&self, event: String) {
        self.events.borrow_mut().push(event);
    }

    fn job(&self, label: &str) -> Box<dyn JobHandle> {
        Box::new(InstantJob {
            label: label.to_string(),
            succeeded: self.jobs_succeed,
            message: format!("{} finished", label),
        })
    }

    /// Count of events that mutate remote or local state.
    pub fn mutation_count(&self) -> usize {
        self.events
            .borrow()
            .iter()
            .filter(|e| {
                e.starts_with("git.")
                    || e.starts_with("gateway.create")
                    || e.starts_with("gateway.set")
                    || e.starts_with("gateway.clear")
            })
            .count()
    }
}

impl Gateway for MockGateway {
    fn site(&self, _name: &str) -> Result<Site> {
        self.record("resolve.site".into());
        Ok(Site {
            id: "11111111-1111-1111-1111-111111111111".into(),
            name: self.site_name.clone(),
            frozen: self.frozen,
        })
    }

    fn environment(&self, _site: &str, env: &str) -> Result<EnvRecord> {
        self.record(format!("resolve.environment {}", env));
        Ok(EnvRecord {
            id: env.to_string(),
            target_ref: self
                .deployed
                .get(env)
                .cloned()
                .unwrap_or_else(|| "refs/heads/master".into()),
        })
    }

    fn environment_ids(&self, _site: &str) -> Result<Vec<String>> {
        self.record("resolve.environment-ids".into());
        Ok(self.env_ids.clone())
    }

    fn git_url(&self, _site: &str) -> Result<String> {
        self.record("resolve.git-url".into());
        Ok("ssh://codeserver.dev@codeserver.dev.demo.drush.in:2222/~/repository.git".into())
    }

    fn branches(&self, _site: &str) -> Result<BTreeSet<String>> {
        self.record("resolve.branches".into());
        Ok(self.branches.clone())
    }

    fn create_environment(
        &self,
        _site: &str,
        multidev: &str,
        source_env: &str,
    ) -> Result<Box<dyn JobHandle>> {
        self.record(format!(
            "gateway.create-environment {} from {}",
            multidev, source_env
        ));
        Ok(self.job(&format!("creation of the {} environment", multidev)))
    }

    fn create_backup(
        &self,
        _site: &str,
        env: &str,
        plan: &BackupPlan,
    ) -> Result<Box<dyn JobHandle>> {
        assert_eq!(plan.keep_for_days, 365);
        self.record(format!("gateway.create-backup {}", env));
        Ok(self.job(&format!("backup of the {} environment", env)))
    }

    fn set_connection_mode(&self, _site: &str, env: &str, mode: &str) -> Result<ModeChange> {
        self.record(format!("gateway.set-connection-mode {} {}", env, mode));
        Ok(ModeChange::Applied(format!(
            "Enabled {} connection mode on {}",
            mode, env
        )))
    }

    fn clear_cache(&self, _site: &str, env: &str) -> Result<Box<dyn JobHandle>> {
        self.record(format!("gateway.clear-cache {}", env));
        Ok(self.job(&format!("cache clear on {}", env)))
    }

    fn latest_workflow(&self, _site: &str) -> Result<WorkflowRecord> {
        self.record("gateway.latest-workflow".into());
        Ok(self.latest.borrow().clone())
    }
}

pub struct MockGit {
    pub events: EventLog,
}

impl MockGit {
    pub fn new(events: EventLog) -> Self {
        Self { events }
    }

    fn record(&self, event: String) {
        self.events.borrow_mut().push(event);
    }
}

impl Git for MockGit {
    fn clone_repo(&self, _url: &str, _dest: &Path) -> Result<()> {
        self.record("git.clone".into());
        Ok(())
    }

    fn fetch_tags(&self, _repo: &Path) -> Result<()> {
        self.record("git.fetch-tags".into());
        Ok(())
    }

    fn checkout(&self, _repo: &Path, reference: &str) -> Result<()> {
        self.record(format!("git.checkout {}", reference));
        Ok(())
    }

    fn create_branch(&self, _repo: &Path, branch: &str) -> Result<()> {
        self.record(format!("git.branch {}", branch));
        Ok(())
    }

    fn push_upstream(&self, _repo: &Path, branch: &str) -> Result<()> {
        self.record(format!("git.push-upstream {}", branch));
        Ok(())
    }

    fn tag_annotated(&self, _repo: &Path, tag: &str, message: &str) -> Result<()> {
        self.record(format!("git.tag {} ({})", tag, message));
        Ok(())
    }

    fn rebase(&self, _repo: &Path, onto: &str, strategy: Option<&str>) -> Result<()> {
        match strategy {
            Some(strategy) => self.record(format!("git.rebase {} -X {}", onto, strategy)),
            None => self.record(format!("git.rebase {}", onto)),
        }
        Ok(())
    }

    fn push(&self, _repo: &Path, reference: &str) -> Result<()> {
        self.record(format!("git.push {}", reference));
        Ok(())
    }

    fn force_push(&self, _repo: &Path, branch: &str) -> Result<()> {
        self.record(format!("git.force-push {}", branch));
        Ok(())
    }
}

pub struct StubConfirm {
    pub events: EventLog,
    pub answer: bool,
}

impl Confirm for StubConfirm {
    fn confirm(&self, _question: &str) -> bool {
        self.events.borrow_mut().push("confirm".into());
        self.answer
    }
}
