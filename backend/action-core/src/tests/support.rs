//! Fakes shared by the unit tests.

use crate::config::{ActionSpec, Config, MenuSpec};
use crate::error::exec::ExecError;
use crate::pool::{ScriptExit, ScriptRunner};

use models::Pattern;

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use futures_util::future::BoxFuture;
use tokio::sync::Semaphore;

/// Runner that blocks every script until the test releases it, and records
/// how many ran at once.
pub(crate) struct GatedRunner {
    gate: Semaphore,
    started: AtomicUsize,
    current: AtomicUsize,
    peak: AtomicUsize,
    links: Mutex<Vec<String>>,
}

impl GatedRunner {
    pub(crate) fn new() -> Self {
        Self {
            gate: Semaphore::new(0),
            started: AtomicUsize::new(0),
            current: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
            links: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn release(&self, count: usize) {
        self.gate.add_permits(count);
    }

    pub(crate) fn started(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }

    pub(crate) fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    pub(crate) fn links(&self) -> Vec<String> {
        self.links.lock().unwrap().clone()
    }
}

impl ScriptRunner for GatedRunner {
    fn run<'a>(
        &'a self,
        _script: &'a str,
        link: &'a str,
    ) -> BoxFuture<'a, Result<ScriptExit, ExecError>> {
        Box::pin(async move {
            let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            self.links.lock().unwrap().push(link.to_string());
            self.started.fetch_add(1, Ordering::SeqCst);

            self.gate.acquire().await.unwrap().forget();

            self.current.fetch_sub(1, Ordering::SeqCst);
            Ok(ScriptExit::from_code(Some(0)))
        })
    }
}

/// Poll `condition` until it holds, failing the test after five seconds.
pub(crate) async fn wait_until(mut condition: impl FnMut() -> bool) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while !condition() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("Condition was not met within 5 seconds");
}

/// A link menu with one action per script.
pub(crate) fn link_menu(scripts: &[(&str, &str)]) -> MenuSpec {
    MenuSpec::link(
        vec![Pattern::new("*", ".*")],
        scripts
            .iter()
            .map(|(name, script)| ActionSpec::new(*name, *script))
            .collect(),
    )
}

pub(crate) fn config_with(menus: Vec<MenuSpec>, executors: i64) -> Config {
    Config {
        executors,
        menus,
        ..Config::default()
    }
}
