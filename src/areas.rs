//! Built-in test areas
//!
//! External feature suites register themselves through [`TestArea`]; the
//! harness ships a single readiness area so a bare run still exercises the
//! whole launch/run/teardown lifecycle.

use async_trait::async_trait;

use crate::common::{Error, Result};
use crate::driver::ApplicationDriver;
use crate::runner::{AreaContext, ScenarioHook, Suite, TestArea};

/// The default area set for a run
pub fn builtin() -> Vec<Box<dyn TestArea>> {
    vec![Box::new(WorkbenchReadiness)]
}

/// Verifies the application survives its own startup
pub struct WorkbenchReadiness;

impl TestArea for WorkbenchReadiness {
    fn name(&self) -> &'static str {
        "workbench"
    }

    fn setup(&self, suite: &mut Suite, cx: &AreaContext) {
        suite.register(Box::new(ReadinessScenario { web: cx.web }));
    }
}

struct ReadinessScenario {
    web: bool,
}

#[async_trait]
impl ScenarioHook for ReadinessScenario {
    fn title(&self) -> &str {
        if self.web {
            "workbench: web server stays up after startup"
        } else {
            "workbench: application stays up after startup"
        }
    }

    async fn run(&self, app: &mut dyn ApplicationDriver) -> Result<()> {
        if app.is_running().await? {
            Ok(())
        } else {
            Err(Error::driver("application is no longer running"))
        }
    }
}
