//! Shared world state for task engine BDD scenarios.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};
use mockable::Clock;
use rstest::fixture;
use taskmind::task::{
    adapters::InMemoryRemoteStore,
    commands::{ActionEnvelope, TaskList},
    domain::{Task, TaskType},
    ports::{CommandInterpreter, InterpreterError},
    services::{EngineError, RetryPolicy, SyncConfig, TaskEngine},
};

/// Quiet period used by scenarios; short so real-time waits stay cheap.
pub const QUIET_PERIOD: Duration = Duration::from_millis(40);

/// Clock whose calendar day is set by scenario steps.
#[derive(Debug)]
pub struct ScenarioClock {
    today: Mutex<NaiveDate>,
}

impl ScenarioClock {
    fn new() -> Self {
        Self {
            today: Mutex::new(NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid date")),
        }
    }

    /// Moves the clock to `today`.
    pub fn set(&self, today: NaiveDate) {
        *self.today.lock().expect("clock lock") = today;
    }
}

impl Clock for ScenarioClock {
    fn local(&self) -> DateTime<Local> {
        let today = *self.today.lock().expect("clock lock");
        let noon = today.and_hms_opt(12, 0, 0).expect("valid time");
        Local
            .from_local_datetime(&noon)
            .earliest()
            .expect("noon exists in local time")
    }

    fn utc(&self) -> DateTime<Utc> {
        self.local().with_timezone(&Utc)
    }
}

/// Interpreter that answers every request with one prepared envelope.
pub struct ScriptedInterpreter {
    envelope: ActionEnvelope,
}

impl ScriptedInterpreter {
    /// Creates an interpreter replying with `envelope`.
    pub const fn replying(envelope: ActionEnvelope) -> Self {
        Self { envelope }
    }
}

#[async_trait]
impl CommandInterpreter for ScriptedInterpreter {
    async fn interpret(
        &self,
        _text: &str,
        _snapshot: &[Task],
        _active_type: Option<TaskType>,
    ) -> Result<ActionEnvelope, InterpreterError> {
        Ok(self.envelope.clone())
    }
}

/// Engine type used by the BDD world.
pub type TestEngine = TaskEngine<InMemoryRemoteStore, ScenarioClock>;

/// Scenario world for task engine behaviour tests.
pub struct TaskEngineWorld {
    pub store: InMemoryRemoteStore,
    pub clock: Arc<ScenarioClock>,
    pub engine: TestEngine,
    pub list_before_action: Option<TaskList>,
    pub last_action_result: Option<Result<(), EngineError>>,
}

impl TaskEngineWorld {
    /// Creates a world with an empty store and an unhydrated engine.
    #[must_use]
    pub fn new() -> Self {
        let store = InMemoryRemoteStore::new();
        let clock = Arc::new(ScenarioClock::new());
        let engine = TaskEngine::new(
            Arc::new(store.clone()),
            Arc::clone(&clock),
            SyncConfig {
                quiet_period: QUIET_PERIOD,
                retry: RetryPolicy::new(2, Duration::from_millis(5)),
            },
        );

        Self {
            store,
            clock,
            engine,
            list_before_action: None,
            last_action_result: None,
        }
    }
}

impl Default for TaskEngineWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> TaskEngineWorld {
    TaskEngineWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
