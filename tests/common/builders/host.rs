use std::sync::Arc;

use web_metrics::entry::EntryType;
use web_metrics::host::simulated::{SimulatedHost, SimulatedInstrumentation};
use web_metrics::host::{ConnectionInfo, Environment, VisibilityState};

/// A simulated environment with handles on both collaborators
pub struct TestEnvironment {
    pub source: Arc<SimulatedInstrumentation>,
    pub host: Arc<SimulatedHost>,
    pub env: Environment,
}

pub struct TestEnvironmentBuilder {
    supported: Vec<EntryType>,
    rejected: Vec<EntryType>,
    viewport: (u32, u32),
    user_agent: Option<String>,
    connection: Option<ConnectionInfo>,
    visibility_state: VisibilityState,
}

impl TestEnvironmentBuilder {
    pub fn new() -> Self {
        Self {
            supported: EntryType::ALL.to_vec(),
            rejected: Vec::new(),
            viewport: (1280, 800),
            user_agent: None,
            connection: None,
            visibility_state: VisibilityState::Visible,
        }
    }

    pub fn supported(mut self, entry_types: &[EntryType]) -> Self {
        self.supported = entry_types.to_vec();
        self
    }

    pub fn reject(mut self, entry_type: EntryType) -> Self {
        self.rejected.push(entry_type);
        self
    }

    pub fn viewport(mut self, width: u32, height: u32) -> Self {
        self.viewport = (width, height);
        self
    }

    pub fn user_agent(mut self, user_agent: &str) -> Self {
        self.user_agent = Some(user_agent.to_string());
        self
    }

    pub fn connection(mut self, connection: ConnectionInfo) -> Self {
        self.connection = Some(connection);
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visibility_state = VisibilityState::Hidden;
        self
    }

    pub fn build(self) -> TestEnvironment {
        let source = self
            .rejected
            .iter()
            .fold(SimulatedInstrumentation::with_supported_entry_types(self.supported), |source, &entry_type| {
                source.reject(entry_type)
            });

        let mut host = SimulatedHost::new().with_viewport(self.viewport.0, self.viewport.1);
        if let Some(user_agent) = self.user_agent {
            host = host.with_user_agent(user_agent);
        }
        if let Some(connection) = self.connection {
            host = host.with_connection(connection);
        }
        host.set_visibility_state(self.visibility_state);

        let source = Arc::new(source);
        let host = Arc::new(host);
        let env = Environment::new(source.clone(), host.clone());

        TestEnvironment { source, host, env }
    }
}

impl Default for TestEnvironmentBuilder {
    fn default() -> Self {
        Self::new()
    }
}
