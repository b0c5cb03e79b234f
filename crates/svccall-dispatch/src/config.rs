/// Default byte budget for the single reply read.
pub const DEFAULT_MAX_REPLY_SIZE: usize = 10_000;

/// Controls how calls are rendered and how replies are read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchConfig {
    /// Words preceding the service name on the command line.
    pub invoke_command: Vec<String>,
    /// Maximum bytes taken by the one blocking read per call.
    pub max_reply_size: usize,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            invoke_command: vec!["service".to_string(), "call".to_string()],
            max_reply_size: DEFAULT_MAX_REPLY_SIZE,
        }
    }
}
