//! Error types for configuration and command parsing.

/// Errors raised while reading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An environment variable holds an unusable value.
    #[error("invalid value for {var}: {reason}")]
    Invalid {
        /// The variable name.
        var: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
}

/// Errors raised while parsing a command line.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// The line names no known command.
    #[error("unknown command: {0} (try `help`)")]
    UnknownCommand(String),

    /// A required argument is absent.
    #[error("`{command}` needs {argument}")]
    MissingArgument {
        /// The command being parsed.
        command: &'static str,
        /// Description of the missing argument.
        argument: &'static str,
    },

    /// An argument could not be parsed.
    #[error("invalid {argument}: {reason}")]
    InvalidArgument {
        /// Description of the argument.
        argument: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
}
