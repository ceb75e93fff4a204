use thiserror::Error;

/// Result type alias using KdevError
pub type Result<T> = std::result::Result<T, KdevError>;

// ========== Error Facility ==========

/// Stable error classification used for log fields and exit handling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Invocation
    UnknownCommand,
    MissingArgument,
    InvalidInput,

    // Catalog / rendering
    NotFound,
    InvalidParameter,
    InvalidCatalog,

    // Runtime
    AlreadyExists,
    ExternalService,

    // Integration
    Io,
    Config,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::UnknownCommand => "ERR_UNKNOWN_COMMAND",
            ExErrorKind::MissingArgument => "ERR_MISSING_ARGUMENT",
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::InvalidParameter => "ERR_INVALID_PARAMETER",
            ExErrorKind::InvalidCatalog => "ERR_INVALID_CATALOG",
            ExErrorKind::AlreadyExists => "ERR_ALREADY_EXISTS",
            ExErrorKind::ExternalService => "ERR_EXTERNAL_SERVICE",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Config => "ERR_CONFIG",
        }
    }
}

/// Structured error record for logging
///
/// Every `KdevError` converts into one of these; the logging macros only deal
/// with this shape.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    entity: Option<String>,
    message: String,
}

impl ExError {
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            entity: None,
            message: String::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add the verb, component key, file or namespace the error is about
    pub fn with_entity(mut self, entity: impl Into<String>) -> Self {
        self.entity = Some(entity.into());
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn entity(&self) -> Option<&str> {
        self.entity.as_deref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(entity) = &self.entity {
            write!(f, " ({})", entity)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Error taxonomy for kdev operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum KdevError {
    // ===== Invocation Errors =====
    /// Verb not present in the dispatch table or catalog
    #[error("Unknown command: {verb}")]
    UnknownCommand { verb: String },

    /// A required positional argument was not supplied
    #[error("Missing argument <{argument}> (position {position}) for '{verb}'")]
    MissingArgument {
        verb: String,
        argument: String,
        position: usize,
    },

    /// A positional argument failed conversion, or too many were supplied
    #[error("Invalid argument <{argument}> for '{verb}': {reason}")]
    InvalidArgument {
        verb: String,
        argument: String,
        reason: String,
    },

    /// Manifest file given to deploy/delete-app does not exist
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    // ===== Catalog / Rendering Errors =====
    #[error("Unknown component: {key}")]
    UnknownComponent { key: String },

    #[error("Unknown environment: {name}")]
    UnknownEnvironment { name: String },

    #[error("Unknown wizard: {name}")]
    UnknownWizard { name: String },

    /// Required parameter without default, or a parameter the template does not declare
    #[error("Invalid parameter '{param}' for {component}: {reason}")]
    InvalidParameter {
        component: String,
        param: String,
        reason: String,
    },

    /// An environment or wizard references something that is not registered
    #[error("Invalid catalog: {reason}")]
    InvalidCatalog { reason: String },

    // ===== Runtime Errors =====
    /// A kubectl/helm/minikube/openssl/curl call exited non-zero or could not be spawned
    #[error("{command} failed{}: {stderr}", .exit_code.map(|c| format!(" (exit {})", c)).unwrap_or_default())]
    RuntimeCallFailed {
        tool: String,
        command: String,
        exit_code: Option<i32>,
        stderr: String,
    },

    // ===== Integration Errors =====
    #[error("Configuration error: {reason}")]
    Config { reason: String },

    #[error("I/O error during {op}: {message}")]
    Io { op: String, message: String },
}

impl KdevError {
    /// Build an `Io` error from a std::io::Error
    pub fn io(op: impl Into<String>, err: std::io::Error) -> Self {
        KdevError::Io {
            op: op.into(),
            message: err.to_string(),
        }
    }

    /// True when the runtime refused a create because the object already exists
    ///
    /// Namespace and secret creation treat this as success.
    pub fn is_already_exists(&self) -> bool {
        match self {
            KdevError::RuntimeCallFailed { stderr, .. } => {
                stderr.contains("AlreadyExists") || stderr.contains("already exists")
            }
            _ => false,
        }
    }

    /// Errors raised while parsing the invocation, before any runtime call
    pub fn is_usage_error(&self) -> bool {
        matches!(
            self,
            KdevError::UnknownCommand { .. }
                | KdevError::MissingArgument { .. }
                | KdevError::InvalidArgument { .. }
        )
    }
}

impl From<KdevError> for ExError {
    fn from(err: KdevError) -> Self {
        let already_exists = err.is_already_exists();
        match err {
            KdevError::UnknownCommand { verb } => ExError::new(ExErrorKind::UnknownCommand)
                .with_entity(verb)
                .with_message("Verb is not registered"),

            KdevError::MissingArgument {
                verb,
                argument,
                position,
            } => ExError::new(ExErrorKind::MissingArgument)
                .with_entity(verb)
                .with_message(format!("Missing <{}> at position {}", argument, position)),

            KdevError::InvalidArgument {
                verb,
                argument,
                reason,
            } => ExError::new(ExErrorKind::InvalidInput)
                .with_entity(verb)
                .with_message(format!("<{}>: {}", argument, reason)),

            KdevError::FileNotFound { path } => ExError::new(ExErrorKind::NotFound)
                .with_entity(path)
                .with_message("Manifest file not found"),

            KdevError::UnknownComponent { key } => ExError::new(ExErrorKind::NotFound)
                .with_entity(key)
                .with_message("Component is not registered"),

            KdevError::UnknownEnvironment { name } => ExError::new(ExErrorKind::NotFound)
                .with_entity(name)
                .with_message("Environment is not registered"),

            KdevError::UnknownWizard { name } => ExError::new(ExErrorKind::NotFound)
                .with_entity(name)
                .with_message("Wizard is not registered"),

            KdevError::InvalidParameter {
                component,
                param,
                reason,
            } => ExError::new(ExErrorKind::InvalidParameter)
                .with_entity(component)
                .with_message(format!("{}: {}", param, reason)),

            KdevError::InvalidCatalog { reason } => {
                ExError::new(ExErrorKind::InvalidCatalog).with_message(reason)
            }

            KdevError::RuntimeCallFailed {
                tool,
                command,
                stderr,
                ..
            } => {
                let kind = if already_exists {
                    ExErrorKind::AlreadyExists
                } else {
                    ExErrorKind::ExternalService
                };
                ExError::new(kind)
                    .with_op(tool)
                    .with_entity(command)
                    .with_message(stderr.trim().to_string())
            }

            KdevError::Config { reason } => ExError::new(ExErrorKind::Config).with_message(reason),

            KdevError::Io { op, message } => ExError::new(ExErrorKind::Io)
                .with_op(op)
                .with_message(message),
        }
    }
}

impl From<toml::de::Error> for KdevError {
    fn from(err: toml::de::Error) -> Self {
        KdevError::Config {
            reason: err.to_string(),
        }
    }
}
