use thiserror::Error;

/// Errors returned by signal lookups.
///
/// Mutating registry operations never fail; only resolving a key can.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignalError {
    #[error("Failed to acquire signal registry lock")]
    RegistryLock,
    #[error("No signal with GUID {guid:?} in registry")]
    GuidNotFound { guid: String },
    #[error("No signal named {name:?} in registry")]
    NameNotFound { name: String },
}

impl SignalError {
    /// Returns `true` for both lookup misses.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            SignalError::GuidNotFound { .. } | SignalError::NameNotFound { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_lock_display() {
        let err = SignalError::RegistryLock;
        assert_eq!(err.to_string(), "Failed to acquire signal registry lock");
    }

    #[test]
    fn test_guid_not_found_display() {
        let err = SignalError::GuidNotFound {
            guid: "g1".to_string(),
        };
        assert_eq!(err.to_string(), "No signal with GUID \"g1\" in registry");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_name_not_found_display() {
        let err = SignalError::NameNotFound {
            name: "Door".to_string(),
        };
        assert_eq!(err.to_string(), "No signal named \"Door\" in registry");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_lock_error_is_not_a_miss() {
        assert!(!SignalError::RegistryLock.is_not_found());
    }

    #[test]
    fn test_error_trait() {
        let err: &dyn std::error::Error = &SignalError::NameNotFound {
            name: "x".to_string(),
        };
        assert_eq!(err.to_string(), "No signal named \"x\" in registry");
    }
}
