//! Tests for error types.

#[cfg(test)]
mod tests {
    use super::super::*;

    #[test]
    fn test_error_display() {
        let err = Error::config("invalid log level");
        assert_eq!(err.to_string(), "configuration error: invalid log level");
    }

    #[test]
    fn test_error_internal() {
        let err = Error::internal("initial sync task panicked");
        assert_eq!(
            err.to_string(),
            "internal error: initial sync task panicked"
        );
    }

    #[test]
    fn test_watcher_error_conversion() {
        let watch_err = WatcherError::watch_failed("/tmp/test", "permission denied");
        let err: Error = watch_err.into();
        assert!(matches!(err, Error::Watcher(_)));
        assert_eq!(
            err.to_string(),
            "watcher error: failed to watch path '/tmp/test': permission denied"
        );
    }

    #[test]
    fn test_watcher_error_not_started() {
        let err = WatcherError::NotStarted;
        assert_eq!(err.to_string(), "watcher has not been started");
    }

    #[test]
    fn test_header_error_conversion() {
        let header_err = HeaderError::Encoding {
            path: "src/app.py".to_string(),
        };
        let err: Error = header_err.into();
        assert!(matches!(err, Error::Header(_)));
        assert_eq!(
            err.to_string(),
            "header error: 'src/app.py' is not valid UTF-8"
        );
    }

    #[test]
    fn test_header_error_read_and_write() {
        let read = HeaderError::Read {
            path: "a.py".to_string(),
            reason: "permission denied".to_string(),
        };
        assert_eq!(read.to_string(), "failed to read 'a.py': permission denied");

        let write = HeaderError::Write {
            path: "a.py".to_string(),
            reason: "disk full".to_string(),
        };
        assert_eq!(write.to_string(), "failed to write 'a.py': disk full");
    }

    #[test]
    fn test_tree_file_error() {
        let err = Error::TreeFile {
            path: ".cursorrules".to_string(),
            reason: "read-only file system".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "tree file '.cursorrules' could not be created: read-only file system"
        );
    }

    #[test]
    fn test_fatal_errors() {
        assert!(Error::config("bad").is_fatal());
        assert!(Error::TreeFile {
            path: ".cursorrules".to_string(),
            reason: "denied".to_string(),
        }
        .is_fatal());
        assert!(!Error::internal("oops").is_fatal());
        assert!(!Error::from(WatcherError::NotStarted).is_fatal());
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn inner() -> Result<i32> {
            Err(Error::config("inner error"))
        }

        fn outer() -> Result<i32> {
            let _ = inner()?;
            Ok(0)
        }

        let result = outer();
        assert!(result.is_err());
        assert_eq!(
            result.unwrap_err().to_string(),
            "configuration error: inner error"
        );
    }

    #[test]
    fn test_error_debug_format() {
        let err = Error::Internal("something went wrong".to_string());
        let debug_str = format!("{err:?}");
        assert!(debug_str.contains("Internal"));
        assert!(debug_str.contains("something went wrong"));
    }
}
