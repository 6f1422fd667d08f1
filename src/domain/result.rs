//! Result type alias for fauna-dump

use super::errors::DumpError;

/// Result type alias for fauna-dump operations
///
/// # Examples
///
/// ```
/// use fauna_dump::domain::result::Result;
/// use fauna_dump::domain::errors::DumpError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(DumpError::Configuration("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, DumpError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_with_question_mark() -> Result<()> {
        fn inner() -> Result<i32> {
            Ok(42)
        }

        let value = inner()?;
        assert_eq!(value, 42);
        Ok(())
    }

    #[test]
    fn test_result_err() {
        let result: Result<i32> = Err(DumpError::Hook("test error".to_string()));
        assert!(result.is_err());
    }
}
