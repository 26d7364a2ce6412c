use crate::helpers::result_error::error::Error;
use crate::helpers::result_error::{WithDebugObjectAndFnName, WithMsg};
use std::fmt::Debug;

pub type Result<T> = std::result::Result<T, Error>;

impl<S: Into<String>, O: Debug + Send + 'static, R> WithDebugObjectAndFnName<S, O> for Result<R> {
    fn with_debug_object_and_fn_name(self, obj: O, fn_name: S) -> Self {
        self.map_err(|e| e.with_debug_object_and_fn_name(obj, fn_name))
    }
}

impl<R, S: Into<String>> WithMsg<S> for Result<R> {
    fn with_msg(self, msg: S) -> Self {
        self.map_err(|e| e.with_msg(msg))
    }
}

pub fn convert_error_vec(errors: Vec<Error>) -> Result<()> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors.into())
    }
}

/// Splits an iterator of results into its successes, or all of its failures
/// folded into a single error.
pub fn collect_all<T, I: IntoIterator<Item = Result<T>>>(iter: I) -> Result<Vec<T>> {
    let mut values = Vec::new();
    let mut errors = Vec::new();
    for res in iter {
        match res {
            Ok(v) => values.push(v),
            Err(e) => errors.push(e),
        }
    }
    convert_error_vec(errors).map(|_| values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::helpers::location::LocationError;

    #[test]
    fn test_convert_error_vec_empty_is_ok() {
        assert!(convert_error_vec(vec![]).is_ok());
    }

    #[test]
    fn test_collect_all_ok() {
        let values = collect_all(vec![Ok(1), Ok(2)]).unwrap();
        assert_eq!(values, vec![1, 2]);
    }

    #[test]
    fn test_collect_all_keeps_every_error() {
        let res: Result<Vec<u8>> = collect_all(vec![
            Ok(1),
            Err(Error::from(LocationError::InvalidLocationFormat("".into()))),
            Err(Error::from(LocationError::MissingArchive("host:/data".into()))),
        ]);
        match res {
            Err(Error::LotsOfError(errors)) => assert_eq!(errors.len(), 2),
            _ => panic!("Expected LotsOfError"),
        }
    }

    #[test]
    fn test_result_with_msg() {
        let res: Result<()> = Err(Error::from(LocationError::MissingArchive("host:/data".into())));
        let err = res.with_msg("Checking location failed").unwrap_err();
        let text = err.to_string();
        assert!(text.starts_with("Checking location failed:\n"));
        assert!(text.contains("  \"host:/data\": No archive specified"));
    }
}
