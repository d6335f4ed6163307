use std::env;
use std::error;
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::str::FromStr;

#[derive(Debug)]
pub enum VarError {
    NotPresent,
    NotUnicode(OsString),
    Parse(Box<dyn error::Error + Send + Sync>),
}

impl fmt::Display for VarError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            VarError::NotPresent => write!(f, "environment variable not found"),
            VarError::NotUnicode(ref s) => {
                write!(f, "environment variable was not valid unicode: {:?}", s)
            }
            VarError::Parse(ref e) => e.fmt(f),
        }
    }
}

impl error::Error for VarError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match *self {
            VarError::Parse(ref e) => Some(&**e),
            _ => None,
        }
    }
}

/// Reads and parses the environment variable `key`.
pub fn var<K: AsRef<OsStr>, T: FromStr>(key: K) -> Result<T, VarError>
where
    <T as FromStr>::Err: Into<Box<dyn error::Error + Send + Sync>>,
{
    match env::var(key) {
        Ok(s) => s.parse::<T>().map_err(|e| VarError::Parse(e.into())),
        Err(env::VarError::NotPresent) => Err(VarError::NotPresent),
        Err(env::VarError::NotUnicode(s)) => Err(VarError::NotUnicode(s)),
    }
}

/// Like `var`, but an absent variable is `Ok(None)`.
pub fn var_opt<K: AsRef<OsStr>, T: FromStr>(key: K) -> Result<Option<T>, VarError>
where
    <T as FromStr>::Err: Into<Box<dyn error::Error + Send + Sync>>,
{
    match var(key) {
        Ok(value) => Ok(Some(value)),
        Err(VarError::NotPresent) => Ok(None),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_var() {
        env::set_var("DAGPARSE_TEST_VAR", "42");
        assert_eq!(var::<_, u64>("DAGPARSE_TEST_VAR").ok(), Some(42));
        env::set_var("DAGPARSE_TEST_VAR", "x");
        match var::<_, u64>("DAGPARSE_TEST_VAR") {
            Err(VarError::Parse(_)) => {}
            other => panic!("unexpected result: {:?}", other),
        }
        env::remove_var("DAGPARSE_TEST_VAR");
        assert!(var_opt::<_, u64>("DAGPARSE_TEST_VAR").unwrap().is_none());
    }
}
