use crate::path::Path;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A reference to a dataset, in textual form `user/name@path` (spec.md §6).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct DatasetRef {
    pub username: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<Path>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_id: Option<String>,
}

impl fmt::Display for DatasetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.username, self.name)?;
        if let Some(path) = &self.path {
            write!(f, "@{}", path)?;
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("malformed dataset reference: {0:?}")]
pub struct RefParseError(String);

impl FromStr for DatasetRef {
    type Err = RefParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (userpath, path) = match s.split_once('@') {
            Some((a, b)) => (a, Some(Path::new(b))),
            None => (s, None),
        };
        let (username, name) = userpath
            .split_once('/')
            .ok_or_else(|| RefParseError(s.to_string()))?;
        if username.is_empty() || name.is_empty() {
            return Err(RefParseError(s.to_string()));
        }
        Ok(DatasetRef {
            username: username.to_string(),
            name: name.to_string(),
            path,
            profile_id: None,
        })
    }
}

/// Where a `Loader` should look for a referenced dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum LoadSource {
    Local,
    Network,
    Any,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parses_ref_with_and_without_path() {
        let r: DatasetRef = "me/annual_pop".parse().unwrap();
        assert_eq!(r.username, "me");
        assert_eq!(r.name, "annual_pop");
        assert!(r.path.is_none());

        let r: DatasetRef = "me/annual_pop@QmXyz".parse().unwrap();
        assert_eq!(r.path.unwrap().as_str(), "QmXyz");
    }

    #[test]
    fn rejects_ref_without_slash() {
        assert!("not-a-ref".parse::<DatasetRef>().is_err());
    }
}
