//! Run configuration, read once from the process environment.
//!
//! | Variable             | Meaning                                                     |
//! |----------------------|-------------------------------------------------------------|
//! | `VMSTATS_PIDS`       | comma-separated process ids                                 |
//! | `VMSTATS_VM_DEVICES` | comma-separated vmm device names                            |
//! | `VMSTATS_INTERFACES` | comma-separated interfaces, numeric entries are MIB indices |
//!
//! Blank entries are ignored, so `"1,,2, "` lists two pids.

mod error;

use std::ffi::OsString;

pub use error::{Error, Result};

pub const PIDS_VAR: &str = "VMSTATS_PIDS";
pub const VM_DEVICES_VAR: &str = "VMSTATS_VM_DEVICES";
pub const INTERFACES_VAR: &str = "VMSTATS_INTERFACES";

/// How an interface is addressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InterfaceTarget {
    /// Row of the MIB interface table.
    Index(u32),
    Name(String),
}

impl From<&str> for InterfaceTarget {
    fn from(entry: &str) -> Self {
        match entry.parse() {
            Ok(index) => InterfaceTarget::Index(index),
            Err(_) => InterfaceTarget::Name(entry.to_owned()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub pids: Vec<i32>,
    pub vm_devices: Vec<String>,
    /// `None` when the variable is unset, meaning "every interface the platform can enumerate".
    pub interfaces: Option<Vec<InterfaceTarget>>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|var| std::env::var_os(var))
    }

    /// Builds the configuration from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<OsString>) -> Result<Self> {
        let get = |var: &'static str| -> Result<Option<String>> {
            lookup(var)
                .map(|value| value.into_string().map_err(|_| Error::NotUnicode { var }))
                .transpose()
        };

        let pids = match get(PIDS_VAR)? {
            Some(value) => entries(&value)
                .map(|entry| {
                    entry.parse().map_err(|source| Error::InvalidPid {
                        var: PIDS_VAR,
                        value: entry.to_owned(),
                        source,
                    })
                })
                .collect::<Result<_>>()?,
            None => Vec::new(),
        };

        let vm_devices = get(VM_DEVICES_VAR)?
            .map(|value| entries(&value).map(str::to_owned).collect())
            .unwrap_or_default();

        let interfaces = get(INTERFACES_VAR)?
            .map(|value| entries(&value).map(InterfaceTarget::from).collect());

        let config = Config {
            pids,
            vm_devices,
            interfaces,
        };
        log::debug!("{config:?}");
        Ok(config)
    }
}

fn entries(value: &str) -> impl Iterator<Item = &str> {
    value.split(',').map(str::trim).filter(|entry| !entry.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<OsString> {
        let vars: HashMap<String, OsString> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), OsString::from(v)))
            .collect();
        move |var| vars.get(var).cloned()
    }

    #[test]
    fn test_empty_environment() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, Config::default());
        assert!(config.interfaces.is_none());
    }

    #[test]
    fn test_parse_all_variables() {
        let config = Config::from_lookup(lookup(&[
            (PIDS_VAR, "1, 42,,"),
            (VM_DEVICES_VAR, "guest0,guest1"),
            (INTERFACES_VAR, "2,em0, lo"),
        ]))
        .unwrap();

        assert_eq!(config.pids, vec![1, 42]);
        assert_eq!(config.vm_devices, vec!["guest0", "guest1"]);
        assert_eq!(
            config.interfaces,
            Some(vec![
                InterfaceTarget::Index(2),
                InterfaceTarget::Name("em0".to_owned()),
                InterfaceTarget::Name("lo".to_owned()),
            ])
        );
    }

    #[test]
    fn test_set_but_empty_interfaces_selects_none() {
        let config = Config::from_lookup(lookup(&[(INTERFACES_VAR, "")])).unwrap();
        assert_eq!(config.interfaces, Some(Vec::new()));
    }

    #[test]
    fn test_invalid_pid() {
        let err = Config::from_lookup(lookup(&[(PIDS_VAR, "1,init")])).unwrap_err();
        match err {
            Error::InvalidPid { var, value, .. } => {
                assert_eq!(var, PIDS_VAR);
                assert_eq!(value, "init");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_negative_index_is_a_name() {
        assert_eq!(
            InterfaceTarget::from("-1"),
            InterfaceTarget::Name("-1".to_owned())
        );
    }
}
