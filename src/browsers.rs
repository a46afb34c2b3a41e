//! Browser target resolution
//!
//! Turns the value of `-b/--browsers` into concrete TestCafe browser
//! aliases, expanding the device-farm presets.

use std::fmt;

use crate::cli::args::ArgsError;

/// Sentinel for every locally installed browser
pub const ALL: &str = "all";

/// Sentinel for a manually paired remote device
pub const REMOTE: &str = "remote";

/// Resolved browser targets for a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Browsers {
    /// Every browser TestCafe can detect locally
    All,
    /// A single device paired through a URL/QR code
    Remote,
    /// Explicit targets in the order given
    List(Vec<String>),
}

impl Browsers {
    /// Resolve a raw `-b` value
    pub fn parse(value: &str) -> Result<Self, ArgsError> {
        let targets = expand(value);

        if targets.is_empty() {
            return Err(ArgsError::NoBrowsers);
        }
        if targets.iter().any(|t| t == REMOTE) {
            if targets.len() > 1 {
                return Err(ArgsError::RemoteWithOthers);
            }
            return Ok(Browsers::Remote);
        }
        if targets.len() == 1 && targets[0] == ALL {
            return Ok(Browsers::All);
        }
        Ok(Browsers::List(targets))
    }

    /// Browser list argument as TestCafe's CLI expects it
    pub fn to_testcafe_arg(&self) -> String {
        match self {
            Browsers::All => ALL.to_string(),
            Browsers::Remote => REMOTE.to_string(),
            Browsers::List(targets) => targets.join(","),
        }
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, Browsers::Remote)
    }

    /// Device farms referenced by any target, without duplicates
    pub fn device_farms(&self) -> Vec<DeviceFarm> {
        let mut farms = Vec::new();
        if let Browsers::List(targets) = self {
            for farm in targets.iter().filter_map(|t| DeviceFarm::of(t)) {
                if !farms.contains(&farm) {
                    farms.push(farm);
                }
            }
        }
        farms
    }
}

impl fmt::Display for Browsers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Browsers::List(targets) => write!(f, "{}", targets.join(", ")),
            other => f.write_str(&other.to_testcafe_arg()),
        }
    }
}

/// Hosted device farms reachable through TestCafe browser providers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceFarm {
    BrowserStack,
    LambdaTest,
}

impl DeviceFarm {
    /// Detect the provider prefix of a browser target
    pub fn of(target: &str) -> Option<Self> {
        let provider = target.split(':').next().unwrap_or(target);
        match provider {
            "browserstack" => Some(DeviceFarm::BrowserStack),
            "lambdatest" => Some(DeviceFarm::LambdaTest),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            DeviceFarm::BrowserStack => "BrowserStack",
            DeviceFarm::LambdaTest => "LambdaTest",
        }
    }

    /// Environment variables the TestCafe provider reads credentials from
    pub fn credential_vars(&self) -> &'static [&'static str] {
        match self {
            DeviceFarm::BrowserStack => &["BROWSERSTACK_USERNAME", "BROWSERSTACK_ACCESS_KEY"],
            DeviceFarm::LambdaTest => &["LT_USERNAME", "LT_ACCESS_KEY"],
        }
    }
}

/// Expand presets, keep single BrowserStack targets whole, split the rest
fn expand(value: &str) -> Vec<String> {
    let preset: &[&str] = match value {
        "browserstack:mobile" => &[
            "browserstack:iPhone 15 Pro Max@17",
            "browserstack:Samsung Galaxy S24@14.0",
        ],
        "browserstack:desktop" => &[
            "browserstack:chrome@130.0:Windows 11",
            "browserstack:safari@18.0:OS X Sequoia",
        ],
        "browserstack:ios" => &["browserstack:iPhone 15@17"],
        "browserstack:android" => &["browserstack:Samsung Galaxy S24@14.0"],
        "lambdatest" => &[
            "lambdatest:iPhone 15 Pro@18:ios:isReal",
            "lambdatest:Galaxy S21 5G@11:android:isReal",
        ],
        _ if is_browserstack_target(value) => return vec![value.to_string()],
        _ => return value.split_whitespace().map(String::from).collect(),
    };
    preset.iter().map(|s| s.to_string()).collect()
}

/// Matches `browserstack:<name>@<major>[.<minor>][:<os>]`
///
/// Device names may contain spaces, so such a value is one target.
fn is_browserstack_target(value: &str) -> bool {
    let Some(rest) = value.strip_prefix("browserstack:") else {
        return false;
    };
    let Some((name, tail)) = rest.split_once('@') else {
        return false;
    };
    if name.is_empty() {
        return false;
    }

    let (version, os) = match tail.split_once(':') {
        Some((version, os)) => (version, Some(os)),
        None => (tail, None),
    };
    if os.is_some_and(str::is_empty) {
        return false;
    }

    let is_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    match version.split_once('.') {
        Some((major, minor)) => is_digits(major) && is_digits(minor),
        None => is_digits(version),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_plain_list() {
        assert_eq!(
            Browsers::parse("chrome  firefox:headless").unwrap(),
            Browsers::List(vec!["chrome".into(), "firefox:headless".into()])
        );
    }

    #[test]
    fn test_presets() {
        match Browsers::parse("browserstack:mobile").unwrap() {
            Browsers::List(t) => assert_eq!(
                t,
                vec![
                    "browserstack:iPhone 15 Pro Max@17",
                    "browserstack:Samsung Galaxy S24@14.0"
                ]
            ),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(
            Browsers::parse("browserstack:ios").unwrap(),
            Browsers::List(vec!["browserstack:iPhone 15@17".into()])
        );
        assert_eq!(
            Browsers::parse("lambdatest").unwrap().device_farms(),
            vec![DeviceFarm::LambdaTest]
        );
    }

    #[test]
    fn test_browserstack_single_target_keeps_spaces() {
        for value in [
            "browserstack:Google Pixel 8@14.0",
            "browserstack:iPhone 14@16",
            "browserstack:edge@129.0:Windows 10",
        ] {
            assert_eq!(
                Browsers::parse(value).unwrap(),
                Browsers::List(vec![value.to_string()]),
                "{value}"
            );
        }
    }

    #[test]
    fn test_browserstack_pattern_rejects() {
        assert!(!is_browserstack_target("browserstack:@14"));
        assert!(!is_browserstack_target("browserstack:Pixel@latest"));
        assert!(!is_browserstack_target("browserstack:Pixel@14."));
        assert!(!is_browserstack_target("browserstack:Pixel@14:"));
        assert!(!is_browserstack_target("chrome@14"));
    }

    #[test]
    fn test_remote_must_be_alone() {
        assert_eq!(Browsers::parse("remote").unwrap(), Browsers::Remote);
        assert_eq!(
            Browsers::parse("remote chrome").unwrap_err(),
            ArgsError::RemoteWithOthers
        );
        assert_eq!(
            Browsers::parse("chrome remote").unwrap_err(),
            ArgsError::RemoteWithOthers
        );
    }

    #[test]
    fn test_empty_value() {
        assert_eq!(Browsers::parse("   ").unwrap_err(), ArgsError::NoBrowsers);
    }

    #[test]
    fn test_all_sentinel() {
        assert_eq!(Browsers::parse("all").unwrap(), Browsers::All);
        assert_eq!(Browsers::All.to_testcafe_arg(), "all");
    }

    #[test]
    fn test_testcafe_arg_joins_with_commas() {
        let browsers = Browsers::parse("browserstack:desktop").unwrap();
        assert_eq!(
            browsers.to_testcafe_arg(),
            "browserstack:chrome@130.0:Windows 11,browserstack:safari@18.0:OS X Sequoia"
        );
        assert_eq!(browsers.device_farms(), vec![DeviceFarm::BrowserStack]);
    }

    #[test]
    fn test_local_browsers_have_no_farm() {
        assert!(Browsers::parse("chrome firefox").unwrap().device_farms().is_empty());
        assert!(Browsers::Remote.device_farms().is_empty());
    }
}
