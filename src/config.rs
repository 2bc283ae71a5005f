use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use crate::layout::MAX_LAYOUT_ROWS;

/// Command-line settings. Flags override environment variables
/// (`ROWMAP_ROWS`, `ROWMAP_WIDTH`, `ROWMAP_HEIGHT`, `NO_COLOR`),
/// which override the defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// JSON item file; the built-in sample is used when absent
    pub data_path: Option<PathBuf>,
    pub rows: usize,
    /// Chart size in terminal cells
    pub width: usize,
    pub height: usize,
    pub color: bool,
    pub interactive: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_path: None,
            rows: 3,
            width: 80,
            height: 24,
            color: true,
            interactive: false,
        }
    }
}

pub const USAGE: &str = "usage: rowmap [DATA.json] [--rows N] [--width W] [--height H] [--no-color] [--interactive]";

impl Settings {
    pub fn from_env_and_args() -> Result<Self> {
        let env = |key: &str| std::env::var(key).ok();
        Self::parse(env, std::env::args().skip(1))
    }

    /// Resolve settings from an environment lookup and CLI arguments.
    pub fn parse<E, I>(env: E, args: I) -> Result<Self>
    where
        E: Fn(&str) -> Option<String>,
        I: IntoIterator<Item = String>,
    {
        let mut settings = Settings::default();

        if let Some(v) = env("ROWMAP_ROWS") {
            settings.rows = parse_rows("ROWMAP_ROWS", &v)?;
        }
        if let Some(v) = env("ROWMAP_WIDTH") {
            settings.width = parse_count("ROWMAP_WIDTH", &v)?;
        }
        if let Some(v) = env("ROWMAP_HEIGHT") {
            settings.height = parse_count("ROWMAP_HEIGHT", &v)?;
        }
        if env("NO_COLOR").is_some_and(|v| !v.is_empty()) {
            settings.color = false;
        }

        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--rows" | "-r" => settings.rows = parse_rows("--rows", &next_value(&mut args, &arg)?)?,
                "--width" => settings.width = parse_count("--width", &next_value(&mut args, &arg)?)?,
                "--height" => settings.height = parse_count("--height", &next_value(&mut args, &arg)?)?,
                "--no-color" => settings.color = false,
                "--interactive" | "-i" => settings.interactive = true,
                flag if flag.starts_with('-') => bail!("unknown flag '{}'\n{}", flag, USAGE),
                path => {
                    if settings.data_path.is_some() {
                        bail!("more than one data file given\n{}", USAGE);
                    }
                    settings.data_path = Some(PathBuf::from(path));
                }
            }
        }

        Ok(settings)
    }
}

fn next_value(args: &mut impl Iterator<Item = String>, flag: &str) -> Result<String> {
    args.next()
        .with_context(|| format!("{} needs a value\n{}", flag, USAGE))
}

fn parse_count(name: &str, value: &str) -> Result<usize> {
    let n: usize = value
        .trim()
        .parse()
        .with_context(|| format!("{} must be a positive integer, got '{}'", name, value))?;
    if n == 0 {
        bail!("{} must be at least 1", name);
    }
    Ok(n)
}

fn parse_rows(name: &str, value: &str) -> Result<usize> {
    let rows = parse_count(name, value)?;
    if rows > MAX_LAYOUT_ROWS {
        bail!("{} must be at most {}, got {}", name, MAX_LAYOUT_ROWS, rows);
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn defaults() {
        let s = Settings::parse(no_env, args(&[])).unwrap();
        assert_eq!(s, Settings::default());
    }

    #[test]
    fn flags_override_env() {
        let env = |k: &str| match k {
            "ROWMAP_ROWS" => Some("5".to_string()),
            "ROWMAP_WIDTH" => Some("100".to_string()),
            "NO_COLOR" => Some("1".to_string()),
            _ => None,
        };
        let s = Settings::parse(env, args(&["data.json", "--rows", "2", "-i"])).unwrap();
        assert_eq!(s.rows, 2);
        assert_eq!(s.width, 100);
        assert!(!s.color);
        assert!(s.interactive);
        assert_eq!(s.data_path, Some(PathBuf::from("data.json")));
    }

    #[test]
    fn rejects_bad_values() {
        assert!(Settings::parse(no_env, args(&["--rows", "0"])).is_err());
        assert!(Settings::parse(no_env, args(&["--rows"])).is_err());
        assert!(Settings::parse(no_env, args(&["--width", "wide"])).is_err());
        assert!(Settings::parse(no_env, args(&["--bogus"])).is_err());
        assert!(Settings::parse(no_env, args(&["a.json", "b.json"])).is_err());
        let env = |k: &str| (k == "ROWMAP_ROWS").then(|| "-1".to_string());
        assert!(Settings::parse(env, args(&[])).is_err());
    }

    #[test]
    fn rows_are_capped() {
        assert!(Settings::parse(no_env, args(&["--rows", "18446744073709551615"])).is_err());
        let over = (MAX_LAYOUT_ROWS + 1).to_string();
        assert!(Settings::parse(no_env, args(&["-r", &over])).is_err());
        let env = |k: &str| (k == "ROWMAP_ROWS").then(|| over.clone());
        assert!(Settings::parse(env, args(&[])).is_err());

        let max = MAX_LAYOUT_ROWS.to_string();
        let s = Settings::parse(no_env, args(&["--rows", &max])).unwrap();
        assert_eq!(s.rows, MAX_LAYOUT_ROWS);
    }
}
