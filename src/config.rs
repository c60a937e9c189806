use crate::error::ConvertError;
use crate::pack::PackMode;
use crate::sort::SortOrder;
use std::path::PathBuf;
use std::sync::OnceLock;

pub const PACK_ENV: &str = "BMP2C_PACK";
pub const SORT_ENV: &str = "BMP2C_SORT";
pub const CONFIG_FILE_NAME: &str = "bmp2c.conf";

/// Defaults used when the command line leaves a selector unset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Defaults {
    pub pack: PackMode,
    pub sort: SortOrder,
}

impl Defaults {
    /// Look up defaults from the environment, then config files.
    ///
    /// Environment variables win over file entries. Missing sources keep the
    /// built-in `row` / `alpha` defaults.
    pub fn load() -> Result<Self, ConvertError> {
        Self::load_from(
            &config_paths(),
            std::env::var(PACK_ENV).ok().as_deref(),
            std::env::var(SORT_ENV).ok().as_deref(),
        )
    }

    /// Resolve defaults from explicit sources. Only the first readable path
    /// is used; `env_pack` / `env_sort` override whatever it sets.
    pub fn load_from(
        paths: &[PathBuf],
        env_pack: Option<&str>,
        env_sort: Option<&str>,
    ) -> Result<Self, ConvertError> {
        let mut defaults = Self::default();

        for path in paths {
            if let Ok(content) = std::fs::read_to_string(path) {
                log::debug!("Reading defaults from {}", path.display());
                defaults = defaults.merge_file(&content)?;
                break;
            }
        }

        if let Some(pack) = env_pack {
            defaults.pack = parse_setting(PACK_ENV, pack)?;
        }
        if let Some(sort) = env_sort {
            defaults.sort = parse_setting(SORT_ENV, sort)?;
        }

        Ok(defaults)
    }

    /// Apply `pack=` / `sort=` lines. Blank lines and `#` comments are skipped.
    pub fn merge_file(mut self, content: &str) -> Result<Self, ConvertError> {
        for (lineno, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let Some((key, value)) = line.split_once('=') else {
                return Err(ConvertError::Config(format!(
                    "line {}: expected key=value, got {:?}",
                    lineno + 1,
                    line
                )));
            };

            match key.trim().to_lowercase().as_str() {
                "pack" => self.pack = parse_setting("pack", value)?,
                "sort" => self.sort = parse_setting("sort", value)?,
                other => {
                    return Err(ConvertError::Config(format!(
                        "line {}: unknown setting {:?}",
                        lineno + 1,
                        other
                    )));
                }
            }
        }
        Ok(self)
    }
}

fn parse_setting<T>(key: &str, value: &str) -> Result<T, ConvertError>
where
    T: std::str::FromStr<Err = ConvertError>,
{
    value
        .trim()
        .parse::<T>()
        .map_err(|e| ConvertError::Config(format!("{}: {}", key, e)))
}

fn config_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(CONFIG_FILE_NAME)];
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        paths.push(PathBuf::from(xdg).join("bmp2c").join(CONFIG_FILE_NAME));
    } else if let Ok(home) = std::env::var("HOME") {
        paths.push(
            PathBuf::from(home)
                .join(".config")
                .join("bmp2c")
                .join(CONFIG_FILE_NAME),
        );
    }
    paths
}

static DEFAULTS: OnceLock<Defaults> = OnceLock::new();

/// Process-wide defaults, loaded on first use.
pub fn defaults() -> Result<Defaults, ConvertError> {
    if let Some(defaults) = DEFAULTS.get() {
        return Ok(*defaults);
    }

    let loaded = Defaults::load()?;
    log::info!(
        "Defaults initialized: pack={}, sort={}",
        loaded.pack,
        loaded.sort
    );
    Ok(*DEFAULTS.get_or_init(|| loaded))
}
