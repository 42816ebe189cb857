//! Runtime configuration, layered from an optional TOML file and
//! `FIRMBOOK_*` environment variables.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use firmbook_api::{AuthConfig, UserConfig};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  /// SQLite database file. A leading `~/` is expanded.
  pub store_path: PathBuf,
  #[serde(default)]
  pub users:      Vec<UserConfig>,
}

impl ServerConfig {
  /// Read `file` (if present) and overlay the environment.
  pub fn load(file: &Path) -> anyhow::Result<Self> {
    let settings = config::Config::builder()
      .set_default("host", "127.0.0.1")?
      .set_default("port", 8080)?
      .set_default("store_path", "~/.local/share/firmbook/firmbook.db")?
      .add_source(config::File::from(file).required(false))
      .add_source(config::Environment::with_prefix("FIRMBOOK"))
      .build()
      .context("failed to read config file")?;

    let mut cfg: ServerConfig = settings
      .try_deserialize()
      .context("failed to deserialise ServerConfig")?;
    cfg.store_path = expand_tilde(&cfg.store_path);
    Ok(cfg)
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }

  pub fn auth(&self) -> AuthConfig {
    AuthConfig {
      users: self.users.clone(),
    }
  }
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

#[cfg(test)]
mod tests {
  use super::*;

  fn write_config(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir()
      .join(format!("firmbook-{name}-{}.toml", std::process::id()));
    std::fs::write(&path, contents).unwrap();
    path
  }

  #[test]
  fn missing_file_falls_back_to_defaults() {
    let cfg = ServerConfig::load(Path::new("/nonexistent/firmbook.toml")).unwrap();
    assert_eq!(cfg.port, 8080);
    assert!(cfg.users.is_empty());
  }

  #[test]
  fn users_and_roles_load_from_toml() {
    let path = write_config(
      "users",
      r#"
        host = "0.0.0.0"
        port = 9000
        store_path = "/var/lib/firmbook/db.sqlite"

        [[users]]
        email = "admin@example.com"
        password_hash = "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA"
        roles = ["ADMIN", "USER"]
      "#,
    );
    let cfg = ServerConfig::load(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(cfg.address(), "0.0.0.0:9000");
    assert_eq!(cfg.store_path, PathBuf::from("/var/lib/firmbook/db.sqlite"));
    assert_eq!(cfg.auth().users.len(), 1);
    assert_eq!(cfg.users[0].roles.len(), 2);
  }

  #[test]
  fn tilde_is_expanded() {
    if let Ok(home) = std::env::var("HOME") {
      assert_eq!(
        expand_tilde(Path::new("~/db.sqlite")),
        PathBuf::from(home).join("db.sqlite")
      );
    }
    assert_eq!(expand_tilde(Path::new("/abs")), PathBuf::from("/abs"));
  }
}
