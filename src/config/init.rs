// ABOUTME: Config scaffolding for new deployments.
// ABOUTME: Creates oess-cm.yml template files.

use std::path::Path;

use crate::error::{Error, Result};
use crate::provision::BackupPolicy;

use super::{CONFIG_FILENAME, Config, EnvValue};

pub fn init_config(dir: &Path, force: bool) -> Result<()> {
    let config_path = dir.join(CONFIG_FILENAME);

    if config_path.exists() && !force {
        return Err(Error::AlreadyExists(config_path));
    }

    let yaml = generate_template_yaml(&Config::template());
    std::fs::write(&config_path, yaml)?;

    Ok(())
}

fn generate_template_yaml(config: &Config) -> String {
    let password = match &config.nrm.password {
        EnvValue::Literal(s) => s.clone(),
        EnvValue::FromEnv { var, .. } => format!("{{ env: {} }}", var),
    };
    let backup = match config.backup_path {
        BackupPolicy::Required => "required",
        BackupPolicy::Optional => "optional",
    };
    let port = config.ports.first();

    format!(
        r#"network: {}
nrm:
  url: {}
  user: {}
  password: {}
  workgroup: {}
  timeout: {}s
# required: refuse circuits without a link-disjoint backup path
# optional: fall back to the primary path alone
backup_path: {}
ports:
  - name: {}
    interface: {}
"#,
        config.network,
        config.nrm.url,
        config.nrm.user,
        password,
        config.nrm.workgroup,
        config.nrm.timeout.as_secs(),
        backup,
        port.name,
        port.interface,
    )
}
