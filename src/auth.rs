use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};

/// Which side of a migration a credential set belongs to. Each role has its
/// own environment overrides so direct copies can authenticate two endpoints
/// in one invocation.
#[derive(Debug, Clone, Copy)]
pub enum EndpointRole {
    Source,
    Target,
}

impl EndpointRole {
    pub fn label(self) -> &'static str {
        match self {
            EndpointRole::Source => "Source",
            EndpointRole::Target => "Target",
        }
    }

    fn env_prefix(self) -> &'static str {
        match self {
            EndpointRole::Source => "FLOWREG_SOURCE",
            EndpointRole::Target => "FLOWREG_TARGET",
        }
    }
}

#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    /// Resolve credentials for one endpoint. When both
    /// `FLOWREG_<ROLE>_USERNAME` and `FLOWREG_<ROLE>_PASSWORD` are set they
    /// win; otherwise the user is prompted, with the password read masked.
    pub fn acquire(role: EndpointRole) -> Result<Self> {
        let username_var = format!("{}_USERNAME", role.env_prefix());
        let password_var = format!("{}_PASSWORD", role.env_prefix());
        if let (Ok(username), Ok(password)) =
            (std::env::var(&username_var), std::env::var(&password_var))
        {
            return Ok(Self { username, password });
        }

        let username = prompt_line(&format!("{} Username: ", role.label()))?;
        let password = rpassword::prompt_password(format!("{} Password: ", role.label()))
            .with_context(|| format!("failed to read {} password", role.label()))?;
        Ok(Self {
            username,
            password: password.trim_end().to_string(),
        })
    }
}

fn prompt_line(prompt: &str) -> Result<String> {
    let mut stdout = io::stdout();
    stdout.write_all(prompt.as_bytes())?;
    stdout.flush()?;
    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("failed to read username from stdin")?;
    Ok(line.trim_end().to_string())
}
