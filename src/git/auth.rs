//! Git authentication callbacks
//!
//! Credentials come from git's native sources only: the SSH agent, the usual
//! key files under `~/.ssh/`, and configured credential helpers. Anonymous
//! access is tried last so public repositories work without any setup.

use git2::{Cred, CredentialType, Error, ErrorClass, ErrorCode, RemoteCallbacks};

const SSH_KEY_NAMES: [&str; 3] = ["id_ed25519", "id_rsa", "id_ecdsa"];

fn auth_failed(message: &str) -> Error {
    Error::new(ErrorCode::Auth, ErrorClass::Http, message)
}

fn ssh_credentials(username: &str) -> Result<Cred, Error> {
    if let Ok(cred) = Cred::ssh_key_from_agent(username) {
        return Ok(cred);
    }

    let ssh_dir = dirs::home_dir().unwrap_or_default().join(".ssh");
    SSH_KEY_NAMES
        .iter()
        .map(|name| (ssh_dir.join(name), ssh_dir.join(format!("{name}.pub"))))
        .filter(|(private_key, _)| private_key.exists())
        .find_map(|(private_key, public_key)| {
            let public_key = public_key.exists().then_some(public_key.as_path());
            Cred::ssh_key(username, public_key, &private_key, None).ok()
        })
        .ok_or_else(|| auth_failed("no usable SSH key found"))
}

fn user_pass_credentials(url: &str, username_from_url: Option<&str>) -> Result<Cred, Error> {
    if let Ok(config) = git2::Config::open_default() {
        if let Ok(cred) = Cred::credential_helper(&config, url, username_from_url) {
            return Ok(cred);
        }
    }

    // Anonymous access lets the server answer with its real error.
    Cred::userpass_plaintext(username_from_url.unwrap_or(""), "")
}

/// Install credential callbacks on `callbacks`
pub fn setup_auth_callbacks(callbacks: &mut RemoteCallbacks<'_>) {
    callbacks.credentials(|url, username_from_url, allowed_types| {
        if allowed_types.contains(CredentialType::DEFAULT) {
            return Cred::default();
        }

        if allowed_types.contains(CredentialType::SSH_KEY) {
            return ssh_credentials(username_from_url.unwrap_or("git"));
        }

        if allowed_types.contains(CredentialType::USER_PASS_PLAINTEXT) {
            return user_pass_credentials(url, username_from_url);
        }

        Err(auth_failed("authentication failed"))
    });
}
