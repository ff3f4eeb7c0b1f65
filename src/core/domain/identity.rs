//! Identity type.
//!
//! The x25519 key that seals the new-session draft at rest.

use std::fs;
use std::path::{Path, PathBuf};

use age::x25519;
use tracing::{debug, warn};

use crate::error::{Result, StoreError};

/// A private key used to encrypt and decrypt the session draft
pub struct Identity {
    inner: x25519::Identity,
    path: PathBuf,
}

impl Identity {
    /// Load the identity stored at `path`
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NoPrivateKey` if the file is missing or
    /// `StoreError::InvalidFormat` if it does not hold an age secret key.
    pub fn load(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "loading identity");

        if !path.exists() {
            return Err(StoreError::NoPrivateKey(path.display().to_string()).into());
        }

        #[cfg(unix)]
        warn_on_loose_permissions(path);

        let contents = fs::read_to_string(path).map_err(StoreError::ReadFailed)?;
        let inner: x25519::Identity = contents
            .trim()
            .parse()
            .map_err(|e: &str| StoreError::InvalidFormat(e.to_string()))?;

        Ok(Self {
            inner,
            path: path.to_path_buf(),
        })
    }

    /// Generate a new identity and write it to `path` with mode 0600
    pub fn generate(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "generating identity");

        let inner = x25519::Identity::generate();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(StoreError::WriteFailed)?;
        }

        use age::secrecy::ExposeSecret;
        let secret = inner.to_string();
        fs::write(path, format!("{}\n", secret.expose_secret())).map_err(StoreError::WriteFailed)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(path, fs::Permissions::from_mode(0o600))
                .map_err(StoreError::WriteFailed)?;
        }

        Ok(Self {
            inner,
            path: path.to_path_buf(),
        })
    }

    /// Load the identity, generating one on first use
    pub fn load_or_generate(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Self::generate(path)
        }
    }

    /// Recipient matching this identity
    pub fn recipient(&self) -> x25519::Recipient {
        self.inner.to_public()
    }

    /// Inner age identity for decryption
    pub fn as_age(&self) -> &x25519::Identity {
        &self.inner
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(unix)]
fn warn_on_loose_permissions(path: &Path) {
    use std::os::unix::fs::PermissionsExt;

    if let Ok(metadata) = fs::metadata(path) {
        let mode = metadata.permissions().mode() & 0o777;
        if mode != 0o600 {
            warn!(
                path = %path.display(),
                mode = %format!("{:o}", mode),
                "insecure key file permissions"
            );
        }
    }
}

impl std::fmt::Debug for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Identity")
            .field("recipient", &self.recipient().to_string())
            .field("path", &self.path)
            .finish()
    }
}
