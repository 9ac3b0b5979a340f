// crates/testutils-toolkit/src/certificates.rs
// ============================================================================
// Module: Self-Signed Certificates
// Description: Generate a TLS server certificate and key into a filesystem.
// Purpose: Provide ephemeral TLS assets for integration tests.
// Dependencies: rcgen, p384, time, testutils-vfs
// ============================================================================

//! ## Overview
//! [`generate_self_signed_certificate`] creates the destination directory,
//! generates an ECDSA P-384 key pair and writes two PEM files:
//! - `tls.crt` with a `CERTIFICATE` block,
//! - `tls.key` with an `EC PRIVATE KEY` (SEC1) block.
//!
//! [`new_self_signed_certificate`] wraps it for tests: errors are reported and
//! the test is stopped.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

use p384::pkcs8::DecodePrivateKey;
use p384::pkcs8::LineEnding;
use rcgen::CertificateParams;
use rcgen::DistinguishedName;
use rcgen::DnType;
use rcgen::ExtendedKeyUsagePurpose;
use rcgen::IsCa;
use rcgen::KeyPair;
use rcgen::KeyUsagePurpose;
use rcgen::SerialNumber;
use serde::Deserialize;
use serde::Serialize;
use testutils_vfs::DEFAULT_DIR_PERMISSIONS;
use testutils_vfs::Fs;
use testutils_vfs::FsError;
use testutils_vfs::write_file;
use thiserror::Error;
use time::Duration;
use time::OffsetDateTime;

use crate::failure::no_error;
use crate::reporter::FatalReporter;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// File name of the PEM certificate.
pub const CERTIFICATE_FILE_NAME: &str = "tls.crt";
/// File name of the PEM private key.
pub const KEY_FILE_NAME: &str = "tls.key";
/// Organization written into the certificate subject.
pub const DEFAULT_ORGANIZATION: &str = "testutils-toolkit-integration-tests";
/// Certificate lifetime in days.
pub const DEFAULT_VALIDITY_DAYS: u32 = 180;
/// Longest accepted certificate lifetime in days.
pub const MAX_VALIDITY_DAYS: u32 = 36_500;
/// Serial number of every generated certificate.
const SERIAL_NUMBER: &[u8] = &[1];

// ============================================================================
// SECTION: Options
// ============================================================================

/// Tunables for certificate generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CertificateOptions {
    /// Subject organization name.
    pub organization: String,
    /// Days between `not_before` and `not_after`.
    pub validity_days: u32,
    /// Certificate file name inside the destination directory.
    pub certificate_file: String,
    /// Key file name inside the destination directory.
    pub key_file: String,
    /// Permission bits for a created destination directory.
    pub directory_permissions: u32,
}

impl Default for CertificateOptions {
    fn default() -> Self {
        Self {
            organization: DEFAULT_ORGANIZATION.to_string(),
            validity_days: DEFAULT_VALIDITY_DAYS,
            certificate_file: CERTIFICATE_FILE_NAME.to_string(),
            key_file: KEY_FILE_NAME.to_string(),
            directory_permissions: DEFAULT_DIR_PERMISSIONS,
        }
    }
}

impl CertificateOptions {
    /// Checks that the options can produce a certificate.
    ///
    /// # Errors
    ///
    /// Returns [`CertificateError::InvalidOptions`] for an empty organization,
    /// a validity window outside `1..=MAX_VALIDITY_DAYS`, output names that are
    /// not a single path component, or identical output file names.
    pub fn validate(&self) -> Result<(), CertificateError> {
        if self.organization.trim().is_empty() {
            return Err(CertificateError::InvalidOptions(
                "organization must not be empty".to_string(),
            ));
        }
        if self.validity_days == 0 || self.validity_days > MAX_VALIDITY_DAYS {
            return Err(CertificateError::InvalidOptions(format!(
                "validity_days must be between 1 and {MAX_VALIDITY_DAYS}"
            )));
        }
        for name in [&self.certificate_file, &self.key_file] {
            if !is_plain_file_name(name) {
                return Err(CertificateError::InvalidOptions(format!(
                    "output file name \"{name}\" must be a plain file name"
                )));
            }
        }
        if self.certificate_file == self.key_file {
            return Err(CertificateError::InvalidOptions(
                "certificate_file and key_file must differ".to_string(),
            ));
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Certificate generation failures.
#[derive(Debug, Error)]
pub enum CertificateError {
    /// No host names were supplied.
    #[error("at least one host name is required")]
    NoHosts,
    /// Options failed validation.
    #[error("invalid certificate options: {0}")]
    InvalidOptions(String),
    /// Filesystem operation failed.
    #[error(transparent)]
    Fs(#[from] FsError),
    /// Key generation, parameter validation or signing failed.
    #[error("certificate generation failed: {0}")]
    Generation(#[from] rcgen::Error),
    /// The private key could not be re-encoded as SEC1.
    #[error("private key encoding failed: {0}")]
    KeyEncoding(String),
}

// ============================================================================
// SECTION: Generation
// ============================================================================

/// Paths of the written certificate and key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificatePaths {
    /// PEM certificate path.
    pub certificate: PathBuf,
    /// PEM private key path.
    pub private_key: PathBuf,
}

/// Generates a self-signed server certificate for `hosts` under `destination`.
///
/// The first host becomes the subject common name; every host becomes a
/// subject alternative name.
///
/// # Errors
///
/// Returns [`CertificateError`] when no hosts are given, the options are
/// invalid, or generation, encoding or writing fails.
pub fn generate_self_signed_certificate(
    fs: &dyn Fs,
    destination: &Path,
    hosts: &[&str],
    options: &CertificateOptions,
) -> Result<CertificatePaths, CertificateError> {
    let Some(common_name) = hosts.first() else {
        return Err(CertificateError::NoHosts);
    };
    options.validate()?;
    fs.mkdir_all(destination, options.directory_permissions)?;

    let key = KeyPair::generate_for(&rcgen::PKCS_ECDSA_P384_SHA384)?;
    let names: Vec<String> = hosts.iter().map(|host| (*host).to_string()).collect();
    let mut params = CertificateParams::new(names)?;
    params.serial_number = Some(SerialNumber::from_slice(SERIAL_NUMBER));
    params.distinguished_name = subject(common_name, &options.organization);
    let not_before = OffsetDateTime::now_utc();
    params.not_before = not_before;
    params.not_after = not_before
        .checked_add(Duration::days(i64::from(options.validity_days)))
        .ok_or_else(|| {
            CertificateError::InvalidOptions("validity window exceeds the date range".to_string())
        })?;
    params.key_usages = vec![KeyUsagePurpose::DigitalSignature, KeyUsagePurpose::KeyEncipherment];
    params.extended_key_usages = vec![ExtendedKeyUsagePurpose::ServerAuth];
    params.is_ca = IsCa::ExplicitNoCa;
    let certificate = params.self_signed(&key)?;

    let paths = CertificatePaths {
        certificate: destination.join(&options.certificate_file),
        private_key: destination.join(&options.key_file),
    };
    write_file(fs, &paths.certificate, certificate.pem().as_bytes())?;
    write_file(fs, &paths.private_key, sec1_pem(&key)?.as_bytes())?;
    tracing::debug!(
        fs = fs.name(),
        destination = %destination.display(),
        hosts = %hosts.join(","),
        "wrote self-signed certificate"
    );
    Ok(paths)
}

/// Generates a certificate with default options, aborting the test on error.
///
/// Returns `None` after reporting when generation fails.
pub fn new_self_signed_certificate<T: FatalReporter + ?Sized>(
    t: &mut T,
    fs: &dyn Fs,
    destination: impl AsRef<Path>,
    hosts: &[&str],
) -> Option<CertificatePaths> {
    t.helper();
    new_self_signed_certificate_with(t, fs, destination, hosts, &CertificateOptions::default())
}

/// Generates a certificate with `options`, aborting the test on error.
pub fn new_self_signed_certificate_with<T: FatalReporter + ?Sized>(
    t: &mut T,
    fs: &dyn Fs,
    destination: impl AsRef<Path>,
    hosts: &[&str],
    options: &CertificateOptions,
) -> Option<CertificatePaths> {
    t.helper();
    match generate_self_signed_certificate(fs, destination.as_ref(), hosts, options) {
        Ok(paths) => Some(paths),
        Err(err) => {
            no_error(t, &err, None);
            t.fail_now();
            None
        }
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Builds the subject name.
fn subject(common_name: &str, organization: &str) -> DistinguishedName {
    let mut name = DistinguishedName::new();
    name.push(DnType::CommonName, common_name);
    name.push(DnType::OrganizationName, organization);
    name
}

/// Re-encodes the PKCS#8 key pair as a SEC1 `EC PRIVATE KEY` PEM block.
fn sec1_pem(key: &KeyPair) -> Result<String, CertificateError> {
    let secret = p384::SecretKey::from_pkcs8_der(&key.serialize_der())
        .map_err(|err| CertificateError::KeyEncoding(err.to_string()))?;
    let pem = secret
        .to_sec1_pem(LineEnding::LF)
        .map_err(|err| CertificateError::KeyEncoding(err.to_string()))?;
    Ok(pem.to_string())
}

/// Returns true when `name` is exactly one normal path component.
fn is_plain_file_name(name: &str) -> bool {
    if name.contains(['/', '\\']) {
        return false;
    }
    let mut components = Path::new(name).components();
    matches!((components.next(), components.next()), (Some(Component::Normal(_)), None))
}
