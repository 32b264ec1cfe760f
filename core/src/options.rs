//! Configuration options for loading chunks.

use crate::{String, proto::Proto};

/// Configuration options for a load.
///
/// # Example
///
/// ```
/// use undump_core::LoadOptions;
///
/// let options = LoadOptions {
///     max_depth: 64,
///     ..LoadOptions::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Maximum nesting depth of function prototypes.
    ///
    /// Default: 200
    pub max_depth: usize,

    /// Reject counts that exceed the bytes left in the source before
    /// allocating for them. Only applies to sources that know their length.
    ///
    /// Default: true
    pub pre_check_remaining: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            max_depth: 200,
            pre_check_remaining: true,
        }
    }
}

/// Rejection reported by a [`Verifier`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyError {
    pub reason: String,
}

impl VerifyError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Hook run over the fully loaded prototype tree before it is returned.
pub trait Verifier {
    fn verify(&self, proto: &Proto<'_>) -> Result<(), VerifyError>;
}

/// Accepts everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoVerify;

impl Verifier for NoVerify {
    fn verify(&self, _proto: &Proto<'_>) -> Result<(), VerifyError> {
        Ok(())
    }
}

impl<F> Verifier for F
where
    F: Fn(&Proto<'_>) -> Result<(), VerifyError>,
{
    fn verify(&self, proto: &Proto<'_>) -> Result<(), VerifyError> {
        self(proto)
    }
}
