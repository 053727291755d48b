//! Per-handle capability sets.

use shared_types::{CiphertextHandle, GatewayError, Permission};

/// Capabilities granted on a single ciphertext handle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PermissionSet {
    compute: bool,
    disclose: bool,
}

impl PermissionSet {
    /// Grant a capability. Granting twice is a no-op.
    pub fn grant(&mut self, permission: Permission) {
        match permission {
            Permission::Compute => self.compute = true,
            Permission::Disclose => self.disclose = true,
        }
    }

    #[must_use]
    pub fn allows(&self, permission: Permission) -> bool {
        match permission {
            Permission::Compute => self.compute,
            Permission::Disclose => self.disclose,
        }
    }

    /// Fail with `PermissionDenied` unless `permission` was granted.
    pub fn require(
        &self,
        handle: CiphertextHandle,
        permission: Permission,
    ) -> Result<(), GatewayError> {
        if self.allows(permission) {
            Ok(())
        } else {
            Err(GatewayError::PermissionDenied { handle, permission })
        }
    }
}
