//! Tenant and caller context.
//!
//! Every engine operation takes an explicit [`TenantContext`] naming the
//! tenant, the acting staff member, and the capabilities granted to them.
//! There is no process-wide "current tenant" anywhere; the request layer
//! builds one context per request and passes it down.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// A permission the request layer has granted to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// Create, check in/out, amend, and cancel bookings.
    ManageBookings,
    /// Record payments against bookings.
    CollectPayments,
    /// Open and close cash shifts, record petty-cash entries.
    ManageShifts,
}

/// The tenant scope and caller identity for one operation.
#[derive(Debug, Clone)]
pub struct TenantContext {
    tenant_id: String,
    staff_id: String,
    capabilities: HashSet<Capability>,
}

impl TenantContext {
    /// Builds a context with an explicit capability set.
    pub fn new(
        tenant_id: impl Into<String>,
        staff_id: impl Into<String>,
        capabilities: impl IntoIterator<Item = Capability>,
    ) -> Self {
        TenantContext {
            tenant_id: tenant_id.into(),
            staff_id: staff_id.into(),
            capabilities: capabilities.into_iter().collect(),
        }
    }

    /// Builds a context holding every capability. Desk managers; tests.
    pub fn full_access(tenant_id: impl Into<String>, staff_id: impl Into<String>) -> Self {
        TenantContext::new(
            tenant_id,
            staff_id,
            [
                Capability::ManageBookings,
                Capability::CollectPayments,
                Capability::ManageShifts,
            ],
        )
    }

    #[inline]
    pub fn tenant_id(&self) -> &str {
        &self.tenant_id
    }

    #[inline]
    pub fn staff_id(&self) -> &str {
        &self.staff_id
    }

    /// Whether the caller holds a capability.
    #[inline]
    pub fn can(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }

    /// Pre-condition check at the boundary of each engine operation.
    pub fn require(&self, capability: Capability) -> DomainResult<()> {
        if self.can(capability) {
            Ok(())
        } else {
            Err(DomainError::Forbidden { capability })
        }
    }

    /// Guards a row fetched by id against cross-tenant access.
    ///
    /// Repository queries already filter by tenant; this is the second
    /// fence for anything resolved outside those filters.
    pub fn ensure_tenant(&self, entity_tenant: &str, entity: &'static str) -> DomainResult<()> {
        if self.tenant_id == entity_tenant {
            Ok(())
        } else {
            Err(DomainError::TenantMismatch { entity })
        }
    }
}
