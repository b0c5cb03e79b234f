use std::collections::BTreeMap;

use crate::error::{Result, SchemaError};
use crate::registry::InterfaceRegistry;

/// `android.service.oemlock.IOemLockService`, registered as `oem_lock`.
pub const OEM_LOCK_AIDL: &str = include_str!("../aidl/IOemLockService.aidl");

/// An interface registry bound to its service-manager name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceInterface {
    /// Name the service is registered under (`oem_lock`), used on the command line.
    pub service: String,
    pub registry: InterfaceRegistry,
}

impl ServiceInterface {
    pub fn new(service: impl Into<String>, registry: InterfaceRegistry) -> Self {
        Self {
            service: service.into(),
            registry,
        }
    }

    /// Parse `source` and bind `interface` under `service`.
    pub fn from_aidl(service: impl Into<String>, source: &str, interface: &str) -> Result<Self> {
        Ok(Self::new(service, InterfaceRegistry::from_aidl(source, interface)?))
    }
}

/// Services known at startup, keyed by service-manager name.
#[derive(Debug, Clone, Default)]
pub struct ServiceCatalog {
    services: BTreeMap<String, ServiceInterface>,
}

impl ServiceCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog of the definitions compiled into this crate.
    pub fn builtin() -> Result<Self> {
        let mut catalog = Self::new();
        catalog.insert(ServiceInterface::from_aidl(
            "oem_lock",
            OEM_LOCK_AIDL,
            "IOemLockService",
        )?);
        Ok(catalog)
    }

    /// Add or replace a service binding.
    pub fn insert(&mut self, service: ServiceInterface) {
        self.services.insert(service.service.clone(), service);
    }

    /// Look up a service by name.
    pub fn get(&self, service: &str) -> Result<&ServiceInterface> {
        self.services
            .get(service)
            .ok_or_else(|| SchemaError::UnknownService(service.to_string()))
    }

    /// Services sorted by name.
    pub fn services(&self) -> impl Iterator<Item = &ServiceInterface> {
        self.services.values()
    }
}

#[cfg(test)]
mod tests {
    use svccall_parcel::WireType;

    use super::*;

    #[test]
    fn builtin_oem_lock_codes() {
        let catalog = ServiceCatalog::builtin().unwrap();
        let oem_lock = catalog.get("oem_lock").unwrap();
        assert_eq!(oem_lock.registry.name(), "IOemLockService");

        let expected = [
            "getLockName",
            "setOemUnlockAllowedByCarrier",
            "isOemUnlockAllowedByCarrier",
            "setOemUnlockAllowedByUser",
            "isOemUnlockAllowedByUser",
            "isOemUnlockAllowed",
            "isDeviceOemUnlocked",
        ];
        for (code, name) in expected.iter().enumerate() {
            assert_eq!(oem_lock.registry.method(name).unwrap().code, code as u32);
        }

        let allowed = oem_lock.registry.method("isOemUnlockAllowed").unwrap();
        assert_eq!(allowed.argument_types, Some(vec![]));
        assert_eq!(allowed.return_type, Some(WireType::Bool));

        let by_carrier = oem_lock
            .registry
            .method("setOemUnlockAllowedByCarrier")
            .unwrap();
        assert_eq!(
            by_carrier.argument_types,
            Some(vec![WireType::Bool, WireType::Void])
        );
    }

    #[test]
    fn unknown_service() {
        let catalog = ServiceCatalog::builtin().unwrap();
        assert!(matches!(
            catalog.get("wifi"),
            Err(SchemaError::UnknownService(name)) if name == "wifi"
        ));
    }

    #[test]
    fn insert_replaces_binding() {
        let mut catalog = ServiceCatalog::builtin().unwrap();
        catalog.insert(
            ServiceInterface::from_aidl("oem_lock", "interface IStub { void a(); }", "IStub")
                .unwrap(),
        );
        assert_eq!(catalog.services().count(), 1);
        assert_eq!(catalog.get("oem_lock").unwrap().registry.name(), "IStub");
    }

    #[test]
    fn registries_are_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ServiceCatalog>();
    }
}
