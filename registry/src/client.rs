//! Code-to-address resolution against the live registry.

use crate::{MetadataSnapshot, MetadataSource, RegistryEntry, ResolutionError};
use govgate_ledger::RegistryReader;
use govgate_types::{Address, ContractCode, NetworkId};
use std::sync::Arc;

/// Resolves contract codes for one session.
///
/// Holds the session's metadata snapshot and a live registry reader. Every
/// lookup goes to the reader; only the metadata is cached.
pub struct CodeRegistry<R> {
    snapshot: Arc<MetadataSnapshot>,
    reader: R,
}

impl<R: RegistryReader> CodeRegistry<R> {
    pub fn new(snapshot: MetadataSnapshot, reader: R) -> Self {
        Self {
            snapshot: Arc::new(snapshot),
            reader,
        }
    }

    /// Fetch the metadata document once and build a registry over `reader`.
    pub async fn connect(
        source: &dyn MetadataSource,
        network: NetworkId,
        reader: R,
    ) -> Result<Self, ResolutionError> {
        let document = source.fetch().await?;
        let snapshot = MetadataSnapshot::from_document(&document, network)?;
        tracing::info!(
            source = %source.describe(),
            %network,
            codes = snapshot.len(),
            "loaded registry metadata"
        );
        Ok(Self::new(snapshot, reader))
    }

    pub fn snapshot(&self) -> &MetadataSnapshot {
        &self.snapshot
    }

    pub fn reader(&self) -> &R {
        &self.reader
    }

    /// Resolve `code` to its current registry entry.
    pub async fn resolve(&self, code: ContractCode) -> Result<RegistryEntry, ResolutionError> {
        let metadata = self.snapshot.require(code)?;
        let address = self.reader.registry_address(code).await?;
        if address.is_zero() {
            return Err(ResolutionError::EmptyAddress(code));
        }

        tracing::debug!(%code, %address, is_proxy = metadata.is_proxy, "resolved contract code");
        Ok(RegistryEntry {
            code,
            address,
            is_proxy: metadata.is_proxy,
        })
    }

    /// Resolve several codes one after another, in the order given.
    pub async fn resolve_all(
        &self,
        codes: &[ContractCode],
    ) -> Result<Vec<RegistryEntry>, ResolutionError> {
        let mut entries = Vec::with_capacity(codes.len());
        for code in codes {
            entries.push(self.resolve(*code).await?);
        }
        Ok(entries)
    }

    /// Implementation currently behind a proxy-fronted entry.
    pub async fn implementation(&self, entry: &RegistryEntry) -> Result<Address, ResolutionError> {
        if !entry.is_proxy {
            return Err(ResolutionError::NotAProxy(entry.code));
        }
        let implementation = self.reader.proxy_implementation(entry.address).await?;
        if implementation.is_zero() {
            return Err(ResolutionError::EmptyImplementation {
                code: entry.code,
                proxy: entry.address,
            });
        }
        Ok(implementation)
    }

    /// The address an upgrade of this entry changes: the implementation for a
    /// proxy, the registry address otherwise.
    pub async fn upgrade_target(&self, entry: &RegistryEntry) -> Result<Address, ResolutionError> {
        if entry.is_proxy {
            self.implementation(entry).await
        } else {
            Ok(entry.address)
        }
    }

    /// Published address of a metadata entry looked up by name.
    pub fn address_by_name(&self, name: &str) -> Result<Address, ResolutionError> {
        self.snapshot.address_by_name(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ContractMetadata, MetadataDocument};
    use async_trait::async_trait;
    use govgate_ledger::LedgerError;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeRegistry {
        addresses: Mutex<HashMap<ContractCode, Address>>,
        implementations: Mutex<HashMap<Address, Address>>,
        reads: AtomicUsize,
    }

    #[async_trait]
    impl RegistryReader for FakeRegistry {
        async fn registry_address(&self, code: ContractCode) -> Result<Address, LedgerError> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            Ok(self
                .addresses
                .lock()
                .unwrap()
                .get(&code)
                .copied()
                .unwrap_or(Address::ZERO))
        }

        async fn proxy_implementation(&self, proxy: Address) -> Result<Address, LedgerError> {
            self.implementations
                .lock()
                .unwrap()
                .get(&proxy)
                .copied()
                .ok_or_else(|| LedgerError::Reverted(format!("{proxy} is not a proxy")))
        }
    }

    struct CountingSource {
        document: MetadataDocument,
        fetches: AtomicUsize,
    }

    #[async_trait]
    impl MetadataSource for CountingSource {
        async fn fetch(&self) -> Result<MetadataDocument, ResolutionError> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            Ok(self.document.clone())
        }

        fn describe(&self) -> String {
            "counting".into()
        }
    }

    fn addr(b: u8) -> Address {
        Address::repeat_byte(b)
    }

    fn registry() -> CodeRegistry<Arc<FakeRegistry>> {
        let fake = Arc::new(FakeRegistry::default());
        fake.addresses
            .lock()
            .unwrap()
            .extend([(ContractCode::INCIDENTS, addr(0x10)), (ContractCode::QUOTATION, addr(0x20))]);
        fake.implementations.lock().unwrap().insert(addr(0x10), addr(0x11));

        let doc = MetadataDocument::single(
            NetworkId::Mainnet,
            vec![
                ContractMetadata::new("IC", addr(0x10), true),
                ContractMetadata::new("QT", addr(0x20), false),
                ContractMetadata::new("P1", addr(0x30), false),
            ],
        );
        let snapshot = MetadataSnapshot::from_document(&doc, NetworkId::Mainnet).unwrap();
        CodeRegistry::new(snapshot, fake)
    }

    #[tokio::test]
    async fn resolve_reads_live_registry_every_time() {
        let registry = registry();
        let first = registry.resolve(ContractCode::QUOTATION).await.unwrap();
        assert_eq!(first.address, addr(0x20));
        assert!(!first.is_proxy);

        registry
            .reader()
            .addresses
            .lock()
            .unwrap()
            .insert(ContractCode::QUOTATION, addr(0x21));
        let second = registry.resolve(ContractCode::QUOTATION).await.unwrap();
        assert_eq!(second.address, addr(0x21));
        assert_eq!(registry.reader().reads.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn unknown_code_fails_without_touching_the_ledger() {
        let registry = registry();
        let err = registry.resolve(ContractCode::GATEWAY).await.unwrap_err();
        assert!(matches!(err, ResolutionError::UnknownCode(ContractCode::GATEWAY)));
        assert_eq!(registry.reader().reads.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn zero_address_is_a_resolution_error() {
        let registry = registry();
        let err = registry.resolve(ContractCode::POOL).await.unwrap_err();
        assert!(matches!(err, ResolutionError::EmptyAddress(ContractCode::POOL)));
    }

    #[tokio::test]
    async fn upgrade_target_follows_proxy() {
        let registry = registry();
        let ic = registry.resolve(ContractCode::INCIDENTS).await.unwrap();
        assert!(ic.is_proxy);
        assert_eq!(registry.upgrade_target(&ic).await.unwrap(), addr(0x11));

        let qt = registry.resolve(ContractCode::QUOTATION).await.unwrap();
        assert_eq!(registry.upgrade_target(&qt).await.unwrap(), addr(0x20));
        assert!(matches!(
            registry.implementation(&qt).await,
            Err(ResolutionError::NotAProxy(ContractCode::QUOTATION))
        ));
    }

    #[tokio::test]
    async fn connect_fetches_metadata_once() {
        let source = CountingSource {
            document: MetadataDocument::single(
                NetworkId::Mainnet,
                vec![ContractMetadata::new("QT", addr(0x20), false)],
            ),
            fetches: AtomicUsize::new(0),
        };
        let fake = Arc::new(FakeRegistry::default());
        fake.addresses
            .lock()
            .unwrap()
            .insert(ContractCode::QUOTATION, addr(0x20));

        let registry = CodeRegistry::connect(&source, NetworkId::Mainnet, fake)
            .await
            .unwrap();
        for _ in 0..3 {
            registry.resolve(ContractCode::QUOTATION).await.unwrap();
        }
        assert_eq!(source.fetches.load(Ordering::SeqCst), 1);
    }
}
