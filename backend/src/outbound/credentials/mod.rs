//! Credential repository adapters.

mod registry_repository;

pub use registry_repository::RegistryCredentialRepository;
