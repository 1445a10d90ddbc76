//! # doctrack-storage
//!
//! Where documents live on disk. [`StorageLayout`] maps a document to the
//! paths of its canonical file, history, versions, and forcesave artifact;
//! [`LocalStorageProvider`] performs the filesystem operations.

pub mod layout;
pub mod naming;
pub mod providers;

pub use layout::StorageLayout;
pub use naming::correct_name;
pub use providers::LocalStorageProvider;
