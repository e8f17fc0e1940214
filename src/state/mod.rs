pub mod lookup;
pub mod memory;
pub mod redis;
pub mod store;

pub use lookup::PhaseLookup;
pub use memory::InMemoryStore;
pub use self::redis::RedisStore;
pub use store::ObjectStore;

use crate::error::StoreError;
use crate::resources::Resource;

/// Gives `object` a concrete name, expanding `generateName` when no name was set.
pub(crate) fn assign_name<T: Resource>(object: &mut T) -> Result<(), StoreError> {
    let meta = object.metadata_mut();
    if !meta.name.is_empty() {
        return Ok(());
    }
    match &meta.generate_name {
        Some(prefix) => {
            let suffix = uuid::Uuid::new_v4().simple().to_string();
            meta.name = format!("{}{}", prefix, &suffix[..5]);
            Ok(())
        }
        None => Err(StoreError::Backend(format!(
            "{} in namespace {} has neither name nor generateName",
            T::KIND,
            meta.namespace
        ))),
    }
}
