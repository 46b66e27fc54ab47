pub mod cache;
pub mod models;

mod memory;
pub use memory::MemoryStore;

#[cfg(not(target_arch = "wasm32"))]
mod file_store;
#[cfg(not(target_arch = "wasm32"))]
pub use file_store::FileStore;

#[cfg(all(target_arch = "wasm32", feature = "web"))]
mod local;
#[cfg(all(target_arch = "wasm32", feature = "web"))]
pub use local::LocalStore;

pub use cache::{KeyValueStore, ProfileCache, USER_KEY};
pub use models::{
    DoctorProfile, HospitalAdminProfile, PatientProfile, PharmaProfile, Role, RoleProfile, User,
};
