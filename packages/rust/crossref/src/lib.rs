//! Cross-referencing roles for SPHEREx documentation.
//!
//! Provides the `spherexdoc` role, which links to a document or project
//! hosted on the SPHEREx documentation site:
//!
//! ```text
//! :spherexdoc:`SSDC-MS-001`
//! :spherexdoc:`Assemble Raw Data <SSDC-MS-002>`
//! ```
//!
//! Resolution is stateless, so roles may run from any number of documents in
//! any order.

mod node;
mod registry;
mod role;

pub use node::Reference;
pub use registry::{Role, RoleRegistry};
pub use role::{DOCS_HOST, LinkDirective, ROLE_NAME, SpherexDocRole, resolve};

/// Register this crate's roles with the generator (extension setup hook).
pub fn setup(registry: &mut RoleRegistry) {
    registry.add_role(ROLE_NAME, Box::new(SpherexDocRole));
}
