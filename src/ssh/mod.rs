// ABOUTME: SSH config parsing, identity resolution and config reconstruction
// ABOUTME: Both directions of the conversion share the host document from the model module

pub mod identity;
pub mod keystore;
pub mod parser;
pub mod render;

pub use identity::IdentityResolver;
pub use keystore::KeyStore;
pub use parser::parse_ssh_config;
pub use render::render_ssh_config;
